//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! All Qdrant interactions sit behind this facade: collection bootstrap,
//! bug upserts, and the similarity search the duplicate workflow consumes.
//! The rest of the engine never touches the builder API or the payload
//! value types directly.

use qdrant_client::Payload;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, Distance, Filter, PointStruct, SearchPointsBuilder,
    UpsertPointsBuilder, Value as QValue, VectorParamsBuilder,
};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::errors::EngineError;
use crate::providers::SimilaritySearch;
use crate::record::{BugHit, BugRecord};

/// Facade over the Qdrant client bound to one collection.
pub struct QdrantFacade {
    client: Qdrant,
    collection: String,
    vector_dim: usize,
}

impl QdrantFacade {
    /// Creates a new facade from the engine config.
    ///
    /// # Errors
    /// Returns [`EngineError::Config`] for invalid config and
    /// [`EngineError::Qdrant`] if the client cannot be built.
    pub fn new(cfg: &EngineConfig) -> Result<Self, EngineError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.qdrant_url);
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| EngineError::Qdrant(e.to_string()))?;

        Ok(Self {
            client,
            collection: cfg.collection.clone(),
            vector_dim: cfg.vector_dim,
        })
    }

    /// Ensures the collection exists (cosine space, configured dimension).
    ///
    /// Existing collections are left untouched.
    ///
    /// # Errors
    /// Returns [`EngineError::Qdrant`] on client failures.
    pub async fn ensure_collection(&self) -> Result<(), EngineError> {
        match self.client.collection_info(&self.collection).await {
            Ok(_) => {
                debug!("collection '{}' already exists", self.collection);
                return Ok(());
            }
            Err(err) => {
                warn!(
                    "collection '{}' not found, creating (error={})",
                    self.collection, err
                );
            }
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection).vectors_config(
                    VectorParamsBuilder::new(self.vector_dim as u64, Distance::Cosine),
                ),
            )
            .await
            .map_err(|e| EngineError::Qdrant(e.to_string()))?;

        info!(
            "collection '{}' created (dim={}, cosine)",
            self.collection, self.vector_dim
        );
        Ok(())
    }

    /// Upserts one bug report with its embedding.
    ///
    /// # Errors
    /// [`EngineError::VectorSizeMismatch`] if the embedding does not match
    /// the configured dimension; [`EngineError::Qdrant`] on client failures.
    pub async fn upsert_bug(
        &self,
        record: &BugRecord,
        embedding: Vec<f32>,
    ) -> Result<(), EngineError> {
        if embedding.len() != self.vector_dim {
            return Err(EngineError::VectorSizeMismatch {
                got: embedding.len(),
                want: self.vector_dim,
            });
        }

        let payload: Payload = Payload::try_from(serde_json::to_value(record)?)
            .map_err(|e| EngineError::Qdrant(e.to_string()))?;
        let point = PointStruct::new(record.id.clone(), embedding, payload);

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, vec![point]))
            .await
            .map_err(|e| EngineError::Qdrant(e.to_string()))?;

        debug!(bug = %record.id, "bug report upserted");
        Ok(())
    }

    /// Raw similarity search returning hydrated [`BugHit`]s.
    ///
    /// Qdrant applies the score threshold server-side and returns hits
    /// sorted by similarity descending. Hits whose payload cannot be
    /// deserialized are skipped with a warning — bad stored data must not
    /// poison the advisory feature.
    async fn search_similar(
        &self,
        vector: Vec<f32>,
        threshold: f32,
        limit: u64,
        project_id: Option<&str>,
    ) -> Result<Vec<BugHit>, EngineError> {
        debug!(
            collection = %self.collection,
            threshold,
            limit,
            scoped = project_id.is_some(),
            "similarity search"
        );

        let mut builder = SearchPointsBuilder::new(&self.collection, vector, limit)
            .with_payload(true)
            .score_threshold(threshold);

        if let Some(project) = project_id {
            builder = builder.filter(Filter::must([Condition::matches(
                "project_id",
                project.to_string(),
            )]));
        }

        let res = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| EngineError::Qdrant(e.to_string()))?;

        let mut hits = Vec::with_capacity(res.result.len());
        for point in res.result {
            let payload = qpayload_to_json(point.payload);
            match serde_json::from_value::<BugRecord>(payload) {
                Ok(record) => hits.push(BugHit {
                    record,
                    similarity: point.score.clamp(0.0, 1.0),
                }),
                Err(err) => {
                    warn!(error = %err, "skipping hit with undecodable payload");
                }
            }
        }

        debug!(hits = hits.len(), "similarity search completed");
        Ok(hits)
    }
}

impl SimilaritySearch for QdrantFacade {
    async fn search(
        &self,
        vector: Vec<f32>,
        threshold: f32,
        limit: u64,
        project_id: Option<&str>,
    ) -> Result<Vec<BugHit>, EngineError> {
        self.search_similar(vector, threshold, limit, project_id)
            .await
            .map_err(|e| EngineError::Search(e.to_string()))
    }
}

/// Converts a Qdrant payload map into plain JSON. Nested structures are not
/// stored by this engine, so unsupported kinds map to `Null`.
fn qpayload_to_json(mut p: std::collections::HashMap<String, QValue>) -> serde_json::Value {
    use qdrant_client::qdrant::value::Kind as K;
    let mut m = serde_json::Map::new();
    for (k, v) in p.drain() {
        let j = match v.kind {
            Some(K::StringValue(s)) => serde_json::Value::String(s),
            Some(K::IntegerValue(i)) => serde_json::Value::Number(i.into()),
            Some(K::DoubleValue(f)) => serde_json::json!(f),
            Some(K::BoolValue(b)) => serde_json::Value::Bool(b),
            _ => serde_json::Value::Null,
        };
        m.insert(k, j);
    }
    serde_json::Value::Object(m)
}
