//! DocumentStore - owns the in-memory document and writes it through.
//!
//! The store is constructed once at process start and handed to whatever
//! needs it; there is no ambient global state. Every mutation is applied
//! to the in-memory document first and the whole document is then written
//! back to the backing store best-effort: a failed write is logged and
//! reported on the `save_failed` side-channel but never rolls back or
//! fails the mutation. On load, unreadable or unparseable content degrades
//! to an empty document so the application stays usable.

use std::sync::Arc;

use event_emitter_rs::EventEmitter;
use serde_json::Value;

use crate::backing::BackingStore;
use crate::clock;
use crate::document::{
    Client, ClientPatch, Creation, Document, Measurement, MeasurementPatch, MeasurementType,
    Model, ModelPatch, NewClient, NewCreation, NewMeasurement, NewMeasurementType, NewModel,
    Outcome,
};
use crate::migrate;

/// The single backing-store key holding the whole document.
pub const STORAGE_KEY: &str = "atelier_data";

/// Event name for the persistence-failure side-channel.
pub const SAVE_FAILED_EVENT: &str = "save_failed";

/// Synthesized migration models get a delivery date this far out.
const MIGRATION_DELIVERY_OFFSET_DAYS: i64 = 7;

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// The document store. Exclusive owner of the in-memory [`Document`];
/// presentation code only ever sees snapshots and calls the operations
/// below.
pub struct DocumentStore {
    document: Document,
    backing: Arc<dyn BackingStore>,
    key: String,
    loaded: bool,
    emitter: EventEmitter,
}

impl DocumentStore {
    /// Open a store over `backing` at the default key, loading and (if
    /// needed) migrating the persisted document. Never fails: load
    /// problems fall back to an empty document.
    pub async fn open(backing: Arc<dyn BackingStore>) -> Self {
        Self::open_at(backing, STORAGE_KEY).await
    }

    /// Open a store over `backing` at a caller-chosen key.
    pub async fn open_at(backing: Arc<dyn BackingStore>, key: &str) -> Self {
        let mut store = Self {
            document: Document::default(),
            backing,
            key: key.to_string(),
            loaded: false,
            emitter: EventEmitter::new(),
        };
        store.load().await;
        store.loaded = true;
        store
    }

    /// Whether the initial load has completed. True for the lifetime of
    /// any store returned by [`open`](Self::open).
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Borrow the current document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Clone the current document as a read-only snapshot for rendering.
    pub fn snapshot(&self) -> Document {
        self.document.clone()
    }

    /// Subscribe to persistence failures. The listener receives the error
    /// message of each failed write.
    pub fn on_save_failure<F>(&mut self, listener: F)
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.emitter.on(SAVE_FAILED_EVENT, listener);
    }

    async fn load(&mut self) {
        let raw = match self.backing.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read document, starting empty");
                return;
            }
        };
        let value: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(error = %err, "stored document is not valid json, starting empty");
                return;
            }
        };
        if migrate::is_legacy(&value) {
            tracing::info!("migrating legacy document to normalized schema");
            self.document = migrate::migrate_legacy(
                &value,
                &clock::now(),
                &clock::date_after_days(MIGRATION_DELIVERY_OFFSET_DAYS),
            );
            // Persist right away so the migration runs at most once.
            self.persist().await;
            return;
        }
        match serde_json::from_value(value) {
            Ok(document) => self.document = document,
            Err(err) => {
                tracing::warn!(error = %err, "stored document has unexpected shape, starting empty");
            }
        }
    }

    /// Serialize the whole document and write it under the single key.
    /// Failures are logged and emitted, never propagated: the in-memory
    /// state already reflects the mutation.
    async fn persist(&mut self) {
        let raw = match serde_json::to_string(&self.document) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(error = %err, "failed to serialize document");
                self.emit_save_failed(err.to_string());
                return;
            }
        };
        if let Err(err) = self.backing.set(&self.key, raw).await {
            tracing::warn!(error = %err, "failed to save document, in-memory state retained");
            self.emit_save_failed(err.to_string());
        }
    }

    /// Notify `save_failed` listeners and wait for them to finish, so
    /// delivery completes before the mutation call returns.
    fn emit_save_failed(&mut self, message: String) {
        for handle in self.emitter.emit(SAVE_FAILED_EVENT, message) {
            let _ = handle.join();
        }
    }

    pub async fn add_client(&mut self, fields: NewClient) -> Client {
        let now = clock::now();
        let client = Client {
            id: new_id(),
            first_name: fields.first_name,
            last_name: fields.last_name,
            phone: fields.phone,
            photo_url: fields.photo_url,
            is_vip: fields.is_vip,
            is_favorite: fields.is_favorite,
            notes: fields.notes,
            created_at: now.clone(),
            updated_at: now,
        };
        self.document.insert_client(client.clone());
        self.persist().await;
        client
    }

    pub async fn update_client(&mut self, id: &str, patch: ClientPatch) -> Outcome {
        let outcome = self.document.merge_client(id, patch, &clock::now());
        if outcome.is_applied() {
            self.persist().await;
        }
        outcome
    }

    /// Delete a client, its models, and all measurements of those models.
    pub async fn delete_client(&mut self, id: &str) -> Outcome {
        let outcome = self.document.remove_client(id);
        if outcome.is_applied() {
            self.persist().await;
        }
        outcome
    }

    pub async fn add_model(&mut self, fields: NewModel) -> Model {
        let now = clock::now();
        let model = Model {
            id: new_id(),
            client_id: fields.client_id,
            name: fields.name,
            description: fields.description,
            photo_urls: fields.photo_urls,
            status: fields.status,
            delivery_date: fields.delivery_date,
            created_at: now.clone(),
            updated_at: now,
        };
        self.document.insert_model(model.clone());
        self.persist().await;
        model
    }

    pub async fn update_model(&mut self, id: &str, patch: ModelPatch) -> Outcome {
        let outcome = self.document.merge_model(id, patch, &clock::now());
        if outcome.is_applied() {
            self.persist().await;
        }
        outcome
    }

    /// Delete a model and every measurement taken for it.
    pub async fn delete_model(&mut self, id: &str) -> Outcome {
        let outcome = self.document.remove_model(id);
        if outcome.is_applied() {
            self.persist().await;
        }
        outcome
    }

    /// Idempotent by name: a type whose trimmed name matches an existing
    /// one case-insensitively is reused instead of duplicated.
    pub async fn add_measurement_type(&mut self, fields: NewMeasurementType) -> MeasurementType {
        if let Some(existing) = self.document.find_measurement_type(&fields.name) {
            return existing.clone();
        }
        let measurement_type = MeasurementType {
            id: new_id(),
            name: fields.name.trim().to_string(),
            unit: fields.unit.trim().to_string(),
            created_at: clock::now(),
        };
        self.document
            .insert_measurement_type(measurement_type.clone());
        self.persist().await;
        measurement_type
    }

    pub async fn add_measurement(&mut self, fields: NewMeasurement) -> Measurement {
        let now = clock::now();
        let measurement = Measurement {
            id: new_id(),
            model_id: fields.model_id,
            measurement_type_id: fields.measurement_type_id,
            value: fields.value,
            created_at: now.clone(),
            updated_at: now,
        };
        self.document.insert_measurement(measurement.clone());
        self.persist().await;
        measurement
    }

    pub async fn update_measurement(&mut self, id: &str, patch: MeasurementPatch) -> Outcome {
        let outcome = self.document.merge_measurement(id, patch, &clock::now());
        if outcome.is_applied() {
            self.persist().await;
        }
        outcome
    }

    pub async fn delete_measurement(&mut self, id: &str) -> Outcome {
        let outcome = self.document.remove_measurement(id);
        if outcome.is_applied() {
            self.persist().await;
        }
        outcome
    }

    /// The add-measurement workflow: resolve or create the type by name,
    /// then record the value against the model.
    pub async fn record_measurement(
        &mut self,
        model_id: &str,
        type_name: &str,
        unit: &str,
        value: f64,
    ) -> Measurement {
        let measurement_type = self
            .add_measurement_type(NewMeasurementType {
                name: type_name.to_string(),
                unit: unit.to_string(),
            })
            .await;
        self.add_measurement(NewMeasurement {
            model_id: model_id.to_string(),
            measurement_type_id: measurement_type.id,
            value,
        })
        .await
    }

    pub async fn add_creation(&mut self, fields: NewCreation) -> Creation {
        let creation = Creation {
            id: new_id(),
            name: fields.name,
            description: fields.description,
            photo_urls: fields.photo_urls,
            tags: fields.tags,
            created_at: clock::now(),
        };
        self.document.insert_creation(creation.clone());
        self.persist().await;
        creation
    }

    pub async fn delete_creation(&mut self, id: &str) -> Outcome {
        let outcome = self.document.remove_creation(id);
        if outcome.is_applied() {
            self.persist().await;
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backing::InMemoryBackingStore;
    use crate::document::ModelStatus;

    async fn open_empty() -> DocumentStore {
        DocumentStore::open(Arc::new(InMemoryBackingStore::new())).await
    }

    fn new_model(client_id: &str) -> NewModel {
        NewModel {
            client_id: client_id.to_string(),
            name: "Boubou".to_string(),
            description: None,
            photo_urls: Vec::new(),
            status: ModelStatus::Pending,
            delivery_date: "2024-07-01".to_string(),
        }
    }

    #[tokio::test]
    async fn open_on_fresh_backing_is_loaded_and_empty() {
        let store = open_empty().await;
        assert!(store.is_loaded());
        assert_eq!(store.snapshot(), Document::default());
    }

    #[tokio::test]
    async fn add_client_assigns_id_and_timestamps() {
        let mut store = open_empty().await;
        let client = store
            .add_client(NewClient {
                first_name: "Awa".to_string(),
                phone: "+221770000000".to_string(),
                ..NewClient::default()
            })
            .await;
        assert!(!client.id.is_empty());
        assert_eq!(client.created_at, client.updated_at);
        assert_eq!(store.document().clients.len(), 1);
    }

    #[tokio::test]
    async fn update_refreshes_updated_at_only() {
        let mut store = open_empty().await;
        let client = store
            .add_client(NewClient {
                first_name: "Awa".to_string(),
                phone: "+221770000000".to_string(),
                ..NewClient::default()
            })
            .await;
        let outcome = store
            .update_client(
                &client.id,
                ClientPatch {
                    is_favorite: Some(true),
                    ..ClientPatch::default()
                },
            )
            .await;
        assert!(outcome.is_applied());
        let updated = &store.document().clients[0];
        assert_eq!(updated.created_at, client.created_at);
        assert!(updated.updated_at >= client.updated_at);
    }

    #[tokio::test]
    async fn measurement_type_names_deduplicate_across_calls() {
        let mut store = open_empty().await;
        let first = store
            .add_measurement_type(NewMeasurementType {
                name: "Poitrine".to_string(),
                unit: "cm".to_string(),
            })
            .await;
        let second = store
            .add_measurement_type(NewMeasurementType {
                name: "  poitrine ".to_string(),
                unit: "cm".to_string(),
            })
            .await;
        assert_eq!(first.id, second.id);
        assert_eq!(store.document().measurement_types.len(), 1);
    }

    #[tokio::test]
    async fn record_measurement_reuses_existing_type() {
        let mut store = open_empty().await;
        let model = store.add_model(new_model("c1")).await;
        let first = store
            .record_measurement(&model.id, "Poitrine", "cm", 90.0)
            .await;
        let second = store
            .record_measurement(&model.id, "POITRINE", "cm", 92.0)
            .await;
        assert_eq!(first.measurement_type_id, second.measurement_type_id);
        assert_eq!(store.document().measurement_types.len(), 1);
        assert_eq!(store.document().measurements.len(), 2);
    }

    #[tokio::test]
    async fn delete_client_cascades_two_levels() {
        let mut store = open_empty().await;
        let client = store
            .add_client(NewClient {
                first_name: "Awa".to_string(),
                phone: "+221770000000".to_string(),
                ..NewClient::default()
            })
            .await;
        let model = store.add_model(new_model(&client.id)).await;
        store.record_measurement(&model.id, "Taille", "cm", 70.0).await;
        let other = store.add_model(new_model("someone-else")).await;
        store.record_measurement(&other.id, "Taille", "cm", 64.0).await;

        let outcome = store.delete_client(&client.id).await;
        assert!(outcome.is_applied());
        assert!(store.document().clients.is_empty());
        assert_eq!(store.document().models.len(), 1);
        assert_eq!(store.document().models[0].id, other.id);
        assert_eq!(store.document().measurements.len(), 1);
        assert_eq!(store.document().measurements[0].model_id, other.id);
    }

    #[tokio::test]
    async fn delete_with_unknown_id_is_a_no_op() {
        let mut store = open_empty().await;
        store
            .add_client(NewClient {
                first_name: "Awa".to_string(),
                phone: "+221770000000".to_string(),
                ..NewClient::default()
            })
            .await;
        let before = store.snapshot();
        assert_eq!(store.delete_client("nope").await, Outcome::NotFound);
        assert_eq!(store.delete_model("nope").await, Outcome::NotFound);
        assert_eq!(store.delete_measurement("nope").await, Outcome::NotFound);
        assert_eq!(store.delete_creation("nope").await, Outcome::NotFound);
        assert_eq!(store.snapshot(), before);
    }
}
