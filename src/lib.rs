mod backing;
mod clock;
mod document;
mod migrate;
mod store;

pub use backing::{BackingError, BackingStore, FileBackingStore, InMemoryBackingStore};
pub use document::{
    Client, ClientPatch, Creation, Document, Measurement, MeasurementPatch, MeasurementType,
    Model, ModelPatch, ModelStatus, NewClient, NewCreation, NewMeasurement, NewMeasurementType,
    NewModel, Outcome,
};
pub use migrate::{is_legacy, migrate_legacy};
pub use store::{DocumentStore, SAVE_FAILED_EVENT, STORAGE_KEY};
