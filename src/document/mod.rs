//! Document - The five entity collections backing the whole application.
//!
//! Everything the application knows lives in one [`Document`]: clients,
//! garment orders ("models"), the shared measurement-type catalogue, the
//! measurements themselves, and the portfolio of past creations. The
//! serialized form is a single JSON object with camelCase field names,
//! byte-compatible with the documents written by earlier releases.

mod ops;

use serde::{Deserialize, Serialize};

pub use ops::Outcome;

/// Progress of a garment order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelStatus {
    Pending,
    InProgress,
    Delivered,
    Cancelled,
}

/// A customer of the workshop.
///
/// Phone numbers must be non-empty but are not required to be unique;
/// duplicate detection is a caller concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub is_vip: bool,
    pub is_favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A garment order placed by a client.
///
/// `delivery_date` is a date-only `YYYY-MM-DD` string; the timestamps are
/// RFC 3339 strings assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub id: String,
    pub client_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub photo_urls: Vec<String>,
    pub status: ModelStatus,
    pub delivery_date: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A named kind of body measurement (e.g. "Poitrine" in cm), shared by
/// measurements across many models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementType {
    pub id: String,
    pub name: String,
    pub unit: String,
    pub created_at: String,
}

/// A single measured value taken for one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub id: String,
    pub model_id: String,
    pub measurement_type_id: String,
    pub value: f64,
    pub created_at: String,
    pub updated_at: String,
}

/// A finished piece in the portfolio. Independent of clients and models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creation {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub photo_urls: Vec<String>,
    pub tags: Vec<String>,
    pub created_at: String,
}

/// The whole application state: five unordered collections keyed by id.
///
/// Collection order is incidental; presentation-level sorting (favorites
/// first, most recent first) happens outside the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub models: Vec<Model>,
    #[serde(default)]
    pub measurement_types: Vec<MeasurementType>,
    #[serde(default)]
    pub measurements: Vec<Measurement>,
    #[serde(default)]
    pub creations: Vec<Creation>,
}

/// Fields for creating a client. Identifier and timestamps are assigned by
/// the store.
#[derive(Debug, Clone, Default)]
pub struct NewClient {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub photo_url: Option<String>,
    pub is_vip: bool,
    pub is_favorite: bool,
    pub notes: Option<String>,
}

/// Fields for creating a model.
#[derive(Debug, Clone)]
pub struct NewModel {
    pub client_id: String,
    pub name: String,
    pub description: Option<String>,
    pub photo_urls: Vec<String>,
    pub status: ModelStatus,
    pub delivery_date: String,
}

/// Fields for creating a measurement type. Name matching against existing
/// types is case-insensitive on the trimmed name.
#[derive(Debug, Clone)]
pub struct NewMeasurementType {
    pub name: String,
    pub unit: String,
}

/// Fields for creating a measurement.
#[derive(Debug, Clone)]
pub struct NewMeasurement {
    pub model_id: String,
    pub measurement_type_id: String,
    pub value: f64,
}

/// Fields for creating a portfolio entry.
#[derive(Debug, Clone, Default)]
pub struct NewCreation {
    pub name: String,
    pub description: Option<String>,
    pub photo_urls: Vec<String>,
    pub tags: Vec<String>,
}

/// Partial update for a client. `None` fields keep their current value;
/// optional text fields use a double `Option` so `Some(None)` clears them.
#[derive(Debug, Clone, Default)]
pub struct ClientPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<Option<String>>,
    pub is_vip: Option<bool>,
    pub is_favorite: Option<bool>,
    pub notes: Option<Option<String>>,
}

/// Partial update for a model.
#[derive(Debug, Clone, Default)]
pub struct ModelPatch {
    pub client_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub photo_urls: Option<Vec<String>>,
    pub status: Option<ModelStatus>,
    pub delivery_date: Option<String>,
}

/// Partial update for a measurement.
#[derive(Debug, Clone, Default)]
pub struct MeasurementPatch {
    pub model_id: Option<String>,
    pub measurement_type_id: Option<String>,
    pub value: Option<f64>,
}
