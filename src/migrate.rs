//! Legacy schema migration.
//!
//! Early releases stored measurements as flat numeric fields (`chest`,
//! `waist`, ...) directly on records owned by a client. The current schema
//! normalizes this into a shared [`MeasurementType`] catalogue plus a
//! [`Measurement`] join table keyed by model. The migration is a pure,
//! one-shot transform: a document is legacy if and only if it has no
//! `measurementTypes` collection, and the migrated form is persisted right
//! away so the transform never runs twice.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::document::{Document, Measurement, MeasurementType, Model, ModelStatus};

struct CanonicalField {
    name: &'static str,
    field: &'static str,
}

/// The seven measurement kinds the legacy schema hard-coded, in catalogue
/// order. Type ids derive from the position here, never from the source
/// document, so two migrations of the same data agree.
const CANONICAL_FIELDS: [CanonicalField; 7] = [
    CanonicalField { name: "Poitrine", field: "chest" },
    CanonicalField { name: "Taille", field: "waist" },
    CanonicalField { name: "Hanches", field: "hips" },
    CanonicalField { name: "Longueur bras", field: "armLength" },
    CanonicalField { name: "Longueur jambes", field: "legLength" },
    CanonicalField { name: "Largeur épaules", field: "shoulderWidth" },
    CanonicalField { name: "Cou", field: "neck" },
];

const LEGACY_UNIT: &str = "cm";
const DEFAULT_MODEL_NAME: &str = "Mesures par défaut";
const DEFAULT_MODEL_DESCRIPTION: &str = "Modèle créé automatiquement lors de la migration";

/// A document is legacy when the `measurementTypes` collection is absent.
pub fn is_legacy(document: &Value) -> bool {
    document.get("measurementTypes").is_none()
}

/// Rewrite a legacy document into the normalized shape.
///
/// Clients and creations carry over unchanged, as do any models that
/// already existed. Legacy measurement records that only name a client get
/// one synthesized placeholder model per client (id
/// `model_migrated_{clientId}`, status pending, delivery date
/// `default_delivery_date`); each non-null canonical field on a record
/// becomes one measurement row, keeping the original value and timestamps
/// where present and stamping `now` otherwise.
pub fn migrate_legacy(old: &Value, now: &str, default_delivery_date: &str) -> Document {
    let measurement_types: Vec<MeasurementType> = CANONICAL_FIELDS
        .iter()
        .enumerate()
        .map(|(index, canonical)| MeasurementType {
            id: format!("type_{index}"),
            name: canonical.name.to_string(),
            unit: LEGACY_UNIT.to_string(),
            created_at: now.to_string(),
        })
        .collect();

    let mut models: Vec<Model> = collection(old, "models");
    let mut measurements: Vec<Measurement> = Vec::new();

    if let Some(records) = old.get("measurements").and_then(Value::as_array) {
        for record in records {
            // Records without an id cannot produce stable measurement ids.
            let Some(record_id) = record.get("id").and_then(Value::as_str) else {
                continue;
            };
            let created_at = text_or(record, "createdAt", now);
            let updated_at = text_or(record, "updatedAt", now);

            let model_id = match record.get("modelId").and_then(Value::as_str) {
                Some(id) => id.to_string(),
                None => {
                    let Some(client_id) = record.get("clientId").and_then(Value::as_str) else {
                        continue;
                    };
                    let default_id = format!("model_migrated_{client_id}");
                    if !models.iter().any(|m| m.id == default_id) {
                        models.push(Model {
                            id: default_id.clone(),
                            client_id: client_id.to_string(),
                            name: DEFAULT_MODEL_NAME.to_string(),
                            description: Some(DEFAULT_MODEL_DESCRIPTION.to_string()),
                            photo_urls: Vec::new(),
                            status: ModelStatus::Pending,
                            delivery_date: default_delivery_date.to_string(),
                            created_at: created_at.clone(),
                            updated_at: updated_at.clone(),
                        });
                    }
                    default_id
                }
            };

            for (index, canonical) in CANONICAL_FIELDS.iter().enumerate() {
                if let Some(value) = record.get(canonical.field).and_then(Value::as_f64) {
                    measurements.push(Measurement {
                        id: format!("{record_id}_{}", canonical.field),
                        model_id: model_id.clone(),
                        measurement_type_id: format!("type_{index}"),
                        value,
                        created_at: created_at.clone(),
                        updated_at: updated_at.clone(),
                    });
                }
            }
        }
    }

    Document {
        clients: collection(old, "clients"),
        models,
        measurement_types,
        measurements,
        creations: collection(old, "creations"),
    }
}

/// Parse an array field element by element, dropping entries that no
/// longer match the current record shape instead of losing the whole
/// collection.
fn collection<T: DeserializeOwned>(old: &Value, key: &str) -> Vec<T> {
    old.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

fn text_or(record: &Value, key: &str, fallback: &str) -> String {
    record
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_string()
}
