//! Pure state transitions on [`Document`].
//!
//! Every mutation the store exposes is computed here, synchronously and
//! without I/O: timestamps are passed in by the caller so these functions
//! stay deterministic and unit-testable. Merge and remove report whether
//! they touched anything via [`Outcome`]; a `NotFound` leaves every
//! collection untouched.

use super::{
    Client, ClientPatch, Creation, Document, Measurement, MeasurementPatch, MeasurementType,
    Model, ModelPatch,
};

/// Result of a merge or remove.
///
/// Missing ids are not errors: callers that only care about "did it work"
/// can ignore the tag, callers that need to distinguish can match on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Outcome {
    /// The target existed and the mutation was applied.
    Applied,
    /// No record matched the id; the document is unchanged.
    NotFound,
}

impl Outcome {
    pub fn is_applied(self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

impl Document {
    pub fn insert_client(&mut self, client: Client) {
        self.clients.push(client);
    }

    /// Merge a patch onto the client matching `id`, refreshing `updatedAt`.
    pub fn merge_client(&mut self, id: &str, patch: ClientPatch, now: &str) -> Outcome {
        let Some(client) = self.clients.iter_mut().find(|c| c.id == id) else {
            return Outcome::NotFound;
        };
        if let Some(first_name) = patch.first_name {
            client.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            client.last_name = last_name;
        }
        if let Some(phone) = patch.phone {
            client.phone = phone;
        }
        if let Some(photo_url) = patch.photo_url {
            client.photo_url = photo_url;
        }
        if let Some(is_vip) = patch.is_vip {
            client.is_vip = is_vip;
        }
        if let Some(is_favorite) = patch.is_favorite {
            client.is_favorite = is_favorite;
        }
        if let Some(notes) = patch.notes {
            client.notes = notes;
        }
        client.updated_at = now.to_string();
        Outcome::Applied
    }

    /// Remove a client together with its models and their measurements
    /// (the two-level cascade).
    pub fn remove_client(&mut self, id: &str) -> Outcome {
        let before = self.clients.len();
        self.clients.retain(|c| c.id != id);
        if self.clients.len() == before {
            return Outcome::NotFound;
        }
        let removed_models: Vec<String> = self
            .models
            .iter()
            .filter(|m| m.client_id == id)
            .map(|m| m.id.clone())
            .collect();
        self.models.retain(|m| m.client_id != id);
        self.measurements
            .retain(|m| !removed_models.contains(&m.model_id));
        Outcome::Applied
    }

    pub fn insert_model(&mut self, model: Model) {
        self.models.push(model);
    }

    pub fn merge_model(&mut self, id: &str, patch: ModelPatch, now: &str) -> Outcome {
        let Some(model) = self.models.iter_mut().find(|m| m.id == id) else {
            return Outcome::NotFound;
        };
        if let Some(client_id) = patch.client_id {
            model.client_id = client_id;
        }
        if let Some(name) = patch.name {
            model.name = name;
        }
        if let Some(description) = patch.description {
            model.description = description;
        }
        if let Some(photo_urls) = patch.photo_urls {
            model.photo_urls = photo_urls;
        }
        if let Some(status) = patch.status {
            model.status = status;
        }
        if let Some(delivery_date) = patch.delivery_date {
            model.delivery_date = delivery_date;
        }
        model.updated_at = now.to_string();
        Outcome::Applied
    }

    /// Remove a model and every measurement taken for it.
    pub fn remove_model(&mut self, id: &str) -> Outcome {
        let before = self.models.len();
        self.models.retain(|m| m.id != id);
        if self.models.len() == before {
            return Outcome::NotFound;
        }
        self.measurements.retain(|m| m.model_id != id);
        Outcome::Applied
    }

    pub fn insert_measurement_type(&mut self, measurement_type: MeasurementType) {
        self.measurement_types.push(measurement_type);
    }

    /// Find a measurement type by trimmed, case-insensitive name match.
    pub fn find_measurement_type(&self, name: &str) -> Option<&MeasurementType> {
        let wanted = name.trim().to_lowercase();
        self.measurement_types
            .iter()
            .find(|t| t.name.trim().to_lowercase() == wanted)
    }

    pub fn insert_measurement(&mut self, measurement: Measurement) {
        self.measurements.push(measurement);
    }

    pub fn merge_measurement(&mut self, id: &str, patch: MeasurementPatch, now: &str) -> Outcome {
        let Some(measurement) = self.measurements.iter_mut().find(|m| m.id == id) else {
            return Outcome::NotFound;
        };
        if let Some(model_id) = patch.model_id {
            measurement.model_id = model_id;
        }
        if let Some(measurement_type_id) = patch.measurement_type_id {
            measurement.measurement_type_id = measurement_type_id;
        }
        if let Some(value) = patch.value {
            measurement.value = value;
        }
        measurement.updated_at = now.to_string();
        Outcome::Applied
    }

    pub fn remove_measurement(&mut self, id: &str) -> Outcome {
        let before = self.measurements.len();
        self.measurements.retain(|m| m.id != id);
        if self.measurements.len() == before {
            return Outcome::NotFound;
        }
        Outcome::Applied
    }

    pub fn insert_creation(&mut self, creation: Creation) {
        self.creations.push(creation);
    }

    pub fn remove_creation(&mut self, id: &str) -> Outcome {
        let before = self.creations.len();
        self.creations.retain(|c| c.id != id);
        if self.creations.len() == before {
            return Outcome::NotFound;
        }
        Outcome::Applied
    }
}
