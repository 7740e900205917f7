//! High-level facade over the rental backend.
//!
//! Catalog and availability reads degrade to empty lists on failure (an empty
//! option set simply makes the affected step's validation fail); booking
//! submissions surface their error to the caller.

use crate::model::{
    BookingConfirmation, BookingRequest, ModelId, ReservedInterval, VehicleModel, VehicleType,
    VehicleTypeId,
};
use crate::ports::{PortError, RentalBackend};

/// Public entry point for all remote reads and the booking write.
pub struct RentalService {
    backend: RentalBackend,
}

impl RentalService {
    /// Create a new service bound to the given backend.
    #[must_use]
    pub fn new(backend: RentalBackend) -> Self {
        Self { backend }
    }

    /// Fetch all vehicle categories; an empty list on failure.
    pub async fn vehicle_types(&self) -> Vec<VehicleType> {
        match self.backend.catalog.vehicle_types().await {
            Ok(types) => types,
            Err(error) => {
                tracing::warn!(%error, "vehicle type fetch failed");
                Vec::new()
            }
        }
    }

    /// Fetch the models of one category; an empty list on failure.
    pub async fn models(&self, type_id: &VehicleTypeId) -> Vec<VehicleModel> {
        match self.backend.catalog.models(type_id).await {
            Ok(models) => models,
            Err(error) => {
                tracing::warn!(%error, type_id = %type_id.0, "model fetch failed");
                Vec::new()
            }
        }
    }

    /// Fetch the reserved intervals of one model; an empty list on failure.
    pub async fn reserved_intervals(&self, model: &ModelId) -> Vec<ReservedInterval> {
        match self.backend.availability.reserved_intervals(model).await {
            Ok(intervals) => intervals,
            Err(error) => {
                tracing::warn!(%error, model = %model.0, "availability fetch failed");
                Vec::new()
            }
        }
    }

    /// Submit the booking.
    ///
    /// # Errors
    ///
    /// Unlike the read paths, failures here are returned verbatim so the user
    /// can see the rejection reason and retry.
    pub async fn submit(
        &self,
        request: &BookingRequest,
    ) -> Result<BookingConfirmation, PortError> {
        self.backend.booking.submit(request).await
    }
}
