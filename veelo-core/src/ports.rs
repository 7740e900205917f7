//! Traits describing the remote rental backend and shared error type.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::ParseError as ChronoParseError;
use reqwest::Error as ReqwestError;

use crate::model::{
    BookingConfirmation, BookingRequest, ModelId, ReservedInterval, VehicleModel, VehicleType,
    VehicleTypeId,
};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to the rental backend.
pub enum PortError {
    /// Network layer failed.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// Failed to parse a date from a backend response.
    #[error("Parse error: {0}")]
    Parse(#[from] ChronoParseError),
    /// The backend rejected a booking and provided a reason.
    #[error("{0}")]
    Rejected(String),
    /// Internal backend error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[async_trait]
/// Read access to the vehicle catalog.
pub trait CatalogPort: Send + Sync {
    /// Fetch all vehicle categories.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the backend request fails.
    async fn vehicle_types(&self) -> Result<Vec<VehicleType>, PortError>;

    /// Fetch the models belonging to one category.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the backend request fails.
    async fn models(&self, type_id: &VehicleTypeId) -> Result<Vec<VehicleModel>, PortError>;
}

#[async_trait]
/// Read access to existing bookings of a model.
pub trait AvailabilityPort: Send + Sync {
    /// Fetch the reserved date intervals for a model.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the backend request fails or returns
    /// unparseable dates.
    async fn reserved_intervals(&self, model: &ModelId)
    -> Result<Vec<ReservedInterval>, PortError>;
}

#[async_trait]
/// Write access for submitting a booking.
pub trait BookingPort: Send + Sync {
    /// Post the booking request.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::Rejected`] with the backend's message when the
    /// booking is refused, or another [`PortError`] on transport failure.
    async fn submit(&self, request: &BookingRequest) -> Result<BookingConfirmation, PortError>;
}

/// One concrete backend: an implementation of each port.
pub struct RentalBackend {
    /// Catalog reads.
    pub catalog: Arc<dyn CatalogPort>,
    /// Availability reads.
    pub availability: Arc<dyn AvailabilityPort>,
    /// Booking writes.
    pub booking: Arc<dyn BookingPort>,
}
