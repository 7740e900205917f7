//! Domain data structures for the rental catalog and booking answers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Number of wheels a rentable vehicle can have.
pub enum WheelCount {
    /// Motorbikes, scooters, bicycles.
    Two,
    /// Cars, vans.
    Four,
}

impl WheelCount {
    /// Numeric wheel count as carried on the wire.
    #[must_use]
    pub fn count(self) -> u8 {
        match self {
            WheelCount::Two => 2,
            WheelCount::Four => 4,
        }
    }

    /// Parse a numeric wheel count; anything other than 2 or 4 is unsupported.
    #[must_use]
    pub fn from_count(raw: u8) -> Option<Self> {
        match raw {
            2 => Some(WheelCount::Two),
            4 => Some(WheelCount::Four),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier for a vehicle category (hatchback, cruiser, ...).
pub struct VehicleTypeId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier for a concrete rentable vehicle model.
pub struct ModelId(pub String);

#[derive(Debug, Clone, Serialize, Deserialize)]
/// A vehicle category offered by the rental catalog. Immutable once fetched.
pub struct VehicleType {
    /// Unique identifier.
    pub id: VehicleTypeId,
    /// Wheel count shared by all models of this type.
    pub wheel_count: WheelCount,
    /// Human-friendly category name.
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// A concrete vehicle model belonging to one category.
pub struct VehicleModel {
    /// Unique identifier used when booking.
    pub id: ModelId,
    /// Category this model belongs to.
    pub type_id: VehicleTypeId,
    /// Display name.
    pub name: String,
    /// Optional picture of the model.
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// An existing booking of a model, inclusive of both endpoint days.
pub struct ReservedInterval {
    /// First booked day.
    pub start: NaiveDate,
    /// Last booked day (inclusive).
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// The answers collected so far by the wizard.
///
/// Each field is independently optional; cross-field validation only happens
/// when the wizard advances, so the set is never partially invalid at rest.
pub struct Answers {
    /// Renter first name.
    pub first_name: String,
    /// Renter last name.
    pub last_name: String,
    /// Chosen wheel count.
    pub wheel_count: Option<WheelCount>,
    /// Chosen vehicle category.
    pub vehicle_type: Option<VehicleTypeId>,
    /// Chosen model.
    pub model: Option<ModelId>,
    /// First rental day.
    pub start: Option<NaiveDate>,
    /// Last rental day (inclusive).
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Fully collected booking payload, ready for submission.
pub struct BookingRequest {
    /// Renter first name, trimmed.
    pub first_name: String,
    /// Renter last name, trimmed.
    pub last_name: String,
    /// Chosen wheel count.
    pub wheel_count: WheelCount,
    /// Chosen vehicle category.
    pub vehicle_type: VehicleTypeId,
    /// Chosen model.
    pub model: ModelId,
    /// First rental day.
    pub start: NaiveDate,
    /// Last rental day (inclusive).
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Acknowledgment returned by the booking endpoint on success.
pub struct BookingConfirmation {
    /// Server-assigned booking identifier, when the backend provides one.
    pub booking_id: Option<String>,
}
