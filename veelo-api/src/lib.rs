//! HTTP backend implementing the veelo ports against the remote rental API.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use veelo_core::{
    model::{
        BookingConfirmation, BookingRequest, ModelId, ReservedInterval, VehicleModel, VehicleType,
        VehicleTypeId, WheelCount,
    },
    ports::{AvailabilityPort, BookingPort, CatalogPort, PortError, RentalBackend},
};

const BASE_URL: &str = "https://rental-api.veelo.app/api/v1";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Environment variable overriding the default API base URL.
pub const BASE_URL_ENV: &str = "VEELO_API_URL";

/// Response wrapper from /vehicleTypes
#[derive(Debug, Deserialize)]
struct VehicleTypesResponse {
    data: Vec<VehicleTypeEntry>,
}

/// Single category from /vehicleTypes
#[derive(Debug, Deserialize)]
struct VehicleTypeEntry {
    id: String,
    wheels: u8,

    // Some deployments call this field "type", newer ones "label".
    #[serde(alias = "type")]
    label: String,
}

/// Response wrapper from /vehicles
#[derive(Debug, Deserialize)]
struct VehiclesResponse {
    data: Vec<VehicleEntry>,
}

/// Single model from /vehicles
#[derive(Debug, Deserialize)]
struct VehicleEntry {
    id: String,
    name: String,

    #[serde(default)]
    image: Option<String>,
}

/// Response from /bookings/{modelId}
#[derive(Debug, Deserialize)]
struct BookingsResponse {
    #[serde(default)]
    bookings: Vec<BookingEntry>,
}

/// Single existing booking from /bookings/{modelId}
#[derive(Debug, Deserialize)]
struct BookingEntry {
    #[serde(rename = "startDate")]
    start_date: String, // "YYYY-MM-DD"
    #[serde(rename = "endDate")]
    end_date: String,
}

/// Request body for POST /bookings/{modelId}
#[derive(Debug, Serialize)]
struct BookingBody<'req> {
    #[serde(rename = "firstName")]
    first_name: &'req str,
    #[serde(rename = "lastName")]
    last_name: &'req str,
    wheels: u8,
    #[serde(rename = "vehicleTypeId")]
    vehicle_type_id: &'req str,
    #[serde(rename = "modelId")]
    model_id: &'req str,
    #[serde(rename = "startDate")]
    start_date: String,
    #[serde(rename = "endDate")]
    end_date: String,
}

impl<'req> From<&'req BookingRequest> for BookingBody<'req> {
    fn from(request: &'req BookingRequest) -> Self {
        Self {
            first_name: &request.first_name,
            last_name: &request.last_name,
            wheels: request.wheel_count.count(),
            vehicle_type_id: &request.vehicle_type.0,
            model_id: &request.model.0,
            start_date: request.start.format(DATE_FORMAT).to_string(),
            end_date: request.end.format(DATE_FORMAT).to_string(),
        }
    }
}

/// Success payload from POST /bookings/{modelId}
#[derive(Debug, Default, Deserialize)]
struct ConfirmationBody {
    #[serde(default)]
    id: Option<String>,
}

/// Error payload returned with a non-2xx booking response.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Catalog reads backed by the rental API.
pub struct ApiCatalog {
    client: Client,
    base_url: String,
}

impl ApiCatalog {
    /// Create a new catalog port bound to the given HTTP client.
    #[must_use]
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl CatalogPort for ApiCatalog {
    async fn vehicle_types(&self) -> Result<Vec<VehicleType>, PortError> {
        let resp = fetch_json::<VehicleTypesResponse>(
            self.client.get(format!("{}/vehicleTypes", self.base_url)),
        )
        .await?;
        Ok(map_vehicle_types(resp.data))
    }

    async fn models(&self, type_id: &VehicleTypeId) -> Result<Vec<VehicleModel>, PortError> {
        let resp = fetch_json::<VehiclesResponse>(
            self.client
                .get(format!("{}/vehicles", self.base_url))
                .query(&[("vehicleTypeId", type_id.0.as_str())]),
        )
        .await?;
        Ok(map_models(type_id, resp.data))
    }
}

/// Availability reads backed by the rental API.
pub struct ApiAvailability {
    client: Client,
    base_url: String,
}

impl ApiAvailability {
    /// Create a new availability port bound to the given HTTP client.
    #[must_use]
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl AvailabilityPort for ApiAvailability {
    async fn reserved_intervals(
        &self,
        model: &ModelId,
    ) -> Result<Vec<ReservedInterval>, PortError> {
        let resp = fetch_json::<BookingsResponse>(
            self.client
                .get(format!("{}/bookings/{}", self.base_url, model.0)),
        )
        .await?;
        map_intervals(resp.bookings)
    }
}

/// Booking writes backed by the rental API.
pub struct ApiBooking {
    client: Client,
    base_url: String,
}

impl ApiBooking {
    /// Create a new booking port bound to the given HTTP client.
    #[must_use]
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl BookingPort for ApiBooking {
    async fn submit(&self, request: &BookingRequest) -> Result<BookingConfirmation, PortError> {
        let body = BookingBody::from(request);
        let resp = self
            .client
            .post(format!("{}/bookings/{}", self.base_url, request.model.0))
            .json(&body)
            .send()
            .await
            .map_err(PortError::from)?;

        let status = resp.status();
        if status.is_success() {
            let confirmation = resp
                .json::<ConfirmationBody>()
                .await
                .map_err(PortError::from)?;
            return Ok(BookingConfirmation {
                booking_id: confirmation.id,
            });
        }

        // Prefer the server's message; fall back to a generic transport line.
        let message = resp
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|error| error.message)
            .unwrap_or_else(|| format!("Booking request failed with status {status}"));
        Err(PortError::Rejected(message))
    }
}

/// Build the backend bundle against the default API base URL, honoring the
/// `VEELO_API_URL` override.
#[must_use]
pub fn backend(client: Client) -> RentalBackend {
    let base_url = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| BASE_URL.to_owned());
    backend_with_base_url(client, base_url)
}

/// Build the backend bundle against an explicit base URL.
#[must_use]
pub fn backend_with_base_url(client: Client, base_url: impl Into<String>) -> RentalBackend {
    let base_url = base_url.into();
    RentalBackend {
        catalog: Arc::new(ApiCatalog::new(client.clone(), base_url.clone())),
        availability: Arc::new(ApiAvailability::new(client.clone(), base_url.clone())),
        booking: Arc::new(ApiBooking::new(client, base_url)),
    }
}

fn map_vehicle_types(entries: Vec<VehicleTypeEntry>) -> Vec<VehicleType> {
    let mut types = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some(wheel_count) = WheelCount::from_count(entry.wheels) else {
            tracing::warn!(
                id = %entry.id,
                wheels = entry.wheels,
                "skipping vehicle type with unsupported wheel count"
            );
            continue;
        };
        types.push(VehicleType {
            id: VehicleTypeId(entry.id),
            wheel_count,
            label: entry.label,
        });
    }
    types
}

fn map_models(type_id: &VehicleTypeId, entries: Vec<VehicleEntry>) -> Vec<VehicleModel> {
    entries
        .into_iter()
        .map(|entry| VehicleModel {
            id: ModelId(entry.id),
            type_id: type_id.clone(),
            name: entry.name,
            image_url: entry.image,
        })
        .collect()
}

fn map_intervals(entries: Vec<BookingEntry>) -> Result<Vec<ReservedInterval>, PortError> {
    let mut intervals = Vec::with_capacity(entries.len());
    for entry in entries {
        let start =
            NaiveDate::parse_from_str(&entry.start_date, DATE_FORMAT).map_err(PortError::from)?;
        let end =
            NaiveDate::parse_from_str(&entry.end_date, DATE_FORMAT).map_err(PortError::from)?;
        intervals.push(ReservedInterval { start, end });
    }
    Ok(intervals)
}

// Small helper to fetch and decode JSON with status handling.
async fn fetch_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, PortError> {
    req.send()
        .await
        .map_err(PortError::from)?
        .error_for_status()
        .map_err(PortError::from)?
        .json()
        .await
        .map_err(PortError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_vehicle_types_and_skips_unknown_wheel_counts() {
        let resp: VehicleTypesResponse = serde_json::from_str(
            r#"{"data":[
                {"id":"sedan","wheels":4,"label":"Sedan"},
                {"id":"cruiser","wheels":2,"type":"Cruiser"},
                {"id":"trike","wheels":3,"label":"Trike"}
            ]}"#,
        )
        .unwrap();

        let types = map_vehicle_types(resp.data);
        assert_eq!(types.len(), 2);
        assert_eq!(types[0].id, VehicleTypeId("sedan".into()));
        assert_eq!(types[0].wheel_count, WheelCount::Four);
        // "type" is accepted as an alias for "label".
        assert_eq!(types[1].label, "Cruiser");
    }

    #[test]
    fn parses_models_with_optional_image() {
        let resp: VehiclesResponse = serde_json::from_str(
            r#"{"data":[
                {"id":"civic-2020","name":"Honda Civic 2020","image":"https://img/civic.jpg"},
                {"id":"rav4-2021","name":"Toyota RAV4 2021"}
            ]}"#,
        )
        .unwrap();

        let models = map_models(&VehicleTypeId("sedan".into()), resp.data);
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].type_id, VehicleTypeId("sedan".into()));
        assert_eq!(models[0].image_url.as_deref(), Some("https://img/civic.jpg"));
        assert_eq!(models[1].image_url, None);
    }

    #[test]
    fn parses_reserved_intervals() {
        let resp: BookingsResponse = serde_json::from_str(
            r#"{"bookings":[{"startDate":"2026-03-10","endDate":"2026-03-12"}]}"#,
        )
        .unwrap();

        let intervals = map_intervals(resp.bookings).unwrap();
        assert_eq!(intervals.len(), 1);
        assert_eq!(
            intervals[0].start,
            NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
        );
        assert_eq!(
            intervals[0].end,
            NaiveDate::from_ymd_opt(2026, 3, 12).unwrap()
        );
    }

    #[test]
    fn unparseable_interval_dates_are_an_error() {
        let entries = vec![BookingEntry {
            start_date: "10.03.2026".into(),
            end_date: "2026-03-12".into(),
        }];
        assert!(matches!(map_intervals(entries), Err(PortError::Parse(_))));
    }

    #[test]
    fn missing_bookings_field_means_no_reservations() {
        let resp: BookingsResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.bookings.is_empty());
    }

    #[test]
    fn booking_body_flattens_all_answer_fields() {
        let request = BookingRequest {
            first_name: "Ana".into(),
            last_name: "Lee".into(),
            wheel_count: WheelCount::Four,
            vehicle_type: VehicleTypeId("sedan".into()),
            model: ModelId("civic-2020".into()),
            start: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2026, 6, 3).unwrap(),
        };

        let body = serde_json::to_value(BookingBody::from(&request)).unwrap();
        assert_eq!(body["firstName"], "Ana");
        assert_eq!(body["lastName"], "Lee");
        assert_eq!(body["wheels"], 4);
        assert_eq!(body["vehicleTypeId"], "sedan");
        assert_eq!(body["modelId"], "civic-2020");
        assert_eq!(body["startDate"], "2026-06-01");
        assert_eq!(body["endDate"], "2026-06-03");
    }

    #[test]
    fn error_body_message_is_optional() {
        let with: ErrorBody =
            serde_json::from_str(r#"{"message":"Vehicle no longer available"}"#).unwrap();
        assert_eq!(with.message.as_deref(), Some("Vehicle no longer available"));

        let without: ErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(without.message, None);
    }
}
