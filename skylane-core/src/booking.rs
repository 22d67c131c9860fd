use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: i32,
    pub account_info_id: i32,
    pub class_id: i32,
    pub from_id: i32,
    pub to_id: i32,
    pub departure_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    pub id: i32,
    pub booking_id: i32,
    /// Denormalized owner, always derived from the parent booking.
    pub account_info_id: i32,
    pub flight_number: String,
    pub seat_number: String,
    pub status: FlightStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightStatus {
    Pending,
    Boarding,
    OnTime,
    Delayed,
    Cancelled,
}

impl FlightStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightStatus::Pending => "pending",
            FlightStatus::Boarding => "boarding",
            FlightStatus::OnTime => "on_time",
            FlightStatus::Delayed => "delayed",
            FlightStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlightStatus {
    type Err = crate::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(FlightStatus::Pending),
            "boarding" => Ok(FlightStatus::Boarding),
            "on_time" => Ok(FlightStatus::OnTime),
            "delayed" => Ok(FlightStatus::Delayed),
            "cancelled" => Ok(FlightStatus::Cancelled),
            other => Err(crate::CoreError::ValidationError(format!(
                "unknown flight status: {other}"
            ))),
        }
    }
}

/// Create / PUT payload. `account_info_id` is deliberately absent: the
/// owner is derived server-side from the authenticated account.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingPut {
    pub class_id: i32,
    pub from_id: i32,
    pub to_id: i32,
    pub departure_date: DateTime<Utc>,
    #[serde(default)]
    pub return_date: Option<DateTime<Utc>>,
}

/// PATCH payload. `return_date` is nullable, so it needs two levels of
/// presence: outer `None` = not provided, `Some(None)` = set to NULL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingPatch {
    pub class_id: Option<i32>,
    pub from_id: Option<i32>,
    pub to_id: Option<i32>,
    pub departure_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "double_option")]
    pub return_date: Option<Option<DateTime<Utc>>>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl BookingPatch {
    pub fn apply(&self, booking: &mut Booking) {
        if let Some(class_id) = self.class_id {
            booking.class_id = class_id;
        }
        if let Some(from_id) = self.from_id {
            booking.from_id = from_id;
        }
        if let Some(to_id) = self.to_id {
            booking.to_id = to_id;
        }
        if let Some(departure_date) = self.departure_date {
            booking.departure_date = departure_date;
        }
        if let Some(return_date) = self.return_date {
            booking.return_date = return_date;
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlightPut {
    pub flight_number: String,
    pub seat_number: String,
    pub status: FlightStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightPatch {
    pub flight_number: Option<String>,
    pub seat_number: Option<String>,
    pub status: Option<FlightStatus>,
}

impl FlightPatch {
    pub fn apply(&self, flight: &mut Flight) {
        if let Some(flight_number) = &self.flight_number {
            flight.flight_number = flight_number.clone();
        }
        if let Some(seat_number) = &self.seat_number {
            flight.seat_number = seat_number.clone();
        }
        if let Some(status) = self.status {
            flight.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_booking() -> Booking {
        Booking {
            id: 10,
            account_info_id: 3,
            class_id: 1,
            from_id: 1,
            to_id: 2,
            departure_date: Utc.with_ymd_and_hms(2026, 9, 1, 8, 0, 0).unwrap(),
            return_date: Some(Utc.with_ymd_and_hms(2026, 9, 8, 18, 0, 0).unwrap()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn absent_return_date_is_preserved_by_patch() {
        let mut booking = sample_booking();
        let before = booking.return_date;
        let patch: BookingPatch = serde_json::from_str(r#"{"class_id": 2}"#).unwrap();
        assert!(patch.return_date.is_none());
        patch.apply(&mut booking);
        assert_eq!(booking.class_id, 2);
        assert_eq!(booking.return_date, before);
    }

    #[test]
    fn explicit_null_return_date_clears_it() {
        let mut booking = sample_booking();
        let patch: BookingPatch =
            serde_json::from_str(r#"{"return_date": null}"#).unwrap();
        assert_eq!(patch.return_date, Some(None));
        patch.apply(&mut booking);
        assert_eq!(booking.return_date, None);
    }

    #[test]
    fn patch_never_touches_owner_or_id() {
        let mut booking = sample_booking();
        let patch: BookingPatch = serde_json::from_str(
            r#"{"from_id": 5, "to_id": 6, "departure_date": "2026-10-01T09:00:00Z"}"#,
        )
        .unwrap();
        patch.apply(&mut booking);
        assert_eq!(booking.id, 10);
        assert_eq!(booking.account_info_id, 3);
        assert_eq!(booking.from_id, 5);
        assert_eq!(booking.to_id, 6);
    }

    #[test]
    fn flight_status_round_trips_through_str() {
        for status in [
            FlightStatus::Pending,
            FlightStatus::Boarding,
            FlightStatus::OnTime,
            FlightStatus::Delayed,
            FlightStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<FlightStatus>().unwrap(), status);
        }
    }

    #[test]
    fn flight_put_requires_every_field() {
        let err = serde_json::from_str::<FlightPut>(r#"{"flight_number": "SK100"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn flight_status_uses_snake_case_on_the_wire() {
        let patch: FlightPatch =
            serde_json::from_str(r#"{"status": "on_time"}"#).unwrap();
        assert_eq!(patch.status, Some(FlightStatus::OnTime));
    }
}
