//! Core types for the incident store (persisted JSON contract + query models).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Status assigned to every new incident.
pub const STATUS_REPORTED: &str = "Reported";
/// Terminal status; incidents in this state are no longer "active".
pub const STATUS_RESOLVED: &str = "Resolved";
/// Fallback category for submissions without one.
pub const CATEGORY_OTHER: &str = "Other";

/// Categories always present in the monthly aggregate, in display order.
pub const KNOWN_CATEGORIES: [&str; 6] =
  ["Fire", "Flood", "Accident", "Electricity", "Medical", "Other"];

// ---------------------------------------------------------------------------
// Persisted types (JSON contract — what lives on disk and goes over the wire)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
  pub lat: f64,
  pub lng: f64,
}

impl Location {
  /// Build a location from raw form values. Both coordinates must be present,
  /// non-empty and parse as finite numbers; anything else yields `None`.
  pub fn parse(lat: Option<&str>, lng: Option<&str>) -> Option<Self> {
    let lat = lat.map(str::trim).filter(|s| !s.is_empty())?;
    let lng = lng.map(str::trim).filter(|s| !s.is_empty())?;
    let lat: f64 = lat.parse().ok()?;
    let lng: f64 = lng.parse().ok()?;
    // NaN/inf would be written as `null` and make the whole file unreadable.
    if !lat.is_finite() || !lng.is_finite() {
      return None;
    }
    Some(Self { lat, lng })
  }
}

/// One citizen-submitted incident report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
  pub id: String,
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub description: String,
  #[serde(default = "default_category")]
  pub category: String,
  #[serde(default)]
  pub department: Option<String>,
  #[serde(default)]
  pub location: Option<Location>,
  #[serde(default)]
  pub image_url: Option<String>,
  #[serde(default = "default_status")]
  pub status: String,
  pub created_at: String,
  pub updated_at: String,
  #[serde(default)]
  pub reported_by_device_id: Option<String>,
}

impl Incident {
  pub fn is_active(&self) -> bool {
    self.status != STATUS_RESOLVED
  }
}

fn default_category() -> String {
  CATEGORY_OTHER.to_string()
}

fn default_status() -> String {
  STATUS_REPORTED.to_string()
}

/// The whole durable collection: `{ "reports": [ ... ] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collection {
  #[serde(default)]
  pub reports: Vec<Incident>,
}

// ---------------------------------------------------------------------------
// Mutation inputs
// ---------------------------------------------------------------------------

/// Fields supplied when creating an incident. Text fields are taken as given;
/// see [`crate::normalize`] for turning raw form values into this shape.
#[derive(Debug, Clone, Default)]
pub struct NewIncident {
  pub title: String,
  pub description: String,
  pub category: Option<String>,
  pub department: Option<String>,
  pub location: Option<Location>,
  pub image_url: Option<String>,
  pub reported_by_device_id: Option<String>,
}

/// Partial update. Unknown JSON fields are ignored.
///
/// `department` distinguishes three cases: key absent (`None`, leave as is),
/// key present with null or "" (`Some(None)`, clear), and a value
/// (`Some(Some(..))`, assign).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncidentPatch {
  pub status: Option<String>,
  pub department: Option<Option<String>>,
}

impl IncidentPatch {
  /// Parse a raw request body. Each recognized key is taken on its own: a key
  /// with the wrong type is skipped without affecting the others. A body that
  /// is not a JSON object is an empty patch.
  pub fn from_json_lenient(body: &[u8]) -> Self {
    let Ok(Value::Object(fields)) = serde_json::from_slice::<Value>(body) else {
      return Self::default();
    };

    let status = match fields.get("status") {
      Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
      _ => None,
    };
    let department = match fields.get("department") {
      Some(Value::String(s)) if !s.is_empty() => Some(Some(s.clone())),
      Some(Value::String(_)) | Some(Value::Null) => Some(None),
      _ => None,
    };

    Self { status, department }
  }
}

// ---------------------------------------------------------------------------
// Read-side types
// ---------------------------------------------------------------------------

/// List filters; all set filters must match (logical AND).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncidentFilter {
  pub category: Option<String>,
  pub status: Option<String>,
  /// Exclude resolved incidents.
  pub active: bool,
  pub reported_by_device_id: Option<String>,
}

/// Per-category incident counts for one calendar month (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCounts {
  pub month: u32,
  pub year: i32,
  pub counts: BTreeMap<String, u64>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn location_requires_both_coordinates() {
    assert_eq!(
      Location::parse(Some("12.9"), Some("77.6")),
      Some(Location { lat: 12.9, lng: 77.6 })
    );
    assert_eq!(Location::parse(Some("12.9"), None), None);
    assert_eq!(Location::parse(Some(""), Some("77.6")), None);
    assert_eq!(Location::parse(Some("north"), Some("77.6")), None);
    assert_eq!(Location::parse(Some("NaN"), Some("77.6")), None);
  }

  #[test]
  fn patch_distinguishes_absent_and_cleared_department() {
    let p = IncidentPatch::from_json_lenient(br#"{"status":"In Progress"}"#);
    assert_eq!(p.status.as_deref(), Some("In Progress"));
    assert_eq!(p.department, None);

    let p = IncidentPatch::from_json_lenient(br#"{"department":""}"#);
    assert_eq!(p.department, Some(None));

    let p = IncidentPatch::from_json_lenient(br#"{"department":null}"#);
    assert_eq!(p.department, Some(None));

    let p = IncidentPatch::from_json_lenient(br#"{"department":"Municipal","extra":1}"#);
    assert_eq!(p.department, Some(Some("Municipal".into())));
  }

  #[test]
  fn malformed_patch_body_is_empty_patch() {
    assert_eq!(IncidentPatch::from_json_lenient(b"not json"), IncidentPatch::default());
    assert_eq!(IncidentPatch::from_json_lenient(b"[1,2]"), IncidentPatch::default());
    assert_eq!(IncidentPatch::from_json_lenient(b""), IncidentPatch::default());
  }

  #[test]
  fn mistyped_field_does_not_discard_the_others() {
    let p = IncidentPatch::from_json_lenient(br#"{"status":"Resolved","department":5}"#);
    assert_eq!(p.status.as_deref(), Some("Resolved"));
    assert_eq!(p.department, None);

    let p = IncidentPatch::from_json_lenient(br#"{"status":["x"],"department":"Police"}"#);
    assert_eq!(p.status, None);
    assert_eq!(p.department, Some(Some("Police".into())));
  }

  #[test]
  fn incident_serializes_camel_case_with_nulls() {
    let inc = Incident {
      id: "abc".into(),
      title: "t".into(),
      description: "d".into(),
      category: "Fire".into(),
      department: None,
      location: None,
      image_url: None,
      status: STATUS_REPORTED.into(),
      created_at: "2025-01-15T10:30:00.000000Z".into(),
      updated_at: "2025-01-15T10:30:00.000000Z".into(),
      reported_by_device_id: Some("dev-1".into()),
    };
    let v = serde_json::to_value(&inc).unwrap();
    assert_eq!(v["imageUrl"], serde_json::Value::Null);
    assert_eq!(v["reportedByDeviceId"], "dev-1");
    assert_eq!(v["createdAt"], "2025-01-15T10:30:00.000000Z");
  }
}
