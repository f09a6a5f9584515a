//! Normalize raw submitted form values into a canonical `NewIncident`.

use crate::types::{Location, NewIncident};

/// Raw text fields of a citizen submission, as received from a form.
/// Every field is optional; blanks are treated like missing values.
#[derive(Debug, Clone, Default)]
pub struct RawSubmission {
  pub title: Option<String>,
  pub description: Option<String>,
  pub category: Option<String>,
  pub department: Option<String>,
  pub lat: Option<String>,
  pub lng: Option<String>,
  pub reported_by_device_id: Option<String>,
}

impl RawSubmission {
  /// Assign a form field by its wire name. Unknown names are ignored.
  pub fn set(&mut self, name: &str, value: String) {
    let slot = match name {
      "title" => &mut self.title,
      "description" => &mut self.description,
      "category" => &mut self.category,
      "department" => &mut self.department,
      "lat" => &mut self.lat,
      "lng" => &mut self.lng,
      "reportedByDeviceId" => &mut self.reported_by_device_id,
      _ => return,
    };
    *slot = Some(value);
  }
}

/// Turn a raw submission (plus an already-stored image URL) into a `NewIncident`.
///
/// Coordinates that do not parse are dropped rather than rejected.
pub fn normalize(raw: &RawSubmission, image_url: Option<String>) -> NewIncident {
  NewIncident {
    title: raw.title.as_deref().unwrap_or_default().trim().to_string(),
    description: raw.description.as_deref().unwrap_or_default().trim().to_string(),
    category: non_blank(&raw.category),
    department: non_blank(&raw.department),
    location: Location::parse(raw.lat.as_deref(), raw.lng.as_deref()),
    image_url,
    reported_by_device_id: non_blank(&raw.reported_by_device_id),
  }
}

fn non_blank(v: &Option<String>) -> Option<String> {
  v.as_deref()
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_string)
}
