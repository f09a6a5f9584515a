//! Request/response types for the incident API.

use incident_store::{Incident, IncidentFilter};
use serde::{Deserialize, Serialize};

/// Query string of `GET /api/incidents`. Empty values count as unset.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub category: Option<String>,
  pub status: Option<String>,
  pub active: Option<String>,
  #[serde(rename = "reportedByDeviceId")]
  pub reported_by_device_id: Option<String>,
}

impl ListParams {
  pub fn into_filter(self) -> IncidentFilter {
    IncidentFilter {
      category: non_empty(self.category),
      status: non_empty(self.status),
      active: matches!(self.active.as_deref(), Some("1") | Some("true")),
      reported_by_device_id: non_empty(self.reported_by_device_id),
    }
  }
}

fn non_empty(v: Option<String>) -> Option<String> {
  v.filter(|s| !s.is_empty())
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
  pub reports: Vec<Incident>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
  pub deleted: usize,
}
