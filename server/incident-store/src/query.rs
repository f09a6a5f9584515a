//! Read-side shaping: filter a snapshot and sort it newest first.

use crate::types::{Incident, IncidentFilter};

impl IncidentFilter {
  pub fn matches(&self, incident: &Incident) -> bool {
    if let Some(category) = &self.category {
      if incident.category != *category {
        return false;
      }
    }
    if let Some(status) = &self.status {
      if incident.status != *status {
        return false;
      }
    }
    if self.active && !incident.is_active() {
      return false;
    }
    if let Some(device) = &self.reported_by_device_id {
      if incident.reported_by_device_id.as_deref() != Some(device.as_str()) {
        return false;
      }
    }
    true
  }
}

/// Apply `filter` and sort by `createdAt` descending.
///
/// Timestamps are fixed-width ISO-8601, so string order is chronological.
/// `sort_by` is stable: equal timestamps keep their collection order.
pub fn filter_and_sort(reports: &[Incident], filter: &IncidentFilter) -> Vec<Incident> {
  let mut out: Vec<Incident> = reports.iter().filter(|r| filter.matches(r)).cloned().collect();
  out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
  out
}
