//! Monthly aggregation: incident counts per category for the current UTC month.

use chrono::{DateTime, Datelike, Utc};
use std::collections::BTreeMap;

use crate::date::parse_timestamp;
use crate::types::{Incident, MonthlyCounts, CATEGORY_OTHER, KNOWN_CATEGORIES};

/// Count incidents created in the same (month, year) as `now`.
///
/// - Every known category is present, zero if unseen.
/// - Categories outside the known set are added as they appear.
/// - Empty category counts as "Other".
/// - Records whose `createdAt` does not parse are skipped.
pub fn monthly_counts(reports: &[Incident], now: DateTime<Utc>) -> MonthlyCounts {
  let (month, year) = (now.month(), now.year());

  let mut counts: BTreeMap<String, u64> =
    KNOWN_CATEGORIES.iter().map(|c| (c.to_string(), 0)).collect();

  for r in reports {
    let Some(created) = parse_timestamp(&r.created_at) else {
      tracing::debug!(id = %r.id, created_at = %r.created_at, "skipping unparseable createdAt");
      continue;
    };
    if created.month() != month || created.year() != year {
      continue;
    }
    let category = if r.category.is_empty() { CATEGORY_OTHER } else { r.category.as_str() };
    *counts.entry(category.to_string()).or_insert(0) += 1;
  }

  MonthlyCounts { month, year, counts }
}
