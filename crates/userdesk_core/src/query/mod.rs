//! Search and filter projections over the merged view.
//!
//! # Responsibility
//! - Provide the list-page filter semantics: name substring match and
//!   exact company match.
//! - Derive the distinct company list for filter dropdowns.
//!
//! # Invariants
//! - Projections are pure; they never touch persistence or the network.
//! - Filtering preserves merged-view order.

use crate::model::user::UserRecord;

/// Filter options applied to a merged record list.
///
/// `None` fields match everything, so the default filter is a no-op.
#[derive(Debug, Clone, Default)]
pub struct DirectoryFilter {
    /// Case-insensitive substring match against the display name.
    pub name_contains: Option<String>,
    /// Exact match against the company name.
    pub company: Option<String>,
}

impl DirectoryFilter {
    fn matches(&self, record: &UserRecord) -> bool {
        if let Some(needle) = &self.name_contains {
            if !record
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        if let Some(company) = &self.company {
            if record.company.name != *company {
                return false;
            }
        }
        true
    }
}

/// Applies `filter` to `records`, preserving order.
pub fn filter_records(records: &[UserRecord], filter: &DirectoryFilter) -> Vec<UserRecord> {
    records
        .iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect()
}

/// Distinct non-blank company names in first-seen order.
pub fn company_names(records: &[UserRecord]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for record in records {
        let name = record.company.name.trim();
        if name.is_empty() {
            continue;
        }
        if !names.iter().any(|existing| existing == &record.company.name) {
            names.push(record.company.name.clone());
        }
    }
    names
}
