//! User record domain model.
//!
//! # Responsibility
//! - Define the canonical record shared by the remote snapshot and overrides.
//! - Provide the id-less draft shape used by create/update callers.
//!
//! # Invariants
//! - `id` is unique within any merged view.
//! - `OverrideEntry::is_deleted` is the source of truth for tombstone state.
//! - Tombstones keep the last-known record payload for audit/restore.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier for every user record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type UserId = u32;

/// Placeholder affiliation applied when a draft's company name is blank.
pub const DEFAULT_COMPANY_NAME: &str = "Unknown Company";

/// Postal address nested inside a user record.
///
/// The remote endpoint carries extra address fields (suite, geo); they are
/// intentionally not modeled and are dropped on deserialize.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub zipcode: String,
}

/// Company affiliation nested inside a user record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
}

/// Canonical user record.
///
/// One shape serves both sources: rows fetched from the remote endpoint and
/// locally persisted override entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Stable positive integer ID, unique within a merged view.
    pub id: UserId,
    /// Display name shown by list/detail views.
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub address: Address,
    pub company: Company,
}

/// Field bundle supplied by create/update callers, without an identifier.
///
/// Mirrors the add/edit form state of the UI layer. The store assigns or
/// reuses the identifier itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub address: Address,
    pub company: Company,
}

/// Required-field violation reported by [`UserDraft::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingField(&'static str),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "required field is empty: {field}"),
        }
    }
}

impl Error for ValidationError {}

impl UserDraft {
    /// Checks required-field presence for form submission gating.
    ///
    /// This is a UI-level gate: store mutations accept drafts as-is and
    /// never call it. Only `name` is required; every other field may be
    /// empty text.
    ///
    /// # Errors
    /// - Returns `ValidationError::MissingField` when `name` is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        Ok(())
    }

    /// Materializes this draft into a record with the given identifier.
    ///
    /// Fields are taken verbatim; update semantics are whole-record replace.
    pub fn into_record(self, id: UserId) -> UserRecord {
        UserRecord {
            id,
            name: self.name,
            username: self.username,
            email: self.email,
            phone: self.phone,
            website: self.website,
            address: self.address,
            company: self.company,
        }
    }

    /// Replaces a blank company name with [`DEFAULT_COMPANY_NAME`].
    ///
    /// Applied by the store on creation only; updates keep fields verbatim.
    pub fn or_default_company(mut self) -> Self {
        if self.company.name.trim().is_empty() {
            self.company.name = DEFAULT_COMPANY_NAME.to_string();
        }
        self
    }
}

impl From<UserRecord> for UserDraft {
    fn from(record: UserRecord) -> Self {
        Self {
            name: record.name,
            username: record.username,
            email: record.email,
            phone: record.phone,
            website: record.website,
            address: record.address,
            company: record.company,
        }
    }
}

/// One persisted override: a local replacement/creation, or a tombstone.
///
/// An entry whose `id` coincides with a remote record replaces it in the
/// merged view; an entry with a fresh `id` is a purely local record; a
/// tombstoned entry removes the id from the merged view and keeps it from
/// being resurrected by later remote fetches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideEntry {
    pub record: UserRecord,
    /// Tombstone flag. Persisted so reloads cannot resurrect deleted rows.
    #[serde(default)]
    pub is_deleted: bool,
}

impl OverrideEntry {
    /// Creates a live (non-tombstone) override for `record`.
    pub fn live(record: UserRecord) -> Self {
        Self {
            record,
            is_deleted: false,
        }
    }

    /// Creates a tombstone preserving the last-known record payload.
    pub fn tombstone(record: UserRecord) -> Self {
        Self {
            record,
            is_deleted: true,
        }
    }

    /// Identifier this entry overrides.
    pub fn id(&self) -> UserId {
        self.record.id
    }
}

#[cfg(test)]
mod tests {
    use super::{OverrideEntry, UserDraft, UserRecord, ValidationError, DEFAULT_COMPANY_NAME};

    fn draft(name: &str, company: &str) -> UserDraft {
        UserDraft {
            name: name.to_string(),
            company: super::Company {
                name: company.to_string(),
            },
            ..UserDraft::default()
        }
    }

    #[test]
    fn validate_requires_name() {
        let err = draft("  ", "Acme").validate().unwrap_err();
        assert_eq!(err, ValidationError::MissingField("name"));
        draft("Ann", "Acme").validate().unwrap();
    }

    #[test]
    fn or_default_company_replaces_blank_name_only() {
        let record = draft("Ann", "   ").or_default_company().into_record(7);
        assert_eq!(record.id, 7);
        assert_eq!(record.company.name, DEFAULT_COMPANY_NAME);

        let kept = draft("Ann", "Acme").or_default_company().into_record(8);
        assert_eq!(kept.company.name, "Acme");
    }

    #[test]
    fn into_record_keeps_fields_verbatim() {
        let record = draft("Ann", "").into_record(3);
        assert_eq!(record.company.name, "");
        assert_eq!(record.name, "Ann");
    }

    #[test]
    fn record_deserialize_ignores_unmodeled_remote_fields() {
        let payload = r#"{
            "id": 1,
            "name": "Leanne Graham",
            "username": "Bret",
            "email": "Sincere@april.biz",
            "phone": "1-770-736-8031",
            "website": "hildegard.org",
            "address": {
                "street": "Kulas Light",
                "suite": "Apt. 556",
                "city": "Gwenborough",
                "zipcode": "92998-3874",
                "geo": { "lat": "-37.3159", "lng": "81.1496" }
            },
            "company": {
                "name": "Romaguera-Crona",
                "catchPhrase": "Multi-layered client-server neural-net",
                "bs": "harness real-time e-markets"
            }
        }"#;

        let record: UserRecord = serde_json::from_str(payload).unwrap();
        assert_eq!(record.id, 1);
        assert_eq!(record.address.city, "Gwenborough");
        assert_eq!(record.company.name, "Romaguera-Crona");
    }

    #[test]
    fn override_entry_tombstone_flag_defaults_to_false() {
        let entry = OverrideEntry::live(draft("Ann", "Acme").into_record(1));
        let json = serde_json::to_string(&entry).unwrap();
        let back: OverrideEntry = serde_json::from_str(&json).unwrap();
        assert!(!back.is_deleted);

        // Legacy payloads without the flag must read as live entries.
        let legacy = r#"{"record":{"id":2,"name":"Bo","username":"","email":"","phone":"","website":"","address":{"street":"","city":"","zipcode":""},"company":{"name":"Acme"}}}"#;
        let entry: OverrideEntry = serde_json::from_str(legacy).unwrap();
        assert!(!entry.is_deleted);
        assert_eq!(entry.id(), 2);
    }
}
