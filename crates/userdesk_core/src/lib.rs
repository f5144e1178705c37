//! Core domain logic for the userdesk directory.
//! This crate is the single source of truth for business invariants:
//! remote records merged with locally persisted overrides, local wins.

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod remote;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::user::{
    Address, Company, OverrideEntry, UserDraft, UserId, UserRecord, ValidationError,
    DEFAULT_COMPANY_NAME,
};
pub use query::{company_names, filter_records, DirectoryFilter};
pub use remote::{HttpRemoteSource, RemoteSource, TransportError};
pub use repo::override_repo::{
    OverrideRepository, RepoError, RepoResult, SqliteOverrideRepository,
};
pub use service::user_store::{ObserverId, StoreError, StoreResult, UserStore};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
