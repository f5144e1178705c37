//! Remote source adapter contracts and HTTP implementation.
//!
//! # Responsibility
//! - Define the read-only contract for fetching the canonical record set.
//! - Keep HTTP transport details out of the reconciliation service.
//!
//! # Invariants
//! - Fetch failures surface to the caller; no retries happen here.
//! - The adapter has no side effects beyond the network call.

mod http;

pub use http::HttpRemoteSource;

use crate::model::user::{UserId, UserRecord};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Remote fetch failure.
#[derive(Debug)]
pub enum TransportError {
    /// The endpoint answered with a non-success status.
    Status(u16),
    /// The network call failed outright (DNS, connect, timeout).
    Network(String),
    /// The response body was not a valid record payload.
    Decode(String),
}

impl Display for TransportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status(status) => write!(f, "remote endpoint returned status {status}"),
            Self::Network(message) => write!(f, "remote request failed: {message}"),
            Self::Decode(message) => write!(f, "remote payload is invalid: {message}"),
        }
    }
}

impl Error for TransportError {}

/// Read-only source of the canonical record set.
///
/// Implementations fetch an ordered record sequence or fail with a
/// [`TransportError`]; retry affordances are the caller's concern.
pub trait RemoteSource {
    /// Fetches the full canonical record list in endpoint order.
    fn fetch_all(&self) -> Result<Vec<UserRecord>, TransportError>;

    /// Fetches a single record by id. `Ok(None)` when the endpoint has no
    /// record with that id.
    fn fetch_user(&self, id: UserId) -> Result<Option<UserRecord>, TransportError>;
}

/// Shared handles delegate, so one source can back several stores or views
/// in the single-threaded session model.
impl<T: RemoteSource + ?Sized> RemoteSource for Rc<T> {
    fn fetch_all(&self) -> Result<Vec<UserRecord>, TransportError> {
        (**self).fetch_all()
    }

    fn fetch_user(&self, id: UserId) -> Result<Option<UserRecord>, TransportError> {
        (**self).fetch_user(id)
    }
}
