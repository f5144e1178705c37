//! Reconciliation store: the session-authoritative merged record view.
//!
//! # Responsibility
//! - Merge the remote snapshot with the persisted override set.
//! - Write create/update/delete mutations through to the override set.
//! - Publish the recomputed merged view to subscribed observers.
//!
//! # Invariants
//! - The merged view is recomputed from scratch after every load and every
//!   mutation; it is never patched in place.
//! - The override set holds at most one entry per identifier.
//! - A failed remote fetch leaves the previously published view untouched.
//! - Mutations persist before observers are notified, so a subsequent
//!   reload always observes the latest override state.

use crate::model::user::{OverrideEntry, UserDraft, UserId, UserRecord};
use crate::remote::{RemoteSource, TransportError};
use crate::repo::override_repo::{OverrideRepository, RepoError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure raised by store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Remote fetch failed; the caller owns any retry affordance.
    Transport(TransportError),
    /// Override persistence failed.
    Persistence(RepoError),
    /// The referenced identifier is absent from the merged view.
    NotFound(UserId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "user not found: {id}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::Persistence(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<TransportError> for StoreError {
    fn from(value: TransportError) -> Self {
        Self::Transport(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Persistence(value)
    }
}

/// Subscription handle returned by [`UserStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverId(u64);

struct Observer {
    id: ObserverId,
    callback: Box<dyn FnMut(&[UserRecord])>,
}

/// Session-authoritative store over remote records and local overrides.
///
/// Single-threaded by design: mutations complete (persist + notify) before
/// returning to the caller. A superseding `load` simply races an in-flight
/// one from another call site; the last to resolve determines the published
/// view.
pub struct UserStore<R: RemoteSource, P: OverrideRepository> {
    remote: R,
    repo: P,
    remote_snapshot: Vec<UserRecord>,
    overrides: Vec<OverrideEntry>,
    merged: Vec<UserRecord>,
    observers: Vec<Observer>,
    next_observer_id: u64,
}

impl<R: RemoteSource, P: OverrideRepository> UserStore<R, P> {
    /// Creates a store with an empty published view.
    ///
    /// Nothing is fetched or read until the first [`load`](Self::load) or
    /// mutation.
    pub fn new(remote: R, repo: P) -> Self {
        Self {
            remote,
            repo,
            remote_snapshot: Vec::new(),
            overrides: Vec::new(),
            merged: Vec::new(),
            observers: Vec::new(),
            next_observer_id: 0,
        }
    }

    /// Fetches the remote snapshot, reads the override set, recomputes the
    /// merged view and publishes it.
    ///
    /// # Errors
    /// - `Transport` when the remote fetch fails; the previously published
    ///   view stays untouched so the UI can show an error with retry.
    /// - `Persistence` when the override set cannot be read.
    pub fn load(&mut self) -> StoreResult<&[UserRecord]> {
        let remote = self.remote.fetch_all()?;
        let overrides = self.repo.load_overrides()?;

        self.remote_snapshot = remote;
        self.overrides = overrides;
        self.recompute_and_publish();

        info!(
            "event=store_load module=service status=ok remote={} overrides={} merged={}",
            self.remote_snapshot.len(),
            self.overrides.len(),
            self.merged.len()
        );
        Ok(&self.merged)
    }

    /// Creates a local record from `draft` and returns its new identifier.
    ///
    /// The identifier is `max(merged ids) + 1`, floor 1 when the view is
    /// empty. A blank company name defaults to the placeholder affiliation.
    pub fn create(&mut self, draft: UserDraft) -> StoreResult<UserId> {
        let mut overrides = self.repo.load_overrides()?;
        // The identifier is derived from the view the freshly read override
        // state produces, so a session that never loaded cannot clobber a
        // previously persisted creation.
        let id = next_id(&merge(&self.remote_snapshot, &overrides));
        let record = draft.or_default_company().into_record(id);

        // A tombstone can already hold this id when the highest record was
        // deleted; the new live entry replaces it.
        upsert(&mut overrides, OverrideEntry::live(record));
        self.commit(overrides)?;

        info!("event=store_create module=service status=ok id={id}");
        Ok(id)
    }

    /// Replaces the record for `id` with `draft`, whole-record.
    ///
    /// # Errors
    /// - `NotFound` when `id` is absent from the merged view.
    pub fn update(&mut self, id: UserId, draft: UserDraft) -> StoreResult<()> {
        if self.get(id).is_none() {
            return Err(StoreError::NotFound(id));
        }

        let mut overrides = self.repo.load_overrides()?;
        upsert(&mut overrides, OverrideEntry::live(draft.into_record(id)));
        self.commit(overrides)?;

        info!("event=store_update module=service status=ok id={id}");
        Ok(())
    }

    /// Removes the record for `id` from the merged view and override set.
    ///
    /// Records present in the current remote snapshot leave a persisted
    /// tombstone so a later reload cannot resurrect them; purely local
    /// records are removed outright.
    ///
    /// Callers are expected to gate this behind their own confirmation
    /// step; the store performs none.
    ///
    /// # Errors
    /// - `NotFound` when `id` is absent from the merged view.
    pub fn delete(&mut self, id: UserId) -> StoreResult<()> {
        let Some(current) = self.get(id).cloned() else {
            return Err(StoreError::NotFound(id));
        };

        let remote_origin = self.remote_snapshot.iter().any(|record| record.id == id);
        let mut overrides = self.repo.load_overrides()?;
        if remote_origin {
            upsert(&mut overrides, OverrideEntry::tombstone(current));
        } else {
            overrides.retain(|entry| entry.id() != id);
        }
        self.commit(overrides)?;

        info!(
            "event=store_delete module=service status=ok id={id} mode={}",
            if remote_origin { "tombstone" } else { "local" }
        );
        Ok(())
    }

    /// Registers an observer receiving every newly published merged view.
    ///
    /// Observers are invoked synchronously after each completed load and
    /// each mutation; the notification path performs no I/O and cannot
    /// fail. Subscribing does not replay the current view; use
    /// [`records`](Self::records) for the initial render.
    pub fn subscribe(&mut self, callback: impl FnMut(&[UserRecord]) + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer_id);
        self.next_observer_id += 1;
        self.observers.push(Observer {
            id,
            callback: Box::new(callback),
        });
        id
    }

    /// Removes an observer. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|observer| observer.id != id);
        self.observers.len() != before
    }

    /// Currently published merged view.
    pub fn records(&self) -> &[UserRecord] {
        &self.merged
    }

    /// Looks up `id` in the currently published merged view.
    pub fn get(&self, id: UserId) -> Option<&UserRecord> {
        self.merged.iter().find(|record| record.id == id)
    }

    /// Resolves a single record with local-wins precedence.
    ///
    /// A live override answers without any network call; a tombstone reads
    /// as absent; anything else falls through to the remote single-record
    /// endpoint. Backs detail views that deep-link to an id before any list
    /// load has happened.
    pub fn get_or_fetch(&self, id: UserId) -> StoreResult<Option<UserRecord>> {
        let overrides = self.repo.load_overrides()?;
        if let Some(entry) = overrides.iter().find(|entry| entry.id() == id) {
            if entry.is_deleted {
                return Ok(None);
            }
            return Ok(Some(entry.record.clone()));
        }

        Ok(self.remote.fetch_user(id)?)
    }

    fn commit(&mut self, overrides: Vec<OverrideEntry>) -> StoreResult<()> {
        self.repo.save_overrides(&overrides)?;
        self.overrides = overrides;
        self.recompute_and_publish();
        Ok(())
    }

    fn recompute_and_publish(&mut self) {
        self.merged = merge(&self.remote_snapshot, &self.overrides);
        for observer in &mut self.observers {
            (observer.callback)(&self.merged);
        }
    }
}

/// Derives the merged view from a remote snapshot and override set.
///
/// Remote records come first in fetched order, with live override entries
/// replacing them in place and tombstoned identifiers skipped; override-only
/// records follow in override-set order. The result carries no duplicate
/// identifiers as long as the override set holds one entry per id.
fn merge(remote: &[UserRecord], overrides: &[OverrideEntry]) -> Vec<UserRecord> {
    let mut merged = Vec::with_capacity(remote.len() + overrides.len());

    for record in remote {
        match overrides.iter().find(|entry| entry.id() == record.id) {
            Some(entry) if entry.is_deleted => {}
            Some(entry) => merged.push(entry.record.clone()),
            None => merged.push(record.clone()),
        }
    }

    for entry in overrides {
        if entry.is_deleted {
            continue;
        }
        if remote.iter().any(|record| record.id == entry.id()) {
            continue;
        }
        merged.push(entry.record.clone());
    }

    merged
}

/// Next identifier under the max-plus-one rule, floor of 1.
///
/// Saturates at the identifier ceiling rather than wrapping. Not
/// collision-safe across multiple concurrent sessions; acceptable in this
/// single-session model.
fn next_id(merged: &[UserRecord]) -> UserId {
    merged
        .iter()
        .map(|record| record.id)
        .max()
        .map_or(1, |max| max.saturating_add(1))
}

fn upsert(overrides: &mut Vec<OverrideEntry>, entry: OverrideEntry) {
    match overrides.iter_mut().find(|existing| existing.id() == entry.id()) {
        Some(existing) => *existing = entry,
        None => overrides.push(entry),
    }
}
