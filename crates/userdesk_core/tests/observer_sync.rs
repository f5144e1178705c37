use std::cell::{Cell, RefCell};
use std::rc::Rc;

use userdesk_core::db::open_db_in_memory;
use userdesk_core::{
    RemoteSource, SqliteOverrideRepository, TransportError, UserDraft, UserId, UserRecord,
    UserStore,
};

struct StubRemote {
    records: Vec<UserRecord>,
    fail: Cell<bool>,
}

impl StubRemote {
    fn new(records: Vec<UserRecord>) -> Rc<Self> {
        Rc::new(Self {
            records,
            fail: Cell::new(false),
        })
    }
}

impl RemoteSource for StubRemote {
    fn fetch_all(&self) -> Result<Vec<UserRecord>, TransportError> {
        if self.fail.get() {
            return Err(TransportError::Network("connection refused".to_string()));
        }
        Ok(self.records.clone())
    }

    fn fetch_user(&self, id: UserId) -> Result<Option<UserRecord>, TransportError> {
        Ok(self.records.iter().find(|record| record.id == id).cloned())
    }
}

fn remote_record(id: UserId, name: &str) -> UserRecord {
    UserDraft {
        name: name.to_string(),
        ..UserDraft::default()
    }
    .into_record(id)
}

fn draft(name: &str) -> UserDraft {
    UserDraft {
        name: name.to_string(),
        ..UserDraft::default()
    }
}

type ViewLog = Rc<RefCell<Vec<Vec<String>>>>;

fn capture_names(log: &ViewLog) -> impl FnMut(&[UserRecord]) + 'static {
    let log = Rc::clone(log);
    move |records| {
        log.borrow_mut()
            .push(records.iter().map(|r| r.name.clone()).collect());
    }
}

#[test]
fn every_load_and_mutation_publishes_to_all_observers() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteOverrideRepository::try_new(&conn).unwrap();
    let remote = StubRemote::new(vec![remote_record(1, "Ann")]);
    let mut store = UserStore::new(remote, repo);

    let list_view: ViewLog = Rc::new(RefCell::new(Vec::new()));
    let detail_view: ViewLog = Rc::new(RefCell::new(Vec::new()));
    store.subscribe(capture_names(&list_view));
    store.subscribe(capture_names(&detail_view));

    store.load().unwrap();
    store.create(draft("Bo")).unwrap();
    store.update(1, draft("Anna")).unwrap();
    store.delete(2).unwrap();

    let expected = vec![
        vec!["Ann".to_string()],
        vec!["Ann".to_string(), "Bo".to_string()],
        vec!["Anna".to_string(), "Bo".to_string()],
        vec!["Anna".to_string()],
    ];
    assert_eq!(*list_view.borrow(), expected);
    // Both rendered views converge on the same state after every publish.
    assert_eq!(*list_view.borrow(), *detail_view.borrow());
}

#[test]
fn unsubscribed_observer_stops_receiving_views() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteOverrideRepository::try_new(&conn).unwrap();
    let mut store = UserStore::new(StubRemote::new(vec![]), repo);

    let log: ViewLog = Rc::new(RefCell::new(Vec::new()));
    let id = store.subscribe(capture_names(&log));

    store.create(draft("Ann")).unwrap();
    assert_eq!(log.borrow().len(), 1);

    assert!(store.unsubscribe(id));
    assert!(!store.unsubscribe(id));

    store.create(draft("Bo")).unwrap();
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn failed_load_publishes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteOverrideRepository::try_new(&conn).unwrap();
    let remote = StubRemote::new(vec![remote_record(1, "Ann")]);
    let mut store = UserStore::new(Rc::clone(&remote), repo);

    let log: ViewLog = Rc::new(RefCell::new(Vec::new()));
    store.subscribe(capture_names(&log));

    store.load().unwrap();
    assert_eq!(log.borrow().len(), 1);

    remote.fail.set(true);
    store.load().unwrap_err();
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn failed_mutation_publishes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteOverrideRepository::try_new(&conn).unwrap();
    let mut store = UserStore::new(StubRemote::new(vec![]), repo);

    let log: ViewLog = Rc::new(RefCell::new(Vec::new()));
    store.subscribe(capture_names(&log));

    store.update(42, draft("Nobody")).unwrap_err();
    store.delete(42).unwrap_err();
    assert!(log.borrow().is_empty());
}
