use std::sync::Mutex;

use once_cell::sync::Lazy;
use tally_core::store::JsonStore;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated JSON store backed by a unique directory.
pub fn setup_json_store() -> JsonStore {
    let temp = TempDir::new().expect("create temp dir");
    let store = JsonStore::new(temp.path().join("data")).expect("create json store");
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    store
}
