use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{
    config::PrayerOffsets,
    error::Result,
    storage::KeyValueStorage,
};

/// storage key the whole offset record lives under
pub const STORAGE_KEY: &str = "horison/prayer";

/// prayer offsets together with the storage they are persisted to.
///
/// built once at startup by [`initialize`](Self::initialize) and then handed
/// around by reference. every [`change`](Self::change) writes the full record
/// back, last writer wins
#[derive(Debug)]
pub struct PrayerConfigStore<S> {
    storage: S,
    offsets: PrayerOffsets,
}

impl<S: KeyValueStorage> PrayerConfigStore<S> {
    /// load offsets from `storage`, falling back to the defaults when nothing
    /// usable is stored. never fails
    pub fn initialize(storage: S) -> Self {
        let offsets = load(&storage);
        Self { storage, offsets }
    }

    pub fn offsets(&self) -> &PrayerOffsets {
        &self.offsets
    }

    /// merge `update` into the current offsets and persist the result.
    ///
    /// the in-memory merge stays applied even when the write fails
    pub fn change<I, K>(&mut self, update: I) -> Result<&PrayerOffsets>
    where
        I: IntoIterator<Item = (K, i64)>,
        K: AsRef<str>,
    {
        self.offsets.apply(update);
        persist(&mut self.storage, &self.offsets)?;
        Ok(&self.offsets)
    }

    /// back to the defaults, extras dropped, and persist
    pub fn reset(&mut self) -> Result<&PrayerOffsets> {
        self.offsets = PrayerOffsets::default();
        persist(&mut self.storage, &self.offsets)?;
        Ok(&self.offsets)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}

/// read the stored record, defaults on anything missing or malformed
pub fn load<S: KeyValueStorage + ?Sized>(storage: &S) -> PrayerOffsets {
    let text = match storage.get(STORAGE_KEY) {
        Ok(Some(text)) => text,
        Ok(None) => {
            debug!("no prayer offsets stored, using defaults");
            return PrayerOffsets::default();
        }
        Err(err) => {
            warn!("could not read prayer offsets: {}", err);
            return PrayerOffsets::default();
        }
    };
    match parse_record(&text) {
        Some(record) => PrayerOffsets::overlaid(&record),
        None => {
            warn!("stored prayer offsets are not a json object, using defaults");
            PrayerOffsets::default()
        }
    }
}

/// write the full record under [`STORAGE_KEY`], replacing what was there
pub fn persist<S: KeyValueStorage + ?Sized>(storage: &mut S, offsets: &PrayerOffsets) -> Result<()> {
    let record = offsets.to_record()?;
    storage.set(STORAGE_KEY, &record)?;
    debug!("persisted prayer offsets");
    Ok(())
}

// `null` counts as an empty record
fn parse_record(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str(text).ok()? {
        Value::Object(map) => Some(map),
        Value::Null => Some(Map::new()),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;
    use crate::{error::Error, storage::MemoryStorage};

    fn storage_with(record: &str) -> MemoryStorage {
        let mut storage = MemoryStorage::new();
        storage.set(STORAGE_KEY, record).unwrap();
        storage
    }

    struct BrokenStorage;

    impl KeyValueStorage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::NoConfigDir)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::NoConfigDir)
        }
    }

    #[test]
    fn absent_record_gives_defaults() {
        let store = PrayerConfigStore::initialize(MemoryStorage::new());
        assert_eq!(store.offsets(), &PrayerOffsets::default());
    }

    #[test]
    fn empty_and_null_records_give_defaults() {
        for record in &["{}", "null"] {
            let store = PrayerConfigStore::initialize(storage_with(record));
            assert_eq!(store.offsets(), &PrayerOffsets::default());
        }
    }

    #[test]
    fn partial_record_overlays_defaults() {
        let store = PrayerConfigStore::initialize(storage_with(r#"{"subuh":5}"#));
        assert_eq!(store.offsets().subuh, 5);
        assert_eq!(store.offsets().dzuhur, 2);
        assert_eq!(store.offsets().alt_subuh, -20);
        assert!(store.offsets().extras().is_empty());
    }

    #[test]
    fn unknown_fields_are_preserved() {
        let store = PrayerConfigStore::initialize(storage_with(r#"{"foo":1}"#));
        assert_eq!(store.offsets().get("foo"), Some(1));
        assert_eq!(store.offsets().terbit, -2);
    }

    #[test]
    fn garbage_gives_defaults() {
        for record in &["not json at all", "[1,2,3]", "42", "\"subuh\"", "{\"subuh\":"] {
            let store = PrayerConfigStore::initialize(storage_with(record));
            assert_eq!(store.offsets(), &PrayerOffsets::default(), "record {:?}", record);
        }
    }

    #[test]
    fn unreadable_storage_gives_defaults() {
        let store = PrayerConfigStore::initialize(BrokenStorage);
        assert_eq!(store.offsets(), &PrayerOffsets::default());
    }

    #[test]
    fn change_survives_new_session() {
        let mut store = PrayerConfigStore::initialize(MemoryStorage::new());
        store.change(vec![("dzuhur", 10)]).unwrap();
        assert_eq!(store.offsets().dzuhur, 10);
        assert_eq!(store.offsets().ashar, 2);

        let reloaded = PrayerConfigStore::initialize(store.into_storage());
        assert_eq!(reloaded.offsets().dzuhur, 10);
        assert_eq!(reloaded.offsets().subuh, 2);
    }

    #[test]
    fn disjoint_changes_merge() {
        let mut storage = MemoryStorage::new();
        {
            let mut store = PrayerConfigStore::initialize(&mut storage);
            store.change(vec![("ashar", 3)]).unwrap();
            store.change(vec![("maghrib", 7)]).unwrap();
        }
        let stored: Value =
            serde_json::from_str(&storage.get(STORAGE_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored["ashar"], json!(3));
        assert_eq!(stored["maghrib"], json!(7));
        assert_eq!(stored["isya"], json!(2));
    }

    #[test]
    fn change_keeps_stored_extras() {
        let mut store = PrayerConfigStore::initialize(storage_with(r#"{"foo":1,"isya":4}"#));
        store.change(vec![("bar", 9)]).unwrap();
        let reloaded = PrayerConfigStore::initialize(store.into_storage());
        assert_eq!(reloaded.offsets().get("foo"), Some(1));
        assert_eq!(reloaded.offsets().get("bar"), Some(9));
        assert_eq!(reloaded.offsets().isya, 4);
    }

    #[test]
    fn failed_write_is_reported_after_merge() {
        let mut store = PrayerConfigStore::initialize(BrokenStorage);
        assert!(store.change(vec![("subuh", 1)]).is_err());
        assert_eq!(store.offsets().subuh, 1);
    }

    #[test]
    fn reset_drops_changes_and_extras() {
        let mut store = PrayerConfigStore::initialize(storage_with(r#"{"foo":1,"isya":4}"#));
        store.reset().unwrap();
        assert_eq!(store.offsets(), &PrayerOffsets::default());
        let reloaded = PrayerConfigStore::initialize(store.into_storage());
        assert_eq!(reloaded.offsets(), &PrayerOffsets::default());
    }

    #[test]
    fn persist_without_store() {
        let mut storage = MemoryStorage::new();
        let offsets = PrayerOffsets::default().merged(vec![("terbit", 0)]);
        persist(&mut storage, &offsets).unwrap();
        assert_eq!(load(&storage), offsets);
    }
}
