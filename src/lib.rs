//! prayer-time offsets for horison, persisted in a key-value store
//!
//! ```
//! use prayer::{MemoryStorage, PrayerConfigStore};
//!
//! let mut store = PrayerConfigStore::initialize(MemoryStorage::new());
//! store.change(vec![("dzuhur", 10)]).unwrap();
//! assert_eq!(store.offsets().dzuhur, 10);
//! ```

mod config;
mod error;
mod field;
mod storage;
mod store;

pub use config::{OffsetUpdate, PrayerOffsets};
pub use error::{Error, Result};
pub use field::{OffsetField, UnknownField};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{load, persist, PrayerConfigStore, STORAGE_KEY};
