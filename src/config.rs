use std::{collections::BTreeMap, fmt};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::field::OffsetField;

/// partial update as handed to [`PrayerOffsets::apply`]
pub type OffsetUpdate = BTreeMap<String, i64>;

/// offsets applied on top of the calculated prayer times.
///
/// serializes to a flat json object: the eight known fields first, followed by
/// any extra entries that were found in storage or added by an update
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PrayerOffsets {
    pub alt_subuh: i64,
    pub alt_isya: i64,
    pub subuh: i64,
    pub dzuhur: i64,
    pub ashar: i64,
    pub maghrib: i64,
    pub isya: i64,
    pub terbit: i64,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

impl ::std::default::Default for PrayerOffsets {
    fn default() -> Self {
        Self {
            alt_subuh: OffsetField::AltSubuh.default_value(),
            alt_isya: OffsetField::AltIsya.default_value(),
            subuh: OffsetField::Subuh.default_value(),
            dzuhur: OffsetField::Dzuhur.default_value(),
            ashar: OffsetField::Ashar.default_value(),
            maghrib: OffsetField::Maghrib.default_value(),
            isya: OffsetField::Isya.default_value(),
            terbit: OffsetField::Terbit.default_value(),
            extra: BTreeMap::new(),
        }
    }
}

impl PrayerOffsets {
    /// defaults overlaid with a record read back from storage.
    ///
    /// known fields holding something other than an integer keep their default,
    /// unknown fields are kept verbatim whatever their type
    pub fn overlaid(record: &Map<String, Value>) -> Self {
        let mut offsets = Self::default();
        for (key, value) in record {
            match key.parse::<OffsetField>() {
                Ok(field) => match value.as_i64() {
                    Some(v) => offsets.set(field, v),
                    None => warn!("ignoring non-integer value {} for `{}`", value, key),
                },
                Err(_) => {
                    offsets.extra.insert(key.clone(), value.clone());
                }
            }
        }
        offsets
    }

    pub fn field(&self, field: OffsetField) -> i64 {
        *self.slot(field)
    }

    pub fn set(&mut self, field: OffsetField, value: i64) {
        *self.slot_mut(field) = value;
    }

    /// look up any entry by its record name, known or extra.
    /// extras that are not integers read as `None`
    pub fn get(&self, name: &str) -> Option<i64> {
        match name.parse::<OffsetField>() {
            Ok(field) => Some(self.field(field)),
            Err(_) => self.extra.get(name).and_then(Value::as_i64),
        }
    }

    /// entries that are not one of the eight known fields
    pub fn extras(&self) -> &BTreeMap<String, Value> {
        &self.extra
    }

    /// known fields in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (OffsetField, i64)> + '_ {
        OffsetField::ALL.iter().map(move |&f| (f, self.field(f)))
    }

    /// merge `update` into these offsets in place. existing entries are
    /// overwritten, names that are not known fields become extras
    pub fn apply<I, K>(&mut self, update: I)
    where
        I: IntoIterator<Item = (K, i64)>,
        K: AsRef<str>,
    {
        for (key, value) in update {
            let key = key.as_ref();
            match key.parse::<OffsetField>() {
                Ok(field) => self.set(field, value),
                Err(_) => {
                    self.extra.insert(key.to_owned(), Value::from(value));
                }
            }
        }
    }

    /// same as [`apply`](Self::apply) but leaves `self` untouched
    pub fn merged<I, K>(&self, update: I) -> Self
    where
        I: IntoIterator<Item = (K, i64)>,
        K: AsRef<str>,
    {
        let mut merged = self.clone();
        merged.apply(update);
        merged
    }

    /// json text stored under the prayer key
    pub fn to_record(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    fn slot(&self, field: OffsetField) -> &i64 {
        match field {
            OffsetField::AltSubuh => &self.alt_subuh,
            OffsetField::AltIsya => &self.alt_isya,
            OffsetField::Subuh => &self.subuh,
            OffsetField::Dzuhur => &self.dzuhur,
            OffsetField::Ashar => &self.ashar,
            OffsetField::Maghrib => &self.maghrib,
            OffsetField::Isya => &self.isya,
            OffsetField::Terbit => &self.terbit,
        }
    }

    fn slot_mut(&mut self, field: OffsetField) -> &mut i64 {
        match field {
            OffsetField::AltSubuh => &mut self.alt_subuh,
            OffsetField::AltIsya => &mut self.alt_isya,
            OffsetField::Subuh => &mut self.subuh,
            OffsetField::Dzuhur => &mut self.dzuhur,
            OffsetField::Ashar => &mut self.ashar,
            OffsetField::Maghrib => &mut self.maghrib,
            OffsetField::Isya => &mut self.isya,
            OffsetField::Terbit => &mut self.terbit,
        }
    }
}

impl fmt::Display for PrayerOffsets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (field, value) in self.iter() {
            writeln!(f, "{} = {}", field, value)?;
        }
        for (key, value) in &self.extra {
            writeln!(f, "{} = {}", key, value)?;
        }
        Ok(())
    }
}
