use std::{fmt, str::FromStr};

use thiserror::Error;

/// one of the eight named offsets every prayer config carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OffsetField {
    AltSubuh,
    AltIsya,
    Subuh,
    Dzuhur,
    Ashar,
    Maghrib,
    Isya,
    Terbit,
}

impl OffsetField {
    /// every known field in the order it is stored and displayed
    pub const ALL: [OffsetField; 8] = [
        OffsetField::AltSubuh,
        OffsetField::AltIsya,
        OffsetField::Subuh,
        OffsetField::Dzuhur,
        OffsetField::Ashar,
        OffsetField::Maghrib,
        OffsetField::Isya,
        OffsetField::Terbit,
    ];

    /// key used for this field in the persisted record
    pub fn name(self) -> &'static str {
        match self {
            OffsetField::AltSubuh => "alt_subuh",
            OffsetField::AltIsya => "alt_isya",
            OffsetField::Subuh => "subuh",
            OffsetField::Dzuhur => "dzuhur",
            OffsetField::Ashar => "ashar",
            OffsetField::Maghrib => "maghrib",
            OffsetField::Isya => "isya",
            OffsetField::Terbit => "terbit",
        }
    }

    /// value used when nothing has been persisted for this field.
    /// the `alt_` fields are sun angles in degrees, the rest are minutes
    pub fn default_value(self) -> i64 {
        match self {
            OffsetField::AltSubuh => -20,
            OffsetField::AltIsya => -18,
            OffsetField::Terbit => -2,
            OffsetField::Subuh
            | OffsetField::Dzuhur
            | OffsetField::Ashar
            | OffsetField::Maghrib
            | OffsetField::Isya => 2,
        }
    }
}

impl fmt::Display for OffsetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown offset field `{0}`")]
pub struct UnknownField(pub String);

impl FromStr for OffsetField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OffsetField::ALL
            .iter()
            .copied()
            .find(|field| field.name() == s)
            .ok_or_else(|| UnknownField(s.to_owned()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_match_published_values() {
        let defaults: Vec<(&str, i64)> = OffsetField::ALL
            .iter()
            .map(|f| (f.name(), f.default_value()))
            .collect();
        assert_eq!(
            defaults,
            vec![
                ("alt_subuh", -20),
                ("alt_isya", -18),
                ("subuh", 2),
                ("dzuhur", 2),
                ("ashar", 2),
                ("maghrib", 2),
                ("isya", 2),
                ("terbit", -2),
            ]
        );
    }

    #[test]
    fn parse_known_names() {
        assert_eq!("maghrib".parse::<OffsetField>(), Ok(OffsetField::Maghrib));
        assert_eq!("alt_isya".parse::<OffsetField>(), Ok(OffsetField::AltIsya));
        for field in OffsetField::ALL.iter() {
            assert_eq!(field.name().parse::<OffsetField>(), Ok(*field));
        }
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert_eq!(
            "Subuh".parse::<OffsetField>(),
            Err(UnknownField("Subuh".to_owned()))
        );
        assert!("".parse::<OffsetField>().is_err());
    }

    #[test]
    fn display_uses_record_name() {
        assert_eq!(OffsetField::AltSubuh.to_string(), "alt_subuh");
        assert_eq!(
            UnknownField("foo".to_owned()).to_string(),
            "unknown offset field `foo`"
        );
    }
}
