use std::fmt::Formatter;

use serde::de::{Deserialize, Deserializer, Visitor};

/// How tables are emptied.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum PurgeMode {
    /// `DELETE IGNORE` every row, skipping rows a constraint protects
    Delete = 1,
    /// Platform truncate, cascading where supported
    #[default]
    Truncate = 2,
}

impl PurgeMode {
    /// Numeric code of the mode.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Mode for a numeric code. Anything but the delete code means truncate.
    pub fn from_code(code: i64) -> Self {
        if code == Self::Delete as i64 {
            Self::Delete
        } else {
            Self::Truncate
        }
    }

    /// Mode for a name. Anything but `delete` means truncate.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        if name.eq_ignore_ascii_case("delete") {
            Self::Delete
        } else if let Ok(code) = name.parse() {
            Self::from_code(code)
        } else {
            Self::Truncate
        }
    }
}

struct PurgeModeVisitor;

impl<'de> Visitor<'de> for PurgeModeVisitor {
    type Value = PurgeMode;

    fn expecting(&self, f: &mut Formatter) -> std::fmt::Result {
        f.write_str("a purge mode name or code")
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(PurgeMode::from_name(v))
    }

    fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(PurgeMode::from_code(v))
    }

    fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(i64::try_from(v).map_or(PurgeMode::Truncate, PurgeMode::from_code))
    }
}

impl<'de> Deserialize<'de> for PurgeMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PurgeModeVisitor)
    }
}
