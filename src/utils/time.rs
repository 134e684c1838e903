//! RFC 3339 timestamps for saved transcripts.
//!
//! Use with `#[serde(with = "crate::utils::time")]` on an [`OffsetDateTime`] field.  Timestamps
//! are written in UTC with whole seconds; any offset is accepted when reading.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

/// Serialize a timestamp as an RFC 3339 string in UTC, truncated to seconds.
pub fn serialize<S>(datetime: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let utc = datetime
        .to_offset(UtcOffset::UTC)
        .replace_nanosecond(0)
        .map_err(serde::ser::Error::custom)?;
    let text = utc.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&text)
}

/// Deserialize an RFC 3339 string with any offset.
pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_str(Rfc3339Visitor)
}

struct Rfc3339Visitor;

impl Visitor<'_> for Rfc3339Visitor {
    type Value = OffsetDateTime;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an RFC 3339 timestamp")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        OffsetDateTime::parse(value, &Rfc3339).map_err(E::custom)
    }
}
