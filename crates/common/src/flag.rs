//! The `active` flag travels as `0`/`1` on the wire. Input also accepts
//! JSON booleans.

use serde::{de, Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Int(i64),
}

fn convert<E: de::Error>(raw: RawFlag) -> Result<bool, E> {
    match raw {
        RawFlag::Bool(value) => Ok(value),
        RawFlag::Int(0) => Ok(false),
        RawFlag::Int(1) => Ok(true),
        RawFlag::Int(other) => Err(E::custom(format!(
            "invalid active flag {other}, expected 0 or 1"
        ))),
    }
}

pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*value))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    convert(RawFlag::deserialize(deserializer)?)
}

/// Same encoding for optional fields; use together with `#[serde(default)]`.
pub mod option {
    use super::{convert, RawFlag};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<bool>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(flag) => super::serialize(flag, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
        Option::<RawFlag>::deserialize(deserializer)?
            .map(convert)
            .transpose()
    }
}
