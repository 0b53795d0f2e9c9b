//! Serde helpers for backend quirks
//!
//! The marketplace backend sends per-user flags as `0`/`1` integers. Some
//! older endpoints send real booleans, so both shapes are accepted.

use serde::{Deserialize, Deserializer, Serializer};

/// Deserialize a list that may be `null`, treating null as empty
pub fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// `bool` carried on the wire as `0` / `1`
pub mod int_bool {
    use super::*;

    pub fn serialize<S>(value: &bool, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        use std::fmt;

        struct IntBoolVisitor;

        impl<'de> Visitor<'de> for IntBoolVisitor {
            type Value = bool;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("0, 1, a boolean or null")
            }

            fn visit_bool<E: de::Error>(self, value: bool) -> Result<bool, E> {
                Ok(value)
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<bool, E> {
                match value {
                    0 => Ok(false),
                    1 => Ok(true),
                    other => Err(E::custom(format!("invalid flag value: {other}"))),
                }
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<bool, E> {
                match value {
                    0 => Ok(false),
                    1 => Ok(true),
                    other => Err(E::custom(format!("invalid flag value: {other}"))),
                }
            }

            fn visit_unit<E: de::Error>(self) -> Result<bool, E> {
                Ok(false)
            }

            fn visit_none<E: de::Error>(self) -> Result<bool, E> {
                Ok(false)
            }
        }

        deserializer.deserialize_any(IntBoolVisitor)
    }
}
