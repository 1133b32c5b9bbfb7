//! Serde helpers for the Proxmox wire conventions.
//!
//! The API encodes booleans as `"1"`/`"0"`, reports guest ids as numbers or
//! strings depending on the endpoint, and expects numeric tunables such as
//! timeouts as strings.

use serde::{Deserialize, Deserializer, Serializer};

/// Serialization for `bool` as the literal strings `"1"` and `"0"`.
pub mod pve_bool {
    use super::*;

    /// Serialize a `bool` as `"1"` or `"0"`.
    pub fn serialize<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(if *value { "1" } else { "0" })
    }

    /// Serialize an `Option<bool>`; pair with `skip_serializing_if` so that
    /// `None` never reaches the wire.
    pub fn serialize_option<S>(value: &Option<bool>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => serialize(value, serializer),
            None => serializer.serialize_none(),
        }
    }
}

/// Serialization for numbers as their decimal string.
pub mod display_string {
    use super::*;
    use std::fmt::Display;

    pub fn serialize_option<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        match value {
            Some(value) => serializer.collect_str(value),
            None => serializer.serialize_none(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Unsigned(u64),
    Signed(i64),
}

/// Deserialize an identifier that may arrive as a JSON string or number.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(value) => value,
        StringOrNumber::Unsigned(value) => value.to_string(),
        StringOrNumber::Signed(value) => value.to_string(),
    })
}

/// Deserialize an optional flag that may arrive as `0`/`1`, `"0"`/`"1"` or a
/// JSON boolean.
pub fn flag_option<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Number(u64),
        String(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        None => None,
        Some(Flag::Bool(value)) => Some(value),
        Some(Flag::Number(value)) => Some(value != 0),
        Some(Flag::String(value)) => Some(value == "1"),
    })
}
