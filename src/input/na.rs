//! Missing-value handling for metadata tables.
//!
//! Tables exported from the study spreadsheets mark absent values with the literal `NA`.
//! Those fields are deserialized as `None` so downstream code never sees the marker string.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

pub const MISSING: &str = "NA";

pub fn is_missing(raw: &str) -> bool {
    let value = raw.trim();
    value.is_empty() || value == MISSING
}

pub fn na_string<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(de)?;
    Ok(raw.and_then(|s| {
        if is_missing(&s) {
            None
        } else {
            Some(s.trim().to_string())
        }
    }))
}

pub fn na_number<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(de)?;
    match raw {
        None => Ok(None),
        Some(s) if is_missing(&s) => Ok(None),
        Some(s) => s
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/na.rs"]
mod tests;
