//! JSON-number encoding for decimal amounts
//!
//! The gateway expects amounts as bare JSON numbers. `BigDecimal`'s own
//! serde impl writes strings, so payload fields opt into this module with
//! `#[serde(with = "crate::types::decimal")]`.

use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, ToPrimitive};
use serde::de::{self, Visitor};
use serde::ser;
use serde::{Deserializer, Serializer};

pub fn serialize<S: Serializer>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
    if value.with_scale(0) == *value {
        if let Some(whole) = value.to_i64() {
            return serializer.serialize_i64(whole);
        }
    }
    let number = value
        .to_f64()
        .filter(|n| n.is_finite())
        .ok_or_else(|| <S::Error as ser::Error>::custom(format!("amount {value} is out of range")))?;
    serializer.serialize_f64(number)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigDecimal, D::Error> {
    deserializer.deserialize_any(DecimalVisitor)
}

struct DecimalVisitor;

impl Visitor<'_> for DecimalVisitor {
    type Value = BigDecimal;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal number or numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(BigDecimal::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(BigDecimal::from(v))
    }

    // Shortest round-trip text keeps 0.1 as 0.1 rather than its binary expansion.
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        BigDecimal::from_str(&v.to_string()).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        BigDecimal::from_str(v.trim()).map_err(E::custom)
    }
}
