//! Exact decimal decoding for fixed-point fields.
//!
//! `rust_decimal`'s own deserializer rounds input past 28 significant digits,
//! which would let an over-precise coordinate slip under the fractional-digit
//! check. These read the literal JSON text instead and refuse anything that
//! does not convert without loss. Both JSON numbers and strings are accepted.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use super::patch::Patch;

/// `deserialize_with` for a required `Decimal` field.
pub fn exact<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    from_value(&value).map_err(de::Error::custom)
}

/// `deserialize_with` for a `Patch<Decimal>` field. Pair with
/// `#[serde(default)]` so a missing key stays [`Patch::Absent`].
pub fn exact_patch<'de, D>(deserializer: D) -> Result<Patch<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None => Ok(Patch::Null),
        Some(value) => from_value(&value)
            .map(Patch::Value)
            .map_err(de::Error::custom),
    }
}

fn from_value(value: &Value) -> Result<Decimal, String> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => return Err(format!("expected a decimal number, found {other}")),
    };
    parse_exact(&text).ok_or_else(|| format!("`{text}` is not an exactly representable decimal"))
}

/// Parse plain or scientific notation without rounding.
fn parse_exact(text: &str) -> Option<Decimal> {
    let Some((mantissa, exponent)) = text.split_once(|c| c == 'e' || c == 'E') else {
        return Decimal::from_str_exact(text).ok();
    };
    let mantissa = Decimal::from_str_exact(mantissa).ok()?;
    let exponent = i64::from_str(exponent).ok()?;

    let scale = i64::from(mantissa.scale()) - exponent;
    if scale >= 0 {
        let scale = u32::try_from(scale).ok()?;
        Decimal::try_from_i128_with_scale(mantissa.mantissa(), scale).ok()
    } else {
        let factor = 10i128.checked_pow(u32::try_from(-scale).ok()?)?;
        let digits = mantissa.mantissa().checked_mul(factor)?;
        Decimal::try_from_i128_with_scale(digits, 0).ok()
    }
}
