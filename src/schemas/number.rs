use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
    Null,
}

/// The spreadsheet service returns numeric cells either as JSON numbers or as
/// their string rendering, depending on the sheet formatting. Empty cells come
/// back as `""`, and averages over no rows come back as `null`; both read as
/// `None`.
pub(crate) fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match RawNumber::deserialize(deserializer)? {
        RawNumber::Number(value) => Ok(Some(value)),
        RawNumber::Null => Ok(None),
        RawNumber::Text(text) if text.trim().is_empty() => Ok(None),
        RawNumber::Text(text) => text
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected a number, got {text:?}"))),
    }
}

/// Like [`lenient_opt_f64`], with empty cells counted as zero.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_f64(deserializer)?.unwrap_or(0.0))
}

/// A whole, non-negative count. Empty cells read as `None`.
pub(crate) fn lenient_opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = lenient_opt_f64(deserializer)? else {
        return Ok(None);
    };
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX) {
        Ok(Some(value as u32))
    } else {
        Err(D::Error::custom(format!("expected a non-negative integer, got {value}")))
    }
}

/// Renders a number the way the browser prints it: integral values without a
/// fractional part, everything else in shortest round-trip form.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
