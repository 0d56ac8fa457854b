// Lenient scalar deserializers.
//
// OESS serializes most numeric columns as strings ("10000", "1500",
// "35.9") but not consistently across endpoints and versions. These
// helpers accept either representation and reject anything else.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
    Flag(bool),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Self::Unsigned(n) => n.to_string(),
            Self::Signed(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
            Self::Text(s) => s,
            Self::Flag(b) => b.to_string(),
        }
    }
}

pub(crate) fn u64_lenient<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    match Scalar::deserialize(d)? {
        Scalar::Unsigned(n) => Ok(n),
        Scalar::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("expected unsigned integer, got {s:?}"))),
        other => Err(D::Error::custom(format!(
            "expected unsigned integer, got {}",
            other.into_text()
        ))),
    }
}

pub(crate) fn opt_u64_lenient<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    match Option::<Scalar>::deserialize(d)? {
        None => Ok(None),
        Some(Scalar::Unsigned(n)) => Ok(Some(n)),
        Some(Scalar::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Scalar::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected unsigned integer, got {s:?}"))),
        Some(other) => Err(D::Error::custom(format!(
            "expected unsigned integer, got {}",
            other.into_text()
        ))),
    }
}

pub(crate) fn i64_lenient<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    match Scalar::deserialize(d)? {
        Scalar::Unsigned(n) => {
            i64::try_from(n).map_err(|_| D::Error::custom(format!("integer {n} out of range")))
        }
        Scalar::Signed(n) => Ok(n),
        Scalar::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("expected integer, got {s:?}"))),
        other => Err(D::Error::custom(format!(
            "expected integer, got {}",
            other.into_text()
        ))),
    }
}

#[allow(clippy::as_conversions, clippy::cast_precision_loss)]
pub(crate) fn f64_lenient<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    match Scalar::deserialize(d)? {
        Scalar::Unsigned(n) => Ok(n as f64),
        Scalar::Signed(n) => Ok(n as f64),
        Scalar::Float(n) => Ok(n),
        Scalar::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("expected number, got {s:?}"))),
        Scalar::Flag(b) => Err(D::Error::custom(format!("expected number, got {b}"))),
    }
}

/// Any scalar becomes its text form; `null` or a missing key becomes `None`.
pub(crate) fn opt_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Scalar>::deserialize(d)?.map(Scalar::into_text))
}

/// Keeps key presence apart from its value: pair with `#[serde(default)]`
/// so an absent key is `None` and `"key": null` is `Some(None)`.
pub(crate) fn present_text<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<Option<String>>, D::Error> {
    opt_text(d).map(Some)
}
