//! Audit fingerprints for assessment results.
//!
//! A result is converted to canonical JSON (sorted object keys, integer-valued
//! floats written as integers, compact) and hashed with SHA-256. Two
//! assessments over identical inputs produce identical digests.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::domain::error::Result;

fn normalize_numbers(value: serde_json::Value) -> serde_json::Value {
    use serde_json::Value;

    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, normalize_numbers(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_numbers).collect()),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 9.0e15 => {
                Value::Number(serde_json::Number::from(f as i64))
            }
            _ => Value::Number(n),
        },
        other => other,
    }
}

/// Canonical compact JSON of any serializable value.
///
/// `serde_json::Map` keeps keys ordered, so object keys come out sorted.
/// Non-finite floats have no JSON form and are written as `null`.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String> {
    let value = normalize_numbers(serde_json::to_value(value)?);
    Ok(serde_json::to_string(&value)?)
}

/// SHA-256 hex digest of the canonical JSON form.
pub fn compute_digest<T: Serialize>(value: &T) -> Result<String> {
    let canonical = canonical_json(value)?;
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}
