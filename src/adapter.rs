//! Session payload adapter
//!
//! Parses session JSON into a wire-level [`SessionPayload`] and validates it into a
//! typed [`SessionInput`]. Invalid payloads are rejected with a [`ValidationError`]
//! naming the field; nothing is silently coerced.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ComputeError, ValidationError};
use crate::types::{KeystrokeEvent, SessionInput};

/// Keystroke as it arrives on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeystrokePayload {
    /// Some producers send this as `timestamp`
    #[serde(default, alias = "timestamp")]
    pub timestamp_millis: Option<Value>,
}

/// Session as it arrives on the wire. Fields are optional and loosely typed here so
/// that a missing or mistyped field becomes a named validation error instead of a
/// parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    /// Caller-side identifier, only used in reports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    #[serde(default, alias = "duration")]
    pub duration_seconds: Option<Value>,

    #[serde(default)]
    pub keystrokes: Option<Vec<KeystrokePayload>>,

    #[serde(default, alias = "corrections")]
    pub correction_count: Option<Value>,

    #[serde(default, alias = "text")]
    pub raw_text: Option<String>,
}

impl SessionPayload {
    /// Validate into a typed session
    pub fn into_input(self) -> Result<SessionInput, ValidationError> {
        let duration_seconds = self
            .duration_seconds
            .ok_or_else(|| ValidationError::MissingField("durationSeconds".to_string()))
            .and_then(|v| number_field(&v, "durationSeconds"))?;

        let keystrokes = self
            .keystrokes
            .ok_or_else(|| ValidationError::MissingField("keystrokes".to_string()))?
            .into_iter()
            .enumerate()
            .map(|(idx, k)| {
                let field = format!("keystrokes[{idx}].timestampMillis");
                let value = k
                    .timestamp_millis
                    .ok_or_else(|| ValidationError::MissingField(field.clone()))?;
                let millis = integer_field(&value, &field)?;
                i64::try_from(millis)
                    .map(KeystrokeEvent::new)
                    .map_err(|_| invalid(&field, format!("{millis} is out of range")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let correction_count = self
            .correction_count
            .ok_or_else(|| ValidationError::MissingField("correctionCount".to_string()))
            .and_then(|v| integer_field(&v, "correctionCount"))?;
        let correction_count = u32::try_from(correction_count).map_err(|_| {
            invalid(
                "correctionCount",
                format!("must be between 0 and {}, got {correction_count}", u32::MAX),
            )
        })?;

        let raw_text = self
            .raw_text
            .ok_or_else(|| ValidationError::MissingField("rawText".to_string()))?;

        let input = SessionInput {
            duration_seconds,
            keystrokes,
            correction_count,
            raw_text,
        };
        input.validate()?;
        Ok(input)
    }
}

fn invalid(field: &str, reason: String) -> ValidationError {
    ValidationError::InvalidField {
        field: field.to_string(),
        reason,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn number_field(value: &Value, field: &str) -> Result<f64, ValidationError> {
    value
        .as_f64()
        .ok_or_else(|| invalid(field, format!("must be a number, got {}", json_type(value))))
}

/// Whole JSON numbers only. Integers past i64/u64 arrive as floats and are out of range.
fn integer_field(value: &Value, field: &str) -> Result<i128, ValidationError> {
    let Value::Number(n) = value else {
        return Err(invalid(
            field,
            format!("must be an integer, got {}", json_type(value)),
        ));
    };
    if let Some(i) = n.as_i64() {
        return Ok(i128::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Ok(i128::from(u));
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 => Err(invalid(field, format!("{f} is out of range"))),
        _ => Err(invalid(field, format!("must be an integer, got {n}"))),
    }
}

/// Parse a single session JSON object
pub fn parse_session(json: &str) -> Result<SessionPayload, ComputeError> {
    serde_json::from_str(json)
        .map_err(|e| ComputeError::ParseError(format!("Failed to parse session: {}", e)))
}

/// Parse and validate a single session JSON object
pub fn parse_session_input(json: &str) -> Result<SessionInput, ComputeError> {
    Ok(parse_session(json)?.into_input()?)
}

/// Parse a JSON array of sessions
pub fn parse_array(json: &str) -> Result<Vec<SessionPayload>, ComputeError> {
    serde_json::from_str(json)
        .map_err(|e| ComputeError::ParseError(format!("Failed to parse session array: {}", e)))
}

/// Parse NDJSON (one session per line), skipping blank lines
pub fn parse_ndjson(ndjson: &str) -> Result<Vec<SessionPayload>, ComputeError> {
    let mut sessions = Vec::new();
    for (line_num, line) in ndjson.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<SessionPayload>(trimmed) {
            Ok(session) => sessions.push(session),
            Err(e) => {
                return Err(ComputeError::ParseError(format!(
                    "Failed to parse line {}: {}",
                    line_num + 1,
                    e
                )));
            }
        }
    }
    Ok(sessions)
}

/// Validation outcome for one session of a batch
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub index: usize,
    pub session_id: Option<String>,
    pub error: ValidationError,
}

/// Validate a batch, returning only the sessions that failed
pub fn validate_sessions(sessions: &[SessionPayload]) -> Vec<ValidationResult> {
    sessions
        .iter()
        .enumerate()
        .filter_map(|(idx, session)| {
            session
                .clone()
                .into_input()
                .err()
                .map(|error| ValidationResult {
                    index: idx,
                    session_id: session.session_id.clone(),
                    error,
                })
        })
        .collect()
}
