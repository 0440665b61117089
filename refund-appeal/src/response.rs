//! Turning raw completion text into a validated [`AnalysisResult`].
//!
//! Model output is untrusted input. Parsing is all-or-nothing: either every check below passes
//! and a complete variant is returned, or a [`FormatError`] is returned and nothing else.
//!
//! Checks:
//! 1. Optional ```` ```json ```` fence is stripped
//! 2. The remainder is a single JSON object with `status`, `data` and `audit`
//! 3. `status: "ok"` carries every normalized field, claims with at least one citation each,
//!    exactly three execution steps numbered 1, 2, 3 and a non-blank appeal draft
//! 4. `status: "error"` carries a non-blank `reason`

use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::LazyLock;

use crate::error::FormatError;
use crate::model::{
    AnalysisResult, AppealPackage, Audit, Claim, ExecutionStep, MissingInformation,
    NormalizedFields,
};

static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```json\s*(.*?)\s*```").expect("Invalid regex"));

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Status {
    Ok,
    Error,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    status: Status,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    data: Option<Value>,
    audit: Audit,
}

#[derive(Debug, Deserialize)]
struct SuccessData {
    normalized_fields: NormalizedFields,
    claims: Vec<Claim>,
    execution_steps: [ExecutionStep; 3],
    appeal_draft: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorData {
    #[serde(default)]
    normalized_fields: Option<Map<String, Value>>,
    #[serde(default)]
    requested_fields: Option<Vec<String>>,
}

/// Return the body of a ```` ```json ```` fence if there is one, else the trimmed text.
pub fn strip_fence(text: &str) -> &str {
    let trimmed = text.trim();
    JSON_FENCE
        .captures(trimmed)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(trimmed)
}

/// Parse and validate a completion. Never returns a partially validated result.
pub fn parse_analysis(text: &str) -> Result<AnalysisResult, FormatError> {
    let body = strip_fence(text);

    let envelope: Envelope = serde_json::from_str(body).map_err(invalid)?;

    match envelope.status {
        Status::Ok => {
            let data = envelope
                .data
                .ok_or_else(|| FormatError::InvalidSchema("missing field `data`".to_string()))?;
            let data: SuccessData = serde_json::from_value(data).map_err(invalid)?;
            validate_success(&data)?;

            Ok(AnalysisResult::Ok(AppealPackage {
                normalized_fields: data.normalized_fields,
                claims: data.claims,
                execution_steps: data.execution_steps,
                appeal_draft: data.appeal_draft,
                audit: envelope.audit,
            }))
        }
        Status::Error => {
            let reason = envelope
                .reason
                .filter(|r| !r.trim().is_empty())
                .ok_or_else(|| {
                    FormatError::InvalidSchema("status is error but reason is empty".to_string())
                })?;

            let data: ErrorData = match envelope.data {
                None | Some(Value::Null) => ErrorData::default(),
                Some(value) => serde_json::from_value(value).map_err(invalid)?,
            };

            Ok(AnalysisResult::Error(MissingInformation {
                reason,
                extracted: data.normalized_fields.unwrap_or_default(),
                requested_fields: data.requested_fields.unwrap_or_default(),
                audit: envelope.audit,
            }))
        }
    }
}

fn validate_success(data: &SuccessData) -> Result<(), FormatError> {
    for (index, step) in data.execution_steps.iter().enumerate() {
        let expected = index as u32 + 1;
        if step.step != expected {
            return Err(FormatError::InvalidSchema(format!(
                "execution step at position {} is numbered {}",
                expected, step.step
            )));
        }
    }

    if let Some(position) = data.claims.iter().position(|c| c.support.is_empty()) {
        return Err(FormatError::InvalidSchema(format!(
            "claim {} has no supporting citation",
            position + 1
        )));
    }

    if data.appeal_draft.trim().is_empty() {
        return Err(FormatError::InvalidSchema("appeal_draft is empty".to_string()));
    }

    Ok(())
}

fn invalid(e: serde_json::Error) -> FormatError {
    FormatError::InvalidSchema(e.to_string())
}
