use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    pub name: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    pub origin: String,
    pub destination: String,
    pub dates: Vec<String>,
    pub carrier_or_hotel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_no: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amounts {
    pub charged: f64,
    pub currency: String,
    #[serde(default)]
    pub taxes: Option<f64>,
    #[serde(default)]
    pub fees: Option<f64>,
}

/// ISO 8601 timestamps, or the literal `unknown`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timelines {
    pub booking_time: String,
    pub event_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyTerm {
    pub id: String,
    pub text: String,
}

/// Facts extracted from the evidence document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFields {
    pub booking_id: String,
    pub party: Party,
    pub itinerary: Itinerary,
    pub amounts: Amounts,
    pub timelines: Timelines,
    pub platform: String,
    pub policy_terms: Vec<PolicyTerm>,
    pub attachments_index: Vec<String>,
}

/// A quoted source backing a claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub source: String,
    pub id_or_ref: String,
    pub quote: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub statement: String,
    pub support: Vec<Citation>,
}

/// One stage of the platform -> merchant -> issuer recovery path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionStep {
    #[serde(deserialize_with = "integral_number")]
    pub step: u32,
    pub action: String,
    pub success_criteria: String,
    pub sla_hours: f64,
}

/// Accepts `1` as well as `1.0`; rejects fractions and negatives.
fn integral_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let n = f64::deserialize(deserializer)?;
    if n.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&n) {
        Ok(n as u32)
    } else {
        Err(D::Error::custom(format!("expected a whole step number, got {}", n)))
    }
}

/// Self-reported checks. Nothing here is verified; see [`crate::audit`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Audit {
    pub checks: Vec<String>,
}

/// Everything needed to file the appeal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppealPackage {
    pub normalized_fields: NormalizedFields,
    pub claims: Vec<Claim>,
    pub execution_steps: [ExecutionStep; 3],
    pub appeal_draft: String,
    pub audit: Audit,
}

/// The model could not find information it needed in the evidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingInformation {
    pub reason: String,
    /// Whatever was extracted before the model stopped, untyped
    pub extracted: Map<String, Value>,
    pub requested_fields: Vec<String>,
    pub audit: Audit,
}

/// Outcome of one analysis round-trip.
///
/// `Error` is a well-formed answer reporting missing evidence, not a failure of the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AnalysisResult {
    Ok(AppealPackage),
    Error(MissingInformation),
}

impl AnalysisResult {
    pub fn status(&self) -> &'static str {
        match self {
            AnalysisResult::Ok(_) => "ok",
            AnalysisResult::Error(_) => "error",
        }
    }

    pub fn audit(&self) -> &Audit {
        match self {
            AnalysisResult::Ok(package) => &package.audit,
            AnalysisResult::Error(missing) => &missing.audit,
        }
    }
}
