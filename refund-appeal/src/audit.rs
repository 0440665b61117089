//! Local re-check of the length limits the model claims to have honoured.
//!
//! Findings are warnings only. An overlong draft or quote is still rendered as returned.

use serde::Serialize;

use crate::model::{AnalysisResult, AppealPackage};

pub const MAX_QUOTE_CHARS: usize = 160;
pub const MAX_DRAFT_WORDS: usize = 350;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuditReport {
    /// Checks the model says it ran
    pub claimed_checks: Vec<String>,
    pub warnings: Vec<String>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}

pub fn verify(result: &AnalysisResult) -> AuditReport {
    let mut report = AuditReport {
        claimed_checks: result.audit().checks.clone(),
        ..Default::default()
    };

    if let AnalysisResult::Ok(package) = result {
        check_quotes(package, &mut report);
        check_draft(package, &mut report);
    }

    report
}

fn check_quotes(package: &AppealPackage, report: &mut AuditReport) {
    for (i, claim) in package.claims.iter().enumerate() {
        for citation in &claim.support {
            let chars = citation.quote.chars().count();
            if chars > MAX_QUOTE_CHARS {
                report.add_warning(format!(
                    "Claim {} quotes {} with {} characters (limit {})",
                    i + 1,
                    citation.id_or_ref,
                    chars,
                    MAX_QUOTE_CHARS
                ));
            }
        }
    }

    for term in &package.normalized_fields.policy_terms {
        let chars = term.text.chars().count();
        if chars > MAX_QUOTE_CHARS {
            report.add_warning(format!(
                "Policy term {} has {} characters (limit {})",
                term.id, chars, MAX_QUOTE_CHARS
            ));
        }
    }
}

fn check_draft(package: &AppealPackage, report: &mut AuditReport) {
    let words = word_count(&package.appeal_draft);
    if words > MAX_DRAFT_WORDS {
        report.add_warning(format!(
            "Appeal draft has {} words (limit {})",
            words, MAX_DRAFT_WORDS
        ));
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
