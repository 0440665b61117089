//! Markdown rendering of an analysis result.
//!
//! Each variant has its own renderer, so a failure report can never touch success-only fields
//! and vice versa.

use chrono::{DateTime, Utc};
use std::fmt::Write;

use crate::audit::AuditReport;
use crate::model::{
    AnalysisResult, AppealPackage, Claim, ExecutionStep, MissingInformation, NormalizedFields,
};

pub fn render_report(result: &AnalysisResult, audit: &AuditReport) -> String {
    let mut out = match result {
        AnalysisResult::Ok(package) => render_package(package),
        AnalysisResult::Error(missing) => render_missing(missing),
    };

    if !audit.is_clean() {
        out.push_str("## Audit Notes\n\n");
        for warning in &audit.warnings {
            let _ = writeln!(out, "- {}", warning);
        }
        out.push('\n');
    }

    out
}

fn render_package(package: &AppealPackage) -> String {
    let mut out = String::new();
    render_fields(&mut out, &package.normalized_fields);
    render_claims(&mut out, &package.claims);
    render_steps(&mut out, &package.execution_steps);

    out.push_str("## Appeal Draft\n\n");
    out.push_str(package.appeal_draft.trim_end());
    out.push_str("\n\n");
    out
}

fn render_fields(out: &mut String, fields: &NormalizedFields) {
    out.push_str("## Normalized Fields\n\n");
    let rows = [
        ("Booking ID", fields.booking_id.clone()),
        ("Platform", fields.platform.clone()),
        (
            "Party",
            format!("{} ({})", fields.party.name, fields.party.role),
        ),
        ("Origin", fields.itinerary.origin.clone()),
        ("Destination", fields.itinerary.destination.clone()),
        ("Carrier/Hotel", fields.itinerary.carrier_or_hotel.clone()),
        (
            "Charged Amount",
            format!("{} {}", fields.amounts.charged, fields.amounts.currency),
        ),
        ("Booking Time", display_time(&fields.timelines.booking_time)),
        ("Event Time", display_time(&fields.timelines.event_time)),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "- **{}:** {}", label, value);
    }
    if let Some(flight_no) = &fields.itinerary.flight_no {
        let _ = writeln!(out, "- **Flight:** {}", flight_no);
    }
    if !fields.itinerary.dates.is_empty() {
        let _ = writeln!(out, "- **Dates:** {}", fields.itinerary.dates.join(", "));
    }
    out.push('\n');
}

fn render_claims(out: &mut String, claims: &[Claim]) {
    out.push_str("## Legal Claims\n\n");
    for (i, claim) in claims.iter().enumerate() {
        let _ = writeln!(out, "{}. **{}**", i + 1, claim.statement);
        for citation in &claim.support {
            let _ = writeln!(
                out,
                "   > \"{}\"\n   > Source: {} ({})",
                citation.quote, citation.source, citation.id_or_ref
            );
        }
    }
    out.push('\n');
}

fn render_steps(out: &mut String, steps: &[ExecutionStep]) {
    out.push_str("## Recovery Path\n\n");
    for step in steps {
        let _ = writeln!(
            out,
            "{}. {} (SLA: {} hours)\n   - Success: {}",
            step.step, step.action, step.sla_hours, step.success_criteria
        );
    }
    out.push('\n');
}

fn render_missing(missing: &MissingInformation) -> String {
    let mut out = String::from("## Analysis Failed\n\n");
    let _ = writeln!(out, "{}\n", missing.reason);

    if !missing.requested_fields.is_empty() {
        out.push_str("The following information could not be found:\n\n");
        for field in &missing.requested_fields {
            let _ = writeln!(out, "- {}", field);
        }
        out.push('\n');
    }

    out
}

/// RFC 3339 timestamps are shown in UTC; anything else (e.g. `unknown`) as given.
fn display_time(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc).format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
