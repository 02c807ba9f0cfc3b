//! Report structuring: turns a raw assessment report into findings.
//!
//! Finding lines look like
//! `- Problema: <issue> | Gravidade: <severity>. <recommendation>`.
//! Anything else is ignored; the last line becomes the summary.

use smilecheck_core::{Finding, StructuredFindings};

/// Marker a trimmed line must start with to count as a finding.
pub const FINDING_MARKER: &str = "- Problema:";

/// Parse a raw report. Never fails; malformed input yields empty fields.
pub fn structure_response(raw: &str) -> StructuredFindings {
    let findings = raw
        .lines()
        .filter(|line| line.trim().starts_with(FINDING_MARKER))
        .map(parse_finding_line)
        .collect();

    let summary = raw.lines().last().unwrap_or_default().to_string();

    StructuredFindings { findings, summary }
}

fn parse_finding_line(line: &str) -> Finding {
    let (header, recommendation) = line.split_once('.').unwrap_or((line, ""));

    let mut parts = header.split('|');
    let issue = parts.next().map(value_after_colon).unwrap_or_default();
    let severity = parts.next().map(value_after_colon).unwrap_or_default();

    Finding {
        issue,
        severity,
        recommendation: recommendation.trim().to_string(),
    }
}

fn value_after_colon(segment: &str) -> String {
    segment
        .split_once(':')
        .map(|(_, value)| value.trim().to_string())
        .unwrap_or_default()
}
