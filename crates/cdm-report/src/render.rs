//! Markdown rendering of the aggregated report for pull request comments.

use std::fmt::Write;

use crate::parse::ValidatorStatus;
use crate::report::{ValidationReport, ValidatorResult};

fn status_badge(status: ValidatorStatus) -> &'static str {
    match status {
        ValidatorStatus::Passed => "✅ PASSED",
        ValidatorStatus::Failed => "❌ FAILED",
        ValidatorStatus::Unknown => "⚠️ UNKNOWN",
    }
}

/// Render the report as Markdown.
///
/// Sections: header, overall status, file statistics, one section per
/// validator, next steps.
pub fn render_markdown(report: &ValidationReport) -> String {
    let results = &report.validation_results;
    let mut out = String::new();

    // `write!` into a String is infallible.
    let _ = writeln!(out, "# CDM Contact Validation Report");
    let _ = writeln!(out);
    let _ = writeln!(out, "- **Pull Request:** #{}", report.pull_request);
    let _ = writeln!(out, "- **Repository:** {}", report.repository);
    let _ = writeln!(out, "- **Branch:** `{}`", report.branch);
    let _ = writeln!(out, "- **Commit:** `{}`", report.commit);
    let _ = writeln!(out, "- **Generated:** {}", report.timestamp);
    let _ = writeln!(out);

    let _ = writeln!(out, "## Overall Status: {}", status_badge(results.overall_status));
    let _ = writeln!(out);

    let _ = writeln!(out, "## File Statistics");
    let _ = writeln!(out);
    let _ = writeln!(out, "| Type | Count |");
    let _ = writeln!(out, "|------|-------|");
    let _ = writeln!(out, "| Contact files | {} |", results.file_count.contacts);
    let _ = writeln!(out, "| Metadata files | {} |", results.file_count.metadata);
    let _ = writeln!(out, "| **Total** | **{}** |", results.file_count.total);
    let _ = writeln!(out);

    for (name, result) in results.validators() {
        render_validator(&mut out, name, result);
    }

    let _ = writeln!(out, "## Next Steps");
    let _ = writeln!(out);
    if report.passed() {
        let _ = writeln!(out, "All checks passed. This pull request is ready for review and merge.");
    } else {
        let _ = writeln!(out, "1. Review the failed checks above.");
        let _ = writeln!(out, "2. Fix the listed violations in the affected files.");
        let _ = writeln!(out, "3. Push the fixes to this branch to re-run validation.");
        if results
            .validators()
            .iter()
            .any(|(_, r)| r.status == ValidatorStatus::Unknown)
        {
            let _ = writeln!(
                out,
                "4. Check the workflow logs for validators that did not run."
            );
        }
    }

    out
}

fn render_validator(out: &mut String, name: &str, result: &ValidatorResult) {
    let _ = writeln!(out, "## {name}: {}", status_badge(result.status));
    let _ = writeln!(out);

    if result.status == ValidatorStatus::Unknown {
        let _ = writeln!(out, "⚠️ This validator did not run or produced no log.");
        let _ = writeln!(out);
        return;
    }

    if !result.summary.is_empty() {
        let _ = writeln!(out, "```");
        let _ = writeln!(out, "{}", result.summary);
        let _ = writeln!(out, "```");
        let _ = writeln!(out);
    }

    if !result.details.is_empty() {
        let _ = writeln!(out, "<details>");
        let _ = writeln!(out, "<summary>Details ({} lines)</summary>", result.details.len());
        let _ = writeln!(out);
        for line in &result.details {
            let _ = writeln!(out, "- {line}");
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "</details>");
        let _ = writeln!(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{FileCount, ValidationResults};

    fn result(status: ValidatorStatus, details: &[&str]) -> ValidatorResult {
        ValidatorResult {
            status,
            details: details.iter().map(|s| s.to_string()).collect(),
            summary: "Total files: 1\nValid files: 1\nInvalid files: 0".to_string(),
        }
    }

    fn report(cdm: ValidatorResult) -> ValidationReport {
        ValidationReport {
            timestamp: "2024-06-01T12:00:00.000Z".to_string(),
            pull_request: "12".to_string(),
            repository: "acme/contacts".to_string(),
            branch: "contact-a1b2c3d4".to_string(),
            commit: "abc123".to_string(),
            validation_results: ValidationResults::new(
                cdm,
                result(ValidatorStatus::Passed, &[]),
                result(ValidatorStatus::Passed, &[]),
                FileCount {
                    total: 2,
                    contacts: 1,
                    metadata: 1,
                },
            ),
        }
    }

    #[test]
    fn sections_in_order() {
        let md = render_markdown(&report(result(ValidatorStatus::Passed, &[])));
        let order = [
            "# CDM Contact Validation Report",
            "## Overall Status: ✅ PASSED",
            "## File Statistics",
            "## CDM Compliance",
            "## Business Rules",
            "## Metadata",
            "## Next Steps",
        ];
        let positions: Vec<usize> = order.iter().map(|h| md.find(h).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(md.contains("| **Total** | **2** |"));
        assert!(md.contains("ready for review"));
    }

    #[test]
    fn failure_lists_details_and_fix_steps() {
        let md = render_markdown(&report(
            result(
                ValidatorStatus::Failed,
                &["❌ CDM compliance failure: data/contacts/a.json"],
            ),
        ));
        assert!(md.contains("## CDM Compliance: ❌ FAILED"));
        assert!(md.contains("- ❌ CDM compliance failure: data/contacts/a.json"));
        assert!(md.contains("Fix the listed violations"));
        assert!(!md.contains("did not run"));
    }

    #[test]
    fn unknown_validator_is_called_out() {
        let md = render_markdown(&report(ValidatorResult::unknown()));
        assert!(md.contains("## CDM Compliance: ⚠️ UNKNOWN"));
        assert!(md.contains("did not run"));
        assert!(md.contains("validators that did not run"));
    }
}
