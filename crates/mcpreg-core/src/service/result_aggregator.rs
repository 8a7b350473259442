//! Batch-level policy and result folding for imports.

use crate::domain::{ImportResponse, ImportStatus, ServerImportResult, ValidationReport};

#[derive(Debug, Clone, Copy, Default)]
pub struct ResultAggregator;

impl ResultAggregator {
    /// Abort response when validation failed and invalid items may not be skipped.
    pub fn gate(report: &ValidationReport, skip_invalid: bool) -> Option<ImportResponse> {
        if report.is_valid || skip_invalid {
            return None;
        }
        Some(Self::abort(format!(
            "Import validation failed: {}",
            report.errors.join(", ")
        )))
    }

    /// Abort response for a skip-invalid import that left nothing to import.
    pub fn no_importable_servers(report: &ValidationReport) -> ImportResponse {
        let mut message = "Import validation failed and no valid servers to import".to_string();
        if !report.errors.is_empty() {
            message.push_str(": ");
            message.push_str(&report.errors.join(", "));
        }
        Self::abort(message)
    }

    /// Fold per-item results into the batch response.
    ///
    /// `success` holds iff nothing failed; skipped items do not count against it.
    pub fn fold(
        results: Vec<ServerImportResult>,
        report: &ValidationReport,
        skip_invalid: bool,
    ) -> ImportResponse {
        let count = |status: ImportStatus| results.iter().filter(|r| r.status == status).count();
        let success_count = count(ImportStatus::Success);
        let failed_count = count(ImportStatus::Failed);
        let skipped_count = count(ImportStatus::Skipped);

        let error_message = (!report.is_valid && skip_invalid && report.invalid_count > 0)
            .then(|| format!("Some invalid servers were skipped: {}", report.invalid_count));

        ImportResponse {
            success: failed_count == 0,
            total_count: results.len(),
            success_count,
            failed_count,
            skipped_count,
            results,
            error_message,
        }
    }

    fn abort(message: String) -> ImportResponse {
        ImportResponse {
            success: false,
            error_message: Some(message),
            ..Default::default()
        }
    }
}
