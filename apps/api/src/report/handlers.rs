//! Axum route handler for the PDF export.

use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::SkillRecord;
use crate::report::generate_report;

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    /// Records as the client currently shows them. Normalized leniently.
    /// Missing and `null` are both "no data".
    #[serde(default)]
    pub data: Option<Vec<Value>>,
    /// Active filters, for the caption only.
    #[serde(default)]
    pub filters: Option<Map<String, Value>>,
}

/// POST /api/export-pdf
///
/// Renders the posted records as the skills matrix PDF and returns it as an attachment.
pub async fn handle_export_pdf(Json(request): Json<ExportRequest>) -> Result<Response, AppError> {
    let data = request.data.unwrap_or_default();
    if data.is_empty() {
        return Err(AppError::Validation("No data provided".to_string()));
    }

    let records: Vec<SkillRecord> = data.iter().map(SkillRecord::from_loose).collect();
    let filters = request.filters.unwrap_or_default();
    let generated_at = Local::now().naive_local();
    let filename = format!(
        "skills_matrix_visual_{}.pdf",
        generated_at.format("%Y%m%d_%H%M%S")
    );

    // CPU-bound layout + encoding; runs off the async executor.
    let bytes = tokio::task::spawn_blocking(move || generate_report(&records, &filters, generated_at))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in PDF export: {e}")))?
        .map_err(|e| {
            error!(error = %e, "PDF generation failed");
            AppError::Render(e)
        })?;

    info!(bytes = bytes.len(), %filename, "PDF export complete");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={filename}"),
            ),
        ],
        bytes,
    )
        .into_response())
}
