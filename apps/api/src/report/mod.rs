// Skills matrix PDF report.
// Pipeline: group records by band/category → flow into blocks → paginate → decorate → encode.
// Rendering is CPU-bound; callers run it inside tokio::task::spawn_blocking.

pub mod flow;
pub mod font_metrics;
pub mod grouping;
pub mod handlers;
pub mod header_footer;
pub mod paginate;
pub mod pdf;
pub mod style;

use chrono::NaiveDateTime;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::SkillRecord;
use crate::report::flow::{build_blocks, Block, REPORT_TITLE};
use crate::report::grouping::group_by_band;
use crate::report::header_footer::{PageDecorator, RunningHeader};
use crate::report::paginate::paginate;
use crate::report::pdf::DocumentInfo;
use crate::report::style::PageGeometry;

/// Title printed in the running header of every page.
pub const RUNNING_HEADER_TITLE: &str = "Manpower & Skills Matrix Report";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("layout failed: {0}")]
    Layout(String),

    #[error("page decoration failed: {0}")]
    Decoration(String),

    #[error("PDF encoding failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("PDF write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders the skills matrix report for `records` as PDF bytes.
///
/// `filters` only feeds the caption under the title; records are not re-filtered.
pub fn generate_report(
    records: &[SkillRecord],
    filters: &Map<String, Value>,
    generated_at: NaiveDateTime,
) -> Result<Vec<u8>, RenderError> {
    let groups = group_by_band(records);
    for group in &groups {
        debug!(band = %group.band, records = group.len(), "Band grouped");
    }
    let blocks = build_blocks(&groups, filters);
    info!(
        records = records.len(),
        bands = groups.len(),
        blocks = blocks.len(),
        "Rendering skills matrix report"
    );

    let header = RunningHeader::new(RUNNING_HEADER_TITLE, generated_at);
    let info = DocumentInfo {
        title: REPORT_TITLE.to_string(),
        created_at: generated_at,
    };
    render_pdf(&blocks, PageGeometry::landscape_a4(), &header, &info)
}

/// Styled render with a single undecorated retry.
///
/// If building with `decorator` fails for any reason, the same blocks are built
/// once more without page decoration. A second failure is returned as-is.
pub fn render_pdf(
    blocks: &[Block],
    geometry: PageGeometry,
    decorator: &dyn PageDecorator,
    info: &DocumentInfo,
) -> Result<Vec<u8>, RenderError> {
    match build_document(blocks, geometry, Some(decorator), info) {
        Ok(bytes) => Ok(bytes),
        Err(e) => {
            warn!(error = %e, "Styled PDF build failed, retrying without header/footer");
            build_document(blocks, geometry, None, info)
        }
    }
}

fn build_document(
    blocks: &[Block],
    geometry: PageGeometry,
    decorator: Option<&dyn PageDecorator>,
    info: &DocumentInfo,
) -> Result<Vec<u8>, RenderError> {
    let mut pages = paginate(blocks, geometry)?;
    if let Some(decorator) = decorator {
        for page in &mut pages {
            decorator.decorate(page, &geometry)?;
        }
    }
    let bytes = pdf::encode(&pages, &geometry, info)?;
    info!(pages = pages.len(), bytes = bytes.len(), decorated = decorator.is_some(), "PDF built");
    Ok(bytes)
}
