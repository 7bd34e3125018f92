use chrono::NaiveDateTime;

use crate::report::font_metrics::{get_metrics, Face};
use crate::report::paginate::{DrawOp, Page};
use crate::report::style::{self, mm, PageGeometry};
use crate::report::RenderError;

/// Adds page furniture (anything outside the content box) to a laid-out page.
pub trait PageDecorator: Send + Sync {
    fn decorate(&self, page: &mut Page, geometry: &PageGeometry) -> Result<(), RenderError>;
}

/// Report title and generation time at the top of every page, page number at the foot.
pub struct RunningHeader {
    pub title: String,
    pub generated_at: NaiveDateTime,
}

impl RunningHeader {
    pub fn new(title: impl Into<String>, generated_at: NaiveDateTime) -> Self {
        Self {
            title: title.into(),
            generated_at,
        }
    }
}

const HEADER_TITLE_SIZE: f32 = 12.0;
const HEADER_META_SIZE: f32 = 8.0;

impl PageDecorator for RunningHeader {
    fn decorate(&self, page: &mut Page, geometry: &PageGeometry) -> Result<(), RenderError> {
        let header_y = geometry.height - mm(15.0);

        page.ops.push(DrawOp::Text {
            x: mm(20.0),
            y: header_y,
            face: Face::Bold,
            size: HEADER_TITLE_SIZE,
            color: style::TITLE_RED,
            text: self.title.clone(),
        });

        let stamp = format!("Generated: {}", self.generated_at.format("%Y-%m-%d %H:%M"));
        let stamp_width = get_metrics(Face::Regular).width_pt(&stamp, HEADER_META_SIZE);
        page.ops.push(DrawOp::Text {
            x: geometry.width - mm(20.0) - stamp_width,
            y: header_y,
            face: Face::Regular,
            size: HEADER_META_SIZE,
            color: style::BLACK,
            text: stamp,
        });

        let footer = format!("Page {}", page.number);
        let footer_width = get_metrics(Face::Regular).width_pt(&footer, HEADER_META_SIZE);
        page.ops.push(DrawOp::Text {
            x: (geometry.width - footer_width) / 2.0,
            y: mm(10.0),
            face: Face::Regular,
            size: HEADER_META_SIZE,
            color: style::BLACK,
            text: footer,
        });

        Ok(())
    }
}
