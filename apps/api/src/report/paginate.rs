//! Paginator: places blocks top-to-bottom on fixed-size pages.
//!
//! Output is a list of pages, each a list of positioned draw operations in PDF
//! user space (points, origin bottom-left). Nothing here touches PDF objects; the
//! encoder in `pdf.rs` turns `DrawOp`s into content-stream operators.
//!
//! Rules:
//! - A block that does not fit in the remaining space starts a new page.
//! - Band and sub-headers are kept with the start of the table that follows them.
//! - Tables break between rows; the header row is redrawn on every page.
//! - A row taller than an empty page is a layout error, not clipped output.

use crate::report::flow::{Block, SkillRow, SkillTable};
use crate::report::font_metrics::{get_metrics, Face};
use crate::report::style::{self, PageGeometry, Rgb};
use crate::report::RenderError;

// ────────────────────────────────────────────────────────────────────────────
// Draw model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Single line of text; `(x, y)` is the start of the baseline.
    Text {
        x: f32,
        y: f32,
        face: Face,
        size: f32,
        color: Rgb,
        text: String,
    },
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
        color: Rgb,
    },
    /// One dot of a proficiency indicator. Filled dots are solid, empty dots are outlined.
    Mark {
        cx: f32,
        cy: f32,
        radius: f32,
        filled: bool,
        color: Rgb,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    /// 1-based page number.
    pub number: usize,
    pub ops: Vec<DrawOp>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Metrics
// ────────────────────────────────────────────────────────────────────────────

const TITLE_SIZE: f32 = 20.0;
const TITLE_HEIGHT: f32 = 36.0;
const CAPTION_SIZE: f32 = 9.0;
const CAPTION_LEADING: f32 = 11.0;
const BAND_HEADER_SIZE: f32 = 14.0;
const BAND_HEADER_BOX: f32 = 24.0;
const BAND_HEADER_HEIGHT: f32 = 30.0;
const SUB_HEADER_SIZE: f32 = 11.0;
const SUB_HEADER_HEIGHT: f32 = 18.0;
const SEPARATOR_HEIGHT: f32 = 8.0;

const CELL_SIZE: f32 = 9.0;
const CELL_LEADING: f32 = 11.0;
const DEFINITION_SIZE: f32 = 7.0;
const DEFINITION_LEADING: f32 = 8.5;
const CELL_PAD_X: f32 = 4.0;
const CELL_PAD_Y: f32 = 4.0;
const HEADER_PAD_Y: f32 = 8.0;

pub const MARK_COUNT: u8 = 5;
const MARK_RADIUS: f32 = 2.6;
const MARK_PITCH: f32 = 7.5;
const MARK_ROW_HEIGHT: f32 = 8.0;

/// Column headers and their share of the content width.
const COLUMNS: [(&str, f32); 4] = [
    ("Skill Name", 0.25),
    ("Proficiency", 0.10),
    ("Role / Function", 0.25),
    ("Definition", 0.40),
];

fn column_widths(geometry: &PageGeometry) -> [f32; 4] {
    let w = geometry.content_width();
    COLUMNS.map(|(_, share)| w * share)
}

fn header_row_height() -> f32 {
    CELL_LEADING + 2.0 * HEADER_PAD_Y
}

struct RowLayout {
    name: Vec<String>,
    role: Vec<String>,
    definition: Vec<String>,
    height: f32,
}

fn layout_row(row: &SkillRow, widths: &[f32; 4]) -> RowLayout {
    let inner = |w: f32| (w - 2.0 * CELL_PAD_X).max(1.0);
    let name = get_metrics(Face::Bold).wrap(&row.skill_name, CELL_SIZE, inner(widths[0]));
    let role = get_metrics(Face::Regular).wrap(&row.role, CELL_SIZE, inner(widths[2]));
    let definition =
        get_metrics(Face::Regular).wrap(&row.definition, DEFINITION_SIZE, inner(widths[3]));

    let content = [
        name.len() as f32 * CELL_LEADING,
        MARK_ROW_HEIGHT,
        role.len() as f32 * CELL_LEADING,
        definition.len() as f32 * DEFINITION_LEADING,
    ]
    .into_iter()
    .fold(CELL_LEADING, f32::max);

    RowLayout {
        name,
        role,
        definition,
        height: content + 2.0 * CELL_PAD_Y,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Paginator
// ────────────────────────────────────────────────────────────────────────────

struct Paginator {
    geometry: PageGeometry,
    pages: Vec<Page>,
    current: Page,
    /// Top of the remaining free space on the current page.
    y: f32,
}

impl Paginator {
    fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: Vec::new(),
            current: Page {
                number: 1,
                ops: Vec::new(),
            },
            y: geometry.content_top(),
        }
    }

    fn remaining(&self) -> f32 {
        self.y - self.geometry.margin_bottom
    }

    fn at_page_top(&self) -> bool {
        (self.y - self.geometry.content_top()).abs() < f32::EPSILON
    }

    fn break_page(&mut self) {
        let next = self.current.number + 1;
        let done = std::mem::replace(
            &mut self.current,
            Page {
                number: next,
                ops: Vec::new(),
            },
        );
        self.pages.push(done);
        self.y = self.geometry.content_top();
    }

    /// Starts a new page unless `height` fits below the cursor (or we are already at the top).
    fn reserve(&mut self, height: f32) {
        if height > self.remaining() && !self.at_page_top() {
            self.break_page();
        }
    }

    fn text(&mut self, x: f32, y: f32, face: Face, size: f32, color: Rgb, text: &str) {
        self.current.ops.push(DrawOp::Text {
            x,
            y,
            face,
            size,
            color,
            text: text.to_string(),
        });
    }

    fn finish(mut self) -> Vec<Page> {
        self.pages.push(self.current);
        self.pages
    }

    // ── blocks ──────────────────────────────────────────────────────────────

    fn title(&mut self, title: &str) {
        self.reserve(TITLE_HEIGHT);
        let width = get_metrics(Face::Bold).width_pt(title, TITLE_SIZE);
        let x = self.geometry.margin_left + (self.geometry.content_width() - width) / 2.0;
        let y = self.y - TITLE_SIZE;
        self.text(x, y, Face::Bold, TITLE_SIZE, style::TITLE_RED, title);
        self.y -= TITLE_HEIGHT;
    }

    fn caption(&mut self, caption: &str) {
        let lines = get_metrics(Face::Regular).wrap(
            caption,
            CAPTION_SIZE,
            self.geometry.content_width(),
        );
        self.reserve(lines.len() as f32 * CAPTION_LEADING + 8.0);
        for line in &lines {
            let y = self.y - CAPTION_SIZE;
            self.text(
                self.geometry.margin_left,
                y,
                Face::Regular,
                CAPTION_SIZE,
                style::CAPTION_GRAY,
                line,
            );
            self.y -= CAPTION_LEADING;
        }
        self.y -= 8.0;
    }

    fn band_header(&mut self, band: &str, keep_with: f32) {
        self.reserve(BAND_HEADER_HEIGHT + keep_with);
        let left = self.geometry.margin_left;
        self.current.ops.push(DrawOp::FillRect {
            x: left,
            y: self.y - BAND_HEADER_BOX,
            width: self.geometry.content_width(),
            height: BAND_HEADER_BOX,
            color: style::BAND_BLUE,
        });
        let baseline = self.y - BAND_HEADER_BOX + (BAND_HEADER_BOX - BAND_HEADER_SIZE) / 2.0 + 3.0;
        self.text(left + 6.0, baseline, Face::Bold, BAND_HEADER_SIZE, style::WHITE, band);
        self.y -= BAND_HEADER_HEIGHT;
    }

    fn sub_header(&mut self, title: &str, keep_with: f32) {
        self.reserve(SUB_HEADER_HEIGHT + keep_with);
        let y = self.y - SUB_HEADER_SIZE;
        self.text(
            self.geometry.margin_left,
            y,
            Face::Bold,
            SUB_HEADER_SIZE,
            style::BLACK,
            title,
        );
        self.y -= SUB_HEADER_HEIGHT;
    }

    fn separator(&mut self) {
        self.reserve(SEPARATOR_HEIGHT);
        let y = self.y - SEPARATOR_HEIGHT / 2.0;
        self.current.ops.push(DrawOp::Line {
            x1: self.geometry.margin_left,
            y1: y,
            x2: self.geometry.width - self.geometry.margin_right,
            y2: y,
            width: 1.0,
            color: style::SEPARATOR_GRAY,
        });
        self.y -= SEPARATOR_HEIGHT;
    }

    fn spacer(&mut self, height: f32) {
        // Space at the foot of a page is dropped rather than carried over.
        self.y = (self.y - height).max(self.geometry.margin_bottom);
    }

    fn table(&mut self, table: &SkillTable) -> Result<(), RenderError> {
        let widths = column_widths(&self.geometry);
        let header_h = header_row_height();
        let rows: Vec<RowLayout> = table.rows.iter().map(|r| layout_row(r, &widths)).collect();

        for (row, layout) in table.rows.iter().zip(&rows) {
            if header_h + layout.height > self.geometry.content_height() {
                return Err(RenderError::Layout(format!(
                    "row for skill '{}' is {:.0}pt tall and cannot fit on a page",
                    row.skill_name, layout.height
                )));
            }
        }

        let Some(first) = rows.first() else {
            return Ok(());
        };
        self.reserve(header_h + first.height);
        self.header_row(table, &widths);

        for (row, layout) in table.rows.iter().zip(&rows) {
            if layout.height > self.remaining() {
                self.break_page();
                self.header_row(table, &widths);
            }
            self.body_row(table, row, layout, &widths);
        }
        Ok(())
    }

    fn header_row(&mut self, table: &SkillTable, widths: &[f32; 4]) {
        let height = header_row_height();
        let top = self.y;
        let accent = style::accent(table.category);
        self.current.ops.push(DrawOp::FillRect {
            x: self.geometry.margin_left,
            y: top - height,
            width: self.geometry.content_width(),
            height,
            color: accent,
        });

        let mut x = self.geometry.margin_left;
        for ((label, _), w) in COLUMNS.iter().zip(widths) {
            self.text(
                x + CELL_PAD_X,
                top - HEADER_PAD_Y - CELL_SIZE,
                Face::Bold,
                CELL_SIZE,
                style::WHITE,
                label,
            );
            x += w;
        }
        self.grid_lines(top, height, widths);
        self.y -= height;
    }

    fn body_row(&mut self, table: &SkillTable, row: &SkillRow, layout: &RowLayout, widths: &[f32; 4]) {
        let top = self.y;
        let left = self.geometry.margin_left;
        let accent = style::accent(table.category);

        self.current.ops.push(DrawOp::FillRect {
            x: left,
            y: top - layout.height,
            width: self.geometry.content_width(),
            height: layout.height,
            color: style::tint(table.category),
        });

        let text_top = top - CELL_PAD_Y;
        let columns_x = [
            left,
            left + widths[0],
            left + widths[0] + widths[1],
            left + widths[0] + widths[1] + widths[2],
        ];

        for (i, line) in layout.name.iter().enumerate() {
            let y = text_top - CELL_SIZE - i as f32 * CELL_LEADING;
            self.text(columns_x[0] + CELL_PAD_X, y, Face::Bold, CELL_SIZE, style::BLACK, line);
        }

        let mark_cy = text_top - CELL_LEADING / 2.0;
        let first_cx = columns_x[1] + CELL_PAD_X + MARK_RADIUS;
        for i in 0..MARK_COUNT {
            self.current.ops.push(DrawOp::Mark {
                cx: first_cx + f32::from(i) * MARK_PITCH,
                cy: mark_cy,
                radius: MARK_RADIUS,
                filled: i < row.proficiency,
                color: accent,
            });
        }
        let level_x = first_cx + f32::from(MARK_COUNT) * MARK_PITCH;
        self.text(
            level_x,
            mark_cy - DEFINITION_SIZE / 2.0 + 1.0,
            Face::Bold,
            DEFINITION_SIZE,
            accent,
            &format!("{}/{MARK_COUNT}", row.proficiency),
        );

        for (i, line) in layout.role.iter().enumerate() {
            let y = text_top - CELL_SIZE - i as f32 * CELL_LEADING;
            self.text(columns_x[2] + CELL_PAD_X, y, Face::Regular, CELL_SIZE, style::BLACK, line);
        }

        for (i, line) in layout.definition.iter().enumerate() {
            let y = text_top - DEFINITION_SIZE - i as f32 * DEFINITION_LEADING;
            self.text(
                columns_x[3] + CELL_PAD_X,
                y,
                Face::Regular,
                DEFINITION_SIZE,
                style::DEFINITION_GRAY,
                line,
            );
        }

        self.grid_lines(top, layout.height, widths);
        self.y -= layout.height;
    }

    /// White cell borders: the row's bottom edge and the inner column edges.
    fn grid_lines(&mut self, top: f32, height: f32, widths: &[f32; 4]) {
        let left = self.geometry.margin_left;
        let right = left + self.geometry.content_width();
        let bottom = top - height;
        self.current.ops.push(DrawOp::Line {
            x1: left,
            y1: bottom,
            x2: right,
            y2: bottom,
            width: 0.5,
            color: style::WHITE,
        });
        let mut x = left;
        for w in &widths[..3] {
            x += w;
            self.current.ops.push(DrawOp::Line {
                x1: x,
                y1: top,
                x2: x,
                y2: bottom,
                width: 0.5,
                color: style::WHITE,
            });
        }
    }
}

/// Height the block at `blocks[0]` needs to keep together with: the headers and
/// spacers leading into the next table, plus that table's header and first row.
fn lead_in_height(blocks: &[Block], geometry: &PageGeometry) -> f32 {
    let mut height = 0.0;
    for block in blocks {
        match block {
            Block::SubHeader(_) => height += SUB_HEADER_HEIGHT,
            Block::Spacer(h) => height += h,
            Block::Table(table) => {
                let widths = column_widths(geometry);
                let first = table
                    .rows
                    .first()
                    .map(|r| layout_row(r, &widths).height)
                    .unwrap_or(0.0);
                return height + header_row_height() + first;
            }
            _ => return 0.0,
        }
    }
    0.0
}

/// Lays out `blocks` on pages of the given geometry.
pub fn paginate(blocks: &[Block], geometry: PageGeometry) -> Result<Vec<Page>, RenderError> {
    let mut p = Paginator::new(geometry);

    for (i, block) in blocks.iter().enumerate() {
        let following = &blocks[i + 1..];
        match block {
            Block::Title(title) => p.title(title),
            Block::FilterCaption(caption) => p.caption(caption),
            Block::BandHeader(band) => p.band_header(band, lead_in_height(following, &geometry)),
            Block::SubHeader(title) => p.sub_header(title, lead_in_height(following, &geometry)),
            Block::Table(table) => p.table(table)?,
            Block::Separator => p.separator(),
            Block::Spacer(h) => p.spacer(*h),
        }
    }

    Ok(p.finish())
}
