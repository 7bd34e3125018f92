//! Page geometry and colour palette of the skills matrix report.

use crate::report::grouping::Category;

const PT_PER_MM: f32 = 72.0 / 25.4;

pub fn mm(v: f32) -> f32 {
    v * PT_PER_MM
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn hex(v: u32) -> Self {
        Rgb((v >> 16) as u8, (v >> 8) as u8, v as u8)
    }

    /// Components scaled to `0.0..=1.0` for PDF colour operators.
    pub fn unit(self) -> [f32; 3] {
        [
            f32::from(self.0) / 255.0,
            f32::from(self.1) / 255.0,
            f32::from(self.2) / 255.0,
        ]
    }
}

pub const WHITE: Rgb = Rgb::hex(0xffffff);
pub const BLACK: Rgb = Rgb::hex(0x000000);
pub const TITLE_RED: Rgb = Rgb::hex(0xcd202c);
pub const CAPTION_GRAY: Rgb = Rgb::hex(0x4b5563);
pub const BAND_BLUE: Rgb = Rgb::hex(0x1e40af);
pub const DEFINITION_GRAY: Rgb = Rgb::hex(0x666666);
pub const SEPARATOR_GRAY: Rgb = Rgb::hex(0x9ca3af);

pub const FUNCTIONAL_ACCENT: Rgb = Rgb::hex(0x059669);
pub const FUNCTIONAL_TINT: Rgb = Rgb::hex(0xecfdf5);
pub const LEADERSHIP_ACCENT: Rgb = Rgb::hex(0x7c3aed);
pub const LEADERSHIP_TINT: Rgb = Rgb::hex(0xf3e8ff);

/// Header fill and indicator colour for a category.
pub fn accent(category: Category) -> Rgb {
    match category {
        Category::Functional => FUNCTIONAL_ACCENT,
        Category::Leadership => LEADERSHIP_ACCENT,
    }
}

/// Body row fill for a category.
pub fn tint(category: Category) -> Rgb {
    match category {
        Category::Functional => FUNCTIONAL_TINT,
        Category::Leadership => LEADERSHIP_TINT,
    }
}

/// Page size and margins, in points. Origin is bottom-left, as in PDF.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
}

impl PageGeometry {
    /// A4 landscape with 15 mm side margins and 20 mm top/bottom margins.
    pub fn landscape_a4() -> Self {
        PageGeometry {
            width: 841.89,
            height: 595.28,
            margin_left: mm(15.0),
            margin_right: mm(15.0),
            margin_top: mm(20.0),
            margin_bottom: mm(20.0),
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    pub fn content_top(&self) -> f32 {
        self.height - self.margin_top
    }

    pub fn content_height(&self) -> f32 {
        self.content_top() - self.margin_bottom
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::landscape_a4()
    }
}
