//! Band / category grouping for the skills matrix report.

use crate::models::SkillRecord;

/// Reference ordering of pay bands. Bands outside this list sort after all of them.
pub const BAND_ORDER: &[&str] = &[
    "Band 1A", "Band 1B", "Band 2A", "Band 2B", "Band 3", "Band 4", "Band 5",
];

/// Competency types that put a skill in the leadership bucket.
const LEADERSHIP_TYPES: &[&str] = &["Behavioral", "Raymond Leadership Competency"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Functional,
    Leadership,
}

impl Category {
    pub fn of(record: &SkillRecord) -> Self {
        if LEADERSHIP_TYPES.contains(&record.competency_type.as_str()) {
            Category::Leadership
        } else {
            Category::Functional
        }
    }

    pub fn section_title(self) -> &'static str {
        match self {
            Category::Functional => "Functional Skills",
            Category::Leadership => "Leadership Skills",
        }
    }
}

/// All records of one band, split by category. Input order is kept inside each bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandGroup {
    pub band: String,
    pub functional: Vec<SkillRecord>,
    pub leadership: Vec<SkillRecord>,
}

impl BandGroup {
    fn new(band: &str) -> Self {
        Self {
            band: band.to_string(),
            functional: Vec::new(),
            leadership: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.functional.is_empty() && self.leadership.is_empty()
    }

    pub fn bucket(&self, category: Category) -> &[SkillRecord] {
        match category {
            Category::Functional => &self.functional,
            Category::Leadership => &self.leadership,
        }
    }

    pub fn len(&self) -> usize {
        self.functional.len() + self.leadership.len()
    }
}

/// Position of a band in the reference ordering; unknown bands share the last rank.
pub fn band_rank(band: &str) -> usize {
    BAND_ORDER
        .iter()
        .position(|known| *known == band)
        .unwrap_or(BAND_ORDER.len())
}

/// Groups records by band and category, ordered by `BAND_ORDER`.
///
/// Unknown bands come after every known band, in the order they were first seen.
/// The sort is stable, so that order survives.
pub fn group_by_band(records: &[SkillRecord]) -> Vec<BandGroup> {
    let mut groups: Vec<BandGroup> = Vec::new();

    for record in records {
        let idx = match groups.iter().position(|g| g.band == record.band) {
            Some(idx) => idx,
            None => {
                groups.push(BandGroup::new(&record.band));
                groups.len() - 1
            }
        };
        let group = &mut groups[idx];
        match Category::of(record) {
            Category::Functional => group.functional.push(record.clone()),
            Category::Leadership => group.leadership.push(record.clone()),
        }
    }

    groups.sort_by_key(|g| band_rank(&g.band));
    groups
}
