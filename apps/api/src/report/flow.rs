//! Turns grouped records into the flat block sequence the paginator lays out.

use serde_json::{Map, Value};

use crate::models::record::MAX_PROFICIENCY;
use crate::models::SkillRecord;
use crate::report::grouping::{BandGroup, Category};

pub const REPORT_TITLE: &str = "Manpower & Skills Matrix";

/// Definitions longer than this many characters are cut and suffixed with `...`.
pub const DEFINITION_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct SkillRow {
    pub skill_name: String,
    /// Always in `0..=5`: the number of filled indicator marks.
    pub proficiency: u8,
    pub role: String,
    pub definition: String,
}

impl SkillRow {
    pub fn from_record(record: &SkillRecord) -> Self {
        Self {
            skill_name: record.skill_name.clone(),
            proficiency: record.proficiency_level.min(MAX_PROFICIENCY),
            role: record.role_label().to_string(),
            definition: truncate_definition(&record.skill_definition),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillTable {
    pub category: Category,
    pub rows: Vec<SkillRow>,
}

/// One unit of vertical flow. The paginator never splits a block except
/// `Table`, which breaks between rows and repeats its header row.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Title(String),
    FilterCaption(String),
    BandHeader(String),
    SubHeader(String),
    Table(SkillTable),
    Separator,
    Spacer(f32),
}

/// Cuts `definition` to `DEFINITION_LIMIT` characters, appending `...` when anything was cut.
pub fn truncate_definition(definition: &str) -> String {
    if definition.chars().count() <= DEFINITION_LIMIT {
        definition.to_string()
    } else {
        let mut cut: String = definition.chars().take(DEFINITION_LIMIT).collect();
        cut.push_str("...");
        cut
    }
}

/// Display text for one filter value, or `None` when the filter is effectively unset.
fn filter_value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) if items.is_empty() => None,
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Value::Object(map) if map.is_empty() => None,
        other => Some(other.to_string()),
    }
}

/// `name: value | name: value` over the non-empty filters, in the order received.
/// Returns `None` when no filter is set.
pub fn filter_caption(filters: &Map<String, Value>) -> Option<String> {
    let parts: Vec<String> = filters
        .iter()
        .filter_map(|(name, value)| filter_value_text(value).map(|text| format!("{name}: {text}")))
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(format!("Filters Applied: {}", parts.join(" | ")))
    }
}

/// Builds the document body: title, optional filter caption, then one section per
/// non-empty band with a separator line between consecutive bands.
pub fn build_blocks(groups: &[BandGroup], filters: &Map<String, Value>) -> Vec<Block> {
    let mut blocks = vec![Block::Title(REPORT_TITLE.to_string()), Block::Spacer(10.0)];

    if let Some(caption) = filter_caption(filters) {
        blocks.push(Block::FilterCaption(caption));
        blocks.push(Block::Spacer(15.0));
    }

    let mut first_band = true;
    for group in groups.iter().filter(|g| !g.is_empty()) {
        if !first_band {
            blocks.push(Block::Separator);
            blocks.push(Block::Spacer(10.0));
        }
        first_band = false;

        blocks.push(Block::BandHeader(group.band.clone()));
        blocks.push(Block::Spacer(5.0));

        for category in [Category::Functional, Category::Leadership] {
            let records = group.bucket(category);
            if records.is_empty() {
                continue;
            }
            blocks.push(Block::SubHeader(category.section_title().to_string()));
            blocks.push(Block::Table(SkillTable {
                category,
                rows: records.iter().map(SkillRow::from_record).collect(),
            }));
            blocks.push(Block::Spacer(10.0));
        }
    }

    blocks
}
