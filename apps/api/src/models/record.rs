use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Upper bound of the proficiency scale. Levels are always in `0..=MAX_PROFICIENCY`.
pub const MAX_PROFICIENCY: u8 = 5;

/// Band label used when a record carries no band at all.
pub const UNASSIGNED_BAND: &str = "Unassigned";

/// One row of the skills matrix: a skill expected of a job role at a given band.
///
/// Field names on the wire follow the spreadsheet column headers, so every field is
/// renamed explicitly. `Proficiency_Level` accepts numbers, numeric strings
/// (`"4-Expert"`) and null, and is always normalized into `0..=5`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRecord {
    pub id: i64,
    #[serde(rename = "Group")]
    pub group: String,
    #[serde(rename = "SBU")]
    pub sbu: String,
    #[serde(rename = "BU")]
    pub bu: String,
    #[serde(rename = "Function")]
    pub function: String,
    #[serde(rename = "UJR_in_UJR_Master")]
    pub ujr_in_ujr_master: String,
    #[serde(rename = "Job_Role_Name_without_concat")]
    pub job_role_name: String,
    #[serde(rename = "L1_UJR")]
    pub l1_ujr: String,
    #[serde(rename = "Competency_Type")]
    pub competency_type: String,
    #[serde(rename = "Skill_Name")]
    pub skill_name: String,
    #[serde(rename = "Skill_Definition")]
    pub skill_definition: String,
    #[serde(
        rename = "Proficiency_Level",
        default,
        deserialize_with = "deserialize_proficiency"
    )]
    pub proficiency_level: u8,
    #[serde(rename = "Band")]
    pub band: String,
}

impl SkillRecord {
    /// Builds a record from an arbitrary JSON value, filling anything missing or
    /// mistyped with defaults. Used for report payloads, which the client assembles
    /// from whatever it currently has on screen.
    pub fn from_loose(value: &Value) -> Self {
        let empty = Map::new();
        let map = value.as_object().unwrap_or(&empty);

        let band = text_field(map, "Band");
        SkillRecord {
            id: map.get("id").and_then(loose_integer).unwrap_or(0),
            group: text_field(map, "Group"),
            sbu: text_field(map, "SBU"),
            bu: text_field(map, "BU"),
            function: text_field(map, "Function"),
            ujr_in_ujr_master: text_field(map, "UJR_in_UJR_Master"),
            job_role_name: text_field(map, "Job_Role_Name_without_concat"),
            l1_ujr: text_field(map, "L1_UJR"),
            competency_type: text_field(map, "Competency_Type"),
            skill_name: text_field(map, "Skill_Name"),
            skill_definition: text_field(map, "Skill_Definition"),
            proficiency_level: map
                .get("Proficiency_Level")
                .map(normalize_proficiency)
                .unwrap_or(0),
            band: if band.trim().is_empty() {
                UNASSIGNED_BAND.to_string()
            } else {
                band
            },
        }
    }

    /// Role label shown in reports: the job role name, or the function when no role is set.
    pub fn role_label(&self) -> &str {
        if self.job_role_name.trim().is_empty() {
            &self.function
        } else {
            &self.job_role_name
        }
    }
}

/// Coerces any JSON value into a proficiency level in `0..=5`.
///
/// - integers and floats clamp into range (floats truncate toward zero)
/// - strings are read by their leading integer: `"4-Expert"` → 4, `" 3 "` → 3
/// - anything else (null, bool, arrays, strings without a leading digit) → 0
pub fn normalize_proficiency(value: &Value) -> u8 {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                clamp_level(i)
            } else if let Some(u) = n.as_u64() {
                clamp_level(i64::try_from(u).unwrap_or(i64::MAX))
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite())
                    .map(|f| clamp_level(f.trunc() as i64))
                    .unwrap_or(0)
            }
        }
        Value::String(s) => leading_integer(s).map(clamp_level).unwrap_or(0),
        _ => 0,
    }
}

fn clamp_level(level: i64) -> u8 {
    level.clamp(0, i64::from(MAX_PROFICIENCY)) as u8
}

fn leading_integer(s: &str) -> Option<i64> {
    let digits: String = s
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    // Overlong digit runs are still "a big number" and clamp to the top of the scale.
    Some(digits.parse::<i64>().unwrap_or(i64::MAX))
}

fn deserialize_proficiency<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(normalize_proficiency(&value))
}

fn text_field(map: &Map<String, Value>, key: &str) -> String {
    match map.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn loose_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
