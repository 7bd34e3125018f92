//! Mock data generator behind `POST /api/reset-data`.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::models::SkillRecord;
use crate::report::grouping::BAND_ORDER;

/// Number of records a reset produces.
pub const DEFAULT_RECORD_COUNT: usize = 60;

const GROUPS: &[&str] = &["Raymond Group", "Aditya Birla Group", "Tata Group"];
const SBUS: &[&str] = &["Textiles", "Apparel", "Engineering", "Real Estate"];
const BUS: &[&str] = &["Suiting", "Shirting", "Garmenting", "Tools & Hardware"];
const L1_UJRS: &[&str] = &["Managerial", "Operational", "Strategic"];
const COMPETENCY_TYPES: &[&str] = &["Functional", "Behavioral", "Technical"];
const ROLE_SUFFIXES: &[&str] = &["Executive", "Manager", "Analyst", "Specialist"];

/// (function, [(skill name, definition)])
const SKILLS: &[(&str, &[(&str, &str)])] = &[
    (
        "Engineering",
        &[
            ("Python Automation", "Ability to script tasks and automate workflows using Python."),
            ("System Design", "Designing scalable and reliable software systems."),
            ("Cloud Infrastructure", "Managing AWS/Azure resources efficiently."),
            ("DevOps", "CI/CD pipeline management and containerization."),
        ],
    ),
    (
        "Sales",
        &[
            ("Negotiation", "Ability to close deals and manage client expectations."),
            ("CRM Management", "Proficiency in Salesforce or HubSpot."),
            ("Lead Generation", "Identifying and cultivating potential customers."),
            ("Solution Selling", "Diagnosing customer needs and recommending products."),
        ],
    ),
    (
        "HR",
        &[
            ("Talent Acquisition", "Sourcing and hiring top talent."),
            ("Employee Relations", "Managing conflict resolution and employee engagement."),
            ("Payroll Management", "Processing salaries and benefits."),
            ("Training & Development", "Designing and delivering training programs."),
        ],
    ),
    (
        "Finance",
        &[
            ("Financial Modeling", "Building financial models for forecasting."),
            ("Tax Compliance", "Ensuring adherence to tax laws and regulations."),
            ("Auditing", "Examining financial records for accuracy."),
            ("Budgeting", "Planning and allocating financial resources."),
        ],
    ),
    (
        "Marketing",
        &[
            ("SEO/SEM", "Optimizing content for search engines."),
            ("Content Strategy", "Planning and creating engaging content."),
            ("Social Media Marketing", "Managing brand presence on social platforms."),
            ("Market Research", "Analyzing market trends and competitor activity."),
        ],
    ),
];

fn pick<'a, R: Rng>(rng: &mut R, options: &[&'a str]) -> &'a str {
    options.choose(rng).copied().unwrap_or_default()
}

/// Generates `count` plausible records with ids `1..=count`.
pub fn generate_mock_records<R: Rng>(rng: &mut R, count: usize) -> Vec<SkillRecord> {
    (0..count)
        .map(|i| {
            let (function, skills) = SKILLS[rng.random_range(0..SKILLS.len())];
            let (skill_name, definition) = skills[rng.random_range(0..skills.len())];
            let band = pick(rng, BAND_ORDER);
            let prefix: String = function.chars().take(3).collect::<String>().to_uppercase();

            SkillRecord {
                id: i as i64 + 1,
                group: pick(rng, GROUPS).to_string(),
                sbu: pick(rng, SBUS).to_string(),
                bu: pick(rng, BUS).to_string(),
                function: function.to_string(),
                ujr_in_ujr_master: format!("{prefix}_{}_{i:03}", band.replace(' ', "")),
                job_role_name: format!("{function} {}", pick(rng, ROLE_SUFFIXES)),
                l1_ujr: pick(rng, L1_UJRS).to_string(),
                competency_type: pick(rng, COMPETENCY_TYPES).to_string(),
                skill_name: skill_name.to_string(),
                skill_definition: definition.to_string(),
                proficiency_level: rng.random_range(1..=5),
                band: band.to_string(),
            }
        })
        .collect()
}
