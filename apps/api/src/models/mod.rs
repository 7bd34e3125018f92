pub mod record;

pub use record::SkillRecord;
