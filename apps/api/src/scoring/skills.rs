//! Required-skill parsing: job skill fields → ordered, de-duplicated `SkillRequirement`s.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::scoring::normalize::normalize_text;

/// One required competency, already normalized (lowercase, single-spaced).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillRequirement(String);

impl SkillRequirement {
    /// Normalizes `raw`; `None` when nothing is left.
    pub fn new(raw: &str) -> Option<Self> {
        let token = normalize_text(raw);
        if token.is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A job's skill list as it arrives from the job record or the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SkillSpec {
    List(Vec<String>),
    Delimited(String),
}

impl SkillSpec {
    /// Interprets a raw text field. A JSON array of strings (`["Java", "Python"]`)
    /// is taken as a list; anything else as a comma-separated string.
    pub fn parse_raw(raw: &str) -> Self {
        match serde_json::from_str::<Vec<String>>(raw.trim()) {
            Ok(list) => SkillSpec::List(list),
            Err(_) => SkillSpec::Delimited(raw.to_string()),
        }
    }

    /// Normalized requirements in first-seen order, blanks and duplicates removed.
    pub fn requirements(&self) -> Vec<SkillRequirement> {
        match self {
            SkillSpec::List(items) => dedup_requirements(items.iter().map(String::as_str)),
            SkillSpec::Delimited(raw) => dedup_requirements(raw.split(',')),
        }
    }
}

fn dedup_requirements<'a>(items: impl Iterator<Item = &'a str>) -> Vec<SkillRequirement> {
    let mut seen = HashSet::new();
    items
        .filter_map(SkillRequirement::new)
        .filter(|req| seen.insert(req.clone()))
        .collect()
}
