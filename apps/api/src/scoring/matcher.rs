//! Skill Matcher — decides, per required skill, whether candidate text covers it.
//!
//! Strategies run in priority order and stop at the first hit:
//! 1. exact substring of the normalized text
//! 2. any alias from the synonym table appears as a substring
//! 3. partial token-set similarity strictly above `FUZZY_THRESHOLD`
//!
//! Works on normalized lowercase tokens only; display casing happens in `aggregate`.

use serde::{Deserialize, Serialize};

use crate::scoring::fuzzy::partial_token_set_ratio;
use crate::scoring::skills::SkillRequirement;
use crate::scoring::synonyms::aliases_for;

/// Similarity (0–100) a fuzzy comparison must exceed to count as a match.
pub const FUZZY_THRESHOLD: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    Exact,
    Synonym,
    Fuzzy,
}

/// Verdict for one required skill. `method` is set only when `matched`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub skill: SkillRequirement,
    pub matched: bool,
    pub method: Option<MatchMethod>,
}

type Strategy = fn(skill: &str, text: &str) -> bool;

const STRATEGIES: &[(MatchMethod, Strategy)] = &[
    (MatchMethod::Exact, exact_match),
    (MatchMethod::Synonym, synonym_match),
    (MatchMethod::Fuzzy, fuzzy_match),
];

fn exact_match(skill: &str, text: &str) -> bool {
    text.contains(skill)
}

fn synonym_match(skill: &str, text: &str) -> bool {
    aliases_for(skill).is_some_and(|aliases| aliases.iter().any(|alias| text.contains(alias)))
}

fn fuzzy_match(skill: &str, text: &str) -> bool {
    partial_token_set_ratio(skill, text) > FUZZY_THRESHOLD
}

/// Matches one skill against normalized candidate text.
pub fn match_skill(skill: &SkillRequirement, candidate_text: &str) -> MatchResult {
    let method = STRATEGIES
        .iter()
        .find(|(_, strategy)| strategy(skill.as_str(), candidate_text))
        .map(|(method, _)| *method);

    MatchResult {
        skill: skill.clone(),
        matched: method.is_some(),
        method,
    }
}

/// One verdict per required skill, in input order, plus the number matched.
pub fn match_skills(
    required: &[SkillRequirement],
    candidate_text: &str,
) -> (Vec<MatchResult>, usize) {
    let results: Vec<MatchResult> = required
        .iter()
        .map(|skill| match_skill(skill, candidate_text))
        .collect();
    let matched = results.iter().filter(|r| r.matched).count();
    (results, matched)
}
