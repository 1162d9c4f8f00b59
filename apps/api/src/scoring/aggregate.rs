//! Score Aggregator — folds skill verdicts and transcript tone into a `ScoreReport`.
//!
//! Never fails: no usable text yields the "Could not extract data" report, and any
//! internal failure (error or panic) yields the "Error calculating score" report.

use std::panic;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::scoring::matcher::{match_skills, MatchResult};
use crate::scoring::normalize::{title_case, NEW_CANDIDATE};
use crate::scoring::sentiment::{score_sentiment, LABEL_NO_AUDIO};
use crate::scoring::skills::SkillRequirement;
use crate::scoring::ScoringError;

pub const FEEDBACK_NO_DATA: &str = "Could not extract data from Resume or Video";
pub const FEEDBACK_ERROR: &str = "Error calculating score";

/// Missing skills named in the feedback sentence.
const FEEDBACK_MISSING_LIMIT: usize = 3;

/// Matched/missing breakdown handed to the presentation layer for charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
///
/// Every field defaults when absent so older stored rows still deserialize.
pub struct GraphData {
    #[serde(default)]
    pub matched: Vec<String>,
    #[serde(default)]
    pub missing: Vec<String>,
    #[serde(default)]
    pub sentiment: String,
}

/// Full result of one scoring run.
///
/// `final_score` is always `clamp(base_score + sentiment_adjustment, 0, 100)`.
/// Skill lists are title-cased for display and keep requirement order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub base_score: u32,
    pub sentiment_adjustment: i32,
    pub final_score: u32,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub sentiment_label: String,
    pub candidate_name: String,
    pub feedback: String,
    pub graph_data: Option<GraphData>,
    pub match_results: Vec<MatchResult>,
}

/// The four values the persistence layer stores per application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreOutcome {
    pub final_score: u32,
    pub feedback: String,
    pub graph_data: Option<GraphData>,
    pub candidate_name: String,
}

impl ScoreReport {
    /// Neither the resume nor the video produced any text.
    pub fn no_data() -> Self {
        Self::zero(FEEDBACK_NO_DATA, LABEL_NO_AUDIO)
    }

    /// Scoring failed internally.
    pub fn failed() -> Self {
        Self::zero(FEEDBACK_ERROR, "")
    }

    fn zero(feedback: &str, sentiment_label: &str) -> Self {
        Self {
            base_score: 0,
            sentiment_adjustment: 0,
            final_score: 0,
            matched_skills: vec![],
            missing_skills: vec![],
            sentiment_label: sentiment_label.to_string(),
            candidate_name: NEW_CANDIDATE.to_string(),
            feedback: feedback.to_string(),
            graph_data: None,
            match_results: vec![],
        }
    }

    pub fn outcome(&self) -> ScoreOutcome {
        ScoreOutcome {
            final_score: self.final_score,
            feedback: self.feedback.clone(),
            graph_data: self.graph_data.clone(),
            candidate_name: self.candidate_name.clone(),
        }
    }
}

/// Produces one verdict per required skill plus the matched count.
pub type SkillMatcher = fn(&[SkillRequirement], &str) -> (Vec<MatchResult>, usize);

/// Scores `candidate_text` (resume + transcript, normalized) against `required`,
/// adjusting for the tone of `transcript_text`.
pub fn aggregate(
    required: &[SkillRequirement],
    candidate_text: &str,
    transcript_text: &str,
    candidate_name: &str,
) -> ScoreReport {
    aggregate_with(
        match_skills,
        required,
        candidate_text,
        transcript_text,
        candidate_name,
    )
}

/// [`aggregate`] with a caller-supplied matcher. Errors and panics from the matcher
/// degrade to [`ScoreReport::failed`].
pub fn aggregate_with(
    matcher: SkillMatcher,
    required: &[SkillRequirement],
    candidate_text: &str,
    transcript_text: &str,
    candidate_name: &str,
) -> ScoreReport {
    if candidate_text.trim().is_empty() && transcript_text.trim().is_empty() {
        debug!("No resume or transcript text; returning no-data report");
        return ScoreReport::no_data();
    }

    let outcome = panic::catch_unwind(|| {
        try_aggregate(
            matcher,
            required,
            candidate_text,
            transcript_text,
            candidate_name,
        )
    });

    match outcome {
        Ok(Ok(report)) => report,
        Ok(Err(e)) => {
            error!("Score aggregation failed: {e}");
            ScoreReport::failed()
        }
        Err(_) => {
            error!("Score aggregation panicked");
            ScoreReport::failed()
        }
    }
}

fn try_aggregate(
    matcher: SkillMatcher,
    required: &[SkillRequirement],
    candidate_text: &str,
    transcript_text: &str,
    candidate_name: &str,
) -> Result<ScoreReport, ScoringError> {
    let (results, matched_count) = matcher(required, candidate_text);
    if results.len() != required.len() {
        return Err(ScoringError::VerdictMismatch {
            verdicts: results.len(),
            required: required.len(),
        });
    }
    let counted = results.iter().filter(|r| r.matched).count();
    if counted != matched_count {
        return Err(ScoringError::MatchCountMismatch {
            reported: matched_count,
            counted,
        });
    }

    let base_score = base_score(matched_count, required.len());
    let sentiment = score_sentiment(transcript_text);
    let final_score = (base_score as i32 + sentiment.adjustment).clamp(0, 100) as u32;

    let (matched, missing): (Vec<&MatchResult>, Vec<&MatchResult>) =
        results.iter().partition(|r| r.matched);
    let matched_skills = display_names(&matched);
    let missing_skills = display_names(&missing);

    let feedback = build_feedback(&missing_skills, &sentiment.label);

    debug!(
        base_score,
        adjustment = sentiment.adjustment,
        final_score,
        "Aggregated candidate score"
    );

    Ok(ScoreReport {
        base_score,
        sentiment_adjustment: sentiment.adjustment,
        final_score,
        graph_data: Some(GraphData {
            matched: matched_skills.clone(),
            missing: missing_skills.clone(),
            sentiment: sentiment.label.clone(),
        }),
        matched_skills,
        missing_skills,
        sentiment_label: sentiment.label,
        candidate_name: candidate_name.to_string(),
        feedback,
        match_results: results,
    })
}

/// `round(matched / total * 100)`, 0 when there is nothing to match.
fn base_score(matched: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let ratio = matched as f64 / total as f64 * 100.0;
    ratio.round().clamp(0.0, 100.0) as u32
}

fn display_names(results: &[&MatchResult]) -> Vec<String> {
    results
        .iter()
        .map(|r| title_case(r.skill.as_str()))
        .collect()
}

fn build_feedback(missing: &[String], sentiment_label: &str) -> String {
    if missing.is_empty() {
        format!("Excellent match! {sentiment_label}")
    } else {
        let shown: Vec<&str> = missing
            .iter()
            .take(FEEDBACK_MISSING_LIMIT)
            .map(String::as_str)
            .collect();
        format!("Missing skills: {}. {sentiment_label}", shown.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::sentiment::{LABEL_NEGATIVE, LABEL_NEUTRAL, LABEL_POSITIVE};
    use crate::scoring::skills::SkillSpec;
    use std::collections::HashSet;

    fn skills(list: &[&str]) -> Vec<SkillRequirement> {
        SkillSpec::List(list.iter().map(|s| s.to_string()).collect()).requirements()
    }

    #[test]
    fn test_no_data_report() {
        let report = aggregate(&skills(&["rust"]), "  ", "", "Jane Roe");
        let outcome = report.outcome();
        assert_eq!(
            outcome,
            ScoreOutcome {
                final_score: 0,
                feedback: FEEDBACK_NO_DATA.to_string(),
                graph_data: None,
                candidate_name: NEW_CANDIDATE.to_string(),
            }
        );
    }

    #[test]
    fn test_scenario_python_react_sql() {
        let report = aggregate(
            &skills(&["Python", "React", "SQL"]),
            "python developer with mysql experience",
            "",
            "Jane Roe",
        );
        assert_eq!(report.base_score, 67);
        assert_eq!(report.final_score, 67);
        assert_eq!(report.matched_skills, vec!["Python", "Sql"]);
        assert_eq!(report.missing_skills, vec!["React"]);
        assert_eq!(report.sentiment_label, LABEL_NO_AUDIO);
        assert_eq!(
            report.feedback,
            format!("Missing skills: React. {LABEL_NO_AUDIO}")
        );
        let graph = report.graph_data.unwrap();
        assert_eq!(graph.matched, vec!["Python", "Sql"]);
        assert_eq!(graph.missing, vec!["React"]);
        assert_eq!(graph.sentiment, LABEL_NO_AUDIO);
    }

    #[test]
    fn test_positive_tone_adds_ten() {
        let transcript = "i am very excited and confident";
        let text = format!("rust go python docker engineer {transcript}");
        let report = aggregate(
            &skills(&["rust", "go", "python", "docker", "kafka"]),
            &text,
            transcript,
            "Jane Roe",
        );
        assert_eq!(report.base_score, 80);
        assert_eq!(report.sentiment_adjustment, 10);
        assert_eq!(report.final_score, 90);
        assert_eq!(report.sentiment_label, LABEL_POSITIVE);
    }

    #[test]
    fn test_negative_tone_floors_at_zero() {
        let transcript = "i am nervous and worried";
        let report = aggregate(&skills(&["kubernetes"]), transcript, transcript, "Jane Roe");
        assert_eq!(report.base_score, 0);
        assert_eq!(report.sentiment_adjustment, -5);
        assert_eq!(report.final_score, 0);
        assert_eq!(report.sentiment_label, LABEL_NEGATIVE);
    }

    #[test]
    fn test_bonus_caps_at_hundred() {
        let transcript = "i am very excited and confident";
        let text = format!("rust developer {transcript}");
        let report = aggregate(&skills(&["rust"]), &text, transcript, "Jane Roe");
        assert_eq!(report.base_score, 100);
        assert_eq!(report.final_score, 100);
        assert!(report.feedback.starts_with("Excellent match! "));
    }

    #[test]
    fn test_empty_skill_list_scores_zero() {
        let report = aggregate(&[], "rust developer", "", "Jane Roe");
        assert_eq!(report.base_score, 0);
        assert_eq!(report.final_score, 0);
        assert!(report.match_results.is_empty());
    }

    #[test]
    fn test_feedback_lists_first_three_missing() {
        let report = aggregate(
            &skills(&["rust", "kafka", "terraform", "graphql", "kotlin"]),
            "rust developer",
            "",
            "Jane Roe",
        );
        assert_eq!(
            report.feedback,
            format!("Missing skills: Kafka, Terraform, Graphql. {LABEL_NO_AUDIO}")
        );
        assert_eq!(report.missing_skills.len(), 4);
    }

    #[test]
    fn test_matched_and_missing_partition_requirements() {
        let required = skills(&["rust", "js", "kafka", "aws", "c++", "sql"]);
        let report = aggregate(
            &required,
            "rust and javascript on ec2 with postgresql",
            "",
            "Jane Roe",
        );
        let matched: HashSet<String> = report.matched_skills.iter().map(|s| s.to_lowercase()).collect();
        let missing: HashSet<String> = report.missing_skills.iter().map(|s| s.to_lowercase()).collect();
        let all: HashSet<String> = required.iter().map(|r| r.as_str().to_string()).collect();

        assert!(matched.is_disjoint(&missing));
        assert_eq!(&matched | &missing, all);
        assert_eq!(report.match_results.len(), required.len());
    }

    #[test]
    fn test_transcript_only_still_scores() {
        let transcript = "i build services in rust";
        let report = aggregate(&skills(&["rust"]), transcript, transcript, NEW_CANDIDATE);
        assert_eq!(report.final_score, 100);
        assert_eq!(report.sentiment_label, LABEL_NEUTRAL);
    }

    #[test]
    fn test_base_score_rounding() {
        assert_eq!(base_score(2, 3), 67);
        assert_eq!(base_score(1, 3), 33);
        assert_eq!(base_score(0, 0), 0);
        assert_eq!(base_score(5, 5), 100);
    }

    fn panicking_matcher(_: &[SkillRequirement], _: &str) -> (Vec<MatchResult>, usize) {
        panic!("matcher blew up");
    }

    fn verdict_dropping_matcher(
        required: &[SkillRequirement],
        text: &str,
    ) -> (Vec<MatchResult>, usize) {
        let (mut results, _) = match_skills(required, text);
        results.pop();
        let matched = results.iter().filter(|r| r.matched).count();
        (results, matched)
    }

    fn overcounting_matcher(
        required: &[SkillRequirement],
        text: &str,
    ) -> (Vec<MatchResult>, usize) {
        let (results, matched) = match_skills(required, text);
        (results, matched + 1)
    }

    fn assert_failed(report: &ScoreReport) {
        assert_eq!(report.final_score, 0);
        assert_eq!(report.feedback, FEEDBACK_ERROR);
        assert!(report.graph_data.is_none());
        assert_eq!(report.candidate_name, NEW_CANDIDATE);
    }

    #[test]
    fn test_matcher_panic_degrades_to_error_report() {
        let report = aggregate_with(
            panicking_matcher,
            &skills(&["rust"]),
            "rust developer",
            "",
            "Jane Roe",
        );
        assert_failed(&report);
    }

    #[test]
    fn test_missing_verdict_degrades_to_error_report() {
        let report = aggregate_with(
            verdict_dropping_matcher,
            &skills(&["rust", "go"]),
            "rust and go developer",
            "",
            "Jane Roe",
        );
        assert_failed(&report);
    }

    #[test]
    fn test_inconsistent_match_count_degrades_to_error_report() {
        let report = aggregate_with(
            overcounting_matcher,
            &skills(&["rust"]),
            "rust developer",
            "",
            "Jane Roe",
        );
        assert_failed(&report);
    }

    #[test]
    fn test_no_data_short_circuits_before_matcher() {
        let report = aggregate_with(panicking_matcher, &skills(&["rust"]), "", " ", "Jane Roe");
        assert_eq!(report.feedback, FEEDBACK_NO_DATA);
    }
}
