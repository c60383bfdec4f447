//! Remote scoring: prompt construction and tolerant decoding of model replies.
//!
//! Transport and service failures are surfaced to the caller; a reply that
//! arrives but cannot be decoded degrades to [`default_remote_analysis`].

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use super::narrative::{
    finalize_list, IMPROVEMENT_FILLERS, MAX_IMPROVEMENTS, MAX_RECOMMENDATIONS, MAX_STRENGTHS,
    RECOMMENDATION_FILLERS, STRENGTH_FILLERS,
};
use super::prompts::{
    fill_template, ANALYSIS_PROMPT_TEMPLATE, INSIGHTS_PROMPT_TEMPLATE, NO_JOB_DESCRIPTION,
};
use super::tables::{MAX_MISSING_KEYWORDS, MAX_PRESENT_KEYWORDS};
use super::{clamp_score, AnalysisResult, ScoringStrategy};
use crate::llm_client::prompts::SPECIFICITY_INSTRUCTION;
use crate::llm_client::{extract_json_object, truncate_chars};

pub const RESUME_WINDOW_CHARS: usize = 4000;
pub const JD_WINDOW_CHARS: usize = 1500;
pub const ANALYSIS_MAX_TOKENS: u32 = 2000;
pub const INSIGHTS_MAX_TOKENS: u32 = 1500;
pub const TEMPERATURE: f32 = 0.3;

pub const DEFAULT_REMOTE_SCORE: u32 = 75;
pub const DEFAULT_REMOTE_FEEDBACK: &str = "Resume analysis completed.";

fn job_section(job_description: Option<&str>) -> String {
    match job_description.map(str::trim).filter(|jd| !jd.is_empty()) {
        Some(jd) => format!("JOB DESCRIPTION:\n{}", truncate_chars(jd, JD_WINDOW_CHARS)),
        None => NO_JOB_DESCRIPTION.to_string(),
    }
}

fn build_prompt(template: &str, resume_text: &str, job_description: Option<&str>) -> String {
    let job_section = job_section(job_description);
    fill_template(
        template,
        &[
            ("resume_text", truncate_chars(resume_text, RESUME_WINDOW_CHARS)),
            ("job_section", job_section.as_str()),
            ("specificity", SPECIFICITY_INSTRUCTION),
        ],
    )
}

pub fn build_analysis_prompt(resume_text: &str, job_description: Option<&str>) -> String {
    build_prompt(ANALYSIS_PROMPT_TEMPLATE, resume_text, job_description)
}

pub fn build_insights_prompt(resume_text: &str, job_description: Option<&str>) -> String {
    build_prompt(INSIGHTS_PROMPT_TEMPLATE, resume_text, job_description)
}

// ────────────────────────────────────────────────────────────────────────────
// Full analysis reply
// ────────────────────────────────────────────────────────────────────────────

// Field-level decoders: a value of the wrong shape is dropped so only that
// field is backfilled, never the whole reply.

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    })
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// A bare string counts as a one-item list; non-string items are skipped.
fn lenient_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<String>>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        Value::String(s) => Some(vec![s]),
        _ => None,
    })
}

/// Reply shape for the full analysis. Every field is optional and the older
/// field names are accepted as aliases.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RemoteAnalysis {
    #[serde(alias = "score", deserialize_with = "lenient_number")]
    ats_score: Option<f64>,
    #[serde(alias = "feedback", deserialize_with = "lenient_text")]
    overall_feedback: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    summary_feedback: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    skills_feedback: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    experience_feedback: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    education_feedback: Option<String>,
    #[serde(alias = "pros", deserialize_with = "lenient_list")]
    strengths: Option<Vec<String>>,
    #[serde(
        alias = "cons",
        alias = "areas_for_improvement",
        deserialize_with = "lenient_list"
    )]
    improvements: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_list")]
    recommendations: Option<Vec<String>>,
    #[serde(
        alias = "keywords_found",
        alias = "present_keywords",
        deserialize_with = "lenient_list"
    )]
    matched_keywords: Option<Vec<String>>,
    #[serde(alias = "keywords_missing", deserialize_with = "lenient_list")]
    missing_keywords: Option<Vec<String>>,
}

impl RemoteAnalysis {
    fn into_result(self) -> AnalysisResult {
        let mut feedback = BTreeMap::new();
        let overall = self
            .overall_feedback
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REMOTE_FEEDBACK.to_string());
        feedback.insert("overall".to_string(), overall);
        for (category, text) in [
            ("summary", self.summary_feedback),
            ("skills", self.skills_feedback),
            ("experience", self.experience_feedback),
            ("education", self.education_feedback),
        ] {
            if let Some(text) = text.filter(|t| !t.trim().is_empty()) {
                feedback.insert(category.to_string(), text);
            }
        }

        AnalysisResult {
            ats_score: self
                .ats_score
                .map_or(DEFAULT_REMOTE_SCORE, |score| clamp_score(score.round())),
            strategy: ScoringStrategy::Remote,
            feedback,
            strengths: finalize_list(
                self.strengths.unwrap_or_default(),
                STRENGTH_FILLERS,
                MAX_STRENGTHS,
            ),
            improvements: finalize_list(
                self.improvements.unwrap_or_default(),
                IMPROVEMENT_FILLERS,
                MAX_IMPROVEMENTS,
            ),
            recommendations: finalize_list(
                self.recommendations.unwrap_or_default(),
                RECOMMENDATION_FILLERS,
                MAX_RECOMMENDATIONS,
            ),
            matched_keywords: keyword_list(self.matched_keywords, MAX_PRESENT_KEYWORDS),
            missing_keywords: keyword_list(self.missing_keywords, MAX_MISSING_KEYWORDS),
            breakdown: None,
            metrics: None,
        }
    }
}

/// Ordered, de-duplicated keyword set without padding.
fn keyword_list(keywords: Option<Vec<String>>, max: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for keyword in keywords.unwrap_or_default() {
        let keyword = keyword.trim();
        if !keyword.is_empty() && !out.iter().any(|k| k.eq_ignore_ascii_case(keyword)) {
            out.push(keyword.to_string());
        }
    }
    out.truncate(max);
    out
}

/// Result used when the model replied but the reply could not be decoded.
pub fn default_remote_analysis() -> AnalysisResult {
    RemoteAnalysis {
        strengths: Some(vec![
            "Professional experience included".to_string(),
            "Educational background present".to_string(),
        ]),
        improvements: Some(vec![
            "Add more specific achievements".to_string(),
            "Include relevant keywords".to_string(),
        ]),
        ..RemoteAnalysis::default()
    }
    .into_result()
}

/// Decodes a full-analysis reply, falling back to the default result.
pub fn parse_analysis_reply(reply: &str) -> AnalysisResult {
    let decoded = extract_json_object(reply)
        .ok_or_else(|| "no JSON object in reply".to_string())
        .and_then(|json| {
            serde_json::from_str::<RemoteAnalysis>(json).map_err(|e| e.to_string())
        });

    match decoded {
        Ok(analysis) => analysis.into_result(),
        Err(reason) => {
            warn!("Unreadable remote analysis ({reason}); using default result");
            default_remote_analysis()
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Hybrid insights reply
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RemoteInsights {
    #[serde(deserialize_with = "lenient_number")]
    pub ai_score_adjustment: Option<f64>,
    #[serde(deserialize_with = "lenient_text")]
    pub ai_overall_feedback: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub ai_strengths: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_list")]
    pub ai_improvements: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_list")]
    pub ai_keyword_suggestions: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_list")]
    pub ai_recommendations: Option<Vec<String>>,
}

/// Decodes an insights reply. `None` when no usable JSON object is present.
pub fn parse_insights_reply(reply: &str) -> Option<RemoteInsights> {
    let json = extract_json_object(reply)?;
    match serde_json::from_str::<RemoteInsights>(json) {
        Ok(insights) => Some(insights),
        Err(e) => {
            warn!("Unreadable remote insights: {e}");
            None
        }
    }
}
