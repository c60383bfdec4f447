use super::narrative::{
    finalize_list, overall_feedback, IMPROVEMENT_FILLERS, MAX_IMPROVEMENTS, MAX_RECOMMENDATIONS,
    MAX_STRENGTHS, RECOMMENDATION_FILLERS, STRENGTH_FILLERS,
};
use super::remote::RemoteInsights;
use super::tables::MAX_MISSING_KEYWORDS;
use super::{AnalysisResult, ScoringStrategy};

pub const MAX_SCORE_ADJUSTMENT: i64 = 10;

const REMOTE_STRENGTHS: usize = 2;
const REMOTE_IMPROVEMENTS: usize = 2;
const REMOTE_RECOMMENDATIONS: usize = 2;
const REMOTE_KEYWORDS: usize = 3;

/// Layers remote insights over a heuristic result. The heuristic score stays
/// the base; the remote side can only move it by ±[`MAX_SCORE_ADJUSTMENT`].
pub fn merge_insights(base: AnalysisResult, insights: RemoteInsights) -> AnalysisResult {
    let adjustment = insights
        .ai_score_adjustment
        .filter(|a| a.is_finite())
        .map_or(0, |a| (a.round() as i64).clamp(-MAX_SCORE_ADJUSTMENT, MAX_SCORE_ADJUSTMENT));
    let ats_score = (i64::from(base.ats_score) + adjustment).clamp(0, 100) as u32;

    let mut feedback = base.feedback;
    let overall = insights
        .ai_overall_feedback
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| overall_feedback(ats_score));
    feedback.insert("overall".to_string(), overall);

    let missing_keywords = match insights.ai_keyword_suggestions {
        Some(suggested) if !suggested.is_empty() => {
            let mut merged = remote_first(suggested, REMOTE_KEYWORDS, base.missing_keywords);
            merged.truncate(MAX_MISSING_KEYWORDS);
            merged
        }
        _ => base.missing_keywords,
    };

    AnalysisResult {
        ats_score,
        strategy: ScoringStrategy::Hybrid,
        feedback,
        strengths: finalize_list(
            remote_first(
                insights.ai_strengths.unwrap_or_default(),
                REMOTE_STRENGTHS,
                base.strengths,
            ),
            STRENGTH_FILLERS,
            MAX_STRENGTHS,
        ),
        improvements: finalize_list(
            remote_first(
                insights.ai_improvements.unwrap_or_default(),
                REMOTE_IMPROVEMENTS,
                base.improvements,
            ),
            IMPROVEMENT_FILLERS,
            MAX_IMPROVEMENTS,
        ),
        recommendations: finalize_list(
            remote_first(
                insights.ai_recommendations.unwrap_or_default(),
                REMOTE_RECOMMENDATIONS,
                base.recommendations,
            ),
            RECOMMENDATION_FILLERS,
            MAX_RECOMMENDATIONS,
        ),
        matched_keywords: base.matched_keywords,
        missing_keywords,
        breakdown: base.breakdown,
        metrics: base.metrics,
    }
}

/// First `take` remote items, then local items the remote list did not mention.
fn remote_first(remote: Vec<String>, take: usize, local: Vec<String>) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(take + local.len());
    for item in remote.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        if merged.len() >= take {
            break;
        }
        if !merged.iter().any(|m| m == item) {
            merged.push(item.to_string());
        }
    }
    for item in local {
        if !remote.iter().any(|r| r.trim() == item) && !merged.contains(&item) {
            merged.push(item);
        }
    }
    merged
}
