//! Resume Scoring: pluggable, trait-based scorers over extracted resume text.
//!
//! - `HeuristicScorer`: deterministic, offline, never fails.
//! - `RemoteScorer`: delegates the whole analysis to the LLM.
//! - `HybridScorer`: heuristic result as the base, nudged by LLM insights.
//!
//! `AppState` holds an `Arc<dyn ResumeScorer>`, chosen once at startup.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{Config, ScoringMode};
use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{ChatCompletionsClient, GenerationRequest, LlmError, TextGenerationClient};

pub mod handlers;
pub mod heuristic;
pub mod merge;
pub mod narrative;
pub mod prompts;
pub mod remote;
pub mod tables;
pub mod upload;

use heuristic::ResumeSignals;

// ────────────────────────────────────────────────────────────────────────────
// Output data models (shared across all scorer backends)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringStrategy {
    Heuristic,
    Remote,
    Hybrid,
}

impl ScoringStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            ScoringStrategy::Heuristic => "heuristic",
            ScoringStrategy::Remote => "remote",
            ScoringStrategy::Hybrid => "hybrid",
        }
    }
}

/// Per-category heuristic sub-scores, each 0 – 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub contact: u32,
    pub structure: u32,
    pub keywords: u32,
    pub achievements: u32,
    pub verbs: u32,
    pub formatting: u32,
    pub content: u32,
    pub ats_compat: u32,
    pub jd_match: u32,
}

/// Full analysis returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub ats_score: u32, // 0 – 100
    pub strategy: ScoringStrategy,
    pub feedback: BTreeMap<String, String>, // category → text, always has "overall"
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub recommendations: Vec<String>,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ScoreBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<ResumeSignals>,
}

/// Rounds toward zero and clamps into 0 – 100. NaN maps to 0.
pub fn clamp_score(raw: f64) -> u32 {
    if raw.is_nan() {
        return 0;
    }
    raw.clamp(0.0, 100.0) as u32
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap scoring backends without touching the handler.
#[async_trait]
pub trait ResumeScorer: Send + Sync {
    async fn score(
        &self,
        resume_text: &str,
        job_description: Option<&str>,
    ) -> Result<AnalysisResult, AppError>;

    fn strategy(&self) -> ScoringStrategy;
}

// ────────────────────────────────────────────────────────────────────────────
// HeuristicScorer
// ────────────────────────────────────────────────────────────────────────────

pub struct HeuristicScorer;

#[async_trait]
impl ResumeScorer for HeuristicScorer {
    async fn score(
        &self,
        resume_text: &str,
        job_description: Option<&str>,
    ) -> Result<AnalysisResult, AppError> {
        Ok(heuristic::analyze_resume(resume_text, job_description))
    }

    fn strategy(&self) -> ScoringStrategy {
        ScoringStrategy::Heuristic
    }
}

// ────────────────────────────────────────────────────────────────────────────
// RemoteScorer
// ────────────────────────────────────────────────────────────────────────────

pub struct RemoteScorer {
    client: Arc<dyn TextGenerationClient>,
}

impl RemoteScorer {
    pub fn new(client: Arc<dyn TextGenerationClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResumeScorer for RemoteScorer {
    async fn score(
        &self,
        resume_text: &str,
        job_description: Option<&str>,
    ) -> Result<AnalysisResult, AppError> {
        let prompt = remote::build_analysis_prompt(resume_text, job_description);
        let request = GenerationRequest {
            system: Some(JSON_ONLY_SYSTEM),
            prompt: &prompt,
            max_tokens: remote::ANALYSIS_MAX_TOKENS,
            temperature: remote::TEMPERATURE,
        };

        match self.client.generate(request).await {
            Ok(reply) => Ok(remote::parse_analysis_reply(&reply)),
            // A reply with nothing in it is treated like an unreadable one.
            Err(LlmError::EmptyContent) => {
                warn!("Remote model returned empty content; using default result");
                Ok(remote::default_remote_analysis())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn strategy(&self) -> ScoringStrategy {
        ScoringStrategy::Remote
    }
}

// ────────────────────────────────────────────────────────────────────────────
// HybridScorer
// ────────────────────────────────────────────────────────────────────────────

pub struct HybridScorer {
    client: Arc<dyn TextGenerationClient>,
}

impl HybridScorer {
    pub fn new(client: Arc<dyn TextGenerationClient>) -> Self {
        Self { client }
    }

    async fn insights(
        &self,
        resume_text: &str,
        job_description: Option<&str>,
    ) -> Option<remote::RemoteInsights> {
        let prompt = remote::build_insights_prompt(resume_text, job_description);
        let request = GenerationRequest {
            system: Some(JSON_ONLY_SYSTEM),
            prompt: &prompt,
            max_tokens: remote::INSIGHTS_MAX_TOKENS,
            temperature: remote::TEMPERATURE,
        };

        match self.client.generate(request).await {
            Ok(reply) => remote::parse_insights_reply(&reply),
            Err(e) => {
                warn!("Remote insights unavailable ({e}); returning heuristic result");
                None
            }
        }
    }
}

#[async_trait]
impl ResumeScorer for HybridScorer {
    async fn score(
        &self,
        resume_text: &str,
        job_description: Option<&str>,
    ) -> Result<AnalysisResult, AppError> {
        let base = heuristic::analyze_resume(resume_text, job_description);

        Ok(match self.insights(resume_text, job_description).await {
            Some(insights) => merge::merge_insights(base, insights),
            None => base,
        })
    }

    fn strategy(&self) -> ScoringStrategy {
        ScoringStrategy::Hybrid
    }
}

/// Picks the scorer for this process. Without an API key the heuristic is
/// the only option.
pub fn build_scorer(config: &Config) -> anyhow::Result<Arc<dyn ResumeScorer>> {
    let Some(api_key) = config.groq_api_key.clone() else {
        info!("GROQ_API_KEY not set; using heuristic scorer");
        return Ok(Arc::new(HeuristicScorer));
    };

    let client: Arc<dyn TextGenerationClient> = Arc::new(ChatCompletionsClient::new(
        api_key,
        config.llm_api_url.clone(),
        config.llm_model.clone(),
        config.llm_timeout,
    )?);
    info!("LLM client initialized (model: {})", client.model());

    Ok(match config.scoring_mode {
        ScoringMode::Hybrid => Arc::new(HybridScorer::new(client)),
        ScoringMode::Remote => Arc::new(RemoteScorer::new(client)),
    })
}
