// LLM prompt templates for resume scoring.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Full remote analysis. Placeholders: `{resume_text}`, `{job_section}`,
/// `{specificity}`.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze the following resume and provide a comprehensive ATS evaluation.

RESUME:
{resume_text}

{job_section}

Return a JSON object with this EXACT schema (no extra fields):
{
  "ats_score": <integer from 0 to 100>,
  "overall_feedback": "<2-3 sentence overall assessment>",
  "summary_feedback": "<feedback on the summary or objective>",
  "skills_feedback": "<feedback on the skills section>",
  "experience_feedback": "<feedback on the experience section>",
  "education_feedback": "<feedback on the education section>",
  "strengths": ["<strength 1>", "<strength 2>", "<strength 3>", "<strength 4>"],
  "improvements": ["<improvement 1>", "<improvement 2>", "<improvement 3>", "<improvement 4>"],
  "recommendations": ["<recommendation 1>", "<recommendation 2>", "<recommendation 3>", "<recommendation 4>"],
  "matched_keywords": ["<keyword present in the resume>"],
  "missing_keywords": ["<important keyword the resume lacks>"]
}

Consider:
1. ATS compatibility (formatting, keywords, structure)
2. Content quality and relevance
3. Quantified, measurable achievements
4. Completeness of contact information and sections
5. Alignment with the job description (if provided)

{specificity}"#;

/// Hybrid-mode insights layered on the heuristic result. Placeholders:
/// `{resume_text}`, `{job_section}`, `{specificity}`.
pub const INSIGHTS_PROMPT_TEMPLATE: &str = r#"Analyze this resume and provide specific, actionable insights that complement an automated keyword and structure analysis.

RESUME:
{resume_text}

{job_section}

Return a JSON object with this EXACT schema (no extra fields):
{
  "ai_score_adjustment": <integer from -10 to 10, adjustment to the automated score>,
  "ai_overall_feedback": "<2-3 sentence professional assessment>",
  "ai_strengths": ["<specific strength 1>", "<specific strength 2>"],
  "ai_improvements": ["<specific improvement 1>", "<specific improvement 2>"],
  "ai_keyword_suggestions": ["<keyword 1>", "<keyword 2>", "<keyword 3>"],
  "ai_recommendations": ["<actionable recommendation 1>", "<actionable recommendation 2>"]
}

Focus on:
1. Content quality and professional impact
2. Industry-specific insights
3. Strengths or concerns a keyword scan would miss
4. Career positioning advice

{specificity}"#;

pub const NO_JOB_DESCRIPTION: &str =
    "No specific job description provided - analyze for general ATS optimization.";

/// Single-pass `{key}` substitution. Substituted values are never rescanned,
/// so braces inside the resume text pass through untouched.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let extra: usize = values.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(pos) = rest.find('{') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        let hit = values
            .iter()
            .find(|(key, _)| tail.starts_with(key) && tail[key.len()..].starts_with('}'));
        match hit {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}
