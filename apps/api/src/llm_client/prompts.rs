// Shared prompt fragments.
// Each service that calls the LLM keeps its own prompts.rs alongside it;
// this file only holds the cross-cutting pieces.

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are an expert ATS (Applicant Tracking System) analyst \
    and HR professional. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Appended to every analysis prompt so feedback stays grounded in the document.
pub const SPECIFICITY_INSTRUCTION: &str = "\
Be specific and reference actual content from the resume. \
Do NOT invent experience, employers, or skills the resume does not mention.";
