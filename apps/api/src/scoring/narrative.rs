//! Template-driven narrative for heuristic results, and the list
//! normalization shared by every strategy.

use super::heuristic::ResumeSignals;
use super::tables::{Section, OPTIMAL_WORDS, REPORTED_SECTIONS};
use super::ScoreBreakdown;

pub const MIN_LIST_ITEMS: usize = 4;
pub const MAX_STRENGTHS: usize = 6;
pub const MAX_IMPROVEMENTS: usize = 6;
pub const MAX_RECOMMENDATIONS: usize = 7;

pub const STRENGTH_FILLERS: &[&str] = &[
    "Resume successfully parsed without critical ATS errors",
    "Contact information properly formatted for ATS extraction",
    "Professional language and tone throughout document",
    "Document text is machine-readable and ready for keyword scanning",
];

pub const IMPROVEMENT_FILLERS: &[&str] = &[
    "Tailor the resume for each application by mirroring the job posting's language",
    "Lead each bullet point with a strong action verb followed by a measurable result",
    "Keep formatting simple: standard fonts and no tables, text boxes or graphics",
    "Proofread for consistent tense, punctuation and date formats",
];

pub const RECOMMENDATION_FILLERS: &[&str] = &[
    "Use the STAR method (Situation, Task, Action, Result) for each experience bullet point",
    "Mirror key terms from job descriptions - ATS systems scan for exact keyword matches",
    "Place most relevant skills and keywords in the top third of your resume for visibility",
    "Update your LinkedIn profile to match your resume for consistency across platforms",
];

/// Drops blanks and duplicates (first occurrence wins), pads from `fillers`
/// up to [`MIN_LIST_ITEMS`], then truncates to `max`.
pub fn finalize_list<I>(items: I, fillers: &[&str], max: usize) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut list: Vec<String> = Vec::new();
    for item in items {
        push_unique(&mut list, item);
    }
    for filler in fillers {
        if list.len() >= MIN_LIST_ITEMS {
            break;
        }
        push_unique(&mut list, filler.to_string());
    }
    list.truncate(max);
    list
}

fn push_unique(list: &mut Vec<String>, item: String) {
    let item = item.trim();
    if !item.is_empty() && !list.iter().any(|existing| existing == item) {
        list.push(item.to_string());
    }
}

pub fn overall_feedback(score: u32) -> String {
    match score {
        90.. => format!(
            "Exceptional resume with a score of {score}/100! Your resume demonstrates outstanding \
             ATS optimization with strong quantified achievements, excellent keyword coverage, and \
             professional formatting. You're well-positioned for top-tier opportunities."
        ),
        80..=89 => format!(
            "Excellent resume scoring {score}/100. Your resume shows strong ATS compatibility with \
             good keyword usage and clear structure. Minor optimizations could push you into the \
             exceptional range."
        ),
        70..=79 => format!(
            "Very good resume with a score of {score}/100. You have a solid foundation with room \
             for improvement. Focus on adding more quantified achievements and industry-specific \
             keywords."
        ),
        60..=69 => format!(
            "Good resume scoring {score}/100. Your resume has potential but needs optimization. \
             Prioritize adding measurable results and tailoring content to specific job \
             descriptions."
        ),
        50..=59 => format!(
            "Fair resume with a score of {score}/100. There's significant room for improvement. \
             Focus on quantifying achievements, adding relevant keywords, and improving document \
             structure."
        ),
        40..=49 => format!(
            "Your resume scores {score}/100 and needs substantial work. Review the recommendations \
             below and prioritize adding quantified achievements and industry keywords."
        ),
        _ => format!(
            "Your resume scores {score}/100 and requires significant revision. Focus on adding \
             essential sections, quantified achievements, and proper formatting for ATS \
             compatibility."
        ),
    }
}

/// One line each for contact, structure, keywords, achievements and formatting.
pub fn category_feedback(
    signals: &ResumeSignals,
    breakdown: &ScoreBreakdown,
) -> Vec<(String, String)> {
    let missing_contact: Vec<&str> = [
        (signals.has_email, "email"),
        (signals.has_phone, "phone number"),
        (signals.has_linkedin, "LinkedIn URL"),
        (signals.has_location, "location"),
        (signals.has_professional_link, "portfolio or GitHub link"),
    ]
    .iter()
    .filter(|(present, _)| !present)
    .map(|(_, label)| *label)
    .collect();
    let contact = if missing_contact.is_empty() {
        "Contact details are complete and easy for an ATS to extract.".to_string()
    } else {
        format!(
            "Contact score {}/100. Missing: {}.",
            breakdown.contact,
            missing_contact.join(", ")
        )
    };

    let missing_essentials = missing_sections(signals, true);
    let structure = if missing_essentials.is_empty() {
        format!(
            "All essential sections found ({} recognized in total).",
            signals.found_sections.len()
        )
    } else {
        format!(
            "{} sections recognized; essential sections missing: {}.",
            signals.found_sections.len(),
            missing_essentials.join(", ")
        )
    };

    let keywords = match signals.keyword_count {
        15.. => format!(
            "Strong keyword coverage with {} recognized industry terms.",
            signals.keyword_count
        ),
        7..=14 => format!(
            "Moderate keyword coverage ({} recognized terms); add more role-specific terminology.",
            signals.keyword_count
        ),
        n => format!("Low keyword coverage ({n} recognized terms); ATS filters may pass over this resume."),
    };

    let achievements = match signals.quantified_achievements {
        0 => "No quantified achievements detected; add numbers, percentages or amounts."
            .to_string(),
        n @ 1..=4 => {
            format!("{n} quantified achievements detected; aim for at least five measurable results.")
        }
        n => format!("{n} quantified achievements detected, demonstrating measurable impact."),
    };

    let mut formatting = format!(
        "{} bullet points over {} words.",
        signals.bullet_points, signals.word_count
    );
    if signals.possible_table {
        formatting.push_str(" Table-like layout detected; ATS parsers often scramble tables.");
    }
    if !signals.optimal_length {
        formatting.push_str(&format!(
            " Aim for {}-{} words.",
            OPTIMAL_WORDS.0, OPTIMAL_WORDS.1
        ));
    }

    vec![
        ("contact".to_string(), contact),
        ("structure".to_string(), structure),
        ("keywords".to_string(), keywords),
        ("achievements".to_string(), achievements),
        ("formatting".to_string(), formatting),
    ]
}

fn missing_sections(signals: &ResumeSignals, essential_only: bool) -> Vec<&'static str> {
    REPORTED_SECTIONS
        .iter()
        .copied()
        .filter(|section| !essential_only || section.is_essential())
        .filter(|section| !signals.found_sections.contains(section))
        .map(Section::as_str)
        .collect()
}

pub fn strengths(signals: &ResumeSignals, breakdown: &ScoreBreakdown) -> Vec<String> {
    let mut items = Vec::new();

    match signals.quantified_achievements {
        n if n >= 5 => items.push(format!(
            "Strong use of quantified achievements ({n} measurable results identified)"
        )),
        n if n >= 2 => {
            items.push("Includes quantified achievements demonstrating measurable impact".into())
        }
        _ => {}
    }

    if signals.high_impact_verbs.len() >= 3 {
        items.push(
            "Excellent use of high-impact action verbs that convey leadership and results".into(),
        );
    }

    match signals.keyword_count {
        n if n >= 15 => items.push(format!(
            "Rich keyword content with {n}+ relevant professional terms"
        )),
        n if n >= 10 => items.push("Good industry-relevant keyword coverage".into()),
        _ => {}
    }

    if breakdown.formatting >= 80 {
        items.push("Clean, ATS-optimized formatting with effective use of bullet points".into());
    }

    if signals.has_linkedin && signals.has_professional_link {
        items.push("Professional online presence with LinkedIn and portfolio links".into());
    } else if signals.has_linkedin {
        items.push("Includes LinkedIn profile for professional networking".into());
    }

    match signals.found_sections.len() {
        n if n >= 5 => items.push(
            "Comprehensive resume structure with all essential and recommended sections".into(),
        ),
        4 => items.push("Well-organized resume with clear section structure".into()),
        _ => {}
    }

    if signals.career_progression >= 2 {
        items.push("Demonstrates clear career progression and professional growth".into());
    }

    if signals.optimal_length {
        items.push("Optimal resume length for ATS parsing and recruiter review".into());
    }

    finalize_list(items, STRENGTH_FILLERS, MAX_STRENGTHS)
}

pub fn improvements(
    signals: &ResumeSignals,
    breakdown: &ScoreBreakdown,
    has_job_description: bool,
) -> Vec<String> {
    let mut items = Vec::new();

    if signals.quantified_achievements < 3 {
        items.push(
            "Add more quantified achievements with specific metrics (percentages, dollar amounts, user counts)"
                .to_string(),
        );
    }
    if signals.keyword_count < 10 {
        items.push("Incorporate more industry-relevant keywords and technical terminology".into());
    }
    if !signals.has_linkedin {
        items.push("Add LinkedIn profile URL to strengthen professional presence".into());
    }
    if signals.high_impact_verbs.len() < 3 {
        items.push(
            "Replace passive language with high-impact action verbs (achieved, delivered, transformed)"
                .into(),
        );
    }
    if !signals.optimal_length {
        if signals.word_count < OPTIMAL_WORDS.0 {
            items.push(format!(
                "Expand content with more detail about achievements and responsibilities (aim for {}-{} words)",
                OPTIMAL_WORDS.0, OPTIMAL_WORDS.1
            ));
        } else if signals.word_count > OPTIMAL_WORDS.1 {
            items.push(
                "Consider condensing content to 1-2 pages for optimal recruiter attention".into(),
            );
        }
    }
    if signals.bullet_points < 10 {
        items.push("Use more bullet points to improve readability and ATS parsing".into());
    }

    let missing = missing_sections(signals, false);
    if !missing.is_empty() {
        let shown: Vec<&str> = missing.into_iter().take(3).collect();
        items.push(format!(
            "Consider adding missing sections: {}",
            shown.join(", ")
        ));
    }

    if has_job_description && breakdown.jd_match < 60 {
        items.push("Tailor resume content to better match the specific job requirements".into());
    }

    finalize_list(items, IMPROVEMENT_FILLERS, MAX_IMPROVEMENTS)
}

pub fn recommendations(signals: &ResumeSignals, breakdown: &ScoreBreakdown) -> Vec<String> {
    let mut items = vec![format!(
        "Quantify your impact: Transform statements like 'improved sales' into 'increased sales by \
         25% ($2M revenue)' - you currently have {} quantified achievements",
        signals.quantified_achievements
    )];
    items.extend(RECOMMENDATION_FILLERS.iter().map(|r| r.to_string()));

    if signals.keyword_count < 15 {
        items.insert(
            0,
            format!(
                "Increase keyword density: Add {} more relevant technical/industry terms throughout your resume",
                15 - signals.keyword_count
            ),
        );
    }
    if !signals.has_professional_link {
        items.push("Add a GitHub or portfolio link to showcase your work samples".into());
    }
    if breakdown.achievements < 60 {
        items.insert(
            1,
            "Focus on outcomes over duties: Replace 'Responsible for...' with 'Achieved/Delivered...'"
                .into(),
        );
    }

    finalize_list(items, RECOMMENDATION_FILLERS, MAX_RECOMMENDATIONS)
}
