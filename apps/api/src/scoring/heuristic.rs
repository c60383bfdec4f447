//! Deterministic resume analysis.
//!
//! Pure function of (resume text, optional job description, static tables).
//! Nine signal groups are scored 0–100 each, combined with [`WEIGHTS`], then
//! capped by the hard ceilings for missing essentials. Document counts are
//! reported as metrics only.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use super::narrative;
use super::tables::{
    Section, VerbTier, ACCEPTABLE_WORDS, ACHIEVEMENT_PATTERNS, BULLET_GLYPHS, BUSINESS_KEYWORDS,
    CITY_STATE_RE, DASH_BULLET_RE, DATE_FORMAT_RE, EMAIL_RE, ESSENTIAL_SECTION_POINTS,
    EXPERIENCE_START_RE, FEW_SECTIONS_CEILING, HEADER_RE, JD_STOPWORDS, JD_TOKEN_RE,
    JD_TOP_KEYWORDS, KEYWORD_PATTERNS, LOCATION_INDICATORS, MATCH_STOPWORDS, MATCH_TOKEN_RE,
    MAX_MISSING_KEYWORDS, MAX_PRESENT_KEYWORDS, MAX_SUGGESTED_KEYWORDS, MIN_RECOGNIZED_SECTIONS,
    NEUTRAL_JD_SCORE, NON_ASCII_RUN_RE, NO_ACHIEVEMENTS_CEILING, NO_EMAIL_CEILING,
    OPTIMAL_WORDS, PHONE_RE, PROBLEMATIC_CHARS, PROFESSIONAL_LINK_INDICATORS, PROGRESSION_TERMS,
    RECOMMENDED_SECTION_POINTS, SECTION_PATTERNS, TECH_KEYWORDS, VERB_PATTERNS, WEIGHTS, YEAR_RE,
};
use super::{AnalysisResult, ScoreBreakdown, ScoringStrategy};

/// Everything the analysis detected in the document. Serialized as `metrics`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeSignals {
    pub word_count: usize,
    pub sentence_count: usize,
    pub paragraph_count: usize,
    pub line_count: usize,
    pub char_count: usize,
    pub avg_sentence_length: f64,

    pub has_email: bool,
    pub has_phone: bool,
    pub has_linkedin: bool,
    pub has_location: bool,
    pub has_professional_link: bool,

    pub found_sections: Vec<Section>,
    pub header_lines: usize,
    pub clear_headers: bool,
    pub has_dates: bool,
    pub chronological: bool,

    pub keyword_count: usize,
    pub tech_keyword_count: usize,

    pub quantified_achievements: usize,

    pub high_impact_verbs: Vec<&'static str>,
    pub medium_impact_verbs: Vec<&'static str>,
    pub standard_verbs: Vec<&'static str>,

    pub bullet_points: usize,
    pub optimal_length: bool,
    pub possible_table: bool,
    pub consistent_dates: bool,

    pub experience_words: usize,
    pub career_progression: usize,

    pub problematic_chars: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub jd_match_percentage: Option<f64>,
}

/// Raw output of [`analyze`], before narrative text is attached.
#[derive(Debug, Clone)]
pub struct HeuristicReport {
    pub score: u32,
    pub breakdown: ScoreBreakdown,
    pub signals: ResumeSignals,
    pub present_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub has_job_description: bool,
}

impl HeuristicReport {
    /// Attaches feedback, strengths, improvements and recommendations.
    pub fn into_analysis(self) -> AnalysisResult {
        let mut feedback = BTreeMap::new();
        feedback.insert("overall".to_string(), narrative::overall_feedback(self.score));
        feedback.extend(narrative::category_feedback(&self.signals, &self.breakdown));

        AnalysisResult {
            ats_score: self.score,
            strategy: ScoringStrategy::Heuristic,
            feedback,
            strengths: narrative::strengths(&self.signals, &self.breakdown),
            improvements: narrative::improvements(
                &self.signals,
                &self.breakdown,
                self.has_job_description,
            ),
            recommendations: narrative::recommendations(&self.signals, &self.breakdown),
            matched_keywords: self.present_keywords,
            missing_keywords: self.missing_keywords,
            breakdown: Some(self.breakdown),
            metrics: Some(self.signals),
        }
    }
}

/// Full heuristic analysis with narrative.
pub fn analyze_resume(text: &str, job_description: Option<&str>) -> AnalysisResult {
    analyze(text, job_description).into_analysis()
}

pub fn analyze(text: &str, job_description: Option<&str>) -> HeuristicReport {
    let job_description = job_description.map(str::trim).filter(|jd| !jd.is_empty());
    let text = normalize_line_endings(text);
    let text: &str = &text;
    let lower = text.to_lowercase();

    let counts = document_counts(text);
    let contact = contact_signals(text, &lower);
    let structure = structure_signals(text, &lower);
    let keywords = keyword_signals(&lower, job_description);
    let achievements = count_achievements(&lower);
    let verbs = verb_signals(&lower);
    let formatting = formatting_signals(text, counts.word_count);
    let content = content_signals(text, &lower, keywords.found.len());
    let ats = ats_signals(text, structure.clear_headers, formatting.bullet_points);
    let jd_overlap = job_description.and_then(|jd| jd_match(&lower, &jd.to_lowercase()));

    let breakdown = ScoreBreakdown {
        contact: contact.score(),
        structure: structure.score,
        keywords: keywords.score,
        achievements: achievement_score(achievements),
        verbs: verbs.score,
        formatting: formatting.score,
        content: content.score,
        ats_compat: ats.score,
        jd_match: jd_overlap.map_or(NEUTRAL_JD_SCORE, |(_, score)| score),
    };

    let signals = ResumeSignals {
        word_count: counts.word_count,
        sentence_count: counts.sentence_count,
        paragraph_count: counts.paragraph_count,
        line_count: counts.line_count,
        char_count: counts.char_count,
        avg_sentence_length: counts.avg_sentence_length,
        has_email: contact.has_email,
        has_phone: contact.has_phone,
        has_linkedin: contact.has_linkedin,
        has_location: contact.has_location,
        has_professional_link: contact.has_professional_link,
        found_sections: structure.found_sections,
        header_lines: structure.header_lines,
        clear_headers: structure.clear_headers,
        has_dates: structure.has_dates,
        chronological: structure.chronological,
        keyword_count: keywords.found.len(),
        tech_keyword_count: keywords.tech_found,
        quantified_achievements: achievements,
        high_impact_verbs: verbs.high,
        medium_impact_verbs: verbs.medium,
        standard_verbs: verbs.standard,
        bullet_points: formatting.bullet_points,
        optimal_length: formatting.optimal_length,
        possible_table: formatting.possible_table,
        consistent_dates: formatting.consistent_dates,
        experience_words: content.experience_words,
        career_progression: content.career_progression,
        problematic_chars: ats.problematic_chars,
        jd_match_percentage: jd_overlap.map(|(pct, _)| pct),
    };

    let score = final_score(&breakdown, &signals);

    let mut present_keywords = keywords.found;
    present_keywords.truncate(MAX_PRESENT_KEYWORDS);
    let mut missing_keywords = keywords.missing;
    missing_keywords.truncate(MAX_MISSING_KEYWORDS);

    HeuristicReport {
        score,
        breakdown,
        signals,
        present_keywords,
        missing_keywords,
        has_job_description: job_description.is_some(),
    }
}

/// Line-anchored patterns only see `\n`, so CRLF and bare CR become LF.
fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

fn weighted_mean(breakdown: &ScoreBreakdown) -> f64 {
    [
        (breakdown.contact, WEIGHTS.contact),
        (breakdown.structure, WEIGHTS.structure),
        (breakdown.keywords, WEIGHTS.keywords),
        (breakdown.achievements, WEIGHTS.achievements),
        (breakdown.verbs, WEIGHTS.verbs),
        (breakdown.formatting, WEIGHTS.formatting),
        (breakdown.content, WEIGHTS.content),
        (breakdown.ats_compat, WEIGHTS.ats_compat),
        (breakdown.jd_match, WEIGHTS.jd_match),
    ]
    .iter()
    .map(|&(score, weight)| f64::from(score) * weight)
    .sum::<f64>()
        / WEIGHTS.total()
}

/// Truncated weighted mean, then the ceilings for missing essentials.
fn final_score(breakdown: &ScoreBreakdown, signals: &ResumeSignals) -> u32 {
    let mut score = weighted_mean(breakdown) as u32;
    if !signals.has_email {
        score = score.min(NO_EMAIL_CEILING);
    }
    if signals.quantified_achievements == 0 {
        score = score.min(NO_ACHIEVEMENTS_CEILING);
    }
    if signals.found_sections.len() < MIN_RECOGNIZED_SECTIONS {
        score = score.min(FEW_SECTIONS_CEILING);
    }
    score.min(100)
}

// ────────────────────────────────────────────────────────────────────────────
// Signal groups
// ────────────────────────────────────────────────────────────────────────────

struct DocumentCounts {
    word_count: usize,
    sentence_count: usize,
    paragraph_count: usize,
    line_count: usize,
    char_count: usize,
    avg_sentence_length: f64,
}

fn document_counts(text: &str) -> DocumentCounts {
    let non_blank = |s: &&str| !s.trim().is_empty();

    let word_count = text.split_whitespace().count();
    let sentence_count = text
        .split(['.', '!', '?'])
        .filter(non_blank)
        .count();

    DocumentCounts {
        word_count,
        sentence_count,
        paragraph_count: text.split("\n\n").filter(non_blank).count(),
        line_count: text.lines().filter(non_blank).count(),
        char_count: text.chars().count(),
        avg_sentence_length: word_count as f64 / sentence_count.max(1) as f64,
    }
}

struct ContactSignals {
    has_email: bool,
    has_phone: bool,
    has_linkedin: bool,
    has_location: bool,
    has_professional_link: bool,
}

impl ContactSignals {
    fn score(&self) -> u32 {
        [
            (self.has_email, 25),
            (self.has_phone, 25),
            (self.has_linkedin, 20),
            (self.has_location, 15),
            (self.has_professional_link, 15),
        ]
        .iter()
        .filter(|(present, _)| *present)
        .map(|(_, points)| points)
        .sum()
    }
}

fn contact_signals(text: &str, lower: &str) -> ContactSignals {
    ContactSignals {
        has_email: EMAIL_RE.is_match(text),
        has_phone: PHONE_RE.is_match(text),
        has_linkedin: lower.contains("linkedin"),
        has_location: LOCATION_INDICATORS.iter().any(|term| lower.contains(term))
            || CITY_STATE_RE.is_match(text),
        has_professional_link: PROFESSIONAL_LINK_INDICATORS
            .iter()
            .any(|term| lower.contains(term)),
    }
}

struct StructureSignals {
    found_sections: Vec<Section>,
    header_lines: usize,
    clear_headers: bool,
    has_dates: bool,
    chronological: bool,
    score: u32,
}

fn structure_signals(text: &str, lower: &str) -> StructureSignals {
    let found_sections: Vec<Section> = SECTION_PATTERNS
        .iter()
        .filter(|(_, pattern)| pattern.is_match(lower))
        .map(|(section, _)| *section)
        .collect();

    let header_lines = HEADER_RE.find_iter(text).count();

    let years: Vec<u32> = YEAR_RE
        .find_iter(text)
        .take(6)
        .filter_map(|m| m.as_str().parse().ok())
        .collect();
    // Most-recent-first ordering: each year no later than the one before it.
    let chronological = years.len() >= 2 && {
        let descending = years.windows(2).filter(|w| w[0] >= w[1]).count();
        descending == years.len() - 1 || descending > years.len() / 2
    };

    let mut score: u32 = found_sections
        .iter()
        .map(|section| {
            if section.is_essential() {
                ESSENTIAL_SECTION_POINTS
            } else {
                RECOMMENDED_SECTION_POINTS
            }
        })
        .sum();
    if header_lines >= 3 {
        score += 10;
    }
    if chronological {
        score += 5;
    }

    StructureSignals {
        found_sections,
        header_lines,
        clear_headers: header_lines >= 1,
        has_dates: !years.is_empty(),
        chronological,
        score: score.min(100),
    }
}

struct KeywordSignals {
    found: Vec<String>,
    missing: Vec<String>,
    tech_found: usize,
    score: u32,
}

fn keyword_signals(lower: &str, job_description: Option<&str>) -> KeywordSignals {
    let mut found = Vec::new();
    let mut tech_found = 0;
    for keyword in KEYWORD_PATTERNS.iter() {
        if keyword.pattern.is_match(lower) {
            found.push(keyword.term.to_string());
            if keyword.is_tech {
                tech_found += 1;
            }
        }
    }

    let mut missing = Vec::new();
    match job_description {
        Some(jd) => {
            for term in top_jd_terms(jd) {
                if lower.contains(term.as_str()) {
                    if !found.contains(&term) {
                        found.push(term);
                    }
                } else {
                    missing.push(term);
                }
            }
        }
        None => {
            let dictionary = if tech_found > 5 {
                TECH_KEYWORDS
            } else {
                BUSINESS_KEYWORDS
            };
            'categories: for (_, terms) in dictionary {
                for term in terms.iter().take(3) {
                    if missing.len() >= MAX_SUGGESTED_KEYWORDS {
                        break 'categories;
                    }
                    if !found.iter().any(|f| f == term) {
                        missing.push(term.to_string());
                    }
                }
            }
        }
    }

    let n = found.len();
    let mut score = match n {
        25.. => 95,
        20..=24 => 88,
        15..=19 => 80,
        10..=14 => 70,
        7..=9 => 60,
        5..=6 => 50,
        3..=4 => 40,
        _ => (10 * n as u32).max(20),
    };
    if job_description.is_some() && !missing.is_empty() {
        let coverage = n as f64 / (n + missing.len().min(10)) as f64;
        if coverage > 0.7 {
            score = (score + 10).min(100);
        }
    }

    KeywordSignals {
        found,
        missing,
        tech_found,
        score,
    }
}

/// Most frequent non-stopword tokens of the job description, ties broken by
/// first appearance.
fn top_jd_terms(jd: &str) -> Vec<String> {
    let lower = jd.to_lowercase();
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for token in JD_TOKEN_RE.find_iter(&lower).map(|m| m.as_str()) {
        if token.len() <= 2 || JD_STOPWORDS.contains(&token) {
            continue;
        }
        let count = counts.entry(token).or_insert(0);
        if *count == 0 {
            order.push(token);
        }
        *count += 1;
    }

    // Stable sort keeps first-appearance order among equal counts.
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order
        .into_iter()
        .take(JD_TOP_KEYWORDS)
        .map(str::to_string)
        .collect()
}

fn count_achievements(lower: &str) -> usize {
    ACHIEVEMENT_PATTERNS
        .iter()
        .map(|pattern| pattern.find_iter(lower).count())
        .sum()
}

fn achievement_score(count: usize) -> u32 {
    match count {
        10.. => 95,
        7..=9 => 85,
        5..=6 => 75,
        3..=4 => 65,
        2 => 55,
        1 => 45,
        0 => 25,
    }
}

struct VerbSignals {
    high: Vec<&'static str>,
    medium: Vec<&'static str>,
    standard: Vec<&'static str>,
    score: u32,
}

fn verb_signals(lower: &str) -> VerbSignals {
    let mut signals = VerbSignals {
        high: Vec::new(),
        medium: Vec::new(),
        standard: Vec::new(),
        score: 0,
    };
    for verb in VERB_PATTERNS.iter() {
        if !verb.pattern.is_match(lower) {
            continue;
        }
        signals.score += verb.tier.weight();
        match verb.tier {
            VerbTier::High => signals.high.push(verb.verb),
            VerbTier::Medium => signals.medium.push(verb.verb),
            VerbTier::Standard => signals.standard.push(verb.verb),
        }
    }

    let total = signals.high.len() + signals.medium.len() + signals.standard.len();
    signals.score = signals.score.min(100);
    if total >= 10 && signals.high.len() >= 3 {
        signals.score = (signals.score + 15).min(100);
    }
    signals
}

struct FormattingSignals {
    bullet_points: usize,
    optimal_length: bool,
    possible_table: bool,
    consistent_dates: bool,
    score: u32,
}

fn formatting_signals(text: &str, word_count: usize) -> FormattingSignals {
    let bullet_points = text.chars().filter(|c| BULLET_GLYPHS.contains(c)).count()
        + DASH_BULLET_RE.find_iter(text).count();

    let mut score: i32 = 70;
    score += match bullet_points {
        15.. => 15,
        10..=14 => 10,
        5..=9 => 5,
        _ => 0,
    };

    let optimal_length = (OPTIMAL_WORDS.0..=OPTIMAL_WORDS.1).contains(&word_count);
    if optimal_length {
        score += 10;
    } else if (ACCEPTABLE_WORDS.0..=ACCEPTABLE_WORDS.1).contains(&word_count) {
        score += 5;
    } else {
        score -= 5;
    }

    let possible_table = text.matches('|').count() > 10;
    if possible_table {
        score -= 10;
    }

    let date_mentions = DATE_FORMAT_RE.find_iter(text).count();
    if date_mentions >= 4 {
        score += 5;
    }

    FormattingSignals {
        bullet_points,
        optimal_length,
        possible_table,
        consistent_dates: date_mentions >= 2,
        score: score.clamp(0, 100) as u32,
    }
}

struct ContentSignals {
    experience_words: usize,
    career_progression: usize,
    score: u32,
}

fn content_signals(text: &str, lower: &str, keyword_count: usize) -> ContentSignals {
    let experience_words = experience_section(text).map_or(0, |s| s.split_whitespace().count());

    let words: HashSet<&str> = lower
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let career_progression = PROGRESSION_TERMS
        .iter()
        .filter(|term| words.contains(*term))
        .count();

    let mut score = 50;
    score += match experience_words {
        200.. => 20,
        100..=199 => 10,
        _ => 0,
    };
    score += match career_progression {
        0 => 0,
        1 => 8,
        _ => 15,
    };
    score += match keyword_count {
        15.. => 15,
        10..=14 => 10,
        5..=9 => 5,
        _ => 0,
    };

    ContentSignals {
        experience_words,
        career_progression,
        score: score.min(100),
    }
}

/// The experience section: from its heading to the next all-caps header line.
/// A header line naming the section is preferred over a passing mention of
/// "experience" in the summary.
fn experience_section(text: &str) -> Option<&str> {
    let start = HEADER_RE
        .find_iter(text)
        .find(|header| EXPERIENCE_START_RE.is_match(header.as_str()))
        .map(|header| header.start())
        .or_else(|| EXPERIENCE_START_RE.find(text).map(|m| m.start()))?;

    let body_start = text[start..]
        .find('\n')
        .map_or(text.len(), |offset| start + offset + 1);
    let end = HEADER_RE
        .find(&text[body_start..])
        .map_or(text.len(), |next| body_start + next.start());

    Some(&text[start..end])
}

struct AtsSignals {
    problematic_chars: usize,
    score: u32,
}

fn ats_signals(text: &str, clear_headers: bool, bullet_points: usize) -> AtsSignals {
    let problematic_chars = text
        .chars()
        .filter(|c| PROBLEMATIC_CHARS.contains(c))
        .count();

    let mut score: i32 = 80;
    if problematic_chars > 5 {
        score -= 15;
    } else if problematic_chars > 0 {
        score -= 5;
    }
    if NON_ASCII_RUN_RE.is_match(text) {
        score -= 10;
    }
    if clear_headers {
        score += 10;
    }
    if bullet_points >= 5 {
        score += 10;
    }

    AtsSignals {
        problematic_chars,
        score: score.clamp(0, 100) as u32,
    }
}

/// Token overlap with the job description as (percentage, sub-score).
/// `None` when the description yields no comparable tokens.
fn jd_match(lower: &str, jd_lower: &str) -> Option<(f64, u32)> {
    let jd_words = match_tokens(jd_lower);
    if jd_words.is_empty() {
        return None;
    }
    let resume_words = match_tokens(lower);

    let matched = jd_words.intersection(&resume_words).count();
    let percentage = matched as f64 / jd_words.len() as f64 * 100.0;
    let score = ((percentage * 1.2) as u32).min(100);

    Some(((percentage * 10.0).round() / 10.0, score))
}

fn match_tokens(text: &str) -> HashSet<&str> {
    MATCH_TOKEN_RE
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|w| !MATCH_STOPWORDS.contains(w))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRONG_RESUME: &str = "\
JANE SMITH
Senior Software Engineer | San Francisco, CA
jane.smith@example.com | (415) 555-0199 | linkedin.com/in/janesmith | github.com/janesmith

PROFESSIONAL SUMMARY
Senior engineer with 8 years of experience building distributed systems in Python, Go and Rust.

EXPERIENCE
Lead Engineer, Acme Corp (Jan 2020 - Present)
- Led a team of 6 engineers to launch a payments platform serving 2,000,000 users
- Reduced infrastructure costs by 35% ($1.2M annually) by migrating to Kubernetes on AWS
- Increased deployment frequency 4x faster with Terraform and Jenkins CI/CD pipelines
- Designed and implemented event streaming with Kafka and PostgreSQL
- Mentored 4 engineers, two of whom were promoted to senior roles

Software Engineer, Beta Inc (Mar 2016 - Dec 2019)
- Developed React and Node services used by 500 customers
- Optimized SQL queries, improving report latency by 60%
- Built analytics dashboards in Python with Pandas and NumPy
- Collaborated with product managers on agile delivery of 12 projects

EDUCATION
B.S. Computer Science, State University, 2016

SKILLS
Python, Go, Rust, JavaScript, TypeScript, React, Docker, Kubernetes, AWS, Terraform, Git, PostgreSQL, Redis

PROJECTS
- Open-source contributor to 3 projects; achieved top 1% contributor ranking
";

    #[test]
    fn test_strong_resume_scores_well() {
        let report = analyze(STRONG_RESUME, None);
        assert!(report.signals.has_email);
        assert!(report.signals.has_phone);
        assert!(report.signals.has_linkedin);
        assert!(report.signals.has_professional_link);
        assert!(report.signals.quantified_achievements >= 5);
        assert!(report.signals.found_sections.len() >= 5);
        assert!(report.score >= 65, "score was {}", report.score);
        assert!(report.score <= 100);
    }

    #[test]
    fn test_missing_email_caps_at_80() {
        let without_email = STRONG_RESUME.replace("jane.smith@example.com", "");
        let report = analyze(&without_email, None);
        assert!(!report.signals.has_email);
        assert!(report.score <= NO_EMAIL_CEILING);
    }

    #[test]
    fn test_no_achievements_caps_at_70() {
        let text = "\
JOHN DOE
john@doe.com
EXPERIENCE
Worked on internal tooling and supported the operations group.
EDUCATION
Bachelor of Arts from a state university.
SKILLS
Communication, teamwork, planning, leadership, python, docker, aws, kubernetes";
        let report = analyze(text, None);
        assert_eq!(report.signals.quantified_achievements, 0);
        assert_eq!(report.breakdown.achievements, 25);
        assert!(report.score <= NO_ACHIEVEMENTS_CEILING);
    }

    #[test]
    fn test_achievement_ceiling_binds_on_strong_profile() {
        let report = analyze(STRONG_RESUME, None);
        assert!(weighted_mean(&report.breakdown) > f64::from(NO_ACHIEVEMENTS_CEILING) + 5.0);
        assert!(final_score(&report.breakdown, &report.signals) > NO_ACHIEVEMENTS_CEILING);

        let mut signals = report.signals.clone();
        signals.quantified_achievements = 0;
        assert_eq!(
            final_score(&report.breakdown, &signals),
            NO_ACHIEVEMENTS_CEILING
        );
    }

    #[test]
    fn test_few_sections_caps_at_65() {
        let text = "Jane wrote code for 10 years at 3 companies and grew revenue by 40%. \
                    Reach her at jane@example.org for more.";
        let report = analyze(text, None);
        assert!(report.signals.found_sections.len() < MIN_RECOGNIZED_SECTIONS);
        assert!(report.score <= FEW_SECTIONS_CEILING);
    }

    #[test]
    fn test_section_ceiling_binds_on_strong_profile() {
        let report = analyze(STRONG_RESUME, None);
        assert!(weighted_mean(&report.breakdown) > f64::from(FEW_SECTIONS_CEILING) + 5.0);

        let mut signals = report.signals.clone();
        signals.found_sections.truncate(MIN_RECOGNIZED_SECTIONS - 1);
        assert_eq!(final_score(&report.breakdown, &signals), FEW_SECTIONS_CEILING);

        // Ceilings stack: the lowest applicable one wins.
        signals.has_email = false;
        signals.quantified_achievements = 0;
        assert_eq!(final_score(&report.breakdown, &signals), FEW_SECTIONS_CEILING);
    }

    #[test]
    fn test_line_endings_do_not_change_the_analysis() {
        let lf = analyze(STRONG_RESUME, None);
        let crlf = analyze(&STRONG_RESUME.replace('\n', "\r\n"), None);
        let cr = analyze(&STRONG_RESUME.replace('\n', "\r"), None);

        assert!(crlf.signals.clear_headers);
        assert_eq!(crlf.signals.header_lines, lf.signals.header_lines);
        assert_eq!(crlf.signals.experience_words, lf.signals.experience_words);
        for other in [&crlf, &cr] {
            assert_eq!(other.score, lf.score);
            assert_eq!(other.breakdown, lf.breakdown);
            assert_eq!(other.signals, lf.signals);
        }
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let jd = "We need a Rust engineer with Kubernetes and Terraform experience.";
        let first = analyze_resume(STRONG_RESUME, Some(jd));
        let second = analyze_resume(STRONG_RESUME, Some(jd));
        assert_eq!(first, second);
    }

    #[test]
    fn test_john_doe_contact_fixture() {
        let text = "John Doe, john@doe.com, 555-123-4567, Experience: built internal tools \
                    for the finance team and maintained reporting dashboards.";
        let report = analyze(text, None);
        assert!(report.signals.has_email);
        assert!(report.signals.has_phone);
        assert!(report.breakdown.contact >= 50);
    }

    #[test]
    fn test_chronology_detects_most_recent_first() {
        let recent_first = structure_signals("2023 2021 2019 2017", "");
        assert!(recent_first.chronological);
        assert!(recent_first.has_dates);

        let oldest_first = structure_signals("2015 2018 2021", "");
        assert!(!oldest_first.chronological);

        let single = structure_signals("Graduated 2012", "");
        assert!(!single.chronological);
    }

    #[test]
    fn test_year_ranges_are_not_phone_numbers() {
        let report = analyze("Acme Corp 2019 - 2021, Beta 2016 - 2019", None);
        assert!(!report.signals.has_phone);
    }

    #[test]
    fn test_narrative_lists_are_bounded_and_unique() {
        let texts = [
            STRONG_RESUME,
            "short text with nothing useful in it at all, really nothing to see",
            "",
        ];
        for text in texts {
            let result = analyze_resume(text, None);
            for list in [
                &result.strengths,
                &result.improvements,
                &result.recommendations,
            ] {
                assert!((4..=7).contains(&list.len()), "{list:?}");
                let unique: HashSet<_> = list.iter().collect();
                assert_eq!(unique.len(), list.len(), "duplicates in {list:?}");
            }
        }
    }

    #[test]
    fn test_degenerate_input_is_total() {
        let report = analyze("", None);
        assert!(report.score <= FEW_SECTIONS_CEILING);
        assert_eq!(report.signals.word_count, 0);
        assert_eq!(report.signals.avg_sentence_length, 0.0);

        let report = analyze("|||||||||||||||| ★★★★★★ →→→", Some("   "));
        assert!(report.score <= 100);
        assert!(report.signals.possible_table);
        assert!(!report.has_job_description);
    }

    #[test]
    fn test_job_description_drives_keyword_lists() {
        let jd = "Looking for Kafka expertise. Kafka streaming, Kafka operations, \
                  Snowflake warehousing and Kubernetes.";
        let report = analyze(STRONG_RESUME, Some(jd));
        assert!(report.present_keywords.iter().any(|k| k == "kafka"));
        assert!(report.missing_keywords.iter().any(|k| k == "snowflake"));
        assert!(report.signals.jd_match_percentage.is_some());
        assert!(report.missing_keywords.len() <= MAX_MISSING_KEYWORDS);
        assert!(report.present_keywords.len() <= MAX_PRESENT_KEYWORDS);
    }

    #[test]
    fn test_suggestions_without_job_description_skip_present_terms() {
        let report = analyze(STRONG_RESUME, None);
        assert!(report.signals.tech_keyword_count > 5);
        assert!(!report.missing_keywords.iter().any(|k| k == "python"));
        assert!(report.missing_keywords.len() <= MAX_SUGGESTED_KEYWORDS);
    }

    #[test]
    fn test_neutral_jd_score_without_description() {
        let report = analyze(STRONG_RESUME, None);
        assert_eq!(report.breakdown.jd_match, NEUTRAL_JD_SCORE);
        assert!(report.signals.jd_match_percentage.is_none());
    }

    #[test]
    fn test_experience_section_stops_at_next_header() {
        let text = "SUMMARY\nLooking for experience in fintech.\nEXPERIENCE\none two three\nfour five\nEDUCATION\nsix seven";
        let section = experience_section(text).unwrap();
        assert!(section.starts_with("EXPERIENCE"));
        assert!(section.contains("four five"));
        assert!(!section.contains("EDUCATION"));
    }

    #[test]
    fn test_top_jd_terms_orders_by_frequency_then_position() {
        let terms = top_jd_terms("Rust and Go. Rust services, Go tooling, Rust again. The end.");
        assert_eq!(terms[0], "rust");
        assert!(!terms.contains(&"and".to_string()));
        assert!(!terms.contains(&"go".to_string()));
    }
}
