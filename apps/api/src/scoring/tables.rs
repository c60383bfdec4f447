//! Fixed scoring tables: category weights, keyword dictionaries, verb tiers,
//! section patterns and the regex families used by the heuristic scorer.
//!
//! Everything here is process-wide static data, compiled once on first use.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

// ────────────────────────────────────────────────────────────────────────────
// Weights and ceilings
// ────────────────────────────────────────────────────────────────────────────

/// Weight of each sub-score in the final heuristic score. Sums to 1.0.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScoringWeights {
    pub contact: f64,
    pub structure: f64,
    pub keywords: f64,
    pub achievements: f64,
    pub verbs: f64,
    pub formatting: f64,
    pub content: f64,
    pub ats_compat: f64,
    pub jd_match: f64,
}

impl ScoringWeights {
    pub fn total(&self) -> f64 {
        self.contact
            + self.structure
            + self.keywords
            + self.achievements
            + self.verbs
            + self.formatting
            + self.content
            + self.ats_compat
            + self.jd_match
    }
}

pub const WEIGHTS: ScoringWeights = ScoringWeights {
    contact: 0.08,
    structure: 0.12,
    keywords: 0.20,
    achievements: 0.18,
    verbs: 0.08,
    formatting: 0.12,
    content: 0.12,
    ats_compat: 0.05,
    jd_match: 0.05,
};

pub const NO_EMAIL_CEILING: u32 = 80;
pub const NO_ACHIEVEMENTS_CEILING: u32 = 70;
pub const FEW_SECTIONS_CEILING: u32 = 65;
pub const MIN_RECOGNIZED_SECTIONS: usize = 3;

/// JD-match sub-score used when no job description is supplied.
pub const NEUTRAL_JD_SCORE: u32 = 70;

/// Optimal and acceptable resume lengths, in words.
pub const OPTIMAL_WORDS: (usize, usize) = (400, 800);
pub const ACCEPTABLE_WORDS: (usize, usize) = (300, 1000);

// ────────────────────────────────────────────────────────────────────────────
// Keyword dictionaries
// ────────────────────────────────────────────────────────────────────────────

pub const TECH_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "languages",
        &[
            "python", "java", "javascript", "typescript", "c++", "c#", "ruby", "go", "rust",
            "php", "swift", "kotlin", "scala", "sql", "r", "matlab",
        ],
    ),
    (
        "frameworks",
        &[
            "react", "angular", "vue", "node", "django", "flask", "spring", "express", "rails",
            "laravel", "nextjs", "gatsby", "svelte",
        ],
    ),
    (
        "cloud",
        &[
            "aws", "azure", "gcp", "google cloud", "docker", "kubernetes", "terraform",
            "jenkins", "ci/cd", "devops",
        ],
    ),
    (
        "data",
        &[
            "machine learning", "deep learning", "data science", "analytics", "big data",
            "hadoop", "spark", "tensorflow", "pytorch", "pandas", "numpy",
        ],
    ),
    (
        "tools",
        &[
            "git", "github", "gitlab", "jira", "confluence", "slack", "figma", "sketch",
            "postman", "mongodb", "postgresql", "mysql", "redis",
        ],
    ),
];

pub const BUSINESS_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "management",
        &[
            "project management", "team lead", "stakeholder", "budget", "strategy", "planning",
            "coordination", "leadership",
        ],
    ),
    (
        "analysis",
        &[
            "business analysis", "requirements", "process improvement", "data analysis",
            "reporting", "metrics", "kpi",
        ],
    ),
    (
        "communication",
        &[
            "presentation", "negotiation", "client relations", "cross-functional",
            "collaboration",
        ],
    ),
    (
        "methodologies",
        &["agile", "scrum", "waterfall", "lean", "six sigma", "kanban", "pmp", "prince2"],
    ),
];

/// A dictionary term with its whole-term matcher.
pub struct KeywordPattern {
    pub term: &'static str,
    pub is_tech: bool,
    pub pattern: Regex,
}

/// Every dictionary term, technical first, in declaration order.
pub static KEYWORD_PATTERNS: Lazy<Vec<KeywordPattern>> = Lazy::new(|| {
    let tech = TECH_KEYWORDS.iter().flat_map(|(_, terms)| terms.iter().map(|t| (*t, true)));
    let business = BUSINESS_KEYWORDS
        .iter()
        .flat_map(|(_, terms)| terms.iter().map(|t| (*t, false)));
    tech.chain(business)
        .map(|(term, is_tech)| KeywordPattern {
            term,
            is_tech,
            pattern: term_pattern(term),
        })
        .collect()
});

/// Matches `term` as a whole term in lowercase text. Plain `\b` would not work
/// for terms such as `c++` or `c#`, and single letters like `r` must not match
/// inside other words.
pub fn term_pattern(term: &str) -> Regex {
    let source = format!(
        r"(?:^|[^a-z0-9+#]){}(?:$|[^a-z0-9+#])",
        regex::escape(term)
    );
    // Escaped literal inside a fixed frame always compiles.
    Regex::new(&source).unwrap()
}

/// Words ignored when mining keywords out of a job description.
pub const JD_STOPWORDS: &[&str] = &[
    "the", "and", "for", "are", "with", "will", "you", "our", "your", "this", "that", "have",
    "has", "from", "they", "been", "were", "being", "what", "when", "where", "which", "who",
    "also", "can", "may", "must", "should", "would", "could", "than", "then", "only", "just",
    "into", "over", "such", "very", "some", "other",
];

/// Words ignored when computing the JD/resume token overlap.
pub const MATCH_STOPWORDS: &[&str] = &[
    "with", "that", "this", "have", "from", "they", "will", "your", "about", "been", "more",
    "when", "there", "which", "their", "would", "could", "should", "other",
];

pub const JD_TOP_KEYWORDS: usize = 20;
pub const MAX_PRESENT_KEYWORDS: usize = 15;
pub const MAX_MISSING_KEYWORDS: usize = 8;
pub const MAX_SUGGESTED_KEYWORDS: usize = 8;

// ────────────────────────────────────────────────────────────────────────────
// Action verbs
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbTier {
    High,
    Medium,
    Standard,
}

impl VerbTier {
    pub fn weight(self) -> u32 {
        match self {
            VerbTier::High => 8,
            VerbTier::Medium => 4,
            VerbTier::Standard => 2,
        }
    }
}

pub const HIGH_IMPACT_VERBS: &[&str] = &[
    "achieved", "accelerated", "delivered", "exceeded", "generated", "increased", "launched",
    "led", "optimized", "pioneered", "reduced", "saved", "spearheaded", "streamlined",
    "transformed",
];

pub const MEDIUM_IMPACT_VERBS: &[&str] = &[
    "analyzed", "built", "collaborated", "coordinated", "created", "designed", "developed",
    "established", "implemented", "improved", "managed", "organized", "produced",
];

pub const STANDARD_VERBS: &[&str] = &[
    "assisted", "conducted", "contributed", "executed", "facilitated", "handled", "maintained",
    "participated", "performed", "prepared", "processed", "provided", "supported",
];

pub struct VerbPattern {
    pub verb: &'static str,
    pub tier: VerbTier,
    pub pattern: Regex,
}

pub static VERB_PATTERNS: Lazy<Vec<VerbPattern>> = Lazy::new(|| {
    let tiers = [
        (VerbTier::High, HIGH_IMPACT_VERBS),
        (VerbTier::Medium, MEDIUM_IMPACT_VERBS),
        (VerbTier::Standard, STANDARD_VERBS),
    ];
    tiers
        .into_iter()
        .flat_map(|(tier, verbs)| {
            verbs.iter().map(move |&verb| VerbPattern {
                verb,
                tier,
                pattern: Regex::new(&format!(r"\b{verb}\w*\b")).unwrap(),
            })
        })
        .collect()
});

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Contact,
    Experience,
    Education,
    Skills,
    Summary,
    Projects,
    Certifications,
    Achievements,
}

impl Section {
    pub fn as_str(self) -> &'static str {
        match self {
            Section::Contact => "contact",
            Section::Experience => "experience",
            Section::Education => "education",
            Section::Skills => "skills",
            Section::Summary => "summary",
            Section::Projects => "projects",
            Section::Certifications => "certifications",
            Section::Achievements => "achievements",
        }
    }

    pub fn is_essential(self) -> bool {
        matches!(
            self,
            Section::Contact | Section::Experience | Section::Education | Section::Skills
        )
    }
}

pub const ESSENTIAL_SECTION_POINTS: u32 = 17;
pub const RECOMMENDED_SECTION_POINTS: u32 = 8;

/// Sections whose absence is reported as an improvement, in report order.
pub const REPORTED_SECTIONS: &[Section] = &[
    Section::Contact,
    Section::Experience,
    Section::Education,
    Section::Skills,
    Section::Summary,
    Section::Projects,
];

pub static SECTION_PATTERNS: Lazy<Vec<(Section, Regex)>> = Lazy::new(|| {
    [
        (Section::Contact, r"contact|email|phone"),
        (
            Section::Experience,
            r"experience|work\s*history|employment|professional\s*experience",
        ),
        (Section::Education, r"education|academic|degree|university|college"),
        (
            Section::Skills,
            r"skills|technical\s*skills|competencies|expertise|proficiencies",
        ),
        (
            Section::Summary,
            r"summary|objective|profile|about\s*me|professional\s*summary",
        ),
        (Section::Projects, r"projects|portfolio|work\s*samples"),
        (Section::Certifications, r"certifications?|licenses?|credentials"),
        (Section::Achievements, r"achievements?|accomplishments?|awards?|honors?"),
    ]
    .into_iter()
    .map(|(section, source)| (section, Regex::new(source).unwrap()))
    .collect()
});

// ────────────────────────────────────────────────────────────────────────────
// Pattern families
// ────────────────────────────────────────────────────────────────────────────

pub static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap());

/// National ten-digit numbers with an optional country code, or `+`-prefixed
/// international numbers. Bare years never match.
pub static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:\+\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b|\+\d{1,3}[-.\s]?\d{2,5}[-.\s]?\d{3,5}(?:[-.\s]?\d{2,5})?",
    )
    .unwrap()
});

/// "City, ST" style locations.
pub static CITY_STATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-z]+,\s*[A-Z]{2}\b").unwrap());

pub const LOCATION_INDICATORS: &[&str] =
    &["city", "state", "country", "location", "address", "remote"];

pub const PROFESSIONAL_LINK_INDICATORS: &[&str] =
    &["github", "portfolio", "gitlab", "bitbucket", "website"];

/// All-caps header lines such as `WORK EXPERIENCE` or `SKILLS:`.
pub static HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*[A-Z][A-Z \t]{2,25}:?[ \t]*$").unwrap());

pub static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

/// Quantified-achievement families, applied to lowercase text.
pub static ACHIEVEMENT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Percentages
        r"\d+%",
        // Currency amounts
        r"\$\d[\d,]*[kmb]?",
        // User / customer counts
        r"\d[\d,]*\+?\s*(?:users?|customers?|clients?|members?|employees?)",
        // Impact verb followed by a number on the same line
        r"(?:increased?|decreased?|reduced?|improved?|grew|grow|saved?|generated?)[^\n]*?\d+",
        // Multipliers
        r"\d+x\s*(?:faster|better|more|improvement)",
        // Rankings
        r"\btop\b|\bfirst\b|#1\b|\b\d+(?:st|nd|rd|th)\b",
        // Counts of delivered things
        r"\d+\s*(?:projects?|teams?|products?|applications?)",
    ]
    .into_iter()
    .map(|source| Regex::new(source).unwrap())
    .collect()
});

pub const BULLET_GLYPHS: &[char] = &['•', '●', '■'];

pub static DASH_BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*[-*][ \t]+").unwrap());

pub static DATE_FORMAT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\s*\d{4}\b|\b\d{1,2}/\d{4}\b|\b\d{4}\s*-\s*(?:\d{4}|present|current)\b",
    )
    .unwrap()
});

/// Start of an experience section, matched case-insensitively.
pub static EXPERIENCE_START_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)experience|work\s*history|employment").unwrap());

pub const PROGRESSION_TERMS: &[&str] = &[
    "senior", "lead", "manager", "director", "principal", "architect", "head", "chief", "vp",
    "promoted", "advanced",
];

pub const PROBLEMATIC_CHARS: &[char] = &['→', '←', '↑', '↓', '★', '☆', '✓', '✗', '©', '®', '™'];

pub static NON_ASCII_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\x00-\x7F]{10,}").unwrap());

/// Candidate keyword tokens in a job description.
pub static JD_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z][A-Za-z+#.]+\b").unwrap());

/// Tokens compared when computing JD overlap.
pub static MATCH_TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Za-z]{4,}\b").unwrap());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        assert!((WEIGHTS.total() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_patterns_compile() {
        assert_eq!(KEYWORD_PATTERNS.len(), 63 + 28);
        assert_eq!(VERB_PATTERNS.len(), 15 + 13 + 13);
        assert_eq!(SECTION_PATTERNS.len(), 8);
        assert_eq!(ACHIEVEMENT_PATTERNS.len(), 7);
    }

    #[test]
    fn test_term_pattern_matches_whole_terms_only() {
        let r = term_pattern("r");
        assert!(r.is_match("skills: python, r, sql"));
        assert!(!r.is_match("career in marketing"));

        let cpp = term_pattern("c++");
        assert!(cpp.is_match("languages: c++ and rust"));
        assert!(!cpp.is_match("c+++"));

        let go = term_pattern("go");
        assert!(go.is_match("wrote services in go."));
        assert!(!go.is_match("google cloud"));
    }

    #[test]
    fn test_phone_pattern_ignores_years() {
        assert!(PHONE_RE.is_match("555-123-4567"));
        assert!(PHONE_RE.is_match("(555) 123-4567"));
        assert!(PHONE_RE.is_match("+91 98765 43210"));
        assert!(!PHONE_RE.is_match("2019 - 2021"));
        assert!(!PHONE_RE.is_match("Jan 2020 to Mar 2023"));
    }

    #[test]
    fn test_header_pattern_requires_caps_line() {
        let text = "JOHN DOE\nEXPERIENCE\nBuilt things\nSkills:\nEDUCATION:\n";
        assert_eq!(HEADER_RE.find_iter(text).count(), 3);
    }

    #[test]
    fn test_section_helpers() {
        assert!(Section::Skills.is_essential());
        assert!(!Section::Projects.is_essential());
        assert_eq!(Section::Certifications.as_str(), "certifications");
    }
}
