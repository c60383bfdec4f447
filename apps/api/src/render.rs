//! HTML rendering for browser clients.
//!
//! Pages are built by filling `{{ placeholder }}` slots in templates compiled
//! into the binary. Every user- or model-supplied string is escaped first.

use axum::http::{header, HeaderMap, StatusCode};

use crate::scoring::handlers::AnalyzeResponse;

const LAYOUT_HTML: &str = include_str!("../templates/layout.html");
pub const INDEX_HTML: &str = include_str!("../templates/index.html");

/// True when the `Accept` header ranks `text/html` at least as high as
/// `application/json`. Wildcards alone do not count, so API clients that
/// send `*/*` keep getting JSON.
pub fn prefers_html(headers: &HeaderMap) -> bool {
    let Some(accept) = headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };

    let mut html_q: f32 = 0.0;
    let mut json_q: f32 = 0.0;
    for entry in accept.split(',') {
        let mut parts = entry.split(';');
        let media_type = parts.next().unwrap_or("").trim().to_ascii_lowercase();
        let q = parts
            .filter_map(|param| param.trim().strip_prefix("q="))
            .find_map(|value| value.trim().parse::<f32>().ok())
            .unwrap_or(1.0);

        match media_type.as_str() {
            "text/html" | "application/xhtml+xml" => html_q = html_q.max(q),
            "application/json" => json_q = json_q.max(q),
            _ => {}
        }
    }

    html_q > 0.0 && html_q >= json_q
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    LAYOUT_HTML
        .replace("{{ title }}", &escape_html(title))
        .replace("{{ body }}", body)
}

fn list_section(heading: &str, items: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let items: String = items
        .iter()
        .map(|item| format!("<li>{}</li>", escape_html(item)))
        .collect();
    format!("<section><h2>{}</h2><ul>{items}</ul></section>", escape_html(heading))
}

fn keyword_section(heading: &str, class: &str, keywords: &[String]) -> String {
    if keywords.is_empty() {
        return String::new();
    }
    let chips: String = keywords
        .iter()
        .map(|k| format!("<span class=\"chip {class}\">{}</span>", escape_html(k)))
        .collect();
    format!("<section><h2>{}</h2><p>{chips}</p></section>", escape_html(heading))
}

fn score_class(score: u32) -> &'static str {
    match score {
        80.. => "good",
        60..=79 => "fair",
        _ => "poor",
    }
}

pub fn analysis_page(response: &AnalyzeResponse) -> String {
    let analysis = &response.analysis;

    let mut body = format!(
        "<div class=\"score {}\"><span>{}</span>/100</div>\
         <p class=\"meta\">Strategy: {} &middot; Analysis {}</p>",
        score_class(analysis.ats_score),
        analysis.ats_score,
        analysis.strategy.as_str(),
        response.analysis_id,
    );

    if let Some(overall) = analysis.feedback.get("overall") {
        body.push_str(&format!("<p class=\"overall\">{}</p>", escape_html(overall)));
    }

    let details: String = analysis
        .feedback
        .iter()
        .filter(|(category, _)| category.as_str() != "overall")
        .map(|(category, text)| {
            format!(
                "<dt>{}</dt><dd>{}</dd>",
                escape_html(category),
                escape_html(text)
            )
        })
        .collect();
    if !details.is_empty() {
        body.push_str(&format!("<section><h2>Feedback</h2><dl>{details}</dl></section>"));
    }

    body.push_str(&list_section("Strengths", &analysis.strengths));
    body.push_str(&list_section("Areas for improvement", &analysis.improvements));
    body.push_str(&list_section("Recommendations", &analysis.recommendations));
    body.push_str(&keyword_section("Matched keywords", "matched", &analysis.matched_keywords));
    body.push_str(&keyword_section("Missing keywords", "missing", &analysis.missing_keywords));

    if let Some(breakdown) = &analysis.breakdown {
        let rows: String = [
            ("Contact", breakdown.contact),
            ("Structure", breakdown.structure),
            ("Keywords", breakdown.keywords),
            ("Achievements", breakdown.achievements),
            ("Action verbs", breakdown.verbs),
            ("Formatting", breakdown.formatting),
            ("Content depth", breakdown.content),
            ("ATS compatibility", breakdown.ats_compat),
            ("Job match", breakdown.jd_match),
        ]
        .iter()
        .map(|(label, score)| format!("<tr><td>{label}</td><td>{score}</td></tr>"))
        .collect();
        body.push_str(&format!(
            "<section><h2>Score breakdown</h2><table>{rows}</table></section>"
        ));
    }

    body.push_str("<p><a href=\"/\">Analyze another resume</a></p>");
    layout("ATS Resume Analysis", &body)
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let body = format!(
        "<div class=\"error\"><h2>{} {}</h2><p>{}</p></div>\
         <p><a href=\"/\">Try again</a></p>",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Error"),
        escape_html(message),
    );
    layout("Analysis failed", &body)
}
