//! HTML slide template filling.

use crate::constants::DEFAULT_AUTHOR;
use crate::types::case_study::CaseStudy;

const SLIDES_TEMPLATE: &str = include_str!("../../assets/slides.html");

/// Fills the slide template with `document`.
///
/// Every inserted value is escaped, so model output cannot inject markup.
///
/// # Examples
///
/// ```
/// use casegen::render::render_html;
/// use casegen::CaseStudy;
///
/// let html = render_html(&CaseStudy {
///     title: "R&D at <Acme>".to_string(),
///     context: vec!["Costs rose".to_string()],
///     ..CaseStudy::default()
/// });
/// assert!(html.contains("R&amp;D at &lt;Acme&gt;"));
/// assert!(html.contains("<li>Costs rose</li>"));
/// assert!(!html.contains("@@"));
/// ```
pub fn render_html(document: &CaseStudy) -> String {
    let mut html = String::with_capacity(SLIDES_TEMPLATE.len() + 4096);
    let mut rest = SLIDES_TEMPLATE;

    // Single pass, so placeholder text inside a value is never expanded.
    while let Some(start) = rest.find("@@") {
        html.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("@@") else {
            rest = &rest[start..];
            break;
        };
        match placeholder_value(document, &after[..end]) {
            Some(value) => {
                html.push_str(&value);
                rest = &after[end + 2..];
            }
            None => {
                html.push_str("@@");
                rest = after;
            }
        }
    }
    html.push_str(rest);
    html
}

fn placeholder_value(document: &CaseStudy, name: &str) -> Option<String> {
    let value = match name {
        "TITLE" => escape_html(&document.title),
        "AUTHOR" => escape_html(DEFAULT_AUTHOR),
        "COMPANYA" => escape_html(&document.company_a_name),
        "COMPANYADESC" => escape_html(&document.company_a_summary),
        "COMPANYB" => escape_html(&document.company_b_name),
        "COMPANYBDESC" => escape_html(&document.company_b_summary),
        "CONTEXT" => list_items(&document.context),
        "APPROACH" => list_items(&document.approach),
        "IMPACT" => list_items(&document.impact),
        _ => return None,
    };
    Some(value)
}

/// Escapes the five characters that are significant in HTML text and
/// attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn list_items(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("<li>{}</li>\n", escape_html(item)))
        .collect()
}
