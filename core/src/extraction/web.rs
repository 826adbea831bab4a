use crate::error::{CoreError, CoreResult};
use reqwest::header::CONTENT_TYPE;
use scraper::{Html, Node};
use tracing::info;

// Elements whose text is never rendered.
const HIDDEN_ELEMENTS: [&str; 5] = ["script", "style", "noscript", "template", "head"];

pub fn fetch_visible_text(client: &reqwest::blocking::Client, url: &str) -> CoreResult<String> {
    let parsed = url::Url::parse(url)
        .map_err(|e| CoreError::InvalidInput(format!("invalid URL '{}': {}", url, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(CoreError::InvalidInput(format!(
            "unsupported URL scheme: {}",
            parsed.scheme()
        )));
    }

    info!(url = %parsed, "fetching web page");
    let resp = client.get(parsed).send()?;
    let status = resp.status();
    if !status.is_success() {
        return Err(CoreError::Network(format!(
            "server returned {} for {}",
            status.as_u16(),
            url
        )));
    }
    let content_type = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase());
    let body = resp.text()?;
    if let Some(ct) = content_type {
        if !is_html_content_type(&ct) {
            return Err(CoreError::Parse(format!(
                "expected an HTML page, got content type '{}'",
                ct
            )));
        }
    }
    Ok(html_visible_text(&body))
}

fn is_html_content_type(ct: &str) -> bool {
    ct.starts_with("text/html") || ct.starts_with("application/xhtml+xml")
}

/// Visible text nodes in document order, trimmed, joined by a single space.
pub fn html_visible_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    let mut parts = Vec::new();
    for node in doc.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|a| match a.value() {
            Node::Element(e) => HIDDEN_ELEMENTS.contains(&e.name()),
            _ => false,
        });
        if hidden {
            continue;
        }
        let t = text.trim();
        if !t.is_empty() {
            parts.push(t.to_string());
        }
    }
    parts.join(" ")
}
