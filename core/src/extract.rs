use crate::error::ExtractError;
use crate::Document;
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};

lazy_static! {
    static ref SEL_TITLE: Selector = Selector::parse("title").expect("valid selector");
    static ref SEL_DESCRIPTION: Selector = Selector::parse(r#"meta[name="description"]"#).expect("valid selector");
    static ref SEL_BODY: Selector = Selector::parse("body").expect("valid selector");
}

/// Elements whose text never renders.
const HIDDEN: &[&str] = &["script", "style", "noscript", "template"];

/// Pull title, meta description and visible body text out of an HTML page.
///
/// Missing elements become empty strings. Only input that is not markup at all is an error.
pub fn extract(id: &str, raw: &str) -> Result<Document, ExtractError> {
    if raw.trim().is_empty() {
        return Err(ExtractError::Empty);
    }
    if !raw.contains('<') {
        return Err(ExtractError::NotMarkup);
    }

    let html = Html::parse_document(raw);
    let title = html
        .select(&SEL_TITLE)
        .next()
        .map(|n| n.text().collect::<String>())
        .unwrap_or_default();
    let description = html
        .select(&SEL_DESCRIPTION)
        .next()
        .and_then(|n| n.value().attr("content"))
        .unwrap_or_default();
    let body = html.select(&SEL_BODY).next().map(visible_text).unwrap_or_default();

    Ok(Document {
        id: id.to_string(),
        title: title.trim().to_string(),
        description: description.trim().to_string(),
        body,
    })
}

/// Text nodes joined as they appear, so inline tags never split a word,
/// then whitespace runs collapsed to single spaces.
fn visible_text(root: ElementRef<'_>) -> String {
    let mut raw = String::new();
    for node in root.descendants() {
        let Some(text) = node.value().as_text() else { continue };
        let hidden = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .map_or(false, |e| HIDDEN.contains(&e.name()))
        });
        if !hidden {
            raw.push_str(text);
        }
    }
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
