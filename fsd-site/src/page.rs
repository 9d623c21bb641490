//! Detail page handling: the article fragment kept on disk and the paragraph
//! text handed to field extraction.

use crate::error::{Result, SiteError};
use scraper::{Html, Selector};
use std::sync::LazyLock;

/// Container holding a project's descriptive paragraphs.
pub const CONTENT_SELECTOR: &str = "div.content-article";

static CONTENT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(CONTENT_SELECTOR).expect("valid content selector"));
static PARAGRAPHS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(&format!("{CONTENT_SELECTOR} p")).expect("valid paragraph selector")
});

/// Outer HTML of the article container, the part of a detail page that gets
/// cached.
pub fn content_fragment(document: &Html) -> Result<String> {
    document
        .select(&CONTENT)
        .next()
        .map(|div| div.html().trim().to_string())
        .ok_or(SiteError::MissingContent)
}

/// Paragraph text of the article container: one trimmed line per non-empty
/// paragraph, with non-breaking spaces turned into plain spaces.
pub fn page_text(document: &Html) -> String {
    document
        .select(&PARAGRAPHS)
        .map(|p| p.text().collect::<String>().replace('\u{a0}', " "))
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect::<Vec<String>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL: &str = "<html><body>
<div class=\"header\"><p>Menu</p></div>
<div class=\"content-article wide\">
  <p>  The 1180\u{a0}kWp plant is installed on a reservoir, located in Japan.  </p>
  <p> </p>
  <p>It uses 4 536 panels (<strong>260 Wp modules</strong>).</p>
</div>
</body></html>";

    #[test]
    fn test_page_text() {
        let document = Html::parse_document(DETAIL);
        let text = page_text(&document);
        assert_eq!(
            text,
            "The 1180 kWp plant is installed on a reservoir, located in Japan.\n\
             It uses 4 536 panels (260 Wp modules)."
        );
    }

    #[test]
    fn test_page_text_without_article() {
        let document = Html::parse_document("<html><body><p>Nothing</p></body></html>");
        assert_eq!(page_text(&document), "");
    }

    #[test]
    fn test_content_fragment_round_trip() {
        let document = Html::parse_document(DETAIL);
        let fragment = content_fragment(&document).unwrap();
        assert!(fragment.starts_with("<div class=\"content-article wide\">"));
        assert!(!fragment.contains("Menu"));

        let cached = Html::parse_document(&fragment);
        assert_eq!(page_text(&cached), page_text(&document));
    }

    #[test]
    fn test_content_fragment_missing() {
        let document = Html::parse_document("<html><body></body></html>");
        assert!(matches!(
            content_fragment(&document),
            Err(SiteError::MissingContent)
        ));
    }
}
