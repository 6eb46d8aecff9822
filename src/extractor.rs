use log::{debug, info};
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};

use crate::api::PageFetcher;
use crate::error::Result;

pub const NO_PARAGRAPH: &str = "No paragraph found.";
pub const BIO_NOT_AVAILABLE: &str = "Bio not available";

// TemplateStyles and friends sit inside lead paragraphs but never render
const HIDDEN_TAGS: [&str; 3] = ["style", "script", "template"];

pub struct BioExtractor {
    infobox_selector: Selector,
    citation_regex: Regex,
    aside_regex: Regex,
    phonetic_regex: Regex,
    whitespace_regex: Regex,
}

impl Default for BioExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl BioExtractor {
    pub fn new() -> Self {
        BioExtractor {
            infobox_selector: Selector::parse("table.infobox").expect("valid infobox selector"),
            // [1], [citation needed], [a]
            citation_regex: Regex::new(r"\[.*?\]").expect("valid citation regex"),
            // (born 1 January 1900)
            aside_regex: Regex::new(r"\([^)]*\)").expect("valid aside regex"),
            // /ˈbaɪdən/
            phonetic_regex: Regex::new(r"/.*?/").expect("valid phonetic regex"),
            whitespace_regex: Regex::new(r"\s+").expect("valid whitespace regex"),
        }
    }

    // fetch errors go back to the caller, which decides on the sentinel
    pub fn extract_bio<F: PageFetcher + ?Sized>(&self, page_url: &str, pages: &F) -> Result<String> {
        let html = pages.fetch_page(page_url)?;
        let bio = self.bio_from_html(&html);

        debug!("Cleaned paragraph: {}", bio);
        info!("{} done", page_url);
        Ok(bio)
    }

    pub fn bio_from_html(&self, html: &str) -> String {
        let document = Html::parse_document(html);
        match self.lead_paragraph(&document) {
            Some(text) => self.clean_text(&text),
            None => NO_PARAGRAPH.to_string(),
        }
    }

    // First `<p>` sibling after the first infobox.
    fn lead_paragraph(&self, document: &Html) -> Option<String> {
        let infobox = document.select(&self.infobox_selector).next()?;
        let paragraph = infobox
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "p")?;

        let text = paragraph
            .descendants()
            .filter(|node| {
                !node.ancestors().any(|a| {
                    a.value()
                        .as_element()
                        .map_or(false, |el| HIDDEN_TAGS.contains(&el.name()))
                })
            })
            .filter_map(|node| match node.value() {
                Node::Text(text) => Some(text.trim()),
                _ => None,
            })
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Some(text)
    }

    pub fn clean_text(&self, text: &str) -> String {
        let text = self.citation_regex.replace_all(text, "");
        let text = self.aside_regex.replace_all(&text, "");
        let text = self.phonetic_regex.replace_all(&text, "");
        let text = self.whitespace_regex.replace_all(&text, " ");

        text.replace(" ,", ",")
            .replace(" .", ".")
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::cell::RefCell;

    fn page(body: &str) -> String {
        format!("<!DOCTYPE html><html><head><title>t</title></head><body>{}</body></html>", body)
    }

    const INFOBOX: &str = r#"<table class="infobox vcard"><tbody><tr><th>Born</th><td>1900</td></tr></tbody></table>"#;

    #[test]
    fn test_cleans_lead_paragraph() {
        let extractor = BioExtractor::new();
        let html = page(&format!("{}<p>John Smith (born 1 Jan 1900) [1] was a  leader .</p>", INFOBOX));

        assert_eq!(extractor.bio_from_html(&html), "John Smith was a leader.");
    }

    #[test]
    fn test_joins_inline_fragments() {
        let extractor = BioExtractor::new();
        let html = page(&format!(
            "{}<p><b>Jane Roe</b> /dʒeɪn roʊ/ was Prime Minister<sup>[2]</sup> of <a href=\"/wiki/X\">Xland</a> , twice.</p>",
            INFOBOX
        ));

        assert_eq!(extractor.bio_from_html(&html), "Jane Roe was Prime Minister of Xland, twice.");
    }

    #[test]
    fn test_ignores_inline_style_and_script() {
        let extractor = BioExtractor::new();
        let html = page(&format!(
            "{}<p><b>Joe Bloggs</b><style data-mw-deduplicate=\"TemplateStyles:r1\">.mw-parser-output .IPA{{font-family:sans-serif}}</style> is a politician<script>var x = 1;</script> .</p>",
            INFOBOX
        ));

        assert_eq!(extractor.bio_from_html(&html), "Joe Bloggs is a politician.");
    }

    #[test]
    fn test_skips_non_paragraph_siblings() {
        let extractor = BioExtractor::new();
        let html = page(&format!(
            "<p>Hatnote before the infobox.</p>{}<div>Coordinates</div>\n<p>Lead text.</p><p>Second.</p>",
            INFOBOX
        ));

        assert_eq!(extractor.bio_from_html(&html), "Lead text.");
    }

    #[test]
    fn test_no_infobox() {
        let extractor = BioExtractor::new();
        let html = page("<table class=\"wikitable\"></table><p>Some text.</p>");

        assert_eq!(extractor.bio_from_html(&html), NO_PARAGRAPH);
    }

    #[test]
    fn test_infobox_without_following_paragraph() {
        let extractor = BioExtractor::new();
        let html = page(&format!("<div>{}</div><p>Outside the infobox's parent.</p>", INFOBOX));

        assert_eq!(extractor.bio_from_html(&html), NO_PARAGRAPH);
    }

    #[test]
    fn test_clean_text_is_idempotent_on_clean_input() {
        let extractor = BioExtractor::new();
        let clean = "Joseph Robinette Biden Jr. is an American politician, and the 46th president.";

        assert_eq!(extractor.clean_text(clean), clean);
        let once = extractor.clean_text("A [1] (x) /y/ b ,  c .");
        assert_eq!(once, "A b, c.");
        assert_eq!(extractor.clean_text(&once), once);
    }

    struct FakePages {
        requested: RefCell<Vec<String>>,
        body: Option<String>,
    }

    impl PageFetcher for FakePages {
        fn fetch_page(&self, url: &str) -> Result<String> {
            self.requested.borrow_mut().push(url.to_string());
            match &self.body {
                Some(body) => Ok(body.clone()),
                None => Err(Error::InvalidPageUrl(url.to_string())),
            }
        }
    }

    #[test]
    fn test_extract_bio_uses_fetcher() {
        let extractor = BioExtractor::new();
        let pages = FakePages {
            requested: RefCell::new(Vec::new()),
            body: Some(page(&format!("{}<p>Ada Lovelace [3] was here .</p>", INFOBOX))),
        };

        let bio = extractor.extract_bio("https://en.wikipedia.org/wiki/Ada", &pages).unwrap();
        assert_eq!(bio, "Ada Lovelace was here.");
        assert_eq!(pages.requested.borrow().as_slice(), ["https://en.wikipedia.org/wiki/Ada"]);
    }

    #[test]
    fn test_extract_bio_propagates_fetch_error() {
        let extractor = BioExtractor::new();
        let pages = FakePages { requested: RefCell::new(Vec::new()), body: None };

        assert!(extractor.extract_bio("https://en.wikipedia.org/wiki/Nobody", &pages).is_err());
    }
}
