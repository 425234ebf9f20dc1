use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use crate::models::ProductSnapshot;

const TITLE_SELECTOR: &str = "#productTitle";

/// Ordered fallback list; the first selector with a match wins and the rest
/// are never consulted.
const PRICE_SELECTORS: &[&str] = &["span.a-price-whole", "span.a-offscreen"];

// Grouped digits with optional thousands separators and an optional decimal
// fraction, e.g. "35,999" or "1,234.56". The comma-grouped alternative comes
// first so "35,999" is not cut short at "35".
const PRICE_PATTERN: &str = r"(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?";

/// Outcome of one extraction attempt. The two degraded cases are distinct so
/// callers can tell a redesigned page from a price they merely failed to
/// read.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Complete(ProductSnapshot),
    /// The price node was found but its text held no numeric pattern.
    PriceUnparsed { title: String, raw: String },
    /// Title or price node missing; the markup no longer matches.
    ElementsMissing,
}

pub struct ProductExtractor {
    title_selector: Selector,
    price_selectors: Vec<Selector>,
    price_regex: Regex,
}

impl Default for ProductExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductExtractor {
    pub fn new() -> Self {
        Self {
            title_selector: Selector::parse(TITLE_SELECTOR).unwrap(),
            price_selectors: PRICE_SELECTORS
                .iter()
                .map(|s| Selector::parse(s).unwrap())
                .collect(),
            price_regex: Regex::new(PRICE_PATTERN).unwrap(),
        }
    }

    pub fn extract(&self, html: &str, url: &str) -> Extraction {
        let document = Html::parse_document(html);

        let title = document.select(&self.title_selector).next().map(element_text);
        let price_text = self
            .price_selectors
            .iter()
            .find_map(|selector| document.select(selector).next())
            .map(element_text);

        let (Some(title), Some(raw)) = (title, price_text) else {
            warn!(url, "could not find title or price elements; the page structure may have changed");
            return Extraction::ElementsMissing;
        };

        match self.parse_price(&raw) {
            Some(price) => Extraction::Complete(ProductSnapshot {
                title,
                price,
                url: url.to_string(),
            }),
            None => {
                warn!(url, raw = %raw, "price text held no numeric value");
                Extraction::PriceUnparsed { title, raw }
            }
        }
    }

    /// Pulls the first numeric pattern out of the price text, strips the
    /// thousands separators and parses the rest as a float.
    pub fn parse_price(&self, text: &str) -> Option<f64> {
        let matched = self.price_regex.find(text)?;
        matched.as_str().replace(',', "").parse().ok()
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    // Collapses the whitespace sprawl typical of product markup
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const URL: &str = "https://example.com/product/123";

    fn page(title: &str, price_html: &str) -> String {
        format!(
            r#"<html><body>
                <span id="productTitle"> {title} </span>
                <div class="a-price">{price_html}</div>
            </body></html>"#
        )
    }

    #[rstest]
    #[case("35,999", 35999.0)]
    #[case("1,234.56", 1234.56)]
    #[case("1499", 1499.0)]
    #[case("12,345,678.90", 12345678.9)]
    #[case("₹ 35,999.00 incl. taxes", 35999.0)]
    #[case("0.99", 0.99)]
    fn parses_grouped_prices(#[case] text: &str, #[case] expected: f64) {
        let extractor = ProductExtractor::new();
        assert_eq!(extractor.parse_price(text), Some(expected));
    }

    #[rstest]
    #[case("")]
    #[case("not a price")]
    #[case("Currently unavailable")]
    fn rejects_digitless_text(#[case] text: &str) {
        let extractor = ProductExtractor::new();
        assert_eq!(extractor.parse_price(text), None);
    }

    #[test]
    fn test_extract_complete_snapshot() {
        let extractor = ProductExtractor::new();
        let html = page(
            "Noise Cancelling Headphones",
            r#"<span class="a-price-whole">35,999</span>"#,
        );

        let extraction = extractor.extract(&html, URL);
        assert_eq!(
            extraction,
            Extraction::Complete(ProductSnapshot {
                title: "Noise Cancelling Headphones".to_string(),
                price: 35999.0,
                url: URL.to_string(),
            })
        );
    }

    #[test]
    fn test_primary_selector_wins_over_fallback() {
        let extractor = ProductExtractor::new();
        let html = page(
            "Noise Cancelling Headphones",
            r#"<span class="a-price-whole">35,999</span>
               <span class="a-offscreen">$99.99</span>"#,
        );

        let Extraction::Complete(snapshot) = extractor.extract(&html, URL) else {
            panic!("expected a complete extraction");
        };
        assert_eq!(snapshot.price, 35999.0);
    }

    #[test]
    fn test_fallback_selector_used_when_primary_absent() {
        let extractor = ProductExtractor::new();
        let html = page(
            "Noise Cancelling Headphones",
            r#"<span class="a-offscreen">$1,234.56</span>"#,
        );

        let Extraction::Complete(snapshot) = extractor.extract(&html, URL) else {
            panic!("expected a complete extraction");
        };
        assert_eq!(snapshot.price, 1234.56);
    }

    #[test]
    fn test_missing_title_is_elements_missing() {
        let extractor = ProductExtractor::new();
        let html = r#"<html><body>
            <span class="a-price-whole">35,999</span>
        </body></html>"#;

        assert_eq!(extractor.extract(html, URL), Extraction::ElementsMissing);
    }

    #[test]
    fn test_missing_price_node_is_elements_missing() {
        let extractor = ProductExtractor::new();
        let html = r#"<html><body>
            <span id="productTitle">Noise Cancelling Headphones</span>
        </body></html>"#;

        assert_eq!(extractor.extract(html, URL), Extraction::ElementsMissing);
    }

    #[test]
    fn test_unparseable_price_text_keeps_the_title() {
        let extractor = ProductExtractor::new();
        let html = page(
            "Noise Cancelling Headphones",
            r#"<span class="a-price-whole">Currently unavailable</span>"#,
        );

        assert_eq!(
            extractor.extract(&html, URL),
            Extraction::PriceUnparsed {
                title: "Noise Cancelling Headphones".to_string(),
                raw: "Currently unavailable".to_string(),
            }
        );
    }

    #[test]
    fn test_element_text_is_trimmed_and_joined() {
        let extractor = ProductExtractor::new();
        let html = page(
            "Noise <b>Cancelling</b> Headphones",
            r#"<span class="a-price-whole">1,499</span>"#,
        );

        let Extraction::Complete(snapshot) = extractor.extract(&html, URL) else {
            panic!("expected a complete extraction");
        };
        assert_eq!(snapshot.title, "Noise Cancelling Headphones");
    }
}
