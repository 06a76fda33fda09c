//! Document eligibility checks
//!
//! A cheap structural gate applied before normalization and storage. Lengths
//! are counted in Unicode scalar values, not bytes.

use finnews_common::Document;
use thiserror::Error;

pub const DEFAULT_MIN_TITLE_CHARS: usize = 4;
pub const DEFAULT_MIN_TEXT_CHARS: usize = 20;
pub const DEFAULT_MAX_TEXT_CHARS: usize = 1_000_000;
pub const DEFAULT_URL_PREFIX: &str = "http";

/// Why a document was not eligible
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("source is empty")]
    MissingSource,

    #[error("url is empty")]
    MissingUrl,

    #[error("title is empty")]
    MissingTitle,

    #[error("text is empty or blank")]
    BlankText,

    #[error("title has {chars} characters, minimum is {min}")]
    TitleTooShort { chars: usize, min: usize },

    #[error("text has {chars} characters, minimum is {min}")]
    TextTooShort { chars: usize, min: usize },

    #[error("text has {chars} characters, maximum is {max}")]
    TextTooLong { chars: usize, max: usize },

    #[error("url does not start with '{prefix}'")]
    UrlScheme { prefix: String },
}

/// Thresholds for [`ValidationRules::check`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRules {
    pub min_title_chars: usize,
    pub min_text_chars: usize,
    pub max_text_chars: usize,
    pub url_prefix: String,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            min_title_chars: DEFAULT_MIN_TITLE_CHARS,
            min_text_chars: DEFAULT_MIN_TEXT_CHARS,
            max_text_chars: DEFAULT_MAX_TEXT_CHARS,
            url_prefix: DEFAULT_URL_PREFIX.to_string(),
        }
    }
}

impl ValidationRules {
    /// First failing rule, if any
    pub fn check(&self, doc: &Document) -> Result<(), Rejection> {
        if doc.source.is_empty() {
            return Err(Rejection::MissingSource);
        }
        if doc.url.is_empty() {
            return Err(Rejection::MissingUrl);
        }
        if doc.title.is_empty() {
            return Err(Rejection::MissingTitle);
        }
        if doc.raw_text.trim().is_empty() {
            return Err(Rejection::BlankText);
        }

        let title_chars = doc.title.chars().count();
        if title_chars < self.min_title_chars {
            return Err(Rejection::TitleTooShort {
                chars: title_chars,
                min: self.min_title_chars,
            });
        }

        let text_chars = doc.raw_text.chars().count();
        if text_chars < self.min_text_chars {
            return Err(Rejection::TextTooShort {
                chars: text_chars,
                min: self.min_text_chars,
            });
        }
        if text_chars > self.max_text_chars {
            return Err(Rejection::TextTooLong {
                chars: text_chars,
                max: self.max_text_chars,
            });
        }

        if !doc.url.starts_with(&self.url_prefix) {
            return Err(Rejection::UrlScheme {
                prefix: self.url_prefix.clone(),
            });
        }

        Ok(())
    }

    pub fn accepts(&self, doc: &Document) -> bool {
        self.check(doc).is_ok()
    }
}

/// Eligibility under the default rules
pub fn is_valid(doc: &Document) -> bool {
    ValidationRules::default().accepts(doc)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use finnews_common::Meta;

    fn doc(title: &str, text: &str, url: &str) -> Document {
        let now = Utc::now();
        Document {
            source: "interfax".to_string(),
            url: url.to_string(),
            title: title.to_string(),
            raw_text: text.to_string(),
            published_at: None,
            fetched_at: now,
            processed_at: now,
            meta: Meta::new(),
        }
    }

    fn text_of(chars: usize) -> String {
        "я".repeat(chars)
    }

    const URL: &str = "https://www.interfax.ru/business/1";

    #[test]
    fn test_accepts_well_formed_document() {
        assert!(is_valid(&doc("Рынок акций", &text_of(40), URL)));
    }

    #[test]
    fn test_title_length_boundary() {
        let text = text_of(40);
        assert_eq!(
            ValidationRules::default().check(&doc("abc", &text, URL)),
            Err(Rejection::TitleTooShort { chars: 3, min: 4 })
        );
        assert!(is_valid(&doc("abcd", &text, URL)));
        // counted in characters, not bytes
        assert!(!is_valid(&doc("ЦБР", &text, URL)));
        assert!(is_valid(&doc("ЦБРФ", &text, URL)));
    }

    #[test]
    fn test_text_minimum_boundary() {
        assert!(!is_valid(&doc("Title", &text_of(19), URL)));
        assert!(is_valid(&doc("Title", &text_of(20), URL)));
    }

    #[test]
    fn test_text_maximum_boundary() {
        assert!(is_valid(&doc("Title", &"a".repeat(1_000_000), URL)));
        assert_eq!(
            ValidationRules::default().check(&doc("Title", &"a".repeat(1_000_001), URL)),
            Err(Rejection::TextTooLong {
                chars: 1_000_001,
                max: 1_000_000
            })
        );
    }

    #[test]
    fn test_url_scheme_gate() {
        let text = text_of(40);
        assert_eq!(
            ValidationRules::default().check(&doc("Title", &text, "ftp://x")),
            Err(Rejection::UrlScheme {
                prefix: "http".to_string()
            })
        );
        assert!(is_valid(&doc("Title", &text, "http://example.com/a")));
    }

    #[test]
    fn test_empty_fields_rejected() {
        let text = text_of(40);
        let rules = ValidationRules::default();

        let mut d = doc("Title", &text, URL);
        d.source.clear();
        assert_eq!(rules.check(&d), Err(Rejection::MissingSource));

        assert_eq!(rules.check(&doc("Title", &text, "")), Err(Rejection::MissingUrl));
        assert_eq!(rules.check(&doc("", &text, URL)), Err(Rejection::MissingTitle));
        assert_eq!(
            rules.check(&doc("Title", " \n\t                     ", URL)),
            Err(Rejection::BlankText)
        );
    }

    #[test]
    fn test_custom_rules() {
        let rules = ValidationRules {
            min_title_chars: 1,
            url_prefix: "https".to_string(),
            ..Default::default()
        };
        let text = text_of(40);
        assert!(rules.accepts(&doc("A", &text, URL)));
        assert!(!rules.accepts(&doc("A", &text, "http://plain")));
    }
}
