use serde::{Deserialize, Serialize};

use crate::error::ShortenError;

/// Body of `POST /api/link`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ShortenRequest {
    pub url: String,
    /// The short URLs to create for this link. `None` lets the server pick one.
    pub shortcuts: Option<Vec<String>>,
}

impl ShortenRequest {
    /// Builds a request from the raw form values.
    ///
    /// Both values are trimmed. An empty link is rejected, an empty shortlink
    /// means "generate one for me".
    pub fn from_form(link: &str, shortlink: &str) -> Result<Self, ShortenError> {
        let link = trim_form_value(link);
        let shortlink = trim_form_value(shortlink);

        if link.is_empty() {
            return Err(ShortenError::Validation);
        }

        Ok(Self {
            url: link.to_string(),
            shortcuts: (!shortlink.is_empty()).then(|| vec![shortlink.to_string()]),
        })
    }
}

/// Trims like a browser's `String.prototype.trim`, which also strips the byte order mark.
fn trim_form_value(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// One entry of `GET /api/link`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LinkSummary {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub shortcuts: Vec<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_shortlink_leaves_shortcuts_null() {
        let request = ShortenRequest::from_form("https://example.com", "").unwrap();

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "url": "https://example.com", "shortcuts": null })
        );
    }

    #[test]
    fn whitespace_shortlink_counts_as_empty() {
        let request = ShortenRequest::from_form("https://example.com", " \t\n").unwrap();

        assert_eq!(request.shortcuts, None);
    }

    #[test]
    fn shortlink_becomes_single_trimmed_shortcut() {
        let request = ShortenRequest::from_form("  https://example.com/a b ", "  docs ").unwrap();

        assert_eq!(request.url, "https://example.com/a b");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "url": "https://example.com/a b", "shortcuts": ["docs"] })
        );
    }

    #[test]
    fn blank_link_is_rejected() {
        for link in ["", "   ", "\n\t"] {
            assert!(matches!(
                ShortenRequest::from_form(link, "docs"),
                Err(ShortenError::Validation)
            ));
        }
    }

    #[test]
    fn byte_order_mark_is_trimmed() {
        assert!(matches!(
            ShortenRequest::from_form("\u{feff}", ""),
            Err(ShortenError::Validation)
        ));

        let request =
            ShortenRequest::from_form("\u{feff} https://example.com\u{a0}", "\u{feff}").unwrap();
        assert_eq!(request.url, "https://example.com");
        assert_eq!(request.shortcuts, None);
    }

    #[test]
    fn link_summary_tolerates_missing_shortcuts_and_extra_fields() {
        let summary: LinkSummary = serde_json::from_value(json!({
            "id": "abc",
            "url": "https://example.com",
            "created": "2025-01-01",
        }))
        .unwrap();

        assert_eq!(summary.shortcuts, Vec::<String>::new());
    }
}
