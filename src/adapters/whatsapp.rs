use crate::domain::ports::LinkOpener;
use crate::utils::error::{Result, VillaError};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

const CHAT_BASE: &str = "https://wa.me/";

/// Same set `encodeURIComponent` leaves alone.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// `https://wa.me/<digits>?text=<message>`
pub fn chat_link(number: &str, text: &str) -> Result<Url> {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(VillaError::InvalidConfigValueError {
            field: "contact".to_string(),
            value: number.to_string(),
            reason: "WhatsApp number has no digits".to_string(),
        });
    }

    let mut url = Url::parse(CHAT_BASE)
        .and_then(|base| base.join(&digits))
        .map_err(|e| VillaError::ConfigError {
            message: format!("Cannot build WhatsApp link: {}", e),
        })?;

    let encoded = utf8_percent_encode(text, COMPONENT).to_string();
    url.set_query(Some(&format!("text={}", encoded)));
    Ok(url)
}

/// Prints the chat link so the user can open it.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutLinkOpener;

impl LinkOpener for StdoutLinkOpener {
    fn open(&self, destination: &str, text: &str) {
        match chat_link(destination, text) {
            Ok(url) => {
                tracing::debug!("Opening WhatsApp chat with {}", destination);
                println!("{}", url);
            }
            Err(e) => {
                tracing::error!("❌ Could not build WhatsApp link: {}", e);
                eprintln!("❌ {}", e.user_friendly_message());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_link_encodes_like_uri_component() {
        let url = chat_link("+6282210081028", "Villa Kabut\nRating: 4.5 (*)").unwrap();
        assert_eq!(
            url.as_str(),
            "https://wa.me/6282210081028?text=Villa%20Kabut%0ARating%3A%204.5%20(*)"
        );
    }

    #[test]
    fn test_chat_link_encodes_emoji() {
        let url = chat_link("6282210081028", "🚨").unwrap();
        assert_eq!(url.query(), Some("text=%F0%9F%9A%A8"));
    }

    #[test]
    fn test_chat_link_requires_digits() {
        assert!(chat_link("+", "hi").is_err());
    }
}
