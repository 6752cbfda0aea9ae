use base64::{engine::general_purpose, Engine as _};
use lazy_static::lazy_static;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::LoggerResult;

lazy_static! {
    // Local numbers (0 + 9 digits, optionally grouped) and the +213 prefix form
    static ref LOCAL_PHONE_REGEX: Regex =
        Regex::new(r"(?:\+213[-.\s]?|\b0)[2-7]\d{2}(?:[-.\s]?\d{2}){3}\b").unwrap();
    static ref INTERNATIONAL_PHONE_REGEX: Regex =
        Regex::new(r"\+\d{1,3}[-.\s]?\d{6,12}\b").unwrap();
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap();
    static ref DEFAULT_REDACTOR: PiiRedactor = PiiRedactor::new(RedactionConfig::default());
}

static REDACTION_ENABLED: AtomicBool = AtomicBool::new(true);

/// PII redaction configuration
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub redact_phones: bool,
    pub redact_emails: bool,
    pub hash_for_correlation: bool,
    pub custom_patterns: Vec<(Regex, String)>,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            redact_phones: true,
            redact_emails: true,
            hash_for_correlation: true,
            custom_patterns: Vec::new(),
        }
    }
}

impl RedactionConfig {
    pub fn with_custom_pattern(mut self, pattern: &str, replacement: &str) -> LoggerResult<Self> {
        self.custom_patterns
            .push((Regex::new(pattern)?, replacement.to_string()));
        Ok(self)
    }
}

/// PII redactor for log messages
#[derive(Debug, Clone)]
pub struct PiiRedactor {
    config: RedactionConfig,
}

impl PiiRedactor {
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    pub fn redact(&self, text: &str) -> String {
        let mut result = text.to_string();

        if self.config.redact_phones {
            result = self.redact_phones(&result);
        }

        if self.config.redact_emails {
            result = self.redact_emails(&result);
        }

        for (pattern, replacement) in &self.config.custom_patterns {
            result = pattern.replace_all(&result, replacement.as_str()).to_string();
        }

        result
    }

    fn redact_phones(&self, text: &str) -> String {
        let local = LOCAL_PHONE_REGEX
            .replace_all(text, |caps: &regex::Captures| self.mask_phone(&caps[0]))
            .to_string();
        INTERNATIONAL_PHONE_REGEX
            .replace_all(&local, |caps: &regex::Captures| self.mask_phone(&caps[0]))
            .to_string()
    }

    fn mask_phone(&self, phone: &str) -> String {
        if self.config.hash_for_correlation {
            format!("PHONE[{}]", self.hash_value(phone))
        } else {
            let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
            let tail = digits.get(digits.len().saturating_sub(2)..).unwrap_or("");
            format!("********{}", tail)
        }
    }

    fn redact_emails(&self, text: &str) -> String {
        EMAIL_REGEX
            .replace_all(text, |caps: &regex::Captures| {
                let email = &caps[0];
                if self.config.hash_for_correlation {
                    format!("EMAIL[{}]", self.hash_value(email))
                } else {
                    match email.split_once('@') {
                        Some((local, domain)) => format!(
                            "{}***@{}***",
                            local.chars().next().unwrap_or('*'),
                            domain.chars().next().unwrap_or('*')
                        ),
                        None => "***@***".to_string(),
                    }
                }
            })
            .to_string()
    }

    fn hash_value(&self, value: &str) -> String {
        // Digits only, so "0555 67 89 01" and "0555678901" correlate
        let normalized: String = if value.chars().any(|c| c == '@') {
            value.to_lowercase()
        } else {
            value.chars().filter(char::is_ascii_digit).collect()
        };

        let mut hasher = Sha256::new();
        hasher.update(normalized.as_bytes());
        let result = hasher.finalize();
        general_purpose::STANDARD_NO_PAD.encode(&result[..8])
    }
}

/// Redact with the process-wide default configuration.
///
/// A no-op when redaction has been disabled through [`crate::LoggerConfig`].
pub fn redact(text: &str) -> String {
    if REDACTION_ENABLED.load(Ordering::Relaxed) {
        DEFAULT_REDACTOR.redact(text)
    } else {
        text.to_string()
    }
}

pub(crate) fn set_redaction_enabled(enabled: bool) {
    REDACTION_ENABLED.store(enabled, Ordering::Relaxed);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn masking_redactor() -> PiiRedactor {
        PiiRedactor::new(RedactionConfig {
            hash_for_correlation: false,
            ..Default::default()
        })
    }

    #[test]
    fn test_local_phone_redaction() {
        let redacted = masking_redactor().redact("Call back 0555678901 tomorrow");
        assert_eq!(redacted, "Call back ********01 tomorrow");
    }

    #[test]
    fn test_grouped_and_prefixed_phone_redaction() {
        let redactor = masking_redactor();
        assert!(!redactor.redact("tel: 0555 67 89 01").contains("67 89"));
        assert!(!redactor.redact("tel: +213 555 67 89 01").contains("555"));
        assert!(!redactor.redact("tel: +33612345678").contains("612345678"));
    }

    #[test]
    fn test_amounts_and_ids_are_untouched() {
        let redactor = masking_redactor();
        let text = "Payment of 20000 DA recorded, care total 80000";
        assert_eq!(redactor.redact(text), text);
    }

    #[test]
    fn test_email_redaction() {
        let redacted = masking_redactor().redact("Contact john.doe@example.com");
        assert!(redacted.contains("j***@e***"));
    }

    #[test]
    fn test_hash_correlates_formatting_variants() {
        let redactor = PiiRedactor::new(RedactionConfig::default());
        let a = redactor.redact("0555678901");
        let b = redactor.redact("0555 67 89 01");
        assert!(a.starts_with("PHONE["));
        assert_eq!(a, b);
    }

    #[test]
    fn test_custom_pattern() {
        let config = RedactionConfig::default()
            .with_custom_pattern(r"NSS-\d+", "NSS-[REDACTED]")
            .unwrap();
        let redactor = PiiRedactor::new(config);
        assert_eq!(redactor.redact("card NSS-99812"), "card NSS-[REDACTED]");
    }

    #[test]
    fn test_invalid_custom_pattern_is_an_error() {
        assert!(RedactionConfig::default()
            .with_custom_pattern("(unclosed", "x")
            .is_err());
    }
}
