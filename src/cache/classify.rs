//! Deciding whether an origin result may be cached

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What the fetcher handed back on success.
///
/// A `Transient` result is returned to the caller but never written to a
/// cache layer. Fatal failures are the fetcher's `Err`.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Ok(T),
    Transient { payload: T, reason: String },
}

impl<T> Fetched<T> {
    pub fn ok(payload: T) -> Self {
        Fetched::Ok(payload)
    }

    pub fn transient(payload: T, reason: impl Into<String>) -> Self {
        Fetched::Transient {
            payload,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cacheability {
    Cacheable,
    /// Null or otherwise absent result.
    Empty,
    Transient(String),
}

/// Inspects serialized origin payloads for error shapes that must not be cached.
pub trait TransientClassifier: Send + Sync {
    fn classify(&self, payload: &Value) -> Cacheability;
}

pub const DEFAULT_TRANSIENT_PATTERNS: &[&str] = &["rate limit", "too many requests", "quota"];

/// Flags payloads carrying a top-level `error` that matches a configured phrase
/// or an HTTP 429/5xx code, or a `status`/`statusCode` field of 429/5xx.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternClassifier {
    patterns: Vec<String>,
    match_status_codes: bool,
}

impl Default for PatternClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSIENT_PATTERNS.iter().map(|p| p.to_string()))
    }
}

impl PatternClassifier {
    pub fn new<I: IntoIterator<Item = String>>(patterns: I) -> Self {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
            match_status_codes: true,
        }
    }

    /// Only `null` payloads are rejected.
    pub fn disabled() -> Self {
        Self {
            patterns: Vec::new(),
            match_status_codes: false,
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    fn classify_error_text(&self, text: &str) -> Option<String> {
        let lower = text.to_lowercase();
        if let Some(pattern) = self.patterns.iter().find(|p| lower.contains(p.as_str())) {
            return Some(format!("error matches '{}'", pattern));
        }
        if self.match_status_codes {
            let code = lower
                .split(|c: char| !c.is_ascii_digit())
                .filter(|t| t.len() == 3)
                .filter_map(|t| t.parse::<u16>().ok())
                .find(|c| is_transient_status(*c));
            if let Some(code) = code {
                return Some(format!("error carries status {}", code));
            }
        }
        None
    }
}

impl TransientClassifier for PatternClassifier {
    fn classify(&self, payload: &Value) -> Cacheability {
        let object = match payload {
            Value::Null => return Cacheability::Empty,
            Value::Object(object) => object,
            _ => return Cacheability::Cacheable,
        };

        if let Some(error) = object.get("error") {
            let text = match error {
                Value::String(s) => Some(s.clone()),
                Value::Object(inner) => inner
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                _ => None,
            };
            if let Some(reason) = text.and_then(|t| self.classify_error_text(&t)) {
                return Cacheability::Transient(reason);
            }
        }

        if self.match_status_codes {
            let status = ["status", "statusCode"]
                .iter()
                .filter_map(|f| object.get(*f))
                .find_map(|v| v.as_u64().or_else(|| v.as_str().and_then(|s| s.parse().ok())));
            if let Some(code) = status.and_then(|c| u16::try_from(c).ok()) {
                if is_transient_status(code) {
                    return Cacheability::Transient(format!("status {}", code));
                }
            }
        }

        Cacheability::Cacheable
    }
}

fn is_transient_status(code: u16) -> bool {
    code == 429 || (500..600).contains(&code)
}
