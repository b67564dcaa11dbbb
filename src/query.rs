//! Query classification
//!
//! Turns free text into one of three lookup intents. Classification never
//! fails: anything that is not a recognisable number form is a name query.

use crate::number_index::normalize_number;
use crate::sets::is_likely_set_hint;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Card numbers are ASCII digits; `\d` would also accept other scripts.

    /// "4/102"
    static ref SLASH_FORM: Regex = Regex::new(r"^([0-9]{1,3})/([0-9]{1,3})$").unwrap();
    /// "base set 4", "swsh #25"
    static ref TRAILING_NUMBER: Regex = Regex::new(r"^(.+?)\s+#?([0-9]{1,3})$").unwrap();
    /// "#25" anywhere, followed by whitespace or end of input
    static ref HASH_NUMBER: Regex = Regex::new(r"#([0-9]{1,3})(?:\s|$)").unwrap();
}

/// What the user is looking for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryIntent {
    /// "4/102": number plus printed set size
    CardNumber {
        number: String,
        set_size: Option<String>,
    },
    /// "base set 4", "charizard #4": number with an optional set hint
    SetNumber {
        set_hint: Option<String>,
        number: String,
        /// Query text with the `#NNN` token removed (hash form only)
        name_query: Option<String>,
    },
    /// Free-text name lookup
    Name { text: String },
}

/// A classified query, keeping the raw input for fallback searches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    raw: String,
    intent: QueryIntent,
}

impl ParsedQuery {
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn intent(&self) -> &QueryIntent {
        &self.intent
    }

    pub fn is_name(&self) -> bool {
        matches!(self.intent, QueryIntent::Name { .. })
    }

    /// Name text carried by the intent, if any
    pub fn name_query(&self) -> Option<&str> {
        match &self.intent {
            QueryIntent::Name { text } => Some(text),
            QueryIntent::SetNumber { name_query, .. } => name_query.as_deref(),
            QueryIntent::CardNumber { .. } => None,
        }
    }
}

/// Classify a raw query. First matching form wins:
/// slash form, trailing number with a set-like prefix, `#NNN` anywhere, name.
pub fn classify(raw: &str) -> ParsedQuery {
    let trimmed = raw.trim();
    let lowered = trimmed.to_lowercase();

    let intent = classify_slash(&lowered)
        .or_else(|| classify_trailing_number(&lowered))
        .or_else(|| classify_hash_number(trimmed))
        .unwrap_or_else(|| QueryIntent::Name {
            text: trimmed.to_string(),
        });

    ParsedQuery {
        raw: raw.to_string(),
        intent,
    }
}

fn classify_slash(lowered: &str) -> Option<QueryIntent> {
    let caps = SLASH_FORM.captures(lowered)?;
    Some(QueryIntent::CardNumber {
        number: normalize_number(&caps[1]),
        set_size: Some(caps[2].to_string()),
    })
}

fn classify_trailing_number(lowered: &str) -> Option<QueryIntent> {
    let caps = TRAILING_NUMBER.captures(lowered)?;
    let prefix = caps[1].trim();
    if !is_likely_set_hint(prefix) {
        return None;
    }
    Some(QueryIntent::SetNumber {
        set_hint: Some(prefix.to_string()),
        number: normalize_number(&caps[2]),
        name_query: None,
    })
}

fn classify_hash_number(trimmed: &str) -> Option<QueryIntent> {
    let caps = HASH_NUMBER.captures(trimmed)?;
    let digits = caps.get(1)?;
    // The token is '#' plus its digits; trailing whitespace stays in the text.
    let token_start = digits.start() - 1;

    let rest = format!("{} {}", &trimmed[..token_start], &trimmed[digits.end()..]);
    let rest = rest.split_whitespace().collect::<Vec<_>>().join(" ");
    let rest = (!rest.is_empty()).then_some(rest);

    Some(QueryIntent::SetNumber {
        set_hint: rest.clone(),
        number: normalize_number(digits.as_str()),
        name_query: rest,
    })
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
