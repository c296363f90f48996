//! Synthetic per-term subject keys.
//!
//! The term endpoint returns subjects by name only, and the same name can
//! recur across terms, so the table keys its columns as
//! `term_{index}_{name}` with whitespace collapsed to underscores. The
//! write path sends this synthetic key to the server, which resolves it
//! back by name. Resolution on our side happens once per term load through
//! [`SubjectKeyMap`] instead of string-matching on every edit.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::terms::entities::Term;

static KEY_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^term_\d+_").expect("Invalid subject key regex"));

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// Synthetic key for the subject at `index` in the term's subject list.
pub fn subject_key(index: usize, name: &str) -> String {
    format!("term_{index}_{}", WHITESPACE_RE.replace_all(name, "_"))
}

/// Recover a display name from a synthetic key: strip the `term_N_` prefix
/// and turn underscores back into spaces. Keys without the prefix pass
/// through untouched (they are already server subject ids).
pub fn display_name(key: &str) -> String {
    if KEY_PREFIX_RE.is_match(key) {
        KEY_PREFIX_RE.replace(key, "").replace('_', " ")
    } else {
        key.to_string()
    }
}

/// Key-to-canonical-name table for one term's subjects, resolved once when
/// the term loads.
#[derive(Debug, Clone, Default)]
pub struct SubjectKeyMap {
    names_by_key: HashMap<String, String>,
}

impl SubjectKeyMap {
    pub fn from_term(term: &Term) -> Self {
        let names_by_key = term
            .subjects
            .iter()
            .enumerate()
            .map(|(index, subject)| (subject_key(index, &subject.name), subject.name.clone()))
            .collect();
        Self { names_by_key }
    }

    /// Resolve a cell's subject key to the term's canonical subject name.
    ///
    /// Keys without the `term_` prefix are passed through as-is: they came
    /// from the server and already identify the subject.
    pub fn resolve(&self, key: &str) -> Option<String> {
        if let Some(name) = self.names_by_key.get(key) {
            return Some(name.clone());
        }
        if !key.starts_with("term_") {
            return Some(key.to_string());
        }
        None
    }

    pub fn len(&self) -> usize {
        self.names_by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names_by_key.is_empty()
    }
}
