//! Reuse of the enriched answer options between runs.
//!
//! The library does no I/O: the storage is provided by the caller through
//! [`OptionCache`].

use log::debug;
use std::collections::HashMap;

use crate::config::{AnswerOption, Question};

/// A store of enriched answer options.
pub trait OptionCache {
    fn get(&self, key: &str) -> Option<Vec<AnswerOption>>;
    fn put(&mut self, key: &str, options: &[AnswerOption]);
}

/// An [`OptionCache`] that lives as long as the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: HashMap<String, Vec<AnswerOption>>,
}

impl MemoryCache {
    pub fn new() -> MemoryCache {
        MemoryCache::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl OptionCache for MemoryCache {
    fn get(&self, key: &str) -> Option<Vec<AnswerOption>> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, options: &[AnswerOption]) {
        self.entries.insert(key.to_string(), options.to_vec());
    }
}

/// The cache key of a catalog and its raw options.
///
/// Any change in the questions or the options changes the key.
pub fn options_fingerprint(questions: &[Question], options: &[AnswerOption]) -> String {
    let mut text = String::new();
    for q in questions.iter() {
        text.push_str(&format!(
            "q\u{1f}{}\u{1f}{}\u{1f}{:?}\n",
            q.id, q.code, q.parent_id
        ));
    }
    for o in options.iter() {
        text.push_str(&format!(
            "o\u{1f}{}\u{1f}{}\u{1f}{}\u{1f}{:?}\n",
            o.question_id, o.value, o.label, o.order
        ));
    }
    let key = sha256::digest(text);
    debug!(
        "options_fingerprint: {} questions, {} options: {}",
        questions.len(),
        options.len(),
        key
    );
    key
}
