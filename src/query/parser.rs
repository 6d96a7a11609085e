//! Query parser for the search mini-language.
//!
//! Supported syntax, over whitespace-delimited words:
//! - `word` - required term
//! - `OR word` - optional term; any `OR` also switches the whole query to
//!   disjunctive matching
//! - `-word` - excluded term
//! - `"several words"` - contiguous phrase
//!
//! Parsing never fails: unknown constructs degrade to plain terms.

use std::collections::BTreeSet;

use crate::analysis::StopWords;

const OR_KEYWORD: &str = "or";
const QUOTE: char = '"';
const EXCLUDE_PREFIX: char = '-';

/// Structured form of a query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    /// Terms every match must contain (unless `has_or` is set).
    pub required: BTreeSet<String>,
    /// Terms introduced by `OR`.
    pub optional: BTreeSet<String>,
    /// Terms no match may contain.
    pub excluded: BTreeSet<String>,
    /// Phrases in query order; each must occur contiguously.
    pub phrases: Vec<Vec<String>>,
    /// Whether `OR` appeared anywhere in the query.
    pub has_or: bool,
}

impl ParsedQuery {
    /// Required and optional terms, sorted.
    pub fn terms(&self) -> BTreeSet<String> {
        self.required.union(&self.optional).cloned().collect()
    }

    /// Every word of every phrase, sorted and deduplicated.
    pub fn phrase_words(&self) -> BTreeSet<String> {
        self.phrases.iter().flatten().cloned().collect()
    }

    /// Whether the query holds no term and no phrase.
    pub fn is_empty(&self) -> bool {
        self.required.is_empty()
            && self.optional.is_empty()
            && self.excluded.is_empty()
            && self.phrases.is_empty()
    }

    /// Remove stop words from every term set and phrase.
    ///
    /// Phrases left without words are dropped.
    pub fn remove_stopwords(&mut self, stopwords: &StopWords) {
        self.required.retain(|t| !stopwords.contains(t));
        self.optional.retain(|t| !stopwords.contains(t));
        self.excluded.retain(|t| !stopwords.contains(t));
        for phrase in &mut self.phrases {
            phrase.retain(|t| !stopwords.contains(t));
        }
        self.phrases.retain(|phrase| !phrase.is_empty());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Default,
    AfterOr,
    /// Inside a quoted phrase; `resume_after_or` restores a pending `OR`
    /// once the phrase closes.
    InPhrase { resume_after_or: bool },
}

/// Parser for query strings.
///
/// # Examples
///
/// ```
/// use scout::query::QueryParser;
///
/// let parsed = QueryParser::new().parse("quick OR fox -lazy \"brown dog\"");
/// assert!(parsed.required.contains("quick"));
/// assert!(parsed.optional.contains("fox"));
/// assert!(parsed.excluded.contains("lazy"));
/// assert_eq!(parsed.phrases, vec![vec!["brown".to_string(), "dog".to_string()]]);
/// assert!(parsed.has_or);
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryParser;

impl QueryParser {
    /// Create a new query parser.
    pub fn new() -> Self {
        QueryParser
    }

    /// Parse a query string.
    pub fn parse(&self, query: &str) -> ParsedQuery {
        let mut parsed = ParsedQuery::default();
        let mut state = State::Default;
        let mut phrase: Vec<String> = Vec::new();

        for raw in query.split_whitespace() {
            let word = raw.to_lowercase();

            state = match state {
                State::InPhrase { resume_after_or } => {
                    if let Some(last) = word.strip_suffix(QUOTE) {
                        push_word(&mut phrase, last);
                        close_phrase(&mut parsed, &mut phrase);
                        resume(resume_after_or)
                    } else {
                        push_word(&mut phrase, &word);
                        state
                    }
                }
                State::Default | State::AfterOr => {
                    let after_or = state == State::AfterOr;
                    if word == OR_KEYWORD {
                        parsed.has_or = true;
                        State::AfterOr
                    } else if let Some(rest) = word.strip_prefix(QUOTE) {
                        match rest.strip_suffix(QUOTE) {
                            Some(single) => {
                                push_word(&mut phrase, single);
                                close_phrase(&mut parsed, &mut phrase);
                                state
                            }
                            None => {
                                push_word(&mut phrase, rest);
                                State::InPhrase {
                                    resume_after_or: after_or,
                                }
                            }
                        }
                    } else if let Some(term) = word.strip_prefix(EXCLUDE_PREFIX) {
                        let term = term.trim_matches(QUOTE);
                        if !term.is_empty() {
                            parsed.excluded.insert(term.to_string());
                        }
                        state
                    } else {
                        let term = word.trim_matches(QUOTE);
                        if term.is_empty() {
                            state
                        } else if after_or {
                            parsed.optional.insert(term.to_string());
                            State::Default
                        } else {
                            parsed.required.insert(term.to_string());
                            State::Default
                        }
                    }
                }
            };
        }

        // Unterminated phrase runs to the end of the query.
        close_phrase(&mut parsed, &mut phrase);
        parsed
    }
}

/// Parse a query string with the default parser.
pub fn parse_query(query: &str) -> ParsedQuery {
    QueryParser::new().parse(query)
}

fn resume(after_or: bool) -> State {
    if after_or {
        State::AfterOr
    } else {
        State::Default
    }
}

fn push_word(phrase: &mut Vec<String>, word: &str) {
    if !word.is_empty() {
        phrase.push(word.to_string());
    }
}

fn close_phrase(parsed: &mut ParsedQuery, phrase: &mut Vec<String>) {
    if !phrase.is_empty() {
        parsed.phrases.push(std::mem::take(phrase));
    }
}
