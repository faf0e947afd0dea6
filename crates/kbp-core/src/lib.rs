//! KBP Core - Domain models, relation catalog and shared types
//!
//! This crate defines the core abstractions used throughout the KBP system:
//! - Sentence models (tokens, mention spans, dependency graphs)
//! - The ordered relation catalog with its type constraints
//! - Classifier inputs and outputs
//! - Common error types
//! - Configuration management

pub mod config;
pub mod graph;
pub mod relation;

pub use config::{ConfigError, ExtractorConfig, KbpConfig, LoggingConfig};
pub use graph::{DependencyGraph, EdgeRecord, GraphRecord};
pub use relation::{NerTag, RelationType};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Label returned when no relation holds
pub const NO_RELATION: &str = "no_relation";

/// NER label meaning "no entity type assigned"
pub const UNSET_NER: &str = "O";

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for KBP operations
#[derive(Error, Debug)]
pub enum KbpError {
    #[error("Invalid rule file {}: {message}", path.display())]
    InvalidRules { path: PathBuf, message: String },

    #[error("Unknown NER tag: {0}")]
    UnknownNerTag(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, KbpError>;

// ============================================================================
// Sentence Models
// ============================================================================

/// A token with its parser annotations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Surface form
    pub word: String,

    /// Lemma (empty when the parser did not provide one)
    #[serde(default)]
    pub lemma: String,

    /// Part-of-speech tag
    #[serde(default)]
    pub tag: String,

    /// NER label, [`UNSET_NER`] when unassigned
    #[serde(default = "default_ner")]
    pub ner: String,
}

fn default_ner() -> String {
    UNSET_NER.to_string()
}

impl Token {
    /// Create a token with no lemma, tag or NER label
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            lemma: String::new(),
            tag: String::new(),
            ner: default_ner(),
        }
    }

    /// Set the lemma
    pub fn with_lemma(mut self, lemma: impl Into<String>) -> Self {
        self.lemma = lemma.into();
        self
    }

    /// Set the part-of-speech tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Set the NER label
    pub fn with_ner(mut self, ner: impl Into<String>) -> Self {
        self.ner = ner.into();
        self
    }
}

/// Half-open token range `[start, end)` identifying a mention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Span covering a single token
    pub fn single(index: usize) -> Self {
        Self::new(index, index + 1)
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }

    /// Token indices in the span
    pub fn indices(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }

    /// Indices in the span that fall inside a sentence of `len` tokens
    ///
    /// Never inverted, so the result can index a slice directly.
    pub fn clamped(&self, len: usize) -> std::ops::Range<usize> {
        let start = self.start.min(len);
        start..self.end.min(len).max(start)
    }
}

impl IntoIterator for Span {
    type Item = usize;
    type IntoIter = std::ops::Range<usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.indices()
    }
}

/// A parsed sentence: tokens plus two dependency graph variants
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sentence {
    pub tokens: Vec<Token>,

    /// Enhanced++ dependencies, tried first
    #[serde(default)]
    pub primary: Option<DependencyGraph>,

    /// Alternative dependencies, tried when the primary graph does not match
    #[serde(default)]
    pub fallback: Option<DependencyGraph>,
}

impl Sentence {
    /// Create a sentence with no dependency graphs
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            primary: None,
            fallback: None,
        }
    }

    /// Set the primary graph
    pub fn with_primary(mut self, graph: DependencyGraph) -> Self {
        self.primary = Some(graph);
        self
    }

    /// Set the fallback graph
    pub fn with_fallback(mut self, graph: DependencyGraph) -> Self {
        self.fallback = Some(graph);
        self
    }

    /// The sentence text, tokens joined by spaces
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.word.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// ============================================================================
// Classifier Input / Output
// ============================================================================

/// A subject/object mention pair in a sentence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KbpInput {
    pub subject_span: Span,
    pub subject_type: NerTag,
    pub object_span: Span,
    pub object_type: NerTag,
    pub sentence: Sentence,
}

impl KbpInput {
    pub fn new(
        subject_span: Span,
        subject_type: NerTag,
        object_span: Span,
        object_type: NerTag,
        sentence: Sentence,
    ) -> Self {
        Self {
            subject_span,
            subject_type,
            object_span,
            object_type,
            sentence,
        }
    }

    /// Surface text of the subject mention
    pub fn subject_text(&self) -> String {
        self.span_text(self.subject_span)
    }

    /// Surface text of the object mention
    pub fn object_text(&self) -> String {
        self.span_text(self.object_span)
    }

    fn span_text(&self, span: Span) -> String {
        let tokens = &self.sentence.tokens;
        tokens[span.clamped(tokens.len())]
            .iter()
            .map(|t| t.word.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Classifier decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Canonical relation name or [`NO_RELATION`]
    pub label: String,

    /// Always 1.0
    pub confidence: f64,
}

impl Classification {
    /// A positive decision for `relation`
    pub fn relation(relation: RelationType) -> Self {
        Self {
            label: relation.canonical_name().to_string(),
            confidence: 1.0,
        }
    }

    /// The negative decision
    pub fn no_relation() -> Self {
        Self {
            label: NO_RELATION.to_string(),
            confidence: 1.0,
        }
    }

    pub fn is_no_relation(&self) -> bool {
        self.label == NO_RELATION
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\t{}", self.label, self.confidence)
    }
}

// ============================================================================
// Tests
// ============================================================================
