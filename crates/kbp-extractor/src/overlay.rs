//! Entity-type overlay
//!
//! Before a relation's patterns run, every token in the subject and object
//! mentions that has no NER label gets the mention's entity type, so patterns
//! can address arguments through `{ner:...}` even when the tagger missed them.
//!
//! The labels live in a [`NerOverlay`] table owned by the caller, not in the
//! tokens. One table serves a whole classification call: stamps made while
//! trying an earlier relation are still present when a later relation is
//! tried. Stamps only ever fill unset slots, so repeating them is a no-op.

use kbp_core::{KbpInput, NerTag, RelationType, Span, Token, UNSET_NER};
use kbp_pattern::{Attr, TokenAttributes};

/// NER labels for one sentence, seeded from the tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NerOverlay {
    labels: Vec<String>,
}

impl NerOverlay {
    /// Seed from the tokens' own NER labels
    pub fn new(tokens: &[Token]) -> Self {
        Self {
            labels: tokens.iter().map(|t| t.ner.clone()).collect(),
        }
    }

    /// Seed from the input's sentence
    pub fn for_input(input: &KbpInput) -> Self {
        Self::new(&input.sentence.tokens)
    }

    /// Current label of a token
    pub fn label(&self, token: usize) -> Option<&str> {
        self.labels.get(token).map(String::as_str)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Write `tag` into every unset slot in `span`
    ///
    /// Indices past the end of the sentence are ignored. Returns the number of
    /// slots written.
    pub fn stamp(&mut self, span: Span, tag: NerTag) -> usize {
        let range = span.clamped(self.labels.len());
        let mut written = 0;
        for slot in &mut self.labels[range] {
            if *slot == UNSET_NER {
                *slot = tag.as_str().to_string();
                written += 1;
            }
        }
        written
    }

    /// Grow the table to cover `tokens`, seeding new slots from their labels
    ///
    /// Existing slots, stamped or not, are kept.
    pub fn cover(&mut self, tokens: &[Token]) {
        if let Some(extra) = tokens.get(self.labels.len()..) {
            self.labels.extend(extra.iter().map(|t| t.ner.clone()));
        }
    }

    /// Stamp both mentions for an attempt at `relation`
    ///
    /// The subject gets the relation's subject type. The object gets the
    /// input's object type, which the type filter has already checked against
    /// the relation's valid object types.
    pub fn stamp_mentions(&mut self, input: &KbpInput, relation: &RelationType) -> usize {
        self.stamp(input.subject_span, relation.subject_type())
            + self.stamp(input.object_span, input.object_type)
    }
}

/// Token attributes with NER read through an overlay
pub struct OverlayView<'a> {
    tokens: &'a [Token],
    overlay: &'a NerOverlay,
}

impl<'a> OverlayView<'a> {
    pub fn new(tokens: &'a [Token], overlay: &'a NerOverlay) -> Self {
        Self { tokens, overlay }
    }
}

impl TokenAttributes for OverlayView<'_> {
    fn token_count(&self) -> usize {
        self.tokens.len()
    }

    fn attribute(&self, token: usize, attr: Attr) -> Option<&str> {
        match attr {
            Attr::Ner => self
                .overlay
                .label(token)
                .or_else(|| self.tokens.get(token).map(|t| t.ner.as_str())),
            _ => self.tokens.attribute(token, attr),
        }
    }
}
