//! Semgrex relation classifier
//!
//! Scans relation types in catalog order and returns the first one whose
//! rules match the sentence's primary graph, or failing that its fallback
//! graph. Decisions are deterministic and carry confidence 1.0.

use std::path::Path;

use kbp_core::{Classification, ExtractorConfig, KbpInput, RelationType, Result};

use crate::filter::is_eligible;
use crate::matcher::match_patterns;
use crate::overlay::{NerOverlay, OverlayView};
use crate::rules::RuleStore;
use crate::RelationExtractor;

/// Rule-based KBP relation classifier
#[derive(Debug, Clone)]
pub struct SemgrexExtractor {
    rules: RuleStore,
}

impl SemgrexExtractor {
    /// Load rules for the full catalog from `dir`
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        Self::from_config(&ExtractorConfig::for_dir(dir.as_ref()))
    }

    pub fn from_config(config: &ExtractorConfig) -> Result<Self> {
        Ok(Self::from_rule_store(RuleStore::load(config)?))
    }

    /// Load rules for a custom catalog, whose order sets match priority
    pub fn with_catalog(config: &ExtractorConfig, catalog: &[RelationType]) -> Result<Self> {
        Ok(Self::from_rule_store(RuleStore::load_catalog(config, catalog)?))
    }

    pub fn from_rule_store(rules: RuleStore) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleStore {
        &self.rules
    }

    /// Classify with a fresh overlay seeded from the input's tokens
    pub fn classify(&self, input: &KbpInput) -> Classification {
        let mut overlay = NerOverlay::for_input(input);
        self.classify_with_overlay(input, &mut overlay)
    }

    /// Classify using a caller-owned overlay
    ///
    /// Every eligible relation stamps its mentions into `overlay` before its
    /// patterns run, and the stamps stay there for later relations and for
    /// later calls that reuse the same overlay. An overlay shorter than the
    /// input's sentence is first grown to cover it.
    pub fn classify_with_overlay(
        &self,
        input: &KbpInput,
        overlay: &mut NerOverlay,
    ) -> Classification {
        let sentence = &input.sentence;
        overlay.cover(&sentence.tokens);
        tracing::trace!(
            "Classifying [{}] -> [{}] in: {}",
            input.subject_text(),
            input.object_text(),
            sentence.text()
        );

        for relation in self.rules.catalog() {
            if !is_eligible(
                relation,
                input.subject_type,
                input.object_type,
                self.rules.contains(relation),
            ) {
                continue;
            }
            let patterns = self.rules.get(relation).unwrap_or_default();

            overlay.stamp_mentions(input, relation);
            let view = OverlayView::new(&sentence.tokens, overlay);

            let primary = match_patterns(sentence.primary.as_ref(), patterns, &view);
            if primary.is_match() {
                tracing::trace!("{} matched on primary graph: {:?}", relation, primary);
                return Classification::relation(*relation);
            }

            let fallback = match_patterns(sentence.fallback.as_ref(), patterns, &view);
            if fallback.is_match() {
                tracing::trace!("{} matched on fallback graph: {:?}", relation, fallback);
                return Classification::relation(*relation);
            }

            tracing::trace!(
                "{} did not match (primary: {:?}, fallback: {:?})",
                relation,
                primary,
                fallback
            );
        }

        Classification::no_relation()
    }
}

impl RelationExtractor for SemgrexExtractor {
    fn classify(&self, input: &KbpInput) -> Classification {
        SemgrexExtractor::classify(self, input)
    }
}
