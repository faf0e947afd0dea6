//! KBP Extractor - Rule-based relation classification
//!
//! Decides which KBP relation, if any, holds between a subject mention and
//! an object mention in a dependency-parsed sentence, by matching hand-written
//! Semgrex rules loaded from one file per relation type.

use std::io::Write;

use kbp_core::{Classification, KbpInput, Result};

pub mod classifier;
pub mod dataset;
pub mod filter;
pub mod matcher;
pub mod metrics;
pub mod overlay;
pub mod rules;

pub use classifier::SemgrexExtractor;
pub use dataset::LabeledExample;
pub use metrics::{Evaluation, RelationCounts};
pub use overlay::NerOverlay;
pub use rules::RuleStore;

/// Trait for relation classifiers
pub trait RelationExtractor: Send + Sync {
    fn classify(&self, input: &KbpInput) -> Classification;

    /// Classify every example and score the predictions against gold labels
    ///
    /// When `predictions` is given, one `gold\tpredicted\tconfidence` line is
    /// written per example.
    fn compute_accuracy(
        &self,
        examples: &[LabeledExample],
        mut predictions: Option<&mut dyn Write>,
    ) -> Result<Evaluation> {
        let mut evaluation = Evaluation::new();
        for example in examples {
            let predicted = self.classify(&example.input);
            evaluation.record(&example.relation, &predicted.label);
            if let Some(out) = predictions.as_mut() {
                writeln!(
                    out,
                    "{}\t{}\t{}",
                    example.relation, predicted.label, predicted.confidence
                )?;
            }
        }
        if let Some(out) = predictions {
            out.flush()?;
        }
        Ok(evaluation)
    }
}
