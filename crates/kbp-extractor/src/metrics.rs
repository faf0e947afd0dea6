//! Classification quality metrics
//!
//! Micro-averaged precision, recall and F1 over positive relation labels,
//! where `no_relation` counts as the negative class, plus plain accuracy and
//! per-relation counts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use kbp_core::NO_RELATION;

// ============================================================================
// Counts
// ============================================================================

/// Confusion counts for one label or for all labels together
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationCounts {
    /// Predicted the gold relation
    pub true_positives: usize,
    /// Predicted a relation that was not the gold one
    pub false_positives: usize,
    /// Gold relation not predicted
    pub false_negatives: usize,
}

impl RelationCounts {
    /// Calculate precision (TP / (TP + FP))
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    /// Calculate recall (TP / (TP + FN))
    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    /// Calculate F1 score (2 * P * R / (P + R))
    pub fn f1_score(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }

    /// Gold occurrences of the label
    pub fn gold_total(&self) -> usize {
        self.true_positives + self.false_negatives
    }

    /// Predicted occurrences of the label
    pub fn predicted_total(&self) -> usize {
        self.true_positives + self.false_positives
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

// ============================================================================
// Evaluation
// ============================================================================

/// Aggregate outcome of classifying a labeled dataset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Evaluation {
    /// Micro-averaged counts over positive labels
    pub overall: RelationCounts,
    /// Counts per positive label
    pub per_relation: BTreeMap<String, RelationCounts>,
    /// Examples whose prediction equals the gold label, `no_relation` included
    pub correct: usize,
    /// Examples seen
    pub total: usize,
}

impl Evaluation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one gold/predicted pair
    pub fn record(&mut self, gold: &str, predicted: &str) {
        self.total += 1;
        if gold == predicted {
            self.correct += 1;
        }

        let gold_positive = gold != NO_RELATION;
        let predicted_positive = predicted != NO_RELATION;

        if predicted_positive {
            if gold == predicted {
                self.overall.true_positives += 1;
                self.counts_for(predicted).true_positives += 1;
            } else {
                self.overall.false_positives += 1;
                self.counts_for(predicted).false_positives += 1;
            }
        }
        if gold_positive && gold != predicted {
            self.overall.false_negatives += 1;
            self.counts_for(gold).false_negatives += 1;
        }
    }

    fn counts_for(&mut self, label: &str) -> &mut RelationCounts {
        self.per_relation.entry(label.to_string()).or_default()
    }

    pub fn precision(&self) -> f64 {
        self.overall.precision()
    }

    pub fn recall(&self) -> f64 {
        self.overall.recall()
    }

    pub fn f1_score(&self) -> f64 {
        self.overall.f1_score()
    }

    /// Share of examples classified exactly right
    pub fn accuracy(&self) -> f64 {
        ratio(self.correct, self.total)
    }

    /// Human-readable summary
    pub fn report(&self) -> String {
        let mut out = format!(
            "=== Relation Classification Report ===\n\n\
             Examples evaluated: {}\n\
             Accuracy:  {:.2}%\n\
             Precision: {:.2}%\n\
             Recall:    {:.2}%\n\
             F1 Score:  {:.2}%\n\
             Gold: {} | Predicted: {} | TP: {} | FP: {} | FN: {}\n",
            self.total,
            self.accuracy() * 100.0,
            self.precision() * 100.0,
            self.recall() * 100.0,
            self.f1_score() * 100.0,
            self.overall.gold_total(),
            self.overall.predicted_total(),
            self.overall.true_positives,
            self.overall.false_positives,
            self.overall.false_negatives,
        );

        if !self.per_relation.is_empty() {
            out.push_str("\nPer relation:\n");
            for (label, counts) in &self.per_relation {
                out.push_str(&format!(
                    "  {:<40} P {:>6.2}%  R {:>6.2}%  F1 {:>6.2}%  (gold {}, predicted {})\n",
                    label,
                    counts.precision() * 100.0,
                    counts.recall() * 100.0,
                    counts.f1_score() * 100.0,
                    counts.gold_total(),
                    counts.predicted_total(),
                ));
            }
        }
        out
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_precision_recall() {
        let counts = RelationCounts {
            true_positives: 8,
            false_positives: 2,
            false_negatives: 8,
        };

        assert!((counts.precision() - 0.8).abs() < 0.001);
        assert!((counts.recall() - 0.5).abs() < 0.001);
        // 2 * 0.8 * 0.5 / 1.3
        assert!((counts.f1_score() - 0.6154).abs() < 0.001);
    }

    #[test]
    fn test_empty_counts_are_zero() {
        let counts = RelationCounts::default();
        assert_eq!(counts.precision(), 0.0);
        assert_eq!(counts.recall(), 0.0);
        assert_eq!(counts.f1_score(), 0.0);
        assert_eq!(Evaluation::new().accuracy(), 0.0);
    }

    #[test]
    fn test_record_outcomes() {
        let mut eval = Evaluation::new();
        eval.record("per:employee_of", "per:employee_of"); // TP
        eval.record("per:spouse", "no_relation"); // FN
        eval.record("no_relation", "per:spouse"); // FP
        eval.record("per:employee_of", "per:spouse"); // FP + FN
        eval.record("no_relation", "no_relation"); // TN

        assert_eq!(eval.total, 5);
        assert_eq!(eval.correct, 2);
        assert_eq!(
            eval.overall,
            RelationCounts {
                true_positives: 1,
                false_positives: 2,
                false_negatives: 2,
            }
        );

        let spouse = &eval.per_relation["per:spouse"];
        assert_eq!(spouse.false_positives, 2);
        assert_eq!(spouse.false_negatives, 1);
        assert!(!eval.per_relation.contains_key(NO_RELATION));
        assert!((eval.accuracy() - 0.4).abs() < 0.001);
    }

    #[test]
    fn test_report_mentions_relations() {
        let mut eval = Evaluation::new();
        eval.record("per:employee_of", "per:employee_of");
        eval.record("org:top_members/employees", "no_relation");

        let report = eval.report();
        assert!(report.contains("Examples evaluated: 2"));
        assert!(report.contains("Accuracy:  50.00%"));
        assert!(report.contains("per:employee_of"));
        assert!(report.contains("org:top_members/employees"));
    }
}
