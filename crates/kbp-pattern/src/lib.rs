//! KBP Pattern - Semgrex-style dependency graph patterns
//!
//! A compact pattern language over labeled dependency graphs:
//!
//! ```text
//! {ner:PERSON}=entity <nsubj ({lemma:work} >nmod:for {ner:ORGANIZATION}=slot)
//! ```
//!
//! Nodes test token attributes (`word`, `lemma`, `tag`, `ner`), edges test
//! dependency relation names, and `=name` binds a node so that a later
//! occurrence of the same name must match the same graph node.

pub mod ast;
pub mod batch;
pub mod error;
mod matcher;
mod parser;

pub use ast::Attr;
pub use batch::compile_batch;
pub use error::{BatchError, MatchError, PatternError};
pub use matcher::TokenAttributes;

use kbp_core::DependencyGraph;

use crate::ast::NodePattern;
use crate::matcher::{Bindings, Matcher};

/// A compiled, immutable graph pattern
#[derive(Debug, Clone)]
pub struct SemgrexPattern {
    source: String,
    root: NodePattern,
}

impl SemgrexPattern {
    /// Compile a pattern from its textual form
    pub fn compile(source: &str) -> Result<Self, PatternError> {
        let root = parser::parse(source)?;
        Ok(Self {
            source: source.trim().to_string(),
            root,
        })
    }

    /// The text this pattern was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether at least one match exists in `graph`
    ///
    /// Head candidates are tried in token order and the search stops at the
    /// first complete match.
    pub fn exists_match(
        &self,
        graph: &DependencyGraph,
        attrs: &dyn TokenAttributes,
    ) -> Result<bool, MatchError> {
        let matcher = Matcher::new(graph, attrs);
        let empty = Bindings::new();
        let mut accept = |_: &Bindings| Ok::<bool, MatchError>(true);
        for node in graph.nodes() {
            if matcher.match_node(&self.root, node, &empty, &mut accept)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl std::fmt::Display for SemgrexPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kbp_core::{Sentence, Token};

    /// "Obama works for Google" with NER on both mentions
    fn sentence() -> Sentence {
        Sentence::new(vec![
            Token::new("Obama").with_tag("NNP").with_ner("PERSON"),
            Token::new("works").with_lemma("work").with_tag("VBZ"),
            Token::new("for").with_tag("IN"),
            Token::new("Google").with_tag("NNP").with_ner("ORGANIZATION"),
        ])
    }

    fn graph() -> DependencyGraph {
        DependencyGraph::new()
            .with_root(1)
            .with_edge(1, 0, "nsubj")
            .with_edge(1, 3, "nmod:for")
            .with_edge(3, 2, "case")
    }

    fn matches(pattern: &str) -> bool {
        let s = sentence();
        SemgrexPattern::compile(pattern)
            .unwrap()
            .exists_match(&graph(), &s.tokens)
            .unwrap()
    }

    #[test]
    fn test_direct_edge() {
        assert!(matches("{ner:PERSON} <nsubj ({lemma:work} >nmod:for {ner:ORGANIZATION})"));
        assert!(!matches("{ner:PERSON} <dobj {}"));
    }

    #[test]
    fn test_any_relation_and_regex() {
        assert!(matches("{lemma:work} > {ner:ORGANIZATION}"));
        assert!(matches("{tag:/VB.*/} >/nmod:.*/ {word:/Goo.+/}"));
        assert!(!matches("{tag:/VB/} > {}"));
    }

    #[test]
    fn test_transitive_edges() {
        assert!(matches("{lemma:work} >> {word:for}"));
        assert!(matches("{word:for} << {$}"));
        assert!(!matches("{word:for} >> {}"));
    }

    #[test]
    fn test_negated_edge() {
        assert!(matches("{lemma:work} !>neg {}"));
        assert!(!matches("{lemma:work} !>nsubj {}"));
    }

    #[test]
    fn test_negated_constraint() {
        assert!(matches("{ner:!O;tag:NNP} <nsubj {}"));
        assert!(!matches("{word:works;ner:!O}"));
    }

    #[test]
    fn test_back_reference_must_bind_same_node() {
        // both edges from "works" must reach the same node
        assert!(!matches("{lemma:work} >nsubj {}=x >nmod:for {}=x"));
        assert!(matches("{lemma:work} >nsubj {}=x >> {}=x"));
    }

    #[test]
    fn test_backtracking_across_siblings() {
        // "a" has to be revisited if the subject is tried first
        assert!(matches("{lemma:work} >{}=a >> ({word:for} <case {}=a)"));
        assert!(!matches("{lemma:work} >nsubj {}=a >> ({word:for} <case {}=a)"));
        assert!(matches("{lemma:work} > ({}=a >case {}) >nsubj {}"));
    }

    #[test]
    fn test_root_on_rootless_graph_is_error() {
        let s = sentence();
        let rootless = DependencyGraph::new().with_edge(1, 0, "nsubj");
        let pattern = SemgrexPattern::compile("{$} >nsubj {}").unwrap();
        assert_eq!(
            pattern.exists_match(&rootless, &s.tokens),
            Err(MatchError::NoRoots)
        );

        let plain = SemgrexPattern::compile("{} >nsubj {}").unwrap();
        assert_eq!(plain.exists_match(&rootless, &s.tokens), Ok(true));
    }

    #[test]
    fn test_token_out_of_range_is_error() {
        let s = sentence();
        let bad = DependencyGraph::new().with_root(1).with_edge(1, 9, "dobj");
        let pattern = SemgrexPattern::compile("{} >dobj {}").unwrap();
        assert!(matches!(
            pattern.exists_match(&bad, &s.tokens),
            Err(MatchError::TokenOutOfRange { token: 9, len: 4 })
        ));
    }

    #[test]
    fn test_empty_graph_never_matches() {
        let s = sentence();
        let pattern = SemgrexPattern::compile("{}").unwrap();
        assert!(!pattern
            .exists_match(&DependencyGraph::new(), &s.tokens)
            .unwrap());
    }
}
