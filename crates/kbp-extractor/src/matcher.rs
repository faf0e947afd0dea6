//! Matching one relation's pattern list against one graph variant

use kbp_core::DependencyGraph;
use kbp_pattern::{MatchError, SemgrexPattern, TokenAttributes};

/// How a pattern list fared against a graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphOutcome {
    /// Graph absent or without nodes; nothing was tried
    EmptyGraph,
    /// Pattern at this position matched; later patterns were skipped
    Matched { pattern: usize },
    /// No pattern matched
    NoMatch,
    /// Pattern at this position failed at runtime; later patterns were skipped
    Aborted { pattern: usize, error: MatchError },
}

impl GraphOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }
}

/// Try `patterns` in order against `graph`
///
/// The first pattern with any match wins. A runtime failure in any pattern
/// ends the search with no match, even if a later pattern would have matched.
pub fn match_patterns(
    graph: Option<&DependencyGraph>,
    patterns: &[SemgrexPattern],
    attrs: &dyn TokenAttributes,
) -> GraphOutcome {
    let graph = match graph {
        Some(g) if !g.is_empty() => g,
        _ => return GraphOutcome::EmptyGraph,
    };

    for (i, pattern) in patterns.iter().enumerate() {
        match pattern.exists_match(graph, attrs) {
            Ok(true) => return GraphOutcome::Matched { pattern: i },
            Ok(false) => {}
            Err(error) => {
                tracing::debug!("Pattern {} failed, skipping remaining rules: {}", pattern, error);
                return GraphOutcome::Aborted { pattern: i, error };
            }
        }
    }
    GraphOutcome::NoMatch
}

/// Whether any of `patterns` matches `graph`
pub fn matches(
    graph: Option<&DependencyGraph>,
    patterns: &[SemgrexPattern],
    attrs: &dyn TokenAttributes,
) -> bool {
    match_patterns(graph, patterns, attrs).is_match()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kbp_core::Token;

    fn tokens() -> Vec<Token> {
        vec![
            Token::new("Obama").with_ner("PERSON"),
            Token::new("works").with_lemma("work"),
            Token::new("for"),
            Token::new("Google").with_ner("ORGANIZATION"),
        ]
    }

    fn graph() -> DependencyGraph {
        DependencyGraph::new()
            .with_root(1)
            .with_edge(1, 0, "nsubj")
            .with_edge(1, 3, "nmod:for")
            .with_edge(3, 2, "case")
    }

    fn compile(sources: &[&str]) -> Vec<SemgrexPattern> {
        sources
            .iter()
            .map(|s| SemgrexPattern::compile(s).unwrap())
            .collect()
    }

    #[test]
    fn test_absent_and_empty_graph() {
        let tokens = tokens();
        let patterns = compile(&["{}"]);
        assert_eq!(
            match_patterns(None, &patterns, &tokens),
            GraphOutcome::EmptyGraph
        );
        assert_eq!(
            match_patterns(Some(&DependencyGraph::new()), &patterns, &tokens),
            GraphOutcome::EmptyGraph
        );
    }

    #[test]
    fn test_first_matching_pattern_wins() {
        let tokens = tokens();
        let patterns = compile(&["{ner:DATE}", "{ner:PERSON} <nsubj {}", "{}"]);
        assert_eq!(
            match_patterns(Some(&graph()), &patterns, &tokens),
            GraphOutcome::Matched { pattern: 1 }
        );
    }

    #[test]
    fn test_no_pattern_matches() {
        let tokens = tokens();
        let patterns = compile(&["{ner:DATE}", "{} >dobj {}"]);
        assert_eq!(
            match_patterns(Some(&graph()), &patterns, &tokens),
            GraphOutcome::NoMatch
        );
        assert!(!matches(Some(&graph()), &patterns, &tokens));
    }

    #[test]
    fn test_runtime_failure_suppresses_later_patterns() {
        let tokens = tokens();
        let rootless = DependencyGraph::new().with_edge(1, 0, "nsubj");
        // the second pattern would match on its own
        let patterns = compile(&["{$} >nsubj {}", "{} >nsubj {ner:PERSON}"]);

        assert_eq!(
            match_patterns(Some(&rootless), &patterns, &tokens),
            GraphOutcome::Aborted {
                pattern: 0,
                error: MatchError::NoRoots
            }
        );
        assert!(matches(Some(&rootless), &patterns[1..], &tokens));
    }

    #[test]
    fn test_failure_after_a_match_is_never_reached() {
        let tokens = tokens();
        let rootless = DependencyGraph::new().with_edge(1, 0, "nsubj");
        let patterns = compile(&["{} >nsubj {}", "{$}"]);
        assert!(matches(Some(&rootless), &patterns, &tokens));
    }
}
