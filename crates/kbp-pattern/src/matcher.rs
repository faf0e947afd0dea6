//! Backtracking subgraph search
//!
//! Matching is written in continuation-passing style: each step receives the
//! bindings made so far and a continuation for "the rest of the pattern".
//! A step succeeds only if the continuation succeeds, so a choice made for one
//! node is revisited when a later step cannot be satisfied.

use std::collections::HashMap;

use kbp_core::{DependencyGraph, Token};
use petgraph::graph::NodeIndex;

use crate::ast::{Attr, EdgeKind, EdgePattern, NodePattern};
use crate::error::MatchError;

pub(crate) type Bindings = HashMap<String, NodeIndex>;

type Continuation<'k> = dyn FnMut(&Bindings) -> Result<bool, MatchError> + 'k;

/// Read access to the token annotations patterns test against
pub trait TokenAttributes {
    /// Number of tokens in the sentence
    fn token_count(&self) -> usize;

    /// Attribute value, `None` when the token has none
    fn attribute(&self, token: usize, attr: Attr) -> Option<&str>;
}

impl TokenAttributes for [Token] {
    fn token_count(&self) -> usize {
        self.len()
    }

    fn attribute(&self, token: usize, attr: Attr) -> Option<&str> {
        let token = self.get(token)?;
        let value = match attr {
            Attr::Word => &token.word,
            Attr::Lemma => &token.lemma,
            Attr::Tag => &token.tag,
            Attr::Ner => &token.ner,
        };
        (!value.is_empty()).then_some(value.as_str())
    }
}

impl TokenAttributes for Vec<Token> {
    fn token_count(&self) -> usize {
        self.len()
    }

    fn attribute(&self, token: usize, attr: Attr) -> Option<&str> {
        self.as_slice().attribute(token, attr)
    }
}

pub(crate) struct Matcher<'a> {
    graph: &'a DependencyGraph,
    attrs: &'a dyn TokenAttributes,
}

impl<'a> Matcher<'a> {
    pub(crate) fn new(graph: &'a DependencyGraph, attrs: &'a dyn TokenAttributes) -> Self {
        Self { graph, attrs }
    }

    /// Try to match `pat` rooted at `node`, calling `k` for every complete match
    pub(crate) fn match_node(
        &self,
        pat: &NodePattern,
        node: NodeIndex,
        bindings: &Bindings,
        k: &mut Continuation<'_>,
    ) -> Result<bool, MatchError> {
        if !self.node_satisfies(pat, node)? {
            return Ok(false);
        }

        let mut bound = bindings.clone();
        if let Some(name) = &pat.name {
            match bound.get(name) {
                Some(&existing) if existing != node => return Ok(false),
                Some(_) => {}
                None => {
                    bound.insert(name.clone(), node);
                }
            }
        }

        self.match_edges(&pat.edges, node, &bound, k)
    }

    fn match_edges(
        &self,
        edges: &[EdgePattern],
        node: NodeIndex,
        bindings: &Bindings,
        k: &mut Continuation<'_>,
    ) -> Result<bool, MatchError> {
        let Some((edge, rest)) = edges.split_first() else {
            return k(bindings);
        };

        if edge.negated {
            let mut exists = |_: &Bindings| Ok::<bool, MatchError>(true);
            for candidate in self.candidates(edge, node) {
                if self.match_node(&edge.target, candidate, bindings, &mut exists)? {
                    return Ok(false);
                }
            }
            return self.match_edges(rest, node, bindings, k);
        }

        for candidate in self.candidates(edge, node) {
            let mut next = |b: &Bindings| self.match_edges(rest, node, b, &mut *k);
            if self.match_node(&edge.target, candidate, bindings, &mut next)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn candidates(&self, edge: &EdgePattern, node: NodeIndex) -> Vec<NodeIndex> {
        let labeled = match edge.kind {
            EdgeKind::Governs => self.graph.children(node),
            EdgeKind::GovernedBy => self.graph.parents(node),
            EdgeKind::Descendant => return self.graph.descendants(node),
            EdgeKind::Ancestor => return self.graph.ancestors(node),
        };
        labeled
            .into_iter()
            .filter(|(_, rel)| edge.label.as_ref().map_or(true, |l| l.matches(rel)))
            .map(|(n, _)| n)
            .collect()
    }

    fn node_satisfies(&self, pat: &NodePattern, node: NodeIndex) -> Result<bool, MatchError> {
        let token = self.graph.token(node);
        let len = self.attrs.token_count();
        if token >= len {
            return Err(MatchError::TokenOutOfRange { token, len });
        }

        let mut ok = true;
        if pat.root {
            if self.graph.roots().is_empty() {
                return Err(MatchError::NoRoots);
            }
            ok = self.graph.is_root(node);
        }
        ok = ok
            && pat.constraints.iter().all(|c| {
                let hit = self
                    .attrs
                    .attribute(token, c.attr)
                    .map_or(false, |v| c.value.matches(v));
                hit != c.negated
            });

        Ok(ok != pat.negated)
    }
}
