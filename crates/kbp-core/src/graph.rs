//! Dependency graph over sentence tokens
//!
//! Nodes carry 0-based token indices; edges carry dependency relation names
//! and point from governor to dependent.

use std::collections::BTreeMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Bfs, EdgeRef, Reversed};
use petgraph::Direction;
use serde::{Deserialize, Serialize};

/// A labeled, directed dependency graph with an explicit root set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "GraphRecord", into = "GraphRecord")]
pub struct DependencyGraph {
    graph: DiGraph<usize, String>,
    nodes: BTreeMap<usize, NodeIndex>,
    roots: Vec<NodeIndex>,
}

impl DependencyGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node for `token`, returning the existing one if present
    pub fn add_node(&mut self, token: usize) -> NodeIndex {
        if let Some(&idx) = self.nodes.get(&token) {
            return idx;
        }
        let idx = self.graph.add_node(token);
        self.nodes.insert(token, idx);
        idx
    }

    /// Add a `governor -relation-> dependent` edge
    pub fn add_edge(&mut self, governor: usize, dependent: usize, relation: impl Into<String>) {
        let gov = self.add_node(governor);
        let dep = self.add_node(dependent);
        self.graph.add_edge(gov, dep, relation.into());
    }

    /// Mark `token` as a root
    pub fn add_root(&mut self, token: usize) {
        let idx = self.add_node(token);
        if !self.roots.contains(&idx) {
            self.roots.push(idx);
        }
    }

    /// Builder form of [`add_edge`](Self::add_edge)
    pub fn with_edge(mut self, governor: usize, dependent: usize, relation: &str) -> Self {
        self.add_edge(governor, dependent, relation);
        self
    }

    /// Builder form of [`add_root`](Self::add_root)
    pub fn with_root(mut self, token: usize) -> Self {
        self.add_root(token);
        self
    }

    /// True when the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Nodes in token order
    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.nodes.values().copied()
    }

    /// Token index carried by `node`
    pub fn token(&self, node: NodeIndex) -> usize {
        self.graph[node]
    }

    /// Node for a token index, if the token is in the graph
    pub fn node_for(&self, token: usize) -> Option<NodeIndex> {
        self.nodes.get(&token).copied()
    }

    pub fn roots(&self) -> &[NodeIndex] {
        &self.roots
    }

    pub fn is_root(&self, node: NodeIndex) -> bool {
        self.roots.contains(&node)
    }

    /// Dependents of `node` with the relation name of each edge
    pub fn children(&self, node: NodeIndex) -> Vec<(NodeIndex, &str)> {
        self.graph
            .edges_directed(node, Direction::Outgoing)
            .map(|e| (e.target(), e.weight().as_str()))
            .collect()
    }

    /// Governors of `node` with the relation name of each edge
    pub fn parents(&self, node: NodeIndex) -> Vec<(NodeIndex, &str)> {
        self.graph
            .edges_directed(node, Direction::Incoming)
            .map(|e| (e.source(), e.weight().as_str()))
            .collect()
    }

    /// Every node reachable from `node` through outgoing edges, excluding itself
    pub fn descendants(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut bfs = Bfs::new(&self.graph, node);
        let mut found = Vec::new();
        while let Some(next) = bfs.next(&self.graph) {
            if next != node {
                found.push(next);
            }
        }
        found
    }

    /// Every node that reaches `node` through outgoing edges, excluding itself
    pub fn ancestors(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let reversed = Reversed(&self.graph);
        let mut bfs = Bfs::new(reversed, node);
        let mut found = Vec::new();
        while let Some(next) = bfs.next(reversed) {
            if next != node {
                found.push(next);
            }
        }
        found
    }
}

// ============================================================================
// Serialized form
// ============================================================================

/// Edge in the serialized graph form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub governor: usize,
    pub dependent: usize,
    pub relation: String,
}

/// Edge-list form used in datasets
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphRecord {
    #[serde(default)]
    pub roots: Vec<usize>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
    /// Nodes with no edges
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<usize>,
}

impl From<GraphRecord> for DependencyGraph {
    fn from(record: GraphRecord) -> Self {
        let mut graph = DependencyGraph::new();
        for token in record.nodes {
            graph.add_node(token);
        }
        for edge in record.edges {
            graph.add_edge(edge.governor, edge.dependent, edge.relation);
        }
        for root in record.roots {
            graph.add_root(root);
        }
        graph
    }
}

impl From<DependencyGraph> for GraphRecord {
    fn from(graph: DependencyGraph) -> Self {
        let edges = graph
            .graph
            .edge_references()
            .map(|e| EdgeRecord {
                governor: graph.graph[e.source()],
                dependent: graph.graph[e.target()],
                relation: e.weight().clone(),
            })
            .collect();
        let nodes = graph
            .nodes()
            .filter(|&n| {
                graph.graph.edges_directed(n, Direction::Outgoing).count() == 0
                    && graph.graph.edges_directed(n, Direction::Incoming).count() == 0
            })
            .map(|n| graph.graph[n])
            .collect();
        GraphRecord {
            roots: graph.roots.iter().map(|&r| graph.graph[r]).collect(),
            edges,
            nodes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DependencyGraph {
        // Obama works for Google
        DependencyGraph::new()
            .with_root(1)
            .with_edge(1, 0, "nsubj")
            .with_edge(1, 3, "nmod:for")
            .with_edge(3, 2, "case")
    }

    #[test]
    fn test_empty_graph() {
        let graph = DependencyGraph::new();
        assert!(graph.is_empty());
        assert!(graph.roots().is_empty());
    }

    #[test]
    fn test_nodes_in_token_order() {
        let graph = sample();
        let tokens: Vec<usize> = graph.nodes().map(|n| graph.token(n)).collect();
        assert_eq!(tokens, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_children_and_parents() {
        let graph = sample();
        let works = graph.node_for(1).unwrap();
        let google = graph.node_for(3).unwrap();

        let mut rels: Vec<&str> = graph.children(works).iter().map(|(_, r)| *r).collect();
        rels.sort();
        assert_eq!(rels, vec!["nmod:for", "nsubj"]);

        let parents = graph.parents(google);
        assert_eq!(parents.len(), 1);
        assert_eq!(parents[0], (works, "nmod:for"));
    }

    #[test]
    fn test_descendants_and_ancestors() {
        let graph = sample();
        let works = graph.node_for(1).unwrap();
        let case = graph.node_for(2).unwrap();

        assert_eq!(graph.descendants(works).len(), 3);
        let ancestors: Vec<usize> = graph
            .ancestors(case)
            .into_iter()
            .map(|n| graph.token(n))
            .collect();
        assert_eq!(ancestors, vec![3, 1]);
    }

    #[test]
    fn test_json_form() {
        let json = r#"{"roots":[1],"edges":[{"governor":1,"dependent":0,"relation":"nsubj"}]}"#;
        let graph: DependencyGraph = serde_json::from_str(json).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert!(graph.is_root(graph.node_for(1).unwrap()));

        let back = serde_json::to_value(&graph).unwrap();
        assert_eq!(back["edges"][0]["relation"], "nsubj");
    }
}
