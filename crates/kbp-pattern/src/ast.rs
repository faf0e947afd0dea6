//! Compiled pattern tree

use regex::Regex;

/// Token attribute a node constraint reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attr {
    Word,
    Lemma,
    Tag,
    Ner,
}

impl Attr {
    pub(crate) fn from_key(key: &str) -> Option<Self> {
        match key {
            "word" => Some(Self::Word),
            "lemma" => Some(Self::Lemma),
            "tag" | "pos" => Some(Self::Tag),
            "ner" => Some(Self::Ner),
            _ => None,
        }
    }
}

/// Literal or anchored regex
#[derive(Debug, Clone)]
pub enum StringMatcher {
    Exact(String),
    Regex(Regex),
}

impl StringMatcher {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::Exact(s) => s == value,
            Self::Regex(re) => re.is_match(value),
        }
    }
}

/// One `key:value` test inside `{...}`
#[derive(Debug, Clone)]
pub struct AttrConstraint {
    pub attr: Attr,
    pub value: StringMatcher,
    pub negated: bool,
}

/// Direction of an edge step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// `>`: the current node governs the target
    Governs,
    /// `<`: the current node depends on the target
    GovernedBy,
    /// `>>`: the target is reachable from the current node
    Descendant,
    /// `<<`: the current node is reachable from the target
    Ancestor,
}

#[derive(Debug, Clone)]
pub struct EdgePattern {
    pub kind: EdgeKind,
    /// `None` accepts any relation name
    pub label: Option<StringMatcher>,
    pub negated: bool,
    pub target: NodePattern,
}

#[derive(Debug, Clone, Default)]
pub struct NodePattern {
    pub constraints: Vec<AttrConstraint>,
    /// `{$}`: node must be a graph root
    pub root: bool,
    pub negated: bool,
    pub name: Option<String>,
    pub edges: Vec<EdgePattern>,
}
