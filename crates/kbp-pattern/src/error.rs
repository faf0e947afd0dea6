//! Pattern compilation and matching errors

use thiserror::Error;

/// Error raised while compiling a single pattern
#[derive(Error, Debug)]
pub enum PatternError {
    #[error("syntax error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    #[error("invalid regex at offset {offset}: {source}")]
    InvalidRegex {
        offset: usize,
        #[source]
        source: regex::Error,
    },
}

impl PatternError {
    pub(crate) fn syntax(offset: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            offset,
            message: message.into(),
        }
    }
}

/// Error raised while compiling a rule file
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("line {line}: {source}")]
    Pattern {
        line: usize,
        #[source]
        source: PatternError,
    },

    #[error("line {line}: undefined macro ${{{name}}}")]
    UndefinedMacro { line: usize, name: String },

    #[error("line {line}: malformed macro definition")]
    MalformedMacro { line: usize },
}

/// Error raised while searching a graph
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("graph has no roots")]
    NoRoots,

    #[error("graph node refers to token {token}, sentence has {len} tokens")]
    TokenOutOfRange { token: usize, len: usize },
}
