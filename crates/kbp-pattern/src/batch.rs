//! Rule file compilation
//!
//! One pattern per line, compiled in file order. `#` starts a comment line.
//! `macro NAME = body` defines text that later lines reference as `${NAME}`.

use std::collections::HashMap;

use crate::error::BatchError;
use crate::SemgrexPattern;

/// Compile every pattern in a rule file, preserving order
pub fn compile_batch(text: &str) -> Result<Vec<SemgrexPattern>, BatchError> {
    let mut macros: HashMap<String, String> = HashMap::new();
    let mut patterns = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(def) = trimmed.strip_prefix("macro ") {
            let (name, body) = def
                .split_once('=')
                .ok_or(BatchError::MalformedMacro { line })?;
            let name = name.trim();
            if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(BatchError::MalformedMacro { line });
            }
            let body = expand(body.trim(), &macros, line)?;
            macros.insert(name.to_string(), body);
            continue;
        }

        let source = expand(trimmed, &macros, line)?;
        let pattern = SemgrexPattern::compile(&source)
            .map_err(|source| BatchError::Pattern { line, source })?;
        patterns.push(pattern);
    }

    Ok(patterns)
}

fn expand(text: &str, macros: &HashMap<String, String>, line: usize) -> Result<String, BatchError> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find('}')
            .ok_or(BatchError::MalformedMacro { line })?;
        let name = &after[..end];
        let body = macros.get(name).ok_or_else(|| BatchError::UndefinedMacro {
            line,
            name: name.to_string(),
        })?;
        out.push_str(body);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}
