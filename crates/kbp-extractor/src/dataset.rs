//! Labeled dataset IO
//!
//! Datasets are JSON Lines: one object per line holding the fields of a
//! [`KbpInput`] plus the gold `relation` label. Blank lines are skipped.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use kbp_core::{KbpError, KbpInput, Result};

/// An input with its gold relation label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledExample {
    #[serde(flatten)]
    pub input: KbpInput,

    /// Canonical relation name or `no_relation`
    pub relation: String,
}

impl LabeledExample {
    pub fn new(input: KbpInput, relation: impl Into<String>) -> Self {
        Self {
            input,
            relation: relation.into(),
        }
    }
}

/// Parse JSON Lines records from a reader
pub fn read_jsonl<T: DeserializeOwned, R: BufRead>(reader: R) -> Result<Vec<T>> {
    let mut records = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line)
            .map_err(|e| KbpError::Dataset(format!("line {}: {}", i + 1, e)))?;
        records.push(record);
    }
    Ok(records)
}

/// Read a labeled dataset file
pub fn read_dataset(path: impl AsRef<Path>) -> Result<Vec<LabeledExample>> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| KbpError::Dataset(format!("{}: {}", path.display(), e)))?;
    let examples: Vec<LabeledExample> = read_jsonl(BufReader::new(file))?;
    tracing::info!("Read {} examples from {}", examples.len(), path.display());
    Ok(examples)
}

/// Read unlabeled inputs from a file
pub fn read_inputs(path: impl AsRef<Path>) -> Result<Vec<KbpInput>> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| KbpError::Dataset(format!("{}: {}", path.display(), e)))?;
    read_jsonl(BufReader::new(file))
}

/// Open a prediction sink: `stdout` (any case) or a file path
pub fn open_predictions(target: &str) -> Result<Box<dyn Write>> {
    if target.eq_ignore_ascii_case("stdout") {
        Ok(Box::new(io::stdout()))
    } else {
        Ok(Box::new(File::create(target)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kbp_core::NerTag;
    use std::io::Cursor;

    const LINE: &str = r#"{"subject_span":{"start":0,"end":1},"subject_type":"PERSON","object_span":{"start":3,"end":4},"object_type":"ORGANIZATION","sentence":{"tokens":[{"word":"Obama","ner":"PERSON"},{"word":"works"},{"word":"for"},{"word":"Google"}],"primary":{"roots":[1],"edges":[{"governor":1,"dependent":0,"relation":"nsubj"}]}},"relation":"per:employee_of"}"#;

    #[test]
    fn test_parse_example_and_skip_blank_lines() {
        let text = format!("\n{LINE}\n   \n{LINE}\n");
        let examples: Vec<LabeledExample> = read_jsonl(Cursor::new(text)).unwrap();

        assert_eq!(examples.len(), 2);
        let example = &examples[0];
        assert_eq!(example.relation, "per:employee_of");
        assert_eq!(example.input.subject_type, NerTag::Person);
        assert_eq!(example.input.object_text(), "Google");
        assert_eq!(example.input.sentence.tokens[1].ner, "O");

        let primary = example.input.sentence.primary.as_ref().unwrap();
        assert_eq!(primary.edge_count(), 1);
        assert!(example.input.sentence.fallback.is_none());
    }

    #[test]
    fn test_malformed_line_names_line_number() {
        let text = format!("{LINE}\n{{\"relation\": 3}}\n");
        let err = read_jsonl::<LabeledExample, _>(Cursor::new(text)).unwrap_err();
        match err {
            KbpError::Dataset(msg) => assert!(msg.starts_with("line 2:"), "{msg}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_dataset_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.jsonl");
        std::fs::write(&path, format!("{LINE}\n")).unwrap();

        let examples = read_dataset(&path).unwrap();
        assert_eq!(examples.len(), 1);
        assert!(read_dataset(dir.path().join("missing.jsonl")).is_err());
    }

    #[test]
    fn test_open_predictions_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("predictions.tsv");
        {
            let mut sink = open_predictions(path.to_str().unwrap()).unwrap();
            writeln!(sink, "per:spouse\tno_relation\t1").unwrap();
        }
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "per:spouse\tno_relation\t1\n");
    }
}
