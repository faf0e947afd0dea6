//! Rule store
//!
//! Loads one rule file per relation type and keeps the compiled patterns,
//! in file order, keyed by relation. Built once; read-only afterwards.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use kbp_core::{ExtractorConfig, KbpError, RelationType, Result};
use kbp_pattern::{compile_batch, SemgrexPattern};

/// Compiled patterns per relation type
#[derive(Debug, Clone, Default)]
pub struct RuleStore {
    catalog: Vec<RelationType>,
    rules: HashMap<RelationType, Vec<SemgrexPattern>>,
}

impl RuleStore {
    /// Load rules for the full KBP catalog
    pub fn load(config: &ExtractorConfig) -> Result<Self> {
        Self::load_catalog(config, RelationType::all())
    }

    /// Load rules for `catalog`, whose order becomes the match priority
    ///
    /// Relations without a rule file are skipped. Any rule file that exists
    /// but cannot be read or compiled fails the whole load.
    pub fn load_catalog(config: &ExtractorConfig, catalog: &[RelationType]) -> Result<Self> {
        tracing::info!("Creating semgrex rule store from {}", config.rules_dir.display());

        let dirs = candidate_dirs(config);
        let mut rules = HashMap::new();

        for relation in catalog {
            let file_name = config.rule_file_name(relation.canonical_name());
            let Some(path) = find_rule_file(&dirs, &file_name) else {
                tracing::debug!("No rule file {} for relation {}", file_name, relation);
                continue;
            };

            let patterns = compile_file(&path)?;
            tracing::info!(
                "Read {} rules from {} for relation {}",
                patterns.len(),
                path.display(),
                relation
            );
            rules.insert(*relation, patterns);
        }

        Ok(Self {
            catalog: catalog.to_vec(),
            rules,
        })
    }

    /// Build a store from already compiled patterns
    ///
    /// Catalog order follows the order of `entries`.
    pub fn from_patterns(entries: Vec<(RelationType, Vec<SemgrexPattern>)>) -> Self {
        let catalog = entries.iter().map(|(r, _)| *r).collect();
        Self {
            catalog,
            rules: entries.into_iter().collect(),
        }
    }

    /// Relation types in priority order, with or without rules
    pub fn catalog(&self) -> &[RelationType] {
        &self.catalog
    }

    /// Patterns for a relation, `None` when it has no rule file
    pub fn get(&self, relation: &RelationType) -> Option<&[SemgrexPattern]> {
        self.rules.get(relation).map(Vec::as_slice)
    }

    pub fn contains(&self, relation: &RelationType) -> bool {
        self.rules.contains_key(relation)
    }

    /// Relations that have rules, in priority order
    pub fn relations(&self) -> impl Iterator<Item = &RelationType> + '_ {
        self.catalog.iter().filter(|r| self.rules.contains_key(*r))
    }

    /// Number of relations with rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Total patterns across all relations
    pub fn total_patterns(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }
}

/// The rule directory as given, then joined onto each search root
fn candidate_dirs(config: &ExtractorConfig) -> Vec<PathBuf> {
    let mut dirs = vec![config.rules_dir.clone()];
    if config.rules_dir.is_relative() {
        dirs.extend(config.search_paths.iter().map(|root| root.join(&config.rules_dir)));
    }
    dirs
}

fn find_rule_file(dirs: &[PathBuf], file_name: &str) -> Option<PathBuf> {
    dirs.iter()
        .map(|dir| dir.join(file_name))
        .find(|path| path.is_file())
}

fn compile_file(path: &Path) -> Result<Vec<SemgrexPattern>> {
    let text = std::fs::read_to_string(path).map_err(|e| KbpError::InvalidRules {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    compile_batch(&text).map_err(|e| KbpError::InvalidRules {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn employee_of() -> RelationType {
        RelationType::from_canonical_name("per:employee_of").unwrap()
    }

    #[test]
    fn test_load_present_and_absent() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("per:employee_of.rules"),
            "# employment\n{ner:PERSON} <nsubj ({} >nmod:for {ner:ORGANIZATION})\n{ner:PERSON} <appos {ner:ORGANIZATION}\n",
        )
        .unwrap();

        let store = RuleStore::load(&ExtractorConfig::for_dir(dir.path())).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.total_patterns(), 2);
        assert_eq!(store.get(&employee_of()).unwrap().len(), 2);
        assert!(!store.contains(&RelationType::from_canonical_name("per:spouse").unwrap()));
        assert_eq!(store.catalog().len(), RelationType::all().len());
    }

    #[test]
    fn test_slash_names_map_to_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("org:top_membersSLASHemployees.rules"),
            "{ner:ORGANIZATION} <nmod:of {ner:PERSON}\n",
        )
        .unwrap();

        let store = RuleStore::load(&ExtractorConfig::for_dir(dir.path())).unwrap();
        let rel = RelationType::from_canonical_name("org:top_members/employees").unwrap();
        assert!(store.contains(&rel));
    }

    #[test]
    fn test_patterns_keep_file_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("per:employee_of.rules"),
            "{word:first}\n{word:second}\n{word:third}\n",
        )
        .unwrap();

        let store = RuleStore::load(&ExtractorConfig::for_dir(dir.path())).unwrap();
        let sources: Vec<&str> = store
            .get(&employee_of())
            .unwrap()
            .iter()
            .map(|p| p.source())
            .collect();
        assert_eq!(sources, vec!["{word:first}", "{word:second}", "{word:third}"]);
    }

    #[test]
    fn test_malformed_file_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("per:employee_of.rules"), "{ner:PERSON} <nsubj {}\n").unwrap();
        fs::write(dir.path().join("per:spouse.rules"), "{ner:PERSON >conj {}\n").unwrap();

        let err = RuleStore::load(&ExtractorConfig::for_dir(dir.path())).unwrap_err();
        match err {
            KbpError::InvalidRules { path, message } => {
                assert!(path.ends_with("per:spouse.rules"));
                assert!(message.contains("line 1"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_directory_is_empty_store() {
        let store = RuleStore::load(&ExtractorConfig::for_dir("/nonexistent/semgrex")).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.relations().count(), 0);
    }

    #[test]
    fn test_search_paths_resolve_relative_dir() {
        let root = tempfile::tempdir().unwrap();
        let rules = root.path().join("kbp").join("semgrex");
        fs::create_dir_all(&rules).unwrap();
        fs::write(rules.join("per:spouse.rules"), "{ner:PERSON} >conj {ner:PERSON}\n").unwrap();

        let config = ExtractorConfig {
            rules_dir: PathBuf::from("kbp/semgrex"),
            search_paths: vec![PathBuf::from("/nonexistent"), root.path().to_path_buf()],
            ..ExtractorConfig::default()
        };
        let store = RuleStore::load(&config).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_from_patterns_sets_priority() {
        let spouse = RelationType::from_canonical_name("per:spouse").unwrap();
        let store = RuleStore::from_patterns(vec![
            (spouse, vec![SemgrexPattern::compile("{}").unwrap()]),
            (employee_of(), vec![]),
        ]);
        assert_eq!(store.catalog(), &[spouse, employee_of()]);
        assert_eq!(store.relations().count(), 2);
    }
}
