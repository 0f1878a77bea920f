//! Source Facts
//!
//! Exclusion and completeness facts produced by the external source scanner.
//! The gate only reads them. Every field is optional in the serialized form so
//! a scanner can emit just the categories it knows about.

use crate::result::{CovgateError, CovgateResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// A panic or error-wrapping call site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSite {
    /// File the call is in (same identifiers as the coverage profile)
    pub file: String,
    /// 1-based line of the call
    pub line: u32,
    /// Unique identifier of the call site
    #[serde(default)]
    pub id: String,
}

/// An exclusion annotation placed on the line above a block.
///
/// `line` is 0-based, so the annotated statement sits on `line + 1` in
/// coverage (1-based) terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockAnnotation {
    /// Annotated file
    pub file: String,
    /// 0-based annotation line
    pub line: u32,
}

impl BlockAnnotation {
    /// Coverage line the annotation refers to, `None` if it would overflow
    #[must_use]
    pub const fn target_line(&self) -> Option<u32> {
        self.line.checked_add(1)
    }
}

/// An exclusion annotation covering a whole function body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuncAnnotation {
    /// Annotated file
    pub file: String,
    /// First line of the function (1-based)
    pub line_start: u32,
    /// Last line of the function (1-based)
    pub line_end: u32,
}

/// Location an identifier resolves to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactLocation {
    /// File containing the identified call
    pub file: String,
    /// 1-based line of the identified call
    pub line: u32,
}

/// Everything the scanner learned about the source tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceFacts {
    /// Units that must have no untested, non-excluded statements
    pub complete_units: BTreeSet<String>,
    /// Units exempted entirely
    pub excluded_units: BTreeSet<String>,
    /// Files exempted entirely
    pub excluded_files: BTreeSet<String>,
    /// Panic call sites
    pub panic_sites: Vec<CallSite>,
    /// Error-wrapping call sites
    pub wrap_sites: Vec<CallSite>,
    /// Single-block exclusion annotations
    pub explicit_blocks: Vec<BlockAnnotation>,
    /// Whole-function exclusion annotations
    pub explicit_funcs: Vec<FuncAnnotation>,
    /// Identifiers whose call sites should be exempt
    pub skipped_ids: BTreeSet<String>,
    /// Location of every known identifier
    pub all_facts: BTreeMap<String, FactLocation>,
}

impl SourceFacts {
    /// Create an empty fact set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse facts from JSON
    pub fn from_json_str(input: &str) -> CovgateResult<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Parse facts from YAML
    pub fn from_yaml_str(input: &str) -> CovgateResult<Self> {
        Ok(serde_yaml_ng::from_str(input)?)
    }

    /// Load facts from a file, choosing the format from the extension.
    ///
    /// `.yaml` and `.yml` are read as YAML, `.json` or no extension as JSON.
    pub fn load(path: &Path) -> CovgateResult<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&content),
            Some("json") | None => Self::from_json_str(&content),
            Some(other) => Err(CovgateError::invalid_facts(format!(
                "unsupported facts file extension '.{other}' (expected .json, .yaml or .yml)"
            ))),
        }
    }

    /// Resolve a skipped identifier to its location
    #[must_use]
    pub fn resolve(&self, id: &str) -> Option<&FactLocation> {
        self.all_facts.get(id)
    }

    /// Whether `unit` must be fully covered
    #[must_use]
    pub fn is_complete_unit(&self, unit: &str) -> bool {
        self.complete_units.contains(unit)
    }

    /// Mark a unit as complete
    #[must_use]
    pub fn with_complete_unit(mut self, unit: impl Into<String>) -> Self {
        let _ = self.complete_units.insert(unit.into());
        self
    }

    /// Exempt a whole unit
    #[must_use]
    pub fn with_excluded_unit(mut self, unit: impl Into<String>) -> Self {
        let _ = self.excluded_units.insert(unit.into());
        self
    }

    /// Exempt a whole file
    #[must_use]
    pub fn with_excluded_file(mut self, file: impl Into<String>) -> Self {
        let _ = self.excluded_files.insert(file.into());
        self
    }

    /// Record a panic call site
    #[must_use]
    pub fn with_panic_site(mut self, file: impl Into<String>, line: u32, id: impl Into<String>) -> Self {
        self.panic_sites.push(CallSite {
            file: file.into(),
            line,
            id: id.into(),
        });
        self
    }

    /// Record an error-wrapping call site
    #[must_use]
    pub fn with_wrap_site(mut self, file: impl Into<String>, line: u32, id: impl Into<String>) -> Self {
        self.wrap_sites.push(CallSite {
            file: file.into(),
            line,
            id: id.into(),
        });
        self
    }

    /// Record a block annotation at a 0-based line
    #[must_use]
    pub fn with_explicit_block(mut self, file: impl Into<String>, line: u32) -> Self {
        self.explicit_blocks.push(BlockAnnotation {
            file: file.into(),
            line,
        });
        self
    }

    /// Record a function annotation
    #[must_use]
    pub fn with_explicit_func(mut self, file: impl Into<String>, line_start: u32, line_end: u32) -> Self {
        self.explicit_funcs.push(FuncAnnotation {
            file: file.into(),
            line_start,
            line_end,
        });
        self
    }

    /// Register the location of an identifier
    #[must_use]
    pub fn with_fact(mut self, id: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        let _ = self.all_facts.insert(
            id.into(),
            FactLocation {
                file: file.into(),
                line,
            },
        );
        self
    }

    /// Request suppression of an identifier
    #[must_use]
    pub fn with_skipped_id(mut self, id: impl Into<String>) -> Self {
        let _ = self.skipped_ids.insert(id.into());
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_empty_facts() {
        let facts = SourceFacts::from_json_str("{}").unwrap();
        assert_eq!(facts, SourceFacts::default());
    }

    #[test]
    fn test_json_fields() {
        let json = r#"{
            "complete_units": ["a/b"],
            "wrap_sites": [{"file": "a/b/c.go", "line": 11, "id": "QWERTYUIOP"}],
            "explicit_blocks": [{"file": "a/b/c.go", "line": 4}],
            "explicit_funcs": [{"file": "a/b/c.go", "line_start": 9, "line_end": 13}],
            "skipped_ids": ["ASDFGHJKLZ"],
            "all_facts": {"ASDFGHJKLZ": {"file": "a/b/c.go", "line": 20}}
        }"#;
        let facts = SourceFacts::from_json_str(json).unwrap();
        assert!(facts.is_complete_unit("a/b"));
        assert_eq!(facts.wrap_sites[0].id, "QWERTYUIOP");
        assert_eq!(facts.explicit_blocks[0].target_line(), Some(5));
        assert_eq!(facts.explicit_funcs[0].line_end, 13);
        assert_eq!(facts.resolve("ASDFGHJKLZ").unwrap().line, 20);
        assert!(facts.resolve("MISSINGIDX").is_none());
    }

    #[test]
    fn test_call_site_id_is_optional() {
        let facts = SourceFacts::from_json_str(r#"{"panic_sites": [{"file": "x.go", "line": 3}]}"#).unwrap();
        assert_eq!(facts.panic_sites[0].id, "");
    }

    #[test]
    fn test_yaml_fields() {
        let yaml = "excluded_units:\n  - gen/proto\nexcluded_files:\n  - a/zz_generated.go\n";
        let facts = SourceFacts::from_yaml_str(yaml).unwrap();
        assert!(facts.excluded_units.contains("gen/proto"));
        assert!(facts.excluded_files.contains("a/zz_generated.go"));
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("facts.json");
        let yaml_path = dir.path().join("facts.yml");
        let txt_path = dir.path().join("facts.txt");
        std::fs::write(&json_path, r#"{"complete_units": ["x"]}"#).unwrap();
        std::fs::write(&yaml_path, "complete_units: [y]\n").unwrap();
        std::fs::write(&txt_path, "{}").unwrap();

        assert!(SourceFacts::load(&json_path).unwrap().is_complete_unit("x"));
        assert!(SourceFacts::load(&yaml_path).unwrap().is_complete_unit("y"));
        assert!(matches!(
            SourceFacts::load(&txt_path),
            Err(CovgateError::InvalidFacts { .. })
        ));
    }

    #[test]
    fn test_builders() {
        let facts = SourceFacts::new()
            .with_complete_unit("a")
            .with_panic_site("a/x.go", 3, "PANICPANIC")
            .with_fact("ID", "a/x.go", 9)
            .with_skipped_id("ID");
        assert_eq!(facts.panic_sites.len(), 1);
        assert!(facts.skipped_ids.contains("ID"));
        assert_eq!(facts.resolve("ID").unwrap().file, "a/x.go");
    }

    #[test]
    fn test_block_annotation_on_last_line_has_no_target() {
        let ann = BlockAnnotation {
            file: "x.go".to_string(),
            line: u32::MAX,
        };
        assert_eq!(ann.target_line(), None);
    }
}
