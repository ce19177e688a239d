//! Documentation coverage of declared entities
//!
//! Scores how many of a source file's entities are named in the paired
//! documentation, using whole-word, case-insensitive matching.

use crate::error::DriftError;
use crate::extract::{extract_entities, profile_for_path, Entity};
use regex::RegexBuilder;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Coverage of one source file against one documentation text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageReport {
    /// Source file
    pub file: PathBuf,
    /// Name of the language profile used, `None` when no profile matched
    pub language: Option<&'static str>,
    /// Entities named in the documentation
    pub present: Vec<Entity>,
    /// Entities not named in the documentation
    pub missing: Vec<Entity>,
    /// present / total, 1.0 when there is nothing to document
    pub score: f64,
}

impl CoverageReport {
    /// Total number of entities considered
    pub fn total(&self) -> usize {
        self.present.len() + self.missing.len()
    }
}

/// Whether `name` occurs in `doc_text` as a whole word, ignoring case
pub fn mentions(doc_text: &str, name: &str) -> bool {
    let pattern = format!(r"\b{}\b", regex::escape(name));
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .map(|re| re.is_match(doc_text))
        .unwrap_or(false)
}

/// Partition `entities` by presence in `doc_text` and compute the ratio
pub fn score(file: &Path, entities: Vec<Entity>, doc_text: &str) -> CoverageReport {
    let (present, missing): (Vec<Entity>, Vec<Entity>) = entities
        .into_iter()
        .partition(|entity| mentions(doc_text, &entity.name));

    let total = present.len() + missing.len();
    let score = if total == 0 {
        1.0
    } else {
        present.len() as f64 / total as f64
    };

    CoverageReport {
        file: file.to_path_buf(),
        language: None,
        present,
        missing,
        score,
    }
}

/// Score a source text whose language is chosen from `file`'s extension
pub fn score_source(file: &Path, source: &str, doc_text: &str) -> CoverageReport {
    match profile_for_path(file) {
        Some(profile) => {
            let mut report = score(file, extract_entities(source, profile), doc_text);
            report.language = Some(profile.name);
            report
        }
        None => score(file, Vec::new(), doc_text),
    }
}

/// Read a source file and score it against `doc_text`
pub fn analyze_file(path: &Path, doc_text: &str) -> Result<CoverageReport, DriftError> {
    let source = std::fs::read_to_string(path).map_err(|source| DriftError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(score_source(path, &source, doc_text))
}

/// One report per readable source file; unreadable files are skipped
pub fn analyze_coverage<P: AsRef<Path>>(source_files: &[P], doc_text: &str) -> Vec<CoverageReport> {
    source_files
        .iter()
        .filter_map(|path| match analyze_file(path.as_ref(), doc_text) {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::warn!("Skipping coverage for {:?}: {}", path.as_ref(), e);
                None
            }
        })
        .collect()
}

/// Mean score over reports that have a language profile, `None` if there are none
pub fn average_score(reports: &[CoverageReport]) -> Option<f64> {
    let scored: Vec<f64> = reports
        .iter()
        .filter(|r| r.language.is_some())
        .map(|r| r.score)
        .collect();

    if scored.is_empty() {
        None
    } else {
        Some(scored.iter().sum::<f64>() / scored.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::EntityKind;
    use tempfile::TempDir;

    fn entity(name: &str, kind: EntityKind) -> Entity {
        Entity {
            name: name.to_string(),
            kind,
            line: 1,
        }
    }

    #[test]
    fn test_empty_entities_is_fully_covered() {
        let report = score(Path::new("a.ts"), Vec::new(), "anything at all");
        assert_eq!(report.score, 1.0);
        assert!(report.present.is_empty());
        assert!(report.missing.is_empty());
    }

    #[test]
    fn test_whole_word_matching() {
        assert!(!mentions("Call login first.", "log"));
        assert!(mentions("Use Log to print.", "log"));
        assert!(mentions("see `log()` for details", "log"));
        assert!(!mentions("catalog", "log"));
    }

    #[test]
    fn test_special_characters_are_literal() {
        assert!(!mentions("abc", "a.c"));
        assert!(mentions("call a.c now", "a.c"));
    }

    #[test]
    fn test_score_partition() {
        let entities = vec![
            entity("MathHelper", EntityKind::Class),
            entity("log", EntityKind::Function),
        ];
        let report = score(
            Path::new("utils.ts"),
            entities,
            "# Utils\n\nThe MathHelper class provides add and subtract methods. See login.",
        );

        assert_eq!(report.present.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(), vec!["MathHelper"]);
        assert_eq!(report.missing.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(), vec!["log"]);
        assert!((report.score - 0.5).abs() < 1e-9);
        assert_eq!(report.total(), 2);
    }

    #[test]
    fn test_analyze_coverage_reads_files() {
        let dir = TempDir::new().unwrap();
        let utils = dir.path().join("utils.ts");
        std::fs::write(
            &utils,
            "export class MathHelper {\n    static add(a: number, b: number) { return a + b; }\n}\nexport function log(msg: string) { console.log(msg); }\n",
        )
        .unwrap();
        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, "class Ignored").unwrap();
        let missing = dir.path().join("missing.ts");

        let doc = "The MathHelper class provides add and subtract methods.";
        let reports = analyze_coverage(&[utils.clone(), notes.clone(), missing], doc);

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].file, utils);
        assert_eq!(reports[0].language, Some("typescript"));
        assert_eq!(reports[0].present[0].name, "MathHelper");
        assert_eq!(reports[0].missing[0].name, "log");
        assert!((reports[0].score - 0.5).abs() < 1e-9);

        assert_eq!(reports[1].file, notes);
        assert_eq!(reports[1].language, None);
        assert_eq!(reports[1].score, 1.0);
    }

    #[test]
    fn test_average_score_ignores_unprofiled() {
        let mut a = score(Path::new("a.ts"), vec![entity("x", EntityKind::Function)], "x");
        a.language = Some("typescript");
        let mut b = score(Path::new("b.ts"), vec![entity("y", EntityKind::Function)], "x");
        b.language = Some("typescript");
        let c = score(Path::new("c.txt"), Vec::new(), "");

        assert_eq!(average_score(&[a, b, c]), Some(0.5));
        assert_eq!(average_score(&[]), None);
    }
}
