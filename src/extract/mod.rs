//! Pattern-based entity extraction
//!
//! This module pulls declared names out of source text without parsing it:
//! - Profiles select an ordered pattern list by file extension
//! - Text is scanned line by line, at most one entity per line
//! - Files without a profile yield no entities

pub mod profiles;

pub use profiles::{profile_for_extension, profile_for_path, LanguageProfile};

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Kind of declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Class or struct
    Class,
    Function,
    Variable,
    /// Interface or type declaration
    Interface,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Class => write!(f, "class"),
            EntityKind::Function => write!(f, "function"),
            EntityKind::Variable => write!(f, "variable"),
            EntityKind::Interface => write!(f, "interface"),
        }
    }
}

/// A named declaration found in source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub kind: EntityKind,
    /// 1-based line number
    pub line: usize,
}

/// Extract entities from `source` using `profile`
///
/// The first pattern (in profile order) that matches a line wins; the rest
/// are not tried for that line.
pub fn extract_entities(source: &str, profile: &LanguageProfile) -> Vec<Entity> {
    source
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            profile.patterns.iter().find_map(|def| {
                let name = def.regex.captures(line)?.get(1)?;
                Some(Entity {
                    name: name.as_str().to_string(),
                    kind: def.kind,
                    line: index + 1,
                })
            })
        })
        .collect()
}

/// Extract entities from a file's text, selecting the profile by its path
pub fn extract_for_path(path: &Path, source: &str) -> Vec<Entity> {
    match profile_for_path(path) {
        Some(profile) => extract_entities(source, profile),
        None => {
            tracing::debug!("No language profile for {:?}", path);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_typescript() {
        let code = r#"
export class MathHelper {
    static add(a: number, b: number) { return a + b; }
}
export function log(msg: string) { console.log(msg); }
const answer = 42;
"#;
        let entities = extract_for_path(Path::new("utils.ts"), code);

        assert_eq!(
            entities,
            vec![
                Entity { name: "MathHelper".into(), kind: EntityKind::Class, line: 2 },
                Entity { name: "log".into(), kind: EntityKind::Function, line: 5 },
                Entity { name: "answer".into(), kind: EntityKind::Variable, line: 6 },
            ]
        );
    }

    #[test]
    fn test_one_entity_per_line_first_pattern_wins() {
        let profile = profile_for_extension("ts").unwrap();
        let entities = extract_entities("class A { function b() {} }", profile);

        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].name, "A");
        assert_eq!(entities[0].kind, EntityKind::Class);
    }

    #[test]
    fn test_no_deduplication_across_lines() {
        let profile = profile_for_extension("py").unwrap();
        let entities = extract_entities("def run():\n    pass\ndef run():\n    pass\n", profile);

        let lines: Vec<_> = entities.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![1, 3]);
    }

    #[test]
    fn test_rust_file() {
        let code = "pub struct Config {\n}\n\npub fn load() -> Config {\n    todo!()\n}\nenum Mode { A }\n";
        let names: Vec<_> = extract_for_path(Path::new("src/config.rs"), code)
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["Config", "load", "Mode"]);
    }

    #[test]
    fn test_unknown_extension_yields_nothing() {
        assert!(extract_for_path(Path::new("notes.txt"), "class Foo").is_empty());
        assert!(extract_for_path(Path::new("Makefile"), "build() {").is_empty());
    }
}
