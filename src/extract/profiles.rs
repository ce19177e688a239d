//! Language profiles for entity extraction
//!
//! Each profile maps a set of file extensions to an ordered list of
//! definition patterns. Specific patterns come before general ones because
//! extraction stops at the first match on a line. Adding a language is one
//! entry in [`PROFILE_TABLE`].

use super::EntityKind;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// A compiled definition pattern; capture group 1 is the entity name
#[derive(Debug)]
pub struct DefinitionPattern {
    pub kind: EntityKind,
    pub regex: Regex,
}

/// Ordered definition patterns for one language family
#[derive(Debug)]
pub struct LanguageProfile {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
    pub patterns: Vec<DefinitionPattern>,
}

impl LanguageProfile {
    /// Whether this profile handles `ext` (without the dot)
    pub fn matches_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

type ProfileSpec = (
    &'static str,
    &'static [&'static str],
    &'static [(EntityKind, &'static str)],
);

const PROFILE_TABLE: &[ProfileSpec] = &[
    (
        "typescript",
        &["ts", "tsx", "js", "jsx", "mjs", "cjs"],
        &[
            (EntityKind::Class, r"\bclass\s+(\w+)"),
            (EntityKind::Function, r"\bfunction\s+(\w+)"),
            (EntityKind::Variable, r"\b(?:const|let|var)\s+(\w+)\s*="),
            (EntityKind::Interface, r"\binterface\s+(\w+)"),
            (EntityKind::Interface, r"\btype\s+(\w+)\s*="),
        ],
    ),
    (
        "python",
        &["py"],
        &[
            (EntityKind::Class, r"\bclass\s+(\w+)"),
            (EntityKind::Function, r"\bdef\s+(\w+)"),
        ],
    ),
    (
        "go",
        &["go"],
        &[
            (EntityKind::Function, r"\bfunc\s+(\w+)"),
            (EntityKind::Interface, r"\btype\s+(\w+)"),
        ],
    ),
    (
        "rust",
        &["rs"],
        &[
            (EntityKind::Function, r"\bfn\s+(\w+)"),
            (EntityKind::Class, r"\bstruct\s+(\w+)"),
            (EntityKind::Interface, r"\benum\s+(\w+)"),
            (EntityKind::Interface, r"\btrait\s+(\w+)"),
        ],
    ),
    (
        "shell",
        &["sh", "bash", "zsh"],
        &[
            (EntityKind::Function, r"\bfunction\s+(\w+)"),
            (EntityKind::Function, r"(\w+)\s*\(\)"),
        ],
    ),
];

static PROFILES: LazyLock<Vec<LanguageProfile>> = LazyLock::new(|| {
    PROFILE_TABLE
        .iter()
        .map(|&(name, extensions, patterns)| LanguageProfile {
            name,
            extensions,
            patterns: patterns
                .iter()
                .map(|&(kind, pattern)| DefinitionPattern {
                    kind,
                    regex: Regex::new(pattern).expect("built-in definition pattern is valid"),
                })
                .collect(),
        })
        .collect()
});

/// All registered profiles
pub fn profiles() -> &'static [LanguageProfile] {
    &PROFILES
}

/// Profile for an extension (without the dot), case-insensitive
pub fn profile_for_extension(ext: &str) -> Option<&'static LanguageProfile> {
    profiles().iter().find(|p| p.matches_extension(ext))
}

/// Profile for a path, selected by its extension
pub fn profile_for_path(path: &Path) -> Option<&'static LanguageProfile> {
    let ext = path.extension()?.to_str()?;
    profile_for_extension(ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_match(profile: &LanguageProfile, kind: EntityKind, line: &str) -> Option<String> {
        profile
            .patterns
            .iter()
            .filter(|p| p.kind == kind)
            .find_map(|p| p.regex.captures(line))
            .map(|c| c[1].to_string())
    }

    #[test]
    fn test_profile_lookup() {
        for ext in ["ts", "tsx", "js", "py", "go", "rs", "sh", "zsh", "TS"] {
            assert!(profile_for_extension(ext).is_some(), "missing profile for {}", ext);
        }
        assert!(profile_for_extension("unknown").is_none());
        assert_eq!(profile_for_path(Path::new("src/lib.rs")).unwrap().name, "rust");
        assert!(profile_for_path(Path::new("Makefile")).is_none());
    }

    #[test]
    fn test_typescript_patterns() {
        let ts = profile_for_extension("ts").unwrap();
        assert_eq!(first_match(ts, EntityKind::Class, "export class MyClass {").as_deref(), Some("MyClass"));
        assert_eq!(first_match(ts, EntityKind::Function, "function myFunction()").as_deref(), Some("myFunction"));
        assert_eq!(first_match(ts, EntityKind::Variable, "const myVar = 10").as_deref(), Some("myVar"));
        assert_eq!(first_match(ts, EntityKind::Variable, "let myLet =").as_deref(), Some("myLet"));
        assert_eq!(first_match(ts, EntityKind::Interface, "interface MyInterface {").as_deref(), Some("MyInterface"));
        assert_eq!(first_match(ts, EntityKind::Interface, "type MyType = string").as_deref(), Some("MyType"));
        assert_eq!(first_match(ts, EntityKind::Class, "subclass Foo"), None);
    }

    #[test]
    fn test_python_patterns() {
        let py = profile_for_extension("py").unwrap();
        assert_eq!(first_match(py, EntityKind::Class, "class MyClass:").as_deref(), Some("MyClass"));
        assert_eq!(first_match(py, EntityKind::Function, "def my_func():").as_deref(), Some("my_func"));
    }

    #[test]
    fn test_go_patterns() {
        let go = profile_for_extension("go").unwrap();
        assert_eq!(first_match(go, EntityKind::Function, "func MyFunc()").as_deref(), Some("MyFunc"));
        assert_eq!(first_match(go, EntityKind::Interface, "type MyType struct").as_deref(), Some("MyType"));
    }

    #[test]
    fn test_rust_patterns() {
        let rs = profile_for_extension("rs").unwrap();
        assert_eq!(first_match(rs, EntityKind::Function, "pub fn my_func()").as_deref(), Some("my_func"));
        assert_eq!(first_match(rs, EntityKind::Class, "struct MyStruct {").as_deref(), Some("MyStruct"));
        assert_eq!(first_match(rs, EntityKind::Interface, "enum MyEnum {").as_deref(), Some("MyEnum"));
        assert_eq!(first_match(rs, EntityKind::Interface, "pub trait Store {").as_deref(), Some("Store"));
    }

    #[test]
    fn test_shell_patterns() {
        let sh = profile_for_extension("sh").unwrap();
        assert_eq!(first_match(sh, EntityKind::Function, "function my_func").as_deref(), Some("my_func"));
        assert_eq!(first_match(sh, EntityKind::Function, "my_func() {").as_deref(), Some("my_func"));
    }
}
