//! Path-based file classification.
//!
//! Every changed file is assigned exactly one [`ContributionType`] by walking
//! [`RULES`] top to bottom; the first matching rule wins. Matching is done on
//! the lower-cased path, so all patterns below are lower-case.

use crate::model::{ContributionType, FileClassification};
use std::path::Path;

const TEST_PATTERNS: &[&str] = &[
    "test_", "_test.", ".test.", "tests/", "/test/", "spec_", "_spec.", ".spec.", "specs/",
    "/spec/", "__tests__/", ".tests.", "testing/", "unittest", "pytest", "jest", "mocha",
    "cypress/", "e2e/",
];

const DOC_EXTENSIONS: &[&str] = &[".md", ".rst", ".txt", ".adoc", ".wiki"];

const DOC_PATTERNS: &[&str] = &[
    "readme", "changelog", "contributing", "license", "authors", "docs/", "/doc/",
    "documentation/", ".md", ".rst", ".txt", "wiki/", "guide", "manual", "api-docs/",
];

const INFRA_PATTERNS: &[&str] = &[
    "dockerfile", "docker-compose", "kubernetes/", "k8s/", "helm/", "terraform/", ".tf",
    "ansible/", "puppet/", "chef/", "cloudformation", "pulumi/", "vagrant", "makefile", "cmake",
    "deploy/", "deployment/", "infra/", "infrastructure/", "scripts/deploy", "scripts/build",
    ".sh", "nginx", "apache",
];

const SPEC_CONFIG_PATTERNS: &[&str] = &[
    "package.json", "tsconfig", "webpack", "babel", "eslint", "prettier", ".yaml", ".yml",
    ".json", ".toml", ".ini", ".cfg", ".conf", "openapi", "swagger", "schema", ".env",
    "config/", "/config", "settings", ".editorconfig", ".gitignore", ".dockerignore",
    "pyproject.toml", "setup.py", "setup.cfg", "requirements", "gemfile", "cargo.toml",
    "go.mod", "pom.xml", "build.gradle", ".github/", ".gitlab-ci", "azure-pipelines",
    "jenkinsfile", ".travis", "circle.yml", "bitbucket-pipelines",
];

const STYLE_PATTERNS: &[&str] = &[
    ".css", ".scss", ".sass", ".less", ".styl", ".styled.", "styles/", "/style/", "theme",
    ".tailwind",
];

/// Language implied by a lower-cased extension (including the leading dot).
pub fn language_for_extension(ext: &str) -> Option<&'static str> {
    let lang = match ext {
        ".py" => "Python",
        ".js" => "JavaScript",
        ".ts" => "TypeScript",
        ".tsx" => "TypeScript (React)",
        ".jsx" => "JavaScript (React)",
        ".cs" => "C#",
        ".java" => "Java",
        ".go" => "Go",
        ".rs" => "Rust",
        ".rb" => "Ruby",
        ".php" => "PHP",
        ".swift" => "Swift",
        ".kt" => "Kotlin",
        ".scala" => "Scala",
        ".c" => "C",
        ".cpp" => "C++",
        ".h" => "C/C++ Header",
        ".hpp" => "C++ Header",
        ".vue" => "Vue",
        ".svelte" => "Svelte",
        ".html" => "HTML",
        ".sql" => "SQL",
        ".r" => "R",
        ".m" => "MATLAB/Objective-C",
        ".pl" => "Perl",
        ".lua" => "Lua",
        ".dart" => "Dart",
        ".elm" => "Elm",
        ".ex" | ".exs" => "Elixir",
        ".erl" => "Erlang",
        ".hs" => "Haskell",
        ".clj" => "Clojure",
        ".fs" | ".fsx" => "F#",
        _ => return None,
    };
    Some(lang)
}

/// Lower-cased extension with its leading dot, or an empty string.
pub fn extension_of(file_path: &str) -> String {
    Path::new(file_path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

/// Views of a path the rule predicates look at.
pub struct PathView {
    lower: String,
    ext: String,
}

impl PathView {
    fn new(file_path: &str) -> Self {
        Self {
            lower: file_path.to_lowercase(),
            ext: extension_of(file_path),
        }
    }

    fn contains_any(&self, patterns: &[&str]) -> bool {
        patterns.iter().any(|p| self.lower.contains(p))
    }
}

/// How a matching rule decides the reported language.
#[derive(Debug, Clone, Copy)]
pub enum LanguageRule {
    /// Whatever the extension maps to, possibly nothing.
    Inferred,
    /// Extension mapping, falling back to a fixed label.
    InferredOr(&'static str),
    /// Always this label, regardless of extension.
    Fixed(&'static str),
}

pub struct Rule {
    pub category: ContributionType,
    pub matches: fn(&PathView) -> bool,
    pub language: LanguageRule,
}

fn is_test(p: &PathView) -> bool {
    p.contains_any(TEST_PATTERNS)
}

fn is_documentation(p: &PathView) -> bool {
    DOC_EXTENSIONS.contains(&p.ext.as_str()) || p.contains_any(DOC_PATTERNS)
}

fn is_infrastructure(p: &PathView) -> bool {
    p.contains_any(INFRA_PATTERNS)
}

fn is_specs_config(p: &PathView) -> bool {
    p.contains_any(SPEC_CONFIG_PATTERNS)
}

fn is_styling(p: &PathView) -> bool {
    p.contains_any(STYLE_PATTERNS)
}

fn is_known_language(p: &PathView) -> bool {
    language_for_extension(&p.ext).is_some()
}

/// Classification rules in priority order.
pub const RULES: &[Rule] = &[
    Rule {
        category: ContributionType::Tests,
        matches: is_test,
        language: LanguageRule::Inferred,
    },
    Rule {
        category: ContributionType::Documentation,
        matches: is_documentation,
        language: LanguageRule::Fixed("Documentation"),
    },
    Rule {
        category: ContributionType::Infrastructure,
        matches: is_infrastructure,
        language: LanguageRule::InferredOr("Infrastructure"),
    },
    Rule {
        category: ContributionType::SpecsConfig,
        matches: is_specs_config,
        language: LanguageRule::Fixed("Configuration"),
    },
    Rule {
        category: ContributionType::Styling,
        matches: is_styling,
        language: LanguageRule::Fixed("CSS/Styling"),
    },
    Rule {
        category: ContributionType::ProductionCode,
        matches: is_known_language,
        language: LanguageRule::Inferred,
    },
];

#[derive(Debug, Clone, Copy, Default)]
pub struct FileClassifier;

impl FileClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify one changed file. Never fails: paths no rule claims are `Other`.
    pub fn classify(&self, file_path: &str, lines_added: u32, lines_removed: u32) -> FileClassification {
        let view = PathView::new(file_path);
        let inferred = language_for_extension(&view.ext);

        let (contribution_type, language) = RULES
            .iter()
            .find(|rule| (rule.matches)(&view))
            .map(|rule| {
                let language = match rule.language {
                    LanguageRule::Inferred => inferred,
                    LanguageRule::InferredOr(fallback) => Some(inferred.unwrap_or(fallback)),
                    LanguageRule::Fixed(label) => Some(label),
                };
                (rule.category, language)
            })
            .unwrap_or((ContributionType::Other, None));

        FileClassification {
            file_path: file_path.to_string(),
            contribution_type,
            language: language.map(str::to_string),
            lines_added,
            lines_removed,
        }
    }
}
