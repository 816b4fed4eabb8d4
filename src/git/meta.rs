//! Cheap per-repository metadata read straight from the working tree.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

const README_FILES: &[&str] = &["README.md", "README.rst", "README.txt", "README"];

/// Bytes read from the readme when looking for a description.
const README_READ_LIMIT: u64 = 500;
/// Stop collecting lines once the description grows past this.
const DESCRIPTION_SOFT_LIMIT: usize = 150;
const DESCRIPTION_MAX_CHARS: usize = 200;

enum Marker {
    File(&'static str),
    Dir(&'static str),
    /// Any top-level entry whose name contains this fragment.
    NameContains(&'static str),
}

const TECH_MARKERS: &[(Marker, &[&str])] = &[
    (Marker::File("package.json"), &["Node.js", "JavaScript"]),
    (Marker::File("tsconfig.json"), &["TypeScript"]),
    (Marker::File("requirements.txt"), &["Python"]),
    (Marker::File("pyproject.toml"), &["Python"]),
    (Marker::File("Pipfile"), &["Python"]),
    (Marker::File("setup.py"), &["Python"]),
    (Marker::File("Gemfile"), &["Ruby"]),
    (Marker::File("Cargo.toml"), &["Rust"]),
    (Marker::File("go.mod"), &["Go"]),
    (Marker::File("pom.xml"), &["Java", "Maven"]),
    (Marker::File("build.gradle"), &["Java", "Gradle"]),
    (Marker::NameContains(".csproj"), &["C#", ".NET"]),
    (Marker::NameContains(".sln"), &["C#", ".NET"]),
    (Marker::File("Dockerfile"), &["Docker"]),
    (Marker::File("docker-compose.yml"), &["Docker"]),
    (Marker::Dir("kubernetes"), &["Kubernetes"]),
    (Marker::Dir("terraform"), &["Terraform"]),
    (Marker::Dir(".github/workflows"), &["GitHub Actions"]),
    (Marker::File("angular.json"), &["Angular"]),
    (Marker::File("next.config.js"), &["Next.js"]),
    (Marker::File("nuxt.config.js"), &["Nuxt.js"]),
    (Marker::File("vue.config.js"), &["Vue.js"]),
    (Marker::File("tailwind.config.js"), &["Tailwind CSS"]),
    (Marker::File("webpack.config.js"), &["Webpack"]),
    (Marker::File(".eslintrc"), &["ESLint"]),
    (Marker::File("jest.config"), &["Jest"]),
    (Marker::File("pytest.ini"), &["Pytest"]),
];

/// First prose lines of the readme, skipping headings and image/badge lines.
/// Empty when there is no readable readme.
pub fn read_description(repo_root: &Path) -> String {
    README_FILES
        .iter()
        .map(|name| repo_root.join(name))
        .find(|path| path.exists())
        .and_then(|path| read_head(&path).ok())
        .map(|text| description_from(&text))
        .unwrap_or_default()
}

fn read_head(path: &Path) -> std::io::Result<String> {
    let mut buf = Vec::new();
    File::open(path)?.take(README_READ_LIMIT).read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn description_from(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        lines.push(line);
        if lines.join(" ").len() > DESCRIPTION_SOFT_LIMIT {
            break;
        }
    }
    lines.join(" ").chars().take(DESCRIPTION_MAX_CHARS).collect()
}

/// Technology tags implied by marker files in the repository root, sorted.
pub fn detect_technologies(repo_root: &Path) -> Vec<String> {
    let entries: Vec<String> = fs::read_dir(repo_root)
        .map(|rd| {
            rd.filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().to_string())
                .collect()
        })
        .unwrap_or_default();

    let mut found = BTreeSet::new();
    for (marker, techs) in TECH_MARKERS {
        let present = match marker {
            Marker::File(name) => repo_root.join(name).exists(),
            Marker::Dir(name) => repo_root.join(name).is_dir(),
            Marker::NameContains(fragment) => entries.iter().any(|e| e.contains(fragment)),
        };
        if present {
            found.extend(techs.iter().map(|t| t.to_string()));
        }
    }
    found.into_iter().collect()
}
