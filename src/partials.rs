use std::fs;
use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};
use indexmap::IndexMap;
use log::debug;
use regex::{Captures, Regex};
use walkdir::WalkDir;

use crate::constants::{DEFAULT_PARTIAL_GLOB, PARTIAL_EXTENSION};
use crate::error::Result;

/// Matches `{% include "name" %}` and `{% include 'name' %}`.
const INCLUDE_PATTERN: &str = r#"\{%\s*include\s+["']([^"']+)["']\s*%\}"#;

/// Named template sources substituted into `{% include %}` directives.
#[derive(Debug, Default, Clone)]
pub struct Partials {
    sources: IndexMap<String, String>,
}

impl Partials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.sources.insert(name.into(), source.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.sources.get(name).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Loads every file under `root` that matches one of `patterns`.
    ///
    /// Patterns are matched against paths relative to `root`; with no
    /// patterns, `**/*.liquid` is used. A partial is named after its relative
    /// path with `/` separators and the `.liquid` extension removed, so
    /// `views/partials/full.liquid` loaded from `views` becomes
    /// `partials/full`.
    pub fn from_dir(root: &Path, patterns: &[String]) -> Result<Self> {
        let globset = build_partials_globset(patterns)?;
        let mut partials = Self::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(rel_path) = entry.path().strip_prefix(root) else {
                continue;
            };
            if !globset.is_match(rel_path) {
                continue;
            }
            let name = partial_name(rel_path);
            debug!("Adding partial: {name}");
            partials.insert(name, fs::read_to_string(entry.path())?);
        }

        Ok(partials)
    }

    /// Replaces each known `{% include %}` with the partial's source.
    ///
    /// This is a single textual pass: includes inside a substituted partial
    /// are left as written, and so are includes of unknown partials.
    pub fn resolve(&self, template: &str) -> Result<String> {
        let re = Regex::new(INCLUDE_PATTERN)?;
        let resolved = re.replace_all(template, |caps: &Captures| match self.get(&caps[1]) {
            Some(source) => source.to_string(),
            None => {
                debug!("Partial '{}' not found, leaving include as is", &caps[1]);
                caps[0].to_string()
            }
        });
        Ok(resolved.into_owned())
    }
}

/// Builds a `GlobSet` from the configured patterns, falling back to the default glob.
pub fn build_partials_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    if patterns.is_empty() {
        builder.add(Glob::new(DEFAULT_PARTIAL_GLOB)?);
    }
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

fn partial_name(rel_path: &Path) -> String {
    let name = rel_path
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    match name.strip_suffix(PARTIAL_EXTENSION) {
        Some(stripped) => stripped.to_string(),
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partials() -> Partials {
        let mut partials = Partials::new();
        partials.insert("partials/shared", "<style></style>");
        partials.insert("partials/full", "{% render \"row\" %}");
        partials
    }

    #[test]
    fn substitutes_known_partials() {
        let resolved = partials()
            .resolve("{% include \"partials/shared\" %}<main>{%include 'partials/full'%}</main>")
            .unwrap();
        assert_eq!(resolved, "<style></style><main>{% render \"row\" %}</main>");
    }

    #[test]
    fn leaves_unknown_partials_untouched() {
        let source = "a {% include \"partials/missing\" %} b";
        assert_eq!(partials().resolve(source).unwrap(), source);
    }

    #[test]
    fn single_pass_only() {
        let mut partials = Partials::new();
        partials.insert("outer", "[{% include \"inner\" %}]");
        partials.insert("inner", "x");
        assert_eq!(
            partials.resolve("{% include \"outer\" %}").unwrap(),
            "[{% include \"inner\" %}]"
        );
    }

    #[test]
    fn loads_partials_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("partials")).unwrap();
        fs::write(dir.path().join("partials/full.liquid"), "full").unwrap();
        fs::write(dir.path().join("partials/notes.txt"), "ignored").unwrap();
        fs::write(dir.path().join("layout.liquid"), "layout").unwrap();

        let partials = Partials::from_dir(dir.path(), &[]).unwrap();
        assert_eq!(partials.names().collect::<Vec<_>>(), vec!["layout", "partials/full"]);
        assert_eq!(partials.get("partials/full"), Some("full"));

        let only_txt = Partials::from_dir(dir.path(), &["**/*.txt".to_string()]).unwrap();
        assert_eq!(only_txt.len(), 1);
        assert_eq!(only_txt.get("partials/notes.txt"), Some("ignored"));
    }

    #[test]
    fn invalid_glob_is_an_error() {
        assert!(build_partials_globset(&["[".to_string()]).is_err());
    }
}
