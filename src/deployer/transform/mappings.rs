//! Class name mapping table used by the resource remappers.

use crate::deployer::{Result, error::ErrorExt};
use std::{collections::HashMap, path::Path};

/// Namespace assumed when a mappings file carries no header.
pub const DEFAULT_TARGET_NAMESPACE: &str = "named";

/// Class name mappings in JVM internal form (`com/example/Foo`).
#[derive(Debug, Clone)]
pub struct Mappings {
    classes: HashMap<String, String>,
    target_namespace: String,
}

impl Default for Mappings {
    fn default() -> Self {
        Self {
            classes: HashMap::new(),
            target_namespace: DEFAULT_TARGET_NAMESPACE.to_string(),
        }
    }
}

impl Mappings {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a mappings file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).fs_context("reading mappings", path)?;
        Self::parse(&text)
    }

    /// Parses tab separated mappings.
    ///
    /// Accepts a `tiny` v2 header (`tiny 2 0 <from> <to>`) or a v1 header
    /// (`v1 <from> <to>`) on the first line. Class records are `c <from> <to>`
    /// (or `CLASS <from> <to>`); member records, indented lines and `#`
    /// comments are ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let mut mappings = Self::new();

        for (index, line) in text.lines().enumerate() {
            if line.is_empty() || line.starts_with('#') || line.starts_with('\t') {
                continue;
            }
            let columns: Vec<&str> = line.split('\t').collect();

            if index == 0 {
                match columns.as_slice() {
                    ["tiny", _, _, _, to, ..] | ["v1", _, to, ..] => {
                        mappings.target_namespace = (*to).to_string();
                        continue;
                    }
                    _ => {}
                }
            }

            match columns.as_slice() {
                ["c" | "CLASS", from, to, ..] => {
                    if from.is_empty() || to.is_empty() {
                        crate::bail!("mappings line {}: empty class name", index + 1);
                    }
                    mappings.insert(*from, *to);
                }
                ["c" | "CLASS", ..] => {
                    crate::bail!("mappings line {}: class record needs two names", index + 1);
                }
                _ => {}
            }
        }

        Ok(mappings)
    }

    /// Adds a class mapping, both names in internal form.
    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.classes.insert(from.into(), to.into());
    }

    /// Sets the namespace written into remapped resources.
    pub fn with_target_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.target_namespace = namespace.into();
        self
    }

    /// Namespace written into remapped resources.
    pub fn target_namespace(&self) -> &str {
        &self.target_namespace
    }

    /// Number of class mappings.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the table has no class mappings.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Maps an internal class name.
    ///
    /// Nested classes (`Outer$Inner`) without an explicit mapping follow their
    /// outer class.
    pub fn map_class(&self, internal: &str) -> Option<String> {
        if let Some(mapped) = self.classes.get(internal) {
            return Some(mapped.clone());
        }
        let (outer, inner) = internal.rsplit_once('$')?;
        self.map_class(outer)
            .map(|mapped_outer| format!("{mapped_outer}${inner}"))
    }

    /// Maps an internal class name, returning it unchanged when unmapped.
    pub fn map_class_or_same(&self, internal: &str) -> String {
        self.map_class(internal)
            .unwrap_or_else(|| internal.to_string())
    }

    /// Maps a dotted class name (`com.example.Foo`).
    pub fn map_dotted(&self, dotted: &str) -> Option<String> {
        self.map_class(&dotted.replace('.', "/"))
            .map(|mapped| mapped.replace('/', "."))
    }

    /// Rewrites every `L<class>;` reference inside a field or method descriptor.
    pub fn map_descriptor(&self, descriptor: &str) -> String {
        let mut out = String::with_capacity(descriptor.len());
        let mut rest = descriptor;

        while let Some(start) = rest.find('L') {
            out.push_str(&rest[..=start]);
            rest = &rest[start + 1..];
            match rest.find(';') {
                Some(end) => {
                    out.push_str(&self.map_class_or_same(&rest[..end]));
                    out.push(';');
                    rest = &rest[end + 1..];
                }
                None => break,
            }
        }

        out.push_str(rest);
        out
    }

    /// Maps a dotted package name when the table moves it as a whole.
    ///
    /// A package is moved when at least one class directly inside it is mapped
    /// and all of its mapped classes land in the same, different package.
    pub fn map_package(&self, dotted_package: &str) -> Option<String> {
        let package = dotted_package.replace('.', "/");
        let mut target: Option<&str> = None;

        for (from, to) in &self.classes {
            let Some((from_package, _)) = from.rsplit_once('/') else {
                continue;
            };
            if from_package != package {
                continue;
            }
            let to_package = to.rsplit_once('/').map(|(p, _)| p).unwrap_or("");
            match target {
                None => target = Some(to_package),
                Some(existing) if existing == to_package => {}
                Some(_) => return None,
            }
        }

        target
            .filter(|to_package| *to_package != package)
            .map(|to_package| to_package.replace('/', "."))
    }
}
