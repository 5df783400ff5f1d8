//! Per-resource remappers for the non-class entries of a mod archive.
//!
//! Each remapper claims entries by name and rewrites class references inside
//! them according to a [`Mappings`] table. Entries no remapper claims are
//! copied through untouched.

use super::mappings::Mappings;
use crate::deployer::{Error, Result};
use serde_json::Value;

/// A resource after remapping. The entry may be renamed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemappedResource {
    /// Entry name in the output archive
    pub name: String,
    /// Entry contents
    pub data: Vec<u8>,
}

/// Rewrites one kind of non-class archive entry.
pub trait ResourceRemapper: Send + Sync {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Whether this remapper handles the entry.
    fn applies_to(&self, entry: &str) -> bool;

    /// Produces the remapped entry.
    fn remap(&self, entry: &str, data: &[u8], mappings: &Mappings) -> Result<RemappedResource>;
}

/// The remappers registered by default, in lookup order.
pub fn default_resource_remappers() -> Vec<Box<dyn ResourceRemapper>> {
    vec![
        Box::new(AccessWidenerRemapper),
        Box::new(ServiceFileRemapper),
        Box::new(AnnotationConfigRemapper),
    ]
}

fn utf8<'a>(entry: &str, data: &'a [u8]) -> Result<&'a str> {
    std::str::from_utf8(data)
        .map_err(|e| Error::GenericError(format!("{entry} is not valid UTF-8: {e}")))
}

/// Access widener files (`accessWidener v1 <namespace>` followed by
/// `<access> <kind> <class> [<name> <descriptor>]` lines).
pub struct AccessWidenerRemapper;

impl ResourceRemapper for AccessWidenerRemapper {
    fn name(&self) -> &'static str {
        "access-widener"
    }

    fn applies_to(&self, entry: &str) -> bool {
        entry.ends_with(".accesswidener") || entry.ends_with(".aw")
    }

    fn remap(&self, entry: &str, data: &[u8], mappings: &Mappings) -> Result<RemappedResource> {
        let text = utf8(entry, data)?;
        let mut out = String::with_capacity(text.len());
        let mut seen_header = false;

        for line in text.lines() {
            let (body, comment) = match line.find('#') {
                Some(pos) => (&line[..pos], Some(&line[pos..])),
                None => (line, None),
            };
            let tokens: Vec<&str> = body.split_whitespace().collect();

            let rewritten = if tokens.is_empty() {
                None
            } else if !seen_header {
                seen_header = true;
                match tokens.as_slice() {
                    ["accessWidener", version, _namespace] => Some(format!(
                        "accessWidener\t{version}\t{}",
                        mappings.target_namespace()
                    )),
                    _ => crate::bail!("{entry}: missing accessWidener header"),
                }
            } else {
                match tokens.as_slice() {
                    [access, "class", class] => {
                        Some(format!("{access}\tclass\t{}", mappings.map_class_or_same(class)))
                    }
                    [access, kind @ ("method" | "field"), class, name, descriptor] => {
                        Some(format!(
                            "{access}\t{kind}\t{}\t{name}\t{}",
                            mappings.map_class_or_same(class),
                            mappings.map_descriptor(descriptor)
                        ))
                    }
                    _ => crate::bail!("{entry}: malformed access widener line '{}'", line.trim()),
                }
            };

            match (rewritten, comment) {
                (Some(body), Some(comment)) => {
                    out.push_str(&body);
                    out.push(' ');
                    out.push_str(comment);
                }
                (Some(body), None) => out.push_str(&body),
                (None, _) => out.push_str(line),
            }
            out.push('\n');
        }

        Ok(RemappedResource {
            name: entry.to_string(),
            data: out.into_bytes(),
        })
    }
}

/// `META-INF/services/<interface>` provider configuration files.
pub struct ServiceFileRemapper;

const SERVICES_PREFIX: &str = "META-INF/services/";

impl ResourceRemapper for ServiceFileRemapper {
    fn name(&self) -> &'static str {
        "service-file"
    }

    fn applies_to(&self, entry: &str) -> bool {
        entry
            .strip_prefix(SERVICES_PREFIX)
            .is_some_and(|service| !service.is_empty() && !service.contains('/'))
    }

    fn remap(&self, entry: &str, data: &[u8], mappings: &Mappings) -> Result<RemappedResource> {
        let text = utf8(entry, data)?;
        let service = entry.strip_prefix(SERVICES_PREFIX).unwrap_or(entry);
        let name = match mappings.map_dotted(service) {
            Some(mapped) => format!("{SERVICES_PREFIX}{mapped}"),
            None => entry.to_string(),
        };

        let mut out = String::with_capacity(text.len());
        for line in text.lines() {
            let (body, comment) = match line.find('#') {
                Some(pos) => (&line[..pos], &line[pos..]),
                None => (line, ""),
            };
            let provider = body.trim();
            match mappings.map_dotted(provider).filter(|_| !provider.is_empty()) {
                Some(mapped) if comment.is_empty() => out.push_str(&mapped),
                Some(mapped) => {
                    out.push_str(&mapped);
                    out.push(' ');
                    out.push_str(comment);
                }
                None => out.push_str(line),
            }
            out.push('\n');
        }

        Ok(RemappedResource {
            name,
            data: out.into_bytes(),
        })
    }
}

/// Mixin configurations and their reference maps.
///
/// String values (and object keys) naming a mapped class in dotted or internal
/// form are replaced; a top level `package` is moved when the mappings move the
/// whole package.
pub struct AnnotationConfigRemapper;

impl AnnotationConfigRemapper {
    fn remap_string(value: &str, mappings: &Mappings) -> Option<String> {
        if value.contains('/') {
            mappings.map_class(value)
        } else if value.contains('.') {
            mappings.map_dotted(value)
        } else {
            None
        }
    }

    fn remap_value(value: Value, mappings: &Mappings) -> Value {
        match value {
            Value::String(s) => match Self::remap_string(&s, mappings) {
                Some(mapped) => Value::String(mapped),
                None => Value::String(s),
            },
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| Self::remap_value(item, mappings))
                    .collect(),
            ),
            Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, item)| {
                        let key = Self::remap_string(&key, mappings).unwrap_or(key);
                        (key, Self::remap_value(item, mappings))
                    })
                    .collect(),
            ),
            other => other,
        }
    }
}

impl ResourceRemapper for AnnotationConfigRemapper {
    fn name(&self) -> &'static str {
        "annotation-config"
    }

    fn applies_to(&self, entry: &str) -> bool {
        let file_name = entry.rsplit('/').next().unwrap_or(entry);
        file_name.ends_with(".mixins.json") || file_name.ends_with("refmap.json")
    }

    fn remap(&self, entry: &str, data: &[u8], mappings: &Mappings) -> Result<RemappedResource> {
        let mut root: Value = serde_json::from_slice(data)
            .map_err(|e| Error::GenericError(format!("{entry} is not valid JSON: {e}")))?;

        let moved_package = root
            .get("package")
            .and_then(Value::as_str)
            .and_then(|package| mappings.map_package(package));

        root = Self::remap_value(root, mappings);
        if let (Some(package), Some(object)) = (moved_package, root.as_object_mut()) {
            object.insert("package".to_string(), Value::String(package));
        }

        let data = serde_json::to_vec_pretty(&root)
            .map_err(|e| Error::GenericError(format!("{entry}: {e}")))?;
        Ok(RemappedResource {
            name: entry.to_string(),
            data,
        })
    }
}
