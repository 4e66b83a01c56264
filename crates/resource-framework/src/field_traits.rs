//! # Field Traits
//!
//! Per-version field policy declared by a concrete resource type. Traits are
//! attached to paths; a field inherits the trait of its longest declared
//! prefix and is [`FieldType::Ordinary`] otherwise.
//!
//! ```rust
//! use resource_framework::{FieldTraits, FieldType, Path};
//!
//! let mut traits = FieldTraits::new();
//! traits.output_only(Path::root().field("SelfLink"));
//!
//! assert_eq!(traits.field_type(&Path::root().field("SelfLink")), FieldType::OutputOnly);
//! assert_eq!(traits.field_type(&Path::root().field("Name")), FieldType::Ordinary);
//! ```

use crate::error::{short_type_name, ResourceError};
use crate::path::{Path, Segment};
use crate::value::{self, FORCE_SEND_FIELDS, NULL_FIELDS};
use serde::Serialize;
use serde_json::Value;

/// How the engine treats a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// A regular, user-settable field.
    Ordinary,
    /// Bookkeeping that is not part of the resource itself (e.g. `NullFields`).
    System,
    /// Set by the server. Must not be set by callers.
    OutputOnly,
    /// The zero value is meaningless and may never be sent explicitly.
    NonZeroValue,
    /// The zero value is meaningful and is sent explicitly when set.
    AllowZeroValue,
}

/// Field policy for one version of a resource.
#[derive(Debug, Clone)]
pub struct FieldTraits {
    fields: Vec<(Path, FieldType)>,
}

impl Default for FieldTraits {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldTraits {
    /// Traits with the top-level bookkeeping fields marked as `System`.
    pub fn new() -> Self {
        let mut traits = Self { fields: Vec::new() };
        traits.system(Path::root().field(NULL_FIELDS));
        traits.system(Path::root().field(FORCE_SEND_FIELDS));
        traits
    }

    fn add(&mut self, path: Path, field_type: FieldType) -> &mut Self {
        let path = path.without_indices();
        self.fields.retain(|(p, _)| *p != path);
        self.fields.push((path, field_type));
        self
    }

    pub fn system(&mut self, path: Path) -> &mut Self {
        self.add(path, FieldType::System)
    }

    pub fn output_only(&mut self, path: Path) -> &mut Self {
        self.add(path, FieldType::OutputOnly)
    }

    pub fn non_zero_value(&mut self, path: Path) -> &mut Self {
        self.add(path, FieldType::NonZeroValue)
    }

    pub fn allow_zero_value(&mut self, path: Path) -> &mut Self {
        self.add(path, FieldType::AllowZeroValue)
    }

    /// The trait of the longest declared prefix of `path`.
    pub fn field_type(&self, path: &Path) -> FieldType {
        let path = path.without_indices();
        self.fields
            .iter()
            .filter(|(p, _)| path.has_prefix(p))
            .max_by_key(|(p, _)| p.len())
            .map(|(_, t)| *t)
            .unwrap_or(FieldType::Ordinary)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, FieldType)> {
        self.fields.iter().map(|(p, t)| (p, *t))
    }

    /// Checks that every declared path names a field of `T`.
    ///
    /// Paths are resolved against `T::default()`. A path that runs through an
    /// unset optional struct cannot be resolved further and is accepted; a path
    /// whose parent struct exists but lacks the field is rejected.
    pub fn check_schema<T: Serialize + Default>(&self) -> Result<(), ResourceError> {
        let root = value::to_value(&T::default())?;
        for (path, _) in &self.fields {
            if let Some(reason) = unresolved(&root, path) {
                return Err(ResourceError::Schema {
                    type_name: short_type_name::<T>(),
                    reason: format!("field trait {path}: {reason}"),
                });
            }
        }
        Ok(())
    }
}

fn unresolved(root: &Value, path: &Path) -> Option<String> {
    let mut cur = root;
    for segment in path.segments() {
        match (cur, segment) {
            (Value::Null, _) => return None,
            // Sequences are empty by default; their elements cannot be inspected.
            (Value::Array(_), _) => return None,
            (Value::Object(o), Segment::Field(name) | Segment::Key(name)) => match o.get(name) {
                Some(next) => cur = next,
                None => return Some(format!("no field {name:?}")),
            },
            (other, _) => return Some(format!("{} has no fields", value::kind(other))),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Default, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase", default)]
    struct Inner {
        port: u32,
    }

    #[derive(Default, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase", default)]
    struct Outer {
        name: String,
        inner: Inner,
        maybe: Option<Inner>,
        items: Vec<Inner>,
        null_fields: Vec<String>,
        force_send_fields: Vec<String>,
    }

    #[test]
    fn test_longest_prefix_wins() {
        let mut traits = FieldTraits::new();
        traits
            .output_only(Path::root().field("Inner"))
            .allow_zero_value(Path::root().field("Inner").field("Port"));

        let inner = Path::root().field("Inner");
        assert_eq!(traits.field_type(&inner), FieldType::OutputOnly);
        assert_eq!(traits.field_type(&inner.field("Port")), FieldType::AllowZeroValue);
        assert_eq!(traits.field_type(&inner.field("Other")), FieldType::OutputOnly);
        assert_eq!(traits.field_type(&Path::root().field("NullFields")), FieldType::System);
    }

    #[test]
    fn test_indices_are_ignored() {
        let mut traits = FieldTraits::new();
        traits.non_zero_value(Path::root().field("Items").field("Port"));
        let p = Path::root().field("Items").index(3).field("Port");
        assert_eq!(traits.field_type(&p), FieldType::NonZeroValue);
    }

    #[test]
    fn test_redeclaring_replaces() {
        let mut traits = FieldTraits::new();
        traits.output_only(Path::root().field("Name"));
        traits.allow_zero_value(Path::root().field("Name"));
        assert_eq!(traits.field_type(&Path::root().field("Name")), FieldType::AllowZeroValue);
        assert_eq!(traits.iter().count(), 3);
    }

    #[test]
    fn test_check_schema() {
        let mut traits = FieldTraits::new();
        traits
            .output_only(Path::root().field("Inner").field("Port"))
            .output_only(Path::root().field("Maybe").field("Port"))
            .output_only(Path::root().field("Items").field("Port"));
        assert!(traits.check_schema::<Outer>().is_ok());

        traits.output_only(Path::root().field("Missing"));
        let err = traits.check_schema::<Outer>().unwrap_err();
        assert!(err.to_string().contains("Missing"), "{err}");

        let mut traits = FieldTraits::new();
        traits.output_only(Path::root().field("Name").field("Sub"));
        assert!(traits.check_schema::<Outer>().is_err());
    }
}
