//! # Schema Checker
//!
//! Structural assertions a representation type must satisfy before the
//! reflection-based engine may run on it, and the field-policy checks that run
//! after every access.
//!
//! A representation type is reflected through its serde form. The engine
//! expects:
//!
//! - the type serializes to a struct (a JSON object keyed by field name);
//! - `Name`, when present, is a string (it is seeded from the resource ID);
//! - `NullFields` / `ForceSendFields`, when present, are sequences of names;
//! - `T::default()` survives a serialize/deserialize round trip.

use crate::error::ResourceError;
use crate::field_traits::{FieldTraits, FieldType};
use crate::path::Path;
use crate::value::{self, is_default, is_meta_field, meta_names, FORCE_SEND_FIELDS, NAME_FIELD, NULL_FIELDS};
use crate::version::Version;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Checks the structural contract of one representation type.
pub fn check_schema<T>() -> Result<(), ResourceError>
where
    T: Serialize + DeserializeOwned + Default,
{
    let v = value::to_value(&T::default())?;
    let Value::Object(fields) = &v else {
        return Err(ResourceError::schema::<T>(format!(
            "serializes to a {}, not a struct",
            value::kind(&v)
        )));
    };

    if let Some(name) = fields.get(NAME_FIELD) {
        if !name.is_string() {
            return Err(ResourceError::schema::<T>(format!(
                ".{NAME_FIELD} is a {}, not a string",
                value::kind(name)
            )));
        }
    }
    for meta in [NULL_FIELDS, FORCE_SEND_FIELDS] {
        if let Some(list) = fields.get(meta) {
            if !list.is_array() {
                return Err(ResourceError::schema::<T>(format!(
                    ".{meta} is a {}, not a sequence",
                    value::kind(list)
                )));
            }
        }
    }

    let rebuilt: T = value::from_value(v.clone()).map_err(|e| ResourceError::schema::<T>(e.to_string()))?;
    if value::to_value(&rebuilt)? != v {
        return Err(ResourceError::schema::<T>(
            "default value does not survive a round trip",
        ));
    }
    Ok(())
}

/// Sets `Name` to `name` if the type declares it.
pub(crate) fn seed_name<T>(x: &mut T, name: &str) -> Result<(), ResourceError>
where
    T: Serialize + DeserializeOwned,
{
    let mut v = value::to_value(&*x)?;
    let Some(slot) = v.as_object_mut().and_then(|o| o.get_mut(NAME_FIELD)) else {
        return Ok(());
    };
    if !slot.is_string() {
        return Err(ResourceError::schema::<T>(format!(
            "cannot assign resource name to .{NAME_FIELD} of kind {}",
            value::kind(slot)
        )));
    }
    *slot = Value::String(name.to_string());
    *x = value::from_value(v)?;
    Ok(())
}

/// Enforces the field policy of `traits` on a value just mutated through an
/// access operation.
///
/// At every struct level:
/// - names in `NullFields` / `ForceSendFields` must be fields of that struct;
/// - `OutputOnly` fields must hold their zero value;
/// - `NonZeroValue` fields must not be sent explicitly as zero;
/// - a field listed in `NullFields` must not hold a value.
pub fn check_post_access<T: Serialize>(
    traits: &FieldTraits,
    version: Version,
    x: &T,
) -> Result<(), ResourceError> {
    let v = value::to_value(x)?;
    check_value(traits, version, &v, &Path::root())
}

fn check_value(traits: &FieldTraits, version: Version, v: &Value, path: &Path) -> Result<(), ResourceError> {
    match v {
        Value::Object(fields) => check_struct(traits, version, fields, path),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .try_for_each(|(i, item)| check_value(traits, version, item, &path.index(i))),
        _ => Ok(()),
    }
}

fn check_struct(
    traits: &FieldTraits,
    version: Version,
    fields: &Map<String, Value>,
    path: &Path,
) -> Result<(), ResourceError> {
    let violation = |p: Path, reason: String| ResourceError::FieldPolicy {
        version,
        path: p,
        reason,
    };

    let nulls: BTreeSet<String> = meta_names(fields, NULL_FIELDS).into_iter().collect();
    let forced: BTreeSet<String> = meta_names(fields, FORCE_SEND_FIELDS).into_iter().collect();

    for (meta, names) in [(NULL_FIELDS, &nulls), (FORCE_SEND_FIELDS, &forced)] {
        if let Some(unknown) = names.iter().find(|n| !fields.contains_key(*n) || is_meta_field(n)) {
            return Err(violation(
                path.field(meta),
                format!("names unknown field {unknown:?}"),
            ));
        }
    }

    for (name, v) in fields {
        if is_meta_field(name) {
            continue;
        }
        let p = path.field(name);
        let explicit = nulls.contains(name) || forced.contains(name);
        match traits.field_type(&p) {
            FieldType::System => continue,
            FieldType::OutputOnly if !is_default(v) => {
                return Err(violation(p, "output-only field is set".to_string()));
            }
            FieldType::NonZeroValue if is_default(v) && explicit => {
                return Err(violation(p, "zero value cannot be sent explicitly".to_string()));
            }
            _ => {}
        }
        if nulls.contains(name) && !is_default(v) {
            return Err(violation(p, format!("field is set but listed in {NULL_FIELDS}")));
        }
        check_value(traits, version, v, &p)?;
    }
    Ok(())
}

/// Records every unset field of `x` in its absence bookkeeping.
///
/// At every struct level that carries both `NullFields` and
/// `ForceSendFields`, a null field is listed in `NullFields` and a non-null
/// zero field in `ForceSendFields`. `System`, `OutputOnly` and
/// `NonZeroValue` fields are left out. Both lists end up sorted.
pub fn fill_absence_metadata<T>(traits: &FieldTraits, x: &mut T) -> Result<(), ResourceError>
where
    T: Serialize + DeserializeOwned,
{
    let mut v = value::to_value(&*x)?;
    fill_value(traits, &mut v, &Path::root());
    *x = value::from_value(v)?;
    Ok(())
}

fn fill_value(traits: &FieldTraits, v: &mut Value, path: &Path) {
    match v {
        Value::Object(fields) => fill_struct(traits, fields, path),
        Value::Array(items) => {
            for (i, item) in items.iter_mut().enumerate() {
                fill_value(traits, item, &path.index(i));
            }
        }
        _ => {}
    }
}

fn fill_struct(traits: &FieldTraits, fields: &mut Map<String, Value>, path: &Path) {
    let tracked = fields.get(NULL_FIELDS).is_some_and(Value::is_array)
        && fields.get(FORCE_SEND_FIELDS).is_some_and(Value::is_array);

    let mut nulls: BTreeSet<String> = meta_names(fields, NULL_FIELDS).into_iter().collect();
    let mut forced: BTreeSet<String> = meta_names(fields, FORCE_SEND_FIELDS).into_iter().collect();

    for (name, v) in fields.iter_mut() {
        if is_meta_field(name) {
            continue;
        }
        let p = path.field(name);
        let field_type = traits.field_type(&p);
        if field_type == FieldType::System {
            continue;
        }
        if tracked && !matches!(field_type, FieldType::OutputOnly | FieldType::NonZeroValue) {
            if v.is_null() {
                forced.remove(name);
                nulls.insert(name.clone());
            } else if is_default(v) && !v.is_object() {
                nulls.remove(name);
                forced.insert(name.clone());
            }
        }
        fill_value(traits, v, &p);
    }

    if tracked {
        let list = |names: BTreeSet<String>| Value::Array(names.into_iter().map(Value::String).collect());
        fields.insert(NULL_FIELDS.to_string(), list(nulls));
        fields.insert(FORCE_SEND_FIELDS.to_string(), list(forced));
    }
}

/// Unset fields of `x` that its absence bookkeeping does not mention. Empty
/// after [`fill_absence_metadata`].
pub fn unrecorded_absences<T: Serialize>(traits: &FieldTraits, x: &T) -> Result<Vec<Path>, ResourceError> {
    let v = value::to_value(x)?;
    let mut out = Vec::new();
    collect_unrecorded(traits, &v, &Path::root(), &mut out);
    Ok(out)
}

fn collect_unrecorded(traits: &FieldTraits, v: &Value, path: &Path, out: &mut Vec<Path>) {
    match v {
        Value::Object(fields) => {
            let tracked = fields.contains_key(NULL_FIELDS) && fields.contains_key(FORCE_SEND_FIELDS);
            let nulls = meta_names(fields, NULL_FIELDS);
            let forced = meta_names(fields, FORCE_SEND_FIELDS);
            for (name, fv) in fields {
                if is_meta_field(name) {
                    continue;
                }
                let p = path.field(name);
                let field_type = traits.field_type(&p);
                let exempt = matches!(
                    field_type,
                    FieldType::System | FieldType::OutputOnly | FieldType::NonZeroValue
                );
                let recorded = nulls.contains(name) || forced.contains(name);
                if tracked && !exempt && is_default(fv) && !fv.is_object() && !recorded {
                    out.push(p.clone());
                }
                if field_type != FieldType::System {
                    collect_unrecorded(traits, fv, &p, out);
                }
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                collect_unrecorded(traits, item, &path.index(i), out);
            }
        }
        _ => {}
    }
}
