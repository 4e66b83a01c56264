//! Helpers over `serde_json::Value`, the dynamic form every representation is
//! reflected through.

use crate::error::{short_type_name, CopyError};
use crate::path::{Path, Segment};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Serialized name of the identity field.
pub const NAME_FIELD: &str = "Name";
/// Serialized name of the list of fields explicitly sent as null.
pub const NULL_FIELDS: &str = "NullFields";
/// Serialized name of the list of fields explicitly sent with a zero value.
pub const FORCE_SEND_FIELDS: &str = "ForceSendFields";

pub(crate) const META_FIELDS: [&str; 2] = [NULL_FIELDS, FORCE_SEND_FIELDS];

pub(crate) fn is_meta_field(name: &str) -> bool {
    META_FIELDS.contains(&name)
}

pub(crate) fn to_value<T: Serialize>(x: &T) -> Result<Value, CopyError> {
    serde_json::to_value(x).map_err(|source| CopyError::Serialize {
        type_name: short_type_name::<T>(),
        source,
    })
}

pub(crate) fn from_value<T: DeserializeOwned>(v: Value) -> Result<T, CopyError> {
    serde_json::from_value(v).map_err(|source| CopyError::Deserialize {
        type_name: short_type_name::<T>(),
        source,
    })
}

/// A value that carries no information: null, false, 0, "", empty sequences
/// and objects whose fields are all default.
pub(crate) fn is_default(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.values().all(is_default),
    }
}

/// The zero value with the same shape as `v`.
pub(crate) fn zero_like(v: &Value) -> Value {
    match v {
        Value::Null => Value::Null,
        Value::Bool(_) => Value::Bool(false),
        Value::Number(n) if n.is_f64() => Value::from(0.0),
        Value::Number(_) => Value::from(0),
        Value::String(_) => Value::String(String::new()),
        Value::Array(_) => Value::Array(Vec::new()),
        Value::Object(o) => Value::Object(o.iter().map(|(k, v)| (k.clone(), zero_like(v))).collect()),
    }
}

/// Whether a scalar from the source can be stored where `dest` is stored.
pub(crate) fn compatible_scalar(dest: &Value, src: &Value) -> bool {
    match (dest, src) {
        (Value::Bool(_), Value::Bool(_)) | (Value::String(_), Value::String(_)) => true,
        // A float destination takes any number; an integer one rejects floats.
        (Value::Number(d), Value::Number(s)) => d.is_f64() || !s.is_f64(),
        _ => false,
    }
}

pub(crate) fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "struct",
    }
}

/// Follows `path` inside `v`. Field and key segments both index objects.
pub(crate) fn lookup<'v>(v: &'v Value, path: &Path) -> Option<&'v Value> {
    path.segments().iter().try_fold(v, |cur, segment| match segment {
        Segment::Field(name) | Segment::Key(name) => cur.as_object()?.get(name),
        Segment::Index(i) => cur.as_array()?.get(*i),
    })
}

pub(crate) fn lookup_mut<'v>(v: &'v mut Value, path: &Path) -> Option<&'v mut Value> {
    path.segments().iter().try_fold(v, |cur, segment| match segment {
        Segment::Field(name) | Segment::Key(name) => cur.as_object_mut()?.get_mut(name),
        Segment::Index(i) => cur.as_array_mut()?.get_mut(*i),
    })
}

/// Names listed in the bookkeeping field `meta` of a struct object.
pub(crate) fn meta_names(obj: &serde_json::Map<String, Value>, meta: &str) -> Vec<String> {
    match obj.get(meta) {
        Some(Value::Array(names)) => names
            .iter()
            .filter_map(|n| n.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}
