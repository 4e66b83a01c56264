//! # Structural Copier
//!
//! Copies field values between two differently-shaped structs by name. The
//! copier reflects through serde: both sides are serialized to
//! `serde_json::Value`, the source is merged into the destination, and the
//! result is deserialized back into the destination type.
//!
//! A source field the destination cannot hold is not an error. It is recorded
//! as a [`DroppedField`] when its value is non-default; default values carry
//! no information and are dropped silently.
//!
//! ## Matching rules
//!
//! - Struct fields match by serialized name. Destination-only fields are left
//!   alone.
//! - Maps are replaced: the destination ends up with exactly the source keys.
//! - Sequences are copied element by element.
//! - One level of indirection is followed: `null` in the source clears the
//!   destination, or resets it to zero when the destination type has no null;
//!   a `null` destination takes whatever the source holds.
//! - Scalars of a different kind (string vs number, float into an integer
//!   field) are dropped and the destination is reset to zero.
//! - Values the destination type rejects (an integer out of range, a string
//!   under an empty `Option<u32>`) are found by undoing the merged writes and
//!   re-applying them in halves. Each rejected write is dropped.
//! - Fields the destination type silently ignores on deserialization are
//!   detected by serializing the rebuilt destination again.
//! - `NullFields` / `ForceSendFields` are copied with names the destination
//!   does not have filtered out. They are never reported as dropped.
//!
//! ```rust
//! use resource_framework::{Copier, CopierConfig, Path};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, Default)]
//! #[serde(rename_all = "PascalCase", default)]
//! struct Wide { name: String, extra: u32 }
//!
//! #[derive(Serialize, Deserialize, Default)]
//! #[serde(rename_all = "PascalCase", default)]
//! struct Narrow { name: String }
//!
//! let config = CopierConfig::new();
//! let mut copier = Copier::new(&config);
//! let mut dest = Narrow::default();
//! copier.copy(&mut dest, &Wide { name: "a".into(), extra: 7 }).unwrap();
//!
//! assert_eq!(dest.name, "a");
//! assert_eq!(copier.dropped()[0].path, Path::root().field("Extra"));
//! ```

use crate::error::{short_type_name, CopyError};
use crate::path::{Path, Segment};
use crate::value::{self, compatible_scalar, is_default, is_meta_field, zero_like, META_FIELDS};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use tracing::trace;

/// Options overriding the default name matching for specific fields.
#[derive(Debug, Clone, Default)]
pub struct CopierConfig {
    excluded_fields: BTreeSet<String>,
    excluded_paths: BTreeSet<Path>,
}

impl CopierConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Never copy a field with this serialized name, at any depth.
    pub fn exclude_field(mut self, name: impl Into<String>) -> Self {
        self.excluded_fields.insert(name.into());
        self
    }

    /// Never copy the field at `path`. Sequence indices are ignored when
    /// matching, so `.Rules.Port` excludes the port of every rule.
    pub fn exclude_path(mut self, path: Path) -> Self {
        self.excluded_paths.insert(path.without_indices());
        self
    }

    pub fn is_excluded(&self, name: &str, path: &Path) -> bool {
        self.excluded_fields.contains(name) || self.excluded_paths.contains(&path.without_indices())
    }
}

/// A non-default source value that has no place in the destination.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedField {
    pub path: Path,
    pub value: Value,
}

/// A slot of the candidate that received a source value.
struct Write {
    path: Path,
    undo: Undo,
}

/// How to take a [`Write`] back.
enum Undo {
    /// Put this value back.
    Restore(Value),
    /// The destination had no such key.
    Remove,
    /// A sequence whose element shape is unknown; retried element by element.
    Elements,
    /// A map whose value shape is unknown; retried entry by entry.
    Entries,
}

/// Copies one struct into another, remembering what did not fit.
///
/// The dropped list is reset by every call to [`Copier::copy`], so it always
/// describes the most recent copy only.
pub struct Copier<'a> {
    config: &'a CopierConfig,
    dropped: Vec<DroppedField>,
    maps: BTreeSet<Path>,
    writes: Vec<Write>,
}

impl<'a> Copier<'a> {
    pub fn new(config: &'a CopierConfig) -> Self {
        Self {
            config,
            dropped: Vec::new(),
            maps: BTreeSet::new(),
            writes: Vec::new(),
        }
    }

    /// Copies every compatible field of `src` into `dest`.
    ///
    /// On error `dest` is left unchanged.
    pub fn copy<D, S>(&mut self, dest: &mut D, src: &S) -> Result<(), CopyError>
    where
        D: Serialize + DeserializeOwned,
        S: Serialize,
    {
        self.dropped.clear();
        self.maps.clear();
        self.writes.clear();

        let src_value = value::to_value(src)?;
        let mut candidate = value::to_value(&*dest)?;
        let (Value::Object(d), Value::Object(s)) = (&mut candidate, &src_value) else {
            let type_name = if src_value.is_object() {
                short_type_name::<D>()
            } else {
                short_type_name::<S>()
            };
            return Err(CopyError::NotAStruct { type_name });
        };

        self.maps = find_maps(d, &round_trip::<D>);
        self.merge_struct(d, s, &Path::root());

        let rebuilt: D = match value::from_value(candidate.clone()) {
            Ok(rebuilt) => rebuilt,
            Err(err) => {
                trace!(dest = short_type_name::<D>(), error = %err, "Settling rejected values");
                self.settle(&mut candidate, &round_trip::<D>);
                value::from_value(candidate.clone())?
            }
        };
        let settled = value::to_value(&rebuilt)?;
        self.collect_discarded(&candidate, &settled, &Path::root());
        *dest = rebuilt;

        trace!(
            dest = short_type_name::<D>(),
            src = short_type_name::<S>(),
            dropped = self.dropped.len(),
            "Copied"
        );
        Ok(())
    }

    pub fn dropped(&self) -> &[DroppedField] {
        &self.dropped
    }

    pub fn into_dropped(self) -> Vec<DroppedField> {
        self.dropped
    }

    fn is_map(&self, path: &Path) -> bool {
        !path.is_root() && self.maps.contains(&path.without_indices())
    }

    fn drop_value(&mut self, path: &Path, v: &Value) {
        if !is_default(v) {
            self.dropped.push(DroppedField {
                path: path.clone(),
                value: v.clone(),
            });
        }
    }

    fn merge_struct(&mut self, d: &mut Map<String, Value>, s: &Map<String, Value>, path: &Path) {
        let known: BTreeSet<String> = d.keys().cloned().collect();

        for (name, sv) in s {
            let p = path.field(name);
            if is_meta_field(name) || self.config.is_excluded(name, &p) {
                continue;
            }
            match d.get_mut(name) {
                Some(dv) => self.merge_value(dv, sv, &p),
                // Offer it to the destination type; the round trip decides.
                None => {
                    d.insert(name.clone(), self.prune(sv, &p));
                    self.writes.push(Write { path: p, undo: Undo::Remove });
                }
            }
        }

        for meta in META_FIELDS {
            if !d.contains_key(meta) {
                continue;
            }
            if let Some(Value::Array(names)) = s.get(meta) {
                let kept = names
                    .iter()
                    .filter(|n| n.as_str().is_some_and(|n| known.contains(n) && !is_meta_field(n)))
                    .cloned()
                    .collect();
                d.insert(meta.to_string(), Value::Array(kept));
            }
        }
    }

    fn merge_map(&mut self, d: &mut Map<String, Value>, s: &Map<String, Value>, path: &Path) {
        self.maps.insert(path.without_indices());
        let Some(template) = d.values().next().map(zero_like) else {
            *d = s.iter().map(|(k, sv)| (k.clone(), self.prune(sv, &path.key(k)))).collect();
            self.writes.push(Write { path: path.clone(), undo: Undo::Entries });
            return;
        };
        let mut out = Map::new();
        for (k, sv) in s {
            let mut dv = template.clone();
            self.merge_value(&mut dv, sv, &path.key(k));
            out.insert(k.clone(), dv);
        }
        *d = out;
    }

    fn merge_value(&mut self, dv: &mut Value, sv: &Value, path: &Path) {
        if sv.is_null() && dv.is_null() {
            return;
        }
        if dv.is_null() {
            *dv = self.prune(sv, path);
            self.writes.push(Write { path: path.clone(), undo: Undo::Restore(Value::Null) });
            return;
        }
        if sv.is_null() {
            let zero = zero_like(dv);
            *dv = Value::Null;
            self.writes.push(Write { path: path.clone(), undo: Undo::Restore(zero) });
            return;
        }

        match (&mut *dv, sv) {
            (Value::Object(d), Value::Object(s)) => {
                if d.is_empty() || self.is_map(path) {
                    self.merge_map(d, s, path);
                } else {
                    self.merge_struct(d, s, path);
                }
                return;
            }
            (Value::Array(d), Value::Array(s)) => {
                let Some(template) = d.first().map(zero_like) else {
                    *d = s.iter().enumerate().map(|(i, se)| self.prune(se, &path.index(i))).collect();
                    self.writes.push(Write { path: path.clone(), undo: Undo::Elements });
                    return;
                };
                let mut out = Vec::with_capacity(s.len());
                for (i, se) in s.iter().enumerate() {
                    let mut de = template.clone();
                    self.merge_value(&mut de, se, &path.index(i));
                    out.push(de);
                }
                *d = out;
                return;
            }
            _ => {}
        }

        if compatible_scalar(dv, sv) {
            let zero = zero_like(dv);
            *dv = sv.clone();
            self.writes.push(Write { path: path.clone(), undo: Undo::Restore(zero) });
        } else {
            trace!(%path, dest = value::kind(dv), src = value::kind(sv), "Kind mismatch");
            self.drop_value(path, sv);
            *dv = zero_like(dv);
        }
    }

    /// Clone of `v` without the fields the config excludes.
    fn prune(&self, v: &Value, path: &Path) -> Value {
        match v {
            Value::Object(o) => Value::Object(
                o.iter()
                    .filter(|(k, _)| !self.config.is_excluded(k, &path.field(*k)))
                    .map(|(k, v)| (k.clone(), self.prune(v, &path.field(k))))
                    .collect(),
            ),
            Value::Array(a) => Value::Array(
                a.iter()
                    .enumerate()
                    .map(|(i, v)| self.prune(v, &path.index(i)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    /// Makes a candidate the destination type rejected acceptable. Every write
    /// is undone, then the writes are re-applied in halves; a single write the
    /// type still rejects is dropped. If even the undone candidate is rejected,
    /// the candidate is left as it was.
    fn settle(&mut self, candidate: &mut Value, round_trip: &dyn Fn(&Value) -> Option<Value>) {
        let writes = std::mem::take(&mut self.writes);
        let merged = candidate.clone();
        for w in writes.iter().rev() {
            undo(candidate, w);
        }
        if round_trip(candidate).is_none() {
            *candidate = merged;
            return;
        }
        self.reapply(candidate, &merged, &writes, round_trip);
    }

    fn reapply(
        &mut self,
        working: &mut Value,
        merged: &Value,
        writes: &[Write],
        round_trip: &dyn Fn(&Value) -> Option<Value>,
    ) {
        if writes.is_empty() {
            return;
        }
        let mut trial = working.clone();
        for w in writes {
            if let Some(v) = value::lookup(merged, &w.path) {
                place(&mut trial, &w.path, v.clone());
            }
        }
        if round_trip(&trial).is_some() {
            *working = trial;
            return;
        }
        match writes {
            [w] => self.reapply_rejected(working, merged, w, round_trip),
            _ => {
                let (left, right) = writes.split_at(writes.len() / 2);
                self.reapply(working, merged, left, round_trip);
                self.reapply(working, merged, right, round_trip);
            }
        }
    }

    /// Drops a write the destination type rejects. Sequences and maps of
    /// unknown shape keep the items that fit.
    fn reapply_rejected(
        &mut self,
        working: &mut Value,
        merged: &Value,
        w: &Write,
        round_trip: &dyn Fn(&Value) -> Option<Value>,
    ) {
        let Some(v) = value::lookup(merged, &w.path) else {
            return;
        };
        match (&w.undo, v) {
            (Undo::Elements, Value::Array(items)) => {
                for (i, item) in items.iter().enumerate() {
                    if let Some(Value::Array(a)) = value::lookup_mut(working, &w.path) {
                        a.push(item.clone());
                    }
                    if round_trip(working).is_none() {
                        if let Some(Value::Array(a)) = value::lookup_mut(working, &w.path) {
                            a.pop();
                        }
                        trace!(path = %w.path.index(i), "Rejected element");
                        self.drop_value(&w.path.index(i), item);
                    }
                }
            }
            (Undo::Entries, Value::Object(entries)) => {
                for (k, item) in entries {
                    if let Some(Value::Object(o)) = value::lookup_mut(working, &w.path) {
                        o.insert(k.clone(), item.clone());
                    }
                    if round_trip(working).is_none() {
                        if let Some(Value::Object(o)) = value::lookup_mut(working, &w.path) {
                            o.remove(k);
                        }
                        trace!(path = %w.path.key(k), "Rejected entry");
                        self.drop_value(&w.path.key(k), item);
                    }
                }
            }
            _ => {
                trace!(path = %w.path, "Rejected value");
                self.drop_value(&w.path, v);
            }
        }
    }

    /// Records every key of `candidate` that did not survive the round trip
    /// through the destination type.
    fn collect_discarded(&mut self, candidate: &Value, settled: &Value, path: &Path) {
        match (candidate, settled) {
            (Value::Object(c), Value::Object(s)) => {
                let is_map = self.is_map(path);
                for (k, cv) in c {
                    if is_meta_field(k) {
                        continue;
                    }
                    let p = if is_map { path.key(k) } else { path.field(k) };
                    match s.get(k) {
                        Some(sv) => self.collect_discarded(cv, sv, &p),
                        None => self.drop_value(&p, cv),
                    }
                }
            }
            (Value::Array(c), Value::Array(s)) => {
                for (i, (cv, sv)) in c.iter().zip(s).enumerate() {
                    self.collect_discarded(cv, sv, &path.index(i));
                }
            }
            _ => {}
        }
    }
}

fn round_trip<D: Serialize + DeserializeOwned>(v: &Value) -> Option<Value> {
    let rebuilt: D = serde_json::from_value(v.clone()).ok()?;
    serde_json::to_value(&rebuilt).ok()
}

/// Finds which non-empty objects inside a serialized destination are maps
/// rather than structs. Each candidate is emptied and pushed through the
/// destination type: a map comes back empty, a struct comes back with its
/// fields (or fails to deserialize).
fn find_maps(
    fields: &Map<String, Value>,
    round_trip: &dyn Fn(&Value) -> Option<Value>,
) -> BTreeSet<Path> {
    let mut stack: Vec<Path> = fields.keys().map(|k| Path::root().field(k)).collect();
    let root = Value::Object(fields.clone());
    let mut maps = BTreeSet::new();

    while let Some(path) = stack.pop() {
        let Some(node) = value::lookup(&root, &path) else {
            continue;
        };
        match node {
            Value::Object(o) if !o.is_empty() => {
                let mut emptied_root = root.clone();
                if let Some(slot) = value::lookup_mut(&mut emptied_root, &path) {
                    *slot = Value::Object(Map::new());
                }
                let emptied = round_trip(&emptied_root)
                    .and_then(|settled| value::lookup(&settled, &path).cloned())
                    .is_some_and(|v| v.as_object().is_some_and(Map::is_empty));
                if emptied {
                    maps.insert(path.without_indices());
                    stack.extend(o.keys().map(|k| path.key(k)));
                } else {
                    stack.extend(o.keys().map(|k| path.field(k)));
                }
            }
            Value::Array(a) => stack.extend((0..a.len()).map(|i| path.index(i))),
            _ => {}
        }
    }
    maps
}

fn undo(root: &mut Value, w: &Write) {
    match &w.undo {
        Undo::Restore(v) => place(root, &w.path, v.clone()),
        Undo::Remove => {
            if let Some((o, name)) = parent_object(root, &w.path) {
                o.remove(&name);
            }
        }
        Undo::Elements => place(root, &w.path, Value::Array(Vec::new())),
        Undo::Entries => place(root, &w.path, Value::Object(Map::new())),
    }
}

/// Sets the slot at `path`, inserting the last key if its parent is an object.
fn place(root: &mut Value, path: &Path, v: Value) {
    if let Some(slot) = value::lookup_mut(root, path) {
        *slot = v;
        return;
    }
    if let Some((o, name)) = parent_object(root, path) {
        o.insert(name, v);
    }
}

/// The object holding the last field or key of `path`, and that name.
fn parent_object<'v>(root: &'v mut Value, path: &Path) -> Option<(&'v mut Map<String, Value>, String)> {
    let (Segment::Field(name) | Segment::Key(name)) = path.last()? else {
        return None;
    };
    let o = value::lookup_mut(root, &path.parent()?)?.as_object_mut()?;
    Some((o, name.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase", default)]
    struct Rule {
        port: u32,
        protocol: String,
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase", default)]
    struct Source {
        name: String,
        size: u64,
        weight: f64,
        feature_flag: bool,
        labels: BTreeMap<String, String>,
        rules: Vec<Rule>,
        nested: Option<Box<Rule>>,
        mode: String,
        null_fields: Vec<String>,
        force_send_fields: Vec<String>,
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase", default)]
    struct NarrowRule {
        port: u32,
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase", default)]
    struct Dest {
        name: String,
        size: u64,
        weight: u32,
        labels: BTreeMap<String, String>,
        rules: Vec<NarrowRule>,
        nested: Option<Box<NarrowRule>>,
        mode: u32,
        dest_only: String,
        null_fields: Vec<String>,
        force_send_fields: Vec<String>,
    }

    fn copy<D, S>(config: &CopierConfig, dest: &mut D, src: &S) -> Vec<DroppedField>
    where
        D: Serialize + DeserializeOwned,
        S: Serialize,
    {
        let mut c = Copier::new(config);
        c.copy(dest, src).unwrap();
        c.into_dropped()
    }

    #[test]
    fn test_copy_matching_fields() {
        let src = Source {
            name: "foo".into(),
            size: 10,
            labels: BTreeMap::from([("env".into(), "prod".into())]),
            rules: vec![Rule { port: 80, protocol: String::new() }],
            ..Default::default()
        };
        let mut dest = Dest {
            dest_only: "kept".into(),
            ..Default::default()
        };
        let dropped = copy(&CopierConfig::new(), &mut dest, &src);

        assert_eq!(dropped, vec![]);
        assert_eq!(dest.name, "foo");
        assert_eq!(dest.size, 10);
        assert_eq!(dest.labels, src.labels);
        assert_eq!(dest.rules, vec![NarrowRule { port: 80 }]);
        assert_eq!(dest.dest_only, "kept");
    }

    #[test]
    fn test_missing_and_incompatible_fields_are_recorded() {
        let src = Source {
            feature_flag: true,
            weight: 0.5,
            mode: "fast".into(),
            rules: vec![Rule { port: 1, protocol: "TCP".into() }],
            nested: Some(Box::new(Rule { port: 2, protocol: "UDP".into() })),
            ..Default::default()
        };
        let mut dest = Dest {
            mode: 3,
            ..Default::default()
        };
        let dropped: BTreeMap<String, Value> = copy(&CopierConfig::new(), &mut dest, &src)
            .into_iter()
            .map(|d| (d.path.to_string(), d.value))
            .collect();

        assert_eq!(
            dropped,
            BTreeMap::from([
                (".FeatureFlag".to_string(), json!(true)),
                (".Mode".to_string(), json!("fast")),
                (".Nested.Protocol".to_string(), json!("UDP")),
                (".Rules[0].Protocol".to_string(), json!("TCP")),
                (".Weight".to_string(), json!(0.5)),
            ])
        );
        assert_eq!(dest.mode, 0, "incompatible field is reset");
        assert_eq!(dest.nested, Some(Box::new(NarrowRule { port: 2 })));
    }

    #[test]
    fn test_default_values_are_dropped_silently() {
        let src = Source {
            name: "x".into(),
            feature_flag: false,
            ..Default::default()
        };
        let mut dest = Dest::default();
        assert!(copy(&CopierConfig::new(), &mut dest, &src).is_empty());
    }

    #[test]
    fn test_maps_are_replaced() {
        let mut dest = Dest {
            labels: BTreeMap::from([("old".into(), "1".into())]),
            ..Default::default()
        };
        let src = Source {
            labels: BTreeMap::from([("new".into(), "2".into())]),
            ..Default::default()
        };
        copy(&CopierConfig::new(), &mut dest, &src);
        assert_eq!(dest.labels, BTreeMap::from([("new".into(), "2".into())]));
    }

    #[test]
    fn test_null_source_clears_destination() {
        let mut dest = Dest {
            nested: Some(Box::new(NarrowRule { port: 9 })),
            ..Default::default()
        };
        copy(&CopierConfig::new(), &mut dest, &Source::default());
        assert_eq!(dest.nested, None);
    }

    #[test]
    fn test_meta_fields_are_filtered() {
        let src = Source {
            null_fields: vec!["FeatureFlag".into(), "Nested".into()],
            force_send_fields: vec!["Size".into()],
            ..Default::default()
        };
        let mut dest = Dest::default();
        let dropped = copy(&CopierConfig::new(), &mut dest, &src);
        assert!(dropped.is_empty());
        assert_eq!(dest.null_fields, vec!["Nested".to_string()]);
        assert_eq!(dest.force_send_fields, vec!["Size".to_string()]);
    }

    #[test]
    fn test_excluded_fields() {
        let config = CopierConfig::new()
            .exclude_field("FeatureFlag")
            .exclude_path(Path::root().field("Rules").field("Protocol"));
        let src = Source {
            feature_flag: true,
            size: 4,
            rules: vec![Rule { port: 1, protocol: "TCP".into() }],
            ..Default::default()
        };
        let mut dest = Dest::default();
        let dropped = copy(&config, &mut dest, &src);
        assert!(dropped.is_empty());
        assert_eq!(dest.size, 4);
    }

    #[test]
    fn test_copy_resets_dropped_between_calls() {
        let config = CopierConfig::new();
        let mut c = Copier::new(&config);
        let mut dest = Dest::default();
        c.copy(&mut dest, &Source { feature_flag: true, ..Default::default() })
            .unwrap();
        assert_eq!(c.dropped().len(), 1);
        c.copy(&mut dest, &Source::default()).unwrap();
        assert!(c.dropped().is_empty());
    }

    #[test]
    fn test_copy_back_is_idempotent() {
        let config = CopierConfig::new();
        let original = Source {
            name: "foo".into(),
            size: 3,
            labels: BTreeMap::from([("a".into(), "b".into())]),
            rules: vec![Rule { port: 443, protocol: String::new() }],
            ..Default::default()
        };
        let mut dest = Dest::default();
        copy(&config, &mut dest, &original);

        let mut first = Source::default();
        let dropped_first = copy(&config, &mut first, &dest);
        let mut second = Source::default();
        let dropped_second = copy(&config, &mut second, &dest);

        assert_eq!(first, second);
        assert_eq!(dropped_first, dropped_second);
        assert!(dropped_first.is_empty(), "zero-valued fields must not accumulate");
    }

    #[test]
    fn test_not_a_struct() {
        let config = CopierConfig::new();
        let mut c = Copier::new(&config);
        let mut dest = Dest::default();
        let err = c.copy(&mut dest, &42u32).unwrap_err();
        assert!(matches!(err, CopyError::NotAStruct { type_name: "u32" }));
    }

    #[test]
    fn test_negative_into_unsigned_is_dropped() {
        #[derive(Serialize)]
        #[serde(rename_all = "PascalCase")]
        struct Signed {
            size: i64,
        }

        let config = CopierConfig::new();
        let mut dest = Dest { size: 9, ..Default::default() };
        let dropped = copy(&config, &mut dest, &Signed { size: -5 });

        assert_eq!(dest.size, 0);
        assert_eq!(
            dropped,
            vec![DroppedField { path: Path::root().field("Size"), value: json!(-5) }]
        );
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase", default)]
    struct Plain {
        mode: String,
        count: Option<u32>,
        size: u32,
        ports: Vec<u32>,
        rules: BTreeMap<String, NarrowRule>,
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase", default)]
    struct Loose {
        mode: Option<String>,
        count: Option<String>,
        size: u64,
        ports: Vec<Value>,
        rules: BTreeMap<String, Rule>,
    }

    #[test]
    fn test_optional_and_plain_fields_follow_one_indirection() {
        let config = CopierConfig::new();

        // None into a plain field resets it to zero
        let mut plain = Plain { mode: "fast".into(), ..Default::default() };
        let dropped = copy(&config, &mut plain, &Loose::default());
        assert!(dropped.is_empty());
        assert_eq!(plain.mode, "");

        // A plain value into None fills it
        let mut loose = Loose::default();
        copy(&config, &mut loose, &Plain { mode: "slow".into(), ..Default::default() });
        assert_eq!(loose.mode, Some("slow".to_string()));

        // None into Some clears it
        copy(&config, &mut loose, &Loose::default());
        assert_eq!(loose.mode, None);
    }

    #[test]
    fn test_values_the_destination_rejects_are_dropped() {
        let src = Loose {
            mode: Some("fast".into()),
            count: Some("many".into()),
            size: 1 << 40,
            ports: vec![json!(80), json!("http"), json!(443)],
            ..Default::default()
        };
        let mut dest = Plain { size: 7, ..Default::default() };
        let dropped: BTreeMap<String, Value> = copy(&CopierConfig::new(), &mut dest, &src)
            .into_iter()
            .map(|d| (d.path.to_string(), d.value))
            .collect();

        assert_eq!(
            dropped,
            BTreeMap::from([
                (".Count".to_string(), json!("many")),
                (".Ports[1]".to_string(), json!("http")),
                (".Size".to_string(), json!(1u64 << 40)),
            ])
        );
        assert_eq!(
            dest,
            Plain {
                mode: "fast".into(),
                count: None,
                size: 0,
                ports: vec![80, 443],
                rules: BTreeMap::new(),
            }
        );
    }

    #[test]
    fn test_fields_dropped_inside_a_new_map_use_key_paths() {
        let src = Loose {
            rules: BTreeMap::from([("web".into(), Rule { port: 80, protocol: "TCP".into() })]),
            ..Default::default()
        };
        let mut dest = Plain::default();
        let dropped = copy(&CopierConfig::new(), &mut dest, &src);

        assert_eq!(dest.rules, BTreeMap::from([("web".into(), NarrowRule { port: 80 })]));
        assert_eq!(
            dropped,
            vec![DroppedField {
                path: Path::root().field("Rules").key("web").field("Protocol"),
                value: json!("TCP"),
            }]
        );
    }
}
