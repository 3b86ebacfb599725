//! Wire-form production and in-place application
//!
//! The wire form is a schema-less, ordered-key JSON object used only as a
//! transient intermediate: `to_wire` produces it from any serializable
//! source, `merge_record` applies it onto a destination record key by key.
//! Application merges rather than replaces: destination fields with no
//! matching wire key keep their pre-call values.
//!
//! Copyright (c) 2025 Recast Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::shape::Record;
use serde::Serialize;
use std::collections::HashMap;

pub use serde_json::{Map, Value};

/// Serialize a source value into the wire form.
///
/// Excluded fields are omitted here by `#[serde(skip)]`; that is the only
/// place exclusion intersects serialization.
pub fn to_wire<S>(source: &S) -> Result<Map<String, Value>>
where
    S: Serialize + ?Sized,
{
    let value = serde_json::to_value(source).map_err(Error::encoding_from)?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::encoding(format!(
            "source serialized to {}, expected an object",
            kind_of(&other)
        ))),
    }
}

/// How a field type absorbs a wire value in place.
///
/// A `null` wire value is ignored for non-optional fields and clears
/// optional ones, mirroring lenient decoder behavior.
pub trait WireMerge {
    fn merge_wire(&mut self, value: &Value, path: &str) -> Result<()>;
}

/// Apply a wire form onto a destination record, key by key.
///
/// Wire keys with no matching destination field are ignored, as are keys
/// naming an excluded destination field: an excluded field never arrives
/// by wire. This is the map-to-record half of a conversion and is also
/// called by derived `WireMerge` impls for nested records.
pub fn merge_record(dest: &mut dyn Record, wire: &Map<String, Value>, path: &str) -> Result<()> {
    let shape = dest.shape();
    for (key, value) in wire {
        match shape.field_by_wire_name(key) {
            Some(field) if field.excluded => {
                log::trace!("ignoring wire key {path}.{key}: destination field is excluded");
            }
            Some(field) => {
                if let Some(slot) = (field.get_mut)(dest) {
                    slot.merge_wire(value, &format!("{path}.{key}"))?;
                }
            }
            None => {
                log::trace!("ignoring wire key {path}.{key}: no such field on {}", shape.name);
            }
        }
    }
    Ok(())
}

impl<T> WireMerge for Option<T>
where
    T: WireMerge + Default,
{
    fn merge_wire(&mut self, value: &Value, path: &str) -> Result<()> {
        if value.is_null() {
            *self = None;
            return Ok(());
        }
        match self {
            Some(inner) => inner.merge_wire(value, path),
            None => {
                let mut inner = T::default();
                inner.merge_wire(value, path)?;
                *self = Some(inner);
                Ok(())
            }
        }
    }
}

impl<T> WireMerge for Box<T>
where
    T: WireMerge,
{
    fn merge_wire(&mut self, value: &Value, path: &str) -> Result<()> {
        (**self).merge_wire(value, path)
    }
}

impl<T> WireMerge for Vec<T>
where
    T: WireMerge + Default,
{
    /// Sequences are rebuilt from the wire array element by element; this
    /// is what gives the restoration walk its equal-length precondition.
    fn merge_wire(&mut self, value: &Value, path: &str) -> Result<()> {
        match value {
            Value::Null => Ok(()),
            Value::Array(items) => {
                self.clear();
                for (index, item) in items.iter().enumerate() {
                    let mut element = T::default();
                    element.merge_wire(item, &format!("{path}[{index}]"))?;
                    self.push(element);
                }
                Ok(())
            }
            other => Err(Error::type_mismatch(path, "array", other)),
        }
    }
}

impl<T> WireMerge for HashMap<String, T>
where
    T: WireMerge + Default,
{
    fn merge_wire(&mut self, value: &Value, path: &str) -> Result<()> {
        match value {
            Value::Null => Ok(()),
            Value::Object(entries) => {
                for (key, entry) in entries {
                    self.entry(key.clone())
                        .or_default()
                        .merge_wire(entry, &format!("{path}.{key}"))?;
                }
                Ok(())
            }
            other => Err(Error::type_mismatch(path, "object", other)),
        }
    }
}

impl WireMerge for Value {
    fn merge_wire(&mut self, value: &Value, _path: &str) -> Result<()> {
        if !value.is_null() {
            *self = value.clone();
        }
        Ok(())
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
