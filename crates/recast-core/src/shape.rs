//! Compile-time shape descriptors and the traits that consume them
//!
//! Rust has no runtime field reflection, so every record type carries a
//! `&'static ShapeDef`, a table of its fields with their wire names,
//! exclusion flags, and accessor functions, generated by
//! `#[derive(Shape)]`. A single generic walk consumes these tables; no
//! per-shape-pair code exists anywhere.
//!
//! Copyright (c) 2025 Recast Team
//! Licensed under the Apache-2.0 license

use crate::error::Result;
use crate::value::{IsEmpty, Walkable};
use crate::wire::WireMerge;
use serde_json::{Map, Value};
use std::any::Any;

/// Accessor returning a field of a record as a walkable slot.
///
/// Returns `None` when the record is not of the type the descriptor was
/// generated for; the walk skips such fields rather than panicking.
pub type FieldGetter = for<'a> fn(&'a dyn Record) -> Option<&'a dyn Field>;

/// Mutable counterpart of [`FieldGetter`].
pub type FieldGetterMut = for<'a> fn(&'a mut dyn Record) -> Option<&'a mut dyn Field>;

/// One declared field of a record shape.
pub struct FieldDef {
    /// Declared Rust field name
    pub name: &'static str,
    /// Name the field carries on the wire (after serde renames)
    pub wire_name: &'static str,
    /// True when the field never appears in the wire form
    pub excluded: bool,
    pub get: FieldGetter,
    pub get_mut: FieldGetterMut,
}

/// The declared structure of a record type: its name and field table,
/// in declaration order.
pub struct ShapeDef {
    pub name: &'static str,
    pub fields: &'static [FieldDef],
}

impl ShapeDef {
    /// Look up a field by its declared Rust name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Look up a field by the name it carries on the wire.
    pub fn field_by_wire_name(&self, wire_name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.wire_name == wire_name)
    }
}

impl std::fmt::Debug for FieldDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("wire_name", &self.wire_name)
            .field("excluded", &self.excluded)
            .finish()
    }
}

impl std::fmt::Debug for ShapeDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapeDef")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish()
    }
}

/// A type with a compile-time shape descriptor. Implemented by
/// `#[derive(Shape)]` and, with an empty field table, by the schema-less
/// mapping type.
pub trait Shape {
    fn shape_def() -> &'static ShapeDef
    where
        Self: Sized;
}

/// Object-safe view of a record instance: its descriptor plus downcasting
/// hooks for the accessor functions.
pub trait Record: Any {
    fn shape(&self) -> &'static ShapeDef;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Everything the engine needs from a field slot: emptiness, structure
/// exposure, wire merging, and a structural copy for the excluded pass.
///
/// Blanket-implemented for every type with the three participation traits;
/// never implemented by hand.
pub trait Field: IsEmpty + Walkable + WireMerge + Any {
    fn any_ref(&self) -> &dyn Any;
    fn any_mut(&mut self) -> &mut dyn Any;

    /// Clone this value into `dest`. Fails (returns false) when the two
    /// slots are not the same concrete type. Named to stay clear of the
    /// `ToOwned::clone_into` blanket method on concrete callers.
    fn copy_into(&self, dest: &mut dyn Field) -> bool;
}

impl<T> Field for T
where
    T: IsEmpty + Walkable + WireMerge + Clone + Any,
{
    fn any_ref(&self) -> &dyn Any {
        self
    }

    fn any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn copy_into(&self, dest: &mut dyn Field) -> bool {
        match dest.any_mut().downcast_mut::<T>() {
            Some(slot) => {
                *slot = self.clone();
                true
            }
            None => false,
        }
    }
}

/// Shape of the schema-less mapping: no declared fields, so it declares no
/// exclusions and the restoration walk has nothing to visit.
static MAP_SHAPE: ShapeDef = ShapeDef {
    name: "Map",
    fields: &[],
};

impl Shape for Map<String, Value> {
    fn shape_def() -> &'static ShapeDef {
        &MAP_SHAPE
    }
}

impl Record for Map<String, Value> {
    fn shape(&self) -> &'static ShapeDef {
        &MAP_SHAPE
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl IsEmpty for Map<String, Value> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

// The walk never descends into schema-less mappings: their values carry no
// shape and therefore no exclusions.
impl Walkable for Map<String, Value> {}

impl WireMerge for Map<String, Value> {
    fn merge_wire(&mut self, value: &Value, path: &str) -> Result<()> {
        match value {
            Value::Null => Ok(()),
            Value::Object(entries) => {
                for (key, entry) in entries {
                    self.insert(key.clone(), entry.clone());
                }
                Ok(())
            }
            other => Err(crate::Error::type_mismatch(path, "object", other)),
        }
    }
}
