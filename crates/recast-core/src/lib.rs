//! Recast Core - Conversion bridge between structurally related record shapes
//!
//! This crate converts one typed record into a structurally related but
//! non-identical record (another API generation's representation of the same
//! resource, or a schema-less map into a record) while preserving the fields
//! the wire representation deliberately drops.
//!
//! # Main Components
//!
//! - **Conversion Engine**: [`convert`], [`convert_with_report`], and
//!   [`convert_to_map`] for wire-form marshalling plus the recursive
//!   excluded-field restoration walk
//! - **Shape Descriptors**: [`Shape`], [`ShapeDef`], and [`FieldDef`],
//!   the per-type field tables produced by `#[derive(Shape)]`
//! - **Field Participation**: [`IsEmpty`], [`Walkable`], [`WireMerge`], and
//!   [`impl_scalar!`] for opaque leaf types
//! - **Observability**: [`ConversionReport`] records every restoration the
//!   engine's best-effort matching silently skipped
//!
//! # Example
//!
//! ```
//! use recast_core::{convert, Result, Shape};
//! use serde::Serialize;
//!
//! #[derive(Shape, Serialize, Default, Clone)]
//! struct ClusterV1 {
//!     name: String,
//!     #[serde(skip)]
//!     etag: String,
//! }
//!
//! #[derive(Shape, Serialize, Default, Clone)]
//! struct ClusterV2 {
//!     name: String,
//!     region: String,
//!     #[serde(skip)]
//!     etag: String,
//! }
//!
//! fn example() -> Result<()> {
//!     let v1 = ClusterV1 {
//!         name: "primary".to_string(),
//!         etag: "abc123".to_string(),
//!     };
//!     let mut v2 = ClusterV2::default();
//!     convert(&v1, &mut v2)?;
//!     assert_eq!(v2.name, "primary");
//!     // `etag` never entered the wire form, yet it survived.
//!     assert_eq!(v2.etag, "abc123");
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

// Lets the derive macro's `::recast_core::` paths resolve inside this
// crate's own tests and doctests.
extern crate self as recast_core;

pub mod convert;
pub mod error;
pub mod report;
pub mod shape;
pub mod value;
pub mod wire;

// Re-export main types for convenience
pub use convert::{convert, convert_to_map, convert_with_report};
pub use error::{Error, Result};
pub use report::{ConversionReport, Skip, SkipReason};
pub use shape::{Field, FieldDef, FieldGetter, FieldGetterMut, Record, Shape, ShapeDef};
pub use value::{IsEmpty, Walkable};
pub use wire::{merge_record, to_wire, WireMerge};

/// Derives the shape descriptor and field participation traits for a record
/// type, reading its serde attributes for wire names and exclusions.
pub use recast_derive::Shape;

#[doc(hidden)]
pub use serde_json as __serde_json;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_error_creation() {
        let err = Error::encoding("test error");
        assert!(err.to_string().contains("test error"));
    }
}
