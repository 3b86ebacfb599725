//! The conversion engine
//!
//! `convert` bridges two structurally related record shapes: it serializes
//! the source to the transient wire form, merges that wire form into the
//! caller's pre-allocated destination, and then walks source and destination
//! in lockstep to restore the fields the wire form deliberately dropped.
//! The walk is generic over shape descriptors; no per-shape-pair code
//! exists.
//!
//! Copyright (c) 2025 Recast Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::report::{ConversionReport, SkipReason};
use crate::shape::Record;
use crate::wire::{merge_record, to_wire, Map, Value};
use serde::Serialize;

/// Recursion bound for the restoration walk. Self-referential shapes
/// (`Option<Box<Self>>` chains) are truncated here rather than erroring:
/// restoration is best-effort by contract, and a partial restore beats a
/// failed conversion.
const MAX_DEPTH: usize = 64;

/// Convert `source` into `destination`, restoring excluded fields.
///
/// The destination is mutated in place: fields present in the wire form are
/// merged in, fields only the destination declares keep their pre-call
/// values, and fields the source marked `#[serde(skip)]` are copied forward
/// structurally. Sources may be typed records or a schema-less
/// `Map<String, Value>`; a mapping declares no exclusions, so no
/// restoration runs for it.
///
/// Skipped restorations (shape mismatches, depth truncation) are emitted
/// through the `log` facade; use [`convert_with_report`] to inspect them
/// programmatically.
///
/// On error the destination is indeterminate and must be discarded.
pub fn convert<S, D>(source: &S, destination: &mut D) -> Result<()>
where
    S: Record + Serialize,
    D: Record,
{
    let report = convert_with_report(source, destination)?;
    report.emit();
    Ok(())
}

/// [`convert`], additionally returning the report of every restoration the
/// walk silently skipped.
pub fn convert_with_report<S, D>(source: &S, destination: &mut D) -> Result<ConversionReport>
where
    S: Record + Serialize,
    D: Record,
{
    let wire = to_wire(source)?;
    merge_record(destination, &wire, "$")?;

    let mut report = ConversionReport::new();
    // A schema-less mapping declares no fields, hence no exclusions to
    // restore.
    if !source.shape().fields.is_empty() {
        restore_excluded(source, destination, "$", 0, &mut report);
    }
    Ok(report)
}

/// Serialize-only half of a conversion: the wire form of `source` as a
/// schema-less mapping, for callers that need a dynamic view of a typed
/// record. Performs no excluded-field restoration; there is no
/// destination to restore into.
pub fn convert_to_map<S>(source: &S) -> Result<Map<String, Value>>
where
    S: Serialize + ?Sized,
{
    let value = serde_json::to_value(source).map_err(Error::encoding_from)?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::type_mismatch("$", "object", &other)),
    }
}

/// The restoration walk. Visits the source shape's fields in declaration
/// order, copies excluded non-empty values onto same-named destination
/// fields, and recurses through nested records, present optionals, and
/// sequences at matching indices. Mismatches skip; they never error.
fn restore_excluded(
    source: &dyn Record,
    destination: &mut dyn Record,
    path: &str,
    depth: usize,
    report: &mut ConversionReport,
) {
    if depth >= MAX_DEPTH {
        report.record(path.to_string(), SkipReason::DepthLimit);
        return;
    }

    let dest_shape = destination.shape();
    for field in source.shape().fields {
        let Some(src_slot) = (field.get)(source) else {
            continue;
        };
        // Empty excluded fields must not clobber a populated destination
        // default, and empty values have nothing to recurse into.
        if src_slot.is_empty_value() {
            continue;
        }

        let field_path = format!("{path}.{}", field.name);
        let Some(dest_field) = dest_shape.field(field.name) else {
            if field.excluded {
                report.record(field_path, SkipReason::UnmatchedField);
            }
            continue;
        };
        let Some(dest_slot) = (dest_field.get_mut)(destination) else {
            continue;
        };

        if field.excluded && !src_slot.copy_into(&mut *dest_slot) {
            report.record(field_path.clone(), SkipReason::KindMismatch);
        }

        if let Some(src_record) = src_slot.as_record() {
            if let Some(dest_record) = dest_slot.as_record_mut() {
                restore_excluded(src_record, dest_record, &field_path, depth + 1, report);
            }
        } else if let Some(src_elements) = src_slot.element_records() {
            let Some(dest_elements) = dest_slot.element_records_mut() else {
                continue;
            };
            if src_elements.len() != dest_elements.len() {
                report.record(field_path.clone(), SkipReason::LengthMismatch);
            }
            for (index, (src_element, dest_element)) in
                src_elements.into_iter().zip(dest_elements).enumerate()
            {
                if let (Some(src_record), Some(dest_record)) = (src_element, dest_element) {
                    restore_excluded(
                        src_record,
                        dest_record,
                        &format!("{field_path}[{index}]"),
                        depth + 1,
                        report,
                    );
                }
            }
        }
    }
}
