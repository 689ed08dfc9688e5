//! Positional payload decoding
//!
//! The wire carries no field names. Slot `i` of a line belongs to field `i`
//! of the selection that built the request mask, so decoding is a single walk
//! over the `|`-separated slots against the selection's field list.

use super::{FIELD_SEPARATOR, SUB_BLOCK_SEPARATOR, SUB_FIELD_SEPARATOR, unescape_text};
use crate::protocol::codec::value::{Record, Value};
use crate::protocol::error::{ProtocolError, Result};
use crate::protocol::schema::{Field, FieldSelection, FieldType, Scalar};
use log::debug;
use std::str::Split;

/// Cursor over the `|`-separated slots of one payload line
struct SlotReader<'a> {
    slots: Split<'a, char>,
    consumed: usize,
}

impl<'a> SlotReader<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            slots: line.split(FIELD_SEPARATOR),
            consumed: 0,
        }
    }

    fn next_slot(&mut self, field: &Field) -> Result<&'a str> {
        let slot = self.slots.next().ok_or_else(|| {
            ProtocolError::decoding(format!(
                "payload ended after {} slots, missing '{}'",
                self.consumed, field.name
            ))
        })?;
        self.consumed += 1;
        Ok(slot)
    }

    fn surplus(self) -> usize {
        self.slots.count()
    }
}

/// Decode one payload line against a selection
pub fn decode_record(selection: &FieldSelection, line: &str) -> Result<Record> {
    let mut records = decode_joined(&[selection], line)?;
    records
        .pop()
        .ok_or_else(|| ProtocolError::decoding("no record decoded"))
}

/// Decode a line carrying several records back to back
///
/// Each selection's slots start right after the previous selection's last
/// slot; nothing on the wire marks the boundary.
pub fn decode_joined(selections: &[&FieldSelection], line: &str) -> Result<Vec<Record>> {
    let mut reader = SlotReader::new(line);
    let mut records = Vec::with_capacity(selections.len());

    for selection in selections {
        let mut record = Record::with_capacity(selection.len());
        for field in selection.fields() {
            let slot = reader.next_slot(field)?;
            record.push(field.name, decode_slot(field, slot)?);
        }
        records.push(record);
    }

    let surplus = reader.surplus();
    if surplus > 0 {
        debug!("Ignoring {surplus} trailing payload slots");
    }

    Ok(records)
}

fn decode_slot(field: &Field, raw: &str) -> Result<Value> {
    match field.ty {
        FieldType::Scalar(scalar) => decode_scalar(field.name, scalar, raw),
        FieldType::List(_, _) if raw.is_empty() => Ok(Value::List(Vec::new())),
        FieldType::List(scalar, separator) => raw
            .split(separator.as_char())
            .map(|piece| decode_scalar(field.name, scalar, piece))
            .collect::<Result<Vec<_>>>()
            .map(Value::List),
        FieldType::Composite(_) if raw.is_empty() => Ok(Value::Records(Vec::new())),
        FieldType::Composite(sub_fields) => raw
            .split(SUB_BLOCK_SEPARATOR)
            .map(|block| decode_block(sub_fields, block))
            .collect::<Result<Vec<_>>>()
            .map(Value::Records),
    }
}

/// Decode one `,`-separated block; short blocks fill with defaults
fn decode_block(sub_fields: &'static [Field], block: &str) -> Result<Record> {
    let mut pieces = block.split(SUB_FIELD_SEPARATOR);
    let mut record = Record::with_capacity(sub_fields.len());

    for sub in sub_fields {
        let piece = pieces.next().unwrap_or_default();
        record.push(sub.name, decode_slot(sub, piece)?);
    }

    Ok(record)
}

fn decode_scalar(name: &str, scalar: Scalar, raw: &str) -> Result<Value> {
    match scalar {
        Scalar::Integer if raw.is_empty() => Ok(Value::Integer(0)),
        Scalar::Integer => raw.trim().parse().map(Value::Integer).map_err(|_| {
            ProtocolError::decoding(format!("'{name}' expects an integer, got '{raw}'"))
        }),
        Scalar::Text => Ok(Value::Text(unescape_text(raw))),
        Scalar::Boolean => match raw {
            "" | "0" | "false" => Ok(Value::Boolean(false)),
            "1" | "true" => Ok(Value::Boolean(true)),
            other => Err(ProtocolError::decoding(format!(
                "'{name}' expects a boolean, got '{other}'"
            ))),
        },
    }
}
