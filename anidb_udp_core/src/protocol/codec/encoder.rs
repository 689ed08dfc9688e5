//! Mask encoding and payload-line rendering

use super::{FIELD_SEPARATOR, SUB_BLOCK_SEPARATOR, SUB_FIELD_SEPARATOR, escape_text};
use crate::protocol::codec::value::{Record, Value};
use crate::protocol::error::{ProtocolError, Result};
use crate::protocol::schema::{Field, FieldSelection, FieldType, Scalar};
use log::trace;

/// Render the request mask for a selection as lowercase hex
///
/// Fixed-layout kinds and always-present fields contribute nothing.
pub fn encode_mask(selection: &FieldSelection) -> String {
    let mut mask = vec![0u8; selection.schema().mask_len];

    for field in selection.fields() {
        if let Some(bit) = field.mask {
            // Bits never overlap within a byte, so OR equals the sum
            mask[bit.byte] |= bit.bit;
        }
    }

    let hex: String = mask.iter().map(|byte| format!("{byte:02x}")).collect();
    trace!("Encoded {} mask {hex}", selection.kind());
    hex
}

/// Render a record as one payload line, in selection order
pub fn encode_line(selection: &FieldSelection, record: &Record) -> Result<String> {
    encode_joined(&[(selection, record)])
}

/// Render several records on one line with no boundary marker
pub fn encode_joined(parts: &[(&FieldSelection, &Record)]) -> Result<String> {
    let mut slots = Vec::new();

    for (selection, record) in parts {
        for field in selection.fields() {
            let value = record.get(field.name).ok_or_else(|| {
                ProtocolError::encoding(format!("record has no value for '{}'", field.name))
            })?;
            slots.push(encode_slot(field, value)?);
        }
    }

    Ok(slots.join(&FIELD_SEPARATOR.to_string()))
}

fn encode_slot(field: &Field, value: &Value) -> Result<String> {
    match (field.ty, value) {
        (FieldType::Scalar(scalar), value) => encode_scalar(field.name, scalar, value),
        (FieldType::List(scalar, separator), Value::List(items)) => {
            let pieces = items
                .iter()
                .map(|item| encode_scalar(field.name, scalar, item))
                .collect::<Result<Vec<_>>>()?;
            Ok(pieces.join(&separator.as_char().to_string()))
        }
        (FieldType::Composite(sub_fields), Value::Records(blocks)) => {
            let blocks = blocks
                .iter()
                .map(|block| {
                    let pieces = sub_fields
                        .iter()
                        .map(|sub| {
                            let value = block.get(sub.name).ok_or_else(|| {
                                ProtocolError::encoding(format!(
                                    "'{}' block has no value for '{}'",
                                    field.name, sub.name
                                ))
                            })?;
                            encode_slot(sub, value)
                        })
                        .collect::<Result<Vec<_>>>()?;
                    Ok(pieces.join(&SUB_FIELD_SEPARATOR.to_string()))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(blocks.join(&SUB_BLOCK_SEPARATOR.to_string()))
        }
        (_, value) => Err(mismatch(field.name, value)),
    }
}

fn encode_scalar(name: &str, scalar: Scalar, value: &Value) -> Result<String> {
    match (scalar, value) {
        (Scalar::Integer, Value::Integer(number)) => Ok(number.to_string()),
        (Scalar::Text, Value::Text(text)) => Ok(escape_text(text)),
        (Scalar::Boolean, Value::Boolean(flag)) => Ok(if *flag { "1" } else { "0" }.to_string()),
        (_, value) => Err(mismatch(name, value)),
    }
}

fn mismatch(name: &str, value: &Value) -> ProtocolError {
    ProtocolError::encoding(format!("value {value:?} does not match type of '{name}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::schema::{ANIME, FILE, FILE_ANIME, GROUP_STATUS};

    #[test]
    fn test_single_field_mask() {
        let selection = FieldSelection::from_names(&ANIME, &["aid"]).unwrap();
        assert_eq!(encode_mask(&selection), "80000000000000");
    }

    #[test]
    fn test_title_year_type_mask() {
        // aid, year, type in byte 0; romaji, kanji, english in byte 1
        let selection = FieldSelection::from_names(
            &ANIME,
            &["aid", "year", "type", "romaji_name", "kanji_name", "english_name"],
        )
        .unwrap();
        assert_eq!(encode_mask(&selection), "b0e00000000000");
    }

    #[test]
    fn test_full_anime_mask() {
        let selection = FieldSelection::all(&ANIME);
        assert_eq!(encode_mask(&selection), "fcfcfeff7f80f8");
    }

    #[test]
    fn test_file_mask_ignores_fid() {
        let selection = FieldSelection::from_names(&FILE, &["fid"]).unwrap();
        assert_eq!(encode_mask(&selection), "0000000000");

        let selection = FieldSelection::from_names(&FILE, &["aid", "size", "ed2k"]).unwrap();
        assert_eq!(encode_mask(&selection), "40c0000000");
    }

    #[test]
    fn test_file_anime_mask_width() {
        let selection = FieldSelection::all(&FILE_ANIME);
        assert_eq!(encode_mask(&selection).len(), 8);
    }

    #[test]
    fn test_fixed_layout_has_empty_mask() {
        assert_eq!(encode_mask(&FieldSelection::all(&GROUP_STATUS)), "");
    }

    #[test]
    fn test_encode_line_escapes_text() {
        let selection = FieldSelection::from_names(&ANIME, &["aid", "romaji_name"]).unwrap();
        let record = Record::new()
            .with("aid", 1)
            .with("romaji_name", "Kimi no Na wa.\nIt's you");
        assert_eq!(
            encode_line(&selection, &record).unwrap(),
            "1|Kimi no Na wa.<br />It`s you"
        );
    }

    #[test]
    fn test_encode_line_rejects_missing_field() {
        let selection = FieldSelection::from_names(&ANIME, &["aid", "year"]).unwrap();
        let record = Record::new().with("aid", 1);
        assert!(matches!(
            encode_line(&selection, &record),
            Err(ProtocolError::Encoding { .. })
        ));
    }

    #[test]
    fn test_encode_line_rejects_type_mismatch() {
        let selection = FieldSelection::from_names(&ANIME, &["aid"]).unwrap();
        let record = Record::new().with("aid", "not a number");
        assert!(encode_line(&selection, &record).is_err());
    }
}
