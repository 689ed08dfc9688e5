//! Property checks for mask encoding and payload decoding

use anidb_udp_core::protocol::codec::{decode_joined, decode_record, encode_joined, encode_line, encode_mask};
use anidb_udp_core::protocol::schema::{
    ANIME, FILE, FILE_ANIME, Field, FieldSelection, FieldType, GROUP, RecordSchema, Scalar,
    all_schemas,
};
use anidb_udp_core::protocol::{Record, Value};
use proptest::prelude::*;

fn scalar_value(scalar: Scalar, nested: bool) -> BoxedStrategy<Value> {
    match scalar {
        Scalar::Integer => any::<i64>().prop_map(Value::Integer).boxed(),
        // List elements and block pieces cannot be empty or carry separators
        Scalar::Text if nested => "[A-Za-z0-9 ]{1,8}".prop_map(Value::Text).boxed(),
        Scalar::Text => "[A-Za-z0-9 ']{0,12}".prop_map(Value::Text).boxed(),
        Scalar::Boolean => any::<bool>().prop_map(Value::Boolean).boxed(),
    }
}

fn field_value(ty: FieldType, nested: bool) -> BoxedStrategy<Value> {
    match ty {
        FieldType::Scalar(scalar) => scalar_value(scalar, nested),
        FieldType::List(scalar, _) => prop::collection::vec(scalar_value(scalar, true), 0..4)
            .prop_map(Value::List)
            .boxed(),
        FieldType::Composite(sub_fields) => prop::collection::vec(block(sub_fields), 0..4)
            .prop_map(Value::Records)
            .boxed(),
    }
}

fn block(sub_fields: &'static [Field]) -> BoxedStrategy<Record> {
    let values: Vec<_> = sub_fields
        .iter()
        .map(|sub| field_value(sub.ty, true))
        .collect();
    values
        .prop_map(move |values| {
            let mut record = Record::new();
            for (sub, value) in sub_fields.iter().zip(values) {
                record.push(sub.name, value);
            }
            record
        })
        .boxed()
}

/// A random selection from `schema` and a record filling it
fn selected_record(
    schema: &'static RecordSchema,
) -> impl Strategy<Value = (FieldSelection, Record)> {
    let names: Vec<&'static str> = schema.field_names().collect();
    let len = names.len();

    prop::sample::subsequence(names, 0..=len)
        .prop_flat_map(move |picked| {
            let selection = FieldSelection::from_names(schema, &picked).unwrap();
            let values: Vec<_> = selection
                .fields()
                .iter()
                .map(|field| field_value(field.ty, false))
                .collect();
            (Just(selection), values)
        })
        .prop_map(|(selection, values)| {
            let mut record = Record::new();
            for (field, value) in selection.fields().iter().zip(values) {
                record.push(field.name, value);
            }
            (selection, record)
        })
}

proptest! {
    #[test]
    fn test_anime_line_round_trip((selection, record) in selected_record(&ANIME)) {
        let line = encode_line(&selection, &record).unwrap();
        prop_assert_eq!(decode_record(&selection, &line).unwrap(), record);
    }

    #[test]
    fn test_group_line_round_trip(record in block(GROUP.fields)) {
        let selection = FieldSelection::all(&GROUP);
        let line = encode_line(&selection, &record).unwrap();
        prop_assert_eq!(decode_record(&selection, &line).unwrap(), record);
    }

    #[test]
    fn test_joined_file_line_round_trip(
        (file_selection, file) in selected_record(&FILE),
        (anime_selection, anime) in selected_record(&FILE_ANIME),
    ) {
        let line = encode_joined(&[(&file_selection, &file), (&anime_selection, &anime)]).unwrap();
        let decoded = decode_joined(&[&file_selection, &anime_selection], &line).unwrap();
        prop_assert_eq!(decoded, vec![file, anime]);
    }

    #[test]
    fn test_mask_ignores_name_order(
        (picked, shuffled) in prop::sample::subsequence(ANIME.field_names().collect::<Vec<_>>(), 1..=10)
            .prop_flat_map(|picked| (Just(picked.clone()), Just(picked).prop_shuffle()))
    ) {
        let ordered = FieldSelection::from_names(&ANIME, &picked).unwrap();
        let shuffled = FieldSelection::from_names(&ANIME, &shuffled).unwrap();
        prop_assert_eq!(encode_mask(&ordered), encode_mask(&shuffled));
        prop_assert_eq!(ordered, shuffled);
    }
}

#[test]
fn test_mask_bits_never_collide() {
    for schema in all_schemas() {
        let mut seen = Vec::new();
        for field in schema.fields {
            if let Some(bit) = field.mask {
                assert!(
                    !seen.contains(&(bit.byte, bit.bit)),
                    "{} shares a mask bit in {}",
                    field.name,
                    schema.kind
                );
                assert!(bit.byte < schema.mask_len);
                assert_eq!(bit.bit.count_ones(), 1);
                seen.push((bit.byte, bit.bit));
            }
        }
    }
}
