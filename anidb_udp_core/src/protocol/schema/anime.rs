//! ANIME amask layout

use super::{
    BOOL, Field, INT, INT_LIST_APOS, INT_LIST_COMMA, RecordKind, RecordSchema, TEXT, TEXT_LIST_APOS,
    TEXT_LIST_COMMA,
};

pub static ANIME: RecordSchema = RecordSchema {
    kind: RecordKind::Anime,
    mask_len: 7,
    fields: &[
        Field::masked("aid", 0, 128, INT),
        Field::masked("date_flags", 0, 64, INT),
        Field::masked("year", 0, 32, TEXT),
        Field::masked("type", 0, 16, TEXT),
        Field::masked("related_aid_list", 0, 8, INT_LIST_APOS),
        Field::masked("related_aid_type", 0, 4, INT_LIST_APOS),
        // byte 1
        Field::masked("romaji_name", 1, 128, TEXT),
        Field::masked("kanji_name", 1, 64, TEXT),
        Field::masked("english_name", 1, 32, TEXT),
        Field::masked("other_names", 1, 16, TEXT_LIST_APOS),
        Field::masked("short_names", 1, 8, TEXT_LIST_APOS),
        Field::masked("synonyms", 1, 4, TEXT_LIST_APOS),
        // byte 2
        Field::masked("episodes", 2, 128, INT),
        Field::masked("highest_episode_number", 2, 64, INT),
        Field::masked("special_episode_count", 2, 32, INT),
        Field::masked("air_date", 2, 16, INT),
        Field::masked("end_date", 2, 8, INT),
        Field::masked("url", 2, 4, TEXT),
        Field::masked("pic_name", 2, 2, TEXT),
        // byte 3
        Field::masked("rating", 3, 128, INT),
        Field::masked("vote_count", 3, 64, INT),
        Field::masked("temp_rating", 3, 32, INT),
        Field::masked("temp_vote_count", 3, 16, INT),
        Field::masked("average_review_rating", 3, 8, INT),
        Field::masked("review_count", 3, 4, INT),
        Field::masked("award_list", 3, 2, TEXT_LIST_APOS),
        Field::masked("is_adult_restricted", 3, 1, BOOL),
        // byte 4, bit 128 retired
        Field::masked("ann_id", 4, 64, INT),
        Field::masked("allcinema_id", 4, 32, INT),
        Field::masked("animenfo_id", 4, 16, TEXT),
        Field::masked("tag_name_list", 4, 8, TEXT_LIST_COMMA),
        Field::masked("tag_id_list", 4, 4, INT_LIST_COMMA),
        Field::masked("tag_weight_list", 4, 2, INT_LIST_COMMA),
        Field::masked("date_record_updated", 4, 1, INT),
        // byte 5
        Field::masked("character_id_list", 5, 128, INT_LIST_COMMA),
        // byte 6
        Field::masked("specials_count", 6, 128, INT),
        Field::masked("credits_count", 6, 64, INT),
        Field::masked("other_count", 6, 32, INT),
        Field::masked("trailer_count", 6, 16, INT),
        Field::masked("parody_count", 6, 8, INT),
    ],
};
