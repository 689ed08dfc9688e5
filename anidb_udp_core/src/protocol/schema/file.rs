//! FILE fmask and amask layouts
//!
//! A FILE reply carries the file fields first and the anime fields right
//! after them on the same line.

use super::{
    Field, FieldType, INT, INT_LIST_APOS, RecordKind, RecordSchema, TEXT, TEXT_LIST_APOS,
    TEXT_LIST_COMMA,
};

/// `eid,percentage` blocks of the "other episodes" slot
pub static OTHER_EPISODE: [Field; 2] = [
    Field::fixed("eid", INT),
    Field::fixed("percentage", INT),
];

pub static FILE: RecordSchema = RecordSchema {
    kind: RecordKind::File,
    mask_len: 5,
    fields: &[
        Field::fixed("fid", INT),
        Field::masked("aid", 0, 64, INT),
        Field::masked("eid", 0, 32, INT),
        Field::masked("gid", 0, 16, INT),
        Field::masked("mylist_id", 0, 8, INT),
        Field::masked("other_episodes", 0, 4, FieldType::Composite(&OTHER_EPISODE)),
        Field::masked("is_deprecated", 0, 2, INT),
        Field::masked("state", 0, 1, INT),
        // byte 1
        Field::masked("size", 1, 128, INT),
        Field::masked("ed2k", 1, 64, TEXT),
        Field::masked("md5", 1, 32, TEXT),
        Field::masked("sha1", 1, 16, TEXT),
        Field::masked("crc32", 1, 8, TEXT),
        Field::masked("video_color_depth", 1, 2, TEXT),
        // byte 2
        Field::masked("quality", 2, 128, TEXT),
        Field::masked("source", 2, 64, TEXT),
        Field::masked("audio_codec_list", 2, 32, TEXT_LIST_APOS),
        Field::masked("audio_bitrate_list", 2, 16, INT_LIST_APOS),
        Field::masked("video_codec", 2, 8, TEXT),
        Field::masked("video_bitrate", 2, 4, INT),
        Field::masked("video_resolution", 2, 2, TEXT),
        Field::masked("file_type", 2, 1, TEXT),
        // byte 3
        Field::masked("dub_language", 3, 128, TEXT),
        Field::masked("sub_language", 3, 64, TEXT),
        Field::masked("length_in_seconds", 3, 32, INT),
        Field::masked("description", 3, 16, TEXT),
        Field::masked("aired_date", 3, 8, INT),
        Field::masked("anidb_file_name", 3, 1, TEXT),
        // byte 4
        Field::masked("mylist_state", 4, 128, INT),
        Field::masked("mylist_file_state", 4, 64, INT),
        Field::masked("mylist_viewed", 4, 32, INT),
        Field::masked("mylist_view_date", 4, 16, INT),
        Field::masked("mylist_storage", 4, 8, TEXT),
        Field::masked("mylist_source", 4, 4, TEXT),
        Field::masked("mylist_other", 4, 2, TEXT),
    ],
};

pub static FILE_ANIME: RecordSchema = RecordSchema {
    kind: RecordKind::FileAnime,
    mask_len: 4,
    fields: &[
        Field::masked("anime_total_episodes", 0, 128, INT),
        Field::masked("highest_episode_number", 0, 64, INT),
        Field::masked("year", 0, 32, TEXT),
        Field::masked("type", 0, 16, TEXT),
        Field::masked("related_aid_list", 0, 8, INT_LIST_APOS),
        Field::masked("related_aid_type", 0, 4, INT_LIST_APOS),
        Field::masked("category_list", 0, 2, TEXT_LIST_COMMA),
        // byte 1
        Field::masked("romaji_name", 1, 128, TEXT),
        Field::masked("kanji_name", 1, 64, TEXT),
        Field::masked("english_name", 1, 32, TEXT),
        Field::masked("other_names", 1, 16, TEXT_LIST_APOS),
        Field::masked("short_names", 1, 8, TEXT_LIST_APOS),
        Field::masked("synonyms", 1, 4, TEXT_LIST_APOS),
        // byte 2
        Field::masked("episode_number", 2, 128, TEXT),
        Field::masked("episode_name", 2, 64, TEXT),
        Field::masked("episode_romaji_name", 2, 32, TEXT),
        Field::masked("episode_kanji_name", 2, 16, TEXT),
        Field::masked("episode_rating", 2, 8, INT),
        Field::masked("episode_vote_count", 2, 4, INT),
        // byte 3
        Field::masked("group_name", 3, 128, TEXT),
        Field::masked("group_short_name", 3, 64, TEXT),
        Field::masked("date_anime_record_updated", 3, 1, INT),
    ],
};
