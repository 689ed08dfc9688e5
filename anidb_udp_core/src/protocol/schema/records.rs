//! Fixed-layout record kinds
//!
//! These commands take no mask; the server always returns the full field list.

use super::{BOOL, Field, FieldType, INT, RecordKind, RecordSchema, TEXT};

pub static EPISODE: RecordSchema = RecordSchema {
    kind: RecordKind::Episode,
    mask_len: 0,
    fields: &[
        Field::fixed("eid", INT),
        Field::fixed("aid", INT),
        Field::fixed("length", INT),
        Field::fixed("rating", INT),
        Field::fixed("vote_count", INT),
        Field::fixed("episode_number", TEXT),
        Field::fixed("english_name", TEXT),
        Field::fixed("romaji_name", TEXT),
        Field::fixed("kanji_name", TEXT),
        Field::fixed("air_date", INT),
        Field::fixed("episode_type", INT),
    ],
};

pub static GROUP_RELATION: [Field; 2] = [
    Field::fixed("other_gid", INT),
    Field::fixed("relation_type", INT),
];

pub static GROUP: RecordSchema = RecordSchema {
    kind: RecordKind::Group,
    mask_len: 0,
    fields: &[
        Field::fixed("gid", INT),
        Field::fixed("rating", INT),
        Field::fixed("vote_count", INT),
        Field::fixed("anime_count", INT),
        Field::fixed("file_count", INT),
        Field::fixed("long_name", TEXT),
        Field::fixed("short_name", TEXT),
        Field::fixed("irc_channel", TEXT),
        Field::fixed("irc_server", TEXT),
        Field::fixed("url", TEXT),
        Field::fixed("pic_name", TEXT),
        Field::fixed("founded_date", INT),
        Field::fixed("disbanded_date", INT),
        Field::fixed("date_flags", INT),
        Field::fixed("last_release_date", INT),
        Field::fixed("last_activity_date", INT),
        Field::fixed("group_relations", FieldType::Composite(&GROUP_RELATION)),
    ],
};

/// One line of a GROUPSTATUS reply
pub static GROUP_STATUS: RecordSchema = RecordSchema {
    kind: RecordKind::GroupStatus,
    mask_len: 0,
    fields: &[
        Field::fixed("gid", INT),
        Field::fixed("group_name", TEXT),
        Field::fixed("completion_state", INT),
        Field::fixed("last_episode_number", INT),
        Field::fixed("rating", INT),
        Field::fixed("vote_count", INT),
        Field::fixed("episode_range", TEXT),
    ],
};

pub static ANIME_BLOCK: [Field; 4] = [
    Field::fixed("aid", INT),
    Field::fixed("appearance", INT),
    Field::fixed("creator_id", INT),
    Field::fixed("is_main_seiyuu", BOOL),
];

pub static CHARACTER: RecordSchema = RecordSchema {
    kind: RecordKind::Character,
    mask_len: 0,
    fields: &[
        Field::fixed("char_id", INT),
        Field::fixed("kanji_name", TEXT),
        Field::fixed("english_name", TEXT),
        Field::fixed("pic_name", TEXT),
        Field::fixed("anime_blocks", FieldType::Composite(&ANIME_BLOCK)),
        Field::fixed("episode_list", TEXT),
        Field::fixed("last_update_date", INT),
        Field::fixed("character_type", INT),
        Field::fixed("gender", TEXT),
    ],
};

pub static CREATOR: RecordSchema = RecordSchema {
    kind: RecordKind::Creator,
    mask_len: 0,
    fields: &[
        Field::fixed("creator_id", INT),
        Field::fixed("kanji_name", TEXT),
        Field::fixed("english_name", TEXT),
        Field::fixed("creator_type", INT),
        Field::fixed("pic_name", TEXT),
        Field::fixed("url_english", TEXT),
        Field::fixed("url_japanese", TEXT),
        Field::fixed("wiki_url_english", TEXT),
        Field::fixed("wiki_url_japanese", TEXT),
        Field::fixed("last_update_date", INT),
    ],
};

/// One page of an ANIMEDESC reply
pub static ANIME_DESCRIPTION: RecordSchema = RecordSchema {
    kind: RecordKind::AnimeDescription,
    mask_len: 0,
    fields: &[
        Field::fixed("current_part", INT),
        Field::fixed("max_parts", INT),
        Field::fixed("description", TEXT),
    ],
};
