//! Lookup keys typed on the command line

use anidb_udp_core::protocol::{AnimeRef, GroupRef};

/// A numeric argument is an id, anything else a name
pub fn parse_anime_ref(value: &str) -> AnimeRef {
    match value.trim().parse::<u64>() {
        Ok(aid) => AnimeRef::Id(aid),
        Err(_) => AnimeRef::Name(value.to_string()),
    }
}

/// A numeric argument is an id, anything else a name
pub fn parse_group_ref(value: &str) -> GroupRef {
    match value.trim().parse::<u64>() {
        Ok(gid) => GroupRef::Id(gid),
        Err(_) => GroupRef::Name(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_is_id() {
        assert_eq!(parse_anime_ref("6327"), AnimeRef::Id(6327));
        assert_eq!(parse_group_ref(" 1412 "), GroupRef::Id(1412));
    }

    #[test]
    fn test_text_is_name() {
        assert_eq!(parse_anime_ref("Toradora!"), AnimeRef::Name("Toradora!".into()));
        assert_eq!(parse_group_ref("Frostii"), GroupRef::Name("Frostii".into()));
        assert_eq!(parse_anime_ref("86"), AnimeRef::Id(86));
    }
}
