//! Field-mask encoding and positional payload decoding
//!
//! This module turns a [`FieldSelection`](crate::protocol::schema::FieldSelection)
//! into the hex mask sent with a request, and turns the `|`-separated reply
//! line back into a [`Record`] using the same selection.

mod decoder;
mod encoder;
mod value;

pub use decoder::{decode_joined, decode_record};
pub use encoder::{encode_joined, encode_line, encode_mask};
pub use value::{Record, Value};

/// Separator between top-level payload slots
pub const FIELD_SEPARATOR: char = '|';

/// Separator between blocks of a composite slot
pub const SUB_BLOCK_SEPARATOR: char = '\'';

/// Separator between sub-fields of one composite block
pub const SUB_FIELD_SEPARATOR: char = ',';

const LINE_BREAK: &str = "<br />";

/// Encode text the way the server does before placing it in a slot
pub fn escape_text(text: &str) -> String {
    text.replace('\'', "`").replace('\n', LINE_BREAK)
}

/// Undo the server's text encoding
pub fn unescape_text(text: &str) -> String {
    text.replace(LINE_BREAK, "\n").replace('`', "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape_text() {
        assert_eq!(unescape_text("It`s"), "It's");
        assert_eq!(unescape_text("one<br />two<br />"), "one\ntwo\n");
        assert_eq!(unescape_text("plain"), "plain");
    }

    #[test]
    fn test_escape_text_is_inverse() {
        let text = "Don't\nstop";
        assert_eq!(escape_text(text), "Don`t<br />stop");
        assert_eq!(unescape_text(&escape_text(text)), text);
    }
}
