//! Field descriptor tables for AniDB record kinds
//!
//! Every record kind is described by an ordered table of [`Field`]s. Kinds
//! that support field selection (ANIME, FILE and the anime half of a FILE
//! reply) carry a [`MaskBit`] per field; the server emits selected fields in
//! the order the tables are declared, so table order doubles as decode order.
//! Fixed-layout kinds (EPISODE, GROUP, ...) always return every field.

mod anime;
mod file;
mod records;

pub use anime::ANIME;
pub use file::{FILE, FILE_ANIME, OTHER_EPISODE};
pub use records::{
    ANIME_BLOCK, ANIME_DESCRIPTION, CHARACTER, CREATOR, EPISODE, GROUP, GROUP_RELATION,
    GROUP_STATUS,
};

use crate::protocol::error::{ProtocolError, Result};
use serde::Serialize;
use std::fmt;

/// Record kinds exposed by the AniDB UDP API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Anime,
    AnimeDescription,
    Episode,
    File,
    FileAnime,
    Group,
    GroupStatus,
    Character,
    Creator,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Anime => "anime",
            RecordKind::AnimeDescription => "anime description",
            RecordKind::Episode => "episode",
            RecordKind::File => "file",
            RecordKind::FileAnime => "file anime",
            RecordKind::Group => "group",
            RecordKind::GroupStatus => "group status",
            RecordKind::Character => "character",
            RecordKind::Creator => "creator",
        };
        f.write_str(name)
    }
}

/// Scalar wire types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    Integer,
    Text,
    Boolean,
}

/// Separator between elements of a flat list slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListSeparator {
    Apostrophe,
    Comma,
}

impl ListSeparator {
    pub fn as_char(self) -> char {
        match self {
            ListSeparator::Apostrophe => '\'',
            ListSeparator::Comma => ',',
        }
    }
}

/// How one payload slot decodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Scalar(Scalar),
    /// Flat list of scalars
    List(Scalar, ListSeparator),
    /// Apostrophe-separated blocks of comma-separated sub-fields
    Composite(&'static [Field]),
}

pub(crate) const INT: FieldType = FieldType::Scalar(Scalar::Integer);
pub(crate) const TEXT: FieldType = FieldType::Scalar(Scalar::Text);
pub(crate) const BOOL: FieldType = FieldType::Scalar(Scalar::Boolean);
pub(crate) const INT_LIST_APOS: FieldType = FieldType::List(Scalar::Integer, ListSeparator::Apostrophe);
pub(crate) const INT_LIST_COMMA: FieldType = FieldType::List(Scalar::Integer, ListSeparator::Comma);
pub(crate) const TEXT_LIST_APOS: FieldType = FieldType::List(Scalar::Text, ListSeparator::Apostrophe);
pub(crate) const TEXT_LIST_COMMA: FieldType = FieldType::List(Scalar::Text, ListSeparator::Comma);

/// Position of a field inside a request mask
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskBit {
    pub byte: usize,
    pub bit: u8,
}

/// One entry of a descriptor table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    /// `None` means the server always sends the field
    pub mask: Option<MaskBit>,
    pub ty: FieldType,
}

impl Field {
    pub const fn masked(name: &'static str, byte: usize, bit: u8, ty: FieldType) -> Self {
        Self {
            name,
            mask: Some(MaskBit { byte, bit }),
            ty,
        }
    }

    pub const fn fixed(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            mask: None,
            ty,
        }
    }
}

/// Descriptor table for one record kind
#[derive(Debug, PartialEq, Eq)]
pub struct RecordSchema {
    pub kind: RecordKind,
    /// Mask width in bytes, 0 for fixed-layout kinds
    pub mask_len: usize,
    pub fields: &'static [Field],
}

impl RecordSchema {
    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&'static Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Whether requests for this kind carry a field mask
    pub fn supports_mask(&self) -> bool {
        self.mask_len > 0
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|field| field.name)
    }
}

/// An ordered set of fields to request and decode
///
/// The selection is always held in schema declaration order, whatever order
/// the caller named the fields in. The same selection must be used to build
/// the mask and to decode the reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelection {
    schema: &'static RecordSchema,
    fields: Vec<&'static Field>,
}

impl FieldSelection {
    /// Select every field of the schema
    pub fn all(schema: &'static RecordSchema) -> Self {
        Self {
            schema,
            fields: schema.fields.iter().collect(),
        }
    }

    /// Select the named fields plus every always-present field
    ///
    /// An empty list selects everything.
    pub fn from_names<S: AsRef<str>>(schema: &'static RecordSchema, names: &[S]) -> Result<Self> {
        let names: Vec<&str> = names.iter().map(|name| name.as_ref()).collect();
        if names.is_empty() {
            return Ok(Self::all(schema));
        }

        if let Some(unknown) = names.iter().find(|name| schema.field(name).is_none()) {
            return Err(ProtocolError::unknown_field(schema.kind, *unknown));
        }

        let fields = schema
            .fields
            .iter()
            .filter(|field| field.mask.is_none() || names.contains(&field.name))
            .collect();

        Ok(Self { schema, fields })
    }

    pub fn kind(&self) -> RecordKind {
        self.schema.kind
    }

    pub fn schema(&self) -> &'static RecordSchema {
        self.schema
    }

    pub fn fields(&self) -> &[&'static Field] {
        &self.fields
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|field| field.name).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Every top-level table, for invariant checks and tooling
pub fn all_schemas() -> [&'static RecordSchema; 9] {
    [
        &ANIME,
        &ANIME_DESCRIPTION,
        &EPISODE,
        &FILE,
        &FILE_ANIME,
        &GROUP,
        &GROUP_STATUS,
        &CHARACTER,
        &CREATOR,
    ]
}
