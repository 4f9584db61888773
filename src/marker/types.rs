//! marker/types - marker type codes and per-type payload layout.
//!
//! Codes are 7-bit (1..=127): the high bit of header byte 0 is the extended-length flag.
//! 0 never names a marker; the segment scanner reads it as unwritten space.

use crate::error::FormatError;

/// Highest valid type code.
pub const MARKER_TYPE_MAX: u8 = 0x7F;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum MarkerType {
    // meta
    Header = 10,
    Footer = 11,
    Blank = 12,
    Prologue = 13,

    // documents
    DocumentPreface = 20,
    Document = 21,
    DocumentDeletion = 22,

    // transactions
    TransactionBegin = 30,
    TransactionCommit = 31,
    TransactionAbort = 32,

    // collections
    CollectionCreate = 40,
    CollectionDrop = 41,
    CollectionRename = 42,
    CollectionProperties = 43,

    // indexes
    IndexCreate = 50,
    IndexDrop = 51,

    // views
    ViewCreate = 55,
    ViewDrop = 56,

    // databases
    DatabaseCreate = 60,
    DatabaseDrop = 61,
}

/// Coarse grouping of marker types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerGroup {
    Meta,
    Document,
    Transaction,
    Collection,
    Index,
    View,
    Database,
}

/// Shape of the payload that follows the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyLayout {
    /// No fields.
    Meta,
    /// [database_id u64][collection_id u64]
    Preface,
    /// [transaction_id u64][version u8][value ...]
    Document,
    /// [transaction_id u64]
    Transaction,
    /// [version u8][value ...]
    Structural,
}

impl MarkerType {
    pub const ALL: [MarkerType; 20] = [
        MarkerType::Header,
        MarkerType::Footer,
        MarkerType::Blank,
        MarkerType::Prologue,
        MarkerType::DocumentPreface,
        MarkerType::Document,
        MarkerType::DocumentDeletion,
        MarkerType::TransactionBegin,
        MarkerType::TransactionCommit,
        MarkerType::TransactionAbort,
        MarkerType::CollectionCreate,
        MarkerType::CollectionDrop,
        MarkerType::CollectionRename,
        MarkerType::CollectionProperties,
        MarkerType::IndexCreate,
        MarkerType::IndexDrop,
        MarkerType::ViewCreate,
        MarkerType::ViewDrop,
        MarkerType::DatabaseCreate,
        MarkerType::DatabaseDrop,
    ];

    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Result<Self, FormatError> {
        MarkerType::ALL
            .iter()
            .copied()
            .find(|t| t.code() == code)
            .ok_or(FormatError::UnknownType(code))
    }

    pub fn group(self) -> MarkerGroup {
        use MarkerType::*;
        match self {
            Header | Footer | Blank | Prologue => MarkerGroup::Meta,
            DocumentPreface | Document | DocumentDeletion => MarkerGroup::Document,
            TransactionBegin | TransactionCommit | TransactionAbort => MarkerGroup::Transaction,
            CollectionCreate | CollectionDrop | CollectionRename | CollectionProperties => {
                MarkerGroup::Collection
            }
            IndexCreate | IndexDrop => MarkerGroup::Index,
            ViewCreate | ViewDrop => MarkerGroup::View,
            DatabaseCreate | DatabaseDrop => MarkerGroup::Database,
        }
    }

    pub fn layout(self) -> BodyLayout {
        use MarkerType::*;
        match self {
            Header | Footer | Blank | Prologue => BodyLayout::Meta,
            DocumentPreface => BodyLayout::Preface,
            Document | DocumentDeletion => BodyLayout::Document,
            TransactionBegin | TransactionCommit | TransactionAbort => BodyLayout::Transaction,
            _ => BodyLayout::Structural,
        }
    }

    /// Bytes of fixed per-type fields that precede the opaque (versioned) payload.
    pub fn static_length(self) -> usize {
        match self.layout() {
            BodyLayout::Meta => 0,
            BodyLayout::Preface => 16,
            BodyLayout::Document => 8,
            BodyLayout::Transaction => 0,
            BodyLayout::Structural => 0,
        }
    }

    /// Smallest payload the typed view of this type can be laid over.
    pub fn min_payload_length(self) -> usize {
        match self.layout() {
            BodyLayout::Meta => 0,
            BodyLayout::Preface => 16,
            BodyLayout::Document => 9,
            BodyLayout::Transaction => 8,
            BodyLayout::Structural => 1,
        }
    }

    pub fn name(self) -> &'static str {
        use MarkerType::*;
        match self {
            Header => "header",
            Footer => "footer",
            Blank => "blank",
            Prologue => "prologue",
            DocumentPreface => "document-preface",
            Document => "document",
            DocumentDeletion => "document-deletion",
            TransactionBegin => "transaction-begin",
            TransactionCommit => "transaction-commit",
            TransactionAbort => "transaction-abort",
            CollectionCreate => "collection-create",
            CollectionDrop => "collection-drop",
            CollectionRename => "collection-rename",
            CollectionProperties => "collection-properties",
            IndexCreate => "index-create",
            IndexDrop => "index-drop",
            ViewCreate => "view-create",
            ViewDrop => "view-drop",
            DatabaseCreate => "database-create",
            DatabaseDrop => "database-drop",
        }
    }
}

impl TryFrom<u8> for MarkerType {
    type Error = FormatError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        MarkerType::from_code(code)
    }
}

impl std::fmt::Display for MarkerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
