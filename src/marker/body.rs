//! marker/body - typed payload views.
//!
//! Each view is a thin wrapper over a parsed Marker that reads fixed fields at
//! payload-relative offsets. Marker::parse() already guaranteed the payload is at
//! least min_payload_length() for the type, so accessors are infallible and copy-free.
//!
//! Payload layouts:
//!   Preface      [database_id u64][collection_id u64]
//!   Document     [transaction_id u64][version u8][value ...]
//!   Transaction  [transaction_id u64]
//!   Structural   [version u8][value ...]

use super::number::read_field;
use super::types::{BodyLayout, MarkerType};
use super::view::Marker;

pub const PREFACE_OFF_DATABASE_ID: usize = 0;
pub const PREFACE_OFF_COLLECTION_ID: usize = 8;

pub const DOCUMENT_OFF_TRANSACTION_ID: usize = 0;
pub const DOCUMENT_OFF_VERSION: usize = 8;
pub const DOCUMENT_OFF_VALUE: usize = 9;

pub const TRANSACTION_OFF_TRANSACTION_ID: usize = 0;

pub const STRUCTURAL_OFF_VERSION: usize = 0;
pub const STRUCTURAL_OFF_VALUE: usize = 1;

/// Common surface of the typed views.
pub trait TypedView<'a>: Sized {
    /// Payload layout this view reads.
    const LAYOUT: BodyLayout;

    /// Wrap without checking the marker's layout.
    fn wrap(marker: Marker<'a>) -> Self;

    fn marker(&self) -> &Marker<'a>;

    /// Some(view) iff the marker's type uses this view's layout.
    fn from_marker(marker: Marker<'a>) -> Option<Self> {
        if marker.marker_type().layout() == Self::LAYOUT {
            Some(Self::wrap(marker))
        } else {
            None
        }
    }

    fn marker_type(&self) -> MarkerType {
        self.marker().marker_type()
    }

    fn tick(&self) -> u64 {
        self.marker().tick()
    }
}

macro_rules! typed_view {
    ($(#[$doc:meta])* $name:ident, $layout:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name<'a>(Marker<'a>);

        impl<'a> TypedView<'a> for $name<'a> {
            const LAYOUT: BodyLayout = $layout;

            #[inline]
            fn wrap(marker: Marker<'a>) -> Self {
                $name(marker)
            }

            #[inline]
            fn marker(&self) -> &Marker<'a> {
                &self.0
            }
        }
    };
}

typed_view!(
    /// Document preface: which database/collection the following documents belong to.
    PrefaceView,
    BodyLayout::Preface
);
typed_view!(
    /// Document and document deletion.
    DocumentView,
    BodyLayout::Document
);
typed_view!(
    /// Transaction begin/commit/abort.
    TransactionView,
    BodyLayout::Transaction
);
typed_view!(
    /// Collection/index/view/database lifecycle events.
    StructuralView,
    BodyLayout::Structural
);

impl<'a> PrefaceView<'a> {
    #[inline]
    pub fn database_id(&self) -> u64 {
        let p = self.0.payload();
        read_field(&p[PREFACE_OFF_DATABASE_ID..PREFACE_OFF_DATABASE_ID + 8])
    }

    #[inline]
    pub fn collection_id(&self) -> u64 {
        let p = self.0.payload();
        read_field(&p[PREFACE_OFF_COLLECTION_ID..PREFACE_OFF_COLLECTION_ID + 8])
    }
}

impl<'a> DocumentView<'a> {
    #[inline]
    pub fn transaction_id(&self) -> u64 {
        let p = self.0.payload();
        read_field(&p[DOCUMENT_OFF_TRANSACTION_ID..DOCUMENT_OFF_TRANSACTION_ID + 8])
    }

    /// Format version of the value blob.
    #[inline]
    pub fn version(&self) -> u8 {
        self.0.payload()[DOCUMENT_OFF_VERSION]
    }

    #[inline]
    pub fn value(&self) -> &'a [u8] {
        &self.0.payload()[DOCUMENT_OFF_VALUE..]
    }

    #[inline]
    pub fn is_deletion(&self) -> bool {
        self.0.marker_type() == MarkerType::DocumentDeletion
    }
}

impl<'a> TransactionView<'a> {
    #[inline]
    pub fn transaction_id(&self) -> u64 {
        let p = self.0.payload();
        read_field(&p[TRANSACTION_OFF_TRANSACTION_ID..TRANSACTION_OFF_TRANSACTION_ID + 8])
    }
}

impl<'a> StructuralView<'a> {
    #[inline]
    pub fn version(&self) -> u8 {
        self.0.payload()[STRUCTURAL_OFF_VERSION]
    }

    #[inline]
    pub fn value(&self) -> &'a [u8] {
        &self.0.payload()[STRUCTURAL_OFF_VALUE..]
    }
}

/// A parsed marker dispatched on its type.
#[derive(Debug, Clone, Copy)]
pub enum MarkerBody<'a> {
    Meta(Marker<'a>),
    Preface(PrefaceView<'a>),
    Document(DocumentView<'a>),
    Transaction(TransactionView<'a>),
    Structural(StructuralView<'a>),
}

impl<'a> MarkerBody<'a> {
    pub fn marker(&self) -> &Marker<'a> {
        match self {
            MarkerBody::Meta(m) => m,
            MarkerBody::Preface(v) => v.marker(),
            MarkerBody::Document(v) => v.marker(),
            MarkerBody::Transaction(v) => v.marker(),
            MarkerBody::Structural(v) => v.marker(),
        }
    }
}

impl<'a> Marker<'a> {
    /// Typed view matching this marker's type.
    pub fn body(&self) -> MarkerBody<'a> {
        let m = *self;
        match m.marker_type().layout() {
            BodyLayout::Meta => MarkerBody::Meta(m),
            BodyLayout::Preface => MarkerBody::Preface(PrefaceView::wrap(m)),
            BodyLayout::Document => MarkerBody::Document(DocumentView::wrap(m)),
            BodyLayout::Transaction => MarkerBody::Transaction(TransactionView::wrap(m)),
            BodyLayout::Structural => MarkerBody::Structural(StructuralView::wrap(m)),
        }
    }
}
