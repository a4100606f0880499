//! [`Listing`] definitions.

use std::str::FromStr;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, Into};
use serde::{Deserialize, Serialize};

use super::{attribute, category};
pub use super::{DocumentId, Slug};

/// Item offered on the marketplace.
#[derive(Clone, Debug, PartialEq)]
pub struct Listing {
    /// ID of this [`Listing`].
    pub id: Id,

    /// [`DocumentId`] of this [`Listing`].
    pub document_id: DocumentId,

    /// [`Title`] of this [`Listing`].
    pub title: Title,

    /// Free-form description of this [`Listing`].
    pub description: String,

    /// Asked price of this [`Listing`], if any.
    pub price: Option<f64>,

    /// Location of this [`Listing`].
    pub address: String,

    /// [`Slug`] of this [`Listing`].
    pub slug: Slug,

    /// [`Status`] of this [`Listing`].
    pub status: Status,

    /// [`Kind`] of this [`Listing`].
    pub kind: Kind,

    /// [`Image`]s of this [`Listing`].
    pub images: Vec<Image>,

    /// Categories this [`Listing`] is placed into.
    pub categories: Vec<category::Ref>,

    /// Values of the category attributes of this [`Listing`].
    pub attribute_values: Vec<AttributeValue>,

    /// [`DateTime`] when this [`Listing`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Listing`] was last modified.
    pub updated_at: ModificationDateTime,
}

impl Listing {
    /// Returns the [`attribute::Value`] of the attribute with the provided
    /// [`DocumentId`], if this [`Listing`] has one.
    #[must_use]
    pub fn attribute_value(&self, id: &DocumentId) -> Option<&attribute::Value> {
        self.attribute_values
            .iter()
            .find(|v| &v.attribute.document_id == id)
            .map(|v| &v.value)
    }
}

/// New [`Listing`] to be stored, before the CMS assigns it an identity.
#[derive(Clone, Debug, PartialEq)]
pub struct Draft {
    /// [`Title`] of the new [`Listing`].
    pub title: Title,

    /// Free-form description of the new [`Listing`].
    pub description: String,

    /// Asked price of the new [`Listing`], if any.
    pub price: Option<f64>,

    /// Location of the new [`Listing`].
    pub address: String,

    /// [`Kind`] of the new [`Listing`].
    pub kind: Kind,

    /// Initial [`Status`] of the new [`Listing`].
    pub status: Status,

    /// Categories to place the new [`Listing`] into.
    pub categories: Vec<category::Ref>,
}

/// Change of a [`Listing`] [`Status`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StatusChange {
    /// [`DocumentId`] of the changed [`Listing`].
    pub document_id: DocumentId,

    /// New [`Status`] of the [`Listing`].
    pub status: Status,
}

/// ID of a [`Listing`].
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
pub struct Id(u64);

/// Title of a [`Listing`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Title(String);

impl Title {
    /// Maximum length of a [`Title`] in characters.
    pub const MAX_LEN: usize = 255;

    /// Creates a new [`Title`] if the given `title` is valid.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Option<Self> {
        let title = title.into();
        Self::check(&title).then_some(Self(title))
    }

    /// Checks whether the given `title` is a valid [`Title`].
    fn check(title: impl AsRef<str>) -> bool {
        let title = title.as_ref();
        title.trim() == title
            && !title.is_empty()
            && title.chars().count() <= Self::MAX_LEN
    }
}

impl FromStr for Title {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Title`")
    }
}

define_kind! {
    #[doc = "Lifecycle status of a [`Listing`]."]
    enum Status {
        #[doc = "Visible to everyone."]
        Active = "ACTIVE",

        #[doc = "Not published yet."]
        Draft = "DRAFT",

        #[doc = "Sold out and kept for history."]
        Sold = "SOLD",

        #[doc = "Withdrawn by its owner."]
        Archived = "ARCHIVED",
    }
}

define_kind! {
    #[doc = "Kind of a [`Listing`] deal."]
    enum Kind {
        #[doc = "Offered for rent."]
        Rent = "rent",

        #[doc = "Offered for sale."]
        Sale = "sale",

        #[doc = "Given away for free."]
        Free = "free",
    }
}

/// Image of a [`Listing`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Image {
    /// ID of this [`Image`] in the CMS media library.
    pub id: u64,

    /// URL this [`Image`] is served from.
    pub url: String,

    /// Alternative text of this [`Image`], if any.
    pub alternative_text: Option<String>,

    /// Width of this [`Image`] in pixels, if known.
    pub width: Option<u32>,

    /// Height of this [`Image`] in pixels, if known.
    pub height: Option<u32>,
}

/// Value of a category attribute of a [`Listing`].
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeValue {
    /// Attribute this value belongs to.
    pub attribute: attribute::Ref,

    /// The value itself.
    pub value: attribute::Value,
}

/// [`DateTime`] when a [`Listing`] was created.
pub type CreationDateTime = DateTimeOf<(Listing, unit::Creation)>;

/// [`DateTime`] when a [`Listing`] was last modified.
pub type ModificationDateTime = DateTimeOf<(Listing, unit::Modification)>;
