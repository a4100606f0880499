//! Domain definitions.

pub mod attribute;
pub mod category;
pub mod listing;

use std::{str::FromStr, sync::LazyLock};

use derive_more::{AsRef, Display};
use regex::Regex;
use serde::{Deserialize, Serialize};

pub use self::{category::Category, listing::Listing};

/// Stable external identifier of a CMS document.
///
/// Survives re-publishing of the document, unlike its numeric ID, so is used
/// as the deduplication and merge key.
#[derive(
    AsRef,
    Clone,
    Debug,
    Deserialize,
    Display,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[as_ref(str)]
pub struct DocumentId(String);

impl DocumentId {
    /// Creates a new [`DocumentId`].
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// URL-safe unique key of a [`Category`] or a [`Listing`].
#[derive(
    AsRef,
    Clone,
    Debug,
    Deserialize,
    Display,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[as_ref(str)]
#[serde(try_from = "String")]
pub struct Slug(String);

impl Slug {
    /// Maximum length of a [`Slug`].
    pub const MAX_LEN: usize = 256;

    /// Creates a new [`Slug`] if the given `slug` is valid.
    #[must_use]
    pub fn new(slug: impl Into<String>) -> Option<Self> {
        let slug = slug.into();
        Self::check(&slug).then_some(Self(slug))
    }

    /// Checks whether the given `slug` is a valid [`Slug`].
    fn check(slug: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Slug`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[A-Za-z0-9._~-]+$").expect("valid regex")
        });

        let slug = slug.as_ref();
        slug.len() <= Self::MAX_LEN && REGEX.is_match(slug)
    }

    /// Returns this [`Slug`] as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Slug {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Slug`")
    }
}

impl TryFrom<String> for Slug {
    type Error = &'static str;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s).ok_or("invalid `Slug`")
    }
}

#[cfg(test)]
mod spec {
    use super::Slug;

    #[test]
    fn accepts_url_safe_slugs() {
        for s in ["cars", "used-cars", "bmw_x5", "v1.2", "A~b"] {
            assert!(Slug::new(s).is_some(), "{s}");
        }
    }

    #[test]
    fn rejects_unsafe_slugs() {
        for s in ["", "used cars", "cars/bmw", "ё", "a?b"] {
            assert!(Slug::new(s).is_none(), "{s}");
        }
        assert!(Slug::new("a".repeat(Slug::MAX_LEN + 1)).is_none());
    }
}
