//! [`Category`]-related definitions.

use derive_more::From;
use juniper::graphql_object;
use service::domain::{self, category};

use crate::{api, define_error, Context};

/// Node of the category tree.
#[derive(Clone, Debug, From)]
pub struct Category(domain::Category);

/// Node of the category tree, along with its subtree.
#[graphql_object(context = Context)]
impl Category {
    /// Stable identifier of this `Category`.
    #[must_use]
    pub fn document_id(&self) -> api::DocumentId {
        self.0.document_id.clone().into()
    }

    /// URL-safe unique key of this `Category`.
    #[must_use]
    pub fn slug(&self) -> api::Slug {
        self.0.slug.clone().into()
    }

    /// Human-readable name of this `Category`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Depth of this `Category` in the fetched tree, root ones being at `0`.
    #[must_use]
    pub fn level(&self) -> i32 {
        i32::try_from(u32::from(self.0.level)).unwrap_or(i32::MAX)
    }

    /// Direct children of this `Category`.
    #[must_use]
    pub fn children(&self) -> Vec<Category> {
        self.0.children.iter().cloned().map(Self).collect()
    }

    /// Own `Attribute`s of this `Category`, excluding the inherited ones.
    #[must_use]
    pub fn attributes(&self) -> Vec<api::attribute::Attribute> {
        self.0.attributes.iter().cloned().map(Into::into).collect()
    }
}

/// Reference to a [`Category`] a [`Listing`] is placed into.
///
/// [`Listing`]: api::Listing
#[derive(Clone, Debug, From)]
pub struct Ref(category::Ref);

/// Reference to a `Category`.
#[graphql_object(name = "CategoryRef", context = Context)]
impl Ref {
    /// Stable identifier of the referenced `Category`.
    #[must_use]
    pub fn document_id(&self) -> api::DocumentId {
        self.0.document_id.clone().into()
    }

    /// URL-safe unique key of the referenced `Category`.
    #[must_use]
    pub fn slug(&self) -> api::Slug {
        self.0.slug.clone().into()
    }

    /// Human-readable name of the referenced `Category`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }
}

define_error! {
    enum CategoryError {
        #[code = "CATEGORY_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Category` with the specified slug does not exist"]
        NotExists,
    }
}
