//! GraphQL API definitions.

pub mod attribute;
pub mod category;
pub mod listing;
mod mutation;
mod query;
pub mod scalar;

use derive_more::{AsRef, Display, From, Into};
use juniper::{EmptySubscription, GraphQLScalar};
use service::domain;

use crate::{define_error, Context};

pub use self::{
    category::Category, listing::Listing, mutation::Mutation, query::Query,
};

/// GraphQL schema.
pub type Schema =
    juniper::RootNode<'static, Query, Mutation, EmptySubscription<Context>>;

/// Creates a new [`Schema`].
#[must_use]
pub fn schema() -> Schema {
    Schema::new(Query, Mutation, EmptySubscription::new())
}

/// URL-safe unique key of a `Category` or a `Listing`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(with = scalar::Via::<domain::Slug>)]
pub struct Slug(domain::Slug);

/// Stable identifier of a CMS document.
#[derive(Clone, Debug, Display, GraphQLScalar)]
#[graphql(transparent)]
pub struct DocumentId(String);

impl From<domain::DocumentId> for DocumentId {
    fn from(id: domain::DocumentId) -> Self {
        Self(id.as_ref().to_owned())
    }
}

impl From<DocumentId> for domain::DocumentId {
    fn from(id: DocumentId) -> Self {
        Self::new(id.0)
    }
}

define_error! {
    enum PaginationError {
        #[code = "INVALID_PAGINATION"]
        #[status = BAD_REQUEST]
        #[message = "`page` must be positive and `pageSize` must be within \
                     1..=100"]
        Invalid,
    }
}

#[cfg(test)]
mod spec {
    use super::schema;

    #[test]
    fn renders_sdl() {
        let sdl = schema().as_sdl();

        assert!(sdl.contains("type Query"));
        assert!(sdl.contains("rootCategories"));
        assert!(sdl.contains("createListing"));
        assert!(sdl.contains("scalar ListingTitle"));
    }
}
