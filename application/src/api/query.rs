//! GraphQL [`Query`]s definitions.

use juniper::graphql_object;
use service::{filter, query, read, Query as _};

use crate::{
    api::{self, attribute::Attribute, category::CategoryError, listing},
    AsError, Context, Error,
};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns all the root `Category`s along with their subtrees.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CMS_UNAVAILABLE` - the catalog storage failed to respond.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "rootCategories",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn root_categories(
        ctx: &Context,
    ) -> Result<Vec<api::Category>, Error> {
        ctx.service()
            .execute(query::categories::Roots::by(()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|roots| roots.into_iter().map(Into::into).collect())
    }

    /// Returns the `Category` with the specified slug, along with its
    /// subtree.
    ///
    /// The returned `Category` is treated as a root, so has `level` of `0`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CATEGORY_NOT_EXISTS` - the `Category` with the specified slug does
    ///                           not exist;
    /// - `CMS_UNAVAILABLE` - the catalog storage failed to respond.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "category",
            otel.name = Self::SPAN_NAME,
            slug = %slug,
        ),
    )]
    pub async fn category(
        slug: api::Slug,
        ctx: &Context,
    ) -> Result<api::Category, Error> {
        ctx.service()
            .execute(query::category::BySlug(slug.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Attribute`s of the `Category`s with the specified slugs.
    ///
    /// `Attribute`s are merged in the order of the specified slugs, each
    /// `Attribute` being returned only once.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CATEGORY_NOT_EXISTS` - any of the `Category`s does not exist;
    /// - `CMS_UNAVAILABLE` - the catalog storage failed to respond.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "categoryAttributes",
            otel.name = Self::SPAN_NAME,
            slugs = ?slugs.iter().map(ToString::to_string).collect::<Vec<_>>(),
        ),
    )]
    pub async fn category_attributes(
        slugs: Vec<api::Slug>,
        ctx: &Context,
    ) -> Result<Vec<Attribute>, Error> {
        ctx.service()
            .execute(query::categories::Attributes {
                slugs: slugs.into_iter().map(Into::into).collect(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|defs| defs.into_iter().map(Into::into).collect())
    }

    /// Fetches the page of `Listing`s matching the specified filter.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_PAGINATION` - the pagination arguments are out of range;
    /// - `CMS_UNAVAILABLE` - the catalog storage failed to respond.
    #[tracing::instrument(
        skip_all,
        fields(
            filter = ?filter,
            gql.name = "listings",
            otel.name = Self::SPAN_NAME,
            page = ?page,
            page_size = ?page_size,
        ),
    )]
    pub async fn listings(
        page: Option<i32>,
        page_size: Option<i32>,
        filter: Option<listing::list::Filter>,
        ctx: &Context,
    ) -> Result<listing::list::Page, Error> {
        let arguments = read::listing::list::Arguments::new(
            page,
            page_size,
            ctx.service().config().default_page_size,
        )
        .ok_or_else(|| api::PaginationError::Invalid.into())
        .map_err(ctx.error())?;

        let manager = filter.unwrap_or_default().into_manager();

        ctx.service()
            .execute(query::listings::List::by(filter::to_strapi_query_with(
                &manager, arguments,
            )))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Listing` with the specified slug.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LISTING_NOT_EXISTS` - the `Listing` with the specified slug does
    ///                          not exist;
    /// - `CMS_UNAVAILABLE` - the catalog storage failed to respond.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "listing",
            otel.name = Self::SPAN_NAME,
            slug = %slug,
        ),
    )]
    pub async fn listing(
        slug: api::Slug,
        ctx: &Context,
    ) -> Result<api::Listing, Error> {
        ctx.service()
            .execute(query::listing::BySlug(slug.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

impl AsError for query::category::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Cms(e) => e.try_as_error(),
            Self::NotFound(_) => Some(CategoryError::NotExists.into()),
        }
    }
}

impl AsError for query::categories::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Cms(e) => e.try_as_error(),
            Self::NotFound(slug) => Some(
                Error::from(CategoryError::NotExists)
                    .with_details([(slug.to_string(), "does not exist".into())]),
            ),
        }
    }
}

impl AsError for query::listing::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Cms(e) => e.try_as_error(),
            Self::NotFound(_) => Some(listing::ListingError::NotExists.into()),
        }
    }
}
