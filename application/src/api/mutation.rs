//! GraphQL [`Mutation`]s definitions.

use juniper::graphql_object;
use service::{command, Command as _};

use crate::{
    api::{self, category::CategoryError, listing},
    define_error, AsError, Context, Error,
};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Creates a new `Listing` as a `DRAFT`.
    ///
    /// Attribute values are validated against the `Attribute`s of all the
    /// specified `Category`s before anything is stored.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CATEGORY_NOT_EXISTS` - any of the specified `Category`s does not
    ///                           exist;
    /// - `INVALID_ATTRIBUTE_VALUES` - some attribute values are invalid, the
    ///                                `details` extension holds a message
    ///                                per attribute `documentId`;
    /// - `CMS_UNAVAILABLE` - the catalog storage failed to respond.
    #[tracing::instrument(
        skip_all,
        fields(
            categories = ?input
                .categories
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>(),
            gql.name = "createListing",
            kind = ?input.kind,
            otel.name = Self::SPAN_NAME,
            title = %input.title,
        ),
    )]
    pub async fn create_listing(
        input: listing::CreateInput,
        ctx: &Context,
    ) -> Result<api::Listing, Error> {
        let listing::CreateInput {
            title,
            description,
            price,
            address,
            kind,
            categories,
            attribute_values,
        } = input;

        ctx.service()
            .execute(command::CreateListing {
                title: title.into(),
                description: description.unwrap_or_default(),
                price,
                address,
                kind: kind.into(),
                categories: categories.into_iter().map(Into::into).collect(),
                attribute_values: attribute_values
                    .into_iter()
                    .flatten()
                    .map(|e| (e.document_id.into(), e.value.into()))
                    .collect(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Changes the status of the `Listing` with the specified `documentId`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LISTING_NOT_EXISTS` - the `Listing` with the specified `documentId`
    ///                          does not exist;
    /// - `CMS_UNAVAILABLE` - the catalog storage failed to respond.
    #[tracing::instrument(
        skip_all,
        fields(
            document_id = %document_id,
            gql.name = "updateListingStatus",
            otel.name = Self::SPAN_NAME,
            status = ?status,
        ),
    )]
    pub async fn update_listing_status(
        document_id: api::DocumentId,
        status: listing::Status,
        ctx: &Context,
    ) -> Result<api::Listing, Error> {
        ctx.service()
            .execute(command::UpdateListingStatus {
                document_id: document_id.into(),
                status: status.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the `Listing` with the specified `documentId` permanently.
    ///
    /// Always returns `true` on success.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LISTING_NOT_EXISTS` - the `Listing` with the specified `documentId`
    ///                          does not exist;
    /// - `CMS_UNAVAILABLE` - the catalog storage failed to respond.
    #[tracing::instrument(
        skip_all,
        fields(
            document_id = %document_id,
            gql.name = "deleteListing",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_listing(
        document_id: api::DocumentId,
        ctx: &Context,
    ) -> Result<bool, Error> {
        ctx.service()
            .execute(command::DeleteListing {
                document_id: document_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|()| true)
    }
}

define_error! {
    enum AttributeValuesError {
        #[code = "INVALID_ATTRIBUTE_VALUES"]
        #[status = BAD_REQUEST]
        #[message = "Some attribute values are invalid"]
        Invalid,
    }
}

impl AsError for command::create_listing::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Cms(e) => e.try_as_error(),
            Self::CategoryNotExists(slug) => Some(
                Error::from(CategoryError::NotExists)
                    .with_details([(slug.to_string(), "does not exist".into())]),
            ),
            Self::UnknownAttribute(id) => Some(
                Error::from(AttributeValuesError::Invalid).with_details([(
                    id.to_string(),
                    "does not belong to the specified categories".into(),
                )]),
            ),
            Self::Validation(errors) => Some(
                Error::from(AttributeValuesError::Invalid).with_details(
                    errors
                        .iter()
                        .map(|(id, msg)| (id.to_string(), msg.to_owned())),
                ),
            ),
        }
    }
}

impl AsError for command::update_listing_status::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Cms(e) => e.try_as_error(),
            Self::ListingNotExists(_) => {
                Some(listing::ListingError::NotExists.into())
            }
        }
    }
}

impl AsError for command::delete_listing::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Cms(e) => e.try_as_error(),
            Self::ListingNotExists(_) => {
                Some(listing::ListingError::NotExists.into())
            }
        }
    }
}
