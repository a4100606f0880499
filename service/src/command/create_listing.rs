//! [`Command`] for creating a new [`Listing`].

use std::collections::HashMap;

use common::operations::{By, Delete, Insert, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        attribute, category,
        listing::{self, Status},
        Category, DocumentId, Listing, Slug,
    },
    infra::{cms, Cms},
    query, Service,
};

use super::Command;

/// [`Command`] for creating a new [`Listing`] as a [`Status::Draft`].
///
/// All the provided attribute values are validated against the attributes
/// of the provided categories before anything is sent to the [`Cms`]. If
/// storing the values fails, the created draft is deleted.
/// Attributes are merged the same way [`Attributes`] [`Query`] does it.
///
/// [`Attributes`]: query::categories::Attributes
/// [`Query`]: crate::Query
#[derive(Clone, Debug)]
pub struct CreateListing {
    /// [`listing::Title`] of the new [`Listing`].
    pub title: listing::Title,

    /// Description of the new [`Listing`].
    pub description: String,

    /// Asked price of the new [`Listing`], if any.
    pub price: Option<f64>,

    /// Location of the new [`Listing`].
    pub address: String,

    /// [`listing::Kind`] of the new [`Listing`].
    pub kind: listing::Kind,

    /// [`Slug`]s of the categories to place the new [`Listing`] into.
    pub categories: Vec<Slug>,

    /// Values of the category attributes by their [`DocumentId`]s.
    pub attribute_values: HashMap<DocumentId, attribute::Value>,
}

impl<C> Command<CreateListing> for Service<C>
where
    C: Cms<
            Select<By<Option<Category>, Slug>>,
            Ok = Option<Category>,
            Err = Traced<cms::Error>,
        > + Cms<Insert<listing::Draft>, Ok = Listing, Err = Traced<cms::Error>>
        + Cms<
            Insert<(DocumentId, Vec<listing::AttributeValue>)>,
            Ok = (),
            Err = Traced<cms::Error>,
        > + Cms<
            Delete<By<Listing, DocumentId>>,
            Ok = bool,
            Err = Traced<cms::Error>,
        >,
{
    type Ok = Listing;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateListing,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateListing {
            title,
            description,
            price,
            address,
            kind,
            categories: slugs,
            attribute_values: mut values,
        } = cmd;

        let mut categories = Vec::with_capacity(slugs.len());
        for slug in slugs {
            categories.push(
                self.execute(query::category::BySlug(slug))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?,
            );
        }
        let definitions = category::inherited_attributes(&categories);

        let unknown = values
            .keys()
            .find(|id| !definitions.iter().any(|d| &d.document_id == *id));
        if let Some(id) = unknown {
            return Err(tracerr::new!(E::UnknownAttribute(id.clone())));
        }

        let errors = attribute::validate_all(&definitions, &values);
        if !errors.is_empty() {
            log::debug!("rejecting `Listing` with invalid values: {errors}");
            return Err(tracerr::new!(E::Validation(errors)));
        }

        let mut listing = self
            .cms()
            .execute(Insert(listing::Draft {
                title,
                description,
                price,
                address,
                kind,
                status: Status::Draft,
                categories: categories.iter().map(Category::to_ref).collect(),
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let attribute_values = definitions
            .iter()
            .filter_map(|d| {
                let value = values.remove(&d.document_id)?;
                (!value.is_empty()).then(|| listing::AttributeValue {
                    attribute: d.to_ref(),
                    value,
                })
            })
            .collect::<Vec<_>>();
        if !attribute_values.is_empty() {
            let stored = self
                .cms()
                .execute(Insert((
                    listing.document_id.clone(),
                    attribute_values.clone(),
                )))
                .await;
            if let Err(e) = stored {
                if let Err(del) = self
                    .cms()
                    .execute(Delete(By::<Listing, _>::new(
                        listing.document_id.clone(),
                    )))
                    .await
                {
                    log::warn!(
                        "failed to remove `Listing(documentId: {})` left \
                         without attribute values: {del}",
                        listing.document_id,
                    );
                }
                return Err(e).map_err(tracerr::map_from_and_wrap!(=> E));
            }
        }
        listing.attribute_values = attribute_values;

        Ok(listing)
    }
}

/// Error of [`CreateListing`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Cms`] error.
    #[display("`Cms` operation failed: {_0}")]
    Cms(cms::Error),

    /// [`Category`] doesn't exist.
    #[display("`Category(slug: {_0})` does not exist")]
    #[from(ignore)]
    CategoryNotExists(#[error(not(source))] Slug),

    /// Value is provided for an attribute none of the categories has.
    #[display("`Attribute(documentId: {_0})` does not belong to categories")]
    #[from(ignore)]
    UnknownAttribute(#[error(not(source))] DocumentId),

    /// Some attribute values are invalid.
    #[display("Invalid attribute values: {_0}")]
    #[from(ignore)]
    Validation(#[error(not(source))] attribute::Errors),
}

impl From<query::category::ExecutionError> for ExecutionError {
    fn from(e: query::category::ExecutionError) -> Self {
        use query::category::ExecutionError as E;

        match e {
            E::Cms(e) => Self::Cms(e),
            E::NotFound(slug) => Self::CategoryNotExists(slug),
        }
    }
}

#[cfg(test)]
mod spec {
    use std::collections::HashMap;

    use crate::{
        command::Command as _,
        domain::{attribute::Value, listing, DocumentId, Slug},
        infra::cms::memory::Memory,
        Config, Service,
    };

    use super::{CreateListing, ExecutionError};

    fn cmd(categories: &[&str], values: &[(&str, Value)]) -> CreateListing {
        CreateListing {
            title: listing::Title::new("Red car").unwrap(),
            description: "Barely used".into(),
            price: Some(4200.0),
            address: "Berlin".into(),
            kind: listing::Kind::Sale,
            categories: categories
                .iter()
                .map(|s| Slug::new(*s).unwrap())
                .collect(),
            attribute_values: values
                .iter()
                .map(|(id, v)| (DocumentId::from(*id), v.clone()))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[tokio::test]
    async fn creates_draft_with_values() {
        let svc = Service::new(Config::default(), Memory::catalog());

        let listing = svc
            .execute(cmd(&["vehicles", "cars"], &[
                ("year-doc", Value::Number(2020.0)),
                ("condition-doc", "used".into()),
            ]))
            .await
            .unwrap();

        assert_eq!(listing.status, listing::Status::Draft);
        assert_eq!(listing.categories.len(), 2);
        assert_eq!(
            listing.attribute_value(&"year-doc".into()),
            Some(&Value::Number(2020.0)),
        );
        assert_eq!(svc.cms().listings_count(), 1);
        assert_eq!(svc.cms().values_count(), 2);
    }

    #[tokio::test]
    async fn sends_nothing_when_values_are_invalid() {
        let svc = Service::new(Config::default(), Memory::catalog());

        let err = svc
            .execute(cmd(&["cars"], &[
                ("year-doc", Value::Number(1800.0)),
                ("condition-doc", "broken".into()),
            ]))
            .await
            .unwrap_err();

        let ExecutionError::Validation(errors) = err.as_ref() else {
            panic!("expected validation error, got: {err}");
        };
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.get(&"year-doc".into()),
            Some("Year must be at least 1900"),
        );
        assert_eq!(
            errors.get(&"condition-doc".into()),
            Some("Invalid option for Condition: broken"),
        );
        assert_eq!(svc.cms().listings_count(), 0);
        assert_eq!(svc.cms().values_count(), 0);
    }

    #[tokio::test]
    async fn requires_mandatory_values() {
        let svc = Service::new(Config::default(), Memory::catalog());

        let err = svc.execute(cmd(&["cars"], &[])).await.unwrap_err();

        let ExecutionError::Validation(errors) = err.as_ref() else {
            panic!("expected validation error, got: {err}");
        };
        assert_eq!(
            errors.get(&"condition-doc".into()),
            Some("Condition is required"),
        );
        assert_eq!(
            errors.get(&"year-doc".into()),
            Some("Year must be at least 1900"),
        );
        assert_eq!(svc.cms().listings_count(), 0);
    }

    #[tokio::test]
    async fn rejects_foreign_attributes() {
        let svc = Service::new(Config::default(), Memory::catalog());

        let err = svc
            .execute(cmd(&["furniture"], &[("year-doc", 2020.0.into())]))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::UnknownAttribute(_)));
        assert_eq!(svc.cms().listings_count(), 0);
    }

    #[tokio::test]
    async fn rejects_unknown_categories() {
        let svc = Service::new(Config::default(), Memory::catalog());

        let err = svc.execute(cmd(&["boats"], &[])).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::CategoryNotExists(s) if s.as_ref() == "boats",
        ));
    }

    #[tokio::test]
    async fn removes_draft_when_values_are_not_stored() {
        let mut cms = Memory::catalog();
        cms.values_broken = true;
        let svc = Service::new(Config::default(), cms);

        let err = svc
            .execute(cmd(&["cars"], &[
                ("year-doc", Value::Number(2020.0)),
                ("condition-doc", "new".into()),
            ]))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::Cms(_)));
        assert_eq!(svc.cms().listings_count(), 0);
        assert_eq!(svc.cms().values_count(), 0);
    }

    #[tokio::test]
    async fn skips_empty_optional_values() {
        let svc = Service::new(Config::default(), Memory::catalog());

        let listing = svc
            .execute(cmd(&["furniture"], &[("material-doc", "  ".into())]))
            .await
            .unwrap();

        assert!(listing.attribute_values.is_empty());
        assert_eq!(svc.cms().values_count(), 0);
    }
}
