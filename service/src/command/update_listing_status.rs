//! [`Command`] for updating a [`listing::Status`].

use common::operations::Update;
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{listing, DocumentId, Listing},
    infra::{cms, Cms},
    Service,
};

use super::Command;

/// [`Command`] for updating a [`listing::Status`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UpdateListingStatus {
    /// [`DocumentId`] of the [`Listing`] to update.
    pub document_id: DocumentId,

    /// New [`listing::Status`] of the [`Listing`].
    pub status: listing::Status,
}

impl<C> Command<UpdateListingStatus> for Service<C>
where
    C: Cms<
        Update<listing::StatusChange>,
        Ok = Option<Listing>,
        Err = Traced<cms::Error>,
    >,
{
    type Ok = Listing;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateListingStatus,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateListingStatus {
            document_id,
            status,
        } = cmd;

        self.cms()
            .execute(Update(listing::StatusChange {
                document_id: document_id.clone(),
                status,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ListingNotExists(document_id))
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`UpdateListingStatus`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Cms`] error.
    #[display("`Cms` operation failed: {_0}")]
    Cms(cms::Error),

    /// [`Listing`] doesn't exist.
    #[display("`Listing(documentId: {_0})` does not exist")]
    #[from(ignore)]
    ListingNotExists(#[error(not(source))] DocumentId),
}

#[cfg(test)]
mod spec {
    use crate::{
        command::Command as _,
        domain::{listing, DocumentId},
        infra::cms::memory::Memory,
        Config, Service,
    };

    use super::{ExecutionError, UpdateListingStatus};

    #[tokio::test]
    async fn publishes_existing_listing() {
        let svc = Service::new(Config::default(), Memory::catalog());
        let created = svc
            .execute(crate::command::CreateListing {
                title: listing::Title::new("Oak table").unwrap(),
                description: String::new(),
                price: None,
                address: "Riga".into(),
                kind: listing::Kind::Free,
                categories: vec!["furniture".parse().unwrap()],
                attribute_values: [].into(),
            })
            .await
            .unwrap();

        let updated = svc
            .execute(UpdateListingStatus {
                document_id: created.document_id.clone(),
                status: listing::Status::Active,
            })
            .await
            .unwrap();

        assert_eq!(updated.document_id, created.document_id);
        assert_eq!(updated.status, listing::Status::Active);
    }

    #[tokio::test]
    async fn reports_missing_listing() {
        let svc = Service::new(Config::default(), Memory::catalog());

        let err = svc
            .execute(UpdateListingStatus {
                document_id: DocumentId::new("ghost"),
                status: listing::Status::Sold,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::ListingNotExists(_)));
    }
}
