//! [`Command`] for deleting a [`Listing`].

use common::operations::{By, Delete};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{DocumentId, Listing},
    infra::{cms, Cms},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Listing`] permanently.
#[derive(Clone, Debug, Eq, From, PartialEq)]
pub struct DeleteListing {
    /// [`DocumentId`] of the [`Listing`] to delete.
    pub document_id: DocumentId,
}

impl<C> Command<DeleteListing> for Service<C>
where
    C: Cms<
        Delete<By<Listing, DocumentId>>,
        Ok = bool,
        Err = Traced<cms::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        DeleteListing { document_id }: DeleteListing,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let deleted = self
            .cms()
            .execute(Delete(By::new(document_id.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if !deleted {
            return Err(tracerr::new!(E::ListingNotExists(document_id)));
        }
        Ok(())
    }
}

/// Error of [`DeleteListing`] [`Command`] execution.
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
