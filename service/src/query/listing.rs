//! [`Query`] collection related to a single [`Listing`].

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{Listing, Slug},
    infra::{cms, Cms},
    Service,
};

use super::Query;

/// Queries a [`Listing`] by its [`Slug`].
#[derive(Clone, Debug, Eq, From, PartialEq)]
pub struct BySlug(pub Slug);

impl<C> Query<BySlug> for Service<C>
where
    C: Cms<
        Select<By<Option<Listing>, Slug>>,
        Ok = Option<Listing>,
        Err = Traced<cms::Error>,
    >,
{
    type Ok = Listing;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        BySlug(slug): BySlug,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        self.cms()
            .execute(Select(By::new(slug.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::NotFound(slug))
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`BySlug`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Cms`] error.
    #[display("`Cms` operation failed: {_0}")]
    Cms(cms::Error),

    /// [`Listing`] doesn't exist.
    #[display("`Listing(slug: {_0})` does not exist")]
    #[from(ignore)]
    NotFound(#[error(not(source))] Slug),
}
