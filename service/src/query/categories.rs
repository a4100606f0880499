//! [`Query`] collection related to multiple [`Category`]s.

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use futures::future;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{attribute, category, Category, Slug},
    infra::{cms, Cms},
    BatchPolicy, Service,
};

use super::{CmsQuery, Query};

/// Queries all the root [`Category`]s along with their subtrees.
pub type Roots = CmsQuery<By<Vec<Category>, ()>>;

/// [`Query`] collecting attribute [`Definition`]s of the [`Category`]s with
/// the provided [`Slug`]s.
///
/// Lookups are performed concurrently, while their results are merged in the
/// order of the provided [`Slug`]s. [`Definition`]s are deduplicated by
/// their [`DocumentId`], the first occurrence wins.
///
/// [`Definition`]: attribute::Definition
/// [`DocumentId`]: crate::domain::DocumentId
#[derive(Clone, Debug, Default, Eq, From, PartialEq)]
pub struct Attributes {
    /// [`Slug`]s of the [`Category`]s to collect attributes of.
    pub slugs: Vec<Slug>,
}

impl<C> Query<Attributes> for Service<C>
where
    C: Cms<
        Select<By<Option<Category>, Slug>>,
        Ok = Option<Category>,
        Err = Traced<cms::Error>,
    >,
{
    type Ok = Vec<attribute::Definition>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        Attributes { slugs }: Attributes,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let results = future::join_all(slugs.iter().map(|slug| async move {
            self.cms()
                .execute(Select(By::new(slug.clone())))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .and_then(|c| {
                    c.ok_or_else(|| tracerr::new!(E::NotFound(slug.clone())))
                })
        }))
        .await;

        let mut found = Vec::with_capacity(results.len());
        for res in results {
            match res {
                Ok(c) => found.push(c),
                Err(e) => match self.config().attributes_batch {
                    BatchPolicy::Propagate => return Err(e),
                    BatchPolicy::Skip => {
                        log::warn!("skipping category attributes: {e}");
                    }
                },
            }
        }

        Ok(category::inherited_attributes(&found))
    }
}

/// Error of [`Attributes`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Cms`] error.
    #[display("`Cms` operation failed: {_0}")]
    Cms(cms::Error),

    /// [`Category`] doesn't exist.
    #[display("`Category(slug: {_0})` does not exist")]
    #[from(ignore)]
    NotFound(#[error(not(source))] Slug),
}
