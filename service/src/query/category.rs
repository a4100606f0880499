//! [`Query`] collection related to a single [`Category`].

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{Category, Slug},
    infra::{cms, Cms},
    Service,
};

use super::Query;

/// Queries a [`Category`] by its [`Slug`], along with its subtree.
///
/// The found [`Category`] is treated as a root of its own subtree.
#[derive(Clone, Debug, Eq, From, PartialEq)]
pub struct BySlug(pub Slug);

impl<C> Query<BySlug> for Service<C>
where
    C: Cms<
        Select<By<Option<Category>, Slug>>,
        Ok = Option<Category>,
        Err = Traced<cms::Error>,
    >,
{
    type Ok = Category;
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

    /// [`Category`] doesn't exist.
    #[display("`Category(slug: {_0})` does not exist")]
    #[from(ignore)]
    NotFound(#[error(not(source))] Slug),
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::Slug, infra::cms::memory::Memory, query::Query as _, Config,
        Service,
    };

    use super::{BySlug, ExecutionError};

    #[tokio::test]
    async fn finds_nested_category() {
        let svc = Service::new(Config::default(), Memory::catalog());

        let cars = svc
            .execute(BySlug(Slug::new("cars").unwrap()))
            .await
            .unwrap();

        assert_eq!(cars.name, "CARS");
        assert_eq!(cars.attributes.len(), 2);
    }

    #[tokio::test]
    async fn reports_missing_category() {
        let svc = Service::new(Config::default(), Memory::catalog());

        let err = svc
            .execute(BySlug(Slug::new("boats").unwrap()))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::NotFound(_)));
        assert_eq!(err.to_string(), "`Category(slug: boats)` does not exist");
    }
}
