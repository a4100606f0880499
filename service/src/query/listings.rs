//! [`Query`] collection related to multiple [`Listing`]s.

use common::operations::By;

#[cfg(doc)]
use crate::domain::Listing;
use crate::read::listing::list;
#[cfg(doc)]
use crate::Query;

use super::CmsQuery;

/// Queries a [`list::Page`] of [`Listing`]s.
pub type List = CmsQuery<By<list::Page, list::Selector>>;
