//! [`Category`]-related [`Cms`] implementations.

use common::{
    operations::{By, Select},
    pagination::{FIRST_PAGE, MAX_PAGE_SIZE},
};
use serde_json::json;
use tracerr::Traced;

use crate::{
    domain::{category::Level, Category, Slug},
    infra::{
        cms::{
            self,
            strapi::{payload, query, transform_category_to_node, Query},
        },
        Cms, Strapi,
    },
};

/// API path of categories.
const PATH: &str = "categories";

impl Cms<Select<By<Vec<Category>, ()>>> for Strapi {
    type Ok = Vec<Category>;
    type Err = Traced<cms::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Category>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut roots = Vec::new();
        let mut page = FIRST_PAGE;
        loop {
            let query = Query::new()
                .filters(&json!({"parent": {"$null": true}}))
                .populate(&query::category_populate(self.category_depth))
                .sort("name:asc")
                .pagination(page, MAX_PAGE_SIZE);

            let resp: payload::Response<Vec<payload::Category>> = self
                .get(PATH, &query)
                .await
                .map_err(tracerr::map_from_and_wrap!(=> cms::Error))?;

            let last = resp.data.is_empty()
                || resp.meta.pagination.is_none_or(|p| page >= p.page_count);
            roots.extend(
                resp.data
                    .into_iter()
                    .map(|c| transform_category_to_node(c, Level::ROOT)),
            );
            if last {
                break;
            }
            page += 1;
        }
        Ok(roots)
    }
}

impl Cms<Select<By<Option<Category>, Slug>>> for Strapi {
    type Ok = Option<Category>;
    type Err = Traced<cms::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Category>, Slug>>,
    ) -> Result<Self::Ok, Self::Err> {
        let slug = by.into_inner();

        let query = Query::new()
            .filters(&json!({"slug": {"$eq": slug}}))
            .populate(&query::category_populate(self.category_depth))
            .pagination(FIRST_PAGE, 1);

        let resp: payload::Response<Vec<payload::Category>> = self
            .get(PATH, &query)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> cms::Error))?;

        // Looked up nodes are treated as roots of their own subtree.
        Ok(resp
            .data
            .into_iter()
            .next()
            .map(|c| transform_category_to_node(c, Level::ROOT)))
    }
}
