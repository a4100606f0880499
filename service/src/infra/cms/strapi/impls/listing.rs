//! [`Listing`]-related [`Cms`] implementations.

use common::{
    operations::{By, Delete, Insert, Select, Update},
    pagination::FIRST_PAGE,
};
use futures::future;
use serde_json::{json, Value as Json};
use tracerr::Traced;

use crate::{
    domain::{listing, DocumentId, Listing, Slug},
    infra::{
        cms::{
            self,
            strapi::{payload, query, Query},
        },
        Cms, Strapi,
    },
    read::listing::list,
};

/// API path of listings.
const PATH: &str = "listings";

/// API path of listing attribute values.
const VALUES_PATH: &str = "product-attribute-values";

impl Cms<Select<By<list::Page, list::Selector>>> for Strapi {
    type Ok = list::Page;
    type Err = Traced<cms::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<list::Page, list::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let resp: payload::Response<Vec<payload::Listing>> = self
            .get(PATH, &query::listings(by.inner()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> cms::Error))?;

        resp.try_into_page()
            .map_err(tracerr::from_and_wrap!(=> cms::Error))
    }
}

impl Cms<Select<By<Option<Listing>, Slug>>> for Strapi {
    type Ok = Option<Listing>;
    type Err = Traced<cms::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Listing>, Slug>>,
    ) -> Result<Self::Ok, Self::Err> {
        let slug = by.into_inner();

        let query = Query::new()
            .filters(&json!({"slug": {"$eq": slug}}))
            .populate(&query::listing_populate())
            .pagination(FIRST_PAGE, 1);

        let resp: payload::Response<Vec<payload::Listing>> = self
            .get(PATH, &query)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> cms::Error))?;

        resp.data
            .into_iter()
            .next()
            .map(Listing::try_from)
            .transpose()
            .map_err(tracerr::from_and_wrap!(=> cms::Error))
    }
}

impl Cms<Insert<listing::Draft>> for Strapi {
    type Ok = Listing;
    type Err = Traced<cms::Error>;

    async fn execute(
        &self,
        Insert(draft): Insert<listing::Draft>,
    ) -> Result<Self::Ok, Self::Err> {
        let query = Query::new().populate(&query::listing_populate());

        let resp: payload::Response<payload::Listing> = self
            .post(PATH, &query, payload::NewListing::from(&draft))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> cms::Error))?;

        Listing::try_from(resp.data)
            .map_err(tracerr::from_and_wrap!(=> cms::Error))
    }
}

impl Cms<Insert<(DocumentId, Vec<listing::AttributeValue>)>> for Strapi {
    type Ok = ();
    type Err = Traced<cms::Error>;

    async fn execute(
        &self,
        Insert((listing, values)): Insert<(
            DocumentId,
            Vec<listing::AttributeValue>,
        )>,
    ) -> Result<Self::Ok, Self::Err> {
        let query = Query::new();

        _ = future::try_join_all(values.iter().map(|v| {
            self.post::<payload::Response<Json>, _>(
                VALUES_PATH,
                &query,
                payload::NewAttributeValue {
                    listing: &listing,
                    attribute: &v.attribute.document_id,
                    value: payload::encode_value(&v.value),
                },
            )
        }))
        .await
        .map_err(tracerr::map_from_and_wrap!(=> cms::Error))?;

        Ok(())
    }
}

impl Cms<Update<listing::StatusChange>> for Strapi {
    type Ok = Option<Listing>;
    type Err = Traced<cms::Error>;

    async fn execute(
        &self,
        Update(change): Update<listing::StatusChange>,
    ) -> Result<Self::Ok, Self::Err> {
        let query = Query::new().populate(&query::listing_populate());

        let resp: payload::Response<payload::Listing> = match self
            .put(
                &format!("{PATH}/{}", change.document_id),
                &query,
                payload::StatusUpdate {
                    status: change.status,
                },
            )
            .await
        {
            Ok(resp) => resp,
            Err(e) if e.as_ref().is_not_found() => return Ok(None),
            Err(e) => {
                return Err(tracerr::map_from_and_wrap!(=> cms::Error)(e));
            }
        };

        Listing::try_from(resp.data)
            .map(Some)
            .map_err(tracerr::from_and_wrap!(=> cms::Error))
    }
}

impl Cms<Delete<By<Listing, DocumentId>>> for Strapi {
    type Ok = bool;
    type Err = Traced<cms::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Listing, DocumentId>>,
    ) -> Result<Self::Ok, Self::Err> {
        match self.delete(&format!("{PATH}/{}", by.inner())).await {
            Ok(()) => Ok(true),
            Err(e) if e.as_ref().is_not_found() => Ok(false),
            Err(e) => Err(tracerr::map_from_and_wrap!(=> cms::Error)(e)),
        }
    }
}
