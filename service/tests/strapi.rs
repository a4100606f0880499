//! HTTP-level tests of the Strapi client.

#![cfg(feature = "strapi")]

use std::{collections::HashMap, time::Duration};

use common::operations::{By, Delete, Insert, Select, Update};
use serde_json::json;
use service::{
    command,
    domain::{category::Level, listing, Category, DocumentId, Listing, Slug},
    infra::{cms, strapi, Cms as _, Strapi},
    read::listing::list,
    Command as _, Config, Service,
};
use wiremock::{
    matchers::{body_partial_json, header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

async fn client(server: &MockServer) -> Strapi {
    Strapi::new(strapi::Config {
        url: format!("{}/", server.uri()),
        token: Some("s3cr3t".to_owned().into()),
        timeout: Duration::from_secs(5),
        ..strapi::Config::default()
    })
    .unwrap()
}

fn category(slug: &str, children: serde_json::Value) -> serde_json::Value {
    json!({
        "id": 1,
        "documentId": format!("{slug}-doc"),
        "slug": slug,
        "name": slug,
        "children": children,
        "attributes": [{
            "id": 2,
            "documentId": format!("{slug}-attr"),
            "name": "Condition",
            "type": "select",
            "required": true,
            "options": ["new", "used"],
            "metadata": null,
        }],
    })
}

fn listing(status: &str) -> serde_json::Value {
    json!({
        "id": 5,
        "documentId": "table-doc",
        "title": "Oak table",
        "description": "Solid",
        "price": 100,
        "address": "Riga",
        "slug": "oak-table",
        "status": status,
        "type": "sale",
        "images": null,
        "categories": [],
        "product_attribute_values": [],
        "createdAt": "2024-05-01T10:00:00.000Z",
        "updatedAt": "2024-05-01T10:00:00.000Z",
    })
}

fn transport_status(err: &cms::Error) -> Option<u16> {
    match err {
        cms::Error::Strapi(strapi::Error::Transport { status, .. }) => {
            Some(status.as_u16())
        }
        _ => None,
    }
}

#[tokio::test]
async fn fetches_root_categories_with_levels() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .and(query_param("filters[parent][$null]", "true"))
        .and(header("authorization", "Bearer s3cr3t"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [category(
                "vehicles",
                json!([category("cars", json!([category("sedans", json!([]))]))]),
            )],
            "meta": {},
        })))
        .expect(1)
        .mount(&server)
        .await;

    let roots = client(&server)
        .await
        .execute(Select(By::<Vec<Category>, _>::new(())))
        .await
        .unwrap();

    assert_eq!(roots.len(), 1);
    let cars = &roots[0].children[0];
    assert_eq!(roots[0].level, Level::ROOT);
    assert_eq!(cars.level, Level::from(1));
    assert_eq!(cars.children[0].level, Level::from(2));
    assert_eq!(cars.attributes[0].options, ["new", "used"]);
}

#[tokio::test]
async fn pages_through_root_categories() {
    let server = MockServer::start().await;
    for (page, slug) in [("1", "furniture"), ("2", "vehicles")] {
        Mock::given(method("GET"))
            .and(path("/api/categories"))
            .and(query_param("filters[parent][$null]", "true"))
            .and(query_param("pagination[page]", page))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [category(slug, json!([]))],
                "meta": {"pagination": {
                    "page": page.parse::<u32>().unwrap(),
                    "pageSize": 1,
                    "pageCount": 2,
                    "total": 2,
                }},
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let roots = client(&server)
        .await
        .execute(Select(By::<Vec<Category>, _>::new(())))
        .await
        .unwrap();

    let slugs = roots.iter().map(|c| c.slug.as_ref()).collect::<Vec<&str>>();
    assert_eq!(slugs, ["furniture", "vehicles"]);
}

#[tokio::test]
async fn looks_up_category_by_slug() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .and(query_param("filters[slug][$eq]", "boats"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": []})),
        )
        .mount(&server)
        .await;

    let found = client(&server)
        .await
        .execute(Select(By::<Option<Category>, _>::new(
            Slug::new("boats").unwrap(),
        )))
        .await
        .unwrap();

    assert!(found.is_none());
}

#[tokio::test]
async fn lists_listings_with_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/listings"))
        .and(query_param("filters[price][$gte]", "100"))
        .and(query_param("filters[categories][slug][$eq]", "furniture"))
        .and(query_param("pagination[page]", "1"))
        .and(query_param("pagination[pageSize]", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [listing("ACTIVE")],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client(&server)
        .await
        .execute(Select(By::<list::Page, _>::new(list::Selector {
            arguments: list::Arguments::default(),
            filter: list::Filter {
                category: Some("furniture".into()),
                price: Some(list::PriceRange {
                    gte: Some(100.0),
                    lte: None,
                }),
                ..list::Filter::default()
            },
        })))
        .await
        .unwrap();

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].price, Some(100.0));
    assert!(page.items[0].images.is_empty());
    assert_eq!(page.pagination.page, 1);
    assert_eq!(page.pagination.page_size, 1);
    assert_eq!(page.pagination.page_count, 1);
    assert_eq!(page.pagination.total, 1);
}

#[tokio::test]
async fn surfaces_status_and_body_of_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/listings"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client(&server)
        .await
        .execute(Select(By::<Option<Listing>, _>::new(
            Slug::new("oak-table").unwrap(),
        )))
        .await
        .unwrap_err();

    let cms::Error::Strapi(strapi::Error::Transport { status, body }) =
        err.as_ref()
    else {
        panic!("expected transport error, got: {err}");
    };
    assert_eq!(status.as_u16(), 500);
    assert_eq!(body, "boom");
}

#[tokio::test]
async fn creates_listing_wrapped_into_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/listings"))
        .and(body_partial_json(json!({"data": {
            "title": "Oak table",
            "status": "DRAFT",
            "type": "sale",
        }})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": listing("DRAFT"),
            "meta": {},
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/product-attribute-values"))
        .and(body_partial_json(json!({"data": {
            "listing": "table-doc",
            "attribute": "material-doc",
            "value": "oak",
        }})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"data": {}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let strapi = client(&server).await;
    let created = strapi
        .execute(Insert(listing::Draft {
            title: listing::Title::new("Oak table").unwrap(),
            description: "Solid".into(),
            price: Some(100.0),
            address: "Riga".into(),
            kind: listing::Kind::Sale,
            status: listing::Status::Draft,
            categories: vec![],
        }))
        .await
        .unwrap();
    assert_eq!(created.status, listing::Status::Draft);

    strapi
        .execute(Insert((created.document_id, vec![listing::AttributeValue {
            attribute: service::domain::attribute::Ref {
                document_id: "material-doc".into(),
                name: "Material".into(),
                kind: service::domain::attribute::Kind::Text,
            },
            value: "oak".into(),
        }])))
        .await
        .unwrap();
}

#[tokio::test]
async fn deletes_draft_whose_values_are_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .and(query_param("filters[slug][$eq]", "tables"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [category("tables", json!([]))],
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/listings"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": listing("DRAFT"),
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/product-attribute-values"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/listings/table-doc"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let svc = Service::new(Config::default(), client(&server).await);
    let err = svc
        .execute(command::CreateListing {
            title: listing::Title::new("Oak table").unwrap(),
            description: "Solid".into(),
            price: Some(100.0),
            address: "Riga".into(),
            kind: listing::Kind::Sale,
            categories: vec![Slug::new("tables").unwrap()],
            attribute_values: HashMap::from([(
                DocumentId::new("tables-attr"),
                "new".into(),
            )]),
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err.as_ref(),
        command::create_listing::ExecutionError::Cms(_),
    ));
}

#[tokio::test]
async fn treats_missing_listing_as_absent() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/listings/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"status": 404, "name": "NotFoundError"},
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/listings/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/listings/table-doc"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let strapi = client(&server).await;

    let updated = strapi
        .execute(Update(listing::StatusChange {
            document_id: DocumentId::new("ghost"),
            status: listing::Status::Active,
        }))
        .await
        .unwrap();
    assert!(updated.is_none());

    let deleted = strapi
        .execute(Delete(By::<Listing, _>::new(DocumentId::new("ghost"))))
        .await
        .unwrap();
    assert!(!deleted);

    let deleted = strapi
        .execute(Delete(By::<Listing, _>::new(DocumentId::new("table-doc"))))
        .await
        .unwrap();
    assert!(deleted);
}

#[tokio::test]
async fn propagates_server_errors_of_updates() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/listings/table-doc"))
        .respond_with(ResponseTemplate::new(403).set_body_string("nope"))
        .mount(&server)
        .await;

    let err = client(&server)
        .await
        .execute(Update(listing::StatusChange {
            document_id: DocumentId::new("table-doc"),
            status: listing::Status::Sold,
        }))
        .await
        .unwrap_err();

    assert_eq!(transport_status(err.as_ref()), Some(403));
}
