//! In-memory [`Cms`] used in tests.

use std::sync::Mutex;

use common::{
    operations::{By, Delete, Insert, Select, Update},
    pagination::Page,
    DateTime,
};
use tracerr::Traced;

use crate::{
    domain::{
        attribute::{self, Kind},
        category, listing, Category, DocumentId, Listing, Slug,
    },
    infra::{cms, Cms},
    read::listing::list,
};

/// In-memory [`Cms`] holding a fixed category tree and mutable listings.
#[derive(Debug, Default)]
pub(crate) struct Memory {
    /// Root [`Category`]s.
    pub(crate) roots: Vec<Category>,

    /// Slugs whose lookup fails with a transport error.
    pub(crate) broken: Vec<Slug>,

    /// Stored [`Listing`]s.
    pub(crate) listings: Mutex<Vec<Listing>>,

    /// Stored attribute values by the listing they belong to.
    pub(crate) values: Mutex<Vec<(DocumentId, listing::AttributeValue)>>,

    /// Indicator whether storing attribute values fails.
    pub(crate) values_broken: bool,
}

impl Memory {
    /// Creates a new [`Memory`] with the provided root [`Category`]s.
    pub(crate) fn new(roots: Vec<Category>) -> Self {
        Self {
            roots,
            ..Self::default()
        }
    }

    /// Creates a new [`Memory`] holding the [`catalog()`].
    pub(crate) fn catalog() -> Self {
        Self::new(catalog())
    }

    /// Returns a [`Listing`] count.
    pub(crate) fn listings_count(&self) -> usize {
        self.listings.lock().expect("not poisoned").len()
    }

    /// Returns the stored attribute values count.
    pub(crate) fn values_count(&self) -> usize {
        self.values.lock().expect("not poisoned").len()
    }
}

/// Builds an attribute [`attribute::Definition`].
pub(crate) fn attribute(
    doc: &str,
    name: &str,
    kind: Kind,
    required: bool,
    options: &[&str],
) -> attribute::Definition {
    attribute::Definition {
        id: 1.into(),
        document_id: doc.into(),
        name: name.into(),
        kind,
        required,
        options: options.iter().map(ToString::to_string).collect(),
        metadata: attribute::Metadata::default(),
    }
}

/// Builds a [`Category`] node.
pub(crate) fn node(
    slug: &str,
    level: u32,
    children: Vec<Category>,
    attributes: Vec<attribute::Definition>,
) -> Category {
    Category {
        id: 1.into(),
        document_id: format!("{slug}-doc").into(),
        slug: Slug::new(slug).expect("valid slug"),
        name: slug.to_uppercase(),
        level: level.into(),
        children,
        attributes,
    }
}

/// Returns a category tree of `vehicles` (with `cars` and `bikes`) and
/// `furniture`.
///
/// `vehicles` and `cars` share the `condition` attribute.
pub(crate) fn catalog() -> Vec<Category> {
    let condition = || {
        attribute("condition-doc", "Condition", Kind::Select, true, &[
            "new", "used",
        ])
    };
    let mut year = attribute("year-doc", "Year", Kind::Number, true, &[]);
    year.metadata = [("minimum", 1900.0), ("maximum", 2100.0)]
        .into_iter()
        .collect();

    vec![
        node(
            "vehicles",
            0,
            vec![
                node("cars", 1, vec![], vec![year, condition()]),
                node("bikes", 1, vec![], vec![attribute(
                    "color-doc",
                    "Color",
                    Kind::MultiSelect,
                    false,
                    &["red", "blue"],
                )]),
            ],
            vec![condition()],
        ),
        node("furniture", 0, vec![], vec![attribute(
            "material-doc",
            "Material",
            Kind::Text,
            false,
            &[],
        )]),
    ]
}

/// Builds a failure of the provided `slug` lookup.
fn failure(slug: &Slug) -> Traced<cms::Error> {
    tracerr::new!(cms::Error::Memory(format!("cannot look up `{slug}`")))
}

impl Cms<Select<By<Vec<Category>, ()>>> for Memory {
    type Ok = Vec<Category>;
    type Err = Traced<cms::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Category>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.roots.clone())
    }
}

impl Cms<Select<By<Option<Category>, Slug>>> for Memory {
    type Ok = Option<Category>;
    type Err = Traced<cms::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Category>, Slug>>,
    ) -> Result<Self::Ok, Self::Err> {
        let slug = by.into_inner();
        if self.broken.contains(&slug) {
            return Err(failure(&slug));
        }
        Ok(category::find(&self.roots, &slug).cloned())
    }
}

impl Cms<Select<By<list::Page, list::Selector>>> for Memory {
    type Ok = list::Page;
    type Err = Traced<cms::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<list::Page, list::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = &by.inner().filter;
        let items = self
            .listings
            .lock()
            .expect("not poisoned")
            .iter()
            .filter(|l| {
                filter.category.as_ref().is_none_or(|c| {
                    l.categories.iter().any(|r| r.slug.as_ref() == c)
                })
            })
            .cloned()
            .collect();
        Ok(Page::new(items, None))
    }
}

impl Cms<Select<By<Option<Listing>, Slug>>> for Memory {
    type Ok = Option<Listing>;
    type Err = Traced<cms::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Listing>, Slug>>,
    ) -> Result<Self::Ok, Self::Err> {
        let slug = by.into_inner();
        Ok(self
            .listings
            .lock()
            .expect("not poisoned")
            .iter()
            .find(|l| l.slug == slug)
            .cloned())
    }
}

impl Cms<Insert<listing::Draft>> for Memory {
    type Ok = Listing;
    type Err = Traced<cms::Error>;

    async fn execute(
        &self,
        Insert(draft): Insert<listing::Draft>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut listings = self.listings.lock().expect("not poisoned");

        let n = listings.len() + 1;
        let now = DateTime::now();
        let slug = Slug::new(format!("listing-{n}")).expect("valid slug");
        let listing = Listing {
            id: u64::try_from(n).expect("fits").into(),
            document_id: DocumentId::new(format!("listing-doc-{n}")),
            title: draft.title,
            description: draft.description,
            price: draft.price,
            address: draft.address,
            slug,
            status: draft.status,
            kind: draft.kind,
            images: vec![],
            categories: draft.categories,
            attribute_values: vec![],
            created_at: now.coerce(),
            updated_at: now.coerce(),
        };
        listings.push(listing.clone());
        Ok(listing)
    }
}

impl Cms<Insert<(DocumentId, Vec<listing::AttributeValue>)>> for Memory {
    type Ok = ();
    type Err = Traced<cms::Error>;

    async fn execute(
        &self,
        Insert((id, values)): Insert<(
            DocumentId,
            Vec<listing::AttributeValue>,
        )>,
    ) -> Result<Self::Ok, Self::Err> {
        if self.values_broken {
            return Err(tracerr::new!(cms::Error::Memory(format!(
                "cannot store values of `{id}`",
            ))));
        }
        self.values
            .lock()
            .expect("not poisoned")
            .extend(values.into_iter().map(|v| (id.clone(), v)));
        Ok(())
    }
}

impl Cms<Update<listing::StatusChange>> for Memory {
    type Ok = Option<Listing>;
    type Err = Traced<cms::Error>;

    async fn execute(
        &self,
        Update(change): Update<listing::StatusChange>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut listings = self.listings.lock().expect("not poisoned");
        Ok(listings
            .iter_mut()
            .find(|l| l.document_id == change.document_id)
            .map(|l| {
                l.status = change.status;
                l.updated_at = DateTime::now().coerce();
                l.clone()
            }))
    }
}

impl Cms<Delete<By<Listing, DocumentId>>> for Memory {
    type Ok = bool;
    type Err = Traced<cms::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Listing, DocumentId>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let mut listings = self.listings.lock().expect("not poisoned");
        let before = listings.len();
        listings.retain(|l| l.document_id != id);
        Ok(listings.len() != before)
    }
}
