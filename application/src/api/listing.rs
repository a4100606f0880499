//! [`Listing`]-related definitions.

use common::DateTime;
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLInputObject, GraphQLScalar};
use service::domain::{self, listing};

use crate::{
    api::{self, scalar},
    define_error, Context,
};

/// Item offered on the marketplace.
#[derive(Clone, Debug, From)]
pub struct Listing(domain::Listing);

/// Item offered on the marketplace.
#[graphql_object(context = Context)]
impl Listing {
    /// Stable identifier of this `Listing`.
    #[must_use]
    pub fn document_id(&self) -> api::DocumentId {
        self.0.document_id.clone().into()
    }

    /// URL-safe unique key of this `Listing`.
    #[must_use]
    pub fn slug(&self) -> api::Slug {
        self.0.slug.clone().into()
    }

    /// Title of this `Listing`.
    #[must_use]
    pub fn title(&self) -> Title {
        self.0.title.clone().into()
    }

    /// Description of this `Listing`.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.0.description
    }

    /// Asked price of this `Listing`, if any.
    #[must_use]
    pub fn price(&self) -> Option<f64> {
        self.0.price
    }

    /// Location of this `Listing`.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.0.address
    }

    /// Lifecycle status of this `Listing`.
    #[must_use]
    pub fn status(&self) -> Status {
        self.0.status.into()
    }

    /// Kind of the deal this `Listing` offers.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.0.kind.into()
    }

    /// Images of this `Listing`.
    #[must_use]
    pub fn images(&self) -> Vec<Image> {
        self.0.images.iter().cloned().map(Image).collect()
    }

    /// `Category`s this `Listing` is placed into.
    #[must_use]
    pub fn categories(&self) -> Vec<api::category::Ref> {
        self.0.categories.iter().cloned().map(Into::into).collect()
    }

    /// Values of the `Category` attributes of this `Listing`.
    #[must_use]
    pub fn attribute_values(&self) -> Vec<api::attribute::Value> {
        self.0.attribute_values.iter().cloned().map(Into::into).collect()
    }

    /// `DateTime` when this `Listing` was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// `DateTime` when this `Listing` was last modified.
    #[must_use]
    pub fn updated_at(&self) -> DateTime {
        self.0.updated_at.coerce()
    }
}

/// Title of a `Listing`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "ListingTitle", with = scalar::Via::<listing::Title>)]
pub struct Title(listing::Title);

/// Lifecycle status of a `Listing`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "ListingStatus")]
pub enum Status {
    /// Visible to everyone.
    Active,

    /// Not published yet.
    Draft,

    /// Sold out and kept for history.
    Sold,

    /// Withdrawn by its owner.
    Archived,
}

impl From<listing::Status> for Status {
    fn from(status: listing::Status) -> Self {
        use listing::Status as S;

        match status {
            S::Active => Self::Active,
            S::Draft => Self::Draft,
            S::Sold => Self::Sold,
            S::Archived => Self::Archived,
        }
    }
}

impl From<Status> for listing::Status {
    fn from(status: Status) -> Self {
        match status {
            Status::Active => Self::Active,
            Status::Draft => Self::Draft,
            Status::Sold => Self::Sold,
            Status::Archived => Self::Archived,
        }
    }
}

/// Kind of the deal a `Listing` offers.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "ListingKind")]
pub enum Kind {
    /// Offered for rent.
    Rent,

    /// Offered for sale.
    Sale,

    /// Given away for free.
    Free,
}

impl From<listing::Kind> for Kind {
    fn from(kind: listing::Kind) -> Self {
        use listing::Kind as K;

        match kind {
            K::Rent => Self::Rent,
            K::Sale => Self::Sale,
            K::Free => Self::Free,
        }
    }
}

impl From<Kind> for listing::Kind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Rent => Self::Rent,
            Kind::Sale => Self::Sale,
            Kind::Free => Self::Free,
        }
    }
}

/// Image of a [`Listing`].
#[derive(Clone, Debug)]
pub struct Image(listing::Image);

/// Image of a `Listing`.
#[graphql_object(name = "ListingImage", context = Context)]
impl Image {
    /// URL of this image.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.0.url
    }

    /// Alternative text of this image, if any.
    #[must_use]
    pub fn alternative_text(&self) -> Option<&str> {
        self.0.alternative_text.as_deref()
    }

    /// Width of this image in pixels, if known.
    #[must_use]
    pub fn width(&self) -> Option<i32> {
        self.0.width.and_then(|w| i32::try_from(w).ok())
    }

    /// Height of this image in pixels, if known.
    #[must_use]
    pub fn height(&self) -> Option<i32> {
        self.0.height.and_then(|h| i32::try_from(h).ok())
    }
}

/// Input of a new `Listing`.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "CreateListingInput")]
pub struct CreateInput {
    /// Title of the new `Listing`.
    pub title: Title,

    /// Description of the new `Listing`.
    pub description: Option<String>,

    /// Asked price of the new `Listing`, if any.
    pub price: Option<f64>,

    /// Location of the new `Listing`.
    pub address: String,

    /// Kind of the deal the new `Listing` offers.
    pub kind: Kind,

    /// Slugs of the `Category`s to place the new `Listing` into, from the
    /// root one downwards.
    pub categories: Vec<api::Slug>,

    /// Values of the `Category` attributes.
    pub attribute_values: Option<Vec<api::attribute::ValueEntry>>,
}

pub mod list {
    //! Definitions related to the [`Listing`] list.

    use derive_more::From;
    use juniper::{graphql_object, GraphQLEnum, GraphQLInputObject};
    use service::{
        domain::attribute,
        filter::{self, Manager},
        read,
    };

    use super::Listing;
    use crate::{api, Context};

    /// Page of the [`Listing`] list.
    #[derive(Clone, Debug, From)]
    pub struct Page(read::listing::list::Page);

    /// Page of the `Listing` list.
    #[graphql_object(name = "ListingPage", context = Context)]
    impl Page {
        /// `Listing`s on this page.
        #[must_use]
        pub fn items(&self) -> Vec<Listing> {
            self.0.items.iter().cloned().map(Into::into).collect()
        }

        /// Information about this page.
        #[must_use]
        pub fn pagination(&self) -> Pagination {
            Pagination(self.0.pagination)
        }
    }

    /// Information about a [`Page`].
    #[derive(Clone, Copy, Debug)]
    pub struct Pagination(common::pagination::Pagination);

    /// Information about a `ListingPage`.
    #[graphql_object(name = "ListingPagination", context = Context)]
    impl Pagination {
        /// 1-based number of the page.
        #[must_use]
        pub fn page(&self) -> i32 {
            saturate(self.0.page)
        }

        /// Number of `Listing`s on a page.
        #[must_use]
        pub fn page_size(&self) -> i32 {
            saturate(self.0.page_size)
        }

        /// Total number of pages.
        #[must_use]
        pub fn page_count(&self) -> i32 {
            saturate(self.0.page_count)
        }

        /// Total number of `Listing`s.
        #[must_use]
        pub fn total(&self) -> i32 {
            saturate(self.0.total)
        }

        /// Indicator whether there is a next page.
        #[must_use]
        pub fn has_next_page(&self) -> bool {
            self.0.has_next_page()
        }

        /// Indicator whether there is a previous page.
        #[must_use]
        pub fn has_previous_page(&self) -> bool {
            self.0.has_previous_page()
        }
    }

    /// Converts the provided [`u32`] into an [`i32`], saturating on overflow.
    fn saturate(n: u32) -> i32 {
        i32::try_from(n).unwrap_or(i32::MAX)
    }

    /// Browse constraints of the `Listing` list.
    #[derive(Clone, Debug, Default, GraphQLInputObject)]
    #[graphql(name = "ListingFilter")]
    pub struct Filter {
        /// Slug of the primary `Category`.
        pub category: Option<api::Slug>,

        /// Slug of a single subcategory.
        pub subcategory: Option<api::Slug>,

        /// Slugs of the subcategories any of which matches.
        ///
        /// Takes precedence over `subcategory`.
        pub subcategories: Option<Vec<api::Slug>>,

        /// Lower bound of the price.
        pub min_price: Option<f64>,

        /// Upper bound of the price.
        pub max_price: Option<f64>,

        /// Term to search for in a title or a description.
        pub search: Option<String>,

        /// Term to search for in an address.
        pub address: Option<String>,

        /// Sort order.
        pub sort: Option<Sort>,

        /// Constraints on the `Category` attributes.
        pub attributes: Option<Vec<AttributeFilter>>,
    }

    impl Filter {
        /// Applies this [`Filter`] to a fresh [`Manager`].
        #[must_use]
        pub fn into_manager(self) -> Manager {
            let Self {
                category,
                subcategory,
                subcategories,
                min_price,
                max_price,
                search,
                address,
                sort,
                attributes,
            } = self;

            let mut manager = Manager::new();
            _ = manager
                .set_category_filter(category.as_ref().map(slug_str))
                .set_subcategory_filter(subcategory.as_ref().map(slug_str))
                .set_subcategories_filter(subcategories.map(|slugs| {
                    slugs.iter().map(slug_str).map(str::to_owned).collect()
                }))
                .set_price_range_filter(min_price, max_price)
                .set_search_filter(search.as_deref())
                .set_address_filter(address.as_deref())
                .set_sort_filter(sort.map(Sort::key));
            for f in attributes.into_iter().flatten() {
                _ = manager.add_attribute_filter_with(
                    f.document_id.into(),
                    f.name,
                    attribute::Value::from(f.value),
                    f.operator.map_or(filter::Operator::Eq, Into::into),
                );
            }
            manager
        }
    }

    /// Returns the string representation of the provided [`api::Slug`].
    fn slug_str(slug: &api::Slug) -> &str {
        AsRef::<service::domain::Slug>::as_ref(slug).as_str()
    }

    /// Constraint on a `Category` attribute.
    #[derive(Clone, Debug, GraphQLInputObject)]
    #[graphql(name = "ListingAttributeFilter")]
    pub struct AttributeFilter {
        /// Stable identifier of the `Attribute`.
        pub document_id: api::DocumentId,

        /// Name of the `Attribute` field in the CMS.
        pub name: String,

        /// Comparison operator, `EQ` by default.
        pub operator: Option<Operator>,

        /// Value to compare with.
        pub value: api::attribute::ValueInput,
    }

    /// Sort order of the `Listing` list.
    #[derive(Clone, Copy, Debug, GraphQLEnum)]
    #[graphql(name = "ListingSort")]
    pub enum Sort {
        /// Most recent first.
        Newest,

        /// Oldest first.
        Oldest,

        /// Cheapest first.
        PriceLowHigh,

        /// Most expensive first.
        PriceHighLow,

        /// By title alphabetically.
        Alphabetical,
    }

    impl Sort {
        /// Returns the key of this [`Sort`] understood by the [`Manager`].
        #[must_use]
        pub fn key(self) -> &'static str {
            match self {
                Self::Newest => "newest",
                Self::Oldest => "oldest",
                Self::PriceLowHigh => "price-low-high",
                Self::PriceHighLow => "price-high-low",
                Self::Alphabetical => "alphabetical",
            }
        }
    }

    /// Comparison operator of a `ListingAttributeFilter`.
    #[derive(Clone, Copy, Debug, GraphQLEnum)]
    #[graphql(name = "FilterOperator")]
    pub enum Operator {
        /// Equal.
        Eq,

        /// Not equal.
        Ne,

        /// Less than.
        Lt,

        /// Less than or equal.
        Lte,

        /// Greater than.
        Gt,

        /// Greater than or equal.
        Gte,

        /// Included in a list.
        In,

        /// Not included in a list.
        NotIn,

        /// Contains a substring.
        Contains,

        /// Doesn't contain a substring.
        NotContains,

        /// Contains a substring, case-insensitively.
        Containsi,

        /// Doesn't contain a substring, case-insensitively.
        NotContainsi,

        /// Is null.
        Null,

        /// Is not null.
        NotNull,

        /// Is within an inclusive range.
        Between,

        /// Satisfies any of the grouped constraints.
        Or,

        /// Satisfies all of the grouped constraints.
        And,
    }

    impl From<Operator> for filter::Operator {
        fn from(op: Operator) -> Self {
            match op {
                Operator::Eq => Self::Eq,
                Operator::Ne => Self::Ne,
                Operator::Lt => Self::Lt,
                Operator::Lte => Self::Lte,
                Operator::Gt => Self::Gt,
                Operator::Gte => Self::Gte,
                Operator::In => Self::In,
                Operator::NotIn => Self::NotIn,
                Operator::Contains => Self::Contains,
                Operator::NotContains => Self::NotContains,
                Operator::Containsi => Self::Containsi,
                Operator::NotContainsi => Self::NotContainsi,
                Operator::Null => Self::Null,
                Operator::NotNull => Self::NotNull,
                Operator::Between => Self::Between,
                Operator::Or => Self::Or,
                Operator::And => Self::And,
            }
        }
    }

    #[cfg(test)]
    mod spec {
        use service::{
            domain::Slug,
            filter::{self, to_strapi_query},
            read::listing::list,
        };

        use super::{AttributeFilter, Filter, Operator, Sort};
        use crate::api;

        fn slug(s: &str) -> api::Slug {
            Slug::new(s).unwrap().into()
        }

        #[test]
        fn empty_filter_yields_empty_manager() {
            assert!(Filter::default().into_manager().is_empty());
        }

        #[test]
        fn applies_filter_through_manager() {
            let manager = Filter {
                category: Some(slug("vehicles")),
                subcategories: Some(vec![slug("cars"), slug("bikes")]),
                min_price: Some(100.0),
                max_price: Some(500.0),
                search: Some("  red  ".into()),
                sort: Some(Sort::PriceLowHigh),
                ..Filter::default()
            }
            .into_manager();

            let selector = to_strapi_query(&manager);

            assert_eq!(selector.arguments, list::Arguments::default());
            assert_eq!(selector.filter.category.as_deref(), Some("vehicles"));
            assert_eq!(
                selector.filter.sub_categories,
                Some(vec!["cars".to_owned(), "bikes".to_owned()]),
            );
            assert_eq!(
                selector.filter.price,
                Some(list::PriceRange {
                    gte: Some(100.0),
                    lte: Some(500.0),
                }),
            );
            assert_eq!(selector.filter.search.as_deref(), Some("red"));
            assert_eq!(selector.filter.sort, Some(list::Sort::PriceAsc));
            assert!(selector.filter.attribute_filters.is_none());
        }

        #[test]
        fn attribute_filters_default_to_eq() {
            let manager = Filter {
                attributes: Some(vec![
                    AttributeFilter {
                        document_id: service::domain::DocumentId::from("y")
                            .into(),
                        name: "year".into(),
                        operator: Some(Operator::Gte),
                        value: api::attribute::ValueInput {
                            number: Some(2000.0),
                            ..api::attribute::ValueInput::default()
                        },
                    },
                    AttributeFilter {
                        document_id: service::domain::DocumentId::from("c")
                            .into(),
                        name: "condition".into(),
                        operator: None,
                        value: api::attribute::ValueInput {
                            text: Some("used".into()),
                            ..api::attribute::ValueInput::default()
                        },
                    },
                ]),
                ..Filter::default()
            }
            .into_manager();

            assert_eq!(manager.len(), 2);
            let ops = manager
                .filters()
                .map(|(_, f)| (f.field.as_str(), f.operator))
                .collect::<Vec<_>>();
            assert_eq!(ops, [
                ("year", filter::Operator::Gte),
                ("condition", filter::Operator::Eq),
            ]);
        }
    }
}

define_error! {
    enum ListingError {
        #[code = "LISTING_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Listing` with the specified identifier does not exist"]
        NotExists,
    }
}
