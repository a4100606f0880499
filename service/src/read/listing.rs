//! [`Listing`]-related read definitions.

#[cfg(doc)]
use crate::domain::Listing;

pub mod list {
    //! [`Listing`] list definitions.

    use common::{define_kind, define_pagination};

    use crate::{
        domain::Listing,
        filter::{self, MAX_SAFE_INTEGER},
    };

    define_pagination!(Listing, Filter);

    /// Filter for [`Selector`].
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct Filter {
        /// [`Sort`] order of the [`Page`].
        ///
        /// Left to the CMS default if [`None`].
        pub sort: Option<Sort>,

        /// Term to search for in a [`Listing`] title or description.
        pub search: Option<String>,

        /// Term to search for in a [`Listing`] address.
        pub address: Option<String>,

        /// Slug of the category a [`Listing`] is placed into.
        pub category: Option<String>,

        /// Slugs of the subcategories any of which a [`Listing`] is placed
        /// into.
        pub sub_categories: Option<Vec<String>>,

        /// [`PriceRange`] of a [`Listing`].
        pub price: Option<PriceRange>,

        /// Constraints on the category attributes of a [`Listing`].
        ///
        /// Never [`Some`] empty list.
        pub attribute_filters: Option<Vec<AttributeFilter>>,
    }

    define_kind! {
        #[doc = "Sort order of a [`Listing`] list."]
        enum Sort {
            #[doc = "Cheapest first."]
            PriceAsc = "price:asc",

            #[doc = "Most expensive first."]
            PriceDesc = "price:desc",

            #[doc = "Most recent first."]
            Newest = "createdAt:desc",

            #[doc = "Oldest first."]
            Oldest = "createdAt:asc",

            #[doc = "By title alphabetically."]
            Alphabetical = "title:asc",
        }
    }

    impl Sort {
        /// Returns the [`Sort`] identified by the provided UI sort key.
        ///
        /// Unknown keys fall back to [`Sort::Newest`].
        #[must_use]
        pub fn from_key(key: &str) -> Self {
            match key {
                "price-low-high" => Self::PriceAsc,
                "price-high-low" => Self::PriceDesc,
                "oldest" => Self::Oldest,
                "alphabetical" => Self::Alphabetical,
                _ => Self::Newest,
            }
        }
    }

    /// Inclusive price range of a [`Listing`].
    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    pub struct PriceRange {
        /// Lower bound, if any.
        pub gte: Option<f64>,

        /// Upper bound, if any.
        pub lte: Option<f64>,
    }

    impl PriceRange {
        /// Creates a new [`PriceRange`] out of the provided bounds, treating
        /// `0` and [`MAX_SAFE_INTEGER`] as open ones.
        ///
        /// [`None`] is returned if both bounds are open.
        #[must_use]
        pub fn from_bounds(min: f64, max: f64) -> Option<Self> {
            let range = Self {
                gte: (min > 0.0).then_some(min),
                lte: (max < MAX_SAFE_INTEGER).then_some(max),
            };
            (range.gte.is_some() || range.lte.is_some()).then_some(range)
        }
    }

    /// Constraint on a category attribute of a [`Listing`].
    #[derive(Clone, Debug, PartialEq)]
    pub struct AttributeFilter {
        /// Name of the constrained attribute.
        pub attribute: String,

        /// [`filter::Operator`] of this constraint.
        ///
        /// [`filter::Operator::Or`] constraints on the same attribute are
        /// satisfied by any of them.
        pub operator: filter::Operator,

        /// [`filter::Value`] of this constraint.
        pub value: filter::Value,
    }

    #[cfg(test)]
    mod spec {
        use super::{PriceRange, Sort, MAX_SAFE_INTEGER};

        #[test]
        fn sort_mapping_is_total() {
            let cases = [
                ("price-low-high", "price:asc"),
                ("price-high-low", "price:desc"),
                ("newest", "createdAt:desc"),
                ("oldest", "createdAt:asc"),
                ("alphabetical", "title:asc"),
                ("most-liked", "createdAt:desc"),
                ("", "createdAt:desc"),
            ];
            for (key, expected) in cases {
                assert_eq!(Sort::from_key(key).as_str(), expected, "{key}");
            }
        }

        #[test]
        fn price_range_opens_sentinel_bounds() {
            assert_eq!(
                PriceRange::from_bounds(100.0, 500.0),
                Some(PriceRange {
                    gte: Some(100.0),
                    lte: Some(500.0),
                }),
            );
            assert_eq!(
                PriceRange::from_bounds(0.0, 500.0),
                Some(PriceRange {
                    gte: None,
                    lte: Some(500.0),
                }),
            );
            assert_eq!(PriceRange::from_bounds(0.0, MAX_SAFE_INTEGER), None);
        }
    }
}
