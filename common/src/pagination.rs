//! Abstractions for page-based pagination.

use serde::{Deserialize, Serialize};

/// Number of the first page.
pub const FIRST_PAGE: u32 = 1;

/// Page size used when none is requested.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Upper bound of a requested page size.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination arguments of a request.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Arguments {
    /// 1-based number of the requested page.
    page: u32,

    /// Number of items on a page.
    page_size: u32,
}

impl Default for Arguments {
    fn default() -> Self {
        Self {
            page: FIRST_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Arguments {
    /// Creates new [`Arguments`] out of the optionally provided `page` and
    /// `page_size`, falling back to [`FIRST_PAGE`] and the `default` size.
    ///
    /// [`None`] is returned if any of the provided values is not positive or
    /// the `page_size` exceeds [`MAX_PAGE_SIZE`].
    pub fn new<Num>(
        page: Option<Num>,
        page_size: Option<Num>,
        default: u32,
    ) -> Option<Self>
    where
        Num: TryInto<u32>,
    {
        let page = match page {
            Some(p) => p.try_into().ok()?,
            None => FIRST_PAGE,
        };
        let page_size = match page_size {
            Some(s) => s.try_into().ok()?,
            None => default,
        };
        (page >= FIRST_PAGE && page_size > 0 && page_size <= MAX_PAGE_SIZE)
            .then_some(Self { page, page_size })
    }

    /// Returns the 1-based number of the requested page.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Returns the requested number of items on a page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }
}

/// Pagination information of a returned [`Page`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// 1-based number of the page.
    pub page: u32,

    /// Number of items on a page.
    pub page_size: u32,

    /// Total number of pages.
    pub page_count: u32,

    /// Total number of items.
    pub total: u32,
}

impl Pagination {
    /// Returns the [`Pagination`] describing a single page holding all the
    /// `len` items.
    ///
    /// Used when a response carries no pagination information at all.
    #[must_use]
    pub fn single_page(len: usize) -> Self {
        let len = u32::try_from(len).unwrap_or(u32::MAX);
        Self {
            page: FIRST_PAGE,
            page_size: len,
            page_count: 1,
            total: len,
        }
    }

    /// Indicates whether there is a page after this one.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.page < self.page_count
    }

    /// Indicates whether there is a page before this one.
    #[must_use]
    pub fn has_previous_page(&self) -> bool {
        self.page > FIRST_PAGE
    }
}

/// A page of `T` items.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    /// Items on this [`Page`].
    pub items: Vec<T>,

    /// [`Pagination`] information of this [`Page`].
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Creates a new [`Page`] out of the provided `items`, using
    /// [`Pagination::single_page()`] if no `pagination` is provided.
    #[must_use]
    pub fn new(items: Vec<T>, pagination: Option<Pagination>) -> Self {
        let pagination =
            pagination.unwrap_or_else(|| Pagination::single_page(items.len()));
        Self { items, pagination }
    }

    /// Maps items of this [`Page`] with the provided function.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

/// Pagination selector.
#[derive(Clone, Debug, PartialEq)]
pub struct Selector<F> {
    /// Pagination [`Arguments`].
    pub arguments: Arguments,

    /// Additional filter being applied to the result.
    pub filter: F,
}

/// Defines pagination types.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_pagination {
    ($node:ty, $filter:ty) => {
        #[doc = "A [`Page`] of nodes."]
        pub type Page = $crate::pagination::Page<$node>;

        #[doc = "Arguments for selecting a [`Page`]."]
        pub type Arguments = $crate::pagination::Arguments;

        #[doc = "[`Page`] selector."]
        pub type Selector = $crate::pagination::Selector<$filter>;
    };
}

#[cfg(test)]
mod spec {
    use super::{Arguments, Page, Pagination, DEFAULT_PAGE_SIZE};

    #[test]
    fn arguments_default_to_first_page() {
        let args = Arguments::new::<i32>(None, None, DEFAULT_PAGE_SIZE)
            .unwrap();

        assert_eq!(args, Arguments::default());
        assert_eq!(args.page(), 1);
        assert_eq!(args.page_size(), 20);
    }

    #[test]
    fn arguments_reject_invalid_values() {
        assert!(Arguments::new(Some(0), None, 20).is_none());
        assert!(Arguments::new(Some(-1), None, 20).is_none());
        assert!(Arguments::new(None, Some(0), 20).is_none());
        assert!(Arguments::new(None, Some(101), 20).is_none());

        let args = Arguments::new(Some(3), Some(50), 20).unwrap();
        assert_eq!((args.page(), args.page_size()), (3, 50));
    }

    #[test]
    fn missing_pagination_falls_back_to_single_page() {
        let page = Page::new(vec!["a", "b", "c"], None);

        assert_eq!(
            page.pagination,
            Pagination {
                page: 1,
                page_size: 3,
                page_count: 1,
                total: 3,
            },
        );
        assert!(!page.pagination.has_next_page());
        assert!(!page.pagination.has_previous_page());
    }

    #[test]
    fn pagination_reports_neighbour_pages() {
        let p = Pagination {
            page: 2,
            page_size: 10,
            page_count: 3,
            total: 25,
        };

        assert!(p.has_next_page());
        assert!(p.has_previous_page());
    }
}
