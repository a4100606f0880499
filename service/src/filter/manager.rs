//! [`Manager`] of active [`Filter`]s.

use crate::domain::{attribute, DocumentId};

use super::{Filter, Key, Operator, Patch, Value, MAX_SAFE_INTEGER};

/// Keyed collection of active browse [`Filter`]s.
///
/// Holds at most one [`Filter`] per [`Key`] and never stores a [`Filter`]
/// with an empty [`Value`]. Iteration follows the insertion order, and
/// overwriting a [`Filter`] keeps its position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Manager {
    /// Stored [`Filter`]s along with their [`Key`]s.
    filters: Vec<(Key, Filter)>,
}

impl Manager {
    /// Creates a new empty [`Manager`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the provided [`Filter`] under the provided [`Key`], replacing
    /// the existing one.
    ///
    /// A [`Filter`] with an empty [`Value`] removes the existing one instead.
    pub fn add_filter(&mut self, key: Key, filter: Filter) -> &mut Self {
        if filter.value.is_empty() {
            return self.remove_filter(&key);
        }
        match self.filters.iter().position(|(k, _)| *k == key) {
            Some(i) => self.filters[i].1 = filter,
            None => self.filters.push((key, filter)),
        }
        self
    }

    /// Removes the [`Filter`] stored under the provided [`Key`], if any.
    pub fn remove_filter(&mut self, key: &Key) -> &mut Self {
        self.filters.retain(|(k, _)| k != key);
        self
    }

    /// Applies the provided [`Patch`] to the [`Filter`] stored under the
    /// provided [`Key`].
    ///
    /// Does nothing if there is no such [`Filter`], and removes it if the
    /// patched [`Value`] becomes empty.
    pub fn update_filter(&mut self, key: &Key, patch: Patch) -> &mut Self {
        let Some((_, filter)) = self.filters.iter_mut().find(|(k, _)| k == key)
        else {
            return self;
        };
        patch.apply(filter);
        if filter.value.is_empty() {
            return self.remove_filter(key);
        }
        self
    }

    /// Returns the [`Filter`] stored under the provided [`Key`], if any.
    #[must_use]
    pub fn get_filter(&self, key: &Key) -> Option<&Filter> {
        self.filters
            .iter()
            .find_map(|(k, f)| (k == key).then_some(f))
    }

    /// Iterates over all the stored [`Filter`]s in their insertion order.
    pub fn filters(&self) -> impl Iterator<Item = (&Key, &Filter)> {
        self.filters.iter().map(|(k, f)| (k, f))
    }

    /// Returns the number of stored [`Filter`]s.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Indicates whether there are no stored [`Filter`]s.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Removes all the stored [`Filter`]s.
    pub fn clear_filters(&mut self) -> &mut Self {
        self.filters.clear();
        self
    }

    /// Stores an attribute [`Filter`] with the [`Operator::Eq`].
    ///
    /// See [`Manager::add_attribute_filter_with()`] for details.
    pub fn add_attribute_filter(
        &mut self,
        document_id: DocumentId,
        name: impl Into<String>,
        value: attribute::Value,
    ) -> &mut Self {
        self.add_attribute_filter_with(document_id, name, value, Operator::Eq)
    }

    /// Stores an attribute [`Filter`] under the [`Key::Attribute`] of the
    /// provided [`DocumentId`], so there is at most one [`Filter`] per
    /// attribute.
    ///
    /// An empty `value` removes the existing [`Filter`] instead. Dates are
    /// stored as [RFC 3339] strings.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    pub fn add_attribute_filter_with(
        &mut self,
        document_id: DocumentId,
        name: impl Into<String>,
        value: attribute::Value,
        operator: Operator,
    ) -> &mut Self {
        use attribute::Value as V;

        let key = Key::Attribute(document_id);
        let value = match value {
            V::Null => return self.remove_filter(&key),
            V::Text(s) => Value::Text(s),
            V::Options(o) => Value::List(o),
            V::Number(n) => Value::Number(n),
            V::Boolean(b) => Value::Boolean(b),
            V::Date(dt) => Value::Date(dt.to_rfc3339()),
        };
        self.add_filter(
            key,
            Filter {
                field: name.into(),
                operator,
                value,
                is_attribute_filter: true,
            },
        )
    }

    /// Sets or clears (on [`None`] or blank) the primary category filter.
    pub fn set_category_filter(&mut self, slug: Option<&str>) -> &mut Self {
        self.set_text(Key::Category, "category", Operator::Eq, slug)
    }

    /// Sets or clears (on [`None`] or blank) the single subcategory filter.
    pub fn set_subcategory_filter(
        &mut self,
        slug: Option<&str>,
    ) -> &mut Self {
        self.set_text(Key::Subcategory, "subcategory", Operator::Eq, slug)
    }

    /// Sets or clears (on [`None`] or empty) the multiple subcategories
    /// filter.
    pub fn set_subcategories_filter(
        &mut self,
        slugs: Option<Vec<String>>,
    ) -> &mut Self {
        match slugs {
            Some(slugs) => self.add_filter(
                Key::Subcategories,
                Filter::new("subcategories", Operator::In, slugs),
            ),
            None => self.remove_filter(&Key::Subcategories),
        }
    }

    /// Sets the price range filter, if any of the bounds is provided, or
    /// clears it otherwise.
    ///
    /// A missing lower bound is stored as `0`, and a missing upper one as
    /// [`MAX_SAFE_INTEGER`].
    pub fn set_price_range_filter(
        &mut self,
        min: Option<f64>,
        max: Option<f64>,
    ) -> &mut Self {
        if min.is_none() && max.is_none() {
            return self.remove_filter(&Key::PriceRange);
        }
        self.add_filter(
            Key::PriceRange,
            Filter::new(
                "price",
                Operator::Between,
                Value::Range(
                    min.unwrap_or(0.0),
                    max.unwrap_or(MAX_SAFE_INTEGER),
                ),
            ),
        )
    }

    /// Sets or clears (on [`None`] or blank) the free-text search filter.
    pub fn set_search_filter(&mut self, term: Option<&str>) -> &mut Self {
        self.set_text(Key::Search, "search", Operator::Containsi, term)
    }

    /// Sets or clears (on [`None`] or blank) the location filter.
    pub fn set_address_filter(&mut self, term: Option<&str>) -> &mut Self {
        self.set_text(Key::Address, "address", Operator::Containsi, term)
    }

    /// Sets or clears (on [`None`] or blank) the sort order.
    pub fn set_sort_filter(&mut self, sort: Option<&str>) -> &mut Self {
        self.set_text(Key::Sort, "sort", Operator::Eq, sort)
    }

    /// Stores the trimmed `text` under the provided reserved [`Key`], or
    /// removes it on [`None`].
    fn set_text(
        &mut self,
        key: Key,
        field: &str,
        operator: Operator,
        text: Option<&str>,
    ) -> &mut Self {
        match text {
            Some(t) => {
                self.add_filter(key, Filter::new(field, operator, t.trim()))
            }
            None => self.remove_filter(&key),
        }
    }
}

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::domain::attribute;

    use super::{
        Filter, Key, Manager, Operator, Patch, Value, MAX_SAFE_INTEGER,
    };

    fn color(manager: &mut Manager, value: attribute::Value) -> &mut Manager {
        manager.add_attribute_filter("color-doc".into(), "Color", value)
    }

    #[test]
    fn attribute_filter_overwrites_instead_of_duplicating() {
        let mut m = Manager::new();
        _ = color(&mut m, vec!["red"].into());
        _ = color(&mut m, vec!["blue", "green"].into());

        assert_eq!(m.len(), 1);
        let f = m.get_filter(&Key::Attribute("color-doc".into())).unwrap();
        assert_eq!(f.value, Value::List(vec!["blue".into(), "green".into()]));
        assert_eq!(f.field, "Color");
        assert!(f.is_attribute_filter);
    }

    #[test]
    fn empty_attribute_value_removes_filter() {
        let mut m = Manager::new();
        _ = color(&mut m, vec!["red"].into());

        _ = color(&mut m, attribute::Value::Options(vec![]));
        assert!(m.is_empty());

        _ = color(&mut m, "red".into());
        _ = color(&mut m, "  ".into());
        assert!(m.is_empty());

        _ = color(&mut m, "red".into());
        _ = color(&mut m, attribute::Value::Null);
        assert!(m.is_empty());
    }

    #[test]
    fn infers_value_types_from_attribute_values() {
        let mut m = Manager::new();
        let date = DateTime::from_iso8601("2024-05-01").unwrap();
        _ = m
            .add_attribute_filter("a".into(), "A", 3.0.into())
            .add_attribute_filter("b".into(), "B", true.into())
            .add_attribute_filter("c".into(), "C", date.into())
            .add_attribute_filter_with(
                "d".into(),
                "D",
                "x".into(),
                Operator::Ne,
            );

        let values = m.filters().map(|(_, f)| &f.value).collect::<Vec<_>>();
        assert_eq!(
            values,
            [
                &Value::Number(3.0),
                &Value::Boolean(true),
                &Value::Date("2024-05-01T00:00:00Z".into()),
                &Value::Text("x".into()),
            ],
        );
        assert_eq!(
            m.get_filter(&Key::Attribute("d".into())).unwrap().operator,
            Operator::Ne,
        );
    }

    #[test]
    fn keeps_insertion_order_on_overwrite() {
        let mut m = Manager::new();
        _ = m
            .set_category_filter(Some("vehicles"))
            .set_search_filter(Some("bike"))
            .set_category_filter(Some("furniture"));

        let keys = m.filters().map(|(k, _)| k.clone()).collect::<Vec<_>>();
        assert_eq!(keys, [Key::Category, Key::Search]);
        assert_eq!(
            m.get_filter(&Key::Category).unwrap().value,
            Value::Text("furniture".into()),
        );
    }

    #[test]
    fn reserved_setters_clear_on_none_or_blank() {
        let mut m = Manager::new();
        _ = m
            .set_category_filter(Some("furniture"))
            .set_subcategory_filter(Some("chairs"))
            .set_subcategories_filter(Some(vec!["a".into()]))
            .set_search_filter(Some("  lamp "))
            .set_address_filter(Some("Berlin"))
            .set_sort_filter(Some("newest"));
        assert_eq!(m.len(), 6);
        assert_eq!(
            m.get_filter(&Key::Search).unwrap().value,
            Value::Text("lamp".into()),
        );

        _ = m
            .set_category_filter(None)
            .set_subcategory_filter(Some(""))
            .set_subcategories_filter(Some(vec![]))
            .set_search_filter(Some("   "))
            .set_address_filter(None)
            .set_sort_filter(None);
        assert!(m.is_empty());
    }

    #[test]
    fn price_range_fills_missing_bounds() {
        let mut m = Manager::new();

        _ = m.set_price_range_filter(Some(100.0), None);
        let f = m.get_filter(&Key::PriceRange).unwrap();
        assert_eq!(f.value, Value::Range(100.0, MAX_SAFE_INTEGER));
        assert_eq!(f.operator, Operator::Between);
        assert_eq!(f.field, "price");

        _ = m.set_price_range_filter(None, Some(50.0));
        assert_eq!(
            m.get_filter(&Key::PriceRange).unwrap().value,
            Value::Range(0.0, 50.0),
        );

        _ = m.set_price_range_filter(None, None);
        assert!(m.get_filter(&Key::PriceRange).is_none());
    }

    #[test]
    fn update_patches_existing_filters_only() {
        let mut m = Manager::new();
        _ = m.update_filter(
            &Key::Search,
            Patch {
                value: Some("x".into()),
                ..Patch::default()
            },
        );
        assert!(m.is_empty());

        _ = m.add_filter(
            Key::Address,
            Filter::new("address", Operator::Containsi, "Berlin"),
        );
        _ = m.update_filter(
            &Key::Address,
            Patch {
                operator: Some(Operator::Eq),
                ..Patch::default()
            },
        );
        let f = m.get_filter(&Key::Address).unwrap();
        assert_eq!(f.operator, Operator::Eq);
        assert_eq!(f.value, Value::Text("Berlin".into()));

        _ = m.update_filter(
            &Key::Address,
            Patch {
                value: Some(Value::Text(String::new())),
                ..Patch::default()
            },
        );
        assert!(m.is_empty());
    }

    #[test]
    fn add_filter_skips_empty_values() {
        let mut m = Manager::new();
        _ = m.add_filter(
            Key::parse("custom"),
            Filter::new("custom", Operator::In, Vec::<String>::new()),
        );
        assert!(m.is_empty());
    }

    #[test]
    fn clears_everything() {
        let mut m = Manager::new();
        _ = m
            .set_category_filter(Some("furniture"))
            .set_price_range_filter(Some(1.0), Some(2.0));

        _ = m.clear_filters();

        assert!(m.is_empty());
        assert_eq!(m, Manager::default());
    }
}
