//! Translation of [`Manager`] state into a CMS listings query.

use crate::read::listing::list;

use super::{Key, Manager, Operator, Value};

/// Translates the provided [`Manager`] state into a [`list::Selector`] of the
/// first page with the default size.
#[must_use]
pub fn to_strapi_query(manager: &Manager) -> list::Selector {
    to_strapi_query_with(manager, list::Arguments::default())
}

/// Translates the provided [`Manager`] state into a [`list::Selector`] with
/// the provided pagination [`list::Arguments`].
///
/// List values of attribute filters are expanded into one
/// [`Operator::Or`] constraint per element, so any of them satisfies the
/// query, while distinct attributes are all required.
#[must_use]
pub fn to_strapi_query_with(
    manager: &Manager,
    arguments: list::Arguments,
) -> list::Selector {
    let mut filter = list::Filter::default();
    let mut attribute_filters = vec![];

    for (key, f) in manager.filters() {
        match (key, &f.value) {
            (Key::Sort, Value::Text(s)) => {
                filter.sort = Some(list::Sort::from_key(s));
            }
            (Key::Search, Value::Text(s)) => filter.search = Some(s.clone()),
            (Key::Address, Value::Text(s)) => filter.address = Some(s.clone()),
            (Key::Category, Value::Text(s)) => {
                filter.category = Some(s.clone());
            }
            (Key::Subcategory, Value::Text(s)) => {
                filter.sub_categories = Some(vec![s.clone()]);
            }
            (Key::Subcategories, Value::List(l)) => {
                filter.sub_categories = Some(l.clone());
            }
            (Key::PriceRange, Value::Range(min, max)) => {
                filter.price = list::PriceRange::from_bounds(*min, *max);
            }
            (
                Key::Sort
                | Key::Search
                | Key::Address
                | Key::Category
                | Key::Subcategory
                | Key::Subcategories
                | Key::PriceRange
                | Key::Attribute(_),
                _,
            ) => {}
        }

        if !f.is_attribute_filter {
            continue;
        }
        if let Value::List(options) = &f.value {
            attribute_filters.extend(options.iter().map(|o| {
                list::AttributeFilter {
                    attribute: f.field.clone(),
                    operator: Operator::Or,
                    value: Value::Text(o.clone()),
                }
            }));
        } else {
            attribute_filters.push(list::AttributeFilter {
                attribute: f.field.clone(),
                operator: f.operator,
                value: f.value.clone(),
            });
        }
    }

    filter.attribute_filters =
        (!attribute_filters.is_empty()).then_some(attribute_filters);

    list::Selector { arguments, filter }
}
