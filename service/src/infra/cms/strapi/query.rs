//! [`Query`] string composition of Strapi REST API requests.

use serde_json::{json, Map, Value as Json};

use crate::{
    filter::{Operator, Value},
    read::listing::list,
};

/// Query string of a Strapi REST API request.
///
/// Nested parameters are flattened the way the [`qs`] library does it:
/// `filters[price][$gte]=100`, with array elements indexed as `[0]`, `[1]`,
/// etc.
///
/// [`qs`]: https://github.com/ljharb/qs
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query {
    /// Flattened key-value pairs.
    pairs: Vec<(String, String)>,
}

impl Query {
    /// Creates a new empty [`Query`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the provided `filters` tree.
    #[must_use]
    pub fn filters(mut self, filters: &Json) -> Self {
        flatten("filters".to_owned(), filters, &mut self.pairs);
        self
    }

    /// Adds the provided `populate` tree.
    #[must_use]
    pub fn populate(mut self, populate: &Json) -> Self {
        flatten("populate".to_owned(), populate, &mut self.pairs);
        self
    }

    /// Adds the provided `field:direction` sort order.
    #[must_use]
    pub fn sort(mut self, sort: &str) -> Self {
        self.pairs.push(("sort".to_owned(), sort.to_owned()));
        self
    }

    /// Adds page-based pagination parameters.
    #[must_use]
    pub fn pagination(mut self, page: u32, page_size: u32) -> Self {
        self.pairs
            .push(("pagination[page]".to_owned(), page.to_string()));
        self.pairs
            .push(("pagination[pageSize]".to_owned(), page_size.to_string()));
        self
    }

    /// Returns the flattened key-value pairs of this [`Query`].
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Returns the value of the provided flattened `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v.as_str()))
    }
}

/// Flattens the provided JSON `value` into `qs`-style key-value pairs.
fn flatten(prefix: String, value: &Json, out: &mut Vec<(String, String)>) {
    match value {
        Json::Object(map) => {
            for (k, v) in map {
                flatten(format!("{prefix}[{k}]"), v, out);
            }
        }
        Json::Array(items) => {
            for (i, v) in items.iter().enumerate() {
                flatten(format!("{prefix}[{i}]"), v, out);
            }
        }
        Json::String(s) => out.push((prefix, s.clone())),
        Json::Number(n) => out.push((prefix, number_to_string(n))),
        Json::Bool(b) => out.push((prefix, b.to_string())),
        Json::Null => {}
    }
}

/// Renders the provided JSON number, omitting the fractional part of whole
/// ones.
#[expect(
    clippy::cast_possible_truncation,
    clippy::float_cmp,
    reason = "whole numbers only"
)]
fn number_to_string(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => {
            (f as i64).to_string()
        }
        _ => n.to_string(),
    }
}

/// Converts the provided filter [`Value`] into JSON.
fn to_json(value: &Value) -> Json {
    match value {
        Value::Text(s) | Value::Date(s) => Json::from(s.as_str()),
        Value::Number(n) => Json::from(*n),
        Value::Boolean(b) => Json::from(*b),
        Value::List(l) => Json::from(l.clone()),
        Value::Range(min, max) => json!([min, max]),
    }
}

/// Builds the filter tree of a [`list::Filter`].
///
/// Subcategories take precedence over the category, being more specific.
/// Attribute constraints are grouped by the attribute name: all the
/// [`Operator::Or`] ones of the same attribute form a single `$or` clause,
/// and the resulting clauses are all required (`$and`).
#[must_use]
pub fn listing_filters(filter: &list::Filter) -> Json {
    let mut tree = Map::new();

    if let Some(slugs) = &filter.sub_categories {
        _ = tree.insert("categories".into(), json!({"slug": {"$in": slugs}}));
    } else if let Some(slug) = &filter.category {
        _ = tree.insert("categories".into(), json!({"slug": {"$eq": slug}}));
    }

    if let Some(term) = &filter.search {
        _ = tree.insert(
            "$or".into(),
            json!([
                {"title": {"$containsi": term}},
                {"description": {"$containsi": term}},
            ]),
        );
    }

    if let Some(term) = &filter.address {
        _ = tree.insert("address".into(), json!({"$containsi": term}));
    }

    if let Some(price) = filter.price {
        let mut range = Map::new();
        if let Some(gte) = price.gte {
            _ = range.insert("$gte".into(), Json::from(gte));
        }
        if let Some(lte) = price.lte {
            _ = range.insert("$lte".into(), Json::from(lte));
        }
        _ = tree.insert("price".into(), Json::Object(range));
    }

    let clauses = filter
        .attribute_filters
        .as_deref()
        .map(attribute_clauses)
        .unwrap_or_default();
    if !clauses.is_empty() {
        _ = tree.insert("$and".into(), Json::Array(clauses));
    }

    Json::Object(tree)
}

/// Groups the provided [`list::AttributeFilter`]s into `$and` clauses.
fn attribute_clauses(filters: &[list::AttributeFilter]) -> Vec<Json> {
    let mut clauses = Vec::new();
    let mut or_groups: Vec<(&str, usize)> = Vec::new();

    for f in filters {
        let clause = attribute_clause(&f.attribute, f.operator, &f.value);
        if f.operator != Operator::Or {
            clauses.push(clause);
            continue;
        }
        let group = or_groups
            .iter()
            .find_map(|(name, i)| (*name == f.attribute).then_some(*i));
        if let Some(i) = group {
            if let Some(Json::Array(alts)) = clauses[i].get_mut("$or") {
                alts.push(clause);
            }
        } else {
            or_groups.push((&f.attribute, clauses.len()));
            clauses.push(json!({"$or": [clause]}));
        }
    }

    clauses
}

/// Builds a clause constraining a single attribute value.
fn attribute_clause(name: &str, op: Operator, value: &Value) -> Json {
    let op = match (op, value) {
        (Operator::Or | Operator::And, Value::List(_)) => Operator::In,
        (Operator::Or | Operator::And, _) => Operator::Eq,
        (op, _) => op,
    };
    json!({
        "product_attribute_values": {
            "attribute": {"name": {"$eq": name}},
            "value": {op.to_strapi(): to_json(value)},
        },
    })
}

/// Builds the [`Query`] of a [`list::Selector`].
#[must_use]
pub fn listings(selector: &list::Selector) -> Query {
    let query = Query::new()
        .filters(&listing_filters(&selector.filter))
        .pagination(
            selector.arguments.page(),
            selector.arguments.page_size(),
        )
        .populate(&listing_populate());
    match selector.filter.sort {
        Some(sort) => query.sort(sort.as_str()),
        None => query,
    }
}

/// Returns the `populate` tree of a listing.
#[must_use]
pub fn listing_populate() -> Json {
    json!({
        "images": true,
        "categories": true,
        "product_attribute_values": {"populate": {"attribute": true}},
    })
}

/// Returns the `populate` tree of a category, covering the provided `depth`
/// of children levels along with their attributes.
///
/// Strapi has no recursive populate, so children below `depth` are not
/// fetched.
#[must_use]
pub fn category_populate(depth: u8) -> Json {
    match depth.checked_sub(1) {
        None => json!({"attributes": true}),
        Some(rest) => json!({
            "attributes": true,
            "children": {"populate": category_populate(rest)},
        }),
    }
}
