//! Browse [`Filter`]s composition.
//!
//! Active filters are collected in a [`Manager`] and translated into a CMS
//! listings query by the [`adapter`].

pub mod adapter;
mod manager;

use std::fmt;

use common::define_kind;

use crate::domain::DocumentId;

pub use self::{
    adapter::{to_strapi_query, to_strapi_query_with},
    manager::Manager,
};

/// Upper bound of an open price range, being the largest integer exactly
/// representable by an [`f64`].
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Key a [`Filter`] is stored under in a [`Manager`].
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Key {
    /// Primary category [`Slug`].
    ///
    /// [`Slug`]: crate::domain::Slug
    Category,

    /// Single subcategory [`Slug`].
    ///
    /// [`Slug`]: crate::domain::Slug
    Subcategory,

    /// Multiple subcategory [`Slug`]s.
    ///
    /// [`Slug`]: crate::domain::Slug
    Subcategories,

    /// Price range.
    PriceRange,

    /// Sort order.
    Sort,

    /// Free-text search term.
    Search,

    /// Location search term.
    Address,

    /// Category attribute, identified by its [`DocumentId`].
    Attribute(DocumentId),
}

impl Key {
    /// Returns the [`Key`] identified by the provided string.
    ///
    /// Any string other than the reserved ones identifies an attribute.
    #[must_use]
    pub fn parse(id: &str) -> Self {
        match id {
            "category" => Self::Category,
            "subcategory" => Self::Subcategory,
            "subcategories" => Self::Subcategories,
            "price_range" => Self::PriceRange,
            "sort" => Self::Sort,
            "search" => Self::Search,
            "address" => Self::Address,
            _ => Self::Attribute(id.into()),
        }
    }

    /// Returns the string identifying this [`Key`].
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Category => "category",
            Self::Subcategory => "subcategory",
            Self::Subcategories => "subcategories",
            Self::PriceRange => "price_range",
            Self::Sort => "sort",
            Self::Search => "search",
            Self::Address => "address",
            Self::Attribute(id) => id.as_ref(),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single browse constraint.
#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    /// CMS field (or semantic name) this [`Filter`] constrains.
    pub field: String,

    /// [`Operator`] of this [`Filter`].
    pub operator: Operator,

    /// [`Value`] of this [`Filter`].
    pub value: Value,

    /// Indicator whether this [`Filter`] constrains a category attribute.
    pub is_attribute_filter: bool,
}

impl Filter {
    /// Creates a new non-attribute [`Filter`].
    #[must_use]
    pub fn new(
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
            is_attribute_filter: false,
        }
    }

    /// Returns the [`ValueType`] of this [`Filter`].
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.value.value_type()
    }
}

/// Partial update of a [`Filter`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Patch {
    /// New [`Filter::field`], if any.
    pub field: Option<String>,

    /// New [`Filter::operator`], if any.
    pub operator: Option<Operator>,

    /// New [`Filter::value`], if any.
    pub value: Option<Value>,

    /// New [`Filter::is_attribute_filter`], if any.
    pub is_attribute_filter: Option<bool>,
}

impl Patch {
    /// Applies this [`Patch`] to the provided [`Filter`].
    pub(crate) fn apply(self, filter: &mut Filter) {
        if let Some(field) = self.field {
            filter.field = field;
        }
        if let Some(op) = self.operator {
            filter.operator = op;
        }
        if let Some(value) = self.value {
            filter.value = value;
        }
        if let Some(is_attr) = self.is_attribute_filter {
            filter.is_attribute_filter = is_attr;
        }
    }
}

define_kind! {
    #[doc = "Comparison operator of a [`Filter`]."]
    enum Operator {
        #[doc = "Equal."]
        Eq = "eq",

        #[doc = "Not equal."]
        Ne = "ne",

        #[doc = "Less than."]
        Lt = "lt",

        #[doc = "Less than or equal."]
        Lte = "lte",

        #[doc = "Greater than."]
        Gt = "gt",

        #[doc = "Greater than or equal."]
        Gte = "gte",

        #[doc = "Included in a list."]
        In = "in",

        #[doc = "Not included in a list."]
        NotIn = "notIn",

        #[doc = "Contains a substring."]
        Contains = "contains",

        #[doc = "Doesn't contain a substring."]
        NotContains = "notContains",

        #[doc = "Contains a substring, case-insensitively."]
        Containsi = "containsi",

        #[doc = "Doesn't contain a substring, case-insensitively."]
        NotContainsi = "notContainsi",

        #[doc = "Is null."]
        Null = "null",

        #[doc = "Is not null."]
        NotNull = "notNull",

        #[doc = "Is within an inclusive range."]
        Between = "between",

        #[doc = "Satisfies any of the grouped constraints."]
        Or = "or",

        #[doc = "Satisfies all of the grouped constraints."]
        And = "and",
    }
}

impl Operator {
    /// Returns the CMS query representation of this [`Operator`] (`$eq`,
    /// `$in`, etc).
    #[must_use]
    pub fn to_strapi(self) -> String {
        format!("${}", self.as_str())
    }
}

define_kind! {
    #[doc = "Type of a [`Filter`] [`Value`]."]
    enum ValueType {
        #[doc = "Text value."]
        Text = "text",

        #[doc = "Numeric value."]
        Number = "number",

        #[doc = "Boolean value."]
        Boolean = "boolean",

        #[doc = "Date value."]
        Date = "date",

        #[doc = "List of selected options."]
        MultiSelect = "multi-select",
    }
}

/// Value of a [`Filter`].
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Text value.
    Text(String),

    /// Numeric value.
    Number(f64),

    /// Boolean value.
    Boolean(bool),

    /// [ISO 8601] date and time.
    ///
    /// [ISO 8601]: https://en.wikipedia.org/wiki/ISO_8601
    Date(String),

    /// List of text values.
    List(Vec<String>),

    /// Inclusive numeric range.
    Range(f64, f64),
}

impl Value {
    /// Returns the [`ValueType`] of this [`Value`].
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Text(_) => ValueType::Text,
            Self::Number(_) | Self::Range(..) => ValueType::Number,
            Self::Boolean(_) => ValueType::Boolean,
            Self::Date(_) => ValueType::Date,
            Self::List(_) => ValueType::MultiSelect,
        }
    }

    /// Indicates whether this [`Value`] is empty, so its [`Filter`] must not
    /// be stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) | Self::Date(s) => s.trim().is_empty(),
            Self::List(l) => l.is_empty(),
            Self::Number(_) | Self::Boolean(_) | Self::Range(..) => false,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<Vec<String>> for Value {
    fn from(l: Vec<String>) -> Self {
        Self::List(l)
    }
}

#[cfg(test)]
mod spec {
    use super::{Key, Operator, Value, ValueType};

    #[test]
    fn reserved_keys_round_trip() {
        for id in [
            "category",
            "subcategory",
            "subcategories",
            "price_range",
            "sort",
            "search",
            "address",
        ] {
            let key = Key::parse(id);
            assert!(!matches!(key, Key::Attribute(_)), "{id}");
            assert_eq!(key.to_string(), id);
        }
        assert_eq!(Key::parse("abc123"), Key::Attribute("abc123".into()));
    }

    #[test]
    fn value_type_follows_tag() {
        assert_eq!(Value::from("x").value_type(), ValueType::Text);
        assert_eq!(Value::Range(0.0, 1.0).value_type(), ValueType::Number);
        assert_eq!(
            Value::List(vec!["a".into()]).value_type(),
            ValueType::MultiSelect,
        );
        assert_eq!(ValueType::MultiSelect.as_str(), "multi-select");
    }

    #[test]
    fn operators_render_as_strapi_ones() {
        assert_eq!(Operator::NotContainsi.to_strapi(), "$notContainsi");
        assert_eq!(Operator::In.to_strapi(), "$in");
        assert_eq!("notNull".parse::<Operator>(), Ok(Operator::NotNull));
    }
}
