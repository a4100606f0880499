//! Category attribute definitions.

use common::DateTime;
use derive_more::From;
use juniper::{graphql_object, GraphQLEnum, GraphQLInputObject};
use service::domain::{attribute, listing};

use crate::{api, Context};

/// Typed custom field of a category.
#[derive(Clone, Debug, From)]
pub struct Attribute(attribute::Definition);

/// Typed custom field of a `Category`.
#[graphql_object(context = Context)]
impl Attribute {
    /// Stable identifier of this `Attribute`.
    #[must_use]
    pub fn document_id(&self) -> api::DocumentId {
        self.0.document_id.clone().into()
    }

    /// Human-readable name of this `Attribute`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Kind of values this `Attribute` holds.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.0.kind.into()
    }

    /// Indicator whether a `Listing` must provide a value of this
    /// `Attribute`.
    #[must_use]
    pub fn required(&self) -> bool {
        self.0.required
    }

    /// Allowed options of a `SELECT` or `MULTI_SELECT` `Attribute`.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.0.options
    }

    /// Additional constraints of this `Attribute`, like `minimum` or
    /// `maxLength`.
    #[must_use]
    pub fn metadata(&self) -> Vec<MetadataEntry> {
        self.0
            .metadata
            .iter()
            .map(|(key, value)| MetadataEntry {
                key: key.to_owned(),
                value: match value {
                    attribute::Scalar::Boolean(b) => b.to_string(),
                    attribute::Scalar::Number(n) => n.to_string(),
                    attribute::Scalar::Text(s) => s.clone(),
                },
            })
            .collect()
    }

    /// Indicator whether this `Attribute` is shown in forms.
    #[must_use]
    pub fn is_renderable(&self) -> bool {
        self.0.is_renderable()
    }

    /// Value a form starts with for this `Attribute`.
    #[must_use]
    pub fn default_value(&self) -> Value {
        Value::new(self.0.to_ref(), self.0.default_value())
    }
}

/// Single constraint of an [`Attribute`].
#[derive(Clone, Debug)]
pub struct MetadataEntry {
    /// Name of the constraint.
    key: String,

    /// Value of the constraint, rendered as a string.
    value: String,
}

/// Single constraint of an `Attribute`.
#[graphql_object(name = "AttributeMetadataEntry", context = Context)]
impl MetadataEntry {
    /// Name of this constraint.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Value of this constraint.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Kind of an `Attribute` value.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "AttributeKind")]
pub enum Kind {
    /// Free-form text.
    Text,

    /// Finite number.
    Number,

    /// Yes/no flag.
    Boolean,

    /// Calendar date.
    Date,

    /// Single option out of `Attribute.options`.
    Select,

    /// Any number of options out of `Attribute.options`.
    MultiSelect,
}

impl From<attribute::Kind> for Kind {
    fn from(kind: attribute::Kind) -> Self {
        use attribute::Kind as K;

        match kind {
            K::Text => Self::Text,
            K::Number => Self::Number,
            K::Boolean => Self::Boolean,
            K::Date => Self::Date,
            K::Select => Self::Select,
            K::MultiSelect => Self::MultiSelect,
        }
    }
}

/// Reference to an [`Attribute`] a [`Value`] belongs to.
#[derive(Clone, Debug, From)]
pub struct Ref(attribute::Ref);

/// Reference to an `Attribute`.
#[graphql_object(name = "AttributeRef", context = Context)]
impl Ref {
    /// Stable identifier of the referenced `Attribute`.
    #[must_use]
    pub fn document_id(&self) -> api::DocumentId {
        self.0.document_id.clone().into()
    }

    /// Name of the referenced `Attribute`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Kind of the referenced `Attribute`.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.0.kind.into()
    }
}

/// Value of an [`Attribute`].
#[derive(Clone, Debug)]
pub struct Value {
    /// [`Attribute`] this [`Value`] belongs to.
    attribute: attribute::Ref,

    /// Underlying [`attribute::Value`].
    value: attribute::Value,
}

impl Value {
    /// Creates a new [`Value`] of the referenced [`Attribute`].
    #[must_use]
    pub fn new(attribute: attribute::Ref, value: attribute::Value) -> Self {
        Self { attribute, value }
    }
}

impl From<listing::AttributeValue> for Value {
    fn from(v: listing::AttributeValue) -> Self {
        Self::new(v.attribute, v.value)
    }
}

/// Value of an `Attribute`.
///
/// Exactly the field matching `attribute.kind` is set, unless the value is
/// absent.
#[graphql_object(name = "AttributeValue", context = Context)]
impl Value {
    /// `Attribute` this value belongs to.
    #[must_use]
    pub fn attribute(&self) -> Ref {
        self.attribute.clone().into()
    }

    /// Value of a `TEXT` or `SELECT` `Attribute`.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.value {
            attribute::Value::Text(s) => Some(s),
            attribute::Value::Options(_)
            | attribute::Value::Number(_)
            | attribute::Value::Boolean(_)
            | attribute::Value::Date(_)
            | attribute::Value::Null => None,
        }
    }

    /// Value of a `NUMBER` `Attribute`.
    #[must_use]
    pub fn number(&self) -> Option<f64> {
        match self.value {
            attribute::Value::Number(n) => Some(n),
            attribute::Value::Text(_)
            | attribute::Value::Options(_)
            | attribute::Value::Boolean(_)
            | attribute::Value::Date(_)
            | attribute::Value::Null => None,
        }
    }

    /// Value of a `BOOLEAN` `Attribute`.
    #[must_use]
    pub fn boolean(&self) -> Option<bool> {
        match self.value {
            attribute::Value::Boolean(b) => Some(b),
            attribute::Value::Text(_)
            | attribute::Value::Options(_)
            | attribute::Value::Number(_)
            | attribute::Value::Date(_)
            | attribute::Value::Null => None,
        }
    }

    /// Value of a `DATE` `Attribute`.
    #[must_use]
    pub fn date(&self) -> Option<DateTime> {
        match self.value {
            attribute::Value::Date(dt) => Some(dt),
            attribute::Value::Text(_)
            | attribute::Value::Options(_)
            | attribute::Value::Number(_)
            | attribute::Value::Boolean(_)
            | attribute::Value::Null => None,
        }
    }

    /// Selected options of a `MULTI_SELECT` `Attribute`.
    #[must_use]
    pub fn options(&self) -> Option<&[String]> {
        match &self.value {
            attribute::Value::Options(o) => Some(o),
            attribute::Value::Text(_)
            | attribute::Value::Number(_)
            | attribute::Value::Boolean(_)
            | attribute::Value::Date(_)
            | attribute::Value::Null => None,
        }
    }
}

/// Value of an `Attribute` provided by a client.
///
/// The first set field out of `options`, `number`, `boolean`, `date` and
/// `text` is taken, while none of them means no value at all.
#[derive(Clone, Debug, Default, GraphQLInputObject)]
#[graphql(name = "AttributeValueInput")]
pub struct ValueInput {
    /// Value of a `TEXT` or `SELECT` `Attribute`.
    pub text: Option<String>,

    /// Value of a `NUMBER` `Attribute`.
    pub number: Option<f64>,

    /// Value of a `BOOLEAN` `Attribute`.
    pub boolean: Option<bool>,

    /// Value of a `DATE` `Attribute`.
    pub date: Option<DateTime>,

    /// Selected options of a `MULTI_SELECT` `Attribute`.
    pub options: Option<Vec<String>>,
}

impl From<ValueInput> for attribute::Value {
    fn from(input: ValueInput) -> Self {
        let ValueInput {
            text,
            number,
            boolean,
            date,
            options,
        } = input;

        if let Some(o) = options {
            Self::Options(o)
        } else if let Some(n) = number {
            Self::Number(n)
        } else if let Some(b) = boolean {
            Self::Boolean(b)
        } else if let Some(dt) = date {
            Self::Date(dt)
        } else {
            text.into()
        }
    }
}

/// Value of the `Attribute` with the specified `documentId`.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "AttributeValueEntry")]
pub struct ValueEntry {
    /// Stable identifier of the `Attribute`.
    pub document_id: api::DocumentId,

    /// Value of the `Attribute`.
    pub value: ValueInput,
}
