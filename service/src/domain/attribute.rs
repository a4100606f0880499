//! Category [`Definition`]s of custom typed attributes, their [`Value`]s and
//! validation.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

use common::{define_kind, DateTime};
use derive_more::{Display, From, Into};
use itertools::Itertools as _;
use serde::{Deserialize, Serialize};

pub use super::DocumentId;

/// [`Metadata`] key of the lower bound of a [`Kind::Number`] value.
pub const MINIMUM: &str = "minimum";

/// [`Metadata`] key of the upper bound of a [`Kind::Number`] value.
pub const MAXIMUM: &str = "maximum";

/// [`Metadata`] key of the increment of a [`Kind::Number`] input.
pub const STEP: &str = "step";

/// [`Metadata`] key of the minimal length of a [`Kind::Text`] value.
pub const MIN_LENGTH: &str = "minLength";

/// [`Metadata`] key of the maximal length of a [`Kind::Text`] value.
pub const MAX_LENGTH: &str = "maxLength";

/// Definition of a category-scoped custom attribute.
///
/// Created by the CMS and only ever read by this service.
#[derive(Clone, Debug, PartialEq)]
pub struct Definition {
    /// ID of this [`Definition`].
    pub id: Id,

    /// [`DocumentId`] of this [`Definition`].
    pub document_id: DocumentId,

    /// Display name of this [`Definition`], also used as a lookup key by the
    /// CMS filters.
    pub name: String,

    /// [`Kind`] of values this [`Definition`] accepts.
    pub kind: Kind,

    /// Indicator whether a value is required.
    pub required: bool,

    /// Allowed options of a [`Kind::Select`] or [`Kind::MultiSelect`] value.
    pub options: Vec<String>,

    /// Additional constraints of a value.
    pub metadata: Metadata,
}

impl Definition {
    /// Indicates whether a form field can be rendered for this [`Definition`].
    ///
    /// Select-like attributes without options have nothing to offer.
    #[must_use]
    pub fn is_renderable(&self) -> bool {
        !matches!(self.kind, Kind::Select | Kind::MultiSelect)
            || !self.options.is_empty()
    }

    /// Returns the default [`Value`] of this [`Definition`].
    #[must_use]
    pub fn default_value(&self) -> Value {
        self.kind.default_value()
    }

    /// Returns a [`Ref`] to this [`Definition`].
    #[must_use]
    pub fn to_ref(&self) -> Ref {
        Ref {
            document_id: self.document_id.clone(),
            name: self.name.clone(),
            kind: self.kind,
        }
    }

    /// Validates the provided [`Value`] against this [`Definition`].
    ///
    /// Returns a human-readable error message if the [`Value`] is invalid.
    #[must_use]
    pub fn validate(&self, value: &Value) -> Option<String> {
        validate(value, self)
    }
}

/// Reference to an attribute [`Definition`], as embedded into listings.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Ref {
    /// [`DocumentId`] of the referenced [`Definition`].
    pub document_id: DocumentId,

    /// Name of the referenced [`Definition`].
    pub name: String,

    /// [`Kind`] of the referenced [`Definition`].
    pub kind: Kind,
}

/// ID of an attribute [`Definition`].
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
pub struct Id(u64);

define_kind! {
    #[doc = "Kind of an attribute [`Value`]."]
    enum Kind {
        #[doc = "Free-form text."]
        Text = "text",

        #[doc = "Finite number."]
        Number = "number",

        #[doc = "Yes/no flag."]
        Boolean = "boolean",

        #[doc = "Calendar date."]
        Date = "date",

        #[doc = "Single option out of a predefined list."]
        Select = "select",

        #[doc = "Any number of options out of a predefined list."]
        MultiSelect = "multi-select",
    }
}

impl Kind {
    /// Returns the default [`Value`] of this [`Kind`].
    #[must_use]
    pub fn default_value(self) -> Value {
        match self {
            Self::Text | Self::Select => Value::Text(String::new()),
            Self::Number => Value::Number(0.0),
            Self::Boolean => Value::Boolean(false),
            Self::Date => Value::Null,
            Self::MultiSelect => Value::Options(Vec::new()),
        }
    }
}

/// Returns the default [`Value`] of the provided `kind` string.
///
/// Unrecognized kinds default to [`Value::Null`].
#[must_use]
pub fn default_value_for(kind: &str) -> Value {
    kind.parse::<Kind>()
        .map_or(Value::Null, Kind::default_value)
}

/// Value of an attribute.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Text value of a [`Kind::Text`] or [`Kind::Select`] attribute.
    Text(String),

    /// Selected options of a [`Kind::MultiSelect`] attribute.
    Options(Vec<String>),

    /// Value of a [`Kind::Number`] attribute.
    Number(f64),

    /// Value of a [`Kind::Boolean`] attribute.
    Boolean(bool),

    /// Value of a [`Kind::Date`] attribute.
    Date(DateTime),

    /// No value at all.
    Null,
}

impl Value {
    /// Indicates whether this [`Value`] is empty: [`Value::Null`], a blank
    /// text or an empty list of options.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Options(o) => o.is_empty(),
            Self::Number(_) | Self::Boolean(_) | Self::Date(_) => false,
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

impl From<DateTime> for Value {
    fn from(dt: DateTime) -> Self {
        Self::Date(dt)
    }
}

impl<T: Into<String>> From<Vec<T>> for Value {
    fn from(options: Vec<T>) -> Self {
        Self::Options(options.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Scalar stored in [`Metadata`].
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Boolean scalar.
    Boolean(bool),

    /// Numeric scalar.
    Number(f64),

    /// Textual scalar.
    Text(String),
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

/// Additional constraints of an attribute [`Definition`].
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, Scalar>);

impl Metadata {
    /// Returns the [`Scalar`] stored under the provided `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Scalar> {
        self.0.get(key)
    }

    /// Returns the number stored under the provided `key`, if any.
    ///
    /// Numeric strings are accepted too, as the CMS admin doesn't always keep
    /// JSON types intact.
    #[must_use]
    pub fn number(&self, key: &str) -> Option<f64> {
        let n = match self.get(key)? {
            Scalar::Number(n) => Some(*n),
            Scalar::Text(s) => s.trim().parse().ok(),
            Scalar::Boolean(_) => None,
        };
        n.filter(|n| n.is_finite())
    }

    /// Returns the non-negative length stored under the provided `key`, if
    /// any.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "checked to be a non-negative integer"
    )]
    #[must_use]
    pub fn length(&self, key: &str) -> Option<usize> {
        let n = self.number(key)?;
        (n >= 0.0 && n.fract() == 0.0).then_some(n as usize)
    }

    /// Indicates whether this [`Metadata`] holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the entries in the order of their keys.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Scalar>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Validates the provided [`Value`] against the provided [`Definition`].
///
/// Returns a human-readable error message if the [`Value`] is invalid, so the
/// callers may aggregate them into [`Errors`] rather than failing.
#[must_use]
pub fn validate(value: &Value, definition: &Definition) -> Option<String> {
    let name = &definition.name;

    if value.is_empty() {
        return definition
            .required
            .then(|| format!("{name} is required"));
    }

    match definition.kind {
        Kind::Text => {
            let Value::Text(text) = value else {
                return Some(format!("{name} must be a text"));
            };
            let len = text.chars().count();
            if let Some(min) = definition.metadata.length(MIN_LENGTH) {
                if len < min {
                    return Some(format!(
                        "{name} must be at least {min} characters long",
                    ));
                }
            }
            if let Some(max) = definition.metadata.length(MAX_LENGTH) {
                if len > max {
                    return Some(format!(
                        "{name} must be at most {max} characters long",
                    ));
                }
            }
            None
        }
        Kind::Number => {
            let Value::Number(n) = *value else {
                return Some(format!("{name} must be a number"));
            };
            if !n.is_finite() {
                return Some(format!("{name} must be a finite number"));
            }
            if let Some(min) = definition.metadata.number(MINIMUM) {
                if n < min {
                    return Some(format!("{name} must be at least {min}"));
                }
            }
            if let Some(max) = definition.metadata.number(MAXIMUM) {
                if n > max {
                    return Some(format!("{name} must be at most {max}"));
                }
            }
            None
        }
        Kind::Select => {
            let Value::Text(option) = value else {
                return Some(format!("{name} must be one of the options"));
            };
            (!definition.options.contains(option))
                .then(|| format!("Invalid option for {name}: {option}"))
        }
        Kind::MultiSelect => {
            let Value::Options(selected) = value else {
                return Some(format!("{name} must be a list of options"));
            };
            let invalid = selected
                .iter()
                .filter(|o| !definition.options.contains(o))
                .collect::<Vec<_>>();
            (!invalid.is_empty()).then(|| {
                format!(
                    "Invalid options for {name}: {}",
                    invalid.iter().join(", "),
                )
            })
        }
        Kind::Boolean | Kind::Date => None,
    }
}

/// Validates all the provided `values` against their [`Definition`]s.
///
/// A [`Definition`] missing from `values` is validated against its default
/// [`Value`].
#[must_use]
pub fn validate_all<'d>(
    definitions: impl IntoIterator<Item = &'d Definition>,
    values: &HashMap<DocumentId, Value>,
) -> Errors {
    definitions
        .into_iter()
        .filter_map(|def| {
            let default;
            let value = if let Some(v) = values.get(&def.document_id) {
                v
            } else {
                default = def.default_value();
                &default
            };
            validate(value, def).map(|msg| (def.document_id.clone(), msg))
        })
        .collect()
}

/// Validation error messages keyed by the [`DocumentId`] of the invalid
/// attribute.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Errors(BTreeMap<DocumentId, String>);

impl Errors {
    /// Returns the error message of the attribute with the provided
    /// [`DocumentId`], if any.
    #[must_use]
    pub fn get(&self, id: &DocumentId) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    /// Indicates whether there are no errors at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of invalid attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the errors in the order of their [`DocumentId`]s.
    pub fn iter(&self) -> impl Iterator<Item = (&DocumentId, &str)> {
        self.0.iter().map(|(id, msg)| (id, msg.as_str()))
    }
}

impl FromIterator<(DocumentId, String)> for Errors {
    fn from_iter<I: IntoIterator<Item = (DocumentId, String)>>(
        iter: I,
    ) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .iter()
                .format_with("; ", |(id, msg), f| f(&format_args!(
                    "{id}: {msg}"
                ))),
        )
    }
}

/// [`Definition`] paired with its current [`Value`] and validation error.
#[derive(Clone, Debug, PartialEq)]
pub struct State {
    /// [`Definition`] of the attribute.
    pub definition: Definition,

    /// Current [`Value`] of the attribute.
    pub value: Value,

    /// Error message of the last validation, if it failed.
    pub error: Option<String>,
}

/// Ordered [`State`]s of all the attributes of a category selection.
///
/// Never patched in place when the attribute set changes: a new [`States`]
/// is created out of the new [`Definition`]s instead.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct States(Vec<State>);

impl States {
    /// Creates new [`States`] out of the provided [`Definition`]s, taking
    /// their values from `initial` ones or falling back to the defaults.
    #[must_use]
    pub fn new(
        definitions: impl IntoIterator<Item = Definition>,
        initial: &HashMap<DocumentId, Value>,
    ) -> Self {
        Self(
            definitions
                .into_iter()
                .map(|definition| State {
                    value: initial
                        .get(&definition.document_id)
                        .cloned()
                        .unwrap_or_else(|| definition.default_value()),
                    definition,
                    error: None,
                })
                .collect(),
        )
    }

    /// Sets the [`Value`] of the attribute with the provided [`DocumentId`],
    /// clearing its previous validation error.
    ///
    /// Returns `false` if there is no such attribute.
    pub fn set(&mut self, id: &DocumentId, value: Value) -> bool {
        let Some(state) =
            self.0.iter_mut().find(|s| &s.definition.document_id == id)
        else {
            return false;
        };
        state.value = value;
        state.error = None;
        true
    }

    /// Returns the [`State`] of the attribute with the provided
    /// [`DocumentId`], if any.
    #[must_use]
    pub fn get(&self, id: &DocumentId) -> Option<&State> {
        self.0.iter().find(|s| &s.definition.document_id == id)
    }

    /// Validates all the [`State`]s, storing their errors, and returns them
    /// aggregated.
    pub fn validate(&mut self) -> Errors {
        for state in &mut self.0 {
            state.error = validate(&state.value, &state.definition);
        }
        self.0
            .iter()
            .filter_map(|s| {
                s.error
                    .clone()
                    .map(|msg| (s.definition.document_id.clone(), msg))
            })
            .collect()
    }

    /// Returns the current [`Value`]s keyed by their [`DocumentId`]s.
    #[must_use]
    pub fn values(&self) -> HashMap<DocumentId, Value> {
        self.0
            .iter()
            .map(|s| (s.definition.document_id.clone(), s.value.clone()))
            .collect()
    }

    /// Iterates over the [`State`]s in order.
    pub fn iter(&self) -> impl Iterator<Item = &State> {
        self.0.iter()
    }

    /// Indicates whether there are no attributes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod spec {
    use std::collections::HashMap;

    use common::DateTime;

    use super::{
        default_value_for, validate, validate_all, Definition, DocumentId,
        Id, Kind, Metadata, States, Value, MAXIMUM, MAX_LENGTH, MINIMUM,
        MIN_LENGTH,
    };

    fn definition(kind: Kind) -> Definition {
        Definition {
            id: Id::from(1),
            document_id: "attr".into(),
            name: "Field".into(),
            kind,
            required: false,
            options: vec![],
            metadata: Metadata::default(),
        }
    }

    fn colors() -> Definition {
        Definition {
            name: "Color".into(),
            options: vec!["red".into(), "green".into(), "blue".into()],
            ..definition(Kind::MultiSelect)
        }
    }

    #[test]
    fn default_values_are_kind_determined() {
        assert_eq!(Kind::Text.default_value(), Value::Text(String::new()));
        assert_eq!(Kind::Select.default_value(), Value::Text(String::new()));
        assert_eq!(Kind::Number.default_value(), Value::Number(0.0));
        assert_eq!(Kind::Boolean.default_value(), Value::Boolean(false));
        assert_eq!(Kind::Date.default_value(), Value::Null);
        assert_eq!(Kind::MultiSelect.default_value(), Value::Options(vec![]));
    }

    #[test]
    fn unknown_kind_defaults_to_null() {
        assert_eq!(default_value_for("multi-select"), Value::Options(vec![]));
        assert_eq!(default_value_for("color-picker"), Value::Null);
        assert_eq!(default_value_for(""), Value::Null);
    }

    #[test]
    fn empty_values_are_valid_unless_required() {
        for kind in Kind::ALL {
            let def = definition(*kind);
            for empty in [
                Value::Null,
                Value::Text(String::new()),
                Value::Text("   ".into()),
                Value::Options(vec![]),
            ] {
                assert_eq!(validate(&empty, &def), None, "{kind}: {empty:?}");

                let required = Definition {
                    required: true,
                    ..def.clone()
                };
                assert_eq!(
                    validate(&empty, &required).as_deref(),
                    Some("Field is required"),
                );
            }
        }
    }

    #[test]
    fn text_length_is_bounded_by_metadata() {
        let def = Definition {
            metadata: [(MIN_LENGTH, 2.0), (MAX_LENGTH, 4.0)]
                .into_iter()
                .collect(),
            ..definition(Kind::Text)
        };

        assert!(validate(&"a".into(), &def).is_some());
        assert_eq!(validate(&"ab".into(), &def), None);
        assert_eq!(validate(&"абвг".into(), &def), None);
        assert!(validate(&"abcde".into(), &def).is_some());
        assert!(validate(&Value::Number(3.0), &def).is_some());
    }

    #[test]
    fn number_is_finite_and_bounded() {
        let def = Definition {
            metadata: [(MINIMUM, 1.0), (MAXIMUM, 10.0)].into_iter().collect(),
            ..definition(Kind::Number)
        };

        assert_eq!(validate(&Value::Number(1.0), &def), None);
        assert_eq!(validate(&Value::Number(10.0), &def), None);
        assert_eq!(
            validate(&Value::Number(0.5), &def).as_deref(),
            Some("Field must be at least 1"),
        );
        assert_eq!(
            validate(&Value::Number(11.0), &def).as_deref(),
            Some("Field must be at most 10"),
        );
        assert!(validate(&Value::Number(f64::NAN), &def).is_some());
        assert!(validate(&Value::Number(f64::INFINITY), &def).is_some());
        assert!(validate(&"5".into(), &def).is_some());
    }

    #[test]
    fn numeric_metadata_may_be_stringified() {
        let def = Definition {
            metadata: [(MAXIMUM, "10")].into_iter().collect(),
            ..definition(Kind::Number)
        };

        assert!(validate(&Value::Number(11.0), &def).is_some());
    }

    #[test]
    fn select_value_must_be_an_option() {
        let def = Definition {
            options: vec!["new".into(), "used".into()],
            ..definition(Kind::Select)
        };

        assert_eq!(validate(&"used".into(), &def), None);
        assert_eq!(
            validate(&"broken".into(), &def).as_deref(),
            Some("Invalid option for Field: broken"),
        );
    }

    #[test]
    fn multi_select_reports_invalid_members_only() {
        let def = colors();

        assert_eq!(validate(&vec!["red", "blue"].into(), &def), None);
        assert_eq!(
            validate(&vec!["red", "pink", "teal"].into(), &def).as_deref(),
            Some("Invalid options for Color: pink, teal"),
        );
        assert!(validate(&"red".into(), &def).is_some());
    }

    #[test]
    fn multi_select_fails_iff_some_member_is_not_an_option() {
        let def = colors();
        let samples: &[&[&str]] = &[
            &["red"],
            &["red", "green", "blue"],
            &["black"],
            &["blue", "black"],
            &["red", "red"],
        ];

        for sample in samples {
            let outside = sample.iter().any(|o| !def.options.iter().any(|d| d == o));
            let value = Value::from(sample.to_vec());
            assert_eq!(validate(&value, &def).is_some(), outside, "{sample:?}");
        }
    }

    #[test]
    fn boolean_and_date_have_no_extra_constraints() {
        let mut def = definition(Kind::Boolean);
        def.required = true;
        assert_eq!(validate(&Value::Boolean(false), &def), None);

        def.kind = Kind::Date;
        let date = DateTime::from_iso8601("2024-01-01").unwrap();
        assert_eq!(validate(&Value::Date(date), &def), None);
        assert!(validate(&Value::Null, &def).is_some());
    }

    #[test]
    fn renders_select_only_with_options() {
        assert!(!definition(Kind::Select).is_renderable());
        assert!(!definition(Kind::MultiSelect).is_renderable());
        assert!(colors().is_renderable());
        assert!(definition(Kind::Text).is_renderable());
    }

    #[test]
    fn aggregates_errors_by_document_id() {
        let title = Definition {
            document_id: "title".into(),
            name: "Title".into(),
            required: true,
            ..definition(Kind::Text)
        };
        let color = Definition {
            document_id: "color".into(),
            ..colors()
        };
        let year = Definition {
            document_id: "year".into(),
            ..definition(Kind::Number)
        };
        let values = HashMap::from([
            (DocumentId::from("color"), Value::from(vec!["pink"])),
            (DocumentId::from("year"), Value::Number(1999.0)),
        ]);

        let errors = validate_all(&[title, color, year], &values);

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get(&"title".into()), Some("Title is required"));
        assert_eq!(
            errors.get(&"color".into()),
            Some("Invalid options for Color: pink"),
        );
        assert_eq!(errors.get(&"year".into()), None);
        assert_eq!(
            errors.to_string(),
            "color: Invalid options for Color: pink; title: Title is required",
        );
    }

    #[test]
    fn states_start_from_initial_or_default_values() {
        let defs = vec![
            Definition {
                document_id: "a".into(),
                required: true,
                ..definition(Kind::Text)
            },
            Definition {
                document_id: "b".into(),
                ..definition(Kind::Number)
            },
        ];
        let initial = HashMap::from([(DocumentId::from("b"), Value::Number(7.0))]);

        let mut states = States::new(defs, &initial);

        assert_eq!(
            states.get(&"a".into()).unwrap().value,
            Value::Text(String::new()),
        );
        assert_eq!(states.get(&"b".into()).unwrap().value, Value::Number(7.0));

        let errors = states.validate();
        assert_eq!(errors.len(), 1);
        assert!(states.get(&"a".into()).unwrap().error.is_some());

        assert!(states.set(&"a".into(), "filled".into()));
        assert!(states.get(&"a".into()).unwrap().error.is_none());
        assert!(states.validate().is_empty());
        assert!(!states.set(&"missing".into(), Value::Null));
    }
}
