//! Wire representations of Strapi REST API entities.

use common::{
    pagination::{Page, Pagination},
    DateTime,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as Json;
use tracing as log;

use crate::domain::{
    self,
    attribute::{self, Metadata},
    category::{self, Level},
    listing, DocumentId, Slug,
};

use super::Error;

/// Envelope of a request body.
#[derive(Debug, Serialize)]
pub struct Data<T> {
    /// Enveloped entity.
    pub data: T,
}

/// Envelope of a response body.
#[derive(Debug, Deserialize)]
pub struct Response<T> {
    /// Returned entity or entities.
    pub data: T,

    /// Additional information about the returned [`Response::data`].
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: Meta,
}

impl<T> Response<Vec<T>> {
    /// Converts this [`Response`] into a [`Page`] of domain entities.
    ///
    /// # Errors
    ///
    /// If any of the entities is malformed.
    pub fn try_into_page<U>(self) -> Result<Page<U>, Error>
    where
        U: TryFrom<T, Error = Error>,
    {
        let items = self
            .data
            .into_iter()
            .map(U::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, self.meta.pagination))
    }
}

/// Metadata of a [`Response`].
#[derive(Debug, Default, Deserialize)]
pub struct Meta {
    /// [`Pagination`] of a list [`Response`], if any.
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Deserializes `null` as the [`Default`] value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Category entity.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Numeric ID of this [`Category`].
    pub id: category::Id,

    /// [`DocumentId`] of this [`Category`].
    pub document_id: DocumentId,

    /// [`Slug`] of this [`Category`].
    pub slug: Slug,

    /// Display name of this [`Category`].
    pub name: String,

    /// Populated child [`Category`]s.
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<Category>,

    /// Populated own [`Attribute`]s.
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: Vec<Attribute>,
}

/// Attribute entity.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    /// Numeric ID of this [`Attribute`].
    pub id: attribute::Id,

    /// [`DocumentId`] of this [`Attribute`].
    pub document_id: DocumentId,

    /// Name of this [`Attribute`].
    pub name: String,

    /// Raw kind of this [`Attribute`].
    #[serde(rename = "type")]
    pub kind: String,

    /// Indicator whether a value of this [`Attribute`] is mandatory.
    #[serde(default, deserialize_with = "null_as_default")]
    pub required: bool,

    /// Allowed options of a select [`Attribute`].
    #[serde(default, deserialize_with = "null_as_default")]
    pub options: Vec<String>,

    /// Raw validation constraints of this [`Attribute`].
    #[serde(default)]
    pub metadata: Json,
}

/// Parses the provided raw attribute `kind`, falling back to
/// [`attribute::Kind::Text`].
fn parse_kind(kind: &str, document_id: &DocumentId) -> attribute::Kind {
    kind.parse().unwrap_or_else(|_| {
        log::warn!(
            "`Attribute(documentId: {document_id})` has unknown type \
             `{kind}`, treating it as `text`",
        );
        attribute::Kind::Text
    })
}

/// Parses the provided raw attribute `metadata`, dropping the entries which
/// are not scalars.
fn parse_metadata(metadata: Json, document_id: &DocumentId) -> Metadata {
    let entries = match metadata {
        Json::Object(entries) => entries,
        Json::Null => return Metadata::default(),
        Json::Bool(_) | Json::Number(_) | Json::String(_) | Json::Array(_) => {
            log::warn!(
                "`Attribute(documentId: {document_id})` has non-object \
                 metadata `{metadata}`, ignoring it",
            );
            return Metadata::default();
        }
    };
    entries
        .into_iter()
        .filter_map(|(key, value)| {
            let scalar = match &value {
                Json::Bool(b) => Some(attribute::Scalar::Boolean(*b)),
                Json::Number(n) => n.as_f64().map(attribute::Scalar::Number),
                Json::String(s) => Some(attribute::Scalar::Text(s.clone())),
                Json::Null | Json::Array(_) | Json::Object(_) => None,
            };
            if scalar.is_none() {
                log::warn!(
                    "`Attribute(documentId: {document_id})` has non-scalar \
                     metadata `{key}: {value}`, ignoring it",
                );
            }
            Some((key, scalar?))
        })
        .collect()
}

impl From<Attribute> for attribute::Definition {
    fn from(a: Attribute) -> Self {
        Self {
            kind: parse_kind(&a.kind, &a.document_id),
            metadata: parse_metadata(a.metadata, &a.document_id),
            id: a.id,
            document_id: a.document_id,
            name: a.name,
            required: a.required,
            options: a.options,
        }
    }
}

/// Transforms the provided [`Category`] payload into a [`domain::Category`]
/// node of the provided [`Level`], along with all its populated children.
#[must_use]
pub fn transform_category_to_node(
    payload: Category,
    level: Level,
) -> domain::Category {
    domain::Category {
        id: payload.id,
        document_id: payload.document_id,
        slug: payload.slug,
        name: payload.name,
        level,
        children: payload
            .children
            .into_iter()
            .map(|c| transform_category_to_node(c, level.next()))
            .collect(),
        attributes: payload.attributes.into_iter().map(Into::into).collect(),
    }
}

/// Reference to a [`Category`], as populated into a [`Listing`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    /// Numeric ID of the referenced [`Category`].
    pub id: category::Id,

    /// [`DocumentId`] of the referenced [`Category`].
    pub document_id: DocumentId,

    /// [`Slug`] of the referenced [`Category`].
    pub slug: Slug,

    /// Display name of the referenced [`Category`].
    pub name: String,
}

impl From<CategoryRef> for category::Ref {
    fn from(c: CategoryRef) -> Self {
        Self {
            id: c.id,
            document_id: c.document_id,
            slug: c.slug,
            name: c.name,
        }
    }
}

/// Media library file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Numeric ID of this [`Image`].
    pub id: u64,

    /// URL of this [`Image`].
    pub url: String,

    /// Alternative text of this [`Image`].
    #[serde(default)]
    pub alternative_text: Option<String>,

    /// Width of this [`Image`] in pixels.
    #[serde(default)]
    pub width: Option<u32>,

    /// Height of this [`Image`] in pixels.
    #[serde(default)]
    pub height: Option<u32>,
}

impl From<Image> for listing::Image {
    fn from(i: Image) -> Self {
        Self {
            id: i.id,
            url: i.url,
            alternative_text: i.alternative_text,
            width: i.width,
            height: i.height,
        }
    }
}

/// Attribute value entity.
#[derive(Debug, Deserialize)]
pub struct AttributeValue {
    /// Raw value.
    #[serde(default)]
    pub value: Json,

    /// Populated [`AttributeRef`] the value belongs to.
    #[serde(default)]
    pub attribute: Option<AttributeRef>,
}

/// Reference to an [`Attribute`], as populated into an [`AttributeValue`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeRef {
    /// [`DocumentId`] of the referenced [`Attribute`].
    pub document_id: DocumentId,

    /// Name of the referenced [`Attribute`].
    pub name: String,

    /// Raw kind of the referenced [`Attribute`].
    #[serde(rename = "type")]
    pub kind: String,
}

/// Listing entity.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// Numeric ID of this [`Listing`].
    pub id: listing::Id,

    /// [`DocumentId`] of this [`Listing`].
    pub document_id: DocumentId,

    /// Raw title of this [`Listing`].
    pub title: String,

    /// Description of this [`Listing`].
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    /// Asked price of this [`Listing`].
    #[serde(default)]
    pub price: Option<f64>,

    /// Location of this [`Listing`].
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,

    /// [`Slug`] of this [`Listing`].
    pub slug: Slug,

    /// [`listing::Status`] of this [`Listing`].
    pub status: listing::Status,

    /// [`listing::Kind`] of this [`Listing`].
    #[serde(rename = "type")]
    pub kind: listing::Kind,

    /// Populated [`Image`]s.
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<Image>,

    /// Populated [`CategoryRef`]s.
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<CategoryRef>,

    /// Populated [`AttributeValue`]s.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        rename = "product_attribute_values"
    )]
    pub attribute_values: Vec<AttributeValue>,

    /// [`DateTime`] when this [`Listing`] was created.
    pub created_at: DateTime,

    /// [`DateTime`] when this [`Listing`] was last modified.
    pub updated_at: DateTime,
}

impl TryFrom<Listing> for domain::Listing {
    type Error = Error;

    fn try_from(l: Listing) -> Result<Self, Self::Error> {
        let title = listing::Title::new(l.title).ok_or_else(|| {
            Error::Malformed(format!(
                "`Listing(documentId: {})` has invalid title",
                l.document_id,
            ))
        })?;

        let attribute_values = l
            .attribute_values
            .into_iter()
            .filter_map(|v| {
                let a = v.attribute?;
                let kind = parse_kind(&a.kind, &a.document_id);
                Some(listing::AttributeValue {
                    value: decode_value(kind, v.value),
                    attribute: attribute::Ref {
                        document_id: a.document_id,
                        name: a.name,
                        kind,
                    },
                })
            })
            .collect();

        Ok(Self {
            id: l.id,
            document_id: l.document_id,
            title,
            description: l.description,
            price: l.price,
            address: l.address,
            slug: l.slug,
            status: l.status,
            kind: l.kind,
            images: l.images.into_iter().map(Into::into).collect(),
            categories: l.categories.into_iter().map(Into::into).collect(),
            attribute_values,
            created_at: l.created_at.coerce(),
            updated_at: l.updated_at.coerce(),
        })
    }
}

/// Decodes the provided raw `value` of an attribute of the provided `kind`.
///
/// Values not matching the `kind` are decoded as [`attribute::Value::Null`].
#[must_use]
pub fn decode_value(kind: attribute::Kind, value: Json) -> attribute::Value {
    use attribute::{Kind as K, Value as V};

    match (kind, value) {
        (K::Text | K::Select, Json::String(s)) => V::Text(s),
        (K::Text | K::Select, Json::Number(n)) => V::Text(n.to_string()),
        (K::Number, Json::Number(n)) => n.as_f64().map_or(V::Null, V::Number),
        (K::Number, Json::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map_or(V::Null, V::Number),
        (K::Boolean, Json::Bool(b)) => V::Boolean(b),
        (K::Boolean, Json::String(s)) => match s.as_str() {
            "true" => V::Boolean(true),
            "false" => V::Boolean(false),
            _ => V::Null,
        },
        (K::Date, Json::String(s)) => {
            DateTime::from_iso8601(&s).map_or(V::Null, V::Date)
        }
        (K::MultiSelect, Json::Array(items)) => V::Options(
            items
                .into_iter()
                .filter_map(|i| match i {
                    Json::String(s) => Some(s),
                    Json::Null
                    | Json::Bool(_)
                    | Json::Number(_)
                    | Json::Array(_)
                    | Json::Object(_) => None,
                })
                .collect(),
        ),
        (K::MultiSelect, Json::String(s)) => V::Options(vec![s]),
        (
            K::Text
            | K::Select
            | K::Number
            | K::Boolean
            | K::Date
            | K::MultiSelect,
            _,
        ) => V::Null,
    }
}

/// Encodes the provided attribute `value` into its raw representation.
#[must_use]
pub fn encode_value(value: &attribute::Value) -> Json {
    use attribute::Value as V;

    match value {
        V::Text(s) => Json::from(s.as_str()),
        V::Options(o) => Json::from(o.clone()),
        V::Number(n) => Json::from(*n),
        V::Boolean(b) => Json::from(*b),
        V::Date(d) => Json::from(d.to_rfc3339()),
        V::Null => Json::Null,
    }
}

/// Body of a new [`Listing`] creation request.
#[derive(Debug, Serialize)]
pub struct NewListing<'a> {
    /// Title of the new [`Listing`].
    pub title: &'a str,

    /// Description of the new [`Listing`].
    pub description: &'a str,

    /// Asked price of the new [`Listing`].
    pub price: Option<f64>,

    /// Location of the new [`Listing`].
    pub address: &'a str,

    /// [`listing::Kind`] of the new [`Listing`].
    #[serde(rename = "type")]
    pub kind: listing::Kind,

    /// [`listing::Status`] of the new [`Listing`].
    pub status: listing::Status,

    /// [`DocumentId`]s of the categories to connect.
    pub categories: Vec<&'a DocumentId>,
}

impl<'a> From<&'a listing::Draft> for NewListing<'a> {
    fn from(d: &'a listing::Draft) -> Self {
        Self {
            title: d.title.as_ref(),
            description: &d.description,
            price: d.price,
            address: &d.address,
            kind: d.kind,
            status: d.status,
            categories: d.categories.iter().map(|c| &c.document_id).collect(),
        }
    }
}

/// Body of a new [`AttributeValue`] creation request.
#[derive(Debug, Serialize)]
pub struct NewAttributeValue<'a> {
    /// [`DocumentId`] of the [`Listing`] the value belongs to.
    pub listing: &'a DocumentId,

    /// [`DocumentId`] of the [`Attribute`] the value belongs to.
    pub attribute: &'a DocumentId,

    /// Raw value.
    pub value: Json,
}

/// Body of a [`Listing`] status update request.
#[derive(Debug, Serialize)]
pub struct StatusUpdate {
    /// New [`listing::Status`].
    pub status: listing::Status,
}
