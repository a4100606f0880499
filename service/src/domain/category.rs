//! [`Category`] definitions.

use std::collections::HashSet;

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

use super::attribute;
pub use super::{DocumentId, Slug};

/// Node of the category tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Category {
    /// ID of this [`Category`].
    pub id: Id,

    /// [`DocumentId`] of this [`Category`].
    pub document_id: DocumentId,

    /// [`Slug`] of this [`Category`], unique across the whole tree.
    pub slug: Slug,

    /// Display name of this [`Category`].
    pub name: String,

    /// Depth of this [`Category`] in the tree, roots being at `0`.
    ///
    /// Always equals the parent's [`Level`] plus one.
    pub level: Level,

    /// Child [`Category`]s.
    pub children: Vec<Category>,

    /// Own attribute [`Definition`]s of this [`Category`].
    ///
    /// Attributes inherited from the ancestors are not included, see
    /// [`inherited_attributes()`].
    ///
    /// [`Definition`]: attribute::Definition
    pub attributes: Vec<attribute::Definition>,
}

impl Category {
    /// Searches this [`Category`] subtree (depth-first, including this
    /// [`Category`] itself) for the one with the provided [`Slug`].
    #[must_use]
    pub fn find(&self, slug: &Slug) -> Option<&Self> {
        if &self.slug == slug {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(slug))
    }

    /// Indicates whether the provided [`Category`] is a direct child of this
    /// one.
    #[must_use]
    pub fn has_child(&self, node: &Self) -> bool {
        self.children
            .iter()
            .any(|c| c.document_id == node.document_id)
    }

    /// Returns a [`Ref`] to this [`Category`].
    #[must_use]
    pub fn to_ref(&self) -> Ref {
        Ref {
            id: self.id,
            document_id: self.document_id.clone(),
            slug: self.slug.clone(),
            name: self.name.clone(),
        }
    }
}

/// Reference to a [`Category`], as embedded into listings.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Ref {
    /// ID of the referenced [`Category`].
    pub id: Id,

    /// [`DocumentId`] of the referenced [`Category`].
    pub document_id: DocumentId,

    /// [`Slug`] of the referenced [`Category`].
    pub slug: Slug,

    /// Name of the referenced [`Category`].
    pub name: String,
}

/// ID of a [`Category`].
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

/// Depth of a [`Category`] in the tree.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    Eq,
    From,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
)]
pub struct Level(u32);

impl Level {
    /// [`Level`] of root [`Category`]s.
    pub const ROOT: Self = Self(0);

    /// Returns the [`Level`] of children of a [`Category`] at this [`Level`].
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Searches the provided `roots` (depth-first) for the [`Category`] with the
/// provided [`Slug`].
#[must_use]
pub fn find<'c>(roots: &'c [Category], slug: &Slug) -> Option<&'c Category> {
    roots.iter().find_map(|r| r.find(slug))
}

/// Returns the root-to-node path of the [`Category`] with the provided
/// [`Slug`], if it exists in the provided `roots`.
#[must_use]
pub fn path_to<'c>(
    roots: &'c [Category],
    slug: &Slug,
) -> Option<Vec<&'c Category>> {
    fn descend<'c>(
        node: &'c Category,
        slug: &Slug,
        path: &mut Vec<&'c Category>,
    ) -> bool {
        path.push(node);
        if &node.slug == slug
            || node.children.iter().any(|c| descend(c, slug, path))
        {
            return true;
        }
        _ = path.pop();
        false
    }

    let mut path = Vec::new();
    roots
        .iter()
        .any(|r| descend(r, slug, &mut path))
        .then_some(path)
}

/// Aggregates attribute [`Definition`]s along the provided `path`.
///
/// Deduplicated by [`DocumentId`], the first occurrence wins, and the
/// insertion order is preserved.
///
/// [`Definition`]: attribute::Definition
#[must_use]
pub fn inherited_attributes<'c>(
    path: impl IntoIterator<Item = &'c Category>,
) -> Vec<attribute::Definition> {
    let mut seen = HashSet::new();
    path.into_iter()
        .flat_map(|c| &c.attributes)
        .filter(|a| seen.insert(a.document_id.clone()))
        .cloned()
        .collect()
}

/// Selected primary [`Category`] and, optionally, its subcategory.
///
/// Transitions consume the current [`Selection`] and return the new one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    /// Selected primary [`Category`].
    primary: Option<Category>,

    /// Selected child of the [`Selection::primary`] [`Category`].
    subcategory: Option<Category>,
}

impl Selection {
    /// Selects the provided primary [`Category`], clearing the subcategory.
    #[must_use]
    pub fn set_primary(self, node: Category) -> Self {
        Self {
            primary: Some(node),
            subcategory: None,
        }
    }

    /// Selects the provided subcategory.
    ///
    /// The [`Selection`] is returned unchanged if the provided [`Category`]
    /// is not a child of the selected primary one.
    #[must_use]
    pub fn set_subcategory(self, node: Category) -> Self {
        if !self.primary.as_ref().is_some_and(|p| p.has_child(&node)) {
            return self;
        }
        Self {
            subcategory: Some(node),
            ..self
        }
    }

    /// Clears this [`Selection`] entirely.
    #[must_use]
    pub fn clear(self) -> Self {
        Self::default()
    }

    /// Returns the selected primary [`Category`], if any.
    #[must_use]
    pub fn primary(&self) -> Option<&Category> {
        self.primary.as_ref()
    }

    /// Returns the selected subcategory, if any.
    #[must_use]
    pub fn subcategory(&self) -> Option<&Category> {
        self.subcategory.as_ref()
    }

    /// Returns the root-to-leaf path of this [`Selection`].
    #[must_use]
    pub fn path(&self) -> Vec<&Category> {
        self.primary.iter().chain(&self.subcategory).collect()
    }

    /// Returns the attribute [`Definition`]s inherited along the
    /// [`Selection::path()`].
    ///
    /// [`Definition`]: attribute::Definition
    #[must_use]
    pub fn attributes(&self) -> Vec<attribute::Definition> {
        inherited_attributes(self.path())
    }
}
