//! Service contains the catalog logic of the marketplace.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod filter;
pub mod infra;
pub mod query;
pub mod read;

use common::pagination::DEFAULT_PAGE_SIZE;
use serde::Deserialize;
use smart_default::SmartDefault;

#[cfg(doc)]
use infra::Cms;

pub use self::{command::Command, query::Query};

/// [`Service`] configuration.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Number of items on a page, when no page size is requested.
    #[default(DEFAULT_PAGE_SIZE)]
    pub default_page_size: u32,

    /// [`BatchPolicy`] of [`query::categories::Attributes`].
    pub attributes_batch: BatchPolicy,
}

/// Policy of handling a failed element of a batch operation.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchPolicy {
    /// Abort the whole batch with the error of the failed element.
    #[default]
    Propagate,

    /// Skip the failed element, logging a warning.
    Skip,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Cms> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Cms`] of this [`Service`].
    cms: Cms,
}

impl<Cms> Service<Cms> {
    /// Creates a new [`Service`] with the provided parameters.
    #[must_use]
    pub fn new(config: Config, cms: Cms) -> Self {
        Self { config, cms }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Cms`] of this [`Service`].
    #[must_use]
    pub fn cms(&self) -> &Cms {
        &self.cms
    }
}
