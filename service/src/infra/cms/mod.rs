//! [`Cms`]-related implementations.

#[cfg(test)]
pub(crate) mod memory;
#[cfg(feature = "strapi")]
pub mod strapi;

use derive_more::{Display, Error as StdError, From};

#[cfg(feature = "strapi")]
pub use self::strapi::Strapi;

/// Headless CMS operation.
pub use common::Handler as Cms;

/// [`Cms`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    #[cfg(feature = "strapi")]
    /// [`Strapi`] error.
    Strapi(strapi::Error),

    #[cfg(test)]
    /// In-memory [`Cms`] failure.
    #[display("in-memory `Cms` failed: {_0}")]
    #[from(ignore)]
    Memory(#[error(not(source))] String),
}
