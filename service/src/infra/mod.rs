//! Infrastructure layer.

pub mod cms;

pub use self::cms::Cms;
#[cfg(feature = "strapi")]
pub use self::cms::{strapi, Strapi};
