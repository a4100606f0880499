//! [`Cms`] implementations of [`Strapi`].

#[cfg(doc)]
use crate::infra::{Cms, Strapi};

mod category;
mod listing;
