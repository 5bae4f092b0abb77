//! Transforms a compiled [`Template`][`crate::Template`] and `Store` data
//! into output text.

mod builtin;
mod renderer;

pub(crate) use builtin::{each, if_, unless, with};
pub use renderer::{Body, Renderer};
