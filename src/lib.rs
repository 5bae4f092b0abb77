//! A minimal logic-less template engine.
//!
//! Templates hold plain text and `{{ }}` expressions. Expressions pull
//! values from a [`Store`], iterate and branch through block helpers, and
//! include other templates as partials. All logic beyond that lives in
//! [`Helper`] functions registered on the [`Engine`].
//!
//! # Usage
//!
//! ```
//! use vellum::{Engine, Store};
//!
//! let engine = Engine::default();
//! let store = Store::new()
//!     .with_must("name", "taylor")
//!     .with_must("items", vec!["one", "two"]);
//!
//! let result = engine.render("hi {{name}}: {{#each items}}{{this}} {{/each}}", &store);
//! assert_eq!(result.unwrap(), "hi taylor: one two ");
//! ```
//!
//! # Syntax
//!
//! | Expression       | Output                                         |
//! |------------------|------------------------------------------------|
//! | `{{path}}`       | Value of `path`, HTML escaped.                 |
//! | `{{{path}}}`     | Value of `path`, verbatim.                     |
//! | `{{helper args}}`| Output of the helper.                          |
//! | `{{#name}}`      | Open a block, closed by `{{/name}}`.           |
//! | `{{^name}}`      | Open an inverted block.                        |
//! | `{{>name}}`      | Include the template with that name.           |
//! | `{{! text}}`     | Comment, no output.                            |
//!
//! Paths are dotted names resolved against the current scope, with `../`
//! climbing to the enclosing scope, `this` (or `.`) naming the scope
//! itself, and `@index`/`@key` naming the position inside the innermost
//! `{{#each}}` loop.

mod cache;
mod context;
mod engine;
mod format;
mod helper;
mod loader;
mod log;
mod region;
mod render;
mod store;

pub mod compile;

pub use cache::{Cache, DiskCache, MemoryCache};
pub use compile::{compile, Template};
pub use context::{is_truthy, Context};
pub use engine::Engine;
pub use helper::{split_arguments, Helper, Rendered};
pub use loader::{FilesystemLoader, Loader, StringLoader};
pub use log::{Error, ErrorKind};
pub use region::Region;
pub use render::{Body, Renderer};
pub use store::Store;

/// Create a new [`Engine`] with the built-in block helpers registered.
#[inline]
pub fn default() -> Engine {
    Engine::default()
}
