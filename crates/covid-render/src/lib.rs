//! # Covid Render
//!
//! Renders report pages: a page config (YAML or JSON) names a Jinja
//! template, its variables and an optional Markdown description. The
//! description is rendered to HTML and handed to the template as
//! `mark_text`.
//!
//! The supported input formats are closed enums; any other extension is an
//! `UnsupportedFormat` error raised before anything is read or written.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod format;
pub mod markdown;
pub mod page;
pub mod renderer;

pub use format::*;
pub use markdown::*;
pub use page::*;
pub use renderer::*;
