//! # Covid Web
//!
//! Serves the report site. Every `.yml` page config found under the config
//! directory becomes a GET route, listed once at startup in a
//! [`RouteTable`]. Pages are rendered on each request; figures and static
//! assets are served from the site directory.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod routes;
pub mod server;

pub use routes::*;
pub use server::*;
