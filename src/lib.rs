//! Atomodon library.
//!
//! Fetches a Mastodon account's public posts via the server's REST API and
//! renders them as an Atom 1.0 feed document.

pub mod atom;
pub mod cache;
pub mod cli;
pub mod feed;
pub mod fetch;
pub mod mastodon;
pub mod render;
