// src/trust/mod.rs

//! Trusted root handling
//!
//! A repository profile carries its root of trust as a transport string
//! (base64 of the root JSON) so it can live inside the YAML configuration.
//! Before each download the string is decoded back into canonical JSON and
//! written next to the cached metadata.
//!
//! [`fetch_root`] is the only place where a new trust anchor enters the
//! system. It checks that the document parses as a TUF root, but nothing
//! about its signatures: a successful fetch means the operator asserted
//! trust in it.

mod codec;
mod fetch;

pub use codec::{canonicalize, decode, encode};
pub use fetch::{fetch_root, RootSource};

/// File name of the materialized trusted root inside a metadata directory
pub const ROOT_FILE: &str = "root.json";
