//! Parsing, normalization, resolution and relativization of [RFC 2396](https://www.ietf.org/rfc/rfc2396) URI references,
//! with the [RFC 2732](https://www.ietf.org/rfc/rfc2732) IPv6 literals.
//!
//! ```
//! use oxuri::Uri;
//!
//! // Parse and validate a base URI
//! let base = Uri::parse("http://foo.com/bar/baz").unwrap();
//!
//! // Validate and resolve a relative URI
//! let uri = base.resolve_str("bat#foo").unwrap();
//! assert_eq!(uri.as_str(), "http://foo.com/bar/bat#foo");
//!
//! // Extract URI components
//! assert_eq!(uri.scheme(), Some("http"));
//! assert_eq!(uri.raw_authority(), Some("foo.com"));
//! assert_eq!(uri.host(), Some("foo.com"));
//! assert_eq!(uri.raw_path(), Some("/bar/bat"));
//! assert_eq!(uri.raw_query(), None);
//! assert_eq!(uri.raw_fragment(), Some("foo"));
//!
//! // And go back
//! let directory = Uri::parse("http://foo.com/bar/").unwrap();
//! assert_eq!(directory.relativize(&uri).as_str(), "bat#foo");
//! ```
//!
//! Equality, hashing and ordering are semantic: the scheme and the host are case insensitive,
//! as are the hexadecimal digits of the `%XX` escapes.
//!
//! ```
//! use oxuri::Uri;
//!
//! assert_eq!(
//!     Uri::parse("HTTP://Example.com/a%2fb").unwrap(),
//!     Uri::parse("http://example.com/a%2Fb").unwrap()
//! );
//! ```
#![deny(
    future_incompatible,
    nonstandard_style,
    rust_2018_idioms,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_qualifications
)]

mod builder;
mod chars;
mod encoding;
mod error;
mod log;
mod normalize;
mod parser;
mod resolve;
mod uri;

pub use crate::builder::UriBuilder;
pub use crate::chars::CharClass;
pub use crate::encoding::{decode, encode_non_ascii, quote};
pub use crate::error::UriSyntaxError;
pub use crate::normalize::normalize_path;
pub use crate::parser::ParseOptions;
pub use crate::uri::Uri;
