//! SAML types and data structures.
//!
//! Protocol constants, the decoded authentication request and the element
//! tree response documents are built on.

mod authn_request;
mod c14n;
mod constants;
mod xml;

pub use authn_request::*;
pub use c14n::{canonicalize, canonicalize_in};
pub use constants::*;
pub use xml::*;
