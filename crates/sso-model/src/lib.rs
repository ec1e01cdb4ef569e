//! # sso-model
//!
//! Inputs consumed by the SSO identity provider: the authenticated
//! principal, the relying application's configuration and the signing key
//! material. All of them are owned by external stores and read-only here.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod application;
pub mod key_material;
pub mod principal;
pub mod roles;

pub use application::RelyingApplication;
pub use key_material::KeyMaterial;
pub use principal::Principal;
pub use roles::{AssignedRoles, RoleResolver};
