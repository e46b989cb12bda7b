//! Minimal OpenStack client surface for the service checks.
//!
//! Only what a one-shot probe needs: password authentication against
//! Keystone v3, endpoint resolution from the returned service catalog, and
//! authenticated GETs against the resolved endpoint. No session caching,
//! no retries; every invocation authenticates from scratch.

pub mod auth;
pub mod keystone;

pub use auth::{Credentials, Interface, ParseInterfaceError};
pub use keystone::{AuthError, EndpointNotFound, KeystoneClient, Session};
