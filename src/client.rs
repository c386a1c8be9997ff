//! Shared client plumbing for the service façades.
//!
//! Every façade is a thin wrapper over a [`ServiceCore`] (transport plus
//! interceptors) built by a typed [`ClientBuilder`]. Argument checks live in
//! [`validation`] and always run before a request is built.

pub mod builder;
pub mod core;
pub mod validation;

pub use self::builder::{ClientBuilder, Service};
pub use self::core::ServiceCore;
