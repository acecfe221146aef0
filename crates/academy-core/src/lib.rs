//! # Academy Core
//!
//! The domain layer of the STEM Academy portal.
//! Project catalog derivation, optimistic interaction bookkeeping and the
//! snapshot mirror live here, with no infrastructure dependencies.

pub mod access;
pub mod domain;
pub mod error;
pub mod listing;
pub mod mirror;
pub mod ports;
pub mod reconcile;

pub use error::DomainError;
