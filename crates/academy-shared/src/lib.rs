//! # Academy Shared
//!
//! Wire types shared by the portal server and its clients.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
