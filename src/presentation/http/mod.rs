//! HTTP Layer
//!
//! Router assembly and the operational endpoints.

pub mod handlers;
pub mod routes;
