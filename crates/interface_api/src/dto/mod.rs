//! Request and response bodies

pub mod auth;
pub mod policy;
