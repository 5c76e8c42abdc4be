//! Entity Module

pub mod reset_token;
pub mod user;
