//! Users: registration and owned player references

pub mod service;
pub mod validation;

pub use service::UserService;
pub use validation::{Registration, ValidationError, validate_registration};
