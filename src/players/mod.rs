//! Players and their embedded comments

pub mod service;

pub use service::PlayerService;
