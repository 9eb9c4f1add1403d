//! Identity module: user management
//!
//! Contains the `UserService` which orchestrates the user use-cases:
//! listing, creation, profile updates and removal.

pub mod service;

pub use service::UserService;
