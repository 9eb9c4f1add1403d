//! Domain layer: the user record and its persistence port.

pub mod user;

pub use user::{CreateUserDto, UpdateUserDto, User, UserRepositoryInterface};

pub use crate::shared::{DomainError, DomainResult};
