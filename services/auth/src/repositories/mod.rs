//! Persistence for the authentication service

pub mod user;

pub use user::{CredentialStore, UserRepository};
