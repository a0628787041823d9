//! `HerbTrace` Core Library
//!
//! Shared functionality for `HerbTrace` components:
//! - Herb batch records and submission validation
//! - Object store seam (hosted HTTP API or in-memory)
//! - Herb data-access helpers on top of the object store
//! - The login stub that synthesises user profiles
//! - Configuration resolution, tracing setup, common error types

pub mod auth;
pub mod config;
pub mod error;
pub mod herb;
pub mod ids;
pub mod store;
pub mod tracing_init;

pub use auth::{UserProfile, UserType, authenticate_user};
pub use config::Config;
pub use error::{Error, Result, ValidationError};
pub use herb::{HERB_OBJECT_TYPE, HerbBatch, HerbDatabase, HerbForm, HerbRecord, Location};
pub use store::{Backend, MemoryStore, ObjectStore, StoreError};
