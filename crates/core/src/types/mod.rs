//! Core types for Gemini Glam.
//!
//! Type-safe wrappers for ids, tagged enums and the remote records.

pub mod category;
pub mod email;
pub mod id;
pub mod parse_error;
pub mod price;
pub mod records;
pub mod role;
pub mod view;

pub use category::Category;
pub use email::{Email, EmailError};
pub use id::*;
pub use parse_error::UnknownTag;
pub use price::format_usd;
pub use records::{Product, Profile, UserRole};
pub use role::AppRole;
pub use view::View;
