//! Gemini Glam Core - domain types and screen rules.
//!
//! Shared by the `storefront` web app and the `glam-cli` operations tool.
//!
//! # Architecture
//!
//! No I/O lives here: no HTTP clients, no sessions, no templates. Everything
//! the screens decide on their own (quiz scoring, the admin gate, roster
//! search, product form parsing, reading a design response) is a plain
//! function over these types so it can be tested without a server.
//!
//! # Modules
//!
//! - [`types`] - Ids, enums, and the remote record shapes
//! - [`quiz`] - Gem personality quiz and its tally
//! - [`gate`] - Session and admin access guard
//! - [`roster`] - Profile/role join and search for the admin panel
//! - [`product_form`] - Product dialog state and parsing
//! - [`design`] - Generation function request and response

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod design;
pub mod gate;
pub mod product_form;
pub mod quiz;
pub mod roster;
pub mod types;

pub use types::*;
