//! Session-held models.

pub mod session;

pub use session::{
    CurrentUser, DesignerState, Notice, NoticeLevel, RosterSnapshot, ScreenState,
    keys as session_keys,
};
