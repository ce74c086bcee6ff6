//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render the chat chrome and controls while reading/writing
//! shared state from Leptos context providers.

pub mod ban_notice;
pub mod message_input;
pub mod message_list;
pub mod report_dialog;
pub mod session_controls;
pub mod status_bar;
pub mod toast_stack;
pub mod video_panel;
