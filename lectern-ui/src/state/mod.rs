//! State Management
//!
//! Global console state shared through Leptos context.

pub mod console;

pub use console::{
    format_timestamp, initials, provide_console_state, use_console_state, ConsoleState,
};
