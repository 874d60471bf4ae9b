//! Toggle debugger breakpoints in Python source.
//!
//! The crate inserts and removes breakpoint statements at the indentation a
//! statement needs at that point, wraps selections in a try/except guard that
//! drops into the debugger, and keeps the helper setup block used by the
//! `_breakpoint()` style in sync. Commands operate on an in-memory
//! [`Buffer`] so the same code serves the CLI and the tests.

#[macro_use]
mod macros;

pub mod breakpoint;
pub mod buffer;
pub mod classify;
pub mod commands;
pub mod error;
pub mod guard;
pub mod indent;
pub mod io;
pub mod settings;
pub mod setup;

pub use crate::{
    breakpoint::{Breakpoint, Style},
    buffer::{Buffer, Edit, Highlight, Region},
    commands::{
        GotoItem,
        Outcome,
        Selection,
        clear_all,
        goto_items,
        is_python,
        restore_highlights,
        toggle,
    },
    error::{Error, Result},
    settings::{Config, Preferences, Settings},
};
