//! Scripting bridge
//!
//! The level's script language is evaluated elsewhere; this module only
//! defines the command surface it drives: atoms in, typed commands out,
//! `Value` or `ScriptError` back.

mod command;
mod error;
mod expr;

pub use command::*;
pub use error::*;
pub use expr::*;
