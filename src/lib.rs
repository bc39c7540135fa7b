//! A headless calculator keyboard.
//!
//! The [`calculator`] module holds the sequential calculator engine; the
//! [`keyboard`] module wraps it with key identifiers, callbacks, and value
//! presets for whatever surface delivers the key presses.

pub mod calculator;
pub mod config;
pub mod error;
pub mod keyboard;
pub mod logging;

pub use calculator::{CalculatorProcessor, EntryMode, Operator};
pub use keyboard::{CalculatorKey, CalculatorKeyboard, parse_script};
