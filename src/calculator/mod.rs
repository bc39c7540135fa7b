//! Sequential calculator engine.
//!
//! This module provides:
//! - The key-driven [`CalculatorProcessor`]
//! - The binary [`Operator`]s it chains left to right
//! - Display formatting for computed values
//! - Copying results to the clipboard

mod clipboard;
mod format;
mod operator;
mod processor;

pub use clipboard::copy_to_clipboard;
pub use format::{SIGNIFICANT_DIGITS, format_fixed, format_value};
pub use operator::{ArithmeticFault, MAX_MAGNITUDE, Operator};
pub use processor::{CalculatorProcessor, ERROR_DISPLAY, EntryMode, MAX_OPERAND_DIGITS};
