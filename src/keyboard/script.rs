//! Textual key scripts.
//!
//! Lets a key sequence be written as a string such as `"12.5 + 3 ="` or
//! `"9 DEL 8 * 2 ="`, which is how the command-line front end drives the
//! keyboard.

use lazy_static::lazy_static;
use regex::Regex;

use super::CalculatorKey;
use crate::error::ScriptError;

lazy_static! {
    /// Matches one key token at the start of the remaining input.
    /// Word tokens come first so `AC` is not read as something shorter.
    static ref KEY_TOKEN: Regex = Regex::new(
        r"^(?i:clear|del|ac|c|x)|^[0-9.,+\-*/×÷=<⌫]"
    ).unwrap();
}

/// Parse a key script into key presses.
///
/// Whitespace separates nothing and is skipped. Any other unrecognised
/// character is an error.
pub fn parse_script(script: &str) -> Result<Vec<CalculatorKey>, ScriptError> {
    let mut keys = Vec::new();
    let mut offset = 0;

    while offset < script.len() {
        let rest = &script[offset..];

        let Some(c) = rest.chars().next() else {
            break;
        };
        if c.is_whitespace() {
            offset += c.len_utf8();
            continue;
        }

        let Some(token) = KEY_TOKEN.find(rest) else {
            return Err(ScriptError::UnknownKey {
                token: c.to_string(),
                offset,
            });
        };

        keys.push(key_for_token(token.as_str()).ok_or_else(|| ScriptError::UnknownKey {
            token: token.as_str().to_string(),
            offset,
        })?);
        offset += token.end();
    }

    Ok(keys)
}

fn key_for_token(token: &str) -> Option<CalculatorKey> {
    let key = match token.to_ascii_lowercase().as_str() {
        "c" | "ac" | "clear" => CalculatorKey::Clear,
        "del" | "<" | "⌫" => CalculatorKey::Delete,
        "." | "," => CalculatorKey::Decimal,
        "+" => CalculatorKey::Add,
        "-" => CalculatorKey::Subtract,
        "*" | "x" | "×" => CalculatorKey::Multiply,
        "/" | "÷" => CalculatorKey::Divide,
        "=" => CalculatorKey::Equal,
        digit => {
            let d = digit.parse::<u8>().ok()?;
            CalculatorKey::digit(d)?
        }
    };
    Some(key)
}
