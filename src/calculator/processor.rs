//! The sequential calculator engine.
//!
//! [`CalculatorProcessor`] turns discrete key presses into a running display
//! string. Evaluation is eager and strictly left to right: every operator
//! press resolves the previous operator before it becomes pending itself.
//!
//! Every operation returns the string to display. Nothing here fails from
//! the caller's point of view; arithmetic faults switch the processor into a
//! sticky error state that only [`CalculatorProcessor::clear_all`] leaves.

use tracing::{trace, warn};

use super::format::{format_fixed, format_value};
use super::operator::{ArithmeticFault, Operator};

/// Display shown while the processor is in its error state.
pub const ERROR_DISPLAY: &str = "Error";

/// Maximum number of significant digits accepted in a single operand.
pub const MAX_OPERAND_DIGITS: usize = 15;

/// Hard limit on operand text, bounding runs of leading fraction zeros.
const MAX_OPERAND_LEN: usize = 32;

/// How typed digits form an operand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EntryMode {
    /// Digits append left to right; the decimal key places the point.
    #[default]
    FreeForm,
    /// Cash-register entry: digits shift in from the right of an implicit
    /// decimal point `places` digits from the end. The decimal key is inert.
    FixedPoint { places: u8 },
}

impl EntryMode {
    /// Whether the decimal key does anything in this mode.
    pub fn accepts_decimal_key(self) -> bool {
        matches!(self, Self::FreeForm)
    }
}

/// Calculator state driven one key at a time.
#[derive(Clone, Debug)]
pub struct CalculatorProcessor {
    entry_mode: EntryMode,
    /// Free-form: the operand text as typed, never empty.
    /// Fixed-point: the raw digit string, empty meaning zero.
    current_operand: String,
    accumulated_result: f64,
    pending_operator: Option<Operator>,
    entering_new_operand: bool,
    error: Option<ArithmeticFault>,
}

impl Default for CalculatorProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculatorProcessor {
    pub fn new() -> Self {
        Self::with_entry_mode(EntryMode::default())
    }

    pub fn with_entry_mode(entry_mode: EntryMode) -> Self {
        Self {
            entry_mode,
            current_operand: Self::empty_operand(entry_mode),
            accumulated_result: 0.0,
            pending_operator: None,
            entering_new_operand: true,
            error: None,
        }
    }

    fn empty_operand(entry_mode: EntryMode) -> String {
        match entry_mode {
            EntryMode::FreeForm => "0".to_string(),
            EntryMode::FixedPoint { .. } => String::new(),
        }
    }

    pub fn entry_mode(&self) -> EntryMode {
        self.entry_mode
    }

    /// Switch entry mode. The processor is cleared since a half-typed
    /// operand has no meaning in the other mode.
    pub fn set_entry_mode(&mut self, entry_mode: EntryMode) -> String {
        self.entry_mode = entry_mode;
        self.clear_all()
    }

    /// Check if the processor is in its sticky error state.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn pending_operator(&self) -> Option<Operator> {
        self.pending_operator
    }

    pub fn accumulated_result(&self) -> f64 {
        self.accumulated_result
    }

    /// Whether the operand under entry already holds a decimal point.
    pub fn has_decimal_point(&self) -> bool {
        !self.entering_new_operand && self.current_operand.contains('.')
    }

    /// The string currently on the display.
    pub fn display(&self) -> String {
        if self.error.is_some() {
            return ERROR_DISPLAY.to_string();
        }

        if self.entering_new_operand {
            return format_value(self.accumulated_result);
        }

        match self.entry_mode {
            EntryMode::FreeForm => self.current_operand.clone(),
            EntryMode::FixedPoint { places } => format_fixed(&self.current_operand, places),
        }
    }

    /// Numeric value of the operand under entry.
    fn operand_value(&self) -> f64 {
        let text = match self.entry_mode {
            EntryMode::FreeForm => self.current_operand.trim_end_matches('.').to_string(),
            EntryMode::FixedPoint { places } => format_fixed(&self.current_operand, places),
        };
        text.parse().unwrap_or(0.0)
    }

    /// Significant digits in the operand; leading zeros are free.
    fn operand_digit_count(&self) -> usize {
        self.current_operand
            .chars()
            .filter(|c| c.is_ascii_digit())
            .skip_while(|&c| c == '0')
            .count()
    }

    /// Record an arithmetic fault and switch to the error display.
    pub(crate) fn fail(&mut self, fault: ArithmeticFault) -> String {
        warn!(?fault, "calculator entered error state");
        self.error = Some(fault);
        self.pending_operator = None;
        self.entering_new_operand = true;
        ERROR_DISPLAY.to_string()
    }

    /// Press a digit key (0-9). Values above 9 are ignored.
    pub fn store_operand(&mut self, digit: u8) -> String {
        if self.error.is_some() {
            return ERROR_DISPLAY.to_string();
        }
        if digit > 9 {
            trace!(digit, "ignoring out-of-range digit");
            return self.display();
        }

        if self.entering_new_operand {
            self.current_operand = Self::empty_operand(self.entry_mode);
            self.entering_new_operand = false;
        }

        if self.operand_digit_count() >= MAX_OPERAND_DIGITS
            || self.current_operand.len() >= MAX_OPERAND_LEN
        {
            trace!("operand full, digit ignored");
            return self.display();
        }

        let c = char::from(b'0' + digit);
        match self.entry_mode {
            EntryMode::FreeForm => {
                if self.current_operand == "0" {
                    self.current_operand = c.to_string();
                } else {
                    self.current_operand.push(c);
                }
            }
            EntryMode::FixedPoint { .. } => {
                if !(self.current_operand.is_empty() && digit == 0) {
                    self.current_operand.push(c);
                }
            }
        }

        trace!(operand = %self.current_operand, "digit stored");
        self.display()
    }

    /// Press the decimal key.
    pub fn add_decimal(&mut self) -> String {
        if self.error.is_some() {
            return ERROR_DISPLAY.to_string();
        }
        if !self.entry_mode.accepts_decimal_key() || self.has_decimal_point() {
            return self.display();
        }

        if self.entering_new_operand || self.current_operand.is_empty() {
            self.current_operand = "0.".to_string();
            self.entering_new_operand = false;
        } else {
            self.current_operand.push('.');
        }

        self.display()
    }

    /// Press an operator key.
    ///
    /// A pending operator is resolved first if an operand was typed since it
    /// was set. Pressing operators back to back only replaces the pending
    /// one; the earlier operator is never applied twice.
    pub fn store_operator(&mut self, operator: Operator) -> String {
        if self.error.is_some() {
            return ERROR_DISPLAY.to_string();
        }

        if !self.entering_new_operand {
            let operand = self.operand_value();
            match self.pending_operator {
                Some(pending) => match pending.apply(self.accumulated_result, operand) {
                    Ok(value) => self.accumulated_result = value,
                    Err(fault) => return self.fail(fault),
                },
                None => self.accumulated_result = operand,
            }
        } else if let Some(replaced) = self.pending_operator {
            trace!(%replaced, %operator, "pending operator replaced");
        }

        self.pending_operator = Some(operator);
        self.entering_new_operand = true;
        trace!(result = self.accumulated_result, %operator, "operator stored");
        self.display()
    }

    /// Press the equal key.
    ///
    /// With nothing typed since the last operator, the operator is dropped
    /// and the accumulated result stays as it is.
    pub fn compute_final_value(&mut self) -> String {
        if self.error.is_some() {
            return ERROR_DISPLAY.to_string();
        }

        match (self.pending_operator.take(), self.entering_new_operand) {
            (Some(operator), false) => {
                let operand = self.operand_value();
                match operator.apply(self.accumulated_result, operand) {
                    Ok(value) => self.accumulated_result = value,
                    Err(fault) => return self.fail(fault),
                }
            }
            (Some(operator), true) => {
                trace!(%operator, "no right operand, operator dropped");
            }
            (None, false) => self.accumulated_result = self.operand_value(),
            (None, true) => {}
        }

        self.entering_new_operand = true;
        trace!(result = self.accumulated_result, "final value computed");
        self.display()
    }

    /// Press the delete (backspace) key.
    ///
    /// Only the operand under entry is edited. Right after an operator or
    /// equal there is none, and the display is returned unchanged.
    pub fn delete_last_digit(&mut self) -> String {
        if self.error.is_some() {
            return ERROR_DISPLAY.to_string();
        }
        if self.entering_new_operand {
            return self.display();
        }

        self.current_operand.pop();
        if self.current_operand.is_empty() {
            self.current_operand = Self::empty_operand(self.entry_mode);
        }

        self.display()
    }

    /// Reset to the initial state, keeping the entry mode.
    pub fn clear_all(&mut self) -> String {
        *self = Self::with_entry_mode(self.entry_mode);
        trace!("calculator cleared");
        self.display()
    }
}
