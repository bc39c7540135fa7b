//! Headless calculator keyboard.
//!
//! [`CalculatorKeyboard`] sits between an input surface and the
//! [`CalculatorProcessor`]: it maps key identifiers to processor calls and
//! reports the display through two independent callbacks, one for every
//! display change and one for the equal key.

mod script;

pub use script::parse_script;

use std::sync::Arc;

use tracing::debug;

use crate::calculator::{
    ArithmeticFault, CalculatorProcessor, EntryMode, MAX_MAGNITUDE, MAX_OPERAND_DIGITS, Operator,
    format_value,
};

/// A key on the calculator keyboard.
///
/// Discriminants are the integer tags external buttons are identified by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CalculatorKey {
    Zero = 1,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Decimal,
    Clear,
    Delete,
    Multiply,
    Divide,
    Subtract,
    Add,
    Equal,
}

impl CalculatorKey {
    const ALL: [Self; 18] = [
        Self::Zero,
        Self::One,
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
        Self::Nine,
        Self::Decimal,
        Self::Clear,
        Self::Delete,
        Self::Multiply,
        Self::Divide,
        Self::Subtract,
        Self::Add,
        Self::Equal,
    ];

    /// Look up a key by its button tag.
    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.get(usize::from(tag).checked_sub(1)?).copied()
    }

    pub fn tag(self) -> u8 {
        self as u8
    }

    /// The digit key for `digit` (0-9).
    pub fn digit(digit: u8) -> Option<Self> {
        if digit > 9 {
            return None;
        }
        Self::from_tag(digit + 1)
    }

    /// The digit this key enters, if it is a digit key.
    pub fn digit_value(self) -> Option<u8> {
        let tag = self.tag();
        (tag <= Self::Nine.tag()).then(|| tag - 1)
    }

    /// The operator this key selects, if it is an operator key.
    pub fn operator(self) -> Option<Operator> {
        match self {
            Self::Multiply => Some(Operator::Multiply),
            Self::Divide => Some(Operator::Divide),
            Self::Subtract => Some(Operator::Subtract),
            Self::Add => Some(Operator::Add),
            _ => None,
        }
    }
}

type ValueChangedCallback = Arc<dyn Fn(&str) + Send + Sync>;
type EqualTappedCallback = Arc<dyn Fn() + Send + Sync>;

/// A calculator keyboard without a view.
pub struct CalculatorKeyboard {
    processor: CalculatorProcessor,
    display: String,
    on_value_changed: Option<ValueChangedCallback>,
    on_equal_tapped: Option<EqualTappedCallback>,
}

impl Default for CalculatorKeyboard {
    fn default() -> Self {
        Self::new(EntryMode::default())
    }
}

impl CalculatorKeyboard {
    pub fn new(entry_mode: EntryMode) -> Self {
        let processor = CalculatorProcessor::with_entry_mode(entry_mode);
        Self {
            display: processor.display(),
            processor,
            on_value_changed: None,
            on_equal_tapped: None,
        }
    }

    /// Set the callback fired with the new display after every key.
    pub fn set_on_value_changed(&mut self, callback: impl Fn(&str) + Send + Sync + 'static) {
        self.on_value_changed = Some(Arc::new(callback));
    }

    /// Set the callback fired after the equal key, following the value change.
    pub fn set_on_equal_tapped(&mut self, callback: impl Fn() + Send + Sync + 'static) {
        self.on_equal_tapped = Some(Arc::new(callback));
    }

    /// The last display string.
    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn processor(&self) -> &CalculatorProcessor {
        &self.processor
    }

    pub fn entry_mode(&self) -> EntryMode {
        self.processor.entry_mode()
    }

    /// Whether the decimal key should be shown.
    pub fn shows_decimal(&self) -> bool {
        self.entry_mode().accepts_decimal_key()
    }

    /// Change the entry mode. The calculator is cleared, without notifying.
    pub fn set_entry_mode(&mut self, entry_mode: EntryMode) {
        debug!(?entry_mode, "entry mode changed");
        self.display = self.processor.set_entry_mode(entry_mode);
    }

    /// Press a key and notify the callbacks.
    pub fn press(&mut self, key: CalculatorKey) -> &str {
        self.display = self.dispatch(key);
        debug!(?key, display = %self.display, "key pressed");

        self.notify_value_changed();
        if key == CalculatorKey::Equal
            && let Some(callback) = &self.on_equal_tapped
        {
            callback();
        }

        &self.display
    }

    /// Press a key identified by its button tag. Unknown tags are ignored.
    pub fn press_tag(&mut self, tag: u8) -> &str {
        match CalculatorKey::from_tag(tag) {
            Some(key) => self.press(key),
            None => {
                debug!(tag, "ignoring unknown key tag");
                &self.display
            }
        }
    }

    fn dispatch(&mut self, key: CalculatorKey) -> String {
        if let Some(digit) = key.digit_value() {
            return self.processor.store_operand(digit);
        }
        if let Some(operator) = key.operator() {
            return self.processor.store_operator(operator);
        }

        match key {
            CalculatorKey::Decimal => self.processor.add_decimal(),
            CalculatorKey::Clear => self.processor.clear_all(),
            CalculatorKey::Delete => self.processor.delete_last_digit(),
            CalculatorKey::Equal => self.processor.compute_final_value(),
            _ => self.processor.display(),
        }
    }

    fn notify_value_changed(&self) {
        if let Some(callback) = &self.on_value_changed {
            callback(&self.display);
        }
    }

    /// Preset the display from a number.
    ///
    /// The calculator is cleared and the value's decimal text replayed as
    /// key presses, then the final value is computed. `inform` controls
    /// whether the value-changed callback fires once at the end.
    ///
    /// Values the display cannot hold preset the overflow error.
    pub fn reset_with_initial_number(&mut self, value: f64, inform: bool) -> &str {
        if !value.is_finite() || value.abs() >= MAX_MAGNITUDE {
            return self.reset_to_overflow(inform);
        }

        let text = match self.entry_mode() {
            EntryMode::FreeForm => format_value(value),
            EntryMode::FixedPoint { places } => format!("{:.*}", usize::from(places), value),
        };
        self.reset_with_initial_text(&text, inform)
    }

    /// Preset the display from number text.
    ///
    /// Digits, `.` and `-` are replayed; every other character is skipped.
    /// An integer part too long for an operand presets the overflow error.
    pub fn reset_with_initial_text(&mut self, text: &str, inform: bool) -> &str {
        let implied_places = match self.entry_mode() {
            EntryMode::FixedPoint { places } => usize::from(places),
            EntryMode::FreeForm => 0,
        };
        if integer_digit_count(text) + implied_places > MAX_OPERAND_DIGITS {
            return self.reset_to_overflow(inform);
        }

        self.processor.clear_all();

        let text = match self.entry_mode() {
            EntryMode::FixedPoint { places } => pad_fraction(text, places),
            EntryMode::FreeForm => text.to_string(),
        };

        for c in text.chars() {
            if let Some(digit) = c.to_digit(10) {
                self.processor.store_operand(digit as u8);
            } else if c == '.' {
                self.processor.add_decimal();
            } else if c == '-' {
                self.processor.store_operator(Operator::Subtract);
            } else {
                debug!(%c, "skipping character in initial value");
            }
        }

        self.display = self.processor.compute_final_value();
        if inform {
            self.notify_value_changed();
        }

        &self.display
    }

    fn reset_to_overflow(&mut self, inform: bool) -> &str {
        self.processor.clear_all();
        self.display = self.processor.fail(ArithmeticFault::Overflow);
        if inform {
            self.notify_value_changed();
        }

        &self.display
    }
}

/// Significant digits before the decimal point, ignoring non-digits.
fn integer_digit_count(text: &str) -> usize {
    let int_part = text.split_once('.').map_or(text, |(int_part, _)| int_part);
    int_part
        .chars()
        .filter(|c| c.is_ascii_digit())
        .skip_while(|&c| c == '0')
        .count()
}

/// Rewrite number text so its fraction has exactly `places` digits, with
/// the decimal point removed. Fixed-point entry has no decimal key, so the
/// point has to be implied by the digit count.
fn pad_fraction(text: &str, places: u8) -> String {
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text, ""));

    let mut frac: String = frac_part
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(places as usize)
        .collect();
    while frac.len() < places as usize {
        frac.push('0');
    }

    format!("{}{}", int_part, frac)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn press_all(keyboard: &mut CalculatorKeyboard, script: &str) -> String {
        for key in parse_script(script).unwrap() {
            keyboard.press(key);
        }
        keyboard.display().to_string()
    }

    #[test]
    fn test_key_tags() {
        assert_eq!(CalculatorKey::Zero.tag(), 1);
        assert_eq!(CalculatorKey::Decimal.tag(), 11);
        assert_eq!(CalculatorKey::Equal.tag(), 18);
        assert_eq!(CalculatorKey::from_tag(14), Some(CalculatorKey::Multiply));
        assert_eq!(CalculatorKey::from_tag(0), None);
        assert_eq!(CalculatorKey::from_tag(19), None);
    }

    #[test]
    fn test_digit_keys() {
        assert_eq!(CalculatorKey::digit(0), Some(CalculatorKey::Zero));
        assert_eq!(CalculatorKey::digit(9), Some(CalculatorKey::Nine));
        assert_eq!(CalculatorKey::digit(10), None);
        assert_eq!(CalculatorKey::Seven.digit_value(), Some(7));
        assert_eq!(CalculatorKey::Decimal.digit_value(), None);
    }

    #[test]
    fn test_press_sequence() {
        let mut keyboard = CalculatorKeyboard::default();
        assert_eq!(press_all(&mut keyboard, "C 5 + 3 ="), "8");
        assert_eq!(press_all(&mut keyboard, "C 1 / 0 ="), "Error");
        assert_eq!(press_all(&mut keyboard, "5"), "Error");
        assert_eq!(press_all(&mut keyboard, "C"), "0");
    }

    #[test]
    fn test_press_tag() {
        let mut keyboard = CalculatorKeyboard::default();
        keyboard.press_tag(3);
        keyboard.press_tag(17);
        keyboard.press_tag(3);
        assert_eq!(keyboard.press_tag(18), "4");
        assert_eq!(keyboard.press_tag(42), "4");
    }

    #[test]
    fn test_callbacks_fire() {
        let changes = Arc::new(Mutex::new(Vec::new()));
        let equals = Arc::new(Mutex::new(0));

        let mut keyboard = CalculatorKeyboard::default();
        let sink = Arc::clone(&changes);
        keyboard.set_on_value_changed(move |value| sink.lock().unwrap().push(value.to_string()));
        let counter = Arc::clone(&equals);
        keyboard.set_on_equal_tapped(move || *counter.lock().unwrap() += 1);

        press_all(&mut keyboard, "2*4=");

        assert_eq!(*changes.lock().unwrap(), vec!["2", "2", "4", "8"]);
        assert_eq!(*equals.lock().unwrap(), 1);
    }

    #[test]
    fn test_equal_callback_optional() {
        let changes = Arc::new(Mutex::new(0));
        let mut keyboard = CalculatorKeyboard::default();
        let counter = Arc::clone(&changes);
        keyboard.set_on_value_changed(move |_| *counter.lock().unwrap() += 1);

        press_all(&mut keyboard, "1=");
        assert_eq!(*changes.lock().unwrap(), 2);
    }

    #[test]
    fn test_initial_number() {
        let mut keyboard = CalculatorKeyboard::default();
        assert_eq!(keyboard.reset_with_initial_number(12.5, false), "12.5");
        assert_eq!(keyboard.reset_with_initial_number(5.0, false), "5");
        assert_eq!(keyboard.reset_with_initial_number(-3.25, false), "-3.25");
        assert_eq!(keyboard.reset_with_initial_number(0.0, false), "0");
    }

    #[test]
    fn test_initial_number_at_digit_cap() {
        let mut keyboard = CalculatorKeyboard::default();
        assert_eq!(
            keyboard.reset_with_initial_number(123_456_789_012_345.0, false),
            "123456789012345"
        );
        assert_eq!(
            keyboard.reset_with_initial_number(-999_999_999_999_999.0, false),
            "-999999999999999"
        );
        assert_eq!(
            keyboard.reset_with_initial_number(1234567.891234567, false),
            "1234567.89123457"
        );
    }

    #[test]
    fn test_initial_number_out_of_range() {
        let mut keyboard = CalculatorKeyboard::default();
        for value in [1_234_567_890_123_456.0, 1e16, 1e20, -1e15, f64::INFINITY, f64::NAN] {
            assert_eq!(keyboard.reset_with_initial_number(value, false), "Error");
            assert!(keyboard.processor().is_error());
        }
        assert_eq!(press_all(&mut keyboard, "C 2 + 2 ="), "4");
    }

    #[test]
    fn test_initial_text_too_long() {
        let mut keyboard = CalculatorKeyboard::default();
        assert_eq!(keyboard.reset_with_initial_text("1234567890123456", false), "Error");
        assert_eq!(
            keyboard.reset_with_initial_text("000123456789012345", false),
            "123456789012345"
        );
    }

    #[test]
    fn test_initial_overflow_informs() {
        let changes = Arc::new(Mutex::new(Vec::new()));
        let mut keyboard = CalculatorKeyboard::default();
        let sink = Arc::clone(&changes);
        keyboard.set_on_value_changed(move |value| sink.lock().unwrap().push(value.to_string()));

        keyboard.reset_with_initial_number(1e20, true);
        assert_eq!(*changes.lock().unwrap(), vec!["Error"]);
    }

    #[test]
    fn test_initial_number_fixed_point_range() {
        let mut keyboard = CalculatorKeyboard::new(EntryMode::FixedPoint { places: 2 });
        assert_eq!(
            keyboard.reset_with_initial_number(1234567890123.45, false),
            "1234567890123.45"
        );
        assert_eq!(keyboard.reset_with_initial_number(12345678901234.5, false), "Error");
        assert_eq!(keyboard.reset_with_initial_number(0.126, false), "0.13");
        assert_eq!(keyboard.reset_with_initial_number(2.999, false), "3");
    }

    #[test]
    fn test_initial_number_continues_arithmetic() {
        let mut keyboard = CalculatorKeyboard::default();
        keyboard.reset_with_initial_number(10.0, false);
        assert_eq!(press_all(&mut keyboard, "+5="), "15");
    }

    #[test]
    fn test_initial_text_skips_garbage() {
        let mut keyboard = CalculatorKeyboard::default();
        assert_eq!(keyboard.reset_with_initial_text("$1,234.50", false), "1234.5");
        assert_eq!(keyboard.reset_with_initial_text("abc", false), "0");
    }

    #[test]
    fn test_initial_number_inform() {
        let changes = Arc::new(Mutex::new(Vec::new()));
        let mut keyboard = CalculatorKeyboard::default();
        let sink = Arc::clone(&changes);
        keyboard.set_on_value_changed(move |value| sink.lock().unwrap().push(value.to_string()));

        keyboard.reset_with_initial_number(7.0, false);
        assert!(changes.lock().unwrap().is_empty());

        keyboard.reset_with_initial_number(7.0, true);
        assert_eq!(*changes.lock().unwrap(), vec!["7"]);
    }

    #[test]
    fn test_initial_number_fixed_point() {
        let mut keyboard = CalculatorKeyboard::new(EntryMode::FixedPoint { places: 2 });
        assert_eq!(keyboard.reset_with_initial_number(12.5, false), "12.5");
        assert_eq!(press_all(&mut keyboard, "+125="), "13.75");
        assert_eq!(keyboard.reset_with_initial_text("3.14159", false), "3.14");
    }

    #[test]
    fn test_entry_mode_switch() {
        let mut keyboard = CalculatorKeyboard::default();
        assert!(keyboard.shows_decimal());
        press_all(&mut keyboard, "42");

        keyboard.set_entry_mode(EntryMode::FixedPoint { places: 2 });
        assert!(!keyboard.shows_decimal());
        assert_eq!(keyboard.display(), "0");
        assert_eq!(press_all(&mut keyboard, "1.99"), "1.99");
    }

    #[test]
    fn test_pad_fraction() {
        assert_eq!(pad_fraction("12.5", 2), "1250");
        assert_eq!(pad_fraction("7", 2), "700");
        assert_eq!(pad_fraction("-0.125", 2), "-012");
        assert_eq!(pad_fraction("42", 0), "42");
    }
}
