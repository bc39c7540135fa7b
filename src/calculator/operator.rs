//! Binary operators understood by the calculator.

use std::fmt;

/// Results at or above this magnitude overflow. Anything smaller has at most
/// as many integer digits as an operand can hold.
pub const MAX_MAGNITUDE: f64 = 1e15;

/// An arithmetic operator waiting for its right-hand operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// Why applying an operator did not produce a displayable number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithmeticFault {
    /// Right-hand operand of a division was exactly zero.
    DivisionByZero,
    /// Result is not finite or too large to display.
    Overflow,
}

impl Operator {
    /// Apply the operator to `left` and `right`.
    ///
    /// Returns a fault instead of NaN or infinity so the caller can switch
    /// into its error state.
    pub fn apply(self, left: f64, right: f64) -> Result<f64, ArithmeticFault> {
        let value = match self {
            Self::Add => left + right,
            Self::Subtract => left - right,
            Self::Multiply => left * right,
            Self::Divide => {
                if right == 0.0 {
                    return Err(ArithmeticFault::DivisionByZero);
                }
                left / right
            }
        };

        if !value.is_finite() || value.abs() >= MAX_MAGNITUDE {
            return Err(ArithmeticFault::Overflow);
        }

        Ok(value)
    }

    /// The conventional symbol for this operator.
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '×',
            Self::Divide => '÷',
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_arithmetic() {
        assert_eq!(Operator::Add.apply(5.0, 3.0), Ok(8.0));
        assert_eq!(Operator::Subtract.apply(5.0, 3.0), Ok(2.0));
        assert_eq!(Operator::Multiply.apply(5.0, 3.0), Ok(15.0));
        assert_eq!(Operator::Divide.apply(6.0, 3.0), Ok(2.0));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            Operator::Divide.apply(1.0, 0.0),
            Err(ArithmeticFault::DivisionByZero)
        );
        assert_eq!(
            Operator::Divide.apply(0.0, -0.0),
            Err(ArithmeticFault::DivisionByZero)
        );
    }

    #[test]
    fn test_overflow() {
        assert_eq!(
            Operator::Multiply.apply(1e10, 1e10),
            Err(ArithmeticFault::Overflow)
        );
        assert!(Operator::Multiply.apply(9_999_999.0, 99_999_999.0).is_ok());
        assert_eq!(
            Operator::Add.apply(999_999_999_999_999.0, 1.0),
            Err(ArithmeticFault::Overflow)
        );
    }
}
