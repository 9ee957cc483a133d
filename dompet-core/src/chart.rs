//! Income vs expense bar heights for the insight chart

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Bar heights on a 0-100 scale; the larger total is always 100
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartRatios {
    pub income: f64,
    pub expense: f64,
}

impl ChartRatios {
    /// Scale both totals against the larger one.
    ///
    /// A non-positive maximum (both totals zero) divides by 1 instead, so both
    /// bars come out at 0.
    pub fn from_totals(income: Decimal, expense: Decimal) -> Self {
        let max = income.max(expense);
        let denominator = if max <= Decimal::ZERO { Decimal::ONE } else { max };
        Self {
            income: scaled(income, denominator),
            expense: scaled(expense, denominator),
        }
    }
}

fn scaled(value: Decimal, denominator: Decimal) -> f64 {
    value
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|v| v.checked_div(denominator))
        .and_then(|v| v.to_f64())
        .unwrap_or(0.0)
        .clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_zero_is_zero() {
        let r = ChartRatios::from_totals(Decimal::ZERO, Decimal::ZERO);
        assert_eq!(r, ChartRatios { income: 0.0, expense: 0.0 });
    }

    #[test]
    fn test_income_larger() {
        let r = ChartRatios::from_totals(Decimal::from(100), Decimal::from(50));
        assert_eq!(r.income, 100.0);
        assert_eq!(r.expense, 50.0);
    }

    #[test]
    fn test_expense_larger() {
        let r = ChartRatios::from_totals(Decimal::from(1_000_000), Decimal::from(4_000_000));
        assert_eq!(r.income, 25.0);
        assert_eq!(r.expense, 100.0);
    }

    #[test]
    fn test_negative_totals_clamp() {
        let r = ChartRatios::from_totals(Decimal::from(-10), Decimal::from(-20));
        assert_eq!(r.income, 0.0);
        assert_eq!(r.expense, 0.0);
    }
}
