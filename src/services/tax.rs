// src/services/tax.rs
//
// Statutory computations: progressive personal income tax and the employee-side
// insurance contributions. Both work in whole VND; fractional results are
// rounded half-up at the end of each computation, not per bracket.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// One marginal-rate band. `ceiling` is the cumulative income bound of the
/// band; `None` marks the unbounded top band.
#[derive(Debug, Clone, Copy)]
pub struct TaxBracket {
    pub ceiling: Option<Decimal>,
    pub rate: Decimal,
}

/// Monthly progressive schedule for personal income tax (VND).
pub const TAX_BRACKETS: [TaxBracket; 7] = [
    TaxBracket { ceiling: Some(dec!(5000000)), rate: dec!(0.05) },
    TaxBracket { ceiling: Some(dec!(10000000)), rate: dec!(0.10) },
    TaxBracket { ceiling: Some(dec!(18000000)), rate: dec!(0.15) },
    TaxBracket { ceiling: Some(dec!(32000000)), rate: dec!(0.20) },
    TaxBracket { ceiling: Some(dec!(52000000)), rate: dec!(0.25) },
    TaxBracket { ceiling: Some(dec!(80000000)), rate: dec!(0.30) },
    TaxBracket { ceiling: None, rate: dec!(0.35) },
];

// Employee-side contribution rates on base salary.
const HEALTH_INSURANCE_RATE: Decimal = dec!(0.015);
const SOCIAL_INSURANCE_RATE: Decimal = dec!(0.08);
const UNEMPLOYMENT_INSURANCE_RATE: Decimal = dec!(0.01);

pub fn round_vnd(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Walk the marginal brackets over `taxable` income and return the tax owed,
/// rounded to whole VND. Callers must clamp negative taxable income to zero
/// before calling; opt-out gating also lives with the caller.
///
/// Income exactly at a bracket ceiling is taxed entirely within the lower
/// bands — nothing spills into the next rate.
pub fn income_tax(taxable: Decimal) -> Decimal {
    let mut remaining = taxable;
    let mut owed = dec!(0);
    let mut prev_ceiling = dec!(0);

    for bracket in &TAX_BRACKETS {
        if remaining <= dec!(0) {
            break;
        }
        let band = match bracket.ceiling {
            Some(ceiling) => ceiling - prev_ceiling,
            None => remaining,
        };
        let taxed = remaining.min(band);
        owed += taxed * bracket.rate;
        remaining -= taxed;
        if let Some(ceiling) = bracket.ceiling {
            prev_ceiling = ceiling;
        }
    }

    round_vnd(owed)
}

/// Employee-side insurance contributions computed on base salary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsuranceBreakdown {
    pub health: Decimal,
    pub social: Decimal,
    pub unemployment: Decimal,
}

impl InsuranceBreakdown {
    pub const ZERO: InsuranceBreakdown = InsuranceBreakdown {
        health: dec!(0),
        social: dec!(0),
        unemployment: dec!(0),
    };

    pub fn total(&self) -> Decimal {
        self.health + self.social + self.unemployment
    }
}

/// Each line is `round(base_salary × rate)`: health 1.5%, social 8%,
/// unemployment 1%. Employees who opted out contribute nothing.
pub fn insurance(base_salary: Decimal, opted_in: bool) -> InsuranceBreakdown {
    if !opted_in {
        return InsuranceBreakdown::ZERO;
    }
    InsuranceBreakdown {
        health: round_vnd(base_salary * HEALTH_INSURANCE_RATE),
        social: round_vnd(base_salary * SOCIAL_INSURANCE_RATE),
        unemployment: round_vnd(base_salary * UNEMPLOYMENT_INSURANCE_RATE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_income_owes_zero() {
        assert_eq!(income_tax(dec!(0)), dec!(0));
    }

    #[test]
    fn income_inside_first_bracket() {
        // 4,000,000 × 5% = 200,000
        assert_eq!(income_tax(dec!(4000000)), dec!(200000));
    }

    #[test]
    fn income_at_bracket_ceiling_stays_in_lower_bracket() {
        // Exactly 5,000,000 is taxed entirely at 5%
        assert_eq!(income_tax(dec!(5000000)), dec!(250000));
        // One dong above starts the 10% band
        assert_eq!(income_tax(dec!(5000010)), dec!(250001));
    }

    #[test]
    fn income_spanning_two_brackets() {
        // 5,000,000 × 5% + 2,000,000 × 10% = 450,000
        assert_eq!(income_tax(dec!(7000000)), dec!(450000));
    }

    #[test]
    fn income_in_top_bracket() {
        // Full walk: 250k + 500k + 1.2M + 2.8M + 5M + 8.4M = 18.15M on the
        // bounded bands, then 20M × 35% = 7M on the remainder above 80M.
        assert_eq!(income_tax(dec!(100000000)), dec!(25150000));
    }

    #[test]
    fn tax_is_monotonically_non_decreasing() {
        let samples = [
            dec!(0),
            dec!(1000000),
            dec!(5000000),
            dec!(5000001),
            dec!(10000000),
            dec!(17999999),
            dec!(18000000),
            dec!(32000000),
            dec!(52000000),
            dec!(80000000),
            dec!(123456789),
        ];
        let mut prev = dec!(-1);
        for s in samples {
            let t = income_tax(s);
            assert!(t >= prev, "tax({s}) = {t} dipped below {prev}");
            prev = t;
        }
    }

    #[test]
    fn opted_out_insurance_is_zero() {
        let b = insurance(dec!(10000000), false);
        assert_eq!(b, InsuranceBreakdown::ZERO);
        assert_eq!(b.total(), dec!(0));
    }

    #[test]
    fn insurance_splits_at_statutory_rates() {
        let b = insurance(dec!(10000000), true);
        assert_eq!(b.health, dec!(150000));
        assert_eq!(b.social, dec!(800000));
        assert_eq!(b.unemployment, dec!(100000));
        assert_eq!(b.total(), dec!(1050000));
    }

    #[test]
    fn insurance_scales_linearly() {
        let single = insurance(dec!(7000000), true);
        let double = insurance(dec!(14000000), true);
        assert_eq!(double.health, single.health * dec!(2));
        assert_eq!(double.social, single.social * dec!(2));
        assert_eq!(double.unemployment, single.unemployment * dec!(2));
    }

    #[test]
    fn round_vnd_is_half_up() {
        assert_eq!(round_vnd(dec!(384615.3846)), dec!(384615));
        assert_eq!(round_vnd(dec!(384615.5)), dec!(384616));
    }
}
