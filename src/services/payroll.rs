// src/services/payroll.rs

use crate::services::tax::{self, InsuranceBreakdown};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub struct PayrollService;

/// Everything the aggregation needs; the handler assembles this from the
/// employee's grade, the submitted line items and the deduction scan.
#[derive(Debug, Clone, Copy)]
pub struct PayrollInputs {
    pub base_salary: Decimal,
    pub total_allowances: Decimal,
    /// Total bonuses minus total penalties; may be negative.
    pub net_adjustment: Decimal,
    /// Unreported/leave-day deduction total. Subtracted here, inside gross
    /// income, and nowhere else — it never doubles as a penalty line.
    pub deduction_amount: Decimal,
    pub insurance_opt_in: bool,
    pub tax_opt_in: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalculatedPayroll {
    pub gross_income: Decimal,
    pub insurance: InsuranceBreakdown,
    pub insurance_total: Decimal,
    pub income_tax: Decimal,
    pub net_pay: Decimal,
}

impl PayrollService {
    /// Compute a full payroll figure for one employee-month.
    ///
    /// Order matters: gross first, then insurance on base salary (not gross),
    /// then tax on what remains after insurance. Net pay is floored at zero —
    /// penalties and deductions can wipe a salary but never invert it.
    pub fn compute(inputs: PayrollInputs) -> CalculatedPayroll {
        let gross_income = inputs.base_salary + inputs.total_allowances + inputs.net_adjustment
            - inputs.deduction_amount;

        let insurance = tax::insurance(inputs.base_salary, inputs.insurance_opt_in);
        let insurance_total = insurance.total();

        let taxable = gross_income - insurance_total;
        let income_tax = if inputs.tax_opt_in {
            tax::income_tax(taxable.max(dec!(0)))
        } else {
            dec!(0)
        };

        let net_pay = (gross_income - insurance_total - income_tax).max(dec!(0));

        CalculatedPayroll {
            gross_income,
            insurance,
            insurance_total,
            income_tax,
            net_pay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> PayrollInputs {
        PayrollInputs {
            base_salary: dec!(10000000),
            total_allowances: dec!(1000000),
            net_adjustment: dec!(-2000000),
            deduction_amount: dec!(384615),
            insurance_opt_in: true,
            tax_opt_in: true,
        }
    }

    #[test]
    fn end_to_end_example_composes() {
        let result = PayrollService::compute(inputs());

        // 10,000,000 + 1,000,000 − 2,000,000 − 384,615
        assert_eq!(result.gross_income, dec!(8615385));
        assert_eq!(result.insurance.health, dec!(150000));
        assert_eq!(result.insurance.social, dec!(800000));
        assert_eq!(result.insurance.unemployment, dec!(100000));
        assert_eq!(result.insurance_total, dec!(1050000));
        // taxable 7,565,385 → 250,000 + 2,565,385 × 10% = 506,538.5 → 506,539
        assert_eq!(result.income_tax, dec!(506539));
        assert_eq!(result.net_pay, dec!(7058846));
    }

    #[test]
    fn net_pay_never_goes_negative() {
        let mut crushed = inputs();
        crushed.net_adjustment = dec!(-50000000);
        let result = PayrollService::compute(crushed);
        assert!(result.gross_income < dec!(0));
        assert_eq!(result.net_pay, dec!(0));

        let mut deducted = inputs();
        deducted.deduction_amount = dec!(99999999);
        assert_eq!(PayrollService::compute(deducted).net_pay, dec!(0));
    }

    #[test]
    fn opting_out_skips_insurance_and_tax() {
        let mut opted_out = inputs();
        opted_out.insurance_opt_in = false;
        opted_out.tax_opt_in = false;
        let result = PayrollService::compute(opted_out);
        assert_eq!(result.insurance_total, dec!(0));
        assert_eq!(result.income_tax, dec!(0));
        assert_eq!(result.net_pay, result.gross_income);
    }

    #[test]
    fn insurance_is_computed_on_base_salary_not_gross() {
        let mut bonused = inputs();
        bonused.net_adjustment = dec!(20000000);
        let result = PayrollService::compute(bonused);
        // same base salary, same contributions, regardless of the bonus
        assert_eq!(result.insurance_total, dec!(1050000));
    }

    #[test]
    fn negative_taxable_income_is_clamped_before_the_bracket_walk() {
        let result = PayrollService::compute(PayrollInputs {
            base_salary: dec!(10000000),
            total_allowances: dec!(0),
            net_adjustment: dec!(-9500000),
            deduction_amount: dec!(0),
            insurance_opt_in: true,
            tax_opt_in: true,
        });
        // gross 500,000 − insurance 1,050,000 = taxable −550,000 → tax 0
        assert_eq!(result.income_tax, dec!(0));
        assert_eq!(result.net_pay, dec!(0));
    }
}
