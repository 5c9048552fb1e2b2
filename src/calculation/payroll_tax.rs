//! Payroll tax, Medicare, superannuation and leave accrual.
//!
//! Withholding is computed by annualizing the period's income, applying the
//! marginal bracket table, then dividing back down to one pay run.

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::config::{LeaveAccrualRates, PayrollConfig};
use crate::models::{EmploymentType, LeaveAccrual, TaxBracket};

use super::money::round_to_cents;

/// Month the Australian financial year starts in.
const FINANCIAL_YEAR_START_MONTH: u32 = 7;

/// Tax year for a date, named after the calendar year it starts in.
///
/// # Examples
///
/// ```
/// use settlement_engine::calculation::tax_year_for;
/// use chrono::NaiveDate;
///
/// assert_eq!(tax_year_for(NaiveDate::from_ymd_opt(2026, 6, 30).unwrap()), 2025);
/// assert_eq!(tax_year_for(NaiveDate::from_ymd_opt(2026, 7, 1).unwrap()), 2026);
/// ```
pub fn tax_year_for(date: NaiveDate) -> i32 {
    if date.month() >= FINANCIAL_YEAR_START_MONTH {
        date.year()
    } else {
        date.year() - 1
    }
}

/// Annual income implied by this period's pay.
pub fn annualize_income(ytd_gross: Decimal, gross_pay: Decimal, periods_per_year: u32) -> Decimal {
    (ytd_gross + gross_pay) * Decimal::from(periods_per_year)
}

/// Annual tax on `annual_income` under a marginal bracket table.
///
/// Every bracket whose lower bound the income exceeds is evaluated in
/// ascending order and the last one wins. Since brackets do not overlap this
/// is the bracket containing the income.
///
/// # Examples
///
/// ```
/// use settlement_engine::calculation::marginal_tax;
/// use settlement_engine::config::default_tax_brackets;
/// use settlement_engine::models::TaxBracket;
/// use rust_decimal::Decimal;
///
/// let brackets: Vec<TaxBracket> = default_tax_brackets()
///     .into_iter()
///     .map(|b| TaxBracket {
///         tax_year: 2026,
///         min_income: b.min_income,
///         max_income: b.max_income,
///         rate: b.rate,
///         base_tax: b.base_tax,
///     })
///     .collect();
/// assert_eq!(marginal_tax(Decimal::from(50_000), &brackets), Decimal::from(6717));
/// ```
pub fn marginal_tax(annual_income: Decimal, brackets: &[TaxBracket]) -> Decimal {
    let mut ordered: Vec<&TaxBracket> = brackets.iter().collect();
    ordered.sort_by(|a, b| a.min_income.cmp(&b.min_income));

    let mut tax = Decimal::ZERO;
    for bracket in ordered {
        if annual_income > bracket.min_income {
            let ceiling = bracket
                .max_income
                .map_or(annual_income, |max| annual_income.min(max));
            tax = bracket.base_tax + (ceiling - bracket.min_income) * bracket.rate;
        }
    }
    tax
}

/// Accrued leave for the hours worked in a pay run.
///
/// Casual staff accrue nothing.
pub fn calculate_leave_accrual(
    employment_type: EmploymentType,
    hours_worked: Decimal,
    rates: &LeaveAccrualRates,
) -> LeaveAccrual {
    if !employment_type.accrues_leave() || hours_worked <= Decimal::ZERO {
        return LeaveAccrual::default();
    }

    let accrue = |rate: Decimal| {
        (hours_worked * rate).round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
    };

    LeaveAccrual {
        annual: accrue(rates.annual),
        sick: accrue(rates.sick),
        personal: accrue(rates.personal),
        long_service: accrue(rates.long_service),
    }
}

/// Inputs to a pay-run calculation once store lookups are done.
#[derive(Debug, Clone)]
pub struct PayrollInputs<'a> {
    /// Gross pay for the period.
    pub gross_pay: Decimal,
    /// Gross pay earlier in the year.
    pub ytd_gross: Decimal,
    /// Worker's hourly rate.
    pub hourly_rate: Decimal,
    /// Worker's employment type.
    pub employment_type: EmploymentType,
    /// Bracket table for the current tax year.
    pub brackets: &'a [TaxBracket],
}

/// The full breakdown of one pay run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollBreakdown {
    /// Gross pay for the period.
    pub gross_pay: Decimal,
    /// Annualized income used for bracket lookup.
    pub annual_income: Decimal,
    /// Tax withheld this period.
    pub tax_withheld: Decimal,
    /// Medicare levy this period.
    pub medicare_levy: Decimal,
    /// Employer super contribution.
    pub super_contribution: Decimal,
    /// Gross less tax and Medicare.
    pub net_pay: Decimal,
    /// Hours implied by gross / hourly rate.
    pub hours_worked: Decimal,
    /// Leave earned this period.
    pub leave_accrued: LeaveAccrual,
}

/// Computes tax, levy, super, net pay and leave accrual.
pub fn calculate_payroll_breakdown(
    inputs: &PayrollInputs<'_>,
    config: &PayrollConfig,
) -> PayrollBreakdown {
    let periods = config.periods_per_year.max(1);
    let annual_income = annualize_income(inputs.ytd_gross, inputs.gross_pay, periods);
    let annual_tax = marginal_tax(annual_income, inputs.brackets);
    let tax_withheld = round_to_cents(annual_tax / Decimal::from(periods));

    let medicare_levy = round_to_cents(inputs.gross_pay * config.medicare_levy_rate);
    let super_contribution = round_to_cents(inputs.gross_pay * config.super_rate);
    let net_pay = inputs.gross_pay - tax_withheld - medicare_levy;

    let hours_worked = if inputs.hourly_rate > Decimal::ZERO {
        (inputs.gross_pay / inputs.hourly_rate)
            .round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
    } else {
        Decimal::ZERO
    };
    let leave_accrued =
        calculate_leave_accrual(inputs.employment_type, hours_worked, &config.leave_accrual);

    PayrollBreakdown {
        gross_pay: inputs.gross_pay,
        annual_income,
        tax_withheld,
        medicare_levy,
        super_contribution,
        net_pay,
        hours_worked,
        leave_accrued,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_tax_brackets;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn brackets() -> Vec<TaxBracket> {
        default_tax_brackets()
            .into_iter()
            .map(|b| TaxBracket {
                tax_year: 2026,
                min_income: b.min_income,
                max_income: b.max_income,
                rate: b.rate,
                base_tax: b.base_tax,
            })
            .collect()
    }

    #[test]
    fn test_tax_free_threshold() {
        assert_eq!(marginal_tax(dec("18200"), &brackets()), Decimal::ZERO);
        assert_eq!(marginal_tax(dec("10000"), &brackets()), Decimal::ZERO);
    }

    #[test]
    fn test_scenario_e_marginal_tax() {
        // 0 + (45000 - 18200) * 0.19 + (50000 - 45000) * 0.325 = 5092 + 1625
        assert_eq!(marginal_tax(dec("50000"), &brackets()), dec("6717"));
        let withheld = round_to_cents(dec("6717") / Decimal::from(26));
        assert_eq!(withheld, dec("258.35"));
    }

    #[test]
    fn test_top_bracket_is_open_ended() {
        // 51667 + (200000 - 180000) * 0.45
        assert_eq!(marginal_tax(dec("200000"), &brackets()), dec("60667"));
    }

    #[test]
    fn test_unsorted_brackets_give_same_result() {
        let mut reversed = brackets();
        reversed.reverse();
        assert_eq!(marginal_tax(dec("50000"), &reversed), dec("6717"));
    }

    #[test]
    fn test_annualize_income() {
        assert_eq!(annualize_income(dec("0"), dec("2000"), 26), dec("52000"));
        assert_eq!(annualize_income(dec("500"), dec("1500"), 26), dec("52000"));
    }

    #[test]
    fn test_full_time_leave_accrual() {
        let accrual =
            calculate_leave_accrual(EmploymentType::FullTime, dec("76"), &Default::default());
        assert_eq!(accrual.annual, dec("5.8444"));
        assert_eq!(accrual.sick, dec("2.9184"));
        assert_eq!(accrual.personal, dec("1.4592"));
        assert_eq!(accrual.long_service, dec("0.494"));
    }

    #[test]
    fn test_casual_accrues_nothing() {
        let accrual =
            calculate_leave_accrual(EmploymentType::Casual, dec("76"), &Default::default());
        assert!(accrual.is_zero());
    }

    #[test]
    fn test_breakdown_for_part_time_fortnight() {
        let gross = dec("2000");
        let brackets = brackets();
        let inputs = PayrollInputs {
            gross_pay: gross,
            ytd_gross: Decimal::ZERO,
            hourly_rate: dec("40"),
            employment_type: EmploymentType::PartTime,
            brackets: &brackets,
        };
        let breakdown = calculate_payroll_breakdown(&inputs, &PayrollConfig::default());

        // 52000 annual: 5092 + 7000 * 0.325 = 7367; 7367 / 26 = 283.346...
        assert_eq!(breakdown.annual_income, dec("52000"));
        assert_eq!(breakdown.tax_withheld, dec("283.35"));
        assert_eq!(breakdown.medicare_levy, dec("40.00"));
        assert_eq!(breakdown.super_contribution, dec("220.00"));
        assert_eq!(breakdown.net_pay, dec("1676.65"));
        assert_eq!(breakdown.hours_worked, dec("50"));
        assert_eq!(breakdown.leave_accrued.annual, dec("3.845"));
    }

    #[test]
    fn test_zero_hourly_rate_accrues_nothing() {
        let brackets = brackets();
        let inputs = PayrollInputs {
            gross_pay: dec("1000"),
            ytd_gross: Decimal::ZERO,
            hourly_rate: Decimal::ZERO,
            employment_type: EmploymentType::FullTime,
            brackets: &brackets,
        };
        let breakdown = calculate_payroll_breakdown(&inputs, &PayrollConfig::default());
        assert_eq!(breakdown.hours_worked, Decimal::ZERO);
        assert!(breakdown.leave_accrued.is_zero());
    }
}
