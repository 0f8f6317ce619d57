use super::error::{CalcError, ensure_horizon};
use super::rates::{annual_to_monthly_compound, percent_to_fraction, real_rate};
use super::types::{InvestmentInput, InvestmentPoint, InvestmentProjection, InvestmentSummary};

/// Projects an investment month by month in nominal and inflation-adjusted
/// terms.
///
/// Annual return and inflation are converted to their compounding-equivalent
/// monthly rates. The initial investment counts towards contributions.
pub fn simulate_investment(input: &InvestmentInput) -> Result<InvestmentProjection, CalcError> {
    let months = ensure_horizon(u64::from(input.years) * 12)?;
    let monthly_return = annual_to_monthly_compound(percent_to_fraction(input.annual_return));
    let monthly_inflation =
        annual_to_monthly_compound(percent_to_fraction(input.annual_inflation));
    let real_monthly_return = real_rate(monthly_return, monthly_inflation);

    let mut series = Vec::with_capacity(months as usize + 1);
    let mut nominal_value = input.initial_investment;
    let mut real_value = input.initial_investment;
    let mut contributions = input.initial_investment;

    for month in 0..=months {
        series.push(InvestmentPoint {
            month,
            nominal_value,
            real_value,
            cumulative_contributions: contributions,
        });
        if month < months {
            nominal_value = nominal_value * (1.0 + monthly_return) + input.monthly_contribution;
            real_value = real_value * (1.0 + real_monthly_return) + input.monthly_contribution;
            contributions += input.monthly_contribution;
        }
    }

    let summary = InvestmentSummary {
        final_nominal: nominal_value,
        final_real: real_value,
        total_contributions: contributions,
        nominal_growth: nominal_value - contributions,
        real_growth: real_value - contributions,
    };

    tracing::debug!(
        months,
        monthly_return,
        real_monthly_return,
        final_nominal = summary.final_nominal,
        final_real = summary.final_real,
        "investment simulated"
    );

    Ok(InvestmentProjection { summary, series })
}
