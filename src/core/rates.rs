//! Rate conversions shared by the calculators.
//!
//! Powers of `1 + r` are evaluated through `ln_1p`/`expm1` so that tiny rates
//! over long horizons keep their precision.

/// Converts a percentage (7.5) to a fraction (0.075).
pub fn percent_to_fraction(percent: f64) -> f64 {
    percent / 100.0
}

/// Equivalent monthly rate for an annual rate compounded monthly:
/// `(1 + annual)^(1/12) - 1`.
pub fn annual_to_monthly_compound(annual: f64) -> f64 {
    (annual.ln_1p() / 12.0).exp_m1()
}

/// Rate left after deflating `nominal` by `inflation`: `(1 + n) / (1 + i) - 1`.
pub fn real_rate(nominal: f64, inflation: f64) -> f64 {
    (nominal - inflation) / (1.0 + inflation)
}

/// `(1 + rate)^periods - 1`.
pub fn compound_growth_m1(rate: f64, periods: f64) -> f64 {
    (periods * rate.ln_1p()).exp_m1()
}
