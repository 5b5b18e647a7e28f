//! Deterministic installation sizing for a rooftop of a given usable area.
//!
//! Everything here is pure arithmetic over [`SolarAssumptions`]; the caller
//! decides whether an area of zero is acceptable, the estimator only insists
//! that the input is a finite, non-negative number whose panel count fits a
//! `u64`.

use serde::Serialize;

use crate::error::{AppError, AppResult};

pub const INVALID_AREA_MESSAGE: &str = "Invalid area input.";

/// Fixed sizing constants. Currency figures are in rupees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarAssumptions {
    pub panel_area_sqm: f64,
    pub panel_watts: f64,
    pub cost_per_watt: f64,
    pub savings_per_kwh: f64,
    pub sunlight_hours_per_year: f64,
}

pub const DEFAULT_ASSUMPTIONS: SolarAssumptions = SolarAssumptions {
    panel_area_sqm: 1.6,
    panel_watts: 400.0,
    cost_per_watt: 45.0,
    savings_per_kwh: 8.0,
    sunlight_hours_per_year: 1600.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InstallationEstimate {
    pub panel_count: u64,
    pub capacity_kw: f64,
    pub estimated_cost: f64,
    pub annual_generation_kwh: f64,
    pub annual_savings: f64,
    /// `None` when the roof fits no panel and there are no savings to pay
    /// the installation back.
    pub payback_years: Option<f64>,
}

impl SolarAssumptions {
    /// Rejects areas whose panel count would not be exactly representable.
    pub fn check_area(&self, area_sqm: f64) -> AppResult<()> {
        if !area_sqm.is_finite()
            || area_sqm < 0.0
            || area_sqm / self.panel_area_sqm >= u64::MAX as f64
        {
            return Err(AppError::Validation(INVALID_AREA_MESSAGE.to_string()));
        }
        Ok(())
    }

    /// Callers must pass an area accepted by [`Self::check_area`].
    pub fn estimate(&self, area_sqm: f64) -> InstallationEstimate {
        let panel_count = (area_sqm / self.panel_area_sqm).floor() as u64;
        let capacity_kw = (panel_count as f64 * self.panel_watts) / 1000.0;
        let estimated_cost = capacity_kw * 1000.0 * self.cost_per_watt;
        let annual_generation_kwh = capacity_kw * self.sunlight_hours_per_year;
        let annual_savings = annual_generation_kwh * self.savings_per_kwh;

        let payback_years = if annual_savings > 0.0 {
            Some(round_to(estimated_cost / annual_savings, 1))
        } else {
            None
        };

        InstallationEstimate {
            panel_count,
            capacity_kw,
            estimated_cost,
            annual_generation_kwh,
            annual_savings,
            payback_years,
        }
    }
}

/// Parses free-form area input, e.g. from a text field.
pub fn parse_area(input: &str) -> AppResult<f64> {
    input
        .trim()
        .parse::<f64>()
        .map_err(|_| AppError::Validation(INVALID_AREA_MESSAGE.to_string()))
}

pub fn estimate(input: &str) -> AppResult<InstallationEstimate> {
    estimate_area(parse_area(input)?)
}

pub fn estimate_area(area_sqm: f64) -> AppResult<InstallationEstimate> {
    DEFAULT_ASSUMPTIONS.check_area(area_sqm)?;
    Ok(DEFAULT_ASSUMPTIONS.estimate(area_sqm))
}

/// Rounds half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sixteen_square_meters() {
        let est = estimate_area(16.0).unwrap();
        assert_eq!(est.panel_count, 10);
        assert_eq!(est.capacity_kw, 4.0);
        assert_eq!(est.estimated_cost, 180_000.0);
        assert_eq!(est.annual_generation_kwh, 6400.0);
        assert_eq!(est.annual_savings, 51_200.0);
        assert_eq!(est.payback_years, Some(3.5));
    }

    #[test]
    fn test_zero_area_has_no_payback() {
        let est = estimate_area(0.0).unwrap();
        assert_eq!(est.panel_count, 0);
        assert_eq!(est.capacity_kw, 0.0);
        assert_eq!(est.estimated_cost, 0.0);
        assert_eq!(est.annual_savings, 0.0);
        assert_eq!(est.payback_years, None);
    }

    #[test]
    fn test_area_below_one_panel() {
        let est = estimate_area(1.59).unwrap();
        assert_eq!(est.panel_count, 0);
        assert!(est.payback_years.is_none());
    }

    #[test]
    fn test_partial_panels_are_dropped() {
        let est = estimate_area(5.0).unwrap();
        assert_eq!(est.panel_count, 3);
        assert_eq!(est.capacity_kw, 1.2);
    }

    #[test]
    fn test_estimate_parses_text() {
        assert_eq!(estimate(" 16 ").unwrap(), estimate_area(16.0).unwrap());
        assert_eq!(estimate("16.0").unwrap().panel_count, 10);
    }

    #[test]
    fn test_estimate_rejects_non_numeric() {
        for input in ["abc", "", "16 sqm", "1,600"] {
            match estimate(input) {
                Err(AppError::Validation(msg)) => assert_eq!(msg, INVALID_AREA_MESSAGE),
                other => panic!("expected validation error for {input:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_estimate_area_rejects_non_finite_and_negative() {
        assert!(estimate_area(f64::NAN).is_err());
        assert!(estimate_area(f64::INFINITY).is_err());
        assert!(estimate_area(-3.2).is_err());
        assert!(estimate("NaN").is_err());
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(3.515625, 1), 3.5);
        assert_eq!(round_to(2.125, 2), 2.13);
        assert_eq!(round_to(179_999.6, 0), 180_000.0);
    }

    #[test]
    fn test_area_beyond_panel_count_range_is_rejected() {
        for area in [1e20, 3e19, f64::MAX] {
            match estimate_area(area) {
                Err(AppError::Validation(msg)) => assert_eq!(msg, INVALID_AREA_MESSAGE),
                other => panic!("expected validation error for {area}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_large_area_keeps_exact_floor() {
        let area = 1e18;
        let est = estimate_area(area).unwrap();
        assert_eq!(est.panel_count, (area / 1.6).floor() as u64);
        assert!(est.panel_count < u64::MAX);
    }
}
