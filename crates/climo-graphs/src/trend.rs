//! Year-over-year trend for a single calendar day.
//!
//! The highs observed on one calendar day are regressed on the year through a
//! quadratic B-spline basis with a small ridge penalty, then evaluated on an
//! even grid together with a constant-width 95% band.

use crate::utils::{linspace, sample_std_dev};
use climo_common::{CalendarKey, ClimoError, ObservationSeries, Result};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Fewest yearly points the default fit accepts.
pub const MIN_TREND_POINTS: usize = 5;

/// One year's high on the tracked calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearPoint {
    /// Observation year.
    pub year: i32,
    /// Observed high.
    pub high: f64,
    /// Set on the latest year only.
    pub is_most_recent: bool,
}

/// The highs for one calendar day, one point per year, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSeries {
    key: CalendarKey,
    points: Vec<YearPoint>,
}

impl YearSeries {
    /// Extracts the records falling on `key`. Years without a high are left
    /// out; the last remaining point is flagged as the most recent.
    pub fn from_series(series: &ObservationSeries, key: CalendarKey) -> Self {
        let mut points: Vec<YearPoint> = series
            .for_key(key)
            .filter_map(|record| {
                record
                    .high
                    .filter(|h| h.is_finite())
                    .map(|high| YearPoint {
                        year: record.year(),
                        high,
                        is_most_recent: false,
                    })
            })
            .collect();

        if let Some(last) = points.last_mut() {
            last.is_most_recent = true;
        }
        Self { key, points }
    }

    /// The calendar day.
    pub const fn key(&self) -> CalendarKey {
        self.key
    }

    /// All points, oldest first.
    pub fn points(&self) -> &[YearPoint] {
        &self.points
    }

    /// Number of years with data.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether no year has data.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The flagged latest point.
    pub fn most_recent(&self) -> Option<&YearPoint> {
        self.points.iter().find(|p| p.is_most_recent)
    }

    /// Every point except the latest.
    pub fn history(&self) -> impl Iterator<Item = &YearPoint> + '_ {
        self.points.iter().filter(|p| !p.is_most_recent)
    }

    fn years(&self) -> Vec<f64> {
        self.points.iter().map(|p| f64::from(p.year)).collect()
    }

    fn highs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.high).collect()
    }
}

/// Fit settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendParams {
    /// Knots strictly inside the observed year range.
    pub interior_knots: usize,
    /// Polynomial degree of each spline piece.
    pub degree: usize,
    /// Ridge penalty on the basis coefficients.
    pub alpha: f64,
    /// Evaluation grid size.
    pub grid_points: usize,
    /// Normal quantile for the band.
    pub z: f64,
    /// Fewest yearly points accepted.
    pub min_points: usize,
}

impl Default for TrendParams {
    fn default() -> Self {
        Self {
            interior_knots: 4,
            degree: 2,
            alpha: 1e-3,
            grid_points: 500,
            z: 1.96,
            min_points: MIN_TREND_POINTS,
        }
    }
}

/// B-spline basis on uniform knots over `[lo, hi]`, padded by `degree` knots
/// on each side. Inputs outside the range are clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct SplineBasis {
    knots: Vec<f64>,
    degree: usize,
    lo: f64,
    hi: f64,
}

impl SplineBasis {
    /// Builds the knot vector; the range must be non-empty and finite.
    pub fn uniform(lo: f64, hi: f64, interior_knots: usize, degree: usize) -> Result<Self> {
        if !(lo.is_finite() && hi.is_finite()) || hi <= lo {
            return Err(ClimoError::fit(format!(
                "spline range [{lo}, {hi}] is empty or not finite"
            )));
        }

        let step = (hi - lo) / (interior_knots + 1) as f64;
        let total = interior_knots + 2 + 2 * degree;
        let knots = (0..total)
            .map(|i| step.mul_add(i as f64 - degree as f64, lo))
            .collect();

        Ok(Self { knots, degree, lo, hi })
    }

    /// Number of basis functions.
    pub fn len(&self) -> usize {
        self.knots.len() - self.degree - 1
    }

    /// Always false for a constructed basis.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The knot vector.
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Values of every basis function at `x`.
    pub fn evaluate(&self, x: f64) -> Vec<f64> {
        let x = x.clamp(self.lo, self.hi);
        let p = self.degree;
        let t = &self.knots;
        let span = self.span(x);

        // Cox-de Boor triangle over the non-zero functions span-p..=span
        let mut local = vec![0.0; p + 1];
        let mut left = vec![0.0; p + 1];
        let mut right = vec![0.0; p + 1];
        local[0] = 1.0;
        for j in 1..=p {
            left[j] = x - t[span + 1 - j];
            right[j] = t[span + j] - x;
            let mut saved = 0.0;
            for r in 0..j {
                let temp = local[r] / (right[r + 1] + left[j - r]);
                local[r] = right[r + 1].mul_add(temp, saved);
                saved = left[j - r] * temp;
            }
            local[j] = saved;
        }

        let mut row = vec![0.0; self.len()];
        row[span - p..=span].copy_from_slice(&local);
        row
    }

    /// Knot interval containing `x`, restricted so that `x == hi` lands in
    /// the last interval of the range.
    fn span(&self, x: f64) -> usize {
        let last = self.len() - 1;
        let mut span = self.degree;
        while span < last && x >= self.knots[span + 1] {
            span += 1;
        }
        span
    }

    fn design_matrix(&self, xs: &[f64]) -> DMatrix<f64> {
        let values: Vec<f64> = xs.iter().flat_map(|&x| self.evaluate(x)).collect();
        DMatrix::from_row_slice(xs.len(), self.len(), &values)
    }
}

/// Ridge fit with an unpenalised intercept.
#[derive(Debug, Clone, PartialEq)]
struct RidgeModel {
    intercept: f64,
    weights: DVector<f64>,
}

impl RidgeModel {
    /// Centres the columns and the target, then solves
    /// `(XᵀX + αI) w = Xᵀy` through a Cholesky factorisation.
    fn fit(design: &DMatrix<f64>, target: &DVector<f64>, alpha: f64) -> Result<Self> {
        if design.nrows() == 0 || design.nrows() != target.len() {
            return Err(ClimoError::fit(format!(
                "design has {} rows for {} targets",
                design.nrows(),
                target.len()
            )));
        }

        let x_mean =
            DVector::from_iterator(design.ncols(), design.column_iter().map(|c| c.mean()));
        let y_mean = target.mean();

        let mut centred = design.clone();
        for (mut column, mean) in centred.column_iter_mut().zip(x_mean.iter()) {
            column.add_scalar_mut(-mean);
        }
        let target_centred = target.add_scalar(-y_mean);

        let p = design.ncols();
        let gram = centred.tr_mul(&centred) + DMatrix::identity(p, p) * alpha;
        let rhs = centred.tr_mul(&target_centred);

        let weights = gram
            .cholesky()
            .ok_or_else(|| ClimoError::fit("normal equations are not positive definite"))?
            .solve(&rhs);
        let intercept = y_mean - x_mean.dot(&weights);
        if !intercept.is_finite() || weights.iter().any(|w| !w.is_finite()) {
            return Err(ClimoError::fit("non-finite spline coefficients"));
        }
        Ok(Self { intercept, weights })
    }

    fn predict(&self, design: &DMatrix<f64>) -> DVector<f64> {
        (design * &self.weights).add_scalar(self.intercept)
    }
}

/// Fitted values and band half-widths on an even grid of years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendCurve {
    /// Grid of (fractional) years.
    pub grid: Vec<f64>,
    /// Predicted high at each grid year.
    pub fitted: Vec<f64>,
    /// Band half-width at each grid year.
    pub half_width: Vec<f64>,
}

impl TrendCurve {
    /// Grid size.
    pub fn len(&self) -> usize {
        self.grid.len()
    }

    /// Whether the grid is empty.
    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    /// `(year, fitted)` pairs.
    pub fn line(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.grid.iter().copied().zip(self.fitted.iter().copied())
    }

    /// `(year, fitted + half_width)` pairs.
    pub fn upper(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.line()
            .zip(&self.half_width)
            .map(|((x, y), h)| (x, y + h))
    }

    /// `(year, fitted - half_width)` pairs.
    pub fn lower(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.line()
            .zip(&self.half_width)
            .map(|((x, y), h)| (x, y - h))
    }
}

/// Fits and evaluates the trend.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrendEstimator {
    params: TrendParams,
}

impl TrendEstimator {
    /// Estimator with explicit settings.
    pub const fn new(params: TrendParams) -> Self {
        Self { params }
    }

    /// The settings in use.
    pub const fn params(&self) -> &TrendParams {
        &self.params
    }

    /// Fits `series` and evaluates on `grid_points` years spanning
    /// `[first_year, last_year]`.
    ///
    /// The band half-width is `z * s / sqrt(n)` with `s` the sample standard
    /// deviation of the observed highs and `n` the number of points; it is
    /// the same at every grid year.
    #[instrument(skip(self, series), fields(key = %series.key(), points = series.len()))]
    pub fn estimate(
        &self,
        series: &YearSeries,
        first_year: i32,
        last_year: i32,
    ) -> Result<TrendCurve> {
        let required = self.params.min_points.max(2);
        if series.len() < required {
            return Err(ClimoError::InsufficientData {
                key: series.key(),
                required,
                found: series.len(),
            });
        }

        let years = series.years();
        let highs = series.highs();
        let (lo, hi) = (years[0], years[years.len() - 1]);

        let basis = SplineBasis::uniform(lo, hi, self.params.interior_knots, self.params.degree)?;
        let model = RidgeModel::fit(
            &basis.design_matrix(&years),
            &DVector::from_column_slice(&highs),
            self.params.alpha,
        )?;

        let grid = linspace(
            f64::from(first_year),
            f64::from(last_year),
            self.params.grid_points,
        );
        let fitted = model.predict(&basis.design_matrix(&grid)).as_slice().to_vec();

        let spread = sample_std_dev(&highs)
            .ok_or_else(|| ClimoError::fit("standard deviation needs two points"))?;
        let half = self.params.z * spread / (highs.len() as f64).sqrt();
        let half_width = vec![half; grid.len()];

        debug!(
            intercept = model.intercept,
            half_width = half,
            "Trend fitted over {}..={}",
            lo,
            hi
        );

        Ok(TrendCurve {
            grid,
            fitted,
            half_width,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use climo_common::test_utils::{assert_approx_eq, series_fixtures::yearly_series};
    use climo_common::UnitSystem;

    fn key() -> CalendarKey {
        CalendarKey::new(7, 4).unwrap()
    }

    fn series(years: std::ops::RangeInclusive<i32>, high: impl Fn(i32) -> f64) -> YearSeries {
        let raw = yearly_series(key(), years, UnitSystem::Imperial, high);
        YearSeries::from_series(&raw, key())
    }

    #[test]
    fn test_only_latest_year_is_flagged() {
        let ys = series(2015..=2024, |y| f64::from(y - 2000));
        assert_eq!(ys.len(), 10);
        assert_eq!(ys.points().iter().filter(|p| p.is_most_recent).count(), 1);
        assert_eq!(ys.most_recent().unwrap().year, 2024);
        assert_eq!(ys.history().count(), 9);
    }

    #[test]
    fn test_leap_day_series_skips_common_years() {
        let leap = CalendarKey::new(2, 29).unwrap();
        let raw = yearly_series(leap, 2001..=2024, UnitSystem::Imperial, |_| 40.0);
        let ys = YearSeries::from_series(&raw, leap);
        let years: Vec<i32> = ys.points().iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2004, 2008, 2012, 2016, 2020, 2024]);
    }

    #[test]
    fn test_basis_is_partition_of_unity() {
        let basis = SplineBasis::uniform(1994.0, 2024.0, 4, 2).unwrap();
        assert_eq!(basis.knots().len(), 10);
        assert_eq!(basis.len(), 7);

        for x in [1990.0, 1994.0, 1999.5, 2006.0, 2017.25, 2024.0, 2030.0] {
            let row = basis.evaluate(x);
            assert_approx_eq(row.iter().sum(), 1.0, 1e-12);
            assert!(row.iter().all(|v| *v >= -1e-15));
            assert!(row.iter().filter(|v| **v > 0.0).count() <= 3);
        }
    }

    #[test]
    fn test_empty_range_is_a_fit_error() {
        assert!(matches!(
            SplineBasis::uniform(2020.0, 2020.0, 4, 2),
            Err(ClimoError::Fit { .. })
        ));
    }

    #[test]
    fn test_band_matches_formula() {
        let ys = series(2020..=2024, |y| match y {
            2020 => 10.0,
            2021 => 12.0,
            2022 => 14.0,
            2023 => 16.0,
            _ => 18.0,
        });
        let curve = TrendEstimator::default().estimate(&ys, 2020, 2024).unwrap();

        let expected = 1.96 * 2f64.sqrt();
        assert_eq!(curve.half_width.len(), 500);
        for h in &curve.half_width {
            assert_approx_eq(*h, expected, 1e-9);
        }
    }

    #[test]
    fn test_grid_spans_window() {
        let ys = series(1994..=2024, |y| 80.0 + f64::from(y % 7));
        let curve = TrendEstimator::default().estimate(&ys, 1994, 2024).unwrap();
        assert_eq!(curve.len(), 500);
        assert_eq!(curve.fitted.len(), 500);
        assert_eq!(curve.grid[0], 1994.0);
        assert_eq!(curve.grid[499], 2024.0);
        assert!(curve.fitted.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_linear_trend_is_recovered_at_endpoints() {
        let ys = series(2014..=2024, |y| 50.0 + f64::from(y - 2014));
        let curve = TrendEstimator::default().estimate(&ys, 2014, 2024).unwrap();

        assert_approx_eq(curve.fitted[0], 50.0, 0.1);
        assert_approx_eq(curve.fitted[499], 60.0, 0.1);
        assert_approx_eq(curve.fitted[250], 55.0 + 10.0 / 499.0 * 0.5, 0.1);
    }

    #[test]
    fn test_refit_is_bit_identical() {
        let ys = series(1994..=2024, |y| 75.0 + 6.0 * (f64::from(y) * 1.3).sin());
        let estimator = TrendEstimator::default();
        let first = estimator.estimate(&ys, 1994, 2024).unwrap();
        let second = estimator.estimate(&ys, 1994, 2024).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_too_few_points() {
        let ys = series(2021..=2024, |_| 70.0);
        let err = TrendEstimator::default().estimate(&ys, 2021, 2024).unwrap_err();
        assert!(matches!(
            err,
            ClimoError::InsufficientData { required: 5, found: 4, .. }
        ));
        assert!(err.is_chart_only());
    }

    #[test]
    fn test_indefinite_normal_equations_are_a_fit_error() {
        let ys = series(1994..=2024, |y| 70.0 + f64::from(y % 7));
        let estimator = TrendEstimator::new(TrendParams {
            alpha: -1e6,
            ..TrendParams::default()
        });
        let err = estimator.estimate(&ys, 1994, 2024).unwrap_err();
        assert!(matches!(err, ClimoError::Fit { .. }));
    }

    #[test]
    fn test_band_brackets_curve() {
        let ys = series(2000..=2024, |y| 70.0 + f64::from(y % 3));
        let curve = TrendEstimator::default().estimate(&ys, 2000, 2024).unwrap();
        for ((upper, lower), (_, fitted)) in curve.upper().zip(curve.lower()).zip(curve.line()) {
            assert!(upper.1 > fitted && lower.1 < fitted);
        }
    }
}
