//! Sequential grid search
//!
//! A narrow-purpose constrained minimizer over a 1-D interval. Each round
//! evaluates the objective and the constraint on an evenly spaced grid,
//! keeps the feasible point with the smallest objective, and zooms in
//! around it. The constraint may be stochastic, so convergence is judged on
//! function values with a tolerance rather than on exact equality.

use boot_lr_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Tolerance applied by [`SearchParameters::loosened`] at minimum
pub const TOLERANCE_FLOOR: f64 = 0.001;

/// Tuning for [`SequentialGridSearch`]
///
/// Values are never mutated in place; [`SearchParameters::loosened`]
/// returns a new value for the next attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchParameters {
    /// Factor by which the bounds shrink each round (> 1)
    pub shrink_factor: f64,
    /// Convergence tolerance on the objective (> 0)
    pub tolerance: f64,
    /// Grid points evaluated per round (>= 2)
    pub points_per_round: usize,
    /// Rounds allowed before giving up
    pub max_depth: usize,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            shrink_factor: 5.0,
            tolerance: 0.0005,
            points_per_round: 80,
            max_depth: 64,
        }
    }
}

impl SearchParameters {
    pub fn validate(&self) -> Result<()> {
        if !(self.shrink_factor.is_finite() && self.shrink_factor > 1.0) {
            return Err(Error::InvalidParameter(format!(
                "shrink factor must be finite and > 1, got {}",
                self.shrink_factor
            )));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "tolerance must be finite and > 0, got {}",
                self.tolerance
            )));
        }
        if self.points_per_round < 2 {
            return Err(Error::InvalidParameter(format!(
                "points per round must be at least 2, got {}",
                self.points_per_round
            )));
        }
        if self.max_depth == 0 {
            return Err(Error::InvalidParameter("max depth must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Parameters for the next attempt after a convergence failure
    ///
    /// Tolerance rises to at least [`TOLERANCE_FLOOR`], the shrink factor
    /// moves toward 1 and the grid gets 30% denser.
    pub fn loosened(&self) -> Self {
        Self {
            shrink_factor: (self.shrink_factor - 1.0) * 0.65 + 1.0,
            tolerance: self.tolerance.max(TOLERANCE_FLOOR),
            points_per_round: (self.points_per_round as f64 * 1.3).floor() as usize,
            max_depth: self.max_depth,
        }
    }
}

/// Where a search stopped
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSearchOutcome {
    /// The selected argument
    pub x: f64,
    /// Objective value at `x`
    pub value: f64,
    /// Rounds evaluated
    pub rounds: usize,
}

/// Iterative grid-refinement minimizer
#[derive(Debug, Clone)]
pub struct SequentialGridSearch {
    params: SearchParameters,
    verbose: bool,
}

impl SequentialGridSearch {
    pub fn new(params: SearchParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            verbose: false,
        })
    }

    /// Report every round at info level instead of debug
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn parameters(&self) -> &SearchParameters {
        &self.params
    }

    /// Evenly spaced grid over `[lower, upper]`, endpoints included
    fn grid(&self, lower: f64, upper: f64) -> Vec<f64> {
        let n = self.params.points_per_round;
        let step = (upper - lower) / (n - 1) as f64;
        (0..n)
            .map(|i| if i == n - 1 { upper } else { lower + step * i as f64 })
            .collect()
    }

    /// Minimize `objective` over `bounds` subject to `constraint`
    ///
    /// A round ends the search when its best value is within `tolerance` of
    /// the previous round's best, or when any two feasible points of the
    /// round, anywhere in the bounds, have values within `tolerance` of each
    /// other. The second rule compares the whole round, not just the
    /// neighbours of the best point, so an objective with repeated values
    /// (e.g. a symmetric one over a wide domain) can stop at grid
    /// resolution. The result is then the best grid point rather than a point
    /// within `tolerance` of the true minimum. For the boundary search the
    /// objective is `f(x) = x`, whose values on a grid are distinct and
    /// evenly spaced, so the rule only fires once the spacing drops below
    /// `tolerance`.
    ///
    /// Ties between feasible points with the same objective value go to the
    /// first one in scan order (smallest `x`). Fails with
    /// [`Error::ConvergenceFailure`] when a round has no feasible point,
    /// [`Error::NonFiniteEvaluation`] when the objective is NaN, and
    /// [`Error::SearchDepthExceeded`] after `max_depth` rounds.
    #[instrument(skip(self, objective, constraint), fields(params = ?self.params))]
    pub fn minimize<F, G>(
        &self,
        mut objective: F,
        mut constraint: G,
        bounds: (f64, f64),
    ) -> Result<GridSearchOutcome>
    where
        F: FnMut(f64) -> f64,
        G: FnMut(f64) -> Result<bool>,
    {
        let (mut lower, mut upper) = bounds;
        if !(lower.is_finite() && upper.is_finite() && lower < upper) {
            return Err(Error::InvalidParameter(format!(
                "search bounds must be finite with lower < upper, got [{lower}, {upper}]"
            )));
        }
        let tolerance = self.params.tolerance;
        let mut previous_best: Option<f64> = None;

        for round in 1..=self.params.max_depth {
            let mut feasible: Vec<(f64, f64)> = Vec::with_capacity(self.params.points_per_round);
            for x in self.grid(lower, upper) {
                let fx = objective(x);
                if fx.is_nan() {
                    return Err(Error::NonFiniteEvaluation {
                        x,
                        context: "objective returned NaN".to_string(),
                    });
                }
                if constraint(x)? {
                    feasible.push((x, fx));
                }
            }

            // First minimizer in scan order
            let best = feasible
                .iter()
                .copied()
                .reduce(|best, candidate| if candidate.1 < best.1 { candidate } else { best })
                .ok_or(Error::ConvergenceFailure { lower, upper })?;

            if self.verbose {
                info!(round, lower, upper, feasible = feasible.len(), best_x = best.0, best_value = best.1, "grid search round");
            } else {
                debug!(round, lower, upper, feasible = feasible.len(), best_x = best.0, best_value = best.1, "grid search round");
            }

            let outcome = GridSearchOutcome {
                x: best.0,
                value: best.1,
                rounds: round,
            };

            // Stable across rounds
            if let Some(prev) = previous_best {
                if (prev - best.1).abs() < tolerance {
                    return Ok(outcome);
                }
            }

            // The grid can no longer tell feasible values apart
            let mut values: Vec<f64> = feasible.iter().map(|&(_, fx)| fx).collect();
            values.sort_by(|a, b| a.total_cmp(b));
            if values.windows(2).any(|w| (w[1] - w[0]).abs() < tolerance) {
                return Ok(outcome);
            }

            let half_width = (upper - lower) / self.params.shrink_factor / 2.0;
            lower = best.0 - half_width;
            upper = best.0 + half_width;
            previous_best = Some(best.1);
        }

        Err(Error::SearchDepthExceeded {
            max_depth: self.params.max_depth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search(params: SearchParameters) -> SequentialGridSearch {
        SequentialGridSearch::new(params).unwrap()
    }

    #[test]
    fn test_quadratic_converges_to_zero() {
        let params = SearchParameters::default();
        let outcome = search(params)
            .minimize(|x| x * x, |_| Ok(true), (-1.0, 1.0))
            .unwrap();
        assert!(outcome.value < params.tolerance);
        assert!(outcome.x.abs() < 2.0 / 79.0);
    }

    #[test]
    fn test_odd_grid_hits_exact_minimum() {
        let params = SearchParameters {
            points_per_round: 81,
            ..SearchParameters::default()
        };
        let outcome = search(params)
            .minimize(|x| x * x, |_| Ok(true), (-1.0, 1.0))
            .unwrap();
        assert!(outcome.x.abs() < 1e-12);
        assert_eq!(outcome.rounds, 1);
    }

    #[test]
    fn test_repeated_values_stop_at_grid_resolution() {
        let params = SearchParameters::default();
        let outcome = search(params)
            .minimize(|x| x * x, |_| Ok(true), (-10.0, 10.0))
            .unwrap();
        // Symmetric grid points share values, so the first round ends it
        assert_eq!(outcome.rounds, 1);
        let step = 20.0 / 79.0;
        assert!((outcome.x.abs() - step / 2.0).abs() < 1e-9, "x = {}", outcome.x);
        assert!(outcome.value > params.tolerance);
    }

    #[test]
    fn test_constraint_boundary_is_found() {
        let params = SearchParameters {
            tolerance: 1e-4,
            ..SearchParameters::default()
        };
        let outcome = search(params)
            .minimize(|x| x, |x| Ok(x >= 0.37), (0.0, 1.0))
            .unwrap();
        assert!(outcome.x >= 0.37);
        assert!(outcome.x - 0.37 < 1e-3, "x = {}", outcome.x);
        assert!(outcome.rounds > 1);
    }

    #[test]
    fn test_ties_resolve_to_first_in_scan_order() {
        let params = SearchParameters {
            points_per_round: 5,
            ..SearchParameters::default()
        };
        // Constant objective: every point ties, the smallest x wins
        let outcome = search(params)
            .minimize(|_| 1.0, |x| Ok(x >= 0.5), (0.0, 1.0))
            .unwrap();
        assert_eq!(outcome.x, 0.5);
    }

    #[test]
    fn test_infeasible_bounds_fail_with_convergence_failure() {
        let err = search(SearchParameters::default())
            .minimize(|x| x, |_| Ok(false), (0.0, 1.0))
            .unwrap_err();
        assert!(matches!(err, Error::ConvergenceFailure { .. }));
        assert!(err.is_convergence_failure());
    }

    #[test]
    fn test_nan_objective_is_fatal() {
        let err = search(SearchParameters::default())
            .minimize(|x| if x > 0.5 { f64::NAN } else { x }, |_| Ok(true), (0.0, 1.0))
            .unwrap_err();
        assert!(matches!(err, Error::NonFiniteEvaluation { .. }));
        assert!(!err.is_convergence_failure());
    }

    #[test]
    fn test_constraint_errors_propagate() {
        let err = search(SearchParameters::default())
            .minimize(|x| x, |_| Err(Error::Computation("probe failed".into())), (0.0, 1.0))
            .unwrap_err();
        assert!(matches!(err, Error::Computation(_)));
    }

    #[test]
    fn test_depth_ceiling() {
        let params = SearchParameters {
            tolerance: 1e-300,
            max_depth: 3,
            ..SearchParameters::default()
        };
        // Strictly decreasing objective keeps moving the best point
        let mut calls = 0usize;
        let err = search(params)
            .minimize(
                |x| {
                    calls += 1;
                    -(calls as f64) - x
                },
                |_| Ok(true),
                (0.0, 1.0),
            )
            .unwrap_err();
        assert!(matches!(err, Error::SearchDepthExceeded { max_depth: 3 }));
    }

    #[test]
    fn test_invalid_parameters() {
        let bad = [
            SearchParameters { shrink_factor: 1.0, ..SearchParameters::default() },
            SearchParameters { tolerance: 0.0, ..SearchParameters::default() },
            SearchParameters { points_per_round: 1, ..SearchParameters::default() },
            SearchParameters { max_depth: 0, ..SearchParameters::default() },
        ];
        for params in bad {
            assert!(SequentialGridSearch::new(params).is_err(), "{params:?}");
        }
        assert!(search(SearchParameters::default())
            .minimize(|x| x, |_| Ok(true), (1.0, 0.0))
            .is_err());
    }

    #[test]
    fn test_loosened_only_relaxes() {
        let mut params = SearchParameters::default();
        for _ in 0..20 {
            let next = params.loosened();
            assert!(next.tolerance >= params.tolerance);
            assert!(next.tolerance >= TOLERANCE_FLOOR);
            assert!(next.shrink_factor <= params.shrink_factor);
            assert!(next.shrink_factor > 1.0);
            assert!(next.points_per_round >= params.points_per_round);
            params = next;
        }
        let once = SearchParameters::default().loosened();
        assert_eq!(once.points_per_round, 104);
        assert!((once.shrink_factor - 3.6).abs() < 1e-12);
        assert_eq!(once.tolerance, TOLERANCE_FLOOR);
    }
}
