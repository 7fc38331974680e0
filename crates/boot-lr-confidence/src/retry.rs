//! Convergence retry
//!
//! Re-runs an estimation attempt with progressively looser grid-search
//! parameters when the boundary search fails to converge. Only convergence
//! failures are retried; any other error is returned immediately.

use crate::grid_search::SearchParameters;
use boot_lr_core::{Error, Result};
use tracing::{debug, info, warn};

/// Attempts allowed by default
pub const DEFAULT_MAX_TRIES: usize = 20;

/// A value together with how it was obtained
#[derive(Debug, Clone, PartialEq)]
pub struct Retried<T> {
    pub value: T,
    /// 1-based attempt that succeeded
    pub attempts: usize,
    /// Parameters of the successful attempt
    pub parameters: SearchParameters,
}

/// Retry driver that loosens [`SearchParameters`] between attempts
#[derive(Debug, Clone, Copy)]
pub struct ConvergenceRetry {
    max_tries: usize,
    verbose: bool,
}

impl Default for ConvergenceRetry {
    fn default() -> Self {
        Self {
            max_tries: DEFAULT_MAX_TRIES,
            verbose: false,
        }
    }
}

impl ConvergenceRetry {
    pub fn new(max_tries: usize) -> Result<Self> {
        if max_tries == 0 {
            return Err(Error::InvalidParameter("max tries must be at least 1".to_string()));
        }
        Ok(Self {
            max_tries,
            verbose: false,
        })
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn max_tries(&self) -> usize {
        self.max_tries
    }

    /// Call `attempt` until it succeeds, fails fatally, or tries run out
    ///
    /// Each attempt receives its own parameter value; after a convergence
    /// failure the next attempt gets [`SearchParameters::loosened`].
    pub fn run<T, F>(&self, initial: SearchParameters, mut attempt: F) -> Result<Retried<T>>
    where
        F: FnMut(SearchParameters) -> Result<T>,
    {
        let mut parameters = initial;
        let mut last_failure = None;

        for attempts in 1..=self.max_tries {
            match attempt(parameters) {
                Ok(value) => {
                    debug!(attempts, ?parameters, "attempt succeeded");
                    return Ok(Retried {
                        value,
                        attempts,
                        parameters,
                    });
                }
                Err(err) if err.is_convergence_failure() => {
                    let next = parameters.loosened();
                    if self.verbose {
                        info!(attempts, error = %err, ?next, "attempt failed to converge, loosening search");
                    } else {
                        debug!(attempts, error = %err, ?next, "attempt failed to converge, loosening search");
                    }
                    last_failure = Some(err);
                    parameters = next;
                }
                Err(err) => return Err(err),
            }
        }

        warn!(max_tries = self.max_tries, "all attempts failed to converge");
        let last = last_failure.unwrap_or_else(|| {
            Error::InvalidParameter("max tries must be at least 1".to_string())
        });
        Err(Error::ExhaustedRetries {
            attempts: self.max_tries,
            last: Box::new(last),
        })
    }
}
