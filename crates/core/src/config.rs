// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::time::Duration;

/// Tuning for one coordinator invocation.
///
/// Passed in at construction; the coordinator keeps no state between batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Upper bound on the time one client unit may take, lock wait included.
    pub unit_timeout: Duration,
    /// Maximum number of client units in flight at once.
    pub max_concurrency: usize,
}

impl CoordinatorConfig {
    /// Default per-unit timeout.
    pub const DEFAULT_UNIT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Default number of concurrently dispatched units.
    pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

    /// Creates a new configuration.
    #[must_use]
    pub const fn new(unit_timeout: Duration, max_concurrency: usize) -> Self {
        Self {
            unit_timeout,
            max_concurrency,
        }
    }

    /// Returns the concurrency limit, never less than one.
    #[must_use]
    pub const fn effective_concurrency(&self) -> usize {
        if self.max_concurrency == 0 {
            1
        } else {
            self.max_concurrency
        }
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_UNIT_TIMEOUT, Self::DEFAULT_MAX_CONCURRENCY)
    }
}
