// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

use std::time::{Duration, Instant};

/// Logs how long a query ran, and how many iterations it took, when dropped.
pub struct ScopeTimer<'a> {
    name: &'a str,
    start_time: Instant,
    iterations: usize,
}

impl<'a> ScopeTimer<'a> {
    pub fn new(name: &'a str) -> Self {
        Self {
            name,
            start_time: Instant::now(),
            iterations: 0,
        }
    }

    pub fn record_iteration(&mut self) {
        self.iterations += 1;
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl Drop for ScopeTimer<'_> {
    fn drop(&mut self) {
        log::trace!(
            "{} took {:.2?} over {} iterations",
            self.name,
            self.elapsed(),
            self.iterations
        );
    }
}
