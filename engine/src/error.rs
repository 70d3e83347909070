// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

use thiserror::Error;

/// Terminal failures of a single collision query. None of them are retried internally.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CollisionError {
    #[error("Invalid input: {what}")]
    InvalidInput { what: &'static str },

    #[error("Degenerate geometry: {reason}")]
    Degenerate { reason: &'static str },

    #[error("No convergence after {iterations} iterations")]
    NonConvergence { iterations: usize },
}

impl CollisionError {
    pub(crate) fn invalid(what: &'static str) -> Self {
        Self::InvalidInput { what }
    }

    pub(crate) fn degenerate(reason: &'static str) -> Self {
        Self::Degenerate { reason }
    }
}
