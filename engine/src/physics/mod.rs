// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

pub mod contact;
pub mod epa;
pub mod gjk;
pub mod horizon;
pub mod polytope;
pub mod simplex;
pub mod support;
