//! # qn-optim
//!
//! Gradient-based unconstrained (optionally box-constrained) minimization.
//!
//! Three interchangeable search-direction strategies — limited-memory BFGS,
//! nonlinear conjugate gradient, and Newton-CG via Hessian-vector products —
//! driven by a strong-Wolfe line search.
//!
//! ## Architecture
//!
//! The engine depends on the `Objective` trait from qn-core, never on a
//! concrete objective. All mutable state is owned by the driver loop and
//! passed explicitly into each component; nothing process-wide survives a
//! run.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Box constraints: elementwise projection of the iterate.
pub mod bounds;
/// Tagged search-direction strategy (L-BFGS | NLCG | Newton-CG).
pub mod direction;
/// Fixed-capacity ring of L-BFGS correction pairs.
pub mod history;
/// L-BFGS search direction via the two-loop recursion.
pub mod lbfgs;
/// Strong-Wolfe line search.
pub mod linesearch;
/// Driver loop, configuration, terminal states.
pub mod minimize;
/// Truncated-Newton inner conjugate-gradient solver.
pub mod newton_cg;
/// Per-iteration progress observation.
pub mod progress;
/// Small dense-vector kernels.
pub mod vecops;

pub use direction::DirectionStrategy;
pub use history::CorrectionHistory;
pub use linesearch::LineSearchResult;
pub use minimize::{Config, Minimizer};
pub use progress::{CollectingObserver, LogObserver, ProgressObserver};
