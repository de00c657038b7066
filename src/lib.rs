//! Basislu: a dense basis-factorization engine for the revised simplex method.
//!
//! The engine maintains the factored representation of an m×m basis matrix
//! `B` as it evolves across simplex pivots:
//!
//! ```text
//! B = B₀ · E₁ · E₂ · … · Eₙ
//! ```
//!
//! where `B₀` is a dense base matrix held in LU-factored form (partial
//! pivoting, the permutation and elimination steps kept as an ordered
//! record) and each `Eᵢ` is an eta matrix recording one column replacement.
//! It supports:
//!
//! - **FTRAN**: solve `B · x = y` (entering-column computation)
//! - **BTRAN**: solve `x · B = y` (pricing-row computation)
//! - **Refactorization**: fold the eta chain back into `B₀` and recompute
//!   the LU factorization, bounding both numerical error and the cost of
//!   threading solves through the chain
//! - **Snapshot/restore** of the base matrix, and explicit inversion of `B₀`
//!
//! `B⁻¹` is never materialized; every solve works through the factors.
//! Storage is dense row-major throughout, and every computed value passes a
//! near-zero snapping policy so residue from cancellation cannot poison
//! later pivots.
//!
//! # Example
//!
//! ```
//! use basislu::BasisFactorization;
//!
//! # fn main() -> basislu::FactorizationResult<()> {
//! let mut basis = BasisFactorization::new(3)?;
//! basis.set_b0(&[
//!     2.0, 0.0, 0.0, //
//!     0.0, 3.0, 0.0, //
//!     0.0, 0.0, 4.0,
//! ])?;
//!
//! let mut x = [0.0; 3];
//! basis.forward_transformation(&[2.0, 6.0, 12.0], &mut x);
//! assert!((x[0] - 1.0).abs() < 1e-9);
//! assert!((x[1] - 2.0).abs() < 1e-9);
//! assert!((x[2] - 3.0).abs() < 1e-9);
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]

pub mod error;
pub mod linalg;
pub mod util;

// Re-export main types
pub use error::{FactorizationError, FactorizationResult};
pub use linalg::eta::EtaMatrix;
pub use linalg::factor::{BasisFactorization, FactorizationSettings, LpStep};
