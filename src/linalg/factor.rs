//! LU-factored basis representation with eta updates.
//!
//! The basis matrix of a revised simplex iteration is maintained as
//!
//! ```text
//! B = B₀ · E₁ · E₂ · … · Eₙ
//! ```
//!
//! where `B₀` is a dense base matrix and each `Eᵢ` is an eta matrix recording
//! one basis change since the last refactorization. `B₀` itself is held in
//! factored form: an ordered record of row swaps and lower-triangular
//! elimination steps (the LP record) together with an upper-triangular `U`
//! such that
//!
//! ```text
//! Lₘ·Pₘ · … · L₁·P₁ · B₀ = U
//! ```
//!
//! with the factors read from the head of the record to its tail.
//! Equivalently `B₀ = inv(LP) · U`. `B⁻¹` is never materialized; FTRAN and
//! BTRAN thread a right-hand side through the factors.

use std::collections::VecDeque;

use crate::error::{FactorizationError, FactorizationResult};
use crate::linalg::dense;
use crate::linalg::eta::EtaMatrix;
use crate::util::numerics;

/// One recorded step of the LU factorization.
///
/// Factorization prepends steps to the record, so reading it head to tail
/// yields the left-multiplication order `Lₘ·Pₘ · … · L₁·P₁`, while a reverse
/// traversal replays construction order.
#[derive(Debug, Clone, PartialEq)]
pub enum LpStep {
    /// Transposition of two rows
    RowSwap(usize, usize),
    /// Lower-triangular elimination step: an eta column holding `1/pivot` on
    /// the diagonal and the negated row multipliers below it
    Eliminate(EtaMatrix),
}

/// Numeric policy for the engine.
#[derive(Debug, Clone, Copy)]
pub struct FactorizationSettings {
    /// Eta-chain length beyond which a push triggers condense-and-refactor
    pub refactorization_threshold: usize,
    /// Tolerance under which computed values are snapped to exact zero
    pub zero_tolerance: f64,
}

impl Default for FactorizationSettings {
    fn default() -> Self {
        Self {
            refactorization_threshold: 12,
            zero_tolerance: numerics::DEFAULT_ZERO_TOLERANCE,
        }
    }
}

/// Factored representation of an m×m simplex basis.
///
/// The engine owns the base matrix, the LU record, the eta chain and two
/// m-length scratch buffers; it is single-threaded and expects exclusive
/// access for the duration of each call. References returned by the
/// observers stay valid until the next mutating call.
pub struct BasisFactorization {
    /// Basis dimension m
    m: usize,
    /// Base matrix B₀, row-major m×m
    b0: Vec<f64>,
    /// Upper-triangular factor of B₀, row-major m×m; meaningful only while
    /// the LP record is non-empty
    u: Vec<f64>,
    /// Factorization record; the head holds the most recently created step
    lp: VecDeque<LpStep>,
    /// Eta updates accumulated since the last refactorization, in push order
    etas: Vec<EtaMatrix>,
    /// Whether crossing the threshold triggers automatic refactorization
    factorization_enabled: bool,
    /// Numeric policy
    settings: FactorizationSettings,
    /// Working right-hand side shared by the solve kernels
    work: Vec<f64>,
    /// Construction area for elimination columns during factorization
    elim_column: Vec<f64>,
}

/// Allocate a zero-filled buffer, surfacing allocation failure to the caller
/// instead of aborting.
fn try_buffer(len: usize, what: &'static str) -> FactorizationResult<Vec<f64>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| FactorizationError::AllocationFailed(what))?;
    buffer.resize(len, 0.0);
    Ok(buffer)
}

impl BasisFactorization {
    /// Create an engine of dimension `m` with default settings.
    ///
    /// The base matrix starts as the identity; the LP record and the eta
    /// chain start empty.
    pub fn new(m: usize) -> FactorizationResult<Self> {
        Self::with_settings(m, FactorizationSettings::default())
    }

    /// Create an engine of dimension `m` with an explicit numeric policy.
    pub fn with_settings(m: usize, settings: FactorizationSettings) -> FactorizationResult<Self> {
        assert!(m > 0, "basis dimension must be positive");
        assert!(settings.zero_tolerance > 0.0, "zero tolerance must be positive");

        let mut b0 = try_buffer(m * m, "BasisFactorization::b0")?;
        for i in 0..m {
            b0[i * m + i] = 1.0;
        }

        Ok(Self {
            m,
            b0,
            u: try_buffer(m * m, "BasisFactorization::u")?,
            lp: VecDeque::new(),
            etas: Vec::new(),
            factorization_enabled: true,
            settings,
            work: try_buffer(m, "BasisFactorization::work")?,
            elim_column: try_buffer(m, "BasisFactorization::elim_column")?,
        })
    }

    /// Basis dimension m.
    pub fn dim(&self) -> usize {
        self.m
    }

    /// The base matrix B₀, row-major.
    pub fn b0(&self) -> &[f64] {
        &self.b0
    }

    /// The upper-triangular factor U, row-major. Zero-filled while no
    /// factorization is recorded.
    pub fn u(&self) -> &[f64] {
        &self.u
    }

    /// The factorization record, head first.
    pub fn lp(&self) -> &VecDeque<LpStep> {
        &self.lp
    }

    /// The pending eta updates, oldest first.
    pub fn etas(&self) -> &[EtaMatrix] {
        &self.etas
    }

    /// Active numeric policy.
    pub fn settings(&self) -> &FactorizationSettings {
        &self.settings
    }

    /// Whether crossing the eta threshold triggers automatic refactorization.
    pub fn factorization_enabled(&self) -> bool {
        self.factorization_enabled
    }

    /// Enable or disable automatic refactorization on push.
    pub fn toggle_factorization(&mut self, enabled: bool) {
        self.factorization_enabled = enabled;
    }

    /// Record a basis change: column `column_index` of the basis is replaced,
    /// with `column` holding the entering column expressed in the current
    /// basis.
    ///
    /// When automatic refactorization is enabled and the chain grows past the
    /// configured threshold, the chain is condensed into `B₀` and the base is
    /// refactorized; that factorization can fail on a numerically singular
    /// basis.
    pub fn push_eta(&mut self, column_index: usize, column: &[f64]) -> FactorizationResult<()> {
        assert_eq!(column.len(), self.m);
        assert!(column_index < self.m);

        self.etas.push(EtaMatrix::new(column_index, column.to_vec()));

        if self.factorization_enabled
            && self.etas.len() > self.settings.refactorization_threshold
        {
            log::debug!(
                "eta chain length {} exceeds threshold {}; condensing and refactoring",
                self.etas.len(),
                self.settings.refactorization_threshold
            );
            self.condense_etas();
            self.factorize_base()?;
        }

        Ok(())
    }

    /// Fold the eta chain into `B₀`, drop the chain and clear the LU record.
    ///
    /// Multiplication by an eta matrix on the right replaces one column of
    /// `B₀` with a linear combination of its columns weighted by the eta
    /// column. Each row's combination reads only that row, so the new column
    /// is produced in place row by row.
    pub fn condense_etas(&mut self) {
        let m = self.m;
        let tolerance = self.settings.zero_tolerance;

        for eta in &self.etas {
            let col = eta.column_index();
            for i in 0..m {
                let mut sum = 0.0;
                for j in 0..m {
                    sum += self.b0[i * m + j] * eta.column()[j];
                }
                self.b0[i * m + col] = numerics::snap(sum, tolerance);
            }
        }

        self.etas.clear();
        self.clear_lpu();
    }

    /// Replace the base matrix and LU-factorize it.
    ///
    /// The eta chain is untouched; callers replacing the whole basis are
    /// expected to have condensed or dropped pending updates first.
    pub fn set_b0(&mut self, matrix: &[f64]) -> FactorizationResult<()> {
        assert_eq!(matrix.len(), self.m * self.m);

        self.b0.copy_from_slice(matrix);
        self.factorize_base()
    }

    /// Recompute the LU factorization of `B₀` with partial pivoting.
    ///
    /// On success `U` is upper-triangular with unit diagonal and the LP
    /// record, read head to tail, left-multiplies `B₀` to `U`.
    pub fn factorize_base(&mut self) -> FactorizationResult<()> {
        let m = self.m;
        let tolerance = self.settings.zero_tolerance;

        self.clear_lpu();
        self.u.copy_from_slice(&self.b0);

        for i in 0..m {
            // Partial pivoting: among rows i..m, bring the largest entry of
            // column i to the diagonal.
            let mut largest = self.u[i * m + i].abs();
            let mut best_row = i;
            for j in (i + 1)..m {
                let contender = self.u[j * m + i].abs();
                if numerics::definitely_greater(contender, largest, tolerance) {
                    largest = contender;
                    best_row = j;
                }
            }

            if numerics::is_zero(largest, tolerance) {
                return Err(FactorizationError::NoPivotAvailable { column: i });
            }

            if best_row != i {
                dense::row_swap(&mut self.u, m, i, best_row);
                self.lp.push_front(LpStep::RowSwap(i, best_row));
            }

            // Build the elimination column: 1/pivot on the diagonal, the
            // negated row multipliers below it.
            self.elim_column.fill(0.0);
            let pivot = self.u[i * m + i];
            self.elim_column[i] = 1.0 / pivot;
            for j in (i + 1)..m {
                self.elim_column[j] = -self.u[j * m + i] / pivot;
            }

            self.eliminate_column(i);
            self.lp
                .push_front(LpStep::Eliminate(EtaMatrix::new(i, self.elim_column.clone())));
        }

        Ok(())
    }

    /// Apply the elimination step held in `elim_column` to `U` in place.
    ///
    /// The pivot row is rewritten last: every other row's update reads it.
    fn eliminate_column(&mut self, pivot_row: usize) {
        let m = self.m;
        let tolerance = self.settings.zero_tolerance;

        for row in (pivot_row + 1)..m {
            self.u[row * m + pivot_row] = 0.0;
            for col in (pivot_row + 1)..m {
                let updated =
                    self.u[row * m + col] + self.elim_column[row] * self.u[pivot_row * m + col];
                self.u[row * m + col] = numerics::snap(updated, tolerance);
            }
        }

        for col in (pivot_row + 1)..m {
            let scaled = self.u[pivot_row * m + col] * self.elim_column[pivot_row];
            self.u[pivot_row * m + col] = numerics::snap(scaled, tolerance);
        }
        self.u[pivot_row * m + pivot_row] = 1.0;
    }

    /// Drop the LP record and zero U.
    fn clear_lpu(&mut self) {
        self.lp.clear();
        self.u.fill(0.0);
    }

    /// FTRAN: solve `B · x = y` for the current basis.
    ///
    /// In factored form the system reads
    /// `inv(LP) · U · E₁ · … · Eₙ · x = y`. Multiplying through by the
    /// recorded steps removes `inv(LP)`, back-substitution removes `U`, and
    /// the etas are eliminated one by one.
    pub fn forward_transformation(&mut self, y: &[f64], x: &mut [f64]) {
        let m = self.m;
        assert_eq!(y.len(), m);
        assert_eq!(x.len(), m);

        // With no factorization and no etas the basis is the identity.
        if self.etas.is_empty() && self.lp.is_empty() {
            x.copy_from_slice(y);
            return;
        }

        let tolerance = self.settings.zero_tolerance;
        self.work.copy_from_slice(y);

        // Replay the recorded steps in construction order (tail to head):
        // the right-hand side is left-multiplied by L₁·P₁ first, then L₂·P₂,
        // and so on, cancelling inv(LP).
        for step in self.lp.iter().rev() {
            match step {
                LpStep::RowSwap(r1, r2) => self.work.swap(*r1, *r2),
                LpStep::Eliminate(l) => l.multiply_left(&mut self.work, tolerance),
            }
        }

        // Solve U · x = w by back-substitution.
        if !self.lp.is_empty() {
            x[m - 1] = self.work[m - 1];
            for i in (0..m - 1).rev() {
                let mut sum = 0.0;
                for j in (i + 1)..m {
                    sum += self.u[i * m + j] * x[j];
                }
                x[i] = numerics::snap(self.work[i] - sum, tolerance);
            }
            self.work.copy_from_slice(x);
        }

        // Eliminate the etas one by one: in E · x = w the pivot entry is
        // pinned by the diagonal, the rest follow by substitution.
        for eta in &self.etas {
            let c = eta.column_index();
            x[c] = numerics::snap(self.work[c] / eta.diagonal(), tolerance);
            for i in 0..m {
                if i != c {
                    x[i] = numerics::snap(self.work[i] - x[c] * eta.column()[i], tolerance);
                }
            }
            // This iteration's solution is the next iteration's right-hand side
            self.work.copy_from_slice(x);
        }
    }

    /// BTRAN: solve `x · B = y` for the current basis.
    ///
    /// Etas are eliminated from the right first (newest to oldest), then
    /// `x' · U = w` is solved by forward substitution, and finally the
    /// recorded steps are unwound as right products in head-to-tail order.
    pub fn backward_transformation(&mut self, y: &[f64], x: &mut [f64]) {
        let m = self.m;
        assert_eq!(y.len(), m);
        assert_eq!(x.len(), m);

        if self.etas.is_empty() && self.lp.is_empty() {
            x.copy_from_slice(y);
            return;
        }

        let tolerance = self.settings.zero_tolerance;
        self.work.copy_from_slice(y);

        // Peel off the etas: x agrees with w everywhere except the eta
        // column, whose value is pinned by the inner product with the
        // replacement column.
        for eta in self.etas.iter().rev() {
            x.copy_from_slice(&self.work);

            let c = eta.column_index();
            let mut pinned = self.work[c];
            for i in 0..m {
                if i != c {
                    pinned -= x[i] * eta.column()[i];
                }
            }
            x[c] = numerics::snap(pinned / eta.diagonal(), tolerance);

            self.work.copy_from_slice(x);
        }

        // Solve x' · U = w: with U upper-triangular this is a
        // lower-triangular system in x', so it runs forward.
        if !self.lp.is_empty() {
            x[0] = self.work[0];
            for i in 1..m {
                let mut sum = 0.0;
                for j in 0..i {
                    sum += self.u[j * m + i] * x[j];
                }
                x[i] = numerics::snap(self.work[i] - sum, tolerance);
            }
        }

        // x' = x · inv(Lₘ·Pₘ · … · L₁·P₁); unwind the record head to tail,
        // right-multiplying by Lₘ, then Pₘ, down to P₁.
        for step in &self.lp {
            match step {
                LpStep::RowSwap(r1, r2) => x.swap(*r1, *r2),
                LpStep::Eliminate(l) => l.multiply_right(x, tolerance),
            }
        }
    }

    /// Compute `B₀⁻¹` into `result` (row-major m×m).
    ///
    /// Only valid between refactorizations: pending eta updates are not part
    /// of `B₀` and would make the result stale.
    pub fn invert_b0(&self, result: &mut [f64]) -> FactorizationResult<()> {
        let m = self.m;
        assert_eq!(result.len(), m * m);

        if !self.etas.is_empty() {
            return Err(FactorizationError::BasisUpdatesPending);
        }

        result.fill(0.0);
        for i in 0..m {
            result[i * m + i] = 1.0;
        }

        if self.lp.is_empty() {
            // Never factorized: B₀ must still be the identity.
            debug_assert!((0..m).all(|i| {
                (0..m).all(|j| self.b0[i * m + j] == if i == j { 1.0 } else { 0.0 })
            }));
            return Ok(());
        }

        // result := (Lₘ·Pₘ · … · L₁·P₁) · I, replaying the record in
        // construction order.
        for step in self.lp.iter().rev() {
            match step {
                LpStep::RowSwap(r1, r2) => dense::row_swap(result, m, *r1, *r2),
                LpStep::Eliminate(l) => {
                    let c = l.column_index();
                    // Rows below the pivot first; the pivot row is scaled
                    // last because every other update reads it.
                    for row in (c + 1)..m {
                        for col in 0..m {
                            result[row * m + col] += l.column()[row] * result[c * m + col];
                        }
                    }
                    for col in 0..m {
                        result[c * m + col] *= l.column()[c];
                    }
                }
            }
        }

        // result := U⁻¹ · result, eliminating U from the top using its rows,
        // rightmost column first.
        for col in (1..m).rev() {
            for row in (0..col).rev() {
                let u_element = self.u[row * m + col];
                if numerics::is_zero(u_element, self.settings.zero_tolerance) {
                    continue;
                }
                for k in 0..m {
                    result[row * m + k] -= u_element * result[col * m + k];
                }
            }
        }

        Ok(())
    }

    /// Condense and refactorize this engine, then hand the resulting base
    /// matrix to `other`, which factorizes it in turn.
    ///
    /// Condensing first keeps the snapshot down to a single matrix.
    pub fn store_factorization(
        &mut self,
        other: &mut BasisFactorization,
    ) -> FactorizationResult<()> {
        assert_eq!(self.m, other.m);
        assert!(
            other.etas.is_empty(),
            "target engine must have an empty eta chain"
        );

        self.condense_etas();
        self.factorize_base()?;

        other.set_b0(&self.b0)
    }

    /// Drop this engine's state and adopt the base matrix of `other`.
    pub fn restore_factorization(
        &mut self,
        other: &BasisFactorization,
    ) -> FactorizationResult<()> {
        assert_eq!(self.m, other.m);
        assert!(
            other.etas.is_empty(),
            "source engine must have an empty eta chain"
        );

        self.etas.clear();
        self.clear_lpu();
        self.set_b0(&other.b0)
    }
}
