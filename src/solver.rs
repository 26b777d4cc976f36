//! 2D multilateration solver
use log::{debug, error};
use nalgebra::{DMatrix, DVector, Matrix2};

use crate::{
    cfg::{AnchorRegistry, Config, SolverOpts},
    prelude::{AnchorId, AnchorPosition, Error, Position, Vector2},
};

/// Minimal number of ranges to form a 2D solution
pub const MIN_ANCHORS: usize = 3;

/// Initial damping factor
const INITIAL_DAMPING: f64 = 1.0E-3;

/// Damping factor beyond which we consider no descent direction remains
const MAX_DAMPING: f64 = 1.0E12;

/// Multilateration [Solution]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Solution {
    /// Best fit [Position]
    pub position: Position,
    /// Root mean square of the final ranging residuals [m]
    pub rms_residual_m: f64,
    /// Number of ranges that contributed
    pub anchors: usize,
    /// Number of iterations it took
    pub iterations: usize,
}

/// [Solver] estimates the [Position] that minimizes the ranging residuals
/// `r_i = |P_i - x| - d_i`, using Levenberg-Marquardt iterations initialized
/// at the centroid of the contributing anchors.
///
/// Collinear anchors are not detected: the problem is then poorly conditioned
/// (mirror ambiguity) and the solution may be wrong.
#[derive(Debug, Clone)]
pub struct Solver {
    /// Solver parametrization
    pub opts: SolverOpts,
    /// Fixed anchors
    anchors: AnchorRegistry,
}

impl Solver {
    /// Builds a new [Solver] from this [Config]
    pub fn new(cfg: &Config) -> Self {
        Self {
            opts: cfg.solver.clone(),
            anchors: cfg.anchors.clone(),
        }
    }

    /// [AnchorRegistry] used to resolve anchor identities
    pub fn anchors(&self) -> &AnchorRegistry {
        &self.anchors
    }

    /// [Solution] attempt from (anchor position, range [m]) pairs.
    /// Requires at least 3 pairs; how many of them are used is defined by
    /// [SolverOpts::selection].
    pub fn resolve(&self, pairs: &[(AnchorPosition, f64)]) -> Result<Solution, Error> {
        if pairs.len() < MIN_ANCHORS {
            // no need to proceed further
            return Err(Error::NotEnoughAnchors(pairs.len()));
        }

        let pairs = &pairs[..self.opts.selection.retained(pairs.len())];

        if pairs
            .iter()
            .any(|(anchor, range_m)| !anchor.is_finite() || !range_m.is_finite())
        {
            return Err(Error::NonFiniteInput);
        }

        let x0 = pairs
            .iter()
            .fold(Vector2::zeros(), |acc, (anchor, _)| acc + anchor.vector())
            / pairs.len() as f64;

        debug!(
            "initial guess (centroid of {} anchors): {}",
            pairs.len(),
            Position::from_vector(x0)
        );

        let (x, iterations) = self.minimize(pairs, x0)?;
        let residuals = Self::residuals(pairs, &x);

        let solution = Solution {
            position: Position::from_vector(x),
            rms_residual_m: (residuals.norm_squared() / pairs.len() as f64).sqrt(),
            anchors: pairs.len(),
            iterations,
        };

        debug!(
            "solution {} - rms={:.3}m ({} iterations)",
            solution.position, solution.rms_residual_m, solution.iterations
        );

        Ok(solution)
    }

    /// [Position] from (anchor position, range [m]) pairs, when it may be resolved.
    pub fn solve(&self, pairs: &[(AnchorPosition, f64)]) -> Option<Position> {
        match self.resolve(pairs) {
            Ok(solution) => Some(solution.position),
            Err(e) => {
                debug!("no solution: {}", e);
                None
            },
        }
    }

    /// [Solution] attempt from (anchor identity, range [m]) pairs.
    /// Anchors that are not registered are disregarded. Proposal order is preserved.
    pub fn resolve_ranges(&self, ranges: &[(AnchorId, f64)]) -> Result<Solution, Error> {
        let pairs = ranges
            .iter()
            .filter_map(|(id, range_m)| match self.anchors.position(id) {
                Some(position) => Some((position, *range_m)),
                None => {
                    debug!("{} - unknown anchor: disregarded", id);
                    None
                },
            })
            .collect::<Vec<_>>();

        self.resolve(&pairs)
    }

    /// [Position] from (anchor identity, range [m]) pairs, when it may be resolved.
    pub fn solve_ranges(&self, ranges: &[(AnchorId, f64)]) -> Option<Position> {
        match self.resolve_ranges(ranges) {
            Ok(solution) => Some(solution.position),
            Err(e) => {
                debug!("no solution: {}", e);
                None
            },
        }
    }

    /// Ranging residuals at x
    fn residuals(pairs: &[(AnchorPosition, f64)], x: &Vector2<f64>) -> DVector<f64> {
        DVector::from_iterator(
            pairs.len(),
            pairs
                .iter()
                .map(|(anchor, range_m)| (x - anchor.vector()).norm() - range_m),
        )
    }

    /// Residuals jacobian at x: unit vectors from each anchor towards x.
    /// Rows are null when x coincides with an anchor.
    fn jacobian(pairs: &[(AnchorPosition, f64)], x: &Vector2<f64>) -> DMatrix<f64> {
        let mut j = DMatrix::<f64>::zeros(pairs.len(), 2);
        for (i, (anchor, _)) in pairs.iter().enumerate() {
            let dx = x - anchor.vector();
            let norm = dx.norm();
            if norm > 0.0 {
                j[(i, 0)] = dx[0] / norm;
                j[(i, 1)] = dx[1] / norm;
            }
        }
        j
    }

    /// Levenberg-Marquardt minimization of the residuals cost.
    /// Returns the minimizer and the number of iterations.
    fn minimize(
        &self,
        pairs: &[(AnchorPosition, f64)],
        x0: Vector2<f64>,
    ) -> Result<(Vector2<f64>, usize), Error> {
        let tol = self.opts.tolerance;

        let mut x = x0;
        let mut lambda = INITIAL_DAMPING;
        let mut cost = 0.5 * Self::residuals(pairs, &x).norm_squared();

        for iteration in 1..=self.opts.max_iterations {
            let r = Self::residuals(pairs, &x);
            let j = Self::jacobian(pairs, &x);
            let j_t = j.transpose();

            let g = &j_t * &r;
            let g = Vector2::new(g[0], g[1]);

            if g.amax() < tol {
                debug!("iter #{}: gradient criteria reached", iteration);
                return Ok((x, iteration));
            }

            let h = &j_t * &j;
            let h = Matrix2::new(h[(0, 0)], h[(0, 1)], h[(1, 0)], h[(1, 1)]);

            let mut step = None;

            while lambda <= MAX_DAMPING {
                let damped = h + Matrix2::identity() * lambda;

                let Some(inv) = damped.try_inverse() else {
                    lambda *= 10.0;
                    continue;
                };

                let dx = -(inv * g);
                let candidate = x + dx;
                let candidate_cost = 0.5 * Self::residuals(pairs, &candidate).norm_squared();

                if candidate_cost.is_finite() && candidate_cost < cost {
                    step = Some((dx, candidate, candidate_cost));
                    lambda = (lambda / 10.0).max(f64::EPSILON);
                    break;
                }

                lambda *= 10.0;
            }

            let Some((dx, candidate, candidate_cost)) = step else {
                // no descent direction left: x is a (local) minimizer
                debug!("iter #{}: no further descent", iteration);
                if !x.iter().all(|v| v.is_finite()) {
                    return Err(Error::MatrixInversion);
                }
                return Ok((x, iteration));
            };

            let reduction = cost - candidate_cost;
            x = candidate;
            cost = candidate_cost;

            debug!(
                "iter #{}: x={} cost={:.3E} |dx|={:.3E}",
                iteration,
                Position::from_vector(x),
                cost,
                dx.norm()
            );

            if reduction < tol * cost {
                debug!("iter #{}: cost criteria reached", iteration);
                return Ok((x, iteration));
            }

            if dx.norm() < tol * (tol + x.norm()) {
                debug!("iter #{}: step criteria reached", iteration);
                return Ok((x, iteration));
            }
        }

        error!(
            "solver did not converge within {} iterations",
            self.opts.max_iterations
        );

        Err(Error::NotConverged(self.opts.max_iterations))
    }
}

#[cfg(test)]
mod test {
    use super::Solver;
    use crate::prelude::{AnchorPosition, AnchorRegistry, Config, Error, Position};

    fn ranges_to(anchors: &[AnchorPosition], tag: &Position) -> Vec<(AnchorPosition, f64)> {
        anchors
            .iter()
            .map(|anchor| (*anchor, anchor.distance_to(tag)))
            .collect()
    }

    #[test]
    fn square_room() {
        let solver = Solver::new(&Config::preset(AnchorRegistry::new()));
        let anchors = [
            AnchorPosition::new(0.0, 0.0),
            AnchorPosition::new(10.0, 0.0),
            AnchorPosition::new(0.0, 10.0),
        ];

        for tag in [
            Position::new(5.0, 5.0),
            Position::new(1.0, 8.0),
            Position::new(9.0, 0.5),
            Position::new(3.3, 3.3),
        ] {
            let solution = solver
                .resolve(&ranges_to(&anchors, &tag))
                .unwrap_or_else(|e| panic!("failed to resolve {}: {}", tag, e));

            assert!(
                solution.position.distance(&tag) < 1.0E-3,
                "{} resolved as {}",
                tag,
                solution.position
            );
            assert!(solution.rms_residual_m < 1.0E-6);
            assert_eq!(solution.anchors, 3);
        }
    }

    #[test]
    fn non_finite_range() {
        let solver = Solver::new(&Config::default());
        let pairs = [
            (AnchorPosition::new(0.0, 0.0), 1.0),
            (AnchorPosition::new(10.0, 0.0), f64::NAN),
            (AnchorPosition::new(0.0, 10.0), 1.0),
        ];
        assert_eq!(solver.resolve(&pairs), Err(Error::NonFiniteInput));
        assert!(solver.solve(&pairs).is_none());
    }

    #[test]
    fn exhausted_iteration_budget() {
        let mut cfg = Config::default();
        cfg.solver.max_iterations = 1;

        let solver = Solver::new(&cfg);
        let anchors = [
            AnchorPosition::new(0.0, 0.0),
            AnchorPosition::new(10.0, 0.0),
            AnchorPosition::new(0.0, 10.0),
        ];

        // far from the centroid: a single iteration cannot settle
        let pairs = ranges_to(&anchors, &Position::new(9.0, 9.0));
        assert_eq!(solver.resolve(&pairs), Err(Error::NotConverged(1)));
    }
}
