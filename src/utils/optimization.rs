//! Bounded Nelder-Mead minimization for parameter estimation.

use std::cmp::Ordering;
use std::time::{Duration, Instant};

/// Result of Nelder-Mead optimization.
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// The optimal point found.
    pub optimal_point: Vec<f64>,
    /// The objective function value at the optimal point.
    pub optimal_value: f64,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether the simplex settled within tolerance.
    pub converged: bool,
    /// Whether the wall-clock budget ran out first.
    pub timed_out: bool,
}

/// Configuration for Nelder-Mead optimization.
#[derive(Debug, Clone)]
pub struct NelderMeadConfig {
    /// Maximum number of iterations.
    pub max_iter: usize,
    /// Convergence tolerance on the spread of objective values.
    pub tolerance: f64,
    /// Convergence tolerance on the simplex radius around its centroid.
    pub point_tolerance: f64,
    /// Reflection coefficient (default: 1.0).
    pub alpha: f64,
    /// Expansion coefficient (default: 2.0).
    pub gamma: f64,
    /// Contraction coefficient (default: 0.5).
    pub rho: f64,
    /// Shrinkage coefficient (default: 0.5).
    pub sigma: f64,
    /// Initial simplex step size (default: 0.05).
    pub initial_step: f64,
    /// Optional wall-clock budget for the whole run.
    pub max_duration: Option<Duration>,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-8,
            point_tolerance: 1e-6,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
            initial_step: 0.05,
            max_duration: None,
        }
    }
}

struct Simplex<'a, F> {
    vertices: Vec<Vec<f64>>,
    values: Vec<f64>,
    objective: F,
    bounds: Option<&'a [(f64, f64)]>,
}

impl<'a, F> Simplex<'a, F>
where
    F: Fn(&[f64]) -> f64,
{
    fn new(objective: F, initial: &[f64], bounds: Option<&'a [(f64, f64)]>, step: f64) -> Self {
        let mut vertices = Vec::with_capacity(initial.len() + 1);
        vertices.push(clamp_to_bounds(initial.to_vec(), bounds));
        for i in 0..initial.len() {
            let mut vertex = initial.to_vec();
            vertex[i] += if initial[i].abs() > 1e-10 {
                step * initial[i].abs()
            } else {
                step
            };
            vertices.push(clamp_to_bounds(vertex, bounds));
        }

        let values = vertices.iter().map(|v| finite_or_inf(objective(v))).collect();
        Self {
            vertices,
            values,
            objective,
            bounds,
        }
    }

    fn eval(&self, point: Vec<f64>) -> (Vec<f64>, f64) {
        let point = clamp_to_bounds(point, self.bounds);
        let value = finite_or_inf((self.objective)(&point));
        (point, value)
    }

    /// Vertex indices ordered from best to worst.
    fn ranking(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.vertices.len()).collect();
        order.sort_by(|&a, &b| {
            self.values[a]
                .partial_cmp(&self.values[b])
                .unwrap_or(Ordering::Equal)
        });
        order
    }

    fn centroid_without(&self, excluded: usize) -> Vec<f64> {
        let dim = self.vertices[0].len();
        let mut centroid = vec![0.0; dim];
        for (i, vertex) in self.vertices.iter().enumerate() {
            if i == excluded {
                continue;
            }
            for (c, x) in centroid.iter_mut().zip(vertex) {
                *c += x;
            }
        }
        let count = (self.vertices.len() - 1) as f64;
        centroid.iter_mut().for_each(|c| *c /= count);
        centroid
    }

    fn replace(&mut self, index: usize, (point, value): (Vec<f64>, f64)) {
        self.vertices[index] = point;
        self.values[index] = value;
    }

    fn shrink_towards(&mut self, best: usize, sigma: f64) {
        let anchor = self.vertices[best].clone();
        for i in 0..self.vertices.len() {
            if i == best {
                continue;
            }
            let moved = affine(&anchor, &self.vertices[i], sigma);
            let evaluated = self.eval(moved);
            self.replace(i, evaluated);
        }
    }

    fn diameter_around(&self, centre: &[f64]) -> f64 {
        self.vertices
            .iter()
            .map(|v| {
                v.iter()
                    .zip(centre)
                    .map(|(a, b)| (a - b).powi(2))
                    .sum::<f64>()
                    .sqrt()
            })
            .fold(0.0, f64::max)
    }
}

/// Perform Nelder-Mead simplex optimization.
///
/// Non-finite objective values are treated as `+inf`, so regions where the
/// objective blows up are simply rejected by the simplex.
///
/// # Example
/// ```
/// use imbalance_forecast::utils::optimization::{nelder_mead, NelderMeadConfig};
///
/// // Minimize (x-2)^2 + (y-3)^2
/// let result = nelder_mead(
///     |x| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2),
///     &[0.0, 0.0],
///     None,
///     NelderMeadConfig::default(),
/// );
///
/// assert!(result.converged);
/// assert!((result.optimal_point[0] - 2.0).abs() < 0.01);
/// assert!((result.optimal_point[1] - 3.0).abs() < 0.01);
/// ```
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: NelderMeadConfig,
) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    if initial.is_empty() {
        return NelderMeadResult {
            optimal_point: vec![],
            optimal_value: f64::NAN,
            iterations: 0,
            converged: false,
            timed_out: false,
        };
    }

    let started = Instant::now();
    let mut simplex = Simplex::new(objective, initial, bounds, config.initial_step);
    let last = initial.len();

    let mut iterations = 0;
    let mut converged = false;
    let mut timed_out = false;

    while iterations < config.max_iter {
        if let Some(budget) = config.max_duration {
            if started.elapsed() > budget {
                timed_out = true;
                break;
            }
        }
        iterations += 1;

        let order = simplex.ranking();
        let (best, second_worst, worst) = (order[0], order[last - 1], order[last]);

        // Both the values and the vertices must have settled; equal values
        // alone can straddle the minimum.
        let centroid = simplex.centroid_without(worst);
        if simplex.values[worst] - simplex.values[best] < config.tolerance
            && simplex.diameter_around(&centroid) < config.point_tolerance
        {
            converged = true;
            break;
        }

        let reflected = simplex.eval(affine(&centroid, &simplex.vertices[worst], -config.alpha));

        if reflected.1 < simplex.values[best] {
            let expanded = simplex.eval(affine(&centroid, &reflected.0, config.gamma));
            let chosen = if expanded.1 < reflected.1 {
                expanded
            } else {
                reflected
            };
            simplex.replace(worst, chosen);
            continue;
        }

        if reflected.1 < simplex.values[second_worst] {
            simplex.replace(worst, reflected);
            continue;
        }

        let contracted = if reflected.1 < simplex.values[worst] {
            let outside = simplex.eval(affine(&centroid, &reflected.0, config.rho));
            (outside.1 <= reflected.1).then_some(outside)
        } else {
            let inside = simplex.eval(affine(&centroid, &simplex.vertices[worst], config.rho));
            (inside.1 < simplex.values[worst]).then_some(inside)
        };

        match contracted {
            Some(point) => simplex.replace(worst, point),
            None => simplex.shrink_towards(best, config.sigma),
        }
    }

    let best = simplex.ranking()[0];
    NelderMeadResult {
        optimal_point: simplex.vertices[best].clone(),
        optimal_value: simplex.values[best],
        iterations,
        converged,
        timed_out,
    }
}

/// `origin + t * (target - origin)`.
fn affine(origin: &[f64], target: &[f64], t: f64) -> Vec<f64> {
    origin
        .iter()
        .zip(target)
        .map(|(o, p)| o + t * (p - o))
        .collect()
}

fn clamp_to_bounds(mut point: Vec<f64>, bounds: Option<&[(f64, f64)]>) -> Vec<f64> {
    if let Some(bounds) = bounds {
        for (x, (lo, hi)) in point.iter_mut().zip(bounds) {
            *x = x.clamp(*lo, *hi);
        }
    }
    point
}

fn finite_or_inf(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        f64::INFINITY
    }
}
