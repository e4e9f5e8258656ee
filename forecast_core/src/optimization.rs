//! Bounded Nelder-Mead simplex minimisation used for coefficient estimation

use std::cmp::Ordering;

/// Outcome of a minimisation run
#[derive(Debug, Clone)]
pub struct Minimum {
    /// Best point found
    pub point: Vec<f64>,
    /// Objective value at `point`
    pub value: f64,
    /// Iterations performed
    pub iterations: usize,
    /// Whether a convergence criterion was met before the budget ran out
    pub converged: bool,
}

/// Settings of the simplex search
#[derive(Debug, Clone)]
pub struct SimplexConfig {
    pub max_iter: usize,
    /// Spread of objective values, relative to the best value, that counts as converged
    pub tolerance: f64,
    /// Reflection coefficient
    pub alpha: f64,
    /// Expansion coefficient
    pub gamma: f64,
    /// Contraction coefficient
    pub rho: f64,
    /// Shrink coefficient
    pub sigma: f64,
    /// Relative size of the initial simplex
    pub initial_step: f64,
}

impl Default for SimplexConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-8,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
            initial_step: 0.05,
        }
    }
}

/// Minimise `objective` starting from `initial`, keeping every coordinate
/// inside its `(min, max)` bound.
///
/// Non-finite objective values are treated as worse than any finite value.
pub fn minimize<F>(
    objective: F,
    initial: &[f64],
    bounds: &[(f64, f64)],
    config: &SimplexConfig,
) -> Minimum
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    let eval = |point: &[f64]| {
        let value = objective(point);
        if value.is_finite() {
            value
        } else {
            f64::INFINITY
        }
    };

    if n == 0 {
        return Minimum {
            point: vec![],
            value: eval(&[]),
            iterations: 0,
            converged: true,
        };
    }

    let start = clamp(initial, bounds);
    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    simplex.push(start.clone());
    for i in 0..n {
        let mut vertex = start.clone();
        let step = if vertex[i].abs() > 1e-10 {
            config.initial_step * vertex[i].abs()
        } else {
            config.initial_step
        };
        vertex[i] += step;
        // Step back inwards when the bound swallowed the step
        if clamp(&vertex, bounds)[i] == start[i] {
            vertex[i] = start[i] - step;
        }
        simplex.push(clamp(&vertex, bounds));
    }
    let mut values: Vec<f64> = simplex.iter().map(|v| eval(v)).collect();

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        let mut order: Vec<usize> = (0..=n).collect();
        order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));
        let best = order[0];
        let worst = order[n];
        let second_worst = order[n - 1];

        let spread = values[worst] - values[best];
        if spread.is_finite() && spread <= config.tolerance * values[best].abs().max(1.0) {
            converged = true;
            break;
        }

        let centroid = centroid(&simplex, worst);
        let size = simplex
            .iter()
            .map(|v| distance(v, &centroid))
            .fold(0.0, f64::max);
        if size <= config.tolerance * norm(&centroid).max(1.0) && values[best].is_finite() {
            converged = true;
            break;
        }

        iterations += 1;

        let reflected = clamp(&towards(&centroid, &simplex[worst], -config.alpha), bounds);
        let reflected_value = eval(&reflected);

        if reflected_value < values[best] {
            let expanded = clamp(&towards(&centroid, &reflected, config.gamma), bounds);
            let expanded_value = eval(&expanded);
            if expanded_value < reflected_value {
                simplex[worst] = expanded;
                values[worst] = expanded_value;
            } else {
                simplex[worst] = reflected;
                values[worst] = reflected_value;
            }
            continue;
        }

        if reflected_value < values[second_worst] {
            simplex[worst] = reflected;
            values[worst] = reflected_value;
            continue;
        }

        let (contracted, threshold) = if reflected_value < values[worst] {
            (towards(&centroid, &reflected, config.rho), reflected_value)
        } else {
            (towards(&centroid, &simplex[worst], config.rho), values[worst])
        };
        let contracted = clamp(&contracted, bounds);
        let contracted_value = eval(&contracted);
        if contracted_value < threshold {
            simplex[worst] = contracted;
            values[worst] = contracted_value;
            continue;
        }

        let anchor = simplex[best].clone();
        for i in 0..=n {
            if i == best {
                continue;
            }
            let shrunk = towards(&anchor, &simplex[i], config.sigma);
            simplex[i] = clamp(&shrunk, bounds);
            values[i] = eval(&simplex[i]);
        }
    }

    let best = (0..=n)
        .min_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal))
        .unwrap_or(0);

    Minimum {
        point: simplex[best].clone(),
        value: values[best],
        iterations,
        converged,
    }
}

/// `origin + factor * (point - origin)`
fn towards(origin: &[f64], point: &[f64], factor: f64) -> Vec<f64> {
    origin
        .iter()
        .zip(point)
        .map(|(o, p)| o + factor * (p - o))
        .collect()
}

fn centroid(simplex: &[Vec<f64>], exclude: usize) -> Vec<f64> {
    let n = simplex[0].len();
    let count = (simplex.len() - 1) as f64;
    let mut centroid = vec![0.0; n];
    for (i, vertex) in simplex.iter().enumerate() {
        if i == exclude {
            continue;
        }
        for (c, v) in centroid.iter_mut().zip(vertex) {
            *c += v;
        }
    }
    centroid.iter_mut().for_each(|c| *c /= count);
    centroid
}

fn clamp(point: &[f64], bounds: &[(f64, f64)]) -> Vec<f64> {
    point
        .iter()
        .enumerate()
        .map(|(i, &x)| match bounds.get(i) {
            Some(&(lo, hi)) => x.clamp(lo, hi),
            None => x,
        })
        .collect()
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

fn norm(a: &[f64]) -> f64 {
    a.iter().map(|x| x * x).sum::<f64>().sqrt()
}
