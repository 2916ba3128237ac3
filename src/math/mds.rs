//! Classical multidimensional scaling over lcpm profiles.
//!
//! Pairwise distance follows the limma `plotMDS` convention: the root mean square of the
//! `top` largest squared per-gene differences between two samples.

const MAX_ITER: usize = 1000;
const TOL: f64 = 1e-12;

pub fn leading_distance(a: &[f64], b: &[f64], top: usize) -> f64 {
    let mut sq: Vec<f64> = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .collect();
    if sq.is_empty() {
        return 0.0;
    }
    let k = top.clamp(1, sq.len());
    sq.sort_by(|x, y| y.partial_cmp(x).unwrap_or(std::cmp::Ordering::Equal));
    (sq[..k].iter().sum::<f64>() / k as f64).sqrt()
}

pub fn distance_matrix(profiles: &[Vec<f64>], top: usize) -> Vec<Vec<f64>> {
    let n = profiles.len();
    let mut d = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let v = leading_distance(&profiles[i], &profiles[j], top);
            d[i][j] = v;
            d[j][i] = v;
        }
    }
    d
}

/// Two-dimensional coordinates for each profile.
pub fn classical_mds(profiles: &[Vec<f64>], top: usize) -> Vec<[f64; 2]> {
    let n = profiles.len();
    if n < 2 {
        return vec![[0.0, 0.0]; n];
    }
    let d = distance_matrix(profiles, top);
    let mut b = double_center(&d);

    let mut coords = vec![[0.0, 0.0]; n];
    for dim in 0..2 {
        let Some((lambda, v)) = top_eigen(&b) else {
            break;
        };
        let scale = if lambda > 0.0 { lambda.sqrt() } else { 0.0 };
        for i in 0..n {
            coords[i][dim] = v[i] * scale;
        }
        for i in 0..n {
            for j in 0..n {
                b[i][j] -= lambda * v[i] * v[j];
            }
        }
    }
    coords
}

fn double_center(d: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = d.len();
    let sq: Vec<Vec<f64>> = d
        .iter()
        .map(|row| row.iter().map(|v| v * v).collect())
        .collect();
    let row_mean: Vec<f64> = sq.iter().map(|r| r.iter().sum::<f64>() / n as f64).collect();
    let grand = row_mean.iter().sum::<f64>() / n as f64;

    let mut b = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..n {
            b[i][j] = -0.5 * (sq[i][j] - row_mean[i] - row_mean[j] + grand);
        }
    }
    b
}

/// Largest algebraic eigenpair of a symmetric matrix by shifted power iteration.
fn top_eigen(m: &[Vec<f64>]) -> Option<(f64, Vec<f64>)> {
    let n = m.len();
    let shift = m
        .iter()
        .map(|row| row.iter().map(|v| v.abs()).sum::<f64>())
        .fold(0.0, f64::max);
    if shift <= TOL {
        return None;
    }

    let mut v: Vec<f64> = (0..n).map(|i| 1.0 + i as f64 / n as f64).collect();
    normalize(&mut v)?;

    for _ in 0..MAX_ITER {
        let mut next = mat_vec(m, &v);
        for (x, vi) in next.iter_mut().zip(v.iter()) {
            *x += shift * vi;
        }
        normalize(&mut next)?;
        let delta: f64 = next
            .iter()
            .zip(v.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        v = next;
        if delta < 1e-10 {
            break;
        }
    }

    let mv = mat_vec(m, &v);
    let lambda: f64 = mv.iter().zip(v.iter()).map(|(a, b)| a * b).sum();
    Some((lambda, v))
}

fn mat_vec(m: &[Vec<f64>], v: &[f64]) -> Vec<f64> {
    m.iter()
        .map(|row| row.iter().zip(v.iter()).map(|(a, b)| a * b).sum())
        .collect()
}

fn normalize(v: &mut [f64]) -> Option<()> {
    let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm <= TOL {
        return None;
    }
    for x in v.iter_mut() {
        *x /= norm;
    }
    Some(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/math/mds.rs"]
mod tests;
