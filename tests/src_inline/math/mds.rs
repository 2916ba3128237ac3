use super::*;

fn gap(a: [f64; 2], b: [f64; 2]) -> f64 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt()
}

#[test]
fn leading_distance_uses_largest_differences() {
    let a = [0.0, 0.0, 0.0];
    let b = [1.0, 2.0, 4.0];
    assert!((leading_distance(&a, &b, 1) - 4.0).abs() < 1e-12);
    let all = ((1.0 + 4.0 + 16.0) / 3.0f64).sqrt();
    assert!((leading_distance(&a, &b, 10) - all).abs() < 1e-12);
}

#[test]
fn identical_samples_collapse_to_origin() {
    let profiles = vec![vec![1.0, 2.0, 3.0]; 3];
    let coords = classical_mds(&profiles, 500);
    for c in coords {
        assert_eq!(c, [0.0, 0.0]);
    }
}

#[test]
fn single_sample_has_origin_coordinates() {
    assert_eq!(classical_mds(&[vec![1.0, 2.0]], 10), vec![[0.0, 0.0]]);
}

#[test]
fn collinear_profiles_preserve_distances() {
    let profiles = vec![vec![0.0], vec![1.0], vec![3.0]];
    let coords = classical_mds(&profiles, 1);
    assert!((gap(coords[0], coords[1]) - 1.0).abs() < 1e-6);
    assert!((gap(coords[1], coords[2]) - 2.0).abs() < 1e-6);
    assert!((gap(coords[0], coords[2]) - 3.0).abs() < 1e-6);
}

#[test]
fn distance_matrix_is_symmetric() {
    let profiles = vec![vec![0.0, 1.0], vec![2.0, 1.0], vec![0.0, 5.0]];
    let d = distance_matrix(&profiles, 2);
    for i in 0..3 {
        assert_eq!(d[i][i], 0.0);
        for j in 0..3 {
            assert_eq!(d[i][j], d[j][i]);
        }
    }
}
