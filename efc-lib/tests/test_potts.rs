use approx::assert_abs_diff_eq;
use ndarray::{array, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use efc_lib::{compute_energy, coupling, local_fields, pair_freq, site_freq, Pseudocounts};

fn random_matrix(n_inst: usize, n_attr: usize, max_bin: usize, seed: u64) -> Array2<usize> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn((n_inst, n_attr), |_| rng.gen_range(0..max_bin))
}

#[test]
fn pair_frequencies_respect_floor_and_marginals() {
    let max_bin = 4;
    let x = random_matrix(60, 5, max_bin, 11);
    let psd = Pseudocounts::new(0.3).unwrap();
    let sf = site_freq(&x.view(), &psd, max_bin).unwrap();
    let pf = pair_freq(&x.view(), &sf.view(), &psd, max_bin).unwrap();
    let floor = psd.pair_floor(max_bin);

    for i in 0..5 {
        assert_abs_diff_eq!(sf.row(i).sum(), 1.0, epsilon = 1e-12);
        for a in 0..max_bin {
            for j in 0..5 {
                for b in 0..max_bin {
                    let v = pf[[i, a, j, b]];
                    if i == j {
                        assert_eq!(v, if a == b { sf[[i, a]] } else { 0.0 });
                    } else {
                        assert!(v >= floor - 1e-15 && v <= 1.0, "pairfreq[{}][{}][{}][{}] = {}", i, a, j, b, v);
                    }
                }
            }
        }
    }
}

#[test]
fn couplings_are_square_and_positive() {
    let max_bin = 3;
    let x = random_matrix(50, 4, max_bin, 5);
    let psd = Pseudocounts::new(0.5).unwrap();
    let sf = site_freq(&x.view(), &psd, max_bin).unwrap();
    let pf = pair_freq(&x.view(), &sf.view(), &psd, max_bin).unwrap();
    let cplngs = coupling(&sf.view(), &pf.view(), max_bin).unwrap();

    assert_eq!(cplngs.data.dim(), (4 * 2, 4 * 2));
    assert!(cplngs.data.iter().all(|&v| v > 0.0 && v.is_finite()));
    // --- the inverse of a symmetric matrix is symmetric
    for r in 0..8 {
        for c in 0..8 {
            assert_abs_diff_eq!(cplngs.data[[r, c]], cplngs.data[[c, r]], epsilon = 1e-8);
        }
    }

    let fields = local_fields(&sf.view(), &pf.view(), &cplngs, max_bin).unwrap();
    assert_eq!(fields.data.len(), 8);
    assert!(fields.data.iter().all(|&v| v > 0.0 && v.is_finite()));
}

#[test]
fn reference_sample_scores_zero_under_fitted_model() {
    let max_bin = 3;
    let x = random_matrix(40, 3, max_bin, 3);
    let psd = Pseudocounts::new(0.5).unwrap();
    let sf = site_freq(&x.view(), &psd, max_bin).unwrap();
    let pf = pair_freq(&x.view(), &sf.view(), &psd, max_bin).unwrap();
    let cplngs = coupling(&sf.view(), &pf.view(), max_bin).unwrap();
    let fields = local_fields(&sf.view(), &pf.view(), &cplngs, max_bin).unwrap();

    let samples = array![[2usize, 2, 2], [0, 1, 2]];
    let en = compute_energy(&cplngs, &fields, &samples.view(), max_bin).unwrap();
    assert_eq!(en[0], 0.0);
    let expected = -(cplngs.get(0, 0, 0, 0) + cplngs.get(0, 0, 1, 1) + fields.get(0, 0)
        + cplngs.get(1, 1, 1, 1) + fields.get(1, 1));
    assert_abs_diff_eq!(en[1], expected, epsilon = 1e-10);
}
