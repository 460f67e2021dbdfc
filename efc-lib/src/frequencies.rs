use ndarray::{Array2, Array4, ArrayView2};

use crate::errors::{EfcError, EfcResult};
use crate::pseudocounts::Pseudocounts;
use crate::validation::{check_categories, check_max_bin, check_site_shape};

/// Smoothed probability of each category at each attribute, shaped `(n_attributes, max_bin)`
pub type SiteFrequency = Array2<f64>;

/// Smoothed joint probability of category pairs, shaped `(n_attributes, max_bin, n_attributes, max_bin)`
pub type PairFrequency = Array4<f64>;

fn check_not_empty(x: &ArrayView2<usize>) -> EfcResult<()> {
    if x.nrows() == 0 || x.ncols() == 0 {
        return Err(EfcError::Shape(format!("categorical matrix {:?} has no data", x.dim())));
    }
    Ok(())
}

/// Counts how often each attribute takes each category.
///
/// The counts are normalized by the number of instances and mixed with
/// the uniform distribution according to `pseudocounts`, so every row of the
/// result sums up to 1.0.
pub fn site_freq(x: &ArrayView2<usize>, pseudocounts: &Pseudocounts, max_bin: usize) -> EfcResult<SiteFrequency> {
    check_max_bin(max_bin)?;
    check_not_empty(x)?;
    check_categories(x, max_bin)?;

    let (n_inst, n_attr) = x.dim();
    let mut sitefreq: SiteFrequency = Array2::zeros((n_attr, max_bin));
    for row in x.rows() {
        for (i, &a) in row.iter().enumerate() {
            sitefreq[[i, a]] += 1.0;
        }
    }
    let n = n_inst as f64;
    sitefreq.mapv_inplace(|cnt| pseudocounts.smooth_site(cnt / n, max_bin));

    Ok(sitefreq)
}

/// Counts how often each pair of attributes takes each pair of categories.
///
/// Every ordered attribute pair `(i, j)`, including `i == j`, is counted and
/// normalized by the number of instances. Pseudocounts are then mixed in with
/// the uniform distribution over `max_bin^2` category pairs, so a combination
/// that was never observed gets `pseudocounts / max_bin^2`.
///
/// Finally the diagonal blocks are overwritten with the site frequencies:
/// `pairfreq[i][a][i][a] = sitefreq[i][a]` and `pairfreq[i][a][i][b] = 0` for `a != b`,
/// since a variable can only co-occur with its own value.
///
/// The result holds `(n_attributes * max_bin)^2` values, which dominates the
/// memory footprint of a fit for wide datasets.
pub fn pair_freq(x: &ArrayView2<usize>, sitefreq: &ArrayView2<f64>, pseudocounts: &Pseudocounts,
                 max_bin: usize) -> EfcResult<PairFrequency> {
    check_max_bin(max_bin)?;
    check_not_empty(x)?;
    check_categories(x, max_bin)?;
    let (n_inst, n_attr) = x.dim();
    check_site_shape(sitefreq, n_attr, max_bin)?;

    debug!("allocating {} pair frequencies for {} attributes", n_attr * n_attr * max_bin * max_bin, n_attr);
    let mut pairfreq: PairFrequency = Array4::zeros((n_attr, max_bin, n_attr, max_bin));
    for row in x.rows() {
        // --- Count each pair coincidence, both orders and the self-pairs
        for (i, &ai) in row.iter().enumerate() {
            for (j, &aj) in row.iter().enumerate() {
                pairfreq[[i, ai, j, aj]] += 1.0;
            }
        }
    }
    let n = n_inst as f64;
    pairfreq.mapv_inplace(|cnt| pseudocounts.smooth_pair(cnt / n, max_bin));

    // ---------- self-pairs must agree with the site marginals
    for i in 0..n_attr {
        for a in 0..max_bin {
            for b in 0..max_bin {
                pairfreq[[i, a, i, b]] = if a == b { sitefreq[[i, a]] } else { 0.0 };
            }
        }
    }

    Ok(pairfreq)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn site_frequencies_are_smoothed_and_normalized() {
        let x = array![[0usize, 2], [0, 2], [1, 2], [0, 0]];
        let psd = Pseudocounts::new(0.3).unwrap();
        let sf = site_freq(&x.view(), &psd, 3).unwrap();
        assert_eq!(sf.dim(), (2, 3));
        assert_abs_diff_eq!(sf[[0, 0]], 0.7 * 0.75 + 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(sf[[0, 1]], 0.7 * 0.25 + 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(sf[[0, 2]], 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(sf[[1, 2]], 0.7 * 0.75 + 0.1, epsilon = 1e-12);
        for row in sf.rows() {
            assert_abs_diff_eq!(row.sum(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn balanced_binary_pairs_stay_at_one_quarter() {
        let x = array![[0usize, 0], [0, 1], [1, 0], [1, 1]];
        let psd = Pseudocounts::new(0.01).unwrap();
        let sf = Array2::from_elem((2, 2), 0.5);
        let pf = pair_freq(&x.view(), &sf.view(), &psd, 2).unwrap();
        for a in 0..2 {
            for b in 0..2 {
                assert_abs_diff_eq!(pf[[0, a, 1, b]], 0.99 * 0.25 + 0.01 / 4.0, epsilon = 1e-15);
                assert_abs_diff_eq!(pf[[0, a, 1, b]], 0.25, epsilon = 1e-12);
                assert_abs_diff_eq!(pf[[1, a, 0, b]], 0.25, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn diagonal_blocks_copy_site_frequencies() {
        let x = array![[0usize, 1, 2], [2, 1, 0], [1, 1, 1], [0, 0, 2]];
        let psd = Pseudocounts::new(0.2).unwrap();
        let sf = site_freq(&x.view(), &psd, 3).unwrap();
        let pf = pair_freq(&x.view(), &sf.view(), &psd, 3).unwrap();
        for i in 0..3 {
            for a in 0..3 {
                for b in 0..3 {
                    let expected = if a == b { sf[[i, a]] } else { 0.0 };
                    assert_eq!(pf[[i, a, i, b]], expected);
                }
            }
        }
    }

    #[test]
    fn unobserved_pairs_get_the_pseudocount_floor() {
        let x = array![[0usize, 0], [0, 0]];
        let psd = Pseudocounts::new(0.1).unwrap();
        let sf = site_freq(&x.view(), &psd, 2).unwrap();
        let pf = pair_freq(&x.view(), &sf.view(), &psd, 2).unwrap();
        assert_abs_diff_eq!(pf[[0, 1, 1, 1]], 0.025, epsilon = 1e-15);
        assert_abs_diff_eq!(pf[[0, 0, 1, 1]], 0.025, epsilon = 1e-15);
        assert_abs_diff_eq!(pf[[0, 0, 1, 0]], 0.9 + 0.025, epsilon = 1e-15);
    }

    #[test]
    fn mismatched_site_frequencies_are_rejected() {
        let x = array![[0usize, 1], [1, 0]];
        let psd = Pseudocounts::default();
        let sf = Array2::from_elem((3, 2), 0.5);
        assert!(matches!(pair_freq(&x.view(), &sf.view(), &psd, 2), Err(EfcError::Shape(_))));
    }

    #[test]
    fn category_beyond_max_bin_is_a_range_error() {
        let x = array![[0usize, 1], [1, 2]];
        let psd = Pseudocounts::default();
        assert!(matches!(site_freq(&x.view(), &psd, 2), Err(EfcError::Range { .. })));
    }

    #[test]
    fn empty_matrix_is_a_shape_error() {
        let x: Array2<usize> = Array2::zeros((0, 3));
        let psd = Pseudocounts::default();
        assert!(matches!(site_freq(&x.view(), &psd, 2), Err(EfcError::Shape(_))));
    }
}
