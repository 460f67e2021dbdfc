use ndarray::{Array1, ArrayView2, ArrayView4};

use crate::couplings::Couplings;
use crate::errors::EfcResult;
use crate::validation::{check_max_bin, check_pair_shape, check_site_shape, check_square};

/// Bias of every non-reference `(attribute, category)` state, indexed like [`Couplings`]
#[derive(Clone, Debug)]
pub struct LocalFields {
    pub n_attributes: usize,
    pub n_states: usize,
    pub data: Array1<f64>,
}

impl LocalFields {
    pub fn get(&self, attribute: usize, category: usize) -> f64 {
        self.data[attribute * self.n_states + category]
    }

    /// Natural logarithm of every field value
    pub fn ln(&self) -> LocalFields {
        LocalFields { n_attributes: self.n_attributes, n_states: self.n_states, data: self.data.mapv(f64::ln) }
    }
}

fn check_inputs(sitefreq: &ArrayView2<f64>, pairfreq: &ArrayView4<f64>, cplngs: &Couplings,
                max_bin: usize) -> EfcResult<usize> {
    check_max_bin(max_bin)?;
    let n_attr = sitefreq.nrows();
    check_site_shape(sitefreq, n_attr, max_bin)?;
    check_pair_shape(pairfreq, n_attr, max_bin)?;
    check_square(cplngs.data.dim(), n_attr * (max_bin - 1), "coupling matrix")?;
    Ok(n_attr)
}

/// Infers local fields from site frequencies and multiplicative couplings.
///
/// The field of state `(i, a)` starts as the odds of `a` against the reference
/// category of attribute `i`, and is divided by `coupling[(i,a),(j,b)] ^ sitefreq[j][b]`
/// for every non-reference state `(j, b)` of every attribute `j`, `i` included.
///
/// Pair frequencies are only checked for shape; the mean-field fields depend
/// on them through the couplings.
pub fn local_fields(sitefreq: &ArrayView2<f64>, pairfreq: &ArrayView4<f64>, cplngs: &Couplings,
                    max_bin: usize) -> EfcResult<LocalFields> {
    let n_attr = check_inputs(sitefreq, pairfreq, cplngs, max_bin)?;
    let n_states = max_bin - 1;

    let mut fields = Array1::zeros(n_attr * n_states);
    for i in 0..n_attr {
        for ai in 0..n_states {
            let mut h = sitefreq[[i, ai]] / sitefreq[[i, n_states]];
            for j in 0..n_attr {
                for aj in 0..n_states {
                    h /= cplngs.get(i, ai, j, aj).powf(sitefreq[[j, aj]]);
                }
            }
            fields[i * n_states + ai] = h;
        }
    }

    Ok(LocalFields { n_attributes: n_attr, n_states, data: fields })
}

/// Natural logarithm of [`local_fields()`], computed from log-domain couplings.
///
/// `ln h = ln(sitefreq[i][a] / sitefreq[i][ref]) - sum over (j, b) of sitefreq[j][b] * ln coupling[(i,a),(j,b)]`,
/// which stays finite where the multiplicative form would underflow.
pub fn log_local_fields(sitefreq: &ArrayView2<f64>, pairfreq: &ArrayView4<f64>, log_cplngs: &Couplings,
                        max_bin: usize) -> EfcResult<LocalFields> {
    let n_attr = check_inputs(sitefreq, pairfreq, log_cplngs, max_bin)?;
    let n_states = max_bin - 1;

    let mut fields = Array1::zeros(n_attr * n_states);
    for i in 0..n_attr {
        for ai in 0..n_states {
            let mut h = (sitefreq[[i, ai]] / sitefreq[[i, n_states]]).ln();
            for j in 0..n_attr {
                for aj in 0..n_states {
                    h -= sitefreq[[j, aj]] * log_cplngs.get(i, ai, j, aj);
                }
            }
            fields[i * n_states + ai] = h;
        }
    }

    Ok(LocalFields { n_attributes: n_attr, n_states, data: fields })
}
