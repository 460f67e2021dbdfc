use std::fmt;

use nalgebra::DMatrix;
use ndarray::{Array2, ArrayView2, ArrayView4};

use crate::errors::{EfcError, EfcResult};
use crate::validation::{check_max_bin, check_pair_shape, check_site_shape};

/// Pairwise interaction strengths between `(attribute, category)` states.
///
/// The last category of every attribute is the reference state and has no row
/// or column here, so the matrix is square of size `n_attributes * n_states`
/// where `n_states = max_bin - 1`. State `(i, a)` lives at `i * n_states + a`.
#[derive(Clone, Debug)]
pub struct Couplings {
    pub n_attributes: usize,
    pub n_states: usize,
    pub data: Array2<f64>,
}

impl Couplings {
    /// Creates an empty Couplings instance i.e. none of the states are coupled
    pub fn new(n_attributes: usize, n_states: usize) -> Couplings {
        let size: usize = n_attributes * n_states;
        Couplings { n_attributes, n_states, data: Array2::zeros((size, size)) }
    }

    /// Number of rows (and columns) of the coupling matrix
    pub fn size(&self) -> usize { self.n_attributes * self.n_states }

    /// Row of the `category` state of the `attribute`-th attribute
    pub fn index(&self, attribute: usize, category: usize) -> usize { attribute * self.n_states + category }

    /// Coupling between category `a` at attribute `i` and category `b` at attribute `j`
    pub fn get(&self, i: usize, a: usize, j: usize, b: usize) -> f64 {
        self.data[[self.index(i, a), self.index(j, b)]]
    }

    /// Find the minimum coupling value
    pub fn min(&self) -> f64 { self.data.iter().cloned().fold(f64::INFINITY, f64::min) }

    /// Find the maximum coupling value
    pub fn max(&self) -> f64 { self.data.iter().cloned().fold(f64::NEG_INFINITY, f64::max) }

    /// Natural logarithm of every coupling value
    pub fn ln(&self) -> Couplings {
        Couplings { n_attributes: self.n_attributes, n_states: self.n_states, data: self.data.mapv(f64::ln) }
    }
}

impl fmt::Display for Couplings {
    /// Creates a `String` representation of a given `Couplings`; blocks of a single attribute pair are separated
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for (i, row) in self.data.rows().into_iter().enumerate() {
            for (j, val) in row.iter().enumerate() {
                write!(f, "{:9.4} ", val)?;
                if j % self.n_states == (self.n_states - 1) { write!(f, "  ")?; }
            }
            writeln!(f)?;
            if i % self.n_states == (self.n_states - 1) { writeln!(f, "#")?; }
        }
        Ok(())
    }
}

/// Computes mean-field couplings from site and pair frequencies.
///
/// The couplings are the elementwise exponential of [`log_coupling()`]:
///
/// ```math
/// e^{-C^{-1}}
/// ```
///
/// Large inverse entries underflow to 0.0 or overflow to infinity here; callers
/// that need a finite parameterization should work with [`log_coupling()`].
pub fn coupling(sitefreq: &ArrayView2<f64>, pairfreq: &ArrayView4<f64>, max_bin: usize) -> EfcResult<Couplings> {
    let mut cplngs = log_coupling(sitefreq, pairfreq, max_bin)?;
    cplngs.data.mapv_inplace(f64::exp);
    Ok(cplngs)
}

/// Natural logarithm of the mean-field couplings, i.e. the negated inverse correlation matrix.
///
/// The connected correlation between states `(i, a)` and `(j, b)`,
/// `pairfreq[i][a][j][b] - sitefreq[i][a] * sitefreq[j][b]`, is collected for
/// all non-reference categories and inverted with a dense LU decomposition.
///
/// A singular correlation matrix, or one so ill-conditioned that its inverse
/// holds non-finite values, gives [`EfcError::Numerical`]; raising pseudocounts
/// usually helps.
pub fn log_coupling(sitefreq: &ArrayView2<f64>, pairfreq: &ArrayView4<f64>, max_bin: usize) -> EfcResult<Couplings> {
    check_max_bin(max_bin)?;
    let n_attr = sitefreq.nrows();
    check_site_shape(sitefreq, n_attr, max_bin)?;
    check_pair_shape(pairfreq, n_attr, max_bin)?;

    let n_states = max_bin - 1;
    let size = n_attr * n_states;
    debug!("inverting {}x{} correlation matrix", size, size);
    let correlation = DMatrix::from_fn(size, size, |r, c| {
        let (i, ai) = (r / n_states, r % n_states);
        let (j, aj) = (c / n_states, c % n_states);
        pairfreq[[i, ai, j, aj]] - sitefreq[[i, ai]] * sitefreq[[j, aj]]
    });
    let inverse = correlation.lu().try_inverse()
        .ok_or_else(|| EfcError::Numerical(format!("{}x{} correlation matrix is singular", size, size)))?;

    let mut cplngs = Couplings::new(n_attr, n_states);
    for ((r, c), v) in cplngs.data.indexed_iter_mut() {
        if !inverse[(r, c)].is_finite() {
            return Err(EfcError::Numerical(format!(
                "{}x{} correlation matrix is ill-conditioned: inverse entry ({}, {}) is {}", size, size, r, c, inverse[(r, c)])));
        }
        *v = -inverse[(r, c)];
    }

    Ok(cplngs)
}
