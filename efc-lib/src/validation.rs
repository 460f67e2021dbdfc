use ndarray::{ArrayView2, ArrayView4};

use crate::errors::{EfcError, EfcResult};

/// Checks that every value of a categorical matrix is a category index in `[0, max_bin)`
pub fn check_categories(x: &ArrayView2<usize>, max_bin: usize) -> EfcResult<()> {
    for ((row, col), &value) in x.indexed_iter() {
        if value >= max_bin {
            return Err(EfcError::Range { row, col, value, max_bin });
        }
    }
    Ok(())
}

/// A Potts model needs a reference category plus at least one free one
pub fn check_max_bin(max_bin: usize) -> EfcResult<()> {
    if max_bin < 2 {
        return Err(EfcError::InvalidParameter(format!("max_bin must be at least 2, got {}", max_bin)));
    }
    Ok(())
}

/// Site frequencies must be `(n_attributes, max_bin)`
pub fn check_site_shape(sitefreq: &ArrayView2<f64>, n_attributes: usize, max_bin: usize) -> EfcResult<()> {
    if sitefreq.dim() != (n_attributes, max_bin) {
        return Err(EfcError::Shape(format!(
            "site frequencies are {:?}, expected ({}, {})", sitefreq.dim(), n_attributes, max_bin)));
    }
    Ok(())
}

/// Pair frequencies must be `(n_attributes, max_bin, n_attributes, max_bin)`
pub fn check_pair_shape(pairfreq: &ArrayView4<f64>, n_attributes: usize, max_bin: usize) -> EfcResult<()> {
    let expected = (n_attributes, max_bin, n_attributes, max_bin);
    if pairfreq.dim() != expected {
        return Err(EfcError::Shape(format!(
            "pair frequencies are {:?}, expected {:?}", pairfreq.dim(), expected)));
    }
    Ok(())
}

/// A square parameter matrix over the free `(attribute, category)` states
pub fn check_square(dim: (usize, usize), size: usize, what: &str) -> EfcResult<()> {
    if dim != (size, size) {
        return Err(EfcError::Shape(format!("{} is {:?}, expected ({}, {})", what, dim, size, size)));
    }
    Ok(())
}
