use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::couplings::Couplings;
use crate::errors::{EfcError, EfcResult};
use crate::local_fields::LocalFields;
use crate::validation::{check_categories, check_max_bin, check_square};

/// Potts Hamiltonian defined by a coupling matrix and local fields.
///
/// States in the reference category (`max_bin - 1`) contribute nothing.
pub struct CouplingEnergy<'a> {
    cplngs: &'a Couplings,
    fields: &'a LocalFields,
}

impl<'a> CouplingEnergy<'a> {
    /// Binds couplings and fields after checking they describe the same states
    pub fn new(cplngs: &'a Couplings, fields: &'a LocalFields) -> EfcResult<CouplingEnergy<'a>> {
        check_square(cplngs.data.dim(), cplngs.size(), "coupling matrix")?;
        if fields.data.len() != cplngs.size() || fields.n_states != cplngs.n_states {
            return Err(EfcError::Shape(format!(
                "{} local fields do not match a coupling matrix of size {}", fields.data.len(), cplngs.size())));
        }
        Ok(CouplingEnergy { cplngs, fields })
    }

    pub fn n_attributes(&self) -> usize { self.cplngs.n_attributes }

    /// Category index of the reference state
    pub fn reference(&self) -> usize { self.cplngs.n_states }

    /// Energy of a single sample; the sample is assumed to be validated.
    ///
    /// For every attribute `j` but the last, the couplings between `j` and every
    /// attribute `k >= j` (self-term included) are subtracted, followed by the
    /// field of `j`. The last attribute enters only through the couplings.
    pub fn energy(&self, sample: &ArrayView1<usize>) -> f64 {
        let reference = self.reference();
        let n = sample.len();
        let mut en: f64 = 0.0;
        for j in 0..n.saturating_sub(1) {
            let jv = sample[j];
            if jv == reference { continue; }
            let pos_j = self.cplngs.index(j, jv);
            for k in j..n {
                let kv = sample[k];
                if kv == reference { continue; }
                en -= self.cplngs.data[[pos_j, self.cplngs.index(k, kv)]];
            }
            en -= self.fields.data[pos_j];
        }
        en
    }
}

/// Scores every row of `x` with a Potts Hamiltonian; lower energy means a better fit to the model
pub fn compute_energy(cplngs: &Couplings, fields: &LocalFields, x: &ArrayView2<usize>,
                      max_bin: usize) -> EfcResult<Array1<f64>> {
    check_max_bin(max_bin)?;
    if cplngs.n_states != max_bin - 1 {
        return Err(EfcError::Shape(format!(
            "couplings have {} free states per attribute, max_bin {} needs {}", cplngs.n_states, max_bin, max_bin - 1)));
    }
    let energy = CouplingEnergy::new(cplngs, fields)?;
    if x.ncols() != energy.n_attributes() {
        return Err(EfcError::Shape(format!(
            "samples have {} attributes, the model has {}", x.ncols(), energy.n_attributes())));
    }
    check_categories(x, max_bin)?;

    Ok(x.rows().into_iter().map(|row| energy.energy(&row)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array2};

    fn toy_model() -> (Couplings, LocalFields) {
        // --- three binary attributes: a single free state each
        let cplngs = Couplings {
            n_attributes: 3,
            n_states: 1,
            data: array![[1.0, 2.0, 3.0], [2.0, 4.0, 5.0], [3.0, 5.0, 6.0]],
        };
        let fields = LocalFields { n_attributes: 3, n_states: 1, data: array![0.5, 0.25, 0.125] };
        (cplngs, fields)
    }

    #[test]
    fn reference_only_samples_have_zero_energy() {
        let (cplngs, fields) = toy_model();
        let x = array![[1usize, 1, 1], [1, 1, 1]];
        let en = compute_energy(&cplngs, &fields, &x.view(), 2).unwrap();
        assert_eq!(en, array![0.0, 0.0]);
    }

    #[test]
    fn energy_sums_upper_triangle_and_fields_of_all_but_last_attribute() {
        let (cplngs, fields) = toy_model();
        let x = array![[0usize, 0, 0], [0, 1, 0], [1, 0, 0], [1, 1, 0]];
        let en = compute_energy(&cplngs, &fields, &x.view(), 2).unwrap();
        // j=0: 1+2+3, h0; j=1: 4+5, h1; the field of the last attribute is never used
        assert_abs_diff_eq!(en[0], -(1.0 + 2.0 + 3.0 + 0.5 + 4.0 + 5.0 + 0.25), epsilon = 1e-12);
        assert_abs_diff_eq!(en[1], -(1.0 + 3.0 + 0.5), epsilon = 1e-12);
        assert_abs_diff_eq!(en[2], -(4.0 + 5.0 + 0.25), epsilon = 1e-12);
        // --- only the last attribute is set: it has no outer iteration
        assert_abs_diff_eq!(en[3], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn attribute_count_must_match_model() {
        let (cplngs, fields) = toy_model();
        let x = Array2::<usize>::zeros((2, 4));
        assert!(matches!(compute_energy(&cplngs, &fields, &x.view(), 2), Err(EfcError::Shape(_))));
    }

    #[test]
    fn max_bin_must_match_model() {
        let (cplngs, fields) = toy_model();
        let x = Array2::<usize>::zeros((2, 3));
        assert!(matches!(compute_energy(&cplngs, &fields, &x.view(), 3), Err(EfcError::Shape(_))));
    }

    #[test]
    fn unknown_category_is_a_range_error() {
        let (cplngs, fields) = toy_model();
        let x = array![[0usize, 2, 0]];
        assert!(matches!(compute_energy(&cplngs, &fields, &x.view(), 2), Err(EfcError::Range { .. })));
    }
}
