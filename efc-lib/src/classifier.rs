use std::fmt;

use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::base_efc::{BaseEfc, EfcConfig};
use crate::errors::{EfcError, EfcResult};

/// How the classes seen at fit are modelled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    /// Two classes; a single model describes the class at `base_class_idx`
    Binary { base_class_idx: usize },
    /// One model per class
    Multiclass,
}

/// Label assigned to a sample by [`EnergyBasedFlowClassifier::predict()`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PredictedClass<L> {
    Class(L),
    /// The sample lies above the energy cutoff of even its best matching class
    Unknown,
}

impl<L: fmt::Display> fmt::Display for PredictedClass<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictedClass::Class(label) => write!(f, "{}", label),
            PredictedClass::Unknown => write!(f, "unknown"),
        }
    }
}

/// Predicted labels together with the energy that decided each of them
#[derive(Clone, Debug)]
pub struct Prediction<L> {
    pub labels: Vec<PredictedClass<L>>,
    pub energies: Array1<f64>,
}

/// Energy-based Flow Classifier.
///
/// Each modelled class gets its own [`BaseEfc`]; a sample is assigned to the
/// class whose model gives it the lowest energy. With two classes only the
/// base class is modelled and its energy cutoff separates the two.
#[derive(Clone, Debug)]
pub struct EnergyBasedFlowClassifier<L> {
    config: EfcConfig,
    max_bin: usize,
    n_features: usize,
    classes: Vec<L>,
    target: Target,
    estimators: Vec<BaseEfc>,
}

impl<L: Ord + Clone + fmt::Debug> EnergyBasedFlowClassifier<L> {
    /// Fits the classifier to instances `x` labelled with `y`.
    ///
    /// `max_bin` is one more than the largest value in `x` (at least 2).
    /// `base_class` selects the modelled class of a binary problem and
    /// defaults to the smallest label; it is ignored for more classes.
    pub fn fit(x: &ArrayView2<usize>, y: &[L], base_class: Option<&L>, config: &EfcConfig) -> EfcResult<Self> {
        if x.nrows() != y.len() {
            return Err(EfcError::Shape(format!("{} instances but {} labels", x.nrows(), y.len())));
        }
        if x.nrows() == 0 || x.ncols() == 0 {
            return Err(EfcError::Shape(format!("training matrix {:?} has no data", x.dim())));
        }
        let max_bin = x.iter().max().map_or(2, |&m| (m + 1).max(2));

        let mut classes: Vec<L> = y.to_vec();
        classes.sort();
        classes.dedup();
        // --- every label is in classes, so the search never fails
        let y_idx: Vec<usize> = y.iter().map(|l| classes.binary_search(l).unwrap_or(0)).collect();
        let rows_of = |class_idx: usize| -> Array2<usize> {
            let rows: Vec<usize> = (0..y_idx.len()).filter(|&r| y_idx[r] == class_idx).collect();
            if rows.len() < 2 { warn!("class {:?} has only {} training instance(s)", classes[class_idx], rows.len()); }
            x.select(Axis(0), &rows)
        };

        let (target, estimators) = match classes.len() {
            0 | 1 => {
                return Err(EfcError::InvalidParameter(format!(
                    "at least two classes are needed, got {:?}", classes)));
            }
            2 => {
                let base_class_idx = match base_class {
                    None => 0,
                    Some(c) => classes.binary_search(c)
                        .map_err(|_| EfcError::UnknownClass(format!("{:?} not in {:?}", c, classes)))?,
                };
                let model = BaseEfc::fit(&rows_of(base_class_idx).view(), max_bin, config)?;
                (Target::Binary { base_class_idx }, vec![model])
            }
            _ => {
                let mut estimators = Vec::with_capacity(classes.len());
                for class_idx in 0..classes.len() {
                    debug!("fitting class {:?}", classes[class_idx]);
                    estimators.push(BaseEfc::fit(&rows_of(class_idx).view(), max_bin, config)?);
                }
                (Target::Multiclass, estimators)
            }
        };
        info!("classifier fitted: {} classes, {} features, max_bin {}", classes.len(), x.ncols(), max_bin);

        Ok(EnergyBasedFlowClassifier { config: *config, max_bin, n_features: x.ncols(), classes, target, estimators })
    }

    /// Classifies the rows of `x`.
    ///
    /// Binary problems assign the base class below its energy cutoff and the
    /// other class otherwise. Multiclass problems assign the class with the lowest
    /// energy (the first one on ties); when `unknown_class` is set, a sample above
    /// the cutoff of that class is reported as [`PredictedClass::Unknown`].
    pub fn predict(&self, x: &ArrayView2<usize>, unknown_class: bool) -> EfcResult<Prediction<L>> {
        if x.ncols() != self.n_features {
            return Err(EfcError::Shape(format!(
                "{} features in predict, {} in fit", x.ncols(), self.n_features)));
        }
        let energies: Vec<Array1<f64>> = self.estimators.iter()
            .map(|e| e.energies(x))
            .collect::<EfcResult<_>>()?;

        let n = x.nrows();
        let mut labels = Vec::with_capacity(n);
        let mut y_energies = Array1::zeros(n);
        match self.target {
            Target::Binary { base_class_idx } => {
                let base = &self.estimators[0];
                for row in 0..n {
                    let en = energies[0][row];
                    y_energies[row] = en;
                    let idx = if en < base.cutoff() { base_class_idx } else { 1 - base_class_idx };
                    labels.push(PredictedClass::Class(self.classes[idx].clone()));
                }
            }
            Target::Multiclass => {
                for row in 0..n {
                    let mut best = 0;
                    for class_idx in 1..energies.len() {
                        if energies[class_idx][row] < energies[best][row] { best = class_idx; }
                    }
                    let en = energies[best][row];
                    y_energies[row] = en;
                    if unknown_class && en > self.estimators[best].cutoff() {
                        labels.push(PredictedClass::Unknown);
                    } else {
                        labels.push(PredictedClass::Class(self.classes[best].clone()));
                    }
                }
            }
        }

        Ok(Prediction { labels, energies: y_energies })
    }

    /// Sorted distinct labels seen at fit
    pub fn classes(&self) -> &[L] { &self.classes }

    pub fn target(&self) -> Target { self.target }

    pub fn max_bin(&self) -> usize { self.max_bin }

    pub fn n_features(&self) -> usize { self.n_features }

    pub fn config(&self) -> &EfcConfig { &self.config }

    /// Fitted per-class models; a binary problem has only the base class model
    pub fn estimators(&self) -> &[BaseEfc] { &self.estimators }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn labels_must_match_instances() {
        let x = array![[0usize, 1], [1, 0]];
        let y = vec![0, 1, 1];
        let r = EnergyBasedFlowClassifier::fit(&x.view(), &y, None, &EfcConfig::default());
        assert!(matches!(r, Err(EfcError::Shape(_))));
    }

    #[test]
    fn single_class_is_rejected() {
        let x = array![[0usize, 1], [1, 0]];
        let y = vec!["a", "a"];
        let r = EnergyBasedFlowClassifier::fit(&x.view(), &y, None, &EfcConfig::default());
        assert!(matches!(r, Err(EfcError::InvalidParameter(_))));
    }

    #[test]
    fn base_class_must_be_known() {
        let x = array![[0usize, 1], [1, 0], [1, 1], [0, 0]];
        let y = vec!["a", "b", "a", "b"];
        let r = EnergyBasedFlowClassifier::fit(&x.view(), &y, Some(&"c"), &EfcConfig::default());
        assert!(matches!(r, Err(EfcError::UnknownClass(_))));
    }

    #[test]
    fn feature_count_is_checked_at_predict() {
        let x = array![[0usize, 1], [1, 0], [1, 1], [0, 0]];
        let y = vec![1, 2, 1, 2];
        let clf = EnergyBasedFlowClassifier::fit(&x.view(), &y, None, &EfcConfig::default()).unwrap();
        assert_eq!(clf.target(), Target::Binary { base_class_idx: 0 });
        assert_eq!(clf.estimators().len(), 1);
        let wide = array![[0usize, 1, 0]];
        assert!(matches!(clf.predict(&wide.view(), false), Err(EfcError::Shape(_))));
    }

    #[test]
    fn unknown_prints_as_unknown() {
        assert_eq!(format!("{}", PredictedClass::<u8>::Unknown), "unknown");
        assert_eq!(format!("{}", PredictedClass::Class(7)), "7");
    }
}
