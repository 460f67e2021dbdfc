//! Potts model (mean-field Direct Coupling Analysis) over categorical data
//! and the Energy-based Flow Classifier built on top of it.
//!
//! A model is fitted in four steps, each of them available on its own:
//! [`site_freq()`] and [`pair_freq()`] count smoothed frequencies, [`coupling()`]
//! inverts the connected correlation matrix, [`local_fields()`] derives the
//! fields and [`compute_energy()`] scores samples.
//!
//! Pair frequencies take `(n_attributes * max_bin)^2` values and the coupling
//! matrix `(n_attributes * (max_bin - 1))^2`; both grow quickly for wide data.

#[macro_use]
extern crate log;

mod base_efc;
mod classifier;
mod coupling_energy;
mod couplings;
mod dataset;
mod errors;
mod frequencies;
mod local_fields;
mod pseudocounts;
mod validation;

pub use base_efc::{BaseEfc, EfcConfig};
pub use classifier::{EnergyBasedFlowClassifier, PredictedClass, Prediction, Target};
pub use coupling_energy::{compute_energy, CouplingEnergy};
pub use couplings::{coupling, log_coupling, Couplings};
pub use dataset::Dataset;
pub use errors::{EfcError, EfcResult};
pub use frequencies::{pair_freq, site_freq, PairFrequency, SiteFrequency};
pub use local_fields::{local_fields, log_local_fields, LocalFields};
pub use pseudocounts::Pseudocounts;
pub use validation::check_categories;
