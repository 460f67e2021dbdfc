use ndarray::{Array1, ArrayView2};

use crate::coupling_energy::compute_energy;
use crate::couplings::{log_coupling, Couplings};
use crate::errors::{EfcError, EfcResult};
use crate::frequencies::{pair_freq, site_freq, PairFrequency, SiteFrequency};
use crate::local_fields::{log_local_fields, LocalFields};
use crate::pseudocounts::Pseudocounts;

/// Settings shared by every estimator of a classifier
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EfcConfig {
    /// weight of the pseudocounts added to empirical frequencies
    pub pseudocounts: Pseudocounts,
    /// quantile of the training energies used as the energy threshold
    pub cutoff_quantile: f64,
}

impl EfcConfig {
    /// Validated configuration; both values must lie in `(0, 1)`
    pub fn new(pseudocounts: f64, cutoff_quantile: f64) -> EfcResult<EfcConfig> {
        if !(cutoff_quantile > 0.0 && cutoff_quantile < 1.0) {
            return Err(EfcError::InvalidParameter(format!(
                "cutoff quantile must be in (0, 1), got {}", cutoff_quantile)));
        }
        Ok(EfcConfig { pseudocounts: Pseudocounts::new(pseudocounts)?, cutoff_quantile })
    }
}

impl Default for EfcConfig {
    fn default() -> Self { EfcConfig { pseudocounts: Pseudocounts::default(), cutoff_quantile: 0.95 } }
}

/// Potts model fitted to the instances of a single class.
///
/// Couplings and fields are kept as natural logarithms of the mean-field
/// estimates, so the energy of a sample is a plain sum of parameters.
/// They are computed directly in that domain and stay finite even when the
/// multiplicative couplings would not be representable.
#[derive(Clone, Debug)]
pub struct BaseEfc {
    max_bin: usize,
    config: EfcConfig,
    sitefreq: SiteFrequency,
    pairfreq: PairFrequency,
    cplngs: Couplings,
    fields: LocalFields,
    cutoff: f64,
}

impl BaseEfc {
    /// Fits a model to the rows of `x`, whose values must lie in `[0, max_bin)`
    pub fn fit(x: &ArrayView2<usize>, max_bin: usize, config: &EfcConfig) -> EfcResult<BaseEfc> {
        let psd = &config.pseudocounts;
        let sitefreq = site_freq(x, psd, max_bin)?;
        let pairfreq = pair_freq(x, &sitefreq.view(), psd, max_bin)?;
        // --- parameters are built in the log domain: exp(-inverse) under- or overflows for sparse data
        let cplngs = log_coupling(&sitefreq.view(), &pairfreq.view(), max_bin)?;
        let fields = log_local_fields(&sitefreq.view(), &pairfreq.view(), &cplngs, max_bin)?;
        debug!("log-couplings range from {:.4} to {:.4}", cplngs.min(), cplngs.max());

        let mut model = BaseEfc { max_bin, config: *config, sitefreq, pairfreq, cplngs, fields, cutoff: 0.0 };
        let train_energies = model.energies(x)?;
        model.cutoff = define_cutoff(&train_energies, config.cutoff_quantile);
        info!("fitted {} instances of {} attributes, max_bin {}, energy cutoff {:.4}",
              x.nrows(), x.ncols(), max_bin, model.cutoff);

        Ok(model)
    }

    /// Energy of every row of `x` under this model
    pub fn energies(&self, x: &ArrayView2<usize>) -> EfcResult<Array1<f64>> {
        compute_energy(&self.cplngs, &self.fields, x, self.max_bin)
    }

    pub fn max_bin(&self) -> usize { self.max_bin }

    pub fn config(&self) -> &EfcConfig { &self.config }

    pub fn n_attributes(&self) -> usize { self.sitefreq.nrows() }

    pub fn site_frequencies(&self) -> &SiteFrequency { &self.sitefreq }

    pub fn pair_frequencies(&self) -> &PairFrequency { &self.pairfreq }

    /// Log-domain coupling matrix
    pub fn couplings(&self) -> &Couplings { &self.cplngs }

    /// Log-domain local fields
    pub fn local_fields(&self) -> &LocalFields { &self.fields }

    /// Energy above which a sample is considered foreign to this model
    pub fn cutoff(&self) -> f64 { self.cutoff }
}

/// Picks the energy at the given quantile of the sorted training energies
fn define_cutoff(energies: &Array1<f64>, quantile: f64) -> f64 {
    let mut sorted = energies.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let idx = ((sorted.len() as f64 * quantile) as usize).min(sorted.len() - 1);
    sorted[idx]
}
