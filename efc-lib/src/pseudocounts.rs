use crate::errors::{EfcError, EfcResult};

/// Weight of the uniform pseudocounts mixed into empirical frequencies.
///
/// An observed frequency `f` of one of `q` equally likely outcomes becomes
/// `(1 - w) * f + w / q`, so no outcome is ever assigned a zero probability.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pseudocounts {
    pseudo_fraction: f64,
}

impl Pseudocounts {
    /// Creates a new pseudocount weight; it must lie in the open interval `(0, 1)`
    pub fn new(pseudo_fraction: f64) -> EfcResult<Pseudocounts> {
        if !(pseudo_fraction > 0.0 && pseudo_fraction < 1.0) {
            return Err(EfcError::InvalidParameter(format!(
                "pseudocounts must be in (0, 1), got {}", pseudo_fraction)));
        }
        Ok(Pseudocounts { pseudo_fraction })
    }

    pub fn pseudo_fraction(&self) -> f64 { self.pseudo_fraction }

    /// Smallest probability a single-site frequency may take
    pub fn site_floor(&self, max_bin: usize) -> f64 { self.pseudo_fraction / max_bin as f64 }

    /// Smallest probability an off-diagonal pair frequency may take
    pub fn pair_floor(&self, max_bin: usize) -> f64 {
        self.pseudo_fraction / (max_bin * max_bin) as f64
    }

    /// Mixes an observed single-site frequency with the uniform distribution over `max_bin` categories
    pub fn smooth_site(&self, freq: f64, max_bin: usize) -> f64 {
        (1.0 - self.pseudo_fraction) * freq + self.site_floor(max_bin)
    }

    /// Mixes an observed pair frequency with the uniform distribution over `max_bin^2` category pairs
    pub fn smooth_pair(&self, freq: f64, max_bin: usize) -> f64 {
        (1.0 - self.pseudo_fraction) * freq + self.pair_floor(max_bin)
    }
}

impl Default for Pseudocounts {
    fn default() -> Self { Pseudocounts { pseudo_fraction: 0.5 } }
}
