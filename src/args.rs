use clap::{Parser};

use efc_lib::{EfcConfig, EfcResult};

/// Command line arguments for the `classify` and `energies` applications
///
/// Since both apps share most of their flags, this struct has been moved into a separate file
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub(crate) struct Args {
    /// training data: integer categories separated by commas or spaces, label in the last column
    #[clap(short, long)]
    pub train: String,
    /// data to be scored; when not given, a part of the training data is held out
    #[clap(short, long)]
    pub score: Option<String>,
    /// fraction of pseudocounts added to observed frequencies
    #[clap(short, long, default_value_t = 0.5)]
    pub pseudocounts: f64,
    /// quantile of training energies used as the energy cutoff
    #[clap(short = 'q', long, default_value_t = 0.95)]
    pub cutoff_quantile: f64,
    /// [classify only] fraction of the training data held out for scoring when no score file is given [default: 0.25]
    #[clap(long)]
    pub test_fraction: Option<f64>,
    /// [classify only] seed of the train / test split [default: 42]
    #[clap(long)]
    pub seed: Option<u64>,
    /// [classify only] class modelled in a binary problem; the smallest label by default,
    /// integer labels are compared as numbers
    #[clap(short, long)]
    pub base_class: Option<String>,
    /// [classify only] report samples above the energy cutoff of their best class as unknown
    #[clap(short, long)]
    pub unknown_class: bool,
}

impl Args {
    pub fn config(&self) -> EfcResult<EfcConfig> { EfcConfig::new(self.pseudocounts, self.cutoff_quantile) }

    /// Flags given on the command line that only the `classify` application uses
    pub fn classify_only_flags(&self) -> Vec<&'static str> {
        let mut flags = Vec::new();
        if self.test_fraction.is_some() { flags.push("--test-fraction"); }
        if self.seed.is_some() { flags.push("--seed"); }
        if self.base_class.is_some() { flags.push("--base-class"); }
        if self.unknown_class { flags.push("--unknown-class"); }
        flags
    }
}
