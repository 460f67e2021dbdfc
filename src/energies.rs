mod args;

use std::env;
use std::process;

use clap::Parser;

#[macro_use]
extern crate log;

use efc_lib::{BaseEfc, Dataset, EfcError, EfcResult};

use args::Args;

/// Fits a single Potts model to every training row, labels are ignored
fn run(args: &Args) -> EfcResult<()> {
    let config = args.config()?;
    for flag in args.classify_only_flags() {
        warn!("{} is used only by classify; ignored", flag);
    }

    let train = Dataset::from_file(&args.train)?;
    let scored = match &args.score {
        Some(fname) => Dataset::from_file(fname)?,
        None => train.clone(),
    };
    if train.is_empty() {
        return Err(EfcError::Shape(format!("no instances in {}", &args.train)));
    }
    // --- scored data may use categories unseen in training; they are rejected when scoring
    let max_bin = train.features.iter().max().map_or(2, |&m| (m + 1).max(2));
    let model = BaseEfc::fit(&train.features.view(), max_bin, &config)?;

    // ---------- Print: energy, above-cutoff flag, label
    let energies = model.energies(&scored.features.view())?;
    let mut n_above: usize = 0;
    for (i, en) in energies.iter().enumerate() {
        let above = *en > model.cutoff();
        if above { n_above += 1; }
        println!("{:11.6} {} {}", en, if above { "*" } else { "." }, scored.labels[i]);
    }
    info!("{} of {} samples above the energy cutoff {:.4}", n_above, scored.len(), model.cutoff());

    Ok(())
}

pub fn main() {

    let args = Args::parse();
    if env::var("RUST_LOG").is_err() { env::set_var("RUST_LOG", "info") }
    env_logger::init();

    if let Err(e) = run(&args) {
        error!("{}", e);
        process::exit(1);
    }
}
