mod args;

use std::env;
use std::fmt;
use std::process;

use clap::Parser;

#[macro_use]
extern crate log;

use efc_lib::{Dataset, EfcConfig, EfcResult, EnergyBasedFlowClassifier, PredictedClass};

use args::Args;

/// Fits the classifier on `train` and prints one line per `test` row: true label, predicted label, energy
fn classify<L>(train: &Dataset, train_y: &[L], test: &Dataset, test_y: &[L], base_class: Option<&L>,
               config: &EfcConfig, unknown_class: bool) -> EfcResult<()>
    where L: Ord + Clone + fmt::Debug + fmt::Display {

    let clf = EnergyBasedFlowClassifier::fit(&train.features.view(), train_y, base_class, config)?;

    let pred = clf.predict(&test.features.view(), unknown_class)?;
    let mut n_correct: usize = 0;
    for (i, label) in pred.labels.iter().enumerate() {
        if let PredictedClass::Class(l) = label {
            if *l == test_y[i] { n_correct += 1; }
        }
        println!("{} {} {:11.6}", test_y[i], label, pred.energies[i]);
    }
    info!("accuracy: {}/{} = {:.4}", n_correct, test.len(), n_correct as f64 / test.len().max(1) as f64);

    Ok(())
}

fn run(args: &Args) -> EfcResult<()> {
    let config = args.config()?;

    // ---------- Training and test data
    let data = Dataset::from_file(&args.train)?;
    info!("{} instances of {} attributes loaded from {}", data.len(), data.n_attributes(), &args.train);
    let (train, test) = match &args.score {
        Some(fname) => (data, Dataset::from_file(fname)?),
        None => data.train_test_split(args.test_fraction.unwrap_or(0.25), args.seed.unwrap_or(42))?,
    };

    // ---------- Integer labels are ordered as numbers, anything else as text
    let base_int = args.base_class.as_ref().map(|c| c.parse::<i64>());
    match (train.integer_labels(), test.integer_labels(), base_int) {
        (Some(train_y), Some(test_y), None) =>
            classify(&train, &train_y, &test, &test_y, None, &config, args.unknown_class),
        (Some(train_y), Some(test_y), Some(Ok(base))) =>
            classify(&train, &train_y, &test, &test_y, Some(&base), &config, args.unknown_class),
        _ => classify(&train, &train.labels, &test, &test.labels, args.base_class.as_ref(),
                      &config, args.unknown_class),
    }
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
