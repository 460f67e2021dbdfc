use std::fs::File;
use std::io::{BufRead, BufReader};

use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::errors::{EfcError, EfcResult};

/// Labelled categorical instances.
///
/// The text form holds one instance per line: comma or whitespace separated
/// non-negative integer features followed by the label. Empty lines and lines
/// starting with `#` are skipped.
#[derive(Clone, Debug)]
pub struct Dataset {
    pub features: Array2<usize>,
    pub labels: Vec<String>,
}

impl Dataset {
    /// Parses a dataset from any buffered reader
    pub fn from_reader<R: BufRead>(reader: R) -> EfcResult<Dataset> {
        let mut values: Vec<usize> = Vec::new();
        let mut labels: Vec<String> = Vec::new();
        let mut n_attr: Option<usize> = None;
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = i + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') { continue; }

            let tokens: Vec<&str> = trimmed.split(|c: char| c == ',' || c.is_whitespace())
                .filter(|t| !t.is_empty()).collect();
            if tokens.len() < 2 {
                return Err(EfcError::Parse { line: line_no, msg: "expected features followed by a label".into() });
            }
            let (features, label) = tokens.split_at(tokens.len() - 1);
            match n_attr {
                None => n_attr = Some(features.len()),
                Some(n) if n != features.len() => {
                    return Err(EfcError::Parse {
                        line: line_no,
                        msg: format!("{} features, previous lines have {}", features.len(), n),
                    });
                }
                _ => {}
            }
            for token in features {
                let v = token.parse::<usize>().map_err(|_| EfcError::Parse {
                    line: line_no,
                    msg: format!("feature '{}' is not a non-negative integer category", token),
                })?;
                values.push(v);
            }
            labels.push(label[0].to_string());
        }

        let n_attr = n_attr.unwrap_or(0);
        let features = Array2::from_shape_vec((labels.len(), n_attr), values)
            .map_err(|e| EfcError::Shape(e.to_string()))?;
        Ok(Dataset { features, labels })
    }

    /// Loads a dataset from a text file
    pub fn from_file(fname: &str) -> EfcResult<Dataset> {
        let file = File::open(fname)?;
        Dataset::from_reader(BufReader::new(file))
    }

    /// Number of instances
    pub fn len(&self) -> usize { self.labels.len() }

    pub fn is_empty(&self) -> bool { self.labels.is_empty() }

    pub fn n_attributes(&self) -> usize { self.features.ncols() }

    /// Labels as integers, when every one of them is an integer.
    ///
    /// Classes are ordered by their labels, so numeric labels must be compared
    /// as numbers: `"10"` sorts before `"2"` as a string.
    pub fn integer_labels(&self) -> Option<Vec<i64>> {
        self.labels.iter().map(|l| l.parse::<i64>().ok()).collect()
    }

    /// Copies the given rows into a new dataset
    pub fn subset(&self, rows: &[usize]) -> Dataset {
        Dataset {
            features: self.features.select(Axis(0), rows),
            labels: rows.iter().map(|&r| self.labels[r].clone()).collect(),
        }
    }

    /// Shuffles the instances with a seeded generator and splits them into a training and a test part.
    ///
    /// The test part takes `test_fraction` of the instances, rounded, but at
    /// least one; the training part keeps at least one as well.
    pub fn train_test_split(&self, test_fraction: f64, seed: u64) -> EfcResult<(Dataset, Dataset)> {
        if !(test_fraction > 0.0 && test_fraction < 1.0) {
            return Err(EfcError::InvalidParameter(format!("test fraction must be in (0, 1), got {}", test_fraction)));
        }
        let n = self.len();
        if n < 2 {
            return Err(EfcError::Shape(format!("cannot split {} instance(s)", n)));
        }
        let n_test = ((n as f64 * test_fraction).round() as usize).clamp(1, n - 1);

        let mut order: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        order.shuffle(&mut rng);
        let (test_rows, train_rows) = order.split_at(n_test);
        debug!("split {} instances into {} for training and {} for testing", n, train_rows.len(), test_rows.len());

        Ok((self.subset(train_rows), self.subset(test_rows)))
    }
}
