use std::collections::HashMap;
use std::path::Path;

use ndarray::{Array2, Axis};
use rayon::prelude::*;

///Conversions available for a raw string column<br>
/// `F32` - parses the string to f32 <br>
/// `NormaliseMean` - normalises based on field values (x-mean)/stddev <br>
/// `NormaliseMinMax(f32, f32)` - normalises between a given lower and upper bound <br>
/// `OneHot` - target columns only: one bool column per unique value <br>
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Conversion {
    F32,
    NormaliseMean,
    NormaliseMinMax(f32, f32),
    OneHot,
}

/// Holds one data split as the matrices the network consumes: an `N x D`
/// float feature matrix and an `N x C` one-hot label matrix with exactly one
/// true entry per row. `C` is fixed across splits.
struct Split {
    inputs: Array2<f32>,
    labels: Array2<bool>,
}

/// Loads and manages a tabular classification dataset.
///
/// Reads raw string rows (csv or added directly), converts selected columns
/// to normalised float features and a one-hot target, and allocates rows at
/// random into train/validation/test splits.
///
/// Limited by size of memory, as all data is read to memory.
///
/// ```rust
///   use feedfwd::dataset::{Conversion, Dataset};
///   let data = vec![
///       vec!["1.0", "2.0", "yes"],
///       vec!["4.0", "5.0", "no"],
///       vec!["2.0", "3.0", "yes"],
///       vec!["5.0", "6.0", "no"],
///   ];
///   let set = Dataset::builder()
///       .add_data(data)
///       .add_input_columns(&[0, 1], Conversion::NormaliseMean)
///       .add_target_columns(&[2], Conversion::OneHot)
///       .allocate_to_test_data(0.25)
///       .build();
///   assert_eq!(set.input_size(), 2);
///   assert_eq!(set.num_classes(), 2);
///   assert_eq!(set.test_inputs().nrows(), 1);
/// ```
pub struct Dataset {
    train: Split,
    validation: Split,
    test: Split,
    input_labels: Vec<String>,
    target_labels: Vec<String>,
}

impl Dataset {
    pub fn builder() -> DatasetBuilder {
        DatasetBuilder::new()
    }

    pub fn train_inputs(&self) -> &Array2<f32> {
        &self.train.inputs
    }
    pub fn train_labels(&self) -> &Array2<bool> {
        &self.train.labels
    }
    pub fn validation_inputs(&self) -> &Array2<f32> {
        &self.validation.inputs
    }
    pub fn validation_labels(&self) -> &Array2<bool> {
        &self.validation.labels
    }
    pub fn test_inputs(&self) -> &Array2<f32> {
        &self.test.inputs
    }
    pub fn test_labels(&self) -> &Array2<bool> {
        &self.test.labels
    }

    pub fn input_size(&self) -> usize {
        self.train.inputs.ncols()
    }

    pub fn num_classes(&self) -> usize {
        self.train.labels.ncols()
    }

    pub fn input_labels(&self) -> &Vec<String> {
        &self.input_labels
    }

    ///One label per class, `<header>_<class value>`
    pub fn target_labels(&self) -> &Vec<String> {
        &self.target_labels
    }
}

#[derive(Default)]
pub struct DatasetBuilder {
    data: Vec<Vec<String>>,
    headers: Vec<String>,
    input_columns: Vec<(usize, Conversion)>,
    target_columns: Vec<usize>,
    validation_ratio: f32,
    test_ratio: f32,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// basic csv reading, for complex csv, or more options, use the `csv` crate
    /// Autodetects separator
    /// Assumes first row is column names, which it uses as headers
    pub fn read_csv(self, path: impl AsRef<Path>) -> Self {
        let data = std::fs::read_to_string(path).expect("Could not open csv");
        let mut seps: HashMap<char, usize> =
            HashMap::from_iter([(',', 0usize), ('\t', 0), (';', 0), ('|', 0)]);
        for char in data.chars() {
            if seps.contains_key(&char) {
                seps.entry(char).and_modify(|x| *x += 1);
            }
        }
        let sep = *seps
            .iter()
            .max_by(|a, b| a.1.cmp(b.1))
            .expect("hashmap should not be empty")
            .0;
        let mut lines = data
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                line.split(sep)
                    .map(|x| x.trim().to_string())
                    .collect::<Vec<String>>()
            })
            .collect::<Vec<_>>();
        let headers = lines.remove(0);

        self.add_column_headers(headers).add_data(lines)
    }

    pub fn add_data<T: ToString>(mut self, data: Vec<Vec<T>>) -> Self {
        self.data.extend(
            data.into_iter()
                .map(|x| x.into_iter().map(|y| y.to_string()).collect()),
        );
        self
    }

    pub fn add_column_headers(mut self, headers: Vec<String>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Add input feature columns, zero indexed
    /// e.g. `.add_input_columns(&[0, 4], Conversion::NormaliseMean)`
    pub fn add_input_columns(mut self, indexes: &[usize], conversion: Conversion) -> Self {
        assert!(
            conversion != Conversion::OneHot,
            "OneHot is a target conversion; inputs must convert to floats"
        );
        for &index in indexes {
            self.input_columns.push((index, conversion));
        }
        self
    }

    /// Add the target column. The conversion must be `OneHot`: classification
    /// targets become one bool column per unique value.
    pub fn add_target_columns(mut self, indexes: &[usize], conversion: Conversion) -> Self {
        assert!(
            conversion == Conversion::OneHot,
            "targets must use Conversion::OneHot"
        );
        self.target_columns.extend_from_slice(indexes);
        self
    }

    /// Allocates a percentage of the data at random to the validation split
    /// <br>e.g. `allocate_to_validation_data(0.2)` allocates 20%
    pub fn allocate_to_validation_data(mut self, ratio: f32) -> Self {
        assert!((0. ..1.).contains(&ratio), "ratio must be in [0,1)");
        self.validation_ratio = ratio;
        self
    }

    /// Allocates a percentage of the data at random to the test split
    /// <br>e.g. `allocate_to_test_data(0.2)` allocates 20%
    pub fn allocate_to_test_data(mut self, ratio: f32) -> Self {
        assert!((0. ..1.).contains(&ratio), "ratio must be in [0,1)");
        self.test_ratio = ratio;
        self
    }

    pub fn build(&self) -> Dataset {
        self.asserts();

        let target_column = self.target_columns[0];
        let classes = self.get_classes(target_column);
        let mean_sd = self.get_mean_sd();
        let min_max = self.get_min_max();

        //each row converts independently of every other row
        let converted: Vec<(Vec<f32>, usize)> = self
            .data
            .par_iter()
            .map(|line| {
                let features = self
                    .input_columns
                    .iter()
                    .map(|&(index, conversion)| {
                        let val = &line[index];
                        match conversion {
                            Conversion::F32 => val.parse::<f32>().unwrap_or_default(),
                            Conversion::NormaliseMean => {
                                let val = val.parse::<f32>().unwrap_or_default();
                                let (mean, sd) = mean_sd[&index];
                                (val - mean) / sd.max(0.001) //sd must not be 0
                            }
                            Conversion::NormaliseMinMax(lower, upper) => {
                                let val = val.parse::<f32>().unwrap_or_default();
                                let (min, max) = min_max[&index];
                                (val - min) / (max - min) * (upper - lower) + lower
                            }
                            Conversion::OneHot => unreachable!("rejected in add_input_columns"),
                        }
                    })
                    .collect::<Vec<f32>>();

                let class = classes
                    .iter()
                    .position(|c| c == &line[target_column])
                    .expect("class values collected from this same data");

                (features, class)
            })
            .collect();

        let num_rows = converted.len();
        let mut inputs = Array2::zeros((num_rows, self.input_columns.len()));
        let mut labels = Array2::from_elem((num_rows, classes.len()), false);
        for (row, (features, class)) in converted.iter().enumerate() {
            for (col, &val) in features.iter().enumerate() {
                inputs[[row, col]] = val;
            }
            labels[[row, *class]] = true;
        }

        let (train_rows, validation_rows, test_rows) = self.split_rows(num_rows);
        let take = |rows: &[usize]| Split {
            inputs: inputs.select(Axis(0), rows),
            labels: labels.select(Axis(0), rows),
        };

        Dataset {
            train: take(&train_rows),
            validation: take(&validation_rows),
            test: take(&test_rows),
            input_labels: self.get_input_labels(),
            target_labels: classes
                .iter()
                .map(|c| format!("{}_{c}", self.header(target_column)))
                .collect(),
        }
    }

    //shuffled row indices carved into test, validation, remainder=train
    fn split_rows(&self, num_rows: usize) -> (Vec<usize>, Vec<usize>, Vec<usize>) {
        let mut indices: Vec<usize> = (0..num_rows).collect();
        fastrand::shuffle(&mut indices);

        let test_count = (num_rows as f32 * self.test_ratio) as usize;
        let validation_count = (num_rows as f32 * self.validation_ratio) as usize;
        assert!(
            test_count + validation_count < num_rows,
            "no rows left for train data"
        );

        let test_rows = indices.split_off(num_rows - test_count);
        let validation_rows = indices.split_off(indices.len() - validation_count);

        (indices, validation_rows, test_rows)
    }

    fn header(&self, index: usize) -> String {
        if self.headers.is_empty() {
            format!("Col{index}")
        } else {
            self.headers[index].clone()
        }
    }

    fn get_input_labels(&self) -> Vec<String> {
        self.input_columns
            .iter()
            .map(|&(index, _)| self.header(index))
            .collect()
    }

    ///unique target values, stored in alphabetical order
    fn get_classes(&self, target_column: usize) -> Vec<String> {
        let mut classes: Vec<String> = self
            .data
            .iter()
            .map(|line| line[target_column].clone())
            .collect();
        classes.sort_by_key(|a| a.to_lowercase());
        classes.dedup();
        classes
    }

    /// returns the mean and standard deviation for each NormaliseMean column
    fn get_mean_sd(&self) -> HashMap<usize, (f32, f32)> {
        let mut mean_sd: HashMap<usize, (f32, f32)> = HashMap::default();
        for &(index, conversion) in &self.input_columns {
            if conversion == Conversion::NormaliseMean {
                let vals = self
                    .data
                    .iter()
                    .map(|line| line[index].parse::<f32>().unwrap_or_default())
                    .collect::<Vec<_>>();

                let mean: f32 = vals.iter().sum::<f32>() / vals.len() as f32;
                let sd = if vals.len() <= 1 {
                    0.
                } else {
                    (vals.iter().map(|&x| (x - mean).powi(2)).sum::<f32>()
                        / (vals.len() as f32 - 1.0))
                        .sqrt()
                };

                mean_sd.insert(index, (mean, sd));
            }
        }

        mean_sd
    }

    /// returns the min and max for each NormaliseMinMax column
    fn get_min_max(&self) -> HashMap<usize, (f32, f32)> {
        let mut min_max: HashMap<usize, (f32, f32)> = HashMap::default();
        for &(index, conversion) in &self.input_columns {
            if let Conversion::NormaliseMinMax(_, _) = conversion {
                let vals = self
                    .data
                    .iter()
                    .map(|line| line[index].parse::<f32>().unwrap_or_default())
                    .collect::<Vec<_>>();

                let min: f32 = vals
                    .iter()
                    .cloned()
                    .min_by(|a, b| a.partial_cmp(b).expect("No NAN"))
                    .expect("Data is not empty");
                let max: f32 = vals
                    .iter()
                    .cloned()
                    .max_by(|a, b| a.partial_cmp(b).expect("No NAN"))
                    .expect("Data is not empty");

                min_max.insert(index, (min, max));
            }
        }

        min_max
    }

    fn asserts(&self) {
        assert!(!self.data.is_empty(), "No data");
        assert!(!self.input_columns.is_empty(), "No input columns");
        assert_eq!(
            self.target_columns.len(),
            1,
            "Exactly one target column required"
        );

        let first_len = self.data[0].len();
        for line in &self.data {
            assert_eq!(
                first_len,
                line.len(),
                "Some lines do not have the same number of columns as the first line {line:?}"
            );
        }

        let max_col_index = self
            .input_columns
            .iter()
            .map(|&(index, _)| index)
            .chain(self.target_columns.iter().copied())
            .max()
            .expect("columns not empty");
        assert!(
            max_col_index < first_len,
            "Column index {max_col_index} exceeds line width {first_len}"
        );

        if !self.headers.is_empty() {
            assert_eq!(
                self.headers.len(),
                first_len,
                "Header count is not equal to line column count"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_class_rows() -> Vec<Vec<&'static str>> {
        vec![
            vec!["1.0", "10.0", "cat"],
            vec!["2.0", "20.0", "dog"],
            vec!["3.0", "30.0", "cat"],
            vec!["4.0", "40.0", "dog"],
        ]
    }

    #[test]
    fn builds_matrices_with_one_hot_targets() {
        let set = Dataset::builder()
            .add_data(two_class_rows())
            .add_input_columns(&[0, 1], Conversion::F32)
            .add_target_columns(&[2], Conversion::OneHot)
            .build();

        assert_eq!(set.train_inputs().shape(), &[4, 2]);
        assert_eq!(set.train_labels().shape(), &[4, 2]);
        assert_eq!(set.num_classes(), 2);
        //exactly one true per row
        for row in set.train_labels().rows() {
            assert_eq!(row.iter().filter(|&&l| l).count(), 1);
        }
        //classes stored alphabetically
        assert_eq!(set.target_labels(), &vec!["Col2_cat", "Col2_dog"]);
    }

    #[test]
    fn normalise_mean_centres_features() {
        let set = Dataset::builder()
            .add_data(two_class_rows())
            .add_input_columns(&[0], Conversion::NormaliseMean)
            .add_target_columns(&[2], Conversion::OneHot)
            .build();

        let col_sum: f32 = set.train_inputs().column(0).sum();
        assert!(col_sum.abs() < 1e-5);
    }

    #[test]
    fn normalise_min_max_bounds_features() {
        let set = Dataset::builder()
            .add_data(two_class_rows())
            .add_input_columns(&[1], Conversion::NormaliseMinMax(0., 1.))
            .add_target_columns(&[2], Conversion::OneHot)
            .build();

        for &v in set.train_inputs() {
            assert!((0. ..=1.).contains(&v));
        }
    }

    #[test]
    fn splits_partition_rows() {
        fastrand::seed(3);
        let mut rows = vec![];
        for i in 0..10 {
            rows.push(vec![
                format!("{i}"),
                format!("{}", i * 10),
                if i % 2 == 0 { "a".into() } else { "b".into() },
            ]);
        }
        let set = Dataset::builder()
            .add_data(rows)
            .add_input_columns(&[0, 1], Conversion::F32)
            .add_target_columns(&[2], Conversion::OneHot)
            .allocate_to_validation_data(0.2)
            .allocate_to_test_data(0.2)
            .build();

        assert_eq!(set.train_inputs().nrows(), 6);
        assert_eq!(set.validation_inputs().nrows(), 2);
        assert_eq!(set.test_inputs().nrows(), 2);
        //labels rows track input rows
        assert_eq!(set.validation_labels().nrows(), 2);
        assert_eq!(set.test_labels().nrows(), 2);
    }

    #[test]
    #[should_panic]
    fn panics_without_data() {
        Dataset::builder().build();
    }

    #[test]
    #[should_panic]
    fn panics_without_input_columns() {
        Dataset::builder().add_data(two_class_rows()).build();
    }

    #[test]
    #[should_panic]
    fn panics_without_target_column() {
        Dataset::builder()
            .add_data(two_class_rows())
            .add_input_columns(&[0], Conversion::F32)
            .build();
    }

    #[test]
    #[should_panic]
    fn panics_on_one_hot_input() {
        Dataset::builder()
            .add_data(two_class_rows())
            .add_input_columns(&[2], Conversion::OneHot)
            .add_target_columns(&[2], Conversion::OneHot)
            .build();
    }
}
