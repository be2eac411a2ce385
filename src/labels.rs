use ndarray::{Array1, Array2, Zip};

use crate::error::Error;

/// Converts one-hot labels to integer class indices.
///
/// Encoded as a matrix product against the column `[0..C-1]`, so each row
/// collapses to the index of its single true entry. The result is undefined
/// if a row has zero or more than one true entry; callers must uphold the
/// exactly-one-hot invariant.
pub fn to_indices_labels(one_hot_labels: &Array2<bool>) -> Array1<i32> {
    let as_int = one_hot_labels.mapv(i32::from);
    let indices = Array1::from_iter(0..one_hot_labels.ncols() as i32);
    as_int.dot(&indices)
}

/// Converts integer class indices to one-hot labels with `num_classes` columns.
///
/// Returns [`Error::InvalidArgument`] if any index is negative or
/// `>= num_classes`. Rows are independent, so the scatter runs in parallel.
pub fn to_one_hot_labels(
    indices_labels: &Array1<i32>,
    num_classes: usize,
) -> Result<Array2<bool>, Error> {
    if indices_labels.iter().any(|&i| i < 0) {
        return Err(Error::InvalidArgument(
            "label indices must not be negative".to_string(),
        ));
    }
    if indices_labels.iter().any(|&i| i as usize >= num_classes) {
        return Err(Error::InvalidArgument(format!(
            "label index exceeds number of classes {num_classes}"
        )));
    }

    let mut one_hot = Array2::from_elem((indices_labels.len(), num_classes), false);
    Zip::from(one_hot.rows_mut())
        .and(indices_labels)
        .par_for_each(|mut row, &index| {
            row[index as usize] = true;
        });

    Ok(one_hot)
}

#[cfg(test)]
mod tests {
    use ndarray::{arr1, arr2};

    use super::*;

    #[test]
    fn indices_from_one_hot() {
        let one_hot = arr2(&[
            [false, true, false],
            [true, false, false],
            [false, false, true],
        ]);
        assert_eq!(to_indices_labels(&one_hot), arr1(&[1, 0, 2]));
    }

    #[test]
    fn one_hot_from_indices() {
        let one_hot = to_one_hot_labels(&arr1(&[2, 0]), 3).unwrap();
        assert_eq!(
            one_hot,
            arr2(&[[false, false, true], [true, false, false]])
        );
    }

    #[test]
    fn round_trip() {
        let one_hot = arr2(&[
            [true, false, false, false],
            [false, false, true, false],
            [false, true, false, false],
            [false, false, false, true],
        ]);
        let indices = to_indices_labels(&one_hot);
        let back = to_one_hot_labels(&indices, 4).unwrap();
        assert_eq!(back, one_hot);
    }

    #[test]
    fn rejects_negative_index() {
        let result = to_one_hot_labels(&arr1(&[0, -1, 2]), 3);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn rejects_out_of_range_index() {
        let result = to_one_hot_labels(&arr1(&[0, 3]), 3);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }
}
