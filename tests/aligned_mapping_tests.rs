//! End-to-end tests for the axis-aligned mappings
//!
//! Exercises the write protocol against a 100 x 100 container: accepted
//! values of every kind, rejected shapes and labels, and the guarantee that
//! a rejected write leaves the container's data state untouched (asserted
//! through the state digest).

use annotated_matrix_sdk::container::AnnotatedMatrix;
use annotated_matrix_sdk::models::{Column, CsrMatrix, DataTable, RawValue};
use annotated_matrix_sdk::validation::AlignmentError;
use ndarray::{Array2, ArrayD, IxDyn};

const N_OBS: usize = 100;
const N_VARS: usize = 100;

fn labels(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{prefix}{i:03}")).collect()
}

/// Container with labels cell000..cell099 / gene000..gene099.
fn fixture() -> AnnotatedMatrix {
    let obs = DataTable::from_index(labels("cell", N_OBS));
    let var = DataTable::from_index(labels("gene", N_VARS));
    AnnotatedMatrix::new(Array2::zeros((N_OBS, N_VARS)), obs, var).unwrap()
}

fn obs_metadata() -> DataTable {
    DataTable::new(
        labels("cell", N_OBS),
        vec![Column::float("score", (0..N_OBS).map(|i| i as f64).collect())],
    )
    .unwrap()
}

fn diagonal_sparse(size: usize) -> CsrMatrix {
    let triplets: Vec<(usize, usize, f64)> =
        (0..size).map(|i| (i, i, i as f64 + 1.0)).collect();
    CsrMatrix::from_triplets(size, size, &triplets).unwrap()
}

mod assignment_tests {
    use super::*;

    #[test]
    fn test_mappings_start_empty() {
        let matrix = fixture();
        assert!(matrix.obsm().is_empty());
        assert!(matrix.varm().is_empty());
        assert!(matrix.layers().is_empty());
    }

    #[test]
    fn test_bulk_assignment_of_mixed_kinds() {
        let mut matrix = fixture();
        let dense = Array2::from_shape_fn((N_OBS, 10), |(row, col)| (row * 10 + col) as f64);

        matrix
            .set_obsm(vec![
                ("embedding".to_string(), RawValue::from(dense.clone())),
                ("metadata".to_string(), RawValue::from(obs_metadata())),
            ])
            .unwrap();
        assert_eq!(matrix.obsm().len(), 2);
        assert!(matrix.obsm().contains_key("embedding"));
        assert!(matrix.obsm().contains_key("metadata"));

        let var_table = DataTable::new(
            labels("gene", N_VARS),
            vec![Column::bool("flagged", vec![false; N_VARS])],
        )
        .unwrap();
        matrix
            .set_varm(vec![
                (
                    "loadings".to_string(),
                    RawValue::from(Array2::<f64>::zeros((N_VARS, 10))),
                ),
                ("annotations".to_string(), RawValue::from(var_table)),
            ])
            .unwrap();
        assert_eq!(matrix.varm().len(), 2);

        // stored values read back with their content intact
        let embedding = matrix.obsm().get("embedding").unwrap();
        assert_eq!(embedding.as_dense().unwrap(), &dense);
        let metadata = matrix.obsm().get("metadata").unwrap();
        assert_eq!(metadata.as_table().unwrap(), &obs_metadata());
        assert_eq!(metadata.row_labels().unwrap()[99], "cell099");
    }

    #[test]
    fn test_single_insert_and_overwrite() {
        let mut matrix = fixture();
        assert!(matrix
            .insert_obsm("pca", Array2::<f64>::zeros((N_OBS, 3)))
            .unwrap()
            .is_none());

        let previous = matrix
            .insert_obsm("pca", Array2::<f64>::zeros((N_OBS, 5)))
            .unwrap()
            .unwrap();
        assert_eq!(previous.col_count(), 3);
        assert_eq!(matrix.obsm().len(), 1);
        assert_eq!(matrix.obsm().get("pca").unwrap().col_count(), 5);
    }

    #[test]
    fn test_valid_sparse_values_are_accepted() {
        let mut matrix = fixture();
        let sparse = diagonal_sparse(N_OBS);
        matrix.insert_obsm("graph", sparse.clone()).unwrap();

        let stored = matrix.obsm().get("graph").unwrap().as_sparse().unwrap();
        assert_eq!(stored, &sparse);
        assert_eq!(stored.get(42, 42), 43.0);
        assert_eq!(stored.nnz(), N_OBS);
    }

    #[test]
    fn test_iteration_follows_insertion_order() {
        let mut matrix = fixture();
        for key in ["umap", "pca", "tsne", "graph"] {
            matrix
                .insert_obsm(key, Array2::<f64>::zeros((N_OBS, 2)))
                .unwrap();
        }
        let keys: Vec<&str> = matrix.obsm().keys().collect();
        assert_eq!(keys, vec!["umap", "pca", "tsne", "graph"]);

        matrix.remove_obsm("pca").unwrap();
        matrix
            .insert_obsm("pca", Array2::<f64>::zeros((N_OBS, 2)))
            .unwrap();
        let keys: Vec<&str> = matrix.obsm().keys().collect();
        assert_eq!(keys, vec!["umap", "tsne", "graph", "pca"]);
    }
}

mod rejection_tests {
    use super::*;

    #[test]
    fn test_wrong_row_count_is_rejected_and_state_preserved() {
        let mut matrix = fixture();
        matrix
            .insert_obsm("embedding", Array2::<f64>::ones((N_OBS, 10)))
            .unwrap();
        let digest = matrix.fingerprint();

        for rows in [N_OBS / 2, N_OBS * 2] {
            let error = matrix
                .insert_obsm("broken", Array2::<f64>::zeros((rows, 10)))
                .unwrap_err();
            assert_eq!(
                error,
                AlignmentError::DimensionMismatch {
                    axis: matrix.obs_axis().kind(),
                    expected: N_OBS,
                    actual: rows,
                }
            );
            assert_eq!(matrix.fingerprint(), digest);

            // the same write fails identically a second time
            let repeat = matrix
                .insert_obsm("broken", Array2::<f64>::zeros((rows, 10)))
                .unwrap_err();
            assert_eq!(repeat, error);
            assert_eq!(matrix.fingerprint(), digest);
        }
        assert_eq!(matrix.obsm().len(), 1);
        assert!(!matrix.obsm().contains_key("broken"));
    }

    #[test]
    fn test_varm_checks_against_variable_axis() {
        let mut matrix = fixture();
        let digest = matrix.fingerprint();

        let error = matrix
            .insert_varm("loadings", Array2::<f64>::zeros((N_VARS + 1, 4)))
            .unwrap_err();
        assert!(matches!(
            error,
            AlignmentError::DimensionMismatch {
                expected: N_VARS,
                actual: 101,
                ..
            }
        ));
        assert_eq!(matrix.fingerprint(), digest);
    }

    #[test]
    fn test_positional_index_table_is_rejected() {
        let mut matrix = fixture();
        matrix.insert_obsm("metadata", obs_metadata()).unwrap();
        let digest = matrix.fingerprint();

        // same column data, but the row labels were reset to "0", "1", ...
        let reset = DataTable::with_positional_index(vec![Column::float(
            "score",
            (0..N_OBS).map(|i| i as f64).collect(),
        )])
        .unwrap();
        let error = matrix.insert_obsm("reset", reset).unwrap_err();
        assert_eq!(
            error,
            AlignmentError::LabelMismatch {
                axis: matrix.obs_axis().kind(),
                position: 0,
                expected: "cell000".to_string(),
                found: "0".to_string(),
            }
        );
        assert_eq!(matrix.fingerprint(), digest);
        assert_eq!(matrix.obsm().len(), 1);
    }

    #[test]
    fn test_right_length_wrong_labels_is_rejected() {
        let mut matrix = fixture();
        let digest = matrix.fingerprint();

        // correct row count, labels from the other axis
        let mislabeled = DataTable::new(
            labels("gene", N_OBS),
            vec![Column::int("n", vec![0; N_OBS])],
        )
        .unwrap();
        let error = matrix.insert_obsm("mislabeled", mislabeled).unwrap_err();
        assert!(matches!(
            error,
            AlignmentError::LabelMismatch { position: 0, .. }
        ));
        assert_eq!(matrix.fingerprint(), digest);
    }

    #[test]
    fn test_sparse_with_doubled_row_count_is_rejected() {
        let mut matrix = fixture();
        let digest = matrix.fingerprint();

        let doubled =
            CsrMatrix::from_triplets(2 * N_OBS, N_OBS, &[(0, 3, 1.0), (150, 7, 2.0)]).unwrap();
        let error = matrix.insert_obsm("doubled", doubled).unwrap_err();
        assert_eq!(
            error,
            AlignmentError::DimensionMismatch {
                axis: matrix.obs_axis().kind(),
                expected: N_OBS,
                actual: 2 * N_OBS,
            }
        );
        assert_eq!(matrix.fingerprint(), digest);
        assert!(matrix.obsm().is_empty());
    }

    #[test]
    fn test_wrong_rank_dense_is_rejected() {
        let mut matrix = fixture();
        let digest = matrix.fingerprint();

        for shape in [vec![N_OBS], vec![N_OBS, 5, 2]] {
            let raw = RawValue::Array(ArrayD::<f64>::zeros(IxDyn(&shape)));
            let error = matrix.insert_obsm("block", raw).unwrap_err();
            assert!(matches!(error, AlignmentError::UnsupportedValueType { .. }));
            assert_eq!(matrix.fingerprint(), digest);
        }
    }

    #[test]
    fn test_remove_absent_key_is_an_error() {
        let mut matrix = fixture();
        let digest = matrix.fingerprint();

        let error = matrix.remove_obsm("never_stored").unwrap_err();
        assert_eq!(
            error,
            AlignmentError::KeyNotFound {
                key: "never_stored".to_string(),
            }
        );
        assert_eq!(matrix.fingerprint(), digest);
    }

    #[test]
    fn test_get_absent_key_is_an_error() {
        let matrix = fixture();
        assert!(matches!(
            matrix.obsm().get("missing"),
            Err(AlignmentError::KeyNotFound { .. })
        ));
    }
}

mod replace_all_tests {
    use super::*;

    #[test]
    fn test_bulk_replace_is_all_or_nothing() {
        let mut matrix = fixture();
        matrix
            .insert_obsm("survivor", Array2::<f64>::ones((N_OBS, 2)))
            .unwrap();
        let digest = matrix.fingerprint();

        // second entry is misaligned, so nothing may change
        let error = matrix
            .set_obsm(vec![
                (
                    "first".to_string(),
                    RawValue::from(Array2::<f64>::zeros((N_OBS, 1))),
                ),
                (
                    "second".to_string(),
                    RawValue::from(Array2::<f64>::zeros((3, 1))),
                ),
                (
                    "third".to_string(),
                    RawValue::from(Array2::<f64>::zeros((N_OBS, 1))),
                ),
            ])
            .unwrap_err();
        assert!(matches!(
            error,
            AlignmentError::DimensionMismatch { actual: 3, .. }
        ));
        assert_eq!(matrix.fingerprint(), digest);
        assert_eq!(matrix.obsm().keys().collect::<Vec<_>>(), vec!["survivor"]);

        // a fully valid batch replaces the old entries completely
        matrix
            .set_obsm(vec![
                ("first", Array2::<f64>::zeros((N_OBS, 1))),
                ("third", Array2::<f64>::zeros((N_OBS, 1))),
            ])
            .unwrap();
        assert_eq!(
            matrix.obsm().keys().collect::<Vec<_>>(),
            vec!["first", "third"]
        );
        assert!(!matrix.obsm().contains_key("survivor"));
    }

    #[test]
    fn test_bulk_replace_duplicate_keys_last_wins() {
        let mut matrix = fixture();
        matrix
            .set_obsm(vec![
                ("dup", Array2::<f64>::zeros((N_OBS, 1))),
                ("solo", Array2::<f64>::zeros((N_OBS, 1))),
                ("dup", Array2::<f64>::ones((N_OBS, 7))),
            ])
            .unwrap();
        assert_eq!(matrix.obsm().len(), 2);
        assert_eq!(
            matrix.obsm().keys().collect::<Vec<_>>(),
            vec!["dup", "solo"]
        );
        assert_eq!(matrix.obsm().get("dup").unwrap().col_count(), 7);
    }
}

mod layer_tests {
    use super::*;

    #[test]
    fn test_layers_accept_matrix_shaped_values() {
        let mut matrix = fixture();
        matrix
            .insert_layer("counts", Array2::<f64>::ones((N_OBS, N_VARS)))
            .unwrap();
        matrix
            .insert_layer("graph", diagonal_sparse(N_OBS))
            .unwrap();
        assert_eq!(matrix.layers().len(), 2);
        assert_eq!(
            matrix.layers().keys().collect::<Vec<_>>(),
            vec!["counts", "graph"]
        );
    }

    #[test]
    fn test_layers_check_both_axes() {
        let mut matrix = fixture();
        let digest = matrix.fingerprint();

        let tall = matrix
            .insert_layer("tall", Array2::<f64>::zeros((N_OBS + 1, N_VARS)))
            .unwrap_err();
        assert!(matches!(
            tall,
            AlignmentError::DimensionMismatch {
                expected: N_OBS,
                actual: 101,
                ..
            }
        ));

        let wide = matrix
            .insert_layer("wide", Array2::<f64>::zeros((N_OBS, N_VARS - 1)))
            .unwrap_err();
        assert!(matches!(
            wide,
            AlignmentError::DimensionMismatch {
                expected: N_VARS,
                actual: 99,
                ..
            }
        ));
        assert_eq!(matrix.fingerprint(), digest);
    }

    #[test]
    fn test_layers_reject_labeled_tables() {
        let mut matrix = fixture();
        let digest = matrix.fingerprint();

        let error = matrix.insert_layer("table", obs_metadata()).unwrap_err();
        assert!(matches!(error, AlignmentError::UnsupportedValueType { .. }));
        assert_eq!(matrix.fingerprint(), digest);
        assert!(matrix.layers().is_empty());
    }

    #[test]
    fn test_bulk_layer_replace() {
        let mut matrix = fixture();
        matrix
            .set_layers(vec![
                (
                    "raw".to_string(),
                    RawValue::from(Array2::<f64>::zeros((N_OBS, N_VARS))),
                ),
                (
                    "normalized".to_string(),
                    RawValue::from(Array2::<f64>::ones((N_OBS, N_VARS))),
                ),
            ])
            .unwrap();
        assert_eq!(matrix.layers().len(), 2);

        let digest = matrix.fingerprint();
        let error = matrix
            .set_layers(vec![(
                "bad".to_string(),
                RawValue::from(Array2::<f64>::zeros((1, 1))),
            )])
            .unwrap_err();
        assert!(matches!(error, AlignmentError::DimensionMismatch { .. }));
        assert_eq!(matrix.fingerprint(), digest);
        assert_eq!(matrix.layers().len(), 2);
    }
}
