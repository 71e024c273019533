use approx::assert_abs_diff_eq;
use fuzzycluster::metrics::entity_correlation;
use fuzzycluster::{
    AnalysisConfig, ClusterError, Degeneracy, FeatureMatrix, FuzzyCMeans, FuzzyProfileAnalysis,
    Matrix, SilhouetteSelector, StandardScaler,
};
use ndarray::{array, Axis};

fn config(k_min: usize, k_max: usize) -> AnalysisConfig {
    AnalysisConfig {
        k_min,
        k_max,
        ..AnalysisConfig::default()
    }
}

fn four_entities() -> FeatureMatrix {
    FeatureMatrix::from_rows(
        vec!["q1", "q2"],
        vec![
            ("m1", vec![0.0, 0.0]),
            ("m2", vec![0.0, 1.0]),
            ("m3", vec![10.0, 10.0]),
            ("m4", vec![10.0, 11.0]),
        ],
    )
    .unwrap()
}

fn six_entities() -> FeatureMatrix {
    FeatureMatrix::from_rows(
        vec!["interest", "surprise"],
        vec![
            ("gpt", vec![1.0, 2.0]),
            ("claude", vec![2.0, 1.0]),
            ("gemini", vec![1.5, 1.5]),
            ("llama", vec![8.0, 9.0]),
            ("qwen", vec![9.0, 8.0]),
            ("grok", vec![8.5, 8.5]),
        ],
    )
    .unwrap()
}

#[test]
fn four_entities_select_two_clusters_with_expected_centers() {
    let report = FuzzyProfileAnalysis::new(config(2, 3))
        .run(&four_entities())
        .unwrap();

    assert_eq!(report.n_clusters, 2);
    assert_eq!(report.centers.shape(), &[2, 2]);

    let mut centers: Vec<Vec<f64>> = report
        .centers
        .axis_iter(Axis(0))
        .map(|row| row.to_vec())
        .collect();
    centers.sort_by(|a, b| a[0].total_cmp(&b[0]));

    assert_abs_diff_eq!(centers[0][0], 0.0, epsilon = 1e-2);
    assert_abs_diff_eq!(centers[0][1], 0.5, epsilon = 1e-2);
    assert_abs_diff_eq!(centers[1][0], 10.0, epsilon = 1e-2);
    assert_abs_diff_eq!(centers[1][1], 10.5, epsilon = 1e-2);
}

#[test]
fn memberships_are_valid_probabilities() {
    for seed in [0, 1, 42, 1234] {
        let mut analysis_config = config(2, 4);
        analysis_config.random_seed = seed;

        let report = FuzzyProfileAnalysis::new(analysis_config)
            .run(&six_entities())
            .unwrap();

        for row in report.membership.axis_iter(Axis(0)) {
            assert_abs_diff_eq!(row.sum(), 1.0, epsilon = 1e-6);
            assert!(row.iter().all(|&u| (0.0..=1.0).contains(&u)));
        }
    }
}

#[test]
fn analysis_is_deterministic_for_seed() {
    let analysis = FuzzyProfileAnalysis::new(config(2, 5));
    let first = analysis.run(&six_entities()).unwrap();
    let second = analysis.run(&six_entities()).unwrap();

    assert_eq!(first.membership, second.membership);
    assert_eq!(first.centers, second.centers);
    assert_eq!(first.sweep, second.sweep);
}

#[test]
fn summary_means_match_threshold_subsets() {
    let features = six_entities();
    let report = FuzzyProfileAnalysis::new(config(2, 4)).run(&features).unwrap();

    assert_eq!(report.n_clusters, 2);

    let mut total_size = 0;
    for summary in &report.summaries {
        let selected: Vec<usize> = report
            .membership
            .column(summary.cluster)
            .iter()
            .enumerate()
            .filter(|&(_, &u)| u > 0.5)
            .map(|(i, _)| i)
            .collect();
        let names: Vec<&str> = selected.iter().map(|&i| features.entities[i].as_str()).collect();
        assert_eq!(summary.members, names);
        assert_eq!(summary.size, 3);
        total_size += summary.size;

        let mean = summary.mean.as_ref().unwrap();
        for j in 0..features.n_features() {
            let expected = selected.iter().map(|&i| features.values[[i, j]]).sum::<f64>()
                / selected.len() as f64;
            assert_abs_diff_eq!(mean[j], expected, epsilon = 1e-12);
        }
    }
    assert_eq!(total_size, features.n_entities());

    let mut groups: Vec<Vec<String>> = report.summaries.iter().map(|s| s.members.clone()).collect();
    groups.sort();
    assert_eq!(groups[0], vec!["gpt", "claude", "gemini"]);
    assert_eq!(groups[1], vec!["llama", "qwen", "grok"]);
}

#[test]
fn entity_on_center_gets_full_membership() {
    let features = six_entities();
    let mut scaler = StandardScaler::new();
    let standardized = scaler.fit_transform(&features.values).unwrap();

    let mut fcm = FuzzyCMeans::new(2).random_state(3);
    fcm.fit(&standardized).unwrap();

    let centers = fcm.cluster_centers.clone().unwrap();
    let mut augmented = Matrix::zeros((standardized.nrows() + 1, standardized.ncols()));
    augmented
        .slice_mut(ndarray::s![..standardized.nrows(), ..])
        .assign(&standardized);
    augmented.row_mut(standardized.nrows()).assign(&centers.row(0));

    let membership = fcm.soft_predict(&augmented).unwrap();
    let last = membership.row(standardized.nrows());
    assert_eq!(last[0], 1.0);
    assert_eq!(last[1], 0.0);
}

#[test]
fn centers_round_trip_through_scaler() {
    let features = six_entities();
    let mut scaler = StandardScaler::new();
    let standardized = scaler.fit_transform(&features.values).unwrap();

    let mut fcm = FuzzyCMeans::new(2);
    fcm.fit(&standardized).unwrap();

    let raw = fcm.original_centers(&scaler).unwrap();
    let back = scaler.transform(&raw).unwrap();
    let fitted = fcm.cluster_centers.as_ref().unwrap();
    for (a, b) in fitted.iter().zip(back.iter()) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-10);
    }
}

#[test]
fn standardized_columns_have_zero_mean_unit_variance() {
    let values = array![
        [3.0, 1.0, 5.0],
        [4.0, 9.0, 5.0],
        [8.0, 2.0, 5.0],
        [1.0, 7.0, 5.0],
        [6.0, 3.0, 5.0]
    ];
    let mut scaler = StandardScaler::new();
    let scaled = scaler.fit_transform(&values).unwrap();

    for j in 0..2 {
        let column = scaled.column(j);
        assert_abs_diff_eq!(column.mean().unwrap(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(column.var(0.0), 1.0, epsilon = 1e-12);
    }
    assert!(scaled.column(2).iter().all(|v| v.abs() < 1e-12));
    assert_eq!(scaler.degeneracies, vec![Degeneracy::ZeroVariance { column: 2 }]);
}

#[test]
fn selected_k_stays_in_range() {
    let mut scaler = StandardScaler::new();
    let standardized = scaler.fit_transform(&six_entities().values).unwrap();

    for (k_min, k_max) in [(2, 2), (2, 5), (3, 6), (4, 4)] {
        let k = SilhouetteSelector::new(k_min, k_max)
            .select_k(&standardized)
            .unwrap();
        assert!((k_min..=k_max).contains(&k));
    }
}

#[test]
fn invalid_configuration_fails_before_fitting() {
    let features = four_entities();

    let mut bad_fuzziness = config(2, 3);
    bad_fuzziness.fuzziness = 1.0;
    let mut bad_iterations = config(2, 3);
    bad_iterations.max_iterations = 0;

    for bad in [config(1, 3), config(3, 2), config(2, 5), bad_fuzziness, bad_iterations] {
        let result = FuzzyProfileAnalysis::new(bad).run(&features);
        assert!(matches!(result, Err(ClusterError::InvalidConfig(_))));
    }
}

#[test]
fn zero_variance_feature_is_flagged_not_fatal() {
    let features = FeatureMatrix::from_rows(
        vec!["q1", "q2", "constant"],
        vec![
            ("a", vec![0.0, 0.0, 3.0]),
            ("b", vec![0.0, 1.0, 3.0]),
            ("c", vec![10.0, 10.0, 3.0]),
            ("d", vec![10.0, 11.0, 3.0]),
        ],
    )
    .unwrap();

    let report = FuzzyProfileAnalysis::new(config(2, 3)).run(&features).unwrap();
    assert!(report
        .degeneracies
        .contains(&Degeneracy::ZeroVariance { column: 2 }));
    assert!(report.membership.iter().all(|u| u.is_finite()));
    for row in report.centers.axis_iter(Axis(0)) {
        assert_abs_diff_eq!(row[2], 3.0, epsilon = 1e-9);
    }
}

#[test]
fn correlation_matches_report() {
    let features = six_entities();
    let report = FuzzyProfileAnalysis::new(config(2, 3)).run(&features).unwrap();
    let corr = entity_correlation(&features.values);

    assert_eq!(corr.shape(), &[6, 6]);
    // gpt [1, 2] and claude [2, 1] move in opposite directions
    assert_abs_diff_eq!(corr[[0, 1]], -1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(report.correlation[[0, 1]], -1.0, epsilon = 1e-12);
}
