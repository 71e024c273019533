use fuzzycluster::{AnalysisConfig, FeatureMatrix, FuzzyProfileAnalysis};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Fuzzy Profile Clustering ===\n");

    // Mean emotion ratings per model: interest, surprise, sadness, anger
    let features = FeatureMatrix::from_rows(
        vec!["interest", "surprise", "sadness", "anger"],
        vec![
            ("model-a", vec![4.1, 3.2, 1.1, 1.0]),
            ("model-b", vec![4.3, 3.0, 1.3, 1.1]),
            ("model-c", vec![3.9, 3.4, 1.0, 1.2]),
            ("model-d", vec![2.1, 2.0, 2.2, 2.0]),
            ("model-e", vec![2.3, 2.1, 2.0, 2.2]),
            ("model-f", vec![2.0, 1.9, 2.1, 2.1]),
            ("model-g", vec![1.2, 3.9, 3.8, 3.5]),
            ("model-h", vec![1.0, 4.1, 3.9, 3.7]),
            ("model-i", vec![3.1, 2.6, 1.6, 1.5]),
        ],
    )?;

    println!(
        "Dataset: {} entities, {} features\n",
        features.n_entities(),
        features.n_features()
    );

    // A JSON document only needs the fields it overrides
    let config = AnalysisConfig::from_json_str(r#"{"k_max": 10, "random_seed": 42}"#)?
        .clamped_to(features.n_entities());

    let report = FuzzyProfileAnalysis::new(config).run(&features)?;

    println!("=== Silhouette Sweep ===");
    for candidate in &report.sweep.scores {
        let marker = if candidate.k == report.n_clusters { " <- best" } else { "" };
        println!("k={:>2}: {:>7.4}{}", candidate.k, candidate.silhouette, marker);
    }

    println!("\n=== Memberships ===");
    for (i, name) in report.entities.iter().enumerate() {
        let row: Vec<String> = report
            .membership
            .row(i)
            .iter()
            .enumerate()
            .map(|(k, u)| format!("C{}:{:.2}", k + 1, u))
            .collect();
        println!("{:<10} {}", name, row.join(", "));
    }

    println!("\n=== Cluster Characteristics ===");
    for summary in &report.summaries {
        println!("Cluster {}: {} entities {:?}", summary.cluster + 1, summary.size, summary.members);
        match &summary.mean {
            Some(mean) => {
                for (feature, value) in report.features.iter().zip(mean.iter()) {
                    println!("  {:<10} {:.2}", feature, value);
                }
            }
            None => println!("  (no entity above the membership threshold)"),
        }
    }

    if !report.degeneracies.is_empty() {
        println!("\n=== Notes ===");
        for degeneracy in &report.degeneracies {
            println!("  {}", degeneracy);
        }
    }

    println!(
        "\nPartition coefficient: {:.4}, partition entropy: {:.4}",
        report.partition_coefficient, report.partition_entropy
    );

    Ok(())
}
