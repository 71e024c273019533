use fuzzycluster::decomposition::project;
use fuzzycluster::metrics::entity_correlation;
use fuzzycluster::{FuzzyCMeans, StandardScaler, PCA};
use ndarray::array;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Principal Component Projection ===\n");

    let x = array![
        [1.0, 2.0, 3.0, 4.0, 5.0, 1.1],
        [2.0, 4.0, 6.0, 8.0, 10.0, 2.2],
        [1.5, 3.0, 4.5, 6.0, 7.5, 1.6],
        [10.0, 8.0, 6.0, 4.0, 2.0, 10.5],
        [12.0, 10.0, 8.0, 6.0, 4.0, 12.5],
        [11.0, 9.0, 7.0, 5.0, 3.0, 11.5]
    ];

    println!("Original data shape: {} entities, {} features", x.nrows(), x.ncols());

    let mut scaler = StandardScaler::new();
    let x_scaled = scaler.fit_transform(&x)?;

    let mut pca = PCA::new().n_components(2);
    pca.fit(&x_scaled)?;
    if let Some(ratio) = pca.explained_variance_ratio.as_ref() {
        println!("Explained variance ratio: {:.4}", ratio);
    }
    println!(
        "Informative axes: {}",
        pca.informative_components.unwrap_or(0)
    );

    let mut fcm = FuzzyCMeans::new(2);
    fcm.fit(&x_scaled)?;

    // Centers go through the same scaler as the entities so both share one frame
    let centers = fcm.original_centers(&scaler)?;
    let (projection, degeneracies) = project(&x_scaled, &scaler.transform(&centers)?)?;

    println!("\n{:<10} {:>10} {:>10}", "Entity", "PC1", "PC2");
    println!("{}", "-".repeat(32));
    for (i, row) in projection.entities.rows().into_iter().enumerate() {
        println!("{:<10} {:>10.4} {:>10.4}", i + 1, row[0], row[1]);
    }
    for (k, row) in projection.centers.rows().into_iter().enumerate() {
        println!("{:<10} {:>10.4} {:>10.4}", format!("center {}", k + 1), row[0], row[1]);
    }

    for degeneracy in &degeneracies {
        println!("Note: {}", degeneracy);
    }

    println!("\n=== Entity Correlation ===");
    println!("{:.2}", entity_correlation(&x));

    Ok(())
}
