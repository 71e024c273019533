use fuzzycluster::{FuzzyCMeans, StandardScaler};
use ndarray::array;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Simple Fuzzy C-Means Example ===\n");

    // Two well-separated groups of entities
    let x = array![[0.0, 0.0], [0.0, 1.0], [10.0, 10.0], [10.0, 11.0]];

    println!("Feature matrix:");
    println!("{:?}", x);

    let mut scaler = StandardScaler::new();
    let x_scaled = scaler.fit_transform(&x)?;

    let mut fcm = FuzzyCMeans::new(2).random_state(42);
    let labels = fcm.fit_predict(&x_scaled)?;
    let centers = fcm.original_centers(&scaler)?;

    println!("\nResults:");
    println!("Iterations: {}", fcm.n_iter.unwrap_or(0));
    println!("Converged: {}", fcm.converged.unwrap_or(false));
    println!("Partition coefficient: {:.4}", fcm.partition_coefficient()?);
    println!("Centers (original units):\n{:.3}", centers);

    println!("\nMemberships:");
    if let Some(membership) = fcm.membership.as_ref() {
        for (i, row) in membership.rows().into_iter().enumerate() {
            println!(
                "Entity {}: cluster {} (u = [{:.3}, {:.3}])",
                i + 1,
                labels[i],
                row[0],
                row[1]
            );
        }
    }

    // Memberships of unseen entities
    let new_x = scaler.transform(&array![[0.5, 0.5], [5.0, 5.5]])?;
    let new_membership = fcm.soft_predict(&new_x)?;
    println!("\nMemberships of new entities:");
    println!("{:.3}", new_membership);

    Ok(())
}
