//! Fuzzy clustering and cluster characterization.
//!
//! This module provides:
//! - `FuzzyCMeans`: soft partitional clustering with seeded initialization
//! - `SilhouetteSelector`: picks the cluster count by silhouette score
//! - `ClusterCharacterizer`: per-cluster size, mean, std and member lists
//!
//! # Examples
//!
//! ## Fuzzy C-Means
//! ```rust
//! use fuzzycluster::FuzzyCMeans;
//! use ndarray::array;
//!
//! let x = array![
//!     [1.0, 1.0],
//!     [1.5, 2.0],
//!     [3.0, 4.0],
//!     [5.0, 7.0],
//!     [3.5, 5.0],
//!     [4.5, 5.0]
//! ];
//!
//! let mut fcm = FuzzyCMeans::new(2).max_iter(100).random_state(42);
//! let labels = fcm.fit_predict(&x).unwrap();
//! assert_eq!(labels.len(), 6);
//!
//! // Every row of the membership matrix sums to one
//! let membership = fcm.membership.as_ref().unwrap();
//! println!("Memberships: {:?}", membership);
//! ```
//!
//! ## Choosing the cluster count
//! ```rust
//! use fuzzycluster::SilhouetteSelector;
//! use ndarray::array;
//!
//! let x = array![[0.0, 0.0], [0.0, 1.0], [10.0, 10.0], [10.0, 11.0]];
//!
//! let sweep = SilhouetteSelector::new(2, 3).sweep(&x).unwrap();
//! assert_eq!(sweep.best_k, 2);
//! for candidate in &sweep.scores {
//!     println!("k={}: {:.3}", candidate.k, candidate.silhouette);
//! }
//! ```

mod fuzzy_cmeans;
mod selection;
mod summary;

pub use fuzzy_cmeans::FuzzyCMeans;
pub use selection::{CandidateScore, SilhouetteSelector, SilhouetteSweep};
pub use summary::{ClusterCharacterizer, ClusterSummary};
