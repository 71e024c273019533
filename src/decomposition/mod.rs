//! Dimensionality reduction for plotting entity profiles.
//!
//! `PCA` finds principal axes by power iteration with deflation; [`project`]
//! places entities and cluster centers in one shared two-dimensional frame.
//!
//! # Examples
//!
//! ```rust
//! use fuzzycluster::decomposition::project;
//! use ndarray::array;
//!
//! let x = array![
//!     [-1.2, -0.9, 0.3],
//!     [-0.8, -1.1, -0.2],
//!     [1.1, 0.8, 1.4],
//!     [0.9, 1.2, -1.5]
//! ];
//! let centers = array![[-1.0, -1.0, 0.05], [1.0, 1.0, -0.05]];
//!
//! let (projection, degeneracies) = project(&x, &centers).unwrap();
//! assert_eq!(projection.entities.shape(), &[4, 2]);
//! assert_eq!(projection.centers.shape(), &[2, 2]);
//! assert!(degeneracies.is_empty());
//! ```

mod pca;

pub use pca::{project, Projection2D, PCA};
