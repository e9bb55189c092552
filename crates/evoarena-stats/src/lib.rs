//! Statistical utilities for the evoarena project.
//!
//! Currently a single module:
//!
//! - [`descriptive`]: descriptive statistics for summarizing datasets, used
//!   for per-generation score summaries and for the self-referential mutation
//!   scale in the genetic breeder.
//!
//! # Examples
//!
//! ```
//! use evoarena_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```

pub mod descriptive;
