//! Sample data model for the sigtest hypothesis-testing engine.
//!
//! This crate turns labeled observations into the summary statistics that the
//! significance tests in `sigtest-testing` consume:
//!
//! - **Observations**: a numeric or categorical value tagged with a group id
//! - **Samples**: ordered observations of a single value kind, with group queries
//! - **Sample distributions**: mean, variance, standard deviation, sum of squares
//!   or proportion, computed per group or reconstructed from published figures
//! - **Contingency tables**: cross-tabulated counts of two categorical variables
//!
//! # Modules
//!
//! - [`observation`]: single data points
//! - [`sample`]: observation collections and per-group queries
//! - [`sample_distribution`]: numeric and categorical summary statistics
//! - [`contingency_table`]: row/column/grand totals of cross-tabulated counts
//! - [`error`]: the failure kinds shared by the whole pipeline
//!
//! # Examples
//!
//! ## Grouped numeric distributions
//!
//! ```
//! use sigtest_stats::{observation::Observation, sample::Sample};
//!
//! let sample = Sample::from_observations([
//!     Observation::numeric(10.0, "A"),
//!     Observation::numeric(12.0, "A"),
//!     Observation::numeric(14.0, "A"),
//!     Observation::numeric(20.0, "B"),
//!     Observation::numeric(22.0, "B"),
//!     Observation::numeric(24.0, "B"),
//! ])
//! .unwrap();
//!
//! let total = sample.total_distribution().unwrap();
//! assert_eq!(total.mean, 17.0);
//!
//! let groups = sample.sample_distributions_by_group_id().unwrap();
//! assert_eq!(groups["A"].sum_of_squares, 8.0);
//! ```
//!
//! ## Mixing value kinds is rejected
//!
//! ```
//! use sigtest_stats::{error::StatsError, observation::Observation, sample::Sample};
//!
//! let mut sample = Sample::new();
//! sample.add(Observation::numeric(1.0, "A")).unwrap();
//! let err = sample.add(Observation::categorical("yes", "A")).unwrap_err();
//! assert!(matches!(err, StatsError::MixedValueType { .. }));
//! ```
//!
//! ## Cross-tabulating categorical observations
//!
//! ```
//! use sigtest_stats::{contingency_table::ContingencyTable, observation::Observation, sample::Sample};
//!
//! let sample = Sample::from_observations([
//!     Observation::categorical("yes", "male"),
//!     Observation::categorical("no", "female"),
//! ])
//! .unwrap();
//! let table = ContingencyTable::from_sample(&sample).unwrap();
//! assert_eq!(table.total(), 2);
//! ```

pub mod contingency_table;
pub mod error;
pub mod observation;
pub mod sample;
pub mod sample_distribution;
