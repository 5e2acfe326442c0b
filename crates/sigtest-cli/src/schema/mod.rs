//! JSON input formats accepted by the `sigtest` subcommands.
//!
//! Raw observations are read directly as `Vec<Observation>`; the formats
//! here cover inputs that are already aggregated.

pub(crate) mod summary;
pub(crate) mod table;
