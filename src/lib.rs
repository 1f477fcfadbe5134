// SPDX-License-Identifier: MIT

//! Lambda-less custom resource workflows
//!
//! - [`jsonata`] writes expression text: symbolic `$states` paths and helpers.
//! - [`graph`] models JSONata-mode state graphs and renders definitions.
//! - [`flow`] assembles the Create / Update / Delete dispatch in front of
//!   caller-supplied branches, from code or from YAML.

pub mod error;
pub mod flow;
pub mod graph;
pub mod jsonata;

pub use error::{FlowError, GraphError};
