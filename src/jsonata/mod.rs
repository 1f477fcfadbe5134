// SPDX-License-Identifier: MIT

//! JSONata expression authoring
//!
//! Builds the expression text handed to graph nodes: symbolic paths, the
//! `$states` catalog and a few function helpers. Nothing here evaluates
//! JSONata; it only writes it.

pub mod functions;
pub mod path;
pub mod states;

pub use functions::{exists, exists_or_null, map, template};
pub use path::{path_of, JsonataPath, ToExpression};
pub use states::{states, States};
