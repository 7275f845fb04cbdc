//! # stepgraph-template
//!
//! Positional string interpolation (`"Hello {0}"`) implemented as a
//! stepgraph state machine.
//!
//! ```
//! let out = stepgraph_template::render("Simple {0} Input", &["Cooked"]).unwrap();
//! assert_eq!(out, "Simple Cooked Input");
//! ```

pub mod error;
pub mod state;
pub mod syntax;
pub mod template;

pub use error::TemplateError;
pub use state::TemplateState;
pub use syntax::{Limits, Syntax};
pub use template::{render, Template};
