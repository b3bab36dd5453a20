//! Thank-you letter rendering and persistence.
//!
//! Submodules:
//! - `template` — `{{ placeholder }}` templates checked when loaded.
//! - `sink` — one `thanks_<id>.html` file per attendee.

pub mod sink;
pub mod template;

pub use sink::LetterWriter;
pub use template::{LetterTemplate, LetterVars, TemplateError};
