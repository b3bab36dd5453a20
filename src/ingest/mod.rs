//! Input collaborators.
//!
//! Submodules:
//! - `roster` — attendee rows from the registration CSV.
//! - `civic` — elected representatives from the Civic Information API.

pub mod civic;
pub mod roster;
