//! Field normalization for attendee rows.
//!
//! Both cleaners are total: every input, including an empty or malformed
//! one, maps to a defined output. Neither touches the record it came from.
//!
//! Submodules:
//! - `zipcode` — five-character zero-padded postal codes.
//! - `phone` — ten-digit national phone numbers.

pub mod phone;
pub mod zipcode;

pub use phone::clean_phone_number;
pub use zipcode::clean_zipcode;
