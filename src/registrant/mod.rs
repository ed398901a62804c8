//! Registrant records.
//!
//! Each registrant belongs to exactly one institution category; tenant
//! scoping of reads and writes is enforced by the callers through
//! `auth::policy` and by the scope guard on repository writes.

mod model;
mod repository;

pub use model::{is_valid_phone, Gender, Registrant, RegistrantData, MAX_PHONE_DIGITS, MIN_PHONE_DIGITS};
pub use repository::{RegistrantFilter, RegistrantRepository};
