//! Domain primitives shared by the persistence and HTTP layers:
//! error taxonomy, identifier rules, and status sets.

pub mod error;
pub mod naming;
pub mod status;
pub mod types;
