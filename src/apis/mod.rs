//! Low-level clients for the dedicated storage REST API, one module per API
//! version.

pub mod v1;
