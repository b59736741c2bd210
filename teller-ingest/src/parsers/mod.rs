//! Institution-specific statement text parsers.

pub mod rbc;
