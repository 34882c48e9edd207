//! Day-granularity validation cache.

pub mod validation;
