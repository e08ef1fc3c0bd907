//! Compile-time defaults merged by build.rs
//!
//! Library defaults, overridden by `ORD_CONFIG_RS` at build time.

include!(concat!(env!("OUT_DIR"), "/ord_merged_config.rs"));
