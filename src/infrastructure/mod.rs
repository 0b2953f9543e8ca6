//! Infrastructure Layer
//!
//! Driven adapters for the external concerns the pool depends on:
//! configuration sources and database drivers.

pub mod driven_adapters;
