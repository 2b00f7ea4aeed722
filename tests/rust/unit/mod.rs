//! Unit tests for the aggregation properties
//!
//! Exercises the public lineage API on small hand-built snapshots.

mod aggregation_property_tests;
