//! Integration tests - snapshot files and the HTTP handlers end to end
//!
//! No external services are needed; snapshots are written to temp files.

mod server_tests;
