pub mod serde_arc_vec;
