//! Serialize `Vec<Arc<T>>` as a plain sequence of `T`
//!
//! Neighbor lists share their base tables through `Arc`; on the wire they
//! are ordinary arrays. Use with `#[serde(with = "crate::utils::serde_arc_vec")]`.

use serde::{ser::SerializeSeq, Serialize, Serializer};
use std::sync::Arc;

pub fn serialize<S, T>(items: &[Arc<T>], s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    let mut seq = s.serialize_seq(Some(items.len()))?;
    for item in items {
        seq.serialize_element(item.as_ref())?;
    }
    seq.end()
}
