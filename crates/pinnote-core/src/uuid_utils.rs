//! UUIDv7 helpers for note identifiers.
//!
//! Note ids are UUIDv7, which embed a millisecond Unix timestamp in the
//! first 48 bits. Ids minted later sort after ids minted earlier, so the
//! storage order of notes and the order of their ids agree.

use uuid::Uuid;

/// Generate a new UUIDv7 identifier.
///
/// # Example
///
/// ```
/// use pinnote_core::uuid_utils::new_v7;
///
/// let a = new_v7();
/// let b = new_v7();
/// assert!(b > a);
/// ```
#[inline]
pub fn new_v7() -> Uuid {
    Uuid::now_v7()
}
