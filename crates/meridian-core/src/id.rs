//! Identity types for Meridian
//!
//! Entry ids are short opaque strings. Generated ids are nine lowercase
//! base-36 characters; the default zone set uses readable fixed ids.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Length of a generated entry id
pub const GENERATED_ID_LEN: usize = 9;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Zone entry identity - unique within a registry, never reused
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        EntryId(id.into())
    }

    /// Generate a fresh random id
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let id = (0..GENERATED_ID_LEN)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();
        EntryId(id)
    }

    /// Generate a fresh id that `taken` does not report as already in use
    pub fn generate_unique<R, F>(rng: &mut R, taken: F) -> Self
    where
        R: Rng + ?Sized,
        F: Fn(&EntryId) -> bool,
    {
        loop {
            let id = Self::generate(rng);
            if !taken(&id) {
                return id;
            }
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entry({})", self.0)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(id: &str) -> Self {
        EntryId(id.to_string())
    }
}
