// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Item identifiers and label hashing.

use core::fmt;

const FNV_OFFSET: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Substitute for hashes that land on [`Id::NONE`].
const ZERO_REMAP: u32 = 0x9e37_79b9;

/// Identity of an item, derived each frame from the ID stack and a label.
///
/// `Id::NONE` means "no item"; hashing never produces it.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(pub u32);

impl Id {
    /// No item.
    pub const NONE: Self = Self(0);

    /// Whether this is [`Id::NONE`].
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Whether this names an item.
    pub const fn is_some(self) -> bool {
        self.0 != 0
    }

    /// Hash a string fragment on top of `seed`.
    ///
    /// A `"###"` inside `s` restarts the hash from [`Id::NONE`], so the result only
    /// depends on the text from there on.
    pub fn from_str_seeded(s: &str, seed: Self) -> Self {
        let bytes = s.as_bytes();
        let mut h = state(seed);
        for (i, &b) in bytes.iter().enumerate() {
            if b == b'#' && bytes[i..].starts_with(b"###") {
                h = FNV_OFFSET;
            }
            h = step(h, b);
        }
        finish(h)
    }

    /// Hash any fragment on top of `seed`.
    pub fn from_fragment(fragment: IdFragment<'_>, seed: Self) -> Self {
        match fragment {
            IdFragment::Str(s) => Self::from_str_seeded(s, seed),
            IdFragment::Int(i) => Self::from_bytes(&i.to_le_bytes(), seed),
            IdFragment::Ptr(p) => Self::from_bytes(&p.to_le_bytes(), seed),
        }
    }

    fn from_bytes(bytes: &[u8], seed: Self) -> Self {
        finish(bytes.iter().fold(state(seed), |h, &b| step(h, b)))
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({:#010x})", self.0)
    }
}

fn state(seed: Id) -> u32 {
    if seed.is_none() { FNV_OFFSET } else { seed.0 }
}

fn step(h: u32, b: u8) -> u32 {
    (h ^ u32::from(b)).wrapping_mul(FNV_PRIME)
}

fn finish(h: u32) -> Id {
    Id(if h == 0 { ZERO_REMAP } else { h })
}

/// One element of an ID path.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IdFragment<'a> {
    /// A label or string id; `"##"` and `"###"` rules apply.
    Str(&'a str),
    /// A loop index or other integer.
    Int(i64),
    /// A pointer-like identity (an address, an entity key).
    Ptr(u64),
}

impl<'a> From<&'a str> for IdFragment<'a> {
    fn from(s: &'a str) -> Self {
        Self::Str(s)
    }
}

impl<'a> From<&'a String> for IdFragment<'a> {
    fn from(s: &'a String) -> Self {
        Self::Str(s)
    }
}

impl From<i32> for IdFragment<'_> {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<i64> for IdFragment<'_> {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<usize> for IdFragment<'_> {
    fn from(i: usize) -> Self {
        Self::Ptr(i as u64)
    }
}

impl From<u64> for IdFragment<'_> {
    fn from(p: u64) -> Self {
        Self::Ptr(p)
    }
}

/// The part of `label` that is displayed: everything before the first `"##"`.
pub fn display_text(label: &str) -> &str {
    match label.find("##") {
        Some(i) => &label[..i],
        None => label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_path_same_id() {
        let seed = Id::from_str_seeded("Window", Id::NONE);
        assert_eq!(Id::from_str_seeded("OK", seed), Id::from_str_seeded("OK", seed));
        assert_ne!(
            Id::from_str_seeded("OK", seed),
            Id::from_str_seeded("OK", Id::from_str_seeded("Other", Id::NONE)),
            "the seed takes part in the hash"
        );
    }

    #[test]
    fn double_hash_keeps_whole_label() {
        let seed = Id::from_str_seeded("W", Id::NONE);
        assert_ne!(Id::from_str_seeded("Play##a", seed), Id::from_str_seeded("Play##b", seed));
        assert_eq!(display_text("Play##a"), "Play");
        assert_eq!(display_text("Plain"), "Plain");
    }

    #[test]
    fn triple_hash_ignores_prefix_and_path() {
        let a = Id::from_str_seeded("Saving###status", Id::from_str_seeded("A", Id::NONE));
        let b = Id::from_str_seeded("Loaded###status", Id::from_str_seeded("B", Id::NONE));
        assert_eq!(a, b);
        assert_eq!(a, Id::from_str_seeded("###status", Id::NONE));
        assert_eq!(display_text("Saving###status"), "Saving");
    }

    #[test]
    fn integer_and_pointer_fragments_differ() {
        let seed = Id::from_str_seeded("W", Id::NONE);
        let int = Id::from_fragment(IdFragment::from(7), seed);
        let ptr = Id::from_fragment(IdFragment::from(7_u64), seed);
        assert_ne!(int, ptr);
        assert_eq!(int, Id::from_fragment(IdFragment::Int(7), seed));
    }

    #[test]
    fn hashing_never_yields_none() {
        assert_eq!(finish(0), Id(ZERO_REMAP));
        for i in 0..1000 {
            assert!(Id::from_fragment(IdFragment::Int(i), Id::NONE).is_some(), "fragment {i}");
        }
    }
}
