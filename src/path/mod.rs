//! Route path derivation: normalization, slug derivation, locale expansion.
//!
//! # Module Structure
//!
//! - [`normalize`]: raw strings to [`CanonicalPath`](crate::core::CanonicalPath)
//! - [`slug`]: slug field to canonical path, per category
//! - [`expand`]: canonical path to per-locale route paths, and back

pub mod expand;
pub mod normalize;
pub mod slug;

pub use expand::{
    ExpandError, PathSet, canonical_to_localized_paths, expand, localize, strip_locale,
};
pub use normalize::{
    PathOwner, ValidationError, normalize, normalize_for, normalize_lenient, validate,
};
pub use slug::derive_canonical;
