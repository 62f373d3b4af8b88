//! Reference tables for canonicalizing job-posting fields.
//!
//! Tables are listed in `manifest.toml` under the reference root and loaded
//! once per run by [`ReferenceRegistry::load`]. Loading fails on the first
//! missing, corrupt or illegal table; after that the registry is read-only.

#![deny(unsafe_code)]

pub mod csv_utils;
pub mod currency;
pub mod error;
pub mod geo;
pub mod hash;
pub mod keys;
pub mod manifest;
pub mod paths;
pub mod registry;
pub mod roles;
pub mod signals;
pub mod skills;
pub mod table;

pub use crate::currency::CurrencyReference;
pub use crate::error::ReferenceError;
pub use crate::geo::{CityRef, CountryRef, GeoReference};
pub use crate::keys::{compact_key, find_phrase, lookup_key, tokenize, word_tokens};
pub use crate::paths::{REFERENCE_ENV_VAR, reference_root, resolve_reference_root};
pub use crate::registry::{Canonical, LoadedFile, MANIFEST_FILE, REQUIRED_ROLES, ReferenceRegistry};
pub use crate::roles::{RoleRule, RoleTaxonomy};
pub use crate::signals::SignalKeywords;
pub use crate::skills::{SkillRef, SkillReference};
pub use crate::table::AliasTable;
