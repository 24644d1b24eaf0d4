//! IDL parsing and type system for the anchorgen client generator.
//!
//! This crate provides the discriminated-union AST (`types`), the JSON
//! loader (`parse`), discriminator derivation (`discriminator`), and
//! fuzzy name-resolution diagnostics (`search`) described in §3-§4 of the
//! generator specification. It has no knowledge of any target language —
//! that belongs to `anchorgen-codegen`.

pub mod discriminator;
pub mod error;
pub mod parse;
pub mod search;
pub mod types;

pub use discriminator::*;
pub use error::*;
pub use parse::*;
pub use search::*;
pub use types::*;
