//! Codegen-time failures (§7). Structural/logic, both fatal.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("could not resolve path {path:?}{}", suggestion_suffix(.suggestion))]
    Resolution {
        path: String,
        suggestion: Option<String>,
    },

    #[error("name conflict: {name:?} is already a top-level instruction or arg identifier")]
    NameConflict { name: String },

    #[error("unsupported feature on {node}: {feature}")]
    Unsupported { node: String, feature: String },

    #[error("instruction {instruction:?} discriminant kind does not match the program's chosen discriminator encoding")]
    DiscriminatorMismatch { instruction: String },

    #[error("unknown enum index: {0}")]
    UnknownEnumIndex(u32),

    #[error(transparent)]
    Idl(#[from] anchorgen_idl::error::IdlError),
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean {s:?}?)"),
        None => String::new(),
    }
}
