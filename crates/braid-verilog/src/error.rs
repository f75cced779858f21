//! Error types for Verilog generation

use braid_netlist::NetlistError;
use thiserror::Error;

/// Result type for code generation
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors that abort code generation.
///
/// Netlist errors are programmer bugs in the elaborator; I/O errors are
/// reported verbatim from the OS layer. Nothing is recovered.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// The netlist violates a structural invariant
    #[error(transparent)]
    Netlist(#[from] NetlistError),

    /// Bit selection of an expression Verilog cannot index
    #[error("net {net}: cannot select bits of a {prim} expression")]
    UnsupportedInline { net: u32, prim: &'static str },

    /// A primitive with no expression form was used inside a tree
    #[error("net {net}: {prim} cannot appear inside an expression")]
    UnsupportedPrimitive { net: u32, prim: &'static str },

    /// Output directory creation or file write failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
