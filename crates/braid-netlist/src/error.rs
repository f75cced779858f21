//! Error types for netlist validation

use thiserror::Error;

/// Result type for netlist operations
pub type Result<T> = std::result::Result<T, NetlistError>;

/// Structural errors in an elaborated netlist.
///
/// These are programmer bugs in the elaborator, not runtime conditions:
/// nothing is recovered, and every diagnostic names the offending net by
/// instance id.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NetlistError {
    /// A wire input references an instance id with no net behind it
    #[error("net {net}: wire input references missing net {target}")]
    MissingNet { net: u32, target: u32 },

    /// A wire input references an output port the target net does not have
    #[error("net {net}: wire input references port {port} of net {target}, which has {outputs} output(s)")]
    BadPortIndex {
        net: u32,
        target: u32,
        port: usize,
        outputs: usize,
    },

    /// A primitive was given the wrong number of inputs
    #[error("net {net}: {prim} expects {expected} input(s), found {found}")]
    BadArity {
        net: u32,
        prim: &'static str,
        expected: usize,
        found: usize,
    },

    /// A primitive input has the wrong width
    #[error("net {net}: input {index} of {prim} has width {found}, expected {expected}")]
    BadInputWidth {
        net: u32,
        prim: &'static str,
        index: usize,
        expected: usize,
        found: usize,
    },

    /// A bit slice reaches outside its input
    #[error("net {net}: bit slice [{hi}:{lo}] is not contained in width {width}")]
    BadSlice {
        net: u32,
        hi: usize,
        lo: usize,
        width: usize,
    },

    /// The same input port name was declared at two different widths
    #[error("input port '{name}' declared with widths {first} and {second}")]
    ConflictingInput {
        name: String,
        first: usize,
        second: usize,
    },

    /// Two output nets share a port name
    #[error("duplicate output port '{name}'")]
    DuplicateOutput { name: String },

    /// A primitive with no outputs was used as an operand
    #[error("net {net}: {prim} produces no value and cannot appear as an input")]
    VoidInput { net: u32, prim: &'static str },

    /// A register file is read or written before its declaring net
    #[error("net {net}: register file rf{rf} is used before it is declared")]
    RegFileOrder { net: u32, rf: u32 },
}
