//! braid-netlist - Elaborated netlist representation
//!
//! This crate holds the data model the Verilog back end consumes:
//!
//! ```text
//! elaboration → Netlist → braid-verilog → Verilog source
//! ```
//!
//! Key types:
//! - [`Netlist`] - Sparse, id-indexed collection of nets
//! - [`Net`] - One primitive plus its input edges and name hints
//! - [`Prim`] - Closed taxonomy of hardware primitives
//! - [`NetInput`] - Operand form: wire reference or inlined expression tree
//!
//! The netlist is immutable once handed to code generation; everything here
//! is plain data with serde derives so designs can be stored and reloaded.

pub mod display;
pub mod error;
pub mod netlist;
pub mod primitive;

pub use display::{DisplayFormat, FormatItem};
pub use error::{NetlistError, Result};
pub use netlist::{InstId, Net, NetInput, Netlist};
pub use primitive::Prim;
