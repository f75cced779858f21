//! braid-verilog - Verilog code generation
//!
//! This crate lowers an elaborated [`braid_netlist::Netlist`] into a single
//! synthesizable Verilog module, and optionally the Verilator simulation
//! harness around it:
//!
//! ```text
//! Netlist → generate_verilog → <mod>.v
//!         → write_verilog_top → <mod>.v + <mod>.cpp + <mod>.mk + Makefile
//! ```
//!
//! Generation is pure and deterministic: the same netlist and module name
//! produce byte-identical output on every run and platform.

pub mod codegen;
pub mod error;
pub mod expr;
pub mod harness;

pub use codegen::generate_verilog;
pub use error::{CodegenError, Result};
pub use harness::{write_verilog_module, write_verilog_top};
