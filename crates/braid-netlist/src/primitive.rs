//! Closed taxonomy of hardware primitives.
//!
//! Every net in a netlist carries exactly one [`Prim`]. The set is closed:
//! the Verilog back end dispatches with exhaustive matches, and anything a
//! target cannot express is caught at that level rather than through dynamic
//! extension points.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::display::DisplayFormat;

/// A hardware primitive with its static parameters.
///
/// Widths are in bits. Unless a variant says otherwise, a primitive has a
/// single output of the width named by its parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Prim {
    // === Arithmetic ===
    /// Addition of two w-bit values
    Add(usize),
    /// Subtraction of two w-bit values
    Sub(usize),
    /// Multiplication of two w-bit values
    Mul(usize),
    /// Division of two w-bit values
    Div(usize),
    /// Modulus of two w-bit values
    Mod(usize),

    // === Bitwise logic ===
    /// Bitwise AND of two w-bit values
    And(usize),
    /// Bitwise OR of two w-bit values
    Or(usize),
    /// Bitwise XOR of two w-bit values
    Xor(usize),
    /// Bitwise complement of a w-bit value
    Not(usize),

    // === Shifts ===
    /// Logical shift left
    ShiftLeft(usize),
    /// Logical shift right
    ShiftRight(usize),
    /// Arithmetic shift right (signed semantics)
    ArithShiftRight(usize),

    // === Comparison (output width 1) ===
    /// Equality of two w-bit values
    Equal(usize),
    /// Disequality of two w-bit values
    NotEqual(usize),
    /// Unsigned less-than of two w-bit values
    LessThan(usize),
    /// Unsigned less-than-or-equal of two w-bit values
    LessThanEq(usize),

    // === Width adjustment ===
    /// Replicate a single bit w times
    ReplicateBit(usize),
    /// Zero-extend from `in_width` to `out_width`
    ZeroExtend { in_width: usize, out_width: usize },
    /// Sign-extend from `in_width` to `out_width`
    SignExtend { in_width: usize, out_width: usize },
    /// Select bits `hi` down to `lo` of a `width`-bit input
    SelectBits { width: usize, hi: usize, lo: usize },
    /// Concatenate a `wa`-bit value (high half) with a `wb`-bit value
    Concat(usize, usize),

    // === Selection and misc combinational ===
    /// Two-way multiplexer (inputs: [sel, on_true, on_false])
    Mux(usize),
    /// Population count of a w-bit value
    CountOnes(usize),
    /// Pass-through of a w-bit value
    Identity(usize),

    // === Sources ===
    /// Constant value of the given width
    Const { width: usize, value: BigUint },
    /// Don't-care value of the given width
    DontCare(usize),

    // === State ===
    /// Register, loaded every cycle (input: [data])
    Register { init: BigUint, width: usize },
    /// Register with enable (inputs: [enable, data])
    RegisterEn { init: BigUint, width: usize },
    /// Single-port block RAM (inputs: [addr, data_in, write_enable])
    Bram {
        init_file: Option<String>,
        addr_width: usize,
        data_width: usize,
    },
    /// True dual-port block RAM; inputs 0..2 are port A, 3..5 port B
    TrueDualBram {
        init_file: Option<String>,
        addr_width: usize,
        data_width: usize,
    },

    // === Simulation only ===
    /// Conditional `$write` (inputs: [enable, one per bit slot of the schema])
    Display(DisplayFormat),
    /// Conditional `$finish` (input: [enable])
    Finish,
    /// Plusarg test, 1 when the string was passed on the simulator command line
    TestPlusArgs(String),

    // === Module interface ===
    /// Module input port of the given width
    Input { width: usize, name: String },
    /// Module output port of the given width (input: [value])
    Output { width: usize, name: String },

    // === Register files ===
    /// Declare register file `rf_id`, optionally initialised from a hex file
    RegFileMake {
        init_file: Option<String>,
        addr_width: usize,
        data_width: usize,
        rf_id: u32,
    },
    /// Asynchronous register file read (input: [addr])
    RegFileRead { width: usize, rf_id: u32 },
    /// Synchronous register file write (inputs: [enable, addr, data_in])
    RegFileWrite {
        addr_width: usize,
        data_width: usize,
        rf_id: u32,
    },

    // === External ===
    /// Instantiation of an externally defined Verilog module
    Custom {
        /// Module name as instantiated
        name: String,
        /// Input port names and widths, in connection order
        inputs: Vec<(String, usize)>,
        /// Output port names and widths, in connection order
        outputs: Vec<(String, usize)>,
        /// Verilog parameters as (key, value) pairs
        params: Vec<(String, String)>,
        /// Whether the module receives the clock/reset pair
        clocked: bool,
    },
}

impl Prim {
    /// Number of inputs this primitive consumes
    pub fn num_inputs(&self) -> usize {
        match self {
            Prim::Add(_)
            | Prim::Sub(_)
            | Prim::Mul(_)
            | Prim::Div(_)
            | Prim::Mod(_)
            | Prim::And(_)
            | Prim::Or(_)
            | Prim::Xor(_)
            | Prim::ShiftLeft(_)
            | Prim::ShiftRight(_)
            | Prim::ArithShiftRight(_)
            | Prim::Equal(_)
            | Prim::NotEqual(_)
            | Prim::LessThan(_)
            | Prim::LessThanEq(_)
            | Prim::Concat(_, _)
            | Prim::RegisterEn { .. } => 2,
            Prim::Not(_)
            | Prim::ReplicateBit(_)
            | Prim::ZeroExtend { .. }
            | Prim::SignExtend { .. }
            | Prim::SelectBits { .. }
            | Prim::CountOnes(_)
            | Prim::Identity(_)
            | Prim::Register { .. }
            | Prim::Finish
            | Prim::Output { .. }
            | Prim::RegFileRead { .. } => 1,
            Prim::Mux(_) | Prim::Bram { .. } | Prim::RegFileWrite { .. } => 3,
            Prim::TrueDualBram { .. } => 6,
            Prim::Const { .. }
            | Prim::DontCare(_)
            | Prim::TestPlusArgs(_)
            | Prim::Input { .. }
            | Prim::RegFileMake { .. } => 0,
            Prim::Display(fmt) => 1 + fmt.bit_widths().len(),
            Prim::Custom { inputs, .. } => inputs.len(),
        }
    }

    /// Widths of this primitive's outputs, one entry per output port
    pub fn output_widths(&self) -> Vec<usize> {
        match self {
            Prim::Add(w)
            | Prim::Sub(w)
            | Prim::Mul(w)
            | Prim::Div(w)
            | Prim::Mod(w)
            | Prim::And(w)
            | Prim::Or(w)
            | Prim::Xor(w)
            | Prim::Not(w)
            | Prim::ShiftLeft(w)
            | Prim::ShiftRight(w)
            | Prim::ArithShiftRight(w)
            | Prim::ReplicateBit(w)
            | Prim::Mux(w)
            | Prim::CountOnes(w)
            | Prim::Identity(w)
            | Prim::DontCare(w) => vec![*w],
            Prim::Equal(_)
            | Prim::NotEqual(_)
            | Prim::LessThan(_)
            | Prim::LessThanEq(_)
            | Prim::TestPlusArgs(_) => vec![1],
            Prim::ZeroExtend { out_width, .. } | Prim::SignExtend { out_width, .. } => {
                vec![*out_width]
            }
            Prim::SelectBits { hi, lo, .. } => vec![hi - lo + 1],
            Prim::Concat(wa, wb) => vec![wa + wb],
            Prim::Const { width, .. } => vec![*width],
            Prim::Register { width, .. } | Prim::RegisterEn { width, .. } => vec![*width],
            Prim::Bram { data_width, .. } => vec![*data_width],
            Prim::TrueDualBram { data_width, .. } => vec![*data_width, *data_width],
            Prim::Input { width, .. } => vec![*width],
            Prim::RegFileRead { width, .. } => vec![*width],
            Prim::Display(_)
            | Prim::Finish
            | Prim::Output { .. }
            | Prim::RegFileMake { .. }
            | Prim::RegFileWrite { .. } => vec![],
            Prim::Custom { outputs, .. } => outputs.iter().map(|(_, w)| *w).collect(),
        }
    }

    /// Expected input widths, where the variant fixes them.
    ///
    /// `None` marks a slot whose width is not carried by the primitive (the
    /// register file read address); arity is still checked for those.
    pub fn input_widths(&self) -> Vec<Option<usize>> {
        match self {
            Prim::Add(w)
            | Prim::Sub(w)
            | Prim::Mul(w)
            | Prim::Div(w)
            | Prim::Mod(w)
            | Prim::And(w)
            | Prim::Or(w)
            | Prim::Xor(w)
            | Prim::ShiftLeft(w)
            | Prim::ShiftRight(w)
            | Prim::ArithShiftRight(w)
            | Prim::Equal(w)
            | Prim::NotEqual(w)
            | Prim::LessThan(w)
            | Prim::LessThanEq(w) => vec![Some(*w); 2],
            Prim::Not(w) | Prim::CountOnes(w) | Prim::Identity(w) => vec![Some(*w)],
            Prim::ReplicateBit(_) => vec![Some(1)],
            Prim::ZeroExtend { in_width, .. } | Prim::SignExtend { in_width, .. } => {
                vec![Some(*in_width)]
            }
            Prim::SelectBits { width, .. } => vec![Some(*width)],
            Prim::Concat(wa, wb) => vec![Some(*wa), Some(*wb)],
            Prim::Mux(w) => vec![Some(1), Some(*w), Some(*w)],
            Prim::Const { .. }
            | Prim::DontCare(_)
            | Prim::TestPlusArgs(_)
            | Prim::Input { .. }
            | Prim::RegFileMake { .. } => vec![],
            Prim::Register { width, .. } => vec![Some(*width)],
            Prim::RegisterEn { width, .. } => vec![Some(1), Some(*width)],
            Prim::Bram {
                addr_width,
                data_width,
                ..
            } => vec![Some(*addr_width), Some(*data_width), Some(1)],
            Prim::TrueDualBram {
                addr_width,
                data_width,
                ..
            } => vec![
                Some(*addr_width),
                Some(*data_width),
                Some(1),
                Some(*addr_width),
                Some(*data_width),
                Some(1),
            ],
            Prim::Display(fmt) => {
                let mut widths = vec![Some(1)];
                widths.extend(fmt.bit_widths().into_iter().map(Some));
                widths
            }
            Prim::Finish => vec![Some(1)],
            Prim::Output { width, .. } => vec![Some(*width)],
            Prim::RegFileRead { .. } => vec![None],
            Prim::RegFileWrite {
                addr_width,
                data_width,
                ..
            } => vec![Some(1), Some(*addr_width), Some(*data_width)],
            Prim::Custom { inputs, .. } => inputs.iter().map(|(_, w)| Some(*w)).collect(),
        }
    }

    /// Whether this primitive may be rendered inside an enclosing expression
    /// without a named intermediate wire.
    ///
    /// The set is deliberately conservative: only syntax that is
    /// self-delimiting in Verilog (unary, brace-bracketed, indexed, or a
    /// function call). Infix operators always become named wires.
    pub fn is_inlinable(&self) -> bool {
        matches!(
            self,
            Prim::Const { .. }
                | Prim::DontCare(_)
                | Prim::Not(_)
                | Prim::ReplicateBit(_)
                | Prim::ZeroExtend { .. }
                | Prim::SignExtend { .. }
                | Prim::SelectBits { .. }
                | Prim::Concat(_, _)
                | Prim::CountOnes(_)
                | Prim::Identity(_)
        )
    }

    /// Stable tag for diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Prim::Add(_) => "Add",
            Prim::Sub(_) => "Sub",
            Prim::Mul(_) => "Mul",
            Prim::Div(_) => "Div",
            Prim::Mod(_) => "Mod",
            Prim::And(_) => "And",
            Prim::Or(_) => "Or",
            Prim::Xor(_) => "Xor",
            Prim::Not(_) => "Not",
            Prim::ShiftLeft(_) => "ShiftLeft",
            Prim::ShiftRight(_) => "ShiftRight",
            Prim::ArithShiftRight(_) => "ArithShiftRight",
            Prim::Equal(_) => "Equal",
            Prim::NotEqual(_) => "NotEqual",
            Prim::LessThan(_) => "LessThan",
            Prim::LessThanEq(_) => "LessThanEq",
            Prim::ReplicateBit(_) => "ReplicateBit",
            Prim::ZeroExtend { .. } => "ZeroExtend",
            Prim::SignExtend { .. } => "SignExtend",
            Prim::SelectBits { .. } => "SelectBits",
            Prim::Concat(_, _) => "Concat",
            Prim::Mux(_) => "Mux",
            Prim::CountOnes(_) => "CountOnes",
            Prim::Identity(_) => "Identity",
            Prim::Const { .. } => "Const",
            Prim::DontCare(_) => "DontCare",
            Prim::Register { .. } => "Register",
            Prim::RegisterEn { .. } => "RegisterEn",
            Prim::Bram { .. } => "Bram",
            Prim::TrueDualBram { .. } => "TrueDualBram",
            Prim::Display(_) => "Display",
            Prim::Finish => "Finish",
            Prim::TestPlusArgs(_) => "TestPlusArgs",
            Prim::Input { .. } => "Input",
            Prim::Output { .. } => "Output",
            Prim::RegFileMake { .. } => "RegFileMake",
            Prim::RegFileRead { .. } => "RegFileRead",
            Prim::RegFileWrite { .. } => "RegFileWrite",
            Prim::Custom { .. } => "Custom",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_and_widths_follow_the_taxonomy() {
        let add = Prim::Add(8);
        assert_eq!(add.num_inputs(), 2);
        assert_eq!(add.output_widths(), vec![8]);
        assert_eq!(add.input_widths(), vec![Some(8), Some(8)]);

        let eq = Prim::Equal(16);
        assert_eq!(eq.output_widths(), vec![1]);

        let sel = Prim::SelectBits {
            width: 16,
            hi: 7,
            lo: 4,
        };
        assert_eq!(sel.output_widths(), vec![4]);

        let concat = Prim::Concat(8, 4);
        assert_eq!(concat.output_widths(), vec![12]);

        let bram = Prim::TrueDualBram {
            init_file: None,
            addr_width: 10,
            data_width: 32,
        };
        assert_eq!(bram.num_inputs(), 6);
        assert_eq!(bram.output_widths(), vec![32, 32]);
    }

    #[test]
    fn display_arity_counts_bit_slots() {
        let fmt = DisplayFormat::new().str("x=").bit(8).str(" y=").bit(4);
        let display = Prim::Display(fmt);
        assert_eq!(display.num_inputs(), 3);
        assert_eq!(
            display.input_widths(),
            vec![Some(1), Some(8), Some(4)]
        );
        assert!(display.output_widths().is_empty());
    }

    #[test]
    fn inlinable_set_is_the_self_delimiting_one() {
        assert!(Prim::Not(4).is_inlinable());
        assert!(Prim::Concat(2, 2).is_inlinable());
        assert!(Prim::Identity(4).is_inlinable());
        assert!(!Prim::Add(4).is_inlinable());
        assert!(!Prim::Mux(4).is_inlinable());
        assert!(!Prim::Register {
            init: BigUint::from(0u32),
            width: 4
        }
        .is_inlinable());
    }
}
