//! Expression printing: net inputs to Verilog expression text.
//!
//! A net input is either a reference to a named wire or an inlined tree of
//! primitives. Trees rooted at an inlinable primitive render without
//! surrounding parentheses (their syntax is already self-delimiting); any
//! other tree is parenthesised before it joins the enclosing expression.

use braid_netlist::{InstId, Net, NetInput, Netlist, NetlistError, Prim};
use num_bigint::BigUint;

use crate::error::{CodegenError, Result};

/// Verilog integer literal: lowercase hex, no leading zeros.
/// The caller is responsible for passing a value that fits the width.
pub fn hex_literal(width: usize, value: &BigUint) -> String {
    format!("{}'h{:x}", width, value)
}

/// Don't-care literal: one `x` per bit
pub fn dont_care_literal(width: usize) -> String {
    format!("{}'b{}", width, "x".repeat(width))
}

/// Identifier of an output port: `hint_iid_port`, with `v` standing in when
/// the net has no hints. Hints come out of the sorted set, so the joined
/// prefix is reproducible no matter how they were accumulated.
pub fn wire_name(net: &Net, port: usize) -> String {
    if net.name_hints.is_empty() {
        format!("v_{}_{}", net.id.0, port)
    } else {
        let hints: Vec<&str> = net.name_hints.iter().map(String::as_str).collect();
        format!("{}_{}_{}", hints.join("_"), net.id.0, port)
    }
}

fn wire_ref(netlist: &Netlist, ctx: InstId, target: InstId, port: usize) -> Result<String> {
    let net = netlist.get(target).ok_or(NetlistError::MissingNet {
        net: ctx.0,
        target: target.0,
    })?;
    // References to an input net read the module port itself, which keeps
    // de-duplicated input nets interchangeable.
    if let Prim::Input { name, .. } = &net.prim {
        return Ok(name.clone());
    }
    Ok(wire_name(net, port))
}

/// Render a net input as a Verilog expression, parenthesised as needed.
/// `ctx` is the net the input belongs to, used in diagnostics.
pub fn net_input_expr(netlist: &Netlist, ctx: InstId, input: &NetInput) -> Result<String> {
    match input {
        NetInput::Wire(target, port) => wire_ref(netlist, ctx, *target, *port),
        NetInput::Tree(prim, children) => {
            let rendered = prim_expr(netlist, ctx, prim, children)?;
            if prim.is_inlinable() {
                Ok(rendered)
            } else {
                Ok(format!("({})", rendered))
            }
        }
    }
}

/// Render a primitive applied to its inputs, without outer parentheses.
/// This is also the top-level entry for a net's own `assign` right-hand side.
pub fn prim_expr(
    netlist: &Netlist,
    ctx: InstId,
    prim: &Prim,
    inputs: &[NetInput],
) -> Result<String> {
    let arg = |i: usize| net_input_expr(netlist, ctx, &inputs[i]);
    match prim {
        Prim::Add(_) => Ok(format!("{} + {}", arg(0)?, arg(1)?)),
        Prim::Sub(_) => Ok(format!("{} - {}", arg(0)?, arg(1)?)),
        Prim::Mul(_) => Ok(format!("{} * {}", arg(0)?, arg(1)?)),
        Prim::Div(_) => Ok(format!("{} / {}", arg(0)?, arg(1)?)),
        Prim::Mod(_) => Ok(format!("{} % {}", arg(0)?, arg(1)?)),
        Prim::And(_) => Ok(format!("{} & {}", arg(0)?, arg(1)?)),
        Prim::Or(_) => Ok(format!("{} | {}", arg(0)?, arg(1)?)),
        Prim::Xor(_) => Ok(format!("{} ^ {}", arg(0)?, arg(1)?)),
        Prim::ShiftLeft(_) => Ok(format!("{} << {}", arg(0)?, arg(1)?)),
        Prim::ShiftRight(_) => Ok(format!("{} >> {}", arg(0)?, arg(1)?)),
        Prim::ArithShiftRight(_) => Ok(format!("$signed({}) >>> {}", arg(0)?, arg(1)?)),
        Prim::Equal(_) => Ok(format!("{} == {}", arg(0)?, arg(1)?)),
        Prim::NotEqual(_) => Ok(format!("{} != {}", arg(0)?, arg(1)?)),
        Prim::LessThan(_) => Ok(format!("{} < {}", arg(0)?, arg(1)?)),
        Prim::LessThanEq(_) => Ok(format!("{} <= {}", arg(0)?, arg(1)?)),
        Prim::Not(_) => Ok(format!("~{}", arg(0)?)),
        Prim::ReplicateBit(w) => Ok(format!("{{{}{{{}}}}}", w, arg(0)?)),
        Prim::ZeroExtend {
            in_width,
            out_width,
        } => Ok(format!(
            "{{{{({}){{1'b0}}}}, {}}}",
            out_width - in_width,
            arg(0)?
        )),
        Prim::SignExtend {
            in_width,
            out_width,
        } => {
            let x = arg(0)?;
            Ok(format!(
                "{{{{({}){{{}[{}]}}}}, {}}}",
                out_width - in_width,
                x,
                in_width - 1,
                x
            ))
        }
        Prim::SelectBits { hi, lo, .. } => select_bits_expr(netlist, ctx, *hi, *lo, &inputs[0]),
        Prim::Concat(_, _) => Ok(format!("{{{}, {}}}", arg(0)?, arg(1)?)),
        Prim::Mux(_) => Ok(format!("{} ? {} : {}", arg(0)?, arg(1)?, arg(2)?)),
        Prim::CountOnes(_) => Ok(format!("$countones({})", arg(0)?)),
        Prim::Identity(_) => arg(0),
        Prim::Const { width, value } => Ok(hex_literal(*width, value)),
        Prim::DontCare(w) => Ok(dont_care_literal(*w)),
        other => Err(CodegenError::UnsupportedPrimitive {
            net: ctx.0,
            prim: other.name(),
        }),
    }
}

/// Bit selection. Verilog forbids indexing a parenthesised expression, so
/// the operand must be a wire or a constant; constants fold to a literal.
fn select_bits_expr(
    netlist: &Netlist,
    ctx: InstId,
    hi: usize,
    lo: usize,
    input: &NetInput,
) -> Result<String> {
    let slice_width = hi - lo + 1;
    match input {
        NetInput::Wire(target, port) => Ok(format!(
            "{}[{}:{}]",
            wire_ref(netlist, ctx, *target, *port)?,
            hi,
            lo
        )),
        NetInput::Tree(Prim::Const { value, .. }, _) => {
            let mask = (BigUint::from(1u32) << slice_width) - BigUint::from(1u32);
            let folded = (value >> lo) & mask;
            Ok(hex_literal(slice_width, &folded))
        }
        NetInput::Tree(Prim::DontCare(_), _) => Ok(dont_care_literal(slice_width)),
        NetInput::Tree(other, _) => Err(CodegenError::UnsupportedInline {
            net: ctx.0,
            prim: other.name(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals() {
        assert_eq!(hex_literal(16, &BigUint::from(0xabcdu32)), "16'habcd");
        assert_eq!(hex_literal(8, &BigUint::from(0u32)), "8'h0");
        assert_eq!(dont_care_literal(4), "4'bxxxx");
    }

    #[test]
    fn wire_names_fall_back_to_v() {
        let net = Net::new(42, Prim::Add(8), vec![]);
        assert_eq!(wire_name(&net, 0), "v_42_0");
    }

    #[test]
    fn wire_names_join_hints_in_sorted_order() {
        let net = Net::new(7, Prim::Add(8), vec![])
            .with_hint("sum")
            .with_hint("acc");
        assert_eq!(wire_name(&net, 0), "acc_sum_7_0");
    }

    #[test]
    fn inlinable_trees_render_bare_and_others_parenthesised() {
        let mut nl = Netlist::new();
        nl.add(Net::new(
            0,
            Prim::Const {
                width: 8,
                value: BigUint::from(5u32),
            },
            vec![],
        ));
        let a = || NetInput::Wire(InstId(0), 0);

        let inlined = NetInput::Tree(Prim::Not(8), vec![a()]);
        assert_eq!(
            net_input_expr(&nl, InstId(1), &inlined).unwrap(),
            "~v_0_0"
        );

        let wrapped = NetInput::Tree(Prim::Add(8), vec![a(), a()]);
        assert_eq!(
            net_input_expr(&nl, InstId(1), &wrapped).unwrap(),
            "(v_0_0 + v_0_0)"
        );
    }

    #[test]
    fn references_to_input_nets_read_the_port() {
        let mut nl = Netlist::new();
        nl.add(Net::new(
            0,
            Prim::Input {
                width: 8,
                name: "a".to_string(),
            },
            vec![],
        ));
        let input = NetInput::Wire(InstId(0), 0);
        assert_eq!(net_input_expr(&nl, InstId(1), &input).unwrap(), "a");
    }

    #[test]
    fn select_bits_folds_constants() {
        let nl = Netlist::new();
        let input = NetInput::Tree(
            Prim::Const {
                width: 16,
                value: BigUint::from(0xabcdu32),
            },
            vec![],
        );
        assert_eq!(
            select_bits_expr(&nl, InstId(0), 7, 4, &input).unwrap(),
            "4'hc"
        );
    }

    #[test]
    fn select_bits_over_dont_care_is_a_slice_of_x() {
        let nl = Netlist::new();
        let input = NetInput::Tree(Prim::DontCare(16), vec![]);
        assert_eq!(
            select_bits_expr(&nl, InstId(0), 5, 3, &input).unwrap(),
            "3'bxxx"
        );
    }

    #[test]
    fn select_bits_over_an_operator_tree_is_rejected() {
        let mut nl = Netlist::new();
        nl.add(Net::new(
            0,
            Prim::Input {
                width: 8,
                name: "a".to_string(),
            },
            vec![],
        ));
        let tree = NetInput::Tree(
            Prim::Add(8),
            vec![NetInput::Wire(InstId(0), 0), NetInput::Wire(InstId(0), 0)],
        );
        let err = select_bits_expr(&nl, InstId(3), 3, 0, &tree).unwrap_err();
        assert!(matches!(
            err,
            CodegenError::UnsupportedInline { net: 3, prim: "Add" }
        ));
    }

    #[test]
    fn stateful_primitives_have_no_expression_form() {
        let nl = Netlist::new();
        let tree = NetInput::Tree(
            Prim::Register {
                init: BigUint::from(0u32),
                width: 4,
            },
            vec![NetInput::Tree(
                Prim::Const {
                    width: 4,
                    value: BigUint::from(0u32),
                },
                vec![],
            )],
        );
        let err = net_input_expr(&nl, InstId(2), &tree).unwrap_err();
        assert!(matches!(
            err,
            CodegenError::UnsupportedPrimitive {
                net: 2,
                prim: "Register"
            }
        ));
    }
}
