//! Nets and the netlist view the code generator walks.
//!
//! A netlist is a sparse mapping from instance id to net; gaps are allowed
//! and iteration is always in ascending id order, which is what makes code
//! generation deterministic. Edges go from later nets to earlier (or equal)
//! net outputs, so the structure is a DAG referenced by id with no ownership
//! cycles.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::{NetlistError, Result};
use crate::primitive::Prim;

/// Stable instance id, unique within a netlist
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct InstId(pub u32);

/// The operand form of a primitive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NetInput {
    /// Reference to output port `1` of the net with id `0`
    Wire(InstId, usize),
    /// Inlined sub-expression, only legal where the printer accepts inlining
    Tree(Prim, Vec<NetInput>),
}

/// One node of the netlist: a primitive plus its input edges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Net {
    /// Instance id, used to generate wire names
    pub id: InstId,
    /// The primitive this net evaluates
    pub prim: Prim,
    /// Ordered inputs, matching the primitive's arity
    pub inputs: Vec<NetInput>,
    /// User-chosen name fragments; sorted so generated names are reproducible
    pub name_hints: BTreeSet<String>,
}

impl Net {
    pub fn new(id: u32, prim: Prim, inputs: Vec<NetInput>) -> Self {
        Self {
            id: InstId(id),
            prim,
            inputs,
            name_hints: BTreeSet::new(),
        }
    }

    /// Attach a name hint
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.name_hints.insert(hint.into());
        self
    }
}

/// Sparse, id-indexed collection of nets.
///
/// Immutable for the lifetime of code generation; the generator only reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Netlist {
    nets: BTreeMap<InstId, Net>,
}

impl Netlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a net, replacing any previous net with the same id
    pub fn add(&mut self, net: Net) {
        self.nets.insert(net.id, net);
    }

    pub fn get(&self, id: InstId) -> Option<&Net> {
        self.nets.get(&id)
    }

    /// All nets in ascending instance-id order
    pub fn nets(&self) -> impl Iterator<Item = &Net> {
        self.nets.values()
    }

    pub fn len(&self) -> usize {
        self.nets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nets.is_empty()
    }

    /// Module inputs derived from `Input` nets, de-duplicated by
    /// (width, name) preserving first-seen order
    pub fn module_inputs(&self) -> Vec<(usize, String)> {
        let mut seen: IndexSet<(usize, String)> = IndexSet::new();
        for net in self.nets() {
            if let Prim::Input { width, name } = &net.prim {
                seen.insert((*width, name.clone()));
            }
        }
        seen.into_iter().collect()
    }

    /// Module outputs derived from `Output` nets, in net-id order
    pub fn module_outputs(&self) -> Vec<(usize, String)> {
        self.nets()
            .filter_map(|net| match &net.prim {
                Prim::Output { width, name } => Some((*width, name.clone())),
                _ => None,
            })
            .collect()
    }

    /// Check the structural invariants code generation relies on.
    ///
    /// Covers wire references (existing target, in-range port), arity and
    /// input widths against the primitive taxonomy, bit-slice bounds, port
    /// name uniqueness, and register-file declaration order.
    pub fn validate(&self) -> Result<()> {
        let mut input_ports: HashMap<String, usize> = HashMap::new();
        let mut output_ports: HashSet<String> = HashSet::new();
        let mut declared_rfs: HashSet<u32> = HashSet::new();

        for net in self.nets() {
            check_prim(net.id, &net.prim)?;

            let expected = net.prim.num_inputs();
            if net.inputs.len() != expected {
                return Err(NetlistError::BadArity {
                    net: net.id.0,
                    prim: net.prim.name(),
                    expected,
                    found: net.inputs.len(),
                });
            }
            for (index, (input, want)) in net
                .inputs
                .iter()
                .zip(net.prim.input_widths())
                .enumerate()
            {
                let found = self.input_width(net.id, input)?;
                if let Some(want) = want {
                    if found != want {
                        return Err(NetlistError::BadInputWidth {
                            net: net.id.0,
                            prim: net.prim.name(),
                            index,
                            expected: want,
                            found,
                        });
                    }
                }
            }

            match &net.prim {
                Prim::Input { width, name } => {
                    if let Some(&first) = input_ports.get(name) {
                        if first != *width {
                            return Err(NetlistError::ConflictingInput {
                                name: name.clone(),
                                first,
                                second: *width,
                            });
                        }
                    } else {
                        input_ports.insert(name.clone(), *width);
                    }
                }
                Prim::Output { name, .. } => {
                    if !output_ports.insert(name.clone()) {
                        return Err(NetlistError::DuplicateOutput { name: name.clone() });
                    }
                }
                Prim::RegFileMake { rf_id, .. } => {
                    declared_rfs.insert(*rf_id);
                }
                Prim::RegFileRead { rf_id, .. } | Prim::RegFileWrite { rf_id, .. } => {
                    if !declared_rfs.contains(rf_id) {
                        return Err(NetlistError::RegFileOrder {
                            net: net.id.0,
                            rf: *rf_id,
                        });
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Width of a net input, checking the sub-structure along the way.
    /// `ctx` is the net the input belongs to, used in diagnostics.
    fn input_width(&self, ctx: InstId, input: &NetInput) -> Result<usize> {
        match input {
            NetInput::Wire(target, port) => {
                let target_net = self.get(*target).ok_or(NetlistError::MissingNet {
                    net: ctx.0,
                    target: target.0,
                })?;
                let outputs = target_net.prim.output_widths();
                outputs
                    .get(*port)
                    .copied()
                    .ok_or(NetlistError::BadPortIndex {
                        net: ctx.0,
                        target: target.0,
                        port: *port,
                        outputs: outputs.len(),
                    })
            }
            NetInput::Tree(prim, children) => {
                check_prim(ctx, prim)?;
                let expected = prim.num_inputs();
                if children.len() != expected {
                    return Err(NetlistError::BadArity {
                        net: ctx.0,
                        prim: prim.name(),
                        expected,
                        found: children.len(),
                    });
                }
                for (index, (child, want)) in
                    children.iter().zip(prim.input_widths()).enumerate()
                {
                    let found = self.input_width(ctx, child)?;
                    if let Some(want) = want {
                        if found != want {
                            return Err(NetlistError::BadInputWidth {
                                net: ctx.0,
                                prim: prim.name(),
                                index,
                                expected: want,
                                found,
                            });
                        }
                    }
                }
                prim.output_widths()
                    .first()
                    .copied()
                    .ok_or(NetlistError::VoidInput {
                        net: ctx.0,
                        prim: prim.name(),
                    })
            }
        }
    }
}

/// Per-primitive parameter checks that do not need the surrounding netlist
fn check_prim(id: InstId, prim: &Prim) -> Result<()> {
    if let Prim::SelectBits { width, hi, lo } = prim {
        if hi >= width || lo > hi {
            return Err(NetlistError::BadSlice {
                net: id.0,
                hi: *hi,
                lo: *lo,
                width: *width,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;

    fn input(id: u32, width: usize, name: &str) -> Net {
        Net::new(
            id,
            Prim::Input {
                width,
                name: name.to_string(),
            },
            vec![],
        )
    }

    #[test]
    fn iteration_is_ascending_with_gaps() {
        let mut nl = Netlist::new();
        nl.add(input(7, 8, "c"));
        nl.add(input(0, 8, "a"));
        nl.add(input(3, 8, "b"));
        let ids: Vec<u32> = nl.nets().map(|n| n.id.0).collect();
        assert_eq!(ids, vec![0, 3, 7]);
    }

    #[test]
    fn module_inputs_deduplicate_by_width_and_name() {
        let mut nl = Netlist::new();
        nl.add(input(0, 1, "clk_en"));
        nl.add(input(1, 8, "a"));
        nl.add(input(2, 1, "clk_en"));
        assert_eq!(
            nl.module_inputs(),
            vec![(1, "clk_en".to_string()), (8, "a".to_string())]
        );
        assert!(nl.validate().is_ok());
    }

    #[test]
    fn dangling_wire_is_rejected() {
        let mut nl = Netlist::new();
        nl.add(Net::new(
            0,
            Prim::Not(4),
            vec![NetInput::Wire(InstId(9), 0)],
        ));
        assert_eq!(
            nl.validate(),
            Err(NetlistError::MissingNet { net: 0, target: 9 })
        );
    }

    #[test]
    fn out_of_range_port_is_rejected() {
        let mut nl = Netlist::new();
        nl.add(input(0, 4, "a"));
        nl.add(Net::new(
            1,
            Prim::Not(4),
            vec![NetInput::Wire(InstId(0), 1)],
        ));
        assert_eq!(
            nl.validate(),
            Err(NetlistError::BadPortIndex {
                net: 1,
                target: 0,
                port: 1,
                outputs: 1
            })
        );
    }

    #[test]
    fn arity_and_width_mismatches_are_rejected() {
        let mut nl = Netlist::new();
        nl.add(input(0, 8, "a"));
        nl.add(Net::new(1, Prim::Add(8), vec![NetInput::Wire(InstId(0), 0)]));
        assert_eq!(
            nl.validate(),
            Err(NetlistError::BadArity {
                net: 1,
                prim: "Add",
                expected: 2,
                found: 1
            })
        );

        let mut nl = Netlist::new();
        nl.add(input(0, 8, "a"));
        nl.add(input(1, 4, "b"));
        nl.add(Net::new(
            2,
            Prim::Add(8),
            vec![NetInput::Wire(InstId(0), 0), NetInput::Wire(InstId(1), 0)],
        ));
        assert_eq!(
            nl.validate(),
            Err(NetlistError::BadInputWidth {
                net: 2,
                prim: "Add",
                index: 1,
                expected: 8,
                found: 4
            })
        );
    }

    #[test]
    fn conflicting_input_widths_are_rejected() {
        let mut nl = Netlist::new();
        nl.add(input(0, 1, "en"));
        nl.add(input(1, 2, "en"));
        assert_eq!(
            nl.validate(),
            Err(NetlistError::ConflictingInput {
                name: "en".to_string(),
                first: 1,
                second: 2
            })
        );
    }

    #[test]
    fn duplicate_outputs_are_rejected() {
        let mut nl = Netlist::new();
        nl.add(input(0, 8, "a"));
        nl.add(Net::new(
            1,
            Prim::Output {
                width: 8,
                name: "y".to_string(),
            },
            vec![NetInput::Wire(InstId(0), 0)],
        ));
        nl.add(Net::new(
            2,
            Prim::Output {
                width: 8,
                name: "y".to_string(),
            },
            vec![NetInput::Wire(InstId(0), 0)],
        ));
        assert_eq!(
            nl.validate(),
            Err(NetlistError::DuplicateOutput {
                name: "y".to_string()
            })
        );
    }

    #[test]
    fn regfile_use_before_make_is_rejected() {
        let mut nl = Netlist::new();
        nl.add(input(0, 5, "addr"));
        nl.add(Net::new(
            1,
            Prim::RegFileRead { width: 8, rf_id: 0 },
            vec![NetInput::Wire(InstId(0), 0)],
        ));
        nl.add(Net::new(
            2,
            Prim::RegFileMake {
                init_file: None,
                addr_width: 5,
                data_width: 8,
                rf_id: 0,
            },
            vec![],
        ));
        assert_eq!(
            nl.validate(),
            Err(NetlistError::RegFileOrder { net: 1, rf: 0 })
        );
    }

    #[test]
    fn tree_inputs_are_checked_recursively() {
        let mut nl = Netlist::new();
        nl.add(Net::new(
            0,
            Prim::Not(4),
            vec![NetInput::Tree(
                Prim::Const {
                    width: 8,
                    value: BigUint::from(0xffu32),
                },
                vec![],
            )],
        ));
        assert_eq!(
            nl.validate(),
            Err(NetlistError::BadInputWidth {
                net: 0,
                prim: "Not",
                index: 0,
                expected: 4,
                found: 8
            })
        );
    }

    #[test]
    fn bad_slice_is_rejected() {
        let mut nl = Netlist::new();
        nl.add(input(0, 8, "a"));
        nl.add(Net::new(
            1,
            Prim::SelectBits {
                width: 8,
                hi: 8,
                lo: 0,
            },
            vec![NetInput::Wire(InstId(0), 0)],
        ));
        assert_eq!(
            nl.validate(),
            Err(NetlistError::BadSlice {
                net: 1,
                hi: 8,
                lo: 0,
                width: 8
            })
        );
    }
}
