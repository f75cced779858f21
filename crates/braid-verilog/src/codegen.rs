//! Module assembly: netlist to Verilog source text.
//!
//! Generation is a single pass in ascending net-id order. Each net
//! contributes up to four pieces: a declaration, a continuous assignment or
//! module instance, a statement in the clocked always block, and a statement
//! in the synchronous-reset branch. The pieces are then interleaved into a
//! fixed module skeleton. Given the same netlist and module name the output
//! is byte-identical across runs; every container on the emit path iterates
//! in a defined order.

use braid_netlist::{FormatItem, Net, Netlist, Prim};

use crate::error::Result;
use crate::expr::{dont_care_literal, hex_literal, net_input_expr, prim_expr, wire_name};

/// Generate the Verilog module for an elaborated netlist.
///
/// The netlist is validated first; generation never observes a malformed
/// netlist. `module_name` must be a legal Verilog identifier.
pub fn generate_verilog(netlist: &Netlist, module_name: &str) -> Result<String> {
    netlist.validate()?;

    let mut sections = Sections::default();
    for net in netlist.nets() {
        emit_net(netlist, net, &mut sections)?;
    }
    Ok(assemble(netlist, module_name, &sections))
}

/// Per-section contribution buffers, filled in net-id order
#[derive(Default)]
struct Sections {
    decls: Vec<String>,
    insts: Vec<String>,
    always: Vec<String>,
    resets: Vec<String>,
}

fn emit_net(netlist: &Netlist, net: &Net, out: &mut Sections) -> Result<()> {
    let id = net.id;
    match &net.prim {
        // Pure combinational primitives become a wire plus one assign whose
        // right-hand side is the printed expression over the net's inputs.
        Prim::Add(_)
        | Prim::Sub(_)
        | Prim::Mul(_)
        | Prim::Div(_)
        | Prim::Mod(_)
        | Prim::And(_)
        | Prim::Or(_)
        | Prim::Xor(_)
        | Prim::Not(_)
        | Prim::ShiftLeft(_)
        | Prim::ShiftRight(_)
        | Prim::ArithShiftRight(_)
        | Prim::Equal(_)
        | Prim::NotEqual(_)
        | Prim::LessThan(_)
        | Prim::LessThanEq(_)
        | Prim::ReplicateBit(_)
        | Prim::ZeroExtend { .. }
        | Prim::SignExtend { .. }
        | Prim::SelectBits { .. }
        | Prim::Concat(_, _)
        | Prim::Mux(_)
        | Prim::CountOnes(_)
        | Prim::Identity(_) => {
            let name = wire_name(net, 0);
            let width = net.prim.output_widths()[0];
            out.decls.push(format!("wire [{}:0] {};", width - 1, name));
            out.insts.push(format!(
                "assign {} = {};",
                name,
                prim_expr(netlist, id, &net.prim, &net.inputs)?
            ));
        }
        Prim::Const { width, value } => {
            out.decls.push(format!(
                "wire [{}:0] {} = {};",
                width - 1,
                wire_name(net, 0),
                hex_literal(*width, value)
            ));
        }
        Prim::DontCare(width) => {
            out.decls.push(format!(
                "wire [{}:0] {} = {};",
                width - 1,
                wire_name(net, 0),
                dont_care_literal(*width)
            ));
        }
        Prim::Register { init, width } => {
            let name = wire_name(net, 0);
            let init = hex_literal(*width, init);
            out.decls
                .push(format!("reg [{}:0] {} = {};", width - 1, name, init));
            out.always.push(format!(
                "{} <= {};",
                name,
                net_input_expr(netlist, id, &net.inputs[0])?
            ));
            out.resets.push(format!("{} <= {};", name, init));
        }
        Prim::RegisterEn { init, width } => {
            let name = wire_name(net, 0);
            let init = hex_literal(*width, init);
            out.decls
                .push(format!("reg [{}:0] {} = {};", width - 1, name, init));
            out.always.push(format!(
                "if ({} == 1) {} <= {};",
                net_input_expr(netlist, id, &net.inputs[0])?,
                name,
                net_input_expr(netlist, id, &net.inputs[1])?
            ));
            out.resets.push(format!("{} <= {};", name, init));
        }
        Prim::Bram {
            init_file,
            addr_width,
            data_width,
        } => {
            let name = wire_name(net, 0);
            out.decls
                .push(format!("wire [{}:0] {};", data_width - 1, name));
            out.insts.push(format!(
                "BlockRAM#(.INIT_FILE({}), .ADDR_WIDTH({}), .DATA_WIDTH({})) ram{} (.CLK(clock), .DI({}), .ADDR({}), .WE({}), .DO({}));",
                init_file_param(init_file),
                addr_width,
                data_width,
                id.0,
                net_input_expr(netlist, id, &net.inputs[1])?,
                net_input_expr(netlist, id, &net.inputs[0])?,
                net_input_expr(netlist, id, &net.inputs[2])?,
                name
            ));
        }
        Prim::TrueDualBram {
            init_file,
            addr_width,
            data_width,
        } => {
            let name_a = wire_name(net, 0);
            let name_b = wire_name(net, 1);
            out.decls
                .push(format!("wire [{}:0] {};", data_width - 1, name_a));
            out.decls
                .push(format!("wire [{}:0] {};", data_width - 1, name_b));
            out.insts.push(format!(
                "BlockRAMTrueDual#(.INIT_FILE({}), .ADDR_WIDTH({}), .DATA_WIDTH({})) ramTrueDual{} (.CLK(clock), .DI_A({}), .ADDR_A({}), .WE_A({}), .DO_A({}), .DI_B({}), .ADDR_B({}), .WE_B({}), .DO_B({}));",
                init_file_param(init_file),
                addr_width,
                data_width,
                id.0,
                net_input_expr(netlist, id, &net.inputs[1])?,
                net_input_expr(netlist, id, &net.inputs[0])?,
                net_input_expr(netlist, id, &net.inputs[2])?,
                name_a,
                net_input_expr(netlist, id, &net.inputs[4])?,
                net_input_expr(netlist, id, &net.inputs[3])?,
                net_input_expr(netlist, id, &net.inputs[5])?,
                name_b
            ));
        }
        Prim::Display(fmt) => {
            let enable = net_input_expr(netlist, id, &net.inputs[0])?;
            let mut args = Vec::new();
            let mut next_input = 1;
            for item in fmt.items() {
                match item {
                    FormatItem::Str(s) => args.push(format!("\"{}\"", s)),
                    FormatItem::Bit(_) => {
                        args.push(net_input_expr(netlist, id, &net.inputs[next_input])?);
                        next_input += 1;
                    }
                }
            }
            out.always.push(format!(
                "if ({} == 1) $write({});",
                enable,
                args.join(", ")
            ));
        }
        Prim::Finish => {
            out.always.push(format!(
                "if ({} == 1) $finish;",
                net_input_expr(netlist, id, &net.inputs[0])?
            ));
        }
        Prim::TestPlusArgs(arg) => {
            let name = wire_name(net, 0);
            out.decls.push(format!("wire [0:0] {};", name));
            out.insts.push(format!(
                "assign {} = $test$plusargs(\"{}\") == 0 ? 0 : 1;",
                name, arg
            ));
        }
        Prim::Input { width, name } => {
            let wire = wire_name(net, 0);
            out.decls.push(format!("wire [{}:0] {};", width - 1, wire));
            out.insts.push(format!("assign {} = {};", wire, name));
        }
        Prim::Output { name, .. } => {
            out.insts.push(format!(
                "assign {} = {};",
                name,
                net_input_expr(netlist, id, &net.inputs[0])?
            ));
        }
        Prim::RegFileMake {
            init_file,
            addr_width,
            data_width,
            rf_id,
        } => {
            out.decls.push(format!(
                "reg [{}:0] rf{} [(2**{})-1:0];",
                data_width - 1,
                rf_id,
                addr_width
            ));
            if let Some(file) = init_file {
                out.decls.push(format!(
                    "generate initial $readmemh(\"{}\", rf{}); endgenerate",
                    file, rf_id
                ));
            }
        }
        Prim::RegFileRead { width, rf_id } => {
            let name = wire_name(net, 0);
            out.decls.push(format!("wire [{}:0] {};", width - 1, name));
            out.insts.push(format!(
                "assign {} = rf{}[{}];",
                name,
                rf_id,
                net_input_expr(netlist, id, &net.inputs[0])?
            ));
        }
        Prim::RegFileWrite { rf_id, .. } => {
            out.always.push(format!(
                "if ({} == 1) rf{}[{}] <= {};",
                net_input_expr(netlist, id, &net.inputs[0])?,
                rf_id,
                net_input_expr(netlist, id, &net.inputs[1])?,
                net_input_expr(netlist, id, &net.inputs[2])?
            ));
        }
        Prim::Custom {
            name,
            inputs,
            outputs,
            params,
            clocked,
        } => {
            for (port, (_, width)) in outputs.iter().enumerate() {
                out.decls.push(format!(
                    "wire [{}:0] {};",
                    width - 1,
                    wire_name(net, port)
                ));
            }
            let head = if params.is_empty() {
                name.clone()
            } else {
                let params: Vec<String> = params
                    .iter()
                    .map(|(key, value)| format!(".{}({})", key, value))
                    .collect();
                format!("{} #({})", name, params.join(", "))
            };
            let mut conns = Vec::new();
            if *clocked {
                conns.push(".clock(clock)".to_string());
                conns.push(".reset(reset)".to_string());
            }
            for (i, (port, _)) in inputs.iter().enumerate() {
                conns.push(format!(
                    ".{}({})",
                    port,
                    net_input_expr(netlist, id, &net.inputs[i])?
                ));
            }
            for (i, (port, _)) in outputs.iter().enumerate() {
                conns.push(format!(".{}({})", port, wire_name(net, i)));
            }
            out.insts
                .push(format!("{} {}_{}({});", head, name, id.0, conns.join(", ")));
        }
    }
    Ok(())
}

fn init_file_param(init_file: &Option<String>) -> String {
    match init_file {
        Some(file) => format!("\"{}\"", file),
        None => "\"UNUSED\"".to_string(),
    }
}

/// Interleave the section buffers into the module skeleton
fn assemble(netlist: &Netlist, module_name: &str, sections: &Sections) -> String {
    let mut ports = vec!["input wire clock".to_string(), "input wire reset".to_string()];
    for (width, name) in netlist.module_inputs() {
        ports.push(format!("input wire [{}:0] {}", width - 1, name));
    }
    for (width, name) in netlist.module_outputs() {
        ports.push(format!("output wire [{}:0] {}", width - 1, name));
    }

    let mut v = String::new();
    v.push_str(&format!("module {}({});\n", module_name, ports.join(", ")));
    push_section(&mut v, "Declarations", &sections.decls);
    push_section(&mut v, "Instances", &sections.insts);
    push_banner(&mut v, "Always block");
    v.push_str("  always @(posedge clock) begin\n");
    v.push_str("    if (reset) begin\n");
    for stmt in &sections.resets {
        v.push_str("      ");
        v.push_str(stmt);
        v.push('\n');
    }
    v.push_str("    end else begin\n");
    for stmt in &sections.always {
        v.push_str("      ");
        v.push_str(stmt);
        v.push('\n');
    }
    v.push_str("    end\n");
    v.push_str("  end\n");
    v.push_str("endmodule\n");
    v
}

fn push_banner(v: &mut String, title: &str) {
    v.push_str(&format!("  // {}\n", title));
    v.push_str("  ");
    v.push_str(&"/".repeat(78));
    v.push('\n');
}

fn push_section(v: &mut String, title: &str, stmts: &[String]) {
    push_banner(v, title);
    for stmt in stmts {
        v.push_str("  ");
        v.push_str(stmt);
        v.push('\n');
    }
}
