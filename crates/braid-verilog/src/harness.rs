//! Output-directory artifacts.
//!
//! Two entry points: `write_verilog_module` emits just the Verilog source;
//! `write_verilog_top` additionally emits the fixed Verilator simulation
//! harness (C++ driver, make fragment, top-level Makefile). The harness
//! files are templates with a single substitution, the module name.

use std::fs;
use std::path::{Path, PathBuf};

use braid_netlist::Netlist;

use crate::codegen::generate_verilog;
use crate::error::Result;

/// Write `<dir>/<module_name>.v`, creating the directory if missing.
/// Returns the path of the written file.
pub fn write_verilog_module(
    netlist: &Netlist,
    module_name: &str,
    dir: &Path,
) -> Result<PathBuf> {
    let source = generate_verilog(netlist, module_name)?;
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.v", module_name));
    fs::write(&path, source)?;
    Ok(path)
}

/// Write the Verilog source plus the three simulation-harness files into
/// `dir`, creating the directory if missing.
pub fn write_verilog_top(netlist: &Netlist, module_name: &str, dir: &Path) -> Result<()> {
    let source = generate_verilog(netlist, module_name)?;
    fs::create_dir_all(dir)?;
    fs::write(dir.join(format!("{}.v", module_name)), source)?;
    fs::write(dir.join(format!("{}.cpp", module_name)), harness_cpp(module_name))?;
    fs::write(dir.join(format!("{}.mk", module_name)), harness_mk(module_name))?;
    fs::write(dir.join("Makefile"), "include *.mk\n")?;
    Ok(())
}

/// The Verilator driver: toggle the clock until the design calls `$finish`
fn harness_cpp(name: &str) -> String {
    format!(
        "#include <verilated.h>\n\
         #include \"V{name}.h\"\n\
         \n\
         vluint64_t main_time = 0;\n\
         \n\
         double sc_time_stamp() {{\n\
         \x20 return main_time;\n\
         }}\n\
         \n\
         int main(int argc, char** argv) {{\n\
         \x20 Verilated::commandArgs(argc, argv);\n\
         \x20 V{name}* top = new V{name};\n\
         \x20 while (!Verilated::gotFinish()) {{\n\
         \x20   top->clock = 0;\n\
         \x20   top->eval();\n\
         \x20   top->clock = 1;\n\
         \x20   top->eval();\n\
         \x20   main_time++;\n\
         \x20 }}\n\
         \x20 top->final();\n\
         \x20 delete top;\n\
         \x20 return 0;\n\
         }}\n",
        name = name
    )
}

/// Make rules: build the simulator binary with verilator, then tidy up
fn harness_mk(name: &str) -> String {
    format!(
        "all: {name}\n\
         \n\
         {name}: *.v *.cpp\n\
         \tverilator -cc {name}.v -exe {name}.cpp -o {name} \
         -Wno-UNSIGNED -y $(BLARNEY_ROOT)/Verilog \
         --x-assign unique --x-initial unique\n\
         \tmake -C obj_dir -j -f V{name}.mk {name}\n\
         \tcp obj_dir/{name} .\n\
         \trm -rf obj_dir\n\
         \n\
         .PHONY: clean-{name}\n\
         clean-{name}:\n\
         \trm -f {name}\n",
        name = name
    )
}
