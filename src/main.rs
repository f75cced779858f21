use anyhow::{ensure, Context, Result};
use braid_netlist::Netlist;
use braid_verilog::{write_verilog_module, write_verilog_top};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// braid - netlist-to-Verilog code generation
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the Verilog module for an elaborated netlist
    Module {
        /// Serialized netlist (JSON)
        netlist: PathBuf,

        /// Module name
        #[arg(short, long, default_value = "top")]
        name: String,

        /// Output directory
        #[arg(short, long, default_value = "build")]
        output: PathBuf,
    },

    /// Generate the Verilog module plus the Verilator simulation harness
    Top {
        /// Serialized netlist (JSON)
        netlist: PathBuf,

        /// Module name
        #[arg(short, long, default_value = "top")]
        name: String,

        /// Output directory
        #[arg(short, long, default_value = "build")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    match cli.command {
        Commands::Module {
            netlist,
            name,
            output,
        } => {
            check_module_name(&name)?;
            let netlist = load_netlist(&netlist)?;
            let path = write_verilog_module(&netlist, &name, &output)
                .with_context(|| format!("failed to generate module '{}'", name))?;
            info!("Wrote {}", path.display());
        }

        Commands::Top {
            netlist,
            name,
            output,
        } => {
            check_module_name(&name)?;
            let netlist = load_netlist(&netlist)?;
            write_verilog_top(&netlist, &name, &output)
                .with_context(|| format!("failed to generate top '{}'", name))?;
            info!(
                "Wrote {} and simulation harness",
                output.join(format!("{}.v", name)).display()
            );
        }
    }

    Ok(())
}

fn load_netlist(path: &Path) -> Result<Netlist> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read netlist {}", path.display()))?;
    let netlist: Netlist = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse netlist {}", path.display()))?;
    info!("Loaded netlist with {} nets", netlist.len());
    Ok(netlist)
}

fn check_module_name(name: &str) -> Result<()> {
    ensure!(!name.is_empty(), "module name must not be empty");
    let legal = name.chars().enumerate().all(|(i, c)| {
        if i == 0 {
            c.is_ascii_alphabetic() || c == '_'
        } else {
            c.is_ascii_alphanumeric() || c == '_' || c == '$'
        }
    });
    ensure!(legal, "'{}' is not a legal Verilog identifier", name);
    Ok(())
}
