//!
//! # Cross-Bar Diode Array Generator CLI
//!
//! Generates a diode-array photomask from a parameter file, writing `<outdir>/<name>.gds`.
//!

use clap::Parser;
use std::error::Error;

// Use our own crate, by name, not `crate::` or `super::`.
use xbar21::cli::{generate, GenerateOptions};

// => The doc-comment on `ProgramOptions` here is displayed by the `clap`-generated help docs =>

/// # Cross-Bar Diode Array Generator
/// Generates a diode-array photomask from a JSON, YAML, or TOML parameter file.
#[derive(Parser)]
pub struct ProgramOptions {
    /// Parameter File
    #[arg(short, long, required_unless_present = "schema")]
    pub config: Option<String>,
    /// Output Directory
    #[arg(short, long, default_value = ".")]
    pub outdir: String,
    /// Top-Level Cell and Output File Name. Overrides the parameter file.
    #[arg(short, long)]
    pub name: Option<String>,
    /// Pad Style. Overrides the parameter file.
    #[arg(long)]
    pub style: Option<String>,
    /// Invert the Back Stack
    #[arg(long)]
    pub invert: bool,
    /// SVG Preview File
    #[arg(long)]
    pub svg: Option<String>,
    /// Draw Ports in the SVG Preview
    #[arg(long)]
    pub show_ports: bool,
    /// Draw Sub-Canvas Ports in the SVG Preview
    #[arg(long)]
    pub show_subports: bool,
    /// Print the Parameter JSON Schema and Exit
    #[arg(long)]
    pub schema: bool,
    /// Verbose Output Mode
    #[arg(short, long)]
    pub verbose: bool,
}

impl Into<GenerateOptions> for ProgramOptions {
    /// Convert into the [`GenerateOptions`] struct.
    fn into(self) -> GenerateOptions {
        GenerateOptions {
            config: self.config,
            outdir: self.outdir,
            name: self.name,
            style: self.style,
            invert: self.invert,
            svg: self.svg,
            show_ports: self.show_ports,
            show_subports: self.show_subports,
            schema: self.schema,
        }
    }
}

/// Main entry point.
/// Parses the command-line arguments, sets up logging, and calls [`generate`].
pub fn main() -> Result<(), Box<dyn Error>> {
    let options = ProgramOptions::parse();
    let level = if options.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Some(gds) = generate(&options.into())? {
        println!("wrote {}", gds.display());
    }
    Ok(())
}
