use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fwat_core::{EmitFormat, compile};

/// Command line options for the fwat compiler.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[arg(short, long, help = "Source file to compile (reads stdin when omitted)")]
    input: Option<String>,

    #[arg(short, long, help = "Output file (writes stdout when omitted)")]
    output: Option<String>,

    #[arg(
        long,
        value_name = "FORMAT",
        default_value = "wat",
        help = "Output format: wat, pretty"
    )]
    emit: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    execute(cli)
}

fn execute(cli: Cli) -> Result<()> {
    let format: EmitFormat = cli.emit.parse()?;

    let source = match &cli.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {path}"))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read source from stdin")?;
            buffer
        }
    };

    let mut rendered = compile(&source, format).with_context(|| match &cli.input {
        Some(path) => format!("failed to compile {path}"),
        None => "failed to compile source from stdin".to_string(),
    })?;
    rendered.push('\n');

    match &cli.output {
        Some(path) => write_output(path, rendered.as_bytes())?,
        None => print!("{rendered}"),
    }
    Ok(())
}

fn write_output(path: &str, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = PathBuf::from(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {parent:?}"))?;
        }
    }
    fs::write(path, bytes).with_context(|| format!("failed to write output file {path}"))?;
    eprintln!("wrote {path}");
    Ok(())
}
