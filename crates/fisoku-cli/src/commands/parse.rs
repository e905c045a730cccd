//! Parse command - run the field parser over already extracted text.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use console::style;

use fisoku_core::invoice::FieldParser;

use super::output::{OutputFormat, format_invoice};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Text file to parse, or `-` for stdin
    #[arg(required = true)]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Report fields that were not found
    #[arg(long)]
    validate: bool,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::config::load(config_path)?;

    let text = if args.input == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(&args.input)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", args.input, e))?
    };

    let parser = FieldParser::new(&config.extraction)?;
    let invoice = parser.parse_str(&text)?;

    if args.validate {
        super::process::report_missing(&invoice);
    }

    let output = format_invoice(&invoice, args.format)?;
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}
