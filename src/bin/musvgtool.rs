//! `musvgtool` — converts an SVG document between the XML, debug-text
//! and binary (vf128/ieee) forms, and reports `-s/--stats` comparing
//! encoded sizes across formats, the same comparison `bench_svg.cc`
//! ran across formats in the original source.

use clap::Parser;
use colored::*;
use musvg::{emit_file, parse_buffer, Document, InputFormat, OutputFormat};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "musvgtool")]
#[command(about = "Convert SVG documents between XML, text and binary forms", long_about = None)]
#[command(version)]
struct Cli {
    /// Input file, or "-" for stdin
    #[arg(long = "input-file", value_name = "FILE")]
    input_file: String,

    /// Output file, or "-" for stdout
    #[arg(long = "output-file", value_name = "FILE", default_value = "-")]
    output_file: String,

    /// Input format
    #[arg(short = 'i', long = "input-format", value_enum)]
    input_format: FormatArg,

    /// Output format
    #[arg(short = 'o', long = "output-format", value_enum)]
    output_format: FormatArg,

    /// Print a size comparison across all emitted formats instead of writing output
    #[arg(short, long)]
    stats: bool,

    /// Enable debug-level logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum FormatArg {
    Xml,
    Svgv,
    Svgb,
    Text,
}

impl From<FormatArg> for InputFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Xml => InputFormat::Xml,
            FormatArg::Svgv => InputFormat::BinaryVf128,
            FormatArg::Svgb => InputFormat::BinaryIeee,
            FormatArg::Text => InputFormat::Text,
        }
    }
}

impl From<FormatArg> for OutputFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Xml => OutputFormat::Xml,
            FormatArg::Svgv => OutputFormat::BinaryVf128,
            FormatArg::Svgb => OutputFormat::BinaryIeee,
            FormatArg::Text => OutputFormat::Text,
        }
    }
}

fn read_input(path: &str) -> std::io::Result<Vec<u8>> {
    if path == "-" {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        fs::read(Path::new(path))
    }
}

fn write_output(path: &str, bytes: &[u8]) -> std::io::Result<()> {
    if path == "-" {
        std::io::stdout().write_all(bytes)
    } else {
        fs::write(Path::new(path), bytes)
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            use clap::error::ErrorKind;
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    let level = if cli.debug { log::LevelFilter::Debug } else { log::LevelFilter::Warn };
    env_logger::Builder::new().filter_level(level).init();

    let input = match read_input(&cli.input_file) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error reading {}: {e}", cli.input_file);
            return ExitCode::FAILURE;
        }
    };

    let doc = match parse_buffer(&input, cli.input_format.into()) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error parsing input: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cli.stats {
        print_stats(&doc);
        return ExitCode::SUCCESS;
    }

    let mut out = Vec::new();
    if let Err(e) = emit_file(&doc, cli.output_format.into(), &mut out) {
        eprintln!("error emitting output: {e}");
        return ExitCode::FAILURE;
    }
    if let Err(e) = write_output(&cli.output_file, &out) {
        eprintln!("error writing {}: {e}", cli.output_file);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn print_stats(doc: &Document) {
    println!("{}", "musvg stats".cyan().bold());
    println!(" {} {}", "nodes:".cyan(), doc.nodes.len().to_string().white());
    println!(" {} {}", "path ops:".cyan(), doc.path_ops.len().to_string().white());
    println!(" {} {}", "points:".cyan(), doc.points.len().to_string().white());
    println!();

    let formats: &[(&str, OutputFormat)] = &[
        ("xml", OutputFormat::Xml),
        ("text", OutputFormat::Text),
        ("svgv (vf128)", OutputFormat::BinaryVf128),
        ("svgb (ieee)", OutputFormat::BinaryIeee),
    ];
    let name_width = formats.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
    for (name, format) in formats {
        let mut out = Vec::new();
        match emit_file(doc, *format, &mut out) {
            Ok(()) => println!(" {:<width$} {}", format!("{name}:").cyan(), out.len().to_string().yellow(), width = name_width + 1),
            Err(e) => println!(" {:<width$} {}", format!("{name}:").cyan(), format!("error: {e}").red(), width = name_width + 1),
        }
    }
}
