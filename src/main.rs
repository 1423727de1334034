use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use dis8086::{input, Decoder, BITS_DIRECTIVE};

#[derive(Parser, Debug)]
#[command(name = "dis8086", version, about = "Disassemble 8086 mov/add/sub machine code")]
struct Args {
  /// File of raw 8086 machine code
  input: PathBuf,

  /// Write the listing here instead of stdout
  #[arg(short, long)]
  output: Option<PathBuf>,

  /// Log decoding progress to stderr (-vv for every fetched byte)
  #[arg(short, long, action = clap::ArgAction::Count)]
  verbose: u8,
}

fn main() -> ExitCode {
  let args = match Args::try_parse() {
    Ok(args) => args,
    Err(err) => {
      // usage problems exit with 1, not clap's 2
      let _ = err.print();
      return match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
      };
    }
  };

  setup_logging(args.verbose);

  match run(&args) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("error: {err:#}");
      ExitCode::FAILURE
    }
  }
}

fn setup_logging(verbose: u8) {
  let level = match verbose {
    0 => log::LevelFilter::Warn,
    1 => log::LevelFilter::Debug,
    _ => log::LevelFilter::Trace,
  };

  env_logger::Builder::new()
    .filter_level(level)
    .format_timestamp(None)
    .init();
}

fn run(args: &Args) -> anyhow::Result<()> {
  let data = input::load(&args.input)?;

  let mut out: Box<dyn Write> = match &args.output {
    Some(path) => {
      let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
      Box::new(BufWriter::new(file))
    }
    None => Box::new(io::stdout().lock()),
  };

  writeln!(out, "{BITS_DIRECTIVE}")?;
  let mut count = 0;
  for instruction in Decoder::new(&data) {
    let instruction = match instruction {
      Ok(instruction) => instruction,
      Err(err) => {
        // keep what already decoded
        out.flush()?;
        return Err(err).with_context(|| format!("failed to decode {}", args.input.display()));
      }
    };
    writeln!(out, "{instruction}")?;
    count += 1;
  }
  out.flush()?;

  log::debug!("decoded {count} instructions from {}", args.input.display());
  Ok(())
}
