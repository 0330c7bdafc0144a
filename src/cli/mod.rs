/*! Command-line front end: argument parsing, derived file names and the
file-to-file encode/decode drivers used by the `symhuff` binary. */

use crate::bitchannel::SymbolWidth;
use crate::codec::{decode, encode};
use crate::error::{HuffError, Result};

use clap::{App, AppSettings, Arg, ErrorKind};

use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};

pub const DEFAULT_ENCODE_SUFFIX: &str = ".huff";
pub const DEFAULT_DECODE_SUFFIX: &str = ".unhuff";

/// File naming conventions for the files the CLI derives from its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
  pub encode_suffix: String,
  pub decode_suffix: String,
}

impl Default for CliConfig {
  fn default() -> Self {
    Self {
      encode_suffix: DEFAULT_ENCODE_SUFFIX.to_owned(),
      decode_suffix: DEFAULT_DECODE_SUFFIX.to_owned(),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  Encode(SymbolWidth),
  Decode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
  pub file: PathBuf,
  pub mode: Mode,
  pub verbosity: u64,
  pub config: CliConfig,
}

/// The outcome of parsing a command line: either something to run, or text
/// (help, version) that should be printed before exiting successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
  Run(Opts),
  Info(String),
}

fn build_app() -> App<'static, 'static> {
  App::new("symhuff")
    .version(env!("CARGO_PKG_VERSION"))
    .about("Compresses and decompresses files with a symbol-wise Huffman code")
    .setting(AppSettings::ColoredHelp)
    .arg(
      Arg::with_name("file")
        .short("f")
        .long("file")
        .value_name("FILE")
        .takes_value(true)
        .required(true)
        .help("File to compress, or compressed file to restore"),
    )
    .arg(
      Arg::with_name("decode")
        .short("d")
        .long("decode")
        .help("Decompress FILE instead of compressing it"),
    )
    .arg(
      Arg::with_name("type")
        .short("t")
        .long("type")
        .value_name("TYPE")
        .takes_value(true)
        .possible_values(&["char", "char16", "char32"])
        .required_unless("decode")
        .help("Symbol width when compressing: char (1 byte), char16 (2) or char32 (4)"),
    )
    .arg(
      Arg::with_name("encode-suffix")
        .long("encode-suffix")
        .value_name("SUFFIX")
        .takes_value(true)
        .default_value(DEFAULT_ENCODE_SUFFIX)
        .help("Appended to FILE to name the compressed output"),
    )
    .arg(
      Arg::with_name("decode-suffix")
        .long("decode-suffix")
        .value_name("SUFFIX")
        .takes_value(true)
        .default_value(DEFAULT_DECODE_SUFFIX)
        .help("Appended to FILE to name the decompressed output"),
    )
    .arg(
      Arg::with_name("verbose")
        .short("v")
        .multiple(true)
        .help("Log progress (repeat for more detail)"),
    )
}

/// Parse a full command line, program name included.
pub fn parse_args<I, T>(args: I) -> Result<Invocation>
where
  I: IntoIterator<Item = T>,
  T: Into<OsString> + Clone,
{
  let matches = match build_app().get_matches_from_safe(args) {
    Ok(m) => m,
    Err(e) => {
      return match e.kind {
        ErrorKind::HelpDisplayed | ErrorKind::VersionDisplayed => Ok(Invocation::Info(e.message)),
        _ => Err(HuffError::Usage(e.message)),
      }
    }
  };

  let file = match matches.value_of_os("file") {
    Some(f) => PathBuf::from(f),
    None => return Err(HuffError::Usage("No target file given (-f FILE)".into())),
  };

  let mode = if matches.is_present("decode") {
    Mode::Decode
  } else {
    let name = matches
      .value_of("type")
      .ok_or_else(|| HuffError::Usage("A symbol type (-t) is needed to compress".into()))?;
    let width = SymbolWidth::from_type_name(name)
      .ok_or_else(|| HuffError::Usage(format!("Unknown symbol type {}", name)))?;
    Mode::Encode(width)
  };

  let config = CliConfig {
    encode_suffix: matches
      .value_of("encode-suffix")
      .unwrap_or(DEFAULT_ENCODE_SUFFIX)
      .to_owned(),
    decode_suffix: matches
      .value_of("decode-suffix")
      .unwrap_or(DEFAULT_DECODE_SUFFIX)
      .to_owned(),
  };

  Ok(Invocation::Run(Opts {
    file,
    mode,
    verbosity: matches.occurrences_of("verbose"),
    config,
  }))
}

/// Name of the file produced from `target`: the target path with `suffix`
/// appended verbatim.
pub fn output_path(target: &Path, suffix: &str) -> PathBuf {
  let mut name = target.as_os_str().to_owned();
  name.push(suffix);
  PathBuf::from(name)
}

/// Process exit code for an error that reached the top level
pub fn exit_code(err: &HuffError) -> i32 {
  match err {
    HuffError::Usage(_) => 2,
    _ => 1,
  }
}

/// Carry out the requested operation, returning the path that was written.
pub fn run(opts: &Opts) -> Result<PathBuf> {
  match opts.mode {
    Mode::Encode(width) => {
      let out_path = output_path(&opts.file, &opts.config.encode_suffix);
      let mut input = File::open(&opts.file)?;
      // Refuse before the output file is created
      if input.metadata()?.len() == 0 {
        return Err(HuffError::EmptyInput);
      }
      let output = File::create(&out_path)?;
      let summary = encode(&mut input, output, width)?;
      log::info!(
        "Compressed {} symbols of width {} into {} bytes at {}",
        summary.symbols,
        width,
        summary.compressed_bytes(),
        out_path.display()
      );
      Ok(out_path)
    }
    Mode::Decode => {
      let out_path = output_path(&opts.file, &opts.config.decode_suffix);
      let input = File::open(&opts.file)?;
      let output = File::create(&out_path)?;
      let summary = decode(input, output)?;
      log::info!(
        "Restored {} symbols of width {} ({} bytes) to {}",
        summary.symbols,
        summary.width,
        summary.bytes_written,
        out_path.display()
      );
      Ok(out_path)
    }
  }
}

#[cfg(test)]
mod tests {
  #[allow(unused_imports)]
  use super::*;

  fn run_opts(args: &[&str]) -> Opts {
    match parse_args(args.iter()) {
      Ok(Invocation::Run(opts)) => opts,
      other => panic!("Expected options, got {:?}", other),
    }
  }

  #[test]
  fn encode_args() {
    let opts = run_opts(&["symhuff", "-f", "notes.txt", "-t", "char16"]);
    assert_eq!(opts.file, PathBuf::from("notes.txt"));
    assert_eq!(opts.mode, Mode::Encode(SymbolWidth::Two));
    assert_eq!(opts.config, CliConfig::default());
    assert_eq!(opts.verbosity, 0);
  }

  #[test]
  fn decode_needs_no_type() {
    let opts = run_opts(&["symhuff", "-d", "-f", "notes.txt.huff", "-vv"]);
    assert_eq!(opts.mode, Mode::Decode);
    assert_eq!(opts.verbosity, 2);
  }

  #[test]
  fn custom_suffixes() {
    let opts = run_opts(&[
      "symhuff",
      "-f",
      "a",
      "-t",
      "char",
      "--encode-suffix",
      ".hf",
      "--decode-suffix",
      ".orig",
    ]);
    assert_eq!(opts.config.encode_suffix, ".hf");
    assert_eq!(opts.config.decode_suffix, ".orig");
  }

  #[test]
  fn missing_file_is_usage_error() {
    let res = parse_args(&["symhuff", "-t", "char"]);
    assert!(matches!(res, Err(HuffError::Usage(_))));
  }

  #[test]
  fn missing_type_is_usage_error() {
    let res = parse_args(&["symhuff", "-f", "notes.txt"]);
    let err = res.unwrap_err();
    assert!(matches!(err, HuffError::Usage(_)));
    assert_eq!(exit_code(&err), 2);
  }

  #[test]
  fn unknown_type_is_usage_error() {
    let res = parse_args(&["symhuff", "-f", "notes.txt", "-t", "wchar"]);
    assert!(matches!(res, Err(HuffError::Usage(_))));
  }

  #[test]
  fn help_is_not_an_error() {
    match parse_args(&["symhuff", "-h"]) {
      Ok(Invocation::Info(text)) => assert!(text.contains("--file")),
      other => panic!("Expected help text, got {:?}", other),
    }
  }

  #[test]
  fn derived_names() {
    assert_eq!(
      output_path(Path::new("dir/notes.txt"), ".huff"),
      PathBuf::from("dir/notes.txt.huff")
    );
    assert_eq!(
      output_path(Path::new("notes.txt.huff"), DEFAULT_DECODE_SUFFIX),
      PathBuf::from("notes.txt.huff.unhuff")
    );
  }

  #[test]
  fn other_errors_exit_with_one() {
    assert_eq!(exit_code(&HuffError::EmptyInput), 1);
  }
}
