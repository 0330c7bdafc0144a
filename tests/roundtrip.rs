use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use symhuff::bitchannel::unpack_header;
use symhuff::cli::{self, CliConfig, Mode, Opts};
use symhuff::codec::decoder::decode_bytes;
use symhuff::codec::encoder::encode_bytes;
use symhuff::{decode, encode, inspect, HuffError, SymbolWidth};

const WIDTHS: [SymbolWidth; 3] = [SymbolWidth::One, SymbolWidth::Two, SymbolWidth::Four];

fn scratch_file(name: &str) -> PathBuf {
  let mut path = std::env::temp_dir();
  path.push(format!("symhuff-{}-{}", std::process::id(), name));
  path
}

/// Text-like data: a skewed distribution over a small alphabet
fn skewed_data(rng: &mut StdRng, len: usize) -> Vec<u8> {
  (0..len)
    .map(|_| {
      let r: f64 = rng.gen();
      (b'a' + (r * r * 26.0) as u8).min(b'z')
    })
    .collect()
}

#[test]
fn random_data_roundtrips_at_every_width() {
  let mut rng = StdRng::seed_from_u64(0x5EED);
  for &len in [1usize, 2, 3, 5, 255, 4096, 10_001].iter() {
    let data: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
    for &width in WIDTHS.iter() {
      let packed = encode_bytes(&data, width).unwrap();
      assert_eq!(decode_bytes(&packed).unwrap(), data, "len {} width {}", len, width);
    }
  }
}

#[test]
fn skewed_data_compresses() {
  let mut rng = StdRng::seed_from_u64(7);
  let data = skewed_data(&mut rng, 50_000);
  let packed = encode_bytes(&data, SymbolWidth::One).unwrap();
  assert!(packed.len() < data.len() * 3 / 4);
  assert_eq!(decode_bytes(&packed).unwrap(), data);
}

#[test]
fn wide_alphabet_roundtrips() {
  // Many distinct 4-byte symbols exercise deep trees and 32-bit leaves
  let mut rng = StdRng::seed_from_u64(99);
  let mut data = Vec::new();
  for i in 0..20_000u32 {
    let sym = if rng.gen_bool(0.5) { i % 17 } else { rng.gen() };
    data.extend_from_slice(&sym.to_be_bytes());
  }
  let packed = encode_bytes(&data, SymbolWidth::Four).unwrap();
  assert_eq!(decode_bytes(&packed).unwrap(), data);
}

#[test]
fn header_reports_width_and_padding() {
  let mut rng = StdRng::seed_from_u64(3);
  for len in 1..64usize {
    let data = skewed_data(&mut rng, len);
    for &width in WIDTHS.iter() {
      let mut source = Cursor::new(data.clone());
      let mut out = Cursor::new(Vec::new());
      let summary = encode(&mut source, &mut out, width).unwrap();
      let packed = out.into_inner();
      let (hwidth, pad) = unpack_header(packed[0]).unwrap();
      assert_eq!(hwidth, width);
      assert_eq!(pad, summary.pad_bits);
      let info = inspect(&packed[..]).unwrap();
      assert_eq!(info.decoded_bytes(), len as u64);
    }
  }
}

#[test]
fn aaab_scenario() {
  let packed = encode_bytes(b"aaab", SymbolWidth::One).unwrap();
  let info = inspect(&packed[..]).unwrap();
  assert_eq!(info.codes.len(), 2);
  assert!(info.codes.iter().all(|entry| entry.code.len() == 1));
  let mut out = Vec::new();
  let summary = decode(&packed[..], &mut out).unwrap();
  assert_eq!(summary.symbols, 4);
  assert_eq!(out, b"aaab");
}

#[test]
fn every_truncation_is_detected() {
  let data = b"It was the best of times, it was the worst of times".to_vec();
  let packed = encode_bytes(&data, SymbolWidth::One).unwrap();
  for cut in 0..packed.len() {
    match decode_bytes(&packed[..cut]) {
      Err(e) => assert!(e.is_framing(), "cut at {}: {}", cut, e),
      Ok(out) => panic!("cut at {} decoded to {:?}", cut, out),
    }
  }
}

#[test]
fn cli_encode_then_decode() {
  let target = scratch_file("cli.txt");
  let data = "Ünïcödé text survives wide symbols: ✓".repeat(20);
  fs::write(&target, &data).unwrap();

  let config = CliConfig::default();
  let encoded = cli::run(&Opts {
    file: target.clone(),
    mode: Mode::Encode(SymbolWidth::Two),
    verbosity: 0,
    config: config.clone(),
  })
  .unwrap();
  assert_eq!(encoded, cli::output_path(&target, ".huff"));

  let decoded = cli::run(&Opts {
    file: encoded.clone(),
    mode: Mode::Decode,
    verbosity: 0,
    config,
  })
  .unwrap();
  assert_eq!(decoded, cli::output_path(&encoded, ".unhuff"));
  assert_eq!(fs::read(&decoded).unwrap(), data.as_bytes());

  for path in [target, encoded, decoded].iter() {
    fs::remove_file(path).unwrap();
  }
}

#[test]
fn cli_empty_input_creates_no_output() {
  let target = scratch_file("empty.txt");
  fs::write(&target, b"").unwrap();
  let res = cli::run(&Opts {
    file: target.clone(),
    mode: Mode::Encode(SymbolWidth::One),
    verbosity: 0,
    config: CliConfig::default(),
  });
  assert!(matches!(res, Err(HuffError::EmptyInput)));
  assert!(!cli::output_path(&target, ".huff").exists());
  fs::remove_file(&target).unwrap();
}

#[test]
fn cli_missing_input_is_io_error() {
  let res = cli::run(&Opts {
    file: scratch_file("does-not-exist"),
    mode: Mode::Decode,
    verbosity: 0,
    config: CliConfig::default(),
  });
  assert!(matches!(res, Err(HuffError::IOError(_))));
}
