use thiserror::Error;

/// Inconsistencies between the expected and actual layout of a compressed
/// stream. Every one of these is fatal to a decode.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FramingError {
  #[error("Stream is too short to contain a header byte")]
  MissingHeader,
  #[error("Header specifies a symbol width of {0} bytes, expected 1, 2 or 4")]
  InvalidWidth(u8),
  #[error("Header specifies {0} padding bits, expected at most 7")]
  InvalidPadding(u8),
  #[error("Unexpected end of compressed data")]
  UnexpectedEnd,
  #[error("Huffman tree is deeper than the maximum of {0} levels")]
  TreeTooDeep(usize),
  #[error("Symbol {:#x} appears twice in the Huffman tree", .0)]
  DuplicateSymbol(u32),
  #[error("Single-symbol stream contains a code other than 0")]
  InvalidSingletonCode,
  #[error("Symbol count does not fit in 64 bits")]
  CountOverflow,
  #[error("Tail padding of {0} bytes is invalid for {1}-byte symbols")]
  InvalidTailPadding(u8, u8),
  #[error("{0} bits of data remain after the last symbol")]
  TrailingData(u64),
}

#[derive(Error, Debug)]
pub enum HuffError {
  #[error("Cannot compress an empty input")]
  EmptyInput,
  #[error("Malformed compressed stream: {0}")]
  Framing(#[from] FramingError),
  #[error("Symbol {:#x} has no code in the code table", .0)]
  MissingCode(u32),
  #[error("{0}")]
  Usage(String),
  #[error("Other IO error: {0}")]
  IOError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HuffError>;

impl HuffError {
  /// Whether this error came from a malformed compressed stream
  pub fn is_framing(&self) -> bool {
    matches!(self, HuffError::Framing(_))
  }
}
