use super::{unpack_header, SymbolWidth};
use crate::error::{FramingError, HuffError, Result};

use std::io::{self, Bytes, Read};
use std::iter::Peekable;

/// Refill the accumulator only while it has room for another full byte.
const MAX_BUFFERED: u32 = 56;

/** Reads bits MSB-first from a byte source written by a `BitSink`.

Bytes are pulled from the source only when the accumulator runs dry. The
source is read one byte ahead, so the pad count from the header is knocked off
the buffered bits while the final byte is still in the accumulator, and
callers never see the padding.
*/
pub struct BitSource<R: Read> {
  bytes: Peekable<Bytes<R>>,
  width: SymbolWidth,
  pad_bits: u8,
  acc: u64,
  nbuf: u32,
  eof: bool,
  bits_read: u64,
}

impl<R: Read> BitSource<R> {
  /// Consume the header byte and position the reader on the first data bit.
  pub fn new(source: R) -> Result<Self> {
    let mut bytes = source.bytes();
    let header = match bytes.next() {
      Some(byte) => byte?,
      None => return Err(FramingError::MissingHeader.into()),
    };
    let (width, pad_bits) = unpack_header(header)?;
    log::trace!("Header {:#04x}: width {}, {} pad bits", header, width, pad_bits);
    Ok(Self {
      bytes: bytes.peekable(),
      width,
      pad_bits,
      acc: 0,
      nbuf: 0,
      eof: false,
      bits_read: 0,
    })
  }

  pub fn width(&self) -> SymbolWidth {
    self.width
  }

  pub fn pad_bits(&self) -> u8 {
    self.pad_bits
  }

  /// Number of data bits handed out so far
  pub fn bits_read(&self) -> u64 {
    self.bits_read
  }

  fn refill(&mut self) -> Result<()> {
    while !self.eof && self.nbuf <= MAX_BUFFERED {
      match self.bytes.next() {
        Some(byte) => {
          self.acc = (self.acc << 8) | u64::from(byte?);
          self.nbuf += 8;
          if self.bytes.peek().is_none() {
            self.strip_padding()?;
          }
        }
        None => self.strip_padding()?,
      }
    }
    Ok(())
  }

  /// Called once the last byte of the source is buffered.
  fn strip_padding(&mut self) -> Result<()> {
    self.eof = true;
    let pad = u32::from(self.pad_bits);
    if pad > self.nbuf {
      // Only possible when there are no data bytes at all.
      return Err(FramingError::InvalidPadding(self.pad_bits).into());
    }
    self.acc >>= pad;
    self.nbuf -= pad;
    Ok(())
  }

  pub fn read_bit(&mut self) -> Result<bool> {
    if self.nbuf == 0 {
      self.refill()?;
      if self.nbuf == 0 {
        return Err(FramingError::UnexpectedEnd.into());
      }
    }
    self.nbuf -= 1;
    self.bits_read += 1;
    Ok((self.acc >> self.nbuf) & 1 == 1)
  }

  /// Read `width_bits` bits as one value, most significant bit first.
  pub fn read_symbol(&mut self, width_bits: u32) -> Result<u32> {
    if width_bits > 32 {
      return Err(HuffError::IOError(io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("Cannot read {} bits into a 32-bit symbol", width_bits),
      )));
    }
    let mut value = 0u32;
    for _ in 0..width_bits {
      value = (value << 1) | self.read_bit()? as u32;
    }
    Ok(value)
  }

  /// True when every non-padding bit has been read.
  pub fn is_exhausted(&mut self) -> Result<bool> {
    if self.nbuf == 0 {
      self.refill()?;
    }
    Ok(self.nbuf == 0)
  }

  /// Discard everything left in the stream, returning how many data bits
  /// were skipped.
  pub fn skip_to_end(&mut self) -> Result<u64> {
    let mut skipped = 0u64;
    while !self.is_exhausted()? {
      skipped += u64::from(self.nbuf);
      self.bits_read += u64::from(self.nbuf);
      self.nbuf = 0;
    }
    Ok(skipped)
  }
}
