use super::{pack_header, SymbolWidth};

use bit_vec::BitVec;
use bitstream_io::{BigEndian, BitWrite, BitWriter};

use std::io::{self, Seek, SeekFrom, Write};

/** Packs bits MSB-first into a seekable byte sink.

A placeholder header byte is written as soon as the sink is opened. Complete
bytes are handed to the sink as soon as they fill, so at most seven bits are
ever held back. `finish` pads the last byte and patches the real pad count
into the header.
*/
pub struct BitSink<W: Write + Seek> {
  bits: BitWriter<W, BigEndian>,
  width: SymbolWidth,
  header_pos: u64,
  nbits: u64,
}

impl<W: Write + Seek> BitSink<W> {
  pub fn new(mut sink: W, width: SymbolWidth) -> io::Result<Self> {
    let header_pos = sink.seek(SeekFrom::Current(0))?;
    sink.write_all(&[pack_header(width, 0)])?;
    Ok(Self {
      bits: BitWriter::endian(sink, BigEndian),
      width,
      header_pos,
      nbits: 0,
    })
  }

  pub fn width(&self) -> SymbolWidth {
    self.width
  }

  pub fn append_bit(&mut self, bit: bool) -> io::Result<()> {
    self.bits.write_bit(bit)?;
    self.nbits += 1;
    Ok(())
  }

  /// Append the low `width_bits` bits of `value`, most significant first.
  pub fn append_symbol(&mut self, value: u32, width_bits: u32) -> io::Result<()> {
    if width_bits == 0 {
      return Ok(());
    }
    if width_bits > 32 {
      return Err(io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("Cannot append {} bits from a 32-bit symbol", width_bits),
      ));
    }
    let mask = if width_bits == 32 {
      u32::MAX
    } else {
      (1u32 << width_bits) - 1
    };
    self.bits.write(width_bits, value & mask)?;
    self.nbits += u64::from(width_bits);
    Ok(())
  }

  pub fn append_code(&mut self, code: &BitVec) -> io::Result<()> {
    for bit in code.iter() {
      self.append_bit(bit)?;
    }
    Ok(())
  }

  /// Number of bits appended so far, not counting the header byte
  pub fn bits_written(&self) -> u64 {
    self.nbits
  }

  /// Number of zero bits `finish` will append to reach a byte boundary
  pub fn pad_bits(&self) -> u8 {
    ((8 - self.nbits % 8) % 8) as u8
  }

  /// Pad the final byte, rewrite the header with the true pad count and hand
  /// back the sink positioned at the end of the stream.
  pub fn finish(mut self) -> io::Result<W> {
    let pad_bits = self.pad_bits();
    self.bits.byte_align()?;
    let mut sink = self.bits.into_writer();

    let end = sink.seek(SeekFrom::Current(0))?;
    sink.seek(SeekFrom::Start(self.header_pos))?;
    sink.write_all(&[pack_header(self.width, pad_bits)])?;
    sink.seek(SeekFrom::Start(end))?;
    Ok(sink)
  }
}

#[cfg(test)]
mod tests {
  #[allow(unused_imports)]
  use super::*;
  use std::io::Cursor;

  fn finish_bytes(sink: BitSink<Cursor<Vec<u8>>>) -> Vec<u8> {
    sink.finish().unwrap().into_inner()
  }

  #[test]
  fn header_only() {
    let sink = BitSink::new(Cursor::new(Vec::new()), SymbolWidth::Two).unwrap();
    assert_eq!(finish_bytes(sink), vec![0x20]);
  }

  #[test]
  fn bits_are_msb_first() {
    let mut sink = BitSink::new(Cursor::new(Vec::new()), SymbolWidth::One).unwrap();
    for &bit in &[true, false, true, true, false, false, true, false] {
      sink.append_bit(bit).unwrap();
    }
    assert_eq!(sink.pad_bits(), 0);
    assert_eq!(finish_bytes(sink), vec![0x10, 0b1011_0010]);
  }

  #[test]
  fn partial_byte_is_padded() {
    let mut sink = BitSink::new(Cursor::new(Vec::new()), SymbolWidth::One).unwrap();
    sink.append_bit(true).unwrap();
    sink.append_symbol(0b01, 2).unwrap();
    assert_eq!(sink.bits_written(), 3);
    assert_eq!(sink.pad_bits(), 5);
    assert_eq!(finish_bytes(sink), vec![0x15, 0b1010_0000]);
  }

  #[test]
  fn symbols_span_bytes() {
    let mut sink = BitSink::new(Cursor::new(Vec::new()), SymbolWidth::Four).unwrap();
    sink.append_bit(false).unwrap();
    sink.append_symbol(0xDEAD_BEEF, 32).unwrap();
    let bytes = finish_bytes(sink);
    assert_eq!(bytes[0], 0x47);
    assert_eq!(&bytes[1..], &[0x6F, 0x56, 0xDF, 0x77, 0x80]);
  }

  #[test]
  fn high_bits_of_symbol_are_ignored() {
    let mut sink = BitSink::new(Cursor::new(Vec::new()), SymbolWidth::One).unwrap();
    sink.append_symbol(0x1FF, 8).unwrap();
    assert_eq!(finish_bytes(sink), vec![0x10, 0xFF]);
  }

  #[test]
  fn codes_are_appended_in_order() {
    let mut sink = BitSink::new(Cursor::new(Vec::new()), SymbolWidth::One).unwrap();
    let mut code = BitVec::new();
    code.push(true);
    code.push(true);
    code.push(false);
    sink.append_code(&code).unwrap();
    sink.append_code(&code).unwrap();
    assert_eq!(finish_bytes(sink), vec![0x12, 0b1101_1000]);
  }

  #[test]
  fn header_is_patched_at_starting_offset() {
    let mut cursor = Cursor::new(Vec::new());
    cursor.write_all(b"PRE").unwrap();
    let mut sink = BitSink::new(cursor, SymbolWidth::One).unwrap();
    sink.append_bit(true).unwrap();
    let bytes = finish_bytes(sink);
    assert_eq!(bytes, vec![b'P', b'R', b'E', 0x17, 0x80]);
  }
}
