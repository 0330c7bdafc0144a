use super::{write_stream_info, EncodeSummary};
use crate::bitchannel::{BitSink, SymbolWidth};
use crate::error::{HuffError, Result};
use crate::freq_table::{FrequencyTable, SymbolReader};
use crate::huff_tree::HuffmanTree;

use std::io::{self, BufReader, BufWriter, Read, Seek, Write};

/** Compress `source` into `sink` using symbols of the given width.

The source is read twice: once to count symbols and once to emit their codes,
so it must be seekable. Nothing is written to `sink` if the source turns out
to be empty. The sink must be seekable so the header can be patched once the
final padding is known.
*/
pub fn encode<R, W>(source: &mut R, sink: W, width: SymbolWidth) -> Result<EncodeSummary>
where
  R: Read + Seek,
  W: Write + Seek,
{
  let table = FrequencyTable::build(source, width)?;
  let tree = HuffmanTree::from_frequencies(&table)?;
  log::trace!("Huffman tree:\n{}", tree);

  let mut bit_sink = BitSink::new(BufWriter::new(sink), width)?;
  let codes = tree.serialize(&mut bit_sink)?;
  let tree_bits = bit_sink.bits_written();
  write_stream_info(&mut bit_sink, table.total_symbols(), table.tail_padding())?;
  let payload_start = bit_sink.bits_written();

  let mut nsyms = 0u64;
  {
    let mut syms = SymbolReader::new(BufReader::new(&mut *source), width);
    while let Some(sym) = syms.next_symbol()? {
      let code = codes.get(&sym).ok_or(HuffError::MissingCode(sym))?;
      bit_sink.append_code(code)?;
      nsyms += 1;
    }
  }
  if nsyms != table.total_symbols() {
    return Err(HuffError::IOError(io::Error::new(
      io::ErrorKind::InvalidData,
      format!(
        "Source changed while encoding: counted {} symbols, then read {}",
        table.total_symbols(),
        nsyms
      ),
    )));
  }

  let payload_bits = bit_sink.bits_written() - payload_start;
  let pad_bits = bit_sink.pad_bits();
  let mut out = bit_sink.finish()?;
  out.flush()?;

  let summary = EncodeSummary {
    width,
    symbols: nsyms,
    distinct_symbols: table.len(),
    tree_bits,
    payload_bits,
    pad_bits,
  };
  log::debug!(
    "Encoded {} symbols ({} distinct): {} tree bits, {} payload bits, {} pad bits",
    summary.symbols,
    summary.distinct_symbols,
    summary.tree_bits,
    summary.payload_bits,
    summary.pad_bits
  );
  Ok(summary)
}

/// Convenience wrapper for compressing an in-memory buffer
pub fn encode_bytes(data: &[u8], width: SymbolWidth) -> Result<Vec<u8>> {
  let mut source = io::Cursor::new(data);
  let mut out = io::Cursor::new(Vec::new());
  encode(&mut source, &mut out, width)?;
  Ok(out.into_inner())
}
