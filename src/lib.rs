/*! A symbol-wise Huffman coder for 1, 2 and 4-byte alphabets.

Compressed streams are self-describing: a one-byte header gives the symbol
width and the amount of end-of-stream padding, and the Huffman tree itself is
stored ahead of the payload so no side channel is needed to decode.

```
use symhuff::bitchannel::SymbolWidth;
use symhuff::codec::{decoder::decode_bytes, encoder::encode_bytes};

let packed = encode_bytes(b"aaab", SymbolWidth::One).unwrap();
assert_eq!(decode_bytes(&packed).unwrap(), b"aaab");
```
*/

pub mod bitchannel;
pub mod cli;
pub mod codec;
pub mod error;
pub mod freq_table;
pub mod huff_tree;

pub use bitchannel::SymbolWidth;
pub use codec::{decode, encode, inspect};
pub use error::{FramingError, HuffError};
