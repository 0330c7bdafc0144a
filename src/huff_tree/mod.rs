/*! Huffman trees over a fixed-width alphabet.

Trees are persisted as a pre-order walk: an internal node is a single `0`
bit followed by its left and right subtrees, and a leaf is a `1` bit followed
by its symbol in `8 * width` bits. No weights are stored, so the decoder
rebuilds exactly the shape the encoder used.

Codes read left as `0` and right as `1`. A tree built from a single distinct
symbol is one leaf with no path at all; that symbol is given the code `0`.
*/

use crate::bitchannel::{BitSink, BitSource, SymbolWidth};
use crate::error::{FramingError, HuffError, Result};
use crate::freq_table::FrequencyTable;

use bit_vec::BitVec;

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::fmt;
use std::io::{self, Read, Seek, Write};

/// Deepest tree accepted from a compressed stream. A Huffman tree of depth d
/// needs a total weight of at least Fib(d + 2), so no tree built from 64-bit
/// counts comes close.
pub const MAX_TREE_DEPTH: usize = 128;

pub type CodeTable = HashMap<u32, BitVec>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
  Leaf(u32),
  Internal(Box<HuffNode>, Box<HuffNode>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
  root: HuffNode,
  width: SymbolWidth,
}

/// A subtree waiting in the construction heap. Ordered so that the
/// `BinaryHeap` pops the lightest subtree first, oldest first among equals.
struct Pending {
  weight: u64,
  order: usize,
  node: HuffNode,
}

impl PartialEq for Pending {
  fn eq(&self, other: &Self) -> bool {
    self.weight == other.weight && self.order == other.order
  }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for Pending {
  fn cmp(&self, other: &Self) -> Ordering {
    (other.weight, other.order).cmp(&(self.weight, self.order))
  }
}

impl HuffmanTree {
  /// Greedy minimum-weight construction: merge the two lightest subtrees
  /// until one remains.
  pub fn from_frequencies(table: &FrequencyTable) -> Result<Self> {
    let mut heap = BinaryHeap::with_capacity(table.len());
    let mut order = 0usize;
    for (&sym, &weight) in table.counts().iter() {
      heap.push(Pending {
        weight,
        order,
        node: HuffNode::Leaf(sym),
      });
      order += 1;
    }

    let root = loop {
      let lightest = match heap.pop() {
        Some(x) => x,
        None => return Err(HuffError::EmptyInput),
      };
      let second = match heap.pop() {
        Some(y) => y,
        None => break lightest.node,
      };
      heap.push(Pending {
        weight: lightest.weight.saturating_add(second.weight),
        order,
        node: HuffNode::Internal(Box::new(lightest.node), Box::new(second.node)),
      });
      order += 1;
    };

    Ok(Self {
      root,
      width: table.width(),
    })
  }

  pub fn root(&self) -> &HuffNode {
    &self.root
  }

  pub fn width(&self) -> SymbolWidth {
    self.width
  }

  /// True for the degenerate one-leaf tree
  pub fn is_singleton(&self) -> bool {
    matches!(self.root, HuffNode::Leaf(_))
  }

  pub fn leaf_count(&self) -> usize {
    fn count(node: &HuffNode) -> usize {
      match node {
        HuffNode::Leaf(_) => 1,
        HuffNode::Internal(l, r) => count(l) + count(r),
      }
    }
    count(&self.root)
  }

  /// Write the tree shape and leaves to `sink`, returning the code of every
  /// leaf as discovered along the way.
  pub fn serialize<W: Write + Seek>(&self, sink: &mut BitSink<W>) -> io::Result<CodeTable> {
    debug_assert_eq!(sink.width(), self.width);
    let mut table = CodeTable::new();
    let mut path = BitVec::new();
    serialize_node(&self.root, sink, self.width.bits(), &mut path, &mut table)?;
    Ok(table)
  }

  /// Rebuild a tree from its serialized form.
  pub fn deserialize<R: Read>(source: &mut BitSource<R>) -> Result<Self> {
    let width = source.width();
    let mut seen = HashSet::new();
    let root = deserialize_node(source, width.bits(), 0, &mut seen)?;
    Ok(Self { root, width })
  }

  /// Derive the code table without writing anything.
  pub fn code_table(&self) -> CodeTable {
    fn walk(node: &HuffNode, path: &mut BitVec, table: &mut CodeTable) {
      match node {
        HuffNode::Leaf(sym) => {
          table.insert(*sym, leaf_code(path));
        }
        HuffNode::Internal(l, r) => {
          path.push(false);
          walk(l, path, table);
          path.pop();
          path.push(true);
          walk(r, path, table);
          path.pop();
        }
      }
    }
    let mut table = CodeTable::new();
    walk(&self.root, &mut BitVec::new(), &mut table);
    table
  }
}

fn leaf_code(path: &BitVec) -> BitVec {
  if path.is_empty() {
    BitVec::from_elem(1, false)
  } else {
    path.clone()
  }
}

fn serialize_node<W: Write + Seek>(
  node: &HuffNode,
  sink: &mut BitSink<W>,
  sym_bits: u32,
  path: &mut BitVec,
  table: &mut CodeTable,
) -> io::Result<()> {
  match node {
    HuffNode::Leaf(sym) => {
      sink.append_bit(true)?;
      sink.append_symbol(*sym, sym_bits)?;
      table.insert(*sym, leaf_code(path));
    }
    HuffNode::Internal(l, r) => {
      sink.append_bit(false)?;
      path.push(false);
      serialize_node(l, sink, sym_bits, path, table)?;
      path.pop();
      path.push(true);
      serialize_node(r, sink, sym_bits, path, table)?;
      path.pop();
    }
  }
  Ok(())
}

fn deserialize_node<R: Read>(
  source: &mut BitSource<R>,
  sym_bits: u32,
  depth: usize,
  seen: &mut HashSet<u32>,
) -> Result<HuffNode> {
  if depth > MAX_TREE_DEPTH {
    return Err(FramingError::TreeTooDeep(MAX_TREE_DEPTH).into());
  }
  if source.read_bit()? {
    let sym = source.read_symbol(sym_bits)?;
    if !seen.insert(sym) {
      return Err(FramingError::DuplicateSymbol(sym).into());
    }
    Ok(HuffNode::Leaf(sym))
  } else {
    let left = deserialize_node(source, sym_bits, depth + 1, seen)?;
    let right = deserialize_node(source, sym_bits, depth + 1, seen)?;
    Ok(HuffNode::Internal(Box::new(left), Box::new(right)))
  }
}

/// Render a code as a string of '0' and '1'
pub fn code_to_string(code: &BitVec) -> String {
  code.iter().map(|b| if b { '1' } else { '0' }).collect()
}

impl fmt::Display for HuffmanTree {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fn fmt_node(node: &HuffNode, depth: usize, label: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      let indent = "  ".repeat(depth);
      match node {
        HuffNode::Leaf(sym) => writeln!(f, "{}{}: leaf {:#x}", indent, label, sym),
        HuffNode::Internal(l, r) => {
          writeln!(f, "{}{}: internal", indent, label)?;
          fmt_node(l, depth + 1, "0", f)?;
          fmt_node(r, depth + 1, "1", f)
        }
      }
    }
    fmt_node(&self.root, 0, "root", f)
  }
}
