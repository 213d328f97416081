//! The weak trie forest caching interned tuples.
//!
//! One trie exists per tuple length. Each root-to-leaf path of length N is a
//! canonical key sequence; the final edge holds the cached tuple, so the last
//! lookup doubles as cache-hit detection. Keying by canonical key but rooting
//! by length class avoids cross-length collisions without a composite key, and
//! lets each length's subtree be reclaimed independently.
//!
//! Edges never own what they cache: keys are held through [`WeakKey`] and
//! tuples through `Weak`, so the trie is never the reason a tuple survives.
//! Rust has no collector to drop dead edges for us; [`TrieForest::sweep`]
//! prunes them explicitly.

use std::rc::Weak;

use ahash::AHashMap;

use crate::canonical::{CanonicalKey, WeakKey};
use crate::tuple::{TupleData, TupleRef};
use crate::value::Value;

/// All per-length tries, keyed by tuple length.
#[derive(Debug, Default)]
pub(crate) struct TrieForest {
    roots: AHashMap<usize, TrieNode>,
}

#[derive(Debug, Default)]
struct TrieNode {
    /// Edges keyed by canonical-key allocation address.
    edges: AHashMap<usize, TrieEdge>,
}

#[derive(Debug)]
struct TrieEdge {
    key: WeakKey,
    link: TrieLink,
}

#[derive(Debug)]
enum TrieLink {
    /// Intermediate depth: descend further.
    Branch(TrieNode),
    /// Final depth: the cached tuple, held weakly.
    Tuple(Weak<TupleData>),
}

impl TrieForest {
    /// Walks (creating edges as needed) the length-class trie for `keys` and
    /// returns the cached tuple, or builds one from the original `elements`
    /// and caches it weakly under the final key.
    ///
    /// `keys` and `elements` are index-aligned and must be non-empty; the
    /// empty sequence is special-cased by the interner before reaching the
    /// trie.
    pub(crate) fn intern(&mut self, keys: &[CanonicalKey], elements: &[Value]) -> TupleRef {
        debug_assert_eq!(keys.len(), elements.len());
        let last = keys.len() - 1;
        let mut node = self.roots.entry(keys.len()).or_default();

        for key in &keys[..last] {
            let edge = node.edges.entry(key.addr()).or_insert_with(|| TrieEdge {
                key: key.downgrade(),
                link: TrieLink::Branch(TrieNode::default()),
            });
            node = match &mut edge.link {
                TrieLink::Branch(child) => child,
                // Depth is fixed per length class, so a tuple can only ever
                // sit on a final edge.
                TrieLink::Tuple(_) => unreachable!("tuple cached above the final trie level"),
            };
        }

        let final_key = &keys[last];
        if let Some(TrieEdge {
            link: TrieLink::Tuple(slot),
            ..
        }) = node.edges.get(&final_key.addr())
        {
            if let Some(existing) = TupleRef::upgrade(slot) {
                return existing;
            }
        }

        let tuple = TupleRef::new(elements);
        node.edges.insert(
            final_key.addr(),
            TrieEdge {
                key: final_key.downgrade(),
                link: TrieLink::Tuple(tuple.downgrade()),
            },
        );
        tuple
    }

    /// Prunes edges whose key or cached tuple has died, and any subtrees left
    /// empty by that pruning. Returns the number of edges removed.
    pub(crate) fn sweep(&mut self) -> usize {
        let mut removed = 0;
        self.roots.retain(|_, root| {
            removed += sweep_node(root);
            !root.edges.is_empty()
        });
        removed
    }

    /// Number of trie nodes currently allocated, roots included.
    pub(crate) fn node_count(&self) -> usize {
        self.roots.values().map(count_nodes).sum()
    }

    /// Number of final edges still holding a live tuple.
    pub(crate) fn cached_tuple_count(&self) -> usize {
        self.roots.values().map(count_live_tuples).sum()
    }

    pub(crate) fn clear(&mut self) {
        self.roots.clear();
    }
}

fn sweep_node(node: &mut TrieNode) -> usize {
    let mut removed = 0;
    node.edges.retain(|_, edge| {
        if !edge.key.is_alive() {
            removed += 1;
            return false;
        }
        match &mut edge.link {
            TrieLink::Branch(child) => {
                removed += sweep_node(child);
                if child.edges.is_empty() {
                    removed += 1;
                    false
                } else {
                    true
                }
            }
            TrieLink::Tuple(slot) => {
                if slot.strong_count() == 0 {
                    removed += 1;
                    false
                } else {
                    true
                }
            }
        }
    });
    removed
}

fn count_nodes(node: &TrieNode) -> usize {
    1 + node
        .edges
        .values()
        .map(|edge| match &edge.link {
            TrieLink::Branch(child) => count_nodes(child),
            TrieLink::Tuple(_) => 0,
        })
        .sum::<usize>()
}

fn count_live_tuples(node: &TrieNode) -> usize {
    node.edges
        .values()
        .map(|edge| match &edge.link {
            TrieLink::Branch(child) => count_live_tuples(child),
            TrieLink::Tuple(slot) => usize::from(slot.strong_count() > 0),
        })
        .sum()
}
