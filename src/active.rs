//! Ordered set of the regions currently crossing the sweep line.
//!
//! Kept as a doubly linked list of nodes in a [`Pool`], sorted from
//! bottom to top by each region's upper edge. The comparison depends on
//! the current sweep event, so it is not stored here: every ordered
//! lookup takes a predicate instead. Neighbour queries are `O(1)`,
//! which is what the sweep uses almost exclusively; insertion walks
//! from a nearby node.
use crate::alloc::{Allocator, AllocatorConfig, EntityKind, Pool};
use crate::error::Result;

/// Head of the node list; carries no key.
pub(crate) const DICT_HEAD: usize = 0;

#[derive(Debug, Clone)]
struct DictNode {
    key: Option<usize>,
    next: usize,
    prev: usize,
}

pub(crate) struct EdgeDict {
    nodes: Pool<DictNode>,
}

impl EdgeDict {
    pub fn new(alloc: &mut dyn Allocator, config: &AllocatorConfig) -> Result<Self> {
        let mut nodes = Pool::new(EntityKind::DictNode, config);
        let head = nodes.insert(
            alloc,
            DictNode {
                key: None,
                next: DICT_HEAD,
                prev: DICT_HEAD,
            },
        )?;
        debug_assert_eq!(head, DICT_HEAD);
        Ok(EdgeDict { nodes })
    }

    /// Region stored at `node`; `None` for the head.
    #[inline]
    pub fn key(&self, node: usize) -> Option<usize> {
        self.nodes[node].key
    }

    #[inline]
    pub fn succ(&self, node: usize) -> usize {
        self.nodes[node].next
    }

    #[inline]
    pub fn pred(&self, node: usize) -> usize {
        self.nodes[node].prev
    }

    #[inline]
    pub fn min(&self) -> usize {
        self.nodes[DICT_HEAD].next
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min() == DICT_HEAD
    }

    /// First node (from the bottom) whose key `k` satisfies
    /// `query_leq(k)`, i.e. the query is at or below it. Returns the
    /// head if there is none.
    pub fn search<F: FnMut(usize) -> bool>(&self, mut query_leq: F) -> usize {
        let mut node = DICT_HEAD;
        loop {
            node = self.succ(node);
            match self.key(node) {
                None => return node,
                Some(k) if query_leq(k) => return node,
                _ => {}
            }
        }
    }

    /// Walk down from `node` to the first node whose key `k` satisfies
    /// `leq_query(k)`. A new key belongs right after the returned node
    /// (which may be the head).
    pub fn position_before<F: FnMut(usize) -> bool>(&self, mut node: usize, mut leq_query: F) -> usize {
        loop {
            node = self.pred(node);
            match self.key(node) {
                None => return node,
                Some(k) if leq_query(k) => return node,
                _ => {}
            }
        }
    }

    /// Link a new node holding `key` right after `after`.
    pub fn insert_after(&mut self, alloc: &mut dyn Allocator, after: usize, key: usize) -> Result<usize> {
        let next = self.succ(after);
        let node = self.nodes.insert(
            alloc,
            DictNode {
                key: Some(key),
                next,
                prev: after,
            },
        )?;
        self.nodes[after].next = node;
        self.nodes[next].prev = node;
        Ok(node)
    }

    pub fn delete(&mut self, node: usize) {
        debug_assert_ne!(node, DICT_HEAD);
        let DictNode { next, prev, .. } = self.nodes.remove(node);
        self.nodes[next].prev = prev;
        self.nodes[prev].next = next;
    }

    pub fn release(&mut self, alloc: &mut dyn Allocator) {
        self.nodes.release(alloc);
    }
}
