//! Depth-first traversal over a node and everything below it.

use std::collections::HashSet;

use super::Node;

/// Lazy depth-first walk.
///
/// Yields the start node, then recurses into the 8 children of every branch
/// in slot order. Sentinels end their path. A node reachable through several
/// paths is yielded once per path; use [`distinct_nodes`] when each node is
/// needed once.
pub struct Descendants<'a> {
  stack: Vec<&'a Node>,
}

impl<'a> Descendants<'a> {
  pub fn new(root: &'a Node) -> Self {
    Self { stack: vec![root] }
  }
}

impl<'a> Iterator for Descendants<'a> {
  type Item = &'a Node;

  fn next(&mut self) -> Option<Self::Item> {
    let node = self.stack.pop()?;
    if let Node::Branch(branch) = node {
      self.stack.extend(branch.children().iter().rev());
    }
    Some(node)
  }
}

/// Every distinct node reachable from `root`, children before parents
/// (depth-first post-order).
///
/// Produces the same set as `root.descendants()` deduplicated by identity,
/// but does not re-enter a subtree it has already visited, so the cost is
/// linear in the number of distinct nodes. Nodes that merely share a
/// fingerprint are both kept.
pub fn distinct_nodes(root: &Node) -> Vec<&Node> {
  let mut seen = HashSet::new();
  let mut out = Vec::new();
  // (node, children already pushed)
  let mut stack = vec![(root, false)];
  while let Some((node, expanded)) = stack.pop() {
    if expanded {
      out.push(node);
      continue;
    }
    if !seen.insert(node.identity()) {
      continue;
    }
    stack.push((node, true));
    if let Node::Branch(branch) = node {
      stack.extend(branch.children().iter().rev().map(|child| (child, false)));
    }
  }
  out
}
