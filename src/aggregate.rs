use crate::tree::WeightTree;

/// How many leading path segments the live tree keeps.
pub const DEFAULT_MAX_DEPTH: usize = 4;

/// Weight added when a known prefix is observed again. Deliberately below
/// the first-sight weight of 1 so repeat activity reads as warmth, not as
/// new discovery. Tuning constant, not a correctness invariant.
const REVISIT_INCREMENT: f64 = 0.25;

/// Builds the live approximate tree from the scanner's path stream.
///
/// Weights are proxy activity counts, not bytes; they only ever grow within
/// a session. The whole tree is discarded on `reset`, which must run
/// whenever the scan target changes or a new scan starts.
pub struct PathAggregator {
    tree: WeightTree,
    max_depth: usize,
    items_processed: u64,
    dropped: u64,
}

impl PathAggregator {
    pub fn new() -> Self {
        Self::with_depth(DEFAULT_MAX_DEPTH)
    }

    pub fn with_depth(max_depth: usize) -> Self {
        Self {
            tree: Self::fresh_tree(),
            max_depth: max_depth.max(1),
            items_processed: 0,
            dropped: 0,
        }
    }

    fn fresh_tree() -> WeightTree {
        // Placeholder weight 1 until the first child arrives.
        WeightTree::new("/", "/", true, 1.0)
    }

    /// Discard the tree and index and start a fresh session.
    pub fn reset(&mut self) {
        self.tree = Self::fresh_tree();
        self.items_processed = 0;
        self.dropped = 0;
    }

    /// Fold one discovered path into the tree. Returns false when the event
    /// was malformed and dropped; ingestion itself never fails.
    pub fn ingest(&mut self, path: &str, items_processed: u64) -> bool {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            self.dropped += 1;
            return false;
        }

        self.items_processed = self.items_processed.max(items_processed);

        let depth = segments.len().min(self.max_depth);

        // The terminal prefix decides the delta for the whole path: first
        // sight weighs 1, a re-observation weighs the revisit increment.
        // Seen ancestors absorb the same delta, which keeps an interior
        // node's weight equal to the sum of its children's.
        let mut terminal = String::with_capacity(path.len());
        for segment in &segments[..depth] {
            terminal.push('/');
            terminal.push_str(segment);
        }
        let delta = if self.tree.contains(&terminal) {
            REVISIT_INCREMENT
        } else {
            1.0
        };

        let mut prefix = String::with_capacity(path.len());
        let mut parent = self.tree.root();

        for (i, segment) in segments[..depth].iter().enumerate() {
            prefix.push('/');
            prefix.push_str(segment);

            match self.tree.lookup(&prefix) {
                Some(id) => {
                    self.tree.add_weight(id, delta);
                    parent = id;
                }
                None => {
                    // Ancestors are always indexed before descendants, so an
                    // unseen prefix means the terminal is unseen too and
                    // delta is 1. Non-terminal prefixes are directories by
                    // construction; a terminal segment starts as a file and
                    // is promoted when a child is attached under it later.
                    let is_dir = i + 1 < depth;
                    parent = self.tree.append_child(parent, segment, &prefix, is_dir, 1.0);
                }
            }
        }

        self.tree.resum_root();
        true
    }

    pub fn tree(&self) -> &WeightTree {
        &self.tree
    }

    pub fn items_processed(&self) -> u64 {
        self.items_processed
    }

    /// Malformed events dropped at the boundary, for diagnostics.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl Default for PathAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_to_end_depth_two() {
        let mut agg = PathAggregator::with_depth(2);
        agg.ingest("/a/b/file1", 1);
        agg.ingest("/a/b/file2", 2);
        agg.ingest("/a/c", 3);

        let tree = agg.tree();
        // root -> {/a} -> {/a/b, /a/c}; file1/file2 truncated away.
        assert_eq!(tree.child_count(tree.root()), 1);
        let a = tree.lookup("/a").unwrap();
        assert_eq!(tree.child_count(a), 2);
        assert!(tree.contains("/a/b"));
        assert!(tree.contains("/a/c"));
        assert!(!tree.contains("/a/b/file1"));

        let b = tree.lookup("/a/b").unwrap();
        let c = tree.lookup("/a/c").unwrap();
        let sum = tree.node(b).weight + tree.node(c).weight;
        assert_eq!(tree.node(a).weight, sum);
        assert_eq!(tree.node(b).weight, 1.0 + REVISIT_INCREMENT);
        assert_eq!(tree.node(c).weight, 1.0);
        assert_eq!(tree.node(tree.root()).weight, tree.node(a).weight);
    }

    #[test]
    fn test_aggregation_identity() {
        // Distinct nodes == distinct depth-truncated prefixes, regardless
        // of order and repetition.
        let paths = [
            "/x/one/deep/deeper",
            "/x/one",
            "/x/two/file",
            "/x/one/deep/deeper",
            "/y",
        ];
        let mut agg = PathAggregator::with_depth(3);
        for (i, p) in paths.iter().enumerate() {
            agg.ingest(p, i as u64);
        }

        let mut expected: std::collections::HashSet<String> = std::collections::HashSet::new();
        expected.insert("/".to_string());
        for p in &paths {
            let segs: Vec<&str> = p.split('/').filter(|s| !s.is_empty()).collect();
            let mut prefix = String::new();
            for s in segs.iter().take(3) {
                prefix.push('/');
                prefix.push_str(s);
                expected.insert(prefix.clone());
            }
        }

        let mut actual: Vec<String> = agg.tree().paths();
        actual.sort();
        let mut expected: Vec<String> = expected.into_iter().collect();
        expected.sort();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_weight_monotonicity() {
        let mut agg = PathAggregator::new();
        agg.ingest("/a/b", 1);
        let w1 = {
            let t = agg.tree();
            t.node(t.lookup("/a").unwrap()).weight
        };
        agg.ingest("/a/c", 2);
        agg.ingest("/a/b", 3);
        let t = agg.tree();
        let w2 = t.node(t.lookup("/a").unwrap()).weight;
        assert!(w2 >= w1);
    }

    #[test]
    fn test_reset_isolation() {
        let mut agg = PathAggregator::new();
        agg.ingest("/a/b", 1);
        agg.ingest("/c", 2);
        agg.reset();

        let fresh = PathAggregator::new();
        let mut a: Vec<String> = agg.tree().paths();
        let mut b: Vec<String> = fresh.tree().paths();
        a.sort();
        b.sort();
        assert_eq!(a, b);
        assert_eq!(agg.items_processed(), 0);
    }

    #[test]
    fn test_empty_path_is_dropped() {
        let mut agg = PathAggregator::new();
        assert!(!agg.ingest("", 1));
        assert!(!agg.ingest("///", 2));
        assert_eq!(agg.dropped(), 2);
        assert_eq!(agg.tree().len(), 1);
    }

    #[test]
    fn test_terminal_segment_promoted_to_dir() {
        let mut agg = PathAggregator::new();
        agg.ingest("/a/b", 1);
        {
            let t = agg.tree();
            assert!(!t.node(t.lookup("/a/b").unwrap()).is_dir);
        }
        agg.ingest("/a/b/c", 2);
        let t = agg.tree();
        assert!(t.node(t.lookup("/a/b").unwrap()).is_dir);
    }

    #[test]
    fn test_disjoint_branch_ingested() {
        let mut agg = PathAggregator::new();
        agg.ingest("/home/u/file", 1);
        agg.ingest("/var/log/syslog", 2);
        assert!(agg.tree().contains("/home"));
        assert!(agg.tree().contains("/var/log"));
    }
}
