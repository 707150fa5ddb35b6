use indextree::NodeId;

use crate::tree::WeightTree;

/// Gap subtracted from a parent rectangle's interior before its children
/// are laid out.
pub const DEFAULT_PADDING: f32 = 2.0;

/// Band reserved at the top of subdivided directory rectangles for a label.
pub const DEFAULT_HEADER: f32 = 16.0;

/// Smallest interior side worth subdividing.
const MIN_RECURSE_SIDE: f32 = 4.0;

/// One laid-out rectangle, keyed by the path of the node it represents.
/// Emitted with integer pixel coordinates; `x1 >= x0`, `y1 >= y0`.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRect {
    pub path: String,
    pub name: String,
    pub weight: f64,
    pub is_dir: bool,
    /// True when this rectangle was subdivided into depth-2 children.
    pub subdivided: bool,
    /// Depth relative to the render root (1 or 2; the root itself is not drawn).
    pub depth: u16,
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl LayoutRect {
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }
}

/// Unrounded working rectangle. Coordinates stay fractional until emission
/// so rounding error does not compound across rows.
#[derive(Debug, Clone, Copy)]
struct Region {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

impl Region {
    fn short_side(&self) -> f64 {
        f64::from(self.w.min(self.h))
    }
}

/// Squarified treemap layout (Bruls, Huizing, van Wijk) over a weighted
/// hierarchy, bounded to two rendered levels.
pub struct TreemapLayout {
    pub padding: f32,
    pub header: f32,
}

impl Default for TreemapLayout {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
            header: DEFAULT_HEADER,
        }
    }
}

impl TreemapLayout {
    /// Compute rectangles for `root`'s children and, for subdivided
    /// directories, grandchildren. Pure function of (tree, width, height):
    /// identical inputs produce identical output, parents ordered before
    /// their children.
    pub fn layout(&self, tree: &WeightTree, root: NodeId, width: f32, height: f32) -> Vec<LayoutRect> {
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Vec::new();
        }

        let container = Region {
            x: 0.0,
            y: 0.0,
            w: width,
            h: height,
        };

        let mut out = Vec::new();
        self.layout_level(tree, root, container, 1, &mut out);
        out
    }

    fn layout_level(
        &self,
        tree: &WeightTree,
        parent: NodeId,
        container: Region,
        depth: u16,
        out: &mut Vec<LayoutRect>,
    ) {
        // Zero-weight nodes stay in the data tree but are not laid out.
        let children: Vec<NodeId> = tree
            .children(parent)
            .filter(|&id| tree.node(id).weight > 0.0)
            .collect();
        if children.is_empty() {
            return;
        }

        // Descending weight; the sort is stable, so equal weights keep
        // discovery order and the output stays deterministic.
        let mut ordered = children;
        ordered.sort_by(|&a, &b| tree.node(b).weight.total_cmp(&tree.node(a).weight));

        let weights: Vec<f64> = ordered.iter().map(|&id| tree.node(id).weight).collect();
        let regions = squarify(&weights, container);

        for (&id, region) in ordered.iter().zip(regions.iter()) {
            let node = tree.node(id);
            let rect_index = out.len();

            out.push(LayoutRect {
                path: node.path.clone(),
                name: node.name.clone(),
                weight: node.weight,
                is_dir: node.is_dir,
                subdivided: false,
                depth,
                x0: region.x.round(),
                y0: region.y.round(),
                x1: (region.x + region.w).round(),
                y1: (region.y + region.h).round(),
            });

            // Two-level mode: only the render root's children recurse, once.
            if depth >= 2 || !node.is_dir || tree.child_count(id) == 0 {
                continue;
            }

            let inner = Region {
                x: region.x + self.padding,
                y: region.y + self.header,
                w: region.w - 2.0 * self.padding,
                h: region.h - self.header - self.padding,
            };
            if inner.w <= MIN_RECURSE_SIDE || inner.h <= MIN_RECURSE_SIDE {
                continue;
            }

            let before = out.len();
            self.layout_level(tree, id, inner, depth + 1, out);
            if out.len() > before {
                out[rect_index].subdivided = true;
            }
        }
    }
}

/// Partition `container` into one region per weight, row by row along the
/// container's shorter side, accepting items into a row while the worst
/// aspect ratio does not degrade.
fn squarify(weights: &[f64], container: Region) -> Vec<Region> {
    let n = weights.len();
    let total: f64 = weights.iter().sum();
    if n == 0 || total <= 0.0 {
        return Vec::new();
    }

    // Normalize weights to container area; all further math is in px².
    let scale = f64::from(container.w) * f64::from(container.h) / total;
    let areas: Vec<f64> = weights.iter().map(|w| w * scale).collect();

    let mut regions = Vec::with_capacity(n);
    let mut remaining = container;
    let mut start = 0;

    while start < n {
        let mut end = start + 1;
        let mut worst = row_worst(&areas[start..end], remaining.short_side());
        while end < n {
            let widened = row_worst(&areas[start..=end], remaining.short_side());
            if widened <= worst {
                worst = widened;
                end += 1;
            } else {
                break;
            }
        }

        let row_area: f64 = areas[start..end].iter().sum();
        lay_row(&areas[start..end], &mut remaining, row_area, &mut regions);
        start = end;
    }

    regions
}

/// Worst aspect ratio of a row whose strip spans a side of length `side`.
fn row_worst(row: &[f64], side: f64) -> f64 {
    let sum: f64 = row.iter().sum();
    if sum <= 0.0 || side <= 0.0 {
        return f64::INFINITY;
    }
    let max = row.iter().copied().fold(f64::MIN, f64::max);
    let min = row.iter().copied().fold(f64::MAX, f64::min);
    let s2 = side * side;
    (s2 * max / (sum * sum)).max(sum * sum / (s2 * min))
}

/// Lay one row across the shorter side of `remaining`, shrink `remaining`
/// by the consumed strip, and append the row's regions in order.
fn lay_row(row: &[f64], remaining: &mut Region, row_area: f64, out: &mut Vec<Region>) {
    if remaining.w < remaining.h {
        // Strip spans the full width, stacked from the top.
        let strip_h = (row_area / f64::from(remaining.w)) as f32;
        let mut x = remaining.x;
        for &area in row {
            let w = (area / f64::from(strip_h).max(f64::MIN_POSITIVE)) as f32;
            out.push(Region {
                x,
                y: remaining.y,
                w,
                h: strip_h,
            });
            x += w;
        }
        remaining.y += strip_h;
        remaining.h -= strip_h;
    } else {
        // Strip spans the full height, consumed from the left.
        let strip_w = (row_area / f64::from(remaining.h)) as f32;
        let mut y = remaining.y;
        for &area in row {
            let h = (area / f64::from(strip_w).max(f64::MIN_POSITIVE)) as f32;
            out.push(Region {
                x: remaining.x,
                y,
                w: strip_w,
                h,
            });
            y += h;
        }
        remaining.x += strip_w;
        remaining.w -= strip_w;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::WeightTree;

    fn flat_tree(weights: &[f64]) -> WeightTree {
        let mut tree = WeightTree::new("root", "/r", true, weights.iter().sum());
        for (i, &w) in weights.iter().enumerate() {
            tree.append_child(
                tree.root(),
                &format!("c{i}"),
                &format!("/r/c{i}"),
                false,
                w,
            );
        }
        tree
    }

    #[test]
    fn test_three_to_one_split() {
        let tree = flat_tree(&[3.0, 1.0]);
        let engine = TreemapLayout::default();
        let rects = engine.layout(&tree, tree.root(), 100.0, 100.0);

        assert_eq!(rects.len(), 2);
        let a = &rects[0];
        let b = &rects[1];
        assert!((a.area() - 7500.0).abs() < 300.0, "a.area = {}", a.area());
        assert!((b.area() - 2500.0).abs() < 300.0, "b.area = {}", b.area());
        // Shared boundary, both inside the container.
        assert_eq!(a.x1, b.x0);
        for r in rects.iter() {
            assert!(r.x0 >= 0.0 && r.y0 >= 0.0 && r.x1 <= 100.0 && r.y1 <= 100.0);
        }
    }

    #[test]
    fn test_area_conservation() {
        let tree = flat_tree(&[5.0, 4.0, 3.0, 2.0, 1.0, 0.5, 0.25]);
        let engine = TreemapLayout::default();
        let rects = engine.layout(&tree, tree.root(), 640.0, 480.0);

        assert_eq!(rects.len(), 7);
        let total: f32 = rects.iter().map(LayoutRect::area).sum();
        // One pixel of rounding per rectangle edge is tolerated.
        let tolerance: f32 = rects
            .iter()
            .map(|r| 2.0 * (r.width() + r.height()) + 1.0)
            .sum();
        assert!(
            (total - 640.0 * 480.0).abs() <= tolerance,
            "total = {total}"
        );
    }

    #[test]
    fn test_sibling_non_overlap() {
        let tree = flat_tree(&[8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0]);
        let engine = TreemapLayout::default();
        let rects = engine.layout(&tree, tree.root(), 512.0, 300.0);

        for (i, a) in rects.iter().enumerate() {
            for b in rects.iter().skip(i + 1) {
                let ix = (a.x1.min(b.x1) - a.x0.max(b.x0)).max(0.0);
                let iy = (a.y1.min(b.y1) - a.y0.max(b.y0)).max(0.0);
                assert_eq!(
                    ix * iy,
                    0.0,
                    "{} and {} overlap by {}",
                    a.path,
                    b.path,
                    ix * iy
                );
            }
        }
    }

    #[test]
    fn test_determinism() {
        let mut tree = flat_tree(&[4.0, 4.0, 2.0, 2.0, 1.0]);
        let sub = tree.lookup("/r/c0").unwrap();
        tree.append_child(sub, "g0", "/r/c0/g0", false, 3.0);
        tree.append_child(sub, "g1", "/r/c0/g1", false, 1.0);

        let engine = TreemapLayout::default();
        let first = engine.layout(&tree, tree.root(), 800.0, 600.0);
        let second = engine.layout(&tree, tree.root(), 800.0, 600.0);
        assert_eq!(first, second);
    }

    #[test]
    fn test_equal_weights_keep_discovery_order() {
        let tree = flat_tree(&[1.0, 1.0, 1.0]);
        let engine = TreemapLayout::default();
        let rects = engine.layout(&tree, tree.root(), 300.0, 100.0);
        let paths: Vec<&str> = rects.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["/r/c0", "/r/c1", "/r/c2"]);
    }

    #[test]
    fn test_zero_weight_children_excluded() {
        let tree = flat_tree(&[3.0, 0.0, 1.0]);
        let engine = TreemapLayout::default();
        let rects = engine.layout(&tree, tree.root(), 100.0, 100.0);
        assert_eq!(rects.len(), 2);
        assert!(rects.iter().all(|r| r.path != "/r/c1"));
    }

    #[test]
    fn test_single_child_fills_container() {
        let tree = flat_tree(&[42.0]);
        let engine = TreemapLayout::default();
        let rects = engine.layout(&tree, tree.root(), 200.0, 120.0);
        assert_eq!(rects.len(), 1);
        let r = &rects[0];
        assert_eq!((r.x0, r.y0, r.x1, r.y1), (0.0, 0.0, 200.0, 120.0));
    }

    #[test]
    fn test_degenerate_container_renders_nothing() {
        let tree = flat_tree(&[1.0, 2.0]);
        let engine = TreemapLayout::default();
        assert!(engine.layout(&tree, tree.root(), 0.0, 100.0).is_empty());
        assert!(engine.layout(&tree, tree.root(), f32::NAN, 100.0).is_empty());
        assert!(engine
            .layout(&tree, tree.root(), f32::INFINITY, 100.0)
            .is_empty());
    }

    #[test]
    fn test_two_level_emission() {
        let mut tree = WeightTree::new("root", "/r", true, 10.0);
        let dir = tree.append_child(tree.root(), "dir", "/r/dir", true, 8.0);
        tree.append_child(tree.root(), "file", "/r/file", false, 2.0);
        tree.append_child(dir, "a", "/r/dir/a", false, 5.0);
        let deep = tree.append_child(dir, "b", "/r/dir/b", true, 3.0);
        tree.append_child(deep, "c", "/r/dir/b/c", false, 3.0);

        let engine = TreemapLayout::default();
        let rects = engine.layout(&tree, tree.root(), 400.0, 300.0);

        // Depth 1: dir + file. Depth 2: a + b. Depth 3 (/r/dir/b/c) is not
        // laid out.
        assert!(rects.iter().any(|r| r.path == "/r/dir" && r.depth == 1));
        assert!(rects.iter().any(|r| r.path == "/r/file" && r.depth == 1));
        assert!(rects.iter().any(|r| r.path == "/r/dir/a" && r.depth == 2));
        assert!(rects.iter().any(|r| r.path == "/r/dir/b" && r.depth == 2));
        assert!(rects.iter().all(|r| r.path != "/r/dir/b/c"));

        // Parent precedes its children; the parent knows it was subdivided.
        let dir_at = rects.iter().position(|r| r.path == "/r/dir").unwrap();
        let a_at = rects.iter().position(|r| r.path == "/r/dir/a").unwrap();
        assert!(dir_at < a_at);
        assert!(rects[dir_at].subdivided);

        // Children stay inside the parent's interior.
        let p = &rects[dir_at];
        let c = &rects[a_at];
        assert!(c.x0 >= p.x0 && c.x1 <= p.x1);
        assert!(c.y0 >= p.y0 + DEFAULT_HEADER - 1.0 && c.y1 <= p.y1);
    }

    #[test]
    fn test_layout_does_not_mutate_tree() {
        let tree = flat_tree(&[3.0, 1.0]);
        let before: Vec<f64> = tree
            .children(tree.root())
            .map(|id| tree.node(id).weight)
            .collect();
        let engine = TreemapLayout::default();
        let _ = engine.layout(&tree, tree.root(), 100.0, 100.0);
        let after: Vec<f64> = tree
            .children(tree.root())
            .map(|id| tree.node(id).weight)
            .collect();
        assert_eq!(before, after);
    }
}
