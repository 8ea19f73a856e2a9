use std::ops::Range;

use geometry::bvh::{self, BBox};
use geometry::ray::Ray;
use math::hcm::Point3;
use partition::partition;

/// Number of items a leaf may hold when splitting succeeds. Leaves of clustered items (all
/// centroids coincident) may exceed this.
const LEAF_MAX_ITEMS: usize = 4;

/// A binary bounding-volume hierarchy over an externally owned collection.
///
/// The tree never owns or copies the indexed items: it stores a permutation of item indices
/// (`order`) and leaf nodes reference ranges of that permutation. Queries take a closure that
/// resolves an index against the owning collection, so the same structure serves both the scene's
/// primitive arena and the triangles of a single mesh.
///
/// Built once; immutable afterwards. Every item lands in exactly one leaf and every node's box
/// encloses the boxes of its descendants.
pub struct Bvh {
    root: Option<BvhNode>,
    order: Vec<usize>,
}

enum NodeContent {
    /// Two children and the axis their item sets were split on.
    Children([Box<BvhNode>; 2], usize),
    /// A range into `Bvh::order`.
    Leaf(Range<usize>),
}

struct BvhNode {
    bbox: BBox,
    content: NodeContent,
}

use NodeContent::{Children, Leaf};

struct ItemInfo {
    index: usize,
    bbox: BBox,
    centroid: Point3,
}

impl Bvh {
    /// Builds the hierarchy over items `0..item_count`, querying each item's bounds through
    /// `box_getter`. An empty collection produces a tree whose queries always miss. Items with
    /// zero-extent bounds are indexed like any other.
    pub fn build<F>(item_count: usize, box_getter: F) -> Bvh
    where
        F: Fn(usize) -> BBox,
    {
        let mut info = (0..item_count)
            .map(|index| {
                let bbox = box_getter(index);
                ItemInfo {
                    index,
                    bbox,
                    centroid: bbox.midpoint(),
                }
            })
            .collect::<Vec<_>>();
        if info.is_empty() {
            return Bvh {
                root: None,
                order: Vec::new(),
            };
        }
        let whole_range = 0..info.len();
        let root = recursive_build(&mut info, whole_range);
        let order = info.into_iter().map(|item| item.index).collect();
        Bvh {
            root: Some(root),
            order,
        }
    }

    /// Bounds of the whole indexed collection; the empty box for an empty collection.
    pub fn bbox(&self) -> BBox {
        match &self.root {
            None => BBox::empty(),
            Some(node) => node.bbox,
        }
    }

    pub fn height(&self) -> usize {
        self.root.as_ref().map_or(0, BvhNode::height)
    }

    pub fn item_count(&self) -> usize {
        self.order.len()
    }

    /// Finds the nearest hit along `ray`. `item_intersector` resolves one item index against the
    /// owning collection and returns the hit distance plus a payload; the ray it receives has its
    /// extent already shrunk to the best hit found so far, so implementations should reject
    /// candidates at or beyond `t_max`.
    ///
    /// Child boxes are visited front to back (by ray direction sign on the node's split axis) and
    /// a branch is skipped only when its box cannot contain anything closer than the current best.
    pub fn intersect<T, F>(&self, r: &Ray, mut item_intersector: F) -> Option<T>
    where
        F: FnMut(usize, &Ray) -> Option<(f32, T)>,
    {
        let root = self.root.as_ref()?;

        let mut ray = *r;
        let mut best: Option<(f32, T)> = None;
        let mut node_stack = Vec::with_capacity(64);
        node_stack.push(root);
        while let Some(node) = node_stack.pop() {
            if !node.bbox.intersect(&ray) {
                continue;
            }
            match &node.content {
                Leaf(slots) => {
                    for slot in slots.clone() {
                        let index = self.order[slot];
                        if let Some((t, payload)) = item_intersector(index, &ray) {
                            let closer = match &best {
                                None => true,
                                Some((best_t, _)) => t < *best_t,
                            };
                            if closer {
                                ray.set_extent(t);
                                best = Some((t, payload));
                            }
                        }
                    }
                }
                Children([left, right], axis) => {
                    if ray.dir[*axis] > 0.0 {
                        node_stack.push(right);
                        node_stack.push(left);
                    } else {
                        node_stack.push(left);
                        node_stack.push(right);
                    }
                }
            }
        }
        best.map(|(_, payload)| payload)
    }

    /// Any-hit query: true iff some item blocks `ray` within its extent. Exits on the first hit.
    pub fn occludes<F>(&self, r: &Ray, mut item_pred: F) -> bool
    where
        F: FnMut(usize, &Ray) -> bool,
    {
        let root = match &self.root {
            None => return false,
            Some(node) => node,
        };
        let mut node_stack = vec![root];
        while let Some(node) = node_stack.pop() {
            if !node.bbox.intersect(r) {
                continue;
            }
            match &node.content {
                Leaf(slots) => {
                    if slots.clone().any(|slot| item_pred(self.order[slot], r)) {
                        return true;
                    }
                }
                Children([left, right], _) => {
                    node_stack.push(left);
                    node_stack.push(right);
                }
            }
        }
        false
    }

    /// Walks the tree asserting the structural invariants: parent boxes enclose children, and
    /// every item appears in exactly one leaf.
    pub fn geometric_sound(&self) -> bool {
        fn walk(node: &BvhNode, covered: &mut Vec<Range<usize>>) {
            match &node.content {
                Children([left, right], _) => {
                    assert!(node.bbox.encloses(left.bbox));
                    assert!(node.bbox.encloses(right.bbox));
                    walk(left, covered);
                    walk(right, covered);
                }
                Leaf(slots) => covered.push(slots.clone()),
            }
        }
        let mut covered = Vec::new();
        if let Some(root) = &self.root {
            walk(root, &mut covered);
        }
        covered.sort_by_key(|range| range.start);
        let mut expected_start = 0;
        for range in covered {
            assert_eq!(range.start, expected_start);
            expected_start = range.end;
        }
        assert_eq!(expected_start, self.order.len());
        true
    }
}

impl BvhNode {
    fn height(&self) -> usize {
        match &self.content {
            Children([left, right], _) => left.height().max(right.height()) + 1,
            Leaf(_) => 1,
        }
    }
}

fn recursive_build(info: &mut [ItemInfo], range: Range<usize>) -> BvhNode {
    let bbox = info[range.clone()]
        .iter()
        .fold(BBox::empty(), |b, item| bvh::union(b, item.bbox));

    if range.len() <= LEAF_MAX_ITEMS {
        return BvhNode {
            bbox,
            content: Leaf(range),
        };
    }

    let centroid_bbox = info[range.clone()]
        .iter()
        .fold(BBox::empty(), |b, item| b.union(item.centroid));
    let split_axis = centroid_bbox.longest_axis();
    if centroid_bbox.diag()[split_axis] < 1e-8 {
        // All centroids coincide; no split plane separates anything. One oversized leaf is the
        // only sound answer.
        log::debug!("BVH leaf of {} co-located items", range.len());
        return BvhNode {
            bbox,
            content: Leaf(range),
        };
    }

    let pivot_value = centroid_bbox.midpoint()[split_axis];
    let (lesser, _) = partition(&mut info[range.clone()], |item| {
        item.centroid[split_axis] < pivot_value
    });
    let mut mid = range.start + lesser.len();

    if mid == range.start || mid == range.end {
        // The midpoint plane put everything on one side; falls back to equal counts.
        info[range.clone()].select_nth_unstable_by(range.len() / 2, |a, b| {
            a.centroid[split_axis]
                .partial_cmp(&b.centroid[split_axis])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        mid = range.start + range.len() / 2;
    }
    assert!(mid != range.start && mid != range.end);

    let left_child = recursive_build(info, range.start..mid);
    let right_child = recursive_build(info, mid..range.end);

    BvhNode {
        bbox: bvh::union(left_child.bbox, right_child.bbox),
        content: Children([Box::new(left_child), Box::new(right_child)], split_axis),
    }
}
