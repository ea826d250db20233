use crate::error::{Error, Result};

/// Disjoint-set forest over `0..n` with path compression and union by size.
#[derive(Clone, Debug)]
pub(crate) struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl UnionFind {
    /// Every element in its own set.
    pub(crate) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    /// Representative of `x`'s set.
    pub(crate) fn find(&mut self, x: usize) -> usize {
        // Iterative so long chains cannot overflow the stack.
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = x;
        while cur != root {
            cur = std::mem::replace(&mut self.parent[cur], root);
        }
        root
    }

    /// Merge the sets holding `a` and `b`; returns the surviving root.
    pub(crate) fn union(&mut self, a: usize, b: usize) -> usize {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return ra;
        }
        let (big, small) = if self.size[ra] >= self.size[rb] {
            (ra, rb)
        } else {
            (rb, ra)
        };
        self.parent[small] = big;
        self.size[big] += self.size[small];
        big
    }

    /// Dense component labels in first-occurrence order.
    pub(crate) fn labels(&mut self) -> Vec<usize> {
        let n = self.parent.len();
        let mut root_label = vec![usize::MAX; n];
        let mut next = 0;
        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            let r = self.find(i);
            if root_label[r] == usize::MAX {
                root_label[r] = next;
                next += 1;
            }
            out.push(root_label[r]);
        }
        out
    }
}

#[inline]
pub(crate) fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Check that every row has the same length and return it.
///
/// Empty input has dimension 0.
pub(crate) fn common_dim(data: &[Vec<f64>]) -> Result<usize> {
    let Some(first) = data.first() else {
        return Ok(0);
    };
    let d = first.len();
    for point in data.iter().skip(1) {
        if point.len() != d {
            return Err(Error::DimensionMismatch {
                expected: d,
                found: point.len(),
            });
        }
    }
    Ok(d)
}

/// Coordinate-wise mean of the rows.
pub(crate) fn centroid(data: &[Vec<f64>], d: usize) -> Vec<f64> {
    let mut c = vec![0.0; d];
    for row in data {
        for (s, x) in c.iter_mut().zip(row) {
            *s += x;
        }
    }
    let count = data.len().max(1) as f64;
    c.iter_mut().for_each(|s| *s /= count);
    c
}

/// Squared-distance slack under which two rows count as the same location.
///
/// Scales with the largest squared norm so large coordinates get a
/// proportional allowance.
pub(crate) fn duplicate_floor(data: &[Vec<f64>], tol: f64) -> f64 {
    let scale = data
        .iter()
        .map(|row| row.iter().map(|x| x * x).sum::<f64>())
        .fold(0.0f64, f64::max);
    tol * (1.0 + scale)
}

/// True when every row lies within the duplicate floor of the centroid.
pub(crate) fn is_degenerate(data: &[Vec<f64>], tol: f64) -> bool {
    if data.len() <= 1 {
        return true;
    }
    let c = centroid(data, data[0].len());
    let limit = duplicate_floor(data, tol);
    data.iter().all(|row| squared_euclidean(row, &c) <= limit)
}

/// Minimum spanning tree of the complete graph on `0..n` (Prim, O(n²)).
///
/// `weight(i, j)` gives the edge weight. Returns `n - 1` edges
/// `(tree_vertex, joining_vertex, weight)` in the order vertices join.
pub(crate) fn prim_mst(n: usize, weight: impl Fn(usize, usize) -> f64) -> Vec<(usize, usize, f64)> {
    let mut edges = Vec::with_capacity(n.saturating_sub(1));
    if n <= 1 {
        return edges;
    }

    // Cheapest known link from each outside vertex into the tree.
    let mut link = vec![(0usize, f64::INFINITY); n];
    let mut outside: Vec<usize> = (1..n).collect();
    let mut newest = 0;

    while !outside.is_empty() {
        for &v in &outside {
            let w = weight(newest, v);
            if w < link[v].1 {
                link[v] = (newest, w);
            }
        }
        let Some(pos) = (0..outside.len())
            .min_by(|&a, &b| link[outside[a]].1.total_cmp(&link[outside[b]].1))
        else {
            break;
        };
        newest = outside.remove(pos);
        let (from, w) = link[newest];
        edges.push((from, newest, w));
    }
    edges
}
