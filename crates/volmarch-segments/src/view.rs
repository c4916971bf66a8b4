//! Read-only view over a ray segments collection.
//!
//! A collection stores, per ray, an ordered list of edges (interval
//! boundaries along the ray parameter `t`), each optionally flagged as an
//! interval start (`is_left`) and/or end (`is_right`). Two layouts exist:
//!
//! - **Packed**: one contiguous edges array; ray `r` owns
//!   `[chunk_starts[r], chunk_starts[r] + chunk_cnts[r])`.
//! - **Batched**: every ray owns exactly `n_edges_per_ray` edges at
//!   `[r * n, (r + 1) * n)`.
//!
//! The layout is fixed at construction. Constructors check lengths and
//! counts; accessors only `debug_assert!` their indices.

use std::ops::Range;

use tracing::debug;

use crate::error::{Result, SegmentsError};
use crate::pack::check_counts;

/// How edges are distributed over rays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentLayout<'a> {
    /// Variable-length chunks.
    Packed {
        /// Edge count per ray.
        chunk_cnts: &'a [i64],
        /// Offset of each ray's chunk (exclusive prefix sum of the counts).
        chunk_starts: Option<&'a [i64]>,
    },
    /// Fixed stride.
    Batched {
        /// Number of rays.
        n_rays: usize,
        /// Edges per ray.
        n_edges_per_ray: usize,
    },
}

/// Borrowed ray segments collection.
#[derive(Debug, Clone, Copy)]
pub struct RaySegmentsView<'a> {
    edges: &'a [f32],
    is_left: Option<&'a [bool]>,
    is_right: Option<&'a [bool]>,
    ray_ids: Option<&'a [i64]>,
    layout: SegmentLayout<'a>,
}

impl<'a> RaySegmentsView<'a> {
    /// Bind a packed view: `edges` split into chunks of `chunk_cnts[r]`.
    ///
    /// # Errors
    ///
    /// Fails if a count is negative or the counts do not sum to
    /// `edges.len()`.
    pub fn packed(edges: &'a [f32], chunk_cnts: &'a [i64]) -> Result<Self> {
        check_counts(chunk_cnts, edges.len())?;
        debug!(
            n_rays = chunk_cnts.len(),
            n_edges = edges.len(),
            "bound packed ray segments"
        );
        Ok(Self {
            edges,
            is_left: None,
            is_right: None,
            ray_ids: None,
            layout: SegmentLayout::Packed {
                chunk_cnts,
                chunk_starts: None,
            },
        })
    }

    /// Bind a batched view of `n_rays` rays with `n_edges_per_ray` edges each.
    ///
    /// # Errors
    ///
    /// Fails unless `edges.len() == n_rays * n_edges_per_ray`.
    pub fn batched(edges: &'a [f32], n_rays: usize, n_edges_per_ray: usize) -> Result<Self> {
        let Some(expected) = n_rays.checked_mul(n_edges_per_ray) else {
            return Err(SegmentsError::InvalidLayout(format!(
                "{n_rays} rays x {n_edges_per_ray} edges overflows usize"
            )));
        };
        if edges.len() != expected {
            return Err(SegmentsError::ShapeMismatch {
                name: "edges",
                expected,
                actual: edges.len(),
            });
        }
        debug!(n_rays, n_edges_per_ray, "bound batched ray segments");
        Ok(Self {
            edges,
            is_left: None,
            is_right: None,
            ray_ids: None,
            layout: SegmentLayout::Batched {
                n_rays,
                n_edges_per_ray,
            },
        })
    }

    /// Bind a view choosing the layout from the declared edges shape.
    ///
    /// Rank 2 `[n_rays, n_edges_per_ray]` is batched; rank 1 `[n_edges]` is
    /// packed and requires `chunk_cnts`.
    pub fn from_shape(
        edges: &'a [f32],
        shape: &[usize],
        chunk_cnts: Option<&'a [i64]>,
    ) -> Result<Self> {
        match *shape {
            [n_rays, n_edges_per_ray] => Self::batched(edges, n_rays, n_edges_per_ray),
            [n_edges] => {
                if n_edges != edges.len() {
                    return Err(SegmentsError::ShapeMismatch {
                        name: "edges",
                        expected: n_edges,
                        actual: edges.len(),
                    });
                }
                let chunk_cnts = chunk_cnts.ok_or(SegmentsError::MissingField("chunk_cnts"))?;
                Self::packed(edges, chunk_cnts)
            }
            _ => Err(SegmentsError::InvalidRank(shape.to_vec())),
        }
    }

    /// Packed view over buffers already known to be consistent.
    pub(crate) fn from_parts(
        edges: &'a [f32],
        is_left: Option<&'a [bool]>,
        is_right: Option<&'a [bool]>,
        chunk_cnts: &'a [i64],
        chunk_starts: &'a [i64],
        ray_ids: &'a [i64],
    ) -> Self {
        Self {
            edges,
            is_left,
            is_right,
            ray_ids: Some(ray_ids),
            layout: SegmentLayout::Packed {
                chunk_cnts,
                chunk_starts: Some(chunk_starts),
            },
        }
    }

    /// Attach chunk offsets to a packed view.
    ///
    /// # Errors
    ///
    /// Fails on a batched view, on a length other than `n_rays`, or if a
    /// chunk would run outside the edges buffer.
    pub fn with_chunk_starts(mut self, starts: &'a [i64]) -> Result<Self> {
        let SegmentLayout::Packed { chunk_cnts, .. } = self.layout else {
            return Err(SegmentsError::InvalidLayout(
                "chunk_starts only applies to the packed layout".into(),
            ));
        };
        if starts.len() != chunk_cnts.len() {
            return Err(SegmentsError::ShapeMismatch {
                name: "chunk_starts",
                expected: chunk_cnts.len(),
                actual: starts.len(),
            });
        }
        let n_edges = self.edges.len();
        for (ray, (&start, &count)) in starts.iter().zip(chunk_cnts).enumerate() {
            let end = start.checked_add(count);
            if start < 0 || end.map_or(true, |end| end > n_edges as i64) {
                return Err(SegmentsError::ChunkOutOfBounds {
                    ray,
                    start,
                    count,
                    n_edges,
                });
            }
        }
        self.layout = SegmentLayout::Packed {
            chunk_cnts,
            chunk_starts: Some(starts),
        };
        Ok(self)
    }

    /// Attach interval-start flags.
    pub fn with_is_left(mut self, is_left: &'a [bool]) -> Result<Self> {
        self.check_per_edge("is_left", is_left.len())?;
        self.is_left = Some(is_left);
        Ok(self)
    }

    /// Attach interval-end flags.
    pub fn with_is_right(mut self, is_right: &'a [bool]) -> Result<Self> {
        self.check_per_edge("is_right", is_right.len())?;
        self.is_right = Some(is_right);
        Ok(self)
    }

    /// Attach the edge-to-ray map.
    ///
    /// # Errors
    ///
    /// Fails on a length other than `n_edges` or an id outside `[0, n_rays)`.
    pub fn with_ray_ids(mut self, ray_ids: &'a [i64]) -> Result<Self> {
        self.check_per_edge("ray_ids", ray_ids.len())?;
        let n_rays = self.n_rays();
        if let Some((index, &id)) = ray_ids
            .iter()
            .enumerate()
            .find(|&(_, &id)| id < 0 || id >= n_rays as i64)
        {
            return Err(SegmentsError::RayIdOutOfRange { index, id, n_rays });
        }
        self.ray_ids = Some(ray_ids);
        Ok(self)
    }

    fn check_per_edge(&self, name: &'static str, len: usize) -> Result<()> {
        if len != self.edges.len() {
            return Err(SegmentsError::ShapeMismatch {
                name,
                expected: self.edges.len(),
                actual: len,
            });
        }
        Ok(())
    }

    /// The layout of this collection.
    #[inline]
    pub fn layout(&self) -> SegmentLayout<'a> {
        self.layout
    }

    /// True for the fixed-stride layout.
    #[inline]
    pub fn is_batched(&self) -> bool {
        matches!(self.layout, SegmentLayout::Batched { .. })
    }

    /// True if `is_left`/`is_right` are both attached.
    #[inline]
    pub fn has_flags(&self) -> bool {
        self.is_left.is_some() && self.is_right.is_some()
    }

    /// Number of rays.
    #[inline]
    pub fn n_rays(&self) -> usize {
        match self.layout {
            SegmentLayout::Packed { chunk_cnts, .. } => chunk_cnts.len(),
            SegmentLayout::Batched { n_rays, .. } => n_rays,
        }
    }

    /// Total number of edges.
    #[inline]
    pub fn n_edges(&self) -> usize {
        self.edges.len()
    }

    /// All edges, flattened.
    #[inline]
    pub fn edges(&self) -> &'a [f32] {
        self.edges
    }

    /// Edge value at flattened index `e`.
    #[inline]
    pub fn edge(&self, e: usize) -> f32 {
        self.edges[e]
    }

    /// Whether edge `e` starts an interval, if flags are present.
    #[inline]
    pub fn is_left(&self, e: usize) -> Option<bool> {
        self.is_left.map(|f| f[e])
    }

    /// Whether edge `e` ends an interval, if flags are present.
    #[inline]
    pub fn is_right(&self, e: usize) -> Option<bool> {
        self.is_right.map(|f| f[e])
    }

    /// Owning ray of edge `e`.
    ///
    /// Read from `ray_ids` when attached, derived from the stride for the
    /// batched layout, otherwise `None`.
    #[inline]
    pub fn ray_id(&self, e: usize) -> Option<usize> {
        debug_assert!(e < self.edges.len(), "edge index {e} out of range");
        if let Some(ids) = self.ray_ids {
            debug_assert!(ids[e] >= 0, "negative ray id at edge {e}");
            return Some(ids[e] as usize);
        }
        match self.layout {
            SegmentLayout::Batched {
                n_edges_per_ray, ..
            } => Some(e / n_edges_per_ray),
            SegmentLayout::Packed { .. } => None,
        }
    }

    /// Number of edges of ray `r`.
    #[inline]
    pub fn chunk_cnt(&self, r: usize) -> usize {
        debug_assert!(r < self.n_rays(), "ray id {r} out of range");
        match self.layout {
            SegmentLayout::Packed { chunk_cnts, .. } => chunk_cnts[r] as usize,
            SegmentLayout::Batched {
                n_edges_per_ray, ..
            } => n_edges_per_ray,
        }
    }

    /// Flattened offset of ray `r`'s first edge.
    ///
    /// # Panics
    ///
    /// Panics on a packed view without `chunk_starts`; derive them once with
    /// [`exclusive_sum`](crate::exclusive_sum) and attach them with
    /// [`with_chunk_starts`](Self::with_chunk_starts).
    #[inline]
    pub fn chunk_start(&self, r: usize) -> usize {
        debug_assert!(r < self.n_rays(), "ray id {r} out of range");
        match self.layout {
            SegmentLayout::Packed { chunk_starts, .. } => {
                let Some(starts) = chunk_starts else {
                    panic!("packed ray segments need chunk_starts for per-ray access");
                };
                starts[r] as usize
            }
            SegmentLayout::Batched {
                n_edges_per_ray, ..
            } => r * n_edges_per_ray,
        }
    }

    /// Flattened index range of ray `r`'s edges.
    #[inline]
    pub fn chunk_range(&self, r: usize) -> Range<usize> {
        let start = self.chunk_start(r);
        start..start + self.chunk_cnt(r)
    }

    /// Ray `r`'s edges and flags.
    #[inline]
    pub fn chunk(&self, r: usize) -> RayChunk<'a> {
        let range = self.chunk_range(r);
        RayChunk {
            ray_id: r,
            start: range.start,
            edges: &self.edges[range.clone()],
            is_left: self.is_left.map(|f| &f[range.clone()]),
            is_right: self.is_right.map(|f| &f[range]),
        }
    }

    /// Chunks of every ray in order.
    pub fn chunks(&self) -> impl ExactSizeIterator<Item = RayChunk<'a>> + '_ {
        (0..self.n_rays()).map(move |r| self.chunk(r))
    }

    /// Edges flagged as interval starts, in flattened order.
    ///
    /// `None` without `is_left` flags.
    pub fn t_starts(&self) -> Option<impl Iterator<Item = f32> + 'a> {
        let edges = self.edges;
        self.is_left.map(move |flags| select(edges, flags))
    }

    /// Edges flagged as interval ends, in flattened order.
    ///
    /// `None` without `is_right` flags.
    pub fn t_ends(&self) -> Option<impl Iterator<Item = f32> + 'a> {
        let edges = self.edges;
        self.is_right.map(move |flags| select(edges, flags))
    }

    /// Check that every ray's edges are non-decreasing, O(n_edges).
    ///
    /// Works on packed views without `chunk_starts` by walking the counts
    /// in order.
    pub fn validate_ordering(&self) -> Result<()> {
        self.walk(false)
    }

    /// [`validate_ordering`](Self::validate_ordering), plus a check that
    /// `ray_ids`, when present, agree with the chunk layout.
    pub fn validate(&self) -> Result<()> {
        self.walk(true)
    }

    fn walk(&self, check_ids: bool) -> Result<()> {
        let ids = self.ray_ids.filter(|_| check_ids);
        let mut next = 0usize;
        for r in 0..self.n_rays() {
            let range = match self.layout {
                SegmentLayout::Packed {
                    chunk_starts: None, ..
                } => next..next + self.chunk_cnt(r),
                _ => self.chunk_range(r),
            };
            next = range.end;
            for e in range.clone() {
                if e > range.start && self.edges[e] < self.edges[e - 1] {
                    return Err(SegmentsError::UnsortedChunk { ray: r, index: e });
                }
                if let Some(ids) = ids {
                    if ids[e] != r as i64 {
                        return Err(SegmentsError::RayIdMismatch {
                            index: e,
                            expected: r,
                            actual: ids[e],
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

fn select<'a>(edges: &'a [f32], flags: &'a [bool]) -> impl Iterator<Item = f32> + 'a {
    edges
        .iter()
        .zip(flags)
        .filter(|&(_, &f)| f)
        .map(|(&t, _)| t)
}

/// One ray's slice of a segments collection.
#[derive(Debug, Clone, Copy)]
pub struct RayChunk<'a> {
    /// Ray id.
    pub ray_id: usize,
    /// Flattened index of the first edge.
    pub start: usize,
    /// The ray's edges.
    pub edges: &'a [f32],
    /// Interval-start flags, if present.
    pub is_left: Option<&'a [bool]>,
    /// Interval-end flags, if present.
    pub is_right: Option<&'a [bool]>,
}

impl<'a> RayChunk<'a> {
    /// Number of edges.
    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// True if the ray has no edges.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// `(t_start, t_end)` pairs of this ray.
    ///
    /// With both flag arrays, the k-th left-flagged edge pairs with the k-th
    /// right-flagged edge (an edge may be both, closing one interval and
    /// opening the next). Without them, consecutive edges bound an interval.
    pub fn intervals(&self) -> Intervals<'a> {
        Intervals {
            edges: self.edges,
            flags: self.is_left.zip(self.is_right),
            left: 0,
            right: 0,
        }
    }
}

/// Iterator over `(t_start, t_end)` pairs of one ray.
#[derive(Debug, Clone)]
pub struct Intervals<'a> {
    edges: &'a [f32],
    flags: Option<(&'a [bool], &'a [bool])>,
    left: usize,
    right: usize,
}

impl Iterator for Intervals<'_> {
    type Item = (f32, f32);

    fn next(&mut self) -> Option<Self::Item> {
        match self.flags {
            Some((is_left, is_right)) => {
                while self.left < self.edges.len() && !is_left[self.left] {
                    self.left += 1;
                }
                while self.right < self.edges.len() && !is_right[self.right] {
                    self.right += 1;
                }
                if self.left >= self.edges.len() || self.right >= self.edges.len() {
                    return None;
                }
                let out = (self.edges[self.left], self.edges[self.right]);
                self.left += 1;
                self.right += 1;
                Some(out)
            }
            None => {
                if self.left + 1 >= self.edges.len() {
                    return None;
                }
                let out = (self.edges[self.left], self.edges[self.left + 1]);
                self.left += 1;
                Some(out)
            }
        }
    }
}
