//! Owned packed collections, assembled from per-ray results.

use rayon::prelude::*;
use tracing::debug;

use crate::error::Result;
use crate::pack::{exclusive_sum, split_chunks_mut, total_count, unpack_ray_ids};
use crate::view::RaySegmentsView;

/// Exclusive output chunk of one ray, handed to [`RaySegments::par_fill`].
#[derive(Debug)]
pub struct ChunkMut<'a> {
    /// The ray's edges, `chunk_cnts[r]` long.
    pub edges: &'a mut [f32],
    /// Interval-start flags, when the collection carries flags.
    pub is_left: Option<&'a mut [bool]>,
    /// Interval-end flags, when the collection carries flags.
    pub is_right: Option<&'a mut [bool]>,
}

impl ChunkMut<'_> {
    /// Number of edges in the chunk.
    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// True if the chunk holds no edges.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Write edge `i` and its flags. Flags are dropped if the collection
    /// has none.
    #[inline]
    pub fn set(&mut self, i: usize, t: f32, left: bool, right: bool) {
        self.edges[i] = t;
        if let Some(flags) = self.is_left.as_deref_mut() {
            flags[i] = left;
        }
        if let Some(flags) = self.is_right.as_deref_mut() {
            flags[i] = right;
        }
    }
}

/// Owned packed ray segments.
///
/// Always carries `chunk_starts` and `ray_ids`, so its [`view`](Self::view)
/// supports every accessor.
#[derive(Debug, Clone, PartialEq)]
pub struct RaySegments {
    edges: Vec<f32>,
    is_left: Option<Vec<bool>>,
    is_right: Option<Vec<bool>>,
    chunk_cnts: Vec<i64>,
    chunk_starts: Vec<i64>,
    ray_ids: Vec<i64>,
}

impl RaySegments {
    /// Allocate a collection for `chunk_cnts` and let `fill` write each
    /// ray's chunk in parallel.
    ///
    /// `fill(r, chunk)` receives ray `r`'s exclusive output slices. Edges
    /// start zeroed and flags start `false`.
    ///
    /// # Errors
    ///
    /// Fails if a count is negative or the counts overflow.
    pub fn par_fill<F>(chunk_cnts: Vec<i64>, with_flags: bool, fill: F) -> Result<Self>
    where
        F: Fn(usize, ChunkMut<'_>) + Sync + Send,
    {
        let n_rays = chunk_cnts.len();
        let n_edges = total_count(&chunk_cnts)?;

        let mut edges = vec![0.0f32; n_edges];
        let mut is_left = with_flags.then(|| vec![false; n_edges]);
        let mut is_right = with_flags.then(|| vec![false; n_edges]);

        {
            let edge_chunks = split_chunks_mut(&mut edges, &chunk_cnts)?;
            let left_chunks = split_flags(is_left.as_deref_mut(), &chunk_cnts, n_rays)?;
            let right_chunks = split_flags(is_right.as_deref_mut(), &chunk_cnts, n_rays)?;

            let chunks: Vec<ChunkMut<'_>> = edge_chunks
                .into_iter()
                .zip(left_chunks)
                .zip(right_chunks)
                .map(|((edges, is_left), is_right)| ChunkMut {
                    edges,
                    is_left,
                    is_right,
                })
                .collect();

            chunks
                .into_par_iter()
                .enumerate()
                .for_each(|(r, chunk)| fill(r, chunk));
        }

        let chunk_starts = exclusive_sum(&chunk_cnts);
        let ray_ids = unpack_ray_ids(&chunk_cnts, n_edges)?;
        debug!(n_rays, n_edges, with_flags, "assembled ray segments");

        Ok(Self {
            edges,
            is_left,
            is_right,
            chunk_cnts,
            chunk_starts,
            ray_ids,
        })
    }

    /// Pack per-ray edge lists without flags.
    ///
    /// # Errors
    ///
    /// Fails if a ray's edges decrease.
    pub fn from_chunks(chunks: &[Vec<f32>]) -> Result<Self> {
        let cnts = chunks.iter().map(|c| c.len() as i64).collect();
        let segments = Self::par_fill(cnts, false, |r, chunk| {
            chunk.edges.copy_from_slice(&chunks[r]);
        })?;
        segments.view().validate_ordering()?;
        Ok(segments)
    }

    /// Pack per-ray `(t_start, t_end)` intervals with flags.
    ///
    /// Intervals of a ray must be sorted and disjoint. When one interval
    /// ends exactly where the next begins, the shared boundary is stored
    /// once, flagged both left and right.
    ///
    /// # Errors
    ///
    /// Fails if the resulting edges of a ray decrease.
    pub fn from_intervals(intervals: &[Vec<(f32, f32)>]) -> Result<Self> {
        let cnts = intervals
            .par_iter()
            .map(|ray| boundaries(ray).count() as i64)
            .collect();
        let segments = Self::par_fill(cnts, true, |r, mut chunk| {
            for (i, (t, left, right)) in boundaries(&intervals[r]).enumerate() {
                chunk.set(i, t, left, right);
            }
        })?;
        segments.view().validate_ordering()?;
        Ok(segments)
    }

    /// Borrow as a view.
    pub fn view(&self) -> RaySegmentsView<'_> {
        RaySegmentsView::from_parts(
            &self.edges,
            self.is_left.as_deref(),
            self.is_right.as_deref(),
            &self.chunk_cnts,
            &self.chunk_starts,
            &self.ray_ids,
        )
    }

    /// Number of rays.
    pub fn n_rays(&self) -> usize {
        self.chunk_cnts.len()
    }

    /// Number of edges.
    pub fn n_edges(&self) -> usize {
        self.edges.len()
    }

    /// Edge counts per ray.
    pub fn chunk_cnts(&self) -> &[i64] {
        &self.chunk_cnts
    }

    /// Chunk offsets per ray.
    pub fn chunk_starts(&self) -> &[i64] {
        &self.chunk_starts
    }
}

fn split_flags<'b>(
    buf: Option<&'b mut [bool]>,
    cnts: &[i64],
    n_rays: usize,
) -> Result<Vec<Option<&'b mut [bool]>>> {
    match buf {
        Some(buf) => Ok(split_chunks_mut(buf, cnts)?
            .into_iter()
            .map(Some)
            .collect()),
        None => Ok((0..n_rays).map(|_| None).collect()),
    }
}

/// Edges of one ray's intervals as `(t, is_left, is_right)`, merging
/// touching boundaries.
fn boundaries(intervals: &[(f32, f32)]) -> impl Iterator<Item = (f32, bool, bool)> + '_ {
    let n = intervals.len();
    intervals
        .iter()
        .enumerate()
        .flat_map(move |(i, &(t0, t1))| {
            let shared = i > 0 && intervals[i - 1].1 == t0;
            let merges_next = i + 1 < n && intervals[i + 1].0 == t1;
            let start = (!shared).then_some((t0, true, false));
            start
                .into_iter()
                .chain(std::iter::once((t1, merges_next, true)))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SegmentsError;

    #[test]
    fn test_par_fill() {
        let segments = RaySegments::par_fill(vec![2, 0, 3], false, |r, chunk| {
            for (i, t) in chunk.edges.iter_mut().enumerate() {
                *t = (r * 10 + i) as f32;
            }
        })
        .unwrap();
        let view = segments.view();
        assert_eq!(view.edges(), &[0.0, 1.0, 20.0, 21.0, 22.0]);
        assert_eq!(segments.chunk_starts(), &[0, 2, 2]);
        assert_eq!(view.ray_id(3), Some(2));
        assert!(view.validate().is_ok());
    }

    #[test]
    fn test_par_fill_negative_count() {
        assert!(RaySegments::par_fill(vec![1, -1], false, |_, _| {}).is_err());
    }

    #[test]
    fn test_par_fill_overflowing_counts() {
        let err = RaySegments::par_fill(vec![i64::MAX, 1], false, |_, _| {}).unwrap_err();
        assert_eq!(err, SegmentsError::CountOverflow { ray: 1 });
    }

    #[test]
    fn test_from_chunks() {
        let segments = RaySegments::from_chunks(&[vec![0.0, 1.5], vec![], vec![3.0]]).unwrap();
        assert_eq!(segments.n_rays(), 3);
        assert_eq!(segments.n_edges(), 3);
        let view = segments.view();
        assert_eq!(view.chunk(0).edges, &[0.0, 1.5]);
        assert!(view.chunk(1).is_empty());
        assert_eq!(view.is_left(0), None);
    }

    #[test]
    fn test_from_chunks_unsorted() {
        assert!(RaySegments::from_chunks(&[vec![2.0, 1.0]]).is_err());
    }

    #[test]
    fn test_from_intervals_merges_shared_edges() {
        let segments = RaySegments::from_intervals(&[
            vec![(0.5, 1.0), (1.0, 2.0)],
            vec![],
            vec![(3.0, 4.5)],
        ])
        .unwrap();
        let view = segments.view();
        assert_eq!(view.edges(), &[0.5, 1.0, 2.0, 3.0, 4.5]);
        assert_eq!(segments.chunk_cnts(), &[3, 0, 2]);
        assert_eq!(view.is_left(1), Some(true));
        assert_eq!(view.is_right(1), Some(true));

        let first: Vec<_> = view.chunk(0).intervals().collect();
        assert_eq!(first, vec![(0.5, 1.0), (1.0, 2.0)]);
        let last: Vec<_> = view.chunk(2).intervals().collect();
        assert_eq!(last, vec![(3.0, 4.5)]);
        assert!(view.validate().is_ok());
    }

    #[test]
    fn test_from_intervals_gap() {
        let segments = RaySegments::from_intervals(&[vec![(0.0, 1.0), (2.0, 3.0)]]).unwrap();
        let view = segments.view();
        assert_eq!(view.n_edges(), 4);
        let starts: Vec<f32> = view.t_starts().unwrap().collect();
        let ends: Vec<f32> = view.t_ends().unwrap().collect();
        assert_eq!(starts, vec![0.0, 2.0]);
        assert_eq!(ends, vec![1.0, 3.0]);
    }

    #[test]
    fn test_from_intervals_overlapping_rejected() {
        assert!(RaySegments::from_intervals(&[vec![(0.0, 2.0), (1.0, 3.0)]]).is_err());
    }
}
