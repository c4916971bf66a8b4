//! Chunk bookkeeping for packed collections.
//!
//! A packed collection stores each ray's edges as one contiguous chunk,
//! chunks laid out in ray order. These helpers derive chunk offsets from
//! counts, map edges back to rays, and hand out each ray's output chunk as
//! an exclusive `&mut` slice so per-ray writers never overlap.

use rayon::prelude::*;

use crate::error::{Result, SegmentsError};

/// Exclusive prefix sum: chunk starts from chunk counts.
///
/// `out[0] = 0`, `out[r] = cnts[0] + ... + cnts[r - 1]`.
pub fn exclusive_sum(cnts: &[i64]) -> Vec<i64> {
    let mut acc = 0i64;
    cnts.iter()
        .map(|&c| {
            let start = acc;
            acc += c;
            start
        })
        .collect()
}

/// Inclusive prefix sum: chunk ends from chunk counts.
pub fn inclusive_sum(cnts: &[i64]) -> Vec<i64> {
    let mut acc = 0i64;
    cnts.iter()
        .map(|&c| {
            acc += c;
            acc
        })
        .collect()
}

/// Total edge count of non-negative chunk counts.
///
/// # Errors
///
/// Fails on a negative count or a sum that does not fit an index.
pub fn total_count(cnts: &[i64]) -> Result<usize> {
    let mut sum = 0i64;
    for (ray, &count) in cnts.iter().enumerate() {
        if count < 0 {
            return Err(SegmentsError::NegativeCount { ray, count });
        }
        sum = sum
            .checked_add(count)
            .ok_or(SegmentsError::CountOverflow { ray })?;
    }
    usize::try_from(sum).map_err(|_| SegmentsError::CountOverflow {
        ray: cnts.len().saturating_sub(1),
    })
}

/// Check that counts are non-negative and add up to `n_edges`.
pub fn check_counts(cnts: &[i64], n_edges: usize) -> Result<()> {
    let sum = total_count(cnts)?;
    if sum != n_edges {
        return Err(SegmentsError::CountMismatch {
            sum: sum as i64,
            n_edges,
        });
    }
    Ok(())
}

/// Split `buf` into consecutive per-ray chunks of `cnts[r]` elements.
///
/// # Errors
///
/// Fails if a count is negative or the counts do not cover `buf` exactly.
pub fn split_chunks_mut<'b, T>(buf: &'b mut [T], cnts: &[i64]) -> Result<Vec<&'b mut [T]>> {
    check_counts(cnts, buf.len())?;
    let mut chunks = Vec::with_capacity(cnts.len());
    let mut rest = buf;
    for &c in cnts {
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(c as usize);
        chunks.push(head);
        rest = tail;
    }
    Ok(chunks)
}

/// Owning ray of every edge of a packed collection.
///
/// Fills each ray's chunk in parallel.
pub fn unpack_ray_ids(cnts: &[i64], n_edges: usize) -> Result<Vec<i64>> {
    let mut ray_ids = vec![0i64; n_edges];
    split_chunks_mut(&mut ray_ids, cnts)?
        .into_par_iter()
        .enumerate()
        .for_each(|(ray, chunk)| chunk.fill(ray as i64));
    Ok(ray_ids)
}
