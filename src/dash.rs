//! Dash splitting.
//!
//! Cuts a polyline into the "on" fragments of a dash pattern. Entries of
//! the pattern alternate on, off, on, ... starting with on; an odd-length
//! pattern is repeated once so the alternation stays consistent from cycle
//! to cycle. Every fragment is an open polyline and gets its own caps.

use smallvec::SmallVec;

use crate::basics::PointD;
use crate::error::{DrawError, Result};

// ============================================================================
// DashPattern
// ============================================================================

/// A validated, even-length dash pattern with a starting phase.
#[derive(Debug, Clone, PartialEq)]
pub struct DashPattern {
    dashes: SmallVec<[f64; 8]>,
    total: f64,
    offset: f64,
}

impl DashPattern {
    /// Validate `dashes` and normalise it to even length.
    ///
    /// Entries must be finite and non-negative with a positive sum.
    /// `offset` shifts the start of the pattern along each subpath; any
    /// finite value is accepted and wrapped into one cycle.
    pub fn new(dashes: &[f64], offset: f64) -> Result<Self> {
        if dashes.is_empty() {
            return Err(DrawError::geometry("dash pattern is empty"));
        }
        if let Some(bad) = dashes.iter().find(|d| !d.is_finite() || **d < 0.0) {
            return Err(DrawError::geometry(format!(
                "dash length {bad} is negative or non-finite"
            )));
        }
        if !offset.is_finite() {
            return Err(DrawError::geometry("dash offset is non-finite"));
        }

        let mut expanded: SmallVec<[f64; 8]> = SmallVec::from_slice(dashes);
        if dashes.len() % 2 == 1 {
            expanded.extend_from_slice(dashes);
        }
        let total: f64 = expanded.iter().sum();
        if total <= 0.0 {
            return Err(DrawError::geometry("dash pattern has zero total length"));
        }

        Ok(Self {
            dashes: expanded,
            total,
            offset: offset.rem_euclid(total),
        })
    }

    pub fn dashes(&self) -> &[f64] {
        &self.dashes
    }

    /// Length of one full on/off cycle.
    pub fn total_length(&self) -> f64 {
        self.total
    }

    /// Dash index and length remaining in it at the start of a subpath.
    fn start_state(&self) -> (usize, f64) {
        let mut idx = 0;
        let mut phase = self.offset;
        loop {
            let len = self.dashes[idx];
            if phase < len || phase <= 0.0 {
                return (idx, len - phase);
            }
            phase -= len;
            idx = (idx + 1) % self.dashes.len();
            // Rounding can leave `phase` a hair above the cycle length.
            if idx == 0 {
                return (0, self.dashes[0]);
            }
        }
    }

    /// Split a polyline into its "on" fragments.
    ///
    /// When `closed` is set the closing edge back to the first point is
    /// dashed as well. A fragment that begins exactly at the end of the
    /// polyline is dropped; zero-length "on" entries and a zero-length
    /// polyline that starts "on" yield two-point fragments whose points
    /// coincide, which the stroker turns into dots.
    pub fn split(&self, points: &[PointD], closed: bool) -> Vec<Vec<PointD>> {
        let mut fragments = Vec::new();
        let Some(&first) = points.first() else {
            return fragments;
        };

        let closing = if closed && points.len() > 1 {
            Some((points[points.len() - 1], first))
        } else {
            None
        };
        let edges = points.windows(2).map(|w| (w[0], w[1])).chain(closing);

        let (mut idx, mut rest) = self.start_state();
        let mut current: Option<Vec<PointD>> = is_on(idx).then(|| vec![first]);
        let mut travelled = false;

        for (a, b) in edges {
            let len = a.distance(b);
            if len <= 0.0 {
                continue;
            }
            travelled = true;
            let mut pos = 0.0;
            while len - pos > rest {
                pos += rest;
                let pt = a.lerp(b, pos / len);
                match current.take() {
                    Some(mut fragment) => {
                        fragment.push(pt);
                        fragments.push(fragment);
                    }
                    None => current = Some(vec![pt]),
                }
                idx = (idx + 1) % self.dashes.len();
                rest = self.dashes[idx];
            }
            rest -= len - pos;
            if let Some(fragment) = current.as_mut() {
                fragment.push(b);
            }
        }

        match current {
            Some(fragment) if fragment.len() > 1 => fragments.push(fragment),
            Some(_) if !travelled => fragments.push(vec![first, first]),
            _ => {}
        }
        fragments
    }
}

#[inline]
fn is_on(idx: usize) -> bool {
    idx % 2 == 0
}

// ============================================================================
// Tests
// ============================================================================
