//! Per-channel mapping of 8-bit values into float ranges.
//!
//! `normalized = lower[c] + (raw / 255) * (upper[c] - lower[c])`. An inverted
//! range (`lower > upper`) flips the mapping instead of failing.
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationRange {
    lower: Vec<f32>,
    upper: Vec<f32>,
}

impl NormalizationRange {
    /// Fails with `ChannelCountMismatch` when the two bounds differ in length.
    pub fn new(lower: Vec<f32>, upper: Vec<f32>) -> Result<Self> {
        if lower.len() != upper.len() {
            return Err(Error::ChannelCountMismatch {
                expected: lower.len(),
                actual: upper.len(),
            });
        }
        Ok(Self { lower, upper })
    }

    /// Same bounds for every channel.
    pub fn uniform(lower: f32, upper: f32, channels: usize) -> Self {
        Self {
            lower: vec![lower; channels],
            upper: vec![upper; channels],
        }
    }

    /// `[0, 1]` for every channel.
    pub fn unit(channels: usize) -> Self {
        Self::uniform(0.0, 1.0, channels)
    }

    pub fn channel_count(&self) -> usize {
        self.lower.len()
    }

    pub fn lower(&self) -> &[f32] {
        &self.lower
    }

    pub fn upper(&self) -> &[f32] {
        &self.upper
    }

    pub fn check_channels(&self, channels: usize) -> Result<()> {
        if self.channel_count() != channels {
            return Err(Error::ChannelCountMismatch {
                expected: channels,
                actual: self.channel_count(),
            });
        }
        Ok(())
    }

    /// Maps one raw channel value.
    #[inline]
    pub fn normalize(&self, channel: usize, raw: u8) -> f32 {
        let lower = self.lower[channel];
        lower + (raw as f32 / 255.0) * (self.upper[channel] - lower)
    }
}

/// Evaluates a range either exactly or through per-channel tables built from
/// the fused `raw * scale + lower` form (fast mode).
pub(crate) enum Normalizer<'a> {
    Exact(&'a NormalizationRange),
    Table(Vec<[f32; 256]>),
}

impl<'a> Normalizer<'a> {
    pub(crate) fn new(range: &'a NormalizationRange, fast: bool) -> Self {
        if !fast {
            return Normalizer::Exact(range);
        }
        let tables = range
            .lower
            .iter()
            .zip(&range.upper)
            .map(|(&lower, &upper)| {
                let scale = (upper - lower) / 255.0;
                let mut table = [0f32; 256];
                for (v, out) in table.iter_mut().enumerate() {
                    *out = v as f32 * scale + lower;
                }
                table
            })
            .collect();
        Normalizer::Table(tables)
    }

    #[inline]
    pub(crate) fn apply(&self, channel: usize, raw: u8) -> f32 {
        match self {
            Normalizer::Exact(range) => range.normalize(channel, raw),
            Normalizer::Table(tables) => tables[channel][raw as usize],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_endpoints() {
        let range = NormalizationRange::new(vec![0.0, -1.0], vec![1.0, 1.0]).unwrap();
        assert_eq!(range.normalize(0, 0), 0.0);
        assert_eq!(range.normalize(0, 255), 1.0);
        assert_eq!(range.normalize(1, 0), -1.0);
        assert_eq!(range.normalize(1, 255), 1.0);
        assert!((range.normalize(0, 51) - 0.2).abs() < 1e-6);
    }

    #[test]
    fn inverted_range_flips() {
        let range = NormalizationRange::uniform(1.0, 0.0, 1);
        assert_eq!(range.normalize(0, 0), 1.0);
        assert_eq!(range.normalize(0, 255), 0.0);
    }

    #[test]
    fn mismatched_bounds_rejected() {
        assert!(matches!(
            NormalizationRange::new(vec![0.0; 3], vec![1.0; 2]),
            Err(Error::ChannelCountMismatch {
                expected: 3,
                actual: 2
            })
        ));
        assert!(NormalizationRange::unit(3).check_channels(4).is_err());
    }

    #[test]
    fn table_matches_exact() {
        let range = NormalizationRange::new(vec![-2.5, 0.0, 10.0], vec![2.5, 255.0, -10.0]).unwrap();
        let exact = Normalizer::new(&range, false);
        let table = Normalizer::new(&range, true);
        for c in 0..3 {
            for v in 0..=255u8 {
                let (a, b) = (exact.apply(c, v), table.apply(c, v));
                assert!((a - b).abs() <= 1e-4 * a.abs().max(1.0), "c={} v={}", c, v);
            }
        }
    }
}
