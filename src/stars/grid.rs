//! One level of the bucket hierarchy: a value range cut into equal bins

use std::ops::RangeInclusive;

/// Maps values in `[min, max)` onto `len` equal-width bins
#[derive(Debug, Clone)]
pub struct BinMapper<T> {
    min: f64,
    max: f64,
    step: f64,
    bins: Vec<T>,
}

impl<T> BinMapper<T> {
    /// Build `len` bins, filling each from its index and lower bound
    ///
    /// `len` must be at least 1 and `max > min`; callers validate.
    pub fn new(min: f64, max: f64, len: usize, mut fill: impl FnMut(usize, f64) -> T) -> Self {
        debug_assert!(len > 0 && max > min, "empty bin range");
        let step = (max - min) / len as f64;
        let bins = (0..len).map(|i| fill(i, min + i as f64 * step)).collect();
        Self {
            min,
            max,
            step,
            bins,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Width of one bin
    #[inline]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Raw bin index of `value`; may fall outside `0..len`
    #[inline]
    pub fn index_of(&self, value: f64) -> i64 {
        (self.len() as f64 * (value - self.min) / (self.max - self.min)).floor() as i64
    }

    /// Clamp a raw index into the valid bin range
    #[inline]
    pub fn clamp_index(&self, index: i64) -> usize {
        index.clamp(0, self.len() as i64 - 1) as usize
    }

    /// Lower bound of bin `index`
    #[inline]
    pub fn value_at(&self, index: usize) -> f64 {
        self.min + index as f64 * self.step
    }

    /// Bin holding `value`, clamped to the edge bins
    pub fn bin(&self, value: f64) -> &T {
        &self.bins[self.clamp_index(self.index_of(value))]
    }

    pub fn bin_mut(&mut self, value: f64) -> &mut T {
        let i = self.clamp_index(self.index_of(value));
        &mut self.bins[i]
    }

    /// Inclusive, clamped range of bins touched by `[low, high]`
    pub fn span(&self, low: f64, high: f64) -> RangeInclusive<usize> {
        self.clamp_index(self.index_of(low))..=self.clamp_index(self.index_of(high))
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.bins.get(index)
    }

    /// Bins with their lower bounds
    pub fn iter(&self) -> impl Iterator<Item = (f64, &T)> + '_ {
        self.bins
            .iter()
            .enumerate()
            .map(|(i, bin)| (self.value_at(i), bin))
    }
}
