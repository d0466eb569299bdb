//! Per-type statistics payloads
//!
//! Each payload carries only the fields relevant to its tag.

/// Widen `[min, max]` to include `value`
pub(crate) fn widen<T: PartialOrd + Copy>(min: &mut T, max: &mut T, value: T) {
    if value < *min {
        *min = value;
    }
    if value > *max {
        *max = value;
    }
}

/// Length bounds for strings (characters) and binary payloads (bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthStats {
    pub min_length: usize,
    pub max_length: usize,
}

impl LengthStats {
    pub fn new(length: usize) -> Self {
        Self {
            min_length: length,
            max_length: length,
        }
    }

    pub fn widen(&mut self, length: usize) {
        widen(&mut self.min_length, &mut self.max_length, length);
    }
}

/// Value bounds for the numeric tags
///
/// Bounds are `f64` regardless of the source width. `long` and `decimal128`
/// values beyond 2^53 (or with more than ~17 significant digits) are rounded
/// on the way in, so their bounds are approximations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericStats {
    pub min_value: f64,
    pub max_value: f64,
}

impl NumericStats {
    pub fn new(value: f64) -> Self {
        Self {
            min_value: value,
            max_value: value,
        }
    }

    pub fn widen(&mut self, value: f64) {
        widen(&mut self.min_value, &mut self.max_value, value);
    }
}

/// True/false counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BooleanStats {
    pub true_count: u64,
    pub false_count: u64,
}

impl BooleanStats {
    pub fn new(value: bool) -> Self {
        let mut stats = Self::default();
        stats.record(value);
        stats
    }

    pub fn record(&mut self, value: bool) {
        if value {
            self.true_count += 1;
        } else {
            self.false_count += 1;
        }
    }
}

/// Date bounds in epoch milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateStats {
    pub min_date: i64,
    pub max_date: i64,
}

impl DateStats {
    pub fn new(millis: i64) -> Self {
        Self {
            min_date: millis,
            max_date: millis,
        }
    }

    pub fn widen(&mut self, millis: i64) {
        widen(&mut self.min_date, &mut self.max_date, millis);
    }
}

/// Count bounds for object property counts and array lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountStats {
    pub min: usize,
    pub max: usize,
}

impl CountStats {
    pub fn new(count: usize) -> Self {
        Self {
            min: count,
            max: count,
        }
    }

    pub fn widen(&mut self, count: usize) {
        widen(&mut self.min, &mut self.max, count);
    }

    /// Start tracking at `count`, or widen existing bounds
    pub fn observe(slot: &mut Option<CountStats>, count: usize) {
        match slot {
            Some(stats) => stats.widen(count),
            None => *slot = Some(CountStats::new(count)),
        }
    }
}
