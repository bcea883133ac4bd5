//! Handshake latency statistics.
//!
//! Collects the number of ticks a producer waits between raising `valid`
//! and seeing `ack`, and reports min, max, average and a bucketed
//! distribution.

/// Number of histogram buckets; the last one is open-ended.
const BUCKETS: usize = 20;

/// Width of one histogram bucket in ticks.
const BUCKET_TICKS: u64 = 4;

/// Tracks latency statistics with minimal overhead.
///
/// Cheap enough to update on every completed handshake. Per-run trackers
/// are combined with `merge` after a parallel soak.
#[derive(Debug, Clone)]
pub struct LatencyStats {
    pub min: u64,
    pub max: u64,
    pub sum: u64,
    pub count: u64,
    pub buckets: [u64; BUCKETS],
}

impl Default for LatencyStats {
    fn default() -> Self {
        Self::new()
    }
}

impl LatencyStats {
    /// Creates an empty tracker. `min` starts at `u64::MAX` so the first
    /// measurement becomes the minimum.
    pub fn new() -> Self {
        Self {
            min: u64::MAX,
            max: 0,
            sum: 0,
            count: 0,
            buckets: [0; BUCKETS],
        }
    }

    /// Records one latency measurement in ticks.
    pub fn update(&mut self, ticks: u64) {
        if ticks < self.min {
            self.min = ticks;
        }
        if ticks > self.max {
            self.max = ticks;
        }
        self.sum += ticks;
        self.count += 1;

        let idx = (ticks / BUCKET_TICKS).min(BUCKETS as u64 - 1) as usize;
        self.buckets[idx] += 1;
    }

    /// Folds another tracker into this one.
    pub fn merge(&mut self, other: &LatencyStats) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.sum += other.sum;
        self.count += other.count;
        for (a, b) in self.buckets.iter_mut().zip(other.buckets.iter()) {
            *a += b;
        }
    }

    /// Average latency in ticks, or 0.0 if nothing was recorded.
    pub fn avg(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum as f64 / self.count as f64
        }
    }

    pub fn print_report(&self, title: &str) {
        println!("\n{}", title);
        println!("Count: {}", self.count);
        if self.count == 0 {
            return;
        }
        println!("Min:   {} ticks", self.min);
        println!("Avg:   {:.2} ticks", self.avg());
        println!("Max:   {} ticks", self.max);

        println!("Distribution ({}-tick buckets):", BUCKET_TICKS);
        for (i, &count) in self.buckets.iter().enumerate() {
            if count > 0 {
                let range_end = if i == BUCKETS - 1 { ">" } else { "" };
                let lower = i as u64 * BUCKET_TICKS;
                let upper = lower + BUCKET_TICKS;
                println!("[{:3}-{:3}{} ticks]: {}", lower, upper, range_end, count);
            }
        }
    }
}
