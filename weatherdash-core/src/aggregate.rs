//! Buckets forecast samples by weekday and averages them.

use std::fmt::Display;

use chrono::{Local, TimeZone};

use crate::model::{DailyAverage, ForecastSample};

/// Average samples per day label in the local time zone.
pub fn aggregate_daily(samples: &[ForecastSample]) -> Vec<DailyAverage> {
    aggregate_daily_in(samples, &Local)
}

/// Average samples per day label, computing labels in `tz`.
///
/// Output order follows the first appearance of each label in `samples`.
/// Labels are weekday names, so inputs spanning more than a week merge
/// samples from the same weekday.
pub fn aggregate_daily_in<Tz>(samples: &[ForecastSample], tz: &Tz) -> Vec<DailyAverage>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut buckets: Vec<Bucket> = Vec::new();

    for sample in samples {
        let label = sample.timestamp.with_timezone(tz).format("%a").to_string();

        match buckets.iter_mut().find(|b| b.label == label) {
            Some(bucket) => bucket.push(sample),
            None => {
                let mut bucket = Bucket::new(label);
                bucket.push(sample);
                buckets.push(bucket);
            }
        }
    }

    buckets.into_iter().map(Bucket::finish).collect()
}

struct Bucket {
    label: String,
    temp_sum: f64,
    wind_sum: f64,
    count: usize,
}

impl Bucket {
    fn new(label: String) -> Self {
        Self { label, temp_sum: 0.0, wind_sum: 0.0, count: 0 }
    }

    fn push(&mut self, sample: &ForecastSample) {
        self.temp_sum += sample.temperature_c;
        self.wind_sum += sample.wind_speed_mps;
        self.count += 1;
    }

    fn finish(self) -> DailyAverage {
        // count is never zero: a bucket is created together with its first sample
        let n = self.count as f64;
        DailyAverage {
            day: self.label,
            temperature_c: self.temp_sum / n,
            wind_speed_mps: self.wind_sum / n,
            samples: self.count,
        }
    }
}
