//! Fuzz target: `DistanceTracker` and fill-level pipeline
//!
//! Drives arbitrary distance streams through the anomaly filter and the
//! fill-level estimator, verifying:
//! - No panics under arbitrary samples (including 0 and `u16::MAX`)
//! - History never exceeds `HISTORY_CAPACITY` (10) entries
//! - A rejected sample leaves the average untouched
//! - Every estimate lies in [0, 100] %
//!
//! cargo fuzz run fuzz_distance_tracker

#![no_main]

use libfuzzer_sys::fuzz_target;
use waterfilter::control::anomaly::{Admission, AnomalyFilter, DistanceTracker, HISTORY_CAPACITY};
use waterfilter::control::fill_level::FillLevelEstimator;

fuzz_target!(|data: &[u8]| {
    let mut tracker = DistanceTracker::new(AnomalyFilter::new(5));
    let estimator = FillLevelEstimator::default();

    for chunk in data.chunks_exact(2) {
        let sample = u32::from(u16::from_le_bytes([chunk[0], chunk[1]]));
        let before = tracker.average();

        match tracker.offer(sample) {
            Admission::Accepted { average } => {
                assert!(average.is_finite());
                if let Some(percent) = estimator.estimate(sample) {
                    assert!((0.0..=100.0).contains(&percent));
                }
            }
            Admission::Rejected { average } => {
                assert_eq!(Some(average), before);
                assert_eq!(tracker.average(), before, "rejection moved the average");
            }
        }

        assert!(
            tracker.history().len() <= HISTORY_CAPACITY,
            "history grew to {} entries",
            tracker.history().len()
        );
    }
});
