use shared::{PhasePoint, PopulationSample, HISTORY_CAPACITY};
use std::collections::VecDeque;

/// Rolling population history backing the two charts.
///
/// Both windows hold at most `capacity` entries and drop the oldest entry
/// when full. Time-series indices are renumbered after every eviction so
/// they always run `0..len`.
#[derive(Debug, Clone)]
pub struct PopulationHistory {
    capacity: usize,
    time_series: VecDeque<PopulationSample>,
    phase_portrait: VecDeque<PhasePoint>,
}

impl Default for PopulationHistory {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl PopulationHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            time_series: VecDeque::with_capacity(capacity),
            phase_portrait: VecDeque::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.time_series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_series.is_empty()
    }

    /// Append one observation to both windows
    pub fn record(&mut self, prey_percent: f64, predator_percent: f64) {
        if self.capacity == 0 {
            return;
        }

        let mut evicted = false;
        if self.time_series.len() >= self.capacity {
            self.time_series.pop_front();
            evicted = true;
        }
        if self.phase_portrait.len() >= self.capacity {
            self.phase_portrait.pop_front();
        }

        self.time_series.push_back(PopulationSample {
            prey_percent,
            predator_percent,
            tick_index: self.time_series.len(),
        });
        self.phase_portrait.push_back(PhasePoint {
            prey_percent,
            predator_percent,
        });

        if evicted {
            for (index, sample) in self.time_series.iter_mut().enumerate() {
                sample.tick_index = index;
            }
        }
    }

    pub fn time_series(&self) -> impl ExactSizeIterator<Item = &PopulationSample> + '_ {
        self.time_series.iter()
    }

    pub fn phase_portrait(&self) -> impl ExactSizeIterator<Item = &PhasePoint> + '_ {
        self.phase_portrait.iter()
    }

    pub fn clear(&mut self) {
        self.time_series.clear();
        self.phase_portrait.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_record_appends_to_both() {
        let mut history = PopulationHistory::default();
        history.record(30.0, 10.0);
        history.record(28.5, 11.0);

        let series: Vec<_> = history.time_series().copied().collect();
        assert_eq!(series.len(), 2);
        assert_eq!(series[1].tick_index, 1);
        assert_eq!(series[1].prey_percent, 28.5);

        let phase: Vec<_> = history.phase_portrait().copied().collect();
        assert_eq!(
            phase[0],
            PhasePoint {
                prey_percent: 30.0,
                predator_percent: 10.0
            }
        );
    }

    #[test]
    fn test_eviction_keeps_window_numbered() {
        let mut history = PopulationHistory::default();
        for tick in 0..150 {
            history.record(tick as f64, 0.0);
        }

        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history.phase_portrait().len(), HISTORY_CAPACITY);

        let series: Vec<_> = history.time_series().copied().collect();
        assert_eq!(series[0].prey_percent, 50.0);
        assert_eq!(series[99].prey_percent, 149.0);
        for (index, sample) in series.iter().enumerate() {
            assert_eq!(sample.tick_index, index);
        }

        let oldest_phase = history.phase_portrait().next().unwrap();
        assert_eq!(oldest_phase.prey_percent, 50.0);
    }

    #[test]
    fn test_clear() {
        let mut history = PopulationHistory::default();
        history.record(1.0, 2.0);
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.phase_portrait().len(), 0);
        assert!(history.time_series().next().is_none());
    }

    #[test]
    fn test_zero_capacity_records_nothing() {
        let mut history = PopulationHistory::with_capacity(0);
        history.record(1.0, 2.0);
        assert!(history.is_empty());
    }

    proptest! {
        #[test]
        fn prop_never_exceeds_capacity(
            capacity in 1usize..120,
            samples in proptest::collection::vec((0.0f64..100.0, 0.0f64..100.0), 0..300),
        ) {
            let mut history = PopulationHistory::with_capacity(capacity);
            for (prey, predator) in &samples {
                history.record(*prey, *predator);
                prop_assert!(history.len() <= capacity);
                prop_assert_eq!(history.len(), history.phase_portrait().len());
            }

            let indices: Vec<_> = history.time_series().map(|s| s.tick_index).collect();
            let expected: Vec<_> = (0..samples.len().min(capacity)).collect();
            prop_assert_eq!(indices, expected);

            if let Some((prey, _)) = samples.last() {
                prop_assert_eq!(history.time_series().last().map(|s| s.prey_percent), Some(*prey));
            }
        }
    }
}
