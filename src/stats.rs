use getset::{CopyGetters, Getters};

/// Pass counts per condition position.
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct FilterStats {
    /// Records for which condition `i` held, regardless of the others.
    #[getset(get = "pub")]
    passing_total: Vec<u64>,
    /// Records for which conditions `0..=i` all held.
    #[getset(get = "pub")]
    passing_sequential: Vec<u64>,
    /// Records that were evaluated.
    #[getset(get_copy = "pub")]
    examined: u64,
}

impl FilterStats {
    pub fn new(n_conditions: usize) -> Self {
        FilterStats {
            passing_total: vec![0; n_conditions],
            passing_sequential: vec![0; n_conditions],
            examined: 0,
        }
    }

    pub fn record(&mut self, filters_passed: &[bool]) {
        debug_assert_eq!(filters_passed.len(), self.passing_total.len());
        self.examined += 1;
        for (count, &passed) in self.passing_total.iter_mut().zip(filters_passed) {
            *count += passed as u64;
        }
        // stop at the first failing condition
        for (count, _) in self
            .passing_sequential
            .iter_mut()
            .zip(filters_passed)
            .take_while(|(_, passed)| **passed)
        {
            *count += 1;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_prefix_accumulation() {
        let mut stats = FilterStats::new(3);
        stats.record(&[true, true, true]);
        stats.record(&[true, false, true]);
        stats.record(&[false, true, true]);
        stats.record(&[true, true, false]);

        assert_eq!(stats.examined(), 4);
        assert_eq!(stats.passing_total(), &vec![3, 3, 3]);
        assert_eq!(stats.passing_sequential(), &vec![3, 2, 1]);
    }

    #[test]
    fn test_sequential_never_exceeds_total() {
        let patterns = [
            [false, false, true, true],
            [true, false, false, true],
            [true, true, false, true],
            [false, true, true, true],
            [true, true, true, true],
        ];
        let mut stats = FilterStats::new(4);
        for pattern in patterns.iter() {
            let before = stats.passing_sequential().clone();
            stats.record(pattern);
            let first_false = pattern.iter().position(|p| !p).unwrap_or(pattern.len());
            for i in first_false..pattern.len() {
                assert_eq!(stats.passing_sequential()[i], before[i]);
            }
        }
        for (seq, total) in stats.passing_sequential().iter().zip(stats.passing_total()) {
            assert!(seq <= total);
        }
        assert!(stats
            .passing_sequential()
            .windows(2)
            .all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_no_conditions() {
        let mut stats = FilterStats::new(0);
        stats.record(&[]);
        assert_eq!(stats.examined(), 1);
        assert!(stats.passing_total().is_empty());
        assert!(stats.passing_sequential().is_empty());
    }
}
