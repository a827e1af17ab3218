use heapless::Deque;

/// Holds the most recent samples of one LED channel.
///
/// `N` is the storage capacity. The buffer may be limited further at runtime,
/// in which case only the newest `max_len` samples are kept.
#[derive(Debug, Clone)]
pub struct SampleBuffer<const N: usize> {
    samples: Deque<u16, N>,
    max_len: usize,
}

impl<const N: usize> SampleBuffer<N> {
    /// `max_len` is clamped to `1..=N`.
    pub fn new(max_len: usize) -> Self {
        Self { samples: Deque::new(), max_len: max_len.clamp(1, N.max(1)) }
    }

    /// Appends a sample, dropping the oldest ones beyond the length limit.
    pub fn push(&mut self, sample: u16) {
        while self.samples.len() >= self.max_len {
            self.samples.pop_front();
        }
        // max_len <= N, so there is always room here
        let _ = self.samples.push_back(sample);
    }

    /// The newest sample, if any have been read.
    pub fn latest(&self) -> Option<u16> {
        self.samples.back().copied()
    }

    /// Samples from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.samples.iter().copied()
    }

    /// Number of buffered samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }
    /// `true` until the first sample is pushed.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
    /// Length limit in effect.
    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_newest_in_order() {
        let mut buf = SampleBuffer::<8>::new(3);
        assert!(buf.is_empty());
        assert_eq!(buf.latest(), None);
        for s in 1..=5 {
            buf.push(s);
        }
        assert_eq!(buf.len(), 3);
        assert!(buf.iter().eq([3, 4, 5]));
        assert_eq!(buf.latest(), Some(5));
    }

    #[test]
    fn fills_to_capacity() {
        let mut buf = SampleBuffer::<4>::new(4);
        for s in 0..4 {
            buf.push(s);
        }
        assert!(buf.iter().eq([0, 1, 2, 3]));
        buf.push(4);
        assert!(buf.iter().eq([1, 2, 3, 4]));
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(SampleBuffer::<4>::new(100).max_len(), 4);
        assert_eq!(SampleBuffer::<4>::new(0).max_len(), 1);
    }
}
