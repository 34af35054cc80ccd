use tidemark_core::TidemarkError;

/// Bounded FIFO of the most recent raw values (oldest first).
///
/// Callers take [`HistoryBuffer::snapshot`] before pushing the value being
/// scored, so a value is never part of its own history.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    values: Vec<f64>,
    capacity: usize,
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Result<Self, TidemarkError> {
        if capacity < 1 {
            return Err(TidemarkError::configuration(
                "history window capacity must be at least 1",
            ));
        }
        Ok(Self {
            values: Vec::with_capacity(capacity + 1),
            capacity,
        })
    }

    /// Append a value, evicting the oldest once over capacity.
    pub fn push(&mut self, value: f64) {
        self.values.push(value);
        if self.values.len() > self.capacity {
            self.values.remove(0);
        }
    }

    pub fn snapshot(&self) -> &[f64] {
        &self.values
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacity_rejected() {
        assert!(matches!(
            HistoryBuffer::new(0),
            Err(TidemarkError::Configuration(_))
        ));
    }

    #[test]
    fn starts_empty() {
        let buf = HistoryBuffer::new(3).unwrap();
        assert!(buf.is_empty());
        assert!(buf.snapshot().is_empty());
        assert_eq!(buf.capacity(), 3);
    }

    #[test]
    fn evicts_oldest_first() {
        let mut buf = HistoryBuffer::new(3).unwrap();
        buf.push(1.0);
        buf.push(2.0);
        buf.push(3.0);
        buf.push(4.0); // should evict 1.0

        assert_eq!(buf.len(), 3);
        assert_eq!(buf.snapshot(), &[2.0, 3.0, 4.0]);
    }

    #[test]
    fn capacity_one_keeps_latest() {
        let mut buf = HistoryBuffer::new(1).unwrap();
        for v in [7.0, 8.0, 9.0] {
            buf.push(v);
        }
        assert_eq!(buf.snapshot(), &[9.0]);
    }

    #[test]
    fn clear_empties() {
        let mut buf = HistoryBuffer::new(2).unwrap();
        buf.push(1.0);
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 2);
    }
}
