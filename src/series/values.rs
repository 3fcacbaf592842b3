/// Committed per-index values of one renderer slot.
///
/// The slot cursor is the committed length: `commit` advances it, `revise`
/// rewrites the most recent slot in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesValues {
    values: Vec<f64>,
}

impl SeriesValues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every committed slot and pre-sizes for `expected_len` values.
    pub fn reset(&mut self, expected_len: usize) {
        self.values.clear();
        self.values.reserve(expected_len);
    }

    pub fn commit(&mut self, value: f64) {
        self.values.push(value);
    }

    /// Overwrites the latest slot. Returns `false` when nothing was committed yet.
    pub fn revise(&mut self, value: f64) -> bool {
        match self.values.last_mut() {
            Some(last) => {
                *last = value;
                true
            }
            None => false,
        }
    }

    /// Value at `index` when committed and finite; gaps are stored as NaN.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values
            .get(index)
            .copied()
            .filter(|value| value.is_finite())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}
