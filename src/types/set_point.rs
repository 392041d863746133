/// Labels handed out to set points in order
pub const SET_POINT_LABELS: [char; 5] = ['A', 'B', 'C', 'D', 'E'];

/// A position on the elapsed-time axis used to sample signals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetPoint {
    pub label: char,
    pub position: f64,
}

impl SetPoint {
    pub fn new(index: usize, position: f64) -> Self {
        Self {
            label: SET_POINT_LABELS[index % SET_POINT_LABELS.len()],
            position,
        }
    }
}

/// Signal values at the row nearest to a set point
#[derive(Debug, Clone, PartialEq)]
pub struct SetPointSample {
    pub label: char,
    pub position: f64,
    pub row: usize,
    /// Elapsed time of the sampled row
    pub time: f64,
    pub values: Vec<(String, Option<f64>)>,
}

impl SetPointSample {
    pub fn value(&self, signal: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(name, _)| name == signal)
            .and_then(|(_, v)| *v)
    }
}
