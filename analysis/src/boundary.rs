//! Map-boundary inference.
//!
//! Multi-map pages concatenate the records of every map without marking where
//! one map ends. Both folds here recover the per-map segment index from a
//! single signal per record, looking only at what came before.

use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub index: usize,
    /// The record opened this segment (always false for the very first one).
    pub starts_new: bool,
}

/// Counter-reset variant: the signal is a round number that restarts at the
/// beginning of every map.
#[derive(Debug, Clone, Default)]
pub struct CounterReset {
    last: Option<u32>,
    segment: usize,
}

impl CounterReset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self, value: u32) -> Segment {
        let starts_new = matches!(self.last, Some(last) if value < last);
        if starts_new {
            self.segment += 1;
        }
        self.last = Some(value);

        Segment {
            index: self.segment,
            starts_new,
        }
    }

    pub fn segment(&self) -> usize {
        self.segment
    }
}

/// Alternation-exhaustion variant: the signal is the team label of a stat
/// row. Rows of one map alternate between the two teams; once both have been
/// seen, the next change of label opens a new map.
#[derive(Debug, Clone, Default)]
pub struct Alternation {
    last_label: Option<String>,
    seen: BTreeSet<String>,
    segment: usize,
}

impl Alternation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self, label: &str) -> Segment {
        let changed = self.last_label.as_deref().is_some_and(|last| last != label);
        let starts_new = changed && self.seen.len() >= 2;

        if starts_new {
            self.segment += 1;
            self.seen.clear();
        }
        self.seen.insert(label.to_owned());
        self.last_label = Some(label.to_owned());

        Segment {
            index: self.segment,
            starts_new,
        }
    }

    pub fn segment(&self) -> usize {
        self.segment
    }
}

pub fn segment_by_counter(values: &[u32]) -> Vec<usize> {
    let mut state = CounterReset::new();
    values.iter().map(|v| state.next(*v).index).collect()
}

pub fn segment_by_alternation<S>(labels: &[S]) -> Vec<usize>
where
    S: AsRef<str>,
{
    let mut state = Alternation::new();
    labels.iter().map(|l| state.next(l.as_ref()).index).collect()
}
