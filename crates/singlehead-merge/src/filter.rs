//! Header content filter
//!
//! Strips compile-once pragmas and doxygen annotation lines from a header,
//! and drops the regions bracketed by the exclusion sentinel.

use singlehead_core::Markers;
use tracing::debug;

/// Whether lines are currently being emitted or swallowed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterState {
    #[default]
    Emitting,
    Excluded,
}

impl FilterState {
    /// The state after one exclusion sentinel
    pub fn toggled(self) -> Self {
        match self {
            FilterState::Emitting => FilterState::Excluded,
            FilterState::Excluded => FilterState::Emitting,
        }
    }
}

/// Filter one line given the current state.
///
/// Rules are tried in order: build guard, doc group, doc snippet, sentinel
/// (which flips the state), then the state itself decides.
pub fn filter_line<'l>(
    markers: &Markers,
    line: &'l str,
    state: FilterState,
) -> (Option<&'l str>, FilterState) {
    if line.contains(markers.build_guard.as_str())
        || line.contains(markers.doc_group.as_str())
        || line.contains(markers.doc_snippet.as_str())
    {
        return (None, state);
    }

    if line.contains(markers.exclude_sentinel.as_str()) {
        return (None, state.toggled());
    }

    match state {
        FilterState::Emitting => (Some(line), state),
        FilterState::Excluded => (None, state),
    }
}

/// Stateful filter for a single header document.
///
/// Build a fresh one per document; state never carries over.
pub struct ContentFilter<'a> {
    markers: &'a Markers,
    state: FilterState,
}

impl<'a> ContentFilter<'a> {
    pub fn new(markers: &'a Markers) -> Self {
        Self {
            markers,
            state: FilterState::default(),
        }
    }

    /// Filter the next line of the document
    pub fn apply<'l>(&mut self, line: &'l str) -> Option<&'l str> {
        let (kept, next) = filter_line(self.markers, line, self.state);
        if next != self.state {
            debug!("Exclusion sentinel: {:?} -> {:?}", self.state, next);
        }
        self.state = next;
        kept
    }

    pub fn state(&self) -> FilterState {
        self.state
    }

    /// True when the document ended inside an excluded region
    pub fn is_excluding(&self) -> bool {
        self.state == FilterState::Excluded
    }
}
