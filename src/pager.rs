//! Sequential five-row paging over a filtered dataset.

use tracing::debug;

use crate::loader::Dataset;
use crate::schema::TripRecord;

pub const PAGE_SIZE: usize = 5;

/// Position of the next raw-row block. Lives for one exploration cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    offset: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_exhausted(&self, dataset: &Dataset) -> bool {
        self.offset >= dataset.len()
    }
}

/// Returns up to [`PAGE_SIZE`] records starting at the cursor and advances it.
/// Past the end the block is short, then empty.
pub fn next_page<'a>(dataset: &'a Dataset, cursor: &mut Cursor) -> Vec<&'a TripRecord> {
    let start = cursor.offset.min(dataset.len());
    let end = (start + PAGE_SIZE).min(dataset.len());
    let page: Vec<&TripRecord> = (start..end).filter_map(|i| dataset.get(i)).collect();

    debug!(offset = cursor.offset, returned = page.len(), "Page requested");
    cursor.offset += PAGE_SIZE;
    page
}
