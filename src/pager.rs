//! Sequential five-trip windows over a dataset.

use crate::dataset::{Dataset, TripRecord};

pub const PAGE_SIZE: usize = 5;

/// Returns up to [`PAGE_SIZE`] trips starting at `cursor` and the cursor for
/// the following page. Past the end the page is empty and the cursor stays
/// put.
pub fn next_page(dataset: &Dataset, cursor: usize) -> (&[TripRecord], usize) {
    let records = dataset.records();
    let start = cursor.min(records.len());
    let end = start.saturating_add(PAGE_SIZE).min(records.len());
    let page = &records[start..end];
    (page, cursor + page.len())
}

/// Cursor state for stepping through a dataset one page at a time.
#[derive(Debug)]
pub struct Pager<'a> {
    dataset: &'a Dataset,
    cursor: usize,
}

impl<'a> Pager<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset, cursor: 0 }
    }

    /// Starts at `cursor` instead of the first trip.
    pub fn starting_at(dataset: &'a Dataset, cursor: usize) -> Self {
        Self { dataset, cursor }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.dataset.len()
    }

    /// Next page; empty once every trip has been shown.
    pub fn next_page(&mut self) -> &'a [TripRecord] {
        let (page, cursor) = next_page(self.dataset, self.cursor);
        self.cursor = cursor;
        page
    }
}
