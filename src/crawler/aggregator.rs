//! Result aggregator
//!
//! Page workers hand their records to a shared [`ResultAggregator`]. The lock
//! is held only for the append, never across network I/O or parsing. Each
//! page's records are kept together as one batch, so fragment order within a
//! page always survives; how batches are ordered against each other is chosen
//! when the partition is finished.

use crate::record::Record;
use std::sync::Mutex;

/// How page batches are ordered in the finished collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageOrder {
    /// Order in which page workers completed (nondeterministic)
    #[default]
    Arrival,

    /// Ascending page index
    Index,
}

#[derive(Debug)]
struct PageBatch {
    page: usize,
    records: Vec<Record>,
}

/// Lock-protected accumulator for one partition's page results
#[derive(Debug, Default)]
pub struct ResultAggregator {
    batches: Mutex<Vec<PageBatch>>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one page worker's records
    pub fn merge(&self, page: usize, records: Vec<Record>) {
        let mut batches = self
            .batches
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        batches.push(PageBatch { page, records });
    }

    /// Number of records merged so far
    pub fn len(&self) -> usize {
        self.batches
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .map(|batch| batch.records.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drains every batch into a flat collection
    ///
    /// Call once all page workers have finished.
    pub fn finish(&self, order: PageOrder) -> Vec<Record> {
        let mut batches = std::mem::take(
            &mut *self
                .batches
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        );

        if order == PageOrder::Index {
            // Stable, so duplicate page indices keep arrival order
            batches.sort_by_key(|batch| batch.page);
        }

        batches.into_iter().flat_map(|batch| batch.records).collect()
    }
}
