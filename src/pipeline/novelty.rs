//! Novelty detection for forum threads.
//!
//! A thread is novel if its identity key was never recorded. Detection and
//! commitment happen together per item: a novel thread is recorded before
//! it is emitted, so it is reported at most once across cycles.

use crate::error::Result;
use crate::models::ThreadRecord;
use crate::storage::IdentityStore;

/// Filters thread records down to the ones never seen before.
pub struct NoveltyFilter<'a> {
    store: &'a dyn IdentityStore,
}

impl<'a> NoveltyFilter<'a> {
    pub fn new(store: &'a dyn IdentityStore) -> Self {
        Self { store }
    }

    /// Keep novel threads in input order, recording each one.
    ///
    /// Any store error aborts the filter; threads recorded before the error
    /// stay recorded.
    pub async fn filter(&self, threads: Vec<ThreadRecord>) -> Result<Vec<ThreadRecord>> {
        let total = threads.len();
        let mut novel = Vec::new();

        for thread in threads {
            let key = thread.identity_key();
            if self.store.exists(&key).await? {
                continue;
            }
            self.store.record(&key).await?;
            novel.push(thread);
        }

        log::debug!("{} of {} threads are new", novel.len(), total);
        Ok(novel)
    }
}
