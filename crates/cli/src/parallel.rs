//! Parallel per-glyph processing.

use anyhow::{Result, bail};
use log::{info, warn};
use rayon::prelude::*;

/// Outputs of a parallel batch plus the number of items that failed.
#[derive(Debug)]
pub struct BatchResult<R> {
    pub outputs: Vec<R>,
    pub failed: usize,
}

impl<R> Default for BatchResult<R> {
    fn default() -> Self {
        Self {
            outputs: Vec::new(),
            failed: 0,
        }
    }
}

impl<R> BatchResult<R> {
    pub fn succeeded(&self) -> usize {
        self.outputs.len()
    }

    pub fn total(&self) -> usize {
        self.succeeded() + self.failed
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    pub fn ok_or_bail(&self, operation: &str) -> Result<()> {
        if self.failed > 0 {
            bail!("{operation} failed: {} succeeded, {} failed", self.succeeded(), self.failed);
        }
        Ok(())
    }
}

/// Process items in parallel, logging each failure and keeping the
/// successful outputs in input order.
pub fn process_parallel_iter<T, R, F>(label: &str, items: impl IntoIterator<Item = T>, op: F) -> BatchResult<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> Result<R> + Sync,
{
    let items: Vec<T> = items.into_iter().collect();
    let results: Vec<_> = items.into_par_iter().map(&op).collect();

    let mut batch = BatchResult::default();
    for result in results {
        match result {
            Ok(output) => batch.outputs.push(output),
            Err(e) => {
                warn!("{e:?}");
                batch.failed += 1;
            }
        }
    }

    info!("{label}: {} succeeded, {} failed", batch.succeeded(), batch.failed);
    batch
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn keeps_order_and_counts_failures() {
        let batch = process_parallel_iter("test", 0..10, |i| {
            if i % 3 == 0 {
                Err(anyhow!("item {i}"))
            } else {
                Ok(i * 2)
            }
        });
        assert_eq!(batch.outputs, vec![2, 4, 8, 10, 14, 16]);
        assert_eq!(batch.failed, 4);
        assert_eq!(batch.total(), 10);
        assert!(!batch.all_succeeded());
        assert!(batch.ok_or_bail("test").is_err());
    }

    #[test]
    fn empty_batch_succeeds() {
        let batch = process_parallel_iter("empty", Vec::<u8>::new(), |i| Ok(i));
        assert!(batch.all_succeeded());
        assert!(batch.ok_or_bail("empty").is_ok());
    }
}
