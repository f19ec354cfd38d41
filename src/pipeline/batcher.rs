//! Grouping of a stream into fixed-size batches.

use std::num::NonZeroUsize;

use tokio::sync::mpsc;

/// Groups items from `input` into batches of `size` and forwards them.
///
/// Every batch has exactly `size` items except possibly the last, which
/// holds the remainder when `input` closes. No empty batch is ever sent.
/// `output` closes when this returns.
///
/// Returns the number of batches forwarded.
pub async fn batch<T>(
    mut input: mpsc::Receiver<T>,
    output: mpsc::Sender<Vec<T>>,
    size: NonZeroUsize,
) -> usize {
    let capacity = size.get();
    let mut forwarded = 0_usize;
    let mut pending = Vec::with_capacity(capacity);

    while let Some(item) = input.recv().await {
        pending.push(item);
        if pending.len() == capacity {
            let full = std::mem::replace(&mut pending, Vec::with_capacity(capacity));
            if output.send(full).await.is_err() {
                tracing::debug!("batch stream closed by receiver");
                return forwarded;
            }
            forwarded += 1;
        }
    }

    if !pending.is_empty() && output.send(pending).await.is_ok() {
        forwarded += 1;
    }
    forwarded
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use rstest::rstest;
    use tokio::sync::mpsc;

    use super::batch;

    async fn run(items: usize, size: usize) -> Vec<Vec<usize>> {
        let (items_tx, items_rx) = mpsc::channel(4);
        let (batches_tx, mut batches_rx) = mpsc::channel(4);
        let group_size = NonZeroUsize::new(size).expect("batch size should be non-zero");

        let batcher = tokio::spawn(batch(items_rx, batches_tx, group_size));
        for item in 0..items {
            items_tx.send(item).await.expect("batcher should accept items");
        }
        drop(items_tx);

        let mut batches = Vec::new();
        while let Some(group) = batches_rx.recv().await {
            batches.push(group);
        }
        let forwarded = batcher.await.expect("batcher task should finish");
        assert_eq!(forwarded, batches.len());
        batches
    }

    #[rstest]
    #[tokio::test]
    async fn seven_items_in_fives_make_two_batches() {
        let batches = run(7, 5).await;
        let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![5, 2]);
        assert_eq!(batches.concat(), (0..7).collect::<Vec<_>>());
    }

    #[rstest]
    #[case::empty(0, 5)]
    #[case::exact(10, 5)]
    #[case::remainder(11, 5)]
    #[case::singletons(4, 1)]
    #[case::oversized(3, 10)]
    #[tokio::test]
    async fn batch_count_and_sizes_match_ceiling(#[case] items: usize, #[case] size: usize) {
        let batches = run(items, size).await;

        assert_eq!(batches.len(), items.div_ceil(size));
        assert_eq!(batches.iter().map(Vec::len).sum::<usize>(), items);
        if let Some((last, full)) = batches.split_last() {
            assert!(full.iter().all(|group| group.len() == size));
            assert!(!last.is_empty() && last.len() <= size);
        }
    }
}
