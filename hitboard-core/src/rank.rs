//! Stream ordering and per-platform competition ranks

use crate::catalog::{Item, RankedItem};

/// Stable sort by stream count, highest first
///
/// Items with equal stream counts keep their input order.
pub fn sort_by_streams(mut items: Vec<Item>) -> Vec<Item> {
    items.sort_by(|a, b| b.streams.cmp(&a.streams));
    items
}

/// Keep the first `size` items; a shorter input is returned whole
pub fn truncate_universe<T>(mut items: Vec<T>, size: usize) -> Vec<T> {
    items.truncate(size);
    items
}

/// Standard-competition ranks ("1224" ranking) over descending values
///
/// `rank = 1 + number of values strictly greater`. Equal values share a rank
/// and the next distinct value skips accordingly.
///
/// # Examples
/// ```
/// use hitboard_core::rank::competition_ranks;
///
/// assert_eq!(competition_ranks(&[50, 50, 40]), vec![1, 1, 3]);
/// ```
pub fn competition_ranks(values: &[u64]) -> Vec<u32> {
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    values
        .iter()
        .map(|v| {
            // Everything before the partition point is strictly greater than v
            let greater = sorted.partition_point(|s| s > v);
            (greater + 1) as u32
        })
        .collect()
}

/// Attach spotify/apple/deezer playlist ranks to every item
///
/// Ranks are computed over exactly the items given; callers decide the
/// population (the universe) before ranking. Item order is preserved.
pub fn rank(items: Vec<Item>) -> Vec<RankedItem> {
    let spotify: Vec<u64> = items.iter().map(|i| i.spotify_playlists).collect();
    let apple: Vec<u64> = items.iter().map(|i| i.apple_playlists).collect();
    let deezer: Vec<u64> = items.iter().map(|i| i.deezer_playlists).collect();

    let spotify_ranks = competition_ranks(&spotify);
    let apple_ranks = competition_ranks(&apple);
    let deezer_ranks = competition_ranks(&deezer);

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| RankedItem {
            item,
            spotify_rank: spotify_ranks[idx],
            apple_rank: apple_ranks[idx],
            deezer_rank: deezer_ranks[idx],
        })
        .collect()
}
