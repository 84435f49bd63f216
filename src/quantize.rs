use std::collections::HashMap;
use std::num::NonZeroU8;

use palette::Srgb;

/// Pixels with an alpha value below this are treated as absent.
pub const ALPHA_THRESHOLD: u8 = 128;

/// Upper bound on how many copies of one bucket color end up in the sample set.
pub const MAX_WEIGHT: u32 = 10;

/// 256 / 8 = 32 buckets per channel.
pub const DEFAULT_BUCKET_SIZE: NonZeroU8 = match NonZeroU8::new(8) {
    Some(size) => size,
    None => unreachable!(),
};

/// Collapse every opaque pixel of an RGBA buffer into its bucket color and
/// count the occurrences of each bucket.
///
/// Buckets are returned in the order in which they first appear in `pixels`.
/// Trailing bytes that do not make up a whole pixel are ignored.
pub fn bucket_counts(pixels: &[u8], bucket_size: NonZeroU8) -> Vec<(Srgb<u8>, u32)> {
    let size = bucket_size.get();
    let snap = |v: u8| (v / size) * size;

    let mut index: HashMap<[u8; 3], usize> = HashMap::new();
    let mut buckets: Vec<([u8; 3], u32)> = Vec::new();

    for px in pixels.chunks_exact(4) {
        if px[3] < ALPHA_THRESHOLD {
            continue;
        }

        let key = [snap(px[0]), snap(px[1]), snap(px[2])];
        match index.get(&key) {
            Some(&i) => buckets[i].1 += 1,
            None => {
                index.insert(key, buckets.len());
                buckets.push((key, 1));
            }
        }
    }

    buckets
        .into_iter()
        .map(|([r, g, b], count)| (Srgb::new(r, g, b), count))
        .collect()
}

/// Reduce an RGBA buffer to a weighted sample list.
///
/// Every distinct bucket color is repeated `min(count, MAX_WEIGHT)` times, so
/// frequent colors pull harder on the clustering step without letting a
/// single flat background swamp everything else.
pub fn quantize(pixels: &[u8], bucket_size: NonZeroU8) -> Vec<Srgb<u8>> {
    let buckets = bucket_counts(pixels, bucket_size);

    let mut samples = Vec::new();
    for &(color, count) in &buckets {
        let weight = count.min(MAX_WEIGHT) as usize;
        samples.extend(std::iter::repeat_n(color, weight));
    }

    log::debug!(
        "reduced {} pixels to {} unique colors ({} weighted samples)",
        pixels.len() / 4,
        buckets.len(),
        samples.len()
    );

    samples
}
