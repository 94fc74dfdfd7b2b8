//! Random selection of featured products.

use rand::Rng;
use rand::seq::SliceRandom;

/// Maximum number of products shown in the featured grid.
pub const FEATURED_LIMIT: usize = 10;

/// Pick up to `limit` items uniformly at random, in random order.
///
/// `items` is left untouched, the shuffle happens on a copy.
pub fn sample<T: Clone, R: Rng + ?Sized>(items: &[T], limit: usize, rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(limit);
    shuffled
}
