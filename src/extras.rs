// Copyright 2018-2021 Developers of the Rand project.
// Copyright 2014-2017, 2019 Melissa O'Neill and PCG Project contributors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Bounded sampling and shuffling on raw generator output.

use crate::uint::Uint;

/// The raw output interface the helpers in this module draw from.
///
/// [`RngCore`][rand_core::RngCore] only covers 32- and 64-bit output;
/// this trait keeps the whole width range of the engine family, 8 to
/// 128 bits, usable by [`bounded_rand`] and [`shuffle`].
pub trait Generator {
    /// The width this generator natively produces.
    type Output: Uint;

    /// The next raw output value.
    fn random(&mut self) -> Self::Output;
}

/// A uniformly distributed value in `0..bound`.
///
/// Classic rejection sampling: draws below `2^bits mod bound` are
/// discarded so the remaining range divides evenly by `bound`. Fewer
/// than two draws are needed on average for any bound.
///
/// # Panics
///
/// Panics if `bound` is zero.
pub fn bounded_rand<G: Generator>(rng: &mut G, bound: G::Output) -> G::Output {
    assert!(
        bound != G::Output::ZERO,
        "cannot sample from an empty range"
    );
    let threshold = bound.wrapping_neg() % bound;
    loop {
        let r = rng.random();
        if r >= threshold {
            return r % bound;
        }
    }
}

/// Shuffles a slice in place, Fisher-Yates from the top.
///
/// Consumes one bounded draw per element beyond the first, so the
/// element positions depend only on the generator, not on the element
/// type.
pub fn shuffle<G: Generator, T>(slice: &mut [T], rng: &mut G) {
    debug_assert!(
        slice.len() <= G::Output::MAX.as_usize(),
        "slice length exceeds the generator's output range"
    );
    let mut count = slice.len();
    while count > 1 {
        let chosen = bounded_rand(rng, G::Output::from_usize(count)).as_usize();
        count -= 1;
        slice.swap(chosen, count);
    }
}
