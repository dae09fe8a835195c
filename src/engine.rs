// Copyright 2018-2021 Developers of the Rand project.
// Copyright 2017 Paul Dicker.
// Copyright 2014-2017, 2019 Melissa O'Neill and PCG Project contributors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The generic PCG engine.

use core::fmt;
use core::marker::PhantomData;
use core::ops::Sub;

use rand_core::{impls, RngCore, SeedableRng};

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::extras::Generator;
use crate::multiplier::Multiplier;
use crate::output::OutputFunction;
use crate::stream::{SpecificSeq, StreamState};
use crate::uint::Uint;

/// Where an engine's starting point comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedSource<Itype> {
    /// Fresh operating system entropy, for the state and, where
    /// selectable, the stream.
    #[cfg(feature = "getrandom")]
    Entropy,
    /// The given seed, leaving the stream untouched.
    Explicit(Itype),
    /// The given seed on the given stream. Fails on configurations whose
    /// stream is fixed.
    ExplicitWithStream(Itype, Itype),
    /// The all-zero seed, as a deterministic placeholder.
    Defer,
}

/// A permuted congruential generator.
///
/// Pairs a linear congruential generator over the state type `Itype` with
/// the output permutation `O` producing `Xtype` values. `S` chooses the
/// stream policy, `M` the multiplier. `OUTPUT_PREVIOUS` selects whether
/// output is computed from the pre-step state, which overlaps the
/// permutation with the multiply; the convention is true for state up to
/// 64 bits and false above.
///
/// Generators on the same stream can be compared, subtracted and jumped
/// arbitrary distances in logarithmic time.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct Engine<Itype, Xtype, S, M, O, const OUTPUT_PREVIOUS: bool> {
    state: Itype,
    stream: S,
    #[cfg_attr(feature = "serde1", serde(skip))]
    phantom: PhantomData<(Xtype, M, O)>,
}

impl<Itype, Xtype, S, M, O, const OUTPUT_PREVIOUS: bool>
    Engine<Itype, Xtype, S, M, O, OUTPUT_PREVIOUS>
where
    Itype: Uint,
    Xtype: Uint,
    S: StreamState<Itype>,
    M: Multiplier<Itype>,
    O: OutputFunction<Itype, Xtype>,
{
    /// Creates a generator from `seed`, on the stream policy's default
    /// stream.
    pub fn new(seed: Itype) -> Self {
        let mut engine = Engine {
            state: Itype::ZERO,
            stream: S::default(),
            phantom: PhantomData,
        };
        engine.reseed(seed);
        engine
    }

    /// Creates a generator from the given seed source.
    pub fn seeded(source: SeedSource<Itype>) -> Result<Self, Error> {
        let mut engine = Self::new(Itype::ZERO);
        engine.seed(source)?;
        Ok(engine)
    }

    /// Restarts the generator from the given seed source.
    ///
    /// An explicit seed keeps the current stream; entropy seeding draws a
    /// new stream as well when the configuration allows selecting one.
    pub fn seed(&mut self, source: SeedSource<Itype>) -> Result<(), Error> {
        match source {
            #[cfg(feature = "getrandom")]
            SeedSource::Entropy => {
                if S::CAN_SPECIFY {
                    self.stream.set_stream(entropy_word::<Itype>())?;
                }
                self.reseed(entropy_word::<Itype>());
            }
            SeedSource::Explicit(seed) => self.reseed(seed),
            SeedSource::ExplicitWithStream(seed, stream) => {
                self.stream.set_stream(stream)?;
                self.reseed(seed);
            }
            SeedSource::Defer => self.reseed(Itype::ZERO),
        }
        Ok(())
    }

    fn reseed(&mut self, seed: Itype) {
        self.state = if S::IS_MCG {
            // The low two bits are fixed; only states equal to 3 mod 4
            // lie on the long cycle.
            seed | Itype::from_usize(3)
        } else {
            self.bump(seed.wrapping_add(self.stream.increment()))
        };
    }

    #[inline]
    fn bump(&self, state: Itype) -> Itype {
        state
            .wrapping_mul(M::MULTIPLIER)
            .wrapping_add(self.stream.increment())
    }

    #[inline]
    fn step(&mut self) {
        self.state = self.bump(self.state);
    }

    /// Advances one step and returns the permuted output.
    #[inline]
    pub fn generate(&mut self) -> Xtype {
        if OUTPUT_PREVIOUS {
            let old_state = self.state;
            self.step();
            O::output(old_state)
        } else {
            self.step();
            O::output(self.state)
        }
    }

    /// A uniform value in `0..bound`, by rejection.
    ///
    /// Panics when `bound` is zero; see
    /// [`bounded_rand`][crate::bounded_rand].
    pub fn bounded(&mut self, bound: Xtype) -> Xtype {
        crate::extras::bounded_rand(self, bound)
    }

    /// Multi-step advance, jumping ahead `delta` steps.
    ///
    /// The method used here is based on Brown, "Random Number Generation
    /// with Arbitrary Stride", Transactions of the American Nuclear
    /// Society (Nov. 1994). The algorithm is very similar to fast
    /// exponentiation.
    ///
    /// Calling this is equivalent to calling [`generate`][Self::generate]
    /// `delta` times, in logarithmic time. Since the period is a power of
    /// two, a two's-complement negative `delta` goes backwards (the long
    /// way round).
    pub fn advance(&mut self, delta: Itype) {
        self.state = lcg_advance(
            self.state,
            delta,
            M::MULTIPLIER,
            self.stream.increment(),
        );
    }

    /// Multi-step jump back, the inverse of [`advance`][Self::advance].
    pub fn backstep(&mut self, delta: Itype) {
        self.advance(delta.wrapping_neg());
    }

    /// The number of steps from the current point to the point whose
    /// state is `target`, along this generator's own stream.
    pub fn distance(&self, target: Itype) -> Itype {
        self.masked_distance(target, Itype::MAX)
    }

    /// Steps to the first point whose state matches `target` on the bits
    /// selected by `mask`.
    pub(crate) fn masked_distance(&self, target: Itype, mask: Itype) -> Itype {
        lcg_distance(
            self.state,
            target,
            M::MULTIPLIER,
            self.stream.increment(),
            mask,
            S::IS_MCG,
        )
    }

    /// How many steps this generator is ahead of `other`, i.e. the
    /// `delta` for which `other.advance(delta)` reaches `self`.
    ///
    /// Fails when the generators do not share a stream, since then no
    /// finite distance between them exists.
    pub fn steps_since(&self, other: &Self) -> Result<Itype, Error> {
        if self.stream.increment() != other.stream.increment() {
            return Err(Error::StreamMismatch);
        }
        Ok(other.distance(self.state))
    }

    /// Moves the generator onto another stream, keeping the current
    /// state. Fails on configurations whose stream is fixed.
    pub fn set_stream(&mut self, stream: Itype) -> Result<(), Error> {
        self.stream.set_stream(stream)
    }

    /// The stream selector this generator walks, or `None` for an MCG.
    pub fn stream(&self) -> Option<Itype> {
        self.stream.stream()
    }

    /// The seed and, for selectable streams, the stream selector that
    /// reconstruct the generator at its current point.
    ///
    /// Passing the pair back to [`new`][Self::new] or
    /// [`with_stream`][Engine::with_stream] yields a generator whose next
    /// outputs equal this one's.
    pub fn seed_args(&self) -> (Itype, Option<Itype>) {
        let seed = if S::IS_MCG {
            self.state
        } else {
            // Invert the seeding rule: un-bump one step, then remove the
            // pre-bump increment offset.
            let unstepped = lcg_advance(
                self.state,
                Itype::MAX,
                M::MULTIPLIER,
                self.stream.increment(),
            );
            unstepped.wrapping_sub(self.stream.increment())
        };
        let stream = if S::CAN_SPECIFY {
            self.stream.stream()
        } else {
            None
        };
        (seed, stream)
    }

    /// Log2 of the period: the state width, minus two for an MCG.
    pub fn period_pow2(&self) -> u32 {
        Itype::BITS - if S::IS_MCG { 2 } else { 0 }
    }

    /// Log2 of the number of streams selectable through this
    /// configuration.
    pub fn streams_pow2(&self) -> u32 {
        S::streams_pow2()
    }

    /// Bytes needed to persist the generator: the state plus, for
    /// selectable streams, the increment.
    pub fn byte_size(&self) -> usize {
        if S::CAN_SPECIFY {
            2 * Itype::BYTES
        } else {
            Itype::BYTES
        }
    }

    pub(crate) fn state(&self) -> Itype {
        self.state
    }
}

impl<Itype, Xtype, M, O, const OUTPUT_PREVIOUS: bool>
    Engine<Itype, Xtype, SpecificSeq<Itype>, M, O, OUTPUT_PREVIOUS>
where
    Itype: Uint,
    Xtype: Uint,
    M: Multiplier<Itype>,
    O: OutputFunction<Itype, Xtype>,
{
    /// Creates a generator from `seed` on the given stream.
    pub fn with_stream(seed: Itype, stream: Itype) -> Self {
        let mut engine = Engine {
            state: Itype::ZERO,
            stream: SpecificSeq::new(stream),
            phantom: PhantomData,
        };
        engine.reseed(seed);
        engine
    }
}

/// `lhs - rhs` is the number of steps `rhs` would need to reach `lhs`.
///
/// Panics when the generators do not share a stream; use
/// [`steps_since`][Engine::steps_since] for the checked form.
impl<'a, Itype, Xtype, S, M, O, const OUTPUT_PREVIOUS: bool> Sub
    for &'a Engine<Itype, Xtype, S, M, O, OUTPUT_PREVIOUS>
where
    Itype: Uint,
    Xtype: Uint,
    S: StreamState<Itype>,
    M: Multiplier<Itype>,
    O: OutputFunction<Itype, Xtype>,
{
    type Output = Itype;

    fn sub(self, rhs: Self) -> Itype {
        match self.steps_since(rhs) {
            Ok(delta) => delta,
            Err(_) => panic!("subtracted generators do not share a stream"),
        }
    }
}

impl<Itype, S, M, O, const OUTPUT_PREVIOUS: bool> RngCore
    for Engine<Itype, u32, S, M, O, OUTPUT_PREVIOUS>
where
    Itype: Uint,
    S: StreamState<Itype>,
    M: Multiplier<Itype>,
    O: OutputFunction<Itype, u32>,
{
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.generate()
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    #[inline]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    #[inline]
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl<Itype, S, M, O, const OUTPUT_PREVIOUS: bool> RngCore
    for Engine<Itype, u64, S, M, O, OUTPUT_PREVIOUS>
where
    Itype: Uint,
    S: StreamState<Itype>,
    M: Multiplier<Itype>,
    O: OutputFunction<Itype, u64>,
{
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.generate() as u32
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.generate()
    }

    #[inline]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    #[inline]
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl<Itype, Xtype, S, M, O, const OUTPUT_PREVIOUS: bool> SeedableRng
    for Engine<Itype, Xtype, S, M, O, OUTPUT_PREVIOUS>
where
    Itype: Uint,
    Xtype: Uint,
    S: StreamState<Itype>,
    M: Multiplier<Itype>,
    O: OutputFunction<Itype, Xtype>,
{
    type Seed = S::Seed;

    /// Reads the seed little endian: the state word, then for selectable
    /// stream configurations the raw increment with its low bit forced
    /// to one.
    fn from_seed(seed: Self::Seed) -> Self {
        let (seed, stream) = S::from_seed_bytes(&seed);
        let mut engine = Engine {
            state: Itype::ZERO,
            stream,
            phantom: PhantomData,
        };
        engine.reseed(seed);
        engine
    }
}

impl<Itype, Xtype, S, M, O, const OUTPUT_PREVIOUS: bool> Generator
    for Engine<Itype, Xtype, S, M, O, OUTPUT_PREVIOUS>
where
    Itype: Uint,
    Xtype: Uint,
    S: StreamState<Itype>,
    M: Multiplier<Itype>,
    O: OutputFunction<Itype, Xtype>,
{
    type Output = Xtype;

    #[inline]
    fn random(&mut self) -> Xtype {
        self.generate()
    }
}

/// Custom Debug implementation that does not expose the internal state
impl<Itype, Xtype, S, M, O, const OUTPUT_PREVIOUS: bool> fmt::Debug
    for Engine<Itype, Xtype, S, M, O, OUTPUT_PREVIOUS>
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Engine {{}}")
    }
}

/// One word of operating system entropy, read big endian.
///
/// Panics when the entropy source fails, like
/// [`SeedableRng::from_entropy`].
#[cfg(feature = "getrandom")]
pub(crate) fn entropy_word<Itype: Uint>() -> Itype {
    let mut buf = [0u8; 16];
    rand_core::OsRng.fill_bytes(&mut buf[..Itype::BYTES]);
    Itype::read_be(&buf[..Itype::BYTES])
}

pub(crate) fn lcg_advance<Itype: Uint>(
    state: Itype,
    delta: Itype,
    mult: Itype,
    plus: Itype,
) -> Itype {
    let mut acc_mult = Itype::ONE;
    let mut acc_plus = Itype::ZERO;
    let mut cur_mult = mult;
    let mut cur_plus = plus;
    let mut mdelta = delta;

    while mdelta > Itype::ZERO {
        if (mdelta & Itype::ONE) != Itype::ZERO {
            acc_mult = acc_mult.wrapping_mul(cur_mult);
            acc_plus = acc_plus.wrapping_mul(cur_mult).wrapping_add(cur_plus);
        }
        cur_plus = cur_mult.wrapping_add(Itype::ONE).wrapping_mul(cur_plus);
        cur_mult = cur_mult.wrapping_mul(cur_mult);
        mdelta = mdelta >> 1;
    }
    acc_mult.wrapping_mul(state).wrapping_add(acc_plus)
}

/// Steps from `cur_state` to the first LCG state matching `newstate` on
/// the bits in `mask`, found one bit at a time against the squared
/// parameters.
///
/// For an MCG the low two state bits never move, so they are excluded
/// from the comparison and the count starts at bit two, scaled back down
/// at the end.
pub(crate) fn lcg_distance<Itype: Uint>(
    cur_state: Itype,
    newstate: Itype,
    mult: Itype,
    plus: Itype,
    mask: Itype,
    is_mcg: bool,
) -> Itype {
    let mask = if is_mcg {
        mask & !Itype::from_usize(3)
    } else {
        mask
    };
    let mut cur_state = cur_state;
    let mut cur_mult = mult;
    let mut cur_plus = plus;
    let mut the_bit = if is_mcg {
        Itype::from_usize(4)
    } else {
        Itype::ONE
    };
    let mut distance = Itype::ZERO;

    while (cur_state & mask) != (newstate & mask) {
        if (cur_state & the_bit) != (newstate & the_bit) {
            cur_state = cur_state.wrapping_mul(cur_mult).wrapping_add(cur_plus);
            distance = distance | the_bit;
        }
        the_bit = the_bit << 1;
        cur_plus = cur_mult.wrapping_add(Itype::ONE).wrapping_mul(cur_plus);
        cur_mult = cur_mult.wrapping_mul(cur_mult);
    }

    if is_mcg {
        distance >> 2
    } else {
        distance
    }
}
