// Copyright 2018-2021 Developers of the Rand project.
// Copyright 2014-2017, 2019 Melissa O'Neill and PCG Project contributors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The table-extended generator.

use alloc::boxed::Box;
use alloc::vec;

use core::fmt;

use rand_core::{impls, RngCore};

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "getrandom")]
use crate::engine::entropy_word;
use crate::engine::{lcg_advance, lcg_distance, Engine, SeedSource};
use crate::error::Error;
use crate::extras::Generator;
use crate::multiplier::Multiplier;
use crate::output::{InvertibleOutput, OutputFunction, RxsMXs};
use crate::stream::StreamState;
use crate::uint::Uint;

/// How the extension table is filled at construction.
#[derive(Clone, Copy, Debug)]
pub enum TableSource<'a, Xtype> {
    /// Slot values derived from the freshly seeded base generator.
    SelfInit,
    /// Explicit slot values; the length must equal the table size.
    Data(&'a [Xtype]),
    /// Slot values drawn from operating system entropy.
    #[cfg(feature = "getrandom")]
    Entropy,
}

/// A table-extended generator with k-dimensional equidistribution.
///
/// Couples a base [`Engine`] with a table of `2^table_pow2` values, each
/// the current output of an implicit auxiliary generator of the output
/// width. Every output XORs the addressed slot into the base output, and
/// the table moves one step every `2^advance_pow2` base steps plus once
/// per base period, which stretches the period to
/// `2^(base + table_size * output_bits)`.
///
/// With `kdd` the slot is addressed by the low state bits and the
/// generator is exactly k-dimensionally equidistributed for
/// `k = table_size`; it then also supports [`advance`][Extended::advance]
/// and [`backstep`][Extended::backstep]. High-bit addressing
/// (`kdd = false`) keeps a slot for many consecutive steps instead, and
/// refuses jumps.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct Extended<Itype, Xtype, S, M, O, const OUTPUT_PREVIOUS: bool> {
    base: Engine<Itype, Xtype, S, M, O, OUTPUT_PREVIOUS>,
    table: Box<[Xtype]>,
    table_pow2: u32,
    advance_pow2: u32,
    kdd: bool,
}

impl<Itype, Xtype, S, M, O, const OUTPUT_PREVIOUS: bool>
    Extended<Itype, Xtype, S, M, O, OUTPUT_PREVIOUS>
where
    Itype: Uint,
    Xtype: Uint,
    S: StreamState<Itype>,
    M: Multiplier<Itype>,
    O: OutputFunction<Itype, Xtype>,
    RxsMXs: InvertibleOutput<Xtype, Xtype>,
{
    /// Creates an extended generator, seeding a fresh base engine.
    ///
    /// # Panics
    ///
    /// Panics unless `1 <= table_pow2 < state bits` and
    /// `advance_pow2 <= state bits`.
    pub fn new(
        table_pow2: u32,
        advance_pow2: u32,
        kdd: bool,
        seed: SeedSource<Itype>,
        table: TableSource<Xtype>,
    ) -> Result<Self, Error> {
        let base = Engine::seeded(seed)?;
        Self::with_base(base, table_pow2, advance_pow2, kdd, table)
    }

    /// Wraps an existing engine in an extension table.
    ///
    /// Self-initialization consumes outputs of `base`, so the first
    /// extended output does not coincide with the engine's first output.
    ///
    /// # Panics
    ///
    /// Panics unless `1 <= table_pow2 < state bits` and
    /// `advance_pow2 <= state bits`.
    pub fn with_base(
        base: Engine<Itype, Xtype, S, M, O, OUTPUT_PREVIOUS>,
        table_pow2: u32,
        advance_pow2: u32,
        kdd: bool,
        table: TableSource<Xtype>,
    ) -> Result<Self, Error> {
        assert!(
            table_pow2 >= 1 && table_pow2 < Itype::BITS && table_pow2 < usize::BITS,
            "extension table size out of range"
        );
        assert!(
            advance_pow2 <= Itype::BITS,
            "advance unit exceeds the state width"
        );
        let table_size = 1usize << table_pow2;
        let mut ext = Extended {
            base,
            table: vec![Xtype::ZERO; table_size].into_boxed_slice(),
            table_pow2,
            advance_pow2,
            kdd,
        };
        match table {
            TableSource::SelfInit => ext.self_init(),
            TableSource::Data(data) => {
                if data.len() != table_size {
                    return Err(Error::WrongTableSize);
                }
                ext.table.copy_from_slice(data);
            }
            #[cfg(feature = "getrandom")]
            TableSource::Entropy => {
                for slot in ext.table.iter_mut() {
                    *slot = entropy_word::<Xtype>();
                }
            }
        }
        Ok(ext)
    }

    /// Fills the table from the base generator. Slots are decorrelated
    /// from the following base outputs by XORing in the difference of
    /// two draws.
    fn self_init(&mut self) {
        let lhs = self.base.generate();
        let rhs = self.base.generate();
        let xdiff = lhs.wrapping_sub(rhs);
        for slot in self.table.iter_mut() {
            *slot = self.base.generate() ^ xdiff;
        }
    }

    fn table_mask(&self) -> Itype {
        (Itype::ONE << self.table_pow2).wrapping_sub(Itype::ONE)
    }

    fn may_tick(&self) -> bool {
        self.advance_pow2 < Itype::BITS && self.advance_pow2 < 64
    }

    fn tick_mask(&self) -> Itype {
        (Itype::ONE << self.advance_pow2).wrapping_sub(Itype::ONE)
    }

    fn may_tock(&self) -> bool {
        Itype::BITS < 64
    }

    /// Steps every auxiliary generator once, rippling the carry of each
    /// wrapped slot into the next.
    fn advance_table_once(&mut self) {
        let mut carry = false;
        for (i, slot) in self.table.iter_mut().enumerate() {
            if carry {
                let (value, wrapped) = external_step(*slot, i);
                *slot = value;
                carry = wrapped;
            }
            let (value, wrapped) = external_step(*slot, i);
            *slot = value;
            carry = carry || wrapped;
        }
    }

    /// Jumps every auxiliary generator by `ticks`, splitting the count
    /// into a per-slot part truncated to the output width and a carry
    /// that propagates upwards together with zero crossings.
    fn advance_table_by(&mut self, ticks: Itype, forwards: bool) {
        let mut carry = Itype::ZERO;
        for (i, slot) in self.table.iter_mut().enumerate() {
            let total = carry.wrapping_add(ticks);
            let trunc = Xtype::from_u128(total.to_u128());
            carry = if Itype::BITS > Xtype::BITS {
                total >> Xtype::BITS
            } else {
                Itype::ZERO
            };
            let (value, crossed) = external_advance(*slot, i, trunc, forwards);
            *slot = value;
            if crossed {
                carry = carry.wrapping_add(Itype::ONE);
            }
        }
    }

    /// The slot the current point addresses, advancing the table first
    /// when this point ticks (every `2^advance_pow2` steps) or tocks
    /// (once per base period).
    fn tick_tock_index(&mut self) -> usize {
        let mut state = self.base.state();
        if self.kdd && S::IS_MCG {
            // The low two bits of an MCG state never move.
            state = state >> 2;
        }
        let index = if self.kdd {
            (state & self.table_mask()).as_usize()
        } else {
            (state >> (Itype::BITS - self.table_pow2)).as_usize()
        };
        if self.may_tick() {
            let tick = if self.kdd {
                (state & self.tick_mask()) == Itype::ZERO
            } else {
                // A zero advance unit ticks on every step.
                self.advance_pow2 == 0
                    || (state >> (Itype::BITS - self.advance_pow2)) == Itype::ZERO
            };
            if tick {
                self.advance_table_once();
            }
        }
        if self.may_tock() && state == Itype::ZERO {
            self.advance_table_once();
        }
        index
    }

    /// Advances one step and returns the extended output.
    pub fn generate(&mut self) -> Xtype {
        let index = self.tick_tock_index();
        let slot = self.table[index];
        self.base.generate() ^ slot
    }

    /// A uniform value in `0..bound`, by rejection.
    ///
    /// Panics when `bound` is zero; see
    /// [`bounded_rand`][crate::bounded_rand].
    pub fn bounded(&mut self, bound: Xtype) -> Xtype {
        crate::extras::bounded_rand(self, bound)
    }

    /// Overwrites the addressed table slot so that the output of this
    /// step becomes `wanted`, and moves one step like
    /// [`generate`][Self::generate].
    ///
    /// Stepping back afterwards and regenerating yields `wanted` again,
    /// which is what makes the extended state space demonstrably larger
    /// than the base period.
    pub fn set(&mut self, wanted: Xtype) {
        let index = self.tick_tock_index();
        let lhs = self.base.generate();
        self.table[index] = lhs ^ wanted;
    }

    /// Jumps ahead `delta` steps, table bookkeeping included.
    ///
    /// Equivalent to `delta` calls of [`generate`][Self::generate] in
    /// logarithmic time. Only low-bit slot addressing supports this;
    /// without `kdd` the error is `UnsupportedTableJump`.
    pub fn advance(&mut self, delta: Itype) -> Result<(), Error> {
        self.jump(delta, true)
    }

    /// Jumps back `delta` steps, the exact inverse of
    /// [`advance`][Self::advance].
    pub fn backstep(&mut self, delta: Itype) -> Result<(), Error> {
        self.jump(delta, false)
    }

    fn jump(&mut self, delta: Itype, forwards: bool) -> Result<(), Error> {
        if !self.kdd {
            return Err(Error::UnsupportedTableJump);
        }
        let zero = if S::IS_MCG {
            Itype::from_usize(3)
        } else {
            Itype::ZERO
        };
        if self.may_tick() {
            let tick_mask = self.tick_mask();
            let mut ticks = delta >> self.advance_pow2;
            // For an MCG the comparison works on the shifted-down state,
            // so widen the mask back onto the raw state.
            let mask = if S::IS_MCG {
                (tick_mask << 2) | Itype::from_usize(3)
            } else {
                tick_mask
            };
            let to_boundary = self.base.masked_distance(zero, mask);
            let partial = delta & tick_mask;
            if forwards {
                if to_boundary < partial {
                    ticks = ticks.wrapping_add(Itype::ONE);
                }
            } else {
                let back = to_boundary.wrapping_neg() & tick_mask;
                if back != Itype::ZERO && back <= partial {
                    ticks = ticks.wrapping_add(Itype::ONE);
                }
            }
            if ticks != Itype::ZERO {
                self.advance_table_by(ticks, forwards);
            }
        }
        if self.may_tock() {
            let period = 1u64 << (Itype::BITS - if S::IS_MCG { 2 } else { 0 });
            let to_zero = self.base.distance(zero).to_u128() as u64;
            let delta64 = delta.to_u128() as u64;
            let tocks = if forwards {
                if to_zero < delta64 {
                    (delta64 - to_zero + period - 1) / period
                } else {
                    0
                }
            } else {
                let first = match (period - to_zero) % period {
                    0 => period,
                    m => m,
                };
                if delta64 >= first {
                    (delta64 - first) / period + 1
                } else {
                    0
                }
            };
            if forwards {
                for _ in 0..tocks {
                    self.advance_table_once();
                }
            } else if tocks > 0 {
                self.advance_table_by(Itype::from_u128(u128::from(tocks)), false);
            }
        }
        if forwards {
            self.base.advance(delta);
        } else {
            self.base.backstep(delta);
        }
        Ok(())
    }

    /// Log2 of the period: the base period plus one output width per
    /// table slot.
    pub fn period_pow2(&self) -> u64 {
        u64::from(self.base.period_pow2()) + self.table.len() as u64 * u64::from(Xtype::BITS)
    }

    /// Bytes needed to persist the generator, table included.
    pub fn byte_size(&self) -> usize {
        self.base.byte_size() + self.table.len() * Xtype::BYTES
    }
}

impl<Itype, S, M, O, const OUTPUT_PREVIOUS: bool> RngCore
    for Extended<Itype, u32, S, M, O, OUTPUT_PREVIOUS>
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
    for Extended<Itype, u64, S, M, O, OUTPUT_PREVIOUS>
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

impl<Itype, Xtype, S, M, O, const OUTPUT_PREVIOUS: bool> Generator
    for Extended<Itype, Xtype, S, M, O, OUTPUT_PREVIOUS>
where
    Itype: Uint,
    Xtype: Uint,
    S: StreamState<Itype>,
    M: Multiplier<Itype>,
    O: OutputFunction<Itype, Xtype>,
    RxsMXs: InvertibleOutput<Xtype, Xtype>,
{
    type Output = Xtype;

    #[inline]
    fn random(&mut self) -> Xtype {
        self.generate()
    }
}

/// Custom Debug implementation that does not expose the internal state
impl<Itype, Xtype, S, M, O, const OUTPUT_PREVIOUS: bool> fmt::Debug
    for Extended<Itype, Xtype, S, M, O, OUTPUT_PREVIOUS>
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Extended {{}}")
    }
}

/// The increment of the auxiliary generator behind table slot `slot`.
/// Adjacent slots differ by two, keeping every increment odd and every
/// auxiliary sequence distinct.
fn slot_increment<Xtype: Uint>(slot: usize) -> Xtype {
    Xtype::DEFAULT_INCREMENT.wrapping_add(Xtype::from_usize(2 * (slot + 1)))
}

/// Steps one table slot in place: invert the output permutation, apply
/// the slot's LCG transition, permute back. Also reports whether the
/// auxiliary state crossed zero, which asks the next slot to step too.
fn external_step<Xtype>(randval: Xtype, slot: usize) -> (Xtype, bool)
where
    Xtype: Uint,
    RxsMXs: InvertibleOutput<Xtype, Xtype>,
{
    let state = RxsMXs::unoutput(randval);
    let state = state
        .wrapping_mul(Xtype::DEFAULT_MULTIPLIER)
        .wrapping_add(slot_increment::<Xtype>(slot));
    (RxsMXs::output(state), state == Xtype::ZERO)
}

/// Jumps one table slot by `delta` steps, reporting whether the jump
/// crossed the auxiliary zero state.
fn external_advance<Xtype>(
    randval: Xtype,
    slot: usize,
    delta: Xtype,
    forwards: bool,
) -> (Xtype, bool)
where
    Xtype: Uint,
    RxsMXs: InvertibleOutput<Xtype, Xtype>,
{
    let state = RxsMXs::unoutput(randval);
    let increment = slot_increment::<Xtype>(slot);
    let to_zero = lcg_distance(
        state,
        Xtype::ZERO,
        Xtype::DEFAULT_MULTIPLIER,
        increment,
        Xtype::MAX,
        false,
    );
    let (crossed, delta) = if forwards {
        (to_zero != Xtype::ZERO && to_zero <= delta, delta)
    } else {
        (to_zero.wrapping_neg() < delta, delta.wrapping_neg())
    };
    let state = lcg_advance(state, delta, Xtype::DEFAULT_MULTIPLIER, increment);
    (RxsMXs::output(state), crossed)
}
