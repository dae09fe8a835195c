// Copyright 2018-2021 Developers of the Rand project.
// Copyright 2014-2017, 2019 Melissa O'Neill and PCG Project contributors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Stream selection policies.
//!
//! An LCG with multiplier `a` partitions the state space into disjoint
//! cycles, one per odd increment `c`. The stream policy of an engine decides
//! which increment it steps with and whether that choice is baked into the
//! type ([`OneSeq`], [`NoStream`]), distinct per instance ([`Unique`]) or
//! freely selectable at run time ([`SpecificSeq`]).

use core::sync::atomic::{AtomicUsize, Ordering};

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::uint::Uint;

/// The increment policy of an engine configuration.
///
/// Policies are held by value inside the engine, so anything an instance
/// needs to remember (for [`SpecificSeq`], the increment itself) lives here.
/// Two engines can only be compared or measured against each other when
/// their policies report the same increment.
pub trait StreamState<Itype>: Sized + Default {
    /// True if [`set_stream`][Self::set_stream] can succeed.
    const CAN_SPECIFY: bool;
    /// True if this policy turns the generator into a pure MCG
    /// (increment zero, period 2^(bits-2)).
    const IS_MCG: bool;

    /// Byte seed covering the state and, where selectable, the stream.
    type Seed: Sized + Default + Clone + AsRef<[u8]> + AsMut<[u8]>;

    /// Parses a byte seed into a raw state value and a policy instance.
    fn from_seed_bytes(seed: &Self::Seed) -> (Itype, Self);

    /// The increment added on every state transition.
    fn increment(&self) -> Itype;

    /// The stream this instance walks, or `None` for an MCG.
    fn stream(&self) -> Option<Itype>;

    /// Moves this instance onto another stream, keeping the caller's state.
    fn set_stream(&mut self, stream: Itype) -> Result<(), Error>;

    /// Log2 of the number of distinct streams reachable through this policy.
    fn streams_pow2() -> u32;
}

/// No increment at all: a pure multiplicative generator.
///
/// Three quarters of the state space is unreachable and the period drops to
/// 2^(bits-2), but the transition saves the addition, which is measurable
/// for 128-bit state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct NoStream;

impl<Itype: Uint> StreamState<Itype> for NoStream {
    const CAN_SPECIFY: bool = false;
    const IS_MCG: bool = true;

    type Seed = Itype::Bytes;

    #[inline]
    fn from_seed_bytes(seed: &Self::Seed) -> (Itype, Self) {
        (Itype::read_le(seed.as_ref()), NoStream)
    }

    #[inline]
    fn increment(&self) -> Itype {
        Itype::ZERO
    }

    #[inline]
    fn stream(&self) -> Option<Itype> {
        None
    }

    fn set_stream(&mut self, _stream: Itype) -> Result<(), Error> {
        Err(Error::FixedStream)
    }

    #[inline]
    fn streams_pow2() -> u32 {
        0
    }
}

/// The single reference stream shared by every instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct OneSeq;

impl<Itype: Uint> StreamState<Itype> for OneSeq {
    const CAN_SPECIFY: bool = false;
    const IS_MCG: bool = false;

    type Seed = Itype::Bytes;

    #[inline]
    fn from_seed_bytes(seed: &Self::Seed) -> (Itype, Self) {
        (Itype::read_le(seed.as_ref()), OneSeq)
    }

    #[inline]
    fn increment(&self) -> Itype {
        Itype::DEFAULT_INCREMENT
    }

    #[inline]
    fn stream(&self) -> Option<Itype> {
        Some(Itype::DEFAULT_INCREMENT >> 1)
    }

    fn set_stream(&mut self, _stream: Itype) -> Result<(), Error> {
        Err(Error::FixedStream)
    }

    #[inline]
    fn streams_pow2() -> u32 {
        0
    }
}

static NEXT_STREAM_ID: AtomicUsize = AtomicUsize::new(1);

/// A stream drawn from a process-wide counter at construction.
///
/// Every default-constructed instance gets its own odd identifier, so
/// independently created generators land on different sequences even when
/// they are seeded with the same value. Clones (and deserialized copies)
/// keep the identifier and therefore stay on the same stream as their
/// original.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct Unique {
    id: usize,
}

impl Default for Unique {
    fn default() -> Self {
        Unique {
            id: NEXT_STREAM_ID.fetch_add(2, Ordering::Relaxed),
        }
    }
}

impl<Itype: Uint> StreamState<Itype> for Unique {
    const CAN_SPECIFY: bool = false;
    const IS_MCG: bool = false;

    type Seed = Itype::Bytes;

    #[inline]
    fn from_seed_bytes(seed: &Self::Seed) -> (Itype, Self) {
        (Itype::read_le(seed.as_ref()), Unique::default())
    }

    #[inline]
    fn increment(&self) -> Itype {
        Itype::from_usize(self.id) | Itype::ONE
    }

    #[inline]
    fn stream(&self) -> Option<Itype> {
        Some(<Unique as StreamState<Itype>>::increment(self) >> 1)
    }

    fn set_stream(&mut self, _stream: Itype) -> Result<(), Error> {
        Err(Error::FixedStream)
    }

    fn streams_pow2() -> u32 {
        if Itype::BITS < usize::BITS {
            Itype::BITS - 1
        } else {
            usize::BITS - 1
        }
    }
}

/// A stream chosen by the caller, one of 2^(bits-1).
///
/// The stream selector is shifted up one bit and the low bit forced to one,
/// so every selector yields a valid odd increment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct SpecificSeq<Itype> {
    increment: Itype,
}

impl<Itype: Uint> SpecificSeq<Itype> {
    /// Selects the stream identified by `stream`; the top selector bit is
    /// discarded.
    pub fn new(stream: Itype) -> Self {
        SpecificSeq {
            increment: (stream << 1) | Itype::ONE,
        }
    }
}

impl<Itype: Uint> Default for SpecificSeq<Itype> {
    fn default() -> Self {
        SpecificSeq {
            increment: Itype::DEFAULT_INCREMENT,
        }
    }
}

impl<Itype: Uint> StreamState<Itype> for SpecificSeq<Itype> {
    const CAN_SPECIFY: bool = true;
    const IS_MCG: bool = false;

    type Seed = Itype::StreamBytes;

    /// Reads a state and an increment, both little endian, with the
    /// increment's low bit forced to one.
    fn from_seed_bytes(seed: &Self::Seed) -> (Itype, Self) {
        let (state, incr) = seed.as_ref().split_at(Itype::BYTES);
        let increment = Itype::read_le(incr) | Itype::ONE;
        (Itype::read_le(state), SpecificSeq { increment })
    }

    #[inline]
    fn increment(&self) -> Itype {
        self.increment
    }

    #[inline]
    fn stream(&self) -> Option<Itype> {
        Some(self.increment >> 1)
    }

    fn set_stream(&mut self, stream: Itype) -> Result<(), Error> {
        *self = SpecificSeq::new(stream);
        Ok(())
    }

    #[inline]
    fn streams_pow2() -> u32 {
        Itype::BITS - 1
    }
}
