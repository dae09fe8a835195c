// Copyright 2018-2021 Developers of the Rand project.
// Copyright 2014-2017, 2019 Melissa O'Neill and PCG Project contributors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The PCG family of random number generators.
//!
//! This is a native Rust implementation of the [PCG generator] *family*
//! rather than a fixed selection of its members. A PCG generator is a
//! linear congruential generator whose regularities are hidden by a cheap
//! permutation of the state; picking the state width, the output width,
//! the stream handling, the multiplier and the permutation yields the
//! individual family members.
//!
//! ## Engines
//!
//! [`Engine`] carries those choices as type parameters:
//!
//! ```text
//! Engine<Itype, Xtype, StreamPolicy, MultiplierPolicy, OutputFunction, OUTPUT_PREVIOUS>
//! ```
//!
//! -   `Itype` is the state width and `Xtype` the output width, any of
//!     `u8`/`u16`/`u32`/`u64`/`u128` with `Xtype` no wider than `Itype`.
//! -   The stream policy is one of [`OneSeq`] (one fixed sequence),
//!     [`SpecificSeq`] (sequence selectable at run time), [`Unique`]
//!     (every instance on its own sequence) and [`NoStream`] (a pure
//!     multiplicative generator, trading a quarter of the period for
//!     speed).
//! -   The output function is one of [`XshRs`], [`XshRr`], [`Rxs`],
//!     [`RxsM`], [`RxsMXs`], [`XslRr`], [`XslRrRr`], [`Xsh`] and [`Xsl`].
//! -   `OUTPUT_PREVIOUS` selects whether the output permutation is
//!     applied to the pre-step or post-step state; `true` is the
//!     customary choice for state sizes up to 64 bits.
//!
//! The names used upstream compose the same choices, so for example
//! `setseq_xsh_rr_64_32` (better known as `pcg32`) is
//! `Engine<u64, u32, SpecificSeq<u64>, DefaultMultiplier, XshRr, true>`.
//!
//! ```
//! use pcg_engines::{DefaultMultiplier, Engine, OneSeq, XshRr};
//!
//! type OneseqXshRr6432 = Engine<u64, u32, OneSeq, DefaultMultiplier, XshRr, true>;
//!
//! let mut rng = OneseqXshRr6432::new(42);
//! assert_eq!(rng.generate(), 0xc2f57bd6);
//! ```
//!
//! All engines are deterministic and portable across platforms. Every
//! engine implements [`SeedableRng`], and those with 32-bit or 64-bit
//! output also implement [`RngCore`], so they plug into the wider
//! `rand` ecosystem.
//!
//! ## Jumps
//!
//! Every engine can [`advance`][Engine::advance] and
//! [`backstep`][Engine::backstep] by an arbitrary number of steps in
//! logarithmic time, measure the [`distance`][Engine::distance] to
//! another point on its sequence, and report its period and size.
//!
//! ## The extended generators
//!
//! [`Extended`] (feature `alloc`) couples an engine with a table of
//! auxiliary generator outputs, extending the period far beyond what the
//! state width allows and providing k-dimensional equidistribution. Its
//! [`set`][Extended::set] operation even lets specific outputs be
//! planted ahead of time.
//!
//! [PCG generator]: https://www.pcg-random.org/
//! [`RngCore`]: rand_core::RngCore
//! [`SeedableRng`]: rand_core::SeedableRng

#![doc(
    html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128-blk.png",
    html_favicon_url = "https://www.rust-lang.org/favicon.ico",
    html_root_url = "https://rust-random.github.io/rand/"
)]
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]
#![no_std]

#[cfg(feature = "std")] extern crate std;

#[cfg(feature = "alloc")] extern crate alloc;

mod engine;
mod error;
#[cfg(feature = "alloc")] mod extended;
mod extras;
mod multiplier;
mod output;
mod stream;
mod uint;

pub use rand_core;

pub use self::engine::{Engine, SeedSource};
pub use self::error::Error;
#[cfg(feature = "alloc")]
pub use self::extended::{Extended, TableSource};
pub use self::extras::{bounded_rand, shuffle, Generator};
pub use self::multiplier::{DefaultMultiplier, Multiplier};
pub use self::output::{
    InvertibleOutput, OutputFunction, Rxs, RxsM, RxsMXs, Xsh, XshRr, XshRs, Xsl, XslRr, XslRrRr,
};
pub use self::stream::{NoStream, OneSeq, SpecificSeq, StreamState, Unique};
pub use self::uint::Uint;
