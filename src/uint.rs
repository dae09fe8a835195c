// Copyright 2018-2021 Developers of the Rand project.
// Copyright 2014-2017, 2019 Melissa O'Neill and PCG Project contributors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The fixed-width unsigned integers a PCG engine can run on.

use core::fmt;
use core::ops::{BitAnd, BitOr, BitXor, Not, Rem, Shl, Shr};

/// An unsigned integer type usable as PCG state or output.
///
/// This lets the engine stay generic over the five machine widths while the
/// per-width constants (the default LCG parameters and the MCG multiplier
/// with its modular inverse) live next to the type they belong to. All
/// arithmetic used by the generators is wrapping.
pub trait Uint:
    Copy
    + Eq
    + Ord
    + fmt::Debug
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
    + Shl<u32, Output = Self>
    + Shr<u32, Output = Self>
    + Rem<Output = Self>
{
    /// The size of this type in bits.
    const BITS: u32;
    /// The size of this type in bytes.
    const BYTES: usize;
    /// The value `0`.
    const ZERO: Self;
    /// The value `1`.
    const ONE: Self;
    /// The largest representable value.
    const MAX: Self;

    /// Multiplier of the reference LCG parametrisation for this width.
    const DEFAULT_MULTIPLIER: Self;
    /// Increment of the reference LCG parametrisation for this width.
    const DEFAULT_INCREMENT: Self;
    /// Multiplier used by the `RXS M` output family and for inside-out
    /// stepping. Chosen to be a good MCG constant at every width.
    const MCG_MULTIPLIER: Self;
    /// Modular inverse of [`MCG_MULTIPLIER`][Self::MCG_MULTIPLIER].
    const MCG_UNMULTIPLIER: Self;

    /// Byte array covering exactly one value, used for seeding.
    type Bytes: Sized + Default + Copy + AsRef<[u8]> + AsMut<[u8]>;
    /// Byte array covering a value plus a stream selector.
    type StreamBytes: Sized + Default + Copy + Clone + AsRef<[u8]> + AsMut<[u8]>;

    /// Wrapping (modular) addition.
    fn wrapping_add(self, rhs: Self) -> Self;
    /// Wrapping (modular) subtraction.
    fn wrapping_sub(self, rhs: Self) -> Self;
    /// Wrapping (modular) multiplication.
    fn wrapping_mul(self, rhs: Self) -> Self;
    /// Wrapping (modular) negation.
    fn wrapping_neg(self) -> Self;
    /// Left shift, discarding shifted-out bits and masking the amount.
    fn wrapping_shl(self, n: u32) -> Self;

    /// Truncates a `usize` into this type.
    fn from_usize(n: usize) -> Self;
    /// Truncates this value into a `usize`.
    fn as_usize(self) -> usize;
    /// Widens this value into a `u128`.
    fn to_u128(self) -> u128;
    /// Truncates a `u128` into this type.
    fn from_u128(v: u128) -> Self;

    /// Reads a value from its little-endian byte representation.
    ///
    /// The slice must be exactly [`BYTES`][Self::BYTES] long.
    fn read_le(bytes: &[u8]) -> Self;
    /// Reads a value from its big-endian byte representation.
    ///
    /// The slice must be exactly [`BYTES`][Self::BYTES] long.
    fn read_be(bytes: &[u8]) -> Self;
}

macro_rules! impl_uint {
    ($ty:ty, $bytes:expr, $mult:expr, $inc:expr, $mcg_mult:expr, $mcg_unmult:expr) => {
        impl Uint for $ty {
            const BITS: u32 = <$ty>::BITS;
            const BYTES: usize = $bytes;
            const ZERO: Self = 0;
            const ONE: Self = 1;
            const MAX: Self = <$ty>::MAX;

            const DEFAULT_MULTIPLIER: Self = $mult;
            const DEFAULT_INCREMENT: Self = $inc;
            const MCG_MULTIPLIER: Self = $mcg_mult;
            const MCG_UNMULTIPLIER: Self = $mcg_unmult;

            type Bytes = [u8; $bytes];
            type StreamBytes = [u8; 2 * $bytes];

            #[inline(always)]
            fn wrapping_add(self, rhs: Self) -> Self {
                self.wrapping_add(rhs)
            }

            #[inline(always)]
            fn wrapping_sub(self, rhs: Self) -> Self {
                self.wrapping_sub(rhs)
            }

            #[inline(always)]
            fn wrapping_mul(self, rhs: Self) -> Self {
                self.wrapping_mul(rhs)
            }

            #[inline(always)]
            fn wrapping_neg(self) -> Self {
                self.wrapping_neg()
            }

            #[inline(always)]
            fn wrapping_shl(self, n: u32) -> Self {
                self.wrapping_shl(n)
            }

            #[inline(always)]
            fn from_usize(n: usize) -> Self {
                n as $ty
            }

            #[inline(always)]
            fn as_usize(self) -> usize {
                self as usize
            }

            #[inline(always)]
            fn to_u128(self) -> u128 {
                self as u128
            }

            #[inline(always)]
            fn from_u128(v: u128) -> Self {
                v as $ty
            }

            #[inline]
            fn read_le(bytes: &[u8]) -> Self {
                let mut buf = [0u8; $bytes];
                buf.copy_from_slice(bytes);
                <$ty>::from_le_bytes(buf)
            }

            #[inline]
            fn read_be(bytes: &[u8]) -> Self {
                let mut buf = [0u8; $bytes];
                buf.copy_from_slice(bytes);
                <$ty>::from_be_bytes(buf)
            }
        }
    };
}

impl_uint!(u8, 1, 141, 77, 217, 105);
impl_uint!(u16, 2, 12829, 47989, 62169, 28009);
impl_uint!(u32, 4, 747796405, 2891336453, 277803737, 2897767785);
impl_uint!(
    u64,
    8,
    6364136223846793005,
    1442695040888963407,
    12605985483714917081,
    15009553638781119849
);
impl_uint!(
    u128,
    16,
    0x2360_ed05_1fc6_5da4_4385_df64_9fcc_f645,
    0x5851_f42d_4c95_7f2d_1405_7b7e_f767_814f,
    0xf690_1927_4d7f_699c_aef1_7502_108e_f2d9,
    0xc827_645e_182b_c965_d04c_a582_acb8_6d69
);

#[cfg(test)]
mod tests {
    use super::Uint;

    fn check_inverse<T: Uint>() {
        assert_eq!(T::MCG_MULTIPLIER.wrapping_mul(T::MCG_UNMULTIPLIER), T::ONE);
        // The increment must be odd and the multiplier 5 mod 8, or the
        // low-order state bits lose their full period.
        assert_eq!(T::DEFAULT_INCREMENT & T::ONE, T::ONE);
        assert_eq!(T::DEFAULT_MULTIPLIER & T::from_usize(7), T::from_usize(5));
    }

    #[test]
    fn test_constant_tables() {
        check_inverse::<u8>();
        check_inverse::<u16>();
        check_inverse::<u32>();
        check_inverse::<u64>();
        check_inverse::<u128>();
    }

    #[test]
    fn test_byte_conversions() {
        assert_eq!(<u32 as Uint>::read_le(&[1, 2, 3, 4]), 0x04030201);
        assert_eq!(<u32 as Uint>::read_be(&[1, 2, 3, 4]), 0x01020304);
        assert_eq!(u16::from_u128(0x1_ffff), 0xffff);
        assert_eq!(0xffff_u16.to_u128(), 0xffff);
    }
}
