// Copyright 2018-2021 Developers of the Rand project.
// Copyright 2014-2017, 2019 Melissa O'Neill and PCG Project contributors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Multiplier selection for the LCG transition.

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::uint::Uint;

/// Supplies the multiplier of the state transition.
///
/// The multiplier is a compile-time property of an engine configuration;
/// engines with different multiplier policies are different types and
/// cannot be compared or subtracted.
pub trait Multiplier<Itype> {
    /// The LCG multiplier constant.
    const MULTIPLIER: Itype;
}

/// The reference multiplier for each state width.
///
/// These are the constants from the PCG paper; all of them are 5 mod 8,
/// which makes them usable both with an increment and as pure MCG
/// multipliers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct DefaultMultiplier;

impl<Itype: Uint> Multiplier<Itype> for DefaultMultiplier {
    const MULTIPLIER: Itype = Itype::DEFAULT_MULTIPLIER;
}
