// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time evaluator.

use num::Complex;

/// Squared escape radius; `|z| >= 2` is tested as `|z|^2 >= 4` to
/// skip the square root.
pub const ESCAPE_RADIUS_SQUARED: f64 = 4.0;

/// This is our classic iterator function.  Starting from zero, it
/// repeatedly computes `z = z^2 + c` and returns how many iterates
/// stayed inside the radius-2 disk before one left it.  If none ever
/// do, it returns `max_iterations`, which callers take to mean "in
/// the set" even though that is only an approximation.
///
/// Any point with `|c| >= 2` escapes on its very first iterate and
/// returns 0.
pub fn escape_time(c: Complex<f64>, max_iterations: usize) -> usize {
    let mut z = Complex::new(0.0_f64, 0.0_f64);
    for i in 0..max_iterations {
        z = z * z + c;
        if z.norm_sqr() >= ESCAPE_RADIUS_SQUARED {
            return i;
        }
    }
    max_iterations
}

/// True when `escape_time` reports that the point never escaped.
#[inline]
pub fn is_inside(escape: usize, max_iterations: usize) -> bool {
    escape >= max_iterations
}
