// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Colouring by escape time.

use image::Rgb;

use crate::escape::is_inside;

/// Maps escape counts onto a band of hues.  Points that never escaped
/// get the `inside` colour; everything else gets a fully saturated,
/// half-lightness hue that rotates from `base` through `range` degrees
/// as the escape count approaches the cap.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Palette {
    /// Hue, in degrees, of points that escape at once.
    pub base: f64,
    /// Degrees of hue spread across the escape counts.
    pub range: f64,
    /// Colour of points assumed to be in the set.
    pub inside: Rgb<u8>,
}

impl Palette {
    /// The full colour wheel, starting just past red.
    pub const SPECTRUM: Palette = Palette {
        base: 20.0,
        range: 360.0,
        inside: Rgb([0, 0, 0]),
    };

    /// Oranges through greens.
    pub const EMBER: Palette = Palette {
        base: 30.0,
        range: 120.0,
        inside: Rgb([0, 0, 0]),
    };

    /// Looks a palette up by name.
    pub fn named(name: &str) -> Option<Palette> {
        match name {
            "spectrum" => Some(Palette::SPECTRUM),
            "ember" => Some(Palette::EMBER),
            _ => None,
        }
    }

    /// The hue, in degrees and within [0, 360), for a point that
    /// escaped after `escape` of `max_iterations` iterations.
    pub fn hue(&self, escape: usize, max_iterations: usize) -> f64 {
        let ratio = if max_iterations == 0 {
            0.0
        } else {
            escape as f64 / max_iterations as f64
        };
        (self.base + (self.range * ratio).round()).rem_euclid(360.0)
    }

    /// The colour of a pixel.
    pub fn colour(&self, escape: usize, max_iterations: usize) -> Rgb<u8> {
        if is_inside(escape, max_iterations) {
            return self.inside;
        }
        hsl_to_rgb(self.hue(escape, max_iterations), 1.0, 0.5)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette::SPECTRUM
    }
}

/// Converts a hue in degrees and a saturation and lightness in [0, 1]
/// to an opaque RGB colour.
pub fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> Rgb<u8> {
    let h = hue.rem_euclid(360.0);
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = lightness - c / 2.0;

    let (r, g, b) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let channel = |v: f64| ((v + m) * 255.0).round().max(0.0).min(255.0) as u8;
    Rgb([channel(r), channel(g), channel(b)])
}
