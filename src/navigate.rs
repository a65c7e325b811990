// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Panning and zooming.  Pans move the origin by a fraction of the
//! visible extent, so a 10% step is the same fraction of the screen at
//! any zoom.  Coordinates are rounded to a precision that grows with
//! the zoom; at low zoom nobody needs eight decimal places.

use num::Complex;
use std::str::FromStr;

use crate::error::Result;
use crate::params::View;
use crate::planes::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// A small pan step.
pub const SMALL_STEP: f64 = 0.10;

/// A large pan step.
pub const LARGE_STEP: f64 = 0.25;

/// Which way to move the viewport.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Toward negative real values.
    Left,
    /// Toward positive real values.
    Right,
    /// Toward positive imaginary values.
    Up,
    /// Toward negative imaginary values.
    Down,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            _ => Err(format!("unknown direction '{}'", s)),
        }
    }
}

/// The number of decimal places worth showing at a zoom level: one
/// below 2x, eight above 16x, and half the zoom (rounded) in between.
pub fn precision(zoom: f64) -> usize {
    if zoom < 2.0 {
        1
    } else if zoom > 16.0 {
        8
    } else {
        (zoom / 2.0).round() as usize
    }
}

/// Round a coordinate to `places` decimal places.
pub fn round_to(value: f64, places: usize) -> f64 {
    let formatted = format!("{:.*}", places, value);
    formatted.parse().unwrap_or(value)
}

/// Move the view by `fraction` of its visible extent.  The moved
/// coordinate is rounded to the view's display precision.
pub fn pan(view: &View, direction: Direction, fraction: f64) -> Result<View> {
    let origin = view.origin();
    let places = precision(view.zoom());
    let across = fraction * DEFAULT_WIDTH / view.zoom();
    let down = fraction * DEFAULT_HEIGHT / view.zoom();
    let moved = match direction {
        Direction::Left => Complex::new(round_to(origin.re - across, places), origin.im),
        Direction::Right => Complex::new(round_to(origin.re + across, places), origin.im),
        Direction::Up => Complex::new(origin.re, round_to(origin.im + down, places)),
        Direction::Down => Complex::new(origin.re, round_to(origin.im - down, places)),
    };
    View::new(moved, view.zoom())
}

/// Multiply the zoom by `factor`; factors below one zoom out.
pub fn zoom_by(view: &View, factor: f64) -> Result<View> {
    View::new(view.origin(), view.zoom() * factor)
}

/// Format a view the way the coordinate fields show it.
pub fn describe(view: &View) -> String {
    let places = precision(view.zoom());
    format!(
        "origin {:.*},{:.*} zoom {}",
        places,
        view.origin().re,
        places,
        view.origin().im,
        view.zoom()
    )
}
