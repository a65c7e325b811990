// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Everything that can go wrong between a render request and a frame
//! landing on disk.  Numeric inputs are checked here, at the edge,
//! so that nothing downstream ever sees a `NaN`, a zero zoom, or a
//! divisor that would never shrink the iteration target.

use failure::Fail;
use std::io;

/// The error type shared by every fallible operation in the crate.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// Zoom must be a finite number greater than zero.
    #[fail(display = "zoom must be a finite number greater than 0, got {}", _0)]
    InvalidZoom(f64),

    /// The origin must have finite components.
    #[fail(display = "origin must be finite, got {},{}", _0, _1)]
    InvalidOrigin(f64, f64),

    /// The render speed divides the target; anything at or below 1
    /// would never reach the bottom of the schedule.
    #[fail(display = "render speed must be a finite number greater than 1, got {}", _0)]
    InvalidSpeed(f64),

    /// The iteration target must be a finite number of at least 1.
    #[fail(display = "target iterations must be a finite number of at least 1, got {}", _0)]
    InvalidTarget(f64),

    /// The schedule would contain more frames than we are willing to render.
    #[fail(display = "schedule would need {} frames, the limit is {}", frames, limit)]
    ScheduleTooLong {
        /// Frames the schedule would have needed.
        frames: usize,
        /// The configured ceiling.
        limit: usize,
    },

    /// A raster with no pixels.
    #[fail(display = "canvas must have a non-zero size, got {}x{}", width, height)]
    EmptyCanvas {
        /// Requested width in pixels.
        width: usize,
        /// Requested height in pixels.
        height: usize,
    },

    /// A raster side too long to address.
    #[fail(
        display = "canvas sides must be at most {} pixels, got {}x{}",
        limit, width, height
    )]
    CanvasTooLarge {
        /// Requested width in pixels.
        width: usize,
        /// Requested height in pixels.
        height: usize,
        /// The longest side allowed.
        limit: usize,
    },

    /// The corners of the complex plane are inverted, degenerate, or
    /// not finite.
    #[fail(display = "invalid complex plane: {}", _0)]
    InvalidBounds(String),

    /// Canvas downscale factors start at 1.
    #[fail(display = "downscale factor must be at least 1, got {}", _0)]
    InvalidDownscale(usize),

    /// Animation frames need time between them.
    #[fail(display = "frame interval must be longer than zero")]
    InvalidInterval,

    /// The session was superseded or cancelled before the frame completed.
    #[fail(display = "render session was cancelled")]
    Cancelled,

    /// A band worker panicked while rendering.
    #[fail(display = "a render worker panicked")]
    WorkerPanicked,

    /// The animator's worker thread is no longer accepting requests.
    #[fail(display = "the animator has stopped")]
    AnimatorStopped,

    /// Encoding a frame failed.
    #[fail(display = "could not encode frame: {}", _0)]
    Image(#[cause] image::ImageError),

    /// Writing a frame failed.
    #[fail(display = "could not write frame: {}", _0)]
    Io(#[cause] io::Error),
}

impl From<image::ImageError> for RenderError {
    fn from(err: image::ImageError) -> Self {
        RenderError::Image(err)
    }
}

impl From<io::Error> for RenderError {
    fn from(err: io::Error) -> Self {
        RenderError::Io(err)
    }
}

/// Results produced by this crate.
pub type Result<T> = std::result::Result<T, RenderError>;
