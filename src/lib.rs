#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Progressive Mandelbrot renderer
//!
//! The Mandelbrot set takes a point `c` on the complex plane and
//! repeatedly computes `z = z^2 + c`, starting from zero, measuring how
//! quickly that number goes to infinity.  Points whose orbit never
//! leaves the radius-2 disk are in the set; everything else is coloured
//! by how long it took to leave.
//!
//! Deep renders are slow, so instead of making you wait for the one
//! picture you asked for, a render session walks up an "iteration
//! schedule" of increasing caps (say 6, 12, 25, 50, 100), painting the
//! whole canvas once per cap on a fixed clock.  A blurry picture
//! appears at once and sharpens as the caps deepen.  A new request
//! supersedes the session in flight.
//!
//! The pieces, bottom-up:
//!
//! * `escape`: the escape-time function.
//! * `planes`: mapping between canvas pixels and the complex plane.
//! * `schedule`: the iteration schedule.
//! * `colour`: escape counts to colours.
//! * `params`: the immutable snapshot each request renders.
//! * `frame`: paints one frame across worker threads, cancellably.
//! * `driver`: the per-tick state machine.
//! * `animate`: drives the state machine from a clock on its own thread.
//! * `navigate`: panning and zooming.
//! * `output`: where frames go.

pub mod animate;
pub mod colour;
pub mod driver;
pub mod error;
pub mod escape;
pub mod frame;
pub mod navigate;
pub mod output;
pub mod params;
pub mod planes;
pub mod schedule;

pub use animate::Animator;
pub use colour::Palette;
pub use driver::{RenderDriver, RenderRequest, RenderState};
pub use error::RenderError;
pub use escape::escape_time;
pub use frame::{CancelToken, Frame, FrameRenderer};
pub use output::{FrameSink, PngSink};
pub use params::{RenderParams, View};
pub use planes::{ComplexPlane, IntegralPlane, Orientation, Pixel, PlaneMapper};
pub use schedule::IterationSchedule;
