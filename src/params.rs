// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The immutable snapshot of everything a render needs.  A new
//! `RenderParams` is built for every render request and threaded
//! through the driver, so a frame's inputs never change underneath it.

use num::Complex;

use crate::colour::Palette;
use crate::error::{RenderError, Result};
use crate::planes::{ComplexPlane, IntegralPlane, Orientation, PlaneMapper};
use crate::schedule::{self, IterationSchedule};

/// Where the camera points and how far it is zoomed in.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct View {
    origin: Complex<f64>,
    zoom: f64,
}

impl View {
    /// Rejects non-finite origins and any zoom that is not a finite,
    /// strictly positive number.
    pub fn new(origin: Complex<f64>, zoom: f64) -> Result<Self> {
        if !origin.re.is_finite() || !origin.im.is_finite() {
            return Err(RenderError::InvalidOrigin(origin.re, origin.im));
        }
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(RenderError::InvalidZoom(zoom));
        }
        Ok(View { origin, zoom })
    }

    /// The centre of the viewport.
    pub fn origin(&self) -> Complex<f64> {
        self.origin
    }

    /// The magnification; 1 shows the whole set.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }
}

impl Default for View {
    fn default() -> Self {
        View {
            origin: Complex::new(-0.75, 0.0),
            zoom: 1.0,
        }
    }
}

/// One render request's worth of settings.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderParams {
    view: View,
    bounds: Option<ComplexPlane>,
    canvas: IntegralPlane,
    target_iterations: f64,
    speed: f64,
    palette: Palette,
    orientation: Orientation,
}

impl RenderParams {
    /// Validates the canvas, the iteration target, and the speed.  The
    /// view has already been validated by its own constructor.
    pub fn new(
        view: View,
        canvas: IntegralPlane,
        target_iterations: f64,
        speed: f64,
    ) -> Result<Self> {
        canvas.validate()?;
        schedule::check_target(target_iterations)?;
        schedule::check_speed(speed)?;
        Ok(RenderParams {
            view,
            bounds: None,
            canvas,
            target_iterations,
            speed,
            palette: Palette::default(),
            orientation: Orientation::default(),
        })
    }

    /// Replace the viewport derived from the view with explicit corners.
    pub fn with_bounds(mut self, bounds: ComplexPlane) -> Result<Self> {
        bounds.validate()?;
        self.bounds = Some(bounds);
        Ok(self)
    }

    /// Use a different colour mapping.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Choose which way the imaginary axis points.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// The view this request was made with.
    pub fn view(&self) -> &View {
        &self.view
    }

    /// The canvas dimensions.
    pub fn canvas(&self) -> IntegralPlane {
        self.canvas
    }

    /// The deepest iteration cap of the schedule.
    pub fn target_iterations(&self) -> f64 {
        self.target_iterations
    }

    /// The divisor between successive schedule entries.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// The colour mapping.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Which way the imaginary axis points.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// The rectangle of the complex plane being rendered: the explicit
    /// bounds if any were given, otherwise the one around the view.
    pub fn viewport(&self) -> ComplexPlane {
        self.bounds
            .unwrap_or_else(|| ComplexPlane::around(&self.view))
    }

    /// A mapper between the canvas and the viewport.
    pub fn mapper(&self) -> Result<PlaneMapper> {
        PlaneMapper::new(self.canvas.0, self.canvas.1, self.viewport(), self.orientation)
    }

    /// The iteration caps this request will step through.
    pub fn schedule(&self) -> Result<IterationSchedule> {
        IterationSchedule::build(self.target_iterations, self.speed)
    }
}
