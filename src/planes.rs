// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane (the canvas, with an
//! origin at 0,0 in its top-left corner) and a rectangle on the
//! complex plane (the viewport), defined by its left-lower and
//! right-upper corners.
use num::Complex;

use crate::error::{RenderError, Result};
use crate::params::View;

/// Width of the complex plane visible at zoom 1.  With the origin at
/// -0.75 this covers the real axis from -2 to 1.
pub const DEFAULT_WIDTH: f64 = 3.0;

/// Height of the complex plane visible at zoom 1, from -1i to 1i.
pub const DEFAULT_HEIGHT: f64 = 2.0;

/// The longest canvas side we will render.  Frames are `RgbImage`s,
/// which address pixels with `u32`; this keeps well inside that.
pub const MAX_SIDE: usize = u16::MAX as usize;

/// Describes the width and height of an integral plane that is assumed to start at
/// 0,0 and all values are assumed to be non-negative integers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IntegralPlane(pub usize, pub usize);

impl IntegralPlane {
    /// Both sides must be at least one pixel and at most `MAX_SIDE`.
    pub fn validate(&self) -> Result<()> {
        let (width, height) = (self.0, self.1);
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyCanvas { width, height });
        }
        if width > MAX_SIDE || height > MAX_SIDE {
            return Err(RenderError::CanvasTooLarge {
                width,
                height,
                limit: MAX_SIDE,
            });
        }
        Ok(())
    }

    /// Fit the largest canvas with the viewport's 3:2 aspect ratio
    /// into the available space, then shrink it by an integral
    /// factor; rendering at half resolution is four times cheaper.
    pub fn fit(available_width: usize, available_height: usize, downscale: usize) -> Result<Self> {
        if downscale == 0 {
            return Err(RenderError::InvalidDownscale(downscale));
        }
        let too_large = RenderError::CanvasTooLarge {
            width: available_width,
            height: available_height,
            limit: MAX_SIDE,
        };
        let tall = available_height.checked_mul(3);
        let wide = available_width.checked_mul(2);
        let (tall, wide) = match (tall, wide) {
            (Some(tall), Some(wide)) => (tall, wide),
            _ => return Err(too_large),
        };
        let (width, height) = if tall < wide {
            (tall / 2, available_height)
        } else {
            (available_width, wide / 3)
        };
        let plane = IntegralPlane(width / downscale, height / downscale);
        plane.validate()?;
        Ok(plane)
    }
}

/// Describes the lower-left corner and upper-right corner of the
/// Complex plane, treating the real part of each value as the
/// x-component and the imaginary part of each value as the
/// y-component.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ComplexPlane(pub Complex<f64>, pub Complex<f64>);

impl ComplexPlane {
    /// The viewport centred on the view's origin, `DEFAULT_WIDTH` by
    /// `DEFAULT_HEIGHT` wide at zoom 1 and proportionally smaller as
    /// the zoom grows.
    pub fn around(view: &View) -> Self {
        let half_real = DEFAULT_WIDTH / 2.0 / view.zoom();
        let half_imaginary = DEFAULT_HEIGHT / 2.0 / view.zoom();
        let origin = view.origin();
        ComplexPlane(
            Complex::new(origin.re - half_real, origin.im - half_imaginary),
            Complex::new(origin.re + half_real, origin.im + half_imaginary),
        )
    }

    /// Checks that both corners are finite and that the left-lower
    /// corner really is to the left of and below the right-upper one.
    pub fn validate(&self) -> Result<()> {
        let (leftlower, rightupper) = (self.0, self.1);
        if !(leftlower.re.is_finite()
            && leftlower.im.is_finite()
            && rightupper.re.is_finite()
            && rightupper.im.is_finite())
        {
            return Err(RenderError::InvalidBounds(
                "the corners must be finite".to_string(),
            ));
        }
        if rightupper.re <= leftlower.re {
            return Err(RenderError::InvalidBounds(
                "the left lower corner is not to the left of the right upper corner".to_string(),
            ));
        }
        if rightupper.im <= leftlower.im {
            return Err(RenderError::InvalidBounds(
                "the left lower corner is not lower than the right upper corner".to_string(),
            ));
        }
        Ok(())
    }

    /// Extent along the real axis.
    pub fn width(&self) -> f64 {
        self.1.re - self.0.re
    }

    /// Extent along the imaginary axis.
    pub fn height(&self) -> f64 {
        self.1.im - self.0.im
    }
}

/// Which way the imaginary axis points on the canvas.  Canvas rows
/// count downward, so drawing with the imaginary axis pointing up
/// means flipping rows.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Increasing imaginary values render upward.
    ImaginaryUp,
    /// Increasing imaginary values render downward, row 0 at the
    /// minimum imaginary value.
    ImaginaryDown,
}

impl Default for Orientation {
    fn default() -> Self {
        Orientation::ImaginaryUp
    }
}

/// Describes the x, y of a point in a region.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pixel(pub usize, pub usize);

/// Contains the definitions of two planes: an integral cartesian plane,
/// and a complex cartesian plane.  Maps points from one to the other.
#[derive(Debug, Clone)]
pub struct PlaneMapper {
    /// The width and height of the canvas.
    pub integral_plane: IntegralPlane,
    /// The two coordinates defining the complex cartesian plane,
    /// left-lower and right-upper
    pub complex_plane: ComplexPlane,
    /// How far along each complex axis a single pixel reaches.
    steps: (f64, f64),
    orientation: Orientation,
}

impl PlaneMapper {
    /// Constructor.  Takes the canvas dimensions and the viewport, and
    /// refuses any combination that would divide by zero or could not
    /// be held in an image.
    pub fn new(
        width: usize,
        height: usize,
        complex_plane: ComplexPlane,
        orientation: Orientation,
    ) -> Result<PlaneMapper> {
        IntegralPlane(width, height).validate()?;
        complex_plane.validate()?;

        let steps = (
            complex_plane.width() / (width as f64),
            complex_plane.height() / (height as f64),
        );

        Ok(PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            complex_plane,
            steps,
            orientation,
        })
    }

    /// The orientation this mapper was built with.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Given a complex number, return its (possibly fractional, possibly
    /// off-canvas) position on the integral plane.
    pub fn point_to_position(&self, point: &Complex<f64>) -> (f64, f64) {
        let leftlower = self.complex_plane.0;
        let x = (point.re - leftlower.re) / self.steps.0;
        let rows = (point.im - leftlower.im) / self.steps.1;
        let y = match self.orientation {
            Orientation::ImaginaryUp => (self.integral_plane.1 as f64) - rows,
            Orientation::ImaginaryDown => rows,
        };
        (x, y)
    }

    /// Given a complex number corresponding to a location on the
    /// complex cartesian plane, map that as closely as possible to a
    /// point on the integral cartesian plane.  Points that land off
    /// the canvas have no pixel.
    pub fn point_to_pixel(&self, point: &Complex<f64>) -> Option<Pixel> {
        let (x, y) = self.point_to_position(point);
        let (x, y) = (x.round(), y.round());
        if !x.is_finite() || !y.is_finite() || x < 0.0 || y < 0.0 {
            return None;
        }
        let pixel = Pixel(x as usize, y as usize);
        if pixel.0 >= self.integral_plane.0 || pixel.1 >= self.integral_plane.1 {
            return None;
        }
        Some(pixel)
    }

    /// Given a pixel on the integral cartesian plane, map that as
    /// closely as possible to a point on the complex cartesian plane.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        let leftlower = self.complex_plane.0;
        let rows = match self.orientation {
            Orientation::ImaginaryUp => (self.integral_plane.1 - pixel.1) as f64,
            Orientation::ImaginaryDown => pixel.1 as f64,
        };
        Complex::new(
            leftlower.re + (pixel.0 as f64) * self.steps.0,
            leftlower.im + rows * self.steps.1,
        )
    }

    /// The linear offset of a pixel from the root of a row-major
    /// buffer of this plane.  With a row counted from the top of a band,
    /// it is the offset within that band.
    pub fn pixel_to_offset(&self, pixel: &Pixel) -> usize {
        pixel.1 * self.integral_plane.0 + pixel.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plane(ll: (f64, f64), ru: (f64, f64)) -> ComplexPlane {
        ComplexPlane(Complex::new(ll.0, ll.1), Complex::new(ru.0, ru.1))
    }

    #[test]
    fn planemapper_fails_on_bad_shape() {
        let pm = PlaneMapper::new(4, 4, plane((-1.0, 1.0), (1.0, -1.0)), Orientation::ImaginaryUp);
        assert!(pm.is_err());
        let pm = PlaneMapper::new(4, 4, plane((1.0, -1.0), (1.0, 1.0)), Orientation::ImaginaryUp);
        assert!(pm.is_err());
    }

    #[test]
    fn planemapper_fails_on_empty_canvas() {
        let pm = PlaneMapper::new(0, 4, plane((-1.0, -1.0), (1.0, 1.0)), Orientation::ImaginaryUp);
        match pm {
            Err(RenderError::EmptyCanvas { width: 0, height: 4 }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn planemapper_fails_on_infinite_corners() {
        let pm = PlaneMapper::new(
            4,
            4,
            plane((std::f64::NEG_INFINITY, -1.0), (1.0, 1.0)),
            Orientation::ImaginaryUp,
        );
        assert!(pm.is_err());
    }

    #[test]
    fn planemapper_passes_on_good_shape() {
        let pm = PlaneMapper::new(4, 4, plane((-1.0, -1.0), (1.0, 1.0)), Orientation::ImaginaryUp);
        assert!(pm.is_ok());
    }

    #[test]
    fn default_view_covers_the_classic_window() {
        let view = View::new(Complex::new(-0.75, 0.0), 1.0).unwrap();
        let plane = ComplexPlane::around(&view);
        assert_eq!(plane.0, Complex::new(-2.25, -1.0));
        assert_eq!(plane.1, Complex::new(0.75, 1.0));
    }

    #[test]
    fn zoom_shrinks_the_viewport() {
        let view = View::new(Complex::new(0.0, 0.0), 4.0).unwrap();
        let plane = ComplexPlane::around(&view);
        assert_eq!(plane.width(), 0.75);
        assert_eq!(plane.height(), 0.5);
    }

    #[test]
    fn point_to_pixel_flips_the_imaginary_axis() {
        let pm = PlaneMapper::new(4, 4, plane((-2.0, -2.0), (2.0, 2.0)), Orientation::ImaginaryUp)
            .unwrap();
        assert_eq!(pm.point_to_pixel(&Complex::new(0.0, 0.0)), Some(Pixel(2, 2)));
        assert_eq!(pm.point_to_pixel(&Complex::new(-2.0, 2.0)), Some(Pixel(0, 0)));
        assert_eq!(pm.point_to_pixel(&Complex::new(1.0, -1.0)), Some(Pixel(3, 3)));
        assert_eq!(pm.point_to_pixel(&Complex::new(-2.0, -2.0)), None);
    }

    #[test]
    fn point_to_pixel_without_flip() {
        let pm = PlaneMapper::new(4, 4, plane((-2.0, -2.0), (2.0, 2.0)), Orientation::ImaginaryDown)
            .unwrap();
        assert_eq!(pm.point_to_pixel(&Complex::new(0.0, 0.0)), Some(Pixel(2, 2)));
        assert_eq!(pm.point_to_pixel(&Complex::new(-2.0, -2.0)), Some(Pixel(0, 0)));
        assert_eq!(pm.point_to_pixel(&Complex::new(1.0, 1.0)), Some(Pixel(3, 3)));
        assert_eq!(pm.point_to_pixel(&Complex::new(2.0, 2.0)), None);
    }

    #[test]
    fn point_to_position_matches_raw_formula() {
        let pm = PlaneMapper::new(300, 200, plane((-2.25, -1.0), (0.75, 1.0)), Orientation::ImaginaryUp)
            .unwrap();
        let (x, y) = pm.point_to_position(&Complex::new(-0.75, 0.5));
        assert!((x - 150.0).abs() < 1e-9);
        assert!((y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn pixel_to_point_on_mixed_planes() {
        let pm = PlaneMapper::new(4, 4, plane((-2.0, -2.0), (2.0, 2.0)), Orientation::ImaginaryDown)
            .unwrap();
        assert_eq!(pm.pixel_to_point(&Pixel(2, 2)), Complex::new(0.0, 0.0));
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(-2.0, -2.0));
        let pm = PlaneMapper::new(4, 4, plane((-2.0, -2.0), (2.0, 2.0)), Orientation::ImaginaryUp)
            .unwrap();
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(-2.0, 2.0));
    }

    #[test]
    fn round_trip_stays_within_one_step() {
        for orientation in &[Orientation::ImaginaryUp, Orientation::ImaginaryDown] {
            let view = View::new(Complex::new(-0.743_643_9, 0.131_825_9), 3_000.0).unwrap();
            let pm = PlaneMapper::new(300, 200, ComplexPlane::around(&view), *orientation).unwrap();
            for y in (0..200).step_by(7) {
                for x in (0..300).step_by(11) {
                    let point = pm.pixel_to_point(&Pixel(x, y));
                    let (px, py) = pm.point_to_position(&point);
                    assert!((px - x as f64).abs() <= 1.0, "x {} -> {}", x, px);
                    assert!((py - y as f64).abs() <= 1.0, "y {} -> {}", y, py);
                    assert_eq!(pm.point_to_pixel(&point), Some(Pixel(x, y)));
                }
            }
        }
    }

    #[test]
    fn offsets_are_row_major() {
        let pm = PlaneMapper::new(5, 3, plane((0.0, 0.0), (5.0, 3.0)), Orientation::ImaginaryUp)
            .unwrap();
        assert_eq!(pm.pixel_to_offset(&Pixel(0, 0)), 0);
        assert_eq!(pm.pixel_to_offset(&Pixel(4, 2)), 14);
    }

    #[test]
    fn fit_keeps_three_by_two() {
        assert_eq!(IntegralPlane::fit(1920, 1080, 1).unwrap(), IntegralPlane(1620, 1080));
        assert_eq!(IntegralPlane::fit(900, 1200, 1).unwrap(), IntegralPlane(900, 600));
        assert_eq!(IntegralPlane::fit(300, 200, 1).unwrap(), IntegralPlane(300, 200));
        assert_eq!(IntegralPlane::fit(1920, 1080, 2).unwrap(), IntegralPlane(810, 540));
    }

    #[test]
    fn fit_rejects_bad_input() {
        assert!(IntegralPlane::fit(300, 200, 0).is_err());
        assert!(IntegralPlane::fit(1, 1, 1).is_err());
    }

    #[test]
    fn fit_refuses_sizes_that_would_overflow() {
        match IntegralPlane::fit(usize::MAX, usize::MAX, 1) {
            Err(RenderError::CanvasTooLarge { limit, .. }) => assert_eq!(limit, MAX_SIDE),
            other => panic!("unexpected {:?}", other),
        }
        match IntegralPlane::fit(6_000_000_000, 4_000_000_000, 1) {
            Err(RenderError::CanvasTooLarge { .. }) => {}
            other => panic!("unexpected {:?}", other),
        }
        // Downscaling can bring an oversized space back within bounds.
        assert_eq!(
            IntegralPlane::fit(150_000, 100_000, 4).unwrap(),
            IntegralPlane(37_500, 25_000)
        );
    }

    #[test]
    fn planemapper_fails_on_oversized_canvas() {
        let pm = PlaneMapper::new(
            MAX_SIDE + 1,
            4,
            plane((-1.0, -1.0), (1.0, 1.0)),
            Orientation::ImaginaryUp,
        );
        match pm {
            Err(RenderError::CanvasTooLarge { width, .. }) => assert_eq!(width, MAX_SIDE + 1),
            other => panic!("unexpected {:?}", other),
        }
        assert!(
            PlaneMapper::new(MAX_SIDE, 1, plane((-1.0, -1.0), (1.0, 1.0)), Orientation::ImaginaryUp)
                .is_ok()
        );
    }
}
