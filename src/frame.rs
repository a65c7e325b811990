// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Paints one full frame: every pixel of the canvas is mapped to the
//! complex plane, evaluated, and coloured.  The canvas is cut into
//! bands of rows which a pool of scoped threads pull from a shared
//! queue, so a frame can be abandoned between bands when its session
//! is cancelled.

use image::{Rgb, RgbImage};
use itertools::iproduct;
use log::trace;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::colour::Palette;
use crate::error::{RenderError, Result};
use crate::escape::escape_time;
use crate::params::RenderParams;
use crate::planes::{Pixel, PlaneMapper};

/// Rows per band unless told otherwise.
pub const DEFAULT_BAND_ROWS: usize = 16;

type BandQueue<'a> = Arc<Mutex<std::iter::Enumerate<std::slice::ChunksMut<'a, u8>>>>;

/// A shared flag that tells a render session to stop.  Clones observe
/// the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A fresh, uncancelled token.
    pub fn new() -> Self {
        CancelToken(Arc::new(AtomicBool::new(false)))
    }

    /// Stops every render holding a clone of this token at its next
    /// band boundary.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether `cancel` has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One rendered frame of a session.
#[derive(Clone, Debug)]
pub struct Frame {
    /// The session that produced it.
    pub session: u64,
    /// Its position in the session's schedule.
    pub index: usize,
    /// Of how many frames.
    pub frames: usize,
    /// The iteration cap it was rendered with.
    pub max_iterations: usize,
    /// The pixels.
    pub image: RgbImage,
}

/// Renders frames over a fixed number of worker threads.
#[derive(Copy, Clone, Debug)]
pub struct FrameRenderer {
    threads: usize,
    band_rows: usize,
}

impl FrameRenderer {
    /// A renderer that uses up to `threads` workers (at least one).
    pub fn new(threads: usize) -> Self {
        FrameRenderer {
            threads: threads.max(1),
            band_rows: DEFAULT_BAND_ROWS,
        }
    }

    /// Change how many rows each worker takes at a time.  Smaller
    /// bands notice cancellation sooner.
    pub fn with_band_rows(mut self, band_rows: usize) -> Self {
        self.band_rows = band_rows.max(1);
        self
    }

    /// The number of worker threads.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Paint the whole canvas described by `params` with the given
    /// iteration cap.  Returns `RenderError::Cancelled` if the token
    /// was cancelled before the last band was painted.
    pub fn render(
        &self,
        params: &RenderParams,
        max_iterations: usize,
        token: &CancelToken,
    ) -> Result<RgbImage> {
        let mapper = params.mapper()?;
        let palette = *params.palette();
        let width = mapper.integral_plane.0;
        let mut image = RgbImage::new(width as u32, mapper.integral_plane.1 as u32);
        let band_rows = self.band_rows;

        {
            let bands: BandQueue =
                Arc::new(Mutex::new(image.chunks_mut(width * 3 * band_rows).enumerate()));
            let mapper = &mapper;
            let palette = &palette;
            crossbeam::scope(|spawner| {
                for _ in 0..self.threads {
                    let bands = bands.clone();
                    spawner.spawn(move |_| loop {
                        if token.is_cancelled() {
                            break;
                        }
                        let band = match bands.lock() {
                            Ok(mut bands) => bands.next(),
                            Err(_) => None,
                        };
                        match band {
                            Some((index, band)) => {
                                trace!("painting band {} at cap {}", index, max_iterations);
                                paint_band(mapper, palette, max_iterations, index * band_rows, band);
                            }
                            None => {
                                break;
                            }
                        }
                    });
                }
            })
            .map_err(|_| RenderError::WorkerPanicked)?;
        }

        if token.is_cancelled() {
            return Err(RenderError::Cancelled);
        }
        Ok(image)
    }
}

impl Default for FrameRenderer {
    fn default() -> Self {
        FrameRenderer::new(num_cpus::get())
    }
}

/// Fill a run of whole rows, starting at canvas row `first_row`.
fn paint_band(
    mapper: &PlaneMapper,
    palette: &Palette,
    max_iterations: usize,
    first_row: usize,
    band: &mut [u8],
) {
    let width = mapper.integral_plane.0;
    let rows = band.len() / (width * 3);
    for (row, column) in iproduct!(0..rows, 0..width) {
        let point = mapper.pixel_to_point(&Pixel(column, first_row + row));
        let Rgb(rgb) = palette.colour(escape_time(point, max_iterations), max_iterations);
        let offset = mapper.pixel_to_offset(&Pixel(column, row)) * 3;
        band[offset..offset + 3].copy_from_slice(&rgb);
    }
}
