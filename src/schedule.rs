// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The iteration schedule: the ascending list of iteration caps a
//! render session steps through, one frame per cap, so that a coarse
//! picture shows up quickly and sharpens as the caps deepen.

use std::fmt;

use crate::error::{RenderError, Result};

/// Caps at or below this are cheap enough that we stop dividing.
pub const FLOOR: f64 = 5.0;

/// The most frames a single schedule may contain.  A speed barely
/// above 1 would otherwise produce a schedule longer than anyone
/// would sit through.
pub const MAX_FRAMES: usize = 4096;

/// Checks that a target is a finite number of at least one iteration.
pub fn check_target(target: f64) -> Result<()> {
    if !target.is_finite() || target < 1.0 {
        return Err(RenderError::InvalidTarget(target));
    }
    Ok(())
}

/// Checks that a speed actually shrinks the target when divided into it.
pub fn check_speed(speed: f64) -> Result<()> {
    if !speed.is_finite() || speed <= 1.0 {
        return Err(RenderError::InvalidSpeed(speed));
    }
    Ok(())
}

/// An ascending sequence of iteration caps whose last entry is the
/// (truncated) target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IterationSchedule(Vec<usize>);

impl IterationSchedule {
    /// Follows `target, target/speed, target/speed^2, ...` while the
    /// value stays above `FLOOR`, truncating each value to a whole
    /// number of iterations.  A target that starts at or below the
    /// floor yields a single frame.
    pub fn build(target: f64, speed: f64) -> Result<Self> {
        check_target(target)?;
        check_speed(speed)?;

        let frames = if target > FLOOR {
            ((target / FLOOR).ln() / speed.ln()).ceil() as usize
        } else {
            1
        };
        if frames > MAX_FRAMES {
            return Err(RenderError::ScheduleTooLong {
                frames,
                limit: MAX_FRAMES,
            });
        }

        let mut caps = Vec::with_capacity(frames);
        let mut value = target;
        while value > FLOOR && caps.len() < MAX_FRAMES {
            caps.push(value as usize);
            value /= speed;
        }
        if caps.is_empty() {
            caps.push(value as usize);
        }
        caps.reverse();
        Ok(IterationSchedule(caps))
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The cap for a given frame.
    pub fn get(&self, frame: usize) -> Option<usize> {
        self.0.get(frame).copied()
    }

    /// The deepest cap, rendered last.
    pub fn deepest(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// The caps in rendering order.
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Iterates the caps in rendering order.
    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.0.iter()
    }
}

impl fmt::Display for IterationSchedule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let caps: Vec<String> = self.iter().map(|cap| cap.to_string()).collect();
        write!(f, "[{}]", caps.join(", "))
    }
}
