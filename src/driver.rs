// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The render driver: a small state machine that takes render
//! requests and, one tick at a time, walks a session through its
//! iteration schedule.  It knows nothing about clocks; something else
//! (the `Animator`, a test, a UI event loop) decides when to tick.

use log::{debug, info, warn};

use crate::error::{RenderError, Result};
use crate::frame::{CancelToken, Frame, FrameRenderer};
use crate::params::RenderParams;
use crate::schedule::IterationSchedule;

/// Where the driver is in its cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RenderState {
    /// Nothing to draw.
    Idle,
    /// A session is waiting for its first tick.
    Scheduled,
    /// A session has painted `frame` frames and will paint the frame at
    /// that index on the next tick.
    Rendering {
        /// Index of the next frame.
        frame: usize,
    },
}

/// A render request: a parameter snapshot and the token that will
/// cancel it.  Hold on to a clone of the token to stop the session
/// from another thread.
#[derive(Clone, Debug)]
pub struct RenderRequest {
    params: RenderParams,
    token: CancelToken,
}

impl RenderRequest {
    /// A request with a fresh token.
    pub fn new(params: RenderParams) -> Self {
        RenderRequest {
            params,
            token: CancelToken::new(),
        }
    }

    /// The token that cancels this request's session.
    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    /// The snapshot this request renders.
    pub fn params(&self) -> &RenderParams {
        &self.params
    }
}

struct Session {
    id: u64,
    params: RenderParams,
    schedule: IterationSchedule,
    token: CancelToken,
}

/// Steps render sessions through their schedules, one full frame per
/// tick.
pub struct RenderDriver {
    renderer: FrameRenderer,
    state: RenderState,
    session: Option<Session>,
    sessions: u64,
}

impl RenderDriver {
    /// An idle driver that paints with `renderer`.
    pub fn new(renderer: FrameRenderer) -> Self {
        RenderDriver {
            renderer,
            state: RenderState::Idle,
            session: None,
            sessions: 0,
        }
    }

    /// The current state.
    pub fn state(&self) -> RenderState {
        self.state
    }

    /// True when there is nothing left to paint.
    pub fn is_idle(&self) -> bool {
        self.state == RenderState::Idle
    }

    /// The id of the active session, if any.
    pub fn session_id(&self) -> Option<u64> {
        self.session.as_ref().map(|session| session.id)
    }

    /// The schedule of the active session, if any.
    pub fn schedule(&self) -> Option<&IterationSchedule> {
        self.session.as_ref().map(|session| &session.schedule)
    }

    /// Start a new session.  Any session still in flight is cancelled
    /// first; only one session renders at a time.  Returns the new
    /// session's id.
    pub fn request(&mut self, request: RenderRequest) -> Result<u64> {
        let schedule = request.params.schedule()?;
        request.params.mapper()?;

        if let Some(previous) = self.session.take() {
            if self.state != RenderState::Idle {
                warn!("session {} superseded by a new request", previous.id);
            }
            previous.token.cancel();
        }

        self.sessions += 1;
        let id = self.sessions;
        let viewport = request.params.viewport();
        info!(
            "session {}: real [{}, {}], imaginary [{}, {}], schedule {}",
            id,
            viewport.0.re,
            viewport.1.re,
            viewport.0.im,
            viewport.1.im,
            schedule
        );

        self.session = Some(Session {
            id,
            params: request.params,
            schedule,
            token: request.token,
        });
        self.state = RenderState::Scheduled;
        Ok(id)
    }

    /// Cancel the active session, if any, and go idle.
    pub fn cancel(&mut self) {
        if let Some(session) = self.session.take() {
            debug!("session {} cancelled", session.id);
            session.token.cancel();
        }
        self.state = RenderState::Idle;
    }

    /// Paint the next frame of the active session.  Returns `None` when
    /// idle or when the session was cancelled, in which case the driver
    /// goes idle.  After the last frame of the schedule the driver is
    /// idle again.
    pub fn tick(&mut self) -> Result<Option<Frame>> {
        let index = match self.state {
            RenderState::Idle => return Ok(None),
            RenderState::Scheduled => 0,
            RenderState::Rendering { frame } => frame,
        };

        let outcome = match self.session {
            Some(ref session) if !session.token.is_cancelled() => {
                match session.schedule.get(index) {
                    Some(max_iterations) => self
                        .renderer
                        .render(&session.params, max_iterations, &session.token)
                        .map(|image| Frame {
                            session: session.id,
                            index,
                            frames: session.schedule.len(),
                            max_iterations,
                            image,
                        }),
                    None => Err(RenderError::Cancelled),
                }
            }
            _ => Err(RenderError::Cancelled),
        };

        match outcome {
            Ok(frame) => {
                debug!(
                    "session {}: frame {}/{} at {} iterations",
                    frame.session,
                    frame.index + 1,
                    frame.frames,
                    frame.max_iterations
                );
                self.state = if frame.index + 1 >= frame.frames {
                    info!("session {} complete", frame.session);
                    RenderState::Idle
                } else {
                    RenderState::Rendering {
                        frame: frame.index + 1,
                    }
                };
                Ok(Some(frame))
            }
            Err(RenderError::Cancelled) => {
                self.cancel();
                Ok(None)
            }
            Err(err) => {
                self.cancel();
                Err(err)
            }
        }
    }
}

impl Default for RenderDriver {
    fn default() -> Self {
        RenderDriver::new(FrameRenderer::default())
    }
}
