// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Drives a `RenderDriver` from a clock.  The driver lives on its own
//! worker thread; callers talk to it through a channel, and cancel the
//! session in flight through its token so that a new request does not
//! have to wait for the current frame to finish.

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use log::{debug, error};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::driver::{RenderDriver, RenderRequest};
use crate::error::{RenderError, Result};
use crate::frame::{CancelToken, FrameRenderer};
use crate::output::FrameSink;
use crate::params::RenderParams;

/// One frame per second.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

enum Command {
    Render(RenderRequest),
    Finish,
}

/// A handle on the animation worker.
pub struct Animator {
    commands: Sender<Command>,
    active: Option<CancelToken>,
    worker: Option<JoinHandle<Result<usize>>>,
}

impl Animator {
    /// Starts the worker thread.  Frames go to `sink`; the first frame
    /// of each session is painted one `interval` after its request, and
    /// every following frame one `interval` after the previous tick.
    /// The interval must be longer than zero.
    pub fn spawn<S>(renderer: FrameRenderer, interval: Duration, sink: S) -> Result<Self>
    where
        S: FrameSink + Send + 'static,
    {
        if interval == Duration::from_secs(0) {
            return Err(RenderError::InvalidInterval);
        }
        let (commands, inbox) = channel::unbounded();
        let worker = thread::Builder::new()
            .name("mandelscope-animator".to_string())
            .spawn(move || animate(RenderDriver::new(renderer), inbox, interval, sink))?;
        Ok(Animator {
            commands,
            active: None,
            worker: Some(worker),
        })
    }

    /// Start rendering `params`, superseding whatever is in flight.
    /// Invalid parameters are refused here, before the running session
    /// is disturbed.  Returns the new session's cancel token.
    pub fn request(&mut self, params: RenderParams) -> Result<CancelToken> {
        params.schedule()?;
        params.mapper()?;

        let request = RenderRequest::new(params);
        let token = request.token().clone();
        if let Some(previous) = self.active.replace(token.clone()) {
            previous.cancel();
        }
        self.commands
            .send(Command::Render(request))
            .map_err(|_| RenderError::AnimatorStopped)?;
        Ok(token)
    }

    /// Stop the session in flight, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.active.take() {
            token.cancel();
        }
    }

    /// Let the current session run to the end of its schedule, then
    /// stop the worker.  Returns the number of frames delivered to the
    /// sink, or the first error the worker hit.
    pub fn finish(mut self) -> Result<usize> {
        let _ = self.commands.send(Command::Finish);
        self.join()
    }

    fn join(&mut self) -> Result<usize> {
        match self.worker.take() {
            Some(worker) => worker.join().map_err(|_| RenderError::WorkerPanicked)?,
            None => Ok(0),
        }
    }
}

impl Drop for Animator {
    fn drop(&mut self) {
        if self.worker.is_some() {
            self.cancel();
            let _ = self.commands.send(Command::Finish);
            let _ = self.join();
        }
    }
}

/// The worker loop.  Waits for commands until the next tick is due,
/// then paints one frame.  Ticks missed while a long frame was being
/// painted are skipped, not queued.
fn animate<S: FrameSink>(
    mut driver: RenderDriver,
    inbox: Receiver<Command>,
    interval: Duration,
    mut sink: S,
) -> Result<usize> {
    let mut next_tick: Option<Instant> = None;
    let mut finishing = false;
    let mut inbox_open = true;
    let mut delivered = 0;

    loop {
        if finishing && driver.is_idle() {
            break;
        }

        let command = match (next_tick, inbox_open) {
            (Some(deadline), true) => match inbox.recv_deadline(deadline) {
                Ok(command) => Some(command),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => {
                    inbox_open = false;
                    Some(Command::Finish)
                }
            },
            (Some(deadline), false) => {
                let now = Instant::now();
                if deadline > now {
                    thread::sleep(deadline - now);
                }
                None
            }
            (None, true) => match inbox.recv() {
                Ok(command) => Some(command),
                Err(_) => {
                    inbox_open = false;
                    Some(Command::Finish)
                }
            },
            (None, false) => break,
        };

        match command {
            Some(Command::Render(request)) => match driver.request(request) {
                Ok(session) => {
                    debug!("session {} scheduled", session);
                    next_tick = Some(Instant::now() + interval);
                }
                Err(err) => error!("render request refused: {}", err),
            },
            Some(Command::Finish) => {
                finishing = true;
            }
            None => {
                let frame = match driver.tick() {
                    Ok(frame) => frame,
                    Err(err) => {
                        error!("frame failed: {}", err);
                        return Err(err);
                    }
                };
                if let Some(frame) = frame {
                    if let Err(err) = sink.frame(&frame) {
                        error!("could not deliver frame {}: {}", frame.index, err);
                        return Err(err);
                    }
                    delivered += 1;
                }
                next_tick = match next_tick {
                    Some(deadline) if !driver.is_idle() => {
                        let now = Instant::now();
                        let mut next = deadline + interval;
                        while next <= now {
                            next += interval;
                        }
                        Some(next)
                    }
                    _ => None,
                };
            }
        }
    }

    Ok(delivered)
}
