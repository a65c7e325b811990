// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Where finished frames go.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::frame::Frame;

/// Receives every frame a session produces, in schedule order.
pub trait FrameSink {
    /// Called once per completed frame.
    fn frame(&mut self, frame: &Frame) -> Result<()>;
}

impl<F> FrameSink for F
where
    F: FnMut(&Frame) -> Result<()>,
{
    fn frame(&mut self, frame: &Frame) -> Result<()> {
        self(frame)
    }
}

/// Writes each frame to its own PNG file in a directory.
#[derive(Debug)]
pub struct PngSink {
    directory: PathBuf,
    prefix: String,
    written: Vec<PathBuf>,
}

impl PngSink {
    /// Creates the directory if it does not exist yet.
    pub fn new<P: AsRef<Path>>(directory: P, prefix: &str) -> Result<Self> {
        fs::create_dir_all(directory.as_ref())?;
        Ok(PngSink {
            directory: directory.as_ref().to_path_buf(),
            prefix: prefix.to_string(),
            written: vec![],
        })
    }

    /// The file a frame is written to.
    pub fn path_for(&self, frame: &Frame) -> PathBuf {
        self.directory.join(format!(
            "{}-s{:03}-f{:03}-i{}.png",
            self.prefix, frame.session, frame.index, frame.max_iterations
        ))
    }

    /// Every file written so far, oldest first.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl FrameSink for PngSink {
    fn frame(&mut self, frame: &Frame) -> Result<()> {
        let path = self.path_for(frame);
        frame.image.save(&path)?;
        self.written.push(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn frame(index: usize, max_iterations: usize) -> Frame {
        Frame {
            session: 2,
            index,
            frames: 3,
            max_iterations,
            image: RgbImage::new(6, 4),
        }
    }

    #[test]
    fn png_sink_writes_named_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = PngSink::new(dir.path().join("frames"), "mandel").unwrap();
        sink.frame(&frame(0, 12)).unwrap();
        sink.frame(&frame(1, 25)).unwrap();

        let expected = dir.path().join("frames").join("mandel-s002-f001-i25.png");
        assert_eq!(sink.written().len(), 2);
        assert_eq!(sink.written()[1], expected);
        let decoded = image::open(&expected).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (6, 4));
    }

    #[test]
    fn closures_are_sinks() {
        let mut seen = vec![];
        {
            let mut sink = |frame: &Frame| -> Result<()> {
                seen.push(frame.max_iterations);
                Ok(())
            };
            sink.frame(&frame(0, 6)).unwrap();
            sink.frame(&frame(1, 12)).unwrap();
        }
        assert_eq!(seen, vec![6, 12]);
    }
}
