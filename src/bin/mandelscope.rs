// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use clap::{App, Arg, ArgMatches};
use failure::Error;
use log::info;
use num::Complex;
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use std::time::Duration;

use mandelscope::navigate::{self, Direction, LARGE_STEP, SMALL_STEP};
use mandelscope::{
    Animator, ComplexPlane, FrameRenderer, IntegralPlane, Orientation, Palette, PngSink,
    RenderParams, View,
};

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const MAX_ZOOM: f64 = 1e15;
const MAX_ITERATIONS: f64 = 1_000_000.0;
const ZOOM_RANGE_ERR: &str = "Zoom must be greater than 0 and at most 1e15";
const ITERATIONS_RANGE_ERR: &str = "Iteration count must be between 1 and 1000000";

fn check_zoom(zoom: f64) -> Result<f64, Error> {
    if zoom > 0.0 && zoom <= MAX_ZOOM {
        Ok(zoom)
    } else {
        Err(failure::err_msg(ZOOM_RANGE_ERR))
    }
}

fn check_iterations(iterations: f64) -> Result<f64, Error> {
    if iterations >= 1.0 && iterations <= MAX_ITERATIONS {
        Ok(iterations)
    } else {
        Err(failure::err_msg(ITERATIONS_RANGE_ERR))
    }
}

const OUTPUT: &str = "output";
const PREFIX: &str = "prefix";
const SIZE: &str = "size";
const DOWNSCALE: &str = "downscale";
const ORIGIN: &str = "origin";
const ZOOM: &str = "zoom";
const ITERATIONS: &str = "iterations";
const SPEED: &str = "speed";
const INTERVAL: &str = "interval";
const THREADS: &str = "threads";
const PALETTE: &str = "palette";
const ORIENTATION: &str = "orientation";
const LEFTLOWER: &str = "leftlower";
const RIGHTUPPER: &str = "rightupper";
const DRY_RUN: &str = "dry-run";
const INTERACTIVE: &str = "interactive";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("mandelscope")
        .version("0.1.0")
        .about("Progressive Mandelbrot renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required_unless(DRY_RUN)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Directory to write frames into"),
        )
        .arg(
            Arg::with_name(PREFIX)
                .long(PREFIX)
                .takes_value(true)
                .default_value("mandel")
                .help("File name prefix for frames"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("600x400")
                .validator(|s| {
                    validate_pair::<u16>(
                        &s,
                        'x',
                        "Canvas size must be WIDTHxHEIGHT, each at most 65535",
                    )
                })
                .help("Space available for the canvas; the canvas is fitted to 3:2"),
        )
        .arg(
            Arg::with_name(DOWNSCALE)
                .long(DOWNSCALE)
                .takes_value(true)
                .default_value("1")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        64,
                        "Could not parse downscale factor",
                        "Downscale factor must be between 1 and 64",
                    )
                })
                .help("Divide the canvas size by this factor"),
        )
        .arg(
            Arg::with_name(ORIGIN)
                .long(ORIGIN)
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-0.75,0")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse origin"))
                .help("Centre of the view on the complex plane"),
        )
        .arg(
            Arg::with_name(ZOOM)
                .long(ZOOM)
                .short("z")
                .takes_value(true)
                .default_value("1")
                .validator(|s| {
                    validate_range(
                        &s,
                        std::f64::MIN_POSITIVE,
                        MAX_ZOOM,
                        "Could not parse zoom",
                        ZOOM_RANGE_ERR,
                    )
                })
                .help("Magnification; 1 shows the whole set"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("100")
                .validator(|s| {
                    validate_range(
                        &s,
                        1.0,
                        MAX_ITERATIONS,
                        "Could not parse iteration count",
                        ITERATIONS_RANGE_ERR,
                    )
                })
                .help("Iteration cap of the final frame"),
        )
        .arg(
            Arg::with_name(SPEED)
                .long(SPEED)
                .takes_value(true)
                .default_value("2")
                .validator(|s| match f64::from_str(&s) {
                    Ok(speed) if speed.is_finite() && speed > 1.0 => Ok(()),
                    Ok(_) => Err("Render speed must be greater than 1".to_string()),
                    Err(_) => Err("Could not parse render speed".to_string()),
                })
                .help("Divisor between successive iteration caps"),
        )
        .arg(
            Arg::with_name(INTERVAL)
                .long(INTERVAL)
                .takes_value(true)
                .default_value("1000")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        60_000,
                        "Could not parse interval",
                        "Interval must be between 1 and 60000 milliseconds",
                    )
                })
                .help("Milliseconds between frames"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use per frame (default: one per CPU)"),
        )
        .arg(
            Arg::with_name(PALETTE)
                .long(PALETTE)
                .takes_value(true)
                .possible_values(&["spectrum", "ember"])
                .default_value("spectrum")
                .help("Colour mapping"),
        )
        .arg(
            Arg::with_name(ORIENTATION)
                .long(ORIENTATION)
                .takes_value(true)
                .possible_values(&["up", "down"])
                .default_value("up")
                .help("Whether increasing imaginary values point up or down"),
        )
        .arg(
            Arg::with_name(LEFTLOWER)
                .long(LEFTLOWER)
                .short("l")
                .takes_value(true)
                .allow_hyphen_values(true)
                .requires(RIGHTUPPER)
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse left lower corner"))
                .help("Left lower corner; overrides origin and zoom"),
        )
        .arg(
            Arg::with_name(RIGHTUPPER)
                .long(RIGHTUPPER)
                .short("r")
                .takes_value(true)
                .allow_hyphen_values(true)
                .requires(LEFTLOWER)
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse right upper corner"))
                .help("Right upper corner; overrides origin and zoom"),
        )
        .arg(
            Arg::with_name(DRY_RUN)
                .long(DRY_RUN)
                .conflicts_with(INTERACTIVE)
                .help("Print the viewport and schedule without rendering"),
        )
        .arg(
            Arg::with_name(INTERACTIVE)
                .long(INTERACTIVE)
                .help("Read navigation and render commands from standard input"),
        )
        .get_matches()
}

/// The settings the command line controls, mutable between requests
/// in interactive mode.  Every render takes a fresh `RenderParams`
/// snapshot of them.
struct Settings {
    view: View,
    bounds: Option<ComplexPlane>,
    canvas: IntegralPlane,
    iterations: f64,
    speed: f64,
    palette: Palette,
    orientation: Orientation,
}

impl Settings {
    fn from_matches(matches: &ArgMatches) -> Result<Self, Error> {
        let size: (usize, usize) = parse_pair(value(matches, SIZE)?, 'x')
            .ok_or_else(|| failure::err_msg("Error parsing canvas size"))?;
        let downscale = usize::from_str(value(matches, DOWNSCALE)?)?;
        let origin = parse_complex(value(matches, ORIGIN)?)
            .ok_or_else(|| failure::err_msg("Error parsing origin"))?;
        let zoom = f64::from_str(value(matches, ZOOM)?)?;
        let bounds = match (matches.value_of(LEFTLOWER), matches.value_of(RIGHTUPPER)) {
            (Some(ll), Some(ru)) => {
                let leftlower = parse_complex(ll)
                    .ok_or_else(|| failure::err_msg("Error parsing left lower point"))?;
                let rightupper = parse_complex(ru)
                    .ok_or_else(|| failure::err_msg("Error parsing right upper point"))?;
                Some(ComplexPlane(leftlower, rightupper))
            }
            _ => None,
        };
        let palette = Palette::named(value(matches, PALETTE)?)
            .ok_or_else(|| failure::err_msg("Unknown palette"))?;
        let orientation = match value(matches, ORIENTATION)? {
            "down" => Orientation::ImaginaryDown,
            _ => Orientation::ImaginaryUp,
        };

        Ok(Settings {
            view: View::new(origin, zoom)?,
            bounds,
            canvas: IntegralPlane::fit(size.0, size.1, downscale)?,
            iterations: f64::from_str(value(matches, ITERATIONS)?)?,
            speed: f64::from_str(value(matches, SPEED)?)?,
            palette,
            orientation,
        })
    }

    fn params(&self) -> Result<RenderParams, Error> {
        let params = RenderParams::new(self.view, self.canvas, self.iterations, self.speed)?
            .with_palette(self.palette)
            .with_orientation(self.orientation);
        Ok(match self.bounds {
            Some(bounds) => params.with_bounds(bounds)?,
            None => params,
        })
    }
}

fn value<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str, Error> {
    matches
        .value_of(name)
        .ok_or_else(|| failure::format_err!("Missing value for --{}", name))
}

fn describe(params: &RenderParams) -> Result<String, Error> {
    let viewport = params.viewport();
    Ok(format!(
        "canvas {}x{}\nreal [{}, {}]\nimaginary [{}, {}]\nschedule {}",
        params.canvas().0,
        params.canvas().1,
        viewport.0.re,
        viewport.1.re,
        viewport.0.im,
        viewport.1.im,
        params.schedule()?
    ))
}

/// One line of interactive input.  Returns false when the user asked
/// to quit.
fn interpret(
    line: &str,
    settings: &mut Settings,
    animator: &mut Animator,
    out: &mut dyn Write,
) -> Result<bool, Error> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        [] => {}
        ["quit"] | ["exit"] => return Ok(false),
        ["render"] => {
            let params = settings.params()?;
            animator.request(params)?;
            writeln!(out, "rendering")?;
        }
        ["cancel"] => {
            animator.cancel();
            writeln!(out, "cancelled")?;
        }
        ["show"] => {
            let params = settings.params()?;
            writeln!(out, "{}", navigate::describe(&settings.view))?;
            writeln!(out, "{}", describe(&params)?)?;
        }
        [direction] | [direction, _] if Direction::from_str(direction).is_ok() => {
            let direction = Direction::from_str(direction).map_err(failure::err_msg)?;
            let step = match words.get(1) {
                None | Some(&"10") => SMALL_STEP,
                Some(&"25") => LARGE_STEP,
                Some(other) => {
                    return Err(failure::format_err!("Unknown step '{}', use 10 or 25", other))
                }
            };
            settings.view = navigate::pan(&settings.view, direction, step)?;
            settings.bounds = None;
            writeln!(out, "{}", navigate::describe(&settings.view))?;
        }
        ["in"] | ["out"] | ["in", _] | ["out", _] => {
            let factor = match words.get(1) {
                None | Some(&"2") => 2.0,
                Some(&"5") => 5.0,
                Some(other) => {
                    return Err(failure::format_err!("Unknown zoom step '{}', use 2 or 5", other))
                }
            };
            let factor = if words[0] == "in" { factor } else { 1.0 / factor };
            let view = navigate::zoom_by(&settings.view, factor)?;
            check_zoom(view.zoom())?;
            settings.view = view;
            settings.bounds = None;
            writeln!(out, "{}", navigate::describe(&settings.view))?;
        }
        ["origin", origin] => {
            let origin = parse_complex(origin)
                .ok_or_else(|| failure::err_msg("Could not parse origin"))?;
            settings.view = View::new(origin, settings.view.zoom())?;
            settings.bounds = None;
            writeln!(out, "{}", navigate::describe(&settings.view))?;
        }
        ["zoom", zoom] => {
            let zoom = check_zoom(f64::from_str(zoom)?)?;
            settings.view = View::new(settings.view.origin(), zoom)?;
            settings.bounds = None;
            writeln!(out, "{}", navigate::describe(&settings.view))?;
        }
        ["iterations", iterations] => {
            let iterations = check_iterations(f64::from_str(iterations)?)?;
            let schedule = mandelscope::IterationSchedule::build(iterations, settings.speed)?;
            settings.iterations = iterations;
            writeln!(out, "schedule {}", schedule)?;
        }
        ["speed", speed] => {
            let speed = f64::from_str(speed)?;
            let schedule = mandelscope::IterationSchedule::build(settings.iterations, speed)?;
            settings.speed = speed;
            writeln!(out, "schedule {}", schedule)?;
        }
        _ => return Err(failure::format_err!("Unknown command '{}'", line.trim())),
    }
    Ok(true)
}

fn interactive(settings: &mut Settings, animator: &mut Animator) -> Result<(), Error> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in stdin.lock().lines() {
        match interpret(&line?, settings, animator, &mut out) {
            Ok(true) => {}
            Ok(false) => {
                animator.cancel();
                break;
            }
            Err(e) => writeln!(out, "error: {}", e)?,
        }
        out.flush()?;
    }
    Ok(())
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let mut settings = Settings::from_matches(matches)?;

    if matches.is_present(DRY_RUN) {
        println!("{}", describe(&settings.params()?)?);
        return Ok(());
    }

    let threads = match matches.value_of(THREADS) {
        Some(threads) => usize::from_str(threads)?,
        None => num_cpus::get(),
    };
    let interval = Duration::from_millis(u64::from_str(value(matches, INTERVAL)?)?);
    let sink = PngSink::new(value(matches, OUTPUT)?, value(matches, PREFIX)?)?;
    let mut animator = Animator::spawn(FrameRenderer::new(threads), interval, sink)?;

    if matches.is_present(INTERACTIVE) {
        interactive(&mut settings, &mut animator)?;
    } else {
        let params = settings.params()?;
        info!("{}", describe(&params)?);
        animator.request(params)?;
    }

    let frames = animator.finish()?;
    println!("wrote {} frames", frames);
    Ok(())
}

fn main() {
    env_logger::init();
    let matches = args();

    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
