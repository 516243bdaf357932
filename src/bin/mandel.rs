// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use clap::{App, Arg, ArgMatches};
use failure::Error;
use log::info;
use mandelbrot::color::argb_to_rgba_bytes;
use mandelbrot::{default_palette, RenderConfig, Renderer, Viewport};
use num::Complex;
use std::str::FromStr;

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

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const CENTER: &str = "center";
const WIDTH: &str = "width";
const MAGNIFICATION: &str = "magnification";
const THREADS: &str = "threads";
const ITERATIONS: &str = "iterations";
const BAILOUT: &str = "bailout";
const ANTIALIAS: &str = "antialias";
const MULTIPLIER: &str = "multiplier";
const DISCOVERY: &str = "discovery";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("mandel")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Mandelbrot renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output PNG file"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x600")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(CENTER)
                .long(CENTER)
                .short("c")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-0.5,0.0")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse center point"))
                .help("Center of the image on the complex plane"),
        )
        .arg(
            Arg::with_name(WIDTH)
                .long(WIDTH)
                .short("w")
                .takes_value(true)
                .default_value("4.0")
                .validator(|s| {
                    validate_range(&s, 1e-15, 1e3, "Could not parse plane width", "Width out of range")
                })
                .help("Width of the complex plane shown"),
        )
        .arg(
            Arg::with_name(MAGNIFICATION)
                .long(MAGNIFICATION)
                .short("m")
                .takes_value(true)
                .validator(|s| {
                    validate_range(&s, 1e-3, 1e15, "Could not parse magnification", "Out of range")
                })
                .help("Magnification, where 1 shows a plane four units wide; overrides --width"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value("1")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to render with"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("2000")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        10_000_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 10000000",
                    )
                })
                .help("Iterations before a point is assumed to be in the set"),
        )
        .arg(
            Arg::with_name(BAILOUT)
                .long(BAILOUT)
                .short("b")
                .takes_value(true)
                .default_value("10.0")
                .validator(|s| {
                    validate_range(&s, 4.0, 1e12, "Could not parse bailout", "Bailout too small")
                })
                .help("Squared magnitude at which an orbit has escaped"),
        )
        .arg(
            Arg::with_name(ANTIALIAS)
                .long(ANTIALIAS)
                .short("a")
                .takes_value(true)
                .default_value("3")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        16,
                        "Could not parse anti-aliasing factor",
                        "Anti-aliasing factor must be between 1 and 16",
                    )
                })
                .help("Samples per axis per pixel"),
        )
        .arg(
            Arg::with_name(MULTIPLIER)
                .long(MULTIPLIER)
                .short("x")
                .takes_value(true)
                .default_value("5000.0")
                .validator(|s| {
                    validate_range(&s, 0.0, 1e9, "Could not parse multiplier", "Multiplier out of range")
                })
                .help("How fast escaped points cycle through the gradient"),
        )
        .arg(
            Arg::with_name(DISCOVERY)
                .long(DISCOVERY)
                .short("d")
                .help("Color interior points by how they were found"),
        )
        .get_matches()
}

fn value<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<T, Error> {
    matches
        .value_of(name)
        .and_then(|s| T::from_str(s).ok())
        .ok_or_else(|| failure::format_err!("could not parse --{}", name))
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let (width, height) = matches
        .value_of(SIZE)
        .and_then(|s| parse_pair::<u16>(s, 'x'))
        .ok_or_else(|| failure::format_err!("could not parse --{}", SIZE))?;
    let center = matches
        .value_of(CENTER)
        .and_then(parse_complex)
        .ok_or_else(|| failure::format_err!("could not parse --{}", CENTER))?;

    let viewport = if matches.is_present(MAGNIFICATION) {
        Viewport::Magnification {
            center,
            magnification: value(matches, MAGNIFICATION)?,
        }
    } else {
        Viewport::CenterWidth {
            center,
            plane_width: value(matches, WIDTH)?,
        }
    };

    let config = RenderConfig {
        width: width as usize,
        height: height as usize,
        max_iteration: value(matches, ITERATIONS)?,
        bailout: value(matches, BAILOUT)?,
        aa_factor: value(matches, ANTIALIAS)?,
        multiplier: value(matches, MULTIPLIER)?,
        show_discovery: matches.is_present(DISCOVERY),
    };
    let threads: usize = value(matches, THREADS)?;

    let gradient = default_palette();
    let renderer = Renderer::new(&config, &viewport, &gradient)?;
    let pixels = renderer.render_threaded(threads)?;

    let output = matches
        .value_of(OUTPUT)
        .ok_or_else(|| failure::format_err!("no output file"))?;
    image::save_buffer(
        output,
        &argb_to_rgba_bytes(&pixels),
        config.width as u32,
        config.height as u32,
        image::ColorType::RGBA(8),
    )?;
    info!("wrote {}", output);
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
