use std::path::Path;

use image::{Rgb, RgbImage};

use crate::error::Result;
use crate::pulse::PulseTrain;

pub const CHART_WIDTH: u32 = 800;
pub const CHART_HEIGHT: u32 = 400;
const MARGIN: i32 = 20;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([180, 180, 180]);
const TRACE: Rgb<u8> = Rgb([30, 90, 200]);

/// Renders the waveform as a connected polyline on a white background.
pub fn render(train: &PulseTrain) -> RgbImage {
    let mut img = RgbImage::from_pixel(CHART_WIDTH, CHART_HEIGHT, BACKGROUND);
    draw_axes(&mut img);
    if train.is_empty() {
        return img;
    }

    let (low, high) = value_range(&train.samples);
    let points: Vec<(i32, i32)> = train
        .samples
        .iter()
        .enumerate()
        .map(|(i, s)| (x_for(i, train.len()), y_for(*s, low, high)))
        .collect();

    for pair in points.windows(2) {
        draw_line(&mut img, pair[0], pair[1]);
    }
    img
}

/// Renders `train` and writes it to `path` as a PNG.
pub fn save_chart<P: AsRef<Path>>(path: P, train: &PulseTrain) -> Result<()> {
    render(train).save(path)?;
    Ok(())
}

/// Value bounds for the y axis, padded when the signal is flat so the
/// trace sits mid-chart instead of dividing by zero.
fn value_range(samples: &[f32]) -> (f32, f32) {
    let low = samples.iter().fold(f32::INFINITY, |acc, s| acc.min(*s));
    let high = samples.iter().fold(f32::NEG_INFINITY, |acc, s| acc.max(*s));
    if low == high {
        (low - 1., high + 1.)
    } else {
        (low, high)
    }
}

fn x_for(index: usize, len: usize) -> i32 {
    let plot_width = CHART_WIDTH as i32 - 2 * MARGIN;
    if len < 2 {
        return MARGIN;
    }
    MARGIN + (index as i64 * plot_width as i64 / (len as i64 - 1)) as i32
}

fn y_for(value: f32, low: f32, high: f32) -> i32 {
    let plot_height = (CHART_HEIGHT as i32 - 2 * MARGIN) as f32;
    let ratio = (value - low) / (high - low);
    MARGIN + ((1. - ratio) * plot_height) as i32
}

fn draw_axes(img: &mut RgbImage) {
    let bottom = CHART_HEIGHT as i32 - MARGIN;
    for x in MARGIN..=(CHART_WIDTH as i32 - MARGIN) {
        put_pixel(img, x, bottom, AXIS);
    }
    for y in MARGIN..=bottom {
        put_pixel(img, MARGIN, y, AXIS);
    }
}

fn draw_line(img: &mut RgbImage, from: (i32, i32), to: (i32, i32)) {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let steps = dx.abs().max(dy.abs()).max(1);
    for step in 0..=steps {
        let x = from.0 + dx * step / steps;
        let y = from.1 + dy * step / steps;
        put_pixel(img, x, y, TRACE);
    }
}

fn put_pixel(img: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}
