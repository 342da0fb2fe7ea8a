//! Modified median cut quantization (MMCQ).
//!
//! Colors are reduced to [SIGBITS] bits per channel and counted in a histogram.
//! The color space is then recursively split into boxes along their longest
//! axis until the requested number of boxes exists. Each box contributes
//! its population weighted mean color.

use crate::artwork::color::Rgb;

const SIGBITS: u32 = 5;
const RSHIFT: u32 = 8 - SIGBITS;
const HISTO_SIZE: usize = 1 << (3 * SIGBITS);
const MAX_ITERATIONS: usize = 1000;
const FRACT_BY_POPULATION: f64 = 0.75;

fn histo_index(r: usize, g: usize, b: usize) -> usize {
    (r << (2 * SIGBITS)) + (g << SIGBITS) + b
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    Red,
    Green,
    Blue,
}

/// An axis aligned box in the reduced color space. Bounds are inclusive.
#[derive(Clone, Debug)]
struct ColorBox {
    r: (usize, usize),
    g: (usize, usize),
    b: (usize, usize),
    count: u64,
}

impl ColorBox {
    fn new(r: (usize, usize), g: (usize, usize), b: (usize, usize), histo: &[u64]) -> Self {
        let mut vbox = ColorBox { r, g, b, count: 0 };
        vbox.count = vbox.population(histo);
        vbox
    }

    fn bounds(&self, axis: Axis) -> (usize, usize) {
        match axis {
            Axis::Red => self.r,
            Axis::Green => self.g,
            Axis::Blue => self.b,
        }
    }

    fn with_bounds(&self, axis: Axis, bounds: (usize, usize), histo: &[u64]) -> Self {
        let (mut r, mut g, mut b) = (self.r, self.g, self.b);
        match axis {
            Axis::Red => r = bounds,
            Axis::Green => g = bounds,
            Axis::Blue => b = bounds,
        }
        ColorBox::new(r, g, b, histo)
    }

    fn volume(&self) -> u64 {
        let extent = |(lo, hi): (usize, usize)| (hi - lo + 1) as u64;
        extent(self.r) * extent(self.g) * extent(self.b)
    }

    fn buckets(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        (self.r.0..=self.r.1).flat_map(move |r| {
            (self.g.0..=self.g.1).flat_map(move |g| (self.b.0..=self.b.1).map(move |b| (r, g, b)))
        })
    }

    fn population(&self, histo: &[u64]) -> u64 {
        self.buckets().map(|(r, g, b)| histo[histo_index(r, g, b)]).sum()
    }

    /// Population weighted mean color, sampled at bucket centres.
    fn average(&self, histo: &[u64]) -> Rgb {
        let mult = (1 << RSHIFT) as f64;
        let mut total = 0u64;
        let (mut r_sum, mut g_sum, mut b_sum) = (0f64, 0f64, 0f64);
        for (r, g, b) in self.buckets() {
            let h = histo[histo_index(r, g, b)];
            if h == 0 {
                continue;
            }
            total += h;
            r_sum += h as f64 * (r as f64 + 0.5) * mult;
            g_sum += h as f64 * (g as f64 + 0.5) * mult;
            b_sum += h as f64 * (b as f64 + 0.5) * mult;
        }

        let to_u8 = |v: f64| v.clamp(0.0, 255.0) as u8;
        if total > 0 {
            let total = total as f64;
            Rgb::new(to_u8(r_sum / total), to_u8(g_sum / total), to_u8(b_sum / total))
        } else {
            let mid = |(lo, hi): (usize, usize)| to_u8(mult * (lo + hi + 1) as f64 / 2.0);
            Rgb::new(mid(self.r), mid(self.g), mid(self.b))
        }
    }

    /// Population of every slice along [axis], indexed relative to the box's lower bound.
    fn slice_populations(&self, axis: Axis, histo: &[u64]) -> Vec<u64> {
        let (lo, hi) = self.bounds(axis);
        (lo..=hi)
            .map(|i| self.with_bounds(axis, (i, i), histo).count)
            .collect()
    }

    /// Cuts the box along its longest axis near the population median.
    /// Falls back to shorter axes if all pixels sit in a single slice of the longer ones.
    /// Returns [None] if the box can't be split any further.
    fn split(&self, histo: &[u64]) -> Option<(ColorBox, ColorBox)> {
        if self.count < 2 {
            return None;
        }

        let extent = |axis: Axis| {
            let (lo, hi) = self.bounds(axis);
            hi - lo + 1
        };
        let mut axes = [Axis::Red, Axis::Green, Axis::Blue];
        // Stable sort, so red wins over green over blue on equal extents
        axes.sort_by_key(|axis| std::cmp::Reverse(extent(*axis)));
        axes.into_iter()
            .find_map(|axis| self.split_along(axis, histo))
    }

    fn split_along(&self, axis: Axis, histo: &[u64]) -> Option<(ColorBox, ColorBox)> {
        let (lo, hi) = self.bounds(axis);
        if lo == hi {
            return None;
        }

        let slices = self.slice_populations(axis, histo);
        let mut partial = Vec::with_capacity(slices.len());
        let mut total = 0u64;
        for s in &slices {
            total += s;
            partial.push(total);
        }

        let median = partial.iter().position(|&p| p * 2 > total)?;
        let left = median;
        let right = slices.len() - 1 - median;

        // Cut towards the emptier side, so both halves keep some room
        let mut cut = if left <= right {
            (slices.len() - 2).min(median + right / 2)
        } else {
            median.saturating_sub(1 + left / 2)
        };

        // Avoid empty boxes on either side
        while cut < slices.len() - 2 && partial[cut] == 0 {
            cut += 1;
        }
        while cut > 0 && partial[cut] == total && partial[cut - 1] > 0 {
            cut -= 1;
        }
        if partial[cut] == 0 || partial[cut] == total {
            return None;
        }

        let first = self.with_bounds(axis, (lo, lo + cut), histo);
        let second = self.with_bounds(axis, (lo + cut + 1, hi), histo);
        Some((first, second))
    }
}

/// Quantizes [pixels] into at most [max_colors] representative colors,
/// ordered by box population times box volume (largest first).
/// May return fewer colors if the pixels don't span enough distinct buckets.
pub(crate) fn quantize(pixels: &[[u8; 3]], max_colors: usize) -> Vec<Rgb> {
    if pixels.is_empty() || max_colors == 0 {
        return Vec::new();
    }

    let mut histo = vec![0u64; HISTO_SIZE];
    let mut min = [usize::MAX; 3];
    let mut max = [0usize; 3];
    for px in pixels {
        let reduced = px.map(|c| (c >> RSHIFT) as usize);
        histo[histo_index(reduced[0], reduced[1], reduced[2])] += 1;
        for ch in 0..3 {
            min[ch] = min[ch].min(reduced[ch]);
            max[ch] = max[ch].max(reduced[ch]);
        }
    }

    let initial = ColorBox::new((min[0], max[0]), (min[1], max[1]), (min[2], max[2]), &histo);
    let mut boxes = vec![initial];

    let population_target = ((FRACT_BY_POPULATION * max_colors as f64).ceil() as usize).max(1);
    let iterations = split_boxes(&mut boxes, &histo, population_target, |b| b.count);
    let iterations =
        iterations + split_boxes(&mut boxes, &histo, max_colors, |b| b.count * b.volume());
    log::debug!(
        "Quantized {} pixels into {} boxes after {} iterations",
        pixels.len(),
        boxes.len(),
        iterations
    );

    // Same key as the phase 2 priority
    boxes.sort_by(|a, b| {
        (b.count * b.volume())
            .cmp(&(a.count * a.volume()))
            .then_with(|| b.count.cmp(&a.count))
    });
    boxes.iter().map(|b| b.average(&histo)).collect()
}

/// Repeatedly splits the box with the highest [priority] until [target] boxes exist.
/// Returns the number of iterations used.
fn split_boxes(
    boxes: &mut Vec<ColorBox>,
    histo: &[u64],
    target: usize,
    priority: impl Fn(&ColorBox) -> u64,
) -> usize {
    // Boxes that can't be split any further are parked here
    let mut done = Vec::new();
    let mut iterations = 0;

    while boxes.len() + done.len() < target && iterations < MAX_ITERATIONS {
        iterations += 1;
        let Some(idx) = boxes
            .iter()
            .enumerate()
            .max_by_key(|(_, b)| priority(b))
            .map(|(i, _)| i)
        else {
            break;
        };
        let vbox = boxes.swap_remove(idx);
        match vbox.split(histo) {
            Some((first, second)) => {
                boxes.push(first);
                boxes.push(second);
            }
            None => done.push(vbox),
        }
    }

    boxes.append(&mut done);
    iterations
}
