//! Fixed-iteration k-means over RGB samples.
//!
//! Initialization is deterministic and there is no convergence check, so the
//! cost is bounded by `samples * k * iterations` and identical input always
//! produces identical output.

use crate::{
    color::{clamp_channel, hsl_components, Rgb},
    sampler::ColorSample,
    LyricCanvasError, Result,
};

/// Running mean of one cluster. Channels stay fractional until the final
/// color is read out with [`Centroid::to_rgb`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Centroid {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Centroid {
    fn distance_squared(&self, sample: &ColorSample) -> f32 {
        let dr = self.r - sample.r as f32;
        let dg = self.g - sample.g as f32;
        let db = self.b - sample.b as f32;
        dr * dr + dg * dg + db * db
    }

    /// HSL saturation in `[0, 1]`.
    pub fn saturation(&self) -> f32 {
        hsl_components(self.r, self.g, self.b).1
    }

    pub fn to_rgb(&self) -> Rgb {
        Rgb::new(
            clamp_channel(self.r),
            clamp_channel(self.g),
            clamp_channel(self.b),
        )
    }
}

impl From<ColorSample> for Centroid {
    fn from(sample: ColorSample) -> Self {
        Self {
            r: sample.r as f32,
            g: sample.g as f32,
            b: sample.b as f32,
        }
    }
}

impl From<Rgb> for Centroid {
    fn from(color: Rgb) -> Self {
        Self {
            r: color.r as f32,
            g: color.g as f32,
            b: color.b as f32,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    r: f64,
    g: f64,
    b: f64,
    count: usize,
}

impl Accumulator {
    fn add(&mut self, sample: &ColorSample) {
        self.r += sample.r as f64;
        self.g += sample.g as f64;
        self.b += sample.b as f64;
        self.count += 1;
    }

    fn mean(&self) -> Option<Centroid> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        Some(Centroid {
            r: (self.r / n) as f32,
            g: (self.g / n) as f32,
            b: (self.b / n) as f32,
        })
    }
}

/// Runs k-means and returns the final centroids in initialization order.
/// Returns an empty vector when there are no samples.
pub fn k_means(samples: &[ColorSample], k: usize, iterations: usize) -> Result<Vec<Centroid>> {
    if k == 0 {
        return Err(LyricCanvasError::InvalidInput("cluster count must be at least 1"));
    }
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    let n = samples.len();
    let mut centroids: Vec<Centroid> = (0..k)
        .map(|i| Centroid::from(samples[i * n / k]))
        .collect();

    for _ in 0..iterations {
        let mut sums = vec![Accumulator::default(); k];
        for sample in samples {
            sums[nearest(&centroids, sample)].add(sample);
        }
        for (centroid, sum) in centroids.iter_mut().zip(&sums) {
            // Empty clusters keep their previous position.
            if let Some(mean) = sum.mean() {
                *centroid = mean;
            }
        }
    }

    Ok(centroids)
}

/// Picks the most saturated color among the k-means centroids, falling back to
/// `fallback` when there are no samples. Ties go to the earliest centroid.
pub fn dominant_color(
    samples: &[ColorSample],
    k: usize,
    iterations: usize,
    fallback: Rgb,
) -> Result<Rgb> {
    let centroids = k_means(samples, k, iterations)?;
    let Some(best) = most_saturated(&centroids) else {
        tracing::debug!(%fallback, "no samples to cluster; using fallback color");
        return Ok(fallback);
    };

    let color = best.to_rgb();
    tracing::debug!(
        samples = samples.len(),
        k,
        iterations,
        %color,
        "selected dominant color"
    );
    Ok(color)
}

fn most_saturated(centroids: &[Centroid]) -> Option<&Centroid> {
    let mut best: Option<(&Centroid, f32)> = None;
    for centroid in centroids {
        let saturation = centroid.saturation();
        match best {
            Some((_, top)) if saturation <= top => {}
            _ => best = Some((centroid, saturation)),
        }
    }
    best.map(|(centroid, _)| centroid)
}

fn nearest(centroids: &[Centroid], sample: &ColorSample) -> usize {
    let mut best_index = 0;
    let mut best_distance = f32::INFINITY;
    for (index, centroid) in centroids.iter().enumerate() {
        let distance = centroid.distance_squared(sample);
        if distance < best_distance {
            best_distance = distance;
            best_index = index;
        }
    }
    best_index
}
