//! Anisotropic Gaussian smoothing with clamp-to-edge borders.
//!
//! The kernel is separable: one pass along x with `sigma_x`, one along y
//! with `sigma_y`. Each 1-D kernel has radius `floor(truncate * sigma + 0.5)`
//! and is normalized to sum to one. Indices past the border read the
//! nearest edge value, so a constant field is a fixed point.

use log::trace;
use scentwalk_core::FieldError;
use scentwalk_space::Grid;

use crate::field::Field;

/// Linear sigma model: `sigma = m * extent + b` per axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmoothingConfig {
    /// Slope per grid cell of extent.
    pub m: f64,
    /// Intercept.
    pub b: f64,
    /// Kernel radius in multiples of sigma.
    pub truncate: f64,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            m: 0.035,
            b: -0.1,
            truncate: 4.0,
        }
    }
}

impl SmoothingConfig {
    /// Check that every coefficient is usable.
    pub fn validate(&self) -> Result<(), String> {
        if !self.m.is_finite() || !self.b.is_finite() {
            return Err(format!(
                "sigma coefficients must be finite, got m={} b={}",
                self.m, self.b
            ));
        }
        if !self.truncate.is_finite() || self.truncate <= 0.0 {
            return Err(format!(
                "truncate must be finite and > 0, got {}",
                self.truncate
            ));
        }
        Ok(())
    }

    /// Sigma for an axis spanning `extent` cells.
    pub fn sigma_for(&self, extent: u32) -> f64 {
        self.m * f64::from(extent) + self.b
    }

    /// A smoother sized for `grid`: `sigma_x` from its columns, `sigma_y`
    /// from its rows.
    pub fn smoother_for(&self, grid: &Grid) -> Result<GaussianSmoother, FieldError> {
        GaussianSmoother::new(self.sigma_for(grid.cols()), self.sigma_for(grid.rows()))
            .map(|s| s.with_truncate(self.truncate))
    }
}

/// Separable Gaussian filter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaussianSmoother {
    sigma_x: f64,
    sigma_y: f64,
    truncate: f64,
}

impl GaussianSmoother {
    /// A smoother with per-axis widths. Non-positive widths leave that axis
    /// untouched.
    ///
    /// # Errors
    ///
    /// [`FieldError::InvalidSigma`] if either width is NaN or infinite.
    pub fn new(sigma_x: f64, sigma_y: f64) -> Result<Self, FieldError> {
        for value in [sigma_x, sigma_y] {
            if !value.is_finite() {
                return Err(FieldError::InvalidSigma { value });
            }
        }
        Ok(Self {
            sigma_x,
            sigma_y,
            truncate: 4.0,
        })
    }

    /// The no-op smoother.
    pub fn identity() -> Self {
        Self {
            sigma_x: 0.0,
            sigma_y: 0.0,
            truncate: 4.0,
        }
    }

    /// Override the kernel truncation (default 4 sigma).
    pub fn with_truncate(mut self, truncate: f64) -> Self {
        self.truncate = truncate;
        self
    }

    /// `(sigma_x, sigma_y)`.
    pub fn sigma(&self) -> (f64, f64) {
        (self.sigma_x, self.sigma_y)
    }

    /// Smooth `field`, which must match `grid`'s dimensions.
    pub fn smooth(&self, grid: &Grid, field: &Field) -> Result<Field, FieldError> {
        field.check_dims(grid)?;
        let (cols, rows) = (field.cols() as usize, field.rows() as usize);
        let mut out = field.clone();
        let kx = gaussian_kernel(self.sigma_x, self.truncate, cols.saturating_sub(1));
        let ky = gaussian_kernel(self.sigma_y, self.truncate, rows.saturating_sub(1));
        trace!(
            "[Smooth] {cols}x{rows} sigma=({:.3}, {:.3}) radius=({}, {})",
            self.sigma_x,
            self.sigma_y,
            kx.len() / 2,
            ky.len() / 2
        );

        let mut scratch = vec![0.0; cols.max(rows)];
        if kx.len() > 1 {
            let values = out.values_mut();
            for y in 0..rows {
                let row = &mut values[y * cols..(y + 1) * cols];
                convolve_line(row, &kx, &mut scratch[..cols]);
            }
        }
        if ky.len() > 1 {
            let values = out.values_mut();
            let mut column = vec![0.0; rows];
            for x in 0..cols {
                for y in 0..rows {
                    column[y] = values[y * cols + x];
                }
                convolve_line(&mut column, &ky, &mut scratch[..rows]);
                for y in 0..rows {
                    values[y * cols + x] = column[y];
                }
            }
        }
        Ok(out)
    }
}

/// Normalized 1-D Gaussian weights of length `2r + 1`, where
/// `r = floor(truncate * sigma + 0.5)` capped at `max_radius`. Returns
/// `[1.0]` for `sigma <= 0` or a reach that is negative or NaN.
///
/// [`GaussianSmoother::smooth`] caps the radius at one less than the line
/// length.
pub fn gaussian_kernel(sigma: f64, truncate: f64, max_radius: usize) -> Vec<f64> {
    if sigma <= 0.0 {
        return vec![1.0];
    }
    let reach = (truncate * sigma + 0.5).floor();
    if reach.is_nan() || reach < 0.0 {
        return vec![1.0];
    }
    let radius = reach.min(max_radius as f64) as i64;
    let denom = 2.0 * sigma * sigma;
    let mut kernel: Vec<f64> = (-radius..=radius)
        .map(|k| (-((k * k) as f64) / denom).exp())
        .collect();
    let sum: f64 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= sum;
    }
    kernel
}

fn convolve_line(line: &mut [f64], kernel: &[f64], scratch: &mut [f64]) {
    let n = line.len() as i64;
    let r = (kernel.len() / 2) as i64;
    for (i, out) in scratch.iter_mut().enumerate() {
        let mut acc = 0.0;
        for (k, w) in kernel.iter().enumerate() {
            let j = (i as i64 + k as i64 - r).clamp(0, n - 1);
            acc += w * line[j as usize];
        }
        *out = acc;
    }
    line.copy_from_slice(scratch);
}
