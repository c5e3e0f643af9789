//! Texture sampling over [`UniformImage`].
//!
//! Texture coordinates are normalized: `u` grows to the right, `v` grows
//! upward, so `v = 0` addresses the visually bottom row even though the
//! buffer itself is stored top-left first.

use crate::uniform::UniformImage;

/// Texel lookup mode, passed explicitly into every sample call.
///
/// The renderer threads its filtering setting through this parameter; there
/// is no process-wide switch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextureFilter {
    /// Snap to the nearest texel.
    #[default]
    Nearest,
    /// Blend the four neighboring texels with fractional weights.
    Bilinear,
}

impl UniformImage {
    /// Sample the image at normalized texture coordinates.
    ///
    /// Both components are clamped to `[0, 1]` before use; out-of-range
    /// input is tolerated, not rejected. Returns the three channels in
    /// buffer order, promoted to `[0, 255]` floats (no normalization to
    /// `[0, 1]`). The image must be non-empty.
    pub fn sample(&self, texcoord: [f32; 2], filter: TextureFilter) -> [f32; 3] {
        let u = texcoord[0].clamp(0.0, 1.0);
        let v = texcoord[1].clamp(0.0, 1.0);
        match filter {
            TextureFilter::Nearest => self.sample_nearest(u, v),
            TextureFilter::Bilinear => self.sample_bilinear(u, v),
        }
    }

    /// Fetch one texel; `y_up` counts rows from the visually bottom edge.
    fn texel(&self, x: usize, y_up: usize) -> [f32; 3] {
        let row = self.height() - 1 - y_up;
        let pos = (row * self.width() + x) * 3;
        let px = &self.pixels()[pos..pos + 3];
        [f32::from(px[0]), f32::from(px[1]), f32::from(px[2])]
    }

    fn sample_nearest(&self, u: f32, v: f32) -> [f32; 3] {
        let x = ((u * self.width() as f32) as usize).min(self.width() - 1);
        let y = ((v * self.height() as f32) as usize).min(self.height() - 1);
        self.texel(x, y)
    }

    /// Texel-center bilinear blend: two horizontal lerps, then one vertical.
    /// All four neighbor indices clamp to the edge, so `u, v` near 1.0 never
    /// read outside the buffer.
    fn sample_bilinear(&self, u: f32, v: f32) -> [f32; 3] {
        let uf = u * self.width() as f32 - 0.5;
        let vf = v * self.height() as f32 - 0.5;
        let alpha_u = uf - uf.floor();
        let alpha_v = vf - vf.floor();
        let x0 = clamp_index(uf.floor(), self.width());
        let x1 = clamp_index(uf.floor() + 1.0, self.width());
        let y0 = clamp_index(vf.floor(), self.height());
        let y1 = clamp_index(vf.floor() + 1.0, self.height());

        let lower = lerp(self.texel(x0, y0), self.texel(x1, y0), alpha_u);
        let upper = lerp(self.texel(x0, y1), self.texel(x1, y1), alpha_u);
        lerp(lower, upper, alpha_v)
    }
}

fn clamp_index(i: f32, len: usize) -> usize {
    i.max(0.0).min((len - 1) as f32) as usize
}

fn lerp(a: [f32; 3], b: [f32; 3], alpha: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * alpha,
        a[1] + (b[1] - a[1]) * alpha,
        a[2] + (b[2] - a[2]) * alpha,
    ]
}
