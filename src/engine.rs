use crate::field::{self, FrameTuning};
use crate::levels::BandLevels;
use crate::palette;
use crate::params::ParameterState;

/// Everything one frame needs, snapshotted before evaluation starts.
/// The evaluation stage reads this immutably; nothing per-pixel ever
/// writes back into the parameters or levels.
#[derive(Clone, Copy, Debug)]
pub struct RenderCtx {
    pub t: f32,
    pub w: usize,
    pub h: usize,
    pub params: ParameterState,
    pub levels: BandLevels,
    /// Block size for adaptive downscale; 1 = full resolution.
    pub scale: usize,
}

/// Owns the RGBA framebuffer and runs the field + palette pipeline over it.
pub struct MotifEngine {
    w: usize,
    h: usize,
    buf: Vec<u8>,
}

impl MotifEngine {
    pub fn new() -> Self {
        Self {
            w: 0,
            h: 0,
            buf: Vec::new(),
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        let n = w.saturating_mul(h).saturating_mul(4);
        self.buf.resize(n, 0);
        self.buf.fill(0);
    }

    pub fn size(&self) -> (usize, usize) {
        (self.w, self.h)
    }

    /// Evaluate one full frame and return the pixel buffer.
    ///
    /// Fills scale x scale blocks so a lowered quality needs no second
    /// buffer. Every sample is an independent pure function of the ctx,
    /// so the fill order is irrelevant to the output.
    pub fn render(&mut self, ctx: &RenderCtx) -> &[u8] {
        let w = ctx.w.max(1);
        let h = ctx.h.max(1);
        if w != self.w || h != self.h {
            self.resize(w, h);
        }
        let scale = ctx.scale.max(1);

        let params = ctx.params;
        let tune = FrameTuning::new(&params, &ctx.levels, ctx.t);
        let res = (w as f32, h as f32);

        for by in (0..h).step_by(scale) {
            for bx in (0..w).step_by(scale) {
                let uv = (bx as f32 / w as f32, by as f32 / h as f32);
                let sample = field::evaluate(uv, res, &params, &tune);
                let grain = field::hash(bx as f32 + tune.t_eff, by as f32 + tune.t_eff);
                let [r, g, b] =
                    palette::shade(&sample, tune.t_eff, params.palette, ctx.levels.high, grain);

                for dy in 0..scale {
                    for dx in 0..scale {
                        let x = bx + dx;
                        let y = by + dy;
                        if x >= w || y >= h {
                            continue;
                        }
                        let i = (y * w + x) * 4;
                        self.buf[i] = r;
                        self.buf[i + 1] = g;
                        self.buf[i + 2] = b;
                        self.buf[i + 3] = 255;
                    }
                }
            }
        }

        &self.buf
    }
}

impl Default for MotifEngine {
    fn default() -> Self {
        Self::new()
    }
}
