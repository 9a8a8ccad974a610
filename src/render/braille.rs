use crate::render::{frame_begin, frame_end, write_bg_rgb, write_fg_rgb, Frame, Renderer};
use std::io::Write;

/// One cell = a 2x4 pixel patch rendered as a braille glyph, thresholded
/// per cell on luma with averaged fg/bg colors.
pub struct BrailleRenderer {
    last_fg: Option<(u8, u8, u8)>,
    last_bg: Option<(u8, u8, u8)>,
}

impl BrailleRenderer {
    pub fn new() -> Self {
        Self {
            last_fg: None,
            last_bg: None,
        }
    }
}

impl Renderer for BrailleRenderer {
    fn name(&self) -> &'static str {
        "braille"
    }

    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
        let Some((cols, visual_rows, w)) = frame_begin(frame, 2, 4, out)? else {
            return Ok(());
        };

        self.last_fg = None;
        self.last_bg = None;

        // Braille dot bit layout: rows top-to-bottom, columns left/right.
        const DOT_BITS: [u8; 8] = [0x01, 0x08, 0x02, 0x10, 0x04, 0x20, 0x40, 0x80];

        for row in 0..visual_rows {
            let base_y = row * 4;
            for col in 0..cols {
                let base_x = col * 2;

                let mut lum = [0u16; 8];
                let mut rgb = [(0u8, 0u8, 0u8); 8];

                for dy in 0..4usize {
                    for dx in 0..2usize {
                        let i = dy * 2 + dx;
                        let idx = ((base_y + dy) * w + base_x + dx) * 4;
                        let r = frame.pixels_rgba[idx];
                        let g = frame.pixels_rgba[idx + 1];
                        let b = frame.pixels_rgba[idx + 2];
                        rgb[i] = (r, g, b);
                        lum[i] = crate::render::luma_u8(r, g, b) as u16;
                    }
                }

                let min_l = lum.iter().copied().min().unwrap_or(0);
                let max_l = lum.iter().copied().max().unwrap_or(0);
                let thr = (min_l + max_l) / 2;

                let mut bits: u8 = 0;
                let mut fg_acc = [0u32; 3];
                let mut fg_n = 0u32;
                let mut bg_acc = [0u32; 3];
                let mut bg_n = 0u32;

                for i in 0..8usize {
                    let (r, g, b) = rgb[i];
                    if lum[i] > thr {
                        bits |= DOT_BITS[i];
                        fg_acc[0] += r as u32;
                        fg_acc[1] += g as u32;
                        fg_acc[2] += b as u32;
                        fg_n += 1;
                    } else {
                        bg_acc[0] += r as u32;
                        bg_acc[1] += g as u32;
                        bg_acc[2] += b as u32;
                        bg_n += 1;
                    }
                }

                let avg = |acc: [u32; 3], n: u32| -> (u8, u8, u8) {
                    if n == 0 {
                        (0, 0, 0)
                    } else {
                        ((acc[0] / n) as u8, (acc[1] / n) as u8, (acc[2] / n) as u8)
                    }
                };

                let (fgc, bgc, ch) = if bits == 0 {
                    let c = avg(bg_acc, bg_n);
                    (c, c, ' ')
                } else {
                    let fgc = avg(fg_acc, fg_n);
                    let bgc = if bg_n > 0 { avg(bg_acc, bg_n) } else { fgc };
                    let ch = char::from_u32(0x2800 + bits as u32).unwrap_or(' ');
                    (fgc, bgc, ch)
                };

                if self.last_fg != Some(fgc) {
                    write_fg_rgb(out, fgc.0, fgc.1, fgc.2)?;
                    self.last_fg = Some(fgc);
                }
                if self.last_bg != Some(bgc) {
                    write_bg_rgb(out, bgc.0, bgc.1, bgc.2)?;
                    self.last_bg = Some(bgc);
                }
                write!(out, "{ch}")?;
            }
            out.write_all(b"\r\n")?;
        }

        frame_end(frame, visual_rows, cols, out)
    }
}
