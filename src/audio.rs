use anyhow::{anyhow, Context};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Sample, SampleFormat};
use ringbuf::traits::{Consumer as _, Producer as _, Split as _};
use ringbuf::HeapRb;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use std::f32::consts::PI;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Half-spectrum size published to the render loop (1024-point FFT).
pub const SPECTRUM_LEN: usize = 512;

/// Latest frequency-bin magnitudes as bytes (0..255), shared between the
/// analyzer thread and the frame loop. A fresh all-zero spectrum is a valid
/// silent reading, so consumers never need to special-case "no data yet".
pub struct SharedSpectrum {
    bins: Mutex<[u8; SPECTRUM_LEN]>,
    updated_ms: AtomicU64,
}

impl SharedSpectrum {
    pub fn new() -> Self {
        Self {
            bins: Mutex::new([0u8; SPECTRUM_LEN]),
            updated_ms: AtomicU64::new(0),
        }
    }

    pub fn store(&self, bins: &[u8; SPECTRUM_LEN]) {
        if let Ok(mut guard) = self.bins.lock() {
            guard.copy_from_slice(bins);
        }
        self.updated_ms.store(now_ms(), Ordering::Relaxed);
    }

    pub fn load_into(&self, out: &mut [u8; SPECTRUM_LEN]) {
        if let Ok(guard) = self.bins.lock() {
            out.copy_from_slice(&*guard);
        }
    }

    pub fn age_ms(&self) -> f32 {
        let t = self.updated_ms.load(Ordering::Relaxed);
        if t == 0 {
            return 0.0;
        }
        now_ms().saturating_sub(t) as f32
    }
}

impl Default for SharedSpectrum {
    fn default() -> Self {
        Self::new()
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_millis(0))
        .as_millis() as u64
}

pub fn list_input_devices() -> anyhow::Result<()> {
    let host = cpal::default_host();
    let devices = host.input_devices().context("enumerate input devices")?;

    let mut out = io::stdout();
    writeln!(out, "Input devices:")?;
    for dev in devices {
        let name = dev.name().unwrap_or_else(|_| "<unknown>".to_string());
        writeln!(out, "  - {}", name)?;
    }
    Ok(())
}

/// Microphone capture plus the FFT analyzer thread feeding SharedSpectrum.
pub struct AudioSystem {
    _stream: cpal::Stream,
    stop: Arc<AtomicBool>,
    analyzer_handle: Option<thread::JoinHandle<()>>,
    spectrum: Arc<SharedSpectrum>,
    pub sample_rate_hz: u32,
}

impl AudioSystem {
    pub fn new_mic(device_query: Option<&str>) -> anyhow::Result<Self> {
        let host = cpal::default_host();
        let device = select_mic_input_device(&host, device_query)?;
        let supported = device
            .default_input_config()
            .context("get default input config")?;
        let sample_rate_hz = supported.sample_rate().0;
        let channels = supported.channels() as usize;
        let config: cpal::StreamConfig = supported.clone().into();

        let rb_capacity = (sample_rate_hz as usize).saturating_mul(4);
        let rb = HeapRb::<f32>::new(rb_capacity);
        let (mut prod, mut cons) = rb.split();

        let stop = Arc::new(AtomicBool::new(false));
        let spectrum = Arc::new(SharedSpectrum::new());
        let spectrum_for_thread = Arc::clone(&spectrum);
        let stop_for_thread = Arc::clone(&stop);

        let err_fn = |err| eprintln!("audio stream error: {err}");

        let stream = match supported.sample_format() {
            SampleFormat::F32 => device.build_input_stream(
                &config,
                move |data: &[f32], _| push_interleaved(data, channels, &mut prod),
                err_fn,
                None,
            )?,
            SampleFormat::I16 => device.build_input_stream(
                &config,
                move |data: &[i16], _| push_interleaved(data, channels, &mut prod),
                err_fn,
                None,
            )?,
            SampleFormat::U16 => device.build_input_stream(
                &config,
                move |data: &[u16], _| push_interleaved(data, channels, &mut prod),
                err_fn,
                None,
            )?,
            fmt => return Err(anyhow!("unsupported sample format: {fmt:?}")),
        };

        stream.play().context("start input stream")?;

        let analyzer_handle = thread::spawn(move || {
            analyze_loop(&mut cons, &stop_for_thread, &spectrum_for_thread)
        });

        Ok(Self {
            _stream: stream,
            stop,
            analyzer_handle: Some(analyzer_handle),
            spectrum,
            sample_rate_hz,
        })
    }

    pub fn spectrum(&self) -> Arc<SharedSpectrum> {
        Arc::clone(&self.spectrum)
    }
}

impl Drop for AudioSystem {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(h) = self.analyzer_handle.take() {
            let _ = h.join();
        }
    }
}

fn select_mic_input_device(
    host: &cpal::Host,
    device_query: Option<&str>,
) -> anyhow::Result<cpal::Device> {
    let devices = host
        .input_devices()
        .context("enumerate input devices")?
        .collect::<Vec<_>>();

    let want = device_query.map(|s| s.to_lowercase());
    if let Some(want) = want.as_deref() {
        if let Some(dev) = devices.iter().find(|d| {
            d.name()
                .map(|n| n.to_lowercase().contains(want))
                .unwrap_or(false)
        }) {
            return Ok(dev.clone());
        }
        return Err(anyhow!("no input device matching: {want}"));
    }

    host.default_input_device()
        .ok_or_else(|| anyhow!("no default input device found"))
}

fn push_interleaved<T: Sample<Float = f32> + Copy>(
    data: &[T],
    channels: usize,
    prod: &mut ringbuf::HeapProd<f32>,
) {
    for frame in data.chunks(channels) {
        let mut acc = 0.0f32;
        for s in frame {
            acc += (*s).to_float_sample();
        }
        let mono = acc / channels as f32;
        let _ = prod.try_push(mono);
    }
}

fn analyze_loop(cons: &mut ringbuf::HeapCons<f32>, stop: &AtomicBool, spectrum: &SharedSpectrum) {
    let n = SPECTRUM_LEN * 2;
    let hop = 256usize;

    let mut scratch = vec![0.0f32; n];
    let mut write_pos = 0usize;
    let mut filled = 0usize;
    let mut since_last = 0usize;

    let hann = (0..n)
        .map(|i| 0.5 - 0.5 * ((2.0 * PI * i as f32) / (n as f32)).cos())
        .collect::<Vec<_>>();

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(n);
    let mut fft_buf = vec![Complex { re: 0.0, im: 0.0 }; n];
    let mut smoothed = [0.0f32; SPECTRUM_LEN];
    let mut bytes = [0u8; SPECTRUM_LEN];

    while !stop.load(Ordering::Relaxed) {
        let mut got_any = false;
        while let Some(s) = cons.try_pop() {
            got_any = true;
            scratch[write_pos] = s;
            write_pos = (write_pos + 1) % n;
            if filled < n {
                filled += 1;
            }
            since_last += 1;
            if filled == n && since_last >= hop {
                since_last = 0;
                analyze_window(&scratch, write_pos, &hann, &fft, &mut fft_buf, &mut smoothed, &mut bytes);
                spectrum.store(&bytes);
            }
        }

        if !got_any {
            thread::sleep(Duration::from_millis(1));
        }
    }
}

/// One Hann-windowed FFT over the ring of samples, magnitudes smoothed
/// across windows (rate 0.8) and mapped to 0..255 over a -100..-30 dB
/// range. That matches the byte-spectrum contract the band extractor
/// expects from a conventional analyser node.
fn analyze_window(
    scratch: &[f32],
    write_pos: usize,
    hann: &[f32],
    fft: &Arc<dyn rustfft::Fft<f32>>,
    fft_buf: &mut [Complex<f32>],
    smoothed: &mut [f32; SPECTRUM_LEN],
    bytes: &mut [u8; SPECTRUM_LEN],
) {
    let n = fft_buf.len();
    for i in 0..n {
        let s = scratch[(write_pos + i) % n];
        fft_buf[i].re = s * hann[i];
        fft_buf[i].im = 0.0;
    }

    fft.process(fft_buf);

    const MIN_DB: f32 = -100.0;
    const MAX_DB: f32 = -30.0;
    for i in 0..SPECTRUM_LEN {
        let c = fft_buf[i];
        let amp = (c.re * c.re + c.im * c.im).sqrt() * (2.0 / n as f32);
        smoothed[i] = smoothed[i] * 0.8 + amp * 0.2;
        let db = 20.0 * smoothed[i].max(1e-10).log10();
        bytes[i] = (((db - MIN_DB) / (MAX_DB - MIN_DB)) * 255.0).clamp(0.0, 255.0) as u8;
    }
}
