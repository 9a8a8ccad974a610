use clap::{Parser, ValueEnum};

#[derive(Parser, Debug, Clone)]
#[command(name = "motif-visualizer", version, about = "Fractal motif visualizer: kaleidoscopic IFS fields in the terminal, optionally audio-reactive")]
pub struct Config {
    #[arg(long, value_enum, default_value_t = AudioSource::Mic)]
    pub source: AudioSource,

    #[arg(long, value_enum, default_value_t = RendererMode::HalfBlock)]
    pub renderer: RendererMode,

    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Start from a named preset (index or name substring).
    #[arg(long)]
    pub preset: Option<String>,

    #[arg(long, default_value_t = false)]
    pub list_devices: bool,

    /// Input device name substring (mic source only).
    #[arg(long)]
    pub device: Option<String>,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub sync_updates: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AudioSource {
    Mic,
    /// Run without audio capture; band levels decay to a silent steady state.
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RendererMode {
    #[value(alias = "ansi", alias = "text")]
    Ascii,
    #[value(name = "half-block", alias = "halfblock", alias = "half_block", alias = "hb")]
    HalfBlock,
    #[value(alias = "hires", alias = "dots")]
    Braille,
}
