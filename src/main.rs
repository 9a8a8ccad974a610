use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cfg = motif_visualizer::config::Config::parse();
    if cfg.list_devices {
        motif_visualizer::audio::list_input_devices()?;
        return Ok(());
    }

    motif_visualizer::app::run(cfg)
}
