use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cfg = scanmelt::config::Config::parse();
    if cfg.list_presets {
        for name in scanmelt::visual::PRESET_ORDER {
            println!("{name}");
        }
        return Ok(());
    }

    scanmelt::app::run(cfg)
}
