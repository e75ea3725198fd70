use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "scanmelt", version, about = "Scanline pixel-distortion sketch for truecolor terminals")]
pub struct Config {
    /// Directory scanned for source images (png/jpg). Falls back to
    /// built-in procedural images when empty or missing.
    #[arg(long, default_value = "assets/img")]
    pub images: PathBuf,

    #[arg(long, default_value_t = 30)]
    pub fps: u32,

    /// Preset to start on, by name or index.
    #[arg(long)]
    pub preset: Option<String>,

    /// Seed for the noise field and random draws. Random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub sync_updates: bool,

    #[arg(long, default_value_t = false)]
    pub list_presets: bool,
}
