//! gen_map.rs - writes a procedural multi-plane level as a `.tmap` file.
//!
//! USAGE:
//! ```bash
//! cargo run --bin gen_map -- \
//!     --out level.tmap \
//!     --width 256 --height 32 --planes 3
//! ```

use std::path::PathBuf;

use anyhow::{Context, ensure};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tilescroll::{
    ScrollConfig,
    map::{DemoLevel, MapStore, demo_map, save_map},
};

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// File receiving the level
    #[arg(long, value_name = "FILE", default_value = "level.tmap")]
    out: PathBuf,

    /// Hero plane width in tiles
    #[arg(long, default_value_t = 256)]
    width: i32,

    /// Hero plane height in tiles
    #[arg(long, default_value_t = 32)]
    height: i32,

    /// Number of planes, back to front
    #[arg(long, default_value_t = 3)]
    planes: usize,

    #[arg(long, default_value_t = 0x5EED)]
    seed: u32,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let opts = Opts::parse();
    let cfg = ScrollConfig::default();
    let (vis_w, vis_h) = (cfg.visible_tiles_w(), cfg.visible_tiles_h());
    ensure!(
        opts.width >= vis_w && opts.height >= vis_h,
        "level must be at least {vis_w}x{vis_h} tiles"
    );

    let map = demo_map(&DemoLevel {
        width: opts.width,
        height: opts.height,
        planes: opts.planes,
        visible_w: vis_w,
        visible_h: vis_h,
        seed: opts.seed,
    })?;
    save_map(&opts.out, &map).with_context(|| format!("writing {}", opts.out.display()))?;

    for plane in 0..map.plane_count() {
        let (w, h) = map.plane_extent(plane);
        info!(plane, w, h, "plane");
    }
    info!("generated {}", opts.out.display());
    Ok(())
}
