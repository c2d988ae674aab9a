//! Interactive multi-plane scroll viewer.
//!
//! ```bash
//! cargo run --release -- [level.tmap] [--level N] [--right-only]
//! ```
//!
//! Without a map file a procedural level is generated.  Arrows / A-D walk,
//! Space or Up jumps, K toggles the dead flag (freezes auto-scroll levels),
//! M toggles the missed-frame flag.

use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::Context;
use clap::Parser;
use minifb::{Key, KeyRepeat, Scale, Window, WindowOptions};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tilescroll::{
    ScrollConfig,
    map::{DemoLevel, MapData, MapStore, demo_map, load_map},
    renderer::{RendererExt, Software, TILE_PX},
    scroll::{Facing, Fixed, NoHooks, PlayerState, Position, ScrollEngine, ScrollType},
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// `.tmap` level to show; a demo level is generated when omitted
    #[arg(value_name = "FILE")]
    map: Option<PathBuf>,

    /// Level number selecting the scroll behaviour (2, 8 and 11 are special)
    #[arg(long, default_value_t = 0)]
    level: usize,

    /// Forward-only camera
    #[arg(long)]
    right_only: bool,

    /// Window scale factor (1, 2 or 4)
    #[arg(long, default_value_t = 2)]
    scale: u8,

    /// Demo level width in tiles
    #[arg(long, default_value_t = 256)]
    width: i32,

    /// Demo level plane count
    #[arg(long, default_value_t = 3)]
    planes: usize,

    #[arg(long, default_value_t = 0x5EED)]
    seed: u32,
}

const WALK: Fixed = Fixed::from_raw(0x180);
const GRAVITY: Fixed = Fixed::from_raw(0x60);
const JUMP: Fixed = Fixed::from_raw(-0x900);
const MAX_FALL: Fixed = Fixed::from_raw(0x800);
const BOX_PX: i32 = TILE_PX as i32 - 1;
const PLAYER_COLOR: u32 = 0x00FF_D040;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Tiny platformer body living on the hero plane.
struct Runner {
    player: PlayerState,
    vy: Fixed,
}

impl Runner {
    fn spawn(map: &MapData, column: i32) -> Self {
        let hero = map.hero_plane();
        let (_, h) = map.plane_extent(hero);
        let ground = (1..h).find(|&y| solid(map, column, y)).unwrap_or(h);
        let y = Fixed::from_tiles(ground - 1);
        Self {
            player: PlayerState {
                position: Position::new(Fixed::from_tiles(column), y),
                grounded: true,
                last_ground_y: y,
                facing: Facing::Right,
                max_fall_speed: MAX_FALL,
                dead: false,
            },
            vy: Fixed::ZERO,
        }
    }

    /// Any solid tile under the player box placed at `pos`?
    fn blocked(map: &MapData, pos: Position) -> bool {
        let box_w = Fixed::from_pixels(BOX_PX);
        let (x0, x1) = (pos.x.tile(), (pos.x + box_w).tile());
        let (y0, y1) = (pos.y.tile(), (pos.y + box_w).tile());
        (y0..=y1).any(|y| (x0..=x1).any(|x| solid(map, x, y)))
    }

    fn step(&mut self, map: &MapData, walk: i32, jump: bool) {
        let p = &mut self.player;
        let (w, h) = map.plane_extent(map.hero_plane());

        if walk != 0 {
            p.facing = if walk < 0 { Facing::Left } else { Facing::Right };
            let mut next = p.position;
            next.x += if walk < 0 { -WALK } else { WALK };
            let max_x = Fixed::from_tiles(w - 1);
            next.x = next.x.clamp(Fixed::ZERO, max_x);
            if !Self::blocked(map, next) {
                p.position = next;
            }
        }

        if jump && p.grounded {
            self.vy = JUMP;
        }
        self.vy = (self.vy + GRAVITY).min(MAX_FALL);
        let mut next = p.position;
        next.y += self.vy;
        if Self::blocked(map, next) {
            let box_h = Fixed::from_pixels(BOX_PX);
            if self.vy > Fixed::ZERO {
                next.y = Fixed::from_tiles((next.y + box_h).tile() - 1);
                p.grounded = true;
            } else {
                next.y = Fixed::from_tiles(next.y.tile() + 1);
            }
            self.vy = Fixed::ZERO;
        } else {
            p.grounded = false;
        }
        p.position.y = next.y;
        if p.grounded {
            p.last_ground_y = p.position.y;
        }

        if p.position.y.tile() >= h {
            info!("fell off the level, respawning");
            *self = Self::spawn(map, p.position.x.tile().max(1));
        }
    }
}

fn solid(map: &MapData, x: i32, y: i32) -> bool {
    map.block(map.hero_plane(), x, y).is_some_and(|b| b != 0)
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let opts = Opts::parse();
    let cfg = ScrollConfig::default();

    let map = match &opts.map {
        Some(path) => {
            load_map(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => demo_map(&DemoLevel {
            width: opts.width,
            planes: opts.planes,
            seed: opts.seed,
            visible_w: cfg.visible_tiles_w(),
            visible_h: cfg.visible_tiles_h(),
            ..DemoLevel::default()
        })?,
    };
    info!(planes = map.plane_count(), hero = map.hero_plane(), "level ready");

    let mut engine = ScrollEngine::new(cfg, map.plane_count())?;
    let mut runner = Runner::spawn(&map, 4);
    let scroll_type = if opts.right_only {
        ScrollType::RightOnly
    } else {
        ScrollType::Free
    };
    engine.init_scroll(&map, &runner.player, scroll_type, opts.level, &mut NoHooks)?;

    let scale = match opts.scale {
        1 => Scale::X1,
        4 => Scale::X4,
        _ => Scale::X2,
    };
    let mut win = Window::new(
        "tilescroll",
        cfg.screen_width,
        cfg.screen_height,
        WindowOptions {
            scale,
            ..WindowOptions::default()
        },
    )?;
    win.set_target_fps(60);

    let mut renderer = Software::default();
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();
    let mut missed = false;

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let t0 = Instant::now();

        /* input ----------------------------------------------------------- */
        let left = win.is_key_down(Key::Left) || win.is_key_down(Key::A);
        let right = win.is_key_down(Key::Right) || win.is_key_down(Key::D);
        let walk = right as i32 - left as i32;
        let jump = win.is_key_down(Key::Space) || win.is_key_down(Key::Up);
        if win.is_key_pressed(Key::K, KeyRepeat::No) {
            runner.player.dead = !runner.player.dead;
            info!(dead = runner.player.dead, "player state toggled");
        }
        if win.is_key_pressed(Key::M, KeyRepeat::No) {
            missed = !missed;
            engine.set_frame_missed(missed);
        }

        /* simulate + scroll ---------------------------------------------- */
        runner.step(&map, walk, jump);
        engine.advance_frame(&map, &runner.player, &mut NoHooks);

        /* draw ------------------------------------------------------------ */
        let camera = engine
            .plane_position(map.hero_plane())
            .unwrap_or_default();
        let player = runner.player.position;
        let mut shown = Ok(());
        renderer.draw_frame(
            cfg.screen_width,
            cfg.screen_height,
            |target| {
                engine.draw(target);
                let sx = (player.x - camera.x).pixel();
                let sy = (player.y - camera.y).pixel();
                if sx >= 0 && sy >= 0 {
                    target.fill_rect(sx as usize, sy as usize, TILE_PX, TILE_PX, PLAYER_COLOR);
                }
            },
            |fb, w, h| {
                acc_time += t0.elapsed();
                acc_frames += 1;
                shown = win.update_with_buffer(fb, w, h);
            },
        )?;
        shown?;

        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames.max(1) as f64;
            info!("avg frame: {avg_ms:.2} ms ({:.1} FPS)", 1000.0 / avg_ms);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
