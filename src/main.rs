//! Minisub main entry point.
//!
//! Opens a raylib window with one keyboard-driven submarine and a few rocks.
//!
//! # Controls
//!
//! - `A`/`D` or left/right arrows: move
//! - `W` or up arrow: open the top hatch
//! - `S` or down arrow: close it
//! - `Escape`: quit
//!
//! # Main Loop
//!
//! 1. Load `config.ini` and optional JSON submarine options
//! 2. Initialize the raylib window, the ECS world and its resources
//! 3. Spawn the rocks and the player submarine
//! 4. Each frame: read input, run the controllers, step physics, move sprites
//!    onto their bodies, advance animations and draw
//! 5. Destroy the submarines on exit
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --config config.ini --options sub.json
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use bevy_ecs::prelude::*;
use clap::Parser;
use log::{error, info, warn};
use raylib::prelude::Vector2;
use std::path::{Path, PathBuf};

use minisub::components::player::{Obstacle, PlayerSubmarine};
use minisub::components::rigidbody::BodyOptions;
use minisub::components::sprite::Sprite;
use minisub::components::spriterenderer::SpriteRenderer;
use minisub::controller::submarine::SUBMARINE_TEXTURE;
use minisub::controller::{PhysicsEngine, SubmarineController, SubmarineOptions};
use minisub::resources::gameconfig::GameConfig;
use minisub::resources::input::InputState;
use minisub::resources::obstacles::Obstacles;
use minisub::resources::physics::{PhysicsWorld, WorldBounds};
use minisub::resources::texturestore::TextureStore;
use minisub::resources::worldtime::WorldTime;
use minisub::systems::animation::sprite_animation_system;
use minisub::systems::input::update_input_state;
use minisub::systems::physics::{physics_step_system, sync_attached_sprites};
use minisub::systems::player::submarine_controller_system;
use minisub::systems::render::render_system;
use minisub::systems::time::update_world_time;

const SUBMARINE_SHEET: &str = "./assets/minisub.png";
const FRAME_SIZE: f32 = 32.0;
const ROCK_LABEL: &str = "rock";
/// Rocks as (x, y, radius), x and y as fractions of the window size.
const ROCKS: [(f32, f32, f32); 3] = [(0.15, 0.85, 40.0), (0.8, 0.8, 55.0), (0.55, 0.2, 25.0)];

/// Minisub
#[derive(Parser)]
#[command(version, about = "A small submarine driven by a finite-state machine.")]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// JSON file with submarine options, layered over the [submarine] section.
    #[arg(long, value_name = "PATH")]
    options: Option<PathBuf>,

    /// Print the effective submarine configuration as JSON and exit.
    #[arg(long)]
    print_config: bool,
}

fn read_options(path: &Path) -> Result<SubmarineOptions, String> {
    let text = std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    SubmarineOptions::from_json(&text).map_err(|e| format!("{}: {}", path.display(), e))
}

fn spawn_rocks(world: &mut World, physics: &mut PhysicsWorld, obstacles: &Obstacles, size: (u32, u32)) {
    for (fx, fy, radius) in ROCKS {
        let position = Vector2 {
            x: fx * size.0 as f32,
            y: fy * size.1 as f32,
        };
        match physics.create_circle(position, radius, &BodyOptions::fixed(ROCK_LABEL)) {
            Ok(body) => {
                obstacles.add(ROCK_LABEL, body);
                world.spawn(Obstacle { body });
            }
            Err(e) => warn!("skipping rock: {}", e),
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        warn!("{}; using defaults", e);
    }

    let mut options = config.submarine.clone();
    if let Some(path) = &cli.options {
        match read_options(path) {
            Ok(overrides) => options = options.merge(overrides),
            Err(e) => {
                eprintln!("Error reading submarine options: {e}");
                std::process::exit(1);
            }
        }
    }

    // Early-exit: print the resolved submarine configuration (no window needed)
    if cli.print_config {
        match serde_json::to_string_pretty(&options.resolve()) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    // --------------- Raylib window & assets ---------------
    let (window_width, window_height) = config.window_size();
    let (mut rl, thread) = raylib::init()
        .size(window_width as i32, window_height as i32)
        .title("Minisub")
        .build();
    rl.set_target_fps(config.target_fps);
    // Escape is read through InputState
    rl.set_exit_key(None);

    let mut textures = TextureStore::default();
    match rl.load_texture(&thread, SUBMARINE_SHEET) {
        Ok(texture) => textures.insert(SUBMARINE_TEXTURE, texture),
        Err(e) => warn!("{}; drawing placeholders", e),
    }

    // --------------- ECS world + resources ---------------
    let mut world = World::new();
    let mut physics = PhysicsWorld::new(
        config.gravity.into(),
        Some(WorldBounds::new(window_width as f32, window_height as f32)),
    );
    let obstacles = Obstacles::new();
    spawn_rocks(&mut world, &mut physics, &obstacles, config.window_size());

    let start = Vector2 {
        x: window_width as f32 / 2.0,
        y: window_height as f32 / 2.0,
    };
    let render = SpriteRenderer::new(Sprite::new(SUBMARINE_TEXTURE, FRAME_SIZE, FRAME_SIZE, start));
    match SubmarineController::new(render, &mut physics, obstacles.clone(), options) {
        Ok(controller) => {
            world.spawn(PlayerSubmarine::new(controller));
        }
        Err(e) => {
            error!("Failed to spawn the submarine: {}", e);
            std::process::exit(1);
        }
    }

    world.insert_resource(config);
    world.insert_resource(InputState::default());
    world.insert_resource(WorldTime::default());
    world.insert_resource(physics);
    world.insert_resource(obstacles);
    world.insert_resource(textures);
    world.insert_non_send_resource(rl);
    world.insert_non_send_resource(thread);

    let mut update = Schedule::default();
    update.add_systems(
        (
            update_input_state,
            submarine_controller_system,
            physics_step_system,
            sync_attached_sprites,
            sprite_animation_system,
            render_system,
        )
            .chain(),
    );

    update
        .initialize(&mut world)
        .expect("Failed to initialize schedule");

    // --------------- Main loop ---------------
    info!("Minisub running");
    while !world
        .non_send_resource::<raylib::RaylibHandle>()
        .window_should_close()
        && !world.resource::<InputState>().action_back.active
    {
        let dt = world
            .non_send_resource::<raylib::RaylibHandle>()
            .get_frame_time();
        update_world_time(&mut world, dt);

        update.run(&mut world);
    }

    world.resource_scope(|world, mut physics: Mut<PhysicsWorld>| {
        let mut players = world.query::<&mut PlayerSubmarine>();
        for mut player in players.iter_mut(world) {
            player.controller.destroy(&mut *physics);
        }
    });
    info!("Bye");
}
