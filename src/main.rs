// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

mod scene;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use hullcheck_engine::{colliding_vertices, collide_with_config, CollisionError};
use scene::{Scene, SceneError};
use settings::{Settings, SettingsError};
use thiserror::Error;

#[derive(Debug, Error)]
enum AppError {
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("Collision query failed: {0}")]
    Collision(#[from] CollisionError),
}

/// Checks whether the convex hulls of two point sets overlap, and by how much.
#[derive(Debug, Parser)]
#[command(name = "hullcheck", version)]
struct Cli {
    /// Scene file holding the two bodies `[a]` and `[b]`.
    scene: PathBuf,

    /// Settings file to use instead of the user settings.
    #[arg(long)]
    settings: Option<PathBuf>,
}

/// Runs the query on a scene and renders the report printed to stdout.
fn run(scene: &Scene, settings: &Settings) -> Result<String, AppError> {
    let a = scene.a.world_vertices();
    let b = scene.b.world_vertices();
    log::debug!("Running query on {} and {} vertices", a.len(), b.len());

    let mut report = String::new();
    let Some(result) = collide_with_config(&a, &b, &settings.query)? else {
        report.push_str("Separated\n");
        return Ok(report);
    };

    let penetration = result.penetration_vector();
    log::info!(
        "Penetration depth {} after {} EPA iterations",
        result.penetration_depth,
        result.iterations
    );
    report.push_str(&format!("Penetration vector: {}\n", penetration));
    report.push_str(&format!("Penetration depth: {}\n", result.penetration_depth));

    if result.penetration_depth > 0.0 {
        report.push_str("Vertices of B that are colliding:\n");
        for v in colliding_vertices(&b, penetration)? {
            report.push_str(&format!("  {}\n", v));
        }
    }

    Ok(report)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => match Settings::load_from_file(path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Failed to load settings from {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => Settings::load_user_settings(),
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(settings.logging.level.as_str()),
    )
    .init();

    let outcome = Scene::load(&cli.scene)
        .map_err(AppError::from)
        .and_then(|scene| run(&scene, &settings));

    match outcome {
        Ok(report) => {
            print!("{}", report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
