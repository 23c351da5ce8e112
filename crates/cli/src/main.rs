#![deny(unsafe_code)]
//! Headless CLI for the particle-field backdrop.
//!
//! Subcommands:
//! - `render`: run the animation N frames offscreen, write a PNG
//! - `params`: print default parameter values and their schema
//! - `list`: print the display modes

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use particle_field_core::{DisplayMode, FieldParams, Seed};
use particle_field_raster::snapshot::write_png;
use std::path::{Path, PathBuf};
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "particle-field", about = "Interactive particle-field backdrop, rendered headless")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// More log output (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the field for N frames and write the last one as a PNG.
    Render {
        /// Surface width in pixels.
        #[arg(short = 'W', long, default_value_t = 1280)]
        width: u32,

        /// Surface height in pixels.
        #[arg(short = 'H', long, default_value_t = 720)]
        height: u32,

        /// Number of frames to run.
        #[arg(short, long, default_value_t = 120)]
        frames: usize,

        /// PRNG seed for deterministic output.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Display mode (light, dark).
        #[arg(short, long, default_value = "dark")]
        mode: String,

        /// Pointer held at "X,Y" for every frame.
        #[arg(long)]
        pointer: Option<String>,

        /// Field parameters as a JSON string.
        #[arg(long, default_value = "{}")]
        params: String,

        /// Read the whole render description from a seed JSON file instead.
        #[arg(long, conflicts_with_all = ["width", "height", "frames", "seed", "mode", "pointer", "params"])]
        from_seed: Option<PathBuf>,

        /// Keep the background transparent instead of the mode's page color.
        #[arg(long)]
        transparent: bool,

        /// Output file path.
        #[arg(short, long, default_value = "field.png")]
        output: PathBuf,
    },
    /// Print default parameter values and their schema.
    Params,
    /// List display modes.
    List,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Parses `"X,Y"` into pointer coordinates.
fn parse_pointer(s: &str) -> Result<[f64; 2], CliError> {
    let bad = || CliError::Input(format!("invalid --pointer '{s}': expected X,Y"));
    let (x, y) = s.split_once(',').ok_or_else(bad)?;
    let x: f64 = x.trim().parse().map_err(|_| bad())?;
    let y: f64 = y.trim().parse().map_err(|_| bad())?;
    if !x.is_finite() || !y.is_finite() {
        return Err(bad());
    }
    Ok([x, y])
}

fn read_seed(path: &Path) -> Result<Seed, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| CliError::Input(format!("invalid seed file {}: {e}", path.display())))
}

#[allow(clippy::too_many_arguments)]
fn seed_from_args(
    width: u32,
    height: u32,
    frames: usize,
    seed: u64,
    mode: &str,
    pointer: Option<&str>,
    params: &str,
) -> Result<Seed, CliError> {
    let params: serde_json::Value = serde_json::from_str(params)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    let mut s = Seed::new(width, height, seed);
    s.mode = mode.parse::<DisplayMode>()?;
    s.frames = frames;
    s.params = params;
    s.pointer = pointer.map(parse_pointer).transpose()?;
    Ok(s)
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let modes = DisplayMode::list_names();
            if cli.json {
                let info = serde_json::json!({ "modes": modes });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Display modes:");
                for name in modes {
                    println!("  {name}");
                }
            }
        }
        Command::Params => {
            let defaults = FieldParams::default().to_json();
            if cli.json {
                let info = serde_json::json!({
                    "params": defaults,
                    "schema": FieldParams::schema(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                let schema = FieldParams::schema();
                println!("Parameters (defaults):");
                for (name, value) in defaults.as_object().into_iter().flatten() {
                    let about = schema[name]["description"].as_str().unwrap_or_default();
                    println!("  {name:<16} {:<8} {about}", value.to_string());
                }
            }
        }
        Command::Render {
            width,
            height,
            frames,
            seed,
            mode,
            pointer,
            params,
            from_seed,
            transparent,
            output,
        } => {
            let job = match from_seed {
                Some(path) => read_seed(&path)?,
                None => seed_from_args(
                    width,
                    height,
                    frames,
                    seed,
                    &mode,
                    pointer.as_deref(),
                    &params,
                )?,
            };

            let rendered = particle_field_raster::render(&job)?;
            let background = (!transparent).then(|| job.mode.theme().background);
            write_png(&rendered.pixmap, background, &output)?;
            info!(output = %output.display(), "wrote snapshot");

            if cli.json {
                let info = serde_json::json!({
                    "seed": job,
                    "particles": rendered.field.particle_count(),
                    "frames": rendered.frames,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {} particles ({}x{}, {} frames, {} mode, seed {}) -> {}",
                    rendered.field.particle_count(),
                    job.width,
                    job.height,
                    rendered.frames,
                    job.mode,
                    job.seed,
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_pointer_accepts_spaces() {
        assert_eq!(parse_pointer("10, 20.5").unwrap(), [10.0, 20.5]);
    }

    #[test]
    fn parse_pointer_rejects_garbage() {
        for bad in ["", "10", "a,b", "1,2,3", "inf,0"] {
            let err = parse_pointer(bad).unwrap_err();
            assert_eq!(err.exit_code(), error::EXIT_INPUT, "input {bad:?}");
        }
    }

    #[test]
    fn seed_from_args_builds_full_seed() {
        let s = seed_from_args(900, 900, 30, 7, "light", Some("1,2"), r#"{"max_speed":1}"#).unwrap();
        assert_eq!((s.width, s.height, s.frames, s.seed), (900, 900, 30, 7));
        assert_eq!(s.mode, DisplayMode::Light);
        assert_eq!(s.pointer, Some([1.0, 2.0]));
        assert_eq!(s.params["max_speed"], 1);
    }

    #[test]
    fn seed_from_args_rejects_unknown_mode() {
        let err = seed_from_args(10, 10, 1, 1, "sepia", None, "{}").unwrap_err();
        assert_eq!(err.exit_code(), error::EXIT_INPUT);
    }

    #[test]
    fn seed_from_args_rejects_bad_params_json() {
        let err = seed_from_args(10, 10, 1, 1, "dark", None, "{nope").unwrap_err();
        assert_eq!(err.exit_code(), error::EXIT_INPUT);
    }

    #[test]
    fn render_subcommand_parses() {
        let cli = Cli::try_parse_from([
            "particle-field",
            "render",
            "-W",
            "640",
            "--mode",
            "light",
            "--pointer",
            "5,5",
            "-o",
            "out.png",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Render { width: 640, .. }));
    }

    #[test]
    fn from_seed_conflicts_with_inline_options() {
        let result = Cli::try_parse_from([
            "particle-field",
            "render",
            "--from-seed",
            "s.json",
            "--seed",
            "3",
        ]);
        assert!(result.is_err());
    }
}
