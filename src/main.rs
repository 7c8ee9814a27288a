use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use clap::Parser;
use color_mixer::{parse_command, ConsoleCommand, Session};
use mix_config::MixerConfig;
use mix_game::MixGamePlugin;

const DEFAULT_CONFIG: &str = "assets/config/mixer.ron";

#[derive(Parser, Debug)]
#[command(author, version, about = "Mix two colors, or play the target matching game", long_about = None)]
struct Args {
    /// Config layers (RON); later files override earlier ones.
    #[arg(long = "config")] config: Vec<PathBuf>,
    /// Palette RON file; overrides the config's palette.
    #[arg(long)] palette: Option<PathBuf>,
    /// Seed for target selection (reproducible games).
    #[arg(long)] seed: Option<u64>,
    /// Log filter, e.g. "warn,mix_game=debug".
    #[arg(long, default_value = "warn,mix_game=info,mix_config=info")] log: String,
    /// Read commands from a file instead of stdin.
    #[arg(long)] script: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins,
        LogPlugin { filter: args.log.clone(), level: Level::INFO, ..default() },
    ));

    let layers = if args.config.is_empty() { vec![PathBuf::from(DEFAULT_CONFIG)] } else { args.config.clone() };
    let (mut cfg, used, errors) = MixerConfig::load_layered(&layers);
    for e in &errors {
        warn!(target: "mix_config", "{e}");
    }
    if !used.is_empty() {
        info!(target: "mix_config", "config layers: {}", used.join(", "));
    }
    for w in cfg.validate() {
        warn!(target: "mix_config", "config: {w}");
    }
    if let Some(seed) = args.seed {
        cfg.rules.rng_seed = Some(seed);
    }
    if let Some(path) = &args.palette {
        cfg.palette = Some(path.display().to_string());
    }

    let plugin = MixGamePlugin::from_config(&cfg).with_context(|| {
        format!("loading palette {}", cfg.palette.as_deref().unwrap_or("(built-in)"))
    })?;
    for w in plugin.palette.validate() {
        warn!(target: "mix_config", "palette {}: {w}", plugin.palette.name());
    }
    let mut session = Session::new(app, plugin);

    let input: Box<dyn BufRead> = match &args.script {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening script {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };
    let echo = args.script.is_some();

    let mut out = io::stdout().lock();
    writeln!(out, "{}", session.render())?;
    for line in input.lines() {
        let line = line.context("reading command")?;
        let command = match parse_command(&line, session.palette()) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "? {e}")?;
                continue;
            }
        };
        if echo {
            writeln!(out, "> {}", line.trim())?;
        }
        if command == ConsoleCommand::Quit {
            break;
        }
        for text in session.run(command)? {
            writeln!(out, "{text}")?;
        }
    }
    Ok(())
}
