use std::fs;

use anyhow::{Context, Result};
use castlegen_core::{GeneratedLevel, GeneratorConfig, LevelGenerator, Pos, TerrainMap};
use clap::{Parser, ValueEnum};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Ascii,
    Json,
    Summary,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file with generator settings
    #[arg(short, long)]
    config: Option<String>,
    #[arg(short, long)]
    seed: Option<u64>,
    #[arg(long)]
    width: Option<usize>,
    #[arg(long)]
    height: Option<usize>,
    #[arg(short, long, value_enum, default_value_t = Format::Ascii)]
    format: Format,
}

fn load_config(args: &Args) -> Result<GeneratorConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let data = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {path}"))?;
            toml::from_str(&data).with_context(|| format!("Failed to parse config file: {path}"))?
        }
        None => GeneratorConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    Ok(config)
}

/// One text row per map row, top row first.
fn render_ascii(map: &TerrainMap) -> String {
    let mut out = String::with_capacity((map.width() + 1) * map.height());
    for y in (0..map.height() as i32).rev() {
        for x in 0..map.width() as i32 {
            let pos = Pos::new(x, y);
            let glyph = map
                .content_at(pos)
                .and_then(|content| content.glyph())
                .or_else(|| map.terrain_at(pos).map(|terrain| terrain.glyph()))
                .unwrap_or(' ');
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

fn summary_line(config: &GeneratorConfig, level: &GeneratedLevel) -> String {
    let report = &level.report;
    format!(
        "seed {} {}x{}: {} rooms, {} doors, {} bridges, {} buildings, {} vaults, {} items, \
         fingerprint {:016x}",
        config.seed,
        config.width,
        config.height,
        level.map.room_count(),
        level.map.doors().len(),
        report.bridges.len(),
        report.buildings,
        report.vaults.len(),
        report.items.len(),
        level.map.fingerprint()
    )
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    let level = LevelGenerator::new(config.clone())
        .generate()
        .with_context(|| format!("Generation failed for seed {}", config.seed))?;

    match args.format {
        Format::Ascii => {
            print!("{}", render_ascii(&level.map));
            println!("{}", summary_line(&config, &level));
        }
        Format::Json => {
            let json = serde_json::to_string_pretty(&level)
                .context("Failed to serialize level to JSON")?;
            println!("{json}");
        }
        Format::Summary => println!("{}", summary_line(&config, &level)),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use castlegen_core::{CellContent, TerrainKind};

    use super::*;

    fn args(config: Option<String>) -> Args {
        Args { config, seed: None, width: None, height: None, format: Format::Summary }
    }

    #[test]
    fn missing_config_uses_defaults() {
        assert_eq!(load_config(&args(None)).unwrap(), GeneratorConfig::default());
    }

    #[test]
    fn flags_override_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("castle.toml");
        fs::write(&path, "seed = 9\nwidth = 64\nvaults_enabled = false\n").unwrap();

        let mut args = args(Some(path.to_string_lossy().into_owned()));
        args.seed = Some(11);
        let config = load_config(&args).unwrap();
        assert_eq!(config.seed, 11);
        assert_eq!(config.width, 64);
        assert_eq!(config.height, 50);
        assert!(!config.vaults_enabled);
    }

    #[test]
    fn unreadable_config_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml").to_string_lossy().into_owned();
        let err = load_config(&args(Some(path.clone()))).unwrap_err();
        assert!(err.to_string().contains(&path));
    }

    #[test]
    fn malformed_config_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "width = \"wide\"\n").unwrap();
        assert!(load_config(&args(Some(path.to_string_lossy().into_owned()))).is_err());
    }

    #[test]
    fn ascii_preview_puts_the_top_row_first() {
        let mut map = TerrainMap::new(3, 2);
        map.set_terrain(Pos::new(0, 1), TerrainKind::Water);
        map.set_content(Pos::new(2, 0), CellContent::Gem);
        assert_eq!(render_ascii(&map), "~..\n..*\n");
    }

    #[test]
    fn summary_reports_the_fingerprint() {
        let (config, level) = (3..67)
            .find_map(|seed| {
                let config = GeneratorConfig::with_seed(seed);
                let level = LevelGenerator::new(config.clone()).generate().ok()?;
                Some((config, level))
            })
            .unwrap();
        let line = summary_line(&config, &level);
        assert!(line.starts_with(&format!("seed {} 50x50", config.seed)));
        assert!(line.ends_with(&format!("{:016x}", level.map.fingerprint())));
    }
}
