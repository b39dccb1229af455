//! `tzgrid` - CLI for the gridded timezone database
//!
//! Runs the database operations against a flash image dump on the host.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use tzgrid::cli::{CellCommand, Cli, Command, ConfigCommand, InfoCommand, LookupCommand};
use tzgrid::{init_logging, Config, FileFlash, OffsetFlash, TimezoneDatabase};

type ImageDatabase = TimezoneDatabase<OffsetFlash<FileFlash>>;

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    let image = cli.image.as_deref();
    match cli.command {
        Command::Info(cmd) => handle_info(&open_database(image, &config)?, &config, &cmd),
        Command::Lookup(cmd) => {
            let mut db = open_database(image, &config)?;
            handle_lookup(&mut db, &config, &cmd)
        }
        Command::Cell(cmd) => handle_cell(&open_database(image, &config)?, &config, &cmd),
        Command::Print(cmd) => {
            let mut db = open_database(image, &config)?;
            db.print_timezone(cmd.coordinate.lat, cmd.coordinate.lon, &cmd.location)?;
            Ok(())
        }
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_database(image: Option<&Path>, config: &Config) -> Result<ImageDatabase> {
    let path = image
        .or(config.database.image_path.as_deref())
        .context("no flash image given; pass --image or set database.image_path")?;

    let flash = FileFlash::open(path)?;
    let flash = OffsetFlash::new(flash, config.database.base_address);
    TimezoneDatabase::open(flash)
        .with_context(|| format!("reading timezone database from {}", path.display()))
}

fn handle_info(db: &ImageDatabase, config: &Config, cmd: &InfoCommand) -> Result<()> {
    let (Some(header), Some(geometry)) = (db.header(), db.geometry()) else {
        anyhow::bail!("timezone database is not initialized");
    };

    if cmd.json || config.output.json {
        let info = serde_json::json!({
            "header": header,
            "build_date": header.build_date().map(|d| d.to_string()),
            "geometry": geometry,
            "image_len": header.image_len(),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("Timezone database");
        println!("=================");
        println!("Build date:       {}-{:02}-{:02}", header.year, header.month, header.day);
        println!("Latitude points:  {} (res={})", geometry.num_lat, geometry.lat_resolution);
        println!("Longitude points: {} (res={})", geometry.num_lon, geometry.lon_resolution);
        println!("Grid records:     {}", header.grid_len());
        println!("Image size:       {} bytes", header.image_len());
    }
    Ok(())
}

fn handle_lookup(db: &mut ImageDatabase, config: &Config, cmd: &LookupCommand) -> Result<()> {
    let (lat, lon) = (cmd.coordinate.lat, cmd.coordinate.lon);
    let info = db.read_timezone(lat, lon)?;

    if cmd.json || config.output.json {
        let out = serde_json::json!({
            "lat": lat,
            "lon": lon,
            "utc_offset": info.utc_offset,
            "utc_offset_minutes": info.utc_offset_minutes(),
            "has_dst": info.has_dst,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!(
            "({}, {}): {}",
            config.format_coordinate(lat),
            config.format_coordinate(lon),
            info
        );
    }
    Ok(())
}

fn handle_cell(db: &ImageDatabase, config: &Config, cmd: &CellCommand) -> Result<()> {
    let (lat, lon) = (cmd.coordinate.lat, cmd.coordinate.lon);
    let cell = db.cell(lat, lon)?;

    if cmd.json || config.output.json {
        println!("{}", serde_json::to_string_pretty(&cell)?);
    } else {
        println!(
            "({}, {}): lat_index={} lon_index={} coordinate_index={} flash_offset={:#x}",
            config.format_coordinate(lat),
            config.format_coordinate(lon),
            cell.lat_index,
            cell.lon_index,
            cell.coordinate_index,
            cell.flash_offset
        );
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Database]");
                match &config.database.image_path {
                    Some(path) => println!("  Image path:    {}", path.display()),
                    None => println!("  Image path:    (not set)"),
                }
                println!("  Base address:  {:#x}", config.database.base_address);
                println!();
                println!("[Output]");
                println!("  JSON:          {}", config.output.json);
                match config.output.precision {
                    Some(places) => println!("  Precision:     {places}"),
                    None => println!("  Precision:     (as given)"),
                }
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
