//! Command handlers

use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use pneu_app::app::{
    find_vehicle, import_fleet_csv, list_alerts, list_vehicles, load_observations, read_plate,
    resolve_alert, verification_history, AlertFilter, CaptureService, RegistrationService,
    VerificationService,
};
use pneu_app::config::Config;
use pneu_app::locks::PlateLocks;
use pneu_app::repository::{open_stores, Stores};
use pneu_app::scanner::find_capture_photos;
use pneu_types::{Error, OutputFormat, Plate, Result, TireObservation};

use crate::cli::{Cli, Commands};
use crate::output;

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(ref dir) = cli.store_dir {
        config.store_dir = Some(dir.clone());
    }
    let output_format = cli.format.unwrap_or(config.output_format);

    match cli.command {
        Commands::Register {
            plate,
            plate_photo,
            photos,
            observations,
            operator,
        } => cmd_register(
            &config,
            output_format,
            plate,
            plate_photo,
            photos,
            observations,
            operator,
        ),

        Commands::Verify {
            plate,
            photos,
            observations,
            operator,
        } => cmd_verify(&config, output_format, &plate, photos, observations, operator),

        Commands::History { plate } => {
            let stores = open_stores(&config)?;
            let plate = Plate::parse(&plate)?;
            let records = verification_history(&stores.ledger, &plate)?;
            output::output_history(output_format, &plate, &records)
        }

        Commands::Vehicles => {
            let stores = open_stores(&config)?;
            output::output_vehicles(output_format, &list_vehicles(&stores.vehicles)?)
        }

        Commands::Show { plate } => {
            let stores = open_stores(&config)?;
            let vehicle = find_vehicle(&stores.vehicles, &Plate::parse(&plate)?)?;
            output::output_vehicle(output_format, &vehicle)
        }

        Commands::Alerts { plate, pending } => {
            let stores = open_stores(&config)?;
            let filter = AlertFilter {
                plate,
                pending_only: pending,
            };
            output::output_alerts(output_format, &list_alerts(&stores.alerts, &filter)?)
        }

        Commands::Resolve { id, notes } => {
            let stores = open_stores(&config)?;
            let alert = resolve_alert(&stores.alerts, &id, notes)?;
            output::output_alert(output_format, &alert)
        }

        Commands::Import { file } => {
            let stores = open_stores(&config)?;
            let locks = PlateLocks::new();
            let registration = RegistrationService::new(&stores.vehicles, &locks);
            let summary = import_fleet_csv(&file, &registration)?;
            output::output_import(output_format, &summary)
        }

        Commands::Config {
            show,
            set_store_dir,
            set_extractor,
            set_output,
            set_retries,
            reset,
        } => cmd_config(show, set_store_dir, set_extractor, set_output, set_retries, reset),
    }
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Tire observations from a photo directory or a JSON file
fn collect_tires(
    config: &Config,
    stores: &Stores,
    photos: Option<&Path>,
    observations: Option<&Path>,
) -> Result<Vec<TireObservation>> {
    if let Some(path) = observations {
        return load_observations(path);
    }
    let dir = photos.ok_or_else(|| Error::FileNotFound("no --photos or --observations given".to_string()))?;

    let extractor = config.extractor()?;
    let pb = spinner();
    let progress_bar = pb.clone();
    let result = CaptureService::new(&extractor)
        .with_photo_store(&stores.photos)
        .with_retries(config.extraction_retries)
        .with_progress(Box::new(move |position| {
            progress_bar.set_message(format!("Reading {} tire...", position.label()));
        }))
        .capture_directory(dir);
    pb.finish_and_clear();
    result
}

fn cmd_register(
    config: &Config,
    output_format: OutputFormat,
    plate: Option<String>,
    plate_photo: Option<PathBuf>,
    photos: Option<PathBuf>,
    observations: Option<PathBuf>,
    operator: Option<String>,
) -> Result<()> {
    let stores = open_stores(config)?;

    let plate = match (plate, plate_photo) {
        (Some(text), _) => Plate::parse(&text)?,
        (None, Some(photo)) => read_plate(&config.extractor()?, &photo)?,
        (None, None) => {
            // Fall back to plate.* in the capture directory
            let dir = photos
                .as_deref()
                .ok_or_else(|| Error::InvalidPlate("no --plate or --plate-photo given".to_string()))?;
            let photo = find_capture_photos(dir)?
                .plate
                .ok_or_else(|| Error::InvalidPlate(format!("no plate photo in {}", dir.display())))?;
            read_plate(&config.extractor()?, &photo)?
        }
    };

    let tires = collect_tires(config, &stores, photos.as_deref(), observations.as_deref())?;
    let locks = PlateLocks::new();
    let baseline = RegistrationService::new(&stores.vehicles, &locks).register(&plate, &tires, operator)?;

    if output_format == OutputFormat::Table {
        println!("Registered {}", baseline.plate);
    }
    output::output_vehicle(output_format, &baseline)
}

fn cmd_verify(
    config: &Config,
    output_format: OutputFormat,
    plate: &str,
    photos: Option<PathBuf>,
    observations: Option<PathBuf>,
    operator: Option<String>,
) -> Result<()> {
    let stores = open_stores(config)?;
    let plate = Plate::parse(plate)?;
    // Unknown plates fail before any photo is read
    find_vehicle(&stores.vehicles, &plate)?;

    let tires = collect_tires(config, &stores, photos.as_deref(), observations.as_deref())?;
    let locks = PlateLocks::new();
    let service = VerificationService::new(&stores.vehicles, &stores.ledger, &stores.alerts, &locks);
    let mut outcome = service.verify(&plate, &tires, operator)?;

    if outcome.effects.has_failures() {
        tracing::warn!("retrying failed writes");
        service.retry_failed_effects(&mut outcome);
    }

    output::output_outcome(output_format, &outcome)
}

fn cmd_config(
    show: bool,
    set_store_dir: Option<PathBuf>,
    set_extractor: Option<String>,
    set_output: Option<OutputFormat>,
    set_retries: Option<u32>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(dir) = set_store_dir {
        config.store_dir = Some(dir);
        modified = true;
    }

    if let Some(cmd) = set_extractor {
        config.extractor_command = Some(cmd);
        modified = true;
    }

    if let Some(output_format) = set_output {
        config.output_format = output_format;
        modified = true;
    }

    if let Some(retries) = set_retries {
        config.extraction_retries = retries;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}
