use clap::{Arg, ArgAction, Command as ClapCommand};
use std::process;
use log::{error, LevelFilter};

use geotiff_vol::config::VolConfig;
use geotiff_vol::raster::Materializer;
use geotiff_vol::utils::logger::Logger;
use geotiff_vol::utils::progress::ProgressTracker;
use geotiff_vol::vol::{AccessFlags, ConnectorRegistry, GeoTiffFile, VolError, VolResult, CONNECTOR_NAME};

fn main() {
    let matches = ClapCommand::new("geotiff-vol")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Open a GeoTIFF through the object-model connector and read its image dataset")
        .arg(
            Arg::new("input")
                .help("Input GeoTIFF file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("dataset")
                .short('d')
                .long("dataset")
                .help("Dataset to open")
                .value_name("NAME")
                .default_value("/image"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("TOML configuration file")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("max-bytes")
                .long("max-bytes")
                .help("Size ceiling for the decoded image in bytes")
                .value_name("BYTES")
                .value_parser(clap::value_parser!(u64))
                .required(false),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("progress")
                .short('p')
                .long("progress")
                .help("Show a progress bar while decoding rows")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dump-geo")
                .long("dump-geo")
                .help("Print the georeferencing metadata")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let mut config = match matches.get_one::<String>("config") {
        Some(path) => match VolConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        None => VolConfig::default(),
    };
    if let Some(max_bytes) = matches.get_one::<u64>("max-bytes") {
        config.max_bytes = *max_bytes;
    }
    if matches.get_flag("verbose") {
        config.log_level = LevelFilter::Debug;
    }

    init_logging(&config);

    let options = RunOptions {
        input: matches.get_one::<String>("input").cloned().unwrap_or_default(),
        dataset: matches.get_one::<String>("dataset").cloned().unwrap_or_else(|| "/image".to_string()),
        progress: matches.get_flag("progress"),
        dump_geo: matches.get_flag("dump-geo"),
    };

    if let Err(e) = run(&options, &config) {
        error!("Reading {} failed: {}", options.input, e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

struct RunOptions {
    input: String,
    dataset: String,
    progress: bool,
    dump_geo: bool,
}

fn init_logging(config: &VolConfig) {
    match &config.log_file {
        Some(path) => {
            if let Err(e) = Logger::init_global_logger(path, config.log_level) {
                eprintln!("Error setting up logger: {}", e);
                process::exit(1);
            }
        }
        None => {
            env_logger::Builder::new()
                .filter_level(config.log_level)
                .parse_default_env()
                .init();
        }
    }
}

fn run(options: &RunOptions, config: &VolConfig) -> VolResult<()> {
    let mut registry = ConnectorRegistry::new();
    let connector = registry.register_by_name(CONNECTOR_NAME)?;
    println!("Connector {} registered: {}", CONNECTOR_NAME, registry.is_registered(CONNECTOR_NAME));

    let result = read_file(options, config);

    registry.unregister(connector)?;
    result
}

fn read_file(options: &RunOptions, config: &VolConfig) -> VolResult<()> {
    let mut file = GeoTiffFile::open_with_config(&options.input, AccessFlags::READ_ONLY, config)?;
    println!("File: {}", file.name());
    println!("Raster: {}", file.descriptor());

    if options.dump_geo {
        let geo = file.geo();
        if geo.is_empty() {
            println!("No georeferencing metadata");
        } else {
            println!("{}", geo);
        }
        print!("{}", file.geo_report()?);
    }

    let root = file.open_group("/")?;
    let dataset = if options.progress {
        let tracker = ProgressTracker::new(file.descriptor().height as u64, &options.dataset);
        let materializer = Materializer::new()
            .with_max_bytes(config.max_bytes)
            .on_row(|done, _| tracker.set_rows(done));
        let result = file.open_dataset_with(&options.dataset, materializer);
        match &result {
            Ok(_) => tracker.finish(),
            Err(_) => tracker.abandon("failed"),
        }
        result?
    } else {
        file.open_dataset(&options.dataset)?
    };

    let dims: Vec<String> = dataset.shape().iter().map(|d| d.to_string()).collect();
    println!(
        "Dataset {}: dimensions [{}], datatype {} ({}), {} bytes",
        dataset.name(),
        dims.join(", "),
        dataset.element_type(),
        dataset.element_type().hdf5_native_name(),
        dataset.storage_size()
    );

    if dataset.shape().is_empty() {
        return Err(VolError::Unsupported("dataset has no dimensions".to_string()));
    }

    dataset.close();
    root.close();
    file.close();
    Ok(())
}
