use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use clap::Parser;
use percept_api::{Context, Extra, VisionService};
use percept_apps::{
    utils::{init_tracing, init_tracing_with_file_appender},
    Error, Registry, ServiceConfig,
};
use schemars::schema_for;
use tracing::{info, warn};

/// Scans the configured camera with an obstacle service and prints the
/// detected objects as JSON, one line per scan.
#[derive(Parser, Debug)]
#[clap(name = env!("CARGO_BIN_NAME"))]
struct ObstacleScanArgs {
    /// Path to the setting file.
    #[clap(short, long, value_parser)]
    config_path: Option<PathBuf>,
    /// Name of the service to query. Defaults to the first configured service.
    #[clap(long)]
    service: Option<String>,
    /// Camera name passed along with each request.
    #[clap(long, default_value = "")]
    camera_name: String,
    /// Number of scans. 0 means scan until Ctrl-C.
    #[clap(long, default_value_t = 1)]
    count: usize,
    /// Interval between scans in milliseconds.
    #[clap(long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
    interval_ms: u64,
    /// Write JSON trace logs of wrapped capabilities into this directory.
    #[clap(long, value_parser)]
    trace_dir: Option<PathBuf>,
    /// Prints the default setting as TOML.
    #[clap(long)]
    show_default_config: bool,
    /// Prints the JSON schema of the setting file.
    #[clap(long)]
    schema: bool,
}

fn select_service<'a>(
    services: &'a [Box<dyn VisionService>],
    name: Option<&str>,
) -> Result<&'a dyn VisionService, Error> {
    match name {
        Some(name) => services
            .iter()
            .find(|s| s.name().name == name)
            .map(|s| &**s)
            .ok_or_else(|| Error::NoService(name.to_owned())),
        None => services
            .first()
            .map(|s| &**s)
            .ok_or_else(|| Error::NoService(String::new())),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = ObstacleScanArgs::parse();
    let _guard = match &args.trace_dir {
        Some(dir) => Some(init_tracing_with_file_appender(dir, "trace")),
        None => {
            init_tracing();
            None
        }
    };
    info!("ParsedArgs {:?}", args);

    if args.show_default_config {
        print!("{}", toml::to_string(&ServiceConfig::default())?);
        return Ok(());
    }
    if args.schema {
        let schema = schema_for!(ServiceConfig);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        return Ok(());
    }

    let config_path =
        percept_apps::utils::get_apps_service_config(args.config_path).ok_or(Error::NoConfigPath)?;
    let config = ServiceConfig::try_new(&config_path)?;
    let services = config.create_services(&Registry::default())?;
    let service = select_service(&services, args.service.as_deref())?;
    info!(service = %service.name(), "start scanning");

    let ctx = Context::new();
    let ctx_for_stop = ctx.clone();
    // spawn for stop by Ctrl-C
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctx_for_stop.cancel();
        }
    });

    let mut interval = tokio::time::interval(Duration::from_millis(args.interval_ms));
    let mut scanned = 0;
    while args.count == 0 || scanned < args.count {
        interval.tick().await;
        if ctx.is_canceled() {
            warn!("canceled after {scanned} scans");
            break;
        }
        let objects = service.object_point_clouds(&ctx, &args.camera_name, &Extra::new())?;
        println!("{}", serde_json::to_string(&objects)?);
        scanned += 1;
    }
    Ok(())
}
