//! ONVIF Device CLI
//!
//! Command-line interface for decoding saved device replies and querying
//! live devices.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use onvif_device::{
    list_at, load_response, normalize, string_at, value_at, value_type_name, DeviceError,
    DynamicValue,
};
use serde::Serialize;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[cfg(feature = "remote")]
use onvif_device::{ClientOptions, Device};

#[derive(Parser)]
#[command(name = "onvif-device")]
#[command(about = "Decode and query ONVIF device-service responses")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error); RUST_LOG overrides
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a saved GetCapabilities reply
    Capabilities {
        /// Reply file: SOAP XML, or a decoded tree if it ends in .json
        response: PathBuf,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the value at a dot path in a saved reply
    Get {
        /// Reply file: SOAP XML, or a decoded tree if it ends in .json
        response: PathBuf,

        /// Dot-separated path (e.g. Envelope.Body.GetHostnameResponse)
        path: String,

        /// Print the value as text ("" if it isn't a string)
        #[arg(long, conflicts_with = "list")]
        string: bool,

        /// Print the value as a list
        #[arg(long, conflicts_with = "string")]
        list: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Call a device-service endpoint on a live device
    #[cfg(feature = "remote")]
    Query {
        /// Device service address (e.g. http://192.168.1.10/onvif/device_service)
        xaddr: String,

        /// Endpoint to call
        #[arg(value_enum)]
        endpoint: Endpoint,

        /// Request timeout in seconds
        #[arg(long, default_value_t = 10)]
        timeout: u64,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

#[cfg(feature = "remote")]
#[derive(Clone, Copy, clap::ValueEnum)]
enum Endpoint {
    DeviceInformation,
    SystemDateAndTime,
    Capabilities,
    DiscoveryMode,
    Scopes,
    Hostname,
    Dns,
    NetworkInterfaces,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let result = match cli.command {
        Commands::Capabilities { response, pretty } => run_capabilities(&response, pretty),

        Commands::Get {
            response,
            path,
            string,
            list,
            pretty,
        } => run_get(&response, &path, string, list, pretty),

        #[cfg(feature = "remote")]
        Commands::Query {
            xaddr,
            endpoint,
            timeout,
            pretty,
        } => run_query(&xaddr, endpoint, timeout, pretty),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn fail(e: DeviceError) -> u8 {
    eprintln!("Error: {}", e);
    e.exit_code() as u8
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), u8> {
    let output = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    println!("{}", output);
    Ok(())
}

fn run_capabilities(response: &Path, pretty: bool) -> Result<(), u8> {
    let tree = load_response(response).map_err(fail)?;
    let capabilities = normalize(&tree).map_err(fail)?;
    print_json(&capabilities, pretty)
}

fn run_get(
    response: &Path,
    path: &str,
    string: bool,
    list: bool,
    pretty: bool,
) -> Result<(), u8> {
    let tree = load_response(response).map_err(fail)?;

    if string {
        let text = string_at(&tree, path).map_err(fail)?;
        println!("{}", text);
        return Ok(());
    }

    if list {
        let node = value_at(&tree, path).map_err(fail)?;
        if !matches!(node, DynamicValue::Array(_) | DynamicValue::Object(_)) {
            warn!(path, kind = value_type_name(node), "value is not a list");
        }
        let items = list_at(&tree, path).map_err(fail)?;
        return print_json(&items, pretty);
    }

    let node = value_at(&tree, path).map_err(fail)?;
    print_json(node, pretty)
}

#[cfg(feature = "remote")]
fn run_query(xaddr: &str, endpoint: Endpoint, timeout: u64, pretty: bool) -> Result<(), u8> {
    let options = ClientOptions::new().timeout(std::time::Duration::from_secs(timeout));
    let device = Device::connect(xaddr, &options).map_err(fail)?;

    let output = match endpoint {
        Endpoint::DeviceInformation => to_tree(device.get_device_information()),
        Endpoint::SystemDateAndTime => to_tree(device.get_system_date_and_time()),
        Endpoint::Capabilities => to_tree(device.get_capabilities()),
        Endpoint::DiscoveryMode => to_tree(device.get_discovery_mode()),
        Endpoint::Scopes => to_tree(device.get_scopes()),
        Endpoint::Hostname => to_tree(device.get_hostname()),
        Endpoint::Dns => to_tree(device.get_dns()),
        Endpoint::NetworkInterfaces => to_tree(device.get_network_interfaces()),
    }?;

    print_json(&output, pretty)
}

#[cfg(feature = "remote")]
fn to_tree<T: Serialize>(result: Result<T, DeviceError>) -> Result<DynamicValue, u8> {
    let value = result.map_err(fail)?;
    serde_json::to_value(value).map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })
}
