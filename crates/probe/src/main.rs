//! Backend probe.
//!
//! Looks up every requested device kind for one domain through the same cache
//! the library uses, and prints which backend each one resolved to or why it
//! did not.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use kdispatch::abi::TableHeader;
use kdispatch::{BackendCatalog, Device, DispatchError, Domain, FunctionTable, LoadedTable, TableCache};
use tracing::debug;

/// Probe command line arguments.
#[derive(Parser, Debug)]
#[command(name = "kdispatch-probe")]
#[command(about = "Report which backend library serves each device kind")]
struct Args {
	/// Domain to probe
	#[arg(long, default_value = "blas")]
	domain: Domain,

	/// Device kinds to probe (default: every kind the catalog lists for the domain)
	#[arg(long = "device", value_name = "DEVICE")]
	devices: Vec<Device>,

	/// Catalog overlay to use instead of the environment/config lookup
	#[arg(long, value_name = "PATH")]
	catalog: Option<PathBuf>,

	/// Print candidate libraries without loading them
	#[arg(long)]
	list: bool,

	/// Verbose logging
	#[arg(short, long)]
	verbose: bool,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
	let args = Args::parse();
	init_tracing(args.verbose);

	let catalog = match &args.catalog {
		Some(path) => BackendCatalog::load_from(path)?,
		None => BackendCatalog::load()?,
	};
	let devices = selected_devices(&args, &catalog);

	if args.list {
		for device in devices {
			println!("{device}: {}", catalog.candidates(args.domain, device).join(", "));
		}
		return Ok(ExitCode::SUCCESS);
	}

	debug!(domain = %args.domain, symbol = %catalog.table_symbol(args.domain), "probing backends");
	let cache = TableCache::<TableHeader>::new(args.domain, catalog);
	let mut loaded = 0;
	for device in devices {
		let outcome = cache.lookup(device, "kdispatch-probe");
		loaded += usize::from(outcome.is_ok());
		println!("{device}: {}", describe(&outcome));
	}

	Ok(if loaded > 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Devices named on the command line, or every kind with catalog candidates.
fn selected_devices(args: &Args, catalog: &BackendCatalog) -> Vec<Device> {
	if args.devices.is_empty() {
		catalog.devices(args.domain).collect()
	} else {
		args.devices.clone()
	}
}

fn init_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("kdispatch=debug,kdispatch_catalog=debug,info")
		} else {
			EnvFilter::new("warn")
		}
	});
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}

fn describe<T: FunctionTable>(
	outcome: &Result<std::sync::Arc<LoadedTable<T>>, DispatchError>,
) -> String {
	match outcome {
		Ok(table) => format!("ok ({}, spec v{})", table.library(), table.version()),
		Err(err) => format!("{err} [{}]", err.remediation()),
	}
}
