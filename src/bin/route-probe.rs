use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;

use edge_router::config::load_route_table;

#[derive(Parser)]
#[command(name = "route-probe")]
#[command(about = "Print routing decisions for request paths", long_about = None)]
struct Cli {
    /// Build output JSON describing routes, lambdas and static files.
    #[arg(short, long, default_value = "config.json")]
    build_output: PathBuf,

    /// Probe file: `{ "probes": [{ "path": "/..." }] }`.
    #[arg(short, long)]
    probes: Option<PathBuf>,

    /// Request paths to route.
    paths: Vec<String>,
}

#[derive(Deserialize)]
struct ProbeFile {
    probes: Vec<Probe>,
}

#[derive(Deserialize)]
struct Probe {
    path: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let table = load_route_table(&cli.build_output)?;

    let mut paths = cli.paths;
    if let Some(probe_path) = cli.probes {
        let content = std::fs::read_to_string(probe_path)?;
        let probe_file: ProbeFile = serde_json::from_str(&content)?;
        paths.extend(probe_file.probes.into_iter().map(|probe| probe.path));
    }

    if paths.is_empty() {
        eprintln!("No paths to probe");
        return Ok(());
    }

    for path in paths {
        let result = table.route(&path);
        println!("{}", serde_json::to_string_pretty(&serde_json::json!({
            "path": path,
            "result": result,
        }))?);
    }

    Ok(())
}
