use anyhow::Result;
use electricitymaps::{Client, ZoneRequest};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Set RUST_LOG=electricitymaps=debug to see request/response traces.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Configure authentication via env vars or a `.electricitymapsrc` file.
    let client = Client::from_env()?;

    let zone = std::env::args().nth(1).unwrap_or_else(|| "DE".to_string());

    let latest = client.latest_carbon_intensity(ZoneRequest::new(&zone))?;
    println!(
        "{}: {} gCO2eq/kWh at {} (estimated: {})",
        latest.zone(),
        latest.carbon_intensity().carbon_intensity(),
        latest.carbon_intensity().datetime(),
        latest.carbon_intensity().is_estimated()
    );

    let breakdown = client.latest_power_breakdown(ZoneRequest::new(&zone))?;
    println!(
        "renewable: {}%  fossil free: {}%",
        breakdown.power_breakdown().renewable_percentage(),
        breakdown.power_breakdown().fossil_free_percentage()
    );

    Ok(())
}
