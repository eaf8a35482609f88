//! Example: Writing a Data Point and Waiting for Confirmation
//!
//! This example logs in to the Vitotrol service, writes a value to one data
//! point of a device and waits until the device has applied it.
//!
//! Credentials are read from `VITOTROL_LOGIN` and `VITOTROL_PASSWORD`.
//!
//! Run with: `cargo run --example write_and_confirm -- <DEVICE_ID> <LOCATION_ID> <ATTR_ID> <VALUE>`

use std::env;
use std::sync::Arc;
use std::time::Duration;

use vitotrol_core::{Device, Session, WaitConfig, write_data_wait};
use vitotrol_types::AttrId;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 5 {
        eprintln!("Usage: {} <DEVICE_ID> <LOCATION_ID> <ATTR_ID> <VALUE>", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  {} 12345 678 104 21", args[0]);
        std::process::exit(1);
    }

    let device = Device::new(args[1].parse::<u32>()?, args[2].parse::<u32>()?);
    let attr: AttrId = args[3].parse()?;
    let value = &args[4];

    let login = env::var("VITOTROL_LOGIN")?;
    let password = env::var("VITOTROL_PASSWORD")?;

    let session = Arc::new(Session::new(vitotrol_core::MAIN_URL)?);
    println!("Logging in as {}...", login);
    session.login(&login, &password).await?;
    println!("Logged in!");

    let signal = write_data_wait(session, &device, attr, value, WaitConfig::for_write()).await?;
    println!(
        "Write accepted (refresh id {}), waiting for the device...",
        signal.refresh_id()
    );

    signal.wait_timeout(Duration::from_secs(60)).await?;
    println!("Attribute {} of {} is now {}", attr, device, value);

    Ok(())
}
