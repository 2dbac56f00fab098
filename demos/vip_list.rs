//! VIP list persisted to a JSON file.
//!
//! Set `STOWAGE_PATH` to choose the file and `RUST_LOG=debug` to watch writes.

use std::env;
use std::path::PathBuf;

use stowage::{FileStorage, VipListState};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let path = env::var_os("STOWAGE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|| env::temp_dir().join("stowage-demo.json"));
    println!("=== VIP List ({}) ===\n", path.display());

    let storage = FileStorage::open(&path)?;
    let vips = VipListState::with_on_change(storage, || {
        println!("(saved)");
    })?;

    vips.subscribe(|names| {
        println!("VIPs now: {}", names.len());
    });

    if vips.names().is_empty() {
        println!("Loading default names...");
        vips.load_default_names()?;
    }

    println!("\nAdding a blank line and a guest...");
    vips.push_name("")?;
    vips.push_name("Grace")?;

    println!("\n{}", vips.generate_formatted_list());
    Ok(())
}
