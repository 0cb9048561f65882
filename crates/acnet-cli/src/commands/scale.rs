use acnet_cli::cli::Quantity;
use anyhow::Result;

pub fn handle(value: f64, quantity: Quantity) -> Result<()> {
    let (scaled, unit) = quantity.table().scale(value);
    println!("{scaled:.2} {unit}");
    Ok(())
}
