/// Quickstart example - flatten an order document and lay it out as a row
use jsonflat::{format_for_database, FlattenConfig, Flattener};
use serde_json::json;

fn main() -> anyhow::Result<()> {
    println!("=== jsonflat Quick Start ===\n");

    let sample = json!({
        "id": 1,
        "user": {
            "name": "John Doe",
            "address": {
                "street": "123 Main St",
                "city": "Boston",
                "country": {"code": "US", "name": "United States"}
            },
            "orders": [
                {
                    "orderId": "A1",
                    "items": [
                        {"product": "Book", "price": 29.99},
                        {"product": "Pen", "price": 5.99}
                    ]
                }
            ]
        }
    });

    let flattener = Flattener::new(FlattenConfig::default());
    let flat = flattener.flatten(sample.clone())?;

    println!("Flattened {} leaves:", flat.len());
    for (key, value) in &flat {
        println!("  {} = {}", key, value);
    }

    let row = format_for_database(sample)?;
    println!("\nDatabase row:");
    println!("{}", serde_json::to_string_pretty(&row)?);

    println!("\n{}", row.insert_statement("users"));

    Ok(())
}
