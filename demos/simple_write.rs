//! Example: Writing data to PLC memory
//!
//! Run with: cargo run --example simple_write
//!
//! This example demonstrates:
//! - Writing words to different memory areas
//! - Writing individual bits
//! - Type conversions for write operations
//! - Fill and transfer operations
//! - Forced set/reset operations

use omron_fins::{Client, ClientConfig, ForceSpec};
use std::net::Ipv4Addr;

fn main() -> omron_fins::Result<()> {
    let config = ClientConfig::new(Ipv4Addr::new(192, 168, 1, 250), 1, 0);
    let client = Client::new(config)?;

    // =========================================================================
    // Writing Words (16-bit values)
    // =========================================================================

    println!("=== Writing Words ===\n");

    client.write("D0", &[1234])?;
    println!("Wrote 1234 to D0");

    client.write("D100", &[100, 200, 300, 400, 500])?;
    println!("Wrote [100, 200, 300, 400, 500] to D100-D104");

    client.write("D110", &[1000, 2000, 3000])?;
    client.write("D120", &[0x1234, 0xABCD, 0xFF00])?;
    client.write("D130", &[0b1010_1010, 0b1111_0000])?;

    println!("Wrote values in different formats");

    // =========================================================================
    // Writing to Different Memory Areas
    // =========================================================================

    println!("\n=== Writing to Different Areas ===\n");

    client.write("CIO100", &[0x00FF])?;
    println!("Wrote 0x00FF to CIO100");

    client.write("W0", &[42])?;
    println!("Wrote 42 to W0");

    client.write("H0", &[9999])?;
    println!("Wrote 9999 to H0");

    // =========================================================================
    // Writing Bits
    // =========================================================================

    println!("\n=== Writing Bits ===\n");

    client.write_bit("CIO100.0", true)?;
    println!("Set CIO100.00 to ON");

    client.write_bit("CIO100.1", false)?;
    println!("Set CIO100.01 to OFF");

    for bit in 0..8 {
        client.write_bit(&format!("CIO200.{bit}"), bit % 2 == 0)?;
    }
    println!("Set CIO200 bits 0,2,4,6 to ON and 1,3,5,7 to OFF");

    // =========================================================================
    // Type Conversions for Writing
    // =========================================================================

    println!("\n=== Type Conversions ===\n");

    client.write_f32("D200", 3.14159)?;
    println!("Wrote f32 3.14159 to D200-201");

    client.write_f64("D210", 3.141592653589793)?;
    println!("Wrote f64 3.141592653589793 to D210-213");

    client.write_i32("D220", -123456)?;
    println!("Wrote i32 -123456 to D220-221");

    client.write_string("D230", "PRODUCT-001")?;
    println!("Wrote string \"PRODUCT-001\" to D230+");

    // =========================================================================
    // Fill Operation
    // =========================================================================

    println!("\n=== Fill Operation ===\n");

    client.fill("D400", 100, 0x0000)?;
    println!("Filled D400-D499 with 0x0000 (100 words)");

    client.fill("D500", 50, 0xFFFF)?;
    println!("Filled D500-D549 with 0xFFFF (50 words)");

    // =========================================================================
    // Transfer Operation
    // =========================================================================

    println!("\n=== Transfer Operation ===\n");

    client.transfer("D0", "D600", 10)?;
    println!("Transferred D0-D9 to D600-D609");

    client.transfer("D100", "W100", 5)?;
    println!("Transferred D100-D104 to W100-W104");

    // =========================================================================
    // Forced Set/Reset (Maintenance Mode)
    // =========================================================================

    println!("\n=== Forced Set/Reset ===\n");

    // Forced bits override PLC program control; use only for maintenance
    // and testing.
    client.forced_set_reset(&[
        ("CIO300.0", ForceSpec::ForceOn),
        ("CIO300.1", ForceSpec::ForceOff),
    ])?;
    println!("Forced CIO300.00 ON and CIO300.01 OFF");

    client.forced_set_reset(&[
        ("CIO300.0", ForceSpec::Release),
        ("CIO300.1", ForceSpec::Release),
    ])?;
    println!("Released forced state on CIO300.00 and CIO300.01");

    client.forced_set_reset_cancel()?;
    println!("Cancelled all forced bits");

    // =========================================================================
    // Batch Write Pattern
    // =========================================================================

    println!("\n=== Batch Write Pattern ===\n");

    let sensor_data: Vec<u16> = (0..10).map(|i| i * 100).collect();
    client.write("D700", &sensor_data)?;
    println!("Wrote sensor data batch to D700-D709");

    struct Recipe {
        id: u16,
        speed: u16,
        temperature: f32,
        name: &'static str,
    }

    let recipe = Recipe {
        id: 42,
        speed: 1500,
        temperature: 75.5,
        name: "RECIPE-A",
    };

    client.write("D800", &[recipe.id])?;
    client.write("D801", &[recipe.speed])?;
    client.write_f32("D802", recipe.temperature)?;
    client.write_string("D804", recipe.name)?;
    println!("Wrote recipe '{}' to D800+", recipe.name);

    println!("\nWrite example completed!");
    Ok(())
}
