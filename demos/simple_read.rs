//! Example: Reading data from PLC memory
//!
//! Run with: cargo run --example simple_read
//!
//! This example demonstrates:
//! - Reading words from different memory areas
//! - Reading individual bits
//! - Type conversions (f32, f64, i32, strings)
//! - Using utility functions for bit analysis

use omron_fins::utils::{format_binary, format_hex, get_on_bits, print_bits, word_to_bits};
use omron_fins::{Client, ClientConfig};
use std::net::Ipv4Addr;

fn main() -> omron_fins::Result<()> {
    let config = ClientConfig::new(Ipv4Addr::new(192, 168, 1, 250), 1, 0);
    let client = Client::new(config)?;

    // =========================================================================
    // Reading Words (16-bit values)
    // =========================================================================

    println!("=== Reading Words ===\n");

    let data = client.read("D0", 1)?;
    println!("D0 = {} (0x{:04X})", data[0], data[0]);

    let data = client.read("D100", 5)?;
    println!("D100-D104: {:?}", data);

    let cio_data = client.read("CIO0", 1)?;
    let w_data = client.read("W0", 1)?;
    let h_data = client.read("H0", 1)?;

    println!("CIO0 = 0x{:04X}", cio_data[0]);
    println!("W0   = 0x{:04X}", w_data[0]);
    println!("H0   = 0x{:04X}", h_data[0]);

    // =========================================================================
    // Reading Bits
    // =========================================================================

    println!("\n=== Reading Bits ===\n");

    let bit = client.read_bit("CIO0.5")?;
    println!("CIO 0.05 = {}", bit);

    let value = client.read("CIO100", 1)?[0];
    println!("\nCIO100 = {} ({})", value, format_hex(value));
    println!("Binary: {}", format_binary(value));

    let on_bits = get_on_bits(value);
    println!("Bits that are ON: {:?}", on_bits);

    println!("\nAll bits of CIO100:");
    print_bits(value);

    let bits_array = word_to_bits(value);
    for (i, bit_value) in bits_array.iter().enumerate() {
        if *bit_value {
            println!("  Bit {} is ON", i);
        }
    }

    // =========================================================================
    // Type Conversions
    // =========================================================================

    println!("\n=== Type Conversions ===\n");

    let temperature: f32 = client.read_f32("D200")?;
    println!("Temperature (f32 from D200-201): {:.2}", temperature);

    let precision_value: f64 = client.read_f64("D210")?;
    println!("Precision value (f64 from D210-213): {:.10}", precision_value);

    let counter: i32 = client.read_i32("D220")?;
    println!("Counter (i32 from D220-221): {}", counter);

    let product_code: String = client.read_string("D230", 10)?;
    println!("Product code (string from D230, 10 words): \"{}\"", product_code);

    // =========================================================================
    // Multiple Read (Single Request)
    // =========================================================================

    println!("\n=== Multiple Read ===\n");

    let values = client.multi_read(&["D0", "D100", "CIO0.5"])?;
    println!("D0 = {:?}", values[0]);
    println!("D100 = {:?}", values[1]);
    println!("CIO0.05 = {:?} (OFF/ON)", values[2]);

    // =========================================================================
    // Display Formatting Examples
    // =========================================================================

    println!("\n=== Display Formatting ===\n");

    let sample: u16 = 0xA5C3;
    println!("Sample value: {}", sample);
    println!("  Decimal:     {}", sample);
    println!("  Hexadecimal: {}", format_hex(sample));
    println!("  Binary:      {}", format_binary(sample));
    println!("  Bits ON:     {:?}", get_on_bits(sample));

    println!("\nRead example completed!");
    Ok(())
}
