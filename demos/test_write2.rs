use omron_fins::{Client, ClientConfig};
use std::net::Ipv4Addr;

fn main() -> omron_fins::Result<()> {
    let config = ClientConfig::new(Ipv4Addr::new(192, 168, 10, 122), 1, 0);
    let client = Client::new(config)?;

    println!("=== Testing Write Operations ===\n");

    client.write_f32("D2", 1.45)?;

    Ok(())
}
