//! # Omron FINS Protocol Library
//!
//! A Rust library for communicating with Omron PLCs using the FINS (Factory
//! Interface Network Service) protocol, over either UDP or TCP.
//!
//! Each call produces exactly 1 request and 1 response; there is no
//! automatic retrying, caching, or reconnection - [`Client::reconnect`] is
//! the only recovery primitive, and it's explicit.
//!
//! ## Features
//!
//! - **Dual transport** — UDP datagrams or FINS/TCP with the node-assignment handshake
//! - **Symbolic addressing** — `"D100"`, `"CIO50.3"`, `"E5_10"` parsed and encoded per PLC family
//! - **Deterministic** — each call produces exactly 1 request and 1 response
//! - **No panics** — all errors returned as `Result<T, FinsError>`
//! - **Complete API** — read, write, fill, transfer, multi-read, run/stop, forced set/reset, status/CPU introspection
//! - **Typed helpers** — `f32`/`f64`/`i32`/`String` read/write on top of raw word I/O
//! - **Utility functions** — bit manipulation, formatting, and conversion helpers
//!
//! ## Quick Start
//!
//! ```no_run
//! use omron_fins::{Client, ClientConfig};
//! use std::net::Ipv4Addr;
//!
//! fn main() -> omron_fins::Result<()> {
//!     // Connect to PLC at factory default IP (192.168.1.250)
//!     let config = ClientConfig::new(Ipv4Addr::new(192, 168, 1, 250), 1, 0);
//!     let client = Client::new(config)?;
//!
//!     // Read 10 words from D100
//!     let data = client.read("D100", 10)?;
//!     println!("D100-109: {:?}", data);
//!
//!     // Write values to D200
//!     client.write("D200", &[0x1234, 0x5678])?;
//!
//!     // Read a single bit from CIO 0.05
//!     let bit = client.read_bit("CIO0.5")?;
//!     println!("CIO 0.05 = {}", bit);
//!
//!     // Write a single bit
//!     client.write_bit("CIO0.5", true)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Memory Areas
//!
//! Addresses are written as a symbolic string: an area mnemonic, a word
//! offset, and an optional `.bit` suffix. Which area code and offset
//! arithmetic a mnemonic maps to depends on the target [`PlcFamily`].
//!
//! | Mnemonic | Area | Word Access | Bit Access |
//! |----------|------|:-----------:|:----------:|
//! | `CIO` | Core I/O - inputs, outputs, internal relays | ✓ | ✓ |
//! | `W` | Work area - temporary work bits/words | ✓ | ✓ |
//! | `H` | Holding area - retentive bits/words | ✓ | ✓ |
//! | `D` | Data Memory - numeric data storage | ✓ | ✗ |
//! | `A` | Auxiliary area - system status/control | ✓ | ✓ |
//! | `T` / `C` | Timer / Counter area | ✓ | ✓ |
//! | `E0`..`E18` | Extended memory banks | ✓ | ✓ |
//!
//! [`WellKnownArea`] builds word/bit address strings for the common areas
//! without hand-formatting them; [`address::parse_address`] and
//! [`address::encode_address`] are the full codec underneath, covering every
//! area across every family.
//!
//! ## Core Operations
//!
//! ### Word Operations
//!
//! ```no_run
//! # use omron_fins::{Client, ClientConfig};
//! # use std::net::Ipv4Addr;
//! # let client = Client::new(ClientConfig::new(Ipv4Addr::new(192, 168, 1, 250), 1, 0)).unwrap();
//! // Read words
//! let data = client.read("D100", 10)?;
//!
//! // Write words
//! client.write("D200", &[0x1234, 0x5678])?;
//!
//! // Fill memory with a value
//! client.fill("D100", 50, 0x0000)?;
//!
//! // Transfer between areas
//! client.transfer("D100", "D200", 10)?;
//! # Ok::<(), omron_fins::FinsError>(())
//! ```
//!
//! ### Bit Operations
//!
//! ```no_run
//! # use omron_fins::{Client, ClientConfig};
//! # use std::net::Ipv4Addr;
//! # let client = Client::new(ClientConfig::new(Ipv4Addr::new(192, 168, 1, 250), 1, 0)).unwrap();
//! // Read a bit (CIO 0.05)
//! let bit = client.read_bit("CIO0.5")?;
//!
//! // Write a bit
//! client.write_bit("CIO0.5", true)?;
//! # Ok::<(), omron_fins::FinsError>(())
//! ```
//!
//! ### Type Helpers
//!
//! Read and write multi-word types directly:
//!
//! ```no_run
//! # use omron_fins::{Client, ClientConfig};
//! # use std::net::Ipv4Addr;
//! # let client = Client::new(ClientConfig::new(Ipv4Addr::new(192, 168, 1, 250), 1, 0)).unwrap();
//! // f32 (REAL) - 2 words
//! let temp: f32 = client.read_f32("D100")?;
//! client.write_f32("D100", 3.14159)?;
//!
//! // f64 (LREAL) - 4 words
//! let value: f64 = client.read_f64("D100")?;
//! client.write_f64("D100", 3.141592653589793)?;
//!
//! // i32 (DINT) - 2 words
//! let counter: i32 = client.read_i32("D100")?;
//! client.write_i32("D100", -123456)?;
//!
//! // String (ASCII) - variable words (2 chars per word)
//! client.write_string("D200", "PRODUCT-001")?;
//! let code: String = client.read_string("D200", 6)?;
//! # Ok::<(), omron_fins::FinsError>(())
//! ```
//!
//! ### PLC Control and Introspection
//!
//! ```no_run
//! # use omron_fins::{Client, ClientConfig, PlcMode};
//! # use std::net::Ipv4Addr;
//! # let client = Client::new(ClientConfig::new(Ipv4Addr::new(192, 168, 1, 250), 1, 0)).unwrap();
//! // Put PLC in run mode
//! client.run(PlcMode::Monitor)?;
//!
//! // Stop PLC
//! client.stop()?;
//!
//! // Inspect operating status and CPU unit identity
//! let status = client.read_status()?;
//! let cpu = client.read_cpu_unit_data()?;
//! println!("running={} model={}", status.running, cpu.model);
//! # Ok::<(), omron_fins::FinsError>(())
//! ```
//!
//! ## Utility Functions
//!
//! The [`utils`] module provides helper functions for bit manipulation and formatting:
//!
//! ```
//! use omron_fins::utils::{get_bit, set_bit, word_to_bits, format_binary, format_hex};
//!
//! let value: u16 = 0b1010_0101;
//!
//! // Get individual bits
//! assert!(get_bit(value, 0));   // bit 0 is ON
//! assert!(!get_bit(value, 1));  // bit 1 is OFF
//!
//! // Modify bits
//! let modified = set_bit(value, 1, true);
//!
//! // Convert to bit array
//! let bits = word_to_bits(value);
//!
//! // Format for display
//! println!("{}", format_binary(value));  // "0b0000_0000_1010_0101"
//! println!("{}", format_hex(value));     // "0x00A5"
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, FinsError>`]. The library never panics in public code.
//!
//! ```no_run
//! use omron_fins::{Client, ClientConfig, FinsError};
//! use std::net::Ipv4Addr;
//!
//! let config = ClientConfig::new(Ipv4Addr::new(192, 168, 1, 250), 1, 0);
//! let client = Client::new(config)?;
//!
//! match client.read("D100", 10) {
//!     Ok(data) => println!("Data: {:?}", data),
//!     Err(FinsError::Timeout) => println!("Communication timeout"),
//!     Err(FinsError::EndCodeError { end_code, description, .. }) => {
//!         println!("PLC end code {end_code}: {description}");
//!     }
//!     Err(FinsError::InvalidAddressing { reason }) => {
//!         println!("Invalid addressing: {}", reason);
//!     }
//!     Err(e) => println!("Error: {}", e),
//! }
//! # Ok::<(), FinsError>(())
//! ```
//!
//! ## Configuration
//!
//! ```no_run
//! use omron_fins::{ClientConfig, Protocol};
//! use std::net::Ipv4Addr;
//! use std::time::Duration;
//!
//! let config = ClientConfig::new(Ipv4Addr::new(192, 168, 1, 250), 1, 0)
//!     .with_port(9601)                        // Custom port (default: 9600)
//!     .with_protocol(Protocol::Tcp)            // UDP (default) or TCP
//!     .with_timeout(Duration::from_secs(5))   // Custom timeout (default: 2s)
//!     .with_max_queue(8)                      // Concurrent in-flight requests
//!     .with_source_network(1)                 // Source network address
//!     .with_dest_network(2);                  // Destination network address
//! ```
//!
//! ## Design Philosophy
//!
//! This library follows the principle of **determinism over abstraction**:
//!
//! 1. Each operation does exactly what it says
//! 2. No magic or implicit behavior
//! 3. The application has full control over retry, caching, and reconnection
//! 4. Errors are always explicit and descriptive
//!
//! For more details, see the [ARCHITECTURE.md](https://github.com/deviagomendes/omron-fins-rs/blob/main/ARCHITECTURE.md) file.

#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod address;
mod client;
mod command;
mod engine;
mod error;
mod header;
mod memory;
#[cfg(feature = "napi")]
mod napi_bindings;
mod response;
pub mod sequence;
mod transport;
pub mod utils;

// Public re-exports
pub use address::{encode_address, parse_address, render_address, AreaToken, MemoryAddress, PlcFamily};
pub use client::{Client, ClientConfig, Protocol};
pub use command::{
    ControllerStatusReadCommand, CpuUnitDataReadCommand, FillCommand, ForceSpec, ForcedBit,
    ForcedSetResetCancelCommand, ForcedSetResetCommand, MultipleReadCommand, PlcMode,
    ReadBitCommand, ReadWordCommand, RunCommand, StopCommand, TransferCommand, WriteBitCommand,
    WriteWordCommand, MAX_WORDS_PER_COMMAND,
};
pub use engine::{EngineConfig, EngineEvent, ProtocolEngine};
pub use error::{FinsError, Result};
pub use header::{FinsHeader, NodeAddress, FINS_HEADER_SIZE};
pub use memory::WellKnownArea;
pub use response::{
    end_code_description, ControllerStatus, CpuUnitData, FinsResponse, MultiReadValue,
    PlcOperatingMode, MIN_RESPONSE_SIZE,
};
pub use sequence::{SequenceManager, Statistics, MAX_SID, MIN_SID};
pub use transport::{
    TcpTransport, Transport, UdpTransport, DEFAULT_FINS_PORT, DEFAULT_TIMEOUT, MAX_PACKET_SIZE,
};
