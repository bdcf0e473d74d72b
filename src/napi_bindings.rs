//! Node.js bindings via `napi-rs`.
//!
//! Exposes a small subset of [`crate::Client`] as a native addon: connect,
//! read, write, and close. Each method runs the underlying blocking call on
//! [`tokio::task::spawn_blocking`] so it doesn't stall the Node.js event
//! loop. This module is compiled only with `--features napi` and is
//! packaging, not new protocol surface — full PLC control belongs to the
//! plain Rust API in [`crate::Client`].

use napi::bindgen_prelude::*;
use napi_derive::napi;
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};

use crate::{Client, ClientConfig};

/// JSON-ish connection options passed from JavaScript.
///
/// Mirrors the fields of [`ClientConfig`] that are meaningful to configure
/// from Node.js; anything unset falls back to [`ClientConfig::new`]'s
/// defaults.
#[napi(object)]
pub struct FinsConnectOptions {
    /// PLC IPv4 address, e.g. `"192.168.1.250"`.
    pub host: String,
    /// This client's FINS node number.
    pub source_node: u8,
    /// The PLC's FINS node number.
    pub dest_node: u8,
    /// UDP port (defaults to 9600 if omitted).
    pub port: Option<u16>,
    /// Request timeout in milliseconds (defaults to 2000 if omitted).
    pub timeout_ms: Option<u32>,
}

/// A FINS client bound to a single PLC, exposed to Node.js.
#[napi]
pub struct FinsClient {
    inner: Arc<Mutex<Client>>,
}

#[napi]
impl FinsClient {
    /// Connects to a PLC over UDP.
    #[napi(factory)]
    pub async fn connect(options: FinsConnectOptions) -> Result<FinsClient> {
        tokio::task::spawn_blocking(move || {
            let host: Ipv4Addr = options
                .host
                .parse()
                .map_err(|e| Error::from_reason(format!("invalid host: {e}")))?;

            let mut config = ClientConfig::new(host, options.source_node, options.dest_node);
            if let Some(port) = options.port {
                config = config.with_port(port);
            }
            if let Some(timeout_ms) = options.timeout_ms {
                config = config.with_timeout(std::time::Duration::from_millis(timeout_ms as u64));
            }

            let client = Client::new(config).map_err(|e| Error::from_reason(e.to_string()))?;
            Ok(FinsClient {
                inner: Arc::new(Mutex::new(client)),
            })
        })
        .await
        .map_err(|e| Error::from_reason(format!("join error: {e}")))?
    }

    /// Reads `count` words starting at `address` (e.g. `"D100"`).
    ///
    /// Returns the words as a plain JS array of numbers.
    #[napi]
    pub async fn read(&self, address: String, count: u16) -> Result<Vec<u16>> {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let client = inner.lock().expect("fins client mutex poisoned");
            client
                .read(&address, count)
                .map_err(|e| Error::from_reason(e.to_string()))
        })
        .await
        .map_err(|e| Error::from_reason(format!("join error: {e}")))?
    }

    /// Writes `data` starting at `address`.
    #[napi]
    pub async fn write(&self, address: String, data: Vec<u16>) -> Result<()> {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let client = inner.lock().expect("fins client mutex poisoned");
            client
                .write(&address, &data)
                .map_err(|e| Error::from_reason(e.to_string()))
        })
        .await
        .map_err(|e| Error::from_reason(format!("join error: {e}")))?
    }

    /// Reads a single bit at `address` (e.g. `"CIO0.5"`).
    #[napi]
    pub async fn read_bit(&self, address: String) -> Result<bool> {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let client = inner.lock().expect("fins client mutex poisoned");
            client
                .read_bit(&address)
                .map_err(|e| Error::from_reason(e.to_string()))
        })
        .await
        .map_err(|e| Error::from_reason(format!("join error: {e}")))?
    }

    /// Writes a single bit at `address`.
    #[napi]
    pub async fn write_bit(&self, address: String, value: bool) -> Result<()> {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let client = inner.lock().expect("fins client mutex poisoned");
            client
                .write_bit(&address, value)
                .map_err(|e| Error::from_reason(e.to_string()))
        })
        .await
        .map_err(|e| Error::from_reason(format!("join error: {e}")))?
    }

    /// Releases this handle's reference to the underlying transport.
    ///
    /// There is no explicit socket-close call on [`Client`] itself; the
    /// transport is closed when its last `Arc` is dropped. This method
    /// exists so the JS side has an explicit, idiomatic lifecycle call
    /// instead of relying on garbage collection timing.
    #[napi]
    pub fn close(&self) {
        drop(Arc::clone(&self.inner));
    }
}
