//! FINS response parsing and validation.
//!
//! This module handles parsing and validation of FINS responses received
//! from PLCs.
//!
//! # Response Structure
//!
//! | Component | Size | Description |
//! |-----------|------|-------------|
//! | Header | 10 bytes | FINS header (same structure as command) |
//! | MRC | 1 byte | Main Response Code |
//! | SRC | 1 byte | Sub Response Code |
//! | MRES | 1 byte | Main end code byte |
//! | SRES | 1 byte | Sub end code byte |
//! | Data | Variable | Response data (if any) |
//!
//! # End codes
//!
//! The top bit of MRES flags a network relay error; the top two bits of
//! SRES flag a fatal and non-fatal CPU unit error respectively. The
//! remaining bits form the 4-hex-digit end code looked up in
//! [`end_code_description`].
//!
//! # Example
//!
//! ```
//! use omron_fins::FinsResponse;
//!
//! let bytes = [
//!     0xC0, 0x00, 0x02, 0x00, 0x01, 0x00, 0x00, 0x0A, 0x00, 0x01, // header
//!     0x01, 0x01, // MRC, SRC
//!     0x00, 0x00, // end code
//!     0x12, 0x34, 0x56, 0x78, // data: 0x1234, 0x5678
//! ];
//!
//! let response = FinsResponse::from_bytes(&bytes).unwrap();
//! assert!(response.is_success());
//! assert_eq!(response.end_code(), "0000");
//!
//! let words = response.to_words().unwrap();
//! assert_eq!(words, vec![0x1234, 0x5678]);
//! ```

use crate::address::MemoryAddress;
use crate::error::{FinsError, Result};
use crate::header::{FinsHeader, FINS_HEADER_SIZE};

/// Minimum response size: header (10) + MRC (1) + SRC (1) + MRES (1) + SRES (1) = 14 bytes.
pub const MIN_RESPONSE_SIZE: usize = FINS_HEADER_SIZE + 4;

/// Looks up the human-readable description for a 4-hex-digit end code.
/// Unknown codes return a generic fallback rather than panicking.
pub fn end_code_description(end_code: &str) -> &'static str {
    match end_code {
        "0000" => "Normal completion.",
        "0001" => "Service canceled.",
        "0101" => "Local node not part of network.",
        "0102" => "Token timeout.",
        "0103" => "Retries failed.",
        "0104" => "Too many send frames.",
        "0105" => "Node address range error.",
        "0106" => "Node address duplication.",
        "0201" => "Destination node not part of network.",
        "0202" => "Unit missing.",
        "0203" => "Third node missing.",
        "0204" => "Destination node busy.",
        "0205" => "Response timeout.",
        "1001" => "Command too long.",
        "1002" => "Command too short.",
        "1003" => "Elements/data count mismatch.",
        "1004" => "Command format error.",
        "1005" => "Header error.",
        "1101" => "Area classification missing.",
        "1102" => "Access size error.",
        "1103" => "Address range error.",
        "1104" => "Address range exceeded.",
        "110b" => "Response length exceeded.",
        "1201" => "Not executable in current mode.",
        "1202" => "No PLC comparable executable condition.",
        "2203" => "Operator not allowed to request.",
        "2204" => "Settings not allowed to change.",
        "2205" => "PLC mode error.",
        "0040" => "Routing table warning.",
        _ => "undefined end code",
    }
}

/// Parsed FINS response.
#[derive(Debug, Clone)]
pub struct FinsResponse {
    /// Response header.
    pub header: FinsHeader,
    /// Main Response Code (MRC).
    pub mrc: u8,
    /// Sub Response Code (SRC).
    pub src: u8,
    /// Masked main end code (low 6 bits of MRES).
    pub main_code: u8,
    /// Masked sub end code (low 7 bits of SRES, clearing only the fatal
    /// error flag so the non-fatal warning bit 0x40 survives into the
    /// end code, e.g. `0040`).
    pub sub_code: u8,
    /// Network relay error flag (MRES bit 7).
    pub network_relay_error: bool,
    /// Fatal CPU unit error flag (SRES bit 7).
    pub fatal_cpu_unit_error: bool,
    /// Non-fatal CPU unit error flag (SRES bit 6).
    pub non_fatal_cpu_unit_error: bool,
    /// Response data (if any).
    pub data: Vec<u8>,
}

impl FinsResponse {
    /// Parses a FINS response from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the response is too short or the header is invalid.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < MIN_RESPONSE_SIZE {
            return Err(FinsError::invalid_response(format!(
                "response too short: expected at least {} bytes, got {}",
                MIN_RESPONSE_SIZE,
                data.len()
            )));
        }

        let header = FinsHeader::from_bytes(&data[..FINS_HEADER_SIZE])?;
        let mres = data[FINS_HEADER_SIZE + 2];
        let sres = data[FINS_HEADER_SIZE + 3];

        Ok(Self {
            header,
            mrc: data[FINS_HEADER_SIZE],
            src: data[FINS_HEADER_SIZE + 1],
            main_code: mres & 0x3F,
            sub_code: sres & 0x7F,
            network_relay_error: mres & 0x80 != 0,
            fatal_cpu_unit_error: sres & 0x80 != 0,
            non_fatal_cpu_unit_error: sres & 0x40 != 0,
            data: data[MIN_RESPONSE_SIZE..].to_vec(),
        })
    }

    /// Four-hex-digit end code string, e.g. `"0000"` or `"1103"`.
    pub fn end_code(&self) -> String {
        format!("{:02x}{:02x}", self.main_code, self.sub_code)
    }

    /// Human-readable description of [`Self::end_code`].
    pub fn end_code_description(&self) -> &'static str {
        end_code_description(&self.end_code())
    }

    /// Returns whether the response indicates success (end code `0000`).
    pub fn is_success(&self) -> bool {
        self.main_code == 0x00 && self.sub_code == 0x00
    }

    /// Validates the response and returns an error if it indicates failure.
    ///
    /// Code `0040` (routing table warning) is accepted when data is present,
    /// matching the Python `fins-driver` library's behavior.
    ///
    /// # Errors
    ///
    /// Returns `FinsError::EndCodeError` if the end code is not `0000`
    /// (except for the `0040` warning with data present).
    pub fn check_error(&self) -> Result<()> {
        if self.is_success() {
            Ok(())
        } else if self.main_code == 0x00 && self.sub_code == 0x40 && !self.data.is_empty() {
            Ok(())
        } else {
            Err(FinsError::end_code_error(
                self.main_code,
                self.sub_code,
                self.end_code_description(),
            ))
        }
    }

    /// Validates the Service ID matches the expected value.
    ///
    /// # Errors
    ///
    /// Returns `FinsError::SidMismatch` if the SID doesn't match.
    pub fn check_sid(&self, expected: u8) -> Result<()> {
        if self.header.sid == expected {
            Ok(())
        } else {
            Err(FinsError::sid_mismatch(expected, self.header.sid))
        }
    }

    /// Converts response data to words (big-endian u16 values).
    ///
    /// # Errors
    ///
    /// Returns an error if the data length is not even.
    pub fn to_words(&self) -> Result<Vec<u16>> {
        if !self.data.len().is_multiple_of(2) {
            return Err(FinsError::invalid_response(
                "data length must be even for word conversion",
            ));
        }

        Ok(self
            .data
            .chunks_exact(2)
            .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
            .collect())
    }

    /// Converts response data to a single bit value.
    ///
    /// # Errors
    ///
    /// Returns an error if there's no data.
    pub fn to_bit(&self) -> Result<bool> {
        if self.data.is_empty() {
            return Err(FinsError::invalid_response("no data for bit conversion"));
        }

        Ok(self.data[0] != 0)
    }

    /// Parses a multi-read response against the addresses that were
    /// requested, validating the echoed area code for each element.
    ///
    /// # Errors
    ///
    /// Returns `FinsError::ProtocolError` if the response is shorter than
    /// expected, or an echoed area code doesn't match the request.
    pub fn parse_multi_read(
        &self,
        family: crate::address::PlcFamily,
        addresses: &[MemoryAddress],
    ) -> Result<Vec<MultiReadValue>> {
        let mut cursor = 0usize;
        let mut values = Vec::with_capacity(addresses.len());

        for addr in addresses {
            let expected = crate::address::encode_address(family, *addr)?;
            if cursor >= self.data.len() {
                return Err(FinsError::ProtocolError(
                    "multi-read response shorter than requested address list".into(),
                ));
            }
            let echoed_area = self.data[cursor];
            if echoed_area != expected[0] {
                return Err(FinsError::ProtocolError(format!(
                    "multi-read echoed area 0x{echoed_area:02X}, expected 0x{:02X}",
                    expected[0]
                )));
            }
            cursor += 1;

            if addr.bit.is_some() {
                if cursor >= self.data.len() {
                    return Err(FinsError::ProtocolError(
                        "multi-read response truncated (bit value)".into(),
                    ));
                }
                values.push(MultiReadValue::Bit(self.data[cursor] != 0));
                cursor += 1;
            } else {
                if cursor + 2 > self.data.len() {
                    return Err(FinsError::ProtocolError(
                        "multi-read response truncated (word value)".into(),
                    ));
                }
                let word = u16::from_be_bytes([self.data[cursor], self.data[cursor + 1]]);
                values.push(MultiReadValue::Word(word));
                cursor += 2;
            }
        }

        Ok(values)
    }

    /// Parses a Controller Status Read (`0601`) response body.
    ///
    /// # Errors
    ///
    /// Returns `FinsError::InvalidResponse` if the body is too short.
    pub fn parse_status(&self) -> Result<ControllerStatus> {
        if self.data.len() < 4 {
            return Err(FinsError::invalid_response(
                "status response body too short",
            ));
        }
        Ok(ControllerStatus {
            running: self.data[0] & 0x01 != 0,
            flash_writing: self.data[0] & 0x08 != 0,
            message_present: self.data[0] & 0x08 != 0,
            fatal_error: self.data[1] & 0x80 != 0,
            non_fatal_error: self.data[1] != 0,
            mode: PlcOperatingMode::from_code(self.data.get(2).copied().unwrap_or(0)),
        })
    }

    /// Parses a CPU Unit Data Read (`0501`) response body.
    ///
    /// # Errors
    ///
    /// Returns `FinsError::InvalidResponse` if the body is too short.
    pub fn parse_cpu_unit_data(&self) -> Result<CpuUnitData> {
        if self.data.len() < 40 {
            return Err(FinsError::invalid_response(
                "CPU unit data response body too short",
            ));
        }
        let model = ascii_field(&self.data[0..20]);
        let version = ascii_field(&self.data[20..40]);
        Ok(CpuUnitData { model, version })
    }
}

fn ascii_field(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches(['\0', ' '])
        .to_string()
}

/// A single value from a multi-read response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiReadValue {
    /// A word value.
    Word(u16),
    /// A bit value.
    Bit(bool),
}

/// PLC operating mode as reported by a Controller Status Read response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlcOperatingMode {
    /// Program/stopped mode.
    Program,
    /// Debug mode.
    Debug,
    /// Monitor mode.
    Monitor,
    /// Run mode.
    Run,
    /// Mode code not recognized.
    Unknown(u8),
}

impl PlcOperatingMode {
    fn from_code(code: u8) -> Self {
        match code {
            0x00 => PlcOperatingMode::Program,
            0x01 => PlcOperatingMode::Debug,
            0x02 => PlcOperatingMode::Monitor,
            0x04 => PlcOperatingMode::Run,
            other => PlcOperatingMode::Unknown(other),
        }
    }
}

/// Parsed Controller Status Read response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerStatus {
    /// Whether the PLC is currently running.
    pub running: bool,
    /// Whether flash memory is being written.
    pub flash_writing: bool,
    /// Whether a message is present.
    pub message_present: bool,
    /// Whether a fatal error is present.
    pub fatal_error: bool,
    /// Whether a non-fatal error is present.
    pub non_fatal_error: bool,
    /// Current operating mode.
    pub mode: PlcOperatingMode,
}

/// Parsed CPU Unit Data Read response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuUnitData {
    /// CPU unit model string.
    pub model: String,
    /// CPU unit internal version string.
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{parse_address, PlcFamily};

    fn make_response(mres: u8, sres: u8, data: &[u8]) -> Vec<u8> {
        let mut bytes = vec![
            0xC0, 0x00, 0x02, 0x00, 0x01, 0x00, 0x00, 0x0A, 0x00, 0x01, // header
            0x01, 0x01, // MRC, SRC
            mres, sres,
        ];
        bytes.extend_from_slice(data);
        bytes
    }

    #[test]
    fn test_response_from_bytes_success() {
        let bytes = make_response(0x00, 0x00, &[0x12, 0x34]);
        let response = FinsResponse::from_bytes(&bytes).unwrap();

        assert_eq!(response.header.icf, 0xC0);
        assert_eq!(response.header.sid, 0x01);
        assert_eq!(response.mrc, 0x01);
        assert_eq!(response.src, 0x01);
        assert_eq!(response.main_code, 0x00);
        assert_eq!(response.sub_code, 0x00);
        assert_eq!(response.data, vec![0x12, 0x34]);
    }

    #[test]
    fn test_response_from_bytes_too_short() {
        let bytes = [0xC0, 0x00, 0x02];
        assert!(FinsResponse::from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_end_code_bit_flags() {
        // MRES = 0xC0 -> relay error + masked main 0x00; SRES = 0x40 -> non-fatal
        let bytes = make_response(0xC0, 0x40, &[]);
        let response = FinsResponse::from_bytes(&bytes).unwrap();
        assert!(response.network_relay_error);
        assert!(!response.fatal_cpu_unit_error);
        assert!(response.non_fatal_cpu_unit_error);
        assert_eq!(response.end_code(), "0040");
    }

    #[test]
    fn test_is_success() {
        let success = FinsResponse::from_bytes(&make_response(0x00, 0x00, &[])).unwrap();
        assert!(success.is_success());

        let error = FinsResponse::from_bytes(&make_response(0x01, 0x00, &[])).unwrap();
        assert!(!error.is_success());
    }

    #[test]
    fn test_check_error() {
        let success = FinsResponse::from_bytes(&make_response(0x00, 0x00, &[])).unwrap();
        assert!(success.check_error().is_ok());

        let error = FinsResponse::from_bytes(&make_response(0x11, 0x03, &[])).unwrap();
        let err = error.check_error().unwrap_err();
        match err {
            FinsError::EndCodeError { end_code, .. } => assert_eq!(end_code, "1103"),
            _ => panic!("expected EndCodeError"),
        }
    }

    #[test]
    fn test_check_error_accepts_routing_warning_with_data() {
        let response = FinsResponse::from_bytes(&make_response(0x00, 0x40, &[0x01])).unwrap();
        assert!(response.check_error().is_ok());
    }

    #[test]
    fn test_check_sid() {
        let response = FinsResponse::from_bytes(&make_response(0x00, 0x00, &[])).unwrap();
        assert!(response.check_sid(0x01).is_ok());
        assert!(response.check_sid(0x02).is_err());
    }

    #[test]
    fn test_to_words() {
        let bytes = make_response(0x00, 0x00, &[0x12, 0x34, 0x56, 0x78, 0xAB, 0xCD]);
        let response = FinsResponse::from_bytes(&bytes).unwrap();
        assert_eq!(response.to_words().unwrap(), vec![0x1234, 0x5678, 0xABCD]);
    }

    #[test]
    fn test_to_words_odd_length() {
        let bytes = make_response(0x00, 0x00, &[0x12, 0x34, 0x56]);
        let response = FinsResponse::from_bytes(&bytes).unwrap();
        assert!(response.to_words().is_err());
    }

    #[test]
    fn test_to_bit() {
        let bytes = make_response(0x00, 0x00, &[0x01]);
        let response = FinsResponse::from_bytes(&bytes).unwrap();
        assert!(response.to_bit().unwrap());
    }

    #[test]
    fn test_parse_multi_read() {
        let addrs = [parse_address("D100").unwrap(), parse_address("CIO0.1").unwrap()];
        // D100 word code 0x82, value 0x0001; CIO0.1 bit code 0x30, value 1
        let bytes = make_response(0x00, 0x00, &[0x82, 0x00, 0x01, 0x30, 0x01]);
        let response = FinsResponse::from_bytes(&bytes).unwrap();
        let values = response.parse_multi_read(PlcFamily::Cs, &addrs).unwrap();
        assert_eq!(values, vec![MultiReadValue::Word(1), MultiReadValue::Bit(true)]);
    }

    #[test]
    fn test_parse_multi_read_rejects_mismatched_echo() {
        let addrs = [parse_address("D100").unwrap()];
        let bytes = make_response(0x00, 0x00, &[0xFF, 0x00, 0x01]);
        let response = FinsResponse::from_bytes(&bytes).unwrap();
        assert!(response.parse_multi_read(PlcFamily::Cs, &addrs).is_err());
    }

    #[test]
    fn test_parse_multi_read_rejects_truncated() {
        let addrs = [parse_address("D100").unwrap(), parse_address("D200").unwrap()];
        let bytes = make_response(0x00, 0x00, &[0x82, 0x00, 0x01]);
        let response = FinsResponse::from_bytes(&bytes).unwrap();
        assert!(response.parse_multi_read(PlcFamily::Cs, &addrs).is_err());
    }

    #[test]
    fn test_parse_status() {
        let bytes = make_response(0x00, 0x00, &[0x01, 0x00, 0x04, 0x00]);
        let response = FinsResponse::from_bytes(&bytes).unwrap();
        let status = response.parse_status().unwrap();
        assert!(status.running);
        assert!(!status.fatal_error);
        assert_eq!(status.mode, PlcOperatingMode::Run);
    }

    #[test]
    fn test_parse_cpu_unit_data() {
        let mut model = b"CS1H-CPU67H".to_vec();
        model.resize(20, 0);
        let mut version = b"V1.0".to_vec();
        version.resize(20, 0);
        let mut body = model;
        body.extend_from_slice(&version);
        let bytes = make_response(0x00, 0x00, &body);
        let response = FinsResponse::from_bytes(&bytes).unwrap();
        let data = response.parse_cpu_unit_data().unwrap();
        assert_eq!(data.model, "CS1H-CPU67H");
        assert_eq!(data.version, "V1.0");
    }
}
