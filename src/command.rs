//! FINS command structures and serialization.
//!
//! This module contains all FINS command structures that can be sent to a
//! PLC. Each command knows its own command/sub-command code and body layout;
//! serialization to wire bytes goes through the family-aware address codec
//! in [`crate::address`].
//!
//! # Command Types
//!
//! ## Memory Operations
//! - [`ReadWordCommand`] - Read words from PLC memory
//! - [`WriteWordCommand`] - Write words to PLC memory
//! - [`ReadBitCommand`] - Read a single bit from PLC memory
//! - [`WriteBitCommand`] - Write a single bit to PLC memory
//! - [`FillCommand`] - Fill memory with a repeated value
//! - [`TransferCommand`] - Transfer data between memory areas
//! - [`MultipleReadCommand`] - Read from multiple addresses in one request
//!
//! ## PLC Control
//! - [`RunCommand`] - Put PLC into run mode
//! - [`StopCommand`] - Stop the PLC
//! - [`ControllerStatusReadCommand`] - Read PLC operating status
//! - [`CpuUnitDataReadCommand`] - Read CPU unit model/version data
//!
//! ## Forced I/O
//! - [`ForcedSetResetCommand`] - Force bits ON/OFF
//! - [`ForcedSetResetCancelCommand`] - Cancel all forced bits
//!
//! # Example
//!
//! ```
//! use omron_fins::{ReadWordCommand, NodeAddress, PlcFamily};
//! use omron_fins::address::parse_address;
//!
//! let dest = NodeAddress::new(0, 10, 0);
//! let src = NodeAddress::new(0, 1, 0);
//! let addr = parse_address("D100").unwrap();
//!
//! let cmd = ReadWordCommand::new(dest, src, 0x01, PlcFamily::Cs, addr, 10).unwrap();
//! let bytes = cmd.to_bytes().unwrap();
//! ```
//!
//! # Constants
//!
//! - [`MAX_WORDS_PER_COMMAND`] - Maximum number of words (999) per read/write command

use crate::address::{encode_address, MemoryAddress, PlcFamily};
use crate::error::{FinsError, Result};
use crate::header::{FinsHeader, NodeAddress, FINS_HEADER_SIZE};

/// Memory Read command code (MRC).
pub(crate) const MRC_MEMORY_READ: u8 = 0x01;
/// Memory Read command sub-code (SRC).
pub(crate) const SRC_MEMORY_READ: u8 = 0x01;
/// Memory Write command code (MRC).
pub(crate) const MRC_MEMORY_WRITE: u8 = 0x01;
/// Memory Write command sub-code (SRC).
pub(crate) const SRC_MEMORY_WRITE: u8 = 0x02;
/// Memory Fill command sub-code (SRC).
pub(crate) const SRC_MEMORY_FILL: u8 = 0x03;
/// Multiple Memory Area Read command sub-code (SRC).
pub(crate) const SRC_MULTIPLE_READ: u8 = 0x04;
/// Memory Area Transfer command sub-code (SRC).
pub(crate) const SRC_MEMORY_TRANSFER: u8 = 0x05;
/// Run command code (MRC).
pub(crate) const MRC_RUN: u8 = 0x04;
/// Run command sub-code (SRC).
pub(crate) const SRC_RUN: u8 = 0x01;
/// Stop command sub-code (SRC).
pub(crate) const SRC_STOP: u8 = 0x02;
/// CPU Unit Data Read command code (MRC).
pub(crate) const MRC_CPU_UNIT_DATA: u8 = 0x05;
/// CPU Unit Data Read command sub-code (SRC).
pub(crate) const SRC_CPU_UNIT_DATA: u8 = 0x01;
/// Controller Status Read command code (MRC).
pub(crate) const MRC_CONTROLLER_STATUS: u8 = 0x06;
/// Controller Status Read command sub-code (SRC).
pub(crate) const SRC_CONTROLLER_STATUS: u8 = 0x01;
/// Forced Set/Reset command code (MRC).
pub(crate) const MRC_FORCED: u8 = 0x23;
/// Forced Set/Reset command sub-code (SRC).
pub(crate) const SRC_FORCED_SET_RESET: u8 = 0x01;
/// Forced Set/Reset Cancel command sub-code (SRC).
pub(crate) const SRC_FORCED_CANCEL: u8 = 0x02;

/// Maximum number of words that can be read/written in a single command.
pub const MAX_WORDS_PER_COMMAND: u16 = 999;

/// Command for reading words from PLC memory.
#[derive(Debug, Clone)]
pub struct ReadWordCommand {
    header: FinsHeader,
    family: PlcFamily,
    address: MemoryAddress,
    count: u16,
}

impl ReadWordCommand {
    /// Creates a new read word command.
    ///
    /// # Errors
    ///
    /// Returns an error if count is 0 or exceeds [`MAX_WORDS_PER_COMMAND`],
    /// or if `address` is a bit address.
    pub fn new(
        destination: NodeAddress,
        source: NodeAddress,
        sid: u8,
        family: PlcFamily,
        address: MemoryAddress,
        count: u16,
    ) -> Result<Self> {
        validate_count(count)?;
        if address.bit.is_some() {
            return Err(FinsError::invalid_parameter(
                "address",
                "word read requires a word address",
            ));
        }
        Ok(Self {
            header: FinsHeader::new_command(destination, source, sid),
            family,
            address,
            count,
        })
    }

    /// Returns the service ID.
    pub fn sid(&self) -> u8 {
        self.header.sid
    }

    /// Serializes the command to bytes for transmission.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(FINS_HEADER_SIZE + 8);
        bytes.extend_from_slice(&self.header.to_bytes());
        bytes.push(MRC_MEMORY_READ);
        bytes.push(SRC_MEMORY_READ);
        bytes.extend_from_slice(&encode_address(self.family, self.address)?);
        bytes.push((self.count >> 8) as u8);
        bytes.push((self.count & 0xFF) as u8);
        Ok(bytes)
    }
}

/// Command for writing words to PLC memory.
#[derive(Debug, Clone)]
pub struct WriteWordCommand {
    header: FinsHeader,
    family: PlcFamily,
    address: MemoryAddress,
    data: Vec<u16>,
}

impl WriteWordCommand {
    /// Creates a new write word command.
    ///
    /// # Errors
    ///
    /// Returns an error if data is empty, exceeds [`MAX_WORDS_PER_COMMAND`],
    /// or `address` is a bit address.
    pub fn new(
        destination: NodeAddress,
        source: NodeAddress,
        sid: u8,
        family: PlcFamily,
        address: MemoryAddress,
        data: &[u16],
    ) -> Result<Self> {
        if data.is_empty() {
            return Err(FinsError::invalid_parameter("data", "must not be empty"));
        }
        if data.len() > MAX_WORDS_PER_COMMAND as usize {
            return Err(FinsError::invalid_parameter(
                "data",
                format!("must not exceed {} words", MAX_WORDS_PER_COMMAND),
            ));
        }
        if address.bit.is_some() {
            return Err(FinsError::invalid_parameter(
                "address",
                "word write requires a word address",
            ));
        }

        Ok(Self {
            header: FinsHeader::new_command(destination, source, sid),
            family,
            address,
            data: data.to_vec(),
        })
    }

    /// Returns the service ID.
    pub fn sid(&self) -> u8 {
        self.header.sid
    }

    /// Serializes the command to bytes for transmission.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(FINS_HEADER_SIZE + 8 + self.data.len() * 2);
        bytes.extend_from_slice(&self.header.to_bytes());
        bytes.push(MRC_MEMORY_WRITE);
        bytes.push(SRC_MEMORY_WRITE);
        bytes.extend_from_slice(&encode_address(self.family, self.address)?);
        bytes.push((self.data.len() >> 8) as u8);
        bytes.push((self.data.len() & 0xFF) as u8);
        for word in &self.data {
            bytes.push((word >> 8) as u8);
            bytes.push((word & 0xFF) as u8);
        }
        Ok(bytes)
    }
}

/// Command for reading a single bit from PLC memory.
#[derive(Debug, Clone)]
pub struct ReadBitCommand {
    header: FinsHeader,
    family: PlcFamily,
    address: MemoryAddress,
}

impl ReadBitCommand {
    /// Creates a new read bit command.
    ///
    /// # Errors
    ///
    /// Returns an error if `address` is not a bit address.
    pub fn new(
        destination: NodeAddress,
        source: NodeAddress,
        sid: u8,
        family: PlcFamily,
        address: MemoryAddress,
    ) -> Result<Self> {
        require_bit_address(&address)?;
        Ok(Self {
            header: FinsHeader::new_command(destination, source, sid),
            family,
            address,
        })
    }

    /// Returns the service ID.
    pub fn sid(&self) -> u8 {
        self.header.sid
    }

    /// Serializes the command to bytes for transmission.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(FINS_HEADER_SIZE + 8);
        bytes.extend_from_slice(&self.header.to_bytes());
        bytes.push(MRC_MEMORY_READ);
        bytes.push(SRC_MEMORY_READ);
        bytes.extend_from_slice(&encode_address(self.family, self.address)?);
        bytes.push(0x00); // Count high byte (always 1 bit)
        bytes.push(0x01); // Count low byte
        Ok(bytes)
    }
}

/// Command for writing a single bit to PLC memory.
#[derive(Debug, Clone)]
pub struct WriteBitCommand {
    header: FinsHeader,
    family: PlcFamily,
    address: MemoryAddress,
    value: bool,
}

impl WriteBitCommand {
    /// Creates a new write bit command.
    ///
    /// # Errors
    ///
    /// Returns an error if `address` is not a bit address.
    pub fn new(
        destination: NodeAddress,
        source: NodeAddress,
        sid: u8,
        family: PlcFamily,
        address: MemoryAddress,
        value: bool,
    ) -> Result<Self> {
        require_bit_address(&address)?;
        Ok(Self {
            header: FinsHeader::new_command(destination, source, sid),
            family,
            address,
            value,
        })
    }

    /// Returns the service ID.
    pub fn sid(&self) -> u8 {
        self.header.sid
    }

    /// Serializes the command to bytes for transmission.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(FINS_HEADER_SIZE + 9);
        bytes.extend_from_slice(&self.header.to_bytes());
        bytes.push(MRC_MEMORY_WRITE);
        bytes.push(SRC_MEMORY_WRITE);
        bytes.extend_from_slice(&encode_address(self.family, self.address)?);
        bytes.push(0x00); // Count high byte (always 1 bit)
        bytes.push(0x01); // Count low byte
        bytes.push(if self.value { 0x01 } else { 0x00 });
        Ok(bytes)
    }
}

/// Command for filling a memory area with a single value.
#[derive(Debug, Clone)]
pub struct FillCommand {
    header: FinsHeader,
    family: PlcFamily,
    address: MemoryAddress,
    count: u16,
    value: u16,
}

impl FillCommand {
    /// Creates a new fill command.
    ///
    /// # Errors
    ///
    /// Returns an error if count is 0 or exceeds [`MAX_WORDS_PER_COMMAND`].
    pub fn new(
        destination: NodeAddress,
        source: NodeAddress,
        sid: u8,
        family: PlcFamily,
        address: MemoryAddress,
        count: u16,
        value: u16,
    ) -> Result<Self> {
        validate_count(count)?;
        Ok(Self {
            header: FinsHeader::new_command(destination, source, sid),
            family,
            address,
            count,
            value,
        })
    }

    /// Returns the service ID.
    pub fn sid(&self) -> u8 {
        self.header.sid
    }

    /// Serializes the command to bytes for transmission.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(FINS_HEADER_SIZE + 10);
        bytes.extend_from_slice(&self.header.to_bytes());
        bytes.push(MRC_MEMORY_READ); // Memory commands use 0x01
        bytes.push(SRC_MEMORY_FILL);
        bytes.extend_from_slice(&encode_address(self.family, self.address)?);
        bytes.push((self.count >> 8) as u8);
        bytes.push((self.count & 0xFF) as u8);
        bytes.push((self.value >> 8) as u8);
        bytes.push((self.value & 0xFF) as u8);
        Ok(bytes)
    }
}

/// PLC operating mode for Run command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlcMode {
    /// Debug mode - step execution.
    Debug,
    /// Monitor mode - run with monitoring enabled.
    Monitor,
    /// Run mode - normal execution.
    Run,
}

impl PlcMode {
    /// Returns the FINS code for this mode.
    pub(crate) fn code(self) -> u8 {
        match self {
            PlcMode::Debug => 0x01,
            PlcMode::Monitor => 0x02,
            PlcMode::Run => 0x04,
        }
    }
}

/// Command for putting the PLC into run mode.
#[derive(Debug, Clone)]
pub struct RunCommand {
    header: FinsHeader,
    mode: PlcMode,
}

impl RunCommand {
    /// Creates a new run command.
    pub fn new(destination: NodeAddress, source: NodeAddress, sid: u8, mode: PlcMode) -> Self {
        Self {
            header: FinsHeader::new_command(destination, source, sid),
            mode,
        }
    }

    /// Returns the service ID.
    pub fn sid(&self) -> u8 {
        self.header.sid
    }

    /// Serializes the command to bytes for transmission.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(FINS_HEADER_SIZE + 5);
        bytes.extend_from_slice(&self.header.to_bytes());
        bytes.push(MRC_RUN);
        bytes.push(SRC_RUN);
        bytes.push(0xFF); // Program number high byte (current program)
        bytes.push(0xFF); // Program number low byte
        bytes.push(self.mode.code());
        bytes
    }
}

/// Command for stopping the PLC.
#[derive(Debug, Clone)]
pub struct StopCommand {
    header: FinsHeader,
}

impl StopCommand {
    /// Creates a new stop command.
    pub fn new(destination: NodeAddress, source: NodeAddress, sid: u8) -> Self {
        Self {
            header: FinsHeader::new_command(destination, source, sid),
        }
    }

    /// Returns the service ID.
    pub fn sid(&self) -> u8 {
        self.header.sid
    }

    /// Serializes the command to bytes for transmission.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(FINS_HEADER_SIZE + 2);
        bytes.extend_from_slice(&self.header.to_bytes());
        bytes.push(MRC_RUN);
        bytes.push(SRC_STOP);
        bytes
    }
}

/// Command for reading the controller's operating status.
#[derive(Debug, Clone)]
pub struct ControllerStatusReadCommand {
    header: FinsHeader,
}

impl ControllerStatusReadCommand {
    /// Creates a new controller status read command.
    pub fn new(destination: NodeAddress, source: NodeAddress, sid: u8) -> Self {
        Self {
            header: FinsHeader::new_command(destination, source, sid),
        }
    }

    /// Returns the service ID.
    pub fn sid(&self) -> u8 {
        self.header.sid
    }

    /// Serializes the command to bytes for transmission.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(FINS_HEADER_SIZE + 2);
        bytes.extend_from_slice(&self.header.to_bytes());
        bytes.push(MRC_CONTROLLER_STATUS);
        bytes.push(SRC_CONTROLLER_STATUS);
        bytes
    }
}

/// Command for reading the CPU unit's model and version data.
#[derive(Debug, Clone)]
pub struct CpuUnitDataReadCommand {
    header: FinsHeader,
}

impl CpuUnitDataReadCommand {
    /// Creates a new CPU unit data read command.
    pub fn new(destination: NodeAddress, source: NodeAddress, sid: u8) -> Self {
        Self {
            header: FinsHeader::new_command(destination, source, sid),
        }
    }

    /// Returns the service ID.
    pub fn sid(&self) -> u8 {
        self.header.sid
    }

    /// Serializes the command to bytes for transmission.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(FINS_HEADER_SIZE + 2);
        bytes.extend_from_slice(&self.header.to_bytes());
        bytes.push(MRC_CPU_UNIT_DATA);
        bytes.push(SRC_CPU_UNIT_DATA);
        bytes
    }
}

/// Command for transferring memory from one area to another.
#[derive(Debug, Clone)]
pub struct TransferCommand {
    header: FinsHeader,
    family: PlcFamily,
    src_address: MemoryAddress,
    dst_address: MemoryAddress,
    count: u16,
}

impl TransferCommand {
    /// Creates a new transfer command.
    ///
    /// # Errors
    ///
    /// Returns an error if count is 0 or exceeds [`MAX_WORDS_PER_COMMAND`].
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        destination: NodeAddress,
        source: NodeAddress,
        sid: u8,
        family: PlcFamily,
        src_address: MemoryAddress,
        dst_address: MemoryAddress,
        count: u16,
    ) -> Result<Self> {
        validate_count(count)?;
        Ok(Self {
            header: FinsHeader::new_command(destination, source, sid),
            family,
            src_address,
            dst_address,
            count,
        })
    }

    /// Returns the service ID.
    pub fn sid(&self) -> u8 {
        self.header.sid
    }

    /// Serializes the command to bytes for transmission.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(FINS_HEADER_SIZE + 12);
        bytes.extend_from_slice(&self.header.to_bytes());
        bytes.push(MRC_MEMORY_READ); // Memory commands use 0x01
        bytes.push(SRC_MEMORY_TRANSFER);
        bytes.extend_from_slice(&encode_address(self.family, self.src_address)?);
        bytes.extend_from_slice(&encode_address(self.family, self.dst_address)?);
        bytes.push((self.count >> 8) as u8);
        bytes.push((self.count & 0xFF) as u8);
        Ok(bytes)
    }
}

/// Specification for forcing a bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceSpec {
    /// Force the bit OFF.
    ForceOff,
    /// Force the bit ON.
    ForceOn,
    /// Release the forced state.
    Release,
}

impl ForceSpec {
    /// Returns the FINS code for this spec.
    pub(crate) fn code(self) -> u16 {
        match self {
            ForceSpec::ForceOff => 0x0000,
            ForceSpec::ForceOn => 0x0001,
            ForceSpec::Release => 0x8000,
        }
    }
}

/// A bit to be forced.
#[derive(Debug, Clone, Copy)]
pub struct ForcedBit {
    /// Bit address to force.
    pub address: MemoryAddress,
    /// Force specification.
    pub spec: ForceSpec,
}

/// Command for forcing bits ON/OFF.
#[derive(Debug, Clone)]
pub struct ForcedSetResetCommand {
    header: FinsHeader,
    family: PlcFamily,
    specs: Vec<ForcedBit>,
}

impl ForcedSetResetCommand {
    /// Creates a new forced set/reset command.
    ///
    /// # Errors
    ///
    /// Returns an error if `specs` is empty or any address is not a bit address.
    pub fn new(
        destination: NodeAddress,
        source: NodeAddress,
        sid: u8,
        family: PlcFamily,
        specs: Vec<ForcedBit>,
    ) -> Result<Self> {
        if specs.is_empty() {
            return Err(FinsError::invalid_parameter("specs", "must not be empty"));
        }
        for spec in &specs {
            require_bit_address(&spec.address)?;
        }
        Ok(Self {
            header: FinsHeader::new_command(destination, source, sid),
            family,
            specs,
        })
    }

    /// Returns the service ID.
    pub fn sid(&self) -> u8 {
        self.header.sid
    }

    /// Serializes the command to bytes for transmission.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(FINS_HEADER_SIZE + 4 + self.specs.len() * 6);
        bytes.extend_from_slice(&self.header.to_bytes());
        bytes.push(MRC_FORCED);
        bytes.push(SRC_FORCED_SET_RESET);
        bytes.push((self.specs.len() >> 8) as u8);
        bytes.push((self.specs.len() & 0xFF) as u8);

        for spec in &self.specs {
            let code = spec.spec.code();
            bytes.push((code >> 8) as u8);
            bytes.push((code & 0xFF) as u8);
            bytes.extend_from_slice(&encode_address(self.family, spec.address)?);
        }

        Ok(bytes)
    }
}

/// Command for canceling all forced bits.
#[derive(Debug, Clone)]
pub struct ForcedSetResetCancelCommand {
    header: FinsHeader,
}

impl ForcedSetResetCancelCommand {
    /// Creates a new forced set/reset cancel command.
    pub fn new(destination: NodeAddress, source: NodeAddress, sid: u8) -> Self {
        Self {
            header: FinsHeader::new_command(destination, source, sid),
        }
    }

    /// Returns the service ID.
    pub fn sid(&self) -> u8 {
        self.header.sid
    }

    /// Serializes the command to bytes for transmission.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(FINS_HEADER_SIZE + 2);
        bytes.extend_from_slice(&self.header.to_bytes());
        bytes.push(MRC_FORCED);
        bytes.push(SRC_FORCED_CANCEL);
        bytes
    }
}

/// Command for reading from multiple, possibly heterogeneous, memory
/// addresses in one round-trip.
#[derive(Debug, Clone)]
pub struct MultipleReadCommand {
    header: FinsHeader,
    family: PlcFamily,
    addresses: Vec<MemoryAddress>,
}

impl MultipleReadCommand {
    /// Creates a new multiple memory area read command.
    ///
    /// # Errors
    ///
    /// Returns an error if `addresses` is empty.
    pub fn new(
        destination: NodeAddress,
        source: NodeAddress,
        sid: u8,
        family: PlcFamily,
        addresses: Vec<MemoryAddress>,
    ) -> Result<Self> {
        if addresses.is_empty() {
            return Err(FinsError::invalid_parameter(
                "addresses",
                "must not be empty",
            ));
        }
        Ok(Self {
            header: FinsHeader::new_command(destination, source, sid),
            family,
            addresses,
        })
    }

    /// The addresses this command will request, in order. Used by the
    /// response parser to know how many bytes each element occupies.
    pub fn addresses(&self) -> &[MemoryAddress] {
        &self.addresses
    }

    /// Returns the service ID.
    pub fn sid(&self) -> u8 {
        self.header.sid
    }

    /// Serializes the command to bytes for transmission.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(FINS_HEADER_SIZE + 2 + self.addresses.len() * 4);
        bytes.extend_from_slice(&self.header.to_bytes());
        bytes.push(MRC_MEMORY_READ);
        bytes.push(SRC_MULTIPLE_READ);

        for address in &self.addresses {
            bytes.extend_from_slice(&encode_address(self.family, *address)?);
        }

        Ok(bytes)
    }
}

fn validate_count(count: u16) -> Result<()> {
    if count == 0 {
        return Err(FinsError::invalid_parameter(
            "count",
            "must be greater than 0",
        ));
    }
    if count > MAX_WORDS_PER_COMMAND {
        return Err(FinsError::invalid_parameter(
            "count",
            format!("must not exceed {}", MAX_WORDS_PER_COMMAND),
        ));
    }
    Ok(())
}

fn require_bit_address(address: &MemoryAddress) -> Result<()> {
    if address.bit.is_none() {
        return Err(FinsError::invalid_parameter(
            "address",
            "bit operation requires a bit address",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::parse_address;

    fn test_addresses() -> (NodeAddress, NodeAddress) {
        (NodeAddress::new(0, 10, 0), NodeAddress::new(0, 1, 0))
    }

    #[test]
    fn test_read_word_command_serialization() {
        let (dest, src) = test_addresses();
        let addr = parse_address("D100").unwrap();
        let cmd = ReadWordCommand::new(dest, src, 0x01, PlcFamily::Cs, addr, 10).unwrap();
        let bytes = cmd.to_bytes().unwrap();

        assert_eq!(bytes.len(), 18);
        assert_eq!(bytes[0], 0x80); // ICF
        assert_eq!(bytes[9], 0x01); // SID
        assert_eq!(bytes[10], MRC_MEMORY_READ);
        assert_eq!(bytes[11], SRC_MEMORY_READ);
        assert_eq!(bytes[12], 0x82); // D word code
        assert_eq!(bytes[13], 0x00);
        assert_eq!(bytes[14], 0x64);
        assert_eq!(bytes[15], 0x00); // bit
        assert_eq!(bytes[16], 0x00);
        assert_eq!(bytes[17], 0x0A);
    }

    #[test]
    fn test_read_word_command_invalid_count() {
        let (dest, src) = test_addresses();
        let addr = parse_address("D100").unwrap();

        let result = ReadWordCommand::new(dest, src, 0x01, PlcFamily::Cs, addr, 0);
        assert!(result.is_err());

        let result = ReadWordCommand::new(dest, src, 0x01, PlcFamily::Cs, addr, 1000);
        assert!(result.is_err());
    }

    #[test]
    fn test_read_word_command_rejects_bit_address() {
        let (dest, src) = test_addresses();
        let addr = parse_address("D100.1").unwrap();
        assert!(ReadWordCommand::new(dest, src, 0x01, PlcFamily::Cs, addr, 10).is_err());
    }

    #[test]
    fn test_write_word_command_serialization() {
        let (dest, src) = test_addresses();
        let addr = parse_address("D100").unwrap();
        let cmd =
            WriteWordCommand::new(dest, src, 0x02, PlcFamily::Cs, addr, &[0x1234, 0x5678]).unwrap();
        let bytes = cmd.to_bytes().unwrap();

        assert_eq!(bytes.len(), 22);
        assert_eq!(bytes[10], MRC_MEMORY_WRITE);
        assert_eq!(bytes[11], SRC_MEMORY_WRITE);
        assert_eq!(bytes[16], 0x00);
        assert_eq!(bytes[17], 0x02);
        assert_eq!(bytes[18], 0x12);
        assert_eq!(bytes[19], 0x34);
        assert_eq!(bytes[20], 0x56);
        assert_eq!(bytes[21], 0x78);
    }

    #[test]
    fn test_read_bit_command_serialization() {
        let (dest, src) = test_addresses();
        let addr = parse_address("CIO100.5").unwrap();
        let cmd = ReadBitCommand::new(dest, src, 0x01, PlcFamily::Cs, addr).unwrap();
        let bytes = cmd.to_bytes().unwrap();

        assert_eq!(bytes[12], 0x30); // CIO bit code
        assert_eq!(bytes[15], 0x05); // bit
        assert_eq!(&bytes[16..18], &[0x00, 0x01]);
    }

    #[test]
    fn test_write_bit_command_serialization() {
        let (dest, src) = test_addresses();
        let addr = parse_address("CIO100.5").unwrap();
        let cmd = WriteBitCommand::new(dest, src, 0x01, PlcFamily::Cs, addr, true).unwrap();
        let bytes = cmd.to_bytes().unwrap();

        assert_eq!(bytes[18], 0x01);
    }

    #[test]
    fn test_fill_command_serialization() {
        let (dest, src) = test_addresses();
        let addr = parse_address("D100").unwrap();
        let cmd = FillCommand::new(dest, src, 0x01, PlcFamily::Cs, addr, 50, 0x00FF).unwrap();
        let bytes = cmd.to_bytes().unwrap();

        assert_eq!(bytes[10], MRC_MEMORY_READ);
        assert_eq!(bytes[11], SRC_MEMORY_FILL);
        assert_eq!(&bytes[16..18], &[0x00, 0x32]); // count = 50
        assert_eq!(&bytes[18..20], &[0x00, 0xFF]); // value
    }

    #[test]
    fn test_run_and_stop_commands() {
        let (dest, src) = test_addresses();
        let run = RunCommand::new(dest, src, 0x01, PlcMode::Monitor).to_bytes();
        assert_eq!(&run[10..15], &[MRC_RUN, SRC_RUN, 0xFF, 0xFF, 0x02]);

        let stop = StopCommand::new(dest, src, 0x01).to_bytes();
        assert_eq!(&stop[10..12], &[MRC_RUN, SRC_STOP]);
    }

    #[test]
    fn test_controller_status_and_cpu_unit_data_commands() {
        let (dest, src) = test_addresses();
        let status = ControllerStatusReadCommand::new(dest, src, 0x01).to_bytes();
        assert_eq!(&status[10..12], &[MRC_CONTROLLER_STATUS, SRC_CONTROLLER_STATUS]);

        let cpu = CpuUnitDataReadCommand::new(dest, src, 0x01).to_bytes();
        assert_eq!(&cpu[10..12], &[MRC_CPU_UNIT_DATA, SRC_CPU_UNIT_DATA]);
    }

    #[test]
    fn test_transfer_command_serialization() {
        let (dest, src) = test_addresses();
        let from = parse_address("D100").unwrap();
        let to = parse_address("D200").unwrap();
        let cmd = TransferCommand::new(dest, src, 0x01, PlcFamily::Cs, from, to, 10).unwrap();
        let bytes = cmd.to_bytes().unwrap();

        assert_eq!(bytes[10], MRC_MEMORY_READ);
        assert_eq!(bytes[11], SRC_MEMORY_TRANSFER);
        assert_eq!(&bytes[20..22], &[0x00, 0x0A]);
    }

    #[test]
    fn test_forced_set_reset_serialization() {
        let (dest, src) = test_addresses();
        let addr = parse_address("CIO0.0").unwrap();
        let cmd = ForcedSetResetCommand::new(
            dest,
            src,
            0x01,
            PlcFamily::Cs,
            vec![ForcedBit {
                address: addr,
                spec: ForceSpec::ForceOn,
            }],
        )
        .unwrap();
        let bytes = cmd.to_bytes().unwrap();

        assert_eq!(&bytes[10..12], &[MRC_FORCED, SRC_FORCED_SET_RESET]);
        assert_eq!(&bytes[12..14], &[0x00, 0x01]); // one spec
        assert_eq!(&bytes[14..16], &[0x00, 0x01]); // ForceOn code
    }

    #[test]
    fn test_forced_set_reset_requires_bit_address() {
        let (dest, src) = test_addresses();
        let addr = parse_address("D0").unwrap();
        let result = ForcedSetResetCommand::new(
            dest,
            src,
            0x01,
            PlcFamily::Cs,
            vec![ForcedBit {
                address: addr,
                spec: ForceSpec::ForceOn,
            }],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_forced_set_reset_cancel_serialization() {
        let (dest, src) = test_addresses();
        let bytes = ForcedSetResetCancelCommand::new(dest, src, 0x01).to_bytes();
        assert_eq!(&bytes[10..12], &[MRC_FORCED, SRC_FORCED_CANCEL]);
    }

    #[test]
    fn test_multiple_read_command_serialization() {
        let (dest, src) = test_addresses();
        let addrs = vec![parse_address("D100").unwrap(), parse_address("D200").unwrap()];
        let cmd = MultipleReadCommand::new(dest, src, 0x01, PlcFamily::Cs, addrs).unwrap();
        let bytes = cmd.to_bytes().unwrap();

        assert_eq!(&bytes[10..12], &[MRC_MEMORY_READ, SRC_MULTIPLE_READ]);
        assert_eq!(bytes.len(), FINS_HEADER_SIZE + 2 + 8);
    }

    #[test]
    fn test_multiple_read_command_rejects_empty() {
        let (dest, src) = test_addresses();
        assert!(MultipleReadCommand::new(dest, src, 0x01, PlcFamily::Cs, vec![]).is_err());
    }
}
