//! Symbolic PLC memory addressing.
//!
//! FINS memory addresses are written as a short mnemonic (`D`, `CIO`, `W`,
//! `H`, `A`, `T`, `C`, `E0`..`E18`, `IR`, `DR`) followed by a word offset and
//! an optional `.bit` suffix. The wire encoding of an address depends on
//! both the addressing mode (word vs. bit) and the target PLC family: the
//! area code, and sometimes the offset arithmetic, differ between the CV
//! family and the CS/CJ/NJ/NX family.
//!
//! This module owns parsing symbolic strings into [`MemoryAddress`], picking
//! the right area-code table for a [`PlcFamily`], and encoding the result to
//! the 4-byte wire form `[area_code, offset_hi, offset_lo, bit]`.

use crate::error::{FinsError, Result};

/// PLC family, selecting which memory-area code table and offset arithmetic
/// apply to a symbolic address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlcFamily {
    /// CV-series (legacy).
    Cv,
    /// CS-series.
    Cs,
    /// CJ-series (identical tables to CS).
    Cj,
    /// NJ-series (identical tables to CS).
    Nj,
    /// NX-series (identical tables to CS).
    Nx,
}

impl PlcFamily {
    fn uses_cv_tables(self) -> bool {
        matches!(self, PlcFamily::Cv)
    }
}

impl std::fmt::Display for PlcFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PlcFamily::Cv => "CV",
            PlcFamily::Cs => "CS",
            PlcFamily::Cj => "CJ",
            PlcFamily::Nj => "NJ",
            PlcFamily::Nx => "NX",
        };
        write!(f, "{s}")
    }
}

/// A parsed symbolic PLC memory address.
///
/// `bit` is `Some` for bit addresses (e.g. `CIO50.3`), `None` for word
/// addresses (e.g. `D100`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryAddress {
    /// Area mnemonic, e.g. `"D"`, `"CIO"`, `"E5"`.
    pub area: AreaToken,
    /// Word offset within the area.
    pub offset: u16,
    /// Bit index 0-15, if this is a bit address.
    pub bit: Option<u8>,
}

/// Area mnemonic token. A small fixed set, represented as a string-backed
/// enum so unrecognized mnemonics still round-trip through `render`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AreaToken {
    D,
    Cio,
    W,
    H,
    A,
    T,
    C,
    E(u8),
    Ir,
    Dr,
}

impl AreaToken {
    fn parse(s: &str) -> Option<Self> {
        if let Some(rest) = s.strip_prefix('E') {
            if let Ok(n) = rest.parse::<u8>() {
                if n <= 18 {
                    return Some(AreaToken::E(n));
                }
            }
            return None;
        }
        match s {
            "D" => Some(AreaToken::D),
            "CIO" => Some(AreaToken::Cio),
            "W" => Some(AreaToken::W),
            "H" => Some(AreaToken::H),
            "A" => Some(AreaToken::A),
            "T" => Some(AreaToken::T),
            "C" => Some(AreaToken::C),
            "IR" => Some(AreaToken::Ir),
            "DR" => Some(AreaToken::Dr),
            _ => None,
        }
    }

    /// Mnemonic as it appears in a rendered address string.
    pub fn mnemonic(self) -> String {
        match self {
            AreaToken::D => "D".to_string(),
            AreaToken::Cio => "CIO".to_string(),
            AreaToken::W => "W".to_string(),
            AreaToken::H => "H".to_string(),
            AreaToken::A => "A".to_string(),
            AreaToken::T => "T".to_string(),
            AreaToken::C => "C".to_string(),
            AreaToken::E(n) => format!("E{n}"),
            AreaToken::Ir => "IR".to_string(),
            AreaToken::Dr => "DR".to_string(),
        }
    }

    fn is_extended(self) -> bool {
        matches!(self, AreaToken::E(_))
    }
}

/// Parses a symbolic address such as `"D100"`, `"CIO50.3"`, or `"E1_200"`.
///
/// Extended memory banks (`E10`..`E18`) are written with an underscore
/// separating the bank number from the offset (`E10_200`); banks `E0`-`E9`
/// accept either form.
///
/// # Example
///
/// ```
/// use omron_fins::address::{parse_address, AreaToken};
///
/// let addr = parse_address("CIO50.3").unwrap();
/// assert_eq!(addr.area, AreaToken::Cio);
/// assert_eq!(addr.offset, 50);
/// assert_eq!(addr.bit, Some(3));
/// ```
pub fn parse_address(s: &str) -> Result<MemoryAddress> {
    let invalid = || FinsError::invalid_addressing(format!("cannot parse address '{s}'"));

    let (area_part, rest) = if s.contains('_') {
        let mut parts = s.splitn(2, '_');
        let area = parts.next().ok_or_else(invalid)?;
        let rest = parts.next().ok_or_else(invalid)?;
        (area.to_string(), rest.to_string())
    } else {
        let split_at = s.find(|c: char| c.is_ascii_digit()).ok_or_else(invalid)?;
        (s[..split_at].to_string(), s[split_at..].to_string())
    };

    let area = AreaToken::parse(&area_part).ok_or_else(invalid)?;

    let (offset_part, bit_part) = match rest.split_once('.') {
        Some((o, b)) => (o, Some(b)),
        None => (rest.as_str(), None),
    };

    let offset: u16 = offset_part.parse().map_err(|_| invalid())?;
    let bit = match bit_part {
        Some(b) => {
            let v: u8 = b.parse().map_err(|_| invalid())?;
            if v > 15 {
                return Err(FinsError::invalid_addressing(format!(
                    "bit index {v} out of range 0-15"
                )));
            }
            Some(v)
        }
        None => None,
    };

    Ok(MemoryAddress { area, offset, bit })
}

/// Renders a memory address back to its canonical symbolic string.
///
/// `offset_wd`/`offset_bit` let a caller add a word/bit delta before
/// rendering (used by the engine when echoing back relative addresses).
pub fn render_address(addr: MemoryAddress, offset_wd: i32, offset_bit: i32) -> String {
    let offset = (addr.offset as i32 + offset_wd).max(0) as u16;
    let mut s = addr.area.mnemonic();
    if addr.area.is_extended() {
        s.push('_');
    }
    s.push_str(&offset.to_string());
    if let Some(bit) = addr.bit {
        let bit = (bit as i32 + offset_bit).clamp(0, 15) as u8;
        s.push('.');
        s.push_str(&bit.to_string());
    }
    s
}

fn word_area_code(family: PlcFamily, area: AreaToken) -> Option<u8> {
    if family.uses_cv_tables() {
        return match area {
            AreaToken::Cio => Some(0x00),
            AreaToken::W => Some(0x02),
            AreaToken::H => Some(0x01),
            AreaToken::A => Some(0x03),
            AreaToken::D => Some(0x82),
            AreaToken::T => Some(0x81),
            AreaToken::C => Some(0x80),
            _ => None,
        };
    }
    match area {
        AreaToken::Cio => Some(0xB0),
        AreaToken::W => Some(0xB1),
        AreaToken::H => Some(0xB2),
        AreaToken::A => Some(0xB3),
        AreaToken::D => Some(0x82),
        AreaToken::T => Some(0x89),
        AreaToken::C => Some(0x89),
        AreaToken::E(n) => Some(0xA0 + n),
        AreaToken::Ir => Some(0xDC),
        AreaToken::Dr => Some(0xBC),
    }
}

fn bit_area_code(family: PlcFamily, area: AreaToken) -> Option<u8> {
    if family.uses_cv_tables() {
        return match area {
            AreaToken::Cio => Some(0x00),
            AreaToken::W => Some(0x02),
            AreaToken::H => Some(0x01),
            AreaToken::A => Some(0x03),
            _ => None,
        };
    }
    match area {
        AreaToken::Cio => Some(0x30),
        AreaToken::W => Some(0x31),
        AreaToken::H => Some(0x32),
        AreaToken::A => Some(0x33),
        AreaToken::T => Some(0x09),
        AreaToken::C => Some(0x09),
        AreaToken::E(n) => Some(0x20 + n),
        _ => None,
    }
}

/// Applies the family-specific offset arithmetic for word addressing.
fn compute_word_offset(family: PlcFamily, area: AreaToken, offset: u16) -> u16 {
    match area {
        AreaToken::C => {
            if family.uses_cv_tables() {
                offset.wrapping_add(0x0800)
            } else {
                offset.wrapping_add(0x8000)
            }
        }
        AreaToken::A if offset > 447 => {
            if family.uses_cv_tables() {
                offset.wrapping_add(0xB000)
            } else {
                offset.wrapping_add(0x01C0)
            }
        }
        _ => offset,
    }
}

/// Applies the family-specific offset arithmetic for bit addressing.
///
/// Bit addresses are word-addressed times 16 (the bit position within the
/// word is carried separately in the wire form's fourth byte), with the
/// same per-area addition applied after the multiply as the word-offset
/// table uses before it.
fn compute_bit_offset(family: PlcFamily, area: AreaToken, offset: u16) -> u16 {
    let shifted = offset.wrapping_mul(16);
    if family.uses_cv_tables() {
        return match area {
            AreaToken::A if offset > 447 => shifted.wrapping_add(0x0CC0),
            AreaToken::C => shifted.wrapping_add(0x0800),
            _ => shifted,
        };
    }
    match area {
        AreaToken::A if offset > 447 => shifted.wrapping_add(0x01C0),
        AreaToken::C => shifted.wrapping_add(0x8000),
        _ => shifted,
    }
}

/// Encodes a parsed address to the 4-byte FINS wire form for the given PLC
/// family: `[area_code, offset_hi, offset_lo, bit]`.
///
/// # Example
///
/// ```
/// use omron_fins::address::{parse_address, encode_address, PlcFamily};
///
/// let addr = parse_address("D100").unwrap();
/// assert_eq!(encode_address(PlcFamily::Cs, addr).unwrap(), [0x82, 0x00, 0x64, 0x00]);
/// ```
pub fn encode_address(family: PlcFamily, addr: MemoryAddress) -> Result<[u8; 4]> {
    let (area_code, mem_offset, bit_byte) = match addr.bit {
        Some(bit) => {
            let code = bit_area_code(family, addr.area).ok_or_else(|| {
                FinsError::invalid_addressing(format!(
                    "area '{}' does not support bit access for {family} family",
                    addr.area.mnemonic()
                ))
            })?;
            (code, compute_bit_offset(family, addr.area, addr.offset), bit)
        }
        None => {
            let code = word_area_code(family, addr.area).ok_or_else(|| {
                FinsError::invalid_addressing(format!(
                    "area '{}' is not defined for {family} family",
                    addr.area.mnemonic()
                ))
            })?;
            (code, compute_word_offset(family, addr.area, addr.offset), 0)
        }
    };
    Ok([
        area_code,
        (mem_offset >> 8) as u8,
        (mem_offset & 0xFF) as u8,
        bit_byte,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_word_address() {
        let a = parse_address("D100").unwrap();
        assert_eq!(a.area, AreaToken::D);
        assert_eq!(a.offset, 100);
        assert_eq!(a.bit, None);
    }

    #[test]
    fn parse_bit_address() {
        let a = parse_address("CIO50.3").unwrap();
        assert_eq!(a.area, AreaToken::Cio);
        assert_eq!(a.offset, 50);
        assert_eq!(a.bit, Some(3));
    }

    #[test]
    fn parse_extended_address() {
        let a = parse_address("E1_200").unwrap();
        assert_eq!(a.area, AreaToken::E(1));
        assert_eq!(a.offset, 200);
    }

    #[test]
    fn parse_rejects_bad_bit() {
        assert!(parse_address("CIO1.16").is_err());
    }

    #[test]
    fn render_round_trip() {
        for s in ["D100", "CIO50.3", "E1_200"] {
            let parsed = parse_address(s).unwrap();
            assert_eq!(render_address(parsed, 0, 0), s);
        }
    }

    #[test]
    fn encode_scenario_1_d100() {
        let a = parse_address("D100").unwrap();
        assert_eq!(encode_address(PlcFamily::Cs, a).unwrap(), [0x82, 0x00, 0x64, 0x00]);
    }

    #[test]
    fn encode_scenario_2_cio_bit() {
        let a = parse_address("CIO50.3").unwrap();
        assert_eq!(encode_address(PlcFamily::Cs, a).unwrap(), [0x30, 0x03, 0x20, 0x03]);
    }

    #[test]
    fn encode_scenario_3_extended() {
        let a = parse_address("E1_200").unwrap();
        assert_eq!(encode_address(PlcFamily::Cs, a).unwrap(), [0xA1, 0x00, 0xC8, 0x00]);
    }

    #[test]
    fn encode_scenario_4_counter_offset() {
        let a = parse_address("C5").unwrap();
        assert_eq!(encode_address(PlcFamily::Cs, a).unwrap(), [0x89, 0x80, 0x05, 0x00]);
    }

    #[test]
    fn encode_dm_area_rejects_bit_access() {
        let a = parse_address("D100.1").unwrap();
        assert!(encode_address(PlcFamily::Cs, a).is_err());
    }

    #[test]
    fn cv_family_uses_distinct_tables() {
        let a = parse_address("D10").unwrap();
        assert_eq!(encode_address(PlcFamily::Cv, a).unwrap()[0], 0x82);
        let a = parse_address("CIO10").unwrap();
        assert_eq!(encode_address(PlcFamily::Cv, a).unwrap()[0], 0x00);
    }
}
