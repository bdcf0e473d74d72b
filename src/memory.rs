//! Convenience wrapper over the general address codec for the handful of
//! memory areas most programs touch.
//!
//! [`crate::address`] supports every FINS memory area across every PLC
//! family via symbolic strings (`"D100"`, `"CIO50.3"`, ...). [`WellKnownArea`]
//! exists only so callers who always work with `CIO`/`D`/`W`/`H`/`A` don't
//! have to hand-format those strings themselves.

use crate::address::AreaToken;

/// One of the handful of memory areas common to nearly every PLC program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnownArea {
    /// CIO (Core I/O) area - general purpose I/O and internal relays.
    Cio,
    /// W (Work) area - work bits/words.
    W,
    /// H (Holding) area - holding bits/words that retain values.
    H,
    /// D (Data Memory) area - word-only data storage.
    D,
    /// A (Auxiliary) area.
    A,
}

impl WellKnownArea {
    /// The mnemonic token consumed by [`crate::address::parse_address`]'s
    /// output type.
    pub fn token(self) -> AreaToken {
        match self {
            WellKnownArea::Cio => AreaToken::Cio,
            WellKnownArea::W => AreaToken::W,
            WellKnownArea::H => AreaToken::H,
            WellKnownArea::D => AreaToken::D,
            WellKnownArea::A => AreaToken::A,
        }
    }

    /// Builds the symbolic word-address string `"<area><offset>"`.
    ///
    /// # Example
    ///
    /// ```
    /// use omron_fins::WellKnownArea;
    ///
    /// assert_eq!(WellKnownArea::D.word(100), "D100");
    /// ```
    pub fn word(self, offset: u16) -> String {
        format!("{}{}", self.token().mnemonic(), offset)
    }

    /// Builds the symbolic bit-address string `"<area><offset>.<bit>"`.
    ///
    /// # Example
    ///
    /// ```
    /// use omron_fins::WellKnownArea;
    ///
    /// assert_eq!(WellKnownArea::Cio.bit(50, 3), "CIO50.3");
    /// ```
    pub fn bit(self, offset: u16, bit: u8) -> String {
        format!("{}{}.{}", self.token().mnemonic(), offset, bit)
    }
}

impl std::fmt::Display for WellKnownArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token().mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_string() {
        assert_eq!(WellKnownArea::D.word(100), "D100");
        assert_eq!(WellKnownArea::Cio.word(0), "CIO0");
    }

    #[test]
    fn test_bit_string() {
        assert_eq!(WellKnownArea::Cio.bit(50, 3), "CIO50.3");
    }

    #[test]
    fn test_display() {
        assert_eq!(WellKnownArea::Cio.to_string(), "CIO");
        assert_eq!(WellKnownArea::D.to_string(), "D");
    }
}
