//! Metadata tokens: table id plus 1-based row id packed into a `u32`.

use std::fmt;

/// A metadata token referencing a row in a metadata table.
///
/// The high byte carries the table id and the low 24 bits the 1-based row id. Symbol
/// lookups in this crate are token driven: a `MethodDef` token from the type walk is
/// what keys the `MethodDebugInformation` query, names never are.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(pub u32);

impl Token {
    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Creates a token from a table id and a 1-based row id
    #[must_use]
    pub fn from_parts(table: u8, row: u32) -> Self {
        Token((u32::from(table) << 24) | (row & 0x00FF_FFFF))
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the table id from the token (high byte)
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Extracts the row id from the token (low 24 bits)
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns true if this is a null token (value 0)
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parts() {
        let token = Token::from_parts(0x06, 1);
        assert_eq!(token.value(), 0x0600_0001);
        assert_eq!(token.table(), 0x06);
        assert_eq!(token.row(), 1);
    }

    #[test]
    fn row_masking() {
        let token = Token::from_parts(0x31, 0xFFFF_FFFF);
        assert_eq!(token.table(), 0x31);
        assert_eq!(token.row(), 0x00FF_FFFF);
    }

    #[test]
    fn null() {
        assert!(Token(0).is_null());
        assert!(!Token(0x0200_0001).is_null());
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Token(0x0600_0001)), "0x06000001");
        let debug = format!("{:?}", Token(0x0600_0001));
        assert!(debug.contains("table: 0x06"));
        assert!(debug.contains("row: 1"));
    }
}
