use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::codec::{Pack, Reader, Unpack, Writer};
use crate::error::CoreError;
use crate::types::name::Name;

/// Highest decimal precision a symbol may carry
pub const MAX_PRECISION: u8 = 18;

/// Largest absolute asset amount
pub const MAX_ASSET_AMOUNT: i64 = (1 << 62) - 1;

/// Up to seven uppercase letters, packed little-endian one byte per letter
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SymbolCode(u64);

impl SymbolCode {
    pub fn new(code: &str) -> Result<Self, CoreError> {
        if code.is_empty() || code.len() > 7 {
            return Err(CoreError::validation(format!(
                "symbol code '{code}' must be 1 to 7 characters"
            )));
        }
        let mut value = 0u64;
        for (i, c) in code.bytes().enumerate() {
            if !c.is_ascii_uppercase() {
                return Err(CoreError::validation(format!(
                    "symbol code '{code}' may only contain A-Z"
                )));
            }
            value |= u64::from(c) << (8 * i);
        }
        Ok(SymbolCode(value))
    }

    pub fn from_u64(value: u64) -> Result<Self, CoreError> {
        let code = SymbolCode(value);
        // Re-validate through the text form so gaps and lowercase are rejected
        SymbolCode::new(&code.to_string())?;
        Ok(code)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SymbolCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut v = self.0;
        while v != 0 {
            write!(f, "{}", (v & 0xff) as u8 as char)?;
            v >>= 8;
        }
        Ok(())
    }
}

impl fmt::Debug for SymbolCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolCode({self})")
    }
}

impl FromStr for SymbolCode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SymbolCode::new(s)
    }
}

/// Precision byte plus symbol code
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Symbol(u64);

impl Symbol {
    pub fn new(precision: u8, code: SymbolCode) -> Result<Self, CoreError> {
        if precision > MAX_PRECISION {
            return Err(CoreError::validation(format!(
                "precision {precision} exceeds maximum of {MAX_PRECISION}"
            )));
        }
        Ok(Symbol((code.as_u64() << 8) | u64::from(precision)))
    }

    pub fn from_u64(value: u64) -> Result<Self, CoreError> {
        let code = SymbolCode::from_u64(value >> 8)?;
        Symbol::new((value & 0xff) as u8, code)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn precision(&self) -> u8 {
        (self.0 & 0xff) as u8
    }

    pub fn code(&self) -> SymbolCode {
        SymbolCode(self.0 >> 8)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.precision(), self.code())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({self})")
    }
}

impl FromStr for Symbol {
    type Err = CoreError;

    /// Parse `"<precision>,<CODE>"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (precision, code) = s
            .split_once(',')
            .ok_or_else(|| CoreError::validation(format!("invalid symbol '{s}'")))?;
        let precision: u8 = precision
            .trim()
            .parse()
            .map_err(|_| CoreError::validation(format!("invalid symbol precision in '{s}'")))?;
        Symbol::new(precision, SymbolCode::new(code.trim())?)
    }
}

/// Signed amount in the smallest unit of a symbol
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Asset {
    amount: i64,
    symbol: Symbol,
}

impl Asset {
    pub fn new(amount: i64, symbol: Symbol) -> Result<Self, CoreError> {
        if !(-MAX_ASSET_AMOUNT..=MAX_ASSET_AMOUNT).contains(&amount) {
            return Err(CoreError::validation(format!(
                "asset amount {amount} is out of range"
            )));
        }
        Ok(Asset { amount, symbol })
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn symbol(&self) -> Symbol {
        self.symbol
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = u32::from(self.symbol.precision());
        let sign = if self.amount < 0 { "-" } else { "" };
        let abs = self.amount.unsigned_abs();
        if precision == 0 {
            return write!(f, "{sign}{abs} {}", self.symbol.code());
        }
        let scale = 10u64.pow(precision);
        write!(
            f,
            "{sign}{}.{:0width$} {}",
            abs / scale,
            abs % scale,
            self.symbol.code(),
            width = precision as usize
        )
    }
}

impl fmt::Debug for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Asset({self})")
    }
}

impl FromStr for Asset {
    type Err = CoreError;

    /// Parse `"<int>[.<fraction>] <CODE>"`; the fraction length sets the precision
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::validation(format!("invalid asset '{s}'"));

        let mut parts = s.split_whitespace();
        let (number, code) = match (parts.next(), parts.next(), parts.next()) {
            (Some(number), Some(code), None) => (number, code),
            _ => return Err(invalid()),
        };

        let (negative, digits) = match number.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, number),
        };
        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, f),
            None => (digits, ""),
        };
        if int_part.is_empty()
            || !int_part.bytes().all(|c| c.is_ascii_digit())
            || !frac_part.bytes().all(|c| c.is_ascii_digit())
            || (digits.contains('.') && frac_part.is_empty())
        {
            return Err(invalid());
        }

        let precision = u8::try_from(frac_part.len()).map_err(|_| invalid())?;
        let magnitude: i64 = format!("{int_part}{frac_part}")
            .parse()
            .map_err(|_| invalid())?;
        let amount = if negative { -magnitude } else { magnitude };

        Asset::new(amount, Symbol::new(precision, SymbolCode::new(code)?)?)
    }
}

/// An asset qualified by the contract that issues it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedAsset {
    pub quantity: Asset,
    pub contract: Name,
}

impl Pack for SymbolCode {
    fn pack(&self, w: &mut Writer) {
        self.0.pack(w);
    }
}

impl Unpack for SymbolCode {
    fn unpack(r: &mut Reader<'_>) -> Result<Self, CoreError> {
        SymbolCode::from_u64(u64::unpack(r)?)
    }
}

impl Pack for Symbol {
    fn pack(&self, w: &mut Writer) {
        self.0.pack(w);
    }
}

impl Unpack for Symbol {
    fn unpack(r: &mut Reader<'_>) -> Result<Self, CoreError> {
        Symbol::from_u64(u64::unpack(r)?)
    }
}

impl Pack for Asset {
    fn pack(&self, w: &mut Writer) {
        self.amount.pack(w);
        self.symbol.pack(w);
    }
}

impl Unpack for Asset {
    fn unpack(r: &mut Reader<'_>) -> Result<Self, CoreError> {
        let amount = i64::unpack(r)?;
        let symbol = Symbol::unpack(r)?;
        Asset::new(amount, symbol)
    }
}

impl Pack for ExtendedAsset {
    fn pack(&self, w: &mut Writer) {
        self.quantity.pack(w);
        self.contract.pack(w);
    }
}

impl Unpack for ExtendedAsset {
    fn unpack(r: &mut Reader<'_>) -> Result<Self, CoreError> {
        Ok(ExtendedAsset {
            quantity: Asset::unpack(r)?,
            contract: Name::unpack(r)?,
        })
    }
}

macro_rules! string_serde {
    ($($t:ty),*) => {
        $(
            impl Serialize for $t {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.collect_str(self)
                }
            }

            impl<'de> Deserialize<'de> for $t {
                fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                    let s = String::deserialize(deserializer)?;
                    s.parse().map_err(serde::de::Error::custom)
                }
            }
        )*
    };
}

string_serde!(SymbolCode, Symbol, Asset);
