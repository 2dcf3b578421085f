pub mod bytes;
pub mod name;
pub mod symbol;
pub mod time;
pub mod varint;

pub use bytes::Bytes;
pub use name::{Name, MAX_NAME_LEN};
pub use symbol::{Asset, ExtendedAsset, Symbol, SymbolCode, MAX_ASSET_AMOUNT, MAX_PRECISION};
pub use time::TimePointSec;
pub use varint::VarUint32;
