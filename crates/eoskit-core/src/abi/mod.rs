pub mod builtin;
pub mod def;
pub mod packer;
pub mod registry;
pub mod schema;

pub use builtin::{BuiltinType, ProtocolStruct, UNSUPPORTED_TYPES};
pub use def::{
    AbiDef, ActionDef, ClausePair, ErrorMessage, FieldDef, StructDef, TableDef, TypeDef,
    VariantDef,
};
pub use registry::AbiRegistry;
pub use schema::{Abi, CompiledField, CompiledStruct, CompiledVariant, TypeNode};
