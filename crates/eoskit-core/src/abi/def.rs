use serde::{Deserialize, Serialize};

use crate::codec::{Pack, Reader, Unpack, Writer};
use crate::error::CoreError;
use crate::packable_struct;
use crate::protocol::Extension;
use crate::types::Name;

/// `new_type_name` is an alias for `type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDef {
    pub new_type_name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

packable_struct!(TypeDef { new_type_name, ty });

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

packable_struct!(FieldDef { name, ty });

/// Struct layout; `base` is empty when there is none
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructDef {
    pub name: String,
    #[serde(default)]
    pub base: String,
    pub fields: Vec<FieldDef>,
}

packable_struct!(StructDef { name, base, fields });

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDef {
    pub name: Name,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub ricardian_contract: String,
}

packable_struct!(ActionDef {
    name,
    ty,
    ricardian_contract
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDef {
    pub name: Name,
    #[serde(default)]
    pub index_type: String,
    #[serde(default)]
    pub key_names: Vec<String>,
    #[serde(default)]
    pub key_types: Vec<String>,
    #[serde(rename = "type")]
    pub ty: String,
}

packable_struct!(TableDef {
    name,
    index_type,
    key_names,
    key_types,
    ty
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClausePair {
    pub id: String,
    pub body: String,
}

packable_struct!(ClausePair { id, body });

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub error_code: u64,
    pub error_msg: String,
}

packable_struct!(ErrorMessage {
    error_code,
    error_msg
});

/// Tagged union over a list of types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantDef {
    pub name: String,
    pub types: Vec<String>,
}

packable_struct!(VariantDef { name, types });

/// Contract ABI as published on chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiDef {
    pub version: String,
    #[serde(default)]
    pub types: Vec<TypeDef>,
    #[serde(default)]
    pub structs: Vec<StructDef>,
    #[serde(default)]
    pub actions: Vec<ActionDef>,
    #[serde(default)]
    pub tables: Vec<TableDef>,
    #[serde(default)]
    pub ricardian_clauses: Vec<ClausePair>,
    #[serde(default)]
    pub error_messages: Vec<ErrorMessage>,
    #[serde(default)]
    pub abi_extensions: Vec<Extension>,
    #[serde(default)]
    pub variants: Vec<VariantDef>,
}

impl Default for AbiDef {
    fn default() -> Self {
        AbiDef {
            version: "eosio::abi/1.1".into(),
            types: Vec::new(),
            structs: Vec::new(),
            actions: Vec::new(),
            tables: Vec::new(),
            ricardian_clauses: Vec::new(),
            error_messages: Vec::new(),
            abi_extensions: Vec::new(),
            variants: Vec::new(),
        }
    }
}

impl Pack for AbiDef {
    fn pack(&self, w: &mut Writer) {
        self.version.pack(w);
        self.types.pack(w);
        self.structs.pack(w);
        self.actions.pack(w);
        self.tables.pack(w);
        self.ricardian_clauses.pack(w);
        self.error_messages.pack(w);
        self.abi_extensions.pack(w);
        self.variants.pack(w);
    }
}

impl Unpack for AbiDef {
    fn unpack(r: &mut Reader<'_>) -> Result<Self, CoreError> {
        let version = String::unpack(r)?;
        let types = Vec::unpack(r)?;
        let structs = Vec::unpack(r)?;
        let actions = Vec::unpack(r)?;
        let tables = Vec::unpack(r)?;
        let ricardian_clauses = Vec::unpack(r)?;
        let error_messages = Vec::unpack(r)?;
        let abi_extensions = Vec::unpack(r)?;
        // ABIs older than 1.1 end before the variant list
        let variants = if r.is_empty() {
            Vec::new()
        } else {
            Vec::unpack(r)?
        };
        Ok(AbiDef {
            version,
            types,
            structs,
            actions,
            tables,
            ricardian_clauses,
            error_messages,
            abi_extensions,
            variants,
        })
    }
}
