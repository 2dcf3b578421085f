use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::abi::builtin::{BuiltinType, UNSUPPORTED_TYPES};
use crate::abi::def::AbiDef;
use crate::error::CoreError;
use crate::serialize;
use crate::types::Name;

/// Bound on alias and base-struct chains
const MAX_RESOLVE_DEPTH: usize = 32;

/// Compiled type tree walked by the packer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeNode {
    Builtin(BuiltinType),
    /// Known name without a codec; fails when packed or unpacked
    Unsupported(String),
    /// `T[]`
    Array(Box<TypeNode>),
    /// `T?`
    Optional(Box<TypeNode>),
    /// `T$`, may be absent at the end of a struct
    Extension(Box<TypeNode>),
    /// Index into [`Abi::structs`]
    Struct(usize),
    /// Index into [`Abi::variants`]
    Variant(usize),
}

#[derive(Debug, Clone)]
pub struct CompiledField {
    pub name: String,
    pub type_name: String,
    pub node: TypeNode,
}

/// Struct with base fields flattened in front of its own
#[derive(Debug, Clone)]
pub struct CompiledStruct {
    pub name: String,
    pub fields: Vec<CompiledField>,
}

impl CompiledStruct {
    /// Fields that must be supplied; trailing `$` fields are optional
    pub fn required_fields(&self) -> usize {
        let trailing = self
            .fields
            .iter()
            .rev()
            .take_while(|f| matches!(f.node, TypeNode::Extension(_)))
            .count();
        self.fields.len() - trailing
    }
}

#[derive(Debug, Clone)]
pub struct CompiledVariant {
    pub name: String,
    pub cases: Vec<(String, TypeNode)>,
}

impl CompiledVariant {
    pub fn case_index(&self, type_name: &str) -> Option<usize> {
        self.cases.iter().position(|(name, _)| name == type_name)
    }
}

/// Contract ABI compiled for packing and unpacking.
///
/// Immutable once built, so a single instance can be shared across threads.
#[derive(Debug, Clone)]
pub struct Abi {
    def: AbiDef,
    aliases: HashMap<String, String>,
    struct_index: HashMap<String, usize>,
    variant_index: HashMap<String, usize>,
    pub(crate) structs: Vec<CompiledStruct>,
    pub(crate) variants: Vec<CompiledVariant>,
    actions: HashMap<Name, String>,
    tables: HashMap<Name, String>,
}

impl Abi {
    /// Compile an ABI definition, rejecting unknown types and cycles
    pub fn new(def: AbiDef) -> Result<Self, CoreError> {
        let mut abi = Abi {
            aliases: HashMap::new(),
            struct_index: HashMap::new(),
            variant_index: HashMap::new(),
            structs: Vec::with_capacity(def.structs.len()),
            variants: Vec::with_capacity(def.variants.len()),
            actions: HashMap::new(),
            tables: HashMap::new(),
            def,
        };

        for t in &abi.def.types {
            if abi
                .aliases
                .insert(t.new_type_name.clone(), t.ty.clone())
                .is_some()
            {
                return Err(CoreError::schema(format!(
                    "duplicate type alias '{}'",
                    t.new_type_name
                )));
            }
        }
        for (i, s) in abi.def.structs.iter().enumerate() {
            if abi.struct_index.insert(s.name.clone(), i).is_some() {
                return Err(CoreError::schema(format!("duplicate struct '{}'", s.name)));
            }
        }
        for (i, v) in abi.def.variants.iter().enumerate() {
            if abi.variant_index.insert(v.name.clone(), i).is_some() {
                return Err(CoreError::schema(format!("duplicate variant '{}'", v.name)));
            }
        }

        for t in &abi.def.types {
            abi.compile_type(&t.new_type_name)?;
        }

        // Indices are known up front, so nested and recursive references compile
        let mut structs = Vec::with_capacity(abi.def.structs.len());
        for i in 0..abi.def.structs.len() {
            structs.push(abi.compile_struct(i)?);
        }
        let mut variants = Vec::with_capacity(abi.def.variants.len());
        for v in &abi.def.variants {
            let cases = v
                .types
                .iter()
                .map(|t| Ok((t.clone(), abi.compile_type(t)?)))
                .collect::<Result<Vec<_>, CoreError>>()?;
            variants.push(CompiledVariant {
                name: v.name.clone(),
                cases,
            });
        }
        abi.structs = structs;
        abi.variants = variants;
        abi.check_finite_structs()?;

        for a in &abi.def.actions {
            abi.compile_type(&a.ty)?;
            abi.actions.insert(a.name, a.ty.clone());
        }
        for t in &abi.def.tables {
            abi.compile_type(&t.ty)?;
            abi.tables.insert(t.name, t.ty.clone());
        }

        debug!(
            "Compiled ABI {}: {} structs, {} actions, {} tables",
            abi.def.version,
            abi.structs.len(),
            abi.actions.len(),
            abi.tables.len()
        );
        Ok(abi)
    }

    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Abi::new(serialize::from_json(json)?)
    }

    /// Compile from the binary form served by `get_raw_abi`
    pub fn from_packed(bytes: &[u8]) -> Result<Self, CoreError> {
        Abi::new(serialize::from_bytes(bytes)?)
    }

    pub fn def(&self) -> &AbiDef {
        &self.def
    }

    /// Type bound to an action
    pub fn action_type(&self, action: Name) -> Result<&str, CoreError> {
        self.actions
            .get(&action)
            .map(String::as_str)
            .ok_or_else(|| CoreError::schema(format!("unknown action '{action}'")))
    }

    /// Row type bound to a table
    pub fn table_type(&self, table: Name) -> Result<&str, CoreError> {
        self.tables
            .get(&table)
            .map(String::as_str)
            .ok_or_else(|| CoreError::schema(format!("unknown table '{table}'")))
    }

    /// Follow alias chains to the underlying type name
    pub fn resolve_type<'a>(&'a self, name: &'a str) -> Result<&'a str, CoreError> {
        let mut current = name;
        for _ in 0..MAX_RESOLVE_DEPTH {
            match self.aliases.get(current) {
                Some(next) => current = next,
                None => return Ok(current),
            }
        }
        Err(CoreError::schema(format!("alias cycle through '{name}'")))
    }

    pub fn get_struct(&self, name: &str) -> Option<&CompiledStruct> {
        self.struct_index.get(name).map(|&i| &self.structs[i])
    }

    /// Compile a type expression such as `name`, `transfer[]` or `asset?`
    pub fn compile_type(&self, ty: &str) -> Result<TypeNode, CoreError> {
        self.compile_type_depth(ty, 0)
    }

    fn compile_type_depth(&self, ty: &str, depth: usize) -> Result<TypeNode, CoreError> {
        if depth > MAX_RESOLVE_DEPTH {
            return Err(CoreError::schema(format!("alias cycle through '{ty}'")));
        }
        if let Some(inner) = ty.strip_suffix('$') {
            return Ok(TypeNode::Extension(Box::new(
                self.compile_type_depth(inner, depth)?,
            )));
        }
        if let Some(inner) = ty.strip_suffix('?') {
            return Ok(TypeNode::Optional(Box::new(
                self.compile_type_depth(inner, depth)?,
            )));
        }
        if let Some(inner) = ty.strip_suffix("[]") {
            return Ok(TypeNode::Array(Box::new(
                self.compile_type_depth(inner, depth)?,
            )));
        }
        if let Some(target) = self.aliases.get(ty) {
            return self.compile_type_depth(target, depth + 1);
        }
        if let Some(&i) = self.struct_index.get(ty) {
            return Ok(TypeNode::Struct(i));
        }
        if let Some(&i) = self.variant_index.get(ty) {
            return Ok(TypeNode::Variant(i));
        }
        if let Some(builtin) = BuiltinType::lookup(ty) {
            return Ok(TypeNode::Builtin(builtin));
        }
        if UNSUPPORTED_TYPES.contains(&ty) {
            return Ok(TypeNode::Unsupported(ty.to_string()));
        }
        Err(CoreError::schema(format!("unknown type '{ty}'")))
    }

    /// Reject structs that embed themselves by value.
    ///
    /// Only direct `Struct` fields are followed; an array, optional,
    /// extension or variant in between gives the type a finite encoding.
    fn check_finite_structs(&self) -> Result<(), CoreError> {
        const UNVISITED: u8 = 0;
        const ACTIVE: u8 = 1;
        const DONE: u8 = 2;

        let mut state = vec![UNVISITED; self.structs.len()];
        for start in 0..self.structs.len() {
            if state[start] != UNVISITED {
                continue;
            }
            // (struct, next field to inspect)
            let mut stack = vec![(start, 0usize)];
            state[start] = ACTIVE;
            while let Some((current, next)) = stack.pop() {
                let fields = &self.structs[current].fields;
                let Some(field) = fields.get(next) else {
                    state[current] = DONE;
                    continue;
                };
                stack.push((current, next + 1));
                if let TypeNode::Struct(inner) = field.node {
                    match state[inner] {
                        ACTIVE => {
                            return Err(CoreError::schema(format!(
                                "struct '{}' contains itself through field '{}'",
                                self.structs[inner].name, field.name
                            )))
                        }
                        UNVISITED => {
                            state[inner] = ACTIVE;
                            stack.push((inner, 0));
                        }
                        _ => {}
                    }
                }
            }
        }
        Ok(())
    }

    fn compile_struct(&self, index: usize) -> Result<CompiledStruct, CoreError> {
        let root = &self.def.structs[index];

        // Walk base links up to the root, then emit fields top-down
        let mut chain = vec![index];
        let mut seen = HashSet::from([index]);
        let mut current = root;
        while !current.base.is_empty() {
            let base_name = self.resolve_type(&current.base)?;
            let &base = self.struct_index.get(base_name).ok_or_else(|| {
                CoreError::schema(format!(
                    "struct '{}' has unknown base '{}'",
                    current.name, current.base
                ))
            })?;
            if !seen.insert(base) {
                return Err(CoreError::schema(format!(
                    "struct '{}' inherits from itself",
                    root.name
                )));
            }
            chain.push(base);
            current = &self.def.structs[base];
        }

        let mut fields = Vec::new();
        for &i in chain.iter().rev() {
            for field in &self.def.structs[i].fields {
                fields.push(CompiledField {
                    name: field.name.clone(),
                    type_name: field.ty.clone(),
                    node: self.compile_type(&field.ty)?,
                });
            }
        }
        Ok(CompiledStruct {
            name: root.name.clone(),
            fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn abi_from(value: serde_json::Value) -> Result<Abi, CoreError> {
        Abi::new(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn test_alias_chain_resolves() {
        let abi = abi_from(json!({
            "version": "eosio::abi/1.1",
            "types": [
                {"new_type_name": "account", "type": "user"},
                {"new_type_name": "user", "type": "name"}
            ],
            "structs": [{"name": "s", "base": "", "fields": [{"name": "who", "type": "account[]"}]}]
        }))
        .unwrap();
        assert_eq!(abi.resolve_type("account").unwrap(), "name");
        assert_eq!(
            abi.get_struct("s").unwrap().fields[0].node,
            TypeNode::Array(Box::new(TypeNode::Builtin(BuiltinType::Name)))
        );
    }

    #[test]
    fn test_alias_cycle_rejected() {
        let err = abi_from(json!({
            "version": "eosio::abi/1.1",
            "types": [
                {"new_type_name": "a", "type": "b"},
                {"new_type_name": "b", "type": "a"}
            ],
            "structs": [{"name": "s", "base": "", "fields": [{"name": "x", "type": "a"}]}]
        }))
        .unwrap_err();
        assert!(matches!(err, CoreError::Schema(_)));
    }

    #[test]
    fn test_unknown_field_type_rejected() {
        let err = abi_from(json!({
            "version": "eosio::abi/1.1",
            "structs": [{"name": "s", "base": "", "fields": [{"name": "x", "type": "nosuch"}]}]
        }))
        .unwrap_err();
        assert!(matches!(err, CoreError::Schema(msg) if msg.contains("nosuch")));
    }

    #[test]
    fn test_base_fields_come_first() {
        let abi = abi_from(json!({
            "version": "eosio::abi/1.1",
            "structs": [
                {"name": "child", "base": "parent", "fields": [{"name": "c", "type": "uint8"}]},
                {"name": "parent", "base": "grand", "fields": [{"name": "b", "type": "uint8"}]},
                {"name": "grand", "base": "", "fields": [{"name": "a", "type": "uint8"}]}
            ]
        }))
        .unwrap();
        let names: Vec<_> = abi
            .get_struct("child")
            .unwrap()
            .fields
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_base_cycle_rejected() {
        let err = abi_from(json!({
            "version": "eosio::abi/1.1",
            "structs": [
                {"name": "a", "base": "b", "fields": []},
                {"name": "b", "base": "a", "fields": []}
            ]
        }))
        .unwrap_err();
        assert!(matches!(err, CoreError::Schema(_)));
    }

    #[test]
    fn test_self_containing_struct_rejected() {
        let err = abi_from(json!({
            "version": "eosio::abi/1.1",
            "structs": [{"name": "loop", "base": "", "fields": [{"name": "next", "type": "loop"}]}]
        }))
        .unwrap_err();
        assert!(matches!(err, CoreError::Schema(msg) if msg.contains("loop")));

        let err = abi_from(json!({
            "version": "eosio::abi/1.1",
            "structs": [
                {"name": "a", "base": "", "fields": [{"name": "b", "type": "b"}]},
                {"name": "b", "base": "", "fields": [{"name": "x", "type": "uint8"}, {"name": "a", "type": "a"}]}
            ]
        }))
        .unwrap_err();
        assert!(matches!(err, CoreError::Schema(_)));
    }

    #[test]
    fn test_recursion_through_array_allowed() {
        let abi = abi_from(json!({
            "version": "eosio::abi/1.1",
            "structs": [
                {"name": "node", "base": "", "fields": [{"name": "kids", "type": "node[]"}]},
                {"name": "link", "base": "", "fields": [{"name": "next", "type": "link?"}]}
            ]
        }))
        .unwrap();
        assert_eq!(
            abi.get_struct("node").unwrap().fields[0].node,
            TypeNode::Array(Box::new(TypeNode::Struct(0)))
        );
    }

    #[test]
    fn test_unsupported_types_compile() {
        let abi = abi_from(json!({
            "version": "eosio::abi/1.1",
            "structs": [{"name": "s", "base": "", "fields": [{"name": "x", "type": "float64"}]}]
        }))
        .unwrap();
        assert_eq!(
            abi.get_struct("s").unwrap().fields[0].node,
            TypeNode::Unsupported("float64".into())
        );
    }

    #[test]
    fn test_abi_struct_shadows_builtin() {
        let abi = abi_from(json!({
            "version": "eosio::abi/1.1",
            "structs": [{"name": "action", "base": "", "fields": [{"name": "x", "type": "uint8"}]}]
        }))
        .unwrap();
        assert_eq!(abi.compile_type("action").unwrap(), TypeNode::Struct(0));
    }

    #[test]
    fn test_unknown_action() {
        let abi = abi_from(json!({"version": "eosio::abi/1.1"})).unwrap();
        assert!(matches!(
            abi.action_type(Name::new("transfer").unwrap()),
            Err(CoreError::Schema(_))
        ));
    }
}
