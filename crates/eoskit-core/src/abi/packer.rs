//! Walks a compiled [`TypeNode`] tree to convert between JSON values and
//! wire bytes.

use serde_json::{Map, Value};

use crate::abi::schema::{Abi, CompiledStruct, TypeNode};
use crate::codec::{Reader, Writer};
use crate::error::CoreError;
use crate::types::Name;

/// Deepest type nesting the packer walks before giving up
pub const MAX_NESTING_DEPTH: usize = 128;

fn check_depth(depth: usize) -> Result<(), CoreError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(CoreError::validation(format!(
            "value nests deeper than {MAX_NESTING_DEPTH} levels"
        )));
    }
    Ok(())
}

impl Abi {
    /// Pack a JSON value as `type_name`
    pub fn pack(&self, type_name: &str, value: &Value) -> Result<Vec<u8>, CoreError> {
        let node = self.compile_type(type_name)?;
        let mut w = Writer::new();
        self.pack_node(&node, value, &mut w, 0)?;
        Ok(w.into_bytes())
    }

    /// Pack positional values against a struct's flattened field list
    pub fn pack_positional(&self, type_name: &str, values: &[Value]) -> Result<Vec<u8>, CoreError> {
        let resolved = self.resolve_type(type_name)?;
        let def = self
            .get_struct(resolved)
            .ok_or_else(|| CoreError::schema(format!("'{type_name}' is not a struct")))?;
        let mut w = Writer::new();
        self.pack_positional_fields(def, values, &mut w, 0)?;
        Ok(w.into_bytes())
    }

    /// Pack action arguments using the action's bound type
    pub fn pack_action(&self, action: Name, value: &Value) -> Result<Vec<u8>, CoreError> {
        self.pack(self.action_type(action)?, value)
    }

    pub fn pack_table_row(&self, table: Name, value: &Value) -> Result<Vec<u8>, CoreError> {
        self.pack(self.table_type(table)?, value)
    }

    /// Unpack bytes as `type_name`; every byte must be consumed
    pub fn unpack(&self, type_name: &str, bytes: &[u8]) -> Result<Value, CoreError> {
        let node = self.compile_type(type_name)?;
        let mut r = Reader::new(bytes);
        let value = self.unpack_node(&node, &mut r, 0)?;
        if !r.is_empty() {
            return Err(CoreError::TrailingBytes(r.remaining()));
        }
        Ok(value)
    }

    pub fn unpack_action(&self, action: Name, bytes: &[u8]) -> Result<Value, CoreError> {
        self.unpack(self.action_type(action)?, bytes)
    }

    pub fn unpack_table_row(&self, table: Name, bytes: &[u8]) -> Result<Value, CoreError> {
        self.unpack(self.table_type(table)?, bytes)
    }

    fn pack_node(
        &self,
        node: &TypeNode,
        value: &Value,
        w: &mut Writer,
        depth: usize,
    ) -> Result<(), CoreError> {
        check_depth(depth)?;
        match node {
            TypeNode::Builtin(builtin) => builtin.pack_value(value, w),
            TypeNode::Unsupported(name) => Err(CoreError::UnsupportedType(name.clone())),
            TypeNode::Array(inner) => {
                let items = value.as_array().ok_or_else(|| {
                    CoreError::validation(format!("expected an array, got {value}"))
                })?;
                w.try_write_len(items.len())?;
                for item in items {
                    self.pack_node(inner, item, w, depth + 1)?;
                }
                Ok(())
            }
            TypeNode::Optional(inner) => {
                if value.is_null() {
                    w.write_u8(0);
                    Ok(())
                } else {
                    w.write_u8(1);
                    self.pack_node(inner, value, w, depth + 1)
                }
            }
            TypeNode::Extension(inner) => self.pack_node(inner, value, w, depth + 1),
            TypeNode::Struct(index) => {
                self.pack_struct(&self.structs[*index], value, w, depth + 1)
            }
            TypeNode::Variant(index) => {
                let variant = &self.variants[*index];
                let (case_name, inner) = match value.as_array().map(Vec::as_slice) {
                    Some([Value::String(case_name), inner]) => (case_name, inner),
                    _ => {
                        return Err(CoreError::validation(format!(
                            "variant '{}' expects [\"type\", value], got {value}",
                            variant.name
                        )))
                    }
                };
                let case = variant.case_index(case_name).ok_or_else(|| {
                    CoreError::validation(format!(
                        "'{case_name}' is not a case of variant '{}'",
                        variant.name
                    ))
                })?;
                w.try_write_len(case)?;
                self.pack_node(&variant.cases[case].1, inner, w, depth + 1)
            }
        }
    }

    fn pack_struct(
        &self,
        def: &CompiledStruct,
        value: &Value,
        w: &mut Writer,
        depth: usize,
    ) -> Result<(), CoreError> {
        match value {
            Value::Array(values) => self.pack_positional_fields(def, values, w, depth),
            Value::Object(map) => self.pack_named_fields(def, map, w, depth),
            other => Err(CoreError::validation(format!(
                "struct '{}' expects an object or array, got {other}",
                def.name
            ))),
        }
    }

    fn pack_positional_fields(
        &self,
        def: &CompiledStruct,
        values: &[Value],
        w: &mut Writer,
        depth: usize,
    ) -> Result<(), CoreError> {
        if values.len() < def.required_fields() || values.len() > def.fields.len() {
            return Err(CoreError::ArgumentCountMismatch {
                expected: def.fields.len(),
                got: values.len(),
            });
        }
        for (field, value) in def.fields.iter().zip(values) {
            self.pack_node(&field.node, value, w, depth)?;
        }
        Ok(())
    }

    fn pack_named_fields(
        &self,
        def: &CompiledStruct,
        map: &Map<String, Value>,
        w: &mut Writer,
        depth: usize,
    ) -> Result<(), CoreError> {
        let mut omitted: Option<&str> = None;
        for field in &def.fields {
            match map.get(&field.name) {
                Some(value) => {
                    if let Some(skipped) = omitted {
                        return Err(CoreError::validation(format!(
                            "field '{}' of '{}' follows omitted extension '{skipped}'",
                            field.name, def.name
                        )));
                    }
                    self.pack_node(&field.node, value, w, depth)?;
                }
                None if matches!(field.node, TypeNode::Extension(_)) => {
                    omitted.get_or_insert(field.name.as_str());
                }
                None => {
                    return Err(CoreError::validation(format!(
                        "missing field '{}' of '{}'",
                        field.name, def.name
                    )))
                }
            }
        }
        Ok(())
    }

    fn unpack_node(
        &self,
        node: &TypeNode,
        r: &mut Reader<'_>,
        depth: usize,
    ) -> Result<Value, CoreError> {
        check_depth(depth)?;
        match node {
            TypeNode::Builtin(builtin) => builtin.unpack_value(r),
            TypeNode::Unsupported(name) => Err(CoreError::UnsupportedType(name.clone())),
            TypeNode::Array(inner) => {
                let len = r.read_len()?;
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(self.unpack_node(inner, r, depth + 1)?);
                }
                Ok(Value::Array(items))
            }
            TypeNode::Optional(inner) => match r.read_u8()? {
                0 => Ok(Value::Null),
                1 => self.unpack_node(inner, r, depth + 1),
                flag => Err(CoreError::validation(format!("invalid optional flag {flag}"))),
            },
            TypeNode::Extension(inner) => self.unpack_node(inner, r, depth + 1),
            TypeNode::Struct(index) => {
                let def = &self.structs[*index];
                let mut map = Map::new();
                for field in &def.fields {
                    if r.is_empty() && matches!(field.node, TypeNode::Extension(_)) {
                        break;
                    }
                    map.insert(
                        field.name.clone(),
                        self.unpack_node(&field.node, r, depth + 1)?,
                    );
                }
                Ok(Value::Object(map))
            }
            TypeNode::Variant(index) => {
                let variant = &self.variants[*index];
                let case = r.read_varuint32()? as usize;
                let (case_name, inner) = variant.cases.get(case).ok_or_else(|| {
                    CoreError::validation(format!(
                        "variant '{}' has no case {case}",
                        variant.name
                    ))
                })?;
                Ok(Value::Array(vec![
                    Value::String(case_name.clone()),
                    self.unpack_node(inner, r, depth + 1)?,
                ]))
            }
        }
    }
}
