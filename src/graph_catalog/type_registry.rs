//! Arena of declared types, indexed by name.
//!
//! Built in two phases so declarations may reference each other in any order:
//! every type name is registered first, then member lists and relationship
//! fields are resolved against the complete set of names.

use std::collections::HashMap;

use super::errors::SchemaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Object,
    /// Union / interface over concrete members.
    Polymorphic { members: Vec<TypeId> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeEntry {
    pub name: String,
    pub kind: TypeKind,
    pub indexed_fields: Vec<String>,
    /// Relationship fields declared on this type.
    pub fields: Vec<String>,
}

impl TypeEntry {
    pub fn is_polymorphic(&self) -> bool {
        matches!(self.kind, TypeKind::Polymorphic { .. })
    }
}

#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: Vec<TypeEntry>,
    by_name: HashMap<String, TypeId>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, entry: TypeEntry) -> Result<TypeId, SchemaError> {
        if self.by_name.contains_key(&entry.name) {
            return Err(SchemaError::DuplicateType { name: entry.name });
        }
        let id = TypeId(self.types.len());
        self.by_name.insert(entry.name.clone(), id);
        self.types.push(entry);
        Ok(id)
    }

    pub fn register_object(
        &mut self,
        name: &str,
        indexed_fields: Vec<String>,
    ) -> Result<TypeId, SchemaError> {
        self.insert(TypeEntry {
            name: name.to_string(),
            kind: TypeKind::Object,
            indexed_fields,
            fields: Vec::new(),
        })
    }

    /// Register a polymorphic type name; members are attached later with
    /// [`TypeRegistry::set_members`].
    pub fn register_polymorphic(&mut self, name: &str) -> Result<TypeId, SchemaError> {
        self.insert(TypeEntry {
            name: name.to_string(),
            kind: TypeKind::Polymorphic {
                members: Vec::new(),
            },
            indexed_fields: Vec::new(),
            fields: Vec::new(),
        })
    }

    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    pub fn resolve(&self, name: &str, context: &str) -> Result<TypeId, SchemaError> {
        self.lookup(name)
            .ok_or_else(|| SchemaError::unknown_type(name, context))
    }

    pub fn get(&self, id: TypeId) -> &TypeEntry {
        &self.types[id.0]
    }

    pub fn name(&self, id: TypeId) -> &str {
        &self.types[id.0].name
    }

    pub fn set_members(&mut self, id: TypeId, member_names: &[String]) -> Result<(), SchemaError> {
        let context = format!("members of `{}`", self.name(id));
        let members = member_names
            .iter()
            .map(|member| self.resolve(member, &context))
            .collect::<Result<Vec<_>, _>>()?;

        self.types[id.0].kind = TypeKind::Polymorphic { members };
        Ok(())
    }

    pub fn add_field(&mut self, id: TypeId, field: &str) -> Result<(), SchemaError> {
        let entry = &mut self.types[id.0];
        if entry.fields.iter().any(|f| f == field) {
            return Err(SchemaError::DuplicateField {
                type_name: entry.name.clone(),
                field: field.to_string(),
            });
        }
        entry.fields.push(field.to_string());
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeEntry)> {
        self.types
            .iter()
            .enumerate()
            .map(|(idx, entry)| (TypeId(idx), entry))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
