use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::loader::RelationshipResolver;
use crate::path_parser::{ast::Relationship, parse_path};
use crate::query_compiler::compile;
use crate::storage_plan::{StorageLayout, StoragePlan};

use super::config::SchemaConfig;
use super::errors::SchemaError;
use super::type_registry::{TypeId, TypeRegistry};

/// A loaded schema: types, relationships, their storage plan and one resolver
/// per relationship field.
///
/// Built once at startup and shared read-only (behind an `Arc`) by every
/// request.
#[derive(Debug)]
pub struct Schema {
    name: Option<String>,
    registry: TypeRegistry,
    relationships: Vec<Relationship>,
    storage_plan: StoragePlan,
    /// type name -> field -> resolver
    resolvers: HashMap<String, HashMap<String, Arc<RelationshipResolver>>>,
}

impl Schema {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        Self::build(&SchemaConfig::from_yaml_file(path)?)
    }

    pub fn build(config: &SchemaConfig) -> Result<Self, SchemaError> {
        let mut registry = TypeRegistry::new();

        // Phase 1: names only.
        for definition in &config.types {
            registry.register_object(&definition.name, definition.indexed_fields.clone())?;
        }
        let mut polymorphic_names: Vec<&String> = config.polymorphic_types.keys().collect();
        polymorphic_names.sort();
        let mut polymorphic: Vec<(&String, TypeId)> = Vec::new();
        for name in polymorphic_names {
            polymorphic.push((name, registry.register_polymorphic(name)?));
        }

        // Phase 2: resolve every reference against the complete registry.
        for (name, id) in polymorphic {
            registry.set_members(id, &config.polymorphic_types[name])?;
        }

        let mut relationships = Vec::with_capacity(config.relationships.len());
        for definition in &config.relationships {
            let relationship = parse_path(
                &definition.field,
                &definition.type_name,
                &definition.to_type,
                definition.non_null,
                &definition.path,
            )?;

            let context = format!("relationship {}", relationship.qualified_name());
            let owner = registry.resolve(&relationship.owner_type, &context)?;
            for segment in &relationship.path {
                registry.resolve(&segment.from_type, &context)?;
                registry.resolve(&segment.to_type, &context)?;
            }
            registry.add_field(owner, &relationship.field_name)?;

            relationships.push(relationship);
        }

        let storage_plan = StoragePlan::build(&relationships, &config.polymorphic_types)?;

        let mut resolvers: HashMap<String, HashMap<String, Arc<RelationshipResolver>>> =
            HashMap::new();
        for relationship in &relationships {
            let compiled = compile(relationship, &storage_plan)?;
            let indexed_fields = registry
                .lookup(&relationship.target_type)
                .map(|id| registry.get(id).indexed_fields.clone())
                .unwrap_or_default();

            resolvers
                .entry(relationship.owner_type.clone())
                .or_default()
                .insert(
                    relationship.field_name.clone(),
                    Arc::new(RelationshipResolver::new(compiled, indexed_fields)),
                );
        }

        log::info!(
            "Schema {}: {} types, {} relationships",
            config.name.as_deref().unwrap_or("<unnamed>"),
            registry.len(),
            relationships.len()
        );

        Ok(Schema {
            name: config.name.clone(),
            registry,
            relationships,
            storage_plan,
            resolvers,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn storage_plan(&self) -> &StoragePlan {
        &self.storage_plan
    }

    pub fn layout(&self) -> StorageLayout {
        self.storage_plan.layout()
    }

    pub fn resolver(&self, type_name: &str, field: &str) -> Option<&Arc<RelationshipResolver>> {
        self.resolvers.get(type_name).and_then(|fields| fields.get(field))
    }
}
