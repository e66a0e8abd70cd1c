//! Physical layout implied by a [`StoragePlan`]: the columns, tables, constraints
//! and indices a migration tool needs to create.

use serde::{Deserialize, Serialize};

use crate::connection::SEQUENCE_FIELD;
use crate::graph_catalog::naming::table_name;

use super::{Storage, StoragePlan};

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKeyColumn {
    pub table: String,
    pub column: String,
    /// `None` when the referenced type is polymorphic: there is no single table
    /// a constraint could point at.
    pub references: Option<String>,
    pub non_null: bool,
    pub indexed: bool,
    pub signature: String,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinColumn {
    pub name: String,
    pub references: Option<String>,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinTable {
    pub name: String,
    pub left_column: JoinColumn,
    pub right_column: JoinColumn,
    pub unique: Vec<String>,
    pub indexed: Vec<String>,
    pub signature: String,
}

/// `table(Union)` as a `UNION ALL` view over its member tables. Queries whose
/// target (or an intermediate type) is polymorphic select from it.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolymorphicView {
    pub name: String,
    pub type_name: String,
    /// Member tables, in declaration order.
    pub members: Vec<String>,
    /// Columns every member contributes: `id`, `seq` and the foreign keys
    /// stored on the polymorphic type.
    pub columns: Vec<String>,
}

#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageLayout {
    pub foreign_keys: Vec<ForeignKeyColumn>,
    pub join_tables: Vec<JoinTable>,
    pub polymorphic_views: Vec<PolymorphicView>,
}

impl StorageLayout {
    /// Foreign-key columns that live on `table`.
    pub fn columns_on<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a ForeignKeyColumn> {
        self.foreign_keys.iter().filter(move |fk| fk.table == table)
    }
}

impl StoragePlan {
    pub fn layout(&self) -> StorageLayout {
        let mut layout = StorageLayout::default();

        for description in self.descriptions() {
            let signature = &description.pair.signature;
            match &description.storage {
                Storage::ForeignKey(fk) => {
                    let references = self.constraint_target(&fk.referenced_type);
                    for owner in self.concrete_types(&fk.owning_type) {
                        layout.foreign_keys.push(ForeignKeyColumn {
                            table: table_name(owner),
                            column: fk.column.clone(),
                            references: references.clone(),
                            non_null: fk.non_null,
                            indexed: true,
                            signature: signature.clone(),
                        });
                    }
                }
                Storage::Join(join) => {
                    layout.join_tables.push(JoinTable {
                        name: join.name.clone(),
                        left_column: JoinColumn {
                            name: join.left_column_name.clone(),
                            references: self.constraint_target(&join.left_type),
                        },
                        right_column: JoinColumn {
                            name: join.right_column_name.clone(),
                            references: self.constraint_target(&join.right_type),
                        },
                        unique: vec![
                            join.left_column_name.clone(),
                            join.right_column_name.clone(),
                        ],
                        indexed: vec![join.right_column_name.clone()],
                        signature: signature.clone(),
                    });
                }
            }
        }

        for type_name in self.queried_types() {
            let Some(members) = self.polymorphic_types().get(type_name) else {
                continue;
            };
            let mut columns = vec!["id".to_string(), SEQUENCE_FIELD.to_string()];
            for description in self.descriptions() {
                if let Storage::ForeignKey(fk) = &description.storage {
                    if fk.owning_type == type_name && !columns.contains(&fk.column) {
                        columns.push(fk.column.clone());
                    }
                }
            }
            layout.polymorphic_views.push(PolymorphicView {
                name: table_name(type_name),
                type_name: type_name.to_string(),
                members: members.iter().map(|member| table_name(member)).collect(),
                columns,
            });
        }

        log::debug!(
            "Storage layout: {} foreign key columns, {} join tables, {} polymorphic views",
            layout.foreign_keys.len(),
            layout.join_tables.len(),
            layout.polymorphic_views.len()
        );
        layout
    }

    fn constraint_target(&self, type_name: &str) -> Option<String> {
        if self.polymorphic_types().contains_key(type_name) {
            None
        } else {
            Some(table_name(type_name))
        }
    }
}
