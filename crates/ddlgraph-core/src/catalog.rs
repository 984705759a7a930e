use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::graph::Edge;
use crate::identity::{ObjectId, ObjectKind};
use crate::index::Index;
use crate::object::SchemaObject;
use crate::routine::Routine;
use crate::schema::Table;

/// Loaded schema objects keyed by identity.
///
/// This is the context threaded from the loader through the graph builder to
/// the serializer; nothing mutates it once loading has finished.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    objects: BTreeMap<ObjectId, SchemaObject>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object; a second object with the same identity is rejected.
    pub fn insert(&mut self, object: impl Into<SchemaObject>) -> Result<ObjectId> {
        let object = object.into();
        let id = object.id();
        if self.objects.contains_key(&id) {
            return Err(Error::InvalidCatalog(format!("duplicate object {id}")));
        }
        self.objects.insert(id.clone(), object);
        Ok(id)
    }

    pub fn get(&self, id: &ObjectId) -> Option<&SchemaObject> {
        self.objects.get(id)
    }

    pub fn get_mut(&mut self, id: &ObjectId) -> Option<&mut SchemaObject> {
        self.objects.get_mut(id)
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ObjectId> {
        self.objects.keys()
    }

    pub fn objects(&self) -> impl Iterator<Item = &SchemaObject> {
        self.objects.values()
    }

    pub fn table(&self, schema: &str, name: &str) -> Option<&Table> {
        self.objects
            .get(&ObjectId::table(schema, name))
            .and_then(SchemaObject::as_table)
    }

    pub fn table_mut(&mut self, schema: &str, name: &str) -> Option<&mut Table> {
        match self.objects.get_mut(&ObjectId::table(schema, name)) {
            Some(SchemaObject::Table(table)) => Some(table),
            _ => None,
        }
    }

    pub fn index_mut(&mut self, schema: &str, name: &str) -> Option<&mut Index> {
        match self.objects.get_mut(&ObjectId::index(schema, name)) {
            Some(SchemaObject::Index(index)) => Some(index),
            _ => None,
        }
    }

    pub fn routine_mut(&mut self, id: &ObjectId) -> Option<&mut Routine> {
        match self.objects.get_mut(id) {
            Some(SchemaObject::Routine(routine)) => Some(routine),
            _ => None,
        }
    }

    /// Routines sharing a schema and name, i.e. every overload.
    pub fn find_routines(&self, schema: &str, name: &str) -> Vec<&ObjectId> {
        let schema = schema.trim();
        let name = name.trim();
        self.objects
            .keys()
            .filter(|id| id.kind == ObjectKind::Routine && id.schema == schema && id.name == name)
            .collect()
    }

    /// Edges implied by the loaded objects themselves: constraints, indexes
    /// and triggers on their table, tables on the tables their foreign keys
    /// reference, and foreign keys on the referenced key.
    pub fn intrinsic_edges(&self) -> Vec<Edge> {
        let mut edges = Vec::new();
        for object in self.objects.values() {
            let id = object.id();
            for dependency in object.intrinsic_dependencies() {
                edges.push(Edge::new(id.clone(), dependency));
            }
            if let SchemaObject::Constraint(constraint) = object {
                if let Some(referenced) = constraint.referenced_table_id() {
                    let owner = constraint.table_id();
                    if referenced != owner {
                        edges.push(Edge::new(owner, referenced));
                    }
                }
            }
        }
        edges
    }

    /// Foreign keys whose owning and referenced tables are both in `tables`
    /// and differ from each other.
    pub fn foreign_keys_between(&self, tables: &[ObjectId]) -> Vec<ObjectId> {
        self.objects
            .values()
            .filter_map(|object| match object {
                SchemaObject::Constraint(constraint) => Some(constraint),
                _ => None,
            })
            .filter(|constraint| {
                let owner = constraint.table_id();
                constraint.referenced_table_id().is_some_and(|referenced| {
                    referenced != owner && tables.contains(&owner) && tables.contains(&referenced)
                })
            })
            .map(|constraint| constraint.id())
            .collect()
    }
}
