//! Relationship declarations.
//!
//! A record type declares named links to other record types in
//! [`Model::declare`]. Each link is a [`Nexus`]: a set of column equalities
//! between the owner and the related table, optionally narrowed by fixed
//! predicates on the related table. Relationships that are not equi-joins,
//! such as aggregate counts, are declared with a handler computing one value
//! per owner instead.
//!
//! ```ignore
//! fn declare(relations: &mut Relations) {
//!     relations.has_many::<Book>("books", Nexus::new().on("id", "user_id"));
//! }
//! ```

use crate::{base::Shared, engine::CustomFn, Executor, Model, Record, Repo, Result, Schema};

use nexus_core::{stmt::Value, Error};
use nexus_sql::stmt::{Condition, Direction, Op};

use indexmap::IndexMap;
use std::{any::Any, fmt, marker::PhantomData, sync::Arc};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Nexus {
    links: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Link {
    /// `owner.<owner> = related.<related>`
    Column { owner: String, related: String },

    /// `related.<related> <op> <value>`
    Filter {
        related: String,
        op: Op,
        value: Value,
    },
}

impl Nexus {
    pub fn new() -> Nexus {
        Nexus::default()
    }

    /// Requires the owner's `owner` column to equal the related `related`
    /// column.
    pub fn on(mut self, owner: impl Into<String>, related: impl Into<String>) -> Nexus {
        self.links.push(Link::Column {
            owner: owner.into(),
            related: related.into(),
        });
        self
    }

    /// Restricts related records with a fixed predicate.
    pub fn filter(mut self, related: impl Into<String>, op: Op, value: impl Into<Value>) -> Nexus {
        self.links.push(Link::Filter {
            related: related.into(),
            op,
            value: value.into(),
        });
        self
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// `(owner, related)` column pairs of the equality links.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.links.iter().filter_map(|link| match link {
            Link::Column { owner, related } => Some((&owner[..], &related[..])),
            Link::Filter { .. } => None,
        })
    }

    pub(crate) fn filters(&self) -> impl Iterator<Item = Condition> + '_ {
        self.links.iter().filter_map(|link| match link {
            Link::Filter { related, op, value } => {
                Some(Condition::compare(related, *op, value.clone()))
            }
            Link::Column { .. } => None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    One,
    Many,
}

pub struct Relation {
    name: String,
    cardinality: Cardinality,
    nexus: Nexus,
    target: Arc<dyn Target>,
}

impl Relation {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub fn nexus(&self) -> &Nexus {
        &self.nexus
    }

    pub(crate) fn target(&self) -> &dyn Target {
        &*self.target
    }

    pub(crate) fn verify(&self) -> Result<()> {
        let schema = self.target.schema()?;
        let model = schema.mapper().model();

        for link in self.nexus.links() {
            match link {
                Link::Column { related, .. } | Link::Filter { related, .. } => {
                    model.field(related)?;
                }
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relation")
            .field("name", &self.name)
            .field("cardinality", &self.cardinality)
            .field("nexus", &self.nexus)
            .field("target", &self.target.table())
            .finish()
    }
}

/// The relationships declared by one record type.
pub struct Relations {
    owner: &'static str,
    relations: IndexMap<String, Relation>,

    /// Declared custom handlers, each a `CustomFn<M>` of the owner type
    customs: IndexMap<String, Arc<dyn Any + Send + Sync>>,
}

impl Relations {
    pub(crate) fn new(owner: &'static str) -> Relations {
        Relations {
            owner,
            relations: IndexMap::new(),
            customs: IndexMap::new(),
        }
    }

    /// Declares a relationship binding at most one `T`. Redeclaring a name
    /// replaces the earlier declaration.
    pub fn has_one<T: Model>(&mut self, name: &str, nexus: Nexus) -> &mut Self {
        self.declare::<T>(name, Cardinality::One, nexus)
    }

    /// Declares a relationship binding every matching `T`, keyed by primary
    /// key.
    pub fn has_many<T: Model>(&mut self, name: &str, nexus: Nexus) -> &mut Self {
        self.declare::<T>(name, Cardinality::Many, nexus)
    }

    /// Declares a relationship computed by `handler`, which receives the
    /// whole batch of owners and returns one value per owner, in order. `M`
    /// must be the declaring type.
    pub fn custom<M, F>(&mut self, name: &str, handler: F) -> &mut Self
    where
        M: Model,
        F: Fn(&Executor, &[&M]) -> Result<Vec<Value>> + Send + Sync + 'static,
    {
        let handler: CustomFn<M> = Arc::new(handler);
        self.relations.shift_remove(name);
        self.customs.insert(name.to_string(), Arc::new(handler));
        self
    }

    fn declare<T: Model>(&mut self, name: &str, cardinality: Cardinality, nexus: Nexus) -> &mut Self {
        self.customs.shift_remove(name);
        self.relations.insert(
            name.to_string(),
            Relation {
                name: name.to_string(),
                cardinality,
                nexus,
                target: Arc::new(TypedTarget::<T>(PhantomData)),
            },
        );
        self
    }

    pub fn owner(&self) -> &'static str {
        self.owner
    }

    /// Looks up a declaration. Unknown names are an error.
    pub fn get(&self, name: &str) -> Result<&Relation> {
        self.relations
            .get(name)
            .ok_or_else(|| Error::relation_not_declared(self.owner, name))
    }

    /// The declared custom handler `name`, if `M` declared one.
    pub(crate) fn custom_handler<M: Model>(&self, name: &str) -> Option<CustomFn<M>> {
        self.customs.get(name)?.downcast_ref::<CustomFn<M>>().cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relation> + '_ {
        self.relations.values()
    }
}

impl fmt::Debug for Relations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relations")
            .field("owner", &self.owner)
            .field("relations", &self.relations)
            .field("customs", &self.customs.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// The related side of a relationship, with its record type erased.
pub(crate) trait Target: Send + Sync + 'static {
    fn table(&self) -> &'static str;

    fn schema(&self) -> Result<Arc<Schema>>;

    /// Fetches related records matching `filter`, ordered by primary key.
    /// `None` means no record can match and nothing is queried.
    fn fetch(&self, exec: &Executor, filter: Option<Vec<Condition>>) -> Result<Box<dyn Related>>;
}

struct TypedTarget<T>(PhantomData<fn() -> T>);

impl<T: Model> Target for TypedTarget<T> {
    fn table(&self) -> &'static str {
        T::TABLE
    }

    fn schema(&self) -> Result<Arc<Schema>> {
        Schema::of::<T>()
    }

    fn fetch(&self, exec: &Executor, filter: Option<Vec<Condition>>) -> Result<Box<dyn Related>> {
        let schema = Schema::of::<T>()?;

        let records = match filter {
            Some(filter) => {
                let mut repo = Repo::<T>::new(exec.clone())?;
                for condition in filter {
                    repo.filter_condition(condition);
                }
                repo.order_by(&schema.mapper().model().primary_key().column, Direction::Asc);
                repo.all()?.into_iter().map(Arc::new).collect()
            }
            None => vec![],
        };

        Ok(Box::new(Batch { schema, records }))
    }
}

/// A fetched set of related records.
pub(crate) trait Related {
    fn len(&self) -> usize;

    fn col_value(&self, index: usize, column: &str) -> Result<Value>;

    fn one(&self, index: usize) -> Shared;

    /// The records at `indices`, as an `IndexMap<Value, Arc<T>>` keyed by
    /// primary key.
    fn many(&self, indices: &[usize]) -> Shared;
}

struct Batch<T> {
    schema: Arc<Schema>,
    records: Vec<Arc<T>>,
}

impl<T: Model> Related for Batch<T> {
    fn len(&self) -> usize {
        self.records.len()
    }

    fn col_value(&self, index: usize, column: &str) -> Result<Value> {
        self.schema
            .mapper()
            .col_value(&*self.records[index], column)
    }

    fn one(&self, index: usize) -> Shared {
        self.records[index].clone()
    }

    fn many(&self, indices: &[usize]) -> Shared {
        let pk = self.schema.mapper().model().primary_key_index();

        let related: IndexMap<Value, Arc<T>> = indices
            .iter()
            .map(|&index| {
                let record = &self.records[index];
                (Record::get(&**record, pk), record.clone())
            })
            .collect();

        Arc::new(related)
    }
}
