use crate::{Mapper, Model, Relations, Result};

use nexus_core::err;

use std::{
    any::TypeId,
    collections::HashMap,
    sync::{Arc, OnceLock, RwLock},
};

/// Everything known about one record type: its mapper and its declared
/// relationships. Built once per type and cached for the process.
#[derive(Debug)]
pub struct Schema {
    mapper: Mapper,
    relations: Relations,
}

type Registry = RwLock<HashMap<TypeId, Arc<Schema>>>;

fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(Registry::default)
}

impl Schema {
    /// Returns the schema of `M`, building it on first use.
    pub fn of<M: Model>() -> Result<Arc<Schema>> {
        let id = TypeId::of::<M>();

        if let Some(schema) = registry()
            .read()
            .map_err(|_| err!("schema registry lock poisoned"))?
            .get(&id)
        {
            return Ok(schema.clone());
        }

        // Built outside the lock: declarations may look up other schemas.
        let schema = Arc::new(Schema::build::<M>()?);

        let mut registry = registry()
            .write()
            .map_err(|_| err!("schema registry lock poisoned"))?;
        Ok(registry.entry(id).or_insert(schema).clone())
    }

    fn build<M: Model>() -> Result<Schema> {
        let mapper = Mapper::from_fields(M::TABLE, &M::fields(), M::converter())?;

        let mut relations = Relations::new(M::TABLE);
        M::declare(&mut relations);

        for relation in relations.iter() {
            for (owner, _) in relation.nexus().columns() {
                mapper.model().field(owner).map_err(|e| {
                    e.context(err!("relationship `{}` on `{}`", relation.name(), M::TABLE))
                })?;
            }
        }

        Ok(Schema { mapper, relations })
    }

    pub fn mapper(&self) -> &Mapper {
        &self.mapper
    }

    pub fn relations(&self) -> &Relations {
        &self.relations
    }

    /// Checks that every column a relationship refers to exists on the
    /// related type.
    pub fn verify(&self) -> Result<()> {
        for relation in self.relations.iter() {
            relation.verify().map_err(|e| {
                e.context(err!(
                    "relationship `{}` on `{}`",
                    relation.name(),
                    self.relations.owner()
                ))
            })?;
        }

        Ok(())
    }
}
