//! Batched relationship resolution.
//!
//! Given a batch of owner records and the names of the relationships to
//! load, the resolver collects join keys across the whole batch, issues one
//! sub-fetch per relationship and binds the related records back onto each
//! owner. Every binding is computed before any is applied, so a failure
//! leaves the batch untouched.

use crate::{
    base::Shared,
    relation::{Cardinality, Relation},
    Executor, Model, Result, Schema,
};

use nexus_core::{err, stmt::Value};
use nexus_sql::stmt::Condition;

use indexmap::IndexSet;
use std::sync::Arc;

/// Computes one value per owner for a relationship that is not an
/// equi-join, such as an aggregate count.
pub(crate) type CustomFn<M> = Arc<dyn Fn(&Executor, &[&M]) -> Result<Vec<Value>> + Send + Sync>;

enum Binding {
    One(Option<Shared>),
    Many(Shared),
    Custom(Value),
}

pub(crate) fn resolve<M: Model>(
    exec: &Executor,
    schema: &Schema,
    records: &mut [&mut M],
    with: &[String],
    customs: &[(String, CustomFn<M>)],
) -> Result<()> {
    // Look up every requested relationship before issuing any query.
    let mut relations = vec![];
    let mut handlers: Vec<(&str, CustomFn<M>)> = vec![];

    for name in with {
        if let Some(handler) = schema.relations().custom_handler::<M>(name) {
            handlers.push((name.as_str(), handler));
        } else {
            let relation = schema.relations().get(name)?;
            relation.verify()?;
            relations.push(relation);
        }
    }

    handlers.extend(
        customs
            .iter()
            .map(|(name, handler)| (&name[..], handler.clone())),
    );

    let mut bindings = Vec::with_capacity(relations.len() + handlers.len());

    {
        let owners: Vec<&M> = records.iter().map(|record| &**record).collect();

        for relation in relations {
            bindings.push((relation.name(), bind(exec, schema, &owners, relation)?));
        }

        for (name, handler) in handlers {
            let values = handler(exec, &owners)?;

            if values.len() != owners.len() {
                return Err(err!(
                    "custom relationship `{name}` returned {} values for {} records",
                    values.len(),
                    owners.len()
                ));
            }

            bindings.push((name, values.into_iter().map(Binding::Custom).collect()));
        }
    }

    for (name, per_owner) in bindings {
        for (record, binding) in records.iter_mut().zip(per_owner) {
            let base = record.base_mut();
            match binding {
                Binding::One(related) => base.bind_one(name, related),
                Binding::Many(related) => base.bind_many(name, related),
                Binding::Custom(value) => base.bind_custom(name, value),
            }
        }
    }

    Ok(())
}

/// Resolves one relationship for every owner, returning one binding per
/// owner in batch order.
fn bind<M: Model>(
    exec: &Executor,
    schema: &Schema,
    owners: &[&M],
    relation: &Relation,
) -> Result<Vec<Binding>> {
    let mapper = schema.mapper();
    let links: Vec<(&str, &str)> = relation.nexus().columns().collect();

    // Join key values per owner, one per equality link
    let owner_keys = owners
        .iter()
        .map(|owner| {
            links
                .iter()
                .map(|(column, _)| mapper.col_value(*owner, column))
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    let mut key_sets = vec![IndexSet::new(); links.len()];
    for keys in &owner_keys {
        for (set, key) in key_sets.iter_mut().zip(keys) {
            if !key.is_null() {
                set.insert(key.clone());
            }
        }
    }

    tracing::trace!(
        relation = relation.name(),
        owners = owners.len(),
        keys = ?key_sets.iter().map(IndexSet::len).collect::<Vec<_>>(),
        "nexus.collect"
    );

    // An owner without a key can match nothing, so an empty key set skips
    // the query.
    let filter = if owners.is_empty() || key_sets.iter().any(IndexSet::is_empty) {
        None
    } else {
        let mut filter: Vec<Condition> = links
            .iter()
            .zip(key_sets)
            .map(|((_, related), keys)| Condition::in_list(*related, keys))
            .collect();
        filter.extend(relation.nexus().filters());
        Some(filter)
    };

    let related = relation.target().fetch(exec, filter)?;

    // Related join values, read once per related record
    let related_keys = (0..related.len())
        .map(|index| {
            links
                .iter()
                .map(|(_, column)| related.col_value(index, column))
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(owner_keys
        .iter()
        .map(|keys| {
            let matches: Vec<usize> = related_keys
                .iter()
                .enumerate()
                .filter(|(_, related)| {
                    keys.iter()
                        .zip(related.iter())
                        .all(|(owner, related)| !owner.is_null() && owner == related)
                })
                .map(|(index, _)| index)
                .collect();

            match relation.cardinality() {
                Cardinality::One => {
                    if matches.len() > 1 {
                        tracing::debug!(
                            relation = relation.name(),
                            matches = matches.len(),
                            "nexus.has_one: several related records match; binding the first"
                        );
                    }
                    Binding::One(matches.first().map(|&index| related.one(index)))
                }
                Cardinality::Many => Binding::Many(related.many(&matches)),
            }
        })
        .collect())
}
