use crate::{
    engine::{self, CustomFn},
    AsExecutor, Executor, Mapper, Model, Result, Schema, Transaction,
};

use nexus_core::{
    bail,
    driver::{Receiver, Scan},
    err,
    stmt::{Type, Value},
    Error,
};
use nexus_sql::{
    stmt::{
        ColumnDef, Condition, Delete, Direction, Insert, Op, OrderBy, Projection, Select, Update,
    },
    Statement,
};

use indexmap::IndexMap;
use std::{marker::PhantomData, sync::Arc};

/// Reads and writes records of one type.
///
/// Query state (filters, ordering, requested relationships) accumulates on
/// the repository until [`Repo::clear`] is called. A repository bound to a
/// transaction with [`Repo::with_tx`] stays bound until
/// [`Repo::without_tx`].
pub struct Repo<M: Model> {
    executor: Executor,
    schema: Arc<Schema>,
    table: String,
    filter: Vec<Condition>,
    order_by: Vec<OrderBy>,
    limit: Option<u64>,
    offset: Option<u64>,
    with: Vec<String>,
    customs: Vec<(String, CustomFn<M>)>,
    _p: PhantomData<fn() -> M>,
}

/// One page of records, with the total number of matching records.
#[derive(Debug)]
pub struct Page<M> {
    pub records: Vec<M>,
    pub total: u64,

    /// One-based page number
    pub page: u64,
    pub per_page: u64,
}

impl<M> Page<M> {
    /// Number of pages needed to hold every matching record.
    pub fn pages(&self) -> u64 {
        if self.per_page == 0 {
            return 0;
        }
        self.total.div_ceil(self.per_page)
    }
}

impl<M: Model> Repo<M> {
    pub(crate) fn new(executor: Executor) -> Result<Repo<M>> {
        let schema = Schema::of::<M>()?;
        let table = executor.table_name(M::TABLE);

        Ok(Repo {
            executor,
            schema,
            table,
            filter: vec![],
            order_by: vec![],
            limit: None,
            offset: None,
            with: vec![],
            customs: vec![],
            _p: PhantomData,
        })
    }

    pub fn mapper(&self) -> &Mapper {
        self.schema.mapper()
    }

    /// The prefixed table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Binds every following statement to `tx`.
    pub fn with_tx(&mut self, tx: &Transaction) -> &mut Self {
        self.executor = tx.executor();
        self
    }

    /// Returns to the database's ambient connection.
    pub fn without_tx(&mut self) -> &mut Self {
        self.executor = self.executor.db().executor();
        self
    }

    pub fn filter(&mut self, column: &str, value: impl Into<Value>) -> &mut Self {
        self.filter.push(Condition::eq(column, value));
        self
    }

    pub fn filter_op(&mut self, column: &str, op: Op, value: impl Into<Value>) -> &mut Self {
        self.filter.push(Condition::compare(column, op, value));
        self
    }

    pub fn filter_in<V: Into<Value>>(
        &mut self,
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.filter.push(Condition::in_list(
            column,
            values.into_iter().map(Into::into),
        ));
        self
    }

    pub(crate) fn filter_condition(&mut self, condition: Condition) -> &mut Self {
        self.filter.push(condition);
        self
    }

    pub fn order_by(&mut self, column: &str, direction: Direction) -> &mut Self {
        self.order_by.push(OrderBy {
            column: column.to_string(),
            direction,
        });
        self
    }

    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(&mut self, offset: u64) -> &mut Self {
        self.offset = Some(offset);
        self
    }

    /// Requests the declared relationship `name` to be resolved for every
    /// fetched record.
    pub fn with(&mut self, name: &str) -> &mut Self {
        if !self.with.iter().any(|with| with == name) {
            self.with.push(name.to_string());
        }
        self
    }

    /// Requests a relationship computed by `handler`, which receives the
    /// whole batch and returns one value per record, in order.
    pub fn with_custom<F>(&mut self, name: &str, handler: F) -> &mut Self
    where
        F: Fn(&Executor, &[&M]) -> Result<Vec<Value>> + Send + Sync + 'static,
    {
        self.customs.push((name.to_string(), Arc::new(handler)));
        self
    }

    /// Resets filters, ordering, paging and requested relationships. The
    /// transaction binding is kept.
    pub fn clear(&mut self) -> &mut Self {
        self.filter.clear();
        self.order_by.clear();
        self.limit = None;
        self.offset = None;
        self.with.clear();
        self.customs.clear();
        self
    }

    /// Fetches the matching records keyed by primary key.
    pub fn fetch(&self) -> Result<IndexMap<Value, M>> {
        let pk = &self.mapper().model().primary_key().column;
        self.fetch_by_key(pk)
    }

    /// Fetches the matching records keyed by `column`. When several records
    /// share a key, the last one fetched is kept.
    pub fn fetch_by_key(&self, column: &str) -> Result<IndexMap<Value, M>> {
        self.mapper().model().field(column)?;

        let mut loader = Loader {
            mapper: self.mapper(),
            key_column: column,
            columns: vec![],
            records: IndexMap::new(),
        };
        self.executor.query(self.select()?, &mut loader)?;

        let mut batch = loader.records;

        if !self.with.is_empty() || !self.customs.is_empty() {
            let mut records: Vec<&mut M> = batch.values_mut().collect();
            engine::resolve(
                &self.executor,
                &self.schema,
                &mut records,
                &self.with,
                &self.customs,
            )?;
        }

        Ok(batch)
    }

    pub fn all(&self) -> Result<Vec<M>> {
        Ok(self.fetch()?.into_values().collect())
    }

    /// Finds a record by primary key. Filters, ordering and paging are
    /// ignored; requested relationships are resolved.
    pub fn find(&self, key: impl Into<Value>) -> Result<Option<M>> {
        let mut repo = self.clone();
        let pk = self.mapper().model().primary_key().column.clone();

        repo.filter = vec![Condition::eq(pk, key)];
        repo.order_by.clear();
        repo.offset = None;
        repo.limit = Some(1);

        Ok(repo.fetch()?.into_values().next())
    }

    /// Like [`Repo::find`], but a missing record is an error.
    pub fn get(&self, key: impl Into<Value>) -> Result<M> {
        let key = key.into();
        self.find(key.clone())?.ok_or_else(|| {
            Error::record_not_found(format!("table={} key={key}", self.table))
        })
    }

    /// The first matching record.
    pub fn one(&self) -> Result<Option<M>> {
        let mut repo = self.clone();
        repo.limit = Some(1);
        Ok(repo.fetch()?.into_values().next())
    }

    pub fn count(&self) -> Result<u64> {
        self.check_filter()?;

        let mut select = Select::new(&self.table, Projection::Count);
        select.filter = self.filter.clone();

        let mut tally = Tally::new(None);
        self.executor.query(select, &mut tally)?;

        Ok(tally.counts.first().map(|(_, count)| *count).unwrap_or(0))
    }

    /// Counts matching records per distinct value of `column`.
    pub fn count_by(&self, column: &str) -> Result<IndexMap<Value, u64>> {
        self.check_filter()?;
        let receiver = self.mapper().receivers(&[column.to_string()])?[0];

        let mut select = Select::new(&self.table, Projection::CountBy(column.to_string()));
        select.filter = self.filter.clone();
        select.group_by = vec![column.to_string()];

        let mut tally = Tally::new(Some(receiver));
        self.executor.query(select, &mut tally)?;

        Ok(tally.counts.into_iter().collect())
    }

    /// Fetches page `page` (one-based) of `per_page` records, along with the
    /// total number of matching records.
    pub fn paginate(&self, page: u64, per_page: u64) -> Result<Page<M>> {
        if per_page == 0 {
            bail!("per_page must be greater than zero");
        }

        let page = page.max(1);

        // Offsets are rendered as SQL integer literals, which are signed
        let offset = (page - 1)
            .checked_mul(per_page)
            .filter(|offset| i64::try_from(*offset).is_ok())
            .ok_or_else(|| err!("page {page} of {per_page} records is out of range"))?;

        let total = self.count()?;

        let mut repo = self.clone();
        repo.limit = Some(per_page);
        repo.offset = Some(offset);

        Ok(Page {
            records: repo.all()?,
            total,
            page,
            per_page,
        })
    }

    pub fn create(&self, record: &mut M) -> Result<()> {
        self.create_all([record])
    }

    /// Inserts every record with a single statement. Any hook veto aborts
    /// before the statement is issued.
    pub fn create_all<'a>(&self, records: impl IntoIterator<Item = &'a mut M>) -> Result<()> {
        let mut records: Vec<&mut M> = records.into_iter().collect();

        if records.is_empty() {
            return Ok(());
        }

        for record in records.iter_mut() {
            record.before_create()?;
        }

        let columns = self.mapper().model().columns().map(String::from).collect();
        let mut insert = Insert::new(&self.table, columns);

        for record in &records {
            let values = self.mapper().extract(&**record)?;
            insert = insert.row(values.into_values().collect());
        }

        self.executor.exec(insert)?;

        for record in records {
            record.base_mut().set_fresh(false);
        }

        Ok(())
    }

    /// Writes every non-key column, scoped by the record's primary key.
    pub fn update(&self, record: &mut M) -> Result<()> {
        let pk = &self.mapper().model().primary_key().column;
        let key = self.mapper().db_value(record, pk)?;

        record.before_update()?;

        let mut values = self.mapper().extract(record)?;
        values.shift_remove(pk);

        let affected = if values.is_empty() {
            let mut repo = self.clone();
            repo.clear();
            repo.filter(pk, key.clone());
            repo.count()?
        } else {
            let update = values
                .into_iter()
                .fold(Update::new(&self.table), |update, (column, value)| {
                    update.set(column, value)
                })
                .filter(Condition::eq(pk, key.clone()));
            self.executor.exec(update)?
        };

        if affected == 0 {
            return Err(Error::record_not_found(format!(
                "table={} key={key}",
                self.table
            )));
        }

        record.base_mut().set_fresh(false);
        Ok(())
    }

    /// Updates every record inside one transaction: the bound one, or a
    /// dedicated one committed only if every update succeeds.
    pub fn update_all<'a>(&self, records: impl IntoIterator<Item = &'a mut M>) -> Result<()> {
        if self.executor.transaction().is_some() {
            return records
                .into_iter()
                .try_for_each(|record| self.update(record));
        }

        self.executor.db().transaction(|tx| {
            let mut repo = self.clone();
            repo.with_tx(tx);
            records
                .into_iter()
                .try_for_each(|record| repo.update(record))
        })
    }

    pub fn delete(&self, record: &mut M) -> Result<()> {
        self.delete_all([record])
    }

    /// Deletes every record with a single statement keyed by primary key.
    pub fn delete_all<'a>(&self, records: impl IntoIterator<Item = &'a mut M>) -> Result<()> {
        let mut records: Vec<&mut M> = records.into_iter().collect();

        if records.is_empty() {
            return Ok(());
        }

        for record in records.iter_mut() {
            record.before_delete()?;
        }

        let pk = &self.mapper().model().primary_key().column;
        let keys = records
            .iter()
            .map(|record| self.mapper().db_value(&**record, pk))
            .collect::<Result<Vec<_>>>()?;

        self.executor
            .exec(Delete::new(&self.table).filter(Condition::in_list(pk, keys)))?;

        for record in records {
            record.base_mut().set_fresh(true);
        }

        Ok(())
    }

    /// Creates a fresh record, updates a persisted one.
    pub fn save(&self, record: &mut M) -> Result<()> {
        if record.base().is_fresh() {
            self.create(record)
        } else {
            self.update(record)
        }
    }

    /// Assigns columns on every record matching the current filter,
    /// returning the number of affected rows. The primary key cannot be
    /// assigned.
    pub fn update_raw<K, V>(&self, values: impl IntoIterator<Item = (K, V)>) -> Result<u64>
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        self.check_filter()?;

        let model = self.mapper().model();
        let mut update = Update::new(&self.table);

        for (column, value) in values {
            let field = model.field(column.as_ref())?;
            if field.is_primary_key() {
                bail!(
                    "primary key `{}` on `{}` cannot be updated",
                    field.column,
                    self.table
                );
            }
            update = update.set(&field.column, value.into());
        }

        if update.assignments.is_empty() {
            bail!("update on `{}` assigns no columns", self.table);
        }

        update.filter = self.filter.clone();
        self.executor.exec(update)
    }

    /// Deletes every record matching the current filter, returning the
    /// number of affected rows.
    pub fn delete_raw(&self) -> Result<u64> {
        self.check_filter()?;

        let mut delete = Delete::new(&self.table);
        delete.filter = self.filter.clone();
        self.executor.exec(delete)
    }

    /// Creates the table and its indexes.
    pub fn create_table(&self) -> Result<()> {
        let model = self.mapper().model();

        let columns = model
            .fields
            .iter()
            .map(|field| ColumnDef {
                name: field.column.clone(),
                ty: field.column_type.clone(),
                not_null: !field.nullable(),
            })
            .collect();

        self.executor.exec(Statement::create_table(
            &self.table,
            columns,
            Some(model.primary_key().column.clone()),
        ))?;

        for field in model.fields.iter().filter(|field| !field.is_primary_key()) {
            if field.options.unique || field.options.index {
                self.executor.exec(Statement::create_index(
                    &self.table,
                    &field.column,
                    field.options.unique,
                ))?;
            }
        }

        Ok(())
    }

    pub fn drop_table(&self) -> Result<()> {
        self.executor
            .exec(Statement::drop_table_if_exists(&self.table))?;
        Ok(())
    }

    fn select(&self) -> Result<Select> {
        self.check_filter()?;

        let model = self.mapper().model();
        for order_by in &self.order_by {
            model.field(&order_by.column)?;
        }

        let mut select = Select::columns(&self.table, model.columns());
        select.filter = self.filter.clone();
        select.order_by = self.order_by.clone();
        select.limit = self.limit;
        select.offset = self.offset;

        Ok(select)
    }

    fn check_filter(&self) -> Result<()> {
        let model = self.mapper().model();
        for condition in &self.filter {
            model.field(condition.column())?;
        }
        Ok(())
    }
}

impl<M: Model> Clone for Repo<M> {
    fn clone(&self) -> Self {
        Repo {
            executor: self.executor.clone(),
            schema: self.schema.clone(),
            table: self.table.clone(),
            filter: self.filter.clone(),
            order_by: self.order_by.clone(),
            limit: self.limit,
            offset: self.offset,
            with: self.with.clone(),
            customs: self.customs.clone(),
            _p: PhantomData,
        }
    }
}

impl<M: Model> std::fmt::Debug for Repo<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repo")
            .field("table", &self.table)
            .field("filter", &self.filter)
            .field("order_by", &self.order_by)
            .field("limit", &self.limit)
            .field("offset", &self.offset)
            .field("with", &self.with)
            .field("tx", &self.executor.transaction().is_some())
            .finish()
    }
}

impl<M: Model> AsExecutor for Repo<M> {
    fn executor(&self) -> Executor {
        self.executor.clone()
    }
}

/// Packs scanned rows into records.
struct Loader<'a, M> {
    mapper: &'a Mapper,
    key_column: &'a str,
    columns: Vec<String>,
    records: IndexMap<Value, M>,
}

impl<M: Model> Scan for Loader<'_, M> {
    fn columns(&mut self, columns: &[String]) -> Result<Vec<Receiver>> {
        self.columns = columns.to_vec();
        self.mapper.receivers(columns)
    }

    fn row(&mut self, values: Vec<Value>) -> Result<()> {
        let (record, key) = self.mapper.pack(&self.columns, values, self.key_column)?;
        self.records.insert(key, record);
        Ok(())
    }
}

/// Collects `COUNT(1)` results, optionally grouped by a key column.
struct Tally {
    key: Option<Receiver>,
    counts: Vec<(Value, u64)>,
}

impl Tally {
    fn new(key: Option<Receiver>) -> Tally {
        Tally {
            key,
            counts: vec![],
        }
    }
}

impl Scan for Tally {
    fn columns(&mut self, columns: &[String]) -> Result<Vec<Receiver>> {
        let count = Receiver::new(Type::I64, false);
        let expected = if self.key.is_some() { 2 } else { 1 };

        if columns.len() != expected {
            return Err(err!(
                "count query returned {} columns, expected {expected}",
                columns.len()
            ));
        }

        Ok(self.key.into_iter().chain([count]).collect())
    }

    fn row(&mut self, values: Vec<Value>) -> Result<()> {
        let mut values = values.into_iter();

        let key = match self.key {
            Some(_) => values.next().unwrap_or_default(),
            None => Value::Null,
        };

        let count = values
            .next()
            .unwrap_or_default()
            .to_i64()
            .map_err(|e| e.context(err!("reading count")))?;

        self.counts.push((key, u64::try_from(count).unwrap_or(0)));
        Ok(())
    }
}
