/// A column definition within `CREATE TABLE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,

    /// Storage type, emitted verbatim
    pub ty: String,

    pub not_null: bool,
}
