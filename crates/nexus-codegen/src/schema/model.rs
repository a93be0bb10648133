use super::{ErrorSet, Field, FieldKind};

#[derive(Debug)]
pub(crate) struct Model {
    /// Type identifier
    pub(crate) ident: syn::Ident,

    /// Persisted fields, in declaration order
    pub(crate) columns: Vec<Field>,

    /// The embedded `Base` field
    pub(crate) base: syn::Ident,

    /// Fields that are neither persisted nor the base
    pub(crate) skipped: Vec<syn::Ident>,
}

impl Model {
    pub(crate) fn from_ast(ast: &syn::ItemStruct) -> syn::Result<Model> {
        let syn::Fields::Named(node) = &ast.fields else {
            return Err(syn::Error::new_spanned(
                &ast.fields,
                "record types must be structs with named fields",
            ));
        };

        if !ast.generics.params.is_empty() {
            return Err(syn::Error::new_spanned(
                &ast.generics,
                "record types cannot be generic",
            ));
        }

        let mut errs = ErrorSet::new();
        let mut columns = vec![];
        let mut base = None;
        let mut skipped = vec![];

        for node in &node.named {
            let Some(field) = Field::from_ast(node, &mut errs) else {
                continue;
            };

            match field.kind {
                FieldKind::Column(_) => columns.push(field),
                FieldKind::Skip => skipped.push(field.ident),
                FieldKind::Base => {
                    if base.replace(field.ident).is_some() {
                        errs.push(syn::Error::new_spanned(node, "duplicate base field"));
                    }
                }
            }
        }

        if base.is_none() {
            errs.push(syn::Error::new_spanned(
                &ast.ident,
                "record types must embed a `nexus::Base` field",
            ));
        }

        if columns.is_empty() {
            errs.push(syn::Error::new_spanned(
                &ast.ident,
                "record types must map at least one column",
            ));
        }

        if let Some(err) = errs.collect() {
            return Err(err);
        }

        let Some(base) = base else {
            unreachable!("missing base is reported above");
        };

        Ok(Model {
            ident: ast.ident.clone(),
            columns,
            base,
            skipped,
        })
    }
}
