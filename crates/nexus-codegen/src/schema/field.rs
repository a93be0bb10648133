use super::ErrorSet;

#[derive(Debug)]
pub(crate) struct Field {
    /// Field identifier
    pub(crate) ident: syn::Ident,

    /// Field type
    pub(crate) ty: syn::Type,

    pub(crate) kind: FieldKind,
}

#[derive(Debug)]
pub(crate) enum FieldKind {
    /// Mapped to a column by `#[column("...")]`
    Column(syn::LitStr),

    /// The embedded `Base`
    Base,

    /// `#[skip]`: not persisted
    Skip,
}

impl Field {
    pub(crate) fn from_ast(field: &syn::Field, errs: &mut ErrorSet) -> Option<Field> {
        let Some(ident) = &field.ident else {
            errs.push(syn::Error::new_spanned(field, "record fields must be named"));
            return None;
        };

        let mut kind = None;

        for attr in &field.attrs {
            let next = if attr.path().is_ident("column") {
                match attr.parse_args::<syn::LitStr>() {
                    Ok(lit) if lit.value().trim().is_empty() => {
                        errs.push(syn::Error::new_spanned(lit, "column annotation is empty"));
                        continue;
                    }
                    Ok(lit) => FieldKind::Column(lit),
                    Err(err) => {
                        errs.push(err);
                        continue;
                    }
                }
            } else if attr.path().is_ident("base") {
                FieldKind::Base
            } else if attr.path().is_ident("skip") {
                FieldKind::Skip
            } else {
                continue;
            };

            if kind.replace(next).is_some() {
                errs.push(syn::Error::new_spanned(
                    attr,
                    "only one of #[column], #[base] or #[skip] may be used per field",
                ));
            }
        }

        let kind = match kind {
            Some(kind) => kind,
            None if is_base_type(&field.ty) => FieldKind::Base,
            None => {
                errs.push(syn::Error::new_spanned(
                    field,
                    "field requires #[column(\"<name> <type> [options]\")] or #[skip]",
                ));
                return None;
            }
        };

        Some(Field {
            ident: ident.clone(),
            ty: field.ty.clone(),
            kind,
        })
    }
}

fn is_base_type(ty: &syn::Type) -> bool {
    match ty {
        syn::Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Base"),
        _ => false,
    }
}
