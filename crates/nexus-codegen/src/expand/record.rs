use super::Expand;
use crate::schema::FieldKind;

use proc_macro2::TokenStream;
use quote::quote;

impl Expand<'_> {
    pub(super) fn expand_record_impl(&self) -> TokenStream {
        let nexus = &self.nexus;
        let model_ident = &self.model.ident;
        let model_name = model_ident.to_string();
        let base = &self.model.base;

        let field_defs = self.model.columns.iter().map(|field| {
            let name = field.ident.to_string();
            let ty = &field.ty;
            let FieldKind::Column(annotation) = &field.kind else {
                unreachable!()
            };

            quote! {
                #nexus::FieldDef {
                    name: #name,
                    annotation: #annotation,
                    ty: <#ty as #nexus::Primitive>::TYPE,
                    optional: <#ty as #nexus::Primitive>::NULLABLE,
                }
            }
        });

        let blank_fields = self
            .model
            .columns
            .iter()
            .map(|field| &field.ident)
            .chain(&self.model.skipped)
            .map(|ident| quote!(#ident: #nexus::Default::default()));

        let get_arms = self.model.columns.iter().enumerate().map(|(index, field)| {
            let ident = &field.ident;
            quote!(#index => #nexus::Primitive::to_value(&self.#ident))
        });

        let set_arms = self.model.columns.iter().enumerate().map(|(index, field)| {
            let ident = &field.ident;
            quote!(#index => self.#ident = #nexus::Primitive::load(value)?)
        });

        quote! {
            impl #nexus::Record for #model_ident {
                fn fields() -> #nexus::Vec<#nexus::FieldDef> {
                    ::std::vec![ #( #field_defs, )* ]
                }

                fn blank() -> Self {
                    Self {
                        #( #blank_fields, )*
                        #base: #nexus::Default::default(),
                    }
                }

                fn get(&self, index: usize) -> #nexus::Result<#nexus::Value> {
                    match index {
                        #( #get_arms, )*
                        _ => Ok(#nexus::Value::Null),
                    }
                }

                fn set(&mut self, index: usize, value: #nexus::Value) -> #nexus::Result<()> {
                    match index {
                        #( #set_arms, )*
                        _ => {
                            return Err(#nexus::Error::from_args(format_args!(
                                "`{}` has no field at index {}",
                                #model_name,
                                index
                            )))
                        }
                    }
                    Ok(())
                }

                fn base(&self) -> &#nexus::Base {
                    &self.#base
                }

                fn base_mut(&mut self) -> &mut #nexus::Base {
                    &mut self.#base
                }
            }
        }
    }
}
