mod record;

use crate::schema::Model;

use proc_macro2::TokenStream;
use quote::quote;

struct Expand<'a> {
    /// The model being expanded
    model: &'a Model,

    /// Path prefix for nexus types
    nexus: TokenStream,
}

pub(super) fn model(model: &Model) -> TokenStream {
    let expand = Expand {
        model,
        nexus: quote!(_nexus::codegen_support),
    };

    wrap_in_const(expand.expand_record_impl())
}

fn wrap_in_const(code: TokenStream) -> TokenStream {
    quote! {
        const _: () = {
            use nexus as _nexus;
            #code
        };
    }
}
