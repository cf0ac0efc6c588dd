use quote::quote;
use syn::{Generics, Ident, LitStr};

use crate::attrs::parse_field_attrs;
use crate::util::{add_where_bound, type_mentions_self};

pub(crate) fn encode_record(
    name: &Ident,
    generics: &Generics,
    fields: &syn::FieldsNamed,
) -> syn::Result<proc_macro2::TokenStream> {
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let mut where_clause = where_clause.cloned();
    let wc = where_clause.get_or_insert_with(|| syn::WhereClause {
        where_token: Default::default(),
        predicates: Default::default(),
    });

    let mut entries = Vec::new();

    for field in &fields.named {
        let attr = parse_field_attrs(&field.attrs)?;
        if attr.skip {
            continue;
        }

        let ident = field.ident.as_ref().unwrap();
        let key = attr
            .rename
            .unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));

        if !type_mentions_self(&field.ty, name) {
            add_where_bound(wc, &field.ty, quote!(::typed_cbor::Encode));
        }

        // Entries go out in declared field order; no reordering.
        entries.push(quote! {
            m.entry(#key, |e| ::typed_cbor::Encode::encode(&self.#ident, e))?;
        });
    }

    let len = entries.len();

    Ok(quote! {
        impl #impl_generics ::typed_cbor::Encode for #name #ty_generics #where_clause {
            fn encode<__S: ::typed_cbor::Sink>(
                &self,
                e: &mut ::typed_cbor::Encoder<__S>,
            ) -> ::core::result::Result<(), ::typed_cbor::Error> {
                e.map(#len, |m| {
                    #(#entries)*
                    ::core::result::Result::Ok(())
                })
            }
        }

        impl #impl_generics ::typed_cbor::SequenceElem for #name #ty_generics #where_clause {}
    })
}
