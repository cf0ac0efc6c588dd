use quote::{format_ident, quote};
use syn::{Generics, Ident, Lifetime, LitStr};

use crate::attrs::parse_field_attrs;
use crate::util::{add_where_bound, is_option_type, type_mentions_self};

/// Record keys are copied into a fixed scratch buffer before comparison so
/// that stream-substrate refills cannot invalidate them.
const KEY_SCRATCH_LEN: usize = 256;

/// Pick a lifetime name for the decode impl that the struct's own generics
/// cannot collide with: start from `'__de` and grow with underscores until
/// the name is unused.
fn fresh_decode_lifetime(generics: &Generics) -> Lifetime {
    let taken: Vec<String> = generics
        .lifetimes()
        .map(|param| param.lifetime.ident.to_string())
        .collect();
    let mut name = String::from("__de");
    while taken.iter().any(|t| *t == name) {
        name.push('_');
    }
    Lifetime::new(&format!("'{name}"), proc_macro2::Span::call_site())
}

pub(crate) fn decode_record(
    name: &Ident,
    generics: &Generics,
    fields: &syn::FieldsNamed,
) -> syn::Result<proc_macro2::TokenStream> {
    let de = fresh_decode_lifetime(generics);

    // The impl generics gain the decode lifetime up front, outliving every
    // lifetime the struct itself carries.
    let mut augmented = generics.clone();
    augmented.params.insert(0, syn::parse_quote!(#de));
    {
        let wc = augmented.make_where_clause();
        for param in generics.lifetimes() {
            let outlived = &param.lifetime;
            wc.predicates.push(syn::parse_quote!(#de: #outlived));
        }
    }

    let (impl_generics, _, where_clause) = augmented.split_for_impl();
    let (_, ty_generics, _) = generics.split_for_impl();

    let mut where_clause = where_clause.cloned();
    let wc = where_clause.get_or_insert_with(|| syn::WhereClause {
        where_token: Default::default(),
        predicates: Default::default(),
    });

    let mut inits = Vec::new();
    let mut arms = Vec::new();
    let mut finals = Vec::new();

    for field in &fields.named {
        let attr = parse_field_attrs(&field.attrs)?;
        let ident = field.ident.as_ref().unwrap();
        let ty = &field.ty;

        if attr.skip {
            add_where_bound(wc, ty, quote!(::core::default::Default));
            finals.push(quote! { #ident: ::core::default::Default::default(), });
            continue;
        }

        let key = attr
            .rename
            .unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));
        let var = format_ident!("__{ident}");

        let is_option = is_option_type(ty);
        if is_option || attr.default {
            add_where_bound(wc, ty, quote!(::core::default::Default));
        }
        if !type_mentions_self(ty, name) {
            add_where_bound(wc, ty, quote!(::typed_cbor::Decode<#de>));
        }

        inits.push(
            quote! { let mut #var: ::core::option::Option<#ty> = ::core::option::Option::None; },
        );

        arms.push(quote! {
            #key => {
                if #var.is_some() && !d.config().allow_duplicate_keys {
                    return ::core::result::Result::Err(::typed_cbor::Error::new(
                        ::typed_cbor::ErrorCode::MalformedInput,
                        _key_off,
                    ));
                }
                #var = ::core::option::Option::Some(::typed_cbor::Decode::decode(d)?);
            }
        });

        if is_option || attr.default {
            finals.push(quote! { #ident: #var.unwrap_or_default(), });
        } else {
            finals.push(quote! {
                #ident: #var.ok_or_else(|| ::typed_cbor::Error::new(
                    ::typed_cbor::ErrorCode::MissingRequiredField,
                    _map_off,
                ))?,
            });
        }
    }

    let scratch_len = KEY_SCRATCH_LEN;
    let entry = quote! {
        let _key_off = d.position();
        match d.read_map_key(&mut __scratch)? {
            #(#arms)*
            _ => d.skip_value()?,
        }
    };

    Ok(quote! {
        impl #impl_generics ::typed_cbor::Decode<#de> for #name #ty_generics #where_clause {
            fn decode<__S: ::typed_cbor::Source<#de>>(
                d: &mut ::typed_cbor::Decoder<#de, __S>,
            ) -> ::core::result::Result<Self, ::typed_cbor::Error> {
                let _map_off = d.position();
                let __frame = d.begin_map()?;
                #(#inits)*
                let mut __scratch = [0u8; #scratch_len];
                match __frame {
                    ::core::option::Option::Some(__n) => {
                        for _ in 0..__n {
                            #entry
                        }
                    }
                    ::core::option::Option::None => {
                        while !d.at_break()? {
                            #entry
                        }
                    }
                }
                d.end_map(__frame)?;
                ::core::result::Result::Ok(Self { #(#finals)* })
            }
        }
    })
}
