//! Procedural macro derives for `typed-cbor`.
//!
//! Records (named-field structs) are encoded as CBOR maps with text keys in
//! declared field order. Enums, unions, and tuple structs have no wire
//! representation in the deterministic subset and are rejected.

#![deny(clippy::all)]
#![deny(missing_docs)]

extern crate proc_macro;

mod attrs;
mod decode;
mod encode;
mod util;

use proc_macro::TokenStream;
use syn::{parse_macro_input, spanned::Spanned, Data, DeriveInput, Fields};

use crate::decode::decode_record;
use crate::encode::encode_record;

fn named_fields(input: &DeriveInput) -> syn::Result<&syn::FieldsNamed> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Ok(fields),
            Fields::Unnamed(f) => Err(syn::Error::new(
                f.span(),
                "typed-cbor derives support named-field structs only",
            )),
            Fields::Unit => Err(syn::Error::new(
                input.ident.span(),
                "typed-cbor derives support named-field structs only",
            )),
        },
        Data::Enum(data) => Err(syn::Error::new(
            data.enum_token.span(),
            "typed-cbor does not encode enums; model alternatives outside the wire format",
        )),
        Data::Union(u) => Err(syn::Error::new(
            u.union_token.span(),
            "typed-cbor derives are not supported for unions",
        )),
    }
}

/// Derive map-with-text-keys encoding for a named-field struct.
#[proc_macro_derive(Encode, attributes(cbor))]
pub fn derive_encode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let out = named_fields(&input)
        .and_then(|fields| encode_record(&input.ident, &input.generics, fields));
    match out {
        Ok(ts) => TokenStream::from(ts),
        Err(e) => TokenStream::from(e.to_compile_error()),
    }
}

/// Derive map-with-text-keys decoding for a named-field struct.
#[proc_macro_derive(Decode, attributes(cbor))]
pub fn derive_decode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let out = named_fields(&input)
        .and_then(|fields| decode_record(&input.ident, &input.generics, fields));
    match out {
        Ok(ts) => TokenStream::from(ts),
        Err(e) => TokenStream::from(e.to_compile_error()),
    }
}
