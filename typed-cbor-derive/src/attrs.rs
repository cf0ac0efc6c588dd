use proc_macro2::Span;
use syn::{Attribute, LitStr};

#[derive(Default, Clone)]
pub(crate) struct FieldAttr {
    pub(crate) rename: Option<LitStr>,
    pub(crate) skip: bool,
    pub(crate) default: bool,
}

pub(crate) fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttr> {
    let mut out = FieldAttr::default();

    for attr in attrs.iter().filter(|a| a.path().is_ident("cbor")) {
        attr.parse_nested_meta(|meta| {
            let Some(ident) = meta.path.get_ident() else {
                return Err(meta.error("expected `rename`, `skip`, or `default`"));
            };
            match ident.to_string().as_str() {
                "rename" => {
                    let key: LitStr = meta.value()?.parse()?;
                    if out.rename.replace(key).is_some() {
                        return Err(meta.error("`rename` given more than once"));
                    }
                    Ok(())
                }
                "skip" => {
                    if out.skip {
                        return Err(meta.error("`skip` given more than once"));
                    }
                    out.skip = true;
                    Ok(())
                }
                "default" => {
                    if out.default {
                        return Err(meta.error("`default` given more than once"));
                    }
                    out.default = true;
                    Ok(())
                }
                other => Err(meta.error(format!(
                    "unknown cbor attribute `{other}`; this derive understands `rename`, `skip`, and `default`"
                ))),
            }
        })?;
    }

    // A field that never hits the wire has nothing to rename or default.
    if out.skip && (out.rename.is_some() || out.default) {
        return Err(syn::Error::new(
            Span::call_site(),
            "a skipped field cannot also carry `rename` or `default`",
        ));
    }

    Ok(out)
}
