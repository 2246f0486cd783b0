//! Parsing of `#[mapped(...)]` attributes.

use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{Attribute, ExprPath, LitStr};

use crate::MAPPED_ATTRIBUTE_NAME;

fn mapped_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident(MAPPED_ATTRIBUTE_NAME))
}

fn set_once<T>(slot: &mut Option<T>, value: T, meta: &ParseNestedMeta) -> syn::Result<()> {
    if slot.is_some() {
        return Err(meta.error("duplicate attribute"));
    }
    *slot = Some(value);
    Ok(())
}

/// Parses `"path::to::method"` into a path expression.
fn parse_hook(meta: &ParseNestedMeta) -> syn::Result<(LitStr, ExprPath)> {
    let lit: LitStr = meta.value()?.parse()?;
    let path = lit.parse::<ExprPath>()?;
    Ok((lit, path))
}

// -----------------------------------------------------------------------------
// TypeAttributes

#[derive(Default)]
pub(crate) struct TypeAttributes {
    /// `#[mapped(type_path = "...")]`, without a leading `::`.
    pub type_path: Option<LitStr>,
    /// `#[mapped(auto_register)]`
    pub auto_register: Option<Span>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();

        for attr in mapped_attrs(attrs) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("type_path") {
                    let lit: LitStr = meta.value()?.parse()?;
                    let value = lit.value();
                    let value = value.strip_prefix("::").unwrap_or(&value);
                    if value.is_empty() {
                        return Err(meta.error("`type_path` must not be empty"));
                    }
                    set_once(&mut this.type_path, LitStr::new(value, lit.span()), &meta)
                } else if meta.path.is_ident("auto_register") {
                    set_once(&mut this.auto_register, meta.path.span(), &meta)
                } else {
                    Err(meta.error("expected `type_path` or `auto_register`"))
                }
            })?;
        }

        Ok(this)
    }
}

// -----------------------------------------------------------------------------
// FieldAttributes

#[derive(Default)]
pub(crate) struct SerializeAttributes {
    pub ignore: bool,
    pub ignore_if_null: bool,
    pub rename_to: Option<LitStr>,
    pub with: Option<(LitStr, ExprPath)>,
}

impl SerializeAttributes {
    fn parse_meta(&mut self, meta: &ParseNestedMeta) -> syn::Result<()> {
        meta.parse_nested_meta(|meta| {
            if meta.path.is_ident("ignore") {
                self.ignore = true;
                Ok(())
            } else if meta.path.is_ident("ignore_if_null") {
                self.ignore_if_null = true;
                Ok(())
            } else if meta.path.is_ident("rename_to") {
                let lit = meta.value()?.parse()?;
                set_once(&mut self.rename_to, lit, &meta)
            } else if meta.path.is_ident("with") {
                let hook = parse_hook(&meta)?;
                set_once(&mut self.with, hook, &meta)
            } else {
                Err(meta.error("expected `ignore`, `ignore_if_null`, `rename_to` or `with`"))
            }
        })
    }

    pub fn has_directives(&self) -> bool {
        self.ignore || self.ignore_if_null || self.rename_to.is_some()
    }
}

#[derive(Default)]
pub(crate) struct DeserializeAttributes {
    pub ignore: bool,
    pub optional: bool,
    pub source_name: Option<LitStr>,
    pub with: Option<(LitStr, ExprPath)>,
}

impl DeserializeAttributes {
    fn parse_meta(&mut self, meta: &ParseNestedMeta) -> syn::Result<()> {
        meta.parse_nested_meta(|meta| {
            if meta.path.is_ident("ignore") {
                self.ignore = true;
                Ok(())
            } else if meta.path.is_ident("optional") {
                self.optional = true;
                Ok(())
            } else if meta.path.is_ident("source_name") {
                let lit = meta.value()?.parse()?;
                set_once(&mut self.source_name, lit, &meta)
            } else if meta.path.is_ident("with") {
                let hook = parse_hook(&meta)?;
                set_once(&mut self.with, hook, &meta)
            } else {
                Err(meta.error("expected `ignore`, `optional`, `source_name` or `with`"))
            }
        })
    }

    pub fn has_directives(&self) -> bool {
        self.ignore || self.optional || self.source_name.is_some()
    }
}

#[derive(Default)]
pub(crate) struct FieldAttributes {
    /// `#[mapped(skip)]`
    pub skip: bool,
    /// `#[mapped(ty = "...")]`
    pub ty: Option<LitStr>,
    pub ser: SerializeAttributes,
    pub de: DeserializeAttributes,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();

        for attr in mapped_attrs(attrs) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    this.skip = true;
                    Ok(())
                } else if meta.path.is_ident("ty") {
                    let lit = meta.value()?.parse()?;
                    set_once(&mut this.ty, lit, &meta)
                } else if meta.path.is_ident("ser") {
                    this.ser.parse_meta(&meta)
                } else if meta.path.is_ident("de") {
                    this.de.parse_meta(&meta)
                } else {
                    Err(meta.error("expected `skip`, `ty`, `ser(...)` or `de(...)`"))
                }
            })?;
        }

        Ok(this)
    }
}
