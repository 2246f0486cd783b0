//! The parsed form of a `#[derive(Mapped)]` input.

use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Ident, LitStr, Type};

use crate::attributes::{FieldAttributes, TypeAttributes};

pub(crate) struct MappedField<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
    /// The field name as seen by the drivers, without `r#`.
    pub name: LitStr,
    pub attrs: FieldAttributes,
}

pub(crate) struct MappedStruct<'a> {
    vc_meta_path: syn::Path,
    pub ident: &'a Ident,
    pub attrs: TypeAttributes,
    /// Mapped fields in declaration order, skipped fields excluded.
    pub fields: Vec<MappedField<'a>>,
}

impl<'a> MappedStruct<'a> {
    pub fn from_ast(ast: &'a DeriveInput) -> syn::Result<Self> {
        if !ast.generics.params.is_empty() {
            return Err(syn::Error::new_spanned(
                &ast.generics,
                "`Mapped` cannot be derived for generic types",
            ));
        }

        let named = match &ast.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => named,
                Fields::Unit => {
                    return Err(syn::Error::new_spanned(
                        &ast.ident,
                        "`Mapped` requires a struct with named fields, use `struct Name {}`",
                    ));
                }
                Fields::Unnamed(fields) => {
                    return Err(syn::Error::new_spanned(
                        fields,
                        "`Mapped` cannot be derived for tuple structs",
                    ));
                }
            },
            Data::Enum(data) => {
                return Err(syn::Error::new(
                    data.enum_token.span,
                    "`Mapped` cannot be derived for enums",
                ));
            }
            Data::Union(data) => {
                return Err(syn::Error::new(
                    data.union_token.span,
                    "`Mapped` cannot be derived for unions",
                ));
            }
        };

        let attrs = TypeAttributes::parse_attrs(&ast.attrs)?;

        let mut fields = Vec::with_capacity(named.named.len());
        for field in &named.named {
            let field_attrs = FieldAttributes::parse_attrs(&field.attrs)?;
            if field_attrs.skip {
                continue;
            }
            // Named fields always have an ident.
            let Some(ident) = field.ident.as_ref() else {
                continue;
            };
            fields.push(MappedField {
                ident,
                ty: &field.ty,
                name: LitStr::new(&ident.unraw().to_string(), ident.span()),
                attrs: field_attrs,
            });
        }

        Ok(Self {
            vc_meta_path: crate::path::vc_meta(),
            ident: &ast.ident,
            attrs,
            fields,
        })
    }

    #[inline]
    pub fn vc_meta_path(&self) -> &syn::Path {
        &self.vc_meta_path
    }

    /// The expression of `Class::TYPE_PATH`.
    pub fn type_path_expression(&self) -> TokenStream {
        match &self.attrs.type_path {
            Some(lit) => lit.to_token_stream(),
            None => {
                let ident = self.ident;
                quote! {
                    ::core::concat!(::core::module_path!(), "::", ::core::stringify!(#ident))
                }
            }
        }
    }
}
