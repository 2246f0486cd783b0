//! Paths into `vc_meta` used by generated code.

use proc_macro2::TokenStream;
use quote::quote;

/// Gets the access path to the `vc_meta` crate.
///
/// 1. For crates that depend on `vc_meta`, `::vc_meta` is returned.
/// 2. For crates that depend on `vc_mapper`, `::vc_mapper::meta` is returned.
/// 3. Otherwise `::vc_meta` is returned, which may be incorrect.
///
/// This reads the caller's `Cargo.toml`, so it is called once per derive and
/// the path is passed along.
pub(crate) fn vc_meta() -> syn::Path {
    vc_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("vc_meta"))
}

#[inline(always)]
pub(crate) fn object_(vc_meta_path: &syn::Path) -> TokenStream {
    quote! { #vc_meta_path::native::Object }
}

#[inline(always)]
pub(crate) fn native_(vc_meta_path: &syn::Path) -> TokenStream {
    quote! { #vc_meta_path::native::Native }
}

#[inline(always)]
pub(crate) fn field_value_(vc_meta_path: &syn::Path) -> TokenStream {
    quote! { #vc_meta_path::native::FieldValue }
}

#[inline(always)]
pub(crate) fn convert_error_(vc_meta_path: &syn::Path) -> TokenStream {
    quote! { #vc_meta_path::native::ConvertError }
}

#[inline(always)]
pub(crate) fn class_(vc_meta_path: &syn::Path) -> TokenStream {
    quote! { #vc_meta_path::registry::Class }
}

#[inline(always)]
pub(crate) fn class_meta_(vc_meta_path: &syn::Path) -> TokenStream {
    quote! { #vc_meta_path::info::ClassMeta }
}

#[inline(always)]
pub(crate) fn field_meta_(vc_meta_path: &syn::Path) -> TokenStream {
    quote! { #vc_meta_path::info::FieldMeta }
}

#[inline(always)]
pub(crate) fn serialize_directives_(vc_meta_path: &syn::Path) -> TokenStream {
    quote! { #vc_meta_path::info::SerializeDirectives }
}

#[inline(always)]
pub(crate) fn deserialize_directives_(vc_meta_path: &syn::Path) -> TokenStream {
    quote! { #vc_meta_path::info::DeserializeDirectives }
}

#[inline(always)]
pub(crate) fn serialize_hook_(vc_meta_path: &syn::Path) -> TokenStream {
    quote! { #vc_meta_path::ser::SerializeHook }
}

#[inline(always)]
pub(crate) fn deserialize_hook_(vc_meta_path: &syn::Path) -> TokenStream {
    quote! { #vc_meta_path::de::DeserializeHook }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(vc_meta_path: &syn::Path) -> TokenStream {
    quote! { #vc_meta_path::__macro_exports::auto_register }
}
