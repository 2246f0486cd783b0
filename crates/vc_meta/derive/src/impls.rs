//! Code generation of `Object`, `Class` and the auto registration.

use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::{MappedField, MappedStruct};

pub(crate) fn impl_mapped(mapped: &MappedStruct) -> TokenStream {
    let object_impl = impl_object(mapped);
    let class_impl = impl_class(mapped);
    let auto_register_impl = impl_auto_register(mapped);

    quote! {
        #object_impl

        #class_impl

        #auto_register_impl
    }
}

// -----------------------------------------------------------------------------
// Object

fn impl_object(mapped: &MappedStruct) -> TokenStream {
    let vc_meta_path = mapped.vc_meta_path();
    let object_ = crate::path::object_(vc_meta_path);
    let native_ = crate::path::native_(vc_meta_path);
    let field_value_ = crate::path::field_value_(vc_meta_path);
    let convert_error_ = crate::path::convert_error_(vc_meta_path);
    let class_ = crate::path::class_(vc_meta_path);
    let ident = mapped.ident;

    let names = mapped.fields.iter().map(|field| &field.name);

    let get_arms = mapped.fields.iter().map(|field| {
        let MappedField { ident, name, .. } = field;
        quote! {
            #name => ::core::option::Option::Some(#field_value_::to_native(&self.#ident)),
        }
    });

    let set_arms = mapped.fields.iter().map(|field| {
        let MappedField { ident, ty, name, .. } = field;
        quote! {
            #name => {
                self.#ident = <#ty as #field_value_>::from_native(value)?;
                ::core::result::Result::Ok(())
            }
        }
    });

    quote! {
        impl #object_ for #ident {
            #[inline]
            fn type_path(&self) -> &'static str {
                <Self as #class_>::TYPE_PATH
            }

            #[inline]
            fn field_names(&self) -> &'static [&'static str] {
                &[#(#names),*]
            }

            fn field(&self, name: &str) -> ::core::option::Option<#native_> {
                match name {
                    #(#get_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            #[allow(unused_variables, reason = "classes without fields")]
            fn set_field(
                &mut self,
                name: &str,
                value: #native_,
            ) -> ::core::result::Result<(), #convert_error_> {
                match name {
                    #(#set_arms)*
                    _ => ::core::result::Result::Err(#convert_error_::unknown_field(name)),
                }
            }

            #[inline]
            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            #[inline]
            fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
                self
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Class

fn field_meta_expression(mapped: &MappedStruct, field: &MappedField) -> TokenStream {
    let vc_meta_path = mapped.vc_meta_path();
    let field_meta_ = crate::path::field_meta_(vc_meta_path);
    let attrs = &field.attrs;
    let name = &field.name;

    let with_type = attrs.ty.as_ref().map(|ty| quote! { .with_type(#ty) });

    let with_serialize = attrs.ser.has_directives().then(|| {
        let directives_ = crate::path::serialize_directives_(vc_meta_path);
        let ignore = attrs.ser.ignore.then(|| quote! { .ignore() });
        let ignore_if_null = attrs.ser.ignore_if_null.then(|| quote! { .ignore_if_null() });
        let rename_to = attrs.ser.rename_to.as_ref().map(|key| quote! { .rename_to(#key) });
        quote! {
            .with_serialize(#directives_::new() #ignore #ignore_if_null #rename_to)
        }
    });

    let with_deserialize = attrs.de.has_directives().then(|| {
        let directives_ = crate::path::deserialize_directives_(vc_meta_path);
        let ignore = attrs.de.ignore.then(|| quote! { .ignore() });
        let optional = attrs.de.optional.then(|| quote! { .optional() });
        let source_name = attrs.de.source_name.as_ref().map(|key| quote! { .source_name(#key) });
        quote! {
            .with_deserialize(#directives_::new() #ignore #optional #source_name)
        }
    });

    let with_serialize_hook = attrs.ser.with.as_ref().map(|(hook_name, hook)| {
        let hook_ = crate::path::serialize_hook_(vc_meta_path);
        quote! {
            .with_serialize_hook(#hook_::of::<Self>(#hook_name, #hook))
        }
    });

    let with_deserialize_hook = attrs.de.with.as_ref().map(|(hook_name, hook)| {
        let hook_ = crate::path::deserialize_hook_(vc_meta_path);
        quote! {
            .with_deserialize_hook(#hook_::of::<Self>(#hook_name, #hook))
        }
    });

    quote! {
        #field_meta_::new(#name)
            #with_type
            #with_serialize
            #with_deserialize
            #with_serialize_hook
            #with_deserialize_hook
    }
}

fn impl_class(mapped: &MappedStruct) -> TokenStream {
    let vc_meta_path = mapped.vc_meta_path();
    let class_ = crate::path::class_(vc_meta_path);
    let class_meta_ = crate::path::class_meta_(vc_meta_path);
    let ident = mapped.ident;
    let type_path = mapped.type_path_expression();

    let fields = mapped
        .fields
        .iter()
        .map(|field| field_meta_expression(mapped, field));

    quote! {
        impl #class_ for #ident {
            const TYPE_PATH: &'static str = #type_path;

            fn class_meta() -> #class_meta_ {
                #class_meta_::new::<Self>(
                    <Self as #class_>::TYPE_PATH,
                    [#(#fields),*],
                )
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Auto Register

#[cfg(feature = "auto_register")]
fn impl_auto_register(mapped: &MappedStruct) -> TokenStream {
    let Some(span) = mapped.attrs.auto_register else {
        return TokenStream::new();
    };

    let auto_register_ = crate::path::auto_register_(mapped.vc_meta_path());
    let ident = mapped.ident;

    quote::quote_spanned! { span =>
        #auto_register_::inventory::submit! {
            #auto_register_::AutoRegisterFn(#auto_register_::register_class::<#ident>)
        }
    }
}

#[cfg(not(feature = "auto_register"))]
fn impl_auto_register(_: &MappedStruct) -> TokenStream {
    TokenStream::new()
}
