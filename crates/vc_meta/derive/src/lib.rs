//! See [`Mapped`].
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static MAPPED_ATTRIBUTE_NAME: &str = "mapped";

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Mapping Metadata Derivation
///
/// `#[derive(Mapped)]` implements `Object` and `Class` for a struct with
/// named fields, which must also implement `Default`. Every field type must
/// implement `FieldValue`.
///
/// ## Type Attributes
///
/// ```rust, ignore
/// #[derive(Mapped, Default)]
/// #[mapped(type_path = "app::model::User", auto_register)]
/// struct User { /* ... */ }
/// ```
///
/// - `type_path`: the registered path. Defaults to `module_path!()::Ident`.
///   Relative class names in field types resolve against its namespace.
/// - `auto_register`: submit the class for `ClassRegistry::auto_register`.
///   Has no effect without the `auto_register` feature.
///
/// ## Field Attributes
///
/// ```rust, ignore
/// #[derive(Mapped, Default)]
/// struct User {
///     #[mapped(ty = "?int", ser(ignore_if_null))]
///     age: Option<i64>,
///     #[mapped(ty = "string", ser(rename_to = "mail"), de(source_name = "mail"))]
///     email: String,
///     #[mapped(ser(with = "User::write_roles"), de(with = "User::read_roles"))]
///     roles: Vec<String>,
///     #[mapped(skip)]
///     cache: Option<String>,
/// }
/// ```
///
/// - `ty`: the declared type, e.g. `"string[]"`, `"?Address"`, `"DateTime"`.
///   Without it, values pass through without coercion.
/// - `skip`: the field is not mapped at all.
/// - `ser(ignore)`, `ser(ignore_if_null)`, `ser(rename_to = "key")`.
/// - `de(ignore)`, `de(optional)`, `de(source_name = "key")`.
/// - `ser(with = "path")`: a method `fn(&Self, &mut Mapping, &str, &mut SerializeContext)`
///   that writes the field instead of the driver.
/// - `de(with = "path")`: a method `fn(&mut Self, &Mapping, &str, &mut DeserializeContext)`
///   that assigns the field instead of the driver.
///
/// Generic types, tuple structs, enums and unions are not supported.
#[proc_macro_derive(Mapped, attributes(mapped))]
pub fn derive_mapped(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match derive_data::MappedStruct::from_ast(&ast) {
        Ok(mapped) => impls::impl_mapped(&mapped).into(),
        Err(err) => err.into_compile_error().into(),
    }
}
