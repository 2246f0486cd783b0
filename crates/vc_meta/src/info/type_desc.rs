use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use chrono::DateTime;
use vc_value::Mapping;

use crate::MapError;
use crate::native::Native;
use crate::registry::ObjectFactory;

// -----------------------------------------------------------------------------
// TypeKind

/// The innermost kind of a [`TypeDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    String,
    Int,
    Float,
    Bool,
    /// An untyped, heterogeneous array.
    Array,
    /// An untyped property bag.
    Object,
    DateTime,
    /// A class, by absolute type path without the leading `::`.
    Named(String),
}

const TEMPORAL_KEYWORDS: [&str; 3] = ["datetime", "datetimeimmutable", "datetimeinterface"];

impl TypeKind {
    fn from_name(name: &str, namespace: &str) -> Option<TypeKind> {
        if name.is_empty() || name.eq_ignore_ascii_case("mixed") {
            return None;
        }

        match name.to_ascii_lowercase().as_str() {
            "string" => return Some(TypeKind::String),
            "int" | "integer" => return Some(TypeKind::Int),
            "float" | "double" => return Some(TypeKind::Float),
            "bool" | "boolean" => return Some(TypeKind::Bool),
            "array" => return Some(TypeKind::Array),
            "object" => return Some(TypeKind::Object),
            _ => {}
        }

        let absolute = name.strip_prefix("::");
        let unqualified = absolute.unwrap_or(name);
        if TEMPORAL_KEYWORDS
            .iter()
            .any(|keyword| unqualified.eq_ignore_ascii_case(keyword))
        {
            return Some(TypeKind::DateTime);
        }

        let path = match absolute {
            Some(path) => String::from(path),
            None => {
                let namespace = namespace.strip_prefix("::").unwrap_or(namespace);
                if namespace.is_empty() {
                    String::from(name)
                } else {
                    format!("{namespace}::{name}")
                }
            }
        };

        is_type_path(&path).then_some(TypeKind::Named(path))
    }
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn is_type_path(path: &str) -> bool {
    path.split("::").all(is_identifier)
}

// -----------------------------------------------------------------------------
// TypeDescriptor

/// The parsed form of a field's declared type.
///
/// # Syntax
///
/// - Scalars: `string`, `int` (`integer`), `float` (`double`), `bool`
///   (`boolean`). Keywords are case-insensitive.
/// - Untyped containers: `array`, `object`.
/// - Date/time: `datetime`, `DateTimeImmutable`, `DateTimeInterface`.
/// - Classes: `Name` is resolved against the enclosing namespace,
///   `::path::Name` is absolute.
/// - Each trailing `[]` adds one array layer: `int[][]`.
/// - Nullable: `?T`, `T|null` or `null|T`.
///
/// Unions of several concrete types, `mixed` and malformed names parse to
/// `None`, which the drivers treat as "no declared type".
///
/// # Examples
///
/// ```
/// use vc_meta::info::{TypeDescriptor, TypeKind};
///
/// let ty = TypeDescriptor::parse("?Address[]", "app::model").unwrap();
/// assert!(ty.is_nullable());
/// assert_eq!(ty.array_depth(), 1);
/// assert_eq!(ty.kind(), &TypeKind::Named("app::model::Address".into()));
/// assert_eq!(ty.to_string(), "?::app::model::Address[]");
///
/// assert!(TypeDescriptor::parse("int|string", "").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    nullable: bool,
    array_depth: usize,
    kind: TypeKind,
}

impl TypeDescriptor {
    /// Creates a non-nullable, non-array descriptor.
    #[inline]
    pub const fn new(kind: TypeKind) -> Self {
        Self {
            nullable: false,
            array_depth: 0,
            kind,
        }
    }

    #[inline]
    pub const fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Sets the number of array layers. Ignored for [`TypeKind::Array`],
    /// whose elements are untyped anyway.
    #[inline]
    pub fn with_array_depth(mut self, depth: usize) -> Self {
        if self.kind != TypeKind::Array {
            self.array_depth = depth;
        }
        self
    }

    /// Parses a declared type, see the [type-level docs](TypeDescriptor).
    ///
    /// `namespace` qualifies relative class names, usually the namespace
    /// of the class that declares the field.
    pub fn parse(raw: &str, namespace: &str) -> Option<Self> {
        let mut text = raw.trim();
        let mut nullable = false;

        if let Some(rest) = text.strip_prefix('?') {
            nullable = true;
            text = rest.trim_start();
        }

        let mut concrete = None;
        for part in text.split('|').map(str::trim) {
            if part.eq_ignore_ascii_case("null") {
                nullable = true;
            } else if concrete.replace(part).is_some() {
                log::debug!("union type `{raw}` is not supported, treated as undeclared");
                return None;
            }
        }

        let mut name = concrete?;
        let mut array_depth = 0;
        while let Some(rest) = name.strip_suffix("[]") {
            name = rest.trim_end();
            array_depth += 1;
        }

        let kind = TypeKind::from_name(name, namespace)?;
        Some(Self::new(kind).with_nullable(nullable).with_array_depth(array_depth))
    }

    #[inline]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Number of array layers, `0` for a plain value.
    #[inline]
    pub const fn array_depth(&self) -> usize {
        self.array_depth
    }

    #[inline]
    pub const fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// The descriptor of the elements one array layer down.
    ///
    /// Elements are never nullable. Returns `None` for plain values.
    pub fn element(&self) -> Option<TypeDescriptor> {
        (self.array_depth > 0).then(|| TypeDescriptor {
            nullable: false,
            array_depth: self.array_depth - 1,
            kind: self.kind.clone(),
        })
    }

    /// The value an absent optional field, or a lenient policy, falls back to.
    ///
    /// Nullable types default to null, arrays to an empty sequence, and
    /// classes to a fresh object from `factory`.
    pub fn default_native(&self, factory: &dyn ObjectFactory) -> Result<Native, MapError> {
        if self.nullable {
            return Ok(Native::Null);
        }
        if self.array_depth > 0 {
            return Ok(Native::Sequence(Vec::new()));
        }
        Ok(match &self.kind {
            TypeKind::String => Native::String(String::new()),
            TypeKind::Int => Native::Int(0),
            TypeKind::Float => Native::Float(0.0),
            TypeKind::Bool => Native::Bool(false),
            TypeKind::Array => Native::Sequence(Vec::new()),
            TypeKind::Object => Native::Mapping(Mapping::new()),
            TypeKind::DateTime => Native::DateTime(DateTime::UNIX_EPOCH),
            TypeKind::Named(path) => Native::Object(factory.create(path)?),
        })
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            f.write_str("?")?;
        }
        match &self.kind {
            TypeKind::String => f.write_str("string")?,
            TypeKind::Int => f.write_str("int")?,
            TypeKind::Float => f.write_str("float")?,
            TypeKind::Bool => f.write_str("bool")?,
            TypeKind::Array => f.write_str("array")?,
            TypeKind::Object => f.write_str("object")?,
            TypeKind::DateTime => f.write_str("datetime")?,
            TypeKind::Named(path) => write!(f, "::{path}")?,
        }
        for _ in 0..self.array_depth {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{TypeDescriptor, TypeKind};
    use alloc::string::ToString;

    fn parse(raw: &str) -> Option<TypeDescriptor> {
        TypeDescriptor::parse(raw, "app::model")
    }

    #[test]
    fn keywords() {
        assert_eq!(parse("string"), Some(TypeDescriptor::new(TypeKind::String)));
        assert_eq!(parse("Integer"), Some(TypeDescriptor::new(TypeKind::Int)));
        assert_eq!(parse("double"), Some(TypeDescriptor::new(TypeKind::Float)));
        assert_eq!(parse("BOOL"), Some(TypeDescriptor::new(TypeKind::Bool)));
        assert_eq!(parse("object"), Some(TypeDescriptor::new(TypeKind::Object)));
        assert_eq!(parse("DateTime"), Some(TypeDescriptor::new(TypeKind::DateTime)));
        assert_eq!(
            parse("::DateTimeImmutable"),
            Some(TypeDescriptor::new(TypeKind::DateTime))
        );
    }

    #[test]
    fn nullable_forms_agree() {
        let expected = TypeDescriptor::new(TypeKind::Int).with_nullable(true);
        assert_eq!(parse("?int"), Some(expected.clone()));
        assert_eq!(parse("int|null"), Some(expected.clone()));
        assert_eq!(parse("NULL | int"), Some(expected.clone()));
        assert_eq!(parse("?int|null"), Some(expected));
    }

    #[test]
    fn arrays() {
        let ty = parse("string[][]").unwrap();
        assert_eq!(ty.array_depth(), 2);
        assert!(!ty.is_nullable());

        let element = ty.element().unwrap();
        assert_eq!(element.to_string(), "string[]");
        assert_eq!(element.element().unwrap().element(), None);

        let nullable = parse("?int[]").unwrap();
        assert!(nullable.is_nullable());
        assert!(!nullable.element().unwrap().is_nullable());

        // Untyped arrays absorb nesting.
        assert_eq!(parse("array[]"), Some(TypeDescriptor::new(TypeKind::Array)));
    }

    #[test]
    fn named_types() {
        assert_eq!(
            parse("Address").map(|t| t.kind().clone()),
            Some(TypeKind::Named("app::model::Address".into()))
        );
        assert_eq!(
            parse("::geo::Point").map(|t| t.kind().clone()),
            Some(TypeKind::Named("geo::Point".into()))
        );
        assert_eq!(
            TypeDescriptor::parse("Point", "").map(|t| t.to_string()),
            Some("::Point".into())
        );
    }

    #[test]
    fn undeclared() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("   "), None);
        assert_eq!(parse("mixed"), None);
        assert_eq!(parse("null"), None);
        assert_eq!(parse("int|string"), None);
        assert_eq!(parse("?int|float"), None);
        assert_eq!(parse("Vec<i32>"), None);
        assert_eq!(parse("a::::b"), None);
        assert_eq!(parse("1abc"), None);
    }

    #[test]
    fn display_reparses_anywhere() {
        for raw in ["?string", "int[]", "?Address[][]", "datetime", "object"] {
            let ty = parse(raw).unwrap();
            let printed = ty.to_string();
            assert_eq!(TypeDescriptor::parse(&printed, "elsewhere"), Some(ty));
        }
    }
}
