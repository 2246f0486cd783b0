use alloc::borrow::Cow;

use bitflags::bitflags;

bitflags! {
    /// Flags of [`SerializeDirectives`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SerializeFlags: u8 {
        /// Never write the field.
        const IGNORE         = 1 << 0;
        /// Skip the field while its value is null.
        const IGNORE_IF_NULL = 1 << 1;
    }
}

bitflags! {
    /// Flags of [`DeserializeDirectives`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DeserializeFlags: u8 {
        /// Never assign the field, it keeps its factory default.
        const IGNORE   = 1 << 0;
        /// A missing input key assigns null or the type default.
        const OPTIONAL = 1 << 1;
    }
}

// -----------------------------------------------------------------------------
// SerializeDirectives

/// Field directives applied while writing a value tree.
///
/// # Examples
///
/// ```
/// use vc_meta::info::SerializeDirectives;
///
/// let directives = SerializeDirectives::new().ignore_if_null().rename_to("fieldC");
/// assert!(directives.is_ignore_if_null());
/// assert_eq!(directives.output_key("c"), "fieldC");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializeDirectives {
    flags: SerializeFlags,
    rename_to: Option<Cow<'static, str>>,
}

impl SerializeDirectives {
    #[inline]
    pub const fn new() -> Self {
        Self {
            flags: SerializeFlags::empty(),
            rename_to: None,
        }
    }

    #[inline]
    pub fn ignore(mut self) -> Self {
        self.flags |= SerializeFlags::IGNORE;
        self
    }

    #[inline]
    pub fn ignore_if_null(mut self) -> Self {
        self.flags |= SerializeFlags::IGNORE_IF_NULL;
        self
    }

    /// Writes the field under `key` instead of its name.
    #[inline]
    pub fn rename_to(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.rename_to = Some(key.into());
        self
    }

    #[inline]
    pub const fn flags(&self) -> SerializeFlags {
        self.flags
    }

    #[inline]
    pub const fn is_ignore(&self) -> bool {
        self.flags.contains(SerializeFlags::IGNORE)
    }

    #[inline]
    pub const fn is_ignore_if_null(&self) -> bool {
        self.flags.contains(SerializeFlags::IGNORE_IF_NULL)
    }

    #[inline]
    pub fn renamed(&self) -> Option<&str> {
        self.rename_to.as_deref()
    }

    /// The key the field is written under.
    #[inline]
    pub fn output_key<'a>(&'a self, field: &'a str) -> &'a str {
        self.renamed().unwrap_or(field)
    }
}

// -----------------------------------------------------------------------------
// DeserializeDirectives

/// Field directives applied while reading a value tree.
///
/// # Examples
///
/// ```
/// use vc_meta::info::DeserializeDirectives;
///
/// let directives = DeserializeDirectives::new().optional().source_name("fieldC");
/// assert!(directives.is_optional());
/// assert_eq!(directives.input_key("c"), "fieldC");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeserializeDirectives {
    flags: DeserializeFlags,
    source_name: Option<Cow<'static, str>>,
}

impl DeserializeDirectives {
    #[inline]
    pub const fn new() -> Self {
        Self {
            flags: DeserializeFlags::empty(),
            source_name: None,
        }
    }

    #[inline]
    pub fn ignore(mut self) -> Self {
        self.flags |= DeserializeFlags::IGNORE;
        self
    }

    #[inline]
    pub fn optional(mut self) -> Self {
        self.flags |= DeserializeFlags::OPTIONAL;
        self
    }

    /// Reads the field from `key` instead of its name.
    #[inline]
    pub fn source_name(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.source_name = Some(key.into());
        self
    }

    #[inline]
    pub const fn flags(&self) -> DeserializeFlags {
        self.flags
    }

    #[inline]
    pub const fn is_ignore(&self) -> bool {
        self.flags.contains(DeserializeFlags::IGNORE)
    }

    #[inline]
    pub const fn is_optional(&self) -> bool {
        self.flags.contains(DeserializeFlags::OPTIONAL)
    }

    #[inline]
    pub fn renamed(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    /// The key the field is read from.
    #[inline]
    pub fn input_key<'a>(&'a self, field: &'a str) -> &'a str {
        self.renamed().unwrap_or(field)
    }
}
