use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{Debug, Formatter};

/// The chain of fields the deserializer is currently inside.
///
/// Scalar coercion errors name the innermost field through it.
#[derive(Default, Clone)]
pub(super) struct FieldTrail {
    stack: Vec<String>,
}

impl FieldTrail {
    pub const fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn push(&mut self, field: &str) {
        self.stack.push(String::from(field));
    }

    pub fn pop(&mut self) {
        self.stack.pop();
    }

    /// The innermost field, or `<root>` outside of any object.
    pub fn current(&self) -> &str {
        self.stack.last().map_or("<root>", String::as_str)
    }
}

impl Debug for FieldTrail {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let mut iter = self.stack.iter();

        if let Some(first) = iter.next() {
            write!(f, "`{first}`")?;
        }

        for field in iter {
            write!(f, " -> `{field}`")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::FieldTrail;
    use alloc::format;

    #[test]
    fn current_field() {
        let mut trail = FieldTrail::new();
        assert_eq!(trail.current(), "<root>");

        trail.push("owner");
        trail.push("address");
        assert_eq!(trail.current(), "address");
        assert_eq!(format!("{trail:?}"), "`owner` -> `address`");

        trail.pop();
        assert_eq!(trail.current(), "owner");
    }
}
