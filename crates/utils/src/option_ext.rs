use crate::f;

/// Extends Option for bulk data field formatting
pub trait OptionExt {
    /// Either the contained value or an empty (blank) field
    ///
    /// Generic over anything that implements `Display`. Unset optional
    /// slots are written as blank fields in bulk data, so the `None`
    /// variant maps to the empty string.
    ///
    /// ```rust
    /// # use fetools_utils::OptionExt;
    /// let x: Option<u32> = Some(2);
    /// assert_eq!(x.field(), "2");
    ///
    /// let x: Option<u32> = None;
    /// assert_eq!(x.field(), "");
    /// ```
    fn field(&self) -> String;
}

impl<T: std::fmt::Display> OptionExt for Option<T> {
    fn field(&self) -> String {
        match self {
            Some(value) => f!("{value}"),
            None => String::new(),
        }
    }
}
