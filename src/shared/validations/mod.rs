/// Returns the field value when it is present and non-empty.
///
/// Request bodies carry every field as `Option<String>`; an empty string
/// counts as missing, the same as an absent key.
pub fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.is_empty())
}
