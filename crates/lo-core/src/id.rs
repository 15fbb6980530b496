//! LO identifier helpers.
//!
//! An LO id has the shape `<module>-<rest>`. The module prefix groups LOs of
//! the same curricular unit and is everything before the first delimiter.
//! An id without a delimiter is its own module.

/// Default delimiter between the module prefix and the rest of an LO id.
pub const MODULE_DELIMITER: char = '-';

/// Module prefix of `id` using the default delimiter.
pub fn module_prefix(id: &str) -> &str {
    module_prefix_with(id, MODULE_DELIMITER)
}

/// Module prefix of `id`, split at the first `delimiter`.
pub fn module_prefix_with(id: &str, delimiter: char) -> &str {
    id.split_once(delimiter).map_or(id, |(prefix, _)| prefix)
}
