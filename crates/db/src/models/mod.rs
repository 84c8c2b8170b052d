pub mod project;
pub mod shot;
pub mod task;
pub mod version;

/// Treat an absent or empty filter string as "no constraint".
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
