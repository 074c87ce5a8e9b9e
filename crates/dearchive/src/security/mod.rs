//! Security checks applied to every entry before it touches the disk.

pub mod path;
pub mod permissions;
pub mod symlink;

pub use path::sanitize_name;
pub use permissions::DosAttributes;
pub use permissions::PosixPermissions;
pub use permissions::apply_permissions;
pub use symlink::resolve_symlink_target;
