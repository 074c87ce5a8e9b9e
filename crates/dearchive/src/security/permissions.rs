//! Mapping between archive permission bits and the host filesystem.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use bitflags::bitflags;

use crate::ExtractionError;
use crate::Result;

bitflags! {
    /// The nine POSIX permission bits.
    ///
    /// Setuid, setgid, sticky and file-type bits are never represented.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PosixPermissions: u32 {
        /// Owner may read.
        const OWNER_READ = 0o400;
        /// Owner may write.
        const OWNER_WRITE = 0o200;
        /// Owner may execute.
        const OWNER_EXECUTE = 0o100;
        /// Group may read.
        const GROUP_READ = 0o040;
        /// Group may write.
        const GROUP_WRITE = 0o020;
        /// Group may execute.
        const GROUP_EXECUTE = 0o010;
        /// Others may read.
        const OTHERS_READ = 0o004;
        /// Others may write.
        const OTHERS_WRITE = 0o002;
        /// Others may execute.
        const OTHERS_EXECUTE = 0o001;
    }
}

bitflags! {
    /// DOS attributes used where POSIX permissions do not exist.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DosAttributes: u8 {
        /// File cannot be written.
        const READ_ONLY = 0x01;
        /// File is hidden from listings.
        const HIDDEN = 0x02;
    }
}

const SYMBOLIC_ORDER: [(PosixPermissions, char); 9] = [
    (PosixPermissions::OWNER_READ, 'r'),
    (PosixPermissions::OWNER_WRITE, 'w'),
    (PosixPermissions::OWNER_EXECUTE, 'x'),
    (PosixPermissions::GROUP_READ, 'r'),
    (PosixPermissions::GROUP_WRITE, 'w'),
    (PosixPermissions::GROUP_EXECUTE, 'x'),
    (PosixPermissions::OTHERS_READ, 'r'),
    (PosixPermissions::OTHERS_WRITE, 'w'),
    (PosixPermissions::OTHERS_EXECUTE, 'x'),
];

impl PosixPermissions {
    /// Builds the permission set from a mode, ignoring bits above `0o777`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dearchive::security::PosixPermissions;
    ///
    /// let perms = PosixPermissions::from_mode(0o100_755);
    /// assert_eq!(perms.to_mode(), 0o755);
    /// assert_eq!(perms.to_string(), "rwxr-xr-x");
    /// ```
    #[must_use]
    pub const fn from_mode(mode: u32) -> Self {
        Self::from_bits_truncate(mode & 0o777)
    }

    /// Returns the permission bits as a mode.
    #[must_use]
    pub const fn to_mode(self) -> u32 {
        self.bits()
    }
}

impl fmt::Display for PosixPermissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, symbol) in SYMBOLIC_ORDER {
            let c = if self.contains(flag) { symbol } else { '-' };
            fmt::Write::write_char(f, c)?;
        }
        Ok(())
    }
}

impl FromStr for PosixPermissions {
    type Err = ExtractionError;

    /// Parses the nine-character symbolic form, e.g. `rw-r--r--`.
    fn from_str(s: &str) -> Result<Self> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != SYMBOLIC_ORDER.len() {
            return Err(ExtractionError::InvalidArchive(format!(
                "invalid permission string '{s}'"
            )));
        }

        let mut perms = Self::empty();
        for (c, (flag, symbol)) in chars.into_iter().zip(SYMBOLIC_ORDER) {
            if c == symbol {
                perms |= flag;
            } else if c != '-' {
                return Err(ExtractionError::InvalidArchive(format!(
                    "invalid permission string '{s}'"
                )));
            }
        }
        Ok(perms)
    }
}

impl DosAttributes {
    /// Derives DOS attributes from a mode and a file name.
    ///
    /// A file the owner cannot write is read-only; a dot-file is hidden.
    ///
    /// # Examples
    ///
    /// ```
    /// use dearchive::security::DosAttributes;
    ///
    /// let attrs = DosAttributes::from_mode(0o444, ".profile");
    /// assert!(attrs.contains(DosAttributes::READ_ONLY | DosAttributes::HIDDEN));
    /// ```
    #[must_use]
    pub fn from_mode(mode: u32, file_name: &str) -> Self {
        let mut attrs = Self::empty();
        if !PosixPermissions::from_mode(mode).contains(PosixPermissions::OWNER_WRITE) {
            attrs |= Self::READ_ONLY;
        }
        if file_name.starts_with('.') {
            attrs |= Self::HIDDEN;
        }
        attrs
    }
}

/// Applies archive permission bits to an extracted path.
///
/// On Unix the nine permission bits are set exactly. Elsewhere only the
/// read-only attribute is honored and failures are logged, never returned.
///
/// # Errors
///
/// Returns `ExtractionError::Io` if setting permissions fails (Unix only).
pub fn apply_permissions(path: &Path, mode: u32) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let perms = PosixPermissions::from_mode(mode);
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(perms.to_mode()))?;
        Ok(())
    }

    #[cfg(not(unix))]
    {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let attrs = DosAttributes::from_mode(mode, &name);
        let applied = std::fs::metadata(path).and_then(|metadata| {
            let mut perms = metadata.permissions();
            perms.set_readonly(attrs.contains(DosAttributes::READ_ONLY));
            std::fs::set_permissions(path, perms)
        });
        if let Err(e) = applied {
            log::debug!("ignoring attribute failure on {}: {e}", path.display());
        }
        Ok(())
    }
}
