use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::hash::{Hash, HASH_LEN};
use crate::hasher::ContentHasher;

/// File mode for a tree entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryMode {
    /// Normal file (0o100644).
    Regular,
    /// Executable file (0o100755).
    Executable,
    /// Symbolic link (0o120000).
    Symlink,
    /// Subtree / directory (0o040000).
    Directory,
    /// Link to a commit in another repository (0o160000). Never dereferenced.
    Submodule,
}

impl EntryMode {
    /// Canonical git mode bits.
    pub fn mode_bits(&self) -> u32 {
        match self {
            Self::Regular => 0o100644,
            Self::Executable => 0o100755,
            Self::Symlink => 0o120000,
            Self::Directory => 0o040000,
            Self::Submodule => 0o160000,
        }
    }

    /// Parse from git mode bits.
    ///
    /// The pre-1.0 git group-writable mode `100664` is read as `Regular`.
    /// That mapping is lossy: a tree holding such an entry re-encodes with
    /// `100644`, so its [`Tree::compute_hash`] differs from the id it was
    /// read under.
    pub fn from_mode_bits(bits: u32) -> Option<Self> {
        match bits {
            0o100644 | 0o100664 => Some(Self::Regular),
            0o100755 => Some(Self::Executable),
            0o120000 => Some(Self::Symlink),
            0o040000 => Some(Self::Directory),
            0o160000 => Some(Self::Submodule),
            _ => None,
        }
    }

    /// Git object type name of the entry's target.
    pub fn object_type(&self) -> &'static str {
        match self {
            Self::Regular | Self::Executable | Self::Symlink => "blob",
            Self::Directory => "tree",
            Self::Submodule => "commit",
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory)
    }

    /// Submodule targets live in another repository and must not be fetched.
    pub fn is_submodule(&self) -> bool {
        matches!(self, Self::Submodule)
    }
}

impl std::fmt::Display for EntryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:06o}", self.mode_bits())
    }
}

/// Check that `name` is usable as a single path component.
pub fn validate_path_component(name: &str) -> Result<(), TypeError> {
    let reason = if name.is_empty() {
        "empty name"
    } else if name == "." || name == ".." {
        "relative component"
    } else if name.contains('/') {
        "contains a path separator"
    } else if name.contains('\0') {
        "contains a NUL byte"
    } else {
        return Ok(());
    };
    Err(TypeError::InvalidPathComponent {
        name: name.to_string(),
        reason,
    })
}

/// A single entry in a tree object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// File mode (regular, executable, symlink, directory, submodule).
    pub mode: EntryMode,
    /// Entry name, a single path component.
    pub name: String,
    /// Hash of the referenced object.
    pub hash: Hash,
}

impl TreeEntry {
    /// Create a new tree entry.
    pub fn new(mode: EntryMode, name: impl Into<String>, hash: Hash) -> Self {
        Self {
            mode,
            name: name.into(),
            hash,
        }
    }
}

/// Directory listing object.
///
/// Entry order is significant: it is the order the backend enumerated the
/// entries in, and the canonical encoding (and therefore the tree's hash)
/// depends on it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    /// Create a tree with the given entries, keeping their order.
    pub fn new(entries: Vec<TreeEntry>) -> Self {
        Self { entries }
    }

    /// Create an empty tree.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TreeEntry> {
        self.entries.iter()
    }

    /// Encode in git's canonical tree layout:
    ///
    /// ```text
    /// <octal mode> SP <name> NUL <20 raw id bytes>   (repeated)
    /// ```
    pub fn encode_git(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.entries.len() * (HASH_LEN + 32));
        for entry in &self.entries {
            out.extend_from_slice(format!("{:o}", entry.mode.mode_bits()).as_bytes());
            out.push(b' ');
            out.extend_from_slice(entry.name.as_bytes());
            out.push(0);
            out.extend_from_slice(entry.hash.as_bytes());
        }
        out
    }

    /// Decode git's canonical tree layout.
    ///
    /// Either every entry decodes or an error is returned; a partially
    /// decoded tree is never produced.
    pub fn decode_git(data: &[u8]) -> Result<Self, TypeError> {
        let mut entries = Vec::new();
        let mut pos = 0;
        while pos < data.len() {
            let space = find_byte(data, pos, b' ')
                .ok_or_else(|| malformed(pos, "missing mode terminator"))?;
            let mode_text = std::str::from_utf8(&data[pos..space])
                .map_err(|_| malformed(pos, "mode is not ASCII"))?;
            if mode_text.is_empty() {
                return Err(malformed(pos, "empty mode"));
            }
            let bits = u32::from_str_radix(mode_text, 8)
                .map_err(|_| malformed(pos, format!("mode {mode_text:?} is not octal")))?;
            let mode = EntryMode::from_mode_bits(bits).ok_or(TypeError::UnknownMode(bits))?;

            let name_start = space + 1;
            let nul = find_byte(data, name_start, 0)
                .ok_or_else(|| malformed(name_start, "missing name terminator"))?;
            let name = std::str::from_utf8(&data[name_start..nul])
                .map_err(|_| malformed(name_start, "name is not UTF-8"))?;
            validate_path_component(name)?;

            let id_start = nul + 1;
            let id_end = id_start + HASH_LEN;
            if id_end > data.len() {
                return Err(malformed(id_start, "truncated object id"));
            }
            let hash = Hash::from_slice(&data[id_start..id_end])?;

            entries.push(TreeEntry::new(mode, name, hash));
            pos = id_end;
        }
        Ok(Self { entries })
    }

    /// Git object id of this tree's canonical encoding.
    pub fn compute_hash(&self) -> Hash {
        ContentHasher::TREE.hash(&self.encode_git())
    }

    /// Check every entry name with [`validate_path_component`].
    ///
    /// A tree that passes encodes unambiguously and decodes back to itself.
    pub fn validate(&self) -> Result<(), TypeError> {
        self.entries
            .iter()
            .try_for_each(|entry| validate_path_component(&entry.name))
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = &'a TreeEntry;
    type IntoIter = std::slice::Iter<'a, TreeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn find_byte(data: &[u8], from: usize, needle: u8) -> Option<usize> {
    data[from..].iter().position(|&b| b == needle).map(|i| from + i)
}

fn malformed(offset: usize, reason: impl Into<String>) -> TypeError {
    TypeError::MalformedTree {
        offset,
        reason: reason.into(),
    }
}
