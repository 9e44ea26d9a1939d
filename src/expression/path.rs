use std::fmt;

/// A dotted variable path such as `user.profile.name`.
///
/// `root` is the key looked up in the variable store; `keys` are applied one after
/// another as property or index accesses on the result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VarPath {
    pub root: String,
    pub keys: Vec<String>,
}

impl VarPath {
    /// Parses the text between `${` and `}`. Returns `None` when no root name is present.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw
            .split('.')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);
        let root = parts.next()?;
        Some(Self {
            root,
            keys: parts.collect(),
        })
    }
}

impl fmt::Display for VarPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)?;
        for key in &self.keys {
            write!(f, ".{}", key)?;
        }
        Ok(())
    }
}
