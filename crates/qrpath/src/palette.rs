//! Role to fill colour lookup.

use std::collections::BTreeMap;

/// Colour shared by the built-in roles.
pub const ROLE_COLOR: &str = "#F2F1F2";

/// Roles with a built-in colour.
pub const DEFAULT_ROLES: [&str; 4] = ["hacker", "mentor", "organizacion", "patrocinador"];

/// Fill colours keyed by role, matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: BTreeMap<String, String>,
}

impl Palette {
    /// A palette with no roles.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            colors: BTreeMap::new(),
        }
    }

    /// Set the colour for `role`, replacing any earlier one.
    pub fn set(&mut self, role: &str, color: impl Into<String>) {
        self.colors.insert(role.to_lowercase(), color.into());
    }

    /// The colour for `role`, if it has one.
    #[must_use]
    pub fn get(&self, role: &str) -> Option<&str> {
        self.colors.get(&role.to_lowercase()).map(String::as_str)
    }

    /// Number of roles with a colour.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }
}

impl Default for Palette {
    fn default() -> Self {
        let mut palette = Self::empty();
        for role in DEFAULT_ROLES {
            palette.set(role, ROLE_COLOR);
        }
        palette
    }
}

impl<R: AsRef<str>, C: Into<String>> Extend<(R, C)> for Palette {
    fn extend<I: IntoIterator<Item = (R, C)>>(&mut self, iter: I) {
        for (role, color) in iter {
            self.set(role.as_ref(), color);
        }
    }
}

/// Parse a `ROLE=COLOR` command-line assignment.
///
/// # Errors
///
/// Returns a message if there is no `=` or either side is empty.
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (role, color) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ROLE=COLOR, got {s:?}"))?;
    let (role, color) = (role.trim(), color.trim());
    if role.is_empty() || color.is_empty() {
        return Err(format!("expected ROLE=COLOR, got {s:?}"));
    }
    Ok((role.to_owned(), color.to_owned()))
}
