//! Access policy of commands and slash-command nodes.

use std::collections::BTreeSet;

use soundcheck_types::{PermissionDef, PermissionType};

use crate::diagnostics::Diagnostics;
use crate::error::Error;

/// One override: allow or deny a set of roles or users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    kind: PermissionType,
    ids: BTreeSet<u64>,
    state: bool,
}

impl Permission {
    pub fn kind(&self) -> PermissionType {
        self.kind
    }

    /// Never empty.
    pub fn ids(&self) -> &BTreeSet<u64> {
        &self.ids
    }

    /// `true` allows, `false` denies.
    pub fn state(&self) -> bool {
        self.state
    }
}

/// Default permission plus ordered overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Access {
    default_permission: bool,
    overrides: Vec<Permission>,
}

impl Default for Access {
    fn default() -> Self {
        Self {
            default_permission: true,
            overrides: Vec::new(),
        }
    }
}

impl Access {
    /// Build the policy from a definition's permission keys.
    ///
    /// Without an explicit `default_permission`, a definition is allowed by
    /// default unless it lists `permissions`. Overrides without ids are
    /// reported and dropped.
    pub fn resolve(
        default_permission: Option<bool>,
        permissions: Option<&[PermissionDef]>,
        diagnostics: &mut Diagnostics,
    ) -> Result<Self, Error> {
        let default_permission = default_permission.unwrap_or(permissions.is_none());

        let mut overrides = Vec::new();
        for (index, def) in permissions.unwrap_or_default().iter().enumerate() {
            if def.ids.is_empty() {
                let mut scope = diagnostics.enter(format!("Permission {}", index + 1));
                scope.report("Permission has no ids")?;
                continue;
            }
            overrides.push(Permission {
                kind: def.kind,
                ids: def.ids.iter().copied().collect(),
                state: def.state,
            });
        }

        Ok(Self {
            default_permission,
            overrides,
        })
    }

    pub fn default_permission(&self) -> bool {
        self.default_permission
    }

    pub fn overrides(&self) -> &[Permission] {
        &self.overrides
    }
}
