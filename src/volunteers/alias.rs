//! Member aliases.
//!
//! Members can pick nicknames and use them instead of their chat identity in
//! every command. Aliases are matched case-insensitively and always point to
//! exactly one canonical name.

use std::collections::HashMap;

use log::debug;

use crate::{
    error::CommandError,
    sheets::{Rows, cell_text},
};

/// A registered nickname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    /// The nickname, as typed when it was registered
    pub alias: String,
    /// The canonical name it stands for
    pub name: String,
}

impl Alias {
    /// Spreadsheet row for this alias: `[alias, name]`.
    pub fn to_row(&self) -> Vec<serde_json::Value> {
        vec![self.alias.clone().into(), self.name.clone().into()]
    }
}

/// Case-insensitive alias lookup built from the alias table.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    /// Lowercased alias -> canonical name
    aliases: HashMap<String, String>,
}

impl AliasTable {
    /// Builds the table from `[alias, name]` rows.
    ///
    /// Rows with an empty alias or name are skipped. When the same alias
    /// appears twice, the first row wins.
    pub fn from_rows(rows: &Rows) -> Self {
        let mut aliases = HashMap::new();

        for row in rows {
            let alias = row.first().map(cell_text).unwrap_or_default();
            let name = row.get(1).map(cell_text).unwrap_or_default();
            let (alias, name) = (alias.trim(), name.trim());
            if alias.is_empty() || name.is_empty() {
                continue;
            }
            aliases
                .entry(alias.to_lowercase())
                .or_insert_with(|| name.to_string());
        }

        debug!("loaded {} aliases", aliases.len());

        AliasTable { aliases }
    }

    /// Returns the canonical name for `name_or_alias`.
    ///
    /// Input that is not a known alias is already canonical and is returned
    /// unchanged.
    pub fn resolve(&self, name_or_alias: &str) -> String {
        match self.aliases.get(&name_or_alias.to_lowercase()) {
            Some(name) => name.clone(),
            None => name_or_alias.to_string(),
        }
    }

    /// Whether `alias` is registered, whatever its case.
    pub fn contains_alias(&self, alias: &str) -> bool {
        self.aliases.contains_key(&alias.to_lowercase())
    }

    /// Canonical names referenced by the aliases.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.aliases.values().map(String::as_str)
    }

    /// Checks that `alias` can be given to `person` and returns the mapping to
    /// store.
    ///
    /// `person` may itself be an alias, it is resolved first. `known_names` are
    /// canonical names found elsewhere (e.g. in the hours ledger).
    ///
    /// # Errors
    ///
    /// [`CommandError::AliasConflict`] when `alias` is already an alias, or is
    /// the canonical name of someone other than `person`.
    pub fn check_new_alias<'a>(
        &'a self,
        person: &str,
        alias: &str,
        known_names: impl IntoIterator<Item = &'a str>,
    ) -> Result<Alias, CommandError> {
        let name = self.resolve(person);

        if self.contains_alias(alias) {
            debug!("alias {} already registered", alias);
            return Err(CommandError::AliasConflict(alias.to_string()));
        }

        let lowered = alias.to_lowercase();
        let own = name.to_lowercase();
        let taken = self
            .names()
            .chain(known_names)
            .map(str::to_lowercase)
            .any(|other| other == lowered && other != own);
        if taken {
            debug!("alias {} is the name of another member", alias);
            return Err(CommandError::AliasConflict(alias.to_string()));
        }

        Ok(Alias {
            alias: alias.to_string(),
            name,
        })
    }

    /// Whether `sender` and `target` resolve to the same member.
    pub fn is_same_person(&self, sender: &str, target: &str) -> bool {
        self.resolve(sender).to_lowercase() == self.resolve(target).to_lowercase()
    }
}
