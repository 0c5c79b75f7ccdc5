//! The script: root of the statement tree.
//!
//! A [`ZestScript`] carries metadata, parameters and authentication, and
//! owns the top-level statement list. It is index 0 of the tree; its
//! statements and everything nested inside them are numbered from 1 in
//! document order.
//!
//! # Example
//!
//! ```
//! use zest_core::container::ZestContainer;
//! use zest_core::loops::ZestLoop;
//! use zest_core::script::{ScriptType, ZestScript};
//! use zest_core::statement::Statement;
//!
//! let mut script = ZestScript::new("login", "log in and poke around", ScriptType::StandAlone);
//! let mut lp = ZestLoop::integer("i", 0, 3);
//! lp.add(Statement::comment("iteration {{i}}"));
//! script.add(lp.into());
//! script.add(Statement::comment("done"));
//!
//! assert_eq!(script.statement_count(), 3);
//! assert_eq!(script.next(1).map(|s| s.name()), Some("comment"));
//! assert!(script.variable_names().contains("i"));
//! ```

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::auth::ZestAuthentication;
use crate::container::{find_in, locate_mut, Chain, ZestContainer};
use crate::error::ZestError;
use crate::loops::ZestLoopInteger;
use crate::statement::{Statement, StatementKind};
use crate::variables::{ZestVariables, STANDARD_VARIABLES};

/// The only Zest version this library reads and writes.
pub const VERSION: &str = "0.15";

/// Where Zest lives.
pub const ZEST_URL: &str = "https://github.com/zaproxy/zest/";

/// Default `about` text of a new script.
pub const ABOUT: &str = "This is a Zest script. For more details about Zest visit https://github.com/zaproxy/zest/";

/// What a script does with its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ScriptType {
    /// Attacks a request passed in by the host.
    Active,
    /// Inspects a request/response pair without sending anything.
    Passive,
    /// Acts on a target named inside the script.
    StandAlone,
    /// May rewrite and resend a request passed in by the host.
    Targeted,
}

impl ScriptType {
    /// Canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            ScriptType::Active => "Active",
            ScriptType::Passive => "Passive",
            ScriptType::StandAlone => "StandAlone",
            ScriptType::Targeted => "Targeted",
        }
    }
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScriptType {
    type Err = ZestError;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(ScriptType::Active),
            "passive" => Ok(ScriptType::Passive),
            "standalone" => Ok(ScriptType::StandAlone),
            "targeted" => Ok(ScriptType::Targeted),
            _ => Err(ZestError::UnsupportedType(s.to_string())),
        }
    }
}

impl TryFrom<String> for ScriptType {
    type Error = ZestError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ScriptType> for String {
    fn from(value: ScriptType) -> Self {
        value.name().to_string()
    }
}

fn default_about() -> String {
    ABOUT.to_string()
}

fn default_version() -> String {
    VERSION.to_string()
}

fn deserialize_version<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let version = String::deserialize(deserializer)?;
    check_version(&version).map_err(serde::de::Error::custom)?;
    Ok(version)
}

fn check_version(version: &str) -> Result<(), ZestError> {
    if version == VERSION {
        Ok(())
    } else {
        Err(ZestError::UnsupportedVersion(version.to_string()))
    }
}

/// A complete Zest script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZestScript {
    #[serde(default = "default_about")]
    pub about: String,
    #[serde(default = "default_version", deserialize_with = "deserialize_version")]
    zest_version: String,
    #[serde(default)]
    pub generated_by: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    prefix: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    script_type: Option<ScriptType>,
    /// Declared parameters and their default values.
    #[serde(default)]
    pub parameters: ZestVariables,
    #[serde(default)]
    authentication: Vec<ZestAuthentication>,
    #[serde(default)]
    statements: Vec<Statement>,
}

impl Default for ZestScript {
    fn default() -> Self {
        Self {
            about: default_about(),
            zest_version: default_version(),
            generated_by: String::new(),
            author: String::new(),
            title: String::new(),
            description: String::new(),
            prefix: String::new(),
            script_type: None,
            parameters: ZestVariables::new(),
            authentication: Vec::new(),
            statements: Vec::new(),
        }
    }
}

impl ZestScript {
    pub fn new(title: impl Into<String>, description: impl Into<String>, script_type: ScriptType) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            script_type: Some(script_type),
            ..Self::default()
        }
    }

    /// Read a script from JSON, enforcing type, version and pattern rules.
    pub fn from_json(json: &str) -> Result<Self, ZestError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, ZestError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // ------------------------------------------------------------------
    // Metadata
    // ------------------------------------------------------------------

    pub fn script_type(&self) -> Option<ScriptType> {
        self.script_type
    }

    /// Canonical name of the script type, if one is set.
    pub fn type_name(&self) -> Option<&'static str> {
        self.script_type.map(|t| t.name())
    }

    pub fn set_script_type(&mut self, script_type: ScriptType) {
        self.script_type = Some(script_type);
    }

    /// Set the type from a case-insensitive name.
    ///
    /// An unknown name is rejected and the current type is kept.
    pub fn set_type(&mut self, name: &str) -> Result<(), ZestError> {
        let script_type = name.parse()?;
        self.script_type = Some(script_type);
        Ok(())
    }

    pub fn zest_version(&self) -> &str {
        &self.zest_version
    }

    /// Only [`VERSION`] is accepted.
    pub fn set_zest_version(&mut self, version: &str) -> Result<(), ZestError> {
        check_version(version)?;
        self.zest_version = version.to_string();
        Ok(())
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Rewrite every URL starting with the current prefix to start with
    /// `new_prefix`, then record `new_prefix`.
    pub fn set_prefix(&mut self, new_prefix: &str) {
        let old = std::mem::take(&mut self.prefix);
        self.rewrite_prefix(&old, new_prefix);
    }

    /// Rewrite every URL starting with `old_prefix` to start with
    /// `new_prefix`, then record `new_prefix`.
    ///
    /// Statements are left alone when `new_prefix` is empty.
    pub fn rewrite_prefix(&mut self, old_prefix: &str, new_prefix: &str) {
        if !new_prefix.is_empty() {
            debug!(old = old_prefix, new = new_prefix, "rewriting prefix");
            for stmt in self.statements.iter_mut() {
                stmt.set_prefix(old_prefix, new_prefix);
            }
        }
        self.prefix = new_prefix.to_string();
    }

    /// True for passive scripts.
    pub fn is_passive(&self) -> bool {
        self.script_type == Some(ScriptType::Passive)
    }

    pub fn authentication(&self) -> &[ZestAuthentication] {
        &self.authentication
    }

    pub fn add_authentication(&mut self, auth: ZestAuthentication) {
        self.authentication.push(auth);
    }

    /// Remove the first entry equal to `auth`. Returns whether one was found.
    pub fn remove_authentication(&mut self, auth: &ZestAuthentication) -> bool {
        match self.authentication.iter().position(|a| a == auth) {
            Some(pos) => {
                self.authentication.remove(pos);
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    /// Remove the top-level statement at `position`.
    pub fn remove_statement(&mut self, position: usize) -> Option<Statement> {
        let removed = self.remove_child(position);
        if let Some(stmt) = &removed {
            debug!(position, kind = stmt.name(), "statement removed");
        }
        removed
    }

    /// Remove the statement with global index `index`, at any depth,
    /// together with everything nested inside it.
    pub fn remove(&mut self, index: usize) -> Option<Statement> {
        let (list, pos) = locate_mut(&mut self.statements, 1, index)?;
        let stmt = list.remove(pos);
        debug!(index, kind = stmt.name(), "statement removed");
        Some(stmt)
    }

    /// Move the statement with global index `index` to top-level `position`.
    ///
    /// The statement is removed first and `position` counts in the list
    /// without it. Nothing changes if either argument is out of range.
    pub fn move_statement(&mut self, index: usize, position: usize) -> Result<(), ZestError> {
        if self.statement(index).is_none() {
            return Err(ZestError::StatementNotFound(index));
        }
        let len = self.statements.len();
        let len_after = if self.position_of(index).is_some() { len - 1 } else { len };
        if position > len_after {
            return Err(ZestError::PositionOutOfRange {
                position,
                len: len_after,
            });
        }
        let stmt = self.remove(index).ok_or(ZestError::StatementNotFound(index))?;
        self.statements.insert(position, stmt);
        debug!(index, position, "statement moved");
        Ok(())
    }

    /// The statement with global index `index`. Index 0 is the script
    /// itself and yields `None`.
    pub fn statement(&self, index: usize) -> Option<&Statement> {
        find_in(&self.statements, 1, index)
    }

    pub fn statement_mut(&mut self, index: usize) -> Option<&mut Statement> {
        let (list, pos) = locate_mut(&mut self.statements, 1, index)?;
        list.get_mut(pos)
    }

    /// The integer loop at `index`, for editing its bounds.
    pub fn integer_loop_mut(&mut self, index: usize) -> Result<&mut ZestLoopInteger, ZestError> {
        let stmt = self
            .statement_mut(index)
            .ok_or(ZestError::StatementNotFound(index))?;
        match &mut stmt.kind {
            StatementKind::LoopInteger(lp) => Ok(lp),
            _ => Err(ZestError::NotAnIntegerLoop(index)),
        }
    }

    /// The statement after `index` in document order. `next(0)` is the
    /// first statement.
    pub fn next(&self, index: usize) -> Option<&Statement> {
        self.statement(index + 1)
    }

    /// The statement before `index` in document order.
    ///
    /// The statement at index 1 is preceded by the script itself, which is
    /// index 0 of the chain but not a [`Statement`], so this yields `None`.
    /// Walk forward from the script with `next(0)`.
    pub fn prev(&self, index: usize) -> Option<&Statement> {
        index.checked_sub(1).and_then(|i| self.statement(i))
    }

    /// Every statement in document order with its global index.
    pub fn chain(&self) -> Chain<'_> {
        Chain::new(&self.statements, 1)
    }

    /// Number of statements at every depth.
    pub fn statement_count(&self) -> usize {
        self.descendant_count()
    }

    /// Global index of the top-level statement at `position`.
    pub fn index_of_position(&self, position: usize) -> Option<usize> {
        if position >= self.statements.len() {
            return None;
        }
        Some(
            1 + self.statements[..position]
                .iter()
                .map(Statement::subtree_size)
                .sum::<usize>(),
        )
    }

    /// Top-level position of the statement with global index `index`, if
    /// it is a direct child of the script.
    pub fn position_of(&self, index: usize) -> Option<usize> {
        let mut start = 1;
        for (pos, stmt) in self.statements.iter().enumerate() {
            if start == index {
                return Some(pos);
            }
            start += stmt.subtree_size();
            if start > index {
                return None;
            }
        }
        None
    }

    // ------------------------------------------------------------------
    // Discovery
    // ------------------------------------------------------------------

    /// Every variable name a statement could reference at run time: the
    /// standard request/response names, the parameters, and every name
    /// bound by a statement anywhere in the tree.
    pub fn variable_names(&self) -> HashSet<String> {
        let mut names: HashSet<String> = STANDARD_VARIABLES.iter().map(|s| s.to_string()).collect();
        names.extend(self.parameters.names().map(str::to_string));
        names.extend(
            self.chain()
                .filter_map(|(_, stmt)| stmt.variable_name())
                .map(str::to_string),
        );
        names
    }

    /// Every browser window handle defined anywhere in the tree.
    pub fn client_window_handles(&self) -> HashSet<String> {
        self.chain()
            .filter_map(|(_, stmt)| stmt.window_handle_defined())
            .map(str::to_string)
            .collect()
    }

    // ------------------------------------------------------------------
    // Copying
    // ------------------------------------------------------------------

    /// A fully independent copy.
    pub fn deep_copy(&self) -> ZestScript {
        self.clone()
    }

    /// Copy metadata, parameters and authentication into `target` and
    /// append copies of every statement to its list.
    pub fn duplicate_to(&self, target: &mut ZestScript) {
        target.about = self.about.clone();
        target.zest_version = self.zest_version.clone();
        target.generated_by = self.generated_by.clone();
        target.author = self.author.clone();
        target.title = self.title.clone();
        target.description = self.description.clone();
        target.prefix = self.prefix.clone();
        target.script_type = self.script_type;
        target.parameters = self.parameters.clone();
        target.statements.extend(self.statements.iter().map(Statement::deep_copy));
        target.authentication.extend(self.authentication.iter().cloned());
    }
}

impl ZestContainer for ZestScript {
    fn children(&self) -> &[Statement] {
        &self.statements
    }

    fn children_mut(&mut self) -> &mut Vec<Statement> {
        &mut self.statements
    }
}
