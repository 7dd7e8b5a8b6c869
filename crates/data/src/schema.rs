use chipputt_core::{Action, MatchRules};
use serde::{Deserialize, Serialize};

/// A scripted match for `chipputt replay`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Script {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub rules: Option<MatchRules>,
    pub actions: Vec<Action>,
}

/// Accepts either the full object or a bare action list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ScriptFile {
    Full(Script),
    Actions(Vec<Action>),
}

impl From<ScriptFile> for Script {
    fn from(file: ScriptFile) -> Self {
        match file {
            ScriptFile::Full(script) => script,
            ScriptFile::Actions(actions) => Script {
                seed: None,
                rules: None,
                actions,
            },
        }
    }
}
