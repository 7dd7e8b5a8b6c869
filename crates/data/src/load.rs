use crate::schema::{Script, ScriptFile};
use anyhow::{anyhow, Context};
use chipputt_core::MatchRules;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

pub const RULES_FILE: &str = "rules.json";

pub fn load_rules(path: &Path) -> anyhow::Result<MatchRules> {
    let rules: MatchRules = load_json(path)?;
    rules
        .validate()
        .map_err(|reason| anyhow!("{}: {reason}", path.display()))?;
    Ok(rules)
}

/// Reads `rules.json` from `dir`, falling back to the defaults when the file
/// does not exist. A file that exists but fails to parse is still an error.
pub fn load_rules_or_default(dir: &Path) -> anyhow::Result<MatchRules> {
    let path = dir.join(RULES_FILE);
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no rules file, using defaults");
        return Ok(MatchRules::default());
    }
    load_rules(&path)
}

pub fn load_script(path: &Path) -> anyhow::Result<Script> {
    let file: ScriptFile = load_json(path)?;
    let script = Script::from(file);
    if let Some(rules) = &script.rules {
        rules
            .validate()
            .map_err(|reason| anyhow!("{}: rules: {reason}", path.display()))?;
    }
    Ok(script)
}

pub(crate) fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chipputt_core::Action;
    use std::io::Write;

    fn write(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).expect("create");
        file.write_all(body.as_bytes()).expect("write");
        path
    }

    #[test]
    fn missing_rules_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let rules = load_rules_or_default(dir.path()).expect("rules");
        assert_eq!(rules, MatchRules::default());
    }

    #[test]
    fn partial_rules_fill_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), RULES_FILE, r#"{"target_score": 11}"#);
        let rules = load_rules_or_default(dir.path()).expect("rules");
        assert_eq!(rules.target_score, 11);
        assert_eq!(rules.required_lead, 2);
    }

    #[test]
    fn invalid_rules_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(dir.path(), "bad.json", r#"{"min_players": 5, "max_players": 3}"#);
        let err = load_rules(&path).unwrap_err();
        assert!(err.to_string().contains("min_players exceeds max_players"));
    }

    #[test]
    fn script_accepts_bare_array() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(
            dir.path(),
            "script.json",
            r#"[{"action":"confirm_order"},{"action":"undo"}]"#,
        );
        let script = load_script(&path).expect("script");
        assert_eq!(script.seed, None);
        assert_eq!(script.actions, vec![Action::ConfirmOrder, Action::Undo]);
    }

    #[test]
    fn script_object_with_seed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(
            dir.path(),
            "script.json",
            r#"{"seed": 9, "rules": {"target_score": 5}, "actions": [{"action":"next_round"}]}"#,
        );
        let script = load_script(&path).expect("script");
        assert_eq!(script.seed, Some(9));
        assert_eq!(script.rules.map(|rules| rules.target_score), Some(5));
        assert_eq!(script.actions, vec![Action::NextRound]);
    }
}
