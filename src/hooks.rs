//! qemu-hook configuration merging
//!
//! Provides:
//! - The start/stopped command lists for a guest's Samba container
//! - Loading and rewriting the hook `config.json`
//! - Merging commands into an existing guest entry (append or overwrite)

use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::Path;

/// Guest lifecycle actions handled by the hook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookAction {
    /// Guest is starting
    Start,
    /// Guest has stopped
    Stopped,
}

impl HookAction {
    /// All actions in merge order
    pub fn all() -> &'static [HookAction] {
        &[HookAction::Start, HookAction::Stopped]
    }

    pub fn key(&self) -> &'static str {
        match self {
            HookAction::Start => "start",
            HookAction::Stopped => "stopped",
        }
    }
}

impl fmt::Display for HookAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A command as an argv list
pub type HookCommand = Vec<String>;

/// Commands registered for one guest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookCommands {
    pub start: Vec<HookCommand>,
    pub stopped: Vec<HookCommand>,
}

impl HookCommands {
    /// Bring the network and container up on start, tear both down on stop
    pub fn new(create_script: &Path, remove_script: &Path, compose_file: &Path) -> Self {
        let compose = compose_file.display().to_string();
        let docker_compose = |args: &[&str]| -> HookCommand {
            ["docker", "compose", "-f", compose.as_str()]
                .iter()
                .chain(args)
                .map(|s| s.to_string())
                .collect()
        };

        Self {
            start: vec![
                vec![create_script.display().to_string()],
                docker_compose(&["up", "-d"]),
            ],
            stopped: vec![
                docker_compose(&["down", "-v"]),
                vec![remove_script.display().to_string()],
            ],
        }
    }

    pub fn for_action(&self, action: HookAction) -> &[HookCommand] {
        match action {
            HookAction::Start => &self.start,
            HookAction::Stopped => &self.stopped,
        }
    }
}

/// The hook `config.json`: guest name -> action -> commands
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HookDocument {
    root: Map<String, Value>,
}

impl HookDocument {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::HookConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        match serde_json::from_str(content)? {
            Value::Object(root) => Ok(Self { root }),
            _ => Err(Error::HookConfigInvalid(
                "top level must be an object".into(),
            )),
        }
    }

    /// Rewrite the whole document with 2-space indentation
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.root)?)
    }

    // Test-only accessor for verifying merged entries
    #[cfg(test)]
    pub fn commands(&self, vm: &str, action: HookAction) -> Option<&Vec<Value>> {
        self.root.get(vm)?.get(action.key())?.as_array()
    }

    /// Merge a guest's commands into the document
    ///
    /// For each action with existing commands, `decide` chooses between
    /// overwriting (`true`) and appending only commands not already present
    /// (`false`). Actions without commands are set directly.
    pub fn merge<F>(&mut self, vm: &str, commands: &HookCommands, mut decide: F) -> Result<()>
    where
        F: FnMut(HookAction, &[Value]) -> Result<bool>,
    {
        let entry = self
            .root
            .entry(vm.to_string())
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()
            .ok_or_else(|| Error::HookConfigInvalid(format!("entry '{}' is not an object", vm)))?;

        for &action in HookAction::all() {
            let wanted: Vec<Value> = commands
                .for_action(action)
                .iter()
                .map(|cmd| Value::from(cmd.clone()))
                .collect();

            let existing = entry
                .entry(action.key())
                .or_insert_with(|| Value::Array(Vec::new()))
                .as_array_mut()
                .ok_or_else(|| {
                    Error::HookConfigInvalid(format!("'{}.{}' is not a list", vm, action))
                })?;

            if existing.is_empty() || decide(action, existing.as_slice())? {
                *existing = wanted;
            } else {
                for cmd in wanted {
                    if !existing.contains(&cmd) {
                        existing.push(cmd);
                    }
                }
            }
        }

        Ok(())
    }
}

/// Render a stored command for display, e.g. `docker compose -f x up -d`
pub fn display_command(cmd: &Value) -> String {
    match cmd {
        Value::Array(args) => args
            .iter()
            .map(|arg| match arg {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn commands() -> HookCommands {
        HookCommands::new(
            Path::new("/srv/scripts/create-docker-virbr0.sh"),
            Path::new("/srv/scripts/remove-docker-virbr0.sh"),
            Path::new("/srv/configs/fermi/docker-compose.yml"),
        )
    }

    fn never_overwrite(_: HookAction, _: &[Value]) -> Result<bool> {
        Ok(false)
    }

    #[test]
    fn test_action_display() {
        assert_eq!(HookAction::Start.to_string(), "start");
        assert_eq!(HookAction::Stopped.to_string(), "stopped");
    }

    #[test]
    fn test_commands() {
        let cmds = commands();
        assert_eq!(
            cmds.start,
            vec![
                vec!["/srv/scripts/create-docker-virbr0.sh".to_string()],
                ["docker", "compose", "-f", "/srv/configs/fermi/docker-compose.yml", "up", "-d"]
                    .map(String::from)
                    .to_vec(),
            ]
        );
        assert_eq!(
            cmds.stopped,
            vec![
                ["docker", "compose", "-f", "/srv/configs/fermi/docker-compose.yml", "down", "-v"]
                    .map(String::from)
                    .to_vec(),
                vec!["/srv/scripts/remove-docker-virbr0.sh".to_string()],
            ]
        );
    }

    #[test]
    fn test_merge_into_empty_document() {
        let mut doc = HookDocument::parse("{}").unwrap();
        let mut asked = 0;
        doc.merge("fermi", &commands(), |_, _| {
            asked += 1;
            Ok(true)
        })
        .unwrap();

        assert_eq!(asked, 0);
        assert_eq!(
            serde_json::to_value(&doc.root).unwrap(),
            json!({
                "fermi": {
                    "start": [
                        ["/srv/scripts/create-docker-virbr0.sh"],
                        ["docker", "compose", "-f", "/srv/configs/fermi/docker-compose.yml", "up", "-d"]
                    ],
                    "stopped": [
                        ["docker", "compose", "-f", "/srv/configs/fermi/docker-compose.yml", "down", "-v"],
                        ["/srv/scripts/remove-docker-virbr0.sh"]
                    ]
                }
            })
        );
    }

    #[test]
    fn test_append_keeps_existing_and_is_idempotent() {
        let mut doc = HookDocument::parse(
            r#"{"fermi": {"start": [["/usr/local/bin/mount-nfs.sh"]], "stopped": []}}"#,
        )
        .unwrap();

        doc.merge("fermi", &commands(), never_overwrite).unwrap();
        let once = doc.clone();
        doc.merge("fermi", &commands(), never_overwrite).unwrap();

        assert_eq!(doc, once);
        let start = doc.commands("fermi", HookAction::Start).unwrap();
        assert_eq!(start.len(), 3);
        assert_eq!(start[0], json!(["/usr/local/bin/mount-nfs.sh"]));
        assert_eq!(doc.commands("fermi", HookAction::Stopped).unwrap().len(), 2);
    }

    #[test]
    fn test_overwrite_replaces() {
        let mut doc = HookDocument::parse(
            r#"{"fermi": {"start": [["old"]], "stopped": [["old-stop"]]}}"#,
        )
        .unwrap();

        let mut seen = Vec::new();
        doc.merge("fermi", &commands(), |action, existing| {
            seen.push((action, existing.len()));
            Ok(true)
        })
        .unwrap();

        assert_eq!(seen, vec![(HookAction::Start, 1), (HookAction::Stopped, 1)]);
        assert_eq!(doc.commands("fermi", HookAction::Start).unwrap().len(), 2);
        assert!(
            !doc.commands("fermi", HookAction::Stopped)
                .unwrap()
                .contains(&json!(["old-stop"]))
        );
    }

    #[test]
    fn test_other_guests_untouched() {
        let mut doc =
            HookDocument::parse(r#"{"win11": {"start": [["echo", "hi"]]}, "fermi": {}}"#).unwrap();
        doc.merge("fermi", &commands(), never_overwrite).unwrap();

        assert_eq!(doc.commands("win11", HookAction::Start).unwrap().len(), 1);
        assert!(doc.commands("win11", HookAction::Stopped).is_none());
        // key order is preserved
        let keys: Vec<&String> = doc.root.keys().collect();
        assert_eq!(keys, ["win11", "fermi"]);
    }

    #[test]
    fn test_invalid_shapes() {
        assert!(matches!(
            HookDocument::parse("[]"),
            Err(Error::HookConfigInvalid(_))
        ));
        assert!(matches!(
            HookDocument::parse("{"),
            Err(Error::HookConfigParse(_))
        ));

        let mut doc = HookDocument::parse(r#"{"fermi": "nope"}"#).unwrap();
        assert!(doc.merge("fermi", &commands(), never_overwrite).is_err());

        let mut doc = HookDocument::parse(r#"{"fermi": {"start": "nope"}}"#).unwrap();
        assert!(doc.merge("fermi", &commands(), never_overwrite).is_err());
    }

    #[test]
    fn test_save_two_space_indent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut doc = HookDocument::default();
        doc.merge("fermi", &commands(), never_overwrite).unwrap();
        doc.save(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("{\n  \"fermi\": {\n    \"start\": [\n      [\n"));
        assert_eq!(HookDocument::load(&path).unwrap(), doc);
    }

    #[test]
    fn test_display_command() {
        assert_eq!(
            display_command(&json!(["docker", "compose", "up", "-d"])),
            "docker compose up -d"
        );
    }
}
