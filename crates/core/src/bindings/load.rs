use std::{fs, path::Path, sync::Arc};

use roxmltree::{Document, Node};

use crate::bindings::action_key::{ActionKey, ActionKeyRecord};
use crate::bindings::action_keys::ActionKeySet;
use crate::bindings::bind::Bind;
use crate::core_log::CoreLog;
use crate::error::LoadError;

/// On-disk bind file flavours, picked by extension (`.json`, anything else is XML).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindFileFormat {
    Xml,
    Json,
}

impl BindFileFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => BindFileFormat::Json,
            _ => BindFileFormat::Xml,
        }
    }
}

/// Read a bind definition file. Only I/O errors and a malformed document fail
/// the load; bad entries inside it are logged and skipped.
pub fn load_action_keys<P: AsRef<Path>>(path: P, logger: &Arc<dyn CoreLog>) -> Result<ActionKeySet, LoadError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let set = match BindFileFormat::from_path(path) {
        BindFileFormat::Xml => parse_action_keys_xml(&content, logger)?,
        BindFileFormat::Json => parse_action_keys_json(&content, logger)?,
    };
    logger.info(&format!(
        "[load_action_keys] Loaded {} actions from {}",
        set.len(),
        path.display()
    ));
    Ok(set)
}

/// `<Actions><Action Name= Category= FullAxis=><Input Type= Map=/>...`
pub fn parse_action_keys_xml(content: &str, logger: &Arc<dyn CoreLog>) -> Result<ActionKeySet, LoadError> {
    let doc = Document::parse(content)?;
    let root = doc.root_element();
    if !root.has_tag_name("Actions") {
        return Err(LoadError::MissingRoot("Actions"));
    }

    let mut set = ActionKeySet::new();
    for node in root.children().filter(|n| n.has_tag_name("Action")) {
        let Some(action) = action_from_node(node, logger) else {
            continue;
        };
        let name = Arc::clone(&action.name);
        if !set.insert(action) {
            logger.warn(&format!("[parse_action_keys_xml] duplicate action '{name}' skipped"));
        }
    }
    Ok(set)
}

fn action_from_node(node: Node, logger: &Arc<dyn CoreLog>) -> Option<ActionKey> {
    let name = node.attribute("Name").map(str::trim).unwrap_or("");
    if name.is_empty() {
        let pos = node.document().text_pos_at(node.range().start);
        logger.warn(&format!("[parse_action_keys_xml] <Action> without Name at {pos}, skipped"));
        return None;
    }

    let category = match node.attribute("Category").map(str::trim) {
        None | Some("") => 0,
        Some(raw) => raw.parse::<i32>().unwrap_or_else(|_| {
            logger.warn(&format!("[parse_action_keys_xml] {name}: bad Category '{raw}', using 0"));
            0
        }),
    };
    let full_axis = node
        .attribute("FullAxis")
        .is_some_and(|v| matches!(v.trim(), "1" | "true" | "True" | "TRUE"));

    let mut action = ActionKey::new(name, category, full_axis);
    for input in node.children().filter(|n| n.has_tag_name("Input")) {
        let map = input.attribute("Map").unwrap_or("");
        let parsed = match input.attribute("Type") {
            Some(ty) => Bind::from_typed(ty, map),
            None => map.parse::<Bind>(),
        };
        match parsed {
            Ok(bind) => {
                let token = bind.to_string();
                if !action.add_bind(bind) {
                    logger.debug(&format!("[parse_action_keys_xml] {name}: duplicate bind '{token}'"));
                }
            }
            Err(e) => logger.warn(&format!("[parse_action_keys_xml] {name}: {e}")),
        }
    }
    Some(action)
}

/// A JSON array of [`ActionKeyRecord`]s.
pub fn parse_action_keys_json(content: &str, logger: &Arc<dyn CoreLog>) -> Result<ActionKeySet, LoadError> {
    let records: Vec<ActionKeyRecord> = serde_json::from_str(content)?;
    let mut set = ActionKeySet::new();
    for rec in &records {
        if rec.name.trim().is_empty() {
            logger.warn("[parse_action_keys_json] action without name skipped");
            continue;
        }
        if !set.insert(ActionKey::from_record(rec, logger.as_ref())) {
            logger.warn(&format!(
                "[parse_action_keys_json] duplicate action '{}' skipped",
                rec.name
            ));
        }
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::bind::DeviceClass;
    use crate::core_log::MemoryLog;
    use crate::input::primitive::{AxisDirection, JoystickAxis, Key, MouseButton};

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Actions>
  <Action Name="Jump" Category="0">
    <Input Type="Keyboard" Map="Space"/>
    <Input Type="Keyboard" Map="Space"/>
    <Input Type="JoystickButton" Map="0"/>
  </Action>
  <Action Name="Fire" Category="1">
    <Input Type="Mouse" Map="Left"/>
    <Input Map="LControl+F"/>
    <Input Type="Keyboard" Map="NotAKey"/>
  </Action>
  <Action Name="MoveX" Category="1" FullAxis="1">
    <Input Type="JoystickAxis" Map="X"/>
    <Input Map="Y:Negative"/>
  </Action>
  <Action Category="3"/>
  <Action Name="Jump" Category="7"/>
</Actions>"#;

    fn logger() -> (Arc<MemoryLog>, Arc<dyn CoreLog>) {
        let log = Arc::new(MemoryLog::default());
        let dyn_log: Arc<dyn CoreLog> = log.clone();
        (log, dyn_log)
    }

    #[test]
    fn parses_actions_and_skips_bad_entries() {
        let (log, dyn_log) = logger();
        let set = parse_action_keys_xml(SAMPLE, &dyn_log).unwrap();

        assert_eq!(set.len(), 3);
        let jump = set.get("Jump").unwrap();
        assert_eq!(jump.category, 0);
        assert_eq!(jump.keyboard_binds(), &[Bind::key(Key::Space)]);
        assert_eq!(jump.binds(DeviceClass::Controller), &[Bind::JoystickButton(0)]);

        let fire = set.get("Fire").unwrap();
        assert_eq!(
            fire.keyboard_binds(),
            &[
                Bind::MouseButton(MouseButton::Left),
                Bind::combo(Key::F, [Key::LControl])
            ]
        );

        let mx = set.get("MoveX").unwrap();
        assert!(mx.full_axis);
        assert_eq!(
            mx.controller_binds(),
            &[
                Bind::axis(JoystickAxis::X, AxisDirection::Full),
                Bind::axis(JoystickAxis::Y, AxisDirection::Negative)
            ]
        );

        // bad token, nameless action, duplicate action
        assert_eq!(log.warnings().len(), 3);
    }

    #[test]
    fn wrong_root_is_an_error() {
        let (_, dyn_log) = logger();
        let err = parse_action_keys_xml("<Binds/>", &dyn_log).unwrap_err();
        assert!(matches!(err, LoadError::MissingRoot("Actions")));
    }

    #[test]
    fn malformed_xml_is_an_error() {
        let (_, dyn_log) = logger();
        assert!(matches!(
            parse_action_keys_xml("<Actions><Action>", &dyn_log),
            Err(LoadError::Xml(_))
        ));
    }

    #[test]
    fn json_records() {
        let (log, dyn_log) = logger();
        let json = r#"[
            { "name": "Jump", "keyboard": ["Space"], "controller": ["B0"] },
            { "name": "Aim", "category": 2, "full_axis": true, "controller": ["R:Full", "Oops:Full"] },
            { "name": "" }
        ]"#;
        let set = parse_action_keys_json(json, &dyn_log).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("Aim").map(|a| a.controller_binds().len()), Some(1));
        assert_eq!(log.warnings().len(), 2);
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(BindFileFormat::from_path(Path::new("a/actionKeys.json")), BindFileFormat::Json);
        assert_eq!(BindFileFormat::from_path(Path::new("a/actionKeys.JSON")), BindFileFormat::Json);
        assert_eq!(BindFileFormat::from_path(Path::new("a/actionKeys.xml")), BindFileFormat::Xml);
        assert_eq!(BindFileFormat::from_path(Path::new("a/actionKeys")), BindFileFormat::Xml);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let (_, dyn_log) = logger();
        let dir = tempfile::tempdir().unwrap();
        let err = load_action_keys(dir.path().join("nope.xml"), &dyn_log).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
