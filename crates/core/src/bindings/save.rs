use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};

use crate::bindings::action_key::{ActionKey, ActionKeyRecord};
use crate::bindings::bind::{Bind, BindKind};
use crate::bindings::load::BindFileFormat;
use crate::core_log::CoreLog;
use crate::error::SaveError;

fn input_type(kind: BindKind) -> &'static str {
    match kind {
        BindKind::Key => "Keyboard",
        BindKind::MouseButton => "Mouse",
        BindKind::JoystickButton => "JoystickButton",
        BindKind::JoystickAxis => "JoystickAxis",
    }
}

/// Emit `<Actions>` XML for `actions`, in iteration order.
pub fn write_action_keys_xml<'a, W, I>(out: W, actions: I) -> Result<(), SaveError>
where
    W: Write,
    I: IntoIterator<Item = &'a ActionKey>,
{
    let mut writer = Writer::new_with_indent(out, b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(|e| SaveError::Xml(format!("xml decl: {e}")))?;
    writer
        .write_event(Event::Start(BytesStart::new("Actions")))
        .map_err(|e| SaveError::Xml(format!("<Actions>: {e}")))?;

    for action in actions {
        let category = action.category.to_string();
        let mut elem = BytesStart::new("Action");
        elem.push_attribute(("Name", action.name.as_ref()));
        elem.push_attribute(("Category", category.as_str()));
        elem.push_attribute(("FullAxis", if action.full_axis { "1" } else { "0" }));

        let binds: Vec<&Bind> = action.all_binds().collect();
        if binds.is_empty() {
            writer
                .write_event(Event::Empty(elem))
                .map_err(|e| SaveError::Xml(format!("<Action Name=\"{}\"/>: {e}", action.name)))?;
            continue;
        }

        writer
            .write_event(Event::Start(elem))
            .map_err(|e| SaveError::Xml(format!("<Action Name=\"{}\">: {e}", action.name)))?;
        for bind in binds {
            let token = bind.to_string();
            let mut input = BytesStart::new("Input");
            input.push_attribute(("Type", input_type(bind.kind())));
            input.push_attribute(("Map", token.as_str()));
            writer
                .write_event(Event::Empty(input))
                .map_err(|e| SaveError::Xml(format!("<Input Map=\"{token}\">: {e}")))?;
        }
        writer
            .write_event(Event::End(BytesEnd::new("Action")))
            .map_err(|e| SaveError::Xml(format!("</Action>: {e}")))?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("Actions")))
        .map_err(|e| SaveError::Xml(format!("</Actions>: {e}")))?;
    Ok(())
}

pub fn action_keys_to_xml_string<'a, I>(actions: I) -> Result<String, SaveError>
where
    I: IntoIterator<Item = &'a ActionKey>,
{
    let mut buf = Vec::new();
    write_action_keys_xml(&mut buf, actions)?;
    String::from_utf8(buf).map_err(|e| SaveError::Xml(e.to_string()))
}

pub fn action_keys_to_json_string<'a, I>(actions: I) -> Result<String, SaveError>
where
    I: IntoIterator<Item = &'a ActionKey>,
{
    let records: Vec<ActionKeyRecord> = actions.into_iter().map(ActionKey::to_record).collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Write `actions` to `path` (XML or JSON by extension), creating parent dirs.
pub fn save_action_keys<'a, P, I>(path: P, actions: I, logger: &Arc<dyn CoreLog>) -> Result<usize, SaveError>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = &'a ActionKey>,
{
    let path = path.as_ref();
    let io_err = |source| SaveError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let actions: Vec<&ActionKey> = actions.into_iter().collect();
    let count = actions.len();
    match BindFileFormat::from_path(path) {
        BindFileFormat::Xml => {
            let file = File::create(path).map_err(io_err)?;
            let mut out = BufWriter::new(file);
            write_action_keys_xml(&mut out, actions)?;
            out.flush().map_err(io_err)?;
        }
        BindFileFormat::Json => {
            let json = action_keys_to_json_string(actions)?;
            fs::write(path, json).map_err(io_err)?;
        }
    }

    logger.info(&format!("[save_action_keys] wrote {count} actions to {}", path.display()));
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::load::{load_action_keys, parse_action_keys_xml};
    use crate::core_log::NoopLog;
    use crate::input::primitive::{AxisDirection, JoystickAxis, Key, MouseButton};

    fn actions() -> Vec<ActionKey> {
        vec![
            ActionKey::new("Jump", 0, false)
                .with_bind(Bind::key(Key::Space))
                .with_bind(Bind::combo(Key::J, [Key::LControl]))
                .with_bind(Bind::MouseButton(MouseButton::Left))
                .with_bind(Bind::JoystickButton(0))
                .with_bind(Bind::axis(JoystickAxis::Y, AxisDirection::Negative)),
            ActionKey::new("Pause & Menu", 4, true),
        ]
    }

    #[test]
    fn xml_layout() {
        let xml = action_keys_to_xml_string(&actions()).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains("<Action Name=\"Jump\" Category=\"0\" FullAxis=\"0\">"));
        assert!(xml.contains("<Input Type=\"Keyboard\" Map=\"LControl+J\"/>"));
        assert!(xml.contains("<Input Type=\"Mouse\" Map=\"MouseLeft\"/>"));
        assert!(xml.contains("<Input Type=\"JoystickAxis\" Map=\"Y:Negative\"/>"));
        assert!(xml.contains("<Action Name=\"Pause &amp; Menu\" Category=\"4\" FullAxis=\"1\"/>"));
    }

    #[test]
    fn xml_reads_back_identically() {
        let log: Arc<dyn CoreLog> = Arc::new(NoopLog);
        let xml = action_keys_to_xml_string(&actions()).unwrap();
        let set = parse_action_keys_xml(&xml, &log).unwrap();
        let back: Vec<ActionKey> = set.iter().cloned().collect();
        assert_eq!(back, actions());
    }

    #[test]
    fn files_in_both_formats() {
        let log: Arc<dyn CoreLog> = Arc::new(NoopLog);
        let dir = tempfile::tempdir().unwrap();
        for file in ["nested/keys.xml", "nested/keys.json"] {
            let path = dir.path().join(file);
            assert_eq!(save_action_keys(&path, &actions(), &log).unwrap(), 2);
            let set = load_action_keys(&path, &log).unwrap();
            assert_eq!(set.iter().cloned().collect::<Vec<_>>(), actions(), "{file}");
        }
    }
}
