use std::fs;
use std::sync::Arc;

use actionkeys_core::prelude::*;

const DEFAULTS_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Actions>
  <Action Name="Jump" Category="0" FullAxis="0">
    <Input Type="Keyboard" Map="Space"/>
    <Input Type="JoystickButton" Map="B0"/>
  </Action>
  <Action Name="Interact" Category="0">
    <Input Type="Keyboard" Map="F"/>
  </Action>
  <Action Name="MenuSelect" Category="1">
    <Input Type="Keyboard" Map="F"/>
  </Action>
  <Action Name="MenuBack" Category="1">
    <Input Type="Keyboard" Map="Escape"/>
  </Action>
  <Action Name="Steer" Category="0" FullAxis="1">
    <Input Map="A"/>
    <Input Map="X:Full"/>
  </Action>
  <Action Name="Fire" Category="0">
    <Input Type="Mouse" Map="Left"/>
    <Input Type="JoystickAxis" Map="Z+"/>
  </Action>
</Actions>
"#;

struct Fixture {
    _dir: tempfile::TempDir,
    config: InputConfig,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let defaults = dir.path().join("defaultActionKeys.xml");
    fs::write(&defaults, DEFAULTS_XML).unwrap();
    let config = InputConfig {
        defaults_path: Some(defaults),
        override_path: Some(dir.path().join("user").join("actionKeys.xml")),
        ..InputConfig::default()
    };
    Fixture { _dir: dir, config }
}

fn engine(config: &InputConfig) -> InputManager {
    let mut m = InputManager::new(config.clone(), Arc::new(NoopLog));
    m.load_from_config().unwrap();
    m
}

fn key(m: &mut InputManager, k: Key, down: bool) -> bool {
    let ev = if down {
        InputEvent::KeyPressed(k)
    } else {
        InputEvent::KeyReleased(k)
    };
    m.handle_event(&ev)
}

#[test]
fn jump_on_space_end_to_end() {
    let f = fixture();
    let mut m = engine(&f.config);

    key(&mut m, Key::Space, true);
    m.update();
    assert!(m.is_action_pressed("Jump", false));
    m.update();
    assert!(m.is_action_down("Jump", false));
    assert!(!m.is_action_pressed("Jump", false));
    key(&mut m, Key::Space, false);
    m.update();
    assert!(m.is_action_released("Jump", false));
    m.update();
    assert!(m.is_action_up("Jump", false));
    assert_eq!(m.get_action_key_string("Jump", true, 0, true), "[Space]");
}

#[test]
fn same_category_rebind_moves_the_input() {
    let f = fixture();
    let mut m = engine(&f.config);

    assert!(m.replace_action_key_bind("Jump", BindTypeMask::KEY, 0, true));
    assert!(key(&mut m, Key::F, true));

    let jump = m.get_action_keys().get("Jump").unwrap();
    assert_eq!(jump.keyboard_binds()[0], Bind::key(Key::F));
    assert!(m.get_action_keys().get("Interact").unwrap().keyboard_binds().is_empty());
    // other category untouched
    assert!(m.get_action_keys().get("MenuSelect").unwrap().contains(&Bind::key(Key::F)));
}

#[test]
fn cross_category_rebind_keeps_both() {
    let f = fixture();
    let mut m = engine(&f.config);
    let esc = Bind::key(Key::Escape);

    // Jump is category 0, MenuBack category 1
    m.replace_action_key_bind("Jump", BindTypeMask::KEY, 0, false);
    assert!(key(&mut m, Key::Escape, true));
    assert!(m.get_action_keys().get("Jump").unwrap().contains(&esc));
    assert!(m.get_action_keys().get("MenuBack").unwrap().contains(&esc));
}

#[test]
fn category_scoped_rebind_leaves_other_categories_alone() {
    let f = fixture();
    let mut m = engine(&f.config);
    let esc = Bind::key(Key::Escape);

    m.replace_action_key_bind("Jump", BindTypeMask::KEY, 0, true);
    assert!(key(&mut m, Key::Escape, true));
    assert_eq!(m.get_action_keys().get("Jump").unwrap().keyboard_binds()[0], esc);
    assert!(m.get_action_keys().get("MenuBack").unwrap().contains(&esc));
}

#[test]
fn strip_everywhere_policy() {
    let f = fixture();
    let config = InputConfig {
        unscoped_conflicts: UnscopedConflicts::StripEverywhere,
        ..f.config.clone()
    };
    let mut m = engine(&config);

    m.replace_action_key_bind("Jump", BindTypeMask::KEY, 0, false);
    key(&mut m, Key::F, true);
    let holders: Vec<&str> = m
        .get_action_keys()
        .iter()
        .filter(|a| a.contains(&Bind::key(Key::F)))
        .map(|a| a.name.as_ref())
        .collect();
    assert_eq!(holders, ["Jump"]);
}

struct Pad {
    keys: Vec<Key>,
    buttons: Vec<usize>,
    x: f32,
}

impl InputSource for Pad {
    fn is_key_down(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }
    fn is_mouse_button_down(&self, _button: MouseButton) -> bool {
        false
    }
    fn is_joystick_connected(&self, joystick: usize) -> bool {
        joystick == 0
    }
    fn is_joystick_button_down(&self, _joystick: usize, button: usize) -> bool {
        self.buttons.contains(&button)
    }
    fn joystick_axis_position(&self, _joystick: usize, axis: JoystickAxis) -> f32 {
        if axis == JoystickAxis::X { self.x } else { 0.0 }
    }
}

#[test]
fn calibration_with_a_drifting_stick() {
    let f = fixture();
    let config = InputConfig {
        input_system: InputSystem::Scan,
        ..f.config.clone()
    };
    let mut m = engine(&config);
    let mut pad = Pad {
        keys: vec![],
        buttons: vec![],
        x: 12.0,
    };

    m.scan(&pad);
    m.update();
    assert!(!m.is_action_axis_stopped("Steer"));

    pad.buttons.push(3);
    m.scan(&pad);
    m.update();
    assert!(m.is_action_axis_stopped("Steer"));
    assert_eq!(m.get_action_value("Steer"), 0.0);

    pad.x = -38.0;
    m.scan(&pad);
    m.update();
    assert_eq!(m.get_action_value("Steer"), -0.5);
}

#[test]
fn ignore_axis_hides_axis_binds() {
    let f = fixture();
    let mut m = engine(&f.config);
    m.handle_event(&InputEvent::JoystickConnected {
        joystick: 0,
        info: JoystickInfo::default(),
    });
    m.handle_event(&InputEvent::JoystickMoved {
        joystick: 0,
        axis: JoystickAxis::Z,
        position: 90.0,
    });
    m.update();

    assert_eq!(m.get_action_state("Fire", false), Status::Pressed);
    assert_eq!(m.get_action_state("Fire", true), Status::Up);
    assert!(m.is_action_up("Fire", true));
}

#[test]
fn merge_is_idempotent_and_duplicates_are_ignored() {
    let f = fixture();
    let mut m = engine(&f.config);

    assert!(!m.add_bind("Jump", Bind::key(Key::Space)));
    assert!(!m.add_bind("Nope", Bind::key(Key::Space)));
    assert_eq!(m.merge_with_defaults(), 0);
    let once = m.get_action_keys().clone();
    assert_eq!(m.merge_with_defaults(), 0);
    assert_eq!(m.get_action_keys(), &once);
    assert!(m.prune_orphaned_actions().is_empty());
}

#[test]
fn custom_binds_survive_a_save_and_reload() {
    let f = fixture();
    let mut m = engine(&f.config);

    m.replace_action_key_bind("Jump", BindTypeMask::KEY, 1, true);
    key(&mut m, Key::LControl, true);
    key(&mut m, Key::J, true);
    let path = m.save_custom_action_keys_to_file().unwrap();
    assert_eq!(Some(&path), f.config.override_path.as_ref());

    // only modified actions are written
    let written = load_action_keys(&path, &(Arc::new(NoopLog) as Arc<dyn CoreLog>)).unwrap();
    let names: Vec<&str> = written.names().map(|n| n.as_ref()).collect();
    assert_eq!(names, ["Jump"]);

    let reloaded = engine(&f.config);
    assert_eq!(reloaded.get_action_binds_label("Jump"), "Space, Ctrl+J | Button 0");
    assert_eq!(reloaded.get_action_keys().len(), 6);
}

#[test]
fn stale_override_actions_are_pruned() {
    let f = fixture();
    let override_path = f.config.override_path.clone().unwrap();
    fs::create_dir_all(override_path.parent().unwrap()).unwrap();
    fs::write(
        &override_path,
        r#"<Actions>
  <Action Name="Jump"><Input Map="E"/></Action>
  <Action Name="Retired"><Input Map="R"/></Action>
</Actions>"#,
    )
    .unwrap();

    let m = engine(&f.config);
    assert!(m.get_action_keys().get("Retired").is_none());
    assert_eq!(m.get_action_key_string("Jump", true, 0, false), "E");

    let keep = InputConfig {
        prune_orphans_on_load: false,
        ..f.config.clone()
    };
    let m = engine(&keep);
    assert!(m.get_action_keys().get("Retired").is_some());
}

#[test]
fn bind_tokens_round_trip() {
    for token in ["LControl+LShift+A", "MouseX2", "B31", "PovY:Negative", "RAlt", "F12"] {
        let bind: Bind = token.parse().unwrap();
        assert_eq!(bind.to_string().parse::<Bind>().unwrap(), bind, "{token}");
    }
    assert!("B32".parse::<Bind>().is_err());
    assert!("".parse::<Bind>().is_err());
}
