use super::*;
use crate::bindings::action_key::ActionKey;
use crate::core_log::{MemoryLog, NoopLog};
use crate::input::joystick::JoystickInfo;
use crate::input::primitive::{AxisDirection, JoystickAxis, Key, MouseButton};

fn defaults() -> ActionKeySet {
    [
        ActionKey::new("Jump", 0, false)
            .with_bind(Bind::key(Key::Space))
            .with_bind(Bind::JoystickButton(0)),
        ActionKey::new("Use", 0, false).with_bind(Bind::key(Key::F)),
        ActionKey::new("Map", 0, false).with_bind(Bind::key(Key::M)),
        ActionKey::new("MenuBack", 1, false).with_bind(Bind::key(Key::F)),
        ActionKey::new("Inventory", 1, false).with_bind(Bind::key(Key::I)),
        ActionKey::new("Throttle", 0, false)
            .with_bind(Bind::key(Key::W))
            .with_bind(Bind::axis(JoystickAxis::Y, AxisDirection::Negative)),
    ]
    .into_iter()
    .collect()
}

fn manager(input_system: InputSystem) -> InputManager {
    let config = InputConfig {
        input_system,
        ..InputConfig::default()
    };
    InputManager::with_defaults(config, defaults(), Arc::new(NoopLog))
}

fn press(m: &mut InputManager, key: Key) -> bool {
    m.handle_event(&InputEvent::KeyPressed(key))
}

#[test]
fn event_mode_action_lifecycle() {
    let mut m = manager(InputSystem::Event);
    press(&mut m, Key::Space);
    m.update();
    assert!(m.is_action_pressed("Jump", false));
    assert_eq!(m.get_action_state("Jump", false), Status::Pressed);

    m.update();
    assert!(m.is_action_down("Jump", false));

    m.handle_event(&InputEvent::KeyReleased(Key::Space));
    m.update();
    assert!(m.is_action_released("Jump", false));
    m.update();
    assert!(m.is_action_up("Jump", false));
}

#[test]
fn rejected_rebind_requests() {
    let mut m = manager(InputSystem::Event);
    assert!(!m.replace_action_key_bind("", BindTypeMask::KEY, 0, true));
    assert!(!m.replace_action_key_bind("Jump", BindTypeMask::empty(), 0, true));
    assert!(!m.replace_action_key_bind("Nope", BindTypeMask::KEY, 0, true));
    assert!(!m.is_waiting_action_key_bind());
}

#[test]
fn event_rebind_is_consumed_and_strips_the_category() {
    let mut m = manager(InputSystem::Event);
    let rx = m.subscribe();
    assert!(m.replace_action_key_bind("Map", BindTypeMask::KEYBOARD_MOUSE, 0, true));
    assert!(m.is_waiting_input_for(BindKind::Key));
    assert!(!m.is_waiting_input_for(BindKind::JoystickButton));

    assert!(press(&mut m, Key::F));
    assert!(!m.is_waiting_action_key_bind());
    m.update();
    // the capturing press never reaches the actions
    assert!(m.is_action_up("Map", false));

    assert_eq!(m.get_action_key_string("Map", true, 0, false), "F");
    assert_eq!(m.get_action_key_string("Use", true, 0, false), "");
    assert_eq!(m.get_action_key_string("MenuBack", true, 0, false), "F");

    match rx.try_recv() {
        Ok(RebindEvent::BindDone { action, stripped_from, .. }) => {
            assert_eq!(action.as_ref(), "Map");
            assert_eq!(stripped_from, vec![Arc::<str>::from("Use")]);
        }
        other => panic!("unexpected notification {other:?}"),
    }
}

#[test]
fn unscoped_rebind_keeps_duplicates_by_default() {
    let mut m = manager(InputSystem::Event);
    m.replace_action_key_bind("Map", BindTypeMask::KEY, 0, false);
    press(&mut m, Key::F);
    assert_eq!(m.get_action_key_string("Use", true, 0, false), "F");
    assert_eq!(m.get_action_key_string("Map", true, 0, false), "F");
}

#[test]
fn rebinding_across_categories() {
    // Map is category 0, Inventory category 1
    let mut m = manager(InputSystem::Event);
    m.replace_action_key_bind("Map", BindTypeMask::KEY, 0, false);
    assert!(press(&mut m, Key::I));
    assert_eq!(m.get_action_key_string("Map", true, 0, false), "I");
    assert_eq!(m.get_action_key_string("Inventory", true, 0, false), "I");

    let mut m = manager(InputSystem::Event);
    m.replace_action_key_bind("Map", BindTypeMask::KEY, 0, true);
    assert!(press(&mut m, Key::I));
    assert_eq!(m.get_action_key_string("Map", true, 0, false), "I");
    assert_eq!(m.get_action_key_string("Inventory", true, 0, false), "I");
}

#[test]
fn ignored_combo_does_not_leave_a_modifier_armed() {
    let mut m = manager(InputSystem::Event);
    m.add_bind("Use", Bind::combo(Key::G, [Key::LControl]));
    m.add_bind("Use", Bind::key(Key::H));
    assert_eq!(m.get_action_binds_label("Use"), "F, Ctrl+G, H");

    m.replace_action_key_bind("Use", BindTypeMask::KEY, 2, true);
    assert!(!press(&mut m, Key::LControl));
    assert!(press(&mut m, Key::G));
    assert!(m.is_waiting_action_key_bind());
    m.handle_event(&InputEvent::KeyReleased(Key::G));
    m.handle_event(&InputEvent::KeyReleased(Key::LControl));

    assert!(m.is_waiting_action_key_bind());
    assert_eq!(m.get_action_key_string("Use", true, 2, false), "H");
}

#[test]
fn wheel_and_motion_events_are_tracked() {
    let mut m = manager(InputSystem::Event);
    m.handle_event(&InputEvent::MouseMoved { x: 1.0, y: 1.0 });
    m.handle_event(&InputEvent::MouseWheelScrolled { delta: 1.0 });
    m.update();
    assert!(m.tracker().is_wheel_going_up());

    m.handle_event(&InputEvent::MouseMoved { x: 3.0, y: 1.0 });
    m.update();
    assert!(m.tracker().has_mouse_moved());
    assert!(!m.tracker().has_wheel_moved());
}

#[test]
fn cancel_leaves_the_slot_alone() {
    let mut m = manager(InputSystem::Event);
    let rx = m.subscribe();
    m.replace_action_key_bind("Map", BindTypeMask::KEY, 0, true);
    assert!(m.cancel_action_key_rebind());
    assert!(!m.cancel_action_key_rebind());
    assert!(!press(&mut m, Key::G));
    assert_eq!(m.get_action_key_string("Map", true, 0, false), "M");
    assert!(matches!(rx.try_recv(), Ok(RebindEvent::Cancelled { .. })));
}

#[test]
fn scan_mode_capture_is_suppressed_until_release() {
    let mut m = manager(InputSystem::Scan);
    m.replace_action_key_bind("Jump", BindTypeMask::KEY, 0, true);

    m.tracker_mut().set_key_sample(Key::J, true);
    m.update();
    assert!(!m.is_waiting_action_key_bind());
    assert_eq!(m.get_action_key_string("Jump", true, 0, false), "J");
    assert!(m.is_action_up("Jump", false));

    // still physically held: stays quiet
    m.update();
    assert!(m.is_action_up("Jump", false));

    m.tracker_mut().set_key_sample(Key::J, false);
    m.update();
    assert!(m.is_action_up("Jump", false));
    m.tracker_mut().set_key_sample(Key::J, true);
    m.update();
    assert!(m.is_action_pressed("Jump", false));
}

#[test]
fn scan_mode_captures_a_mouse_button_when_allowed() {
    let mut m = manager(InputSystem::Scan);
    m.replace_action_key_bind("Use", BindTypeMask::MOUSE_BUTTON, 1, true);
    m.tracker_mut().set_key_sample(Key::Q, true);
    m.tracker_mut().set_mouse_sample(MouseButton::Middle, true);
    m.update();
    assert_eq!(m.get_action_binds_label("Use"), "F, Mouse Middle");
    assert_eq!(m.tracker().mouse_status(MouseButton::Middle), Status::Up);
}

#[test]
fn joystick_events_drive_calibration_and_values() {
    let log = Arc::new(MemoryLog::default());
    let mut m = InputManager::with_defaults(InputConfig::default(), defaults(), log.clone());

    m.handle_event(&InputEvent::JoystickConnected {
        joystick: 2,
        info: JoystickInfo {
            name: "Pad".into(),
            ..JoystickInfo::default()
        },
    });
    assert_eq!(m.tracker().default_joystick(), Some(2));

    m.handle_event(&InputEvent::JoystickMoved {
        joystick: 2,
        axis: JoystickAxis::Y,
        position: 12.0,
    });
    m.update();
    assert!(!m.is_action_axis_stopped("Throttle"));

    m.handle_event(&InputEvent::JoystickButtonPressed { joystick: 2, button: 0 });
    m.update();
    assert!(m.is_action_pressed("Jump", false));
    assert!(m.is_action_axis_stopped("Throttle"));
    assert_eq!(m.get_action_axis_position("Throttle"), Some(12.0));

    m.handle_event(&InputEvent::JoystickMoved {
        joystick: 2,
        axis: JoystickAxis::Y,
        position: -38.0,
    });
    m.update();
    assert_eq!(m.get_action_value("Throttle"), 0.5);

    let lines = log.lines.lock().clone();
    assert!(lines.iter().any(|l| l.contains("connected 'Pad'")));
    assert!(lines.iter().any(|l| l.contains("joystick 2 calibrated")));
}

#[test]
fn axis_binds_can_be_ignored() {
    let mut m = manager(InputSystem::Event);
    m.handle_event(&InputEvent::JoystickConnected {
        joystick: 0,
        info: JoystickInfo::default(),
    });
    m.handle_event(&InputEvent::JoystickMoved {
        joystick: 0,
        axis: JoystickAxis::Y,
        position: -90.0,
    });
    m.update();
    assert!(m.is_action_pressed("Throttle", false));
    assert!(!m.is_action_pressed("Throttle", true));
    assert_eq!(m.get_action_state("Throttle", true), Status::Up);
}

#[test]
fn backup_and_defaults() {
    let mut m = manager(InputSystem::Event);
    m.backup_action_keys();
    assert!(m.add_bind("Jump", Bind::key(Key::K)));
    assert!(m.restore_backup_action_keys());
    assert_eq!(m.get_action_binds_label("Jump"), "Space | Button 0");

    m.add_bind("Jump", Bind::key(Key::K));
    assert!(m.remove_bind("Jump", DeviceClass::Controller, 0));
    assert!(!m.remove_bind("Jump", DeviceClass::Controller, 0));
    assert!(m.restore_default_action_key("Jump"));
    assert_eq!(m.get_action_binds_label("Jump"), "Space | Button 0");

    m.add_bind("Jump", Bind::key(Key::K));
    m.restore_default_action_keys();
    assert_eq!(m.get_action_keys(), m.registry().defaults());
}

#[test]
fn focus_loss_releases_everything() {
    let mut m = manager(InputSystem::Event);
    press(&mut m, Key::Space);
    m.update();
    m.handle_event(&InputEvent::FocusLost);
    m.update();
    assert!(m.is_action_up("Jump", false));
}
