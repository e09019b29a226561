//! Live rebinding: `Idle -> Waiting(request) -> Committed | Cancelled -> Idle`.
//!
//! While waiting, the next qualifying input is captured instead of being
//! classified. In polling mode that happens inside `update()` and the
//! captured channel is suppressed until released; in event mode the event
//! itself is swallowed.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::bindings::action_keys::StripScope;
use crate::bindings::bind::{Bind, BindKind, BindTypeMask};
use crate::config::UnscopedConflicts;
use crate::core_log::CoreLog;
use crate::input::event::InputEvent;
use crate::input::primitive::{AxisDirection, JOYSTICK_BUTTON_COUNT, JoystickAxis, Key, MouseButton};
use crate::input::status::Status;
use crate::input::tracker::PrimitiveTracker;
use crate::registry::ActionKeyRegistry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebindRequest {
    pub action: Arc<str>,
    pub accepted: BindTypeMask,
    /// Slot in the list the captured bind belongs to; past the end appends.
    pub slot: usize,
    /// Strip the captured input from other actions of the same category.
    pub same_category_only: bool,
}

/// Published to every [`Rebinder::subscribe`] receiver.
#[derive(Debug, Clone, PartialEq)]
pub enum RebindEvent {
    BindDone {
        action: Arc<str>,
        bind: Bind,
        slot: usize,
        /// Actions that lost the bind to resolve the conflict.
        stripped_from: Vec<Arc<str>>,
    },
    Cancelled {
        action: Arc<str>,
    },
}

/// Channel a capture came from, so it can be suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureSource {
    Key(Key),
    /// A lone modifier, captured on release; nothing left to suppress.
    ModifierRelease(Key),
    Mouse(MouseButton),
    JoystickButton { joystick: usize, button: usize },
    JoystickAxis,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Capture {
    pub bind: Bind,
    pub source: CaptureSource,
    /// The triggering event must not reach the tracker.
    pub consume: bool,
}

#[derive(Debug, Clone, Default)]
enum RebindState {
    #[default]
    Idle,
    Waiting {
        request: RebindRequest,
        full_axis: bool,
        /// Modifier pressed while waiting; captured alone if released first.
        pending_modifier: Option<Key>,
    },
}

/// Result of trying to commit a capture.
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    Committed(RebindEvent),
    /// Bind already sits at another slot of the action; still waiting.
    Ignored,
    /// The target action disappeared; the request was dropped.
    Dropped,
}

#[derive(Debug, Default)]
pub struct Rebinder {
    state: RebindState,
    subscribers: Vec<Sender<RebindEvent>>,
}

impl Rebinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a request, replacing (not committing) any armed one. Returns the
    /// replaced request.
    pub fn arm(&mut self, request: RebindRequest, full_axis: bool) -> Option<RebindRequest> {
        let previous = self.take_request();
        self.state = RebindState::Waiting {
            request,
            full_axis,
            pending_modifier: None,
        };
        previous
    }

    /// Leave the slot untouched and publish `Cancelled`. `false` when idle.
    pub fn cancel(&mut self) -> bool {
        match self.take_request() {
            Some(request) => {
                self.publish(RebindEvent::Cancelled {
                    action: request.action,
                });
                true
            }
            None => false,
        }
    }

    fn take_request(&mut self) -> Option<RebindRequest> {
        match std::mem::take(&mut self.state) {
            RebindState::Idle => None,
            RebindState::Waiting { request, .. } => Some(request),
        }
    }

    #[inline]
    pub fn is_waiting(&self) -> bool {
        matches!(self.state, RebindState::Waiting { .. })
    }

    pub fn request(&self) -> Option<&RebindRequest> {
        match &self.state {
            RebindState::Waiting { request, .. } => Some(request),
            RebindState::Idle => None,
        }
    }

    pub fn is_waiting_input_for(&self, kind: BindKind) -> bool {
        self.request().is_some_and(|r| r.accepted.accepts(kind))
    }

    /// New receiver for rebind notifications. Dropped receivers are pruned
    /// on the next publish.
    pub fn subscribe(&mut self) -> Receiver<RebindEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    fn publish(&mut self, event: RebindEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Polling capture, run right after the tracker latched this tick.
    /// Order: keys (enum order), mouse buttons, default-joystick buttons,
    /// default-joystick axes.
    pub fn capture_from_tracker(&mut self, tracker: &PrimitiveTracker) -> Option<Capture> {
        let RebindState::Waiting {
            request,
            full_axis,
            pending_modifier,
        } = &mut self.state
        else {
            return None;
        };
        let mask = request.accepted;

        if mask.accepts(BindKind::Key) {
            for key in Key::ALL.iter().copied() {
                if tracker.key_status(key) != Status::Pressed {
                    continue;
                }
                if key.is_modifier() {
                    pending_modifier.get_or_insert(key);
                    continue;
                }
                // the modifier joined a combo; its release is no longer a capture
                *pending_modifier = None;
                return Some(Capture {
                    bind: Bind::combo(key, tracker.held_modifiers().iter().copied()),
                    source: CaptureSource::Key(key),
                    consume: true,
                });
            }
            if let Some(m) = *pending_modifier {
                if tracker.key_status(m) == Status::Released {
                    *pending_modifier = None;
                    return Some(Capture {
                        bind: Bind::combo(m, tracker.held_modifiers().iter().copied()),
                        source: CaptureSource::ModifierRelease(m),
                        consume: false,
                    });
                }
            }
        }

        if mask.accepts(BindKind::MouseButton) {
            if let Some(b) = MouseButton::ALL
                .into_iter()
                .find(|b| tracker.mouse_status(*b) == Status::Pressed)
            {
                return Some(Capture {
                    bind: Bind::MouseButton(b),
                    source: CaptureSource::Mouse(b),
                    consume: true,
                });
            }
        }

        let js = tracker.default_joystick()?;

        if mask.accepts(BindKind::JoystickButton) {
            if let Some(button) =
                (0..JOYSTICK_BUTTON_COUNT).find(|n| tracker.joystick_button_status(js, *n) == Status::Pressed)
            {
                return Bind::joystick_button(button).map(|bind| Capture {
                    bind,
                    source: CaptureSource::JoystickButton { joystick: js, button },
                    consume: true,
                });
            }
        }

        if mask.accepts(BindKind::JoystickAxis) {
            let state = tracker.joystick(js)?;
            for axis in JoystickAxis::ALL {
                if state.axis(axis).status(AxisDirection::Full, tracker.press_threshold()) == Status::Pressed {
                    return Some(Capture {
                        bind: Bind::axis(axis, axis_direction(*full_axis, state.axis(axis).offset())),
                        source: CaptureSource::JoystickAxis,
                        consume: true,
                    });
                }
            }
        }

        None
    }

    /// Event-mode capture. Run before the event reaches the tracker.
    pub fn capture_from_event(&mut self, event: &InputEvent, tracker: &PrimitiveTracker) -> Option<Capture> {
        let RebindState::Waiting {
            request,
            full_axis,
            pending_modifier,
        } = &mut self.state
        else {
            return None;
        };
        let mask = request.accepted;

        match event {
            InputEvent::KeyPressed(key) if mask.accepts(BindKind::Key) => {
                if key.is_modifier() {
                    // let it through so later keys see it held
                    pending_modifier.get_or_insert(*key);
                    return None;
                }
                *pending_modifier = None;
                Some(Capture {
                    bind: Bind::combo(*key, tracker.sampled_modifiers()),
                    source: CaptureSource::Key(*key),
                    consume: true,
                })
            }
            InputEvent::KeyReleased(key) if *pending_modifier == Some(*key) => {
                *pending_modifier = None;
                Some(Capture {
                    bind: Bind::combo(*key, tracker.sampled_modifiers()),
                    source: CaptureSource::ModifierRelease(*key),
                    consume: false,
                })
            }
            InputEvent::MouseButtonPressed(b) if mask.accepts(BindKind::MouseButton) => Some(Capture {
                bind: Bind::MouseButton(*b),
                source: CaptureSource::Mouse(*b),
                consume: true,
            }),
            InputEvent::JoystickButtonPressed { joystick, button }
                if mask.accepts(BindKind::JoystickButton) && tracker.default_joystick() == Some(*joystick) =>
            {
                Bind::joystick_button(*button).map(|bind| Capture {
                    bind,
                    source: CaptureSource::JoystickButton {
                        joystick: *joystick,
                        button: *button,
                    },
                    consume: true,
                })
            }
            InputEvent::JoystickMoved {
                joystick,
                axis,
                position,
            } if mask.accepts(BindKind::JoystickAxis) && tracker.default_joystick() == Some(*joystick) => {
                let rest = tracker.joystick(*joystick)?.axis(*axis).rest();
                let offset = position - rest;
                AxisDirection::Full
                    .engaged(offset, tracker.press_threshold())
                    .then(|| Capture {
                        bind: Bind::axis(*axis, axis_direction(*full_axis, offset)),
                        source: CaptureSource::JoystickAxis,
                        consume: true,
                    })
            }
            _ => None,
        }
    }

    /// Write a captured bind into the armed request's slot.
    pub fn commit(
        &mut self,
        registry: &mut ActionKeyRegistry,
        bind: Bind,
        unscoped: UnscopedConflicts,
        logger: &Arc<dyn CoreLog>,
    ) -> CommitOutcome {
        let Some(request) = self.request().cloned() else {
            return CommitOutcome::Ignored;
        };

        let Some(target) = registry.get(&request.action) else {
            logger.warn(&format!(
                "[rebind] action '{}' vanished while waiting; request dropped",
                request.action
            ));
            self.state = RebindState::Idle;
            return CommitOutcome::Dropped;
        };

        if let Some(ix) = target.position(&bind) {
            if ix != request.slot {
                logger.debug(&format!(
                    "[rebind] {} already has '{bind}' at slot {ix}; still waiting",
                    request.action
                ));
                return CommitOutcome::Ignored;
            }
        }

        let scope = if request.same_category_only {
            Some(StripScope::Category(target.category))
        } else {
            match unscoped {
                UnscopedConflicts::Allow => None,
                UnscopedConflicts::StripEverywhere => Some(StripScope::Everywhere),
            }
        };
        let stripped_from = scope
            .map(|s| registry.strip_bind(&bind, &request.action, s))
            .unwrap_or_default();

        if let Some(action) = registry.get_mut(&request.action) {
            action.replace_bind(request.slot, bind.clone());
        }

        logger.info(&format!(
            "[rebind] {} slot {} <- '{bind}'{}",
            request.action,
            request.slot,
            if stripped_from.is_empty() {
                String::new()
            } else {
                format!(" (removed from {})", stripped_from.join(", "))
            }
        ));

        self.state = RebindState::Idle;
        let event = RebindEvent::BindDone {
            action: request.action,
            bind,
            slot: request.slot,
            stripped_from,
        };
        self.publish(event.clone());
        CommitOutcome::Committed(event)
    }
}

fn axis_direction(full_axis: bool, offset: f32) -> AxisDirection {
    if full_axis {
        AxisDirection::Full
    } else if offset >= 0.0 {
        AxisDirection::Positive
    } else {
        AxisDirection::Negative
    }
}
