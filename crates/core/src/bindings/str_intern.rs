use std::{
    collections::HashMap,
    sync::{Arc, Weak},
};

use once_cell::sync::Lazy;
use parking_lot::Mutex;

/// Action names are looked up on every query; the same name appears in the
/// default, active and backup sets and in every file loaded over them, so they
/// share one allocation. The table only holds weak handles: a name no action
/// refers to any more is swept out on a later miss.
struct NameTable {
    names: HashMap<Box<str>, Weak<str>>,
    sweep_at: usize,
}

const MIN_SWEEP: usize = 64;

static NAMES: Lazy<Mutex<NameTable>> = Lazy::new(|| {
    Mutex::new(NameTable {
        names: HashMap::new(),
        sweep_at: MIN_SWEEP,
    })
});

/// Intern an action name. Equal live names share the same `Arc` buffer.
pub fn intern<S: AsRef<str>>(s: S) -> Arc<str> {
    let s = s.as_ref();
    let mut table = NAMES.lock();
    if let Some(live) = table.names.get(s).and_then(Weak::upgrade) {
        return live;
    }

    if table.names.len() >= table.sweep_at {
        table.names.retain(|_, w| w.strong_count() > 0);
        table.sweep_at = (table.names.len() * 2).max(MIN_SWEEP);
    }
    let arc: Arc<str> = Arc::from(s);
    table.names.insert(Box::from(s), Arc::downgrade(&arc));
    arc
}
