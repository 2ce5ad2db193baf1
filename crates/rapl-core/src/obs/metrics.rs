use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    sync::{Mutex, PoisonError},
};

///
/// EventReport
/// Point-in-time copy of the process-wide hydration counters.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventReport {
    pub ops: EventOps,
    pub entities: BTreeMap<String, EntityCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Entry points
    pub hydrate_calls: u64,

    // Records
    pub records_hydrated: u64,
    pub records_skipped: u64,
    pub envelope_misses: u64,

    // Identity map
    pub identity_hits: u64,
    pub identity_misses: u64,
    pub untracked: u64,
}

///
/// EntityCounters
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EntityCounters {
    pub hydrate_calls: u64,
    pub records_hydrated: u64,
    pub records_skipped: u64,
    pub identity_hits: u64,
    pub identity_misses: u64,
    pub untracked: u64,
}

struct EventState {
    ops: EventOps,
    entities: BTreeMap<String, EntityCounters>,
}

impl EventState {
    const fn new() -> Self {
        Self {
            ops: EventOps {
                hydrate_calls: 0,
                records_hydrated: 0,
                records_skipped: 0,
                envelope_misses: 0,
                identity_hits: 0,
                identity_misses: 0,
                untracked: 0,
            },
            entities: BTreeMap::new(),
        }
    }
}

static EVENT_STATE: Mutex<EventState> = Mutex::new(EventState::new());

/// Mutate global counters: the op totals and the entry for `entity`.
pub(crate) fn with_counters_mut(
    entity: &str,
    f: impl FnOnce(&mut EventOps, &mut EntityCounters),
) {
    let mut state = EVENT_STATE.lock().unwrap_or_else(PoisonError::into_inner);
    let EventState { ops, entities } = &mut *state;
    let entry = entities.entry(entity.to_string()).or_default();

    f(ops, entry);
}

/// Snapshot global counters.
pub(crate) fn report() -> EventReport {
    let state = EVENT_STATE.lock().unwrap_or_else(PoisonError::into_inner);

    EventReport {
        ops: state.ops.clone(),
        entities: state.entities.clone(),
    }
}

/// Reset all counters.
pub(crate) fn reset_all() {
    *EVENT_STATE.lock().unwrap_or_else(PoisonError::into_inner) = EventState::new();
}
