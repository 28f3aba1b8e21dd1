//! Per-tick parachute simulation.
//!
//! [`TickSimulator::run`] visits every parachute owner once per host tick.
//! An airborne owner holding "use" deploys (or keeps deploying); anyone else
//! with an open canopy folds it. While deployed and falling, the vertical
//! velocity is eased towards the terminal speed from [`crate::physics`]. The
//! host integrates that velocity itself; every `TeleportTicks` falling ticks
//! the pawn is teleported explicitly to correct drift. The canopy prop has no
//! physics of its own and is moved every tick.

use log::{debug, trace};

use crate::config::Tuning;
use crate::host::{EntityIndex, EntitySnapshot, Host, PropHandle};
use crate::physics::{advance_sync_counter, next_vertical_velocity};
use crate::state::{ParachuteState, ParachuteStateStore};

/// Counters describing one tick scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Owners whose parachute opened this tick.
    pub opened: usize,
    /// Owners whose parachute folded this tick.
    pub folded: usize,
    /// Owners with a deployed parachute after the scan.
    pub deployed: usize,
    /// Explicit pawn teleports issued.
    pub corrections: usize,
}

/// Result of a single [`deploy`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeployOutcome {
    /// The parachute transitioned from folded to deployed.
    pub opened: bool,
    /// An explicit pawn teleport was issued.
    pub corrected: bool,
}

/// Whether the snapshot asks for an open parachute.
#[must_use]
pub const fn wants_deploy(snapshot: &EntitySnapshot, tuning: &Tuning) -> bool {
    !snapshot.on_ground_last_tick
        && snapshot.use_pressed
        && (!tuning.disable_when_carrying_hostage || !snapshot.carrying_hostage)
}

/// Opens the parachute if needed and applies one tick of descent control.
///
/// Calling this repeatedly while deployed never re-applies gravity or spawns
/// a second prop.
pub fn deploy<H: Host + ?Sized>(
    state: &mut ParachuteState,
    entity: EntityIndex,
    snapshot: &EntitySnapshot,
    tuning: &Tuning,
    host: &mut H,
) -> DeployOutcome {
    let mut outcome = DeployOutcome::default();
    if !state.is_active {
        state.is_active = true;
        state.ticks_since_sync = 0;
        state.restore_gravity = snapshot.gravity_scale;
        host.set_gravity_scale(entity, tuning.gravity_scale);
        state.prop = host.spawn_prop(state.model_path(), &snapshot.motion);
        if state.prop.is_none() {
            debug!("player {entity}: canopy prop could not be spawned");
        }
        debug!("player {entity}: parachute opened");
        outcome.opened = true;
    }

    let Some(vz) = next_vertical_velocity(snapshot.motion.velocity.z, tuning) else {
        return outcome;
    };
    let motion = snapshot.motion.with_vertical_velocity(vz);

    let (ticks, due) = advance_sync_counter(state.ticks_since_sync, tuning.teleport_ticks);
    state.ticks_since_sync = ticks;
    if due {
        trace!("player {entity}: teleport correction at vz {vz}");
        host.teleport(entity, &motion);
        outcome.corrected = true;
    } else {
        host.set_velocity(entity, motion.velocity);
    }

    if let Some(prop) = state.prop.as_ref() {
        if host.prop_is_valid(prop) {
            host.teleport_prop(prop, &motion);
        }
    }
    outcome
}

/// Folds the parachute: restores gravity, resets the counter and destroys
/// the prop.
pub fn deactivate<H: Host + ?Sized>(state: &mut ParachuteState, entity: EntityIndex, host: &mut H) {
    if host.entity(entity).is_some() {
        host.set_gravity_scale(entity, state.restore_gravity);
    }
    state.ticks_since_sync = 0;
    state.is_active = false;
    release_prop(state.prop.take(), host);
    debug!("player {entity}: parachute folded");
}

/// Destroys `prop` if the host still knows it.
pub fn release_prop<H: Host + ?Sized>(prop: Option<PropHandle>, host: &mut H) {
    if let Some(handle) = prop {
        if host.prop_is_valid(&handle) {
            host.destroy_prop(handle);
        }
    }
}

/// Tick scan over the state store.
pub struct TickSimulator<'a> {
    store: &'a mut ParachuteStateStore,
    tuning: &'a Tuning,
}

impl<'a> TickSimulator<'a> {
    /// Borrows the store and tuning for one scan.
    pub const fn new(store: &'a mut ParachuteStateStore, tuning: &'a Tuning) -> Self {
        Self { store, tuning }
    }

    /// Runs one tick over every owner the host reports as a live human.
    pub fn run<H: Host + ?Sized>(&mut self, host: &mut H) -> TickSummary {
        let mut summary = TickSummary::default();
        for entity in self.store.owners() {
            self.step(entity, host, &mut summary);
        }
        summary
    }

    fn step<H: Host + ?Sized>(&mut self, entity: EntityIndex, host: &mut H, summary: &mut TickSummary) {
        let Some(snapshot) = host.entity(entity) else {
            return;
        };
        if !snapshot.is_eligible() {
            return;
        }
        let Some(state) = self.store.get_mut(entity) else {
            return;
        };

        if wants_deploy(&snapshot, self.tuning) {
            let outcome = deploy(state, entity, &snapshot, self.tuning, host);
            summary.opened += usize::from(outcome.opened);
            summary.corrections += usize::from(outcome.corrected);
            summary.deployed += 1;
        } else if state.is_active {
            deactivate(state, entity, host);
            summary.folded += 1;
        }
    }
}
