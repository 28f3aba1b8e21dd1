//! Descent maths applied while a parachute is deployed.
//!
//! These functions operate on plain numbers and the [`Tuning`] block so they
//! can be unit tested without a host.

use crate::config::Tuning;

/// Vertical velocity the parachute steers towards (negative is downward).
#[must_use]
pub fn target_fall_velocity(tuning: &Tuning) -> f32 {
    -tuning.fall_speed
}

/// Computes the vertical velocity for the next tick.
///
/// Returns `None` when the entity is not falling (`vz >= 0`); the parachute
/// leaves upward or resting motion alone.
///
/// A fall that is already no faster than the target snaps onto it in linear
/// mode. A zero [`Tuning::decrease_vec`] always snaps. Otherwise the velocity
/// moves towards the target by `|decrease_vec|` per tick and then holds
/// exactly at the target.
///
/// # Examples
///
/// ```
/// use shop_parachute::config::Tuning;
/// use shop_parachute::physics::next_vertical_velocity;
///
/// let tuning = Tuning {
///     fall_speed: 50.0,
///     linear: false,
///     decrease_vec: -5.0,
///     ..Tuning::default()
/// };
/// assert_eq!(next_vertical_velocity(-10.0, &tuning), Some(-15.0));
/// assert_eq!(next_vertical_velocity(-48.0, &tuning), Some(-50.0));
/// assert_eq!(next_vertical_velocity(3.0, &tuning), None);
/// ```
#[must_use]
pub fn next_vertical_velocity(vz: f32, tuning: &Tuning) -> Option<f32> {
    if vz >= 0.0 {
        return None;
    }
    let target = target_fall_velocity(tuning);
    let at_or_beyond_target = vz >= target;
    if (at_or_beyond_target && tuning.linear) || tuning.decrease_vec == 0.0 {
        return Some(target);
    }
    Some(approach(vz, target, tuning.decrease_vec.abs()))
}

fn approach(current: f32, target: f32, step: f32) -> f32 {
    if current > target {
        (current - step).max(target)
    } else {
        (current + step).min(target)
    }
}

/// Advances the correction counter by one falling tick.
///
/// Returns the new counter value and whether an explicit teleport is due.
/// The counter wraps to zero on the tick the correction fires, so with an
/// interval of 3 corrections land on ticks 3, 6, 9 and so on. An interval of
/// zero corrects every tick.
#[must_use]
pub const fn advance_sync_counter(ticks_since_sync: u32, interval: u32) -> (u32, bool) {
    let next = ticks_since_sync.saturating_add(1);
    if next >= interval {
        (0, true)
    } else {
        (next, false)
    }
}
