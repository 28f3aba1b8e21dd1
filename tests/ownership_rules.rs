//! Ownership invariants and degraded paths.
//! A parachute exists exactly while the item is owned, and stale host
//! objects are skipped rather than touched.
use std::sync::{Arc, Mutex};
use std::thread;

use approx::assert_relative_eq;
use rstest::rstest;
use glam::Vec3;
use shop_parachute::{
    BuyCallback, EntityIndex, ItemId, ParachutePlugin, Sandbox, SandboxPlayer, SandboxShop,
    SellCallback, SharedPlugin, CATEGORY_NAME,
};
use test_utils::fixtures::{config_with, tuning};
use test_utils::Harness;

const PLAYER: u32 = 3;

#[derive(Clone, Copy, Debug)]
enum Op {
    Buy,
    Sell,
    On,
    Off,
}

fn falling_owner() -> Harness {
    let mut harness = Harness::new(config_with(tuning(50.0, false, -5.0, 3)));
    harness.join(PLAYER, 1500.0);
    harness.buy(PLAYER, "chute1");
    harness.hold_use(PLAYER, true);
    harness.set_vz(PLAYER, -10.0);
    harness
}

#[rstest]
#[case::buy_sell(&[Op::Buy, Op::Sell], false)]
#[case::sell_first(&[Op::Sell, Op::Buy], true)]
#[case::toggle_cycle(&[Op::Buy, Op::Off, Op::On], true)]
#[case::double_off(&[Op::Buy, Op::Off, Op::Off], false)]
#[case::rebuy(&[Op::Buy, Op::Sell, Op::Buy, Op::Buy], true)]
#[case::nothing(&[], false)]
fn state_exists_iff_item_is_owned(#[case] ops: &[Op], #[case] owned: bool) {
    let mut harness = Harness::new(config_with(tuning(50.0, false, -5.0, 3)));
    harness.join(PLAYER, 1500.0);
    for op in ops {
        match op {
            Op::Buy => harness.buy(PLAYER, "chute1"),
            Op::Sell => harness.sell(PLAYER, "chute1"),
            Op::On => harness.toggle(PLAYER, "chute1", 1),
            Op::Off => harness.toggle(PLAYER, "chute1", 0),
        }
        harness.tick();
    }
    assert_eq!(harness.state(PLAYER).is_some(), owned);
}

#[rstest]
fn giving_up_an_older_item_keeps_the_newer_parachute() {
    let mut harness = Harness::new(config_with(tuning(50.0, false, -5.0, 3)));
    harness.join(PLAYER, 1500.0);
    harness.buy(PLAYER, "chute1");
    harness.buy(PLAYER, "chute2");
    harness.sell(PLAYER, "chute1");
    harness.toggle(PLAYER, "chute1", 0);
    let state = harness.state(PLAYER).expect("chute2 is still owned");
    assert_eq!(state.item_id(), harness.item_id("chute2"));
    assert_eq!(state.model_path(), "models/deluxe.vmdl");

    harness.sell(PLAYER, "chute2");
    assert!(harness.state(PLAYER).is_none());
}

#[rstest]
fn unknown_toggle_state_is_ignored() {
    let mut harness = falling_owner();
    harness.toggle(PLAYER, "chute1", 2);
    assert!(harness.state(PLAYER).is_some());
}

#[rstest]
fn unconfigured_key_never_creates_state() {
    let mut harness = Harness::new(config_with(tuning(50.0, false, -5.0, 3)));
    harness.join(PLAYER, 1500.0);
    harness.buy(PLAYER, "jetpack");
    harness.toggle(PLAYER, "jetpack", 1);
    assert!(harness.state(PLAYER).is_none());
}

#[rstest]
#[case::suppressed(true, false)]
#[case::allowed(false, true)]
fn hostage_carrier_deploys_only_when_allowed(#[case] suppress: bool, #[case] deploys: bool) {
    let mut config_tuning = tuning(50.0, false, -5.0, 3);
    config_tuning.disable_when_carrying_hostage = suppress;
    let mut harness = Harness::new(config_with(config_tuning));
    harness.join(PLAYER, 1500.0);
    harness.buy(PLAYER, "chute1");
    harness.hold_use(PLAYER, true);
    harness.player_mut(PLAYER).carrying_hostage = true;
    harness.tick();
    assert_eq!(
        harness.state(PLAYER).is_some_and(|state| state.is_active),
        deploys
    );
}

#[rstest]
fn bots_never_deploy() {
    let mut harness = falling_owner();
    harness.player_mut(PLAYER).bot = true;
    let summary = harness.tick();
    assert_eq!(summary.opened, 0);
    assert_eq!(harness.stats().props_spawned, 0);
}

#[rstest]
fn gravity_returns_to_value_seen_before_deploy() {
    let mut harness = falling_owner();
    harness.player_mut(PLAYER).gravity_scale = 0.5;
    harness.tick_frozen();
    assert_relative_eq!(harness.player(PLAYER).gravity_scale, 0.1);
    harness.hold_use(PLAYER, false);
    harness.tick_frozen();
    assert_relative_eq!(harness.player(PLAYER).gravity_scale, 0.5);
}

#[rstest]
fn landing_folds_the_canopy() {
    let mut harness = falling_owner();
    harness.tick();
    let player = harness.player_mut(PLAYER);
    player.motion.position.z = 0.0;
    player.on_ground = true;
    let summary = harness.tick_frozen();
    assert_eq!(summary.folded, 1);
    assert_eq!(harness.world.prop_count(), 0);
}

#[rstest]
fn prop_removed_by_host_is_skipped() {
    let mut harness = falling_owner();
    harness.tick_frozen();
    let raw = harness
        .state(PLAYER)
        .and_then(|state| state.prop.as_ref())
        .map(|prop| prop.raw())
        .expect("canopy should exist");
    harness.world.remove_prop(raw);

    harness.tick_frozen();
    assert_eq!(harness.stats().prop_teleports, 1);

    harness.hold_use(PLAYER, false);
    harness.tick_frozen();
    let state = harness.state(PLAYER).expect("still owned");
    assert!(state.prop.is_none());
    assert_eq!(harness.stats().props_destroyed, 0);
    assert_relative_eq!(harness.player(PLAYER).gravity_scale, 1.0);
}

#[rstest]
fn vanished_player_is_skipped_until_disconnect() {
    let mut harness = falling_owner();
    harness.tick_frozen();
    harness.world.disconnect(EntityIndex(PLAYER));
    let summary = harness.tick_frozen();
    assert_eq!(summary.deployed, 0);
    assert!(harness.state(PLAYER).is_some());
    harness
        .plugin
        .on_client_disconnect(EntityIndex(PLAYER), &mut harness.world);
    assert!(harness.state(PLAYER).is_none());
    assert_eq!(harness.world.prop_count(), 0);
}

const CROWD: u32 = 8;

fn buy_callback(entity: EntityIndex, item_id: ItemId) -> BuyCallback {
    BuyCallback {
        entity,
        item_id,
        category: CATEGORY_NAME.to_owned(),
        key: "chute1".to_owned(),
        price: 0,
        sell_price: 0,
        duration: 0,
        count: 1,
    }
}

fn sell_callback(entity: EntityIndex, item_id: ItemId) -> SellCallback {
    SellCallback {
        entity,
        item_id,
        key: "chute1".to_owned(),
        sell_price: 0,
    }
}

/// Checks that props and gravity agree with the store for every player.
fn assert_consistent(world: &Sandbox, plugin: &ParachutePlugin) {
    let store = plugin.store().expect("plugin should be running");
    let mut open = 0;
    for raw in 0..CROWD {
        let entity = EntityIndex(raw);
        let player = world.player(entity).expect("player should stay connected");
        match store.get(entity) {
            Some(state) if state.is_active => {
                let prop = state.prop.as_ref().expect("open parachute has a canopy");
                assert!(world.prop(prop.raw()).is_some(), "canopy of {entity} is gone");
                assert_relative_eq!(player.gravity_scale, 0.1);
                open += 1;
            }
            Some(state) => {
                assert!(state.prop.is_none(), "folded parachute of {entity} has a prop");
                assert_relative_eq!(player.gravity_scale, 1.0);
            }
            None => assert_relative_eq!(player.gravity_scale, 1.0),
        }
    }
    assert_eq!(world.prop_count(), open, "props left behind");
}

#[rstest]
fn shared_plugin_serialises_ticks_and_events() {
    let mut shop = SandboxShop::new();
    let plugin = ParachutePlugin::start(Some(&mut shop), config_with(tuning(50.0, false, -5.0, 3)))
        .unwrap_or_else(|e| panic!("plugin should start: {e}"));
    let shared = SharedPlugin::from(plugin);
    let item_id = shop.item_id("chute1").unwrap_or(ItemId(0));

    let mut sandbox = Sandbox::new();
    for raw in 0..CROWD {
        let mut player = SandboxPlayer::at(Vec3::new(0.0, 0.0, 5000.0));
        player.use_pressed = true;
        player.motion.velocity.z = -10.0;
        sandbox.connect(EntityIndex(raw), player);
        shared.on_buy(buy_callback(EntityIndex(raw), item_id), &mut sandbox);
    }
    let opening = shared.on_tick(&mut sandbox);
    assert_eq!(opening.opened, 8);
    let world = Arc::new(Mutex::new(sandbox));

    let events = {
        let handle = shared.clone();
        let world = Arc::clone(&world);
        thread::spawn(move || {
            for round in 0..400_u32 {
                let entity = EntityIndex(round % CROWD);
                let mut guard = world.lock().expect("world lock");
                if round % 2 == 0 {
                    handle.on_sell(sell_callback(entity, item_id), &mut *guard);
                } else {
                    handle.on_buy(buy_callback(entity, item_id), &mut *guard);
                }
                assert_consistent(&guard, &handle.lock());
            }
        })
    };
    let ticks = {
        let handle = shared.clone();
        let world = Arc::clone(&world);
        thread::spawn(move || {
            for _ in 0..400 {
                let mut guard = world.lock().expect("world lock");
                handle.on_tick(&mut *guard);
                assert_consistent(&guard, &handle.lock());
            }
        })
    };
    events.join().expect("event thread panicked");
    ticks.join().expect("tick thread panicked");

    let mut guard = world.lock().expect("world lock");
    for raw in 0..CROWD {
        shared.on_sell(sell_callback(EntityIndex(raw), item_id), &mut *guard);
    }
    assert_consistent(&guard, &shared.lock());
    assert!(shared.lock().store().is_some_and(|store| store.is_empty()));
    assert_eq!(guard.prop_count(), 0);
    assert!(guard.stats().props_spawned >= 8);
}
