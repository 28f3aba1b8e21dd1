//! Behaviour-driven tests using rust-rspec.
//!
//! Each scenario is a script of player actions replayed against a fresh
//! sandbox, so every example sees its own world.

use approx::assert_relative_eq;
use shop_parachute::NORMAL_GRAVITY_SCALE;
use test_utils::fixtures::{config_with, tuning};
use test_utils::Harness;

const PLAYER: u32 = 7;

#[derive(Clone, Copy, Debug)]
enum Action {
    Buy,
    Sell,
    Toggle(i32),
    HoldUse(bool),
    Ticks(u32),
    Kill,
    Respawn,
    Disconnect,
}

#[derive(Clone, Debug, Default)]
struct Script {
    actions: Vec<Action>,
}

impl Script {
    fn then_do(&mut self, action: Action) {
        self.actions.push(action);
    }

    fn play(&self) -> Harness {
        let mut harness = Harness::new(config_with(tuning(50.0, false, -5.0, 3)));
        harness.join(PLAYER, 2000.0);
        for action in &self.actions {
            match *action {
                Action::Buy => harness.buy(PLAYER, "chute1"),
                Action::Sell => harness.sell(PLAYER, "chute1"),
                Action::Toggle(state) => harness.toggle(PLAYER, "chute1", state),
                Action::HoldUse(pressed) => harness.hold_use(PLAYER, pressed),
                Action::Ticks(count) => {
                    for _ in 0..count {
                        harness.tick();
                    }
                }
                Action::Kill => harness.kill(PLAYER),
                Action::Respawn => {
                    let player = harness.player_mut(PLAYER);
                    player.alive = true;
                    player.motion.position.z = 2000.0;
                    player.on_ground = false;
                }
                Action::Disconnect => harness.disconnect(PLAYER),
            }
        }
        harness
    }
}

fn assert_released(harness: &Harness) {
    assert_relative_eq!(harness.player(PLAYER).gravity_scale, NORMAL_GRAVITY_SCALE);
    assert_eq!(harness.world.prop_count(), 0, "canopy prop must be destroyed");
}

#[test]
fn purchase_deploy_and_sell() {
    rspec::run(&rspec::given(
        "a player who bought chute1",
        Script::default(),
        |ctx| {
            ctx.before_each(|script| script.then_do(Action::Buy));

            ctx.then("a folded parachute is stored with the item's model", |script| {
                let harness = script.play();
                let state = harness.state(PLAYER).expect("state should exist");
                assert!(!state.is_active);
                assert_eq!(state.model_path(), "models/x.vmdl");
            });

            ctx.when("the player falls holding use", |ctx| {
                ctx.before_each(|script| {
                    script.then_do(Action::HoldUse(true));
                    script.then_do(Action::Ticks(4));
                });

                ctx.then("gravity drops to a tenth and a canopy is spawned", |script| {
                    let harness = script.play();
                    assert_relative_eq!(harness.player(PLAYER).gravity_scale, 0.1);
                    assert!(harness.prop_of(PLAYER).is_some());
                    assert!(harness.state(PLAYER).is_some_and(|state| state.is_active));
                });

                ctx.when("the item is sold", |ctx| {
                    ctx.before_each(|script| script.then_do(Action::Sell));

                    ctx.then("gravity and canopy are released and the state removed", |script| {
                        let harness = script.play();
                        assert_released(&harness);
                        assert!(harness.state(PLAYER).is_none());
                    });
                });

                ctx.when("the item is toggled off", |ctx| {
                    ctx.before_each(|script| {
                        script.then_do(Action::Toggle(0));
                        script.then_do(Action::Ticks(3));
                    });

                    ctx.then("it behaves like a sale and later ticks ignore the player", |script| {
                        let harness = script.play();
                        assert_released(&harness);
                        assert!(harness.state(PLAYER).is_none());
                        assert_eq!(harness.stats().props_spawned, 1);
                    });
                });

                ctx.when("the player dies", |ctx| {
                    ctx.before_each(|script| script.then_do(Action::Kill));

                    ctx.then("the canopy folds immediately but ownership remains", |script| {
                        let harness = script.play();
                        assert_released(&harness);
                        let state = harness.state(PLAYER).expect("ownership survives death");
                        assert!(!state.is_active);
                    });

                    ctx.when("the player respawns without holding use", |ctx| {
                        ctx.before_each(|script| {
                            script.then_do(Action::HoldUse(false));
                            script.then_do(Action::Respawn);
                            script.then_do(Action::Ticks(2));
                        });

                        ctx.then("the parachute waits folded", |script| {
                            let harness = script.play();
                            assert!(harness.state(PLAYER).is_some_and(|state| !state.is_active));
                            assert_eq!(harness.world.prop_count(), 0);
                        });
                    });
                });

                ctx.when("the player disconnects mid-fall", |ctx| {
                    ctx.before_each(|script| script.then_do(Action::Disconnect));

                    ctx.then("the state is dropped unconditionally", |script| {
                        let harness = script.play();
                        assert!(harness.state(PLAYER).is_none());
                        assert_eq!(harness.world.prop_count(), 0);
                    });
                });
            });
        },
    ));
}

#[test]
fn unowned_player_is_never_affected() {
    rspec::run(&rspec::given(
        "a player without a parachute",
        Script::default(),
        |ctx| {
            ctx.when("they fall holding use and sell or toggle off repeatedly", |ctx| {
                ctx.before_each(|script| {
                    script.then_do(Action::HoldUse(true));
                    script.then_do(Action::Sell);
                    script.then_do(Action::Toggle(0));
                    script.then_do(Action::Sell);
                    script.then_do(Action::Ticks(5));
                });

                ctx.then("nothing happens", |script| {
                    let harness = script.play();
                    assert!(harness.state(PLAYER).is_none());
                    assert_eq!(harness.stats().props_spawned, 0);
                    assert_eq!(harness.stats().gravity_writes, 0);
                });
            });

            ctx.when("they toggle the item on", |ctx| {
                ctx.before_each(|script| script.then_do(Action::Toggle(1)));

                ctx.then("a folded parachute is stored", |script| {
                    let harness = script.play();
                    assert!(harness.state(PLAYER).is_some_and(|state| !state.is_active));
                });
            });
        },
    ));
}
