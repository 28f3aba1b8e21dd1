//! Configuration fixtures.

use shop_parachute::{ItemConfig, ParachuteConfig, Tuning};

/// Configuration file with two parachutes and every tuning key set.
pub const SAMPLE_CONFIG: &str = r#"{
    "FallSpeed": 50,
    "Linear": false,
    "DecreaseVec": -5,
    "TeleportTicks": 3,
    "DisableWhenCarryingHostage": true,
    "chute1": {
        "name": "Basic parachute",
        "price": 1000,
        "sellprice": 500,
        "duration": 0,
        "model": "models/x.vmdl"
    },
    "chute2": {
        "name": "Deluxe parachute",
        "price": 5000,
        "sellprice": 2500,
        "duration": 86400,
        "model": "models/deluxe.vmdl"
    }
}"#;

/// The `chute1` item: model `models/x.vmdl`.
#[must_use]
pub fn chute1() -> ItemConfig {
    ItemConfig {
        key: "chute1".to_owned(),
        name: "Basic parachute".to_owned(),
        price: 1000,
        sell_price: 500,
        duration: 0,
        model: "models/x.vmdl".to_owned(),
    }
}

/// Tuning with the given descent parameters and hostage suppression off.
#[must_use]
pub fn tuning(fall_speed: f32, linear: bool, decrease_vec: f32, teleport_ticks: u32) -> Tuning {
    Tuning {
        fall_speed,
        linear,
        decrease_vec,
        teleport_ticks,
        disable_when_carrying_hostage: false,
        ..Tuning::default()
    }
}

/// Configuration offering only [`chute1`].
#[must_use]
pub fn config_with(tuning: Tuning) -> ParachuteConfig {
    ParachuteConfig::new(vec![chute1()], tuning)
}
