//! Sandbox drop demo for the shop parachute.
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, info};
use shop_parachute::prelude::*;
use shop_parachute::{
    init_logging, BuyCallback, SandboxPlayer, SandboxShop, SellCallback, CATEGORY_NAME,
    SANDBOX_TICK_RATE,
};

const DEMO_CONFIG: &str = r#"{
    "FallSpeed": 85,
    "Linear": true,
    "DecreaseVec": 50,
    "TeleportTicks": 64,
    "DisableWhenCarryingHostage": false,
    "parachute_default": {
        "name": "Parachute",
        "price": 1000,
        "sellprice": 500,
        "duration": 0,
        "model": "models/parachute/default.vmdl"
    }
}"#;

/// Drops a sandbox player from altitude with the parachute open
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Parachute configuration file; a built-in demo file is used if omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Item key to buy; defaults to the first configured item
    #[arg(short, long)]
    item: Option<String>,

    /// Starting altitude in world units
    #[arg(short, long, default_value_t = 2000.0)]
    altitude: f32,

    /// Give up after this many ticks
    #[arg(long, default_value_t = 64 * 120)]
    max_ticks: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => ParachuteConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ParachuteConfig::from_json_str(DEMO_CONFIG).context("parsing demo config")?,
    };
    let key = match args.item.as_deref() {
        Some(key) => key.to_owned(),
        None => config
            .items()
            .first()
            .map(|item| item.key.clone())
            .context("configuration lists no parachutes")?,
    };

    let chute = config
        .item(&key)
        .with_context(|| format!("`{key}` is not a configured parachute"))?;
    info!("dropping with {} (`{key}`, model {})", chute.name, chute.model);

    let mut shop = SandboxShop::new();
    let mut plugin = ParachutePlugin::start(Some(&mut shop), config)?;
    let Some(item_id) = shop.item_id(&key) else {
        bail!("`{key}` is not a registered parachute");
    };

    let mut world = shop_parachute::Sandbox::new();
    let player = EntityIndex(1);
    let mut pawn = SandboxPlayer::at(Vec3::new(0.0, 0.0, args.altitude));
    pawn.use_pressed = true;
    world.connect(player, pawn);

    plugin.on_buy(
        BuyCallback {
            entity: player,
            item_id,
            category: CATEGORY_NAME.to_owned(),
            key: key.clone(),
            price: 0,
            sell_price: 0,
            duration: 0,
            count: 1,
        },
        &mut world,
    );

    let mut landed_at = None;
    for tick in 1..=args.max_ticks {
        plugin.on_tick(&mut world);
        world.advance();
        let Some(jumper) = world.player(player) else {
            bail!("sandbox lost the player");
        };
        if tick % 32 == 0 {
            info!(
                "tick {tick:>5}: altitude {:>8.1}, vertical speed {:>7.1}",
                jumper.motion.position.z, jumper.motion.velocity.z
            );
        }
        if jumper.on_ground {
            landed_at = Some(tick);
            break;
        }
    }

    let Some(tick) = landed_at else {
        bail!("still airborne after {} ticks", args.max_ticks);
    };
    // Fold the canopy that is still open from the last airborne tick.
    plugin.on_tick(&mut world);
    debug!("sandbox writes: {:?}", world.stats());
    info!(
        "landed after {tick} ticks ({:.2} s)",
        f64::from(tick) / f64::from(SANDBOX_TICK_RATE)
    );

    plugin.on_sell(
        SellCallback {
            entity: player,
            item_id,
            key,
            sell_price: 0,
        },
        &mut world,
    );
    Ok(())
}
