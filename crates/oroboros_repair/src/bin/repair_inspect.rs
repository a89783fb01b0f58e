//! # Repair Inspector
//!
//! Operator tool: loads (or seeds) the repair profile config and prints what
//! the repair bench, salvage bench and high-alchemy sink would do with an item.

use oroboros_repair::{
    ItemSnapshot, ProfileConfigStore, RarityTier, RepairEngine, SalvagePolicy, ValuationPolicy,
};

fn print_usage() {
    println!("Usage: repair_inspect <config_dir> <item_id> <current> <max> [--bench <tier>]");
    println!();
    println!("Options:");
    println!("  --bench <tier>  Salvage bench tier (1-3, default {})", SalvagePolicy::DEFAULT_BENCH_TIER);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║         OROBOROS REPAIR INSPECTOR                                ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 5 {
        print_usage();
        return;
    }

    let config_dir = &args[1];
    let item_id = &args[2];
    let (Ok(current), Ok(max)) = (args[3].parse::<f64>(), args[4].parse::<f64>()) else {
        println!("Error: durability values must be numbers");
        print_usage();
        std::process::exit(2);
    };
    let bench_tier: i32 = args
        .iter()
        .position(|a| a == "--bench")
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(SalvagePolicy::DEFAULT_BENCH_TIER);

    let engine = RepairEngine::with_defaults().with_config_store(ProfileConfigStore::new(config_dir));
    let report = engine.reload_config();

    println!("┌─ CONFIG ─────────────────────────────────────────────────────────┐");
    if let Some(store) = engine.config_store() {
        println!("│ File:               {}", store.path().display());
    }
    println!("│ Definitions:        {}", report.loaded);
    println!("│ Active Rules:       {}", report.compiled);
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();

    let rarity = RarityTier::from_item_id(item_id);
    let profile = engine.resolver().resolve_id(item_id);
    let plan = engine.plan_repair(&ItemSnapshot::new(item_id.as_str(), current, max));

    println!("┌─ REPAIR ─────────────────────────────────────────────────────────┐");
    println!("│ Item:               {item_id}");
    println!("│ Rarity:             {rarity}");
    println!("│ Durability:         {current:.1} / {max:.1}");
    println!("│ Primary:            {}", profile.primary_material());
    println!("│ Secondary:          {}", profile.secondary_material());
    println!("│ Rare Gem:           {}", profile.rare_gem_material().unwrap_or("-"));
    if plan.is_repairable() {
        println!("│ Restores:           {}", plan.restore_amount());
        println!("│ Cost:               {}", plan.cost_summary());
        for cost in plan.material_costs() {
            println!("│  - {} x{}", cost.item_id(), cost.quantity());
        }
    } else {
        println!("│ Nothing to repair");
    }
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();

    let refunds = engine.estimate_salvage(item_id, Some(rarity), bench_tier);
    println!("┌─ SALVAGE (bench tier {bench_tier}) ───────────────────────────────────────┐");
    println!(
        "│ Return Ratio:       {:.0}%",
        SalvagePolicy::return_ratio(bench_tier) * 100.0
    );
    for refund in &refunds {
        println!("│  - {} x{}", refund.item_id(), refund.quantity());
    }
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();

    let coins = engine.estimate_high_alchemy(item_id, Some(rarity));
    println!(
        "✓ High alchemy: {item_id} ({}) -> {coins}x {}",
        rarity.name(),
        ValuationPolicy::COIN_ITEM_ID
    );
}
