mod config;

use std::time::Instant;

use anyhow::{Context, Result};
use rookery_core::{AttackTables, Position, attacks, divide, perft_parallel, perft_stats};
use tracing::{info, warn};

use crate::config::Config;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_args(std::env::args().skip(1))?;
    info!(depth = config.depth, fen = %config.fen, "rookery starting");

    if let Some(path) = &config.cache {
        let tables = AttackTables::load_or_build(path)
            .with_context(|| format!("attack cache {}", path.display()))?;
        if attacks::install(tables).is_err() {
            warn!("attack tables were already initialised, cache ignored");
        }
    }

    let mut pos: Position = config
        .fen
        .parse()
        .with_context(|| format!("parsing FEN \"{}\"", config.fen))?;

    println!("{}", pos.pretty());
    println!("{pos}");
    println!();

    let start = Instant::now();

    if config.divide {
        let parts = divide(&mut pos, config.depth);
        for (mv, nodes) in &parts {
            println!("{}  {:<8} {nodes}", mv.to_coordinate(), mv.to_string());
        }
        let total: u64 = parts.iter().map(|(_, n)| n).sum();
        println!();
        println!("moves      {}", parts.len());
        println!("nodes      {total}");
    } else if config.threads > 1 {
        let nodes = perft_parallel(&pos, config.depth, config.threads);
        println!("nodes      {nodes}");
    } else {
        let stats = perft_stats(&mut pos, config.depth);
        println!("nodes      {}", stats.nodes);
        println!("captures   {}", stats.captures);
        println!("e.p.       {}", stats.en_passant);
        println!("castles    {}", stats.castles);
        println!("promotions {}", stats.promotions);
        println!("checks     {}", stats.checks);
        println!("mates      {}", stats.mates);
    }

    println!("time       {:.3}s", start.elapsed().as_secs_f64());
    Ok(())
}
