use cavebot::infra::DefaultObserver;
use cavebot::state::generate;
use cavebot::{CaveConfig, Game, PlannerConfig};
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cavebot=debug,info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_logging();

    let cave_config = CaveConfig::from_env()?;
    let planner_config = PlannerConfig::from_env()?;
    info!("Planner config: {:?}", planner_config);

    let cave = generate(&cave_config)?;
    info!("Cave {}x{} (seed {})", cave_config.width, cave_config.height, cave.seed);
    info!("- nodes: {}, edges: {}", cave.graph.len(), cave.graph.edge_count());
    info!("- entrance: {}, orb: {}, exit: {}", cave.entrance, cave.orb, cave.exit);
    info!("- time budget: {}, gold on map: {}", cave.time_budget, cave.graph.total_gold());

    let mut game = Game::new(planner_config, DefaultObserver);
    let report = game.run(&cave)?;

    info!(
        "Orb found in {} steps ({} backtracks, {} tiles visited)",
        report.exploration.steps, report.exploration.backtracks, report.exploration.visited
    );
    info!(
        "Escaped: {} with {} gold, {} time left",
        report.escaped, report.escape.gold_collected, report.escape.time_remaining
    );

    Ok(())
}
