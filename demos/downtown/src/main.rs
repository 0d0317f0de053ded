//! Runs the downtown scenario twice — greedy baseline, then a GA-optimized
//! strategy — and prints the comparison.

use std::sync::Arc;

use anyhow::Result;

use ems_core::{Location, LocationId, LocationKind};
use ems_graph::{CityGraph, DijkstraRouter};
use ems_opt::{FitnessWeights, GaConfig, Optimizer, Scenario};
use ems_policy::{CrispPriority, GreedyNearest, Strategy, StrategyPolicy};
use ems_sim::{NoopObserver, RunMetrics, SimBuilder, SimConfig};

/// The 7-location downtown map: one ambulance base, two hospitals, two
/// emergency zones, two plain intersections.
fn downtown() -> Result<CityGraph> {
    use LocationKind::*;
    let named = [
        (Base, "Central Station"),
        (Hospital, "St. Mary's"),
        (Hospital, "General"),
        (EmergencyZone, "Market District"),
        (Intersection, "5th & Main"),
        (Intersection, "Riverside"),
        (EmergencyZone, "Harbor Front"),
    ];
    let locations = named
        .iter()
        .enumerate()
        .map(|(i, &(kind, name))| Location::new(LocationId(i as u32), kind, name.to_string()))
        .collect();
    let matrix = vec![
        vec![0, 0, 0, 0, 2, 0, 0],
        vec![0, 0, 0, 0, 0, 1, 0],
        vec![0, 0, 0, 0, 3, 4, 0],
        vec![0, 0, 0, 0, 1, 0, 5],
        vec![2, 0, 3, 1, 0, 5, 0],
        vec![0, 1, 4, 0, 5, 0, 0],
        vec![0, 0, 0, 5, 0, 0, 0],
    ];
    Ok(CityGraph::from_parts(locations, &matrix)?)
}

fn print_metrics(label: &str, m: &RunMetrics) {
    println!("── {label} ──");
    println!("  calls:        {}", m.total_spawned);
    println!("  resolved:     {} ({:.1} %)", m.resolved, m.satisfaction * 100.0);
    println!("  unanswered:   {}", m.unanswered);
    match m.avg_response_ticks {
        Some(t) => println!("  avg response: {t:.2} ticks"),
        None => println!("  avg response: n/a"),
    }
    println!("  fleet miles:  {} cost units over {} units", m.total_distance, m.fleet_size);
}

fn main() -> Result<()> {
    let graph = downtown()?;
    let sim_config = SimConfig { horizon_ticks: 500, seed: 2024, ..SimConfig::default() };
    let scorer = Arc::new(CrispPriority::default());

    // Baseline: nearest-available dispatch.
    let mut baseline = SimBuilder::new(
        graph.clone(),
        sim_config.clone(),
        GreedyNearest,
        DijkstraRouter,
    )
    .build()?;
    let baseline_metrics = baseline.run(&mut NoopObserver)?;
    print_metrics("greedy baseline", &baseline_metrics);

    // Evolve a strategy on the same scenario.
    let scenario = Scenario::new(graph.clone(), sim_config.clone()).with_scorer(scorer.clone());
    let optimizer = Optimizer::new(scenario, GaConfig { seed: 2024, ..GaConfig::default() }, FitnessWeights::default());

    println!("\nsearching ({} generations)…", optimizer.config().generations);
    let report = optimizer.run()?;
    for stats in &report.trace {
        println!(
            "  gen {:>2}: best {:>9.2}  mean {:>9.2}",
            stats.generation, stats.best_fitness, stats.mean_fitness
        );
    }
    println!(
        "  baseline fitness on the same trials: {:.2}",
        optimizer.evaluate(&Strategy::nearest_first())?
    );
    println!();

    // Replay the scenario under the winning strategy.
    let mut optimized = SimBuilder::new(
        graph,
        sim_config,
        StrategyPolicy::with_scorer(report.best.clone(), scorer.clone()),
        DijkstraRouter,
    )
    .priority_model(scorer)
    .build()?;
    let optimized_metrics = optimized.run(&mut NoopObserver)?;
    print_metrics("optimized strategy", &optimized_metrics);

    println!("\nbest genome: {:?}", report.best.genes);
    Ok(())
}
