use feed_model::Snapshot;
use std::path::Path;
use std::time::Instant;

fn main() {
    let data_dir = Path::new("data/snapshot");

    println!("Loading feed snapshot...\n");

    let start = Instant::now();
    let snapshot = Snapshot::load_from_dir(data_dir)
        .expect("Failed to load snapshot");
    let elapsed = start.elapsed();

    let (sources, content, interactions) = snapshot.counts();
    let index = snapshot.interaction_index();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Sources: {}", sources);
    println!("Content items: {}", content);
    println!("Interactions: {}", interactions);
    println!("Deferred (NOT_NOW): {}", index.deferred_ids().len());
    println!("\nPerformance: {:.0} items/second",
             content as f64 / elapsed.as_secs_f64());
}
