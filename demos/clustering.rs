//! Greedy, k-means, spectral, and automatic clustering on a small 2D dataset.
//!
//! Run with `RUST_LOG=featclust=debug` to see the engine's decisions.

use featclust::{Algorithm, PointFactory};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct Station {
    name: &'static str,
    x: f64,
    y: f64,
}

fn main() -> featclust::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Three well-separated groups in 2D.
    let stations = vec![
        // Group A (near origin)
        Station { name: "a1", x: 0.0, y: 0.0 },
        Station { name: "a2", x: 0.1, y: 0.2 },
        Station { name: "a3", x: 0.2, y: 0.1 },
        Station { name: "a4", x: -0.1, y: 0.1 },
        // Group B (near (5, 5))
        Station { name: "b1", x: 5.0, y: 5.0 },
        Station { name: "b2", x: 5.1, y: 4.9 },
        Station { name: "b3", x: 4.9, y: 5.1 },
        Station { name: "b4", x: 5.2, y: 5.2 },
        // Group C (near (10, 0))
        Station { name: "c1", x: 10.0, y: 0.0 },
        Station { name: "c2", x: 10.1, y: 0.1 },
        Station { name: "c3", x: 9.9, y: -0.1 },
    ];

    let mut factory = PointFactory::new(2);
    let points = stations
        .iter()
        .map(|s| factory.new_point([s.x, s.y]))
        .collect::<featclust::Result<Vec<_>>>()?;

    for (label, algo) in [
        ("greedy (threshold=1.0)", Algorithm::greedy(1.0)?),
        ("k-means (k=3)", Algorithm::kmeans(3)?),
        ("spectral (k=3)", Algorithm::spectral(3)?),
        ("automatic", Algorithm::automatic()),
    ] {
        println!("=== {label} ===");
        for (i, cluster) in algo.cluster(&points)?.iter().enumerate() {
            let centroid = cluster.centroid()?;
            println!(
                "  cluster {i}: {} points, centroid ({:5.2}, {:5.2}), ids {:?}",
                cluster.len(),
                centroid.features()[0],
                centroid.features()[1],
                cluster.ids().map(|id| id.get()).collect::<Vec<_>>()
            );
        }
    }

    // The same thing without building points by hand.
    println!("=== automatic over items ===");
    for cluster in Algorithm::automatic().cluster_items(stations, |s| vec![s.x, s.y])? {
        let names: Vec<_> = cluster.iter().map(|(s, _)| s.name).collect();
        println!("  {names:?}");
    }

    Ok(())
}
