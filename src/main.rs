use clap::Parser;

use kgraph::app::GraphViewApp;
use kgraph::app::sim::SimParams;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to the knowledge graph JSON export ({"nodes": [...], "links": [...]}).
    #[arg(long)]
    graph: String,

    /// Preferred rest length for link springs, in world units.
    #[arg(long)]
    link_distance: Option<f32>,

    /// Many-body charge strength; negative values repel.
    #[arg(long)]
    charge: Option<f32>,
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut params = SimParams::default();
    if let Some(link_distance) = args.link_distance {
        params.link_distance = link_distance.max(1.0);
    }
    if let Some(charge) = args.charge {
        params.charge_strength = charge;
    }

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "kgraph",
        options,
        Box::new(move |cc| Ok(Box::new(GraphViewApp::new(cc, args.graph.clone(), params)))),
    )
}
