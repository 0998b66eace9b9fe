mod app;
mod host;
mod util;

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON graph snapshot `{nodes, edges, settings?}` to show on startup.
    #[arg(long)]
    graph: Option<PathBuf>,
    /// JSON settings object applied before the first snapshot.
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Exchange host messages as JSON lines over stdin/stdout.
    #[arg(long)]
    stdio: bool,
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let startup_settings = args.settings.as_deref().and_then(|path| {
        host::load_settings(path)
            .inspect_err(|error| log::warn!("ignoring startup settings: {error:#}"))
            .ok()
    });

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "target-graph",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::TargetGraphApp::new(
                cc,
                app::AppOptions {
                    graph_path: args.graph,
                    startup_settings,
                    stdio: args.stdio,
                },
            )))
        }),
    )
}
