use std::path::PathBuf;

use clap::Parser;
use eframe::egui;
use zomato_dashboard::app::DashboardApp;
use zomato_dashboard::state::AppState;

/// Interactive analytics over a restaurant listing CSV.
#[derive(Parser, Debug)]
#[command(name = "zomato-dashboard", version, about)]
struct CliArgs {
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "ZOMATO_DATA",
        help = "Restaurant CSV to open on start-up (default: none, pick one from File → Open…)"
    )]
    data: Option<PathBuf>,
}

fn main() -> eframe::Result {
    env_logger::init();
    let args = CliArgs::parse();

    let mut state = AppState::default();
    if let Some(path) = &args.data {
        if let Err(e) = state.open(path) {
            log::error!("Failed to load {}: {e:#}", path.display());
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Zomato Restaurant Analysis Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_path_flag_long_and_short() {
        let args = CliArgs::try_parse_from(["zomato-dashboard", "--data", "zomato.csv"]).unwrap();
        assert_eq!(args.data, Some(PathBuf::from("zomato.csv")));

        let args = CliArgs::try_parse_from(["zomato-dashboard", "-d", "other.csv"]).unwrap();
        assert_eq!(args.data, Some(PathBuf::from("other.csv")));
    }

    #[test]
    fn data_flag_requires_a_value() {
        assert!(CliArgs::try_parse_from(["zomato-dashboard", "--data"]).is_err());
    }
}
