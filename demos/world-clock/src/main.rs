//! Meridian World Clock Demo
//!
//! Renders the dashboard in the terminal:
//! - Zones persisted under `.meridian/` (or the directory given first)
//! - An optional JSON config file given second
//! - A few live ticks, then a jump forward in time and back

use std::env;
use std::fs;
use std::path::PathBuf;

use tracing::info;

use meridian_runtime::{logging, Dashboard, DashboardConfig, DashboardView};
use meridian_state::FileStore;

const LIVE_TICKS: usize = 3;
const JUMP_MINUTES: i32 = 150;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let root = PathBuf::from(args.next().unwrap_or_else(|| ".meridian".to_string()));
    let config = match args.next() {
        Some(path) => DashboardConfig::from_json(&fs::read_to_string(path)?)?,
        None => DashboardConfig::default(),
    };
    logging::init(&config.logging);

    println!("╔════════════════════════════════════════════════════════════╗");
    println!("║              Meridian - World Clock                        ║");
    println!("╚════════════════════════════════════════════════════════════╝");

    let store = FileStore::open(root.clone())?;
    let mut dashboard = Dashboard::new(store, config)?;
    info!(root = %root.display(), zones = dashboard.zones().len(), "zones loaded");

    let mut ticks = dashboard.subscribe();
    dashboard.start()?;
    for _ in 0..LIVE_TICKS {
        ticks.changed().await?;
        print_view(&dashboard.render());
    }

    dashboard.set_offset(JUMP_MINUTES);
    print_view(&dashboard.render());

    dashboard.reset_offset();
    print_view(&dashboard.render());

    dashboard.stop();
    Ok(())
}

fn print_view(view: &DashboardView) {
    println!();
    match &view.selection_label {
        Some(selection) => println!("== {} ({}) ==", view.offset_label, selection),
        None => println!("== {} ==", view.offset_label),
    }

    for card in &view.cards {
        // * anchor, ~ minute just changed
        let marker = if card.is_anchor {
            '*'
        } else if card.is_transitioning {
            '~'
        } else {
            ' '
        };
        let day = card.day_context().map(|d| d.to_string()).unwrap_or_default();
        println!(
            "{marker} {:<22} {:>2}:{} {:<2}  {:<10} {:<12} {:<10} {day}",
            card.entry.city,
            card.facts.hour_digits,
            card.facts.minute_digits,
            card.facts.day_period,
            card.facts.gmt_offset_label,
            card.facts.weekday_date_label,
            card.region_label,
        );
    }
}
