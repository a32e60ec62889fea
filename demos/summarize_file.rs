//! Print the activity rollups of a TCX file.
//!
//! Run with: cargo run --example summarize_file -- tests/fixtures/activity.tcx

use tcx_summary::{format_long, summarize};

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/activity.tcx".to_string());
    let xml = std::fs::read_to_string(&path).expect("readable TCX file");
    let activity = summarize(&xml).expect("valid TCX activity").activity;

    println!("Activity Summary\n");
    println!("Sport:     {}", activity.sport.as_deref().unwrap_or("unknown"));
    println!("Started:   {}", format_long(&activity.start_time));
    println!("Duration:  {:.0}s", activity.total_activity_seconds);
    println!("Distance:  {:.1}m", activity.total_activity_meters);
    println!("Calories:  {}", activity.total_activity_calories);
    println!("Speed:     avg {} mph, max {} mph", activity.average_speed, activity.max_speed);
    println!("Heart:     avg {} bpm, max {} bpm", activity.average_bpm, activity.max_bpm);
    println!("Cadence:   avg {}, max {}", activity.average_cadence, activity.max_cadence);
    println!();

    for (i, lap) in activity.laps.iter().enumerate() {
        println!(
            "Lap {}: {} - {:.0}s, {:.1}m, {} points",
            i + 1,
            format_long(&lap.start_time),
            lap.total_seconds,
            lap.total_meters,
            lap.track.len()
        );
    }
}
