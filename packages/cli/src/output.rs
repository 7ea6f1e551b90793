//! Terminal rendering of API responses.

use parking_finder_client::insights_models::{InsightPercentPoint, InsightSeriesPoint};
use parking_finder_client::parking_models::history::{
    HeatmapResponse, HistoryResponse, TopSegmentsResponse,
};
use parking_finder_client::parking_models::{NearbyEnvelope, ParkingObservation};
use serde::Serialize;

const DAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

fn day_name(dow: u8) -> &'static str {
    DAYS.get(usize::from(dow)).copied().unwrap_or("?")
}

fn optional(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.precision$}"))
}

fn percent(ratio: Option<f64>) -> String {
    ratio.map_or_else(|| "-".to_string(), |r| format!("{:.0}%", r * 100.0))
}

/// Prints `value` as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn nearby(envelope: &NearbyEnvelope, json: bool) -> Result<(), serde_json::Error> {
    if json {
        return print_json(envelope);
    }

    if let Some(origin) = &envelope.origin {
        let label = origin
            .formatted_address
            .as_deref()
            .or(origin.address.as_deref())
            .unwrap_or("(unnamed)");
        println!(
            "Origin: {label} ({:.5}, {:.5})\n",
            origin.latitude, origin.longitude
        );
    }

    spots(&envelope.nearby, false)
}

pub fn spots(spots: &[ParkingObservation], json: bool) -> Result<(), serde_json::Error> {
    if json {
        return print_json(&spots);
    }

    if spots.is_empty() {
        println!("No parking found.");
        return Ok(());
    }

    println!(
        "{:<12} {:<12} {:>6} {:>7} {:>6}  SIGN",
        "KERBSIDE", "STATUS", "WALK", "KM", "FREE"
    );
    println!("{}", "-".repeat(80));

    for spot in spots {
        let status = if spot.is_occupied { "occupied" } else { "free" };
        println!(
            "{:<12} {:<12} {:>6} {:>7} {:>6}  {}",
            spot.kerbside_id,
            status,
            optional(spot.walking_time, 1),
            optional(spot.distance_km, 2),
            percent(spot.probability),
            spot.sign.as_deref().unwrap_or("")
        );
    }

    println!("\n{} bay(s)", spots.len());
    Ok(())
}

pub fn top_segments(response: &TopSegmentsResponse, json: bool) -> Result<(), serde_json::Error> {
    if json {
        return print_json(response);
    }

    if let (Some(start), Some(end)) = (&response.window.start_date, &response.window.end_date) {
        println!("Window: {start} to {end}\n");
    }

    println!("{:<12} {:>10}  {:<20} LAST SEEN", "SEGMENT", "SAMPLES", "FIRST SEEN");
    println!("{}", "-".repeat(70));
    for item in &response.items {
        println!(
            "{:<12} {:>10}  {:<20} {}",
            item.segment_id,
            item.samples,
            item.first_seen.as_deref().unwrap_or("-"),
            item.last_seen.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

pub fn history(response: &HistoryResponse, json: bool) -> Result<(), serde_json::Error> {
    if json {
        return print_json(response);
    }

    if let Some(hint) = &response.hint {
        println!("{hint}");
    }

    println!("{:<20} {:>8} {:>6}", "HOUR", "SAMPLES", "FREE");
    println!("{}", "-".repeat(36));
    for bucket in &response.items {
        println!(
            "{:<20} {:>8} {:>6}",
            bucket.timestamp,
            bucket.samples,
            percent(bucket.free_ratio)
        );
    }
    println!("\n{} hour(s)", response.summary.count);
    Ok(())
}

pub fn heatmap(response: &HeatmapResponse, json: bool) -> Result<(), serde_json::Error> {
    if json {
        return print_json(response);
    }

    if let Some(hint) = &response.hint {
        println!("{hint}");
    }

    print!("     ");
    for hh in 0..24 {
        print!("{hh:>4}");
    }
    println!();

    for dow in 0..7_u8 {
        print!("{:<5}", day_name(dow));
        for hh in 0..24_u8 {
            let cell = response
                .cell(dow, hh)
                .map_or_else(|| "-".to_string(), |c| format!("{:.0}", c.avg_free_ratio * 100.0));
            print!("{cell:>4}");
        }
        println!();
    }

    if !response.windows.is_empty() {
        println!("\nBest arrival windows:");
        for window in &response.windows {
            println!(
                "  {} {:02}:00  {} free",
                day_name(window.dow),
                window.hour,
                percent(Some(window.avg_free_ratio))
            );
        }
    }
    Ok(())
}

pub fn series(
    title: &str,
    values: &[InsightSeriesPoint],
    change: &[InsightPercentPoint],
    growth_rate: Option<f64>,
) {
    println!("{title}\n");
    println!("{:<6} {:>14} {:>9}", "YEAR", "VALUE", "CHANGE");
    println!("{}", "-".repeat(31));
    for point in values {
        let delta = change
            .iter()
            .find(|c| c.year == point.year)
            .map_or_else(String::new, |c| format!("{:+.2}%", c.percent));
        println!("{:<6} {:>14.0} {:>9}", point.year, point.value, delta);
    }
    if let Some(rate) = growth_rate {
        println!("\nAverage annual growth: {rate:.2}%");
    }
}
