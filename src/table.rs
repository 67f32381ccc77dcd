use comfy_table::{presets::UTF8_FULL, CellAlignment, ContentArrangement, Table};

use crate::model::{City, FlightLeg, Itinerary};

/// `125` renders as `"2h 5m"`. Minutes are not zero-padded.
pub fn format_duration(minutes: u32) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Rounded to cents first; whole amounts print bare (`$350`), anything else with
/// two decimals (`$349.99`).
pub fn format_cost(cost: f64) -> String {
    let cents = (cost * 100.0).round();
    let dollars = cents / 100.0;
    if cents % 100.0 == 0.0 {
        format!("${dollars:.0}")
    } else {
        format!("${dollars:.2}")
    }
}

pub fn format_route(stops: &[City]) -> String {
    stops.join(" → ")
}

/// One line per itinerary, best first.
pub fn compact_lines(itineraries: &[Itinerary]) -> Vec<String> {
    itineraries
        .iter()
        .enumerate()
        .map(|(i, it)| {
            format!(
                "{}. {} | {} | {}",
                i + 1,
                format_route(&it.stops),
                format_duration(it.total_time),
                format_cost(it.total_cost)
            )
        })
        .collect()
}

pub fn render_itineraries(itineraries: &[Itinerary]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Route", "Stops", "Duration", "Cost"]);

    for (i, it) in itineraries.iter().enumerate() {
        let stops = match it.stops.len() {
            0..=2 => "Direct".to_string(),
            n => format!("{} ({})", n - 2, it.stops[1..n - 1].join(", ")),
        };

        table.add_row(vec![
            (i + 1).to_string(),
            format_route(&it.stops),
            stops,
            format_duration(it.total_time),
            format_cost(it.total_cost),
        ]);
    }

    if let Some(col) = table.column_mut(4) {
        col.set_cell_alignment(CellAlignment::Right);
    }

    table.to_string()
}

pub fn render_catalog(legs: &[FlightLeg]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["From", "To", "Duration", "Cost"]);

    for leg in legs {
        table.add_row(vec![
            leg.origin.clone(),
            leg.destination.clone(),
            format_duration(leg.duration_minutes),
            format_cost(leg.cost),
        ]);
    }

    if let Some(col) = table.column_mut(3) {
        col.set_cell_alignment(CellAlignment::Right);
    }

    table.to_string()
}
