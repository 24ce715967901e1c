use std::collections::BTreeMap;

use occupancy_table::TIMESTAMP_FORMAT;

use crate::models::DashboardSummary;

const STYLE: &str = "body{font-family:system-ui,Segoe UI,Arial;margin:24px;max-width:1150px}\
h1{margin:0 0 10px} h2{margin:24px 0 8px} .muted{color:#666}\
.card{padding:14px 16px;border:1px solid #ddd;border-radius:12px;margin:10px 0}\
.section{margin:26px 0} table{border-collapse:collapse}\
th,td{padding:4px 10px;border-bottom:1px solid #eee;text-align:left}\
td.num{text-align:right}";

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn number_cell(value: Option<f64>) -> String {
    value.map_or_else(
        || "<td class=\"num\"></td>".to_string(),
        |value| format!("<td class=\"num\">{value:.1}</td>"),
    )
}

fn page(title: &str, body: &str) -> String {
    let title = escape_html(title);
    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <style>{STYLE}</style></head><body>\n\
         <h1>{title}</h1>\n{body}</body></html>\n"
    )
}

#[must_use]
pub fn render_empty(title: &str) -> String {
    page(
        title,
        "<p class=\"muted\">No data yet. The scraper has not recorded any observations.</p>\n",
    )
}

fn averages_section(summary: &DashboardSummary, out: &mut String) {
    out.push_str("<div class=\"section\"><h2>Average occupancy by area</h2><table>");
    out.push_str("<tr><th>Area</th><th>Avg occupancy</th></tr>");
    for average in &summary.average_by_area {
        out.push_str(&format!(
            "<tr><td>{}</td>{}</tr>",
            escape_html(&average.area),
            number_cell(average.average_occupancy)
        ));
    }
    out.push_str("</table></div>\n");
}

fn heatmap_section(summary: &DashboardSummary, out: &mut String) {
    let mut hours = summary
        .hourly_by_area
        .iter()
        .map(|hourly| hourly.hour.as_str())
        .collect::<Vec<_>>();
    hours.sort_unstable();
    hours.dedup();

    let mut grid: BTreeMap<&str, BTreeMap<&str, Option<f64>>> = BTreeMap::new();
    for hourly in &summary.hourly_by_area {
        grid.entry(hourly.area.as_str())
            .or_default()
            .insert(hourly.hour.as_str(), hourly.average_occupancy);
    }

    out.push_str("<div class=\"section\"><h2>Average occupancy by hour</h2><table>");
    out.push_str("<tr><th>Area</th>");
    for hour in &hours {
        out.push_str(&format!("<th>{}</th>", escape_html(hour)));
    }
    out.push_str("</tr>");
    for (area, by_hour) in &grid {
        out.push_str(&format!("<tr><td>{}</td>", escape_html(area)));
        for hour in &hours {
            out.push_str(&number_cell(by_hour.get(hour).copied().flatten()));
        }
        out.push_str("</tr>");
    }
    out.push_str("</table></div>\n");
}

fn latest_section(summary: &DashboardSummary, out: &mut String) {
    out.push_str("<div class=\"section\"><h2>Latest snapshot</h2><table>");
    out.push_str("<tr><th>Area</th><th>Occupancy</th><th>Status</th></tr>");
    for entry in &summary.latest_snapshot {
        let occupancy = entry
            .occupancy
            .map(occupancy_table::format_occupancy)
            .unwrap_or_default();
        out.push_str(&format!(
            "<tr><td>{}</td><td class=\"num\">{}</td><td>{}</td></tr>",
            escape_html(&entry.area),
            occupancy,
            escape_html(&entry.status)
        ));
    }
    out.push_str("</table></div>\n");
}

#[must_use]
pub fn render_dashboard(summary: &DashboardSummary, title: &str, source_label: &str) -> String {
    let last_run = summary
        .latest_timestamp
        .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default();

    let mut body = format!(
        "<div class=\"muted\">Built from {}</div>\n\
         <div class=\"card\"><strong>Last run:</strong> {last_run} &nbsp;|&nbsp; \
         <strong>Areas:</strong> {} &nbsp;|&nbsp; <strong>Samples:</strong> {}</div>\n\
         <div class=\"card\"><a href=\"avg_by_area.csv\">avg_by_area.csv</a> · \
         <a href=\"latest_snapshot.csv\">latest_snapshot.csv</a> · \
         <a href=\"summary.json\">summary.json</a></div>\n",
        escape_html(source_label),
        summary.areas_tracked,
        summary.samples
    );

    if !summary.least_used_areas.is_empty() {
        let names = summary
            .least_used_areas
            .iter()
            .map(|area| escape_html(area))
            .collect::<Vec<_>>()
            .join(", ");
        body.push_str(&format!(
            "<div class=\"card\"><strong>Least used:</strong> {names}</div>\n"
        ));
    }

    averages_section(summary, &mut body);
    heatmap_section(summary, &mut body);
    latest_section(summary, &mut body);
    page(title, &body)
}
