//! Output formatting for the cloudview CLI

use anyhow::Result;
use cloudview_core::{Overview, Resource, ResourceDetails, Timestamp};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use serde::Serialize;

/// Print any serializable value as pretty JSON
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn print_resources(resources: &[Resource], json: bool) -> Result<()> {
    if json {
        return print_json(resources);
    }
    print!("{}", resource_table(resources));
    Ok(())
}

pub(crate) fn print_overview(overview: &Overview, json: bool) -> Result<()> {
    if json {
        return print_json(overview);
    }
    print!("{}", key_values(&overview_pairs(overview)));
    Ok(())
}

pub(crate) fn print_details(details: &ResourceDetails, json: bool) -> Result<()> {
    if json {
        return print_json(details);
    }
    print!("{}", key_values(&details_pairs(details)));
    if !details.logs.is_empty() {
        println!();
        println!("Logs:");
        for line in &details.logs {
            println!("  {line}");
        }
    }
    Ok(())
}

const HEADERS: [&str; 8] = ["ID", "NAME", "REGION", "STATUS", "CPU", "MEM", "$/MO", "CREATED"];

fn styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    let header_cells: Vec<Cell> = headers
        .iter()
        .map(|h| Cell::new(h).add_attribute(Attribute::Bold).fg(Color::Cyan))
        .collect();
    table.set_header(header_cells);
    table
}

/// Parsed creation times print in local dashboard form, anything else as given
fn created_cell(created: &Timestamp) -> String {
    created
        .instant()
        .map_or_else(|| created.to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string())
}

fn resource_row(resource: &Resource) -> Vec<String> {
    vec![
        resource.id.clone(),
        resource.name.clone(),
        resource.region.clone(),
        resource.status.to_string(),
        format!("{}%", resource.cpu_usage),
        format!("{}%", resource.memory_usage),
        format!("{:.2}", resource.cost.monthly),
        created_cell(&resource.created_at),
    ]
}

/// Render resources as a table
pub(crate) fn resource_table(resources: &[Resource]) -> String {
    if resources.is_empty() {
        return "No resources found\n".to_string();
    }

    let mut table = styled_table(&HEADERS);
    for resource in resources {
        table.add_row(resource_row(resource));
    }
    format!("{table}\n")
}

fn overview_pairs(overview: &Overview) -> Vec<(&'static str, String)> {
    vec![
        ("Total resources", overview.total_resources.to_string()),
        ("CPU usage", format!("{}%", overview.cpu_usage)),
        ("Memory usage", format!("{}%", overview.memory_usage)),
        ("Uptime", overview.total_uptime.clone()),
    ]
}

fn details_pairs(details: &ResourceDetails) -> Vec<(&'static str, String)> {
    let category = details
        .category
        .map_or_else(|| "unknown".to_string(), |c| c.to_string());
    let mut pairs = vec![
        ("ID", details.id.clone()),
        ("Name", details.name.clone()),
        ("Category", category),
        ("Region", details.region.clone()),
        ("Status", details.status.to_string()),
        ("Created", details.created_at.to_string()),
        (
            "Cost",
            format!(
                "${:.3}/hr  ${:.2}/mo",
                details.cost.hourly, details.cost.monthly
            ),
        ),
        (
            "Hardware",
            format!(
                "{} vCPU  {} GB RAM  {} GB {}",
                details.hardware.vcpus,
                details.hardware.memory_gb,
                details.hardware.disk_gb,
                details.hardware.storage_type
            ),
        ),
        (
            "CPU",
            format!(
                "{}% (avg {}%, peak {}%)",
                details.metrics.cpu.current, details.metrics.cpu.average, details.metrics.cpu.peak
            ),
        ),
        (
            "Memory",
            format!(
                "{}% (avg {}%, peak {}%)",
                details.metrics.memory.current,
                details.metrics.memory.average,
                details.metrics.memory.peak
            ),
        ),
    ];
    if let Some(ip) = &details.ip_address {
        pairs.push(("IP address", ip.clone()));
    }
    pairs
}

fn key_values(pairs: &[(&str, String)]) -> String {
    let mut table = styled_table(&["FIELD", "VALUE"]);
    for (key, value) in pairs {
        table.add_row(vec![(*key).to_string(), value.clone()]);
    }
    format!("{table}\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use cloudview_core::{Category, ResourceStatus};
    use pretty_assertions::assert_eq;

    fn row_with<'a>(table: &'a str, needle: &str) -> &'a str {
        table
            .lines()
            .find(|line| line.contains(needle))
            .unwrap_or_else(|| panic!("no line with {needle:?} in\n{table}"))
    }

    #[test]
    fn table_lists_every_column() {
        let created = Utc.with_ymd_and_hms(2023, 1, 15, 10, 0, 0).unwrap();
        let resources = vec![
            Resource::new("7", "web-7", Category::Compute, created)
                .with_region("nyc1")
                .with_status(ResourceStatus::Active)
                .with_usage(12, 34),
            Resource::new("db-1", "pg", Category::Database, Timestamp::parse("last week")),
        ];

        let table = resource_table(&resources);
        for header in HEADERS {
            assert!(row_with(&table, "NAME").contains(header), "missing {header}");
        }

        let web = row_with(&table, "web-7");
        for cell in ["7", "nyc1", "active", "12%", "34%", "10.00", "2023-01-15 10:00"] {
            assert!(web.contains(cell), "missing {cell} in {web}");
        }
        assert!(row_with(&table, "pg").contains("last week"));
    }

    #[test]
    fn empty_table_says_so() {
        assert_eq!(resource_table(&[]), "No resources found\n");
    }

    #[test]
    fn overview_pairs_share_rows() {
        let overview = Overview {
            total_resources: 3,
            cpu_usage: 20,
            memory_usage: 70,
            total_uptime: "1d 2h 3m".to_string(),
        };
        let text = key_values(&overview_pairs(&overview));

        for (key, value) in [
            ("Total resources", "3"),
            ("CPU usage", "20%"),
            ("Memory usage", "70%"),
            ("Uptime", "1d 2h 3m"),
        ] {
            assert!(row_with(&text, key).contains(value), "{key} row lacks {value}");
        }
    }
}
