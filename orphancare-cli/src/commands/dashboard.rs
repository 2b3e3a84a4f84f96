//! Dashboard command - orphanage statistics at a glance

use anyhow::Result;
use colored::Colorize;
use orphancare_core::domain::{MalnutritionLevel, OrphanageStats};

use super::{get_authenticated_context, with_spinner};
use crate::output;

pub async fn run(json: bool) -> Result<()> {
    let ctx = get_authenticated_context("dashboard").await?;
    let dashboard = with_spinner(
        "Loading statistics...",
        json,
        ctx.stats.get_orphanage_stats_or_demo(),
    )
    .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
        return Ok(());
    }

    if dashboard.is_demo() {
        output::warning(&format!(
            "Showing demo data: {}",
            dashboard.fallback_reason.as_deref().unwrap_or("live statistics unavailable")
        ));
        println!();
    }

    print_stats(&dashboard.stats);
    Ok(())
}

fn level_label(level: MalnutritionLevel) -> String {
    match level {
        MalnutritionLevel::Good => level.label().green().to_string(),
        MalnutritionLevel::Moderate => level.label().yellow().to_string(),
        MalnutritionLevel::High => level.label().red().to_string(),
    }
}

fn print_stats(stats: &OrphanageStats) {
    let place = [stats.orphanage.city.as_deref(), stats.orphanage.province.as_deref()]
        .iter()
        .filter_map(|&s| s)
        .collect::<Vec<_>>()
        .join(", ");
    println!("{}", stats.orphanage.name.bold());
    if !place.is_empty() {
        println!("{}", place.dimmed());
    }
    println!();

    let mut table = output::create_table();
    table.set_header(vec!["Children", "Value"]);
    table.add_row(vec!["Total".to_string(), stats.children.total.to_string()]);
    table.add_row(vec![
        "Boys / Girls".to_string(),
        format!(
            "{} / {}",
            stats.children.by_gender.boys, stats.children.by_gender.girls
        ),
    ]);
    table.add_row(vec![
        "New this month".to_string(),
        stats.children.new_this_month.to_string(),
    ]);
    let ages = &stats.children.by_age_group;
    table.add_row(vec![
        "0-2 / 3-5 / 6-12 / 13-17 / 18+".to_string(),
        format!(
            "{} / {} / {} / {} / {}",
            ages.infants, ages.toddlers, ages.children, ages.adolescents, ages.adults
        ),
    ]);
    table.add_row(vec![
        "Capacity".to_string(),
        format!(
            "{} of {} ({:.1}%)",
            stats.capacity.current,
            stats.capacity.max,
            stats.capacity.utilization_rate * 100.0
        ),
    ]);
    println!("{}", table);

    let mut table = output::create_table();
    table.set_header(vec!["Nutrition & Health", "Value"]);
    table.add_row(vec![
        "Malnutrition rate".to_string(),
        format!(
            "{:.1}% ({})",
            stats.nutrition.malnutrition_rate,
            level_label(stats.nutrition.level())
        ),
    ]);
    table.add_row(vec![
        "Malnourished".to_string(),
        stats.nutrition.malnourished().to_string(),
    ]);
    table.add_row(vec![
        "Average BMI".to_string(),
        format!("{:.1}", stats.nutrition.average_bmi),
    ]);
    table.add_row(vec![
        "Vaccination coverage".to_string(),
        format!("{:.1}%", stats.health.vaccination_coverage),
    ]);
    table.add_row(vec![
        "Chronic conditions".to_string(),
        stats.health.chronic_conditions.to_string(),
    ]);
    println!("{}", table);

    if !stats.health.common_diseases.is_empty() {
        let mut table = output::create_table();
        table.set_header(vec!["Common diseases", "Cases"]);
        for disease in &stats.health.common_diseases {
            table.add_row(vec![disease.name.clone(), disease.count.to_string()]);
        }
        println!("{}", table);
    }
}
