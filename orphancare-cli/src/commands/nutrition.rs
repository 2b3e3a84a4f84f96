//! Nutrition record commands

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;
use orphancare_core::domain::{NutritionPayload, NutritionRecord, NutritionStatus};

use super::{get_authenticated_context, print_mutation, with_spinner};
use crate::output::{self, cell, short_date};

#[derive(Subcommand)]
pub enum NutritionCommands {
    /// List a child's nutrition records
    List {
        /// Child ID
        #[arg(long)]
        child: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one nutrition record
    Show {
        /// Nutrition record ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Record a measurement for a child
    Create {
        /// Child ID
        #[arg(long)]
        child: String,
        /// Measurement date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// Weight in kilograms
        #[arg(long)]
        weight: f64,
        /// Height in centimetres
        #[arg(long)]
        height: f64,
        /// Nutrition status (severely_malnourished, malnourished, normal)
        #[arg(long)]
        status: NutritionStatus,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update a measurement; omitted fields keep their current value
    Update {
        /// Nutrition record ID
        id: String,
        /// Measurement date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Weight in kilograms
        #[arg(long)]
        weight: Option<f64>,
        /// Height in centimetres
        #[arg(long)]
        height: Option<f64>,
        /// Nutrition status (severely_malnourished, malnourished, normal)
        #[arg(long)]
        status: Option<NutritionStatus>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a nutrition record
    Delete {
        /// Nutrition record ID
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl NutritionCommands {
    pub fn json(&self) -> bool {
        match self {
            NutritionCommands::List { json, .. }
            | NutritionCommands::Show { json, .. }
            | NutritionCommands::Create { json, .. }
            | NutritionCommands::Update { json, .. }
            | NutritionCommands::Delete { json, .. } => *json,
        }
    }
}

pub async fn run(command: NutritionCommands) -> Result<()> {
    match command {
        NutritionCommands::List { child, json } => {
            let ctx = get_authenticated_context("nutrition list").await?;
            let list = with_spinner(
                "Loading nutrition records...",
                json,
                ctx.nutrition.list_by_child(&child),
            )
            .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&list)?);
                return Ok(());
            }
            if list.records.is_empty() {
                println!("No nutrition records found.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["ID", "Date", "Weight (kg)", "Height (cm)", "BMI", "Status"]);
            for record in &list.records {
                table.add_row(vec![
                    record.id.clone(),
                    short_date(Some(&record.date)),
                    format!("{:.1}", record.weight_kg),
                    format!("{:.1}", record.height_cm),
                    format!("{:.1}", record.bmi_or_computed()),
                    cell(record.nutrition_status.as_deref()),
                ]);
            }
            println!("{}", table);
            Ok(())
        }
        NutritionCommands::Show { id, json } => {
            let ctx = get_authenticated_context("nutrition show").await?;
            let record =
                with_spinner("Loading nutrition record...", json, ctx.nutrition.get(&id)).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
                return Ok(());
            }
            print_record(&record);
            Ok(())
        }
        NutritionCommands::Create {
            child,
            date,
            weight,
            height,
            status,
            json,
        } => {
            let payload = NutritionPayload::on_day(date, weight, height, status);
            payload.validate()?;

            let ctx = get_authenticated_context("nutrition create").await?;
            let result = with_spinner(
                "Saving measurement...",
                json,
                ctx.nutrition.create(&child, &payload),
            )
            .await?;
            print_mutation(&result, "Measurement recorded.", json)?;
            if !json {
                println!("  BMI: {:.1}", payload.bmi());
            }
            Ok(())
        }
        NutritionCommands::Update {
            id,
            date,
            weight,
            height,
            status,
            json,
        } => {
            let ctx = get_authenticated_context("nutrition update").await?;
            let current =
                with_spinner("Loading nutrition record...", json, ctx.nutrition.get(&id)).await?;

            let mut payload = NutritionPayload::from_record(&current);
            if let Some(date) = date {
                payload.date =
                    DateTime::<Utc>::from_naive_utc_and_offset(date.and_time(NaiveTime::MIN), Utc);
            }
            if let Some(weight) = weight {
                payload.weight_kg = weight;
            }
            if let Some(height) = height {
                payload.height_cm = height;
            }
            if let Some(status) = status {
                payload.nutrition_status = status.as_str().to_string();
            }

            let result = with_spinner(
                "Saving measurement...",
                json,
                ctx.nutrition.update(&id, &payload),
            )
            .await?;
            print_mutation(&result, "Measurement updated.", json)
        }
        NutritionCommands::Delete { id, force, json } => {
            if !force && !json {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete nutrition record {}?", id))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let ctx = get_authenticated_context("nutrition delete").await?;
            let result =
                with_spinner("Deleting nutrition record...", json, ctx.nutrition.delete(&id))
                    .await?;
            print_mutation(&result, "Nutrition record deleted.", json)
        }
    }
}

fn print_record(record: &NutritionRecord) {
    let mut table = output::create_table();
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["ID".to_string(), record.id.clone()]);
    table.add_row(vec!["Child".to_string(), cell(record.child_id.as_deref())]);
    table.add_row(vec!["Date".to_string(), short_date(Some(&record.date))]);
    table.add_row(vec![
        "Weight".to_string(),
        format!("{:.1} kg", record.weight_kg),
    ]);
    table.add_row(vec![
        "Height".to_string(),
        format!("{:.1} cm", record.height_cm),
    ]);
    table.add_row(vec![
        "BMI".to_string(),
        format!("{:.1}", record.bmi_or_computed()),
    ]);
    table.add_row(vec![
        "Interpretation".to_string(),
        cell(record.bmi_interpretation.as_deref()),
    ]);
    table.add_row(vec![
        "Status".to_string(),
        cell(record.nutrition_status.as_deref()),
    ]);
    println!("{}", table);
    if !record.synced {
        println!("{}", "Not yet synced to DHIS2".dimmed());
    }
}
