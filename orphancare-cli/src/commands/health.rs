//! Health record commands

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;
use orphancare_core::domain::{HealthRecord, HealthRecordPayload, Severity, VaccinationStatus};

use super::{get_authenticated_context, print_mutation, with_spinner};
use crate::output::{self, cell, short_date};

#[derive(Subcommand)]
pub enum HealthCommands {
    /// List a child's health records
    List {
        /// Child ID
        #[arg(long)]
        child: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one health record
    Show {
        /// Health record ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a health record for a child
    Create {
        /// Child ID
        #[arg(long)]
        child: String,
        /// Examination date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        #[command(flatten)]
        fields: HealthFields,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update a health record; omitted fields keep their current value
    Update {
        /// Health record ID
        id: String,
        /// Examination date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
        #[command(flatten)]
        fields: HealthFields,
        /// Remove a disease from the record (repeatable)
        #[arg(long = "remove-disease")]
        remove_diseases: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a health record
    Delete {
        /// Health record ID
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the disease catalogue
    Diseases {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl HealthCommands {
    pub fn json(&self) -> bool {
        match self {
            HealthCommands::List { json, .. }
            | HealthCommands::Show { json, .. }
            | HealthCommands::Create { json, .. }
            | HealthCommands::Update { json, .. }
            | HealthCommands::Delete { json, .. }
            | HealthCommands::Diseases { json } => *json,
        }
    }
}

#[derive(clap::Args)]
pub struct HealthFields {
    /// Vaccination status (vaccinated, partially_vaccinated, not_vaccinated, unknown)
    #[arg(long)]
    vaccination: Option<VaccinationStatus>,
    /// Chronic conditions
    #[arg(long)]
    chronic: Option<String>,
    /// Current medications
    #[arg(long)]
    medications: Option<String>,
    /// Remarks
    #[arg(long)]
    remarks: Option<String>,
    /// Diagnosed disease as ID or ID:severity (repeatable)
    #[arg(long = "disease", value_parser = parse_disease)]
    diseases: Vec<(String, Option<Severity>)>,
}

impl HealthFields {
    fn apply(self, mut payload: HealthRecordPayload) -> HealthRecordPayload {
        if let Some(status) = self.vaccination {
            payload = payload.with_vaccination(status);
        }
        if self.chronic.is_some() {
            payload.chronic_conditions = self.chronic;
        }
        if self.medications.is_some() {
            payload.medications = self.medications;
        }
        if self.remarks.is_some() {
            payload.remarks = self.remarks;
        }
        for (disease_id, severity) in self.diseases {
            payload.select_disease(disease_id, severity);
        }
        payload
    }
}

/// Parse `ID` or `ID:severity`
fn parse_disease(value: &str) -> Result<(String, Option<Severity>)> {
    match value.split_once(':') {
        Some((id, severity)) => {
            let severity = severity.trim().parse::<Severity>()?;
            Ok((id.trim().to_string(), Some(severity)))
        }
        None if !value.trim().is_empty() => Ok((value.trim().to_string(), None)),
        None => Err(anyhow!("Disease ID is required")),
    }
}

pub async fn run(command: HealthCommands) -> Result<()> {
    match command {
        HealthCommands::List { child, json } => {
            let ctx = get_authenticated_context("health list").await?;
            let list =
                with_spinner("Loading health records...", json, ctx.health.list_by_child(&child))
                    .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&list)?);
                return Ok(());
            }

            if let Some(child) = &list.child {
                println!("{}", child.full_name.bold());
            }
            if list.health_records.is_empty() {
                println!("No health records found.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["ID", "Date", "Vaccination", "Diseases", "Remarks"]);
            for record in &list.health_records {
                table.add_row(vec![
                    record.id.clone(),
                    short_date(Some(&record.date)),
                    vaccination_cell(record),
                    record.diseases.len().to_string(),
                    cell(record.remarks.as_deref()),
                ]);
            }
            println!("{}", table);
            Ok(())
        }
        HealthCommands::Show { id, json } => {
            let ctx = get_authenticated_context("health show").await?;
            let record = with_spinner("Loading health record...", json, ctx.health.get(&id)).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
                return Ok(());
            }
            print_record(&record);
            Ok(())
        }
        HealthCommands::Create {
            child,
            date,
            fields,
            json,
        } => {
            let payload = fields.apply(HealthRecordPayload::new(date));

            let ctx = get_authenticated_context("health create").await?;
            let result = with_spinner(
                "Saving health record...",
                json,
                ctx.health.create(&child, &payload),
            )
            .await?;
            print_mutation(&result, "Health record added.", json)
        }
        HealthCommands::Update {
            id,
            date,
            fields,
            remove_diseases,
            json,
        } => {
            let ctx = get_authenticated_context("health update").await?;
            let current = with_spinner("Loading health record...", json, ctx.health.get(&id)).await?;

            let mut payload = HealthRecordPayload::from_record(&current);
            if date.is_some() {
                payload.date = date;
            }
            let mut payload = fields.apply(payload);
            for disease_id in &remove_diseases {
                payload.deselect_disease(disease_id);
            }

            let result = with_spinner(
                "Saving health record...",
                json,
                ctx.health.update(&id, &payload),
            )
            .await?;
            print_mutation(&result, "Health record updated.", json)
        }
        HealthCommands::Delete { id, force, json } => {
            if !force && !json {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete health record {}?", id))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let ctx = get_authenticated_context("health delete").await?;
            let result =
                with_spinner("Deleting health record...", json, ctx.health.delete(&id)).await?;
            print_mutation(&result, "Health record deleted.", json)
        }
        HealthCommands::Diseases { json } => {
            let ctx = get_authenticated_context("health diseases").await?;
            let diseases =
                with_spinner("Loading diseases...", json, ctx.health.list_diseases()).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&diseases)?);
                return Ok(());
            }
            if diseases.is_empty() {
                println!("No diseases in the catalogue.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["ID", "Name", "Description"]);
            for disease in &diseases {
                table.add_row(vec![
                    disease.id.clone(),
                    disease.name.clone(),
                    cell(disease.description.as_deref()),
                ]);
            }
            println!("{}", table);
            Ok(())
        }
    }
}

fn vaccination_cell(record: &HealthRecord) -> String {
    let status = record
        .vaccination_status_structured
        .as_ref()
        .map(|s| s.status.as_str())
        .or(record.vaccination_status.as_deref());
    cell(status)
}

fn print_record(record: &HealthRecord) {
    let mut table = output::create_table();
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["ID".to_string(), record.id.clone()]);
    table.add_row(vec!["Child".to_string(), cell(record.child_id.as_deref())]);
    table.add_row(vec!["Date".to_string(), short_date(Some(&record.date))]);
    table.add_row(vec!["Vaccination".to_string(), vaccination_cell(record)]);
    table.add_row(vec![
        "Chronic conditions".to_string(),
        cell(record.chronic_conditions.as_deref()),
    ]);
    table.add_row(vec![
        "Medications".to_string(),
        cell(record.medications.as_deref()),
    ]);
    table.add_row(vec!["Remarks".to_string(), cell(record.remarks.as_deref())]);
    println!("{}", table);

    if !record.diseases.is_empty() {
        let mut table = output::create_table();
        table.set_header(vec!["Disease", "Severity", "Diagnosed", "Notes"]);
        for disease in &record.diseases {
            table.add_row(vec![
                disease
                    .disease_name
                    .clone()
                    .unwrap_or_else(|| disease.disease_id.clone()),
                cell(disease.severity.as_deref()),
                short_date(disease.diagnosed_date.as_deref()),
                cell(disease.notes.as_deref()),
            ]);
        }
        println!("{}", "Diseases".bold());
        println!("{}", table);
    }
}
