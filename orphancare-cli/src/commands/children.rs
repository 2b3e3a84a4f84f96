//! Children commands

use anyhow::Result;
use chrono::NaiveDate;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;
use orphancare_core::domain::{ChildDetail, ChildPayload, ChildSummary, Gender, ParentStatus};

use super::{get_authenticated_context, print_mutation, with_spinner};
use crate::output::{self, cell, short_date};

#[derive(Subcommand)]
pub enum ChildrenCommands {
    /// List children
    List {
        /// Only show children whose name contains this text
        #[arg(long, short)]
        search: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a child with their health and nutrition history
    Show {
        /// Child ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Register a new child
    Create {
        /// Full name
        #[arg(long)]
        name: String,
        /// Gender (M or F)
        #[arg(long)]
        gender: Gender,
        #[command(flatten)]
        fields: ChildFields,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update a child; omitted fields keep their current value
    Update {
        /// Child ID
        id: String,
        /// Full name
        #[arg(long)]
        name: Option<String>,
        /// Gender (M or F)
        #[arg(long)]
        gender: Option<Gender>,
        #[command(flatten)]
        fields: ChildFields,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a child
    Delete {
        /// Child ID
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl ChildrenCommands {
    pub fn json(&self) -> bool {
        match self {
            ChildrenCommands::List { json, .. }
            | ChildrenCommands::Show { json, .. }
            | ChildrenCommands::Create { json, .. }
            | ChildrenCommands::Update { json, .. }
            | ChildrenCommands::Delete { json, .. } => *json,
        }
    }
}

#[derive(clap::Args)]
pub struct ChildFields {
    /// Birth date (YYYY-MM-DD)
    #[arg(long)]
    birth_date: Option<NaiveDate>,
    /// Estimated age in years, when the birth date is unknown
    #[arg(long)]
    age: Option<i32>,
    /// Date the child entered the orphanage (YYYY-MM-DD)
    #[arg(long)]
    entry_date: Option<NaiveDate>,
    /// Parental situation (total_orphan, partial_orphan, abandoned)
    #[arg(long)]
    parent_status: Option<ParentStatus>,
    /// Internal reference code
    #[arg(long)]
    code: Option<String>,
}

impl ChildFields {
    fn apply(self, payload: &mut ChildPayload) {
        if self.birth_date.is_some() {
            payload.birth_date = self.birth_date;
        }
        if self.age.is_some() {
            payload.estimated_age = self.age;
        }
        if self.entry_date.is_some() {
            payload.entry_date = self.entry_date;
        }
        if self.parent_status.is_some() {
            payload.parent_status = self.parent_status;
        }
        if self.code.is_some() {
            payload.internal_code = self.code;
        }
    }
}

pub async fn run(command: ChildrenCommands) -> Result<()> {
    match command {
        ChildrenCommands::List { search, json } => list(search, json).await,
        ChildrenCommands::Show { id, json } => show(&id, json).await,
        ChildrenCommands::Create {
            name,
            gender,
            fields,
            json,
        } => {
            let mut payload = ChildPayload::new(name, gender);
            fields.apply(&mut payload);

            let ctx = get_authenticated_context("children create").await?;
            let result =
                with_spinner("Creating child...", json, ctx.children.create(&payload)).await?;
            print_mutation(&result, "Child registered.", json)
        }
        ChildrenCommands::Update {
            id,
            name,
            gender,
            fields,
            json,
        } => {
            let ctx = get_authenticated_context("children update").await?;
            let current = with_spinner("Loading child...", json, ctx.children.get(&id)).await?;

            let mut payload = ChildPayload::from_summary(&current.summary);
            if let Some(name) = name {
                payload.full_name = name;
            }
            if let Some(gender) = gender {
                payload.gender = gender;
            }
            fields.apply(&mut payload);

            let result =
                with_spinner("Saving child...", json, ctx.children.update(&id, &payload)).await?;
            print_mutation(&result, "Child updated.", json)
        }
        ChildrenCommands::Delete { id, force, json } => {
            if !force && !json {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete child {} and all of their records?", id))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let ctx = get_authenticated_context("children delete").await?;
            let result = with_spinner("Deleting child...", json, ctx.children.delete(&id)).await?;
            print_mutation(&result, "Child deleted.", json)
        }
    }
}

fn matches_search(child: &ChildSummary, search: &str) -> bool {
    child
        .full_name
        .to_lowercase()
        .contains(&search.trim().to_lowercase())
}

fn age_cell(child: &ChildSummary) -> String {
    child
        .estimated_age
        .map(|a| a.to_string())
        .unwrap_or_else(|| short_date(child.birth_date.as_deref()))
}

async fn list(search: Option<String>, json: bool) -> Result<()> {
    let ctx = get_authenticated_context("children list").await?;
    let mut list = with_spinner("Loading children...", json, ctx.children.list()).await?;

    if let Some(search) = search.as_deref() {
        list.children.retain(|c| matches_search(c, search));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    if list.children.is_empty() {
        println!("No children found.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["ID", "Name", "Gender", "Age / Born", "Entered", "Status"]);
    for child in &list.children {
        table.add_row(vec![
            child.id.clone(),
            child.full_name.clone(),
            child.gender.code().to_string(),
            age_cell(child),
            short_date(child.entry_date.as_deref()),
            cell(child.parent_status.as_ref().map(|s| s.as_str())),
        ]);
    }
    println!("{}", table);

    if list.metrics.total_pages > 1 {
        println!(
            "{}",
            format!(
                "Page {} of {} ({} children)",
                list.metrics.current_page, list.metrics.total_pages, list.metrics.total_count
            )
            .dimmed()
        );
    }
    Ok(())
}

async fn show(id: &str, json: bool) -> Result<()> {
    let ctx = get_authenticated_context("children show").await?;
    let detail = with_spinner("Loading child...", json, ctx.children.get(id)).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    print_detail(&detail);
    Ok(())
}

fn print_detail(detail: &ChildDetail) {
    let child = &detail.summary;
    println!("{}", child.full_name.bold());

    let mut table = output::create_table();
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["ID".to_string(), child.id.clone()]);
    table.add_row(vec!["Gender".to_string(), child.gender.code().to_string()]);
    table.add_row(vec![
        "Birth date".to_string(),
        short_date(child.birth_date.as_deref()),
    ]);
    table.add_row(vec![
        "Estimated age".to_string(),
        child
            .estimated_age
            .map(|a| a.to_string())
            .unwrap_or_else(|| "-".to_string()),
    ]);
    table.add_row(vec![
        "Entry date".to_string(),
        short_date(child.entry_date.as_deref()),
    ]);
    table.add_row(vec![
        "Parent status".to_string(),
        cell(child.parent_status.as_ref().map(|s| s.as_str())),
    ]);
    table.add_row(vec![
        "Internal code".to_string(),
        cell(child.internal_code.as_deref()),
    ]);
    if let Some(orphanage) = &child.orphanage {
        table.add_row(vec!["Orphanage".to_string(), orphanage.name.clone()]);
    }
    println!("{}", table);

    if !detail.nutrition_records.is_empty() {
        let mut table = output::create_table();
        table.set_header(vec!["Date", "Weight (kg)", "Height (cm)", "BMI", "Status"]);
        for record in &detail.nutrition_records {
            table.add_row(vec![
                short_date(Some(&record.date)),
                format!("{:.1}", record.weight_kg),
                format!("{:.1}", record.height_cm),
                format!("{:.1}", record.bmi_or_computed()),
                cell(record.nutrition_status.as_deref()),
            ]);
        }
        println!("{}", "Nutrition".bold());
        println!("{}", table);
    }

    if !detail.health_records.is_empty() {
        let mut table = output::create_table();
        table.set_header(vec!["Date", "Vaccination", "Chronic conditions", "Remarks"]);
        for record in &detail.health_records {
            table.add_row(vec![
                short_date(Some(&record.date)),
                cell(record.vaccination_status.as_deref()),
                cell(record.chronic_conditions.as_deref()),
                cell(record.remarks.as_deref()),
            ]);
        }
        println!("{}", "Health".bold());
        println!("{}", table);
    }

    if !detail.child_diseases.is_empty() {
        let mut table = output::create_table();
        table.set_header(vec!["Disease", "Severity", "Diagnosed", "Notes"]);
        for disease in &detail.child_diseases {
            table.add_row(vec![
                cell(disease.diseases.as_ref().map(|d| d.name.as_str())),
                cell(disease.severity.as_deref()),
                short_date(disease.diagnosed_date.as_deref()),
                cell(disease.notes.as_deref()),
            ]);
        }
        println!("{}", "Diseases".bold());
        println!("{}", table);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(name: &str) -> ChildSummary {
        serde_json::from_value(serde_json::json!({
            "id": "c-1",
            "full_name": name,
            "gender": "F",
            "estimated_age": 9
        }))
        .unwrap()
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let child = summary("Amani Kabila");
        assert!(matches_search(&child, "amani"));
        assert!(matches_search(&child, " KABILA "));
        assert!(!matches_search(&child, "Jean"));
    }

    #[test]
    fn test_fields_only_override_given_values() {
        let mut payload = ChildPayload::new("Amani", Gender::Female);
        payload.internal_code = Some("ML-001".to_string());

        let fields = ChildFields {
            birth_date: None,
            age: Some(10),
            entry_date: None,
            parent_status: Some(ParentStatus::Abandoned),
            code: None,
        };
        fields.apply(&mut payload);

        assert_eq!(payload.estimated_age, Some(10));
        assert_eq!(payload.parent_status, Some(ParentStatus::Abandoned));
        assert_eq!(payload.internal_code.as_deref(), Some("ML-001"));
    }

    #[test]
    fn test_age_cell_falls_back_to_birth_date() {
        let mut child = summary("Amani");
        assert_eq!(age_cell(&child), "9");
        child.estimated_age = None;
        child.birth_date = Some("2015-06-01T00:00:00Z".to_string());
        assert_eq!(age_cell(&child), "2015-06-01");
    }
}
