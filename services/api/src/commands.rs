use crate::infra::{parse_date, parse_slot};
use chrono::{NaiveDate, Utc};
use clap::{Args, Subcommand};
use rota::config::AppConfig;
use rota::error::AppError;
use rota::workflows::rota::export::{export_file_stem, write_csv};
use rota::workflows::rota::revision::revision_file_name;
use rota::workflows::rota::{
    clean_participants, shift_counts, ManualEdit, RevisionSettings, RotaPlanner, RotaRequest,
    RotaRevision, ShiftCount, SlotRef, WeekRecord,
};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct GenerateArgs {
    /// Comma-separated participant names, in rotation order
    #[arg(long, value_delimiter = ',', required = true)]
    pub(crate) names: Vec<String>,
    /// First date of the rota (YYYY-MM-DD); moved forward to the next Friday
    #[arg(long, value_parser = parse_date)]
    pub(crate) start: NaiveDate,
    /// Number of weeks to generate
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) weeks: i64,
    /// Try every starting rotation and keep the most evenly spaced rota
    #[arg(long)]
    pub(crate) smooth: bool,
    /// Write a CSV export to this file (or directory)
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Save the rota as a revision document to this file (or directory)
    #[arg(long)]
    pub(crate) json: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct EditArgs {
    /// Revision document to edit
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Where to write the next revision (defaults to overwriting the input)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    #[command(subcommand)]
    pub(crate) command: EditCommand,
}

/// Slots are written `WEEK:DUTY` with 1-based weeks, e.g. `3:weekend`.
#[derive(Subcommand, Debug)]
pub(crate) enum EditCommand {
    /// Exchange the occupants of two cells
    SwapCells {
        #[arg(value_parser = parse_slot)]
        first: SlotRef,
        #[arg(value_parser = parse_slot)]
        second: SlotRef,
    },
    /// Exchange every shift of two people
    SwapPeople { first: String, second: String },
    /// Put someone into a single cell
    CoverShift {
        #[arg(value_parser = parse_slot)]
        slot: SlotRef,
        covering: String,
    },
    /// Hand every shift of one person to another
    CoverAll { covering: String, covered: String },
}

impl From<EditCommand> for ManualEdit {
    fn from(command: EditCommand) -> Self {
        match command {
            EditCommand::SwapCells { first, second } => ManualEdit::SwapCells { first, second },
            EditCommand::SwapPeople { first, second } => ManualEdit::SwapPeople { first, second },
            EditCommand::CoverShift { slot, covering } => ManualEdit::CoverShift { slot, covering },
            EditCommand::CoverAll { covering, covered } => {
                ManualEdit::CoverAll { covering, covered }
            }
        }
    }
}

pub(crate) fn run_generate(args: GenerateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let planner = RotaPlanner::new(config.rota);
    generate_with(&planner, args).map(|_| ())
}

/// Returns the files written, CSV first.
fn generate_with(planner: &RotaPlanner, args: GenerateArgs) -> Result<Vec<PathBuf>, AppError> {
    let GenerateArgs {
        names,
        start,
        weeks,
        smooth,
        csv,
        json,
    } = args;

    let request = RotaRequest {
        names: names.clone(),
        start_date: start,
        weeks,
        smooth: smooth.then_some(true),
    };
    let plan = planner.plan(&request)?;

    println!(
        "Rota for {} weeks commencing {}",
        plan.rows.len(),
        plan.week_commencing.format("%d/%m/%Y")
    );
    render_rota(&plan.rows);
    render_shift_counts(&plan.shift_counts);

    let mut written = Vec::new();
    let start_iso = start.format("%Y-%m-%d").to_string();

    if let Some(path) = csv {
        let path = resolve_output(
            path,
            format!("{}.csv", export_file_stem(&start_iso, weeks)),
        );
        write_csv(&plan.rows, BufWriter::new(File::create(&path)?))?;
        println!("CSV written to {}", path.display());
        written.push(path);
    }

    if let Some(path) = json {
        let saved_at = Utc::now();
        let settings = RevisionSettings {
            start_date: start,
            weeks,
            names: clean_participants(&names),
        };
        let document = RotaRevision::new(settings, &plan.rows, 1, saved_at);
        let path = resolve_output(path, revision_file_name(1, saved_at));
        fs::write(&path, document.to_json_pretty()?)?;
        println!("Revision 1 saved to {}", path.display());
        written.push(path);
    }

    Ok(written)
}

pub(crate) fn run_edit(args: EditArgs) -> Result<(), AppError> {
    edit_document(args).map(|_| ())
}

/// Applies the edit and writes the next revision, returning its path.
fn edit_document(args: EditArgs) -> Result<PathBuf, AppError> {
    let EditArgs {
        input,
        output,
        command,
    } = args;

    let document = RotaRevision::from_json(&fs::read_to_string(&input)?)?;
    let mut rows = document.week_records();
    let edit = ManualEdit::from(command);
    let changed = edit.apply(&mut rows)?;
    println!("{} ({} cells changed)", edit.describe(), changed);

    let saved_at = Utc::now();
    let revision = document.meta.revision + 1;
    let updated = RotaRevision::new(document.settings, &rows, revision, saved_at);
    let path = resolve_output(
        output.unwrap_or(input),
        revision_file_name(revision, saved_at),
    );
    fs::write(&path, updated.to_json_pretty()?)?;

    render_rota(&rows);
    render_shift_counts(&shift_counts(&rows));
    println!("Revision {} saved to {}", revision, path.display());
    Ok(path)
}

fn resolve_output(path: PathBuf, file_name: String) -> PathBuf {
    if path.is_dir() {
        path.join(file_name)
    } else {
        path
    }
}

fn render_rota(rows: &[WeekRecord]) {
    let width = rows
        .iter()
        .flat_map(|row| [row.weekend.as_deref(), row.week.as_deref()])
        .flatten()
        .map(str::len)
        .chain(std::iter::once("Weekend".len()))
        .max()
        .unwrap_or(0);

    println!("{:<12}  {:<width$}  Week", "Commencing", "Weekend");
    for row in rows {
        println!(
            "{:<12}  {:<width$}  {}",
            row.week_commencing.format("%d/%m/%Y").to_string(),
            row.weekend.as_deref().unwrap_or("-"),
            row.week.as_deref().unwrap_or("-"),
        );
    }
}

fn render_shift_counts(counts: &[ShiftCount]) {
    if counts.is_empty() {
        return;
    }
    println!("\nShift counts");
    for count in counts {
        println!(
            "- {}: {} weekend | {} week | {} total",
            count.name, count.weekend, count.week, count.total
        );
    }
}
