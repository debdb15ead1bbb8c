use std::fmt::Write as _;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use scoresheet_layout::event_tab::{MASTER_SCORESHEET, REFRESH_COLUMNS, TEMPLATE_SHEET};
use scoresheet_layout::rankings::{slide_deck_replacements, SlideReplacements};
use scoresheet_layout::roster::{copy_team_roster, RosterCopy};
use scoresheet_layout::synth::EventLinkSummary;
use scoresheet_layout::tournament::{event_names, template_files_for_event, TournamentInfo};
use scoresheet_layout::{
    copy_template_blocks, label_event_tabs, link_events, link_scoring_sheet, refresh_formulas,
    EventLink, LayoutConfig, LinkReport, TabLabelSummary,
};
use scoresheet_model::Workbook;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Link tournament scoresheets over JSON workbook snapshots.
#[derive(Parser)]
#[command(
    name = "scoresheet-link",
    about = "Wire grading scoresheets, event spreadsheets and the master spreadsheet together."
)]
pub struct Args {
    /// Layout configuration (JSON). Missing fields use the standard template values.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log debug detail to stderr (overridden by `RUST_LOG`).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import the score columns of a grading scoresheet into an event spreadsheet.
    Link {
        /// Grading scoresheet snapshot.
        source: PathBuf,

        /// Event spreadsheet snapshot.
        target: PathBuf,

        /// Sheet in the event spreadsheet that receives the formulas.
        #[arg(long)]
        sheet: String,

        /// Write the updated event spreadsheet here.
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Exit with status 1 when any column could not be linked.
        #[arg(long)]
        strict: bool,

        /// Master spreadsheet whose blank score sheet blocks are copied into the sheet
        /// before linking.
        #[arg(long, value_name = "PATH")]
        template: Option<PathBuf>,
    },

    /// Import event spreadsheets back into the master spreadsheet's event tabs.
    Backlink {
        /// Master spreadsheet snapshot.
        master: PathBuf,

        /// Event tab and the spreadsheet it imports from. Repeatable.
        ///
        /// Format: `<event name>=<event spreadsheet reference>`.
        #[arg(long = "event", value_name = "NAME=REFERENCE", required = true)]
        events: Vec<String>,

        /// Write the updated master spreadsheet here.
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Title the master spreadsheet's event tabs and refresh its scoresheet formulas.
    Tabs {
        /// Master spreadsheet snapshot.
        master: PathBuf,

        /// Write the updated master spreadsheet here.
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Copy the team roster from the master spreadsheet into a grading scoresheet.
    Roster {
        /// Master spreadsheet snapshot.
        master: PathBuf,

        /// Grading scoresheet snapshot.
        grading: PathBuf,

        /// Write the updated grading scoresheet here.
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// List the tournament's events and the document names derived for them.
    Events {
        /// Master spreadsheet snapshot.
        master: PathBuf,

        /// Template file names to match against event names. Repeatable.
        #[arg(long = "template", value_name = "NAME")]
        templates: Vec<String>,
    },

    /// Print the awards slide placeholder text.
    Slides {
        /// Master spreadsheet snapshot.
        master: PathBuf,
    },
}

#[derive(Debug, Serialize)]
struct JsonTabs {
    #[serde(flatten)]
    labels: TabLabelSummary,
    refreshed_formulas: usize,
}

#[derive(Debug, Serialize)]
struct JsonTournament {
    full_name: String,
    date: String,
    score_sheets_folder: String,
    template_folder: String,
}

#[derive(Debug, Serialize)]
struct JsonEvent<'a> {
    name: &'a str,
    spreadsheet: Option<String>,
    grading_scoresheet: Option<String>,
    templates: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
struct JsonEvents<'a> {
    tournament: Option<JsonTournament>,
    events: Vec<JsonEvent<'a>>,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    run_with_args(args)
}

pub fn run_with_args(args: Args) -> Result<()> {
    init_logging(args.verbose);
    let config = load_config(args.config.as_deref())?;

    match &args.command {
        Command::Link {
            source,
            target,
            sheet,
            output,
            strict,
            template,
        } => {
            let source_doc = load_workbook(source)?;
            let mut target_doc = load_workbook(target)?;
            if let Some(template) = template {
                let master_doc = load_workbook(template)?;
                let template_sheet = master_doc.sheet(TEMPLATE_SHEET).with_context(|| {
                    format!("{} has no `{TEMPLATE_SHEET}` sheet", template.display())
                })?;
                copy_template_blocks(template_sheet, &mut target_doc, sheet, sheet)
                    .with_context(|| format!("copy template blocks into {}", target.display()))?;
            }
            let report = link_scoring_sheet(&source_doc, &mut target_doc, sheet, &config)
                .with_context(|| format!("link {} into {}", source.display(), target.display()))?;

            if let Some(path) = output {
                save_workbook(path, &target_doc)?;
            }
            match args.format {
                OutputFormat::Text => emit(&render_link_report(&report)?)?,
                OutputFormat::Json => emit_json(&report)?,
            }

            if *strict && !report.is_complete() {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Backlink {
            master,
            events,
            output,
        } => {
            let events = events
                .iter()
                .map(|raw| parse_event_link(raw))
                .collect::<Result<Vec<_>>>()?;
            let mut master_doc = load_workbook(master)?;
            let summary = link_events(&mut master_doc, &events, &config)
                .with_context(|| format!("link events into {}", master.display()))?;

            if let Some(path) = output {
                save_workbook(path, &master_doc)?;
            }
            match args.format {
                OutputFormat::Text => emit(&render_backlink_summary(&summary)?),
                OutputFormat::Json => emit_json(&summary),
            }
        }
        Command::Tabs { master, output } => {
            let mut master_doc = load_workbook(master)?;
            let labels = label_event_tabs(&mut master_doc)
                .with_context(|| format!("label event tabs in {}", master.display()))?;
            let refreshed_formulas =
                refresh_formulas(&mut master_doc, MASTER_SCORESHEET, REFRESH_COLUMNS)
                    .with_context(|| format!("refresh formulas in {}", master.display()))?;

            if let Some(path) = output {
                save_workbook(path, &master_doc)?;
            }
            let report = JsonTabs {
                labels,
                refreshed_formulas,
            };
            match args.format {
                OutputFormat::Text => emit(&render_tabs(&report)?),
                OutputFormat::Json => emit_json(&report),
            }
        }
        Command::Roster {
            master,
            grading,
            output,
        } => {
            let master_doc = load_workbook(master)?;
            let mut grading_doc = load_workbook(grading)?;
            let copy = copy_team_roster(&master_doc, &mut grading_doc, &config)
                .with_context(|| format!("copy roster into {}", grading.display()))?;

            if let Some(path) = output {
                save_workbook(path, &grading_doc)?;
            }
            match args.format {
                OutputFormat::Text => emit(&render_roster_copy(copy.as_ref())?),
                OutputFormat::Json => emit_json(&copy),
            }
        }
        Command::Events { master, templates } => {
            let master_doc = load_workbook(master)?;
            let names = event_names(&master_doc)
                .with_context(|| format!("read events from {}", master.display()))?;
            let info = match TournamentInfo::from_document(&master_doc) {
                Ok(info) => Some(info),
                Err(err) => {
                    log::warn!("tournament details incomplete: {err}");
                    None
                }
            };

            let report = JsonEvents {
                tournament: info.as_ref().map(|info| JsonTournament {
                    full_name: info.full_name(),
                    date: info.date.to_string(),
                    score_sheets_folder: info.score_sheets_folder_name(),
                    template_folder: info.template_folder_name(),
                }),
                events: names
                    .iter()
                    .map(|name| JsonEvent {
                        name,
                        spreadsheet: info.as_ref().map(|i| i.event_spreadsheet_name(name)),
                        grading_scoresheet: info
                            .as_ref()
                            .map(|i| i.grading_scoresheet_name(name)),
                        templates: template_files_for_event(name, templates),
                    })
                    .collect(),
            };
            match args.format {
                OutputFormat::Text => emit(&render_events(&report)?),
                OutputFormat::Json => emit_json(&report),
            }
        }
        Command::Slides { master } => {
            let master_doc = load_workbook(master)?;
            let names = event_names(&master_doc)
                .with_context(|| format!("read events from {}", master.display()))?;
            let slides = slide_deck_replacements(&master_doc, &names, &config)
                .with_context(|| format!("read rankings from {}", master.display()))?;
            match args.format {
                OutputFormat::Text => emit(&render_slides(&slides)?),
                OutputFormat::Json => emit_json(&slides),
            }
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    // A second initialization (tests calling `run_with_args` repeatedly) is not an error.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .target(env_logger::Target::Stderr)
        .try_init();
}

fn load_config(path: Option<&Path>) -> Result<LayoutConfig> {
    let config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parse config {}", path.display()))?
        }
        None => LayoutConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn load_workbook(path: &Path) -> Result<Workbook> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read workbook {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse workbook {}", path.display()))
}

fn save_workbook(path: &Path, workbook: &Workbook) -> Result<()> {
    let mut json = serde_json::to_string_pretty(workbook)?;
    json.push('\n');
    std::fs::write(path, json).with_context(|| format!("write workbook {}", path.display()))?;
    log::info!("wrote {}", path.display());
    Ok(())
}

fn parse_event_link(raw: &str) -> Result<EventLink> {
    let Some((name, reference)) = raw.split_once('=') else {
        anyhow::bail!("invalid --event '{raw}' (expected format: <name>=<reference>)");
    };
    let (name, reference) = (name.trim(), reference.trim());
    if name.is_empty() || reference.is_empty() {
        anyhow::bail!("invalid --event '{raw}' (expected format: <name>=<reference>)");
    }
    Ok(EventLink {
        event_name: name.to_string(),
        event_reference: reference.to_string(),
    })
}

/// Write to stdout, treating a closed pipe (`... | head`) as success.
fn emit(text: &str) -> Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    match handle.write_all(text.as_bytes()).and_then(|()| handle.flush()) {
        Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
        other => other.context("write to stdout"),
    }
}

fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    emit(&json)
}

fn render_link_report(report: &LinkReport) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "Linked sheet `{}`", report.destination)?;
    for column in &report.linked {
        writeln!(
            out,
            "  {:<12} {:<4} {}",
            column.header, column.cell, column.source_range
        )?;
    }
    writeln!(
        out,
        "  skipped: {}",
        if report.skipped.is_empty() {
            "(none)".to_string()
        } else {
            report.skipped.join(", ")
        }
    )?;
    Ok(out)
}

fn render_backlink_summary(summary: &EventLinkSummary) -> Result<String> {
    let mut out = String::new();
    for report in &summary.linked {
        out.push_str(&render_link_report(report)?);
    }
    if !summary.missing_tabs.is_empty() {
        writeln!(out, "Missing event tabs: {}", summary.missing_tabs.join(", "))?;
    }
    Ok(out)
}

fn render_tabs(report: &JsonTabs) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "Labeled event tabs: {}", report.labels.labeled.join(", "))?;
    if !report.labels.missing_tabs.is_empty() {
        writeln!(out, "Missing event tabs: {}", report.labels.missing_tabs.join(", "))?;
    }
    if !report.labels.missing_direction.is_empty() {
        writeln!(
            out,
            "No scoring direction for: {}",
            report.labels.missing_direction.join(", ")
        )?;
    }
    writeln!(
        out,
        "Refreshed {} formulas on `{MASTER_SCORESHEET}`",
        report.refreshed_formulas
    )?;
    Ok(out)
}

fn render_roster_copy(copy: Option<&RosterCopy>) -> Result<String> {
    let mut out = String::new();
    let Some(copy) = copy else {
        writeln!(out, "No roster header found; nothing copied.")?;
        return Ok(out);
    };
    writeln!(out, "Roster copied into sheet `{}`", copy.sheet)?;
    for column in &copy.columns {
        writeln!(out, "  {:<14} {}", column.named_range, column.range)?;
    }
    Ok(out)
}

fn render_events(report: &JsonEvents<'_>) -> Result<String> {
    let mut out = String::new();
    match &report.tournament {
        Some(tournament) => {
            writeln!(out, "Tournament: {}", tournament.full_name)?;
            writeln!(out, "  score sheets folder: {}", tournament.score_sheets_folder)?;
            writeln!(out, "  template folder: {}", tournament.template_folder)?;
        }
        None => writeln!(out, "Tournament: (details not entered)")?,
    }
    writeln!(out)?;
    for event in &report.events {
        writeln!(out, "{}", event.name)?;
        if let Some(spreadsheet) = &event.spreadsheet {
            writeln!(out, "  spreadsheet: {spreadsheet}")?;
        }
        if let Some(grading) = &event.grading_scoresheet {
            writeln!(out, "  grading scoresheet: {grading}")?;
        }
        if !event.templates.is_empty() {
            writeln!(out, "  templates: {}", event.templates.join(", "))?;
        }
    }
    Ok(out)
}

fn render_slides(slides: &[SlideReplacements]) -> Result<String> {
    let mut out = String::new();
    for slide in slides {
        writeln!(out, "[{}]", slide.title)?;
        for (placeholder, text) in &slide.replacements {
            writeln!(out, "  {placeholder} -> {}", text.replace('\t', " | "))?;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_links_split_on_the_first_equals_sign() {
        let link = parse_event_link("Anatomy=https://docs.example.com/d/x?a=b").unwrap();
        assert_eq!(link.event_name, "Anatomy");
        assert_eq!(link.event_reference, "https://docs.example.com/d/x?a=b");

        assert!(parse_event_link("Anatomy").is_err());
        assert!(parse_event_link("=doc://x").is_err());
    }

    #[test]
    fn args_accept_global_options_after_the_subcommand() {
        let args = Args::try_parse_from([
            "scoresheet-link",
            "slides",
            "master.json",
            "--format",
            "json",
            "--verbose",
        ])
        .unwrap();
        assert!(matches!(args.format, OutputFormat::Json));
        assert!(args.verbose);
        assert!(matches!(args.command, Command::Slides { .. }));
    }

    #[test]
    fn backlink_requires_an_event() {
        assert!(Args::try_parse_from(["scoresheet-link", "backlink", "master.json"]).is_err());
    }

    #[test]
    fn tabs_text_reports_missing_tabs_and_refresh_count() {
        let report = JsonTabs {
            labels: TabLabelSummary {
                labeled: vec!["Anatomy".into()],
                missing_tabs: vec!["Fossils".into()],
                missing_direction: Vec::new(),
            },
            refreshed_formulas: 3,
        };
        let text = render_tabs(&report).unwrap();
        assert!(text.contains("Missing event tabs: Fossils"), "{text}");
        assert!(text.contains("Refreshed 3 formulas"), "{text}");
        assert!(!text.contains("No scoring direction"), "{text}");
    }

    #[test]
    fn link_report_text_lists_skipped_columns() {
        let report = LinkReport {
            destination: "Anatomy".into(),
            linked: Vec::new(),
            skipped: vec!["Tiebreaker".into()],
        };
        let text = render_link_report(&report).unwrap();
        assert!(text.contains("skipped: Tiebreaker"), "{text}");
    }
}
