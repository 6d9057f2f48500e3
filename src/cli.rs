//! Politicos command line
//!
//! `politicos` with no subcommand opens the dashboard; the other
//! subcommands run one gateway operation and print the result.

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use crate::api::types::{Gender, PageResult, Politician, PoliticianUpdate};
use crate::api::{ApiClient, PoliticiansApi};
use crate::cache::QueryCache;
use crate::config::Config;
use crate::errors::PoliticosError;
use crate::search::descriptor::POLITICIANS_PATH;
use crate::search::QueryDescriptor;
use crate::service::PoliticianService;
use crate::telemetry::{init_file_tracing, init_tracing};
use crate::tui;
use crate::view::dialog::{parse_amount, DELETE_DESCRIPTION, DELETE_TITLE};
use crate::view::grid::{row_cells, Align, Column, PaginationFooter, COLUMNS};
use crate::view::{ListView, StatisticsView, EMPTY_MESSAGE, ERROR_HEADING, MEAN_LABEL, MEDIAN_LABEL, TOP_HEADING};
use crate::view::currency::format_eur;

#[derive(Parser)]
#[command(name = "politicos")]
#[command(about = "Browse and maintain the public officials salary dataset")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// API base URL, overrides the config file
    #[arg(short, long, value_name = "URL", global = true)]
    endpoint: Option<String>,

    /// Output format for machine consumption
    #[arg(long, value_enum, default_value = "text", global = true)]
    output_format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text (default)
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the dashboard (default)
    #[command(alias = "b")]
    Browse {
        /// Deep link to start from, e.g. /politicians?page=2&gender=Mujer
        url: Option<String>,
    },

    /// Print one page of politicians
    #[command(alias = "ls")]
    List {
        /// Deep link the flags start from
        url: Option<String>,

        #[arg(long)]
        page: Option<u32>,

        #[arg(long)]
        per_page: Option<u32>,

        /// Name search term
        #[arg(short, long)]
        name: Option<String>,

        /// Hombre or Mujer
        #[arg(short, long, value_parser = parse_gender)]
        gender: Option<Gender>,

        #[arg(long)]
        party: Option<String>,
    },

    /// Show one politician
    Show { id: String },

    /// Change fields of a politician
    Edit {
        id: String,

        #[arg(long)]
        party: Option<String>,

        #[arg(long)]
        role: Option<String>,

        /// Autonomous community
        #[arg(long)]
        region: Option<String>,

        /// Amount such as 3500.50, 3500,50 or 3.500,50 (a bare 3.500 is refused)
        #[arg(long)]
        monthly_pay: Option<String>,

        #[arg(long)]
        annual_pay: Option<String>,

        #[arg(long)]
        remarks: Option<String>,
    },

    /// Delete a politician
    #[command(alias = "rm")]
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Upload a CSV file of politicians
    Import { file: PathBuf },

    /// Salary statistics
    Stats,

    /// Check that the API is reachable
    Health,
}

fn parse_gender(value: &str) -> std::result::Result<Gender, String> {
    value.parse()
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color || std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    }

    let command = cli.command.unwrap_or(Commands::Browse { url: None });
    let browsing = matches!(command, Commands::Browse { .. });
    if !browsing {
        init_tracing();
    }

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
        config.validate()?;
    }

    let api: Arc<dyn PoliticiansApi> = Arc::new(ApiClient::new(&config)?);
    let cache = Arc::new(QueryCache::with_config(&config.cache));
    let service = Arc::new(PoliticianService::new(api, cache));
    let format = cli.output_format;

    match command {
        Commands::Browse { url } => {
            init_file_tracing(&config.log_dir())?;
            let url = url.unwrap_or_else(|| POLITICIANS_PATH.to_string());
            tui::run(&config, service, &url).await?;
        }

        Commands::List {
            url,
            page,
            per_page,
            name,
            gender,
            party,
        } => {
            let mut descriptor = match url {
                Some(u) => QueryDescriptor::from_url(&u, config.search.default_per_page),
                None => QueryDescriptor::with_per_page(config.search.default_per_page),
            };
            if let Some(page) = page.filter(|p| *p > 0) {
                descriptor.page = page;
            }
            if let Some(per_page) = per_page.filter(|p| *p > 0) {
                descriptor.per_page = per_page;
            }
            if let Some(name) = name {
                descriptor.name = Some(name).filter(|n| !n.is_empty());
            }
            if gender.is_some() {
                descriptor.gender = gender;
            }
            let mut params = descriptor.to_list_params();
            params.party = party;

            let page = service.list(&params).await?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&page)?),
                OutputFormat::Text => {
                    let footer = list_footer(&descriptor, &page);
                    println!("{}", descriptor.to_url().dimmed());
                    print!("{}", render_list(&ListView::from_result(Ok(page)), &footer));
                }
            }
        }

        Commands::Show { id } => {
            let politician = service.get(&id).await?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&politician)?),
                OutputFormat::Text => print!("{}", render_politician(&politician)),
            }
        }

        Commands::Edit {
            id,
            party,
            role,
            region,
            monthly_pay,
            annual_pay,
            remarks,
        } => {
            let update = PoliticianUpdate {
                party,
                role,
                region,
                monthly_pay: monthly_pay.as_deref().map(amount_arg).transpose()?,
                annual_pay: annual_pay.as_deref().map(amount_arg).transpose()?,
                remarks,
                ..Default::default()
            };
            if update.is_empty() {
                return Err(PoliticosError::InvalidInput("nothing to update".to_string()).into());
            }
            let ack = service.update(&id, &update).await?;
            print_ack(format, &ack.message)?;
        }

        Commands::Delete { id, yes } => {
            if !yes && !confirm_delete(&id)? {
                println!("{}", "Cancelled".dimmed());
                return Ok(());
            }
            let ack = service.delete(&id).await?;
            print_ack(format, &ack.message)?;
        }

        Commands::Import { file } => {
            let ack = service.import_file(&file).await?;
            print_ack(format, &ack.message)?;
        }

        Commands::Stats => {
            let stats = service.statistics().await?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
                OutputFormat::Text => print!("{}", render_statistics(&StatisticsView::from_result(Ok(stats)))),
            }
        }

        Commands::Health => {
            let body = service.api().health().await?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&body)?),
                OutputFormat::Text => println!("{} {}", "✓".green(), config.endpoint),
            }
        }
    }

    Ok(())
}

fn amount_arg(value: &str) -> Result<f64, PoliticosError> {
    parse_amount(value).ok_or_else(|| {
        PoliticosError::InvalidInput(format!(
            "'{}' is not a valid amount (use 3500.50, 3500,50 or 3.500,50)",
            value
        ))
    })
}

fn print_ack(format: OutputFormat, message: &str) -> Result<()> {
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "message": message }))?
        ),
        OutputFormat::Text => println!("{} {}", "✓".green(), message),
    }
    Ok(())
}

fn confirm_delete(id: &str) -> Result<bool> {
    eprintln!("{}", DELETE_TITLE.bold());
    eprintln!("{} ({})", DELETE_DESCRIPTION, id);
    eprint!("Delete? [y/N] ");
    std::io::stderr().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn column_width(column: &Column) -> usize {
    (column.weight as usize).max(column.header.chars().count())
}

fn pad(text: &str, width: usize, align: Align) -> String {
    let shown: String = if text.chars().count() > width {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    } else {
        text.to_string()
    };
    match align {
        Align::Left => format!("{:<width$}", shown, width = width),
        Align::Right => format!("{:>width$}", shown, width = width),
    }
}

/// The grid as plain text, one line per record, followed by the footer.
pub fn render_list(view: &ListView, footer: &PaginationFooter) -> String {
    let mut out = String::new();
    match view {
        ListView::Loading => out.push_str("Loading...\n"),
        ListView::Error(message) => {
            out.push_str(&format!("{} {}\n", ERROR_HEADING.red().bold(), message));
        }
        ListView::Empty { .. } => {
            out.push_str(&format!("{}\n", EMPTY_MESSAGE.bold()));
            out.push_str(&format!("{}\n", "Import with: politicos import <FILE.csv>".dimmed()));
        }
        ListView::Rows(page) => {
            let header: Vec<String> = COLUMNS
                .iter()
                .map(|c| pad(c.header, column_width(c), c.align))
                .collect();
            out.push_str(&format!("{}\n", header.join(" ").bold()));
            for record in &page.records {
                let cells: Vec<String> = row_cells(record)
                    .iter()
                    .zip(COLUMNS.iter())
                    .map(|(text, c)| pad(text, column_width(c), c.align))
                    .collect();
                out.push_str(&cells.join(" "));
                out.push('\n');
            }
        }
    }
    out.push_str(&format!(
        "{} · {} per page\n",
        footer.label(),
        footer.page_size
    ));
    out
}

pub fn render_politician(p: &Politician) -> String {
    let rows = [
        ("Id", p.id.clone()),
        ("Nombre", p.name.clone()),
        ("Género", p.gender.clone()),
        ("Partido", p.party.clone()),
        ("Cargo", p.role.clone()),
        ("Institución", p.institution.clone()),
        ("CCAA", p.region.clone()),
        ("Sueldo base", format_eur(p.base_salary)),
        ("Complementos", format_eur(p.supplements)),
        ("Pagas extra", format_eur(p.bonuses)),
        ("Dietas", format_eur(p.allowances)),
        ("Trienios", format_eur(p.seniority_pay)),
        ("Retribución mensual", format_eur(p.monthly_pay)),
        ("Retribución anual", format_eur(p.annual_pay)),
        ("Observaciones", p.remarks.clone().unwrap_or_default()),
    ];
    rows.iter()
        .map(|(label, value)| format!("{} {}\n", format!("{:<20}", format!("{}:", label)).dimmed(), value))
        .collect()
}

pub fn render_statistics(view: &StatisticsView) -> String {
    match view {
        StatisticsView::Loading => "Loading...\n".to_string(),
        StatisticsView::Empty => format!("{}\n", EMPTY_MESSAGE),
        StatisticsView::Summary { mean, median, top } => {
            let mut out = format!(
                "{:<22} {}\n{:<22} {}\n\n{}\n",
                MEAN_LABEL,
                mean.bold(),
                MEDIAN_LABEL,
                median.bold(),
                TOP_HEADING.bold()
            );
            for entry in top {
                out.push_str(&format!(
                    "{:>3}. {:<40} {:<30} {:>16}\n",
                    entry.rank, entry.name, entry.role, entry.annual_pay
                ));
            }
            out
        }
    }
}

pub fn list_footer(descriptor: &QueryDescriptor, page: &PageResult) -> PaginationFooter {
    PaginationFooter::new(descriptor.pagination(), page.total_pages)
}
