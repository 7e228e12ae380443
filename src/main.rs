//! # Quire CLI
//!
//! Usage:
//!   quire report.json -o layout.json
//!   echo '{ "sections": [...] }' | quire
//!   quire --example > report.json

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use quire::font::FontMetrics;
use quire::{LayoutConfig, LayoutEngine, PageSize};

#[derive(Parser)]
#[command(name = "quire")]
#[command(version)]
#[command(about = "Flow report sections into fixed-size pages", long_about = None)]
struct Cli {
    /// Report JSON (stdin if not specified)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Layout JSON output (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Layout configuration JSON
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Page size, overriding the configuration's page dimensions
    #[arg(long, value_enum)]
    page_size: Option<PageSizeArg>,

    /// TrueType/OpenType font to measure text with
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Print an example report and exit
    #[arg(long)]
    example: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum PageSizeArg {
    A4,
    Letter,
    Legal,
    A5,
}

impl From<PageSizeArg> for PageSize {
    fn from(arg: PageSizeArg) -> Self {
        match arg {
            PageSizeArg::A4 => PageSize::A4,
            PageSizeArg::Letter => PageSize::Letter,
            PageSizeArg::Legal => PageSize::Legal,
            PageSizeArg::A5 => PageSize::A5,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if cli.example {
        print!("{}", example_report_json());
        return ExitCode::SUCCESS;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✗ {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> quire::Result<()> {
    let mut config = match &cli.config {
        Some(path) => LayoutConfig::from_json(&fs::read_to_string(path)?)?,
        None => LayoutConfig::default(),
    };
    if let Some(size) = cli.page_size {
        let (width, height) = PageSize::from(size).dimensions();
        config.page_width = width;
        config.page_height = height;
    }

    let engine = match &cli.font {
        Some(path) => LayoutEngine::with_metrics(config, FontMetrics::from_path(path)?)?,
        None => LayoutEngine::new(config)?,
    };

    let input = match &cli.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let composition = quire::compose_json_with(&engine, &input)?;
    let json = composition.document.to_json()?;
    let pages = composition.document.page_count();

    match &cli.output {
        Some(path) => {
            fs::write(path, &json)?;
            eprintln!("✓ Laid out {} pages, written to {}", pages, path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
            eprintln!("✓ Laid out {} pages", pages);
        }
    }

    for warning in &composition.warnings {
        eprintln!("⚠ {}", warning);
    }

    Ok(())
}

fn example_report_json() -> &'static str {
    r##"{
  "sections": [
    {
      "type": "cover",
      "title": "Team Behavioral Analysis",
      "subtitle": "Estimation Team",
      "tagline": "AI-Native Estimation Assistant: Engagement Report",
      "summary": [
        ["Team Members Analyzed", "2"],
        ["Weekly Time Recovery Potential", "19 hours"],
        ["AI Personalization Level", "100% individualized"]
      ],
      "generatedOn": "March 3, 2025"
    },
    {
      "type": "profile",
      "name": "Dana Reyes",
      "role": "Project Setup Specialist",
      "profileType": "Detail-Oriented Organizer",
      "summary": "Detail-oriented project setup specialist who excels at takeoffs and tracking but is buried under documentation work.",
      "strengths": [
        "Accurate quantity takeoffs",
        "Keeps bid logs and trackers current",
        "Catches scope gaps early"
      ],
      "painPoints": [
        { "task": "Re-keying plan quantities into spreadsheets", "hoursPerWeek": 6 },
        { "task": "Formatting bid documents", "hoursPerWeek": 4 },
        { "task": "Chasing subcontractor quotes", "hoursPerWeek": 2 }
      ],
      "strategy": {
        "pace": "Methodical, step by step",
        "detailLevel": "Detailed with templates",
        "autonomy": 40,
        "priorities": [
          "Automate quantity import from takeoff software",
          "Generate bid document drafts from templates",
          "Track quote requests and send reminders"
        ]
      }
    },
    {
      "type": "profile",
      "name": "Marcus Hale",
      "role": "Senior Estimator",
      "profileType": "Fast-Paced Closer",
      "summary": "Experienced estimator who thrives on speed and relationships and wants the numbers without the paperwork.",
      "strengths": [
        "Strong subcontractor network",
        "Quick, confident pricing calls"
      ],
      "painPoints": [
        { "task": "Reviewing lengthy spec sections", "hoursPerWeek": 5 },
        { "task": "Writing scope clarifications", "hoursPerWeek": 2 }
      ],
      "strategy": {
        "pace": "Fast, bullet points first",
        "detailLevel": "Summary with drill-down",
        "autonomy": 75,
        "priorities": [
          "Summarize spec sections into risk lists",
          "Draft clarifications for review"
        ]
      }
    },
    {
      "type": "blocks",
      "title": "Appendix: Weekly Hours by Activity",
      "blocks": [
        {
          "type": "paragraph",
          "text": "Hours are self-reported averages over a four-week window."
        },
        {
          "type": "table",
          "columns": [
            { "header": "Team Member", "weight": 2 },
            { "header": "Activity", "weight": 3 },
            { "header": "Hours", "weight": 1 }
          ],
          "rows": [
            ["Dana Reyes", "Re-keying plan quantities", "6"],
            ["Dana Reyes", "Formatting bid documents", "4"],
            ["Dana Reyes", "Chasing subcontractor quotes", "2"],
            ["Marcus Hale", "Reviewing spec sections", "5"],
            ["Marcus Hale", "Writing scope clarifications", "2"]
          ]
        }
      ]
    }
  ]
}
"##
}
