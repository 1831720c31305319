use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Subcommand};
use transparent_procure::api::ProcurementService;
use transparent_procure::config::AppConfig;
use transparent_procure::error::AppError;
use transparent_procure::records::JsonFileStore;
use transparent_procure::reputation::{ScoreCard, ScoreSubject};

#[derive(Args, Debug, Default)]
pub(crate) struct DataArgs {
    /// Directory holding the JSON collections (defaults to APP_DATA_DIR)
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum ScoreTarget {
    /// Trust score for a registered contractor
    Contractor {
        /// Contractor identifier as stored in contractors.json
        #[arg(long)]
        id: String,
        #[command(flatten)]
        data: DataArgs,
    },
    /// Reputation score for a county government
    County {
        /// County name as it appears on tenders
        #[arg(long)]
        name: String,
        #[command(flatten)]
        data: DataArgs,
    },
}

pub(crate) fn run_score(target: ScoreTarget) -> Result<(), AppError> {
    let card = match target {
        ScoreTarget::Contractor { id, data } => service(data)?.contractor_card(&id)?,
        ScoreTarget::County { name, data } => service(data)?.county_card(&name)?,
    };
    print!("{}", render_score_card(&card));
    Ok(())
}

fn service(args: DataArgs) -> Result<ProcurementService<JsonFileStore>, AppError> {
    let data_dir = match args.data_dir {
        Some(dir) => dir,
        None => AppConfig::load()?.data.data_dir,
    };
    Ok(ProcurementService::new(Arc::new(JsonFileStore::new(data_dir))))
}

pub(crate) fn render_score_card(card: &ScoreCard) -> String {
    let subject = match card.subject {
        ScoreSubject::Contractor => "Contractor",
        ScoreSubject::County => "County",
    };

    let mut out = String::new();
    let _ = writeln!(out, "{subject} {}", card.name);
    let _ = writeln!(out, "- projects considered: {}", card.projects_considered);

    if card.deductions.is_empty() {
        let _ = writeln!(out, "- deductions: none");
    } else {
        let _ = writeln!(out, "- deductions:");
        for deduction in &card.deductions {
            let record = deduction.record_id.as_deref().unwrap_or("-");
            let _ = writeln!(
                out,
                "    -{:>3}  {} [{}] {}",
                deduction.points,
                deduction.reason.label(),
                record,
                deduction.notes
            );
        }
    }

    if let Some(payments) = &card.payments {
        let _ = writeln!(
            out,
            "- payments: {} matched | {:.0}% on time | {} chronic pending",
            payments.matched, payments.on_time_percentage, payments.chronic_pending
        );
    }

    let _ = writeln!(out, "Score {} / 100 ({})", card.score, card.tier.label());
    out
}
