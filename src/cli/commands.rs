use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::processors::{ClimateSummarizer, YearFilter};
use crate::readers::SourceData;
use crate::settings::SummaryConfig;
use crate::utils::progress::ProgressReporter;
use crate::writers::ReportWriter;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Install the tracing subscriber. `RUST_LOG` wins over `-v` when set.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .with_thread_names(verbose >= 3)
        .try_init();
}

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose);

    let mut config = SummaryConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Summarize {
            input,
            min_year,
            max_year,
            max_workers,
            timeout_secs,
            timestamp_policy,
            mmap,
            format,
            output_file,
        } => {
            if let Some(path) = input {
                config.input_path = Some(path);
            }
            if let Some(year) = min_year {
                config.min_year = year;
            }
            if let Some(year) = max_year {
                config.max_year = year;
            }
            if let Some(workers) = max_workers {
                config.worker_concurrency = workers;
            }
            if let Some(secs) = timeout_secs {
                config.deadline_secs = Some(secs);
            }
            if let Some(policy) = timestamp_policy {
                config.timestamp_policy = policy;
            }
            config.use_mmap |= mmap;
            config.check()?;

            let input = config.require_input_path()?.to_path_buf();
            debug!("Effective configuration: {:?}", config);

            let summarizer = ClimateSummarizer::from_config(&config)?;
            let progress = Arc::new(ProgressReporter::new_spinner("Starting...", cli.quiet));

            let summary = summarizer
                .summarize_file(&input, Some(Arc::clone(&progress)))
                .await?;

            let writer = ReportWriter::new(format);
            match output_file {
                Some(path) => {
                    writer.write_to_file(&summary, &path)?;
                    println!("Summary written to {}", path.display());
                }
                None => println!("{}", writer.render(&summary)?),
            }
        }

        Commands::Validate {
            input,
            timestamp_policy,
            show,
        } => {
            if let Some(path) = input {
                config.input_path = Some(path);
            }
            if let Some(policy) = timestamp_policy {
                config.timestamp_policy = policy;
            }
            config.check()?;

            let input = config.require_input_path()?.to_path_buf();
            let progress = ProgressReporter::new_spinner("Validating input...", cli.quiet);

            let reader = ClimateSummarizer::from_config(&config)?.reader();
            let source_path = input.clone();
            let source = tokio::task::spawn_blocking(move || reader.read_path(&source_path)).await??;

            progress.finish_with_message("Validation complete");

            let year_filter = YearFilter::new(config.min_year, config.max_year)?;
            println!("{}", validation_report(&source, &year_filter, show));
        }
    }

    Ok(())
}

fn validation_report(source: &SourceData, year_filter: &YearFilter, show: usize) -> String {
    let in_range = year_filter.apply(&source.records).len();

    let mut report = format!(
        "=== Validation Report ===\n\
        Rows read: {}\n\
        Usable records: {}\n\
        Rejected rows: {}\n\
        Records in {}-{}: {}\n",
        source.rows_read,
        source.records.len(),
        source.rows_skipped(),
        year_filter.min_year(),
        year_filter.max_year(),
        in_range
    );

    if !source.skipped.is_empty() && show > 0 {
        report.push_str(&format!(
            "\nFirst {} rejected rows:\n",
            show.min(source.skipped.len())
        ));
        for row in source.skipped.iter().take(show) {
            report.push_str(&format!("  line {}: {}\n", row.line, row.reason));
        }
    }

    if source.skipped.is_empty() {
        report.push_str("\n✅ All rows parsed\n");
    } else {
        report.push_str(&format!(
            "\n⚠️  {} rows will be ignored when summarizing\n",
            source.rows_skipped()
        ));
    }

    report
}
