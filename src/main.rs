use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use price_gap::analysis::classify::Classifier;
use price_gap::analysis::gender::{normalize_with, NameFallback};
use price_gap::{export, ingest, summarize, Analysis, Pipeline, RawProduct, Settings, Stage, Summary};

#[derive(Parser)]
#[command(name = "price_gap", about = "Gender price-gap analysis for personal-care products")]
struct Cli {
    /// Settings file (default: ./price_gap.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every stage over a product CSV and export the stage tables
    Analyze {
        /// Product CSV
        input: PathBuf,
        /// Output directory (default from settings)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Similarity a pair must exceed to be grouped
        #[arg(short, long)]
        threshold: Option<f64>,
        /// Read "women" before "men" when inferring gender from product names
        #[arg(long)]
        women_first: bool,
        /// Skip writing files
        #[arg(long)]
        no_export: bool,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },
    /// Functionality label for one active ingredient
    Classify {
        ingredient: String,
        /// Product name, used when the ingredient is not recognized
        #[arg(short, long, default_value = "")]
        name: String,
    },
    /// Normalize one gender label
    Gender {
        label: Option<String>,
        /// Product name, used when the label is missing
        #[arg(short, long, default_value = "")]
        name: String,
        #[arg(long)]
        women_first: bool,
    },
    /// List known active ingredients in match order
    Ingredients,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze {
            input,
            output,
            threshold,
            women_first,
            no_export,
            limit,
        } => {
            if let Some(t) = threshold {
                settings.similarity_threshold = t;
            }
            if women_first {
                settings.name_fallback = NameFallback::WomenFirst;
            }
            let pipeline = Pipeline::from_settings(&settings)?;

            let ingested = ingest::read_path(&input)?;
            if ingested.products.is_empty() {
                println!("No product rows in {}.", input.display());
                return Ok(());
            }
            if !ingested.ignored_columns.is_empty() {
                println!("Ignored columns: {}", ingested.ignored_columns.join(", "));
            }

            println!("Analyzing {} products...", ingested.products.len());
            let analysis = run_with_progress(&pipeline, &ingested.products)?;
            let summary = summarize(&analysis.differences);

            let mut issues = ingested.issues;
            issues.extend(analysis.issues.iter().cloned());
            if !issues.is_empty() {
                println!("{} data issues (see log)", issues.len());
            }

            if analysis.has_matches() {
                print_overview(&analysis, limit);
                print_summary(&summary);
            } else {
                println!("No matching product pairs found.");
            }

            if !no_export {
                let dir = output.unwrap_or_else(|| settings.output_dir.clone());
                let written = export::write_all(&dir, &analysis, &summary, &issues)?;
                println!("\nWrote {} files to {}", written.len(), dir.display());
            }
        }
        Commands::Classify { ingredient, name } => {
            let classifier = Classifier::with_extra(settings.extra_ingredients.clone());
            println!("{}", classifier.classify(&ingredient, &name));
        }
        Commands::Gender {
            label,
            name,
            women_first,
        } => {
            let fallback = if women_first {
                NameFallback::WomenFirst
            } else {
                settings.name_fallback
            };
            println!("{}", normalize_with(label.as_deref(), &name, fallback));
        }
        Commands::Ingredients => {
            let classifier = Classifier::with_extra(settings.extra_ingredients.clone());
            for (i, rule) in classifier.rules().iter().enumerate() {
                println!("{:>3} | {:<24} | {}", i + 1, rule.needle, rule.label);
            }
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }
    Ok(())
}

/// One progress bar per stage, replaced when the stage changes.
fn run_with_progress(pipeline: &Pipeline, products: &[RawProduct]) -> anyhow::Result<Analysis> {
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} {msg:<24} [{bar:40.cyan/blue}] {pos}/{len}")?
        .progress_chars("#>-");

    let mut current: Option<(Stage, ProgressBar)> = None;
    let analysis = pipeline.run(products, &mut |stage, done, total| {
        if current.as_ref().map(|(s, _)| *s) != Some(stage) {
            if let Some((_, pb)) = current.take() {
                pb.finish_and_clear();
            }
            let pb = ProgressBar::new(total as u64);
            pb.set_style(style.clone());
            pb.set_message(stage.label());
            current = Some((stage, pb));
        }
        if let Some((_, pb)) = &current {
            pb.set_position(done as u64);
        }
    });
    if let Some((_, pb)) = current {
        pb.finish_and_clear();
    }
    Ok(analysis)
}

fn print_overview(analysis: &Analysis, limit: usize) {
    println!(
        "\n{:>3} | {:<12} | {:<24} | {:<24} | {:>6} | {:>8} | {:>8} | {:>13}",
        "#", "Brand", "Women's product", "Men's product", "Sim %", "Women", "Men", "Difference"
    );
    println!("{}", "-".repeat(120));

    for (group, report) in analysis.groups.iter().zip(&analysis.differences).take(limit) {
        println!(
            "{:>3} | {:<12} | {:<24} | {:<24} | {:>6.1} | {:>8.2} | {:>8.2} | {:>13}",
            group.group_id(),
            truncate(group.brand(), 12),
            truncate(&report.women_product, 24),
            truncate(&report.men_product, 24),
            group.similarity_percent(),
            report.women_price,
            report.men_price,
            report.delta.to_string(),
        );
    }

    if analysis.groups.len() > limit {
        println!("... {} more", analysis.groups.len() - limit);
    }
}

fn print_summary(summary: &Summary) {
    println!("\n{} pairs", summary.pairs);
    println!("  Women pay more: {}", summary.women_pay_more);
    println!("  Men pay more:   {}", summary.men_pay_more);
    println!("  Same price:     {}", summary.same_price);
    println!("  Indeterminate:  {}", summary.indeterminate);
    if let (Some(mean), Some(median)) = (summary.mean_percent, summary.median_percent) {
        println!("  Mean difference:   {:.2}%", mean);
        println!("  Median difference: {:.2}%", median);
    }
    println!("Positive values mean the women's product costs more.");
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_analyze() {
        let cli = Cli::try_parse_from(["price_gap", "analyze", "data.csv", "-t", "0.4", "--women-first"]).unwrap();
        match cli.command {
            Commands::Analyze {
                input,
                threshold,
                women_first,
                limit,
                ..
            } => {
                assert_eq!(input, PathBuf::from("data.csv"));
                assert_eq!(threshold, Some(0.4));
                assert!(women_first);
                assert_eq!(limit, 20);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn truncates_long_names() {
        assert_eq!(truncate("Short", 10), "Short");
        assert_eq!(truncate("A very long product name", 10), "A very ...");
    }
}
