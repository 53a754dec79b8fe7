use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;

use curate_docs::{
    Auditor, Cli, Command, Config, FileDiscovery, FixTagsArgs, Output, TaxonomyLoader, auto_tag,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();

    if let Err(message) = cli.validate() {
        eprintln!("Error: {message}");
        return ExitCode::from(2);
    }

    let config = Config::from_cli(&cli);

    match run(&cli, &config).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(2)
        }
    }
}

async fn run(cli: &Cli, config: &Config) -> anyhow::Result<bool> {
    let loader = TaxonomyLoader::with_override(config.tags_override.clone());

    match &cli.command {
        Command::Audit(args) => {
            let root = match &args.root {
                Some(root) => root.clone(),
                None => std::env::current_dir().context("failed to resolve current directory")?,
            };

            let registry = loader.load_or_empty(&root).await;
            let discovery = FileDiscovery::new()
                .with_extensions(args.get_extensions())
                .with_include_patterns(args.include_patterns.clone())?
                .with_exclude_patterns(args.exclude_patterns.clone())?;

            let auditor = Auditor::new(registry).with_discovery(discovery);
            let report = auditor
                .audit(&root)
                .await
                .with_context(|| format!("failed to audit {}", root.display()))?;

            let output = Output::new(config.verbosity());
            print!("{}", output.render(&report, config.format));

            Ok(!report.has_failures())
        }
        Command::FixTags(args) => fix_tags(args, &loader).await,
    }
}

async fn fix_tags(args: &FixTagsArgs, loader: &TaxonomyLoader) -> anyhow::Result<bool> {
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let registry = loader.load_or_empty(&cwd).await;

    let roots = if args.paths.is_empty() {
        vec![cwd]
    } else {
        args.paths.clone()
    };

    let discovery = FileDiscovery::new().with_extensions(vec!["md".to_string()]);
    let mut files: Vec<PathBuf> = Vec::new();
    for root in &roots {
        files.extend(discovery.discover_files(root).await?);
    }

    let mut updated = 0usize;
    for file in &files {
        let content = match tokio::fs::read_to_string(file).await {
            Ok(content) => content,
            Err(err) => {
                eprintln!("Skipped {}: {}", file.display(), err);
                continue;
            }
        };

        let rewritten = match auto_tag(&content, file, &registry) {
            Ok(rewritten) => rewritten,
            Err(err) => {
                eprintln!("Skipped {}: {}", file.display(), err);
                continue;
            }
        };

        if rewritten != content {
            updated += 1;
            if args.dry_run {
                println!("Would update: {}", file.display());
            } else {
                tokio::fs::write(file, rewritten)
                    .await
                    .with_context(|| format!("failed to write {}", file.display()))?;
                println!("Updated: {}", file.display());
            }
        }
    }

    println!("Processed {} files, {} updated.", files.len(), updated);
    Ok(true)
}
