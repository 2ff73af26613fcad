use clap::{Parser, Subcommand};
use miette::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use tern_runtime::{InternTable, InternTableConfig, MarkSet, StrRef};
use tracing::info;

#[derive(Parser)]
#[command(name = "tern")]
#[command(author, version, about = "Drive the tern string intern table over token files")]
struct Cli {
    /// Intern table configuration (tern.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Intern every whitespace-separated token and print table sizes
    Intern {
        /// Token files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Intern weakly instead of strongly
        #[arg(long)]
        weak: bool,
    },

    /// Weakly intern tokens, promote a few, then collect and sweep
    Collect {
        /// Token files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Number of distinct strings kept alive and promoted to strong
        #[arg(long, default_value_t = 0)]
        keep: usize,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .build(),
        )
    }))?;

    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| miette::miette!("Failed to install logger: {}", e))?;

    let config = match &cli.config {
        Some(path) => InternTableConfig::from_file(path)
            .map_err(|e| miette::miette!("Failed to load {}: {}", path.display(), e))?,
        None => InternTableConfig::default(),
    };
    let table = InternTable::boot(&config)
        .map_err(|e| miette::miette!("Failed to boot intern table: {}", e))?;

    match cli.command {
        Commands::Intern { files, weak } => {
            let mut count = 0;
            for file in &files {
                count += intern_tokens(&table, read_tokens(file)?, !weak);
            }
            info!(tokens = count, unique = table.size(), "interned");
            dump(&table)?;
        }

        Commands::Collect { files, keep } => {
            let mut tokens = Vec::new();
            for file in &files {
                tokens.extend(read_tokens(file)?);
            }
            let kept = intern_weak_keeping(&table, tokens, keep);
            dump(&table)?;

            collect(&table, &kept);
            dump(&table)?;
        }
    }

    Ok(())
}

/// Intern every token, returning how many were seen.
fn intern_tokens(table: &InternTable, tokens: Vec<StrRef>, strong: bool) -> usize {
    let count = tokens.len();
    for token in tokens {
        table.insert(token, strong);
    }
    count
}

/// Weakly intern every token and return the first `keep` distinct
/// canonical instances.
fn intern_weak_keeping(table: &InternTable, tokens: Vec<StrRef>, keep: usize) -> Vec<StrRef> {
    let mut kept: Vec<StrRef> = Vec::new();
    for token in tokens {
        let canonical = table.insert(token, false);
        if kept.len() < keep && !kept.iter().any(|k| StrRef::ptr_eq(k, &canonical)) {
            kept.push(canonical);
        }
    }
    kept
}

/// Promote `kept` to strong, mark from the strong roots and sweep.
fn collect(table: &InternTable, kept: &[StrRef]) {
    for s in kept {
        table.intern_strong(Some(s.clone()));
    }
    let marks = MarkSet::from_roots(|set| table.visit_roots(set));
    info!(roots = marks.len(), "marked strong roots");
    table.sweep_weaks(&marks);
}

fn read_tokens(path: &Path) -> Result<Vec<StrRef>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| miette::miette!("Failed to read {}: {}", path.display(), e))?;
    Ok(content.split_whitespace().map(StrRef::from).collect())
}

fn dump(table: &InternTable) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    table
        .dump_for_sigquit(&mut stdout)
        .and_then(|()| stdout.flush())
        .map_err(|e| miette::miette!("Failed to write dump: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tern_runtime::InternStats;

    fn tokens(text: &str) -> Vec<StrRef> {
        text.split_whitespace().map(StrRef::from).collect()
    }

    #[test]
    fn test_intern_counts_every_token() {
        let table = InternTable::new();
        assert_eq!(intern_tokens(&table, tokens("a b a c"), true), 4);
        assert_eq!(table.stats(), InternStats { strong: 3, weak: 0, image: 0 });

        assert_eq!(intern_tokens(&table, tokens("a d"), false), 2);
        assert_eq!(table.stats(), InternStats { strong: 3, weak: 1, image: 0 });
    }

    #[test]
    fn test_collect_keeps_promoted_strings() {
        let table = InternTable::new();
        let kept = intern_weak_keeping(&table, tokens("a b c a d e b"), 2);
        let names: Vec<_> = kept.iter().map(|s| s.to_string()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(table.stats(), InternStats { strong: 0, weak: 5, image: 0 });

        collect(&table, &kept);
        assert_eq!(table.stats(), InternStats { strong: 2, weak: 0, image: 0 });
        for s in &kept {
            assert!(!table.contains_weak(s));
            let again = table.intern_weak(Some(StrRef::from(s.to_string().as_str()))).unwrap();
            assert!(StrRef::ptr_eq(&again, s));
        }
    }

    #[test]
    fn test_collect_without_keep_empties_weak_table() {
        let table = InternTable::new();
        let kept = intern_weak_keeping(&table, tokens("x y z"), 0);
        assert!(kept.is_empty());

        collect(&table, &kept);
        assert_eq!(table.size(), 0);
    }
}
