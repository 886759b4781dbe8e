use std::env;
use std::path::PathBuf;

use tracing_subscriber::{fmt, EnvFilter};

use kbase_core::config::Config;
use kbase_core::DocumentStore;
use kbase_text::SearchRanker;

// Rank the corpus for a query and print hits with highlights.
// Usage:
//   cargo run -p kbase-cli --bin kbase-search -- "your query" [--k 4] [--corpus data/corpus.json]

fn parse_k(value: &str) -> Option<usize> {
    value.parse::<usize>().ok().filter(|&k| k > 0)
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let settings = config.settings()?;
    let args: Vec<String> = env::args().skip(1).collect();
    let mut query = String::new();
    let mut corpus: Option<PathBuf> = None;
    let mut k = settings.assistant.default_k;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--k" => {
                match args.get(i + 1).map(String::as_str).and_then(parse_k) {
                    Some(n) => k = n,
                    None => { eprintln!("--k requires a positive number"); std::process::exit(2); }
                }
                i += 2; continue;
            }
            "--corpus" => {
                if i + 1 >= args.len() { eprintln!("--corpus requires a path"); std::process::exit(2); }
                corpus = Some(PathBuf::from(&args[i + 1]));
                i += 2; continue;
            }
            s if s.starts_with('-') => { eprintln!("Unknown flag: {}", s); std::process::exit(2); }
            s => {
                if !query.is_empty() { query.push(' '); }
                query.push_str(s);
                i += 1;
            }
        }
    }
    if query.trim().is_empty() {
        eprintln!("Usage: kbase-search <query> [--k N] [--corpus PATH]");
        std::process::exit(1);
    }

    let corpus = match corpus { Some(p) => p, None => config.corpus_path()? };
    let ranker = SearchRanker::build(DocumentStore::load(&corpus)?, &settings.search)?;

    println!("Knowledge search\n================");
    println!("Corpus: {} ({} documents)", corpus.display(), ranker.all_documents().len());
    println!("Query: {} (k {})\n", query, k);

    let hits = ranker.search(&query, k)?;
    if hits.is_empty() { println!("No relevant information found."); }
    for (i, h) in hits.iter().enumerate() {
        println!("{:>2}. score={:.3} id={} category={}\n    {}\n    {}", i + 1, h.score, h.item.id, h.item.category, h.item.title, h.item.url);
        for hl in &h.highlights { println!("    > {}", hl); }
    }
    Ok(())
}
