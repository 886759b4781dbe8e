use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use serde_json::json;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use kbase_core::config::{resolve_with_base, Config};
use kbase_core::{DocumentStore, Error};
use kbase_rag::{cache_key, AnalyticsTracker, ChatRequest, ResponseAssembler};
use kbase_text::SearchRanker;

const NO_RESULTS: &str = "No relevant information found. Please try rephrasing your question.";

struct Options {
    corpus: Option<PathBuf>,
    write: Option<PathBuf>,
    k: Option<usize>,
    positional: Vec<String>,
}

fn parse_args() -> (String, Options) {
    let mut args: Vec<String> = env::args().collect();
    let prog = args.remove(0);
    if args.is_empty() {
        eprintln!("Usage: {} <index|ask|chat> [args...] [--corpus PATH] [--k N] [--write PATH]", prog);
        std::process::exit(1);
    }
    let cmd = args.remove(0);
    let mut opts = Options { corpus: None, write: None, k: None, positional: Vec::new() };
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--corpus" | "--write" | "--k" => {
                let Some(value) = args.get(i + 1) else {
                    eprintln!("{} requires a value", args[i]);
                    std::process::exit(2);
                };
                match args[i].as_str() {
                    "--corpus" => opts.corpus = Some(PathBuf::from(value)),
                    "--write" => opts.write = Some(PathBuf::from(value)),
                    _ => match value.parse::<usize>() {
                        Ok(k) if k > 0 => opts.k = Some(k),
                        _ => { eprintln!("--k requires a positive number"); std::process::exit(2); }
                    },
                }
                i += 2;
            }
            "-" => { opts.positional.push(args[i].clone()); i += 1; }
            s if s.starts_with('-') => { eprintln!("Unknown flag: {}", s); std::process::exit(2); }
            s => { opts.positional.push(s.to_string()); i += 1; }
        }
    }
    (cmd, opts)
}

/// What the widget would show for a failed request; details go to the log.
fn user_message(err: &Error) -> &'static str {
    match err {
        Error::CorpusUnavailable { .. } | Error::Index(_) | Error::InvalidConfig(_) => "Search system unavailable.",
        Error::InvalidRequest(_) | Error::InvalidQuery(_) => "Invalid message format.",
        Error::DocumentNotFound(_) => "An unexpected error occurred. Please try again.",
    }
}

fn fail(err: Error, code: i32) -> ! {
    error!(%err, "request failed");
    println!("{}", json!({ "error": user_message(&err) }));
    std::process::exit(code);
}

fn build_assembler(config: &Config, corpus: Option<PathBuf>) -> anyhow::Result<ResponseAssembler> {
    let settings = config.settings()?;
    let path = match corpus {
        Some(p) => resolve_with_base(config.base_dir(), p.to_string_lossy()),
        None => config.corpus_path()?,
    };
    let store = DocumentStore::load(&path)?;
    let ranker = SearchRanker::build(store, &settings.search)?;
    Ok(ResponseAssembler::new(Arc::new(ranker), settings.assistant.default_k))
}

fn answer(assembler: &ResponseAssembler, analytics: &AnalyticsTracker, query: &str, k: Option<usize>) {
    let started = Instant::now();
    let prepared = match assembler.prepare(query, k) {
        Ok(p) => p,
        Err(e) => fail(e, 1),
    };
    if prepared.response.citations.is_empty() {
        println!("{}", json!({ "error": NO_RESULTS }));
        std::process::exit(2);
    }
    analytics.track_assistant_response(query, started.elapsed(), prepared.response.citations.len());
    let key = cache_key(query, Some(assembler.retriever().store().source_hash()));
    let out = json!({
        "systemPrompt": prepared.prompt.system_prompt,
        "userPrompt": prepared.prompt.user_prompt,
        "cacheKey": key,
        "response": prepared.response,
    });
    match serde_json::to_string_pretty(&out) {
        Ok(s) => println!("{}", s),
        Err(e) => { error!(%e, "serialize response"); std::process::exit(1); }
    }
}

fn read_request(path: &str) -> std::io::Result<String> {
    if path == "-" {
        let mut raw = String::new();
        std::io::stdin().read_to_string(&mut raw)?;
        Ok(raw)
    } else {
        fs::read_to_string(path)
    }
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let (cmd, opts) = parse_args();
    match cmd.as_str() {
        "index" => {
            let assembler = build_assembler(&config, opts.corpus)?;
            let ranker = assembler.retriever();
            println!("Knowledge index\n===============");
            println!("📊 Indexed {} documents (corpus {})", ranker.all_documents().len(), ranker.store().source_hash());
            let mut per_category: BTreeMap<&str, usize> = BTreeMap::new();
            for item in ranker.all_documents() { *per_category.entry(item.category.as_str()).or_default() += 1; }
            for (category, count) in per_category { println!("  {:<14} {}", category, count); }
            if let Some(out) = opts.write {
                fs::write(&out, serde_json::to_string_pretty(ranker.all_documents())?)?;
                println!("💾 Wrote processed corpus to {}", out.display());
            }
        }
        "ask" => {
            let query = opts.positional.join(" ");
            if query.trim().is_empty() { eprintln!("Usage: kbase ask \"<question>\" [--k N]"); std::process::exit(1); }
            let assembler = match build_assembler(&config, opts.corpus) {
                Ok(a) => a,
                Err(e) => match e.downcast::<Error>() { Ok(err) => fail(err, 1), Err(e) => return Err(e) },
            };
            answer(&assembler, &AnalyticsTracker::new(), query.trim(), opts.k);
        }
        "chat" => {
            let Some(path) = opts.positional.first() else {
                eprintln!("Usage: kbase chat <request.json|-> [--k N]"); std::process::exit(1)
            };
            let raw = read_request(path)?;
            let request = ChatRequest::from_json(&raw).unwrap_or_else(|e| fail(e, 1));
            let query = request.last_user_query().unwrap_or_else(|e| fail(e, 1)).to_string();
            let assembler = match build_assembler(&config, opts.corpus) {
                Ok(a) => a,
                Err(e) => match e.downcast::<Error>() { Ok(err) => fail(err, 1), Err(e) => return Err(e) },
            };
            info!(messages = request.messages.len(), "chat request");
            answer(&assembler, &AnalyticsTracker::new(), &query, opts.k);
        }
        _ => { eprintln!("Unknown command: {}", cmd); std::process::exit(1); }
    }
    Ok(())
}
