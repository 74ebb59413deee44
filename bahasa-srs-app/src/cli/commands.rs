use crate::catalog;
use crate::cli::opts::*;

use anyhow::{bail, Context, Result};
use bahasa_srs_core::{
    Catalog, CatalogItem, Grade, KeyValueStore, MemoryStore, Phase, ReviewSession, SrsEngine,
    SystemClock,
};
use bahasa_srs_json::paths::data_root;
use bahasa_srs_json::JsonFileStore;
use bahasa_srs_sqlite::SqliteStore;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{stdin, stdout, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

pub fn run_cli(args: Cli) -> Result<()> {
    let catalog = catalog::load(args.catalog.as_deref())?;
    let store = open_store(&args.store, args.data_dir.clone(), args.db_path.clone())?;
    let engine = SrsEngine::new(store, Arc::new(SystemClock));

    match args.cmd {
        Command::Stats(f) => stats_cmd(&engine, &catalog, &f),
        Command::Due(f) => {
            let pool = pool_ids(&catalog, &f)?;
            print_items(&catalog, &engine.due_item_ids(&pool));
            Ok(())
        }
        Command::New { filter, limit } => {
            let pool = pool_ids(&catalog, &filter)?;
            let mut ids = engine.new_item_ids(&pool);
            if let Some(n) = limit {
                ids.truncate(n);
            }
            print_items(&catalog, &ids);
            Ok(())
        }
        Command::Show { id } => show_cmd(&engine, &catalog, &id),
        Command::Grade { id, grade } => grade_cmd(&engine, &catalog, &id, &grade),
        Command::Review(cmd) => review_cmd(&engine, &catalog, cmd),
        Command::Categories => {
            for cat in catalog.categories() {
                let n = catalog.filter_by_category(&cat).len();
                println!("{cat}\t{n}");
            }
            Ok(())
        }
        Command::Export { path } => {
            let s = serde_json::to_string_pretty(&engine.snapshot())?;
            std::fs::write(&path, s).with_context(|| format!("write {}", path.display()))?;
            println!("wrote {}", path.display());
            Ok(())
        }
        Command::Reset { yes } => {
            if !yes {
                bail!("refusing to delete all progress without --yes");
            }
            engine.reset_all();
            println!("ok");
            Ok(())
        }
    }
}

pub fn open_store(
    store: &StoreKind,
    data_dir: Option<PathBuf>,
    db_path: Option<PathBuf>,
) -> Result<Arc<dyn KeyValueStore>> {
    match store {
        StoreKind::Json => {
            let s = match data_dir {
                Some(dir) => JsonFileStore::open_in(dir)?,
                None => JsonFileStore::open_default()?,
            };
            Ok(Arc::new(s))
        }
        StoreKind::Sqlite => {
            let p = db_path
                .unwrap_or_else(|| data_dir.unwrap_or_else(data_root).join("bahasa-srs.sqlite3"));
            if let Some(parent) = p.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create database directory {}", parent.display()))?;
            }
            let store = SqliteStore::open_file(&p)
                .with_context(|| format!("open sqlite store {}", p.display()))?;
            Ok(Arc::new(store))
        }
        StoreKind::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}

fn pool_ids(catalog: &Catalog, f: &Filter) -> Result<Vec<String>> {
    let items = catalog.filter_by_category(&f.category);
    if items.is_empty() && !catalog.is_empty() {
        bail!("no items in category: {}", f.category);
    }
    Ok(items.into_iter().map(|i| i.id).collect())
}

fn stats_cmd(engine: &SrsEngine, catalog: &Catalog, f: &Filter) -> Result<()> {
    let s = engine.stats(&pool_ids(catalog, f)?);
    println!("total\t{}", s.total);
    println!("learned\t{}", s.learned);
    println!("due\t{}", s.due);
    println!("new\t{}", s.new);
    println!("mature\t{}", s.mature);
    Ok(())
}

fn show_cmd(engine: &SrsEngine, catalog: &Catalog, id: &str) -> Result<()> {
    let item = known_item(catalog, id)?;
    println!("{}\t{}\t[{}]", item.id, item.en, item.category);
    let progress = engine.progress(id);
    println!("phase\t{:?}", Phase::of(progress.as_ref()));
    if let Some(p) = progress {
        println!("interval\t{}", p.interval);
        println!("ease\t{:.2}", p.ease);
        println!("repetitions\t{}", p.repetitions);
        println!("next_review\t{}", p.next_review);
        println!("last_review\t{}", p.last_review);
    }
    Ok(())
}

fn grade_cmd(engine: &SrsEngine, catalog: &Catalog, id: &str, grade: &str) -> Result<()> {
    let grade: Grade = grade.parse()?;
    known_item(catalog, id)?;
    let p = engine.grade(id, grade);
    println!("{}\tnext review {} (in {} day(s))", p.item_id, p.next_review, p.interval);
    Ok(())
}

fn review_cmd(engine: &SrsEngine, catalog: &Catalog, cmd: ReviewCmd) -> Result<()> {
    let pool = pool_ids(catalog, &cmd.filter)?;
    let mut rng = match cmd.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut session = ReviewSession::build(engine, &pool, cmd.new_limit, &mut rng);
    let s = engine.stats(&pool);
    println!("{} due, {} new, {} learned", s.due, s.new, s.learned);
    if session.is_finished() {
        println!("nothing to review");
        return Ok(());
    }

    let total = session.deck().len();
    while let Some(id) = session.current().map(str::to_string) {
        let Some(item) = catalog.get(&id) else {
            warn!(item_id = %id, "session item missing from catalog");
            session.skip();
            continue;
        };
        println!("\n[{}/{}] {}", session.position() + 1, total, item.id);
        prompt_enter("[enter=show]")?;
        println!("= {}", item.en);
        if let Some(n) = &item.notes {
            println!("  ({n})");
        }
        println!("[1=again, 2=good, 3=easy, s=skip, q=quit]");
        let grade = loop {
            let line = read_line("grade> ")?;
            match line.trim().to_lowercase().as_str() {
                "s" | "skip" => break None,
                "q" | "quit" => {
                    print_tally(&session);
                    return Ok(());
                }
                other => match other.parse::<Grade>() {
                    Ok(g) => break Some(g),
                    Err(_) => println!("enter 1/2/3, s, or q"),
                },
            }
        };

        match grade {
            Some(g) => {
                if let Some(p) = session.answer(engine, g, &mut rng) {
                    if g == Grade::Again {
                        println!("-> again shortly");
                    } else {
                        println!("-> next due in {} day(s)", p.interval);
                    }
                }
            }
            None => session.skip(),
        }
    }

    print_tally(&session);
    Ok(())
}

fn known_item<'a>(catalog: &'a Catalog, id: &str) -> Result<&'a CatalogItem> {
    catalog
        .get(id)
        .with_context(|| format!("unknown item: {id}"))
}

fn print_items(catalog: &Catalog, ids: &[String]) {
    for id in ids {
        let en = catalog.get(id).map(|i| i.en.as_str()).unwrap_or("-");
        println!("{id}\t{en}");
    }
}

fn print_tally(session: &ReviewSession) {
    let t = session.tally();
    println!("\nreviewed {} (correct {}, wrong {})", t.reviewed, t.correct, t.wrong);
}

fn prompt_enter(msg: &str) -> Result<()> {
    read_line(msg).map(|_| ())
}

fn read_line(prompt: &str) -> Result<String> {
    print!("{prompt} ");
    stdout().flush()?;
    let mut s = String::new();
    if stdin().read_line(&mut s)? == 0 {
        bail!("stdin closed");
    }
    Ok(s)
}
