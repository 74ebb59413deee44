use anyhow::{Context, Result};
use bahasa_srs_core::{Catalog, CatalogItem};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

const BUNDLED: &str = include_str!("../data/vocabulary.csv");

pub fn load(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(p) => {
            let file = std::fs::File::open(p)
                .with_context(|| format!("open catalog {}", p.display()))?;
            from_reader(file).with_context(|| format!("read catalog {}", p.display()))
        }
        None => from_reader(BUNDLED.as_bytes()).context("read bundled catalog"),
    }
}

/// Parse `id,en,notes,category` rows. Ids must be unique.
pub fn from_reader<R: Read>(rdr: R) -> Result<Catalog> {
    let mut rdr = csv::Reader::from_reader(rdr);
    let mut seen = HashSet::new();
    let mut items = Vec::new();
    for rec in rdr.deserialize::<CatalogItem>() {
        let mut item = rec?;
        item.id = item.id.trim().to_string();
        if item.id.is_empty() {
            anyhow::bail!("catalog row {} has an empty id", items.len() + 1);
        }
        if !seen.insert(item.id.clone()) {
            anyhow::bail!("duplicate catalog id: {}", item.id);
        }
        items.push(item);
    }
    Ok(Catalog::new(items))
}
