pub mod emit;
pub mod merge;
pub mod properties;
pub mod sections;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::document::Document;
use crate::document::tokens::TokenStream;
use crate::error::Result;
use crate::model::Directive;
use crate::settings::{Locale, Rules};
use emit::DocMetadata;

/// Everything extraction needs to know about the document being processed.
pub struct DocContext<'a> {
    pub path: &'a Path,
    pub locale: Locale,
    pub document: &'a Document,
    pub rules: &'a Rules,
}

impl DocContext<'_> {
    pub fn tokens(&self) -> &TokenStream {
        &self.document.tokens
    }
}

/// Four-stage pipeline: API headings → property tables → selector expansion
/// and duplication → shared metadata.
pub fn extract_document(ctx: &DocContext) -> Vec<Directive> {
    let blocks = sections::collect_blocks(ctx);
    let mut accepted = Vec::new();
    for block in &blocks {
        let expanded = merge::expand(ctx, block);
        debug!(
            "{}: heading at token {} -> {} directive(s)",
            ctx.path.display(),
            block.index,
            expanded.len()
        );
        accepted.extend(expanded);
    }

    let meta = DocMetadata::collect(ctx);
    merge::duplicate_dual_role(accepted, ctx.rules)
        .into_iter()
        .map(|d| meta.apply(d))
        .collect()
}

pub fn extract_file(locale: Locale, path: &Path, rules: &Rules) -> Result<Vec<Directive>> {
    let document = Document::load(path)?;
    let ctx = DocContext {
        path,
        locale,
        document: &document,
        rules,
    };
    let directives = extract_document(&ctx);
    info!("{}: {} directives", path.display(), directives.len());
    Ok(directives)
}

/// Extract every file in order. The first unreadable file aborts the batch.
pub fn make_directives(lang: &str, paths: &[PathBuf], rules: &Rules) -> Result<Vec<Directive>> {
    make_directives_with(lang, paths, rules, |_| {})
}

/// Like [`make_directives`], calling `on_file` after each file is done.
pub fn make_directives_with(
    lang: &str,
    paths: &[PathBuf],
    rules: &Rules,
    mut on_file: impl FnMut(&Path),
) -> Result<Vec<Directive>> {
    let locale = Locale::from_lang(lang)?;
    let mut out = Vec::new();
    for path in paths {
        out.extend(extract_file(locale, path, rules)?);
        on_file(path);
    }
    Ok(out)
}
