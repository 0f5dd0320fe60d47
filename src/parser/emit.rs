use std::path::Path;

use super::DocContext;
use crate::model::Directive;

/// Component libraries whose docs share this layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Library {
    NgZorro,
    DelonAbc,
    DelonChart,
    DelonForm,
}

impl Library {
    /// Matched on the segments of the file's directory, in priority order.
    pub fn from_path(path: &Path) -> Option<Self> {
        let segments = dir_segments(path);
        let has = |name: &str| segments.iter().any(|s| s == name);
        if has("ng-zorro-antd") {
            Some(Library::NgZorro)
        } else if has("abc") {
            Some(Library::DelonAbc)
        } else if has("chart") {
            Some(Library::DelonChart)
        } else if has("form") {
            Some(Library::DelonForm)
        } else {
            None
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Library::NgZorro => "ng-zorro-antd",
            Library::DelonAbc => "@delon/abc",
            Library::DelonChart => "@delon/chart",
            Library::DelonForm => "@delon/form",
        }
    }

    /// `component` is the doc's directory name; `zone` the locale prefix.
    pub fn doc_url(self, component: &str, zone: &str) -> String {
        match self {
            Library::NgZorro => format!("https://ng.ant.design/components/{}/{}", component, zone),
            Library::DelonAbc => format!("https://ng-alain.com/components/{}/{}", component, zone),
            Library::DelonChart => format!("https://ng-alain.com/chart/{}/{}", component, zone),
            Library::DelonForm => format!("https://ng-alain.com/form/getting-started/{}", zone),
        }
    }
}

fn dir_segments(path: &Path) -> Vec<String> {
    path.parent()
        .map(|dir| {
            dir.components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default()
}

/// Directory naming the component: the file's directory, or its parent when
/// the file sits in a `doc` folder.
fn component_dir(path: &Path) -> String {
    let mut segments = dir_segments(path);
    let mut last = segments.pop().unwrap_or_default();
    if last == "doc" {
        last = segments.pop().unwrap_or_default();
    }
    last
}

/// Metadata shared by every directive of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocMetadata {
    pub title: String,
    pub source_library: String,
    pub doc_url: String,
    pub when_to_use: String,
    pub lead: String,
}

impl DocMetadata {
    pub fn collect(ctx: &DocContext) -> Self {
        let library = Library::from_path(ctx.path);
        let tokens = ctx.tokens();
        DocMetadata {
            title: ctx.document.front_matter.display_title(),
            source_library: library.map(Library::name).unwrap_or_default().to_string(),
            doc_url: library
                .map(|lib| lib.doc_url(&component_dir(ctx.path), ctx.locale.zone()))
                .unwrap_or_default(),
            when_to_use: tokens.section_paragraph(ctx.locale.when_to_use_heading()),
            lead: tokens.lead_paragraph(),
        }
    }

    pub fn apply(&self, mut directive: Directive) -> Directive {
        directive.title = self.title.clone();
        directive.source_library = self.source_library.clone();
        directive.doc_url = self.doc_url.clone();
        directive.when_to_use = self.when_to_use.clone();
        if directive.description.is_none() {
            directive.description = Some(self.lead.clone());
        }
        directive
    }
}
