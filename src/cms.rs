//! Entry point for JSON/Standalone integrations.
//!
//! `Cms` composes the editor gate with page loading: a request opened from the
//! CMS editor gets an editor page without touching the filesystem, any other
//! request gets the published page data.

use std::sync::Arc;

use crate::config::CmsConfig;
use crate::editor::{scripting, EditorGate, QueryParams};
use crate::observability::{metrics, ErrorReporter};
use crate::page::{FsPageStore, Page, PageLoader};

#[derive(Clone)]
pub struct Cms {
    gate: EditorGate,
    loader: Arc<dyn PageLoader>,
    clientjs_path: String,
    access_key: String,
}

impl Cms {
    /// Build from configuration, reading pages from `content.path`.
    pub fn new(config: &CmsConfig, reporter: Arc<dyn ErrorReporter>) -> Self {
        let loader = FsPageStore::with_resolution(
            config.content.path.clone(),
            config.content.resolution.build(),
            reporter,
        );
        Self::with_loader(config, Arc::new(loader))
    }

    /// Build with a custom page loader.
    pub fn with_loader(config: &CmsConfig, loader: Arc<dyn PageLoader>) -> Self {
        Self {
            gate: EditorGate::new(&config.editor),
            loader,
            clientjs_path: config.editor.clientjs_path.clone(),
            access_key: config.editor.access_key.clone(),
        }
    }

    pub fn gate(&self) -> &EditorGate {
        &self.gate
    }

    /// True if the page was opened from the CMS editor.
    pub fn is_in_editor(&self, params: &QueryParams) -> bool {
        self.gate.is_in_editor(params)
    }

    /// Script tag that launches the editor, or `''`.
    pub fn editor_script(&self, params: &QueryParams) -> String {
        self.gate.editor_script(params)
    }

    /// Whether a CMS URL is on the configured allow-list.
    pub fn url_allowed(&self, cms_server_url: &str) -> bool {
        self.gate.url_allowed(cms_server_url)
    }

    /// Page data for `url`, or an editor page when opened from the CMS editor.
    pub fn get_page(&self, url: &str, params: &QueryParams) -> Page {
        if self.is_in_editor(params) {
            metrics::record_page_load("editor");
            tracing::debug!(url = %url, "Serving CMS editor page");
            return Page::editor(self.editor_script(params));
        }
        self.load_display_page(url)
    }

    /// Page data without regard for editor state; prefer [`Cms::get_page`].
    pub fn load_display_page(&self, url: &str) -> Page {
        metrics::record_page_load("display");
        self.loader.load(url)
    }

    /// Script tags for remote template integrations, using the configured
    /// launcher path and access key.
    pub fn remote_template_integration(&self) -> String {
        scripting::remote_template_integration(&self.clientjs_path, &self.access_key)
    }
}

impl std::fmt::Debug for Cms {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cms")
            .field("gate", &self.gate)
            .field("clientjs_path", &self.clientjs_path)
            .finish_non_exhaustive()
    }
}
