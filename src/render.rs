use std::io::Write;
use std::path::Path;

use askama::Template;
use minijinja::value::ViaDeserialize;
use minijinja::{AutoEscape, Environment};
use serde::Serialize;
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::feed::{Feed, Item};
use crate::normalize;

/// Image policy when remote images are allowed.
pub const IMAGES_ALLOWED: &str = "*";
/// Image policy when remote images are blocked.
pub const IMAGES_BLOCKED: &str = "'none'";

const CUSTOM_TEMPLATE_NAME: &str = "custom.html";

/// Run-level display settings exposed to templates as a flat string map.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub name: String,
    pub image_csp: String,
    pub stylesheet: String,
    pub nonce: String,
}

impl Metadata {
    pub fn new(config: &Config, nonce: String) -> Self {
        let image_csp = if config.allow_images {
            IMAGES_ALLOWED
        } else {
            IMAGES_BLOCKED
        };

        Self {
            name: config.name.clone(),
            image_csp: image_csp.to_string(),
            stylesheet: config.stylesheet.clone(),
            nonce,
        }
    }
}

/// Everything a template can see.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Page {
    pub items: Vec<Item>,
    pub feeds: Vec<Feed>,
    pub metadata: Metadata,
}

pub type Helper = fn(&Item) -> String;

/// Item helpers callable from templates, under fixed names.
#[derive(Clone, Copy)]
pub struct Helpers {
    pub domain: Helper,
    pub preview: Helper,
    pub publication: Helper,
}

impl Default for Helpers {
    fn default() -> Self {
        Self {
            domain: normalize::domain,
            preview: normalize::preview,
            publication: normalize::publication,
        }
    }
}

impl Helpers {
    pub fn entries(&self) -> [(&'static str, Helper); 3] {
        [
            ("domain", self.domain),
            ("preview", self.preview),
            ("publication", self.publication),
        ]
    }
}

pub trait Renderer {
    fn render(&self, page: &Page, out: &mut dyn Write) -> Result<()>;
}

/// Pick the renderer the configuration asks for, loading an override
/// template from disk when one is set.
pub fn renderer_for(config: &Config, helpers: Helpers) -> Result<Box<dyn Renderer>> {
    if config.uses_builtin_template() {
        Ok(Box::new(BuiltinTemplate::new(helpers)))
    } else {
        Ok(Box::new(CustomTemplate::load(&config.template, helpers)?))
    }
}

#[derive(Template)]
#[template(path = "digest.html")]
struct DigestTemplate<'a> {
    page: &'a Page,
    helpers: Helpers,
}

impl DigestTemplate<'_> {
    fn domain(&self, item: &Item) -> String {
        (self.helpers.domain)(item)
    }

    fn preview(&self, item: &Item) -> String {
        (self.helpers.preview)(item)
    }

    fn publication(&self, item: &Item) -> String {
        (self.helpers.publication)(item)
    }
}

/// The page compiled into the binary.
pub struct BuiltinTemplate {
    helpers: Helpers,
}

impl BuiltinTemplate {
    pub fn new(helpers: Helpers) -> Self {
        Self { helpers }
    }
}

impl Renderer for BuiltinTemplate {
    fn render(&self, page: &Page, out: &mut dyn Write) -> Result<()> {
        let html = DigestTemplate {
            page,
            helpers: self.helpers,
        }
        .render()?;
        out.write_all(html.as_bytes())?;
        Ok(())
    }
}

/// A caller-supplied Jinja template, read once and rendered with HTML
/// auto-escaping.
pub struct CustomTemplate {
    source: String,
    helpers: Helpers,
}

impl CustomTemplate {
    pub fn load(path: &Path, helpers: Helpers) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| Error::TemplateLoad {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded template {}", path.display());

        Ok(Self { source, helpers })
    }
}

impl Renderer for CustomTemplate {
    fn render(&self, page: &Page, out: &mut dyn Write) -> Result<()> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        for (name, helper) in self.helpers.entries() {
            env.add_function(name, move |item: ViaDeserialize<Item>| helper(&item));
        }

        env.add_template(CUSTOM_TEMPLATE_NAME, &self.source)?;
        let template = env.get_template(CUSTOM_TEMPLATE_NAME)?;
        let html = template.render(page)?;
        out.write_all(html.as_bytes())?;
        Ok(())
    }
}
