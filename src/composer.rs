//! The controller that owns the current composition.

use rand::Rng;

use crate::catalog::{CUSTOM_ICON, CatalogLoad, IconCatalog};
use crate::composition::{CompositionConfig, Edit, EditRejected, Field, UploadedImage, apply_edit};
use crate::render::{VisualTree, render};
use crate::theme::random_theme;

/// What happened to an edit.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    Applied,
    /// The composition is unchanged.
    Ignored(EditRejected),
}

impl EditOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, EditOutcome::Applied)
    }
}

/// Values [`Composer::reset`] returns to.
#[derive(Debug, Clone, PartialEq)]
struct Defaults {
    config: CompositionConfig,
    catalog: IconCatalog,
}

/// Holds one composition and the icon catalog it draws from.
///
/// All edits are synchronous. The only asynchronous input is the catalog,
/// which arrives through [`deliver_catalog`](Self::deliver_catalog) and
/// never touches the composition itself.
///
/// # Example
///
/// ```
/// use cover_renderer::{Composer, IconCatalog};
///
/// let mut composer = Composer::new(IconCatalog::builtins());
/// assert!(composer.set_field("title", "Hello, covers").is_applied());
/// assert!(composer.select_platform("hugo-fixit").is_applied());
/// assert_eq!(composer.config().icon().value, "hugo-fixit");
///
/// composer.reset();
/// assert_eq!(composer.config().platform().as_str(), "hashnode");
/// ```
#[derive(Debug, Clone)]
pub struct Composer {
    config: CompositionConfig,
    catalog: IconCatalog,
    defaults: Defaults,
}

impl Composer {
    /// Starts from the built-in defaults with an optimistic catalog.
    pub fn new(catalog: IconCatalog) -> Self {
        Self::with_defaults(CompositionConfig::default(), catalog)
    }

    /// Starts from `config`, which also becomes the reset target.
    pub fn with_defaults(config: CompositionConfig, catalog: IconCatalog) -> Self {
        Self {
            defaults: Defaults {
                config: config.clone(),
                catalog: catalog.clone(),
            },
            config,
            catalog,
        }
    }

    pub fn config(&self) -> &CompositionConfig {
        &self.config
    }

    pub fn catalog(&self) -> &IconCatalog {
        &self.catalog
    }

    /// Applies a typed edit.
    pub fn apply(&mut self, edit: Edit) -> EditOutcome {
        match apply_edit(self.config.clone(), edit) {
            Ok(next) => {
                self.config = next;
                EditOutcome::Applied
            }
            Err(reason) => {
                tracing::debug!(%reason, "edit ignored");
                EditOutcome::Ignored(reason)
            }
        }
    }

    /// Applies an edit given as a camelCase field name and a textual value.
    pub fn set_field(&mut self, name: &str, value: &str) -> EditOutcome {
        let edit = name
            .parse::<Field>()
            .and_then(|field| Edit::parse(field, value, &self.catalog));
        match edit {
            Ok(edit) => self.apply(edit),
            Err(reason) => {
                tracing::debug!(%reason, "edit ignored");
                EditOutcome::Ignored(reason)
            }
        }
    }

    pub fn select_platform(&mut self, value: &str) -> EditOutcome {
        self.set_field(Field::Platform.as_str(), value)
    }

    /// Uses an uploaded image as the icon, selecting the catalog's upload entry.
    pub fn upload_custom_icon(&mut self, image: UploadedImage) -> EditOutcome {
        if let Some(entry) = self.catalog.find(CUSTOM_ICON) {
            if let EditOutcome::Ignored(reason) = self.apply(Edit::Icon(entry.clone())) {
                return EditOutcome::Ignored(reason);
            }
        }
        self.apply(Edit::CustomIcon(image))
    }

    /// Merges a random background, border and pattern.
    ///
    /// In the flat theme the values are stored for when a template is picked,
    /// and the pattern may come out as none.
    pub fn randomize_theme<R: Rng + ?Sized>(&mut self, rng: &mut R) -> EditOutcome {
        let exclude_flat = !self.config.theme().is_flat();
        self.apply(Edit::Backdrop(random_theme(rng, exclude_flat)))
    }

    /// Restores the defaults snapshot, including the latest delivered catalog.
    pub fn reset(&mut self) {
        self.config = self.defaults.config.clone();
        self.catalog = self.defaults.catalog.clone();
    }

    /// Installs a settled catalog load.
    ///
    /// Only the catalog changes; edits made while the load was in flight
    /// are kept. The catalog also becomes part of the reset target.
    pub fn deliver_catalog(&mut self, load: CatalogLoad) {
        tracing::info!(entries = load.catalog.len(), origin = ?load.origin, "catalog delivered");
        // Cache and built-in loads replace the snapshot too, not only remote ones.
        self.defaults.catalog = load.catalog.clone();
        self.catalog = load.catalog;
    }

    /// The visual tree of the current composition.
    pub fn render(&self) -> VisualTree {
        render(&self.config)
    }
}

impl Default for Composer {
    fn default() -> Self {
        Self::new(IconCatalog::builtins())
    }
}
