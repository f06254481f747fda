//! Application state shared across handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use style_mingle_core::{Catalog, CatalogError};

use crate::config::AssistantConfig;
use crate::services::DiscoverService;

/// Error building application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to read catalog {path}: {source}")]
    ReadCatalog {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the catalog, configuration, and discover sessions.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AssistantConfig,
    catalog: Arc<Catalog>,
    discover: DiscoverService,
}

impl AppState {
    /// Create application state, loading the configured catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read or fails validation.
    pub fn new(config: AssistantConfig) -> Result<Self, StateError> {
        let catalog = match &config.catalog_path {
            Some(path) => load_catalog(path)?,
            None => Catalog::seed()?,
        };
        tracing::info!(
            customers = catalog.list_customers().len(),
            products = catalog.list_products().len(),
            associates = catalog.list_associates().len(),
            "Catalog loaded"
        );
        Ok(Self::with_catalog(config, catalog))
    }

    /// Create application state around an already loaded catalog.
    #[must_use]
    pub fn with_catalog(config: AssistantConfig, catalog: Catalog) -> Self {
        let catalog = Arc::new(catalog);
        let discover = DiscoverService::new(
            Arc::clone(&catalog),
            config.gesture,
            config.settle_delay,
            config.session_idle,
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                discover,
            }),
        }
    }

    /// Get a reference to the assistant configuration.
    #[must_use]
    pub fn config(&self) -> &AssistantConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the discover session registry.
    #[must_use]
    pub fn discover(&self) -> &DiscoverService {
        &self.inner.discover
    }
}

/// Read a catalog document, choosing the format by file extension.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails validation.
pub fn load_catalog(path: &Path) -> Result<Catalog, StateError> {
    let text = std::fs::read_to_string(path).map_err(|source| StateError::ReadCatalog {
        path: path.to_path_buf(),
        source,
    })?;
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let catalog = if is_yaml {
        Catalog::from_yaml_str(&text)?
    } else {
        Catalog::from_json_str(&text)?
    };
    Ok(catalog)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_uses_seed_catalog() {
        let state = AppState::new(AssistantConfig::default()).unwrap();
        assert_eq!(state.catalog().list_products().len(), 10);
        assert_eq!(state.catalog().list_customers().len(), 2);
    }

    #[test]
    fn test_missing_catalog_file() {
        let config = AssistantConfig {
            catalog_path: Some(PathBuf::from("/nonexistent/catalog.json")),
            ..AssistantConfig::default()
        };
        let err = AppState::new(config).err().unwrap();
        assert!(matches!(err, StateError::ReadCatalog { .. }));
    }

    #[test]
    fn test_load_yaml_catalog() {
        let path = std::env::temp_dir().join(format!("style-mingle-{}.yaml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            "products:\n  - id: p-1\n    name: Tee\n    category: Tops\n    price: \"19.99\"\n    sizes: [M]\n    inStock: true\n    rating: 4.0\n",
        )
        .unwrap();

        let catalog = load_catalog(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(catalog.list_products().len(), 1);
        assert!(catalog.list_customers().is_empty());
    }
}
