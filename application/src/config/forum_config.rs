//! Forum configuration container.
//!
//! [`ForumConfig`] groups the parameter slices for every use case. The
//! service holds the whole container; each use case receives only the slice
//! it needs.

use super::params::{CatalogParams, DebateParams, DispatchParams};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForumConfig {
    pub dispatch: DispatchParams,
    pub catalog: CatalogParams,
    pub debate: DebateParams,
}

impl ForumConfig {
    pub fn new(dispatch: DispatchParams, catalog: CatalogParams, debate: DebateParams) -> Self {
        Self {
            dispatch,
            catalog,
            debate,
        }
    }

    pub fn with_dispatch(mut self, dispatch: DispatchParams) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn with_catalog(mut self, catalog: CatalogParams) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_debate(mut self, debate: DebateParams) -> Self {
        self.debate = debate;
        self
    }
}
