//! The set of tables mirroring one catalog.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use folio_common::config::CatalogConfig;
use folio_common::error::{FolioError, FolioResult};
use tracing::info;

use crate::adapter::ValueAdapters;
use crate::source::RowSource;
use crate::stats::ReloadStats;
use crate::table::{BuildContext, Table};
use crate::tables::TableSnapshot;

/// One [`Table`] per configured field, sharing one set of adapters.
#[derive(Debug)]
pub struct TableRegistry {
    /// Catalog configuration.
    config: CatalogConfig,
    /// Value conversions shared by every build.
    adapters: ValueAdapters,
    /// Tables in configuration order.
    tables: Vec<Table>,
    /// Field name to position in `tables`.
    index: HashMap<String, usize>,
}

impl TableRegistry {
    /// Validates `config` and creates one unloaded table per field.
    pub fn new(config: CatalogConfig) -> FolioResult<Self> {
        config.validate()?;

        let tables: Vec<Table> = config.fields.iter().cloned().map(Table::new).collect();
        let index = tables
            .iter()
            .enumerate()
            .map(|(i, table)| (table.name().to_string(), i))
            .collect();

        Ok(Self {
            config,
            adapters: ValueAdapters::new(),
            tables,
            index,
        })
    }

    /// Creates a registry over the standard catalog fields.
    pub fn standard() -> FolioResult<Self> {
        Self::new(CatalogConfig::standard())
    }

    /// Returns the configuration.
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Returns the shared value conversions.
    pub fn adapters(&self) -> &ValueAdapters {
        &self.adapters
    }

    /// Returns the field names in configuration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(Table::name)
    }

    /// Returns every table in configuration order.
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Returns the named table, if configured.
    pub fn get(&self, name: &str) -> Option<&Table> {
        self.index.get(name).map(|&i| &self.tables[i])
    }

    /// Returns the named table.
    pub fn table(&self, name: &str) -> FolioResult<&Table> {
        self.get(name).ok_or_else(|| FolioError::TableNotFound {
            table: name.to_string(),
        })
    }

    /// Pins the current snapshot of the named table; `None` while unloaded.
    pub fn snapshot(&self, name: &str) -> FolioResult<Option<Arc<TableSnapshot>>> {
        Ok(self.table(name)?.snapshot())
    }

    /// Returns the build statistics of the named table.
    pub fn stats(&self, name: &str) -> FolioResult<&ReloadStats> {
        Ok(self.table(name)?.stats())
    }

    /// Rebuilds and publishes one table.
    pub fn reload(&self, name: &str, source: &dyn RowSource) -> FolioResult<Arc<TableSnapshot>> {
        let table = self.table(name)?;
        table.reload(&self.context(source))
    }

    /// Rebuilds every table, publishing only if every build succeeds.
    ///
    /// Build locks are taken in configuration order. Each table's swap is
    /// atomic on its own; readers may see some tables already at the new
    /// generation while others are still being swapped.
    pub fn reload_all(&self, source: &dyn RowSource) -> FolioResult<()> {
        let start = Instant::now();
        let ctx = self.context(source);

        let guards: Vec<_> = self.tables.iter().map(Table::begin_build).collect();
        let pending = guards
            .iter()
            .map(|guard| guard.build(&ctx))
            .collect::<FolioResult<Vec<_>>>()?;

        for (guard, pending) in guards.into_iter().zip(pending) {
            guard.publish(pending);
        }

        info!(
            tables = self.tables.len(),
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "reloaded catalog"
        );
        Ok(())
    }

    fn context<'a>(&'a self, source: &'a dyn RowSource) -> BuildContext<'a> {
        BuildContext::new(source, &self.adapters, &self.config.author_sort)
    }
}
