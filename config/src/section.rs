use crate::ConfigError;
use config::{
    Map,
    Value,
};

/// One table of the raw configuration, addressed by its dotted path.
///
/// Every typed section is built from a `Section` by an explicit constructor that first checks the
/// section's list of required fields, so a missing key is reported with its full path
/// (`settings.site`, `targets[1].hostname`) before any value is converted.
#[derive(Debug)]
pub(crate) struct Section {
    path: String,
    table: Map<String, Value>,
}

impl Section {
    pub(crate) fn root(table: Map<String, Value>, required: &[&str]) -> Result<Self, ConfigError> {
        Self::new(String::new(), table, required)
    }

    fn new(path: String, table: Map<String, Value>, required: &[&str]) -> Result<Self, ConfigError> {
        let section = Self { path, table };
        if let Some(missing) = required.iter().find(|name| !section.table.contains_key(**name)) {
            return Err(ConfigError::MissingKey {
                key: section.key(missing),
            });
        }
        Ok(section)
    }

    pub(crate) fn key(&self, name: &str) -> String {
        if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.path, name)
        }
    }

    fn take(&mut self, name: &str) -> Result<Value, ConfigError> {
        self.table
            .remove(name)
            .ok_or_else(|| ConfigError::MissingKey { key: self.key(name) })
    }

    pub(crate) fn string(&mut self, name: &str) -> Result<String, ConfigError> {
        let key = self.key(name);
        self.take(name)?.into_string().map_err(|err| ConfigError::InvalidValue {
            key,
            reason: err.to_string(),
        })
    }

    pub(crate) fn section(&mut self, name: &str, required: &[&str]) -> Result<Section, ConfigError> {
        let key = self.key(name);
        let table = self.take(name)?.into_table().map_err(|err| ConfigError::InvalidValue {
            key: key.clone(),
            reason: err.to_string(),
        })?;
        Section::new(key, table, required)
    }

    pub(crate) fn sections(&mut self, name: &str, required: &[&str]) -> Result<Vec<Section>, ConfigError> {
        let key = self.key(name);
        let items = self.take(name)?.into_array().map_err(|err| ConfigError::InvalidValue {
            key: key.clone(),
            reason: err.to_string(),
        })?;

        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let item_key = format!("{key}[{index}]");
                let table = item.into_table().map_err(|err| ConfigError::InvalidValue {
                    key: item_key.clone(),
                    reason: err.to_string(),
                })?;
                Section::new(item_key, table, required)
            })
            .collect()
    }
}
