//! Static registry of the datasets served by the store sales API.

use std::fmt;
use std::str::FromStr;
use tsprep_common::TsPrepError;

/// A dataset the API serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    /// Product catalogue.
    Items,
    /// Store locations.
    Stores,
    /// Daily sales facts referencing items and stores.
    Sales,
}

/// Where a dataset lives remotely and in the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetDescriptor {
    /// Logical name, as accepted by [`Dataset::from_str`].
    pub name: &'static str,
    /// Cache file name inside the cache directory.
    pub file: &'static str,
    /// First page endpoint, appended to the API base URL.
    pub endpoint: &'static str,
    /// Key of the row array inside each page's payload.
    pub payload_key: &'static str,
}

static DATASETS: [DatasetDescriptor; 3] = [
    DatasetDescriptor {
        name: "items",
        file: "items.csv",
        endpoint: "/api/v1/items",
        payload_key: "items",
    },
    DatasetDescriptor {
        name: "stores",
        file: "stores.csv",
        endpoint: "/api/v1/stores",
        payload_key: "stores",
    },
    DatasetDescriptor {
        name: "sales",
        file: "sales.csv",
        endpoint: "/api/v1/sales",
        payload_key: "sales",
    },
];

impl Dataset {
    /// Every registered dataset.
    pub const ALL: [Self; 3] = [Self::Items, Self::Stores, Self::Sales];

    /// The dataset's registry entry.
    pub fn descriptor(self) -> &'static DatasetDescriptor {
        match self {
            Self::Items => &DATASETS[0],
            Self::Stores => &DATASETS[1],
            Self::Sales => &DATASETS[2],
        }
    }

    /// Logical name.
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }
}

impl FromStr for Dataset {
    type Err = TsPrepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| TsPrepError::unknown_dataset(s))
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_resolve_to_descriptors() {
        for dataset in Dataset::ALL {
            let parsed: Dataset = dataset.name().parse().unwrap();
            assert_eq!(parsed, dataset);
            assert_eq!(dataset.descriptor().file, format!("{dataset}.csv"));
            assert_eq!(
                dataset.descriptor().endpoint,
                format!("/api/v1/{}", dataset.descriptor().payload_key)
            );
        }
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        let err = "orders".parse::<Dataset>().unwrap_err();
        assert!(matches!(err, TsPrepError::UnknownDataset { ref name } if name == "orders"));
        assert!("Items".parse::<Dataset>().is_err());
    }
}
