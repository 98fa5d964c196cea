//! Router key identifying one upstream data source

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::ConfigurationError;
use crate::impl_domain_enum_conversions;

/// Upstream data sources the bridge knows how to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DataSourceId {
    /// jsonplaceholder.typicode.com
    Typicode,
    /// dummyjson.com
    Dummy,
    /// reqres.in
    Reqres,
}

impl_domain_enum_conversions!(DataSourceId, ConfigurationError => ConfigurationError::UnknownDataSource {
    Typicode => "TYPICODE",
    Dummy => "DUMMY",
    Reqres => "REQRES",
});

impl DataSourceId {
    /// Every known data source, in declaration order
    pub const ALL: [Self; 3] = [Self::Typicode, Self::Dummy, Self::Reqres];

    /// Canonical upper-case identifier
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Typicode => "TYPICODE",
            Self::Dummy => "DUMMY",
            Self::Reqres => "REQRES",
        }
    }
}

impl Serialize for DataSourceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DataSourceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_case_insensitively() {
        assert_eq!("TYPICODE".parse(), Ok(DataSourceId::Typicode));
        assert_eq!("typicode".parse(), Ok(DataSourceId::Typicode));
        assert_eq!("Dummy".parse(), Ok(DataSourceId::Dummy));
        assert_eq!("reqres".parse(), Ok(DataSourceId::Reqres));
    }

    #[test]
    fn test_unknown_id_is_configuration_error() {
        let result = "GRAPHQL".parse::<DataSourceId>();
        assert_eq!(result, Err(ConfigurationError::UnknownDataSource("GRAPHQL".into())));
    }

    #[test]
    fn test_display_matches_canonical_name() {
        for id in DataSourceId::ALL {
            assert_eq!(id.to_string(), id.as_str());
        }
    }

    #[test]
    fn test_serde_uses_canonical_name() {
        let json = serde_json::to_string(&DataSourceId::Reqres).expect("serializes");
        assert_eq!(json, "\"REQRES\"");

        let parsed: DataSourceId = serde_json::from_str("\"dummy\"").expect("deserializes");
        assert_eq!(parsed, DataSourceId::Dummy);
    }
}
