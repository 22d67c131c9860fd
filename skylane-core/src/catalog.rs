use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Airport {
    pub id: i32,
    pub name: String,
    pub country: String,
    pub city: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassType {
    pub id: i32,
    #[serde(rename = "type")]
    pub kind: CabinClass,
}

/// Fare class. Stored in Postgres as the `cabin_class` enum; values are
/// unique across the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CabinClass {
    Economy,
    Premium,
    Business,
    First,
}

impl CabinClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            CabinClass::Economy => "economy",
            CabinClass::Premium => "premium",
            CabinClass::Business => "business",
            CabinClass::First => "first",
        }
    }
}

impl fmt::Display for CabinClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CabinClass {
    type Err = crate::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "economy" => Ok(CabinClass::Economy),
            "premium" => Ok(CabinClass::Premium),
            "business" => Ok(CabinClass::Business),
            "first" => Ok(CabinClass::First),
            other => Err(crate::CoreError::ValidationError(format!(
                "unknown cabin class: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AirportPut {
    pub name: String,
    pub country: String,
    pub city: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AirportPatch {
    pub name: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
}

impl AirportPatch {
    pub fn apply(&self, airport: &mut Airport) {
        if let Some(name) = &self.name {
            airport.name = name.clone();
        }
        if let Some(country) = &self.country {
            airport.country = country.clone();
        }
        if let Some(city) = &self.city {
            airport.city = city.clone();
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassTypePut {
    #[serde(rename = "type")]
    pub kind: CabinClass,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassTypePatch {
    #[serde(rename = "type")]
    pub kind: Option<CabinClass>,
}

impl ClassTypePatch {
    pub fn apply(&self, class_type: &mut ClassType) {
        if let Some(kind) = self.kind {
            class_type.kind = kind;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cabin_class_round_trips_through_str() {
        for kind in [
            CabinClass::Economy,
            CabinClass::Premium,
            CabinClass::Business,
            CabinClass::First,
        ] {
            assert_eq!(kind.as_str().parse::<CabinClass>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_cabin_class_is_rejected() {
        assert!("coach".parse::<CabinClass>().is_err());
    }

    #[test]
    fn class_type_serializes_with_type_field() {
        let class_type = ClassType { id: 3, kind: CabinClass::Business };
        let json = serde_json::to_value(&class_type).unwrap();
        assert_eq!(json["type"], "business");
    }
}
