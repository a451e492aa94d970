//! Grinder and brew method catalogue

use serde::{Deserialize, Serialize};

/// Calibrated grinder models, listed alphabetically by key
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(from = "String", into = "String")]
pub enum Grinder {
    OneZpresso,
    Baratza,
    ComandanteMk3,
    ComandanteMk4,
    FellowGen1,
    #[default]
    FellowGen2,
    TimemoreC2,
    TimemoreS3,
}

impl Grinder {
    pub const ALL: [Grinder; 8] = [
        Grinder::OneZpresso,
        Grinder::Baratza,
        Grinder::ComandanteMk3,
        Grinder::ComandanteMk4,
        Grinder::FellowGen1,
        Grinder::FellowGen2,
        Grinder::TimemoreC2,
        Grinder::TimemoreS3,
    ];

    /// Storage key, as persisted by the app and the sync backend
    pub fn key(self) -> &'static str {
        match self {
            Grinder::OneZpresso => "1zpresso",
            Grinder::Baratza => "baratza",
            Grinder::ComandanteMk3 => "comandante_mk3",
            Grinder::ComandanteMk4 => "comandante_mk4",
            Grinder::FellowGen1 => "fellow_gen1",
            Grinder::FellowGen2 => "fellow_gen2",
            Grinder::TimemoreC2 => "timemore_c2",
            Grinder::TimemoreS3 => "timemore_s3",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Grinder::OneZpresso => "1Zpresso JX",
            Grinder::Baratza => "Baratza Encore",
            Grinder::ComandanteMk3 => "Comandante C40 MK3",
            Grinder::ComandanteMk4 => "Comandante C40 MK4",
            Grinder::FellowGen1 => "Fellow Ode Gen 1",
            Grinder::FellowGen2 => "Fellow Ode Gen 2",
            Grinder::TimemoreC2 => "Timemore Chestnut C2",
            Grinder::TimemoreS3 => "Timemore Chestnut S3",
        }
    }

    /// Abbreviated label used on the picker chip
    pub fn chip_label(self) -> &'static str {
        match self {
            Grinder::OneZpresso => "1Zpresso JX",
            Grinder::Baratza => "Baratza",
            Grinder::ComandanteMk3 => "Comandante MK3",
            Grinder::ComandanteMk4 => "Comandante MK4",
            Grinder::FellowGen1 => "Fellow Gen 1",
            Grinder::FellowGen2 => "Fellow Gen 2",
            Grinder::TimemoreC2 => "Timemore C2",
            Grinder::TimemoreS3 => "Timemore S3",
        }
    }

    /// Resolve a current or legacy key. Returns `None` for keys that were
    /// never part of the catalogue.
    pub fn resolve(key: &str) -> Option<Grinder> {
        let key = key.trim();
        if let Some(grinder) = Self::ALL.iter().copied().find(|g| g.key() == key) {
            return Some(grinder);
        }
        match key {
            "fellow" => Some(Grinder::FellowGen2),
            "comandante" => Some(Grinder::ComandanteMk3),
            "timemore" => Some(Grinder::TimemoreS3),
            _ => None,
        }
    }

    /// Map any stored key onto a current profile. Unrecognised keys fall back
    /// to the default grinder instead of failing.
    pub fn migrate(key: &str) -> Grinder {
        match Self::resolve(key) {
            Some(grinder) => {
                if grinder.key() != key {
                    tracing::debug!(from = key, to = grinder.key(), "migrated legacy grinder key");
                }
                grinder
            }
            None => {
                tracing::warn!(key, "unknown grinder key, using default profile");
                Grinder::default()
            }
        }
    }
}

impl From<String> for Grinder {
    fn from(key: String) -> Self {
        Grinder::migrate(&key)
    }
}

impl From<Grinder> for String {
    fn from(grinder: Grinder) -> Self {
        grinder.key().to_string()
    }
}

impl std::fmt::Display for Grinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Brew method
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(from = "String", into = "String")]
pub enum BrewMethod {
    #[default]
    V60,
    Chemex,
    AeroPress,
}

impl BrewMethod {
    pub fn key(self) -> &'static str {
        match self {
            BrewMethod::V60 => "v60",
            BrewMethod::Chemex => "chemex",
            BrewMethod::AeroPress => "aeropress",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BrewMethod::V60 => "V60",
            BrewMethod::Chemex => "Chemex",
            BrewMethod::AeroPress => "AeroPress",
        }
    }

    /// Heading shown above the step list
    pub fn steps_heading(self) -> &'static str {
        match self {
            BrewMethod::V60 => "V60 Pour-Over Steps",
            BrewMethod::Chemex => "Chemex Pour-Over Steps",
            BrewMethod::AeroPress => "AeroPress Brew Steps",
        }
    }

    /// Lenient parse; anything unrecognised brews as V60.
    pub fn from_key(key: &str) -> BrewMethod {
        match key.trim().to_lowercase().as_str() {
            "chemex" => BrewMethod::Chemex,
            "aeropress" => BrewMethod::AeroPress,
            _ => BrewMethod::V60,
        }
    }
}

impl From<String> for BrewMethod {
    fn from(key: String) -> Self {
        BrewMethod::from_key(&key)
    }
}

impl From<BrewMethod> for String {
    fn from(method: BrewMethod) -> Self {
        method.key().to_string()
    }
}

impl std::fmt::Display for BrewMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_keys_migrate() {
        assert_eq!(Grinder::migrate("fellow"), Grinder::FellowGen2);
        assert_eq!(Grinder::migrate("comandante"), Grinder::ComandanteMk3);
        assert_eq!(Grinder::migrate("timemore"), Grinder::TimemoreS3);
    }

    #[test]
    fn test_unknown_key_falls_back_to_default() {
        assert_eq!(Grinder::resolve("hario_skerton"), None);
        assert_eq!(Grinder::migrate("hario_skerton"), Grinder::FellowGen2);
    }

    #[test]
    fn test_every_key_resolves_to_itself() {
        for grinder in Grinder::ALL {
            assert_eq!(Grinder::resolve(grinder.key()), Some(grinder));
        }
    }

    #[test]
    fn test_grinder_serde_uses_keys() {
        let json = serde_json::to_string(&Grinder::OneZpresso).unwrap();
        assert_eq!(json, "\"1zpresso\"");
        let migrated: Grinder = serde_json::from_str("\"comandante\"").unwrap();
        assert_eq!(migrated, Grinder::ComandanteMk3);
    }

    #[test]
    fn test_chip_labels() {
        assert_eq!(Grinder::TimemoreS3.chip_label(), "Timemore S3");
        assert_eq!(Grinder::Baratza.chip_label(), "Baratza");
        assert_eq!(Grinder::FellowGen1.label(), "Fellow Ode Gen 1");
    }

    #[test]
    fn test_brew_method_serde_and_labels() {
        assert_eq!(serde_json::to_string(&BrewMethod::AeroPress).unwrap(), "\"aeropress\"");
        let chemex: BrewMethod = serde_json::from_str("\"chemex\"").unwrap();
        assert_eq!(chemex, BrewMethod::Chemex);
        assert_eq!(BrewMethod::from_key("French Press"), BrewMethod::V60);
        assert_eq!(BrewMethod::AeroPress.steps_heading(), "AeroPress Brew Steps");
    }

    #[test]
    fn test_unknown_method_key_brews_as_v60() {
        let method: BrewMethod = serde_json::from_str("\"french_press\"").unwrap();
        assert_eq!(method, BrewMethod::V60);
        let upper: BrewMethod = serde_json::from_str("\"AeroPress\"").unwrap();
        assert_eq!(upper, BrewMethod::AeroPress);
    }
}
