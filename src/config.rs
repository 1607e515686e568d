use crate::chunking::ChunkSize;
use crate::collection::collection_name;
use crate::error::{Error, Result};

pub const ENV_MAX_CHARS: &str = "RAGED_MAX_CHARS";
pub const ENV_COLLECTION: &str = "RAGED_COLLECTION";
pub const ENV_CHROME_PROFILE: &str = "RAGED_CHROME_PROFILE";

pub const DEFAULT_CHROME_PROFILE: &str = "Default";

/// Runtime defaults, read once from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub chunk_size: ChunkSize,
    pub collection: String,
    pub chrome_profile: String,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let chunk_size = match lookup(ENV_MAX_CHARS) {
            Some(raw) => {
                let value: i64 = raw.trim().parse().map_err(|_| {
                    Error::InvalidArgument(format!("{} is not an integer: {:?}", ENV_MAX_CHARS, raw))
                })?;
                ChunkSize::new(value)?
            }
            None => ChunkSize::default(),
        };

        let collection = collection_name(lookup(ENV_COLLECTION).as_deref()).to_string();

        let chrome_profile = lookup(ENV_CHROME_PROFILE)
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_CHROME_PROFILE.to_string());

        Ok(Self {
            chunk_size,
            collection,
            chrome_profile,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let settings = Settings::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(settings.chunk_size.get(), 1800);
        assert_eq!(settings.collection, "docs");
        assert_eq!(settings.chrome_profile, "Default");
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup_from(&[
            (ENV_MAX_CHARS, " 512 "),
            (ENV_COLLECTION, "bookmarks"),
            (ENV_CHROME_PROFILE, "Profile 2"),
        ]))
        .unwrap();
        assert_eq!(settings.chunk_size.get(), 512);
        assert_eq!(settings.collection, "bookmarks");
        assert_eq!(settings.chrome_profile, "Profile 2");
    }

    #[test]
    fn test_empty_collection_falls_back() {
        let settings = Settings::from_lookup(lookup_from(&[(ENV_COLLECTION, "")])).unwrap();
        assert_eq!(settings.collection, "docs");
    }

    #[test]
    fn test_invalid_max_chars_rejected() {
        for bad in ["0", "-10", "abc"] {
            let result = Settings::from_lookup(lookup_from(&[(ENV_MAX_CHARS, bad)]));
            assert!(matches!(result, Err(Error::InvalidArgument(_))), "{}", bad);
        }
    }
}
