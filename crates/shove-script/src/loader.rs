//! RON tuning loader

use crate::error::{Error, Result};
use crate::profile::{ProfileId, TuningProfile};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Loaded tuning profiles
#[derive(Debug, Default)]
pub struct TuningDefs {
    /// Profiles by ID
    pub profiles: HashMap<ProfileId, TuningProfile>,
}

impl TuningDefs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a profile
    pub fn get(&self, id: &ProfileId) -> Option<&TuningProfile> {
        self.profiles.get(id)
    }

    /// Get a profile, falling back to default tuning under the same ID
    pub fn get_or_default(&self, id: &ProfileId) -> TuningProfile {
        self.get(id).cloned().unwrap_or_else(|| {
            log::debug!("no tuning profile {}, using defaults", id);
            TuningProfile::new(id.clone())
        })
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Loader for RON tuning files
pub struct Loader {
    defs: TuningDefs,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            defs: TuningDefs::new(),
        }
    }

    /// Load a single RON file
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        log::debug!("loading tuning from {}", path.display());
        self.load_str(&content)
    }

    /// Load profiles from a RON string
    ///
    /// Accepts either `(profiles: [...])` or a single profile.
    pub fn load_str(&mut self, content: &str) -> Result<()> {
        #[derive(serde::Deserialize)]
        struct ProfileFile {
            profiles: Vec<TuningProfile>,
        }

        let profiles = match ron::from_str::<ProfileFile>(content) {
            Ok(file) => file.profiles,
            Err(list_err) => match ron::from_str::<TuningProfile>(content) {
                Ok(profile) => vec![profile],
                // report the error of the form the content looks like
                Err(single_err) if !content.contains("profiles") => return Err(single_err.into()),
                Err(_) => return Err(list_err.into()),
            },
        };

        for profile in profiles {
            self.add_profile(profile)?;
        }
        Ok(())
    }

    /// Add a profile after validating it
    pub fn add_profile(&mut self, profile: TuningProfile) -> Result<()> {
        profile.validate()?;
        if self.defs.profiles.contains_key(&profile.id) {
            return Err(Error::DuplicateProfile(profile.id.to_string()));
        }
        self.defs.profiles.insert(profile.id.clone(), profile);
        Ok(())
    }

    /// Load all RON files from a directory and its subdirectories
    pub fn load_directory(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if !path.is_dir() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Not a directory: {:?}", path),
            )));
        }

        let mut entries = fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        entries.sort();

        for file_path in entries {
            if file_path.extension().map(|e| e == "ron").unwrap_or(false) {
                self.load_file(&file_path)?;
            } else if file_path.is_dir() {
                self.load_directory(&file_path)?;
            }
        }

        Ok(())
    }

    /// Finish loading and return the profiles
    pub fn finish(self) -> TuningDefs {
        self.defs
    }

    /// Get the current profiles (for inspection during loading)
    pub fn defs(&self) -> &TuningDefs {
        &self.defs
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
