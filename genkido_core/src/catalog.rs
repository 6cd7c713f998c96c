//! Exercise catalog: user-defined exercises with soft delete.
//!
//! Definitions are never hard-deleted; deactivation keeps historical logs
//! attributable. All day evaluation filters on the active flag explicitly.
//! Historical summaries always use the *current* active set, even for past
//! dates — a known simplification carried over deliberately.

use crate::{CompletionKind, Error, ExerciseDefinition, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use uuid::Uuid;

/// The complete set of exercise definitions, active and inactive
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ExerciseCatalog {
    exercises: Vec<ExerciseDefinition>,
}

/// Seed exercises for a fresh install
pub fn default_exercises() -> Vec<ExerciseDefinition> {
    vec![
        ExerciseDefinition::new("Pushups", CompletionKind::Counted, 50, 0),
        ExerciseDefinition::new("SL Deadlifts", CompletionKind::Counted, 50, 1),
        ExerciseDefinition::new("Towel Rows", CompletionKind::Counted, 50, 2),
        ExerciseDefinition::new("Squats", CompletionKind::Counted, 50, 3),
        ExerciseDefinition::new("Planks", CompletionKind::Timed, 60, 4),
    ]
}

impl ExerciseCatalog {
    /// Catalog seeded with the default exercises
    pub fn with_defaults() -> Self {
        Self {
            exercises: default_exercises(),
        }
    }

    /// Active definitions sorted by sort order
    pub fn active(&self) -> Vec<&ExerciseDefinition> {
        let mut active: Vec<_> = self.exercises.iter().filter(|e| e.active).collect();
        active.sort_by_key(|e| e.sort_order);
        active
    }

    /// All definitions (including inactive) sorted by sort order
    pub fn all(&self) -> Vec<&ExerciseDefinition> {
        let mut all: Vec<_> = self.exercises.iter().collect();
        all.sort_by_key(|e| e.sort_order);
        all
    }

    pub fn find(&self, id: Uuid) -> Option<&ExerciseDefinition> {
        self.exercises.iter().find(|e| e.id == id)
    }

    /// Case-insensitive name lookup, for CLI convenience
    pub fn find_by_name(&self, name: &str) -> Option<&ExerciseDefinition> {
        self.exercises
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Create a new exercise at the end of the ordering
    pub fn add(&mut self, name: impl Into<String>, kind: CompletionKind, goal: i64) -> Uuid {
        let next_order = self
            .exercises
            .iter()
            .map(|e| e.sort_order)
            .max()
            .map(|o| o + 1)
            .unwrap_or(0);

        let definition = ExerciseDefinition::new(name, kind, goal, next_order);
        let id = definition.id;
        tracing::info!("Added exercise '{}' ({:?})", definition.name, kind);
        self.exercises.push(definition);
        id
    }

    /// Soft-delete: hide from evaluation, keep historical logs attributable
    pub fn deactivate(&mut self, id: Uuid) -> Result<()> {
        let exercise = self
            .exercises
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| Error::Catalog(format!("No exercise with id {}", id)))?;
        exercise.active = false;
        tracing::info!("Deactivated exercise '{}'", exercise.name);
        Ok(())
    }

    /// Restore a previously deactivated exercise
    pub fn activate(&mut self, id: Uuid) -> Result<()> {
        let exercise = self
            .exercises
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| Error::Catalog(format!("No exercise with id {}", id)))?;
        exercise.active = true;
        tracing::info!("Reactivated exercise '{}'", exercise.name);
        Ok(())
    }

    /// Rewrite sort orders to match the given id sequence
    ///
    /// Ids not present in the sequence keep their relative order after the
    /// listed ones.
    pub fn resequence(&mut self, ordered_ids: &[Uuid]) {
        for (index, id) in ordered_ids.iter().enumerate() {
            if let Some(exercise) = self.exercises.iter_mut().find(|e| e.id == *id) {
                exercise.sort_order = index as i64;
            }
        }
        let mut next = ordered_ids.len() as i64;
        let mut rest: Vec<_> = self
            .exercises
            .iter_mut()
            .filter(|e| !ordered_ids.contains(&e.id))
            .collect();
        rest.sort_by_key(|e| e.sort_order);
        for exercise in rest {
            exercise.sort_order = next;
            next += 1;
        }
    }

    /// Validate the catalog for consistency
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let mut seen = std::collections::HashSet::new();
        for exercise in &self.exercises {
            if exercise.name.trim().is_empty() {
                errors.push(format!("Exercise {} has an empty name", exercise.id));
            }
            if !seen.insert(exercise.id) {
                errors.push(format!("Duplicate exercise id {}", exercise.id));
            }
            match exercise.kind {
                CompletionKind::Counted | CompletionKind::Timed => {
                    if exercise.goal <= 0 {
                        errors.push(format!(
                            "Exercise '{}' has non-positive goal {}",
                            exercise.name, exercise.goal
                        ));
                    }
                }
                CompletionKind::Binary => {}
            }
        }

        errors
    }

    /// Load the catalog from a JSON file, seeding defaults when absent
    ///
    /// A corrupt file logs a warning and reseeds rather than failing.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No catalog file at {:?}, seeding defaults", path);
            return Ok(Self::with_defaults());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open catalog {:?}: {}. Seeding defaults.", path, e);
                return Ok(Self::with_defaults());
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock catalog {:?}: {}. Seeding defaults.", path, e);
            return Ok(Self::with_defaults());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!("Failed to read catalog {:?}: {}. Seeding defaults.", path, e);
            return Ok(Self::with_defaults());
        }
        file.unlock()?;

        match serde_json::from_str::<ExerciseCatalog>(&contents) {
            Ok(catalog) => {
                tracing::debug!("Loaded {} exercises from {:?}", catalog.exercises.len(), path);
                Ok(catalog)
            }
            Err(e) => {
                tracing::warn!("Failed to parse catalog {:?}: {}. Seeding defaults.", path, e);
                Ok(Self::with_defaults())
            }
        }
    }

    /// Save the catalog atomically (temp file, fsync, rename)
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "catalog path missing parent")
        })?)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved catalog to {:?}", path);
        Ok(())
    }
}
