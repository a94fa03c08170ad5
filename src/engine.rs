use crate::categories::CategoryManager;
use crate::content::ContentCache;
use crate::detect::DetectorRegistry;
use crate::discovery::discover_files;
use crate::logger::ActionLogger;
use crate::models::{Action, ActionStatus, DetectionResult, FileInfo, RenameResult, RunResult};
use crate::operations::{
    ensure_dest_structure, is_duplicate, move_to_duplicates, safe_move, safe_rename,
    DUPLICATES_DIR,
};
use crate::rename::RenamerRegistry;
use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

/// Detections below this confidence count as uncertain.
pub const CONFIDENCE_THRESHOLD: f32 = 0.7;

/// Options controlling one run, recorded verbatim in the run log.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EngineOptions {
    pub dry_run: bool,
    /// Move files without renaming them
    pub move_only: bool,
    /// Rename files in place without moving them
    pub rename_only: bool,
    /// Skip files whose detection is below the confidence threshold
    pub skip_uncertain: bool,
    pub verbose: bool,
    pub limit: Option<usize>,
}

/// Orchestrates a run: discover, detect, rename, resolve the
/// destination, duplicate-check, move, log.
///
/// Owns the detector and renamer registries, the shared PDF text cache
/// and the category manager; everything is constructed explicitly so
/// tests can build a fresh engine per scenario.
pub struct Engine {
    source: PathBuf,
    destination: PathBuf,
    options: EngineOptions,
    categories: CategoryManager,
    detectors: DetectorRegistry,
    renamers: RenamerRegistry,
    content: ContentCache,
}

impl Engine {
    pub fn new(
        source: PathBuf,
        destination: Option<PathBuf>,
        options: EngineOptions,
        categories: CategoryManager,
    ) -> Self {
        let destination = destination.unwrap_or_else(crate::config::default_destination);
        Self {
            source,
            destination,
            options,
            categories,
            detectors: DetectorRegistry::with_default_detectors(),
            renamers: RenamerRegistry::with_default_renamers(),
            content: ContentCache::new(),
        }
    }

    pub fn destination(&self) -> &PathBuf {
        &self.destination
    }

    pub fn categories(&self) -> &CategoryManager {
        &self.categories
    }

    /// Process every discovered file and write the run log.
    pub fn run(&self) -> Result<RunResult> {
        self.run_with(|_| {})
    }

    /// Like `run`, invoking the callback after each file for progress
    /// reporting.
    pub fn run_with<F: FnMut(&Action)>(&self, mut on_action: F) -> Result<RunResult> {
        if !self.options.rename_only && !self.options.dry_run {
            ensure_dest_structure(&self.destination, &self.categories)?;
        }

        let log_destination = if self.options.rename_only {
            self.source.clone()
        } else {
            self.destination.clone()
        };
        let mut logger = ActionLogger::new(
            self.source.clone(),
            log_destination,
            serde_json::to_value(&self.options)?,
        );

        let files = discover_files(&self.source, &[], true, 0, self.options.limit)?;
        for file in &files {
            let action = self.process_file(file, &mut logger);
            on_action(&action);
        }

        if !self.options.dry_run {
            logger.save()?;
        }

        Ok(logger.run_result())
    }

    /// Run one file through the pipeline; the returned action is
    /// already logged.
    pub fn process_file(&self, file: &FileInfo, logger: &mut ActionLogger) -> Action {
        let detection = self.detectors.detect(file, &self.content);

        if self.options.skip_uncertain && !detection.is_confident(CONFIDENCE_THRESHOLD) {
            let action = Action {
                file: file.clone(),
                detection,
                source_path: file.path.clone(),
                dest_path: file.path.clone(),
                status: ActionStatus::Skipped,
                rename: None,
                error: None,
            };
            logger.log_action(action.clone());
            return action;
        }

        let rename = if self.options.move_only {
            None
        } else {
            self.renamers.rename(file, &detection, &self.content)
        };

        if self.options.rename_only {
            return self.execute_rename(file, detection, rename, logger);
        }

        let final_name = rename
            .as_ref()
            .map(|r| r.new_name.clone())
            .unwrap_or_else(|| file.name.clone());

        // Subcategory rules may refine the detected category before
        // routing resolves the folder
        let effective_category = self
            .evaluate_subcategories(file, &detection)
            .unwrap_or_else(|| detection.category.clone());
        let folder = self
            .categories
            .get_folder_for_detection(&effective_category, &detection.detector_name);

        let dest_folder = self.destination.join(&folder);
        let dest_path = dest_folder.join(&final_name);

        if dest_folder.exists() {
            if let Some(_existing) = is_duplicate(&file.path, &dest_folder) {
                return self.execute_duplicate(file, detection, rename, logger);
            }
        }

        let (status, final_path, error) = if self.options.dry_run {
            (ActionStatus::Success, dest_path.clone(), None)
        } else {
            match safe_move(&file.path, &dest_path) {
                Ok(path) => (ActionStatus::Success, path, None),
                Err(err) => (ActionStatus::Error, dest_path.clone(), Some(err.to_string())),
            }
        };

        let action = Action {
            file: file.clone(),
            detection,
            source_path: file.path.clone(),
            dest_path: final_path,
            status,
            rename,
            error,
        };
        logger.log_action(action.clone());
        action
    }

    fn evaluate_subcategories(&self, file: &FileInfo, detection: &DetectionResult) -> Option<String> {
        // Rules can match against extracted text for PDFs; other
        // formats match on the filename alone
        let content = if file.extension == "pdf" {
            self.content.pdf_text(&file.path)
        } else {
            None
        };
        self.categories.evaluate_rules(
            &file.name,
            &file.extension,
            &detection.category,
            content.as_deref(),
        )
    }

    fn execute_rename(
        &self,
        file: &FileInfo,
        detection: DetectionResult,
        rename: Option<RenameResult>,
        logger: &mut ActionLogger,
    ) -> Action {
        let parent = file
            .path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_default();
        let final_name = rename
            .as_ref()
            .map(|r| r.new_name.clone())
            .unwrap_or_else(|| file.name.clone());
        let dest_path = parent.join(&final_name);

        let (status, final_path, error) = if self.options.dry_run || rename.is_none() {
            (ActionStatus::Success, dest_path.clone(), None)
        } else {
            match safe_rename(&file.path, &final_name) {
                Ok(path) => (ActionStatus::Success, path, None),
                Err(err) => (ActionStatus::Error, dest_path.clone(), Some(err.to_string())),
            }
        };

        let action = Action {
            file: file.clone(),
            detection,
            source_path: file.path.clone(),
            dest_path: final_path,
            status,
            rename,
            error,
        };
        logger.log_action(action.clone());
        action
    }

    fn execute_duplicate(
        &self,
        file: &FileInfo,
        detection: DetectionResult,
        rename: Option<RenameResult>,
        logger: &mut ActionLogger,
    ) -> Action {
        logger.log_duplicate();

        let would_be = self
            .destination
            .join(self.categories.unsorted_folder())
            .join(DUPLICATES_DIR)
            .join(&file.name);

        let (status, final_path, error) = if self.options.dry_run {
            (ActionStatus::Success, would_be, None)
        } else {
            match move_to_duplicates(&file.path, &self.destination, &self.categories) {
                Ok(path) => (ActionStatus::Success, path, None),
                Err(err) => (ActionStatus::Error, would_be, Some(err.to_string())),
            }
        };

        let action = Action {
            file: file.clone(),
            detection,
            source_path: file.path.clone(),
            dest_path: final_path,
            status,
            rename,
            error,
        };
        logger.log_action(action.clone());
        action
    }
}
