//! Dashboard store: canonical in-memory sections plus persistence.
//!
//! # Responsibility
//! - Own the ordered section list and every mutation on it.
//! - Persist the full snapshot after each successful mutation.
//!
//! # Invariants
//! - Every app id appears in exactly one section.
//! - Ids are allocated by one `IdAllocator` and never reused.
//! - Persistence failures are logged and reported, never propagated; the
//!   in-memory state stays authoritative.
//! - Stored data is only replaced after it was read successfully or found
//!   absent or corrupt.
//! - Validation and not-found errors leave memory and storage untouched.

use crate::enrich::oembed::{enrich, Enrichment, MetadataFetcher};
use crate::model::defaults::{default_sections, DEFAULT_SEED_SECTION_TITLE};
use crate::model::id::IdAllocator;
use crate::model::section::{
    normalize_section_title, App, AppDraft, AppId, Section, SectionId, ValidationError,
};
use crate::model::snapshot::{export_json, export_url_list, normalize_ids, parse_snapshot};
use crate::repo::kv_store::KeyValueStore;
use crate::repo::section_repo::{SectionRepository, StoredSections};
use crate::search::filter::filter_sections;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use url::Url;

/// Errors surfaced by store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    Validation(ValidationError),
    SectionNotFound(SectionId),
    AppNotFound(AppId),
    /// Operation needs at least one section.
    NoSections,
    Serialize(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::SectionNotFound(id) => write!(f, "section not found: {id}"),
            Self::AppNotFound(id) => write!(f, "app not found: {id}"),
            Self::NoSections => {
                write!(f, "no sections available; create a section first")
            }
            Self::Serialize(message) => write!(f, "failed to serialize sections: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Caller decision for destructive operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl Confirmation {
    pub fn from_flag(confirmed: bool) -> Self {
        if confirmed {
            Self::Confirmed
        } else {
            Self::Declined
        }
    }
}

/// Where an app currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLocation<'a> {
    pub app: &'a App,
    pub section: &'a Section,
}

/// Output of `export_snapshot`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotExport {
    /// Pretty JSON of every section, importable as-is.
    pub json: String,
    /// CRLF-separated URLs of apps outside the seed section.
    pub url_list: String,
}

/// How the store was initialized by `load`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Persisted,
    /// Nothing was stored; defaults were seeded.
    DefaultsSeeded,
    /// Stored data was corrupt; defaults replaced it.
    DefaultsRecovered,
    /// The backend could not be read; defaults are in memory only and the
    /// stored data was left as is.
    StorageUnavailable,
}

/// Owned, injectable section store.
pub struct DashboardStore<S: KeyValueStore> {
    repo: SectionRepository<S>,
    sections: Vec<Section>,
    ids: IdAllocator,
    load_source: LoadSource,
}

impl<S: KeyValueStore> DashboardStore<S> {
    /// Loads persisted sections, falling back to the defaults.
    ///
    /// Never fails. Absent or corrupt data resets to the default dataset and
    /// persists it. A failed backend read uses the defaults without writing.
    pub fn load(repo: SectionRepository<S>) -> Self {
        let (mut sections, load_source) = match repo.read() {
            StoredSections::Loaded(sections) => (sections, LoadSource::Persisted),
            StoredSections::Absent => (default_sections(), LoadSource::DefaultsSeeded),
            StoredSections::Corrupt(reason) => {
                warn!(
                    "event=store_load module=service status=fallback reason=corrupt error={reason}"
                );
                (default_sections(), LoadSource::DefaultsRecovered)
            }
            StoredSections::ReadFailed(reason) => {
                warn!(
                    "event=store_load module=service status=fallback reason=read_failed error={reason}"
                );
                (default_sections(), LoadSource::StorageUnavailable)
            }
        };

        let mut ids = IdAllocator::seeded_from(&sections);
        ids.observe(repo.read_id_high_water());
        let repaired_ids = normalize_ids(&mut sections, &mut ids);
        let store = Self {
            ids,
            repo,
            sections,
            load_source,
        };
        let needs_write = match store.load_source {
            LoadSource::DefaultsSeeded | LoadSource::DefaultsRecovered => true,
            LoadSource::Persisted => repaired_ids > 0,
            LoadSource::StorageUnavailable => false,
        };
        if needs_write {
            store.save();
        }
        info!(
            "event=store_load module=service status=ok source={:?} sections={} apps={}",
            store.load_source,
            store.sections.len(),
            store.app_count()
        );
        store
    }

    /// Serializes and writes the full list. Returns whether the write succeeded.
    ///
    /// A store loaded as `StorageUnavailable` never writes, so data that could
    /// not be read is not replaced.
    pub fn save(&self) -> bool {
        if self.load_source == LoadSource::StorageUnavailable {
            warn!("event=store_save module=service status=skipped reason=storage_unavailable");
            return false;
        }
        match self.repo.write(&self.sections, self.ids.high_water()) {
            Ok(()) => true,
            Err(err) => {
                error!(
                    "event=store_save module=service status=error error_code=storage_unavailable error={err}"
                );
                false
            }
        }
    }

    pub fn load_source(&self) -> LoadSource {
        self.load_source
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|section| section.id == id)
    }

    pub fn app_count(&self) -> usize {
        self.sections.iter().map(|section| section.apps.len()).sum()
    }

    pub fn repository(&self) -> &SectionRepository<S> {
        &self.repo
    }

    /// Appends a new empty section.
    ///
    /// # Errors
    /// - `Validation(EmptySectionTitle)` for blank titles.
    pub fn add_section(&mut self, title: &str) -> Result<Section, StoreError> {
        let title = normalize_section_title(title)?;
        let section = Section::new(self.ids.next_id(), title);
        self.sections.push(section.clone());
        self.save();
        Ok(section)
    }

    /// Renames a section; returns `false` when nothing changed.
    pub fn rename_section(&mut self, id: SectionId, title: &str) -> bool {
        let Ok(title) = normalize_section_title(title) else {
            return false;
        };
        let Some(section) = self.section_mut(id) else {
            return false;
        };
        if section.title == title {
            return false;
        }
        section.title = title;
        self.save();
        true
    }

    /// Removes a section and all its apps when confirmed.
    pub fn delete_section(
        &mut self,
        id: SectionId,
        confirmation: Confirmation,
    ) -> Option<Section> {
        let index = self.sections.iter().position(|section| section.id == id)?;
        if confirmation != Confirmation::Confirmed {
            return None;
        }
        let removed = self.sections.remove(index);
        self.save();
        Some(removed)
    }

    /// Appends a new app to `section_id`.
    ///
    /// # Errors
    /// - `Validation` when name or url is blank.
    /// - `SectionNotFound` for unknown sections.
    pub fn add_app(&mut self, section_id: SectionId, draft: AppDraft) -> Result<App, StoreError> {
        let draft = draft.normalized()?;
        if self.section(section_id).is_none() {
            return Err(StoreError::SectionNotFound(section_id));
        }
        let app = App::from_draft(self.ids.next_id(), draft);
        self.section_mut(section_id)
            .ok_or(StoreError::SectionNotFound(section_id))?
            .apps
            .push(app.clone());
        self.save();
        Ok(app)
    }

    /// Replaces an app's editable fields in place.
    ///
    /// Returns `Ok(false)` when the app does not exist.
    ///
    /// # Errors
    /// - `Validation` when name or url is blank.
    pub fn edit_app(&mut self, app_id: AppId, draft: AppDraft) -> Result<bool, StoreError> {
        let draft = draft.normalized()?;
        let Some(app) = self.app_mut(app_id) else {
            return Ok(false);
        };
        app.apply_draft(draft);
        self.save();
        Ok(true)
    }

    /// Removes an app from its section when confirmed.
    pub fn delete_app(&mut self, app_id: AppId, confirmation: Confirmation) -> Option<App> {
        let (section_index, app_index) = self.locate(app_id)?;
        if confirmation != Confirmation::Confirmed {
            return None;
        }
        let removed = self.sections[section_index].apps.remove(app_index);
        self.save();
        Some(removed)
    }

    /// Moves an app to the end of `target_section_id`.
    ///
    /// # Errors
    /// - `AppNotFound` / `SectionNotFound`; nothing changes in either case.
    pub fn move_app(
        &mut self,
        app_id: AppId,
        target_section_id: SectionId,
    ) -> Result<(), StoreError> {
        let (section_index, app_index) =
            self.locate(app_id).ok_or(StoreError::AppNotFound(app_id))?;
        let target_index = self
            .sections
            .iter()
            .position(|section| section.id == target_section_id)
            .ok_or(StoreError::SectionNotFound(target_section_id))?;

        let app = self.sections[section_index].apps.remove(app_index);
        self.sections[target_index].apps.push(app);
        self.save();
        Ok(())
    }

    /// Finds an app and its owning section by linear scan.
    pub fn find_app(&self, app_id: AppId) -> Option<AppLocation<'_>> {
        self.sections.iter().find_map(|section| {
            section
                .apps
                .iter()
                .find(|app| app.id == app_id)
                .map(|app| AppLocation { app, section })
        })
    }

    /// Search projection; does not mutate the store.
    pub fn filter(&self, term: &str) -> Vec<Section> {
        filter_sections(&self.sections, term)
    }

    /// Replaces the whole store with a validated snapshot and persists it.
    ///
    /// # Errors
    /// - `Validation` for malformed snapshots; the store is untouched.
    pub fn import_snapshot(&mut self, raw: &str) -> Result<&[Section], StoreError> {
        let mut sections = parse_snapshot(raw).inspect_err(|err| {
            warn!("event=snapshot_import module=service status=rejected error={err}");
        })?;

        let reassigned = normalize_ids(&mut sections, &mut self.ids);
        self.sections = sections;
        self.save();
        info!(
            "event=snapshot_import module=service status=ok sections={} apps={} reassigned_ids={}",
            self.sections.len(),
            self.app_count(),
            reassigned
        );
        Ok(&self.sections)
    }

    /// Produces the JSON backup and the plain-text URL list.
    ///
    /// # Errors
    /// - `Serialize` if JSON encoding fails.
    pub fn export_snapshot(&self) -> Result<SnapshotExport, StoreError> {
        let json =
            export_json(&self.sections).map_err(|err| StoreError::Serialize(err.to_string()))?;
        Ok(SnapshotExport {
            json,
            url_list: export_url_list(&self.sections, DEFAULT_SEED_SECTION_TITLE),
        })
    }

    /// Adds a bare link to the last section, enriching video links first.
    ///
    /// # Errors
    /// - `Validation(EmptyUrl | InvalidUrl)` for blank or non-absolute URLs.
    /// - `NoSections` when the store is empty.
    pub fn add_link_to_last_section(
        &mut self,
        url: &str,
        fetcher: &dyn MetadataFetcher,
    ) -> Result<App, StoreError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ValidationError::EmptyUrl.into());
        }
        if Url::parse(url).is_err() {
            return Err(ValidationError::InvalidUrl(url.to_string()).into());
        }
        let last_id = self.sections.last().ok_or(StoreError::NoSections)?.id;

        let mut draft = AppDraft::new(url, url);
        if let Enrichment::Applied(metadata) = enrich(url, fetcher) {
            metadata.overwrite_draft(&mut draft);
        }
        self.add_app(last_id, draft)
    }

    fn section_mut(&mut self, id: SectionId) -> Option<&mut Section> {
        self.sections.iter_mut().find(|section| section.id == id)
    }

    fn app_mut(&mut self, app_id: AppId) -> Option<&mut App> {
        self.sections
            .iter_mut()
            .flat_map(|section| section.apps.iter_mut())
            .find(|app| app.id == app_id)
    }

    fn locate(&self, app_id: AppId) -> Option<(usize, usize)> {
        self.sections
            .iter()
            .enumerate()
            .find_map(|(section_index, section)| {
                section
                    .position_of(app_id)
                    .map(|app_index| (section_index, app_index))
            })
    }
}
