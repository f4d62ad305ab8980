//! The notes coordination module.
//!
//! Wraps the primitive [`NoteRepository`] with the cross-entity rules of the
//! notes collection:
//!
//! - trash lifecycle: the first `remove` moves a note to the trash and
//!   publishes `destroy:model`, a `remove` on a trashed note erases it,
//!   `restore` always brings it back and publishes `restore:model`
//! - notebook cascade: detaching (and optionally trashing) every note of a
//!   notebook in one batched save
//! - tag sync: asking the tags module to create a note's tags alongside the
//!   save, reporting its failure without undoing the save
//! - hydration: resolving the note's notebook and files concurrently
//!
//! There is no transaction spanning modules. The cascade is one primitive
//! batch write, so it either lands for the whole affected set or not at all.
//!
//! Spans and events use the field names listed in [`notekeep_core::logging`].

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use notekeep_core::{
    BusEvent, NoteCollection, NoteConditions, NotePatch, NoteQuery, NoteRepository, Notebook,
    Note, Result, Router, SortField, TrashState,
};

use crate::collaborators::Collaborators;
use crate::config::NotesConfig;
use crate::options::{
    ChangeNotebookOptions, FindModelOptions, FindOptions, FindOrFetchOptions, RemoveOutcome,
    SaveOptions, SaveOutcome,
};

/// Coordination layer for the notes collection.
///
/// Construct it with the repository and router it should use, wrap it in an
/// `Arc` and call [`NotesModule::start`] to answer bus requests. Call
/// [`NotesModule::stop`] before dropping it.
pub struct NotesModule {
    pub(crate) repo: Arc<dyn NoteRepository>,
    pub(crate) router: Arc<Router>,
    pub(crate) collaborators: Collaborators,
    pub(crate) config: NotesConfig,
}

impl NotesModule {
    pub fn new(repo: Arc<dyn NoteRepository>, router: Arc<Router>, config: NotesConfig) -> Self {
        let collaborators = Collaborators::new(router.clone(), config.clone());
        Self {
            repo,
            router,
            collaborators,
            config,
        }
    }

    pub fn config(&self) -> &NotesConfig {
        &self.config
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    /// Persist a note, optionally synchronizing its tags.
    ///
    /// The save and the `addTags` request run concurrently. A failed save
    /// fails the call; a failed tag sync only shows up in
    /// [`SaveOutcome::tag_sync_error`].
    #[instrument(
        skip_all,
        fields(subsystem = "notes", op = "save_model", profile_id = %note.profile_id, note_id = %note.id)
    )]
    pub async fn save_model(&self, mut note: Note, options: SaveOptions) -> Result<SaveOutcome> {
        options.data.apply(&mut note);
        note.touch();

        let profile_id = note.profile_id.clone();
        let tags = options.save_tags.then(|| note.tags.clone());
        let sync_tags = async {
            match &tags {
                Some(tags) => Some(self.collaborators.add_tags(&profile_id, tags).await),
                None => None,
            }
        };

        let (saved, synced) = tokio::join!(self.repo.save(note), sync_tags);
        let tag_sync_error = synced.and_then(|r| r.err());

        match saved {
            Ok(saved) => {
                if let Some(err) = &tag_sync_error {
                    warn!(note_id = %saved.id, error = %err, "Note saved but tag sync failed");
                }
                debug!(note_id = %saved.id, tags_synced = tags.is_some(), "Saved note");
                Ok(SaveOutcome {
                    saved,
                    tag_sync_error,
                })
            }
            Err(err) => {
                if let Some(tag_err) = tag_sync_error {
                    warn!(error = %tag_err, "Tag sync failed alongside failed note save");
                }
                Err(err)
            }
        }
    }

    /// Move a note to the trash, or erase it if it already is there.
    ///
    /// A note without id was never persisted and is left alone.
    #[instrument(
        skip_all,
        fields(subsystem = "notes", op = "remove", profile_id = %note.profile_id, note_id = %note.id)
    )]
    pub async fn remove(&self, note: Note) -> Result<RemoveOutcome> {
        if note.is_new() {
            debug!("Note was never saved, nothing to remove");
            return Ok(RemoveOutcome::Unsaved);
        }
        if note.trash.is_trashed() {
            self.repo.remove(&note).await?;
            debug!("Erased trashed note");
            return Ok(RemoveOutcome::Erased);
        }

        let patch = NotePatch::new().trash(TrashState::Trashed);
        let saved = self
            .save_model(note, SaveOptions::new().with_data(patch))
            .await?
            .saved;
        self.router.trigger(
            &self.config.channel,
            BusEvent::NoteDestroyed {
                model: saved.clone(),
            },
        );
        debug!("Moved note to trash");
        Ok(RemoveOutcome::Trashed(saved))
    }

    /// Bring a note back from the trash, whatever its current state.
    ///
    /// A note without id is returned unchanged, with no save and no event.
    #[instrument(
        skip_all,
        fields(subsystem = "notes", op = "restore", profile_id = %note.profile_id, note_id = %note.id)
    )]
    pub async fn restore(&self, note: Note) -> Result<Note> {
        if note.is_new() {
            debug!("Note was never saved, nothing to restore");
            return Ok(note);
        }
        let patch = NotePatch::new().trash(TrashState::Active);
        let saved = self
            .save_model(note, SaveOptions::new().with_data(patch))
            .await?
            .saved;
        self.router.trigger(
            &self.config.channel,
            BusEvent::NoteRestored {
                model: saved.clone(),
            },
        );
        debug!("Restored note");
        Ok(saved)
    }

    /// Detach every note of `notebook` from it, trashing them too when asked.
    ///
    /// Returns the updated notes. A notebook without id, or without notes, is
    /// a no-op.
    #[instrument(
        skip_all,
        fields(
            subsystem = "notes",
            op = "change_notebook_id",
            profile_id = %notebook.profile_id,
            notebook_id = %notebook.id,
            remove_notes = options.remove_notes
        )
    )]
    pub async fn change_notebook_id(
        &self,
        notebook: &Notebook,
        options: ChangeNotebookOptions,
    ) -> Result<NoteCollection> {
        if notebook.id.is_empty() {
            debug!("Notebook has no id, nothing to cascade");
            return Ok(NoteCollection::default());
        }

        let find = FindOptions::new(notebook.profile_id.clone())
            .with_conditions(NoteConditions::new().in_notebook(notebook.id.clone()));
        let mut notes = self.find(find).await?;
        if notes.is_empty() {
            debug!("Notebook has no notes");
            return Ok(notes);
        }

        let mut patch = NotePatch::new().detach_notebook();
        if options.remove_notes {
            patch = patch.trash(TrashState::Trashed);
        }
        notes.apply_patch(&patch);

        let notes: Vec<Note> = notes
            .into_iter()
            .map(|mut note| {
                note.touch();
                note
            })
            .collect();
        let saved = self.repo.save_all(&notebook.profile_id, notes).await?;
        debug!(result_count = saved.len(), "Cascaded notebook change");
        Ok(NoteCollection::new(saved))
    }

    /// Fetch notes ordered by the user's sort preference, then filter them.
    #[instrument(
        skip_all,
        fields(subsystem = "notes", op = "find", profile_id = %options.profile_id)
    )]
    pub async fn find(&self, options: FindOptions) -> Result<NoteCollection> {
        let sort_field = self.sort_field(&options.profile_id).await;
        let query = NoteQuery::new(options.profile_id)
            .with_conditions(options.conditions)
            .with_sort_field(sort_field);

        let mut collection = self.repo.find(query).await?;
        if let Some(filter) = &options.filter {
            collection.filter_list(filter);
            debug!(filter = filter.name(), result_count = collection.len(), "Filtered notes");
        }
        Ok(collection)
    }

    /// Resolve the sort preference, falling back to the configured default.
    async fn sort_field(&self, profile_id: &str) -> SortField {
        let fallback = self.config.default_sort;
        match self
            .collaborators
            .find_config(profile_id, &self.config.sort_config_key)
            .await
        {
            Ok(Some(value)) => value.parse().unwrap_or_else(|_| {
                warn!(value = %value, %fallback, "Unknown sort preference, using default");
                fallback
            }),
            Ok(None) => fallback,
            Err(err) => {
                warn!(error = %err, %fallback, "Sort preference unavailable, using default");
                fallback
            }
        }
    }

    /// Fetch one note, hydrating its attachments when asked.
    #[instrument(
        skip_all,
        fields(subsystem = "notes", op = "find_model", profile_id = %options.profile_id, note_id = %options.id)
    )]
    pub async fn find_model(&self, options: FindModelOptions) -> Result<Note> {
        let note = self
            .repo
            .find_model(&options.profile_id, &options.id)
            .await?;
        if options.find_attachments {
            self.find_attachments(note).await
        } else {
            Ok(note)
        }
    }

    /// Resolve the note's notebook and files concurrently.
    ///
    /// Both lookups must succeed; otherwise the error is returned and no
    /// partially hydrated note escapes.
    #[instrument(
        skip_all,
        fields(subsystem = "notes", op = "find_attachments", profile_id = %note.profile_id, note_id = %note.id)
    )]
    pub async fn find_attachments(&self, mut note: Note) -> Result<Note> {
        let (notebook, files) = futures::try_join!(
            self.collaborators
                .find_notebook(&note.profile_id, note.notebook_id.as_deref()),
            self.collaborators.find_files(&note.profile_id, &note.files),
        )?;

        note.notebook = Some(notebook.unwrap_or_else(|| Notebook::placeholder(&note.profile_id)));
        note.file_models = Some(files);
        debug!(
            file_count = note.file_models.as_ref().map_or(0, Vec::len),
            "Hydrated note attachments"
        );
        Ok(note)
    }

    /// Return the given note, or look it up when none was given.
    pub async fn find_or_fetch(&self, options: FindOrFetchOptions) -> Result<Note> {
        match options.model {
            Some(model) => Ok(model),
            None => self.find_model(options.lookup).await,
        }
    }
}
