use crate::config::{self, Settings};
use crate::context::AppPaths;
use crate::events::AppEvent;
use pictograph::busy::BusyIndicator;
use pictograph::constants::Halves;
use pictograph::dictionary::{DictionaryEntry, DictionaryError, DictionaryIndex};
use pictograph::sequence::{SequenceError, SequenceHeader, SequenceModel, SequenceStore, StoreError};
use pictograph::signals::{Topic, UserNotice};
use pictograph::thumbnail::{self, MetadataError};
use pictograph::{PictographData, Sequence};
use serde_json::{Map, Value};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Sequence(#[from] SequenceError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),
}

/// Records the host publishes for whatever UI is attached.
#[derive(Default, Clone)]
pub struct Signals {
    pub config_updated: Topic<Map<String, Value>>,
    pub sequence_changed: Topic<Sequence>,
    pub favorite_changed: Topic<(PathBuf, bool)>,
    pub notices: Topic<UserNotice>,
}

/// Logs instead of drawing a wait cursor.
pub struct LogBusyIndicator;

impl BusyIndicator for LogBusyIndicator {
    fn acquire(&self) {
        log::debug!("busy");
    }

    fn release(&self) {
        log::debug!("idle");
    }
}

pub struct App {
    paths: AppPaths,
    settings: Settings,
    store: SequenceStore,
    model: SequenceModel,
    effect_config: Map<String, Value>,
    busy: Option<Box<dyn BusyIndicator>>,
    pub signals: Signals,
}

impl App {
    pub fn new(paths: AppPaths, settings: Settings) -> Self {
        let default_header = SequenceHeader {
            author: settings.author.clone(),
            prop_type: settings.prop_type,
            grid_mode: settings.grid_mode,
            ..SequenceHeader::default()
        };
        let store = SequenceStore::new(&paths.current_sequence).with_default_header(default_header);
        let model = SequenceModel::from_sequence(
            &store.load_current_sequence(),
            settings.pictograph_env(),
        );
        let effect_config = config::load_effect_config(&paths.effect_config);

        Self {
            paths,
            settings,
            store,
            model,
            effect_config,
            busy: None,
            signals: Signals::default(),
        }
    }

    pub fn set_busy_indicator(&mut self, indicator: Box<dyn BusyIndicator>) {
        self.busy = Some(indicator);
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn model(&self) -> &SequenceModel {
        &self.model
    }

    pub fn effect_config(&self) -> &Map<String, Value> {
        &self.effect_config
    }

    pub fn dictionary(&self) -> DictionaryIndex {
        DictionaryIndex::new(&self.paths.dictionary, Default::default())
            .with_notices(self.signals.notices.clone())
    }

    pub fn all_sequences(&self) -> Vec<DictionaryEntry> {
        match self.dictionary().all_sequences() {
            Ok(entries) => entries,
            Err(e) => {
                self.report(AppError::from(e));
                Vec::new()
            }
        }
    }

    /// Applies one event. Failures are logged and surfaced as a notice; the
    /// model is left as it was. Returns whether the sequence changed.
    pub fn handle(&mut self, event: AppEvent) -> bool {
        match self.try_handle(event) {
            Ok(changed) => changed,
            Err(e) => {
                self.report(e);
                false
            }
        }
    }

    fn try_handle(&mut self, event: AppEvent) -> Result<bool, AppError> {
        let edited = match event {
            AppEvent::AddBeat(data) => {
                let id = self.model.add_beat(&data, Halves::ONE)?;
                self.model.select(id);
                true
            }
            AppEvent::SelectBeat(number) => {
                if !self.model.select_number(number) {
                    log::warn!("No beat numbered {}", number);
                }
                false
            }
            AppEvent::DeleteSelectedBeat => {
                self.model.delete_selected_beat()?;
                true
            }
            AppEvent::UpdatePictograph(data) => {
                self.update_pictograph(&data)?;
                true
            }
            AppEvent::SwapColors => {
                self.model.color_swap_all(self.busy.as_deref());
                true
            }
            AppEvent::Revert => self.model.revert(),
            AppEvent::ToggleFavorite(path) => {
                let favorite = thumbnail::toggle_favorite(&path)?;
                self.signals.favorite_changed.publish(&(path, favorite));
                false
            }
            AppEvent::LoadCurrentSequence => {
                let sequence = self.store.load_current_sequence();
                self.model.load_sequence(&sequence);
                self.signals.sequence_changed.publish(&sequence);
                false
            }
            AppEvent::SaveCurrentSequence => {
                self.save()?;
                false
            }
            AppEvent::ConfigReload => {
                self.reload_config();
                false
            }
            AppEvent::Quit => false,
        };

        if edited {
            self.save()?;
        }
        Ok(edited)
    }

    /// Edits the selected beat, or the start position when nothing else
    /// exists yet.
    fn update_pictograph(&mut self, data: &PictographData) -> Result<(), AppError> {
        if self.model.selected().is_none() && self.model.start_position().is_none() {
            self.model.set_start_position(data);
            return Ok(());
        }
        self.model.update_selected(data)?;
        Ok(())
    }

    fn save(&self) -> Result<(), AppError> {
        let sequence = self.model.to_sequence();
        self.store.save_current_sequence(&sequence)?;
        self.signals.sequence_changed.publish(&sequence);
        Ok(())
    }

    fn reload_config(&mut self) {
        self.settings = config::load_or_default_from(&self.paths.settings_file);
        let mut env = self.model.env().clone();
        self.settings.apply_to(&mut env);
        let sequence = self.model.to_sequence();
        self.model = SequenceModel::from_sequence(&sequence, env);

        self.effect_config = config::load_effect_config(&self.paths.effect_config);
        self.signals.config_updated.publish(&self.effect_config);
    }

    fn report(&self, error: AppError) {
        log::error!("{}", error);
        self.signals
            .notices
            .publish(&UserNotice::warning("Operation failed", error.to_string()));
    }
}
