use crate::busy::{BusyGuard, BusyIndicator};
use crate::constants::{Color, ColorMap, Halves, Turns};
use crate::pictograph::glyph::is_reversal;
use crate::pictograph::{Pictograph, PictographData, PictographEnv, PictographScope, UpdateReport};
use crate::sequence::beat::{Beat, BeatId, BeatRecord};
use crate::sequence::header::SequenceHeader;
use crate::sequence::Sequence;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SequenceError {
    #[error("Beat duration must be positive, got {0}")]
    InvalidDuration(Halves),
    #[error("No beat is selected")]
    NoSelection,
    #[error("Placeholder beats cannot be edited")]
    PlaceholderSelected,
}

/// In-memory sequence: an arena of beats, their order, the start position
/// and the current selection. Placeholders point at their owner by id.
pub struct SequenceModel {
    env: PictographEnv,
    header: SequenceHeader,
    beats: BTreeMap<BeatId, Beat>,
    order: Vec<BeatId>,
    start_position: Option<BeatId>,
    selected: Option<BeatId>,
    next_id: u32,
    snapshot: Option<Sequence>,
}

impl SequenceModel {
    pub fn new(env: PictographEnv) -> Self {
        let header = SequenceHeader {
            prop_type: env.prop_type,
            ..SequenceHeader::default()
        };
        Self {
            env,
            header,
            beats: BTreeMap::new(),
            order: Vec::new(),
            start_position: None,
            selected: None,
            next_id: 0,
            snapshot: None,
        }
    }

    pub fn env(&self) -> &PictographEnv {
        &self.env
    }

    pub fn header(&self) -> &SequenceHeader {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut SequenceHeader {
        &mut self.header
    }

    pub fn beat(&self, id: BeatId) -> Option<&Beat> {
        self.beats.get(&id)
    }

    pub fn start_position(&self) -> Option<&Beat> {
        self.start_position.and_then(|id| self.beats.get(&id))
    }

    /// Beats after the start position, placeholders included, in order.
    pub fn beats(&self) -> impl Iterator<Item = &Beat> {
        self.order.iter().filter_map(|id| self.beats.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty() && self.start_position.is_none()
    }

    pub fn selected(&self) -> Option<&Beat> {
        self.selected.and_then(|id| self.beats.get(&id))
    }

    pub fn select(&mut self, id: BeatId) -> bool {
        if self.beats.contains_key(&id) {
            self.set_selection(Some(id));
            true
        } else {
            false
        }
    }

    pub fn select_number(&mut self, beat_number: u32) -> bool {
        let found = self
            .start_position
            .into_iter()
            .chain(self.order.iter().copied())
            .find(|id| self.beats[id].beat_number == beat_number);
        match found {
            Some(id) => self.select(id),
            None => false,
        }
    }

    pub fn clear_selection(&mut self) {
        self.set_selection(None);
    }

    fn set_selection(&mut self, id: Option<BeatId>) {
        if let Some(previous) = self.selected.and_then(|id| self.beats.get_mut(&id)) {
            previous.pictograph.highlighted = false;
            previous.pictograph.refresh_glyphs(&self.env.visibility);
        }
        self.selected = id;
        if let Some(current) = id.and_then(|id| self.beats.get_mut(&id)) {
            current.pictograph.highlighted = true;
            current.pictograph.refresh_glyphs(&self.env.visibility);
        }
    }

    fn allocate_id(&mut self) -> BeatId {
        let id = BeatId::from(self.next_id);
        self.next_id += 1;
        id
    }

    fn checkpoint(&mut self) {
        self.snapshot = Some(self.to_sequence());
    }

    /// Last beat number in use, 0 when only the start position exists.
    pub fn previous_end(&self) -> u32 {
        self.beats().map(Beat::end_number).max().unwrap_or(0)
    }

    pub fn set_start_position(&mut self, data: &PictographData) -> BeatId {
        let pictograph = Pictograph::from_data(data, PictographScope::StartPosition, &self.env);
        self.checkpoint();
        if let Some(old) = self.start_position.take() {
            self.beats.remove(&old);
        }
        let id = self.allocate_id();
        self.beats.insert(
            id,
            Beat {
                id,
                beat_number: 0,
                duration: Halves::ONE,
                is_placeholder: false,
                parent: None,
                pictograph,
            },
        );
        self.start_position = Some(id);
        self.refresh_reversals();
        self.refresh_header();
        id
    }

    /// Appends a beat numbered after the current last one. Durations longer
    /// than one beat reserve the following numbers with placeholders.
    pub fn add_beat(
        &mut self,
        data: &PictographData,
        duration: Halves,
    ) -> Result<BeatId, SequenceError> {
        if duration.0 == 0 {
            return Err(SequenceError::InvalidDuration(duration));
        }
        let pictograph = Pictograph::from_data(data, PictographScope::Sequence, &self.env);
        self.checkpoint();
        let beat_number = self.previous_end() + 1;
        let id = self.insert_beat(beat_number, duration, pictograph);
        self.refresh_reversals();
        self.refresh_header();
        Ok(id)
    }

    fn insert_beat(&mut self, beat_number: u32, duration: Halves, pictograph: Pictograph) -> BeatId {
        let id = self.allocate_id();
        let beat = Beat {
            id,
            beat_number,
            duration,
            is_placeholder: false,
            parent: None,
            pictograph,
        };
        let span = beat.end_number() - beat_number;
        self.beats.insert(id, beat);
        self.order.push(id);

        for offset in 1..=span {
            self.insert_placeholder(id, beat_number + offset);
        }
        id
    }

    fn insert_placeholder(&mut self, parent: BeatId, beat_number: u32) -> BeatId {
        let id = self.allocate_id();
        let mut pictograph = Pictograph::new(PictographScope::Sequence, self.env.prop_type);
        pictograph.data.is_blank = Some(true);
        self.beats.insert(
            id,
            Beat {
                id,
                beat_number,
                duration: Halves::ONE,
                is_placeholder: true,
                parent: Some(parent),
                pictograph,
            },
        );
        self.order.push(id);
        id
    }

    /// Removes the selected beat and its placeholders. Other beats keep their
    /// numbers. Deleting the start position clears the whole sequence.
    pub fn delete_selected_beat(&mut self) -> Result<u32, SequenceError> {
        let selected = self.selected.ok_or(SequenceError::NoSelection)?;
        let target = match self.beats.get(&selected) {
            Some(beat) => beat.parent.unwrap_or(selected),
            None => return Err(SequenceError::NoSelection),
        };
        self.checkpoint();

        let beat_number = self.beats[&target].beat_number;
        if Some(target) == self.start_position {
            self.beats.clear();
            self.order.clear();
            self.start_position = None;
            self.selected = None;
        } else {
            let position = self.order.iter().position(|id| *id == target);
            self.order
                .retain(|id| *id != target && self.beats[id].parent != Some(target));
            self.beats
                .retain(|id, beat| *id != target && beat.parent != Some(target));

            let fallback = position
                .and_then(|p| p.checked_sub(1))
                .and_then(|p| self.order.get(p).copied())
                .and_then(|id| self.beats[&id].parent.or(Some(id)))
                .or(self.start_position);
            self.selected = None;
            self.set_selection(fallback);
        }

        self.refresh_reversals();
        self.refresh_header();
        Ok(beat_number)
    }

    /// Sends `data` through the updater of the selected beat.
    pub fn update_selected(&mut self, data: &PictographData) -> Result<UpdateReport, SequenceError> {
        let selected = self.selected.ok_or(SequenceError::NoSelection)?;
        let snapshot = self.to_sequence();
        let beat = self.beats.get_mut(&selected).ok_or(SequenceError::NoSelection)?;
        if beat.is_placeholder {
            return Err(SequenceError::PlaceholderSelected);
        }
        let report = self.env.updater().update_pictograph(&mut beat.pictograph, data);
        self.snapshot = Some(snapshot);
        self.refresh_reversals();
        self.refresh_header();
        Ok(report)
    }

    /// Swaps blue and red on every beat and rebuilds it. Returns the number
    /// of beats swapped.
    pub fn color_swap_all(&mut self, indicator: Option<&dyn BusyIndicator>) -> usize {
        let _busy = BusyGuard::acquire(indicator);
        self.checkpoint();

        let ids: Vec<BeatId> = self
            .start_position
            .into_iter()
            .chain(self.order.iter().copied())
            .collect();
        let mut swapped = 0;
        for id in ids {
            let Some(beat) = self.beats.get_mut(&id) else {
                continue;
            };
            if beat.is_placeholder {
                continue;
            }
            let mut data = beat.pictograph.data.clone();
            data.swap_colors();
            let mut rebuilt = Pictograph::from_data(&data, beat.pictograph.scope, &self.env);
            rebuilt.highlighted = beat.pictograph.highlighted;
            rebuilt.refresh_glyphs(&self.env.visibility);
            beat.pictograph = rebuilt;
            swapped += 1;
        }

        self.refresh_reversals();
        self.refresh_header();
        swapped
    }

    /// Restores the sequence as it was before the last edit. Only one level
    /// is kept.
    pub fn revert(&mut self) -> bool {
        let Some(snapshot) = self.snapshot.take() else {
            return false;
        };
        let selected = self.selected().map(|b| b.beat_number);
        self.load_sequence(&snapshot);
        if let Some(number) = selected {
            self.select_number(number);
        }
        true
    }

    pub fn can_revert(&self) -> bool {
        self.snapshot.is_some()
    }

    fn refresh_reversals(&mut self) {
        let ids: Vec<BeatId> = self
            .start_position
            .into_iter()
            .chain(self.order.iter().copied())
            .collect();
        let mut previous: Option<BeatId> = None;
        for id in ids {
            if self.beats[&id].is_placeholder {
                continue;
            }
            let reversals = match previous {
                Some(prev) => {
                    let prev = &self.beats[&prev].pictograph.motions;
                    let curr = &self.beats[&id].pictograph.motions;
                    ColorMap::from_fn(|c| is_reversal(prev[c].prop_rot_dir, curr[c].prop_rot_dir))
                }
                None => ColorMap::default(),
            };
            if let Some(beat) = self.beats.get_mut(&id)
                && beat.pictograph.reversals != reversals
            {
                beat.pictograph.reversals = reversals;
                beat.pictograph.refresh_glyphs(&self.env.visibility);
            }
            previous = Some(id);
        }
    }

    /// Recomputes word, level and circularity from the beats.
    pub fn refresh_header(&mut self) {
        let (order, beats, header) = (&self.order, &self.beats, &mut self.header);
        let real: Vec<&Beat> = order
            .iter()
            .filter_map(|id| beats.get(id))
            .filter(|b| !b.is_placeholder)
            .collect();

        header.word = real
            .iter()
            .filter_map(|b| b.pictograph.letter)
            .map(|l| l.to_string())
            .collect();

        header.level = if real.is_empty() {
            0
        } else {
            let turns: Vec<Turns> = real
                .iter()
                .flat_map(|b| b.pictograph.motions.iter().filter_map(|(_, m)| m.turns))
                .collect();
            if turns.iter().all(|t| t.is_zero()) {
                1
            } else if turns
                .iter()
                .all(|t| matches!(t, Turns::Count(h) if h.is_whole()))
            {
                2
            } else {
                3
            }
        };

        let start = self.start_position.and_then(|id| beats.get(&id));
        header.is_circular = match (start, real.last()) {
            (Some(start), Some(last)) => [Color::Blue, Color::Red].into_iter().all(|c| {
                let begin = start.pictograph.motions[c].end_loc;
                begin.is_some() && begin == last.pictograph.motions[c].end_loc
            }),
            _ => false,
        };
    }

    pub fn to_sequence(&self) -> Sequence {
        let records = self
            .start_position
            .into_iter()
            .chain(self.order.iter().copied())
            .filter_map(|id| self.beats.get(&id))
            .map(|beat| {
                let parent_number = beat
                    .parent
                    .and_then(|p| self.beats.get(&p))
                    .map(|p| p.beat_number);
                beat.to_record(parent_number)
            })
            .collect();
        Sequence {
            header: self.header.clone(),
            beats: records,
        }
    }

    pub fn from_sequence(sequence: &Sequence, env: PictographEnv) -> Self {
        let mut model = Self::new(env);
        model.load_sequence(sequence);
        model
    }

    /// Replaces the contents with `sequence`. Recorded beat numbers are kept.
    pub fn load_sequence(&mut self, sequence: &Sequence) {
        self.beats.clear();
        self.order.clear();
        self.start_position = None;
        self.selected = None;
        self.header = sequence.header.clone();

        let mut by_number: BTreeMap<u32, BeatId> = BTreeMap::new();
        for record in &sequence.beats {
            if record.is_placeholder {
                self.restore_placeholder(record, &by_number);
                continue;
            }
            let scope = if record.beat == 0 {
                PictographScope::StartPosition
            } else {
                PictographScope::Sequence
            };
            let pictograph = Pictograph::from_data(&record.pictograph, scope, &self.env);
            let duration = if record.duration.0 == 0 {
                log::warn!("Beat {} has zero duration, using one beat", record.beat);
                Halves::ONE
            } else {
                record.duration
            };
            let id = self.allocate_id();
            self.beats.insert(
                id,
                Beat {
                    id,
                    beat_number: record.beat,
                    duration,
                    is_placeholder: false,
                    parent: None,
                    pictograph,
                },
            );
            if record.beat == 0 && self.start_position.is_none() {
                self.start_position = Some(id);
            } else {
                self.order.push(id);
            }
            by_number.insert(record.beat, id);
        }

        self.refresh_reversals();
    }

    fn restore_placeholder(&mut self, record: &BeatRecord, by_number: &BTreeMap<u32, BeatId>) {
        let parent = record.parent_beat.and_then(|n| by_number.get(&n).copied());
        match parent {
            Some(parent) => {
                let id = self.insert_placeholder(parent, record.beat);
                if let Some(beat) = self.beats.get_mut(&id) {
                    beat.pictograph.data = record.pictograph.clone();
                }
            }
            None => log::warn!(
                "Dropping placeholder beat {} without a parent beat",
                record.beat
            ),
        }
    }
}
