use super::{resolve_value, SceneError};
use crate::{distribute, sibling_groups, SceneFile, Universe};

/// The writes of a scene that passed `check_scene`, ready to be applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenePlan {
    writes: Vec<PlannedValue>,
}

#[derive(Debug, Clone, PartialEq)]
struct PlannedValue {
    instrument: usize,
    group: Vec<usize>,
    value: u64,
}

/// Check a scene against the universe and compute every value it assigns.
///
/// Every instrument prefix has to match at least one instrument, and every
/// matched instrument needs a channel for each key. Each value string has to
/// fit the channels it is assigned to.
pub fn check_scene(universe: &Universe, scene: &SceneFile) -> Result<ScenePlan, SceneError> {
    let mut writes = Vec::new();
    for entry in &scene.entries {
        let matched = universe.instrument_indices_with_prefix(&entry.instrument_prefix);
        if matched.is_empty() {
            Err(SceneError::UnknownInstrument(entry.instrument_prefix.clone()))?
        }

        for (index, instrument) in matched
            .into_iter()
            .filter_map(|i| Some((i, universe.instruments().get(i)?)))
        {
            let selection = instrument.select(&entry.selector);
            if selection.is_empty() {
                Err(SceneError::MissingChannel {
                    instrument: instrument.name().clone(),
                    selector: entry.selector.clone(),
                })?
            }

            for group in sibling_groups(instrument.channels(), &selection) {
                let value = resolve_value(&entry.value, instrument.channels(), &group).map_err(
                    |source| SceneError::InvalidValue {
                        instrument: instrument.name().clone(),
                        selector: entry.selector.clone(),
                        value: entry.value.clone(),
                        source,
                    },
                )?;
                writes.push(PlannedValue {
                    instrument: index,
                    group,
                    value,
                });
            }
        }
    }
    Ok(ScenePlan { writes })
}

impl ScenePlan {
    /// Write the planned values into the universe they were checked against.
    /// Channels the scene does not mention keep their values. Returns whether
    /// any channel changed.
    pub fn apply(&self, universe: &mut Universe) -> bool {
        let mut changed = false;
        for write in &self.writes {
            if let Some(instrument) = universe.instruments_mut().get_mut(write.instrument) {
                changed |= distribute(instrument.channels_mut(), &write.group, write.value);
            }
        }
        changed
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}
