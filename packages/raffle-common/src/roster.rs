use std::collections::HashSet;

use crate::error::SetupError;
use crate::types::{Participant, Prize};

pub const MIN_PARTICIPANTS: usize = 2;
pub const MIN_PRIZES: usize = 1;

pub const PARTICIPANT_ID_PREFIX: &str = "p";
pub const PRIZE_ID_PREFIX: &str = "prize";

/// Roster and prize list entries share id-keyed editing.
pub trait Entry {
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn set_name(&mut self, name: String);
}

impl Entry for Participant {
    const KIND: &'static str = "participant";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

impl Entry for Prize {
    const KIND: &'static str = "prize";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

/// Build a roster from free text: one name per line, surrounding whitespace
/// trimmed, blank lines dropped. Repeated names become distinct participants.
pub fn parse_participant_text(text: &str) -> Vec<Participant> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(i, name)| Participant::new(format!("{}-{}", PARTICIPANT_ID_PREFIX, i), name))
        .collect()
}

/// Allocate `<prefix>-<n>` not already present in `existing`.
pub fn next_id<'a>(prefix: &str, existing: impl IntoIterator<Item = &'a str>) -> String {
    let taken: HashSet<&str> = existing.into_iter().collect();
    let mut n = taken.len();
    loop {
        let candidate = format!("{}-{}", prefix, n);
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
        n += 1;
    }
}

fn clean_name(kind: &str, name: &str) -> Result<String, SetupError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(SetupError::BlankName {
            kind: kind.to_string(),
        });
    }
    Ok(name.to_string())
}

pub fn new_participant(name: &str, existing: &[Participant]) -> Result<Participant, SetupError> {
    let name = clean_name(Participant::KIND, name)?;
    let id = next_id(PARTICIPANT_ID_PREFIX, existing.iter().map(|p| p.id.as_str()));
    Ok(Participant { id, name })
}

pub fn new_prize(name: &str, existing: &[Prize]) -> Result<Prize, SetupError> {
    let name = clean_name(Prize::KIND, name)?;
    let id = next_id(PRIZE_ID_PREFIX, existing.iter().map(|p| p.id.as_str()));
    Ok(Prize { id, name })
}

fn position<T: Entry>(list: &[T], id: &str) -> Result<usize, SetupError> {
    list.iter()
        .position(|e| e.id() == id)
        .ok_or(SetupError::NotFound {
            kind: T::KIND.to_string(),
            id: id.to_string(),
        })
}

pub fn rename_entry<T: Entry>(list: &mut [T], id: &str, name: &str) -> Result<(), SetupError> {
    let name = clean_name(T::KIND, name)?;
    let idx = position(list, id)?;
    list[idx].set_name(name);
    Ok(())
}

pub fn remove_entry<T: Entry>(list: &mut Vec<T>, id: &str) -> Result<T, SetupError> {
    let idx = position(list, id)?;
    Ok(list.remove(idx))
}

/// Move an entry to `to_index`, clamped to the end of the list.
pub fn move_entry<T: Entry>(list: &mut Vec<T>, id: &str, to_index: usize) -> Result<(), SetupError> {
    let idx = position(list, id)?;
    let entry = list.remove(idx);
    let to = to_index.min(list.len());
    list.insert(to, entry);
    Ok(())
}

fn check_unique<T: Entry>(list: &[T]) -> Result<(), SetupError> {
    let mut seen = HashSet::new();
    for entry in list {
        if !seen.insert(entry.id()) {
            return Err(SetupError::DuplicateId {
                id: entry.id().to_string(),
            });
        }
    }
    Ok(())
}

/// Checks a setup is fit to begin a game. `strict_prize_count` additionally
/// refuses more prizes than participants, which would otherwise end the game
/// with trailing prizes unawarded.
pub fn validate_setup(
    participants: &[Participant],
    prizes: &[Prize],
    strict_prize_count: bool,
) -> Result<(), SetupError> {
    if participants.len() < MIN_PARTICIPANTS {
        return Err(SetupError::NotEnoughParticipants {
            min: MIN_PARTICIPANTS,
            got: participants.len(),
        });
    }
    if prizes.len() < MIN_PRIZES {
        return Err(SetupError::NoPrizes);
    }
    if strict_prize_count && prizes.len() > participants.len() {
        return Err(SetupError::TooManyPrizes {
            prizes: prizes.len(),
            participants: participants.len(),
        });
    }
    if participants.iter().any(|p| p.name.trim().is_empty()) {
        return Err(SetupError::BlankName {
            kind: Participant::KIND.to_string(),
        });
    }
    if prizes.iter().any(|p| p.name.trim().is_empty()) {
        return Err(SetupError::BlankName {
            kind: Prize::KIND.to_string(),
        });
    }
    check_unique(participants)?;
    check_unique(prizes)?;
    Ok(())
}
