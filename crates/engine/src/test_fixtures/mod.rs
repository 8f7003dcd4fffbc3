//! Shared test doubles: scripted dice, a fixed clock, a recording narrator
//! and a harness wiring them to in-memory stores.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use taleforge_domain::{Character, Combat, GameState};

use crate::infrastructure::memory::{InMemoryCharacterRepo, InMemoryGameStateRepo};
use crate::infrastructure::ports::{
    ClockPort, LlmError, NarratorError, NarratorPort, RandomPort,
};
use crate::repositories::{CharacterStore, Dice, NarratorService, SessionStore};

// =============================================================================
// Clock / Random
// =============================================================================

pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn at_epoch() -> Self {
        Self(Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap())
    }
}

impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Returns scripted rolls in order. Panics when a roll is out of the
/// requested range or the script runs out.
#[derive(Default)]
pub struct ScriptedRandom {
    rolls: Mutex<VecDeque<i32>>,
}

impl ScriptedRandom {
    pub fn new(rolls: impl IntoIterator<Item = i32>) -> Self {
        Self {
            rolls: Mutex::new(rolls.into_iter().collect()),
        }
    }

    pub fn push(&self, rolls: impl IntoIterator<Item = i32>) {
        self.rolls.lock().expect("lock").extend(rolls);
    }

    pub fn remaining(&self) -> usize {
        self.rolls.lock().expect("lock").len()
    }
}

impl RandomPort for ScriptedRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        let roll = self
            .rolls
            .lock()
            .expect("lock")
            .pop_front()
            .expect("no scripted roll left");
        assert!(
            (min..=max).contains(&roll),
            "scripted roll {roll} outside {min}..={max}"
        );
        roll
    }

    fn gen_uuid(&self) -> Uuid {
        Uuid::new_v4()
    }
}

// =============================================================================
// Narrator
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarratorCall {
    Narrative(String),
    Combat(String),
    Introduction(String),
}

/// Narrator that answers with canned text (or always fails) and records calls.
pub struct RecordingNarrator {
    reply: Option<String>,
    calls: Mutex<Vec<NarratorCall>>,
}

impl RecordingNarrator {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<NarratorCall> {
        self.calls.lock().expect("lock").clone()
    }

    fn answer(&self, call: NarratorCall) -> Result<String, NarratorError> {
        self.calls.lock().expect("lock").push(call);
        self.reply
            .clone()
            .ok_or_else(|| LlmError::RequestFailed("connection refused".to_string()).into())
    }
}

#[async_trait]
impl NarratorPort for RecordingNarrator {
    async fn generate_narrative(
        &self,
        _character: &Character,
        _session: &GameState,
        action: &str,
    ) -> Result<String, NarratorError> {
        self.answer(NarratorCall::Narrative(action.to_string()))
    }

    async fn generate_combat_narrative(
        &self,
        _character: &Character,
        _combat: &Combat,
        action: &str,
    ) -> Result<String, NarratorError> {
        self.answer(NarratorCall::Combat(action.to_string()))
    }

    async fn generate_introduction(&self, character: &Character) -> Result<String, NarratorError> {
        self.answer(NarratorCall::Introduction(character.name.clone()))
    }

    async fn is_available(&self) -> bool {
        self.reply.is_some()
    }
}

// =============================================================================
// Harness
// =============================================================================

/// In-memory stores plus scripted collaborators.
pub struct Harness {
    pub clock: Arc<FixedClock>,
    pub random: Arc<ScriptedRandom>,
    pub narrator: Arc<RecordingNarrator>,
    pub characters: Arc<CharacterStore>,
    pub sessions: Arc<SessionStore>,
    pub narration: Arc<NarratorService>,
    pub dice: Arc<Dice>,
}

impl Harness {
    pub fn new(narrator: RecordingNarrator) -> Self {
        let clock = Arc::new(FixedClock::at_epoch());
        let random = Arc::new(ScriptedRandom::default());
        let narrator = Arc::new(narrator);

        Self {
            characters: Arc::new(CharacterStore::new(
                Arc::new(InMemoryCharacterRepo::new()),
                clock.clone(),
            )),
            sessions: Arc::new(SessionStore::new(
                Arc::new(InMemoryGameStateRepo::new()),
                clock.clone(),
            )),
            narration: Arc::new(NarratorService::new(narrator.clone())),
            dice: Arc::new(Dice::new(random.clone())),
            clock,
            random,
            narrator,
        }
    }

    /// Persist a character and return it.
    pub async fn seed(&self, mut character: Character) -> Character {
        self.characters
            .save(&mut character)
            .await
            .expect("seed character");
        character
    }
}
