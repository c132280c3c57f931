//! Birthday wish card state

use std::time::{Duration, Instant};

/// Line shown when no memory was written
pub const FALLBACK_MEMORY: &str = "You are my happiness, my peace, and my forever.";

/// Which side of the card is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WishPhase {
    /// Name and memory inputs
    #[default]
    Compose,
    /// The finished wish
    Revealed,
}

/// Input being edited while composing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WishField {
    #[default]
    Name,
    Memory,
}

impl WishField {
    pub fn toggle(&mut self) {
        *self = match self {
            Self::Name => Self::Memory,
            Self::Memory => Self::Name,
        };
    }
}

/// Birthday card with a compose/reveal toggle
#[derive(Debug, Default)]
pub struct WishCard {
    pub name: String,
    pub memory: String,
    pub phase: WishPhase,
    pub active_field: WishField,
    /// When the current reveal started
    revealed_at: Option<Instant>,
    /// Reveal fade progress, 0.0 (hidden) to 1.0 (fully shown)
    pub reveal_progress: f32,
}

impl WishCard {
    /// Duration of the reveal fade
    const REVEAL_DURATION: Duration = Duration::from_millis(600);

    pub fn new() -> Self {
        Self::default()
    }

    /// The "show" button is only enabled once a name is typed
    pub fn can_reveal(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Flip to the finished card; returns false while the name is empty
    pub fn reveal(&mut self) -> bool {
        if !self.can_reveal() {
            return false;
        }
        self.phase = WishPhase::Revealed;
        self.revealed_at = Some(Instant::now());
        self.reveal_progress = 0.0;
        true
    }

    /// Back to composing, keeping what was typed
    pub fn edit(&mut self) {
        self.phase = WishPhase::Compose;
        self.revealed_at = None;
        self.reveal_progress = 0.0;
    }

    pub fn is_revealed(&self) -> bool {
        self.phase == WishPhase::Revealed
    }

    /// Advance the reveal animation
    pub fn update(&mut self) {
        let Some(start) = self.revealed_at else {
            return;
        };
        let progress = start.elapsed().as_secs_f32() / Self::REVEAL_DURATION.as_secs_f32();
        // cubic ease-out
        self.reveal_progress = simple_easing::cubic_out(progress.min(1.0));
    }

    /// Skip the animation
    pub fn finish_reveal(&mut self) {
        if self.is_revealed() {
            self.revealed_at = None;
            self.reveal_progress = 1.0;
        }
    }

    pub fn active_text_mut(&mut self) -> &mut String {
        match self.active_field {
            WishField::Name => &mut self.name,
            WishField::Memory => &mut self.memory,
        }
    }

    pub fn greeting(&self) -> String {
        format!("My Love, {}", self.name.trim())
    }

    /// The memory in quotes, or the fallback line
    pub fn memory_line(&self) -> String {
        let memory = self.memory.trim();
        if memory.is_empty() {
            FALLBACK_MEMORY.to_string()
        } else {
            format!("\"{memory}\"")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_starts_composing() {
        let card = WishCard::new();
        assert_eq!(card.phase, WishPhase::Compose);
        assert_eq!(card.active_field, WishField::Name);
        assert!(!card.can_reveal());
    }

    #[test]
    fn test_reveal_requires_name() {
        let mut card = WishCard::new();
        card.name = "   ".to_string();
        assert!(!card.reveal());
        assert_eq!(card.phase, WishPhase::Compose);

        card.name = "Sara".to_string();
        assert!(card.reveal());
        assert!(card.is_revealed());
    }

    #[test]
    fn test_edit_keeps_text() {
        let mut card = WishCard::new();
        card.name = "Sara".to_string();
        card.memory = "Our first trip".to_string();
        card.reveal();
        card.edit();
        assert_eq!(card.phase, WishPhase::Compose);
        assert_eq!(card.name, "Sara");
        assert_eq!(card.memory, "Our first trip");
        assert_eq!(card.reveal_progress, 0.0);
    }

    #[test]
    fn test_memory_line() {
        let mut card = WishCard::new();
        assert_eq!(card.memory_line(), FALLBACK_MEMORY);
        card.memory = " Our first trip ".to_string();
        assert_eq!(card.memory_line(), "\"Our first trip\"");
    }

    #[test]
    fn test_greeting_trims_name() {
        let mut card = WishCard::new();
        card.name = " Sara ".to_string();
        assert_eq!(card.greeting(), "My Love, Sara");
    }

    #[test]
    fn test_update_before_reveal_is_noop() {
        let mut card = WishCard::new();
        card.update();
        assert_eq!(card.reveal_progress, 0.0);
    }

    #[test]
    fn test_finish_reveal() {
        let mut card = WishCard::new();
        card.finish_reveal();
        assert_eq!(card.reveal_progress, 0.0);

        card.name = "Sara".to_string();
        card.reveal();
        card.finish_reveal();
        assert_eq!(card.reveal_progress, 1.0);
    }

    #[test]
    fn test_skipped_reveal_survives_update() {
        let mut card = WishCard::new();
        card.name = "Sara".to_string();
        card.reveal();
        card.finish_reveal();
        card.update();
        assert_eq!(card.reveal_progress, 1.0);
    }

    #[test]
    fn test_active_text_mut_follows_focus() {
        let mut card = WishCard::new();
        card.active_text_mut().push('A');
        card.active_field.toggle();
        card.active_text_mut().push('B');
        assert_eq!(card.name, "A");
        assert_eq!(card.memory, "B");
    }
}
