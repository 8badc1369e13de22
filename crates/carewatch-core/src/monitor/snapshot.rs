// ── Poll-cycle reduction ──
//
// Pure reduction of a fetched card list into the monitor's working
// state: which cards are alarming, and the single most urgent tier
// across all of them. Recomputed whole on every poll tick; the previous
// snapshot is only consulted to log newly appeared alarms.

use std::collections::HashSet;

use crate::model::{AlarmTier, Card, CardKey};

use super::SoundState;

/// The reduction of one fetched card list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorSnapshot {
    /// Identity tuples of every card with at least one contributing
    /// (status `active`) event.
    pub alarming: HashSet<CardKey>,
    /// Minimum tier across all contributing events on all cards.
    /// `Unranked` when nothing contributes.
    pub top_tier: AlarmTier,
}

impl MonitorSnapshot {
    /// Reduce a card list. Deterministic and pure.
    pub fn reduce(cards: &[Card]) -> Self {
        let mut alarming = HashSet::new();
        let mut top_tier = AlarmTier::Unranked;

        for card in cards {
            let mut has_alarm = false;
            for event in card.alarms.iter().filter(|e| e.is_contributing()) {
                has_alarm = true;
                top_tier = top_tier.min(event.tier);
            }
            if has_alarm {
                alarming.insert(card.key());
            }
        }

        Self { alarming, top_tier }
    }

    /// No card is alarming.
    pub fn is_quiet(&self) -> bool {
        self.alarming.is_empty()
    }

    /// The sound the snapshot calls for.
    ///
    /// Tier 0 and tier 1 are audible; everything below stays silent --
    /// warning-band alarms are indicated visually only.
    pub fn target_sound(&self) -> SoundState {
        if self.alarming.is_empty() {
            return SoundState::Silent;
        }
        match self.top_tier {
            AlarmTier::L1 => SoundState::PlayingL1,
            AlarmTier::L2 => SoundState::PlayingL2,
            AlarmTier::Warning | AlarmTier::Unranked => SoundState::Silent,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::model::{AlarmEvent, AlarmStatus, CardKind, UnitClass};

    fn event(tier: AlarmTier, status: AlarmStatus) -> AlarmEvent {
        AlarmEvent {
            id: "e".into(),
            event_type: "Fall".into(),
            tier,
            status,
            triggered_at: None,
            triggered_by: None,
            device_id: None,
        }
    }

    fn card(id: &str, kind: CardKind, alarms: Vec<AlarmEvent>) -> Card {
        Card {
            id: id.into(),
            kind,
            unit: UnitClass::Home,
            name: String::new(),
            address: String::new(),
            devices: Vec::new(),
            alarms,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_list_reduces_to_quiet() {
        let snap = MonitorSnapshot::reduce(&[]);
        assert!(snap.is_quiet());
        assert_eq!(snap.top_tier, AlarmTier::Unranked);
        assert_eq!(snap.target_sound(), SoundState::Silent);
    }

    #[test]
    fn lowest_ordinal_wins_across_cards() {
        let cards = vec![
            card(
                "a",
                CardKind::ActiveBed,
                vec![event(AlarmTier::L1, AlarmStatus::Active)],
            ),
            card(
                "b",
                CardKind::Location,
                vec![event(AlarmTier::L2, AlarmStatus::Active)],
            ),
        ];
        let snap = MonitorSnapshot::reduce(&cards);
        assert_eq!(snap.alarming.len(), 2);
        assert_eq!(snap.top_tier, AlarmTier::L1);
        assert_eq!(snap.target_sound(), SoundState::PlayingL1);
    }

    #[test]
    fn acknowledged_events_are_inert() {
        let cards = vec![card(
            "a",
            CardKind::ActiveBed,
            vec![event(AlarmTier::L1, AlarmStatus::Acknowledged)],
        )];
        let snap = MonitorSnapshot::reduce(&cards);
        assert!(snap.is_quiet());
        assert_eq!(snap.target_sound(), SoundState::Silent);
    }

    #[test]
    fn warning_band_is_visible_but_not_audible() {
        let cards = vec![card(
            "a",
            CardKind::ActiveBed,
            vec![event(AlarmTier::Warning, AlarmStatus::Active)],
        )];
        let snap = MonitorSnapshot::reduce(&cards);
        assert_eq!(snap.alarming.len(), 1);
        assert_eq!(snap.target_sound(), SoundState::Silent);
    }

    #[test]
    fn unranked_active_event_still_marks_the_card() {
        let cards = vec![card(
            "a",
            CardKind::ActiveBed,
            vec![event(AlarmTier::Unranked, AlarmStatus::Active)],
        )];
        let snap = MonitorSnapshot::reduce(&cards);
        assert!(!snap.is_quiet());
        // ...but an unrecognized tier never drives a sound.
        assert_eq!(snap.target_sound(), SoundState::Silent);
    }

    #[test]
    fn card_keys_carry_the_type_discriminator() {
        let cards = vec![
            card(
                "same-id",
                CardKind::ActiveBed,
                vec![event(AlarmTier::L2, AlarmStatus::Active)],
            ),
            card(
                "same-id",
                CardKind::Location,
                vec![event(AlarmTier::L2, AlarmStatus::Active)],
            ),
        ];
        let snap = MonitorSnapshot::reduce(&cards);
        assert_eq!(snap.alarming.len(), 2);
    }

    #[test]
    fn mixed_statuses_on_one_card_count_once() {
        let cards = vec![card(
            "a",
            CardKind::ActiveBed,
            vec![
                event(AlarmTier::L1, AlarmStatus::Acknowledged),
                event(AlarmTier::L2, AlarmStatus::Active),
            ],
        )];
        let snap = MonitorSnapshot::reduce(&cards);
        assert_eq!(snap.alarming.len(), 1);
        // The acknowledged L1 must not shadow the active L2.
        assert_eq!(snap.top_tier, AlarmTier::L2);
        assert_eq!(snap.target_sound(), SoundState::PlayingL2);
    }
}
