//! Host default hotbar handling.
//!
//! Hosts bind the unmodified number row to their own hotbar slots. When the
//! user opts out, each reserved chord is handed to the host adapter for
//! suppression; opting back in restores them. A failure on one chord is
//! logged and does not stop the others.

use macro_keybinds_config::constants::HOTBAR_SLOT_COUNT;

use crate::chord::{Chord, normalize_chord};
use crate::error::HostError;

/// Capability the host exposes for its built-in chord handling.
pub trait HostAdapter {
    fn suppress_default(&self, chord: &Chord) -> Result<(), HostError>;

    fn restore_default(&self, chord: &Chord) -> Result<(), HostError>;
}

/// The unmodified chords `Digit1`..`Digit9`, `Digit0`, in slot order.
pub fn reserved_hotbar_chords() -> Vec<Chord> {
    (1..=HOTBAR_SLOT_COUNT)
        .map(|slot| {
            let digit = slot % 10;
            normalize_chord(&format!("Digit{digit}"), Vec::<String>::new(), None)
        })
        .collect()
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HotbarReport {
    pub applied: Vec<Chord>,
    pub failed: Vec<(Chord, HostError)>,
}

impl HotbarReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Suppress (`disable == true`) or restore every reserved hotbar chord.
pub fn apply_hotbar_policy<H: HostAdapter + ?Sized>(host: &H, disable: bool) -> HotbarReport {
    let mut report = HotbarReport::default();

    for chord in reserved_hotbar_chords() {
        let result = if disable {
            host.suppress_default(&chord)
        } else {
            host.restore_default(&chord)
        };

        match result {
            Ok(()) => report.applied.push(chord),
            Err(e) => {
                tracing::warn!(chord = %chord, error = %e, disable, "Host rejected hotbar change");
                report.failed.push((chord, e));
            }
        }
    }

    tracing::info!(
        disable,
        applied = report.applied.len(),
        failed = report.failed.len(),
        "Applied hotbar policy"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingHost {
        suppressed: RefCell<Vec<String>>,
        restored: RefCell<Vec<String>>,
        reject: Option<&'static str>,
    }

    impl HostAdapter for RecordingHost {
        fn suppress_default(&self, chord: &Chord) -> Result<(), HostError> {
            if self.reject == Some(chord.key()) {
                return Err(HostError::Rejected {
                    chord: chord.display_string(),
                    message: "locked".to_string(),
                });
            }
            self.suppressed.borrow_mut().push(chord.display_string());
            Ok(())
        }

        fn restore_default(&self, chord: &Chord) -> Result<(), HostError> {
            self.restored.borrow_mut().push(chord.display_string());
            Ok(())
        }
    }

    #[test]
    fn test_reserved_chords_are_number_row() {
        let labels: Vec<String> = reserved_hotbar_chords()
            .iter()
            .map(Chord::display_string)
            .collect();
        assert_eq!(labels, ["1", "2", "3", "4", "5", "6", "7", "8", "9", "0"]);
        assert!(reserved_hotbar_chords().iter().all(Chord::is_bare));
    }

    #[test]
    fn test_disable_suppresses_all() {
        let host = RecordingHost::default();
        let report = apply_hotbar_policy(&host, true);

        assert!(report.is_complete());
        assert_eq!(host.suppressed.borrow().len(), 10);
        assert!(host.restored.borrow().is_empty());
    }

    #[test]
    fn test_enable_restores_all() {
        let host = RecordingHost::default();
        apply_hotbar_policy(&host, false);
        assert_eq!(host.restored.borrow().len(), 10);
    }

    #[test]
    fn test_failure_does_not_stop_other_chords() {
        let host = RecordingHost {
            reject: Some("Digit3"),
            ..RecordingHost::default()
        };

        let report = apply_hotbar_policy(&host, true);

        assert_eq!(report.applied.len(), 9);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0.key(), "Digit3");
    }
}
