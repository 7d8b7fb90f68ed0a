use chrono::{DateTime, Utc};

use crate::model::{Violation, ViolationKind};

/// Platform-level signals the frontend feeds into the monitor. The terminal
/// analogs of the browser capabilities: focus reporting, mouse capture,
/// bracketed paste, key chords, resize events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformSignal {
    FocusLost,
    ContextMenu,
    CopyChord,
    PasteInput,
    RestrictedChord,
    WindowShrunk,
}

/// One independent violation detector. Armed detectors translate their
/// signal into a violation; stopped detectors ignore everything.
pub trait Detector {
    fn kind(&self) -> ViolationKind;
    fn start(&mut self);
    fn stop(&mut self);
    fn is_armed(&self) -> bool;
    fn matches(&self, signal: PlatformSignal) -> bool;
}

#[derive(Debug, Default)]
pub struct FocusDetector {
    armed: bool,
}

impl Detector for FocusDetector {
    fn kind(&self) -> ViolationKind {
        ViolationKind::TabSwitch
    }
    fn start(&mut self) {
        self.armed = true;
    }
    fn stop(&mut self) {
        self.armed = false;
    }
    fn is_armed(&self) -> bool {
        self.armed
    }
    fn matches(&self, signal: PlatformSignal) -> bool {
        signal == PlatformSignal::FocusLost
    }
}

#[derive(Debug, Default)]
pub struct ContextMenuDetector {
    armed: bool,
}

impl Detector for ContextMenuDetector {
    fn kind(&self) -> ViolationKind {
        ViolationKind::RightClick
    }
    fn start(&mut self) {
        self.armed = true;
    }
    fn stop(&mut self) {
        self.armed = false;
    }
    fn is_armed(&self) -> bool {
        self.armed
    }
    fn matches(&self, signal: PlatformSignal) -> bool {
        signal == PlatformSignal::ContextMenu
    }
}

#[derive(Debug, Default)]
pub struct CopyDetector {
    armed: bool,
}

impl Detector for CopyDetector {
    fn kind(&self) -> ViolationKind {
        ViolationKind::Copy
    }
    fn start(&mut self) {
        self.armed = true;
    }
    fn stop(&mut self) {
        self.armed = false;
    }
    fn is_armed(&self) -> bool {
        self.armed
    }
    fn matches(&self, signal: PlatformSignal) -> bool {
        signal == PlatformSignal::CopyChord
    }
}

#[derive(Debug, Default)]
pub struct PasteDetector {
    armed: bool,
}

impl Detector for PasteDetector {
    fn kind(&self) -> ViolationKind {
        ViolationKind::Paste
    }
    fn start(&mut self) {
        self.armed = true;
    }
    fn stop(&mut self) {
        self.armed = false;
    }
    fn is_armed(&self) -> bool {
        self.armed
    }
    fn matches(&self, signal: PlatformSignal) -> bool {
        signal == PlatformSignal::PasteInput
    }
}

#[derive(Debug, Default)]
pub struct RestrictedKeyDetector {
    armed: bool,
}

impl Detector for RestrictedKeyDetector {
    fn kind(&self) -> ViolationKind {
        ViolationKind::RestrictedKey
    }
    fn start(&mut self) {
        self.armed = true;
    }
    fn stop(&mut self) {
        self.armed = false;
    }
    fn is_armed(&self) -> bool {
        self.armed
    }
    fn matches(&self, signal: PlatformSignal) -> bool {
        signal == PlatformSignal::RestrictedChord
    }
}

#[derive(Debug, Default)]
pub struct WindowDetector {
    armed: bool,
}

impl Detector for WindowDetector {
    fn kind(&self) -> ViolationKind {
        ViolationKind::FullscreenExit
    }
    fn start(&mut self) {
        self.armed = true;
    }
    fn stop(&mut self) {
        self.armed = false;
    }
    fn is_armed(&self) -> bool {
        self.armed
    }
    fn matches(&self, signal: PlatformSignal) -> bool {
        signal == PlatformSignal::WindowShrunk
    }
}

/// Registry of detectors. Activation and teardown iterate the same list so
/// no listener is wired up or torn down ad hoc.
pub struct Monitor {
    detectors: Vec<Box<dyn Detector + Send>>,
}

impl Monitor {
    pub fn with_default_detectors() -> Self {
        Self {
            detectors: vec![
                Box::new(FocusDetector::default()),
                Box::new(ContextMenuDetector::default()),
                Box::new(CopyDetector::default()),
                Box::new(PasteDetector::default()),
                Box::new(RestrictedKeyDetector::default()),
                Box::new(WindowDetector::default()),
            ],
        }
    }

    pub fn start_all(&mut self) {
        for d in &mut self.detectors {
            d.start();
        }
    }

    pub fn stop_all(&mut self) {
        for d in &mut self.detectors {
            d.stop();
        }
    }

    pub fn armed_count(&self) -> usize {
        self.detectors.iter().filter(|d| d.is_armed()).count()
    }

    /// Translates a platform signal into at most one violation. The signal
    /// kinds are disjoint, so the first armed match wins.
    pub fn observe(
        &self,
        signal: PlatformSignal,
        question_index: usize,
        at: DateTime<Utc>,
    ) -> Option<Violation> {
        self.detectors
            .iter()
            .find(|d| d.is_armed() && d.matches(signal))
            .map(|d| Violation {
                kind: d.kind(),
                timestamp: at,
                question_index,
            })
    }
}

impl std::fmt::Debug for Monitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor")
            .field("detectors", &self.detectors.len())
            .field("armed", &self.armed_count())
            .finish()
    }
}
