/// Keys the immersive view reacts to. The shell translates raw platform key
/// events into these; anything else never reaches the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Space,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Retreat,
    Advance,
    TogglePlayback,
    Close,
}

impl Key {
    pub fn action(self) -> KeyAction {
        match self {
            Key::ArrowLeft => KeyAction::Retreat,
            Key::ArrowRight => KeyAction::Advance,
            Key::Space => KeyAction::TogglePlayback,
            Key::Escape => KeyAction::Close,
        }
    }
}

impl KeyAction {
    /// Whether the shell must suppress the platform default for the
    /// originating key (space scrolls the page otherwise).
    pub fn suppresses_default(self) -> bool {
        matches!(self, KeyAction::TogglePlayback)
    }
}
