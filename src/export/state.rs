/// Export workflow status. Strictly linear: `Idle → Selecting → Recording → Processing → Idle`,
/// with failure edges from every active state back to `Idle`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RecordingStatus {
    #[default]
    Idle,
    /// Waiting for the host to grant a capture surface.
    Selecting,
    /// Surface granted; buffering scheduled or running.
    Recording,
    /// Buffering stopped; assembling and delivering the file.
    Processing,
}

impl RecordingStatus {
    /// `true` for every status except `Idle`.
    pub fn is_active(self) -> bool {
        self != Self::Idle
    }

    /// Whether `self → next` is an edge of the state machine.
    pub fn can_transition_to(self, next: Self) -> bool {
        use RecordingStatus::*;
        matches!(
            (self, next),
            (Idle, Selecting)
                | (Selecting, Recording)
                | (Recording, Processing)
                | (Processing, Idle)
                | (Selecting, Idle)
                | (Recording, Idle)
        )
    }
}

impl std::fmt::Display for RecordingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Selecting => "selecting",
            Self::Recording => "recording",
            Self::Processing => "processing",
        })
    }
}
