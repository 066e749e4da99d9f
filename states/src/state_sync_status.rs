#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StateSyncStatus {
    /// Registered but never observed by a compute pass.
    #[default]
    Init,
    /// Changed since the last compute pass.
    Dirty,
    Clean,
}

impl StateSyncStatus {
    pub fn needs_compute(self) -> bool {
        !matches!(self, Self::Clean)
    }
}
