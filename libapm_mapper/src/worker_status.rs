/// Progress message sent from the processing thread to whoever is watching
#[derive(Debug, Clone, Default)]
pub struct EntryStatus {
    /// Fraction of the current entry which is done, from 0.0 to 1.0
    pub progress: f32,
    pub entry_id: u32,
}

impl EntryStatus {
    pub fn new(progress: f32, entry_id: u32) -> Self {
        Self { progress, entry_id }
    }

    pub fn is_finished(&self) -> bool {
        self.progress >= 1.0
    }
}
