use std::fmt;
use std::ops::AddAssign;

/// Asset counts of an import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssetStats {
    /// Assets considered for upload
    pub total: usize,
    /// Assets matched to an existing upload instead of uploaded
    pub skipped: usize,
}

impl AddAssign for AssetStats {
    fn add_assign(&mut self, other: Self) {
        self.total += other.total;
        self.skipped += other.skipped;
    }
}

/// What an import run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub containers: usize,
    pub entries: usize,
    pub pages_created: usize,
    pub pages_updated: usize,
    /// Notes whose page already existed and was left alone
    pub notes_skipped: usize,
    pub links_rewritten: usize,
    /// Pages that received a References section
    pub backlinks_appended: usize,
    pub assets: AssetStats,
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Containers created: {}", self.containers)?;
        writeln!(f, "Entries created:    {}", self.entries)?;
        writeln!(f, "Pages created:      {}", self.pages_created)?;
        writeln!(f, "Pages updated:      {}", self.pages_updated)?;
        writeln!(f, "Notes skipped:      {}", self.notes_skipped)?;
        writeln!(f, "Links rewritten:    {}", self.links_rewritten)?;
        writeln!(f, "Backlinks appended: {}", self.backlinks_appended)?;
        write!(
            f,
            "Assets:             {} ({} already present)",
            self.assets.total, self.assets.skipped
        )
    }
}
