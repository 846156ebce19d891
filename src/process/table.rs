use chrono::NaiveDate;
use std::collections::HashMap;

use crate::error::LookupError;
use crate::process::UnifiedRecord;

/// The merged long-form table. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct UnifiedTable {
    records: Vec<UnifiedRecord>,
    /// Distinct regions in first-appearance order.
    regions: Vec<String>,
    /// Row indices per region, in table order.
    by_region: HashMap<String, Vec<usize>>,
}

impl UnifiedTable {
    pub fn new(records: Vec<UnifiedRecord>) -> Self {
        let mut regions = Vec::new();
        let mut by_region: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, rec) in records.iter().enumerate() {
            by_region
                .entry(rec.region.clone())
                .or_insert_with(|| {
                    regions.push(rec.region.clone());
                    Vec::new()
                })
                .push(i);
        }
        Self {
            records,
            regions,
            by_region,
        }
    }

    pub fn records(&self) -> &[UnifiedRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn contains_region(&self, region: &str) -> bool {
        self.by_region.contains_key(region)
    }

    /// Rows of one region in table order.
    pub fn region_records<'a>(
        &'a self,
        region: &str,
    ) -> Result<impl Iterator<Item = &'a UnifiedRecord> + 'a, LookupError> {
        let idx = self
            .by_region
            .get(region)
            .ok_or_else(|| LookupError::UnknownRegion(region.to_string()))?;
        Ok(idx.iter().map(move |&i| &self.records[i]))
    }

    /// Earliest and latest date present, if any rows exist.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.date).min()?;
        let max = self.records.iter().map(|r| r.date).max()?;
        Some((min, max))
    }
}
