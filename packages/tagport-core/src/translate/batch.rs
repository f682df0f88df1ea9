use crate::error::Result;
use crate::record::RecordInstance;
use crate::schema::SchemaKey;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::structure::StructureTranslator;

impl StructureTranslator<'_> {
    /// Translates independent records, one result per record in input order.
    ///
    /// Batches above the configured threshold run on the rayon pool when the
    /// `parallel` feature is enabled.
    pub fn translate_batch(
        &self,
        records: &[RecordInstance],
        source_key: &SchemaKey,
        destination_key: &SchemaKey,
    ) -> Vec<Result<RecordInstance>> {
        // Warm the field cache once before fanning out.
        let warmed = self
            .registry()
            .fields_for(source_key)
            .and_then(|_| self.registry().fields_for(destination_key));
        if let Err(e) = warmed {
            tracing::warn!("Batch of {} records cannot be translated: {}", records.len(), e);
            return records.iter().map(|_| Err(e.clone())).collect();
        }

        #[cfg(feature = "parallel")]
        {
            if records.len() > self.parallel_threshold {
                tracing::debug!("Translating {} records in parallel", records.len());
                return records
                    .par_iter()
                    .map(|record| self.translate(record, source_key, destination_key))
                    .collect();
            }
        }

        records
            .iter()
            .map(|record| self.translate(record, source_key, destination_key))
            .collect()
    }
}
