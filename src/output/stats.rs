//! Collection statistics
//!
//! Summarizes a finished record collection for the end-of-run report.

use crate::record::{Record, PHONE_UNAVAILABLE};

/// Counts over a finished record collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Total number of records
    pub total_records: usize,

    /// Record count per section, in the order sections first appear
    pub records_by_section: Vec<(String, usize)>,

    /// Records whose detail page was fetched and carried a phone
    pub with_phone: usize,

    /// Records whose detail page had no phone
    pub phone_unavailable: usize,

    /// Records without an identifier
    pub missing_id: usize,
}

impl CrawlStatistics {
    /// Tallies `records`
    pub fn from_records(records: &[Record]) -> Self {
        let mut stats = Self {
            total_records: records.len(),
            ..Self::default()
        };

        for record in records {
            match stats
                .records_by_section
                .iter_mut()
                .find(|(section, _)| *section == record.section)
            {
                Some((_, count)) => *count += 1,
                None => stats.records_by_section.push((record.section.clone(), 1)),
            }

            match record.phone.as_str() {
                "" => {}
                PHONE_UNAVAILABLE => stats.phone_unavailable += 1,
                _ => stats.with_phone += 1,
            }

            if record.id.is_empty() {
                stats.missing_id += 1;
            }
        }

        stats
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Total records: {}", stats.total_records);
    println!("  Records without id: {}", stats.missing_id);
    println!();

    println!("Records by Section:");
    for (section, count) in &stats.records_by_section {
        let percentage = if stats.total_records > 0 {
            (*count as f64 / stats.total_records as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", section, count, percentage);
    }
    println!();

    let enriched = stats.with_phone + stats.phone_unavailable;
    if enriched > 0 {
        println!(
            "Phone Coverage: {} / {} detail pages carried a phone",
            stats.with_phone, enriched
        );
    }
}
